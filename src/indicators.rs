//! Technical indicators
//!
//! Rolling indicators over raw price slices. Each function returns one value
//! per input element, `None` until the warm-up window is filled.

/// Simple Moving Average over a rolling window
pub fn sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = Vec::with_capacity(values.len());
    if period == 0 {
        result.resize(values.len(), None);
        return result;
    }

    let mut window_sum = 0.0;
    for (i, &value) in values.iter().enumerate() {
        window_sum += value;
        if i >= period {
            window_sum -= values[i - period];
        }
        if i + 1 >= period {
            result.push(Some(window_sum / period as f64));
        } else {
            result.push(None);
        }
    }

    result
}

/// Relative Strength Index using simple rolling means of gains and losses
/// over the trailing `period` price deltas.
///
/// Defined as 100 when the average loss is zero, so the output always lies
/// in [0, 100]. Requires `period + 1` observations before producing a value.
pub fn rsi(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; values.len()];
    if period == 0 || values.len() < period + 1 {
        return result;
    }

    // Deltas: gain[i] / loss[i] describe the move into values[i]
    let mut gains = vec![0.0; values.len()];
    let mut losses = vec![0.0; values.len()];
    for i in 1..values.len() {
        let change = values[i] - values[i - 1];
        if change > 0.0 {
            gains[i] = change;
        } else {
            losses[i] = -change;
        }
    }

    let mut gain_sum: f64 = gains[1..=period].iter().sum();
    let mut loss_sum: f64 = losses[1..=period].iter().sum();

    for i in period..values.len() {
        if i > period {
            gain_sum += gains[i] - gains[i - period];
            loss_sum += losses[i] - losses[i - period];
        }

        let avg_gain = gain_sum / period as f64;
        let avg_loss = loss_sum / period as f64;

        let value = if avg_loss == 0.0 {
            100.0
        } else {
            let rs = avg_gain / avg_loss;
            100.0 - (100.0 / (1.0 + rs))
        };
        result[i] = Some(value);
    }

    result
}
