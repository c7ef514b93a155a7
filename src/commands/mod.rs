pub mod run;
pub mod signal;
