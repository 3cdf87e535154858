pub mod error;
pub mod raw_series;
