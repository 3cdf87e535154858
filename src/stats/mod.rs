pub mod aggregate;
pub mod error;
mod monthly;
mod rank;
pub mod year_stats;
