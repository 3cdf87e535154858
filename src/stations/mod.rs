pub mod error;
pub mod hubeau;
pub mod station;
