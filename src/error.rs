use crate::archive_data::error::FetchError;
use crate::stations::error::StationError;
use crate::stats::error::StatsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Stats(#[from] StatsError),

    #[error(transparent)]
    Station(#[from] StationError),
}
