use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("Series has {labels} date labels but {values} values")]
    LengthMismatch { labels: usize, values: usize },

    #[error("Invalid date label '{label}', expected YYYY-MM-DD")]
    InvalidDate {
        label: String,
        #[source]
        source: chrono::ParseError,
    },
}
