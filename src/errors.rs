#[derive(thiserror::Error, Debug)]
pub enum CurlbenchError {
    #[error("URL was not passed")]
    UrlMissing,

    #[error("No samples captured, not showing stats :(")]
    NoSamples,

    #[error("Invalid sleep interval {value}: must be a non-negative number of seconds")]
    InvalidSleep { value: f64 },
}
