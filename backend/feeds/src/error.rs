use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Rate limited by upstream ({status})")]
    RateLimited { status: u16 },

    #[error("Upstream returned {status}")]
    Status { status: u16 },

    #[error("Upstream unavailable: {0}")]
    Unavailable(#[from] reqwest::Error),

    #[error("Malformed upstream payload: {0}")]
    Malformed(String),
}

impl FetchError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, FetchError::RateLimited { .. })
    }
}
