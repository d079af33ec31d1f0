use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedErrorKind {
    /// The endpoint answered with a non-success status.
    Fetch,
    /// The body was not a JSON array of prediction records.
    Format,
    /// The request never produced a usable response.
    Transport,
    DegenerateDistribution,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FeedError {
    pub kind: FeedErrorKind,
    pub message: String,
    pub http_status: Option<u16>,
}

impl FeedError {
    pub fn new(kind: FeedErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            http_status: None,
        }
    }

    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }

    pub fn is_fetch(&self) -> bool {
        self.kind == FeedErrorKind::Fetch
    }

    pub fn is_format(&self) -> bool {
        self.kind == FeedErrorKind::Format
    }
}

pub fn fetch_error(status: u16, status_text: &str) -> FeedError {
    let message = if status_text.is_empty() {
        format!("feed endpoint returned status {status}")
    } else {
        format!("feed endpoint returned status {status} {status_text}")
    };
    FeedError::new(FeedErrorKind::Fetch, message).with_http_status(status)
}

pub fn format_error(message: impl Into<String>) -> FeedError {
    FeedError::new(FeedErrorKind::Format, message)
}

pub fn transport_error(message: impl Into<String>) -> FeedError {
    FeedError::new(FeedErrorKind::Transport, message)
}

pub fn degenerate_distribution(record_id: &str, sum: f64) -> FeedError {
    FeedError::new(
        FeedErrorKind::DegenerateDistribution,
        format!("outcome weights for record '{record_id}' cannot be normalized (sum={sum})"),
    )
}
