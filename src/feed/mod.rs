pub mod cache;
pub mod error;
pub mod source;
pub mod types;

pub use cache::FeedCache;
pub use error::{FeedError, FeedErrorKind};
pub use source::{FeedSource, HttpFeedSource};
pub use types::{PredictionRecord, RecordSet};
