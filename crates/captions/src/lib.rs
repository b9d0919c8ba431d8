//! Caption fetching with a cache in front.
//!
//! The session only needs "give me segments for this video and language";
//! everything about the upstream provider, its fallback behavior, and the
//! 24-hour cache stays behind [`CaptionProxy`].

pub mod proxy;
pub mod source;
pub mod url;

pub use proxy::{CaptionProxy, CACHE_TTL};
pub use source::{CaptionSource, HttpCaptionSource, RawCaption, DEFAULT_LANG};
pub use url::extract_video_id;

/// Caption retrieval failures. All surface to the user as "captions
/// unavailable"; the session stays pre-ready and the request may be retried.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("captions unavailable upstream (status {status})")]
    Upstream { status: u16 },
    #[error("unexpected provider response: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, FetchError>;
