//! Upstream caption sources.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};

use crate::{FetchError, Result};

/// Caption language requested when the caller does not specify one.
pub const DEFAULT_LANG: &str = "de";

/// Timeout applied to every provider request so a dead upstream resolves to
/// an error instead of hanging the load.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// One caption item in the provider's shape. `start` and `dur` arrive as
/// strings from some providers, so deserialization is lenient.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCaption {
    pub text: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub start: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub dur: f64,
}

fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| Error::custom("number out of f64 range")),
        serde_json::Value::String(s) => s.trim().parse().map_err(Error::custom),
        other => Err(Error::custom(format!("expected number, got {other}"))),
    }
}

/// Upstream source of raw captions for a video.
///
/// The HTTP provider implements this; tests inject scripted sources.
#[async_trait]
pub trait CaptionSource: Send + Sync {
    async fn fetch(&self, video_id: &str, lang: &str) -> Result<Vec<RawCaption>>;
}

/// Provider-backed caption source speaking the RapidAPI transcript API.
pub struct HttpCaptionSource {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpCaptionSource {
    pub const DEFAULT_HOST: &'static str =
        "youtube-captions-transcript-subtitles-video-combiner.p.rapidapi.com";

    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, format!("https://{}", Self::DEFAULT_HOST))
    }

    /// Point the source at a different host (used by tests).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    async fn request(&self, video_id: &str, lang: &str) -> Result<reqwest::Response> {
        let url = format!(
            "{}/download-json/{video_id}?language={lang}",
            self.base_url
        );
        let response = self
            .client
            .get(&url)
            .header("X-RapidAPI-Key", &self.api_key)
            .header("X-RapidAPI-Host", Self::DEFAULT_HOST)
            .send()
            .await?;
        Ok(response)
    }
}

#[async_trait]
impl CaptionSource for HttpCaptionSource {
    async fn fetch(&self, video_id: &str, lang: &str) -> Result<Vec<RawCaption>> {
        let mut response = self.request(video_id, lang).await?;

        // No track for the requested language: try English once before
        // giving up.
        if response.status() == reqwest::StatusCode::NOT_FOUND && lang != "en" {
            tracing::info!(video_id, lang, "no captions for requested language, retrying with en");
            response = self.request(video_id, "en").await?;
        }

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Upstream {
                status: status.as_u16(),
            });
        }

        let items: Vec<RawCaption> = response.json().await?;
        if items.is_empty() {
            return Err(FetchError::InvalidResponse(
                "provider returned an empty caption list".to_string(),
            ));
        }
        Ok(items)
    }
}
