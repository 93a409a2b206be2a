//! NewsAPI ingestion: fetch climate articles and upsert them into the store.
//!
//! Transport failures, `429` and `5xx` responses are retried with
//! exponential backoff. Each article is keyed by the SHA-256 of its URL so a
//! re-run overwrites rather than duplicates.

use std::time::Duration;

use chrono::{DateTime, Utc};
use lazone_core::{article::Article, store::ArticleStore};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};
use url::Url;
use uuid::Uuid;

use crate::settings::NewsApiConfig;

const MAX_DELAY: Duration = Duration::from_secs(30);

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
  status:   String,
  #[serde(default)]
  articles: Vec<RawArticle>,
  message:  Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArticle {
  #[serde(default)]
  pub source:       RawSource,
  pub author:       Option<String>,
  pub title:        Option<String>,
  pub description:  Option<String>,
  pub url:          Option<String>,
  pub url_to_image: Option<String>,
  pub published_at: Option<String>,
  pub content:      Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSource {
  pub name: Option<String>,
}

// ─── Mapping ─────────────────────────────────────────────────────────────────

/// Turn a NewsAPI article into a store record.
pub fn to_article(raw: RawArticle) -> Article {
  let url = non_empty(raw.url);
  let id = match &url {
    Some(u) => hex::encode(Sha256::digest(u.as_bytes())),
    None => Uuid::new_v4().to_string(),
  };

  let mut article = Article::new(id);
  article.published_at = raw.published_at.as_deref().and_then(parse_published);
  article.title = non_empty(raw.title).map(|t| t.to_lowercase());
  article.author = non_empty(raw.author);
  article.body = non_empty(raw.content);
  article.description = non_empty(raw.description);
  article.source = url.as_deref().and_then(source_domain);
  article.source_name = non_empty(raw.source.name);
  article.image_url = non_empty(raw.url_to_image);
  article.url = url;
  article
}

fn non_empty(value: Option<String>) -> Option<String> {
  value.filter(|v| !v.trim().is_empty())
}

/// NewsAPI sends RFC 3339, sometimes with fractional seconds.
fn parse_published(s: &str) -> Option<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s.trim())
    .ok()
    .map(|d| d.with_timezone(&Utc))
}

/// `https://www.theguardian.com/...` → `theguardian.com`
fn source_domain(url: &str) -> Option<String> {
  let parsed = Url::parse(url).ok()?;
  let host = parsed.host_str()?;
  Some(host.strip_prefix("www.").unwrap_or(host).to_owned())
}

// ─── Client ──────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
  #[error("request failed: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("newsapi returned {status}: {message}")]
  Status { status: StatusCode, message: String },
}

impl FetchError {
  fn is_retryable(&self) -> bool {
    match self {
      Self::Transport(e) => !e.is_decode() && !e.is_builder(),
      Self::Status { status, .. } => {
        *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
      }
    }
  }
}

/// HTTP client for the NewsAPI `everything` endpoint.
#[derive(Debug, Clone)]
pub struct NewsApiClient {
  client:     Client,
  config:     NewsApiConfig,
  base_delay: Duration,
}

impl NewsApiClient {
  pub fn new(config: NewsApiConfig) -> anyhow::Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .user_agent(concat!("lazone/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {e}"))?;
    Ok(Self { client, config, base_delay: Duration::from_secs(1) })
  }

  /// First retry waits this long; each further retry doubles it.
  pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
    self.base_delay = base_delay;
    self
  }

  fn endpoint(&self) -> String {
    format!("{}/everything", self.config.base_url.trim_end_matches('/'))
  }

  /// Fetch the configured query, retrying transient failures up to
  /// `max_retries` times.
  pub async fn fetch(&self) -> Result<Vec<RawArticle>, FetchError> {
    let mut attempt = 0u32;
    loop {
      match self.fetch_once().await {
        Ok(articles) => return Ok(articles),
        Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
          attempt += 1;
          let delay = backoff(self.base_delay, attempt);
          warn!(
            attempt,
            max = self.config.max_retries,
            ?delay,
            error = %e,
            "newsapi fetch failed; backing off"
          );
          sleep(delay).await;
        }
        Err(e) => {
          error!(attempt, error = %e, "newsapi fetch failed");
          return Err(e);
        }
      }
    }
  }

  async fn fetch_once(&self) -> Result<Vec<RawArticle>, FetchError> {
    let resp = self
      .client
      .get(self.endpoint())
      .query(&[
        ("q", self.config.query.as_str()),
        ("language", self.config.language.as_str()),
      ])
      .header("X-Api-Key", &self.config.api_key)
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      let message = resp
        .json::<Envelope>()
        .await
        .ok()
        .and_then(|e| e.message)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or_default().to_owned());
      return Err(FetchError::Status { status, message });
    }

    let envelope: Envelope = resp.json().await?;
    if envelope.status != "ok" {
      return Err(FetchError::Status {
        status,
        message: envelope.message.unwrap_or(envelope.status),
      });
    }
    Ok(envelope.articles)
  }
}

fn backoff(base: Duration, attempt: u32) -> Duration {
  let shift = attempt.saturating_sub(1).min(16);
  base.saturating_mul(1 << shift).min(MAX_DELAY)
}

// ─── Ingest ──────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
  pub fetched: usize,
  pub written: usize,
  pub failed:  usize,
}

/// Write every article to `store`. A failed write is logged and counted;
/// it does not stop the run.
pub async fn ingest<S: ArticleStore>(store: &S, raw: Vec<RawArticle>) -> IngestSummary {
  let mut summary = IngestSummary { fetched: raw.len(), ..IngestSummary::default() };

  for raw in raw {
    let article = to_article(raw);
    let article_id = article.article_id.clone();
    match store.put_item(article.into_item()).await {
      Ok(()) => {
        summary.written += 1;
        debug!(%article_id, "stored article");
      }
      Err(e) => {
        summary.failed += 1;
        warn!(%article_id, error = %e, "failed to store article");
      }
    }
  }

  info!(
    fetched = summary.fetched,
    written = summary.written,
    failed = summary.failed,
    "ingest complete"
  );
  summary
}
