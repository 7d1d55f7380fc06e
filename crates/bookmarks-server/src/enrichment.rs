//! Bookmark metadata enrichment.
//!
//! Two external lookups back the `GET /{guid}` endpoint: a WHOIS JSON API
//! queried with the bookmark's host, and the bookmarked page itself, scraped
//! for its Open Graph preview.

use std::collections::HashMap;
use std::sync::LazyLock;

use async_trait::async_trait;
use bookmarks_api::OpenGraph;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::config::EnrichmentConfig;

pub const NO_TITLE: &str = "no title";
pub const NO_IMAGE: &str = "https://upload.wikimedia.org/wikipedia/en/a/aa/No_sign.png";
pub const NO_DESCRIPTION: &str = "no description";

#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },

    #[error("whois response is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

/// Source of WHOIS and Open Graph data for a bookmark.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// WHOIS record for `host`, returned as the upstream JSON.
    async fn whois(&self, host: &str) -> Result<Value, EnrichmentError>;

    /// Open Graph preview of the page at `link`.
    async fn open_graph(&self, link: &str) -> Result<OpenGraph, EnrichmentError>;
}

pub struct HttpMetadataProvider {
    client: reqwest::Client,
    whois_url: Url,
}

impl HttpMetadataProvider {
    pub fn new(config: &EnrichmentConfig) -> Result<Self, EnrichmentError> {
        let whois_url = Url::parse(&config.whois_url)
            .map_err(|e| EnrichmentError::InvalidUrl(format!("{}: {e}", config.whois_url)))?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client, whois_url })
    }

    fn whois_request_url(&self, host: &str) -> Url {
        let mut url = self.whois_url.clone();
        url.set_query(Some(&format!("whois&url={host}&json")));
        url
    }

    async fn fetch_text(&self, url: Url) -> Result<String, EnrichmentError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(EnrichmentError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl MetadataProvider for HttpMetadataProvider {
    #[tracing::instrument(skip(self))]
    async fn whois(&self, host: &str) -> Result<Value, EnrichmentError> {
        let body = self.fetch_text(self.whois_request_url(host)).await?;
        Ok(serde_json::from_str(&body)?)
    }

    #[tracing::instrument(skip(self))]
    async fn open_graph(&self, link: &str) -> Result<OpenGraph, EnrichmentError> {
        let url =
            Url::parse(link).map_err(|e| EnrichmentError::InvalidUrl(format!("{link}: {e}")))?;
        let html = self.fetch_text(url).await?;
        Ok(parse_open_graph(&html))
    }
}

static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("title pattern is valid")
});
static META_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<meta\b[^>]*>").expect("meta pattern is valid"));
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("attribute pattern is valid")
});

/// Extracts the preview from a page; missing values get fixed fallbacks.
pub fn parse_open_graph(html: &str) -> OpenGraph {
    let meta = meta_tags(html);
    let pick = |keys: &[&str]| {
        keys.iter()
            .find_map(|k| meta.get(*k))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let title = TITLE_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| decode_entities(m.as_str().trim()))
        .filter(|t| !t.is_empty())
        .or_else(|| pick(&["og:title"]));

    OpenGraph {
        title: title.unwrap_or_else(|| NO_TITLE.to_string()),
        image: pick(&["image", "og:image"]).unwrap_or_else(|| NO_IMAGE.to_string()),
        description: pick(&["description", "og:description"])
            .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
    }
}

/// `name`/`property`/`itemprop` keys mapped to `content`, first tag wins.
fn meta_tags(html: &str) -> HashMap<String, String> {
    let mut tags = HashMap::new();
    for tag in META_RE.find_iter(html) {
        let mut key = None;
        let mut content = None;
        for attr in ATTR_RE.captures_iter(tag.as_str()) {
            let name = attr[1].to_ascii_lowercase();
            let value = attr
                .get(2)
                .or_else(|| attr.get(3))
                .map(|m| decode_entities(m.as_str()))
                .unwrap_or_default();
            match name.as_str() {
                "name" | "property" | "itemprop" if key.is_none() => {
                    key = Some(value.to_ascii_lowercase())
                }
                "content" => content = Some(value),
                _ => {}
            }
        }
        if let (Some(key), Some(content)) = (key, content) {
            tags.entry(key).or_insert(content);
        }
    }
    tags
}

fn decode_entities(text: &str) -> String {
    text.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
