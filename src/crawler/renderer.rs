//! Page renderer abstraction and the HTTP implementation
//!
//! A renderer turns a URL into final markup. This module handles:
//! - The `PageRenderer` trait the crawl loop depends on
//! - Building the HTTP client with the configured user agent
//! - Bounded navigation (connect, request, response headers)
//! - Streaming the body until network quiescence or its timeout
//! - Error classification

use crate::config::RendererConfig;
use crate::crawler::extractor::{extract_assets, ExtractedAssets};
use async_trait::async_trait;
use encoding_rs::{Encoding, UTF_8};
use futures::StreamExt;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client, Response};
use std::time::Duration;
use thiserror::Error;

/// Errors that fail a page's processing
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to initialize renderer: {0}")]
    Init(String),

    #[error("Navigation to {url} timed out after {timeout_ms}ms")]
    NavigationTimeout { url: String, timeout_ms: u64 },

    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Server error for {url}: HTTP {status}")]
    ServerError { url: String, status: u16 },

    #[error("Expected HTML from {url}, got {content_type}")]
    ContentMismatch { url: String, content_type: String },

    #[error("Failed to read page body of {url}: {reason}")]
    Body { url: String, reason: String },
}

/// Final state of a page after navigation and the quiescence wait
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// The URL navigation started from
    pub requested_url: String,

    /// The URL after redirects; relative addresses resolve against it
    pub final_url: String,

    /// Rendered markup
    pub markup: String,

    /// False when the quiescence wait timed out and `markup` is partial
    pub quiescent: bool,
}

impl RenderedPage {
    /// Queries the page for anchor targets and image sources
    pub fn extract(&self) -> ExtractedAssets {
        extract_assets(&self.markup, &self.final_url)
    }
}

/// Something that can navigate to a URL and hand back its rendered DOM
///
/// Each call is scoped to one page: whatever session the implementation opens
/// must be released before `render` returns, on success and on failure.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render(&self, url: &str) -> Result<RenderedPage, RenderError>;
}

/// Renderer backed by a plain HTTP client
pub struct HttpRenderer {
    client: Client,
    navigation_timeout: Duration,
    quiescence_timeout: Duration,
}

impl HttpRenderer {
    /// Builds the renderer; failure here aborts the run before crawling
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sitegraph::config::RendererConfig;
    /// use sitegraph::crawler::HttpRenderer;
    ///
    /// let renderer = HttpRenderer::new(&RendererConfig::default()).unwrap();
    /// ```
    pub fn new(config: &RendererConfig) -> Result<Self, RenderError> {
        let navigation_timeout = Duration::from_millis(config.navigation_timeout_ms);

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .connect_timeout(navigation_timeout)
            .redirect(Policy::limited(10))
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(|e| RenderError::Init(e.to_string()))?;

        Ok(Self {
            client,
            navigation_timeout,
            quiescence_timeout: Duration::from_millis(config.quiescence_timeout_ms),
        })
    }

    /// Sends the request and waits for response headers
    async fn navigate(&self, url: &str) -> Result<Response, RenderError> {
        match tokio::time::timeout(self.navigation_timeout, self.client.get(url).send()).await {
            Err(_) => Err(RenderError::NavigationTimeout {
                url: url.to_string(),
                timeout_ms: self.navigation_timeout.as_millis() as u64,
            }),
            Ok(Err(e)) => Err(classify_navigation_error(url, &e)),
            Ok(Ok(response)) => Ok(response),
        }
    }

    /// Streams the body until it completes or the quiescence wait runs out
    ///
    /// Running out of time is not an error: the bytes received so far are
    /// returned with `quiescent = false`.
    async fn read_until_quiescent(
        &self,
        url: &str,
        response: Response,
    ) -> Result<(Vec<u8>, bool), RenderError> {
        let deadline = tokio::time::Instant::now() + self.quiescence_timeout;
        let mut stream = response.bytes_stream();
        let mut body: Vec<u8> = Vec::new();

        loop {
            match tokio::time::timeout_at(deadline, stream.next()).await {
                Ok(Some(Ok(chunk))) => body.extend_from_slice(&chunk),
                Ok(Some(Err(e))) => {
                    return Err(RenderError::Body {
                        url: url.to_string(),
                        reason: e.to_string(),
                    })
                }
                Ok(None) => return Ok((body, true)),
                Err(_) => {
                    tracing::warn!(
                        "Network idle wait timed out for {} after {:?}, proceeding with {} bytes",
                        url,
                        self.quiescence_timeout,
                        body.len()
                    );
                    return Ok((body, false));
                }
            }
        }
    }
}

#[async_trait]
impl PageRenderer for HttpRenderer {
    async fn render(&self, url: &str) -> Result<RenderedPage, RenderError> {
        let response = self.navigate(url).await?;
        let status = response.status();
        let final_url = response.url().to_string();

        if status.is_server_error() {
            return Err(RenderError::ServerError {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            tracing::warn!("{} answered HTTP {}, rendering it anyway", url, status);
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if let Some(content_type) = &content_type {
            if !is_markup(content_type) {
                return Err(RenderError::ContentMismatch {
                    url: url.to_string(),
                    content_type: content_type.clone(),
                });
            }
        }

        let (body, quiescent) = self.read_until_quiescent(url, response).await?;
        let markup = decode_body(&body, content_type.as_deref());

        Ok(RenderedPage {
            requested_url: url.to_string(),
            final_url,
            markup,
            quiescent,
        })
    }
}

/// HTML and XHTML documents have a DOM worth querying
fn is_markup(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}

/// Decodes the body with the charset the response declares, UTF-8 otherwise
///
/// Malformed sequences become U+FFFD instead of failing the page.
fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    let encoding = content_type
        .and_then(charset_label)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8);

    let (text, _, _) = encoding.decode(body);
    text.into_owned()
}

/// The `charset` parameter of a Content-Type value, unquoted
fn charset_label(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if name.trim().eq_ignore_ascii_case("charset") {
            Some(value.trim().trim_matches('"').to_string())
        } else {
            None
        }
    })
}

/// Maps a transport error onto a navigation failure
fn classify_navigation_error(url: &str, error: &reqwest::Error) -> RenderError {
    let reason = if error.is_timeout() {
        "request timeout".to_string()
    } else if error.is_connect() {
        format!("connection failed: {}", error)
    } else if error.is_redirect() {
        format!("redirect error: {}", error)
    } else {
        error.to_string()
    };

    RenderError::Navigation {
        url: url.to_string(),
        reason,
    }
}
