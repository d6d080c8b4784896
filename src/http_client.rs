// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use anyhow::{Context, Result};
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::errors::SourceError;

/// Realistic browser User-Agent so CDNs serve the same assets a browser gets
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Maximum response body size (2MB) to prevent memory exhaustion
const DEFAULT_MAX_BODY_SIZE: usize = 2 * 1024 * 1024;

const MAX_REDIRECTS: usize = 5;

/// Shared outbound HTTP client. All external I/O in the engine (script
/// fetches, reputation lookups, CVE enrichment) goes through this wrapper:
/// bounded timeout, bounded retries, capped body size.
#[derive(Clone)]
pub struct HttpClient {
    client: Arc<Client>,
    timeout: Duration,
    max_retries: u32,
    max_body_size: usize,
}

impl HttpClient {
    pub fn new(timeout_secs: u64, max_retries: u32) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(BROWSER_USER_AGENT)
            .tcp_nodelay(true)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client: Arc::new(client),
            timeout: Duration::from_secs(timeout_secs),
            max_retries,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        })
    }

    pub fn with_body_limit(mut self, max_body_size: usize) -> Self {
        self.max_body_size = max_body_size;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET a URL. Retries transient failures up to `max_retries` times.
    /// Non-2xx responses are returned, not treated as errors; callers
    /// decide what a given status means for their signal.
    pub async fn get(&self, url: &str) -> Result<HttpResponse, SourceError> {
        self.get_with_headers(url, &[]).await
    }

    pub async fn get_with_headers(
        &self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse, SourceError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                tokio::time::sleep(Duration::from_millis(250 * attempt as u64)).await;
                debug!("Retrying GET {} (attempt {})", url, attempt + 1);
            }

            match self.execute_get(url, headers).await {
                Ok(response) => return Ok(response),
                Err(err) => {
                    if !err.is_transient() || attempt == self.max_retries {
                        return Err(err);
                    }
                    last_error = Some(err);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| SourceError::Unavailable(format!("request to {} failed", url))))
    }

    async fn execute_get(
        &self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse, SourceError> {
        let started = Instant::now();

        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SourceError::from_reqwest(url, self.timeout, e))?;

        let status_code = response.status().as_u16();

        let mut header_map = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                header_map.insert(name.as_str().to_lowercase(), value.to_string());
            }
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SourceError::from_reqwest(url, self.timeout, e))?;

        let truncated = &bytes[..bytes.len().min(self.max_body_size)];
        let body = String::from_utf8_lossy(truncated).into_owned();

        Ok(HttpResponse {
            status_code,
            body,
            headers: header_map,
            duration_ms: started.elapsed().as_millis() as u64,
        })
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status_code: u16,
    pub body: String,
    pub headers: HashMap<String, String>,
    pub duration_ms: u64,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(|s| s.as_str())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}
