// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use reqwest::blocking::Client as HttpClient;
use reqwest::header::{CONTENT_TYPE, COOKIE, REFERER};
use std::time::Duration;
use tally_app::{CSRF_HEADER, HttpReply, PostRequest, Transport};
use url::Url;

/// Posts form payloads to one Tally server.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let trimmed = base_url.trim();
        if trimmed.is_empty() {
            bail!("server.base_url must not be empty");
        }
        let base_url =
            Url::parse(trimmed).with_context(|| format!("parse server.base_url {trimmed:?}"))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            bail!(
                "server.base_url must use http or https, got {:?}",
                base_url.scheme()
            );
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolves `target` against the base URL. Absolute targets must share its origin;
    /// the session cookie is never sent anywhere else.
    pub fn resolve(&self, target: &str) -> Result<Url> {
        let url = self
            .base_url
            .join(target)
            .with_context(|| format!("resolve {target:?} against {}", self.base_url))?;
        if url.origin() != self.base_url.origin() {
            bail!(
                "refusing to post to {url}: it is not on {}",
                self.base_url.origin().ascii_serialization()
            );
        }
        Ok(url)
    }

    fn send(&self, request: &PostRequest) -> Result<HttpReply> {
        let url = self.resolve(&request.url)?;
        let mut builder = self
            .http
            .post(url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(REFERER, self.base_url.as_str())
            .body(request.body.to_string());
        if let Some(token) = request.csrf_token.as_deref() {
            builder = builder.header(CSRF_HEADER, token);
        }
        if let Some(cookie) = request.cookie.as_deref() {
            builder = builder.header(COOKIE, cookie);
        }

        tracing::debug!(url = %url, "posting form");
        let response = builder
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .with_context(|| format!("read response body from {url}"))?;
        tracing::debug!(url = %url, status, bytes = body.len(), "server replied");
        Ok(HttpReply::new(status, body))
    }
}

impl Transport for Client {
    fn post_json(&self, request: &PostRequest) -> Result<HttpReply> {
        self.send(request)
    }
}

fn connection_error(base_url: &Url, error: reqwest::Error) -> anyhow::Error {
    if error.is_timeout() {
        return anyhow!("{base_url} did not answer in time ({error})");
    }
    anyhow!("cannot reach {base_url} -- is the server running? ({error})")
}

#[cfg(test)]
mod tests {
    use super::Client;
    use std::time::Duration;

    #[test]
    fn rejects_non_http_base_url() {
        let error = Client::new("ftp://shop.test/", Duration::from_secs(1))
            .expect_err("ftp is not supported");
        assert!(error.to_string().contains("http or https"), "{error}");
    }

    #[test]
    fn rejects_empty_base_url() {
        assert!(Client::new("  ", Duration::from_secs(1)).is_err());
    }

    #[test]
    fn resolves_paths_on_the_base_origin() -> anyhow::Result<()> {
        let client = Client::new("https://shop.test/", Duration::from_secs(1))?;
        assert_eq!(
            client.resolve("/stores/new/")?.as_str(),
            "https://shop.test/stores/new/"
        );
        assert_eq!(
            client.resolve("https://shop.test/accounts/signin/")?.as_str(),
            "https://shop.test/accounts/signin/"
        );
        Ok(())
    }

    #[test]
    fn refuses_other_origins() -> anyhow::Result<()> {
        let client = Client::new("https://shop.test/", Duration::from_secs(1))?;
        let error = client
            .resolve("https://elsewhere.test/stores/new/")
            .expect_err("cross-origin post");
        assert!(error.to_string().contains("refusing"), "{error}");
        Ok(())
    }
}
