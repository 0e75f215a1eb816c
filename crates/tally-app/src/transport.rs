// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;

pub const CSRF_HEADER: &str = "X-CSRFToken";

#[derive(Debug, Clone, PartialEq)]
pub struct PostRequest {
    pub url: String,
    pub csrf_token: Option<String>,
    pub cookie: Option<String>,
    pub body: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Sends a JSON POST and returns whatever the server answered. Non-2xx replies are `Ok`;
/// only failures to get a reply at all are errors.
pub trait Transport {
    fn post_json(&self, request: &PostRequest) -> Result<HttpReply>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn post_json(&self, request: &PostRequest) -> Result<HttpReply> {
        (**self).post_json(request)
    }
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn post_json(&self, request: &PostRequest) -> Result<HttpReply> {
        (**self).post_json(request)
    }
}
