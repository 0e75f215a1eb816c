// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tally_app::{HttpReply, PostRequest, Transport};

const FIRST_NAMES: [&str; 12] = [
    "Avery", "Jordan", "Taylor", "Riley", "Morgan", "Casey", "Alex", "Quinn", "Parker", "Drew",
    "Kai", "Rowan",
];
const LAST_NAMES: [&str; 12] = [
    "Walker", "Martin", "Hill", "Evans", "Lopez", "Gray", "Ward", "Young", "Diaz", "Reed",
    "Turner", "Brooks",
];
const STORE_ADJECTIVES: [&str; 8] = [
    "Corner", "Central", "Harbor", "Summit", "Maple", "Golden", "Riverside", "Northside",
];
const STORE_NOUNS: [&str; 6] = ["Market", "Goods", "Outfitters", "Supply", "Pantry", "Boutique"];
const PRODUCT_NAMES: [&str; 10] = [
    "Canvas Tote",
    "Ceramic Mug",
    "Linen Shirt",
    "Wool Scarf",
    "Desk Lamp",
    "Notebook",
    "Water Bottle",
    "Leather Wallet",
    "Candle",
    "Backpack",
];
const CATEGORIES: [&str; 5] = ["Apparel", "Home", "Stationery", "Accessories", "Outdoor"];
const CURRENCIES: [&str; 4] = ["USD", "EUR", "GBP", "NGN"];

pub const FIXTURE_CSRF_TOKEN: &str = "fixture-csrf-token";
pub const FIXTURE_ORIGIN: &str = "https://tally.test";

/// Replays queued replies in order and records every request it was given.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    replies: Arc<Mutex<VecDeque<HttpReply>>>,
    requests: Arc<Mutex<Vec<PostRequest>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(self, reply: HttpReply) -> Self {
        self.push_reply(reply);
        self
    }

    pub fn push_reply(&self, reply: HttpReply) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
    }

    pub fn requests(&self) -> Vec<PostRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    pub fn last_request(&self) -> Option<PostRequest> {
        self.requests().pop()
    }
}

impl Transport for RecordingTransport {
    fn post_json(&self, request: &PostRequest) -> Result<HttpReply> {
        self.requests
            .lock()
            .map_err(|_| anyhow!("request log poisoned"))?
            .push(request.clone());
        self.replies
            .lock()
            .map_err(|_| anyhow!("reply queue poisoned"))?
            .pop_front()
            .ok_or_else(|| anyhow!("no reply queued for {}", request.url))
    }
}

/// Never reaches a server.
#[derive(Debug, Clone)]
pub struct FailingTransport {
    message: String,
}

impl FailingTransport {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_owned(),
        }
    }
}

impl Transport for FailingTransport {
    fn post_json(&self, request: &PostRequest) -> Result<HttpReply> {
        Err(anyhow!("{}", self.message).context(format!("post {}", request.url)))
    }
}

pub fn json_reply(status: u16, body: &Value) -> HttpReply {
    HttpReply::new(status, body.to_string())
}

pub fn success_envelope(detail: &str) -> HttpReply {
    json_reply(
        200,
        &json!({ "status_code": 200, "status": "success", "detail": detail }),
    )
}

pub fn redirect_envelope(detail: &str, redirect_url: &str) -> HttpReply {
    json_reply(
        200,
        &json!({
            "status_code": 200,
            "status": "success",
            "detail": detail,
            "redirect_url": redirect_url,
        }),
    )
}

pub fn data_envelope(data: Value) -> HttpReply {
    json_reply(
        200,
        &json!({ "status_code": 200, "status": "success", "data": data }),
    )
}

pub fn error_envelope(status: u16, detail: &str) -> HttpReply {
    json_reply(
        status,
        &json!({ "status_code": status, "status": "error", "detail": detail }),
    )
}

/// A 400 carrying per-field messages, the way form validation failures come back.
pub fn field_errors_envelope(errors: &[(&str, &str)]) -> HttpReply {
    let errors: serde_json::Map<String, Value> = errors
        .iter()
        .map(|(field, message)| ((*field).to_owned(), Value::from(*message)))
        .collect();
    json_reply(
        400,
        &json!({
            "status_code": 400,
            "status": "error",
            "detail": "An error occurred!",
            "errors": errors,
        }),
    )
}

pub fn fixture_cookie() -> String {
    format!("sessionid=fixture-session; csrftoken={FIXTURE_CSRF_TOKEN}")
}

pub fn fixture_url(path: &str) -> String {
    format!("{FIXTURE_ORIGIN}{path}")
}

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Store {
    pub name: String,
    pub slug: String,
    pub email: String,
    pub default_currency: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub name: String,
    pub category: String,
    pub price: String,
    pub quantity: String,
}

/// Seeded generator for the values people type into Tally's forms.
#[derive(Debug, Clone)]
pub struct ShopFaker {
    rng: DeterministicRng,
}

impl ShopFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
        }
    }

    pub fn account(&mut self) -> Account {
        let firstname = self.pick(&FIRST_NAMES).to_owned();
        let lastname = self.pick(&LAST_NAMES).to_owned();
        let email = format!(
            "{}.{}{}@example.com",
            firstname.to_lowercase(),
            lastname.to_lowercase(),
            self.rng.int_n(100)
        );
        let password = format!("Tally!{}{}", lastname, 10 + self.rng.int_n(90));
        Account {
            firstname,
            lastname,
            email,
            password,
        }
    }

    pub fn store(&mut self) -> Store {
        let name = format!("{} {}", self.pick(&STORE_ADJECTIVES), self.pick(&STORE_NOUNS));
        let slug = slugify(&name);
        Store {
            email: format!("{}@example.com", slug.replace('-', "")),
            default_currency: self.pick(&CURRENCIES).to_owned(),
            name,
            slug,
        }
    }

    pub fn product(&mut self) -> Product {
        let cents = 199 + self.rng.int_n(9_800);
        Product {
            name: self.pick(&PRODUCT_NAMES).to_owned(),
            category: self.pick(&CATEGORIES).to_owned(),
            price: format!("{}.{:02}", cents / 100, cents % 100),
            quantity: (1 + self.rng.int_n(50)).to_string(),
        }
    }

    fn pick<'a>(&mut self, values: &'a [&'a str]) -> &'a str {
        values[self.rng.int_n(values.len())]
    }
}

pub fn categories() -> &'static [&'static str] {
    &CATEGORIES
}

pub fn slugify(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}
