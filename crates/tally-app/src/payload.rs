// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PayloadValue {
    Text(String),
    List(Vec<String>),
    Group(BTreeMap<String, String>),
}

impl PayloadValue {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(value) => value.is_empty(),
            Self::List(values) => values.is_empty(),
            Self::Group(entries) => entries.values().all(String::is_empty),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(values) => Some(values),
            _ => None,
        }
    }
}

impl From<&str> for PayloadValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for PayloadValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for PayloadValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

/// Field name to value mapping built from one form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormPayload {
    fields: BTreeMap<String, PayloadValue>,
}

impl FormPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PayloadValue>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&PayloadValue> {
        self.fields.get(key)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(PayloadValue::as_text)
    }

    pub fn remove(&mut self, key: &str) -> Option<PayloadValue> {
        self.fields.remove(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PayloadValue)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Flattens group values one level into the payload and drops empty values.
    ///
    /// Keys come out snake_cased (every `-` becomes `_`). When a flattened group key collides
    /// with an existing key, the later one in key order wins.
    pub fn cleaned(&self) -> Self {
        let mut cleaned = Self::new();
        for (key, value) in &self.fields {
            match value {
                PayloadValue::Group(entries) => {
                    for (inner_key, inner_value) in entries {
                        if inner_value.is_empty() {
                            continue;
                        }
                        cleaned.insert(snake_key(inner_key), inner_value.clone());
                    }
                }
                other if other.is_empty() => {}
                other => cleaned.insert(snake_key(key), other.clone()),
            }
        }
        cleaned
    }

    /// Pairs for a query string: empty values dropped, lists comma-joined, groups flattened.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.cleaned()
            .fields
            .into_iter()
            .filter_map(|(key, value)| match value {
                PayloadValue::Text(text) => Some((key, text)),
                PayloadValue::List(values) => Some((key, values.join(","))),
                PayloadValue::Group(_) => None,
            })
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|_| serde_json::Value::Object(Default::default()))
    }
}

impl FromIterator<(String, PayloadValue)> for FormPayload {
    fn from_iter<T: IntoIterator<Item = (String, PayloadValue)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

pub fn snake_key(key: &str) -> String {
    key.replace('-', "_")
}
