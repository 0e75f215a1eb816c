// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use url::Url;
use url::form_urlencoded;

pub const SEARCH_QUERY_KEY: &str = "query";

/// Splits an href into the part before `?` and the raw query (fragment dropped).
pub fn split_href(href: &str) -> (&str, &str) {
    let without_fragment = href.split('#').next().unwrap_or(href);
    match without_fragment.split_once('?') {
        Some((path, query)) => (path, query),
        None => (without_fragment, ""),
    }
}

pub fn parse_query_params(href: &str) -> BTreeMap<String, String> {
    let (_, query) = split_href(href);
    form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

pub fn encode_query<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

/// The href's path with its query replaced by `pairs`. No `?` is emitted for an empty query.
pub fn href_with_query(href: &str, pairs: &[(String, String)]) -> String {
    let (path, _) = split_href(href);
    let query = encode_query(pairs.iter().map(|(key, value)| (key.as_str(), value.as_str())));
    if query.is_empty() {
        path.to_owned()
    } else {
        format!("{path}?{query}")
    }
}

/// Merges `query=<term>` into the current parameters. `None` for a blank term.
pub fn search_href(href: &str, term: &str) -> Option<String> {
    if term.trim().is_empty() {
        return None;
    }
    let mut params = parse_query_params(href);
    params.insert(SEARCH_QUERY_KEY.to_owned(), term.to_owned());
    let pairs = params.into_iter().collect::<Vec<_>>();
    Some(href_with_query(href, &pairs))
}

/// Resolves `target` against the absolute `current` href, like assigning `location.href`.
pub fn resolve_href(current: &str, target: &str) -> Result<String> {
    let base = Url::parse(current).with_context(|| format!("parse current location {current:?}"))?;
    let resolved = base
        .join(target)
        .with_context(|| format!("resolve navigation target {target:?}"))?;
    Ok(resolved.to_string())
}

/// Comma-separated list values as stored in filter query strings.
pub fn split_list_param(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{
        href_with_query, parse_query_params, resolve_href, search_href, split_href,
        split_list_param,
    };
    use anyhow::Result;

    #[test]
    fn split_href_drops_fragment() {
        assert_eq!(split_href("/sales/?a=1#top"), ("/sales/", "a=1"));
        assert_eq!(split_href("/sales/"), ("/sales/", ""));
    }

    #[test]
    fn parse_query_params_decodes_values() {
        let params = parse_query_params("http://shop.test/sales/?query=blue%20mug&stores=a,b");
        assert_eq!(params.get("query").map(String::as_str), Some("blue mug"));
        assert_eq!(params.get("stores").map(String::as_str), Some("a,b"));
        assert!(parse_query_params("/sales/").is_empty());
    }

    #[test]
    fn href_with_query_encodes_pairs() {
        let href = href_with_query(
            "/products/?old=1",
            &[
                ("categories".to_owned(), "food,drinks".to_owned()),
                ("from_date".to_owned(), "2024-01-01".to_owned()),
            ],
        );
        assert_eq!(
            href,
            "/products/?categories=food%2Cdrinks&from_date=2024-01-01"
        );
        assert_eq!(href_with_query("/products/?old=1", &[]), "/products/");
    }

    #[test]
    fn search_merges_into_existing_params() {
        let href = search_href("/sales/?stores=a", "red cup").expect("non-empty term");
        assert_eq!(href, "/sales/?query=red+cup&stores=a");
        assert_eq!(search_href("/sales/", "   "), None);
    }

    #[test]
    fn resolve_href_handles_relative_targets() -> Result<()> {
        assert_eq!(
            resolve_href("http://shop.test/users/signin/", "/stores/5/")?,
            "http://shop.test/stores/5/"
        );
        assert_eq!(
            resolve_href("http://shop.test/stores/", "https://other.test/x")?,
            "https://other.test/x"
        );
        Ok(())
    }

    #[test]
    fn list_params_split_on_commas() {
        assert_eq!(split_list_param("a, b,,c"), vec!["a", "b", "c"]);
        assert!(split_list_param("").is_empty());
    }
}
