// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use std::sync::Arc;
use std::time::Duration;
use tally_app::{FormKind, parse_query_params};
use tally_testkit::{RecordingTransport, categories, fixture_url};
use tally_ui::{
    FilterChoices, FilterOutcome, Page, PageSettings, SHOW_BLOCK, SHOW_FLEX, SHOW_SIDEBAR,
    Session, build_filters_card, build_header_search, build_product_cards, build_sidebar,
    build_stat_card, build_store_cards, disable_header_search, field_error, seed_filters,
};

fn session_at(path: &str) -> Session {
    let page = Page::new(&fixture_url(path), PageSettings::default()).with_timezone("UTC");
    Session::new(page, Arc::new(RecordingTransport::new()))
}

fn choices() -> FilterChoices {
    FilterChoices {
        stores: vec![
            ("3".to_owned(), "Corner Market".to_owned()),
            ("8".to_owned(), "Harbor Goods".to_owned()),
        ],
        categories: categories().iter().map(|name| (*name).to_owned()).collect(),
    }
}

#[test]
fn filters_navigate_with_query_and_seed_back() -> Result<()> {
    let mut session = session_at("/stores/corner-market/sales/?query=mug");
    let root = session.page.document.root();
    let filters = build_filters_card(&mut session.page.document, root, &choices());
    let card = session.add_card(filters.card_spec());

    session.click(filters.toggle);
    assert!(session.cards.is_visible(&session.page.document, card));

    let store = filters.form.field("8").ok_or_else(|| anyhow!("store 8"))?;
    let home = filters.form.field("category-1").ok_or_else(|| anyhow!("category"))?;
    session.set_checked(store, true)?;
    session.set_checked(home, true)?;
    let from = filters.form.field("from_date").ok_or_else(|| anyhow!("from"))?;
    let to = filters.form.field("to_date").ok_or_else(|| anyhow!("to"))?;
    session.input(from, "2024-05-01");
    session.input(to, "2024-05-31");

    let outcome = session.apply_filters(card, filters.form.form)?;
    let FilterOutcome::Navigated(target) = outcome else {
        return Err(anyhow!("filters were rejected: {outcome:?}"));
    };
    assert!(!session.cards.is_visible(&session.page.document, card));
    assert!(target.starts_with(&fixture_url("/stores/corner-market/sales/?")));
    let params = parse_query_params(&target);
    assert_eq!(params.get("stores").map(String::as_str), Some("8"));
    assert_eq!(params.get("categories").map(String::as_str), Some("Home"));
    assert_eq!(params.get("from_date").map(String::as_str), Some("2024-05-01"));
    assert_eq!(params.get("to_date").map(String::as_str), Some("2024-05-31"));
    assert!(!params.contains_key("query"));

    let mut next = session_at("/stores/corner-market/sales/");
    let root = next.page.document.root();
    let reloaded = build_filters_card(&mut next.page.document, root, &choices());
    seed_filters(&mut next.page.document, reloaded.form.form, &target);
    let doc = &next.page.document;
    let checked = |name: &str| {
        reloaded
            .form
            .field(name)
            .and_then(|id| doc.get(id))
            .is_some_and(|element| element.checked)
    };
    assert!(checked("8"));
    assert!(!checked("3"));
    assert!(checked("category-1"));
    let date = reloaded.form.field("date").ok_or_else(|| anyhow!("date"))?;
    assert!(doc.is_disabled(date));
    let from = reloaded.form.field("from_date").ok_or_else(|| anyhow!("from"))?;
    assert_eq!(doc.value(from), "2024-05-01");
    Ok(())
}

#[test]
fn filters_reject_reversed_range() -> Result<()> {
    let mut session = session_at("/stores/corner-market/sales/");
    let root = session.page.document.root();
    let filters = build_filters_card(&mut session.page.document, root, &choices());
    let card = session.add_card(filters.card_spec());
    session.click(filters.toggle);

    let from = filters.form.field("from_date").ok_or_else(|| anyhow!("from"))?;
    let to = filters.form.field("to_date").ok_or_else(|| anyhow!("to"))?;
    session.input(from, "2024-05-31");
    session.input(to, "2024-05-01");

    let outcome = session.apply_filters(card, filters.form.form)?;
    assert!(matches!(outcome, FilterOutcome::Rejected(_)));
    assert!(session.page.visited().is_empty());
    assert!(session.cards.is_visible(&session.page.document, card));
    let marked = [from, to]
        .into_iter()
        .any(|field| field_error(&session.page.document, field).is_some());
    assert!(marked);
    Ok(())
}

#[test]
fn header_search_merges_query() -> Result<()> {
    let mut session = session_at("/stores/corner-market/products/?categories=Home");
    let root = session.page.document.root();
    build_header_search(&mut session.page.document, root);

    assert_eq!(session.search("   ")?, None);
    let target = session
        .search("ceramic mug")?
        .ok_or_else(|| anyhow!("search did not navigate"))?;
    let params = parse_query_params(&target);
    assert_eq!(params.get("query").map(String::as_str), Some("ceramic mug"));
    assert_eq!(params.get("categories").map(String::as_str), Some("Home"));
    Ok(())
}

#[test]
fn disabled_header_search_hides_its_form() {
    let mut session = session_at("/dashboard/");
    let root = session.page.document.root();
    let search = build_header_search(&mut session.page.document, root);
    disable_header_search(&mut session.page.document, search.input);
    assert!(session.page.document.is_disabled(search.input));
    assert!(session.page.document.has_class(search.form, "remove"));
}

#[test]
fn sidebar_toggles() {
    let mut session = session_at("/dashboard/");
    let root = session.page.document.root();
    let sidebar = build_sidebar(&mut session.page.document, root);
    session.add_card(sidebar.card_spec());

    session.click(sidebar.toggle);
    assert!(session.page.document.has_class(sidebar.sidebar, SHOW_SIDEBAR));
    session.click(sidebar.toggle);
    assert!(!session.page.document.has_class(sidebar.sidebar, SHOW_SIDEBAR));
}

#[test]
fn store_options_are_exclusive_and_auto_hide() -> Result<()> {
    let mut session = session_at("/stores/");
    let root = session.page.document.root();
    let stores = build_store_cards(&mut session.page.document, root, &["downtown", "uptown"]);
    let auto_hide = session.page.settings.options_auto_hide;
    for store in &stores {
        session.add_card(store.card_spec(auto_hide));
    }
    let (downtown, uptown) = (&stores[0], &stores[1]);

    session.click(downtown.toggle);
    assert!(session.page.document.has_class(downtown.options, SHOW_BLOCK));

    session.advance(Duration::from_secs(2))?;
    session.click(uptown.toggle);
    assert!(!session.page.document.has_class(downtown.options, SHOW_BLOCK));
    assert!(session.page.document.has_class(uptown.options, SHOW_BLOCK));

    // The first card's pending hide must not close the second.
    session.advance(Duration::from_secs(1))?;
    assert!(session.page.document.has_class(uptown.options, SHOW_BLOCK));
    session.advance(Duration::from_secs(2))?;
    assert!(!session.page.document.has_class(uptown.options, SHOW_BLOCK));
    Ok(())
}

#[test]
fn product_extras_stay_open_on_outside_clicks() {
    let mut session = session_at("/stores/downtown/products/");
    let root = session.page.document.root();
    let products = build_product_cards(&mut session.page.document, root, &["Mug", "Tote"]);
    for product in &products {
        session.add_card(product.card_spec());
    }

    session.click(products[0].toggle);
    session.click(root);
    assert!(session.page.document.has_class(products[0].extras, SHOW_FLEX));

    session.click(products[1].toggle);
    assert!(!session.page.document.has_class(products[0].extras, SHOW_FLEX));
    assert!(session.page.document.has_class(products[1].extras, SHOW_FLEX));

    session.click(products[1].toggle);
    assert!(!session.page.document.has_class(products[1].extras, SHOW_FLEX));
}

#[test]
fn stat_options_close_from_the_close_control() -> Result<()> {
    let mut session = session_at("/dashboard/");
    let root = session.page.document.root();
    let stat = build_stat_card(
        &mut session.page.document,
        root,
        FormKind::RevenueStat,
        &FilterChoices::default(),
    );
    let spec = stat.card_spec().ok_or_else(|| anyhow!("advanced stats have options"))?;
    let options = spec.container;
    session.add_card(spec);
    let toggle = stat.toggle.ok_or_else(|| anyhow!("toggle"))?;
    let close = stat.close.ok_or_else(|| anyhow!("close"))?;

    session.click(toggle);
    assert!(session.page.document.has_class(options, SHOW_FLEX));
    let from = stat.form.field("from_time").ok_or_else(|| anyhow!("from_time"))?;
    session.click(from);
    assert!(session.page.document.has_class(options, SHOW_FLEX));
    session.click(close);
    assert!(!session.page.document.has_class(options, SHOW_FLEX));
    Ok(())
}
