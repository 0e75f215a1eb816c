// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Markup the server renders for each page, rebuilt as document trees.

use std::time::Duration;
use tally_app::{ElementId, FieldSpec, FormKind, FormTrigger, ResultView, profile};

use crate::cards::{CardSpec, SHOW_BLOCK, SHOW_FLEX, SHOW_SIDEBAR};
use crate::dispatch::{DETAIL_SLOT, HEADLINE_SLOT, STAT_FOR_ATTR, STAT_SLOT_ATTR};
use crate::document::{Document, Element};
use crate::extract::{FIELDSET_COLLECT_ATTR, FIELDSET_NAME_ATTR};
use crate::field_error::{FIELD_MESSAGE_CLASS, FORM_FIELD_CLASS, FORM_INPUT_CLASS};
use crate::pipeline::SUBMIT_BUTTON_CLASS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPage {
    pub kind: FormKind,
    pub form: ElementId,
    pub fields: Vec<(String, ElementId)>,
    pub button: Option<ElementId>,
}

impl FormPage {
    pub fn field(&self, name: &str) -> Option<ElementId> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, id)| *id)
    }
}

/// Choices offered by the statistics and filters fieldsets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterChoices {
    /// `(name, label)` pairs; the name is what a checked box submits.
    pub stores: Vec<(String, String)>,
    pub categories: Vec<String>,
}

/// Builds the form for `kind` with its profile's default action.
pub fn build_form(doc: &mut Document, parent: ElementId, kind: FormKind) -> FormPage {
    build_form_with_action(doc, parent, kind, None)
}

pub fn build_form_with_action(
    doc: &mut Document,
    parent: ElementId,
    kind: FormKind,
    action: Option<&str>,
) -> FormPage {
    let profile = profile(kind);
    let mut form = Element::new("form").with_id(kind.form_html_id());
    if let Some(action) = action.or(profile.action) {
        form = form.with_action(action);
    }
    let form = doc.append(parent, form);
    let mut page = FormPage {
        kind,
        form,
        fields: Vec::new(),
        button: None,
    };

    for spec in profile.fields {
        let input = form_field(doc, form, spec);
        page.fields.push((spec.name.to_owned(), input));
    }
    if matches!(kind, FormKind::SalesStat | FormKind::RevenueStat) {
        stat_fieldsets(doc, &mut page, &FilterChoices::default());
    }
    if let Some(labels) = profile.button {
        let button = doc.append(
            form,
            Element::new("button")
                .with_class(SUBMIT_BUTTON_CLASS)
                .with_type("submit")
                .with_text(labels.idle),
        );
        page.button = Some(button);
    }
    page
}

fn form_field(doc: &mut Document, parent: ElementId, spec: &FieldSpec) -> ElementId {
    let container = doc.append(parent, Element::new("div").with_class(FORM_FIELD_CLASS));
    doc.append(
        container,
        Element::new("label").with_text(spec.label),
    );
    let input = doc.append(
        container,
        Element::new("input")
            .with_class(FORM_INPUT_CLASS)
            .with_name(spec.name)
            .with_id(spec.name)
            .with_type(spec.input_type),
    );
    doc.append(container, Element::new("p").with_class(FIELD_MESSAGE_CLASS));
    input
}

fn fieldset(doc: &mut Document, parent: ElementId, class: &str, name: &str) -> ElementId {
    doc.append(
        parent,
        Element::new("fieldset")
            .with_class(class)
            .with_data(FIELDSET_NAME_ATTR, name),
    )
}

fn checkbox_list(
    doc: &mut Document,
    fieldset: ElementId,
    choices: &[(String, String)],
    page: &mut FormPage,
) {
    for (name, label) in choices {
        let container = doc.append(fieldset, Element::new("label").with_text(label));
        let input = doc.append(
            container,
            Element::new("input")
                .with_type("checkbox")
                .with_name(name)
                .with_value(name),
        );
        page.fields.push((name.clone(), input));
    }
}

fn category_list(
    doc: &mut Document,
    fieldset: ElementId,
    categories: &[String],
    page: &mut FormPage,
) {
    for (index, category) in categories.iter().enumerate() {
        let container = doc.append(fieldset, Element::new("label").with_text(category));
        let name = format!("category-{index}");
        let input = doc.append(
            container,
            Element::new("input")
                .with_type("checkbox")
                .with_name(&name)
                .with_value(category),
        );
        page.fields.push((name, input));
    }
}

/// Date, time and range fieldsets shared by the statistics and filters forms. The range
/// inputs exclude the single date input.
fn date_fieldsets(
    doc: &mut Document,
    page: &mut FormPage,
    classes: [&str; 3],
    with_time: bool,
) {
    let form = page.form;
    let [date_class, range_class, time_class] = classes;

    let date_set = fieldset(doc, form, date_class, "date-option");
    let date = form_field(doc, date_set, &FieldSpec {
        name: "date",
        input_type: "date",
        label: "Date",
    });
    page.fields.push(("date".to_owned(), date));

    if with_time {
        let time_set = fieldset(doc, form, time_class, "time-range");
        for (name, label) in [("from_time", "From"), ("to_time", "To")] {
            let input = form_field(doc, time_set, &FieldSpec {
                name,
                input_type: "time",
                label,
            });
            page.fields.push((name.to_owned(), input));
        }
    }

    let range_set = fieldset(doc, form, range_class, "date-range");
    for (name, label) in [("from_date", "From"), ("to_date", "To")] {
        let input = form_field(doc, range_set, &FieldSpec {
            name,
            input_type: "date",
            label,
        });
        doc.link_date_range(input, date);
        page.fields.push((name.to_owned(), input));
    }
}

fn stat_fieldsets(doc: &mut Document, page: &mut FormPage, choices: &FilterChoices) {
    let stores = fieldset(doc, page.form, "store-options", "store_pks");
    checkbox_list(doc, stores, &choices.stores, page);
    let categories = fieldset(doc, page.form, "category-options", "categories");
    if let Some(element) = doc.get_mut(categories) {
        element
            .data
            .insert(FIELDSET_COLLECT_ATTR.to_owned(), "value".to_owned());
    }
    category_list(doc, categories, &choices.categories, page);
    date_fieldsets(
        doc,
        page,
        ["date-option", "date-range-option", "time-range-option"],
        true,
    );
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub card: ElementId,
    pub headline: ElementId,
    pub detail: Option<ElementId>,
    /// Opens the options panel; only the advanced statistics have one.
    pub toggle: Option<ElementId>,
    pub options: Option<ElementId>,
    pub close: Option<ElementId>,
    pub form: FormPage,
}

impl StatCard {
    pub fn card_spec(&self) -> Option<CardSpec> {
        let (toggle, options, close) = (self.toggle?, self.options?, self.close?);
        Some(
            CardSpec::new(toggle, options, SHOW_FLEX)
                .with_close(close)
                .in_group("stat-options"),
        )
    }
}

/// A dashboard statistic with its result slots and the form that refreshes it.
pub fn build_stat_card(
    doc: &mut Document,
    parent: ElementId,
    kind: FormKind,
    choices: &FilterChoices,
) -> StatCard {
    let profile = profile(kind);
    let form_id = kind.form_html_id();
    let card = doc.append(parent, Element::new("div").with_class("stat-card"));
    let summary = doc.append(card, Element::new("div").with_class("stat-summary"));
    let headline = doc.append(
        summary,
        Element::new("h1")
            .with_data(STAT_FOR_ATTR, form_id)
            .with_data(STAT_SLOT_ATTR, HEADLINE_SLOT),
    );
    let detail = matches!(profile.success.view, Some(ResultView::Headline { .. })).then(|| {
        doc.append(
            summary,
            Element::new("p")
                .with_class("stat-value-misc")
                .with_data(STAT_FOR_ATTR, form_id)
                .with_data(STAT_SLOT_ATTR, DETAIL_SLOT),
        )
    });

    if profile.trigger == FormTrigger::Change {
        let form = build_form(doc, card, kind);
        return StatCard {
            card,
            headline,
            detail,
            toggle: None,
            options: None,
            close: None,
            form,
        };
    }

    let toggle = doc.append(summary, Element::new("button").with_class("more-options"));
    let options = doc.append(card, Element::new("div").with_class("options-card"));
    let close = doc.append(options, Element::new("span").with_class("close-card"));
    let form = doc.append(
        options,
        Element::new("form")
            .with_id(form_id)
            .with_action(profile.action.unwrap_or_default()),
    );
    let mut page = FormPage {
        kind,
        form,
        fields: Vec::new(),
        button: None,
    };
    stat_fieldsets(doc, &mut page, choices);
    if let Some(labels) = profile.button {
        page.button = Some(doc.append(
            form,
            Element::new("button")
                .with_class(SUBMIT_BUTTON_CLASS)
                .with_type("submit")
                .with_text(labels.idle),
        ));
    }
    StatCard {
        card,
        headline,
        detail,
        toggle: Some(toggle),
        options: Some(options),
        close: Some(close),
        form: page,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiltersCard {
    pub toggle: ElementId,
    pub card: ElementId,
    pub close: ElementId,
    pub form: FormPage,
    pub apply: ElementId,
}

impl FiltersCard {
    pub fn card_spec(&self) -> CardSpec {
        CardSpec::new(self.toggle, self.card, SHOW_FLEX).with_close(self.close)
    }
}

pub const FILTER_FORM_ID: &str = "filter-form";

pub fn build_filters_card(
    doc: &mut Document,
    parent: ElementId,
    choices: &FilterChoices,
) -> FiltersCard {
    let toggle = doc.append(parent, Element::new("button").with_id("filters-toggle"));
    let card = doc.append(parent, Element::new("div").with_class("filters-card"));
    doc.append(card, Element::new("h3").with_class("card-title").with_text("Filters"));
    let close = doc.append(card, Element::new("span").with_class("close-card"));
    let form = doc.append(card, Element::new("form").with_id(FILTER_FORM_ID));
    let mut page = FormPage {
        kind: FormKind::SalesStat,
        form,
        fields: Vec::new(),
        button: None,
    };
    let stores = fieldset(doc, form, "store-filter", "stores");
    checkbox_list(doc, stores, &choices.stores, &mut page);
    let categories = fieldset(doc, form, "category-filter", "categories");
    if let Some(element) = doc.get_mut(categories) {
        element
            .data
            .insert(FIELDSET_COLLECT_ATTR.to_owned(), "value".to_owned());
    }
    category_list(doc, categories, &choices.categories, &mut page);
    date_fieldsets(
        doc,
        &mut page,
        ["date-filter", "date-range-filter", "time-range-filter"],
        false,
    );
    let apply = doc.append(card, Element::new("button").with_class("apply-btn").with_text("Apply"));
    FiltersCard {
        toggle,
        card,
        close,
        form: page,
        apply,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSearch {
    pub form: ElementId,
    pub input: ElementId,
}

pub fn build_header_search(doc: &mut Document, parent: ElementId) -> HeaderSearch {
    let form = doc.append(parent, Element::new("form").with_class("header-search-form"));
    let input = doc.append(
        form,
        Element::new("input")
            .with_id("header-search")
            .with_type("search")
            .with_name("query"),
    );
    HeaderSearch { form, input }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sidebar {
    pub toggle: ElementId,
    pub sidebar: ElementId,
}

impl Sidebar {
    pub fn card_spec(&self) -> CardSpec {
        CardSpec::new(self.toggle, self.sidebar, SHOW_SIDEBAR).toggling()
    }
}

pub fn build_sidebar(doc: &mut Document, parent: ElementId) -> Sidebar {
    let nav = doc.append(parent, Element::new("nav").with_id("nav-menu"));
    let toggle = doc.append(nav, Element::new("button").with_id("menu-toggle"));
    let sidebar = doc.append(parent, Element::new("aside").with_id("sidebar"));
    for label in ["Dashboard", "Stores", "Account"] {
        doc.append(sidebar, Element::new("a").with_text(label));
    }
    Sidebar { toggle, sidebar }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreCard {
    pub slug: String,
    pub toggle: ElementId,
    pub options: ElementId,
    pub form: FormPage,
}

impl StoreCard {
    pub fn card_spec(&self, auto_hide: Duration) -> CardSpec {
        CardSpec::new(self.toggle, self.options, SHOW_BLOCK)
            .in_group("store-options")
            .with_auto_hide(auto_hide)
    }
}

/// One card per store, each with an edit toggle and an update form posting to the store.
pub fn build_store_cards(doc: &mut Document, parent: ElementId, slugs: &[&str]) -> Vec<StoreCard> {
    let wrapper = doc.append(parent, Element::new("div").with_id("stores-wrapper"));
    slugs
        .iter()
        .map(|slug| {
            let card = doc.append(wrapper, Element::new("div").with_class("store-card"));
            doc.append(card, Element::new("h2").with_text(slug));
            let toggle = doc.append(card, Element::new("button").with_class("edit-store-toggle"));
            let options = doc.append(card, Element::new("div").with_class("edit-store-card"));
            let action = format!("/stores/{slug}/update/");
            let form = build_form_with_action(doc, options, FormKind::StoreUpdate, Some(&action));
            StoreCard {
                slug: (*slug).to_owned(),
                toggle,
                options,
                form,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCard {
    pub toggle: ElementId,
    pub extras: ElementId,
}

impl ProductCard {
    pub fn card_spec(&self) -> CardSpec {
        CardSpec::new(self.toggle, self.extras, SHOW_FLEX)
            .toggling()
            .in_group("product-extras")
            .keep_on_outside_click()
    }
}

pub fn build_product_cards(doc: &mut Document, parent: ElementId, names: &[&str]) -> Vec<ProductCard> {
    names
        .iter()
        .map(|name| {
            let card = doc.append(parent, Element::new("div").with_class("product-card"));
            doc.append(card, Element::new("h3").with_text(name));
            let toggle = doc.append(card, Element::new("button").with_class("extras-toggle"));
            let extras = doc.append(card, Element::new("div").with_class("product-extras"));
            ProductCard { toggle, extras }
        })
        .collect()
}
