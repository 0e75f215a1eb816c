// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeMap;
use tally_app::{ElementId, FormPayload, PayloadValue};

use crate::document::{Document, Element};

/// `data-name` on a fieldset makes it one payload entry.
pub const FIELDSET_NAME_ATTR: &str = "name";
/// `data-collect="value"` makes a checkbox fieldset collect values instead of names.
pub const FIELDSET_COLLECT_ATTR: &str = "collect";

/// Builds the payload for one submission of `form`.
///
/// Named fieldsets become a single entry: a list of checked checkboxes, or a key-per-input
/// group. Other named controls are read individually. Disabled controls and unchecked
/// checkboxes contribute nothing.
pub fn extract_payload(doc: &Document, form: ElementId) -> FormPayload {
    let mut payload = FormPayload::new();
    let fieldsets = doc.find_all(form, |element| {
        element.tag == "fieldset" && element.data(FIELDSET_NAME_ATTR).is_some()
    });

    for &fieldset in &fieldsets {
        let Some(element) = doc.get(fieldset) else {
            continue;
        };
        let Some(key) = element.data(FIELDSET_NAME_ATTR) else {
            continue;
        };
        payload.insert(key, fieldset_value(doc, fieldset, element));
    }

    for id in doc.descendants(form) {
        let Some(element) = doc.get(id) else {
            continue;
        };
        if !element.is_control() || element.disabled {
            continue;
        }
        let Some(name) = element.name.as_deref() else {
            continue;
        };
        if fieldsets.iter().any(|fieldset| doc.contains(*fieldset, id)) {
            continue;
        }
        if let Some(value) = control_value(element) {
            payload.insert(name, value);
        }
    }
    payload
}

/// The current value of the first control named `name` in `form`, or empty.
pub fn field_value(doc: &Document, form: ElementId, name: &str) -> String {
    doc.find(form, |element| element.is_control() && element.is_named(name))
        .map(|id| doc.value(id).to_owned())
        .unwrap_or_default()
}

fn fieldset_value(doc: &Document, fieldset: ElementId, element: &Element) -> PayloadValue {
    let inputs = doc.find_all(fieldset, |element| element.tag == "input");
    let is_checkbox_list = inputs
        .first()
        .and_then(|id| doc.get(*id))
        .is_some_and(|input| input.is_type("checkbox"));

    if is_checkbox_list {
        let collect_values = element.data(FIELDSET_COLLECT_ATTR) == Some("value");
        let checked = inputs
            .iter()
            .filter_map(|id| doc.get(*id))
            .filter(|input| !input.disabled)
            .filter(|input| input.checked)
            .filter_map(|input| {
                if collect_values {
                    Some(input.value.clone())
                } else {
                    input.name.clone()
                }
            })
            .collect::<Vec<_>>();
        return PayloadValue::List(checked);
    }

    let group = inputs
        .iter()
        .filter_map(|id| doc.get(*id))
        .filter(|input| !input.disabled)
        .filter_map(|input| {
            let name = input.name.clone()?;
            Some((name, input.value.clone()))
        })
        .collect::<BTreeMap<_, _>>();
    PayloadValue::Group(group)
}

fn control_value(element: &Element) -> Option<String> {
    if element.is_type("checkbox") || element.is_type("radio") {
        if !element.checked {
            return None;
        }
        if element.value.is_empty() {
            return Some("on".to_owned());
        }
    }
    Some(element.value.clone())
}

#[cfg(test)]
mod tests {
    use super::{extract_payload, field_value};
    use crate::document::{Document, Element};
    use std::collections::BTreeMap;
    use tally_app::PayloadValue;

    #[test]
    fn plain_controls_by_name() {
        let mut doc = Document::new();
        let form = doc.append(doc.root(), Element::new("form"));
        doc.append(form, Element::new("input").with_name("email").with_value("a@b.com"));
        doc.append(form, Element::new("textarea").with_name("notes").with_value("hi"));
        doc.append(
            form,
            Element::new("input")
                .with_name("ignored")
                .with_value("x")
                .with_disabled(true),
        );
        doc.append(form, Element::new("input").with_value("no name"));
        doc.append(form, Element::new("button").with_name("submit").with_text("Go"));

        let payload = extract_payload(&doc, form);
        assert_eq!(payload.len(), 2);
        assert_eq!(payload.text("email"), Some("a@b.com"));
        assert_eq!(payload.text("notes"), Some("hi"));
    }

    #[test]
    fn loose_checkboxes_only_when_checked() {
        let mut doc = Document::new();
        let form = doc.append(doc.root(), Element::new("form"));
        doc.append(
            form,
            Element::new("input")
                .with_type("checkbox")
                .with_name("agree")
                .with_checked(true),
        );
        doc.append(
            form,
            Element::new("input").with_type("checkbox").with_name("spam"),
        );

        let payload = extract_payload(&doc, form);
        assert_eq!(payload.text("agree"), Some("on"));
        assert!(payload.get("spam").is_none());
    }

    #[test]
    fn checkbox_fieldsets_collect_names_or_values() {
        let mut doc = Document::new();
        let form = doc.append(doc.root(), Element::new("form"));
        let stores = doc.append(
            form,
            Element::new("fieldset").with_data("name", "store_pks"),
        );
        for (pk, checked) in [("3", true), ("4", false), ("7", true)] {
            doc.append(
                stores,
                Element::new("input")
                    .with_type("checkbox")
                    .with_name(pk)
                    .with_checked(checked),
            );
        }
        let categories = doc.append(
            form,
            Element::new("fieldset")
                .with_data("name", "categories")
                .with_data("collect", "value"),
        );
        doc.append(
            categories,
            Element::new("input")
                .with_type("checkbox")
                .with_name("cat-1")
                .with_value("food")
                .with_checked(true),
        );

        let payload = extract_payload(&doc, form);
        assert_eq!(
            payload.get("store_pks"),
            Some(&PayloadValue::List(vec!["3".to_owned(), "7".to_owned()]))
        );
        assert_eq!(
            payload.get("categories"),
            Some(&PayloadValue::List(vec!["food".to_owned()]))
        );
        assert!(payload.get("3").is_none());
    }

    #[test]
    fn disabled_checkboxes_are_left_out_of_lists() {
        let mut doc = Document::new();
        let form = doc.append(doc.root(), Element::new("form"));
        let stores = doc.append(
            form,
            Element::new("fieldset").with_data("name", "store_pks"),
        );
        doc.append(
            stores,
            Element::new("input")
                .with_type("checkbox")
                .with_name("3")
                .with_checked(true),
        );
        doc.append(
            stores,
            Element::new("input")
                .with_type("checkbox")
                .with_name("4")
                .with_checked(true)
                .with_disabled(true),
        );

        let payload = extract_payload(&doc, form);
        assert_eq!(
            payload.get("store_pks"),
            Some(&PayloadValue::List(vec!["3".to_owned()]))
        );
    }

    #[test]
    fn other_fieldsets_become_groups_without_disabled_inputs() {
        let mut doc = Document::new();
        let form = doc.append(doc.root(), Element::new("form"));
        let range = doc.append(
            form,
            Element::new("fieldset").with_data("name", "date-range"),
        );
        doc.append(
            range,
            Element::new("input")
                .with_name("from_date")
                .with_value("2024-01-01"),
        );
        doc.append(range, Element::new("input").with_name("to_date"));
        let single = doc.append(form, Element::new("fieldset").with_data("name", "date"));
        doc.append(
            single,
            Element::new("input")
                .with_name("date")
                .with_value("2024-05-05")
                .with_disabled(true),
        );

        let payload = extract_payload(&doc, form);
        let expected = [("from_date", "2024-01-01"), ("to_date", "")]
            .into_iter()
            .map(|(key, value)| (key.to_owned(), value.to_owned()))
            .collect::<BTreeMap<_, _>>();
        assert_eq!(payload.get("date-range"), Some(&PayloadValue::Group(expected)));
        assert_eq!(
            payload.get("date"),
            Some(&PayloadValue::Group(BTreeMap::new()))
        );
    }

    #[test]
    fn field_value_reads_first_named_control() {
        let mut doc = Document::new();
        let form = doc.append(doc.root(), Element::new("form"));
        doc.append(form, Element::new("input").with_name("email").with_value("x@y.io"));
        assert_eq!(field_value(&doc, form, "email"), "x@y.io");
        assert_eq!(field_value(&doc, form, "missing"), "");
    }
}
