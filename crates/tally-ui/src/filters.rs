// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use tally_app::{
    ClientCheck, ClientRejection, ElementId, NotificationKind, href_with_query, parse_query_params,
    search_href, snake_key, split_list_param,
};

use crate::StructureError;
use crate::document::Document;
use crate::extract::{FIELDSET_COLLECT_ATTR, FIELDSET_NAME_ATTR, extract_payload, field_value};
use crate::field_error::show_field_error;
use crate::page::Page;

const FILTER_RANGE: ClientCheck = ClientCheck::DateRange {
    from: "from_date",
    to: "to_date",
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOutcome {
    Rejected(ClientRejection),
    Navigated(String),
}

/// Turns the filters form into a query string on the current path and navigates there.
pub fn apply_filters(page: &mut Page, form: ElementId) -> Result<FilterOutcome, StructureError> {
    let checked = {
        let doc = &page.document;
        FILTER_RANGE.run(&|name: &str| field_value(doc, form, name))
    };
    if let Err(rejection) = checked {
        let field = page
            .document
            .find(form, |element| element.is_control() && element.is_named(rejection.field));
        match field {
            Some(field) => show_field_error(&mut page.document, field, rejection.message)?,
            None => {
                page.notify(NotificationKind::Error, rejection.message);
            }
        }
        return Ok(FilterOutcome::Rejected(rejection));
    }

    let pairs = extract_payload(&page.document, form).query_pairs();
    let href = href_with_query(page.location(), &pairs);
    let target = page.navigate(&href)?;
    Ok(FilterOutcome::Navigated(target))
}

/// Pre-fills the filters form from the query string of `href`.
pub fn seed_filters(doc: &mut Document, form: ElementId, href: &str) {
    let params = parse_query_params(href);
    if params.is_empty() {
        return;
    }

    let fieldsets = doc.find_all(form, |element| {
        element.tag == "fieldset" && element.data(FIELDSET_NAME_ATTR).is_some()
    });
    for fieldset in fieldsets {
        let Some(element) = doc.get(fieldset) else {
            continue;
        };
        let Some(key) = element.data(FIELDSET_NAME_ATTR).map(snake_key) else {
            continue;
        };
        let collect_values = element.data(FIELDSET_COLLECT_ATTR) == Some("value");
        let Some(wanted) = params.get(&key).map(|raw| split_list_param(raw)) else {
            continue;
        };
        let checkboxes = doc.find_all(fieldset, |input| input.is_type("checkbox"));
        for checkbox in checkboxes {
            let identity = doc.get(checkbox).and_then(|input| {
                if collect_values {
                    Some(input.value.clone())
                } else {
                    input.name.clone()
                }
            });
            let checked = identity.is_some_and(|identity| wanted.contains(&identity));
            doc.set_checked(checkbox, checked);
        }
    }

    let inputs = doc.find_all(form, |element| {
        element.is_control() && !element.is_type("checkbox") && element.name.is_some()
    });
    for input in inputs {
        let value = doc
            .get(input)
            .and_then(|element| element.name.as_deref())
            .and_then(|name| params.get(&snake_key(name)))
            .cloned();
        if let Some(value) = value {
            doc.input(input, &value);
        }
    }
}

/// Header search: merges `query=<term>` into the current parameters. Blank terms do nothing.
pub fn search(page: &mut Page, term: &str) -> Result<Option<String>, StructureError> {
    let Some(href) = search_href(page.location(), term) else {
        return Ok(None);
    };
    page.navigate(&href).map(Some)
}

pub fn disable_header_search(doc: &mut Document, input: ElementId) {
    doc.set_disabled(input, true);
    if let Some(form) = doc.get(input).and_then(|element| element.parent()) {
        doc.add_class(form, "remove");
    }
}
