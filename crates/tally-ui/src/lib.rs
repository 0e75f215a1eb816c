// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! The browser side of Tally's forms: a small document model, the submission pipeline
//! that posts forms as JSON, and the notification, field-error and card surfaces that
//! report what the server said.

mod busy;
mod cards;
mod dispatch;
mod document;
mod error;
mod extract;
mod field_error;
mod filters;
mod notify;
mod page;
mod pages;
mod pipeline;
mod session;

pub use busy::BusyButton;
pub use cards::{CardMode, CardRegistry, CardSpec, HideTimer, SHOW_BLOCK, SHOW_FLEX, SHOW_SIDEBAR};
pub use dispatch::{DETAIL_SLOT, HEADLINE_SLOT, STAT_FOR_ATTR, STAT_SLOT_ATTR, dispatch_reply};
pub use document::{Document, Element};
pub use error::StructureError;
pub use extract::{FIELDSET_COLLECT_ATTR, FIELDSET_NAME_ATTR, extract_payload, field_value};
pub use field_error::{
    FIELD_MESSAGE_CLASS, FORM_FIELD_CLASS, FORM_INPUT_CLASS, INVALID_FIELD_CLASS,
    clear_field_error, field_error, show_field_error,
};
pub use filters::{FilterOutcome, apply_filters, disable_header_search, search, seed_filters};
pub use notify::{DEFAULT_NOTIFICATION_TIMEOUT, Notification, NotificationCenter};
pub use page::{Page, PageSettings, Timer};
pub use pages::{
    FILTER_FORM_ID, FilterChoices, FiltersCard, FormPage, HeaderSearch, ProductCard, Sidebar,
    StatCard, StoreCard, build_filters_card, build_form, build_form_with_action,
    build_header_search, build_product_cards, build_sidebar, build_stat_card, build_store_cards,
};
pub use pipeline::{Begin, FormBinding, PendingSubmission, SUBMIT_BUTTON_CLASS};
pub use session::{InternalEvent, Session, SharedTransport};
