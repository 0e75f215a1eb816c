// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use tally_app::ElementId;

use crate::StructureError;
use crate::document::Document;

pub const FORM_FIELD_CLASS: &str = "form-field";
pub const FORM_INPUT_CLASS: &str = "form-input";
pub const FIELD_MESSAGE_CLASS: &str = "field-message";
pub const INVALID_FIELD_CLASS: &str = "invalid-field";

/// Shows `message` under `field` until the user next edits it. A second call before that
/// overwrites the first message.
pub fn show_field_error(
    doc: &mut Document,
    field: ElementId,
    message: &str,
) -> Result<(), StructureError> {
    let slot = message_slot(doc, field)?;
    doc.set_text(slot, message);
    doc.add_class(field, INVALID_FIELD_CLASS);
    doc.register_error_clear(field, slot);
    Ok(())
}

/// The message currently shown for `field`, if it is marked invalid.
pub fn field_error(doc: &Document, field: ElementId) -> Option<&str> {
    if !doc.has_class(field, INVALID_FIELD_CLASS) {
        return None;
    }
    let slot = message_slot(doc, field).ok()?;
    let text = doc.text(slot);
    (!text.is_empty()).then_some(text)
}

pub fn clear_field_error(doc: &mut Document, field: ElementId) {
    doc.forget_error_clear(field);
    doc.remove_class(field, INVALID_FIELD_CLASS);
    if let Ok(slot) = message_slot(doc, field) {
        doc.set_text(slot, "");
    }
}

fn message_slot(doc: &Document, field: ElementId) -> Result<ElementId, StructureError> {
    let element = doc
        .get(field)
        .ok_or(StructureError::MissingElement(field))?;
    if !element.has_class(FORM_INPUT_CLASS) {
        return Err(StructureError::MissingInputMarker(field));
    }
    let container = element
        .parent()
        .ok_or(StructureError::MissingMessageSlot(field))?;
    doc.find_by_class(container, FIELD_MESSAGE_CLASS)
        .ok_or(StructureError::MissingMessageSlot(field))
}
