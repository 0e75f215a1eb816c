// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use tally_app::ElementId;

use crate::StructureError;
use crate::document::Document;

/// A submit control whose idle label is captured once, so busy/idle cycles never drift it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusyButton {
    element: ElementId,
    idle_label: String,
    busy_label: String,
}

impl BusyButton {
    pub fn attach(
        doc: &Document,
        element: ElementId,
        busy_label: &str,
    ) -> Result<Self, StructureError> {
        let button = doc
            .get(element)
            .ok_or(StructureError::MissingElement(element))?;
        Ok(Self {
            element,
            idle_label: button.text.clone(),
            busy_label: busy_label.to_owned(),
        })
    }

    pub const fn element(&self) -> ElementId {
        self.element
    }

    pub fn idle_label(&self) -> &str {
        &self.idle_label
    }

    pub fn mark_busy(&self, doc: &mut Document) {
        self.apply(doc, true, &self.busy_label);
    }

    pub fn mark_idle(&self, doc: &mut Document) {
        self.apply(doc, false, &self.idle_label);
    }

    /// Disabled, but showing the idle label.
    pub fn mark_done(&self, doc: &mut Document) {
        self.apply(doc, true, &self.idle_label);
    }

    fn apply(&self, doc: &mut Document, disabled: bool, label: &str) {
        doc.set_disabled(self.element, disabled);
        doc.set_text(self.element, label);
    }
}

#[cfg(test)]
mod tests {
    use super::BusyButton;
    use crate::document::{Document, Element};

    #[test]
    fn busy_idle_cycles_restore_original_label() -> anyhow::Result<()> {
        let mut doc = Document::new();
        let element = doc.append(doc.root(), Element::new("button").with_text("Sign In"));
        let button = BusyButton::attach(&doc, element, "Signing in...")?;

        for _ in 0..3 {
            button.mark_busy(&mut doc);
            assert!(doc.is_disabled(element));
            assert_eq!(doc.text(element), "Signing in...");
            button.mark_busy(&mut doc);
            button.mark_idle(&mut doc);
            assert!(!doc.is_disabled(element));
            assert_eq!(doc.text(element), "Sign In");
        }
        Ok(())
    }

    #[test]
    fn done_stays_disabled_with_idle_label() -> anyhow::Result<()> {
        let mut doc = Document::new();
        let element = doc.append(doc.root(), Element::new("button").with_text("Save changes"));
        let button = BusyButton::attach(&doc, element, "Saving changes...")?;

        button.mark_busy(&mut doc);
        button.mark_done(&mut doc);
        assert!(doc.is_disabled(element));
        assert_eq!(doc.text(element), "Save changes");
        Ok(())
    }
}
