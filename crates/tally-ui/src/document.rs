// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::{BTreeMap, BTreeSet};
use tally_app::ElementId;

use crate::field_error::INVALID_FIELD_CLASS;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    pub tag: String,
    pub name: Option<String>,
    pub html_id: Option<String>,
    pub classes: BTreeSet<String>,
    pub data: BTreeMap<String, String>,
    pub input_type: Option<String>,
    pub value: String,
    pub text: String,
    pub checked: bool,
    pub disabled: bool,
    pub action: Option<String>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_owned(),
            ..Self::default()
        }
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.insert(class.to_owned());
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_owned());
        self
    }

    pub fn with_id(mut self, html_id: &str) -> Self {
        self.html_id = Some(html_id.to_owned());
        self
    }

    pub fn with_type(mut self, input_type: &str) -> Self {
        self.input_type = Some(input_type.to_owned());
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = value.to_owned();
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_owned();
        self
    }

    pub fn with_data(mut self, key: &str, value: &str) -> Self {
        self.data.insert(key.to_owned(), value.to_owned());
        self
    }

    pub fn with_action(mut self, action: &str) -> Self {
        self.action = Some(action.to_owned());
        self
    }

    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn data(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }

    pub fn is_type(&self, input_type: &str) -> bool {
        self.input_type.as_deref() == Some(input_type)
    }

    /// Form controls that carry a submitted value.
    pub fn is_control(&self) -> bool {
        matches!(self.tag.as_str(), "input" | "select" | "textarea")
    }

    pub const fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }
}

/// In-memory page tree. Elements are never removed, so handles stay valid for the life of
/// the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    elements: Vec<Element>,
    cookie: String,
    /// Field to message slot; consumed by the field's next input event.
    pending_error_clears: BTreeMap<ElementId, ElementId>,
    /// Range input to the single-date input it excludes.
    range_links: BTreeMap<ElementId, ElementId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            elements: vec![Element::new("body")],
            cookie: String::new(),
            pending_error_clears: BTreeMap::new(),
            range_links: BTreeMap::new(),
        }
    }

    pub const fn root(&self) -> ElementId {
        ElementId::new(0)
    }

    pub fn append(&mut self, parent: ElementId, mut element: Element) -> ElementId {
        let id = ElementId::new(self.elements.len());
        let parent = if parent.get() < self.elements.len() {
            parent
        } else {
            self.root()
        };
        element.parent = Some(parent);
        element.children.clear();
        self.elements.push(element);
        self.elements[parent.get()].children.push(id);
        id
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.get())
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id.get())
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.len() <= 1
    }

    pub fn cookie(&self) -> &str {
        &self.cookie
    }

    pub fn set_cookie(&mut self, cookie: &str) {
        self.cookie = cookie.to_owned();
    }

    /// True when `node` is `ancestor` or sits anywhere below it.
    pub fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.get(current).and_then(Element::parent);
        }
        false
    }

    /// Every element below `scope` in document order, `scope` itself excluded.
    pub fn descendants(&self, scope: ElementId) -> Vec<ElementId> {
        let mut found = Vec::new();
        let mut stack = match self.get(scope) {
            Some(element) => element.children.iter().rev().copied().collect::<Vec<_>>(),
            None => return found,
        };
        while let Some(id) = stack.pop() {
            found.push(id);
            if let Some(element) = self.get(id) {
                stack.extend(element.children.iter().rev().copied());
            }
        }
        found
    }

    pub fn find(&self, scope: ElementId, predicate: impl Fn(&Element) -> bool) -> Option<ElementId> {
        self.descendants(scope)
            .into_iter()
            .find(|id| self.get(*id).is_some_and(&predicate))
    }

    pub fn find_all(&self, scope: ElementId, predicate: impl Fn(&Element) -> bool) -> Vec<ElementId> {
        self.descendants(scope)
            .into_iter()
            .filter(|id| self.get(*id).is_some_and(&predicate))
            .collect()
    }

    pub fn find_by_class(&self, scope: ElementId, class: &str) -> Option<ElementId> {
        self.find(scope, |element| element.has_class(class))
    }

    pub fn find_all_by_class(&self, scope: ElementId, class: &str) -> Vec<ElementId> {
        self.find_all(scope, |element| element.has_class(class))
    }

    pub fn find_by_name(&self, scope: ElementId, name: &str) -> Option<ElementId> {
        self.find(scope, |element| element.is_named(name))
    }

    pub fn find_by_tag(&self, scope: ElementId, tag: &str) -> Option<ElementId> {
        self.find(scope, |element| element.tag == tag)
    }

    pub fn find_by_html_id(&self, html_id: &str) -> Option<ElementId> {
        self.find(self.root(), |element| element.html_id.as_deref() == Some(html_id))
    }

    /// The nearest element at or above `node` matching `predicate`.
    pub fn closest(&self, node: ElementId, predicate: impl Fn(&Element) -> bool) -> Option<ElementId> {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            let element = self.get(current)?;
            if predicate(element) {
                return Some(current);
            }
            cursor = element.parent;
        }
        None
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.get(id).is_some_and(|element| element.has_class(class))
    }

    pub fn add_class(&mut self, id: ElementId, class: &str) {
        if let Some(element) = self.get_mut(id) {
            element.classes.insert(class.to_owned());
        }
    }

    pub fn remove_class(&mut self, id: ElementId, class: &str) {
        if let Some(element) = self.get_mut(id) {
            element.classes.remove(class);
        }
    }

    pub fn toggle_class(&mut self, id: ElementId, class: &str) -> bool {
        if self.has_class(id, class) {
            self.remove_class(id, class);
            false
        } else {
            self.add_class(id, class);
            true
        }
    }

    pub fn text(&self, id: ElementId) -> &str {
        self.get(id).map_or("", |element| element.text.as_str())
    }

    pub fn set_text(&mut self, id: ElementId, text: &str) {
        if let Some(element) = self.get_mut(id) {
            element.text = text.to_owned();
        }
    }

    pub fn value(&self, id: ElementId) -> &str {
        self.get(id).map_or("", |element| element.value.as_str())
    }

    pub fn set_disabled(&mut self, id: ElementId, disabled: bool) {
        if let Some(element) = self.get_mut(id) {
            element.disabled = disabled;
        }
    }

    pub fn is_disabled(&self, id: ElementId) -> bool {
        self.get(id).is_some_and(|element| element.disabled)
    }

    pub fn set_checked(&mut self, id: ElementId, checked: bool) {
        if let Some(element) = self.get_mut(id) {
            element.checked = checked;
        }
    }

    pub(crate) fn register_error_clear(&mut self, field: ElementId, slot: ElementId) {
        self.pending_error_clears.insert(field, slot);
    }

    pub(crate) fn forget_error_clear(&mut self, field: ElementId) -> Option<ElementId> {
        self.pending_error_clears.remove(&field)
    }

    /// Typing into `range_input` clears and disables `single_input`.
    pub fn link_date_range(&mut self, range_input: ElementId, single_input: ElementId) {
        self.range_links.insert(range_input, single_input);
    }

    /// A user edit: sets the value, then runs the element's input reactions.
    pub fn input(&mut self, id: ElementId, value: &str) {
        let Some(element) = self.get_mut(id) else {
            return;
        };
        element.value = value.to_owned();

        if let Some(slot) = self.pending_error_clears.remove(&id) {
            self.remove_class(id, INVALID_FIELD_CLASS);
            self.set_text(slot, "");
        }

        if let Some(single) = self.range_links.get(&id).copied() {
            if value.is_empty() {
                self.set_disabled(single, false);
            } else if let Some(single) = self.get_mut(single) {
                single.value.clear();
                single.disabled = true;
            }
        }
    }
}
