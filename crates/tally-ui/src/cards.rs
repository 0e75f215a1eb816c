// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::time::Duration;
use tally_app::{CardId, ElementId};

use crate::document::Document;

pub const SHOW_FLEX: &str = "show-flex";
pub const SHOW_BLOCK: &str = "show-block";
pub const SHOW_SIDEBAR: &str = "show-sidebar";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardMode {
    /// The toggle only opens the card.
    Show,
    /// The toggle flips the card.
    Toggle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSpec {
    pub toggle: ElementId,
    pub container: ElementId,
    pub close: Option<ElementId>,
    pub visible_class: String,
    pub group: Option<String>,
    pub mode: CardMode,
    pub dismiss_on_outside: bool,
    pub auto_hide: Option<Duration>,
}

impl CardSpec {
    pub fn new(toggle: ElementId, container: ElementId, visible_class: &str) -> Self {
        Self {
            toggle,
            container,
            close: None,
            visible_class: visible_class.to_owned(),
            group: None,
            mode: CardMode::Show,
            dismiss_on_outside: true,
            auto_hide: None,
        }
    }

    pub fn with_close(mut self, close: ElementId) -> Self {
        self.close = Some(close);
        self
    }

    pub fn in_group(mut self, group: &str) -> Self {
        self.group = Some(group.to_owned());
        self
    }

    pub fn toggling(mut self) -> Self {
        self.mode = CardMode::Toggle;
        self
    }

    pub fn keep_on_outside_click(mut self) -> Self {
        self.dismiss_on_outside = false;
        self
    }

    pub fn with_auto_hide(mut self, after: Duration) -> Self {
        self.auto_hide = Some(after);
        self
    }
}

/// A pending auto-hide. Applying it is a no-op once the card has been shown or hidden again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HideTimer {
    pub card: CardId,
    pub token: u64,
    pub after: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Intent {
    Open,
    Flip,
    Hide,
    Keep,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CardEntry {
    spec: CardSpec,
    token: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardRegistry {
    cards: Vec<CardEntry>,
}

impl CardRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, spec: CardSpec) -> CardId {
        self.cards.push(CardEntry { spec, token: 0 });
        CardId::new(self.cards.len() - 1)
    }

    pub fn spec(&self, card: CardId) -> Option<&CardSpec> {
        self.cards.get(card.get()).map(|entry| &entry.spec)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn is_visible(&self, doc: &Document, card: CardId) -> bool {
        self.spec(card)
            .is_some_and(|spec| doc.has_class(spec.container, &spec.visible_class))
    }

    /// Routes one document click to every card. Every card's reaction is decided against the
    /// state before the click, then applied, so registration order never matters.
    pub fn click(&mut self, doc: &mut Document, target: ElementId) -> Vec<HideTimer> {
        let intents = self
            .cards
            .iter()
            .map(|entry| intent(doc, &entry.spec, target))
            .collect::<Vec<_>>();
        let opening = self
            .cards
            .iter()
            .zip(&intents)
            .map(|(entry, intent)| match intent {
                Intent::Open => true,
                Intent::Flip => !doc.has_class(entry.spec.container, &entry.spec.visible_class),
                Intent::Hide | Intent::Keep => false,
            })
            .collect::<Vec<_>>();
        let mut hiding = intents
            .iter()
            .zip(&opening)
            .map(|(intent, opening)| matches!(intent, Intent::Hide | Intent::Flip) && !opening)
            .collect::<Vec<_>>();

        for (index, entry) in self.cards.iter().enumerate() {
            let Some(group) = entry.spec.group.as_deref() else {
                continue;
            };
            if !opening[index] {
                continue;
            }
            for (sibling, other) in self.cards.iter().enumerate() {
                if sibling != index && !opening[sibling] && other.spec.group.as_deref() == Some(group)
                {
                    hiding[sibling] = true;
                }
            }
        }

        let mut timers = Vec::new();
        for index in 0..self.cards.len() {
            let card = CardId::new(index);
            if opening[index] {
                timers.extend(self.show(doc, card));
            } else if hiding[index] {
                self.hide(doc, card);
            }
        }
        timers
    }

    pub fn show(&mut self, doc: &mut Document, card: CardId) -> Option<HideTimer> {
        let entry = self.cards.get_mut(card.get())?;
        doc.add_class(entry.spec.container, &entry.spec.visible_class);
        entry.token += 1;
        entry.spec.auto_hide.map(|after| HideTimer {
            card,
            token: entry.token,
            after,
        })
    }

    pub fn hide(&mut self, doc: &mut Document, card: CardId) {
        let Some(entry) = self.cards.get_mut(card.get()) else {
            return;
        };
        if doc.has_class(entry.spec.container, &entry.spec.visible_class) {
            entry.token += 1;
        }
        doc.remove_class(entry.spec.container, &entry.spec.visible_class);
    }

    /// Applies an auto-hide whose delay has elapsed. Stale tokens do nothing.
    pub fn expire_hide(&mut self, doc: &mut Document, timer: HideTimer) -> bool {
        let Some(entry) = self.cards.get(timer.card.get()) else {
            return false;
        };
        if entry.token != timer.token {
            return false;
        }
        self.hide(doc, timer.card);
        true
    }

    /// The card whose container holds `element`, if any.
    pub fn card_containing(&self, doc: &Document, element: ElementId) -> Option<CardId> {
        self.cards
            .iter()
            .position(|entry| doc.contains(entry.spec.container, element))
            .map(CardId::new)
    }
}

fn intent(doc: &Document, spec: &CardSpec, target: ElementId) -> Intent {
    if let Some(close) = spec.close
        && doc.contains(close, target)
    {
        return Intent::Hide;
    }
    if doc.contains(spec.toggle, target) {
        return match spec.mode {
            CardMode::Show => Intent::Open,
            CardMode::Toggle => Intent::Flip,
        };
    }
    if doc.contains(spec.container, target) {
        return Intent::Keep;
    }
    if spec.dismiss_on_outside {
        Intent::Hide
    } else {
        Intent::Keep
    }
}
