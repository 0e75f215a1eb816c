// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};
use tally_app::{CardId, ElementId, FormId, FormKind, FormTrigger, HttpReply, RequestId, Transport};

use crate::StructureError;
use crate::cards::{CardRegistry, CardSpec};
use crate::filters::{FilterOutcome, apply_filters, search};
use crate::page::{Page, Timer};
use crate::pipeline::{Begin, FormBinding};

pub type SharedTransport = Arc<dyn Transport + Send + Sync>;

#[derive(Debug)]
pub enum InternalEvent {
    SubmissionSettled {
        form: FormId,
        request: RequestId,
        result: Result<HttpReply>,
    },
}

/// A live page: its bound forms and cards, and the channel background submissions report
/// back on. Only the owning thread touches the page.
pub struct Session {
    pub page: Page,
    pub cards: CardRegistry,
    forms: Vec<FormBinding>,
    transport: SharedTransport,
    tx: Sender<InternalEvent>,
    rx: Receiver<InternalEvent>,
    in_flight: usize,
}

impl Session {
    pub fn new(page: Page, transport: SharedTransport) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            page,
            cards: CardRegistry::new(),
            forms: Vec::new(),
            transport,
            tx,
            rx,
            in_flight: 0,
        }
    }

    pub fn bind_form(&mut self, form: ElementId, kind: FormKind) -> Result<FormId, StructureError> {
        let binding = FormBinding::attach(&self.page.document, form, kind)?;
        self.forms.push(binding);
        Ok(FormId::new(self.forms.len() - 1))
    }

    pub fn binding(&self, id: FormId) -> Option<&FormBinding> {
        self.forms.get(id.get())
    }

    /// The bound form nearest above `element`.
    pub fn form_for(&self, element: ElementId) -> Option<FormId> {
        let form = self
            .page
            .document
            .closest(element, |candidate| candidate.tag == "form")?;
        self.forms
            .iter()
            .position(|binding| binding.form() == form)
            .map(FormId::new)
    }

    pub fn add_card(&mut self, spec: CardSpec) -> CardId {
        self.cards.register(spec)
    }

    /// Submits and waits for the reply on this thread.
    pub fn submit(&mut self, id: FormId) -> Result<Begin, StructureError> {
        let binding = self
            .forms
            .get_mut(id.get())
            .ok_or(StructureError::UnknownForm(id))?;
        binding.submit(&mut self.page, self.transport.as_ref())
    }

    /// Submits with the request on a worker thread. The reply is applied by a later
    /// [`Session::pump`] or [`Session::wait`].
    pub fn spawn_submit(&mut self, id: FormId) -> Result<Begin, StructureError> {
        let binding = self
            .forms
            .get_mut(id.get())
            .ok_or(StructureError::UnknownForm(id))?;
        let begin = binding.begin(&mut self.page)?;
        if let Begin::Dispatched(pending) = &begin {
            let transport = Arc::clone(&self.transport);
            let sender = self.tx.clone();
            let request = pending.request;
            let post = pending.post.clone();
            self.in_flight += 1;
            thread::spawn(move || {
                let result = transport.post_json(&post);
                let _ = sender.send(InternalEvent::SubmissionSettled {
                    form: id,
                    request,
                    result,
                });
            });
        }
        Ok(begin)
    }

    pub const fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Applies every reply that has already arrived. Returns how many were handled; the
    /// first structural error is returned after all of them ran.
    pub fn pump(&mut self) -> Result<usize, StructureError> {
        let mut handled = 0;
        let mut first_error = None;
        while let Ok(event) = self.rx.try_recv() {
            handled += 1;
            if let Err(error) = self.process_internal_event(event) {
                first_error.get_or_insert(error);
            }
        }
        match first_error {
            Some(error) => Err(error),
            None => Ok(handled),
        }
    }

    /// Blocks until every background submission has settled or `timeout` passes.
    pub fn wait(&mut self, timeout: Duration) -> Result<usize, StructureError> {
        let deadline = Instant::now() + timeout;
        let mut handled = 0;
        let mut first_error = None;
        while self.in_flight > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(event) => {
                    handled += 1;
                    if let Err(error) = self.process_internal_event(event) {
                        first_error.get_or_insert(error);
                    }
                }
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => break,
            }
        }
        match first_error {
            Some(error) => Err(error),
            None => Ok(handled),
        }
    }

    fn process_internal_event(&mut self, event: InternalEvent) -> Result<(), StructureError> {
        match event {
            InternalEvent::SubmissionSettled {
                form,
                request,
                result,
            } => {
                self.in_flight = self.in_flight.saturating_sub(1);
                let binding = self
                    .forms
                    .get_mut(form.get())
                    .ok_or(StructureError::UnknownForm(form))?;
                binding.complete(&mut self.page, request, result)
            }
        }
    }

    /// Moves the page clock and runs the timers that came due.
    pub fn advance(&mut self, by: Duration) -> Result<(), StructureError> {
        for timer in self.page.advance_clock(by) {
            match timer {
                Timer::Navigate(target) => {
                    self.page.navigate(&target)?;
                }
                Timer::Reload => self.page.reload(),
                Timer::HideCard(hide) => {
                    self.cards.expire_hide(&mut self.page.document, hide);
                }
            }
        }
        Ok(())
    }

    pub fn click(&mut self, target: ElementId) {
        for hide in self.cards.click(&mut self.page.document, target) {
            self.page.schedule(hide.after, Timer::HideCard(hide));
        }
    }

    /// A keystroke into `element`. Editing a saved form re-arms its submit control.
    pub fn input(&mut self, element: ElementId, value: &str) {
        self.page.document.input(element, value);
        self.rearm_form_of(element);
    }

    /// A committed change. Forms that submit on change are submitted in the background.
    pub fn change(&mut self, element: ElementId) -> Result<Option<Begin>, StructureError> {
        self.rearm_form_of(element);
        let Some(id) = self.form_for(element) else {
            return Ok(None);
        };
        let submits_on_change = self
            .binding(id)
            .is_some_and(|binding| binding.profile().trigger == FormTrigger::Change);
        if !submits_on_change {
            return Ok(None);
        }
        self.spawn_submit(id).map(Some)
    }

    pub fn set_checked(
        &mut self,
        element: ElementId,
        checked: bool,
    ) -> Result<Option<Begin>, StructureError> {
        self.page.document.set_checked(element, checked);
        self.change(element)
    }

    /// Applies the filters form inside `card` and closes the card on navigation.
    pub fn apply_filters(
        &mut self,
        card: CardId,
        form: ElementId,
    ) -> Result<FilterOutcome, StructureError> {
        let outcome = apply_filters(&mut self.page, form)?;
        if matches!(outcome, FilterOutcome::Navigated(_)) {
            self.cards.hide(&mut self.page.document, card);
        }
        Ok(outcome)
    }

    pub fn search(&mut self, term: &str) -> Result<Option<String>, StructureError> {
        search(&mut self.page, term)
    }

    fn rearm_form_of(&mut self, element: ElementId) {
        if let Some(id) = self.form_for(element)
            && let Some(binding) = self.forms.get_mut(id.get())
        {
            binding.rearm(&mut self.page);
        }
    }
}
