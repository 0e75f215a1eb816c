// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use tally_app::{
    ClientRejection, ElementId, FormKind, FormProfile, HttpReply, IgnoreReason, NotificationKind,
    PostRequest, RequestId, SettleOutcome, SubmissionCommand, SubmissionEvent, SubmissionPhase,
    SubmissionState, Transport, profile, read_cookie,
};

use crate::StructureError;
use crate::busy::BusyButton;
use crate::dispatch::dispatch_reply;
use crate::document::Document;
use crate::extract::{extract_payload, field_value};
use crate::field_error::show_field_error;
use crate::page::Page;

pub const SUBMIT_BUTTON_CLASS: &str = "submit-btn";

/// What a submit attempt turned into.
#[derive(Debug, Clone, PartialEq)]
pub enum Begin {
    Ignored(IgnoreReason),
    Rejected(ClientRejection),
    Dispatched(PendingSubmission),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingSubmission {
    pub request: RequestId,
    pub post: PostRequest,
}

/// One form on the page wired to its profile, submit control and submission state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormBinding {
    profile: FormProfile,
    form: ElementId,
    button: Option<BusyButton>,
    state: SubmissionState,
}

impl FormBinding {
    pub fn attach(doc: &Document, form: ElementId, kind: FormKind) -> Result<Self, StructureError> {
        doc.get(form).ok_or(StructureError::MissingElement(form))?;
        let profile = profile(kind);
        let button = match profile.button {
            Some(labels) => {
                let element = doc.find_by_class(form, SUBMIT_BUTTON_CLASS).ok_or_else(|| {
                    StructureError::NoMatch(format!(
                        "#{} .{SUBMIT_BUTTON_CLASS}",
                        kind.form_html_id()
                    ))
                })?;
                Some(BusyButton::attach(doc, element, labels.busy)?)
            }
            None => None,
        };
        Ok(Self {
            profile,
            form,
            button,
            state: SubmissionState::default(),
        })
    }

    pub const fn kind(&self) -> FormKind {
        self.profile.kind
    }

    pub const fn profile(&self) -> &FormProfile {
        &self.profile
    }

    pub const fn form(&self) -> ElementId {
        self.form
    }

    pub const fn button(&self) -> Option<&BusyButton> {
        self.button.as_ref()
    }

    pub const fn phase(&self) -> SubmissionPhase {
        self.state.phase
    }

    pub const fn in_flight(&self) -> Option<RequestId> {
        self.state.in_flight
    }

    /// Validates, collects the payload and marks the control busy. Nothing is sent here; a
    /// `Dispatched` result carries the request for the caller to post.
    pub fn begin(&mut self, page: &mut Page) -> Result<Begin, StructureError> {
        let kind = self.kind().as_str();
        let events = self.state.dispatch(SubmissionCommand::Begin);
        if let Some(SubmissionEvent::Ignored(reason)) = events.first() {
            tracing::warn!(form = kind, ?reason, "submit ignored");
            return Ok(Begin::Ignored(*reason));
        }

        let form = self.form;
        let checked = {
            let doc = &page.document;
            let value_of = |name: &str| field_value(doc, form, name);
            self.profile.validate(&value_of)
        };
        if let Err(rejection) = checked {
            self.state.dispatch(SubmissionCommand::ValidationFailed);
            tracing::debug!(form = kind, field = rejection.field, "rejected before sending");
            show_rejection(page, form, rejection)?;
            return Ok(Begin::Rejected(rejection));
        }

        let url = match self.target_url(page) {
            Ok(url) => url,
            Err(error) => {
                self.state.dispatch(SubmissionCommand::ValidationFailed);
                return Err(error);
            }
        };

        let mut payload = extract_payload(&page.document, form);
        if self.profile.reshape_groups {
            payload = payload.cleaned();
        }
        if self.profile.extras.timezone {
            payload.insert("timezone", page.timezone());
        }
        if let Some(stat_type) = self.profile.extras.stat_type {
            payload.insert("stat_type", stat_type);
        }

        let events = self.state.dispatch(SubmissionCommand::ValidationPassed);
        let Some(request) = events.iter().find_map(|event| match event {
            SubmissionEvent::RequestIssued(request) => Some(*request),
            _ => None,
        }) else {
            return Ok(Begin::Ignored(IgnoreReason::OutOfOrder));
        };

        if let Some(button) = &self.button {
            button.mark_busy(&mut page.document);
        }

        let cookie = page.document.cookie();
        let post = PostRequest {
            url,
            csrf_token: read_cookie(cookie, &page.settings.csrf_cookie),
            cookie: (!cookie.is_empty()).then(|| cookie.to_owned()),
            body: payload.to_json(),
        };
        tracing::debug!(form = kind, request = request.get(), url = %post.url, "submission dispatched");
        Ok(Begin::Dispatched(PendingSubmission { request, post }))
    }

    /// Applies the settled request. Replies for a request that is no longer in flight are
    /// dropped. The control is restored even when the reply cannot be applied.
    pub fn complete(
        &mut self,
        page: &mut Page,
        request: RequestId,
        result: Result<HttpReply>,
    ) -> Result<(), StructureError> {
        if self.state.in_flight != Some(request) {
            tracing::warn!(
                form = self.kind().as_str(),
                request = request.get(),
                "stale reply dropped"
            );
            return Ok(());
        }

        let applied = match result {
            Ok(reply) => dispatch_reply(page, self.form, &self.profile, &reply),
            Err(error) => {
                tracing::warn!(form = self.kind().as_str(), error = %format!("{error:#}"), "request failed");
                page.notify(NotificationKind::Error, &format!("{error:#}"));
                Ok(SettleOutcome::Idle)
            }
        };
        let outcome = applied.as_ref().copied().unwrap_or(SettleOutcome::Idle);
        self.state.dispatch(SubmissionCommand::Settled { request, outcome });
        if let Some(button) = &self.button {
            match outcome {
                SettleOutcome::Idle => button.mark_idle(&mut page.document),
                SettleOutcome::Disabled => button.mark_done(&mut page.document),
            }
        }
        applied.map(|_| ())
    }

    /// Re-enables a form left disabled by a save. False when there was nothing to re-arm.
    pub fn rearm(&mut self, page: &mut Page) -> bool {
        if self.state.dispatch(SubmissionCommand::Rearm).is_empty() {
            return false;
        }
        if let Some(button) = &self.button {
            button.mark_idle(&mut page.document);
        }
        true
    }

    /// Runs a whole submission on the calling thread.
    pub fn submit<T: Transport + ?Sized>(
        &mut self,
        page: &mut Page,
        transport: &T,
    ) -> Result<Begin, StructureError> {
        let begin = self.begin(page)?;
        if let Begin::Dispatched(pending) = &begin {
            let result = transport.post_json(&pending.post);
            self.complete(page, pending.request, result)?;
        }
        Ok(begin)
    }

    fn target_url(&self, page: &Page) -> Result<String, StructureError> {
        let action = page
            .document
            .get(self.form)
            .and_then(|element| element.action.as_deref())
            .filter(|action| !action.trim().is_empty());
        match action {
            Some(action) => page.resolve(action),
            None => Ok(page.location().to_owned()),
        }
    }
}

fn show_rejection(
    page: &mut Page,
    form: ElementId,
    rejection: ClientRejection,
) -> Result<(), StructureError> {
    let field = page
        .document
        .find(form, |element| element.is_control() && element.is_named(rejection.field));
    match field {
        Some(field) => show_field_error(&mut page.document, field, rejection.message),
        None => {
            page.notify(NotificationKind::Error, rejection.message);
            Ok(())
        }
    }
}
