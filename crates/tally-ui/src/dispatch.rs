// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use tally_app::{
    ButtonAfterSuccess, ElementId, FailureBody, FailureSurface, FormProfile, HttpReply,
    NotificationKind, ReloadPlan, ResponseEnvelope, ResultView, SettleOutcome, SuccessBody,
    display_value,
};

use crate::StructureError;
use crate::field_error::show_field_error;
use crate::page::{Page, Timer};

/// `data-stat-for` names the form whose results an element displays.
pub const STAT_FOR_ATTR: &str = "stat-for";
/// `data-slot` picks which part of a result the element shows.
pub const STAT_SLOT_ATTR: &str = "slot";
pub const HEADLINE_SLOT: &str = "headline";
pub const DETAIL_SLOT: &str = "detail";

/// Applies one server reply to the page on behalf of `form`.
///
/// Returns how the submit control should settle. Structural problems are logged and returned;
/// the caller still restores the control.
pub fn dispatch_reply(
    page: &mut Page,
    form: ElementId,
    profile: &FormProfile,
    reply: &HttpReply,
) -> Result<SettleOutcome, StructureError> {
    let outcome = ResponseEnvelope::parse(reply.status, &reply.body)
        .map_err(StructureError::from)
        .and_then(|envelope| match envelope {
            ResponseEnvelope::Failure(body) => {
                apply_failure(page, form, profile, &body).map(|()| SettleOutcome::Idle)
            }
            ResponseEnvelope::Success(body) => {
                apply_success(page, profile, &body)?;
                Ok(match profile.success.button {
                    ButtonAfterSuccess::Idle => SettleOutcome::Idle,
                    ButtonAfterSuccess::Disabled => SettleOutcome::Disabled,
                })
            }
        });
    if let Err(error) = &outcome {
        tracing::error!(form = profile.kind.as_str(), status = reply.status, %error, "could not apply reply");
    }
    outcome
}

fn apply_failure(
    page: &mut Page,
    form: ElementId,
    profile: &FormProfile,
    body: &FailureBody,
) -> Result<(), StructureError> {
    if !body.errors.is_empty() {
        let mut first_error = None;
        for (name, message) in &body.errors {
            if let Err(error) = show_or_notify(page, form, name, message) {
                first_error.get_or_insert(error);
            }
        }
        return match first_error {
            Some(error) => Err(error),
            None => Ok(()),
        };
    }

    let detail = body.detail_or_default();
    match profile.failure {
        FailureSurface::Notify => {
            page.notify(NotificationKind::Error, detail);
        }
        FailureSurface::Alert => page.alert(detail),
        FailureSurface::Field(name) => show_or_notify(page, form, name, detail)?,
    }
    Ok(())
}

/// Field errors for names the form does not have are demoted to a notification.
fn show_or_notify(
    page: &mut Page,
    form: ElementId,
    name: &str,
    message: &str,
) -> Result<(), StructureError> {
    let field = page
        .document
        .find(form, |element| element.is_control() && element.is_named(name));
    match field {
        Some(field) => show_field_error(&mut page.document, field, message),
        None => {
            tracing::warn!(field = name, "server error names a field the form does not have");
            page.notify(NotificationKind::Error, message);
            Ok(())
        }
    }
}

fn apply_success(
    page: &mut Page,
    profile: &FormProfile,
    body: &SuccessBody,
) -> Result<(), StructureError> {
    let plan = profile.success;
    let message = body
        .detail
        .as_deref()
        .filter(|detail| !detail.trim().is_empty())
        .unwrap_or(plan.message);

    if let Some(url) = body.redirect_url.as_deref() {
        if plan.delayed_redirect {
            page.notify(NotificationKind::Success, message);
            let target = page.resolve(url)?;
            let delay = page.settings.redirect_delay;
            page.schedule(delay, Timer::Navigate(target));
        } else {
            page.navigate(url)?;
        }
        return Ok(());
    }

    let form_id = profile.kind.form_html_id();
    match plan.view {
        Some(ResultView::Text { key }) if body.result(key).is_some() => {
            let text = body.result(key).map(display_value).unwrap_or_default();
            write_slot(page, form_id, HEADLINE_SLOT, &text)?;
        }
        Some(ResultView::Headline { key, detail }) => {
            let rendered = detail.render(body.result(key));
            write_slot(page, form_id, HEADLINE_SLOT, &rendered.headline)?;
            write_slot(page, form_id, DETAIL_SLOT, &rendered.detail)?;
        }
        _ => {
            page.notify(NotificationKind::Success, message);
        }
    }

    match plan.reload {
        ReloadPlan::Never => {}
        ReloadPlan::Immediate => page.reload(),
        ReloadPlan::Delayed => {
            let delay = page.settings.redirect_delay;
            page.schedule(delay, Timer::Reload);
        }
    }
    Ok(())
}

fn write_slot(
    page: &mut Page,
    form_id: &str,
    slot: &str,
    text: &str,
) -> Result<(), StructureError> {
    let targets = page.document.find_all(page.document.root(), |element| {
        element.data(STAT_FOR_ATTR) == Some(form_id) && element.data(STAT_SLOT_ATTR) == Some(slot)
    });
    if targets.is_empty() {
        return Err(StructureError::NoMatch(format!(
            "[data-{STAT_FOR_ATTR}={form_id}][data-{STAT_SLOT_ATTR}={slot}]"
        )));
    }
    for target in targets {
        page.document.set_text(target, text);
    }
    Ok(())
}
