// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use std::fmt;
use std::sync::Arc;
use tally_app::{ElementId, FormId, FormKind, FormTrigger, profile};
use tally_ui::{
    Begin, FilterChoices, FormPage, Page, PageSettings, Session, SharedTransport, build_form,
    build_stat_card, field_error,
};

use crate::config::Config;

/// One form rebuilt on a page at `location`, bound to a transport.
pub struct FormRuntime {
    session: Session,
    form: FormPage,
    id: FormId,
    result_slots: Option<(ElementId, Option<ElementId>)>,
}

impl FormRuntime {
    pub fn from_config(
        config: &Config,
        transport: SharedTransport,
        kind: FormKind,
        path: &str,
        checks: &[String],
    ) -> Result<Self> {
        let location = tally_app::resolve_href(config.base_url(), path)
            .with_context(|| format!("resolve page {path:?} against {}", config.base_url()))?;
        Self::new(
            Page::new(&location, config.page_settings()?),
            transport,
            kind,
            checks,
        )
    }

    pub fn new(
        page: Page,
        transport: SharedTransport,
        kind: FormKind,
        checks: &[String],
    ) -> Result<Self> {
        let mut session = Session::new(page, transport);
        let root = session.page.document.root();
        let (form, result_slots) = if is_stat(kind) {
            let choices = FilterChoices {
                stores: checks
                    .iter()
                    .map(|name| (name.clone(), name.clone()))
                    .collect(),
                categories: Vec::new(),
            };
            let card = build_stat_card(&mut session.page.document, root, kind, &choices);
            (card.form, Some((card.headline, card.detail)))
        } else {
            (build_form(&mut session.page.document, root, kind), None)
        };
        let id = session
            .bind_form(form.form, kind)
            .with_context(|| format!("bind {} form", kind.as_str()))?;

        let mut runtime = Self {
            session,
            form,
            id,
            result_slots,
        };
        for name in checks {
            runtime.check(name)?;
        }
        Ok(runtime)
    }

    pub fn set_cookie(&mut self, cookie: &str) {
        self.session.page.document.set_cookie(cookie);
    }

    pub fn fill(&mut self, name: &str, value: &str) -> Result<()> {
        let field = self.field(name)?;
        self.session.input(field, value);
        Ok(())
    }

    pub fn check(&mut self, name: &str) -> Result<()> {
        let field = self.field(name)?;
        self.session
            .set_checked(field, true)
            .with_context(|| format!("check {name:?}"))?;
        Ok(())
    }

    /// Submits, lets every timer the reply scheduled run, and reports what the page showed.
    pub fn submit(&mut self) -> Result<Report> {
        let kind = self.kind();
        let begin = self
            .session
            .submit(self.id)
            .with_context(|| format!("submit {} form", kind.as_str()))?;
        let mut report = Report {
            kind,
            outcome: match &begin {
                Begin::Dispatched(pending) => Outcome::Sent(pending.post.url.clone()),
                Begin::Rejected(rejection) => Outcome::Rejected {
                    field: rejection.field.to_owned(),
                    message: rejection.message.to_owned(),
                },
                Begin::Ignored(reason) => Outcome::Ignored(format!("{reason:?}")),
            },
            notifications: self
                .session
                .page
                .notifications
                .visible()
                .iter()
                .map(|notification| {
                    (
                        notification.kind.as_str().to_owned(),
                        notification.text.clone(),
                    )
                })
                .collect(),
            field_errors: Vec::new(),
            alerts: self.session.page.alerts().to_vec(),
            result: None,
            location: String::new(),
            reloads: 0,
        };

        let doc = &self.session.page.document;
        report.field_errors = self
            .form
            .fields
            .iter()
            .filter_map(|(name, id)| {
                field_error(doc, *id).map(|message| (name.clone(), message.to_owned()))
            })
            .collect();
        report.result = self.result_slots.map(|(headline, detail)| {
            (
                doc.text(headline).to_owned(),
                detail.map(|detail| doc.text(detail).to_owned()),
            )
        });

        let settle = settle_delay(&self.session.page.settings);
        self.session.advance(settle)?;
        report.location = self.session.page.location().to_owned();
        report.reloads = self.session.page.reloads();
        Ok(report)
    }

    pub fn kind(&self) -> FormKind {
        self.form.kind
    }

    fn field(&self, name: &str) -> Result<ElementId> {
        self.form.field(name).ok_or_else(|| {
            let known = self
                .form
                .fields
                .iter()
                .map(|(field, _)| field.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            anyhow!(
                "the {} form has no field {name:?}; fields are: {known}",
                self.form.kind.as_str()
            )
        })
    }
}

fn is_stat(kind: FormKind) -> bool {
    let profile = profile(kind);
    profile.trigger == FormTrigger::Change || profile.extras.stat_type.is_some()
}

fn settle_delay(settings: &PageSettings) -> std::time::Duration {
    settings.redirect_delay.max(settings.options_auto_hide)
}

/// Builds a runtime that posts through the HTTP client described by `config`.
pub fn http_runtime(
    config: &Config,
    kind: FormKind,
    path: &str,
    checks: &[String],
) -> Result<FormRuntime> {
    let client = tally_http::Client::new(config.base_url(), config.timeout()?)?;
    FormRuntime::from_config(config, Arc::new(client), kind, path, checks)
}

/// Default page a form lives on when none is given.
pub fn default_page(kind: FormKind) -> Result<&'static str> {
    let path = match kind {
        FormKind::SignIn => "/accounts/signin/",
        FormKind::SignUp => "/accounts/signup/",
        FormKind::StoreCreate | FormKind::StoreAuth => "/stores/",
        FormKind::SalesStat
        | FormKind::RevenueStat
        | FormKind::MostSoldProduct
        | FormKind::MostActiveStore => "/dashboard/",
        other => bail!(
            "the {} form posts to the page it is on; pass --page",
            other.as_str()
        ),
    };
    Ok(path)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Sent(String),
    Rejected { field: String, message: String },
    Ignored(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub kind: FormKind,
    pub outcome: Outcome,
    pub notifications: Vec<(String, String)>,
    pub field_errors: Vec<(String, String)>,
    pub alerts: Vec<String>,
    pub result: Option<(String, Option<String>)>,
    pub location: String,
    pub reloads: usize,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "form: {}", self.kind.as_str())?;
        match &self.outcome {
            Outcome::Sent(url) => writeln!(f, "sent: POST {url}")?,
            Outcome::Rejected { field, message } => {
                writeln!(f, "rejected: {field}: {message}")?;
            }
            Outcome::Ignored(reason) => writeln!(f, "ignored: {reason}")?,
        }
        for (kind, text) in &self.notifications {
            writeln!(f, "{kind}: {text}")?;
        }
        for (field, message) in &self.field_errors {
            writeln!(f, "field {field}: {message}")?;
        }
        for alert in &self.alerts {
            writeln!(f, "alert: {alert}")?;
        }
        if let Some((headline, detail)) = &self.result {
            writeln!(f, "result: {headline}")?;
            if let Some(detail) = detail.as_deref().filter(|detail| !detail.is_empty()) {
                writeln!(f, "        {detail}")?;
            }
        }
        writeln!(f, "location: {}", self.location)?;
        if self.reloads > 0 {
            writeln!(f, "reloads: {}", self.reloads)?;
        }
        Ok(())
    }
}
