// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::time::Duration;
use tally_app::{
    CSRF_COOKIE, NotificationId, NotificationKind, NotifyMode, client_timezone, resolve_href,
};

use crate::StructureError;
use crate::cards::HideTimer;
use crate::document::Document;
use crate::notify::{DEFAULT_NOTIFICATION_TIMEOUT, NotificationCenter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSettings {
    pub notification_timeout: Duration,
    pub notify_mode: NotifyMode,
    pub redirect_delay: Duration,
    pub options_auto_hide: Duration,
    pub csrf_cookie: String,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            notification_timeout: DEFAULT_NOTIFICATION_TIMEOUT,
            notify_mode: NotifyMode::Replace,
            redirect_delay: Duration::from_secs(3),
            options_auto_hide: Duration::from_secs(3),
            csrf_cookie: CSRF_COOKIE.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Timer {
    Navigate(String),
    Reload,
    HideCard(HideTimer),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Scheduled {
    due: Duration,
    seq: u64,
    timer: Timer,
}

/// Everything a handler may touch: the document, on-screen messages, the location, and the
/// page clock with its pending timers.
#[derive(Debug, Clone)]
pub struct Page {
    pub document: Document,
    pub notifications: NotificationCenter,
    pub settings: PageSettings,
    location: String,
    timezone: String,
    alerts: Vec<String>,
    visited: Vec<String>,
    reloads: usize,
    now: Duration,
    timers: Vec<Scheduled>,
    timer_seq: u64,
}

impl Page {
    /// `location` must be an absolute URL.
    pub fn new(location: &str, settings: PageSettings) -> Self {
        Self {
            document: Document::new(),
            notifications: NotificationCenter::new(
                settings.notify_mode,
                settings.notification_timeout,
            ),
            settings,
            location: location.to_owned(),
            timezone: client_timezone(),
            alerts: Vec::new(),
            visited: Vec::new(),
            reloads: 0,
            now: Duration::ZERO,
            timers: Vec::new(),
            timer_seq: 0,
        }
    }

    pub fn with_timezone(mut self, timezone: &str) -> Self {
        self.timezone = timezone.to_owned();
        self
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    pub const fn now(&self) -> Duration {
        self.now
    }

    pub fn notify(&mut self, kind: NotificationKind, text: &str) -> NotificationId {
        self.notifications.notify(kind, text, self.now)
    }

    /// A blocking alert. Recorded rather than shown.
    pub fn alert(&mut self, text: &str) {
        tracing::debug!(text, "alert");
        self.alerts.push(text.to_owned());
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    /// Resolves `target` against the current location and moves there.
    pub fn navigate(&mut self, target: &str) -> Result<String, StructureError> {
        let resolved = self.resolve(target)?;
        tracing::debug!(from = %self.location, to = %resolved, "navigate");
        self.location = resolved.clone();
        self.visited.push(resolved.clone());
        Ok(resolved)
    }

    pub fn resolve(&self, target: &str) -> Result<String, StructureError> {
        resolve_href(&self.location, target).map_err(|error| StructureError::InvalidUrl {
            url: target.to_owned(),
            reason: format!("{error:#}"),
        })
    }

    /// Every location navigated to, oldest first.
    pub fn visited(&self) -> &[String] {
        &self.visited
    }

    pub fn reload(&mut self) {
        tracing::debug!(location = %self.location, "reload");
        self.reloads += 1;
    }

    pub const fn reloads(&self) -> usize {
        self.reloads
    }

    pub fn schedule(&mut self, delay: Duration, timer: Timer) {
        self.timer_seq += 1;
        self.timers.push(Scheduled {
            due: self.now.saturating_add(delay),
            seq: self.timer_seq,
            timer,
        });
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Moves the clock forward and returns the timers that came due, in firing order.
    /// Notifications past their timeout are closed.
    pub fn advance_clock(&mut self, by: Duration) -> Vec<Timer> {
        self.now = self.now.saturating_add(by);
        let now = self.now;
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.timers.drain(..).partition(|scheduled| scheduled.due <= now);
        self.timers = pending;
        due.sort_by_key(|scheduled| (scheduled.due, scheduled.seq));
        self.notifications.expire(now);
        due.into_iter().map(|scheduled| scheduled.timer).collect()
    }
}
