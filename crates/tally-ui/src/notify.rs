// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::time::Duration;
use tally_app::{NotificationId, NotificationKind, NotifyMode};

pub const DEFAULT_NOTIFICATION_TIMEOUT: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub text: String,
    pub expires_at: Duration,
}

/// Transient, non-blocking messages. Times are offsets on the page clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationCenter {
    mode: NotifyMode,
    timeout: Duration,
    issued: usize,
    visible: Vec<Notification>,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(NotifyMode::default(), DEFAULT_NOTIFICATION_TIMEOUT)
    }
}

impl NotificationCenter {
    pub fn new(mode: NotifyMode, timeout: Duration) -> Self {
        Self {
            mode,
            timeout,
            issued: 0,
            visible: Vec::new(),
        }
    }

    pub const fn mode(&self) -> NotifyMode {
        self.mode
    }

    pub fn notify(&mut self, kind: NotificationKind, text: &str, now: Duration) -> NotificationId {
        self.notify_for(kind, text, self.timeout, now)
    }

    pub fn notify_for(
        &mut self,
        kind: NotificationKind,
        text: &str,
        duration: Duration,
        now: Duration,
    ) -> NotificationId {
        if self.mode == NotifyMode::Replace {
            self.visible.clear();
        }
        self.issued += 1;
        let id = NotificationId::new(self.issued);
        self.visible.push(Notification {
            id,
            kind,
            text: text.to_owned(),
            expires_at: now.saturating_add(duration),
        });
        tracing::debug!(kind = kind.as_str(), text, "notification shown");
        id
    }

    /// Closes one notification. False when it was already gone.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        let before = self.visible.len();
        self.visible.retain(|notification| notification.id != id);
        self.visible.len() != before
    }

    /// Drops every notification whose timeout has elapsed at `now`.
    pub fn expire(&mut self, now: Duration) -> Vec<NotificationId> {
        let (expired, kept): (Vec<_>, Vec<_>) = self
            .visible
            .drain(..)
            .partition(|notification| notification.expires_at <= now);
        self.visible = kept;
        expired.into_iter().map(|notification| notification.id).collect()
    }

    pub fn visible(&self) -> &[Notification] {
        &self.visible
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.visible.last()
    }
}
