// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const NO_DATA: &str = "No data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

impl NotificationKind {
    pub const ALL: [Self; 4] = [Self::Success, Self::Error, Self::Warning, Self::Info];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "success" => Some(Self::Success),
            "error" => Some(Self::Error),
            "warning" => Some(Self::Warning),
            "info" => Some(Self::Info),
            _ => None,
        }
    }
}

/// How a new notification treats the ones already on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NotifyMode {
    #[default]
    Replace,
    Stack,
}

impl NotifyMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Replace => "replace",
            Self::Stack => "stack",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "replace" => Some(Self::Replace),
            "stack" => Some(Self::Stack),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormKind {
    SignIn,
    SignUp,
    PasswordVerify,
    AccountUpdate,
    PasswordChange,
    StoreCreate,
    StoreUpdate,
    StoreAuth,
    ProductAdd,
    ProductUpdate,
    SaleAdd,
    SaleUpdate,
    SalesStat,
    RevenueStat,
    MostSoldProduct,
    MostActiveStore,
}

impl FormKind {
    pub const ALL: [Self; 16] = [
        Self::SignIn,
        Self::SignUp,
        Self::PasswordVerify,
        Self::AccountUpdate,
        Self::PasswordChange,
        Self::StoreCreate,
        Self::StoreUpdate,
        Self::StoreAuth,
        Self::ProductAdd,
        Self::ProductUpdate,
        Self::SaleAdd,
        Self::SaleUpdate,
        Self::SalesStat,
        Self::RevenueStat,
        Self::MostSoldProduct,
        Self::MostActiveStore,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SignIn => "signin",
            Self::SignUp => "signup",
            Self::PasswordVerify => "password-verify",
            Self::AccountUpdate => "account-update",
            Self::PasswordChange => "password-change",
            Self::StoreCreate => "store-create",
            Self::StoreUpdate => "store-update",
            Self::StoreAuth => "store-auth",
            Self::ProductAdd => "product-add",
            Self::ProductUpdate => "product-update",
            Self::SaleAdd => "sale-add",
            Self::SaleUpdate => "sale-update",
            Self::SalesStat => "sales-stat",
            Self::RevenueStat => "revenue-stat",
            Self::MostSoldProduct => "most-sold-product",
            Self::MostActiveStore => "most-active-store",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }

    /// The html id the server-rendered form carries.
    pub const fn form_html_id(self) -> &'static str {
        match self {
            Self::SignIn => "signin-form",
            Self::SignUp => "signup-form",
            Self::PasswordVerify => "password-verification-form",
            Self::AccountUpdate => "account-update-form",
            Self::PasswordChange => "change-password-form",
            Self::StoreCreate => "create-store-form",
            Self::StoreUpdate => "update-store-form",
            Self::StoreAuth => "store-passkey-form",
            Self::ProductAdd => "add-product-form",
            Self::ProductUpdate => "update-product-form",
            Self::SaleAdd => "add-sale-form",
            Self::SaleUpdate => "update-sale-form",
            Self::SalesStat => "sales-stat-form",
            Self::RevenueStat => "revenue-stat-form",
            Self::MostSoldProduct => "most-sold-product-form",
            Self::MostActiveStore => "most-active-store-form",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormTrigger {
    Submit,
    Change,
}

/// Where a failure without field errors is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureSurface {
    Notify,
    Alert,
    Field(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultView {
    /// Writes `data[key]` into the stat headline.
    Text { key: &'static str },
    /// Writes a headline and a detail line built from the object at `data[key]`.
    Headline {
        key: &'static str,
        detail: StatDetail,
    },
}

impl ResultView {
    pub const fn key(self) -> &'static str {
        match self {
            Self::Text { key } | Self::Headline { key, .. } => key,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatDetail {
    MostSoldProduct,
    MostActiveStore,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatHeadline {
    pub headline: String,
    pub detail: String,
}

impl StatHeadline {
    pub fn no_data() -> Self {
        Self {
            headline: NO_DATA.to_owned(),
            detail: NO_DATA.to_owned(),
        }
    }
}

impl StatDetail {
    pub fn render(self, value: Option<&Value>) -> StatHeadline {
        let Some(Value::Object(entry)) = value else {
            return StatHeadline::no_data();
        };
        let field = |key: &str| entry.get(key).map(display_value).unwrap_or_default();
        let detail = match self {
            Self::MostSoldProduct => format!(
                "{} - {} units sold",
                field("store"),
                field("totalQuantitySold")
            ),
            Self::MostActiveStore => format!("{} sales made", field("salesCount")),
        };
        StatHeadline {
            headline: field("name"),
            detail,
        }
    }
}

/// Text for a JSON value as it would be written into the page: strings unquoted.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
