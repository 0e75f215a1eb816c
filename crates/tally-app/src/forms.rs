// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::validation::{
    INVALID_EMAIL_MESSAGE, PasswordField, RangeBound, is_valid_email, validate_date_range,
    validate_password, validate_time_range,
};
use crate::{FailureSurface, FormKind, FormTrigger, ResultView, StatDetail};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub input_type: &'static str,
    pub label: &'static str,
}

const fn field(name: &'static str, input_type: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        input_type,
        label,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonLabels {
    pub idle: &'static str,
    pub busy: &'static str,
}

/// A check run against the form's field values before anything is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCheck {
    Email(&'static str),
    PasswordPair {
        first: &'static str,
        second: &'static str,
    },
    DateRange {
        from: &'static str,
        to: &'static str,
    },
    TimeRange {
        from: &'static str,
        to: &'static str,
    },
}

/// A client-side validation failure and the field it belongs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ClientRejection {
    pub field: &'static str,
    pub message: &'static str,
}

impl ClientCheck {
    pub fn run(self, value_of: &dyn Fn(&str) -> String) -> Result<(), ClientRejection> {
        match self {
            Self::Email(name) => {
                if is_valid_email(&value_of(name)) {
                    Ok(())
                } else {
                    Err(ClientRejection {
                        field: name,
                        message: INVALID_EMAIL_MESSAGE,
                    })
                }
            }
            Self::PasswordPair { first, second } => {
                validate_password(&value_of(first), &value_of(second)).map_err(|error| {
                    let field = match error.field() {
                        PasswordField::First => first,
                        PasswordField::Second => second,
                    };
                    ClientRejection {
                        field,
                        message: error.message(),
                    }
                })
            }
            Self::DateRange { from, to } => validate_date_range(&value_of(from), &value_of(to))
                .map_err(|error| range_rejection(error.bound(), from, to, error.message())),
            Self::TimeRange { from, to } => validate_time_range(&value_of(from), &value_of(to))
                .map_err(|error| range_rejection(error.bound(), from, to, error.message())),
        }
    }
}

fn range_rejection(
    bound: RangeBound,
    from: &'static str,
    to: &'static str,
    message: &'static str,
) -> ClientRejection {
    let field = match bound {
        RangeBound::From => from,
        RangeBound::To => to,
    };
    ClientRejection { field, message }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAfterSuccess {
    Idle,
    /// Stays disabled until the next edit in the form.
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadPlan {
    Never,
    Immediate,
    Delayed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuccessPlan {
    pub message: &'static str,
    pub delayed_redirect: bool,
    pub button: ButtonAfterSuccess,
    pub reload: ReloadPlan,
    pub view: Option<ResultView>,
}

impl SuccessPlan {
    const fn notify(message: &'static str) -> Self {
        Self {
            message,
            delayed_redirect: false,
            button: ButtonAfterSuccess::Idle,
            reload: ReloadPlan::Never,
            view: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PayloadExtras {
    pub timezone: bool,
    pub stat_type: Option<&'static str>,
}

/// Static description of one form: what it collects, how it checks input, and what its
/// replies do to the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormProfile {
    pub kind: FormKind,
    /// Relative or absolute endpoint. `None` posts to the current location.
    pub action: Option<&'static str>,
    pub trigger: FormTrigger,
    pub button: Option<ButtonLabels>,
    pub fields: &'static [FieldSpec],
    pub checks: &'static [ClientCheck],
    pub failure: FailureSurface,
    pub success: SuccessPlan,
    pub extras: PayloadExtras,
    pub reshape_groups: bool,
}

impl FormProfile {
    /// Runs every check in order. The first failure wins.
    pub fn validate(&self, value_of: &dyn Fn(&str) -> String) -> Result<(), ClientRejection> {
        self.checks.iter().try_for_each(|check| check.run(value_of))
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }
}

const SIGN_IN_FIELDS: &[FieldSpec] = &[
    field("email", "email", "Email"),
    field("password", "password", "Password"),
];

const SIGN_UP_FIELDS: &[FieldSpec] = &[
    field("firstname", "text", "First name"),
    field("lastname", "text", "Last name"),
    field("email", "email", "Email"),
    field("password1", "password", "Password"),
    field("password2", "password", "Confirm password"),
];

const PASSWORD_VERIFY_FIELDS: &[FieldSpec] = &[field("password", "password", "Password")];

const ACCOUNT_FIELDS: &[FieldSpec] = &[
    field("firstname", "text", "First name"),
    field("lastname", "text", "Last name"),
    field("email", "email", "Email"),
    field("timezone", "text", "Timezone"),
];

const PASSWORD_CHANGE_FIELDS: &[FieldSpec] = &[
    field("old_password", "password", "Current password"),
    field("new_password1", "password", "New password"),
    field("new_password2", "password", "Confirm new password"),
];

const STORE_FIELDS: &[FieldSpec] = &[
    field("name", "text", "Name"),
    field("type", "text", "Type"),
    field("email", "email", "Email"),
    field("default_currency", "text", "Default currency"),
];

const STORE_AUTH_FIELDS: &[FieldSpec] = &[field("passkey", "password", "Passkey")];

const PRODUCT_FIELDS: &[FieldSpec] = &[
    field("name", "text", "Name"),
    field("description", "text", "Description"),
    field("price", "number", "Price"),
    field("quantity", "number", "Quantity"),
    field("color", "text", "Color"),
    field("size", "text", "Size"),
    field("weight", "number", "Weight"),
    field("category", "text", "Category"),
];

const SALE_FIELDS: &[FieldSpec] = &[
    field("product", "text", "Product"),
    field("quantity", "number", "Quantity"),
];

const HEADLINE_STAT_FIELDS: &[FieldSpec] = &[field("date", "date", "Date")];

const EMAIL_CHECK: &[ClientCheck] = &[ClientCheck::Email("email")];

const SIGN_UP_CHECKS: &[ClientCheck] = &[
    ClientCheck::Email("email"),
    ClientCheck::PasswordPair {
        first: "password1",
        second: "password2",
    },
];

const PASSWORD_CHANGE_CHECKS: &[ClientCheck] = &[ClientCheck::PasswordPair {
    first: "new_password1",
    second: "new_password2",
}];

const STAT_CHECKS: &[ClientCheck] = &[
    ClientCheck::DateRange {
        from: "from_date",
        to: "to_date",
    },
    ClientCheck::TimeRange {
        from: "from_time",
        to: "to_time",
    },
];

const fn labels(idle: &'static str, busy: &'static str) -> Option<ButtonLabels> {
    Some(ButtonLabels { idle, busy })
}

const fn submit_form(
    kind: FormKind,
    action: Option<&'static str>,
    button: Option<ButtonLabels>,
    fields: &'static [FieldSpec],
    success: SuccessPlan,
) -> FormProfile {
    FormProfile {
        kind,
        action,
        trigger: FormTrigger::Submit,
        button,
        fields,
        checks: &[],
        failure: FailureSurface::Notify,
        success,
        extras: PayloadExtras {
            timezone: false,
            stat_type: None,
        },
        reshape_groups: false,
    }
}

const fn advanced_stat(kind: FormKind, stat_type: &'static str) -> FormProfile {
    FormProfile {
        checks: STAT_CHECKS,
        extras: PayloadExtras {
            timezone: false,
            stat_type: Some(stat_type),
        },
        reshape_groups: true,
        ..submit_form(
            kind,
            Some("stats/advanced-options/"),
            labels("Apply", "Applying..."),
            &[],
            SuccessPlan {
                view: Some(ResultView::Text { key: "result" }),
                ..SuccessPlan::notify("Statistics retrieved successfully!")
            },
        )
    }
}

const fn headline_stat(kind: FormKind, key: &'static str, detail: StatDetail) -> FormProfile {
    FormProfile {
        trigger: FormTrigger::Change,
        ..submit_form(
            kind,
            None,
            None,
            HEADLINE_STAT_FIELDS,
            SuccessPlan {
                view: Some(ResultView::Headline { key, detail }),
                ..SuccessPlan::notify("Statistics retrieved successfully!")
            },
        )
    }
}

pub const fn profile(kind: FormKind) -> FormProfile {
    match kind {
        FormKind::SignIn => FormProfile {
            checks: EMAIL_CHECK,
            failure: FailureSurface::Field("password"),
            ..submit_form(
                kind,
                Some("/accounts/signin/"),
                labels("Sign In", "Signing in..."),
                SIGN_IN_FIELDS,
                SuccessPlan::notify("Sign in successful!"),
            )
        },
        FormKind::SignUp => FormProfile {
            checks: SIGN_UP_CHECKS,
            extras: PayloadExtras {
                timezone: true,
                stat_type: None,
            },
            ..submit_form(
                kind,
                Some("/accounts/signup/"),
                labels("Sign Up", "Please wait..."),
                SIGN_UP_FIELDS,
                SuccessPlan {
                    delayed_redirect: true,
                    ..SuccessPlan::notify("Sign up successful!")
                },
            )
        },
        FormKind::PasswordVerify => submit_form(
            kind,
            None,
            labels("Verify", "Verifying..."),
            PASSWORD_VERIFY_FIELDS,
            SuccessPlan::notify("Password verification successful!"),
        ),
        FormKind::AccountUpdate => FormProfile {
            checks: EMAIL_CHECK,
            ..submit_form(
                kind,
                None,
                labels("Save changes", "Saving changes..."),
                ACCOUNT_FIELDS,
                SuccessPlan {
                    button: ButtonAfterSuccess::Disabled,
                    ..SuccessPlan::notify("Account updated successfully!")
                },
            )
        },
        FormKind::PasswordChange => FormProfile {
            checks: PASSWORD_CHANGE_CHECKS,
            ..submit_form(
                kind,
                None,
                labels("Update password", "Updating password..."),
                PASSWORD_CHANGE_FIELDS,
                SuccessPlan {
                    button: ButtonAfterSuccess::Disabled,
                    reload: ReloadPlan::Delayed,
                    ..SuccessPlan::notify("Password updated successfully!")
                },
            )
        },
        FormKind::StoreCreate => FormProfile {
            checks: EMAIL_CHECK,
            ..submit_form(
                kind,
                Some("/stores/new/"),
                labels("Create Store", "Creating Store..."),
                STORE_FIELDS,
                SuccessPlan {
                    reload: ReloadPlan::Immediate,
                    ..SuccessPlan::notify("Store created successfully!")
                },
            )
        },
        FormKind::StoreUpdate => FormProfile {
            checks: EMAIL_CHECK,
            failure: FailureSurface::Alert,
            ..submit_form(
                kind,
                None,
                labels("Update Store", "Updating Store..."),
                STORE_FIELDS,
                SuccessPlan::notify("Store updated successfully!"),
            )
        },
        FormKind::StoreAuth => FormProfile {
            failure: FailureSurface::Field("passkey"),
            ..submit_form(
                kind,
                Some("/stores/authorize/"),
                labels("Authorize", "Authorizing..."),
                STORE_AUTH_FIELDS,
                SuccessPlan::notify("Store authorized successfully!"),
            )
        },
        FormKind::ProductAdd => FormProfile {
            failure: FailureSurface::Alert,
            ..submit_form(
                kind,
                Some("new/"),
                labels("Add Product", "Adding Product..."),
                PRODUCT_FIELDS,
                SuccessPlan::notify("Product added successfully!"),
            )
        },
        FormKind::ProductUpdate => FormProfile {
            failure: FailureSurface::Alert,
            ..submit_form(
                kind,
                None,
                labels("Update Product", "Updating Product..."),
                PRODUCT_FIELDS,
                SuccessPlan::notify("Product updated successfully!"),
            )
        },
        FormKind::SaleAdd => submit_form(
            kind,
            Some("new/"),
            labels("Record sale", "Recording sale..."),
            SALE_FIELDS,
            SuccessPlan::notify("Sale recorded successfully!"),
        ),
        FormKind::SaleUpdate => submit_form(
            kind,
            None,
            labels("Update Sale", "Updating Sale..."),
            SALE_FIELDS,
            SuccessPlan::notify("Sale updated successfully!"),
        ),
        FormKind::SalesStat => advanced_stat(kind, "sales"),
        FormKind::RevenueStat => advanced_stat(kind, "revenue"),
        FormKind::MostSoldProduct => headline_stat(
            kind,
            "mostSoldProduct",
            StatDetail::MostSoldProduct,
        ),
        FormKind::MostActiveStore => headline_stat(
            kind,
            "mostActiveStore",
            StatDetail::MostActiveStore,
        ),
    }
}
