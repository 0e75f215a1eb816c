// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use tally_app::{ElementId, EnvelopeError, FormId};

/// The page or the server reply does not have the shape the client relies on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructureError {
    #[error("element {0:?} does not exist in the document")]
    MissingElement(ElementId),
    #[error("no element matches {0}")]
    NoMatch(String),
    #[error("field {0:?} is not marked with the form-input class")]
    MissingInputMarker(ElementId),
    #[error("field {0:?} has no .field-message slot in its container")]
    MissingMessageSlot(ElementId),
    #[error("form {0:?} is not bound")]
    UnknownForm(FormId),
    #[error("url {url:?} cannot be resolved against the page location: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("malformed server reply: {0}")]
    MalformedEnvelope(#[from] EnvelopeError),
}
