// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod cookie;
pub mod envelope;
pub mod forms;
pub mod ids;
pub mod model;
pub mod payload;
pub mod query;
pub mod state;
pub mod timezone;
pub mod transport;
pub mod validation;

pub use cookie::*;
pub use envelope::*;
pub use forms::*;
pub use ids::*;
pub use model::*;
pub use payload::*;
pub use query::*;
pub use state::*;
pub use timezone::*;
pub use transport::*;
pub use validation::*;
