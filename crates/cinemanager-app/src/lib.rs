// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod catalog;
pub mod error;
pub mod forms;
pub mod ids;
pub mod model;
pub mod pipeline;
pub mod state;
pub mod store;
pub mod transfer;

pub use catalog::*;
pub use error::*;
pub use forms::*;
pub use ids::*;
pub use model::*;
pub use state::*;
pub use store::*;
pub use transfer::*;
