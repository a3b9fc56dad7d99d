// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod data;
pub mod dispatch;
pub mod frame;
pub mod ids;
pub mod keys;
pub mod model;
pub mod selection;
pub mod simulate;
pub mod state;

pub use data::*;
pub use dispatch::*;
pub use frame::*;
pub use ids::*;
pub use keys::*;
pub use model::*;
pub use state::*;
