// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod browser;
pub mod calendar;
pub mod forms;
pub mod ids;
pub mod model;
pub mod pending;
pub mod records;
pub mod schema;
pub mod state;
pub mod summary;
pub mod values;

pub use browser::*;
pub use calendar::*;
pub use forms::*;
pub use ids::*;
pub use model::*;
pub use pending::*;
pub use schema::*;
pub use state::*;
pub use summary::*;
pub use values::*;
