// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - geometry codec, checks and routing.

pub mod draw_mode;
pub mod engine;
pub mod form_validation;
pub mod ownership;
pub mod spatial_validator;
pub mod wkt;

pub use draw_mode::{DrawKind, DrawMode, DrawModeState};
pub use engine::{EditType, GeometryEngine, MapEditEvent};
pub use form_validation::{validate_form, FormIssue};
pub use spatial_validator::CoordinateSystem;
pub use wkt::WktError;
