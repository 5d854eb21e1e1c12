// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the engine.

pub mod fire_break;
pub mod form;
pub mod geometry;

pub use fire_break::{FireBreakContext, FireBreakType, FireBreaks};
pub use form::{BoundaryCondition, FormStore, FormWrite, MapSelection, SimulationForm};
