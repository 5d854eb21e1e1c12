// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Wildfire-Geometry: area-of-interest and fire break geometry for
//! wildfire simulation requests
//!
//! This crate keeps drawn map geometry, pasted WKT and the simulation form
//! in step: it converts WKT, checks coordinates and areas, tracks the map's
//! draw mode and decides which part of the form each drawn shape belongs to.

pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use services::GeometryEngine;
