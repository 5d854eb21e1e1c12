// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Fire break types and the selection context that points at one.

use geojson::Feature;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Equipment used to build a fire break.
///
/// The serialized names double as the first segment of composite feature
/// ids, so none of them may contain `-`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum FireBreakType {
    #[default]
    Canadair,
    Helicopter,
    WaterLine,
    Vehicle,
}

impl FireBreakType {
    pub const ALL: [FireBreakType; 4] = [
        FireBreakType::Canadair,
        FireBreakType::Helicopter,
        FireBreakType::WaterLine,
        FireBreakType::Vehicle,
    ];

    /// Wire name, as used in form data and feature ids.
    pub fn as_str(self) -> &'static str {
        match self {
            FireBreakType::Canadair => "canadair",
            FireBreakType::Helicopter => "helicopter",
            FireBreakType::WaterLine => "waterLine",
            FireBreakType::Vehicle => "vehicle",
        }
    }

    /// Human readable label for dropdowns.
    pub fn label(self) -> &'static str {
        match self {
            FireBreakType::Canadair => "Canadair",
            FireBreakType::Helicopter => "Helicopter",
            FireBreakType::WaterLine => "Water Line",
            FireBreakType::Vehicle => "Vehicle",
        }
    }
}

impl fmt::Display for FireBreakType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown fire break type name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown fire break type: {0}")]
pub struct UnknownFireBreakType(pub String);

impl FromStr for FireBreakType {
    type Err = UnknownFireBreakType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FireBreakType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownFireBreakType(s.to_string()))
    }
}

/// The boundary-condition row and fire break type currently being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FireBreakContext {
    pub position: usize,
    #[serde(rename = "type")]
    pub fire_break_type: FireBreakType,
}

impl FireBreakContext {
    pub fn new(position: usize, fire_break_type: FireBreakType) -> Self {
        Self {
            position,
            fire_break_type,
        }
    }
}

/// Fire break features of one boundary condition, bucketed by type.
///
/// Iteration follows [`FireBreakType`] declaration order, which keeps the
/// flattened map feature list stable.
pub type FireBreaks = BTreeMap<FireBreakType, Vec<Feature>>;
