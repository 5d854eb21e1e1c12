// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Simulation request form snapshot and the writes the engine emits for it.
//!
//! The form container itself lives outside this crate; [`SimulationForm`] is
//! the snapshot the engine reads and [`FormWrite`] is what it asks the
//! container to persist. [`FormStore`] is implemented for the snapshot so it
//! can double as an in-memory container.

use crate::error::{EngineError, Result};
use crate::models::fire_break::{FireBreakType, FireBreaks};
use crate::services::wkt::features_to_wkt;
use chrono::{Duration, NaiveDateTime};
use geojson::Feature;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use validator::Validate;

/// Format used for the computed simulation end time.
pub const END_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// The stored area-of-interest value.
///
/// Unparsable pasted text is kept verbatim so the user can continue editing
/// it; validation flags it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MapSelection {
    Features(Vec<Feature>),
    Text(String),
}

impl Default for MapSelection {
    fn default() -> Self {
        MapSelection::Features(Vec::new())
    }
}

impl MapSelection {
    /// Structured features, or an empty slice for raw text.
    pub fn features(&self) -> &[Feature] {
        match self {
            MapSelection::Features(features) => features,
            MapSelection::Text(_) => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            MapSelection::Features(features) => features.is_empty(),
            MapSelection::Text(text) => text.is_empty(),
        }
    }

    /// Text shown in the WKT input field.
    pub fn to_wkt(&self) -> String {
        match self {
            MapSelection::Features(features) => features_to_wkt(features),
            MapSelection::Text(text) => text.clone(),
        }
    }
}

/// One time-indexed row of wind/fuel parameters and its fire breaks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryCondition {
    /// Stable row index; 0 is the baseline row
    pub position: usize,
    /// Hours after ignition
    pub time_offset: u32,
    /// Degrees
    #[validate(
        required(message = "This field cannot be empty"),
        range(
            min = 0.0,
            max = 360.0,
            message = "Wind direction must be between 0 and 360 degrees"
        )
    )]
    pub wind_direction: Option<f64>,
    /// km/h
    #[validate(
        required(message = "This field cannot be empty"),
        range(
            min = 0.0,
            max = 300.0,
            message = "Wind speed must be between 0 and 300 km/h"
        )
    )]
    pub wind_speed: Option<f64>,
    /// Percent
    #[validate(
        required(message = "This field cannot be empty"),
        range(
            min = 0.0,
            max = 100.0,
            message = "Fuel moisture must be between 0% and 100%"
        )
    )]
    pub fuel_moisture_content: Option<f64>,
    #[serde(default)]
    pub fire_break: FireBreaks,
}

impl BoundaryCondition {
    /// Empty row at `position`, with time offset equal to its position.
    pub fn new(position: usize) -> Self {
        Self {
            position,
            time_offset: u32::try_from(position).unwrap_or(u32::MAX),
            ..Default::default()
        }
    }

    /// Features stored for one fire break type.
    pub fn fire_break_features(&self, fire_break_type: FireBreakType) -> &[Feature] {
        self.fire_break
            .get(&fire_break_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// WKT shown in the row's fire break field for `fire_break_type`.
    pub fn fire_break_wkt(&self, fire_break_type: FireBreakType) -> String {
        features_to_wkt(self.fire_break_features(fire_break_type))
    }
}

/// Snapshot of the simulation request form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SimulationForm {
    #[validate(length(min = 1, message = "This field cannot be empty"))]
    pub simulation_title: String,
    #[validate(length(min = 1, message = "This field cannot be empty"))]
    pub simulation_description: String,
    pub probability_range: f64,
    #[serde(default)]
    pub map_selection: MapSelection,
    pub is_map_area_valid: bool,
    pub is_valid_wkt: bool,
    #[serde(rename = "isMapAreaValidWKT")]
    pub is_map_area_valid_wkt: bool,
    pub hours_of_projection: u32,
    pub ignition_date_time: Option<NaiveDateTime>,
    pub simulation_fire_spotting: bool,
    #[validate(nested)]
    pub boundary_conditions: Vec<BoundaryCondition>,
}

impl Default for SimulationForm {
    fn default() -> Self {
        Self {
            simulation_title: String::new(),
            simulation_description: String::new(),
            probability_range: 0.75,
            map_selection: MapSelection::default(),
            is_map_area_valid: true,
            is_valid_wkt: true,
            is_map_area_valid_wkt: true,
            hours_of_projection: 1,
            ignition_date_time: None,
            simulation_fire_spotting: false,
            boundary_conditions: vec![BoundaryCondition::new(0)],
        }
    }
}

impl SimulationForm {
    /// Row at `position`, if it exists.
    pub fn boundary_condition(&self, position: usize) -> Option<&BoundaryCondition> {
        self.boundary_conditions
            .iter()
            .find(|row| row.position == position)
    }

    /// Array index of the row at `position`. Form paths address rows by
    /// index.
    pub fn boundary_condition_index(&self, position: usize) -> Option<usize> {
        self.boundary_conditions
            .iter()
            .position(|row| row.position == position)
    }

    /// Ignition time plus the hours of projection.
    pub fn end_time(&self) -> Option<String> {
        let start = self.ignition_date_time?;
        if self.hours_of_projection == 0 {
            return None;
        }
        let end = start + Duration::hours(i64::from(self.hours_of_projection));
        Some(end.format(END_TIME_FORMAT).to_string())
    }
}

/// A single value the engine asks the form container to store.
#[derive(Debug, Clone, PartialEq)]
pub enum FormWrite {
    MapSelection(MapSelection),
    IsMapAreaValid(bool),
    IsValidWkt(bool),
    IsMapAreaValidWkt(bool),
    /// Fire breaks of the row at array `index`. `position` is the row's
    /// stable id, which stops matching its index once a row is removed.
    FireBreak {
        index: usize,
        position: usize,
        value: FireBreaks,
    },
    BoundaryConditions(Vec<BoundaryCondition>),
}

impl FormWrite {
    /// Form field path this write targets.
    pub fn path(&self) -> String {
        match self {
            FormWrite::MapSelection(_) => "mapSelection".to_string(),
            FormWrite::IsMapAreaValid(_) => "isMapAreaValid".to_string(),
            FormWrite::IsValidWkt(_) => "isValidWkt".to_string(),
            FormWrite::IsMapAreaValidWkt(_) => "isMapAreaValidWKT".to_string(),
            FormWrite::FireBreak { index, .. } => {
                format!("boundaryConditions.{index}.fireBreak")
            }
            FormWrite::BoundaryConditions(_) => "boundaryConditions".to_string(),
        }
    }
}

impl Serialize for FormWrite {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FormWrite", 2)?;
        state.serialize_field("path", &self.path())?;
        match self {
            FormWrite::MapSelection(value) => state.serialize_field("value", value)?,
            FormWrite::IsMapAreaValid(value)
            | FormWrite::IsValidWkt(value)
            | FormWrite::IsMapAreaValidWkt(value) => state.serialize_field("value", value)?,
            FormWrite::FireBreak { value, .. } => state.serialize_field("value", value)?,
            FormWrite::BoundaryConditions(value) => state.serialize_field("value", value)?,
        }
        state.end()
    }
}

/// The external form-state container.
///
/// Writes are applied one at a time, in the order given.
pub trait FormStore {
    fn set_field_value(&mut self, write: FormWrite) -> Result<()>;

    fn apply_writes(&mut self, writes: Vec<FormWrite>) -> Result<()> {
        for write in writes {
            self.set_field_value(write)?;
        }
        Ok(())
    }
}

impl FormStore for SimulationForm {
    fn set_field_value(&mut self, write: FormWrite) -> Result<()> {
        match write {
            FormWrite::MapSelection(value) => self.map_selection = value,
            FormWrite::IsMapAreaValid(value) => self.is_map_area_valid = value,
            FormWrite::IsValidWkt(value) => self.is_valid_wkt = value,
            FormWrite::IsMapAreaValidWkt(value) => self.is_map_area_valid_wkt = value,
            FormWrite::FireBreak {
                index,
                position,
                value,
            } => {
                let row = self
                    .boundary_conditions
                    .get_mut(index)
                    .filter(|row| row.position == position)
                    .ok_or(EngineError::UnknownBoundaryCondition(position))?;
                row.fire_break = value;
            }
            FormWrite::BoundaryConditions(rows) => self.boundary_conditions = rows,
        }
        Ok(())
    }
}
