// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use geojson::{Feature, Value};
use wildfire_geometry::models::geometry::feature_from_value;
use wildfire_geometry::models::{BoundaryCondition, SimulationForm};

/// Closed square ring with its south-west corner at (`lon`, `lat`).
#[allow(dead_code)]
pub fn square(lon: f64, lat: f64, size: f64) -> Value {
    Value::Polygon(vec![vec![
        vec![lon, lat],
        vec![lon + size, lat],
        vec![lon + size, lat + size],
        vec![lon, lat + size],
        vec![lon, lat],
    ]])
}

/// Square polygon feature with empty properties, as the map draws it.
#[allow(dead_code)]
pub fn polygon_feature(lon: f64, lat: f64, size: f64) -> Feature {
    feature_from_value(square(lon, lat, size))
}

/// Line feature with empty properties.
#[allow(dead_code)]
pub fn line_feature(coords: &[(f64, f64)]) -> Feature {
    feature_from_value(Value::LineString(
        coords.iter().map(|(x, y)| vec![*x, *y]).collect(),
    ))
}

/// Default form with `rows` boundary conditions and enough hours for them.
#[allow(dead_code)]
pub fn form_with_rows(rows: usize) -> SimulationForm {
    SimulationForm {
        hours_of_projection: u32::try_from(rows.max(1)).expect("row count fits u32"),
        boundary_conditions: (0..rows).map(BoundaryCondition::new).collect(),
        ..Default::default()
    }
}
