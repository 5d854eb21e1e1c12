// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! GeoJSON feature helpers shared by the codec, validator and resolver.

use geojson::{Feature, Geometry, JsonObject, Value};

/// Property key holding a feature's composite id.
pub const ID_PROPERTY: &str = "id";
/// Property key holding a fire break feature's type.
pub const FIRE_BREAK_TYPE_PROPERTY: &str = "fireBreakType";

/// Wrap a bare geometry in a feature with empty properties.
pub fn feature_from_value(value: Value) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(JsonObject::new()),
        foreign_members: None,
    }
}

/// The `properties.id` string of a feature, if any.
pub fn feature_id(feature: &Feature) -> Option<&str> {
    feature.property(ID_PROPERTY).and_then(|v| v.as_str())
}

/// Geometry value of a feature, if it has one.
pub fn feature_value(feature: &Feature) -> Option<&Value> {
    feature.geometry.as_ref().map(|g| &g.value)
}

/// Whether a geometry is a polygon or multi-polygon.
pub fn is_polygonal(value: &Value) -> bool {
    matches!(value, Value::Polygon(_) | Value::MultiPolygon(_))
}

/// Flatten nested geometry collections into their member geometries.
///
/// Non-collection geometries come back as a single-element list.
pub fn flatten_geometries(value: &Value) -> Vec<&Value> {
    match value {
        Value::GeometryCollection(members) => members
            .iter()
            .flat_map(|g| flatten_geometries(&g.value))
            .collect(),
        other => vec![other],
    }
}
