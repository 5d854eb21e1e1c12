// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Coordinate range and area checks.
//!
//! Everything here is pure; the engine turns the booleans into form flags.

use crate::models::geometry::{feature_value, flatten_geometries};
use crate::services::wkt;
use geo::{GeodesicArea, MultiPolygon, Polygon};
use geojson::{Feature, Position, Value};
use serde::{Deserialize, Serialize};

/// Coordinate reference systems the validator knows the valid range of.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoordinateSystem {
    /// EPSG:3857, the projection most web maps draw in. Latitudes are
    /// clipped near the poles.
    #[default]
    WebMercator,
    /// EPSG:4326, plain WGS 84 longitude/latitude.
    Wgs84,
}

/// Inclusive longitude/latitude ranges in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateBounds {
    pub longitude: (f64, f64),
    pub latitude: (f64, f64),
}

impl CoordinateSystem {
    pub fn epsg(self) -> u32 {
        match self {
            CoordinateSystem::WebMercator => 3857,
            CoordinateSystem::Wgs84 => 4326,
        }
    }

    pub fn from_epsg(code: u32) -> Option<Self> {
        match code {
            3857 => Some(CoordinateSystem::WebMercator),
            4326 => Some(CoordinateSystem::Wgs84),
            _ => None,
        }
    }

    pub fn bounds(self) -> CoordinateBounds {
        match self {
            CoordinateSystem::WebMercator => CoordinateBounds {
                longitude: (-180.0, 180.0),
                latitude: (-85.06, 85.06),
            },
            CoordinateSystem::Wgs84 => CoordinateBounds {
                longitude: (-180.0, 180.0),
                latitude: (-90.0, 90.0),
            },
        }
    }
}

/// Check a `[longitude, latitude]` pair against the system's valid range.
///
/// Positions with fewer than two ordinates, or non-finite ones, are invalid.
/// A third (elevation) ordinate is ignored.
pub fn is_valid_coordinate(coord: &[f64], crs: CoordinateSystem) -> bool {
    let (lon, lat) = match coord {
        [lon, lat, ..] => (*lon, *lat),
        _ => return false,
    };
    if !lon.is_finite() || !lat.is_finite() {
        return false;
    }

    let bounds = crs.bounds();
    (bounds.longitude.0..=bounds.longitude.1).contains(&lon)
        && (bounds.latitude.0..=bounds.latitude.1).contains(&lat)
}

/// Positions of a single (non-collection) geometry that take part in the
/// range check. Polygons contribute their exterior ring only.
fn checked_positions(value: &Value) -> Option<Vec<&Position>> {
    let positions = match value {
        Value::Point(p) => vec![p],
        Value::LineString(ls) => ls.iter().collect(),
        Value::Polygon(rings) => rings.first()?.iter().collect(),
        Value::MultiPoint(points) => points.iter().collect(),
        Value::MultiLineString(lines) => lines.iter().flatten().collect(),
        Value::MultiPolygon(polygons) => {
            let mut positions = Vec::new();
            for rings in polygons {
                positions.extend(rings.first()?.iter());
            }
            positions
        }
        Value::GeometryCollection(_) => return None,
    };
    Some(positions)
}

/// Whether every checked coordinate of a geometry is in range.
pub fn are_coordinates_valid(value: &Value, crs: CoordinateSystem) -> bool {
    flatten_geometries(value).into_iter().all(|geometry| {
        checked_positions(geometry)
            .is_some_and(|positions| positions.iter().all(|p| is_valid_coordinate(p, crs)))
    })
}

/// Whether text is parseable WKT with every checked coordinate in range.
pub fn is_well_known_text_valid(text: &str, crs: CoordinateSystem) -> bool {
    match wkt::parse(text) {
        Ok(value) => are_coordinates_valid(&value, crs),
        Err(e) => {
            tracing::debug!(error = %e, "WKT failed to parse");
            false
        }
    }
}

fn well_formed(rings: &[Vec<Position>]) -> bool {
    rings
        .iter()
        .flatten()
        .all(|p| p.len() >= 2 && p.iter().all(|v| v.is_finite()))
}

/// Geodesic area of a geometry in square metres, unrounded.
///
/// Only polygonal members contribute; points and lines have no area.
pub fn geodesic_area(value: &Value) -> f64 {
    match value {
        Value::Polygon(rings) if well_formed(rings) => Polygon::<f64>::try_from(value.clone())
            .map(|p| p.geodesic_area_unsigned())
            .unwrap_or(0.0),
        Value::MultiPolygon(polygons) if polygons.iter().all(|p| well_formed(p)) => {
            MultiPolygon::<f64>::try_from(value.clone())
                .map(|mp| mp.geodesic_area_unsigned())
                .unwrap_or(0.0)
        }
        Value::GeometryCollection(members) => {
            members.iter().map(|g| geodesic_area(&g.value)).sum()
        }
        _ => 0.0,
    }
}

/// Area of a feature in square metres, rounded up to a whole unit.
pub fn compute_area(feature: &Feature) -> f64 {
    feature_value(feature).map_or(0.0, |value| geodesic_area(value).ceil())
}

/// Whether a feature's area is no greater than `max_area_m2`.
pub fn is_area_within_limit(feature: &Feature, max_area_m2: f64) -> bool {
    compute_area(feature) <= max_area_m2
}
