// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Feature ownership: which drawn feature belongs to the area of interest
//! and which to a boundary condition's fire break.
//!
//! Ownership travels on the wire as a composite `properties.id` of the form
//! `<fireBreakType>-<position>-<sequence>`. It is parsed into a
//! [`FireBreakContext`] as soon as it crosses into the engine. Features with
//! no parseable id belong to the area of interest.

use crate::models::geometry::{feature_id, FIRE_BREAK_TYPE_PROPERTY, ID_PROPERTY};
use crate::models::{BoundaryCondition, FireBreakContext, FireBreakType, FireBreaks};
use geojson::{Feature, JsonObject};

/// Composite id for the `sequence`-th feature of a fire break bucket.
pub fn build_fire_break_id(
    fire_break_type: FireBreakType,
    position: usize,
    sequence: usize,
) -> String {
    format!("{fire_break_type}-{position}-{sequence}")
}

/// Parse a composite id back into its owner.
///
/// Returns `None` for ids with fewer than three segments, an unknown type or
/// a non-numeric position. Whether the row exists is not checked here.
pub fn parse_fire_break_id(id: &str) -> Option<FireBreakContext> {
    let segments: Vec<&str> = id.split('-').collect();
    if segments.len() <= 2 {
        return None;
    }

    let fire_break_type = segments[0].parse::<FireBreakType>().ok()?;
    let position = segments[1].parse::<usize>().ok()?;
    Some(FireBreakContext::new(position, fire_break_type))
}

/// Owner of a feature, or `None` when it belongs to the area of interest.
pub fn fire_break_owner(feature: &Feature) -> Option<FireBreakContext> {
    feature_id(feature).and_then(parse_fire_break_id)
}

/// Append a feature to one type bucket, returning the updated mapping.
///
/// The new feature's properties are replaced with its composite id and type.
/// Its sequence number is the bucket length before the append.
pub fn append_fire_break_feature(
    existing: &FireBreaks,
    position: usize,
    fire_break_type: FireBreakType,
    feature: Feature,
) -> FireBreaks {
    let mut updated = existing.clone();
    let bucket = updated.entry(fire_break_type).or_default();

    let id = build_fire_break_id(fire_break_type, position, bucket.len());
    let mut properties = JsonObject::new();
    properties.insert(ID_PROPERTY.to_string(), id.clone().into());
    properties.insert(
        FIRE_BREAK_TYPE_PROPERTY.to_string(),
        fire_break_type.as_str().into(),
    );

    bucket.push(Feature {
        properties: Some(properties),
        ..feature
    });

    tracing::debug!(position, fire_break_type = %fire_break_type, id = %id, "Appended fire break feature");
    updated
}

/// Remove the feature with `feature_id` from one type bucket.
///
/// Other buckets are left as they are. Removing an id that isn't present,
/// or no id at all, returns an unchanged copy.
pub fn remove_fire_break_feature(
    existing: &FireBreaks,
    fire_break_type: FireBreakType,
    id: Option<&str>,
) -> FireBreaks {
    let mut updated = existing.clone();
    let Some(id) = id else {
        return updated;
    };
    if let Some(bucket) = updated.get_mut(&fire_break_type) {
        bucket.retain(|f| feature_id(f) != Some(id));
    }
    updated
}

/// Replace stored features with moved copies that carry the same id.
///
/// Moved features keep the stored properties; only geometry is taken from
/// the edit. Features whose id isn't in `existing` are ignored.
pub fn replace_fire_break_features(existing: &FireBreaks, moved: &[Feature]) -> FireBreaks {
    let mut updated = existing.clone();
    for stored in updated.values_mut().flatten() {
        let Some(id) = feature_id(stored).map(str::to_string) else {
            continue;
        };
        if let Some(edit) = moved
            .iter()
            .find(|f| feature_id(f) == Some(id.as_str()))
        {
            stored.geometry = edit.geometry.clone();
        }
    }
    updated
}

/// Every owned feature, area of interest first, then each row's fire breaks
/// in row order and type order.
pub fn flatten_all_features(aoi: &[Feature], rows: &[BoundaryCondition]) -> Vec<Feature> {
    aoi.iter()
        .chain(
            rows.iter()
                .flat_map(|row| row.fire_break.values().flatten()),
        )
        .cloned()
        .collect()
}
