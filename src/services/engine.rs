// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Geometry coordination engine.
//!
//! Turns map gestures, pasted WKT and boundary-condition table clicks into
//! [`FormWrite`]s for the form container. The free functions are pure and
//! take the fire break selection explicitly; [`GeometryEngine`] owns the
//! little state that outlives a single event (draw mode, selection, the
//! last area check and each row's chosen fire break type) and threads it
//! through them.

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::models::geometry::{feature_from_value, feature_id, feature_value, is_polygonal};
use crate::models::{
    BoundaryCondition, FireBreakContext, FireBreakType, FormWrite, MapSelection, SimulationForm,
};
use crate::services::draw_mode::{DrawKind, DrawMode, DrawModeState};
use crate::services::ownership::{
    append_fire_break_feature, fire_break_owner, flatten_all_features, parse_fire_break_id,
    remove_fire_break_feature, replace_fire_break_features,
};
use crate::services::spatial_validator::{are_coordinates_valid, is_area_within_limit};
use crate::services::wkt;
use geojson::Feature;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind of edit reported by the map renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EditType {
    /// A draw gesture was completed
    AddFeature,
    /// An existing vertex or feature was dragged
    MovePosition,
}

/// Edit event from the map renderer. `data` is the renderer's full feature
/// list after the edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapEditEvent {
    pub edit_type: EditType,
    pub data: Vec<Feature>,
}

/// Writes produced by an edit plus the area check the map styles with.
#[derive(Debug, Clone, PartialEq)]
pub struct EditOutcome {
    pub writes: Vec<FormWrite>,
    pub area_valid: bool,
}

/// Array index and row for `position`.
fn boundary_condition(
    form: &SimulationForm,
    position: usize,
) -> Result<(usize, &BoundaryCondition)> {
    let index = form
        .boundary_condition_index(position)
        .ok_or(EngineError::UnknownBoundaryCondition(position))?;
    Ok((index, &form.boundary_conditions[index]))
}

/// The area-of-interest feature in a renderer feature list: the last one
/// that doesn't carry a fire break id.
fn aoi_candidate(data: &[Feature]) -> Option<&Feature> {
    data.iter().rev().find(|f| fire_break_owner(f).is_none())
}

fn aoi_writes(aoi: Option<&Feature>, area_valid: bool) -> Vec<FormWrite> {
    vec![
        FormWrite::MapSelection(MapSelection::Features(aoi.cloned().into_iter().collect())),
        FormWrite::IsMapAreaValid(area_valid),
        FormWrite::IsValidWkt(true),
    ]
}

/// Route a map edit to the area of interest or the selected fire break.
///
/// With a fire break selected, a completed shape is appended to that row's
/// bucket for the selected type and a move updates the row's stored
/// features by id. Without one, the edited area of interest replaces the
/// stored one. `previous_area_valid` is reused for fire break moves, which
/// never change the area of interest.
pub fn on_map_edit_event(
    event: &MapEditEvent,
    form: &SimulationForm,
    selection: Option<&FireBreakContext>,
    previous_area_valid: bool,
    config: &EngineConfig,
) -> Result<EditOutcome> {
    let within_limit = |f: &Feature| is_area_within_limit(f, config.max_area_m2);

    let outcome = match (event.edit_type, selection) {
        (EditType::AddFeature, Some(ctx)) => {
            let area_valid = event.data.first().is_none_or(within_limit);
            let (index, row) = boundary_condition(form, ctx.position)?;
            let writes = match event.data.last() {
                Some(feature) => vec![FormWrite::FireBreak {
                    index,
                    position: ctx.position,
                    value: append_fire_break_feature(
                        &row.fire_break,
                        ctx.position,
                        ctx.fire_break_type,
                        feature.clone(),
                    ),
                }],
                None => Vec::new(),
            };
            EditOutcome { writes, area_valid }
        }
        (EditType::MovePosition, Some(ctx)) => {
            let (index, row) = boundary_condition(form, ctx.position)?;
            EditOutcome {
                writes: vec![FormWrite::FireBreak {
                    index,
                    position: ctx.position,
                    value: replace_fire_break_features(&row.fire_break, &event.data),
                }],
                area_valid: previous_area_valid,
            }
        }
        (_, None) => {
            let aoi = aoi_candidate(&event.data);
            let area_valid = aoi.is_none_or(within_limit);
            EditOutcome {
                writes: aoi_writes(aoi, area_valid),
                area_valid,
            }
        }
    };

    tracing::debug!(
        edit_type = ?event.edit_type,
        selection = ?selection,
        area_valid = outcome.area_valid,
        writes = outcome.writes.len(),
        "Routed map edit"
    );
    Ok(outcome)
}

/// Selection context for a feature picked on the map.
///
/// `None` for features without a composite id, such as the area of interest.
pub fn on_map_select(selected_feature_id: Option<&str>) -> Option<FireBreakContext> {
    selected_feature_id.and_then(parse_fire_break_id)
}

/// Writes for deleting a feature on the map.
///
/// Polygonal features are the area of interest: clearing it resets both
/// validity flags. Anything else is a fire break and is removed from the
/// bucket of the *selected* context, not the one its own id names.
pub fn on_map_delete(
    feature: &Feature,
    form: &SimulationForm,
    selection: Option<&FireBreakContext>,
) -> Result<Vec<FormWrite>> {
    if feature_value(feature).is_some_and(is_polygonal) {
        return Ok(vec![
            FormWrite::MapSelection(MapSelection::default()),
            FormWrite::IsMapAreaValid(true),
            FormWrite::IsMapAreaValidWkt(true),
        ]);
    }

    let id = feature_id(feature);
    let ctx = selection.ok_or_else(|| EngineError::NoFireBreakSelected(id.map(str::to_string)))?;
    let (index, row) = boundary_condition(form, ctx.position)?;

    if let Some(owner) = id.and_then(parse_fire_break_id) {
        if owner != *ctx {
            tracing::warn!(
                id = ?id,
                selected = ?ctx,
                "Deleting fire break from the selected bucket, which is not its owner"
            );
        }
    }

    Ok(vec![FormWrite::FireBreak {
        index,
        position: ctx.position,
        value: remove_fire_break_feature(&row.fire_break, ctx.fire_break_type, id),
    }])
}

/// Writes for text typed or pasted into the WKT field.
///
/// Unparsable text is stored verbatim and flagged. Parsed text becomes a
/// single area-of-interest feature with its coordinate and area checks.
pub fn on_pasted_text(text: &str, config: &EngineConfig) -> Vec<FormWrite> {
    if text.is_empty() {
        return vec![
            FormWrite::MapSelection(MapSelection::default()),
            FormWrite::IsMapAreaValid(true),
        ];
    }

    match wkt::parse(text) {
        Ok(value) => {
            let wkt_valid = are_coordinates_valid(&value, config.coordinate_system);
            let feature = feature_from_value(value);
            let area_valid = is_area_within_limit(&feature, config.max_area_m2);
            vec![
                FormWrite::MapSelection(MapSelection::Features(vec![feature])),
                FormWrite::IsValidWkt(wkt_valid),
                FormWrite::IsMapAreaValid(area_valid),
            ]
        }
        Err(e) => {
            tracing::debug!(error = %e, "Pasted text is not WKT");
            vec![
                FormWrite::MapSelection(MapSelection::Text(text.to_string())),
                FormWrite::IsValidWkt(false),
            ]
        }
    }
}

/// Features the map should display.
pub fn get_display_features(form: &SimulationForm) -> Vec<Feature> {
    flatten_all_features(form.map_selection.features(), &form.boundary_conditions)
}

/// Per-form session state around the pure routing functions.
#[derive(Debug, Clone)]
pub struct GeometryEngine {
    config: EngineConfig,
    draw: DrawModeState,
    selection: Option<FireBreakContext>,
    area_valid: bool,
    fire_break_types: BTreeMap<usize, FireBreakType>,
}

impl GeometryEngine {
    pub fn new(config: EngineConfig) -> Self {
        let fire_break_types = BTreeMap::from([(0, config.default_fire_break_type)]);
        Self {
            config,
            draw: DrawModeState::new(),
            selection: None,
            area_valid: true,
            fire_break_types,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn draw_mode(&self) -> DrawMode {
        self.draw.mode()
    }

    pub fn selection(&self) -> Option<FireBreakContext> {
        self.selection
    }

    /// Last area check, used to style the area of interest.
    pub fn is_area_valid(&self) -> bool {
        self.area_valid
    }

    /// Fire break type chosen in a row's dropdown.
    pub fn fire_break_type(&self, position: usize) -> FireBreakType {
        self.fire_break_types
            .get(&position)
            .copied()
            .unwrap_or(self.config.default_fire_break_type)
    }

    /// Shape the map's draw button starts right now.
    pub fn selected_draw_kind(&self) -> DrawKind {
        DrawKind::for_selection(self.selection.as_ref())
    }

    /// Whether the draw button should render as active.
    pub fn is_draw_type_selected(&self) -> bool {
        self.draw.is_drawing(self.selected_draw_kind())
    }

    /// Request a draw mode directly; `None` means editing.
    pub fn toggle_mode(&mut self, requested: Option<DrawMode>) -> bool {
        self.draw.toggle(requested)
    }

    /// Flip drawing `kind` on or off.
    ///
    /// The area of interest holds a single polygon, so toggling polygon
    /// drawing discards the stored one first.
    pub fn edit_toggle(&mut self, kind: DrawKind, form: &SimulationForm) -> Vec<FormWrite> {
        let mut writes = Vec::new();
        if kind == DrawKind::Polygon && !form.map_selection.is_empty() {
            tracing::debug!("Clearing area of interest before drawing a new polygon");
            self.area_valid = true;
            writes.push(FormWrite::MapSelection(MapSelection::default()));
            writes.push(FormWrite::IsMapAreaValid(true));
        }
        self.draw.edit_toggle(kind);
        writes
    }

    /// The map's draw button: polygon for the area of interest, line for a
    /// selected fire break.
    pub fn on_draw_button(&mut self, form: &SimulationForm) -> Vec<FormWrite> {
        let kind = self.selected_draw_kind();
        self.edit_toggle(kind, form)
    }

    pub fn on_map_edit_event(
        &mut self,
        event: &MapEditEvent,
        form: &SimulationForm,
    ) -> Result<Vec<FormWrite>> {
        let outcome = on_map_edit_event(
            event,
            form,
            self.selection.as_ref(),
            self.area_valid,
            &self.config,
        )?;
        self.area_valid = outcome.area_valid;
        if event.edit_type == EditType::AddFeature {
            self.draw.complete_shape();
        }
        Ok(outcome.writes)
    }

    /// Feature picked on the map. A fire break becomes the selection and
    /// its row's dropdown follows; other picks leave the selection alone.
    pub fn on_map_select(&mut self, selected_feature_id: Option<&str>) -> Option<FireBreakContext> {
        let ctx = on_map_select(selected_feature_id)?;
        tracing::debug!(position = ctx.position, fire_break_type = %ctx.fire_break_type, "Fire break selected on map");
        self.fire_break_types
            .insert(ctx.position, ctx.fire_break_type);
        self.selection = Some(ctx);
        Some(ctx)
    }

    pub fn on_map_delete(&self, feature: &Feature, form: &SimulationForm) -> Result<Vec<FormWrite>> {
        on_map_delete(feature, form, self.selection.as_ref())
    }

    /// The map's trash button. Deletes the feature selected on the map, if
    /// any.
    pub fn on_map_clear(
        &mut self,
        selected_feature: Option<&Feature>,
        form: &SimulationForm,
    ) -> Result<Vec<FormWrite>> {
        self.area_valid = true;
        match selected_feature {
            Some(feature) => self.on_map_delete(feature, form),
            None => Ok(Vec::new()),
        }
    }

    pub fn on_pasted_text(&self, text: &str) -> Vec<FormWrite> {
        on_pasted_text(text, &self.config)
    }

    pub fn display_features(&self, form: &SimulationForm) -> Vec<Feature> {
        get_display_features(form)
    }

    /// A row's Edit/Finish button. Selects the row with its chosen type, or
    /// clears the selection if the row is already selected.
    pub fn on_fire_break_edit_click(&mut self, position: usize) -> Option<FireBreakContext> {
        self.selection = match self.selection {
            Some(ctx) if ctx.position == position => None,
            _ => Some(FireBreakContext::new(
                position,
                self.fire_break_type(position),
            )),
        };
        self.selection
    }

    /// A row's fire break type dropdown changed.
    pub fn set_fire_break_type(&mut self, position: usize, fire_break_type: FireBreakType) {
        self.fire_break_types.insert(position, fire_break_type);
        if let Some(ctx) = self.selection.as_mut() {
            if ctx.position == position {
                ctx.fire_break_type = fire_break_type;
            }
        }
    }

    /// Append a boundary-condition row.
    ///
    /// Refused once there are as many rows as hours of projection.
    pub fn add_boundary_condition(&mut self, form: &SimulationForm) -> Result<Vec<FormWrite>> {
        let count = form.boundary_conditions.len();
        let limit = usize::try_from(form.hours_of_projection).unwrap_or(usize::MAX);
        if count >= limit {
            return Err(EngineError::BoundaryConditionLimit(limit));
        }

        let position = form
            .boundary_conditions
            .iter()
            .map(|row| row.position + 1)
            .max()
            .unwrap_or(0);

        let mut rows = form.boundary_conditions.clone();
        rows.push(BoundaryCondition::new(position));
        self.fire_break_types
            .insert(position, self.config.default_fire_break_type);

        tracing::debug!(position, "Added boundary condition");
        Ok(vec![FormWrite::BoundaryConditions(rows)])
    }

    /// Remove a boundary-condition row. The baseline row stays.
    pub fn remove_boundary_condition(
        &mut self,
        form: &SimulationForm,
        position: usize,
    ) -> Result<Vec<FormWrite>> {
        if position == 0 {
            return Err(EngineError::BaselineRowRemoval);
        }
        boundary_condition(form, position)?;

        let rows = form
            .boundary_conditions
            .iter()
            .filter(|row| row.position != position)
            .cloned()
            .collect();
        self.fire_break_types.remove(&position);
        self.selection = None;

        tracing::debug!(position, "Removed boundary condition");
        Ok(vec![FormWrite::BoundaryConditions(rows)])
    }

    /// The form was closed or reset.
    pub fn close(&mut self) {
        self.selection = None;
        self.draw = DrawModeState::new();
        self.area_valid = true;
    }
}
