// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Engine routing tests.
//!
//! Each test drives the engine the way the form page does: feed it an
//! event, apply the returned writes to a form snapshot through
//! [`FormStore`], and look at the snapshot afterwards.

use geojson::{Feature, Value};
use wildfire_geometry::models::form::FormWrite;
use wildfire_geometry::models::geometry::{feature_from_value, feature_id};
use wildfire_geometry::models::{
    FireBreakContext, FireBreakType, FormStore, MapSelection, SimulationForm,
};
use wildfire_geometry::services::engine::{
    get_display_features, on_map_delete, on_map_edit_event, on_map_select, on_pasted_text,
};
use wildfire_geometry::services::{DrawKind, DrawMode, EditType, MapEditEvent};
use wildfire_geometry::{EngineConfig, EngineError, GeometryEngine};

mod common;

fn add(data: Vec<Feature>) -> MapEditEvent {
    MapEditEvent {
        edit_type: EditType::AddFeature,
        data,
    }
}

fn moved(data: Vec<Feature>) -> MapEditEvent {
    MapEditEvent {
        edit_type: EditType::MovePosition,
        data,
    }
}

/// Draw one fire break line on `position` with the engine's current type.
fn draw_fire_break(engine: &mut GeometryEngine, form: &mut SimulationForm, position: usize) {
    if engine.selection().map(|ctx| ctx.position) != Some(position) {
        engine.on_fire_break_edit_click(position);
    }
    let mut data = get_display_features(form);
    data.push(common::line_feature(&[(10.0, 10.0), (10.5, 10.5)]));
    let writes = engine
        .on_map_edit_event(&add(data), form)
        .expect("row exists");
    form.apply_writes(writes).expect("writes apply");
}

#[test]
fn test_pasting_empty_text_clears_selection() {
    let config = EngineConfig::default();
    assert_eq!(
        on_pasted_text("", &config),
        vec![
            FormWrite::MapSelection(MapSelection::Features(vec![])),
            FormWrite::IsMapAreaValid(true),
        ]
    );
}

#[test]
fn test_pasting_whitespace_is_kept_as_text() {
    let config = EngineConfig::default();
    assert_eq!(
        on_pasted_text("   \n", &config),
        vec![
            FormWrite::MapSelection(MapSelection::Text("   \n".to_string())),
            FormWrite::IsValidWkt(false),
        ]
    );
}

#[test]
fn test_pasting_deeply_nested_collections_is_invalid() {
    let config = EngineConfig::default();
    let text = "GEOMETRYCOLLECTION (".repeat(5_000);
    assert_eq!(
        on_pasted_text(&text, &config),
        vec![
            FormWrite::MapSelection(MapSelection::Text(text.clone())),
            FormWrite::IsValidWkt(false),
        ]
    );
}

#[test]
fn test_pasting_valid_polygon() {
    let config = EngineConfig::default();
    let writes = on_pasted_text("POLYGON ((10 45, 10.5 45, 10.5 45.5, 10 45.5, 10 45))", &config);

    assert_eq!(writes.len(), 3);
    match &writes[0] {
        FormWrite::MapSelection(MapSelection::Features(features)) => {
            assert_eq!(features.len(), 1);
            assert_eq!(feature_id(&features[0]), None);
        }
        other => panic!("Expected features, got {:?}", other),
    }
    assert_eq!(writes[1], FormWrite::IsValidWkt(true));
    assert_eq!(writes[2], FormWrite::IsMapAreaValid(true));
}

#[test]
fn test_pasting_out_of_range_and_oversized_geometry() {
    let config = EngineConfig::default();

    let writes = on_pasted_text("POINT (200 10)", &config);
    assert_eq!(writes[1], FormWrite::IsValidWkt(false));
    assert_eq!(writes[2], FormWrite::IsMapAreaValid(true));

    let writes = on_pasted_text("POLYGON ((0 0, 3 0, 3 3, 0 3, 0 0))", &config);
    assert_eq!(writes[1], FormWrite::IsValidWkt(true));
    assert_eq!(writes[2], FormWrite::IsMapAreaValid(false));
}

#[test]
fn test_pasting_garbage_keeps_text() {
    let config = EngineConfig::default();
    assert_eq!(
        on_pasted_text("POLYGON ((0 0, 1", &config),
        vec![
            FormWrite::MapSelection(MapSelection::Text("POLYGON ((0 0, 1".to_string())),
            FormWrite::IsValidWkt(false),
        ]
    );
}

#[test]
fn test_new_polygon_draw_clears_existing_aoi() {
    let mut engine = GeometryEngine::new(EngineConfig::default());
    let mut form = SimulationForm::default();
    form.apply_writes(vec![
        FormWrite::MapSelection(MapSelection::Features(vec![common::polygon_feature(
            0.0, 0.0, 3.0,
        )])),
        FormWrite::IsMapAreaValid(false),
    ])
    .expect("writes apply");

    let writes = engine.on_draw_button(&form);
    assert_eq!(
        writes,
        vec![
            FormWrite::MapSelection(MapSelection::default()),
            FormWrite::IsMapAreaValid(true),
        ]
    );
    assert_eq!(engine.draw_mode(), DrawMode::DrawPolygon);
    assert!(engine.is_draw_type_selected());

    form.apply_writes(writes).expect("writes apply");
    assert!(form.map_selection.is_empty());
    assert!(form.is_map_area_valid);
}

#[test]
fn test_line_draw_keeps_aoi() {
    let mut engine = GeometryEngine::new(EngineConfig::default());
    let form = SimulationForm {
        map_selection: MapSelection::Features(vec![common::polygon_feature(0.0, 0.0, 1.0)]),
        ..Default::default()
    };

    engine.on_fire_break_edit_click(0);
    assert_eq!(engine.selected_draw_kind(), DrawKind::LineString);
    assert!(engine.on_draw_button(&form).is_empty());
    assert_eq!(engine.draw_mode(), DrawMode::DrawLineString);
}

#[test]
fn test_aoi_draw_and_move() {
    let mut engine = GeometryEngine::new(EngineConfig::default());
    let mut form = SimulationForm::default();

    engine.on_draw_button(&form);
    let drawn = common::polygon_feature(10.0, 45.0, 0.5);
    let writes = engine
        .on_map_edit_event(&add(vec![drawn.clone()]), &form)
        .expect("no row needed");
    form.apply_writes(writes).expect("writes apply");

    assert_eq!(engine.draw_mode(), DrawMode::Editing);
    assert_eq!(form.map_selection, MapSelection::Features(vec![drawn]));
    assert!(form.is_map_area_valid);
    assert!(engine.is_area_valid());

    // Dragging a vertex far enough makes the area too large.
    let stretched = common::polygon_feature(10.0, 45.0, 4.0);
    let writes = engine
        .on_map_edit_event(&moved(vec![stretched.clone()]), &form)
        .expect("no row needed");
    form.apply_writes(writes).expect("writes apply");

    assert_eq!(form.map_selection, MapSelection::Features(vec![stretched]));
    assert!(!form.is_map_area_valid);
    assert!(!engine.is_area_valid());
    assert!(form.is_valid_wkt);
}

#[test]
fn test_aoi_edit_keeps_only_one_polygon() {
    let config = EngineConfig::default();
    let form = SimulationForm::default();
    let old = common::polygon_feature(0.0, 0.0, 1.0);
    let new = common::polygon_feature(5.0, 5.0, 1.0);

    let outcome = on_map_edit_event(&add(vec![old, new.clone()]), &form, None, true, &config)
        .expect("no row needed");
    assert_eq!(
        outcome.writes[0],
        FormWrite::MapSelection(MapSelection::Features(vec![new]))
    );
}

#[test]
fn test_aoi_edit_ignores_fire_break_features() {
    let mut engine = GeometryEngine::new(EngineConfig::default());
    let mut form = SimulationForm::default();
    draw_fire_break(&mut engine, &mut form, 0);
    engine.on_fire_break_edit_click(0);
    assert_eq!(engine.selection(), None);

    let aoi = common::polygon_feature(0.0, 0.0, 1.0);
    let mut data = get_display_features(&form);
    data.push(aoi.clone());
    data.reverse();

    let writes = engine
        .on_map_edit_event(&moved(data), &form)
        .expect("no row needed");
    form.apply_writes(writes).expect("writes apply");
    assert_eq!(form.map_selection, MapSelection::Features(vec![aoi]));
    assert_eq!(
        form.boundary_conditions[0].fire_break_features(FireBreakType::Canadair).len(),
        1
    );
}

#[test]
fn test_fire_break_add_appends_to_selected_bucket() {
    let mut engine = GeometryEngine::new(EngineConfig::default());
    let mut form = common::form_with_rows(2);

    engine.set_fire_break_type(1, FireBreakType::Vehicle);
    draw_fire_break(&mut engine, &mut form, 1);
    draw_fire_break(&mut engine, &mut form, 1);

    let row = form.boundary_condition(1).expect("row exists");
    let ids: Vec<_> = row
        .fire_break_features(FireBreakType::Vehicle)
        .iter()
        .filter_map(feature_id)
        .collect();
    assert_eq!(ids, vec!["vehicle-1-0", "vehicle-1-1"]);
    assert!(form.boundary_conditions[0].fire_break.is_empty());
    assert!(form.map_selection.is_empty(), "Fire breaks never touch the AOI");
    assert_eq!(
        row.fire_break_wkt(FireBreakType::Vehicle),
        "GEOMETRYCOLLECTION (LINESTRING (10.000000 10.000000, 10.500000 10.500000), \
         LINESTRING (10.000000 10.000000, 10.500000 10.500000))"
    );
}

#[test]
fn test_fire_break_move_reuses_area_flag() {
    let config = EngineConfig::default();
    let mut engine = GeometryEngine::new(config.clone());
    let mut form = SimulationForm::default();
    draw_fire_break(&mut engine, &mut form, 0);

    let ctx = engine.selection().expect("row 0 selected");
    let mut feature = form.boundary_conditions[0].fire_break_features(ctx.fire_break_type)[0].clone();
    feature.geometry = common::line_feature(&[(20.0, 20.0), (21.0, 21.0)]).geometry;

    let outcome = on_map_edit_event(&moved(vec![feature.clone()]), &form, Some(&ctx), false, &config)
        .expect("row exists");
    assert!(!outcome.area_valid);

    form.apply_writes(outcome.writes).expect("writes apply");
    let bucket = form.boundary_conditions[0].fire_break_features(ctx.fire_break_type);
    assert_eq!(bucket.len(), 1);
    assert_eq!(bucket[0].geometry, feature.geometry);
}

#[test]
fn test_fire_break_edit_on_missing_row() {
    let config = EngineConfig::default();
    let form = SimulationForm::default();
    let ctx = FireBreakContext::new(4, FireBreakType::Canadair);

    let err = on_map_edit_event(
        &add(vec![common::line_feature(&[(0.0, 0.0), (1.0, 1.0)])]),
        &form,
        Some(&ctx),
        true,
        &config,
    )
    .expect_err("row 4 does not exist");
    assert!(err.is_missing_row());
}

#[test]
fn test_map_select_parses_id() {
    assert_eq!(
        on_map_select(Some("helicopter-3-1")),
        Some(FireBreakContext::new(3, FireBreakType::Helicopter))
    );
    assert_eq!(on_map_select(Some("not-an-id")), None);
    assert_eq!(on_map_select(None), None);

    let mut engine = GeometryEngine::new(EngineConfig::default());
    engine.on_map_select(Some("helicopter-3-1"));
    assert_eq!(engine.fire_break_type(3), FireBreakType::Helicopter);
    assert_eq!(
        engine.selection(),
        Some(FireBreakContext::new(3, FireBreakType::Helicopter))
    );

    // Picking the AOI leaves the selection alone.
    assert_eq!(engine.on_map_select(None), None);
    assert!(engine.selection().is_some());
}

#[test]
fn test_delete_polygon_clears_aoi() {
    let form = SimulationForm {
        map_selection: MapSelection::Features(vec![common::polygon_feature(0.0, 0.0, 1.0)]),
        ..Default::default()
    };
    let writes = on_map_delete(&common::polygon_feature(0.0, 0.0, 1.0), &form, None)
        .expect("polygon delete needs no selection");
    assert_eq!(
        writes,
        vec![
            FormWrite::MapSelection(MapSelection::default()),
            FormWrite::IsMapAreaValid(true),
            FormWrite::IsMapAreaValidWkt(true),
        ]
    );
}

#[test]
fn test_delete_fire_break_uses_selected_bucket() {
    let mut engine = GeometryEngine::new(EngineConfig::default());
    let mut form = SimulationForm::default();
    draw_fire_break(&mut engine, &mut form, 0);
    draw_fire_break(&mut engine, &mut form, 0);

    let target = form.boundary_conditions[0].fire_break_features(FireBreakType::Canadair)[0].clone();
    let writes = engine.on_map_delete(&target, &form).expect("selection set");
    form.apply_writes(writes).expect("writes apply");

    let ids: Vec<_> = form.boundary_conditions[0]
        .fire_break_features(FireBreakType::Canadair)
        .iter()
        .filter_map(feature_id)
        .collect();
    assert_eq!(ids, vec!["canadair-0-1"]);
}

#[test]
fn test_delete_fire_break_without_selection() {
    let form = SimulationForm::default();
    let line = common::line_feature(&[(0.0, 0.0), (1.0, 1.0)]);
    assert_eq!(
        on_map_delete(&line, &form, None),
        Err(EngineError::NoFireBreakSelected(None))
    );
}

#[test]
fn test_trash_button() {
    let mut engine = GeometryEngine::new(EngineConfig::default());
    let form = SimulationForm::default();
    assert_eq!(engine.on_map_clear(None, &form), Ok(vec![]));

    let writes = engine
        .on_map_clear(Some(&common::polygon_feature(0.0, 0.0, 1.0)), &form)
        .expect("polygon delete");
    assert_eq!(writes.len(), 3);
    assert!(engine.is_area_valid());
}

#[test]
fn test_edit_click_toggles_selection() {
    let mut engine = GeometryEngine::new(EngineConfig::default());
    assert_eq!(
        engine.on_fire_break_edit_click(0),
        Some(FireBreakContext::new(0, FireBreakType::Canadair))
    );
    assert_eq!(engine.on_fire_break_edit_click(0), None);

    engine.on_fire_break_edit_click(0);
    engine.set_fire_break_type(1, FireBreakType::WaterLine);
    assert_eq!(
        engine.on_fire_break_edit_click(1),
        Some(FireBreakContext::new(1, FireBreakType::WaterLine))
    );
}

#[test]
fn test_type_change_follows_selected_row() {
    let mut engine = GeometryEngine::new(EngineConfig::default());
    engine.on_fire_break_edit_click(0);
    engine.set_fire_break_type(0, FireBreakType::Vehicle);
    assert_eq!(
        engine.selection(),
        Some(FireBreakContext::new(0, FireBreakType::Vehicle))
    );

    engine.set_fire_break_type(2, FireBreakType::Helicopter);
    assert_eq!(
        engine.selection().map(|ctx| ctx.fire_break_type),
        Some(FireBreakType::Vehicle)
    );
}

#[test]
fn test_configured_default_type() {
    let config = EngineConfig {
        default_fire_break_type: FireBreakType::Helicopter,
        ..Default::default()
    };
    let mut engine = GeometryEngine::new(config);
    assert_eq!(engine.fire_break_type(0), FireBreakType::Helicopter);
    assert_eq!(engine.fire_break_type(9), FireBreakType::Helicopter);
    assert_eq!(
        engine.on_fire_break_edit_click(0).map(|ctx| ctx.fire_break_type),
        Some(FireBreakType::Helicopter)
    );
}

#[test]
fn test_add_and_remove_rows() {
    let mut engine = GeometryEngine::new(EngineConfig::default());
    let mut form = SimulationForm {
        hours_of_projection: 3,
        ..Default::default()
    };

    for _ in 0..2 {
        let writes = engine.add_boundary_condition(&form).expect("under the limit");
        form.apply_writes(writes).expect("writes apply");
    }
    let positions: Vec<_> = form.boundary_conditions.iter().map(|r| r.position).collect();
    assert_eq!(positions, vec![0, 1, 2]);
    assert_eq!(form.boundary_conditions[2].time_offset, 2);

    assert_eq!(
        engine.add_boundary_condition(&form),
        Err(EngineError::BoundaryConditionLimit(3))
    );

    engine.on_fire_break_edit_click(1);
    let writes = engine
        .remove_boundary_condition(&form, 1)
        .expect("row 1 exists");
    form.apply_writes(writes).expect("writes apply");
    assert_eq!(engine.selection(), None);

    let positions: Vec<_> = form.boundary_conditions.iter().map(|r| r.position).collect();
    assert_eq!(positions, vec![0, 2], "Remaining rows keep their positions");

    let writes = engine.add_boundary_condition(&form).expect("room again");
    form.apply_writes(writes).expect("writes apply");
    assert_eq!(form.boundary_conditions.last().map(|r| r.position), Some(3));
}

#[test]
fn test_fire_break_path_after_row_removal() {
    let mut engine = GeometryEngine::new(EngineConfig::default());
    let mut form = SimulationForm {
        hours_of_projection: 3,
        ..Default::default()
    };
    for _ in 0..2 {
        let writes = engine.add_boundary_condition(&form).expect("under the limit");
        form.apply_writes(writes).expect("writes apply");
    }
    let writes = engine
        .remove_boundary_condition(&form, 1)
        .expect("row 1 exists");
    form.apply_writes(writes).expect("writes apply");

    engine.on_fire_break_edit_click(2);
    let data = vec![common::line_feature(&[(0.0, 0.0), (1.0, 1.0)])];
    let writes = engine
        .on_map_edit_event(&add(data), &form)
        .expect("row 2 exists");

    // Row 2 now sits at index 1, and form paths address rows by index.
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].path(), "boundaryConditions.1.fireBreak");

    form.apply_writes(writes).expect("writes apply");
    assert!(form.boundary_conditions[0].fire_break.is_empty());
    let row = form.boundary_condition(2).expect("row 2 exists");
    assert_eq!(row.fire_break_features(FireBreakType::Canadair).len(), 1);

    // Deletes address the same index.
    let target = row.fire_break_features(FireBreakType::Canadair)[0].clone();
    let writes = engine.on_map_delete(&target, &form).expect("selection set");
    assert_eq!(writes[0].path(), "boundaryConditions.1.fireBreak");
}

#[test]
fn test_stale_fire_break_write_is_rejected() {
    let mut form = common::form_with_rows(2);
    let write = FormWrite::FireBreak {
        index: 1,
        position: 5,
        value: Default::default(),
    };
    assert_eq!(
        form.apply_writes(vec![write]),
        Err(EngineError::UnknownBoundaryCondition(5))
    );
}

#[test]
fn test_row_removal_errors() {
    let mut engine = GeometryEngine::new(EngineConfig::default());
    let form = common::form_with_rows(2);
    assert_eq!(
        engine.remove_boundary_condition(&form, 0),
        Err(EngineError::BaselineRowRemoval)
    );
    assert_eq!(
        engine.remove_boundary_condition(&form, 5),
        Err(EngineError::UnknownBoundaryCondition(5))
    );
}

#[test]
fn test_display_features() {
    let mut engine = GeometryEngine::new(EngineConfig::default());
    let mut form = common::form_with_rows(2);
    let aoi = common::polygon_feature(0.0, 0.0, 1.0);
    form.map_selection = MapSelection::Features(vec![aoi.clone()]);

    draw_fire_break(&mut engine, &mut form, 1);
    draw_fire_break(&mut engine, &mut form, 0);

    let shown = engine.display_features(&form);
    let ids: Vec<_> = shown.iter().map(feature_id).collect();
    assert_eq!(ids, vec![None, Some("canadair-0-0"), Some("canadair-1-0")]);
    assert_eq!(shown[0], aoi);

    form.map_selection = MapSelection::Text("POLYGON ((".to_string());
    assert_eq!(engine.display_features(&form).len(), 2);
}

#[test]
fn test_close_resets_session() {
    let mut engine = GeometryEngine::new(EngineConfig::default());
    let form = SimulationForm::default();
    engine.on_fire_break_edit_click(0);
    engine.on_draw_button(&form);
    assert_eq!(engine.draw_mode(), DrawMode::DrawLineString);

    engine.close();
    assert_eq!(engine.selection(), None);
    assert_eq!(engine.draw_mode(), DrawMode::Editing);
    assert!(engine.is_area_valid());
}

#[test]
fn test_writes_serialize_with_paths() {
    let write = FormWrite::FireBreak {
        index: 2,
        position: 4,
        value: Default::default(),
    };
    let json = serde_json::to_value(&write).expect("serializes");
    assert_eq!(json["path"], "boundaryConditions.2.fireBreak");

    let write = FormWrite::MapSelection(MapSelection::Features(vec![feature_from_value(
        Value::Point(vec![1.0, 2.0]),
    )]));
    let json = serde_json::to_value(&write).expect("serializes");
    assert_eq!(json["path"], "mapSelection");
    assert_eq!(json["value"][0]["geometry"]["type"], "Point");
}
