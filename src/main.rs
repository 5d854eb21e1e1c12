// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wildfire-Geometry WKT inspector
//!
//! Runs WKT from the first argument (or stdin) through the same paste path
//! the simulation form uses and prints the result as JSON.

use anyhow::Context;
use serde::Serialize;
use std::io::Read;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wildfire_geometry::models::form::FormWrite;
use wildfire_geometry::services::spatial_validator::geodesic_area;
use wildfire_geometry::services::wkt;
use wildfire_geometry::{EngineConfig, GeometryEngine};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report {
    canonical: Option<String>,
    error: Option<String>,
    area_m2: Option<f64>,
    max_area_m2: f64,
    epsg: u32,
    writes: Vec<FormWrite>,
}

fn main() -> anyhow::Result<()> {
    init_logging()?;

    let config = EngineConfig::from_env().context("Failed to load configuration")?;

    let input = match std::env::args().nth(1) {
        Some(arg) => arg,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read WKT from stdin")?;
            buf
        }
    };
    tracing::info!(bytes = input.len(), "Inspecting WKT");

    let parsed = wkt::parse(&input);
    let engine = GeometryEngine::new(config.clone());

    let report = Report {
        canonical: parsed.as_ref().ok().map(wkt::stringify),
        error: parsed.as_ref().err().map(ToString::to_string),
        area_m2: parsed.as_ref().ok().map(|value| geodesic_area(value).ceil()),
        max_area_m2: config.max_area_m2,
        epsg: config.coordinate_system.epsg(),
        writes: engine.on_pasted_text(&input),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Initialize structured JSON logging on stderr.
fn init_logging() -> anyhow::Result<()> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("wildfire_geometry=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
