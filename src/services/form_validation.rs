// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Simulation form validation.
//!
//! Static field rules are declared on the models with `validator`; rules
//! that depend on configuration or on several fields at once are checked
//! here. Everything is reported as [`FormIssue`]s keyed by form path so the
//! form layer can show each message next to its field.

use crate::config::EngineConfig;
use crate::models::{MapSelection, SimulationForm};
use serde::Serialize;
use std::collections::HashMap;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

pub const EMPTY_FIELD_MESSAGE: &str = "This field cannot be empty";
pub const INVALID_WKT_MESSAGE: &str = "Should contain a valid Well-Known Text";

/// A validation message attached to a form field path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormIssue {
    pub field: String,
    pub message: String,
}

impl FormIssue {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn join(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{prefix}.{field}")
    }
}

fn collect_issues(errors: &ValidationErrors, prefix: &str, issues: &mut Vec<FormIssue>) {
    for (field, kind) in errors.errors() {
        let path = join(prefix, &camel_case(field));
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let message = error
                        .message
                        .as_ref()
                        .map_or_else(|| error.code.to_string(), |m| m.to_string());
                    issues.push(FormIssue::new(path.clone(), message));
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_issues(nested, &path, issues),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_issues(nested, &format!("{path}.{index}"), issues);
                }
            }
        }
    }
}

fn time_limit_message(limit: u32) -> String {
    format!("Simulation time limit must be between 1 and {limit} hours")
}

/// Validate a form snapshot. An empty list means the form can be submitted.
pub fn validate_form(form: &SimulationForm, config: &EngineConfig) -> Vec<FormIssue> {
    let mut issues = Vec::new();
    if let Err(errors) = form.validate() {
        collect_issues(&errors, "", &mut issues);
    }

    let limit = config.simulation_time_limit_hours;
    if !(1..=limit).contains(&form.hours_of_projection) {
        issues.push(FormIssue::new(
            "hoursOfProjection",
            time_limit_message(limit),
        ));
    }
    if usize::try_from(form.hours_of_projection).unwrap_or(usize::MAX)
        < form.boundary_conditions.len()
    {
        issues.push(FormIssue::new(
            "hoursOfProjection",
            "Hours cannot be less than number of Boundary Conditions rows",
        ));
    }

    match &form.map_selection {
        MapSelection::Text(_) => issues.push(FormIssue::new("mapSelection", INVALID_WKT_MESSAGE)),
        MapSelection::Features(features) if features.is_empty() => {
            issues.push(FormIssue::new("mapSelection", EMPTY_FIELD_MESSAGE))
        }
        MapSelection::Features(_) => {}
    }
    if !form.is_map_area_valid {
        issues.push(FormIssue::new(
            "isMapAreaValid",
            format!("Area must be no greater than {}", config.max_area_m2),
        ));
    }
    if !form.is_valid_wkt {
        issues.push(FormIssue::new("isValidWkt", INVALID_WKT_MESSAGE));
    }
    if !form.is_map_area_valid_wkt {
        issues.push(FormIssue::new("isMapAreaValidWKT", INVALID_WKT_MESSAGE));
    }
    if form.ignition_date_time.is_none() {
        issues.push(FormIssue::new("ignitionDateTime", EMPTY_FIELD_MESSAGE));
    }

    let mut offsets: HashMap<u32, usize> = HashMap::new();
    for row in &form.boundary_conditions {
        *offsets.entry(row.time_offset).or_default() += 1;
    }
    for (index, row) in form.boundary_conditions.iter().enumerate() {
        let field = format!("boundaryConditions.{index}.timeOffset");
        if row.time_offset > limit {
            issues.push(FormIssue::new(
                field.clone(),
                format!("Time offset must be between 0 and {limit} hours"),
            ));
        }
        if offsets.get(&row.time_offset).copied().unwrap_or(0) > 1 {
            issues.push(FormIssue::new(field, "Time offset values must be unique"));
        }
    }

    if !issues.is_empty() {
        tracing::debug!(issues = issues.len(), "Form failed validation");
    }
    issues
}
