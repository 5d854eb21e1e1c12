// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Map draw-mode state machine.
//!
//! The map is either editing (selecting and dragging existing shapes) or
//! drawing one new polygon or line string. The two drawing modes never hand
//! over to each other directly; leaving one always lands on editing.

use crate::models::FireBreakContext;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Interaction mode handed to the map renderer, which builds its own
/// mode handler from the tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum DrawMode {
    #[default]
    Editing,
    DrawPolygon,
    DrawLineString,
}

impl DrawMode {
    /// Mode id understood by the renderer.
    pub fn id(self) -> &'static str {
        match self {
            DrawMode::Editing => "editing",
            DrawMode::DrawPolygon => "drawPolygon",
            DrawMode::DrawLineString => "drawLineString",
        }
    }

    /// Tooltip text for the mode's control.
    pub fn label(self) -> &'static str {
        match self {
            DrawMode::Editing => "Edit Feature",
            DrawMode::DrawPolygon => "Draw Polygon",
            DrawMode::DrawLineString => "Draw Line String",
        }
    }

    pub fn is_drawing(self) -> bool {
        !matches!(self, DrawMode::Editing)
    }
}

/// The two shapes the draw button can start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawKind {
    LineString,
    Polygon,
}

impl DrawKind {
    pub fn mode(self) -> DrawMode {
        match self {
            DrawKind::LineString => DrawMode::DrawLineString,
            DrawKind::Polygon => DrawMode::DrawPolygon,
        }
    }

    /// Shape the draw button starts for a selection: the area of interest
    /// is a polygon, fire breaks are lines.
    pub fn for_selection(selection: Option<&FireBreakContext>) -> Self {
        if selection.is_some() {
            DrawKind::LineString
        } else {
            DrawKind::Polygon
        }
    }
}

/// Current draw mode plus the transition rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawModeState {
    mode: DrawMode,
}

impl DrawModeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    /// Switch to `requested`; `None` means editing.
    ///
    /// Requesting the current mode does nothing. Requesting one drawing mode
    /// while in the other turns drawing off instead. Returns whether the
    /// mode changed.
    pub fn toggle(&mut self, requested: Option<DrawMode>) -> bool {
        let requested = requested.unwrap_or_default();
        if requested == self.mode {
            return false;
        }

        let next = if self.mode.is_drawing() && requested.is_drawing() {
            DrawMode::Editing
        } else {
            requested
        };

        tracing::debug!(from = self.mode.id(), to = next.id(), "Draw mode changed");
        self.mode = next;
        true
    }

    /// Flip between drawing `kind` and editing.
    pub fn edit_toggle(&mut self, kind: DrawKind) -> bool {
        let target = kind.mode();
        if self.mode == target {
            self.toggle(Some(DrawMode::Editing))
        } else {
            self.toggle(Some(target))
        }
    }

    /// A shape was completed; always return to editing.
    pub fn complete_shape(&mut self) {
        self.toggle(Some(DrawMode::Editing));
    }

    /// Whether the draw button for `kind` should render as active.
    pub fn is_drawing(&self, kind: DrawKind) -> bool {
        self.mode == kind.mode()
    }
}
