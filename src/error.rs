// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Engine error types.
//!
//! Bad user geometry (unparsable WKT, out-of-range coordinates, oversized
//! areas) is never an error here; it is reported through form flags. These
//! variants are caller-contract violations only.

/// Invariant violations raised by the coordination engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("Boundary condition {0} does not exist")]
    UnknownBoundaryCondition(usize),

    #[error("No fire break selected for deletion of feature {0:?}")]
    NoFireBreakSelected(Option<String>),

    #[error("The baseline boundary condition cannot be removed")]
    BaselineRowRemoval,

    #[error("Boundary condition limit of {0} rows reached")]
    BoundaryConditionLimit(usize),
}

impl EngineError {
    /// Whether the error came from the caller pointing at a row that isn't there.
    pub fn is_missing_row(&self) -> bool {
        matches!(self, EngineError::UnknownBoundaryCondition(_))
    }
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
