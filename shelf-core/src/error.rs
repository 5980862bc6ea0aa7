//! Error types for room validation and shelf planning.

use thiserror::Error;

use crate::input::Wall;

/// Reasons a room cannot be shelved.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    /// Usable height (room height minus ceiling clearance) is below every tier.
    #[error("no shelf height fits the 40 cm ceiling clearance (usable height {usable} cm)")]
    NoFeasibleTier {
        /// Room height minus the ceiling clearance.
        usable: f64,
    },

    /// A wall was selected for shelving but no catalog depth fits its clearance.
    #[error("no shelf depth fits wall {wall}{}", clearance_hint(.wall))]
    NoFeasibleDepth {
        /// The wall that cannot hold a shelf.
        wall: Wall,
    },
}

fn clearance_hint(wall: &Wall) -> &'static str {
    match wall {
        Wall::A => "",
        Wall::B => " within clearance C",
        Wall::E => " within clearance D",
    }
}

/// Result type for planning operations.
pub type PlanResult<T> = std::result::Result<T, PlanError>;

/// Problems found while validating a room record at the boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    /// A measurement is negative, NaN, infinite or beyond `MAX_MEASUREMENT`.
    #[error("invalid measurement {field}: {value} (must be between 0 and 100000 cm)")]
    InvalidMeasurement {
        /// Field name as it appears in the input record.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A wall identifier outside {A, B, E}.
    #[error("unknown wall '{0}' (expected one of A, B, E)")]
    UnknownWall(String),

    /// A shape tag other than "L" or "U".
    #[error("unknown shape '{0}' (expected L or U)")]
    UnknownShape(String),
}
