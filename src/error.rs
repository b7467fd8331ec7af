//! Error types for body construction and registry access.

use thiserror::Error;

use crate::world::BodyHandle;

/// Result type used by the factory and registry operations.
pub type Result<T> = std::result::Result<T, PhysicsError>;

/// Errors raised when a caller hands the world degenerate geometry or a
/// handle that no longer refers to a live body.
///
/// The step pipeline itself never fails; every variant here comes from
/// construction or lookup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    /// Circle radius was zero, negative or not finite.
    #[error("invalid radius: {0} (must be positive)")]
    InvalidRadius(f64),

    /// Box width or height was zero, negative or not finite.
    #[error("invalid dimensions: {width} x {height} (both must be positive)")]
    InvalidDimensions {
        /// Requested width.
        width: f64,
        /// Requested height.
        height: f64,
    },

    /// Explicit mass was zero, negative or not finite.
    #[error("invalid mass: {0} (must be positive)")]
    InvalidMass(f64),

    /// Restitution outside of `[0, 1]`.
    #[error("invalid restitution: {0} (must be within [0, 1])")]
    InvalidRestitution(f64),

    /// Segment start and end coincide.
    #[error("degenerate segment: start and end are both at ({x}, {y})")]
    DegenerateSegment {
        /// X coordinate of the shared endpoint.
        x: f64,
        /// Y coordinate of the shared endpoint.
        y: f64,
    },

    /// A position, velocity or angle contained NaN or infinity.
    #[error("non-finite {0}")]
    NonFinite(&'static str),

    /// Soft grid with no cells or a non-positive spacing.
    #[error("invalid soft grid: {cols} x {rows} with spacing {spacing}")]
    InvalidGrid {
        /// Number of lattice columns.
        cols: usize,
        /// Number of lattice rows.
        rows: usize,
        /// Distance between neighbouring points.
        spacing: f64,
    },

    /// Negative or non-finite spring resting length.
    #[error("invalid spring resting length: {0}")]
    InvalidRestLength(f64),

    /// Both spring ends refer to the same body.
    #[error("spring endpoints must be different bodies")]
    SelfSpring,

    /// Handle was issued before the last reset or never existed.
    #[error("stale body handle {0:?}")]
    StaleHandle(BodyHandle),
}
