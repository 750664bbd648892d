use thiserror::Error;

use crate::geo::Coordinate;

pub type CifpResult<T> = Result<T, Error>;

/// Everything that can go wrong while parsing records, assembling the model or
/// flying guidance.
#[derive(Debug, Error)]
pub enum Error {
    /// A fixed column did not hold one of its expected values.
    #[error("Invalid record format; failed on character {column}")]
    Format { column: usize },

    #[error("Invalid coordinate {0:?}")]
    InvalidCoordinate(String),

    #[error("Invalid runway identifier {0:?}")]
    InvalidRunway(String),

    #[error("Unknown path termination {0:?}")]
    InvalidPathTermination(String),

    // Resolution
    #[error("Unknown waypoint {0}")]
    UnknownFix(String),

    #[error("Could not resolve waypoint {0} without context")]
    AmbiguousFix(String),

    #[error("No magnetic variation found near {0}")]
    MagneticVariationNotFound(Coordinate),

    #[error("{kind} transition {name} was not found")]
    UnknownTransition { kind: &'static str, name: String },

    #[error("Approaches do not have outbound transitions")]
    OutboundApproachTransition,

    #[error("Procedure has no legs")]
    EmptyProcedure,

    #[error("Airway {0} needs at least two fixes")]
    ShortAirway(String),

    // Geometry
    #[error("Arc from {from} does not lie {distance:.1}nmi from its origin {origin}")]
    ArcMisaligned {
        from: Coordinate,
        origin: Coordinate,
        distance: f64,
    },

    #[error("Last segment must return to origin")]
    OpenBoundary,

    #[error("Unsupported airspace boundary: {0}")]
    UnsupportedBoundary(&'static str),

    // Usage
    #[error("Magnetic course has no variation")]
    MissingVariation,

    #[error("AGL altitude has no ground elevation")]
    MissingGroundElevation,

    #[error("Airspace boundary has no vertical bounds")]
    MissingVerticalBounds,

    #[error("Guidance has no resolved position for {0}")]
    FloatingGuidance(String),

    #[error("Cannot fly an arc with radius {0}")]
    DegenerateArc(f64),

    #[error("Holding pattern at {0} has neither a leg distance nor a leg time")]
    IncompleteHold(String),

    #[error("Termination {0} is not supported by this endpoint")]
    UnsupportedTermination(String),

    #[error("Invalid altitude restriction: {0}")]
    AltitudeRestriction(&'static str),

    #[error("Invalid restriction string {0:?}")]
    InvalidRestriction(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn format(column: usize) -> Self {
        Self::Format { column }
    }
}
