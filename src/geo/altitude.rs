use std::{cmp::Ordering, fmt::Display};

use serde::{Deserialize, Serialize};

use crate::error::{CifpResult, Error};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "reference", rename_all = "camelCase")]
pub enum Altitude {
    Msl { feet: i32 },
    #[serde(rename_all = "camelCase")]
    Agl { feet: i32, ground_elevation: Option<i32> },
    FlightLevel { level: i32 },
}

impl Altitude {
    pub fn msl(feet: i32) -> Self {
        Self::Msl { feet }
    }

    pub fn agl(feet: i32, ground_elevation: Option<i32>) -> Self {
        Self::Agl { feet, ground_elevation }
    }

    pub fn flight_level(level: i32) -> Self {
        Self::FlightLevel { level }
    }

    /// Nominal feet regardless of reference.
    pub fn feet(&self) -> i32 {
        match self {
            Self::Msl { feet } | Self::Agl { feet, .. } => *feet,
            Self::FlightLevel { level } => level * 100,
        }
    }

    pub fn msl_feet(&self) -> CifpResult<i32> {
        match self {
            Self::Msl { feet } => Ok(*feet),
            Self::Agl { feet, ground_elevation: Some(ground) } => Ok(feet + ground),
            Self::Agl { ground_elevation: None, .. } => Err(Error::MissingGroundElevation),
            Self::FlightLevel { level } => Ok(level * 100),
        }
    }

    pub fn to_msl(&self) -> CifpResult<Altitude> {
        Ok(Altitude::msl(self.msl_feet()?))
    }

    pub fn to_agl(&self, ground_elevation: i32) -> CifpResult<Altitude> {
        Ok(Altitude::agl(self.msl_feet()? - ground_elevation, Some(ground_elevation)))
    }

    /// Anchors an AGL altitude to a known field elevation.
    pub fn with_ground_elevation(self, ground_elevation: i32) -> Self {
        match self {
            Self::Agl { feet, .. } => Self::agl(feet, Some(ground_elevation)),
            altitude => altitude,
        }
    }
}

impl PartialEq for Altitude {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Altitude {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (
                Self::Agl { feet: lhs, ground_elevation: None },
                Self::Agl { feet: rhs, ground_elevation: None },
            ) => lhs.partial_cmp(rhs),
            _ => {
                let (lhs, rhs) = (self.msl_feet().ok()?, other.msl_feet().ok()?);
                lhs.partial_cmp(&rhs)
            }
        }
    }
}

impl Display for Altitude {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Msl { feet } => write!(f, "{feet}"),
            Self::Agl { feet, .. } => write!(f, "{feet}AGL"),
            Self::FlightLevel { level } => write!(f, "FL{level:03}"),
        }
    }
}
