use std::{
    fmt::Display,
    ops::{Add, Sub},
};

use serde::{Deserialize, Serialize};

use crate::error::{CifpResult, Error};

/// Maps any angle into `(0, 360]`, so north is always 360.
pub(crate) fn normalize(degrees: f64) -> f64 {
    let normalized = degrees.rem_euclid(360.0);
    if normalized == 0.0 {
        360.0
    } else {
        normalized
    }
}

/// A heading referenced to true or magnetic north.
///
/// Magnetic variation follows the CIFP convention of east being negative, so
/// `true = magnetic - variation`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reference", rename_all = "camelCase")]
pub enum Course {
    True { degrees: f64 },
    Magnetic { degrees: f64, variation: Option<f64> },
}

impl Course {
    pub fn true_course(degrees: f64) -> Self {
        Self::True { degrees: normalize(degrees) }
    }

    pub fn magnetic(degrees: f64, variation: Option<f64>) -> Self {
        Self::Magnetic { degrees: normalize(degrees), variation }
    }

    pub fn degrees(&self) -> f64 {
        match self {
            Self::True { degrees } | Self::Magnetic { degrees, .. } => *degrees,
        }
    }

    /// `true` for a magnetic course that cannot yet be converted.
    pub fn lacks_variation(&self) -> bool {
        matches!(self, Self::Magnetic { variation: None, .. })
    }

    /// Fills in the variation of a magnetic course. True courses are unchanged.
    pub fn with_variation(self, variation: f64) -> Self {
        match self {
            Self::Magnetic { degrees, .. } => Self::Magnetic { degrees, variation: Some(variation) },
            course => course,
        }
    }

    pub fn true_degrees(&self) -> CifpResult<f64> {
        match self {
            Self::True { degrees } => Ok(*degrees),
            Self::Magnetic { degrees, variation: Some(variation) } => Ok(normalize(degrees - variation)),
            Self::Magnetic { variation: None, .. } => Err(Error::MissingVariation),
        }
    }

    pub fn to_true(&self) -> CifpResult<Course> {
        Ok(Course::true_course(self.true_degrees()?))
    }

    pub fn to_magnetic(&self, variation: f64) -> CifpResult<Course> {
        Ok(Course::magnetic(self.true_degrees()? + variation, Some(variation)))
    }

    pub fn reciprocal(&self) -> Course {
        *self + 180.0
    }

    /// Signed shortest rotation from `self` to `other` in degrees, positive
    /// clockwise. Differences under a thousandth of a degree are zero.
    pub fn angle(&self, other: &Course) -> CifpResult<f64> {
        let (from, to) = match (self, other) {
            (
                Self::Magnetic { degrees: from, variation: from_var },
                Self::Magnetic { degrees: to, variation: to_var },
            ) if from_var == to_var => (*from, *to),
            _ => (self.true_degrees()?, other.true_degrees()?),
        };

        let clockwise = (to - from).rem_euclid(360.0);
        let angle = if clockwise > 180.0 { clockwise - 360.0 } else { clockwise };
        Ok(if angle.abs() < 0.001 { 0.0 } else { angle })
    }
}

impl Add<f64> for Course {
    type Output = Course;
    fn add(self, rhs: f64) -> Self::Output {
        match self {
            Self::True { degrees } => Course::true_course(degrees + rhs),
            Self::Magnetic { degrees, variation } => Course::magnetic(degrees + rhs, variation),
        }
    }
}

impl Sub<f64> for Course {
    type Output = Course;
    fn sub(self, rhs: f64) -> Self::Output {
        self + -rhs
    }
}

impl Display for Course {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::True { degrees } => write!(f, "{:03.0}T", degrees),
            Self::Magnetic { degrees, .. } => write!(f, "{:03.0}M", degrees),
        }
    }
}
