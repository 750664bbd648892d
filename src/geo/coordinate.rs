use std::{
    fmt::Display,
    ops::{Add, Sub},
    str::FromStr,
};

use aviation_calc_util::geo::GeoPoint;
use serde::{Deserialize, Serialize};

use crate::error::{CifpResult, Error};

use super::{geodesy, Course};

/// A WGS-84 position in signed decimal degrees (south and west negative).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Projects this point `distance` nmi along `bearing`.
    pub fn fix_radial_distance(&self, bearing: &Course, distance: f64) -> CifpResult<Coordinate> {
        Ok(geodesy::destination(*self, bearing.true_degrees()?, distance))
    }

    /// Initial true bearing and ellipsoidal distance to `other`.
    pub fn bearing_distance_to(&self, other: &Coordinate) -> (Option<Course>, f64) {
        let (bearing, distance) = geodesy::inverse(*self, *other);
        (bearing.map(Course::true_course), distance)
    }

    fn geo_point(&self) -> GeoPoint {
        GeoPoint::from_degs_and_ft(self.lat, self.lon, 0_f64)
    }

    /// Great circle distance in nmi. Cheaper than [`Self::bearing_distance_to`].
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        (other.geo_point() - self.geo_point()).as_nautical_miles()
    }

    /// Great circle initial true bearing, `None` for coincident points.
    pub fn initial_bearing_to(&self, other: &Coordinate) -> Option<Course> {
        if self == other {
            return None;
        }
        let bearing = GeoPoint::initial_bearing(&self.geo_point(), &other.geo_point());
        Some(Course::true_course(bearing.as_radians().to_degrees()))
    }

    /// Formats as `N/S DDMMSSss` + `E/W DDDMMSSss` with hundredths of seconds.
    pub fn to_dms(&self) -> String {
        fn split(value: f64) -> (u64, u64, u64) {
            let hundredths = (value.abs() * 360_000.0).round() as u64;
            (hundredths / 360_000, (hundredths / 6_000) % 60, hundredths % 6_000)
        }

        let (lat_deg, lat_min, lat_sec) = split(self.lat);
        let (lon_deg, lon_min, lon_sec) = split(self.lon);
        format!(
            "{}{:02}{:02}{:04}{}{:03}{:02}{:04}",
            if self.lat < 0.0 { 'S' } else { 'N' },
            lat_deg,
            lat_min,
            lat_sec,
            if self.lon < 0.0 { 'W' } else { 'E' },
            lon_deg,
            lon_min,
            lon_sec
        )
    }
}

/// Converts `DDDMMSS[fraction]` digits to decimal degrees.
fn dms_to_decimal(digits: &str) -> Option<f64> {
    if digits.len() < 7 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let degrees: f64 = digits[0..3].parse().ok()?;
    let minutes: f64 = digits[3..5].parse().ok()?;
    let seconds: f64 = if digits.len() > 7 {
        format!("{}.{}", &digits[5..7], &digits[7..]).parse().ok()?
    } else {
        digits[5..7].parse().ok()?
    };

    Some(degrees + minutes / 60.0 + seconds / 3600.0)
}

impl FromStr for Coordinate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidCoordinate(s.to_owned());
        let token = s.trim();
        if token.len() < 7 || !token.is_ascii() {
            return Err(invalid());
        }

        let lat_sign = match token.as_bytes()[0] {
            b'N' => 1.0,
            b'S' => -1.0,
            _ => return Err(invalid()),
        };
        let split = token.rfind(|c| c == 'E' || c == 'W').ok_or_else(invalid)?;
        if (token.len() / 2).abs_diff(split) > 1 {
            return Err(invalid());
        }
        let lon_sign = if token.as_bytes()[split] == b'W' { -1.0 } else { 1.0 };

        let (lat_digits, lon_digits) = (&token[1..split], &token[split + 1..]);
        let (lat, lon) = if split == 3 {
            (
                lat_digits.parse::<u8>().map_err(|_| invalid())? as f64,
                lon_digits.parse::<u8>().map_err(|_| invalid())? as f64,
            )
        } else {
            (
                dms_to_decimal(&format!("0{lat_digits}")).ok_or_else(invalid)?,
                dms_to_decimal(lon_digits).ok_or_else(invalid)?,
            )
        };

        Ok(Coordinate::new(lat * lat_sign, lon * lon_sign))
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_dms())
    }
}

impl Add for Coordinate {
    type Output = Coordinate;
    fn add(self, rhs: Self) -> Self::Output {
        Coordinate::new(self.lat + rhs.lat, self.lon + rhs.lon)
    }
}

impl Sub for Coordinate {
    type Output = Coordinate;
    fn sub(self, rhs: Self) -> Self::Output {
        Coordinate::new(self.lat - rhs.lat, self.lon - rhs.lon)
    }
}
