use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    error::{CifpResult, Error},
    geo::{Altitude, Coordinate, Course},
};

use super::field::RecordLine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AirportUsage {
    Civil,
    Military,
    Private,
    Joint,
    Unspecified,
}

impl TryFrom<char> for AirportUsage {
    type Error = Error;
    fn try_from(value: char) -> Result<Self, Self::Error> {
        Ok(match value {
            'C' => Self::Civil,
            'M' => Self::Military,
            'P' => Self::Private,
            'J' => Self::Joint,
            ' ' => Self::Unspecified,
            _ => return Err(Error::format(80)),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AerodromeKind {
    #[serde(rename_all = "camelCase")]
    Airport { max_runway_length: u32 },
    Heliport { pad: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aerodrome {
    pub client: String,
    pub identifier: String,
    pub iata: Option<String>,
    pub kind: AerodromeKind,
    pub ifr: bool,
    pub location: Coordinate,
    pub magnetic_variation: f64,
    pub elevation: Altitude,
    pub transition_altitude: Altitude,
    pub transition_level: Altitude,
    pub usage: AirportUsage,
    pub name: String,
    pub file_record_number: u32,
    pub cycle: u16,
}

impl Aerodrome {
    pub fn try_from_line(line: &RecordLine) -> CifpResult<Self> {
        line.check(0, 1, &["S"])?;
        line.check(4, 6, &["P ", "H "])?;
        line.check(12, 13, &["A"])?;

        let kind = match line.char_at(4) {
            'P' => AerodromeKind::Airport {
                max_runway_length: line.optional_number::<u32>(27, 30)?.unwrap_or_default() * 100,
            },
            _ => AerodromeKind::Heliport {
                pad: line.optional_text(16, 21),
            },
        };

        let transition_altitude = line.optional_number(70, 75)?.unwrap_or(18000);
        let transition_level = line
            .optional_number::<i32>(75, 80)?
            .map(|feet| feet / 100)
            .unwrap_or(180);

        Ok(Self {
            client: line.text(1, 4),
            identifier: line.text(6, 10),
            iata: line.optional_text(13, 16),
            kind,
            ifr: line.char_at(30) == 'Y',
            location: line.coordinate(32, 51)?,
            magnetic_variation: line
                .magnetic_variation(51, 52, 56)?
                .ok_or(Error::format(52))?,
            elevation: Altitude::msl(line.number(56, 61)?),
            transition_altitude: Altitude::msl(transition_altitude),
            transition_level: Altitude::flight_level(transition_level),
            usage: AirportUsage::try_from(line.char_at(80))?,
            name: line.text(93, 123),
            file_record_number: line.file_record_number()?,
            cycle: line.cycle()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RunwayModifier {
    None,
    Left,
    Center,
    Right,
}

impl RunwayModifier {
    pub fn opposite(&self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            modifier => *modifier,
        }
    }
}

impl Display for RunwayModifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => Ok(()),
            Self::Left => write!(f, "L"),
            Self::Center => write!(f, "C"),
            Self::Right => write!(f, "R"),
        }
    }
}

/// A runway designator such as `27R`, or the cardinal designator of a
/// waterway (`NE`).
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RunwayIdentifier {
    Numbered { number: u8, modifier: RunwayModifier },
    Waterway(String),
}

impl RunwayIdentifier {
    /// The designator of the same strip flown the other way.
    pub fn opposite(&self) -> Self {
        match self {
            Self::Numbered { number, modifier } => Self::Numbered {
                number: (number + 17) % 36 + 1,
                modifier: modifier.opposite(),
            },
            Self::Waterway(heading) => Self::Waterway(
                heading
                    .chars()
                    .map(|c| match c {
                        'N' => 'S',
                        'S' => 'N',
                        'E' => 'W',
                        _ => 'E',
                    })
                    .collect(),
            ),
        }
    }
}

impl FromStr for RunwayIdentifier {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix("RW").unwrap_or(s);
        if !s.is_empty() && s.len() <= 2 && s.chars().all(|c| "NSEW".contains(c)) {
            return Ok(Self::Waterway(s.to_owned()));
        }

        let digits = s.chars().take_while(char::is_ascii_digit).count();
        let number: u8 = s[..digits]
            .parse()
            .map_err(|_| Error::InvalidRunway(s.to_owned()))?;
        if !(1..=36).contains(&number) {
            return Err(Error::InvalidRunway(s.to_owned()));
        }
        let modifier = match &s[digits..] {
            "" => RunwayModifier::None,
            "L" => RunwayModifier::Left,
            "C" => RunwayModifier::Center,
            "R" => RunwayModifier::Right,
            _ => return Err(Error::InvalidRunway(s.to_owned())),
        };

        Ok(Self::Numbered { number, modifier })
    }
}

impl TryFrom<String> for RunwayIdentifier {
    type Error = Error;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RunwayIdentifier> for String {
    fn from(value: RunwayIdentifier) -> Self {
        value.to_string()
    }
}

impl Display for RunwayIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Numbered { number, modifier } => write!(f, "{:02}{}", number, modifier),
            Self::Waterway(heading) => write!(f, "{heading}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApproachCategory {
    Localizer,
    CatI,
    CatII,
    CatIII,
    Igs,
    LdaWithGlideslope,
    LdaNoGlideslope,
    SdfWithGlideslope,
    SdfNoGlideslope,
    NoApproach,
}

impl TryFrom<char> for ApproachCategory {
    type Error = Error;
    fn try_from(value: char) -> Result<Self, Self::Error> {
        Ok(match value {
            '0' => Self::Localizer,
            '1' => Self::CatI,
            '2' => Self::CatII,
            '3' => Self::CatIII,
            'I' => Self::Igs,
            'L' => Self::LdaWithGlideslope,
            'A' => Self::LdaNoGlideslope,
            'S' => Self::SdfWithGlideslope,
            'F' => Self::SdfNoGlideslope,
            ' ' => Self::NoApproach,
            _ => return Err(Error::format(85)),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Runway {
    pub client: String,
    pub airport: String,
    pub identifier: RunwayIdentifier,
    pub length: u32,
    pub width: Option<u32>,
    pub course: Course,
    pub threshold: Coordinate,
    pub displacement: Option<u32>,
    pub touchdown_zone_elevation: Option<Altitude>,
    pub threshold_crossing_height: Option<Altitude>,
    pub approach: Option<String>,
    pub approach_category: ApproachCategory,
    pub file_record_number: u32,
    pub cycle: u16,
}

impl Runway {
    pub fn try_from_line(line: &RecordLine) -> CifpResult<Self> {
        line.check(0, 1, &["S"])?;
        line.check(4, 6, &["P "])?;
        line.check(12, 13, &["G"])?;

        let identifier = line.text(13, 18);
        let identifier: RunwayIdentifier = match identifier.strip_prefix("RW") {
            Some(designator) => designator.parse().map_err(|_| Error::format(15))?,
            None if identifier.len() <= 2 => identifier.parse().map_err(|_| Error::format(13))?,
            None => return Err(Error::format(13)),
        };
        line.check_empty(18, 21)?;
        line.check(21, 22, &["0"])?;
        line.check_empty(31, 32)?;
        line.check_empty(51, 60)?;

        let course = match (&identifier, line.optional_scaled(27, 31, 10.0)?) {
            (_, Some(course)) => Course::magnetic(course, None),
            (RunwayIdentifier::Waterway(_), None) => Course::magnetic(360.0, None),
            (_, None) => return Err(Error::format(27)),
        };
        let touchdown_zone_elevation = line.optional_number::<i32>(66, 71)?;
        let threshold_crossing_height = line
            .optional_number::<i32>(75, 77)?
            .map(|feet| Altitude::agl(feet, touchdown_zone_elevation));

        Ok(Self {
            client: line.text(1, 4),
            airport: line.text(6, 10),
            identifier,
            length: line.number(22, 27)?,
            width: line.optional_number(77, 80)?,
            course,
            threshold: line.coordinate(32, 51)?,
            displacement: line.optional_number(71, 75)?,
            touchdown_zone_elevation: touchdown_zone_elevation.map(Altitude::msl),
            threshold_crossing_height,
            approach: line.optional_text(81, 85),
            approach_category: ApproachCategory::try_from(line.char_at(85))?,
            file_record_number: line.file_record_number()?,
            cycle: line.cycle()?,
        })
    }

    /// Fix table names for the threshold: `RW27R` and `KATL/RW27R`.
    pub fn fix_names(&self) -> [String; 2] {
        let name = format!("RW{}", self.identifier);
        [format!("{}/{}", self.airport, name), name]
    }
}

/// Landing threshold point of an RNAV approach path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathPoint {
    pub client: String,
    pub airport: String,
    pub approach: String,
    pub runway: String,
    pub position: Coordinate,
    pub threshold_crossing_height: f64,
    pub file_record_number: u32,
    pub cycle: u16,
}

impl PathPoint {
    pub fn try_from_line(line: &RecordLine) -> CifpResult<Option<Self>> {
        line.check(0, 1, &["S"])?;
        line.check(4, 6, &["P "])?;
        line.check(12, 13, &["P"])?;
        line.check(24, 26, &["00"])?;
        if line.char_at(26) >= '2' {
            return Ok(None);
        }
        // Feet, not metres
        line.check(108, 109, &["F"])?;

        Ok(Some(Self {
            client: line.text(1, 4),
            airport: line.text(6, 10),
            approach: line.text(13, 19),
            runway: line.text(19, 24),
            position: line.coordinate(37, 60)?,
            threshold_crossing_height: line.scaled(102, 108, 10.0)?,
            file_record_number: line.file_record_number()?,
            cycle: line.cycle()?,
        }))
    }

    pub fn fix_names(&self) -> [String; 2] {
        [format!("{}/{}", self.airport, self.runway), self.runway.clone()]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MsaSector {
    pub from: Course,
    pub to: Course,
    pub altitude: Altitude,
    pub radius: f64,
}

/// Minimum sector altitudes around an aerodrome fix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirportMsa {
    pub client: String,
    pub airport: String,
    pub center_fix: String,
    pub multi_code: char,
    pub sectors: Vec<MsaSector>,
    pub file_record_number: u32,
    pub cycle: u16,
}

impl AirportMsa {
    const MAX_SECTORS: usize = 7;
    const SECTOR_WIDTH: usize = 11;

    pub fn try_from_line(line: &RecordLine) -> CifpResult<Self> {
        line.check(0, 1, &["S"])?;
        line.check(4, 6, &["P ", "H "])?;
        line.check(12, 13, &["S"])?;
        line.check_empty(23, 38)?;
        line.check(38, 39, &["0"])?;
        line.check_empty(39, 42)?;

        let mut sectors = Vec::with_capacity(Self::MAX_SECTORS);
        for index in 0..Self::MAX_SECTORS {
            let start = 42 + index * Self::SECTOR_WIDTH;
            if line.char_at(start) == ' ' {
                break;
            }
            sectors.push(MsaSector {
                from: Course::magnetic(line.number(start, start + 3)?, None),
                to: Course::magnetic(line.number(start + 3, start + 6)?, None),
                altitude: Altitude::msl(line.number::<i32>(start + 6, start + 9)? * 100),
                radius: line.number(start + 9, start + 11)?,
            });
        }
        line.check_empty(42 + sectors.len() * Self::SECTOR_WIDTH, 119)?;
        // Sector bearings are always magnetic
        line.check(119, 120, &["M"])?;

        Ok(Self {
            client: line.text(1, 4),
            airport: line.text(6, 10),
            center_fix: line.text(13, 18),
            multi_code: line.char_at(22),
            sectors,
            file_record_number: line.file_record_number()?,
            cycle: line.cycle()?,
        })
    }
}
