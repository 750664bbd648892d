use serde::{Deserialize, Serialize};

use crate::{
    error::{CifpResult, Error},
    geo::{Altitude, Coordinate, Course},
};

use super::field::RecordLine;

/// One degree minimum off-route altitudes for a row of 30 grid cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridMora {
    pub start: Coordinate,
    pub moras: Vec<Option<Altitude>>,
    pub file_record_number: u32,
    pub cycle: u16,
}

impl GridMora {
    pub fn try_from_line(line: &RecordLine) -> CifpResult<Self> {
        line.check(0, 13, &["S   AS       "])?;
        let start = line.coordinate(13, 20)?;
        line.check_empty(20, 30)?;

        let moras = (30..120)
            .step_by(3)
            .map(|column| match line.slice(column, column + 3) {
                "UNK" => Ok(None),
                _ => line
                    .number(column, column + 3)
                    .map(|level| Some(Altitude::flight_level(level))),
            })
            .collect::<CifpResult<Vec<_>>>()?;

        Ok(Self {
            start,
            moras,
            file_record_number: line.file_record_number()?,
            cycle: line.cycle()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AirspaceClass {
    A,
    B,
    C,
    D,
    E,
    G,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RestrictionType {
    Alert,
    Caution,
    Danger,
    MilitaryOperationsArea,
    Prohibited,
    Restricted,
    Training,
    Warning,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AirspaceKind {
    Controlled { class: AirspaceClass },
    Restrictive { restriction: RestrictionType },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundaryVia {
    Circle,
    GreatCircle,
    RhumbLine,
    CounterClockwiseArc,
    ClockwiseArc,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BoundaryPath {
    /// Straight edge (great circle or rhumb line) starting at `vertex`.
    Line { vertex: Coordinate },
    /// Arc starting at `from`, which sits `distance` nmi along `bearing` from `origin`.
    Arc {
        from: Coordinate,
        origin: Coordinate,
        distance: f64,
        bearing: Course,
    },
    Circle { center: Coordinate, radius: f64 },
}

impl BoundaryPath {
    /// The point at which the segment begins.
    pub fn vertex(&self) -> Coordinate {
        match self {
            Self::Line { vertex } => *vertex,
            Self::Arc { from, .. } => *from,
            Self::Circle { center, .. } => *center,
        }
    }
}

/// One boundary record of a controlled (`UC`) or restrictive (`UR`) airspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirspaceSegment {
    pub client: String,
    pub region: String,
    pub designator: String,
    pub kind: AirspaceKind,
    pub multi_code: char,
    pub sequence: u16,
    pub via: BoundaryVia,
    pub returns_to_origin: bool,
    pub path: BoundaryPath,
    pub lower: Option<Altitude>,
    pub upper: Option<Altitude>,
    pub name: Option<String>,
    pub file_record_number: u32,
    pub cycle: u16,
}

impl AirspaceSegment {
    pub fn try_from_controlled(line: &RecordLine) -> CifpResult<Option<Self>> {
        line.check(0, 1, &["S"])?;
        line.check(4, 6, &["UC"])?;
        let class = match line.char_at(16) {
            'A' => AirspaceClass::A,
            'B' => AirspaceClass::B,
            'C' => AirspaceClass::C,
            'D' => AirspaceClass::D,
            'E' => AirspaceClass::E,
            'G' => AirspaceClass::G,
            _ => return Err(Error::format(16)),
        };
        line.check_empty(17, 19)?;

        Self::try_from_boundary(line, line.text(9, 14), AirspaceKind::Controlled { class })
    }

    pub fn try_from_restrictive(line: &RecordLine) -> CifpResult<Option<Self>> {
        line.check(0, 1, &["S"])?;
        line.check(4, 6, &["UR"])?;
        let restriction = match line.char_at(8) {
            'A' => RestrictionType::Alert,
            'C' => RestrictionType::Caution,
            'D' => RestrictionType::Danger,
            'M' => RestrictionType::MilitaryOperationsArea,
            'P' => RestrictionType::Prohibited,
            'R' => RestrictionType::Restricted,
            'T' => RestrictionType::Training,
            'W' => RestrictionType::Warning,
            'U' => RestrictionType::Unknown,
            _ => return Err(Error::format(8)),
        };

        Self::try_from_boundary(line, line.text(9, 19), AirspaceKind::Restrictive { restriction })
    }

    fn try_from_boundary(line: &RecordLine, designator: String, kind: AirspaceKind) -> CifpResult<Option<Self>> {
        // Continuation records only carry remarks
        let continuation: u8 = line.number(24, 25)?;
        if continuation > 1 {
            return Ok(None);
        }
        line.check_empty(28, 30)?;

        let via = match line.char_at(30) {
            'C' => BoundaryVia::Circle,
            'G' => BoundaryVia::GreatCircle,
            'H' => BoundaryVia::RhumbLine,
            'L' => BoundaryVia::CounterClockwiseArc,
            'R' => BoundaryVia::ClockwiseArc,
            _ => return Err(Error::format(30)),
        };
        let returns_to_origin = match line.char_at(31) {
            ' ' => false,
            'E' => true,
            _ => return Err(Error::format(31)),
        };

        let path = match via {
            BoundaryVia::Circle => BoundaryPath::Circle {
                center: line.coordinate(51, 70)?,
                radius: line.scaled(70, 74, 10.0)?,
            },
            BoundaryVia::GreatCircle | BoundaryVia::RhumbLine => BoundaryPath::Line {
                vertex: line.coordinate(32, 51)?,
            },
            BoundaryVia::ClockwiseArc | BoundaryVia::CounterClockwiseArc => {
                let from = line.coordinate(32, 51)?;
                let origin = line.coordinate(51, 70)?;
                let distance = line.scaled(70, 74, 10.0)?;
                let bearing = Course::true_course(line.scaled(74, 78, 10.0)?);

                let projected = origin.fix_radial_distance(&bearing, distance)?;
                let tolerance = (0.01 * distance).max(0.05);
                if from.distance_to(&projected) > tolerance {
                    return Err(Error::ArcMisaligned { from, origin, distance });
                }
                BoundaryPath::Arc { from, origin, distance, bearing }
            }
        };

        line.check_empty(78, 81)?;

        Ok(Some(Self {
            client: line.text(1, 4),
            region: line.text(6, 8),
            designator,
            kind,
            multi_code: line.char_at(19),
            sequence: line.number(20, 24)?,
            via,
            returns_to_origin,
            path,
            lower: vertical_bound(line, 81)?,
            upper: vertical_bound(line, 87)?,
            name: line.optional_text(93, 123),
            file_record_number: line.file_record_number()?,
            cycle: line.cycle()?,
        }))
    }

    /// Section, designator and multi code shared by every segment of one
    /// airspace, read without parsing the record.
    pub fn group_key(line: &RecordLine) -> (String, String, char) {
        let designator = match line.char_at(5) {
            'C' => line.text(9, 14),
            _ => line.text(9, 19),
        };
        (line.text(4, 6), designator, line.char_at(19))
    }
}

/// Six column limit: five characters of value followed by `A` (AGL), `M` (MSL)
/// or blank.
fn vertical_bound(line: &RecordLine, from: usize) -> CifpResult<Option<Altitude>> {
    let value = line.slice(from, from + 5);
    match line.char_at(from + 5) {
        'A' if value.starts_with("GND") => Ok(Some(Altitude::agl(0, None))),
        'A' => Ok(Some(Altitude::agl(line.number(from, from + 5)?, None))),
        'M' if value.starts_with("FL") => Ok(Some(Altitude::flight_level(line.number(from + 2, from + 5)?))),
        'M' if value == "UNLTD" => Ok(Some(Altitude::flight_level(999))),
        'M' => Ok(Some(Altitude::msl(line.number(from, from + 5)?))),
        ' ' => Ok(None),
        _ => Err(Error::format(from + 5)),
    }
}
