//! Fixed column CIFP records.
//!
//! Every line of the distribution is one record. [`parse_record`] picks the
//! record type from the section columns and hands the line to the matching
//! parser; [`reader::CifpReader`] groups multi-line records and builds the
//! cross-referenced [`crate::package::Cifp`].

use crate::error::CifpResult;

pub mod aerodrome;
pub mod airspace;
pub mod cursor;
pub mod enroute;
pub mod field;
pub mod loader;
pub mod navaid;
pub mod procedure;
pub mod reader;
pub(crate) mod partial;

use aerodrome::{Aerodrome, AirportMsa, PathPoint, Runway};
use airspace::{AirspaceSegment, GridMora};
use enroute::{AirwayFixLine, Waypoint};
use field::RecordLine;
use navaid::Navaid;
use procedure::ProcedureLine;

/// One parsed line.
#[derive(Debug, Clone)]
pub enum CifpRecord {
    GridMora(GridMora),
    AirspaceSegment(AirspaceSegment),
    Navaid(Navaid),
    Waypoint(Waypoint),
    AirwayFix(AirwayFixLine),
    Aerodrome(Aerodrome),
    Runway(Runway),
    PathPoint(PathPoint),
    Msa(AirportMsa),
    ProcedureLeg(ProcedureLine),
}

impl CifpRecord {
    pub fn cycle(&self) -> u16 {
        match self {
            Self::GridMora(record) => record.cycle,
            Self::AirspaceSegment(record) => record.cycle,
            Self::Navaid(record) => record.cycle,
            Self::Waypoint(record) => record.cycle,
            Self::AirwayFix(record) => record.cycle,
            Self::Aerodrome(record) => record.cycle,
            Self::Runway(record) => record.cycle,
            Self::PathPoint(record) => record.cycle,
            Self::Msa(record) => record.cycle,
            Self::ProcedureLeg(record) => record.cycle,
        }
    }
}

/// Parses one line. Record shapes that are not modelled, header lines and
/// continuation records give `Ok(None)`.
pub fn parse_record(line: &str) -> CifpResult<Option<CifpRecord>> {
    if line.starts_with("HDR") {
        return Ok(None);
    }
    let line = RecordLine::new(line)?;

    let record = match (line.char_at(4), line.char_at(5)) {
        ('A' | 'U', 'S') => CifpRecord::GridMora(GridMora::try_from_line(&line)?),
        ('A' | 'U', 'C') => match AirspaceSegment::try_from_controlled(&line)? {
            Some(segment) => CifpRecord::AirspaceSegment(segment),
            None => return Ok(None),
        },
        ('A' | 'U', 'R') => match AirspaceSegment::try_from_restrictive(&line)? {
            Some(segment) => CifpRecord::AirspaceSegment(segment),
            None => return Ok(None),
        },
        ('D', ' ') => CifpRecord::Navaid(Navaid::try_from_vhf(&line)?),
        ('D', 'B') => CifpRecord::Navaid(Navaid::try_from_ndb(&line)?),
        ('E', 'A') => CifpRecord::Waypoint(Waypoint::try_from_line(&line)?),
        ('E', 'R') => CifpRecord::AirwayFix(AirwayFixLine::try_from_line(&line)?),
        ('P', 'N') => CifpRecord::Navaid(Navaid::try_from_ndb(&line)?),
        ('P' | 'H', _) => match line.char_at(12) {
            'A' => CifpRecord::Aerodrome(Aerodrome::try_from_line(&line)?),
            'G' if line.char_at(4) == 'P' => CifpRecord::Runway(Runway::try_from_line(&line)?),
            'C' => CifpRecord::Waypoint(Waypoint::try_from_line(&line)?),
            'D' | 'E' | 'F' => match ProcedureLine::try_from_line(&line)? {
                Some(leg) => CifpRecord::ProcedureLeg(leg),
                None => return Ok(None),
            },
            'P' if line.char_at(4) == 'P' => match PathPoint::try_from_line(&line)? {
                Some(point) => CifpRecord::PathPoint(point),
                None => return Ok(None),
            },
            'S' => CifpRecord::Msa(AirportMsa::try_from_line(&line)?),
            'I' if line.char_at(4) == 'P' => CifpRecord::Navaid(Navaid::try_from_ils(&line)?),
            _ => return Ok(None),
        },
        _ => return Ok(None),
    };

    Ok(Some(record))
}
