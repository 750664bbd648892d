use serde::{Deserialize, Serialize};

use crate::{
    error::{CifpResult, Error},
    geo::{Coordinate, Course},
    package::AltitudeRestriction,
};

use super::field::RecordLine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaypointUsage {
    HighLow,
    High,
    Low,
    Terminal,
}

/// An enroute (`EA`) or terminal (`P`/`H` + `C`) waypoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Waypoint {
    pub client: String,
    pub identifier: String,
    pub airport: Option<String>,
    pub region: String,
    pub waypoint_type: String,
    pub usage: WaypointUsage,
    pub position: Coordinate,
    pub magnetic_variation: Option<f64>,
    pub name: String,
    pub file_record_number: u32,
    pub cycle: u16,
}

impl Waypoint {
    pub fn try_from_line(line: &RecordLine) -> CifpResult<Self> {
        line.check(0, 1, &["S"])?;
        if matches!(line.char_at(4), 'P' | 'H') {
            line.check(4, 6, &["P ", "H "])?;
            line.check(12, 13, &["C"])?;
        } else {
            line.check(4, 6, &["EA"])?;
            // Region is given later on enroute records
            line.check_empty(10, 13)?;
        }

        line.check_empty(18, 19)?;
        line.check(21, 22, &["0"])?;
        line.check_empty(22, 26)?;
        line.check_empty(28, 30)?;
        let usage = match line.char_at(30) {
            'B' => WaypointUsage::HighLow,
            'H' => WaypointUsage::High,
            'L' => WaypointUsage::Low,
            ' ' => WaypointUsage::Terminal,
            _ => return Err(Error::format(30)),
        };
        line.check_empty(31, 32)?;
        line.check_empty(51, 74)?;
        line.check_empty(79, 84)?;
        line.check(84, 87, &["NAR"])?;
        line.check_empty(87, 98)?;

        Ok(Self {
            client: line.text(1, 4),
            identifier: line.text(13, 18),
            airport: line.optional_text(6, 10).filter(|airport| airport != "ENRT"),
            region: line.text(19, 21),
            waypoint_type: line.text(26, 28),
            usage,
            position: line.coordinate(32, 51)?,
            magnetic_variation: line.magnetic_variation(74, 75, 79)?,
            name: line.text(98, 123),
            file_record_number: line.file_record_number()?,
            cycle: line.cycle()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AirwayLevel {
    All,
    High,
    Low,
}

/// One fix of an airway (`ER`), in sequence order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirwayFixLine {
    pub client: String,
    pub airway: String,
    pub sequence: u16,
    pub fix: String,
    pub rnav: bool,
    pub level: AirwayLevel,
    pub outbound_course: Option<Course>,
    pub distance: Option<f64>,
    pub inbound_course: Option<Course>,
    pub outbound_altitude: AltitudeRestriction,
    pub inbound_altitude: AltitudeRestriction,
    pub file_record_number: u32,
    pub cycle: u16,
}

impl AirwayFixLine {
    pub fn try_from_line(line: &RecordLine) -> CifpResult<Self> {
        line.check(0, 1, &["S"])?;
        line.check(4, 6, &["ER"])?;
        line.check_empty(6, 13)?;
        line.check_empty(18, 25)?;
        line.check(36, 38, &["D ", "DB", "EA"])?;
        line.check(38, 39, &["0"])?;
        line.check_char(44, &['R', 'O'])?;
        let level = match line.char_at(45) {
            ' ' => AirwayLevel::All,
            'H' => AirwayLevel::High,
            'L' => AirwayLevel::Low,
            _ => return Err(Error::format(45)),
        };
        line.check_empty(46, 70)?;
        line.check_empty(82, 83)?;
        line.check_empty(98, 123)?;

        let outbound_minimum = line.altitude(83, 88)?;
        let inbound_minimum = line.altitude(88, 93)?;
        let maximum = line.altitude(93, 98)?;

        Ok(Self {
            client: line.text(1, 4),
            airway: line.text(13, 18),
            sequence: line.number(25, 29)?,
            fix: line.text(29, 34),
            rnav: line.char_at(44) == 'R',
            level,
            outbound_course: line
                .optional_scaled(70, 74, 10.0)?
                .map(|course| Course::magnetic(course, None)),
            distance: line.optional_scaled(74, 78, 10.0)?,
            inbound_course: line
                .optional_scaled(78, 82, 10.0)?
                .map(|course| Course::magnetic(course, None)),
            outbound_altitude: AltitudeRestriction::new(outbound_minimum, maximum),
            inbound_altitude: AltitudeRestriction::new(inbound_minimum, maximum),
            file_record_number: line.file_record_number()?,
            cycle: line.cycle()?,
        })
    }

    /// Airway identifier and sequence number, read without parsing the
    /// record.
    pub fn group_key(line: &RecordLine) -> (String, Option<u16>) {
        (line.text(13, 18), line.number(25, 29).ok())
    }
}
