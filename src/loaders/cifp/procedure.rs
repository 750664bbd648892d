use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    error::{CifpResult, Error},
    geo::{Altitude, Course},
    package::{
        guidance::{Endpoint, LegPath, NamedPoint, PathTermination, Racetrack, Termination, Via},
        AltitudeRestriction, SpeedRestriction,
    },
};

use super::field::RecordLine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcedureKind {
    Sid,
    Star,
    Approach,
}

/// Which part of a procedure a leg belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteSegment {
    RunwayTransition,
    CommonRoute,
    EnrouteTransition,
    ApproachTransition,
}

/// One leg record of a SID (`PD`), STAR (`PE`) or approach (`PF`).
#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureLine {
    pub kind: ProcedureKind,
    pub client: String,
    pub airport: String,
    pub name: String,
    pub route_type: char,
    pub transition: Option<String>,
    pub sequence: u16,
    pub fix: Option<String>,
    pub termination: PathTermination,
    pub via: Option<Via>,
    pub endpoint: Option<Endpoint>,
    pub referenced_navaid: Option<String>,
    pub altitude: AltitudeRestriction,
    pub speed: SpeedRestriction,
    pub transition_altitude: Option<Altitude>,
    pub vertical_angle: Option<f64>,
    pub overfly: bool,
    pub left_turn: bool,
    pub file_record_number: u32,
    pub cycle: u16,
}

impl ProcedureLine {
    /// Continuation records of approaches yield `None`.
    pub fn try_from_line(line: &RecordLine) -> CifpResult<Option<Self>> {
        let kind = match line.char_at(12) {
            'D' => ProcedureKind::Sid,
            'E' => ProcedureKind::Star,
            'F' => ProcedureKind::Approach,
            _ => return Err(Error::format(12)),
        };

        line.check(0, 1, &["S"])?;
        match kind {
            ProcedureKind::Approach => line.check(4, 6, &["P ", "H "])?,
            _ => line.check(4, 6, &["P "])?,
        }

        let route_type = line.char_at(19);
        match (kind, route_type) {
            (ProcedureKind::Approach, 'A') => {}
            (ProcedureKind::Approach, _) => line.check_empty(20, 25)?,
            (_, '2' | '5') if line.slice(20, 22) != "RW" && !line.is_blank(20, 25) => {
                line.check(20, 25, &["ALL  "])?
            }
            _ => {}
        }
        line.check_empty(25, 26)?;

        match kind {
            ProcedureKind::Approach if line.char_at(38) > '1' => return Ok(None),
            ProcedureKind::Approach => {}
            _ => line.check(38, 39, &["0"])?,
        }

        match (kind, route_type) {
            (ProcedureKind::Sid, '4' | '5' | '6') | (ProcedureKind::Approach, _) => {
                line.optional_number::<u16>(44, 47)?;
            }
            _ => line.check_empty(44, 47)?,
        }

        let fix = line.optional_text(29, 34);
        let segment = PathSegment::try_from_line(line)?;

        let via = segment.via(fix.as_deref(), line.char_at(43) == 'L')?;
        let endpoint = match segment.termination.termination {
            Termination::UntilRadial => segment.radial_endpoint(),
            _ => fix.as_ref().map(|fix| Endpoint::Fix { fix: NamedPoint::new(fix.as_str()) }),
        };

        let altitude = match (kind, line.char_at(82)) {
            (ProcedureKind::Sid | ProcedureKind::Star, ' ') => AltitudeRestriction::unrestricted(),
            (_, description) => {
                AltitudeRestriction::from_description(description, line.altitude(84, 89)?, line.altitude(89, 94)?)?
            }
        };
        let speed = match line.optional_number::<u32>(99, 102)? {
            Some(limit) => SpeedRestriction::new(None, Some(limit)),
            None => SpeedRestriction::unrestricted(),
        };

        let vertical_angle = match kind {
            ProcedureKind::Sid | ProcedureKind::Star => {
                line.check_empty(102, 106)?;
                line.check_empty(111, 112)?;
                line.check_empty(116, 117)?;
                line.check_empty(118, 123)?;
                None
            }
            ProcedureKind::Approach => {
                line.check_empty(120, 123)?;
                line.optional_scaled(102, 106, 100.0)?
            }
        };

        Ok(Some(Self {
            kind,
            client: line.text(1, 4),
            airport: line.text(6, 10),
            name: line.text(13, 19),
            route_type,
            transition: line.optional_text(20, 25),
            sequence: line.number(26, 29)?,
            fix,
            termination: segment.termination,
            via,
            endpoint,
            referenced_navaid: segment.navaid.clone(),
            altitude,
            speed,
            transition_altitude: line.altitude(94, 99)?,
            vertical_angle,
            overfly: matches!(line.char_at(40), 'Y' | 'B'),
            left_turn: line.char_at(43) == 'L',
            file_record_number: line.file_record_number()?,
            cycle: line.cycle()?,
        }))
    }

    pub fn segment(&self) -> RouteSegment {
        match (self.kind, self.route_type) {
            (ProcedureKind::Approach, 'A') => RouteSegment::ApproachTransition,
            (ProcedureKind::Approach, _) => RouteSegment::CommonRoute,
            (_, '2' | '5') => RouteSegment::CommonRoute,
            (ProcedureKind::Sid, '1' | '4' | 'T') => RouteSegment::RunwayTransition,
            (ProcedureKind::Sid, _) => RouteSegment::EnrouteTransition,
            (ProcedureKind::Star, '3' | '6') => RouteSegment::RunwayTransition,
            (ProcedureKind::Star, _) => RouteSegment::EnrouteTransition,
        }
    }

    /// Key shared by every leg of one procedure, read without parsing the
    /// whole record.
    pub fn group_key(line: &RecordLine) -> (char, String, char, String) {
        (line.char_at(4), line.text(6, 10), line.char_at(12), line.text(13, 19))
    }
}

/// Columns 47 to 116, shared by every kind of procedure leg.
struct PathSegment {
    termination: PathTermination,
    navaid: Option<String>,
    arc_radius: Option<f64>,
    theta: Option<f64>,
    rho: Option<f64>,
    course: Option<Course>,
    distance: Option<f64>,
    time: Option<Duration>,
    arc_center: Option<String>,
}

impl PathSegment {
    fn try_from_line(line: &RecordLine) -> CifpResult<Self> {
        let termination: PathTermination = line.slice(47, 49).parse()?;
        line.check_char(49, &[' ', 'Y'])?;

        let navaid = line.optional_text(50, 54);
        if navaid.is_none() {
            line.check_empty(54, 56)?;
        }

        let arc_radius = line.optional_scaled(56, 62, 1000.0)?;
        let (theta, rho) = match (line.optional_scaled(62, 66, 10.0)?, line.optional_scaled(66, 70, 10.0)?) {
            (Some(theta), Some(rho)) if theta == 0.0 && rho == 0.0 => (None, None),
            pair => pair,
        };

        let course = line
            .optional_scaled(70, 74, 10.0)?
            .or(theta)
            .map(|degrees| Course::magnetic(degrees, None));
        let (distance, time) = match line.char_at(74) {
            'T' => (
                None,
                line.optional_scaled(75, 78, 10.0)?
                    .map(|minutes| Duration::from_secs_f64(minutes * 60.0)),
            ),
            _ => (line.optional_scaled(74, 78, 10.0)?, None),
        };
        line.check_empty(80, 82)?;

        Ok(Self {
            termination,
            navaid,
            arc_radius,
            theta,
            rho,
            course,
            distance,
            time,
            arc_center: line.optional_text(106, 111),
        })
    }

    fn via(&self, fix: Option<&str>, left_turns: bool) -> CifpResult<Option<Via>> {
        let course = self.course;
        Ok(match (self.termination.path, course) {
            (LegPath::Hold, None) => return Err(Error::format(70)),
            (LegPath::Hold, Some(course)) => {
                if self.distance.is_none() && self.time.is_none() {
                    return Err(Error::format(74));
                }
                let fix = fix.ok_or(Error::format(29))?;
                Some(Via::Racetrack(Racetrack::new(
                    NamedPoint::new(fix),
                    course,
                    self.distance,
                    self.time,
                    left_turns,
                )))
            }
            (LegPath::Track | LegPath::Course | LegPath::Heading | LegPath::ProcedureTurn, Some(course)) => {
                Some(Via::Course { course })
            }
            (LegPath::Arc, course) => {
                let center = self
                    .arc_center
                    .as_ref()
                    .or(self.navaid.as_ref())
                    .ok_or(Error::format(106))?;
                Some(Via::Arc {
                    center: NamedPoint::new(center.as_str()),
                    radius: self.rho.or(self.arc_radius).ok_or(Error::format(56))?,
                    arc_to: course.ok_or(Error::format(70))?,
                })
            }
            _ => None,
        })
    }

    fn radial_endpoint(&self) -> Option<Endpoint> {
        Some(Endpoint::Radial {
            station: NamedPoint::new(self.navaid.as_ref()?.as_str()),
            radial: Course::magnetic(self.theta?, None),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZELAN_CF: &str = "SUSAP KATLK7DZELAN44RW27R 010CPARKK7PC0E       CF ATL K7      2799003927500052D               18000                        209121705";
    const ZELAN_RF: &str = "SUSAP KATLK7DZELAN44RW27R 020MPASSK7PC0E   R   RF       0034602750    00550055                            CFZJF K7PC       209131911";
    const ZELAN_TF: &str = "SUSAP KATLK7DZELAN44RW27R 030ZELANK7PC0EE      TF                                 + 06000          250                     209141705";

    fn parse(line: &str) -> ProcedureLine {
        ProcedureLine::try_from_line(&RecordLine::new(line).unwrap())
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_course_to_fix() {
        let leg = parse(ZELAN_CF);
        assert_eq!(leg.kind, ProcedureKind::Sid);
        assert_eq!(leg.airport, "KATL");
        assert_eq!(leg.name, "ZELAN4");
        assert_eq!(leg.segment(), RouteSegment::RunwayTransition);
        assert_eq!(leg.transition.as_deref(), Some("RW27R"));
        assert_eq!(leg.sequence, 10);
        assert_eq!(leg.termination.to_string(), "CF");
        assert_eq!(leg.referenced_navaid.as_deref(), Some("ATL"));
        assert_eq!(leg.via, Some(Via::Course { course: Course::magnetic(275.0, None) }));
        assert_eq!(leg.endpoint, Some(Endpoint::Fix { fix: NamedPoint::new("CPARK") }));
        assert!(leg.altitude.is_unrestricted());
        assert_eq!(leg.transition_altitude, Some(Altitude::msl(18000)));
        assert_eq!(leg.cycle, 1705);
    }

    #[test]
    fn test_radius_to_fix() {
        let leg = parse(ZELAN_RF);
        assert!(!leg.left_turn);
        match leg.via {
            Some(Via::Arc { center, radius, arc_to }) => {
                assert_eq!(center.name, "CFZJF");
                assert_eq!(radius, 3.46);
                assert_eq!(arc_to.degrees(), 5.5);
            }
            via => panic!("unexpected via {via:?}"),
        }
        assert_eq!(leg.cycle, 1911);
    }

    #[test]
    fn test_restrictions() {
        let leg = parse(ZELAN_TF);
        assert_eq!(leg.altitude, AltitudeRestriction::new(Some(Altitude::msl(6000)), None));
        assert_eq!(leg.speed, SpeedRestriction::new(None, Some(250)));
        assert!(leg.via.is_none());
    }

    #[test]
    fn test_rejects_unknown_path_terminator() {
        let line = format!("{}XX{}", &ZELAN_CF[..47], &ZELAN_CF[49..]);
        let record = RecordLine::new(&line).unwrap();
        assert!(matches!(
            ProcedureLine::try_from_line(&record),
            Err(Error::InvalidPathTermination(code)) if code == "XX"
        ));
    }
}
