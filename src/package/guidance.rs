use std::{fmt::Display, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    error::{CifpResult, Error},
    geo::{Altitude, Coordinate, Course},
};

/// Standard rate turn in degrees per second.
pub const STANDARD_RATE: f64 = 3.0;

const ARC_RADIUS_TOLERANCE: f64 = 0.1;
const RADIAL_TRACKING_TOLERANCE: f64 = 0.5;
const RADIAL_INTERCEPT: f64 = 45.0;
const FIX_CROSSING_MAX_ERROR: f64 = 0.1;
const OVERFLY_TOLERANCE: f64 = 0.005;
const ENTRY_LEG: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Termination {
    UntilCrossing,
    UntilAltitude,
    UntilDistance,
    UntilIntercept,
    UntilRadial,
    ForDistance,
    UntilTerminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LegPath {
    Direct,
    Course,
    Track,
    Heading,
    Arc,
    Hold,
    ProcedureTurn,
}

/// The two letter path terminator of a procedure leg, split into how the
/// leg is flown and when it ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PathTermination {
    pub termination: Termination,
    pub path: LegPath,
}

const PATH_TERMINATORS: [(&str, Termination, LegPath); 23] = [
    ("IF", Termination::UntilCrossing, LegPath::Direct),
    ("TF", Termination::UntilCrossing, LegPath::Direct),
    ("DF", Termination::UntilCrossing, LegPath::Direct),
    ("CF", Termination::UntilCrossing, LegPath::Course),
    ("FA", Termination::UntilAltitude, LegPath::Direct),
    ("FC", Termination::ForDistance, LegPath::Track),
    ("FD", Termination::UntilDistance, LegPath::Track),
    ("FM", Termination::UntilTerminated, LegPath::Track),
    ("CA", Termination::UntilAltitude, LegPath::Course),
    ("CD", Termination::UntilDistance, LegPath::Course),
    ("CI", Termination::UntilIntercept, LegPath::Course),
    ("CR", Termination::UntilRadial, LegPath::Course),
    ("RF", Termination::ForDistance, LegPath::Arc),
    ("AF", Termination::UntilCrossing, LegPath::Arc),
    ("VA", Termination::UntilAltitude, LegPath::Heading),
    ("VD", Termination::UntilDistance, LegPath::Heading),
    ("VI", Termination::UntilIntercept, LegPath::Heading),
    ("VM", Termination::UntilTerminated, LegPath::Heading),
    ("VR", Termination::UntilRadial, LegPath::Heading),
    ("HA", Termination::UntilAltitude, LegPath::Hold),
    ("HF", Termination::UntilCrossing, LegPath::Hold),
    ("HM", Termination::UntilTerminated, LegPath::Hold),
    ("PI", Termination::UntilIntercept, LegPath::ProcedureTurn),
];

impl FromStr for PathTermination {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PATH_TERMINATORS
            .iter()
            .find(|(code, ..)| *code == s)
            .map(|(_, termination, path)| Self { termination: *termination, path: *path })
            .ok_or_else(|| Error::InvalidPathTermination(s.to_owned()))
    }
}

impl TryFrom<String> for PathTermination {
    type Error = Error;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PathTermination> for String {
    fn from(value: PathTermination) -> Self {
        value.to_string()
    }
}

impl Display for PathTermination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // IF/TF/DF share a shape; the first match is as good as any
        let code = PATH_TERMINATORS
            .iter()
            .find(|(_, termination, path)| *termination == self.termination && *path == self.path)
            .map(|(code, ..)| *code)
            .unwrap_or("??");
        write!(f, "{code}")
    }
}

/// A fix referred to by name that is given a position once the fix table
/// is available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedPoint {
    pub name: String,
    #[serde(default)]
    pub position: Option<Coordinate>,
}

impl NamedPoint {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), position: None }
    }

    pub fn resolved(name: impl Into<String>, position: Coordinate) -> Self {
        Self { name: name.into(), position: Some(position) }
    }

    pub fn position(&self) -> CifpResult<Coordinate> {
        self.position.ok_or_else(|| Error::FloatingGuidance(self.name.clone()))
    }
}

/// Context for deciding whether an endpoint has been reached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reference {
    /// Where the leg began. Course legs complete once abeam the endpoint.
    Point(Coordinate),
    /// The endpoint must be flown over rather than turned short of.
    Overfly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Endpoint {
    Fix { fix: NamedPoint },
    Coordinate { position: Coordinate },
    Radial { station: NamedPoint, radial: Course },
}

impl Endpoint {
    /// Where the leg ends, if it ends at a point.
    pub fn position(&self) -> Option<Coordinate> {
        match self {
            Self::Fix { fix } => fix.position,
            Self::Coordinate { position } => Some(*position),
            Self::Radial { .. } => None,
        }
    }

    /// Whether `position` satisfies the leg termination.
    ///
    /// Altitude terminations (`CA`, `FA`, `VA`, `HA`) are never decided here and
    /// give [`Error::UnsupportedTermination`]; the caller compares its altitude
    /// with the leg restriction instead.
    pub fn condition_reached(
        &self,
        termination: PathTermination,
        position: Coordinate,
        _altitude: Altitude,
        reference: Option<Reference>,
        tolerance: f64,
    ) -> CifpResult<bool> {
        match self {
            Self::Fix { fix } => coordinate_reached(fix.position()?, termination, position, reference, tolerance),
            Self::Coordinate { position: endpoint } => {
                coordinate_reached(*endpoint, termination, position, reference, tolerance)
            }
            Self::Radial { station, radial } => {
                if !matches!(termination.termination, Termination::UntilCrossing | Termination::UntilRadial) {
                    return Err(Error::UnsupportedTermination(termination.to_string()));
                }
                let station = station.position()?;
                let Some(bearing) = station.bearing_distance_to(&position).0 else {
                    return Ok(false);
                };

                match reference {
                    Some(Reference::Point(start)) => {
                        let Some(start_bearing) = station.bearing_distance_to(&start).0 else {
                            return Ok(true);
                        };
                        let radial = radial.true_degrees()?;
                        Ok((start_bearing.true_degrees()? < radial) ^ (bearing.true_degrees()? < radial))
                    }
                    _ => Ok(radial.angle(&bearing)?.abs() <= RADIAL_TRACKING_TOLERANCE),
                }
            }
        }
    }
}

fn coordinate_reached(
    endpoint: Coordinate,
    termination: PathTermination,
    position: Coordinate,
    reference: Option<Reference>,
    tolerance: f64,
) -> CifpResult<bool> {
    match (termination.termination, reference) {
        (Termination::UntilCrossing, _) | (Termination::ForDistance, Some(Reference::Point(_))) => {}
        _ => return Err(Error::UnsupportedTermination(termination.to_string())),
    }

    match reference {
        Some(Reference::Point(start)) if termination.path == LegPath::Course => {
            match (endpoint.bearing_distance_to(&start).0, endpoint.bearing_distance_to(&position).0) {
                (Some(start_bearing), Some(bearing)) => {
                    Ok(bearing.angle(&start_bearing)?.abs() - (90.0 - tolerance) > 0.0)
                }
                // Degenerate leg, or sitting on the endpoint
                _ => Ok(true),
            }
        }
        Some(Reference::Overfly) => Ok(endpoint.distance_to(&position) <= OVERFLY_TOLERANCE),
        _ => Ok(endpoint.distance_to(&position) <= tolerance),
    }
}

/// Turns from `current` towards `target` by at most one tick of a standard
/// rate turn. The result is always a true course.
pub fn turn_towards(
    current: &Course,
    target: &Course,
    tick: Duration,
    on_ground: bool,
    force_left: Option<bool>,
) -> CifpResult<Course> {
    let remaining = current.angle(target)?;
    let rate = STANDARD_RATE * tick.as_secs_f64();
    if on_ground || remaining.abs() < rate {
        return target.to_true();
    }

    let current = current.to_true()?;
    if force_left.unwrap_or(remaining < 0.0) {
        Ok(current - rate)
    } else {
        Ok(current + rate)
    }
}

/// Lateral guidance for a leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Via {
    Course { course: Course },
    #[serde(rename_all = "camelCase")]
    Arc { center: NamedPoint, radius: f64, arc_to: Course },
    Racetrack(Racetrack),
    Radial { station: NamedPoint, bearing: Course },
}

impl Via {
    pub fn next_true_course(
        &mut self,
        position: Coordinate,
        current: &Course,
        tick: Duration,
        on_ground: bool,
    ) -> CifpResult<Course> {
        match self {
            Self::Course { course } => turn_towards(current, course, tick, on_ground, None),
            Self::Arc { center, radius, arc_to } => {
                let center = center.position()?;
                if *radius <= 0.0 {
                    return Err(Error::DegenerateArc(*radius));
                }

                let target = match center.bearing_distance_to(&position) {
                    (None, _) => *arc_to,
                    (Some(bearing), distance) if distance + ARC_RADIUS_TOLERANCE < *radius => bearing,
                    (Some(bearing), distance) if distance - ARC_RADIUS_TOLERANCE > *radius => bearing.reciprocal(),
                    (Some(bearing), _) if bearing.angle(arc_to)? > 0.0 => bearing + 90.0,
                    (Some(bearing), _) => bearing - 90.0,
                };
                turn_towards(current, &target, tick, on_ground, None)
            }
            Self::Racetrack(racetrack) => racetrack.next_true_course(position, current, tick, on_ground),
            Self::Radial { station, bearing } => {
                let station = station.position()?;
                let target = match station.bearing_distance_to(&position) {
                    (Some(current_radial), distance) if distance >= FIX_CROSSING_MAX_ERROR => {
                        let error = bearing.angle(&current_radial)?;
                        if error + RADIAL_TRACKING_TOLERANCE < 0.0 {
                            *bearing + RADIAL_INTERCEPT
                        } else if error - RADIAL_TRACKING_TOLERANCE > 0.0 {
                            *bearing - RADIAL_INTERCEPT
                        } else {
                            *bearing - error
                        }
                    }
                    _ => *bearing,
                };
                turn_towards(current, &target, tick, on_ground, None)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoldState {
    Entry,
    Outbound,
    Inbound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoldEntry {
    Direct,
    Parallel,
    Teardrop,
}

/// Picks the entry for a hold from the course the aircraft arrives on.
///
/// The offset is measured clockwise from the arrival course to the inbound
/// course and mirrored for left hand patterns.
pub fn classify_entry(current: &Course, inbound: &Course, left_turns: bool) -> CifpResult<HoldEntry> {
    let offset = current.angle(inbound)?;
    let offset = if left_turns { -offset } else { offset };

    Ok(if offset > 70.0 {
        HoldEntry::Teardrop
    } else if offset < -110.0 {
        HoldEntry::Parallel
    } else {
        HoldEntry::Direct
    })
}

#[derive(Debug, Clone, Default, PartialEq)]
struct HoldProgress {
    state: Option<HoldState>,
    entry: Option<HoldEntry>,
    abeam: Option<Coordinate>,
    elapsed: Option<Duration>,
    stable: bool,
}

/// A holding pattern. Flying one is stateful, so every aircraft needs its
/// own copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Racetrack {
    pub fix: NamedPoint,
    pub inbound_course: Course,
    pub distance: Option<f64>,
    pub time: Option<Duration>,
    #[serde(default)]
    pub left_turns: bool,
    #[serde(skip)]
    progress: HoldProgress,
}

impl Racetrack {
    pub fn new(fix: NamedPoint, inbound_course: Course, distance: Option<f64>, time: Option<Duration>, left_turns: bool) -> Self {
        Self {
            fix,
            inbound_course,
            distance,
            time,
            left_turns,
            progress: HoldProgress::default(),
        }
    }

    pub fn state(&self) -> Option<HoldState> {
        self.progress.state
    }

    pub fn entry(&self) -> Option<HoldEntry> {
        self.progress.entry
    }

    fn start_timer(&mut self, tick: Duration) -> Duration {
        let elapsed = match self.progress.elapsed {
            Some(elapsed) => elapsed + tick,
            None => Duration::ZERO,
        };
        self.progress.elapsed = Some(elapsed);
        elapsed
    }

    fn turn_inbound(&mut self) {
        self.progress.abeam = None;
        self.progress.elapsed = None;
        self.progress.stable = false;
        self.progress.state = Some(HoldState::Inbound);
    }

    pub fn next_true_course(
        &mut self,
        position: Coordinate,
        current: &Course,
        tick: Duration,
        on_ground: bool,
    ) -> CifpResult<Course> {
        if self.distance.is_none() && self.time.is_none() {
            return Err(Error::IncompleteHold(self.fix.name.clone()));
        }
        let fix = self.fix.position()?;

        let state = match self.progress.state {
            Some(state) => state,
            None => {
                self.progress.entry = Some(classify_entry(current, &self.inbound_course, self.left_turns)?);
                self.progress.stable = true;
                self.progress.state = Some(HoldState::Entry);
                HoldState::Entry
            }
        };

        let (fix_bearing, distance) = position.bearing_distance_to(&fix);
        let forced = |stable: bool, left: bool| if stable { None } else { Some(left) };
        let outbound = self.inbound_course.reciprocal();

        match state {
            HoldState::Entry => {
                if distance < FIX_CROSSING_MAX_ERROR {
                    self.progress.state = Some(HoldState::Outbound);
                    self.progress.stable = false;
                }
                let target = fix_bearing.unwrap_or(*current);
                turn_towards(current, &target, tick, on_ground, forced(self.progress.stable, self.left_turns))
            }
            HoldState::Inbound => {
                if !self.progress.stable && current.angle(&self.inbound_course)?.abs() < 1.0 {
                    self.progress.stable = true;
                }
                if distance < FIX_CROSSING_MAX_ERROR {
                    self.progress.state = Some(HoldState::Outbound);
                    self.progress.abeam = None;
                    self.progress.elapsed = None;
                    self.progress.entry = None;
                    self.progress.stable = false;
                }
                let target = fix_bearing.unwrap_or(self.inbound_course);
                turn_towards(current, &target, tick, on_ground, forced(self.progress.stable, self.left_turns))
            }
            HoldState::Outbound => match self.progress.entry {
                entry @ (Some(HoldEntry::Parallel) | Some(HoldEntry::Teardrop)) => {
                    if self.start_timer(tick) < ENTRY_LEG {
                        self.progress.stable = true;
                        let target = match entry {
                            Some(HoldEntry::Teardrop) if self.left_turns => outbound + 30.0,
                            Some(HoldEntry::Teardrop) => outbound - 30.0,
                            _ => outbound,
                        };
                        return turn_towards(current, &target, tick, on_ground, None);
                    }

                    self.turn_inbound();
                    self.next_true_course(position, current, tick, on_ground)
                }
                Some(HoldEntry::Direct) | None => {
                    self.progress.entry = None;
                    if !self.progress.stable && current.angle(&outbound)?.abs() < 1.0 {
                        self.progress.abeam = Some(position);
                        self.progress.elapsed = Some(Duration::ZERO);
                        self.progress.stable = true;
                    } else if let Some(elapsed) = self.progress.elapsed.as_mut() {
                        *elapsed += tick;
                    }

                    if !self.progress.stable {
                        return turn_towards(current, &outbound, tick, on_ground, Some(self.left_turns));
                    }

                    let flown_distance = match (self.distance, self.progress.abeam) {
                        (Some(leg), Some(abeam)) => abeam.distance_to(&position) >= leg,
                        _ => false,
                    };
                    let flown_time = match (self.time, self.progress.elapsed) {
                        (Some(leg), Some(elapsed)) => elapsed >= leg,
                        _ => false,
                    };
                    if flown_distance || flown_time {
                        self.turn_inbound();
                        return self.next_true_course(position, current, tick, on_ground);
                    }
                    turn_towards(current, &outbound, tick, on_ground, None)
                }
            },
        }
    }
}
