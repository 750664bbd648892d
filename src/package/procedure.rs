use std::{cmp::Ordering, collections::HashMap, fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    error::{CifpResult, Error},
    geo::{Altitude, Coordinate, Course},
    loaders::cifp::procedure::{ProcedureKind, ProcedureLine, RouteSegment},
};

use super::{
    guidance::{Endpoint, NamedPoint, PathTermination, Reference, Termination, Via},
    resolver::{FixReference, Resolver},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AltitudeDescription {
    At,
    AtOrAbove,
    AtOrBelow,
    Between,
}

impl TryFrom<char> for AltitudeDescription {
    type Error = Error;
    fn try_from(value: char) -> Result<Self, Self::Error> {
        Ok(match value {
            ' ' | '@' | 'I' => Self::At,
            '+' | 'G' => Self::AtOrAbove,
            '-' => Self::AtOrBelow,
            'B' | 'J' | 'H' | 'V' => Self::Between,
            _ => return Err(Error::InvalidRestriction(value.to_string())),
        })
    }
}

/// Intercept (`I`) and glideslope (`G`) codes restate an altitude that does
/// not bind, so only the first one counts. Above glideslope then reads as at
/// or above the first altitude.
fn drop_advisory_altitude(description: char, second: Option<Altitude>) -> Option<Altitude> {
    match description {
        'I' | 'G' => None,
        _ => second,
    }
}

/// `J`, `H` and `V` occasionally stand in for `+` when only one altitude is
/// given.
fn single_altitude_band(description: char, second: Option<Altitude>) -> char {
    match (description, second) {
        ('J' | 'H' | 'V', None) => '+',
        _ => description,
    }
}

/// An at-or-above restriction carrying two altitudes.
fn at_or_above_with_two(first: Altitude, second: Altitude) -> (AltitudeDescription, Option<Altitude>) {
    match first.partial_cmp(&second) {
        Some(Ordering::Less) => (AltitudeDescription::Between, Some(second)),
        _ => (AltitudeDescription::AtOrAbove, None),
    }
}

/// An at-or-below restriction whose second altitude is the higher one.
fn at_or_below_with_two(first: Altitude, second: Altitude) -> (AltitudeDescription, Option<Altitude>) {
    if second > first {
        (AltitudeDescription::Between, Some(second))
    } else {
        (AltitudeDescription::AtOrBelow, Some(second))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AltitudeRestriction {
    pub minimum: Option<Altitude>,
    pub maximum: Option<Altitude>,
}

impl AltitudeRestriction {
    pub fn new(minimum: Option<Altitude>, maximum: Option<Altitude>) -> Self {
        Self { minimum, maximum }
    }

    pub fn unrestricted() -> Self {
        Self::default()
    }

    pub fn is_unrestricted(&self) -> bool {
        self.minimum.is_none() && self.maximum.is_none()
    }

    /// Unordered comparisons (unknown ground elevation) do not exclude.
    pub fn contains(&self, altitude: &Altitude) -> bool {
        let above = self.minimum.map_or(true, |minimum| !matches!(altitude.partial_cmp(&minimum), Some(Ordering::Less)));
        let below = self.maximum.map_or(true, |maximum| !matches!(altitude.partial_cmp(&maximum), Some(Ordering::Greater)));
        above && below
    }

    /// Decodes the altitude description column and its one or two altitudes.
    pub fn from_description(description: char, first: Option<Altitude>, second: Option<Altitude>) -> CifpResult<Self> {
        let first = match (first, second) {
            (None, None) => return Ok(Self::unrestricted()),
            (None, Some(_)) => return Err(Error::AltitudeRestriction("second altitude given without a first")),
            (Some(first), _) => first,
        };

        let second = drop_advisory_altitude(description, second);
        let description = AltitudeDescription::try_from(single_altitude_band(description, second))?;
        let (description, second) = match (description, second) {
            (AltitudeDescription::AtOrAbove, Some(second)) => at_or_above_with_two(first, second),
            (AltitudeDescription::AtOrBelow, Some(second)) => at_or_below_with_two(first, second),
            other => other,
        };

        match (description, second) {
            (AltitudeDescription::Between, Some(second)) => Ok(Self::new(Some(first), Some(second))),
            (AltitudeDescription::Between, None) => {
                Err(Error::AltitudeRestriction("between restrictions need two altitudes"))
            }
            (_, Some(_)) => Err(Error::AltitudeRestriction("single altitude restrictions take one altitude")),
            (AltitudeDescription::At, None) => Ok(Self::new(Some(first), Some(first))),
            (AltitudeDescription::AtOrAbove, None) => Ok(Self::new(Some(first), None)),
            (AltitudeDescription::AtOrBelow, None) => Ok(Self::new(None, Some(first))),
        }
    }
}

impl Display for AltitudeRestriction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.minimum, self.maximum) {
            (None, None) => write!(f, "Unrestricted"),
            (Some(minimum), None) => write!(f, "\\{}", minimum.feet() / 100),
            (None, Some(maximum)) => write!(f, "{}\\", maximum.feet() / 100),
            (Some(minimum), Some(maximum)) => write!(f, "\\{} {}\\", minimum.feet() / 100, maximum.feet() / 100),
        }
    }
}

impl FromStr for AltitudeRestriction {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (minimum, maximum) = parse_bounds(s, "")?;
        Ok(Self::new(
            minimum.map(|hundreds| Altitude::msl(hundreds as i32 * 100)),
            maximum.map(|hundreds| Altitude::msl(hundreds as i32 * 100)),
        ))
    }
}

/// Reads `\min max\`, `\min` or `max\`, each bound followed by `suffix`.
fn parse_bounds(s: &str, suffix: &str) -> CifpResult<(Option<u32>, Option<u32>)> {
    let invalid = || Error::InvalidRestriction(s.to_owned());
    if s == "Unrestricted" {
        return Ok((None, None));
    }

    let bound = |token: &str| -> CifpResult<u32> {
        token
            .strip_suffix(suffix)
            .and_then(|value| value.parse().ok())
            .ok_or_else(invalid)
    };

    let minimum = match s.split_whitespace().next() {
        Some(token) if s.starts_with('\\') => Some(bound(token.trim_matches('\\'))?),
        _ => None,
    };
    let maximum = match s.split_whitespace().last() {
        Some(token) if s.ends_with('\\') => Some(bound(token.trim_matches('\\'))?),
        _ => None,
    };

    if minimum.is_none() && maximum.is_none() {
        return Err(invalid());
    }
    Ok((minimum, maximum))
}

/// Speed limits in knots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpeedRestriction {
    pub minimum: Option<u32>,
    pub maximum: Option<u32>,
}

impl SpeedRestriction {
    pub fn new(minimum: Option<u32>, maximum: Option<u32>) -> Self {
        Self { minimum, maximum }
    }

    pub fn unrestricted() -> Self {
        Self::default()
    }

    pub fn is_unrestricted(&self) -> bool {
        self.minimum.is_none() && self.maximum.is_none()
    }

    pub fn contains(&self, speed: u32) -> bool {
        self.minimum.map_or(true, |minimum| speed >= minimum) && self.maximum.map_or(true, |maximum| speed <= maximum)
    }
}

impl Display for SpeedRestriction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.minimum, self.maximum) {
            (None, None) => write!(f, "Unrestricted"),
            (Some(minimum), None) => write!(f, "\\{minimum}K"),
            (None, Some(maximum)) => write!(f, "{maximum}K\\"),
            (Some(minimum), Some(maximum)) => write!(f, "\\{minimum}K {maximum}K\\"),
        }
    }
}

impl FromStr for SpeedRestriction {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (minimum, maximum) = parse_bounds(s, "K")?;
        Ok(Self::new(minimum, maximum))
    }
}

/// One flyable leg of a procedure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instruction {
    pub termination: PathTermination,
    pub endpoint: Option<Endpoint>,
    pub via: Option<Via>,
    pub speed: SpeedRestriction,
    pub altitude: AltitudeRestriction,
    #[serde(default)]
    pub overfly: bool,
}

impl Instruction {
    pub fn is_complete(&self, position: Coordinate, altitude: Altitude, tolerance: f64) -> CifpResult<bool> {
        let reference = self.overfly.then_some(Reference::Overfly);
        self.check_endpoint(position, altitude, reference, tolerance)
    }

    /// As [`Self::is_complete`], but course legs complete once abeam the
    /// endpoint as seen from `start`.
    pub fn is_complete_from(
        &self,
        start: Coordinate,
        position: Coordinate,
        altitude: Altitude,
        tolerance: f64,
    ) -> CifpResult<bool> {
        self.check_endpoint(position, altitude, Some(Reference::Point(start)), tolerance)
    }

    fn check_endpoint(
        &self,
        position: Coordinate,
        altitude: Altitude,
        reference: Option<Reference>,
        tolerance: f64,
    ) -> CifpResult<bool> {
        if self.termination.termination == Termination::UntilTerminated {
            return Ok(false);
        }
        match &self.endpoint {
            Some(endpoint) => endpoint.condition_reached(self.termination, position, altitude, reference, tolerance),
            None => Ok(false),
        }
    }
}

type Transitions = HashMap<String, Vec<Instruction>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sid {
    pub name: String,
    pub airport: String,
    pub runway_transitions: Transitions,
    pub common_route: Vec<Instruction>,
    pub enroute_transitions: Transitions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Star {
    pub name: String,
    pub airport: String,
    pub enroute_transitions: Transitions,
    pub common_route: Vec<Instruction>,
    pub runway_transitions: Transitions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Approach {
    pub name: String,
    pub airport: String,
    pub transitions: Transitions,
    pub common_route: Vec<Instruction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Procedure {
    Sid(Sid),
    Star(Star),
    Approach(Approach),
}

const CATCH_ALL: &str = "ALL";

/// Runway transitions may be published once for parallel runways with a
/// `B` (both) suffix.
fn runway_transition<'a>(transitions: &'a Transitions, name: &str) -> CifpResult<&'a [Instruction]> {
    if let Some(instructions) = transitions.get(name) {
        return Ok(instructions);
    }

    name.strip_suffix(['L', 'C', 'R'])
        .and_then(|base| transitions.get(&format!("{base}B")))
        .map(Vec::as_slice)
        .ok_or_else(|| Error::UnknownTransition { kind: "Runway", name: name.to_owned() })
}

fn enroute_transition<'a>(transitions: &'a Transitions, name: &str) -> CifpResult<&'a [Instruction]> {
    transitions
        .get(name)
        .map(Vec::as_slice)
        .ok_or_else(|| Error::UnknownTransition { kind: "Enroute", name: name.to_owned() })
}

fn catch_all(transitions: &Transitions) -> &[Instruction] {
    transitions.get(CATCH_ALL).map(Vec::as_slice).unwrap_or_default()
}

impl Procedure {
    pub fn name(&self) -> &str {
        match self {
            Self::Sid(Sid { name, .. }) | Self::Star(Star { name, .. }) | Self::Approach(Approach { name, .. }) => name,
        }
    }

    pub fn airport(&self) -> &str {
        match self {
            Self::Sid(Sid { airport, .. })
            | Self::Star(Star { airport, .. })
            | Self::Approach(Approach { airport, .. }) => airport,
        }
    }

    pub fn kind(&self) -> ProcedureKind {
        match self {
            Self::Sid(_) => ProcedureKind::Sid,
            Self::Star(_) => ProcedureKind::Star,
            Self::Approach(_) => ProcedureKind::Approach,
        }
    }

    /// Every leg from `inbound` through the common route to `outbound`.
    ///
    /// The legs are fresh copies, so holding state is never shared between
    /// callers.
    pub fn select_route(&self, inbound: Option<&str>, outbound: Option<&str>) -> CifpResult<Vec<Instruction>> {
        let (first, common, last) = match self {
            Self::Sid(sid) => {
                let last = match outbound {
                    Some(name) => enroute_transition(&sid.enroute_transitions, name)?,
                    None => catch_all(&sid.enroute_transitions),
                };
                let first = match inbound {
                    Some(name) => runway_transition(&sid.runway_transitions, name)?,
                    None => catch_all(&sid.runway_transitions),
                };
                (first, sid.common_route.as_slice(), last)
            }
            Self::Star(star) => {
                let first = match inbound {
                    Some(name) => enroute_transition(&star.enroute_transitions, name)?,
                    None => catch_all(&star.enroute_transitions),
                };
                let last = match outbound {
                    Some(name) => runway_transition(&star.runway_transitions, name)?,
                    None => catch_all(&star.runway_transitions),
                };
                (first, star.common_route.as_slice(), last)
            }
            Self::Approach(approach) => {
                if outbound.is_some() {
                    return Err(Error::OutboundApproachTransition);
                }
                let first = match inbound {
                    Some(name) => approach.transitions.get(name).map(Vec::as_slice).ok_or_else(|| {
                        Error::UnknownTransition { kind: "Approach", name: name.to_owned() }
                    })?,
                    None => &[],
                };
                (first, approach.common_route.as_slice(), &[][..])
            }
        };

        Ok(first.iter().chain(common).chain(last).cloned().collect())
    }

    /// Builds a procedure from its legs, all sharing one airport and name and
    /// in sequence order.
    pub fn try_assemble(lines: &[ProcedureLine], resolver: &Resolver) -> CifpResult<Self> {
        let head = lines.first().ok_or(Error::EmptyProcedure)?;
        let reference = reference_point(head, lines, resolver)?;

        let mut runway = Transitions::new();
        let mut enroute = Transitions::new();
        let mut common = Vec::new();
        let mut previous: Option<(RouteSegment, char, Option<&str>)> = None;
        let mut current: Vec<Instruction> = Vec::new();

        let mut flush = |group: Option<(RouteSegment, char, Option<&str>)>, instructions: Vec<Instruction>| {
            let Some((segment, _, transition)) = group else {
                return;
            };
            let name = transition.unwrap_or_default().to_owned();
            match segment {
                RouteSegment::CommonRoute => common.extend(instructions),
                RouteSegment::RunwayTransition => runway.entry(name).or_default().extend(instructions),
                RouteSegment::EnrouteTransition | RouteSegment::ApproachTransition => {
                    enroute.entry(name).or_default().extend(instructions)
                }
            }
        };

        for line in lines {
            let segment = line.segment();
            let group = match segment {
                RouteSegment::CommonRoute => (segment, ' ', None),
                _ => (segment, line.route_type, line.transition.as_deref()),
            };
            if previous != Some(group) {
                flush(previous, std::mem::take(&mut current));
                previous = Some(group);
            }
            current.push(normalize(line, reference, resolver)?);
        }
        flush(previous, current);

        let name = head.name.clone();
        let airport = head.airport.clone();
        Ok(match head.kind {
            ProcedureKind::Sid => Self::Sid(Sid {
                name,
                airport,
                runway_transitions: runway,
                common_route: common,
                enroute_transitions: enroute,
            }),
            ProcedureKind::Star => Self::Star(Star {
                name,
                airport,
                enroute_transitions: enroute,
                common_route: common,
                runway_transitions: runway,
            }),
            ProcedureKind::Approach => Self::Approach(Approach {
                name,
                airport,
                transitions: enroute,
                common_route: common,
            }),
        })
    }
}

fn reference_point(head: &ProcedureLine, lines: &[ProcedureLine], resolver: &Resolver) -> CifpResult<Option<Coordinate>> {
    if let Some(aerodrome) = resolver.aerodromes.get(&head.airport) {
        return Ok(Some(aerodrome.location));
    }

    let concrete = lines.iter().find_map(|line| match &line.endpoint {
        Some(Endpoint::Coordinate { position }) => Some(*position),
        _ => None,
    });
    if concrete.is_some() {
        return Ok(concrete);
    }

    let mut named = lines.iter().filter_map(|line| match &line.endpoint {
        Some(Endpoint::Fix { fix }) => Some(fix.name.as_str()),
        _ => None,
    });
    match (named.next(), named.next()) {
        (Some(first), Some(second)) => Ok(Some(resolver.resolve(first, FixReference::Fix(second))?)),
        _ => Ok(None),
    }
}

fn resolve_point(point: &mut NamedPoint, reference: FixReference, resolver: &Resolver) -> CifpResult<()> {
    if point.position.is_none() {
        point.position = Some(resolver.resolve(&point.name, reference)?);
    }
    Ok(())
}

/// Resolves every named point of a leg and fills in missing magnetic
/// variations.
fn normalize(line: &ProcedureLine, reference: Option<Coordinate>, resolver: &Resolver) -> CifpResult<Instruction> {
    let fix_reference = reference.map_or(FixReference::None, FixReference::Point);

    let mut endpoint = line.endpoint.clone();
    match &mut endpoint {
        Some(Endpoint::Fix { fix }) => resolve_point(fix, fix_reference, resolver)?,
        Some(Endpoint::Radial { station, .. }) => resolve_point(station, fix_reference, resolver)?,
        _ => {}
    }

    let mut via = line.via.clone();
    match &mut via {
        Some(Via::Arc { center, .. }) => resolve_point(center, fix_reference, resolver)?,
        Some(Via::Racetrack(racetrack)) => resolve_point(&mut racetrack.fix, fix_reference, resolver)?,
        Some(Via::Radial { station, .. }) => resolve_point(station, fix_reference, resolver)?,
        _ => {}
    }

    let anchor = endpoint.as_ref().and_then(Endpoint::position).or(reference);
    let variation = || -> CifpResult<f64> {
        let anchor = anchor.ok_or_else(|| Error::FloatingGuidance(format!("{} {}", line.airport, line.name)))?;
        if let Some(variation) = line
            .referenced_navaid
            .as_deref()
            .and_then(|navaid| resolver.navaid_variation(navaid, anchor))
        {
            return Ok(variation);
        }
        resolver.local_magnetic_variation(anchor)
    };
    let fill = |course: &mut Course| -> CifpResult<()> {
        if course.lacks_variation() {
            *course = course.with_variation(variation()?);
        }
        Ok(())
    };

    match &mut via {
        Some(Via::Course { course }) => fill(course)?,
        Some(Via::Arc { arc_to, .. }) => fill(arc_to)?,
        Some(Via::Racetrack(racetrack)) => fill(&mut racetrack.inbound_course)?,
        Some(Via::Radial { bearing, .. }) => fill(bearing)?,
        None => {}
    }
    if let Some(Endpoint::Radial { radial, .. }) = &mut endpoint {
        fill(radial)?;
    }

    Ok(Instruction {
        termination: line.termination,
        endpoint,
        via,
        speed: line.speed,
        altitude: line.altitude,
        overfly: line.overfly,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msl(feet: i32) -> Option<Altitude> {
        Some(Altitude::msl(feet))
    }

    #[test]
    fn test_plain_restrictions() {
        assert!(AltitudeRestriction::from_description(' ', None, None).unwrap().is_unrestricted());
        assert_eq!(
            AltitudeRestriction::from_description('@', msl(5000), None).unwrap(),
            AltitudeRestriction::new(msl(5000), msl(5000))
        );
        assert_eq!(
            AltitudeRestriction::from_description('-', msl(5000), None).unwrap(),
            AltitudeRestriction::new(None, msl(5000))
        );
        assert_eq!(
            AltitudeRestriction::from_description('B', msl(8000), msl(6000)).unwrap(),
            AltitudeRestriction::new(msl(8000), msl(6000))
        );
    }

    #[test]
    fn test_advisory_second_altitude() {
        let restriction = AltitudeRestriction::from_description('G', msl(3000), msl(2900)).unwrap();
        assert_eq!(restriction, AltitudeRestriction::new(msl(3000), None));
        let restriction = AltitudeRestriction::from_description('G', msl(1800), None).unwrap();
        assert_eq!(restriction, AltitudeRestriction::new(msl(1800), None));
        let restriction = AltitudeRestriction::from_description('I', msl(2200), msl(1900)).unwrap();
        assert_eq!(restriction, AltitudeRestriction::new(msl(2200), msl(2200)));
    }

    #[test]
    fn test_irregular_restrictions() {
        assert_eq!(
            AltitudeRestriction::from_description('J', msl(4000), None).unwrap(),
            AltitudeRestriction::new(msl(4000), None)
        );
        assert_eq!(
            AltitudeRestriction::from_description('+', msl(4000), msl(4000)).unwrap(),
            AltitudeRestriction::new(msl(4000), None)
        );
        assert_eq!(
            AltitudeRestriction::from_description('+', msl(4000), msl(6000)).unwrap(),
            AltitudeRestriction::new(msl(4000), msl(6000))
        );
        assert_eq!(
            AltitudeRestriction::from_description('+', msl(6000), msl(4000)).unwrap(),
            AltitudeRestriction::new(msl(6000), None)
        );
        assert_eq!(
            AltitudeRestriction::from_description('-', msl(4000), msl(6000)).unwrap(),
            AltitudeRestriction::new(msl(4000), msl(6000))
        );
    }

    #[test]
    fn test_invalid_restrictions() {
        assert!(AltitudeRestriction::from_description('B', msl(4000), None).is_err());
        assert!(AltitudeRestriction::from_description('@', msl(4000), msl(3000)).is_err());
        assert!(AltitudeRestriction::from_description('-', msl(6000), msl(4000)).is_err());
        assert!(AltitudeRestriction::from_description('+', None, msl(4000)).is_err());
        assert!(matches!(
            AltitudeRestriction::from_description('Q', msl(4000), None),
            Err(Error::InvalidRestriction(_))
        ));
    }

    #[test]
    fn test_restriction_strings() {
        let band = AltitudeRestriction::new(msl(6000), msl(8000));
        assert_eq!(band.to_string(), "\\60 80\\");
        assert_eq!("\\60 80\\".parse::<AltitudeRestriction>().unwrap(), band);
        assert_eq!(AltitudeRestriction::new(Some(Altitude::flight_level(180)), None).to_string(), "\\180");
        assert_eq!("50\\".parse::<AltitudeRestriction>().unwrap(), AltitudeRestriction::new(None, msl(5000)));
        assert!("Unrestricted".parse::<AltitudeRestriction>().unwrap().is_unrestricted());
        assert!("sixty".parse::<AltitudeRestriction>().is_err());

        let speed = SpeedRestriction::new(Some(210), Some(250));
        assert_eq!(speed.to_string(), "\\210K 250K\\");
        assert_eq!("\\210K 250K\\".parse::<SpeedRestriction>().unwrap(), speed);
        assert_eq!("230K\\".parse::<SpeedRestriction>().unwrap(), SpeedRestriction::new(None, Some(230)));
        assert_eq!(SpeedRestriction::unrestricted().to_string(), "Unrestricted");
    }

    fn direct_to(fix: &str) -> Instruction {
        Instruction {
            termination: "DF".parse().unwrap(),
            endpoint: Some(Endpoint::Fix { fix: NamedPoint::new(fix) }),
            via: None,
            speed: SpeedRestriction::unrestricted(),
            altitude: AltitudeRestriction::unrestricted(),
            overfly: false,
        }
    }

    fn legs(fixes: &[&str]) -> Vec<Instruction> {
        fixes.iter().map(|fix| direct_to(fix)).collect()
    }

    fn transitions(entries: &[(&str, &[&str])]) -> Transitions {
        entries.iter().map(|(name, fixes)| (name.to_string(), legs(fixes))).collect()
    }

    fn fix_names(route: &[Instruction]) -> Vec<&str> {
        route
            .iter()
            .filter_map(|instruction| match &instruction.endpoint {
                Some(Endpoint::Fix { fix }) => Some(fix.name.as_str()),
                _ => None,
            })
            .collect()
    }

    fn arrival() -> Procedure {
        Procedure::Star(Star {
            name: "ANJLL4".to_owned(),
            airport: "KLAX".to_owned(),
            enroute_transitions: transitions(&[("TRTLS", &["TRTLS", "JUULI"][..]), ("ALL", &["RIIVR"][..])]),
            common_route: legs(&["ANJLL", "DAHJR"]),
            runway_transitions: transitions(&[("RW24B", &["SMO", "GADDO"][..]), ("RW25L", &["FUELR"][..])]),
        })
    }

    fn approach() -> Procedure {
        Procedure::Approach(Approach {
            name: "I24R".to_owned(),
            airport: "KLAX".to_owned(),
            transitions: transitions(&[("SLI", &["SLI", "LIMMA"][..])]),
            common_route: legs(&["SKOLL", "FALLT"]),
        })
    }

    #[test]
    fn test_arrival_route_order() {
        let route = arrival().select_route(Some("TRTLS"), Some("RW25L")).unwrap();
        assert_eq!(fix_names(&route), ["TRTLS", "JUULI", "ANJLL", "DAHJR", "FUELR"]);
    }

    #[test]
    fn test_parallel_runway_transition() {
        let star = arrival();
        let left = star.select_route(Some("TRTLS"), Some("RW24L")).unwrap();
        assert_eq!(fix_names(&left), ["TRTLS", "JUULI", "ANJLL", "DAHJR", "SMO", "GADDO"]);
        let right = star.select_route(Some("TRTLS"), Some("RW24R")).unwrap();
        assert_eq!(left, right);

        assert!(matches!(
            star.select_route(Some("TRTLS"), Some("RW25R")),
            Err(Error::UnknownTransition { kind: "Runway", name }) if name == "RW25R"
        ));
    }

    #[test]
    fn test_catch_all_transition() {
        let route = arrival().select_route(None, None).unwrap();
        assert_eq!(fix_names(&route), ["RIIVR", "ANJLL", "DAHJR"]);
    }

    #[test]
    fn test_approach_transitions() {
        let approach = approach();
        let route = approach.select_route(Some("SLI"), None).unwrap();
        assert_eq!(fix_names(&route), ["SLI", "LIMMA", "SKOLL", "FALLT"]);
        assert_eq!(fix_names(&approach.select_route(None, None).unwrap()), ["SKOLL", "FALLT"]);

        assert!(matches!(
            approach.select_route(Some("SLI"), Some("RW24R")),
            Err(Error::OutboundApproachTransition)
        ));
        assert!(matches!(
            approach.select_route(Some("BAYST"), None),
            Err(Error::UnknownTransition { kind: "Approach", name }) if name == "BAYST"
        ));
    }

    #[test]
    fn test_restriction_contains() {
        let band = AltitudeRestriction::new(msl(6000), msl(8000));
        assert!(band.contains(&Altitude::msl(7000)));
        assert!(!band.contains(&Altitude::flight_level(90)));
        assert!(band.contains(&Altitude::agl(7000, None)));
        assert!(SpeedRestriction::new(None, Some(250)).contains(210));
        assert!(!SpeedRestriction::new(None, Some(250)).contains(280));
    }
}
