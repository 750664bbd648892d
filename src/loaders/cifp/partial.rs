use std::collections::HashMap;

use tracing::warn;

use crate::{
    error::Error,
    package::{
        airspace::Airspace,
        airway::Airway,
        procedure::Procedure,
        resolver::{FixTable, Resolver},
        Cifp,
    },
};

use super::{
    aerodrome::{Aerodrome, AirportMsa, PathPoint, Runway},
    airspace::{AirspaceSegment, GridMora},
    enroute::{AirwayFixLine, Waypoint},
    navaid::Navaid,
    procedure::ProcedureLine,
    CifpRecord,
};

/// A group of records that is assembled once every fix is known, with the
/// line number and key it was read under.
pub struct Group<T> {
    pub line_number: usize,
    pub key: String,
    pub records: Vec<T>,
}

/// First pass tables, filled record by record while reading.
#[derive(Default)]
pub struct PartialCifp {
    pub magnetic_variation_radii: Vec<f64>,
    pub moras: Vec<GridMora>,
    pub airspaces: Vec<Group<AirspaceSegment>>,
    pub navaids: HashMap<String, Vec<Navaid>>,
    pub waypoints: Vec<Waypoint>,
    pub airways: Vec<Group<AirwayFixLine>>,
    pub aerodromes: HashMap<String, Aerodrome>,
    pub runways: HashMap<String, Vec<Runway>>,
    pub path_points: Vec<PathPoint>,
    pub msas: Vec<AirportMsa>,
    pub procedures: Vec<Group<ProcedureLine>>,
    pub cycle: u16,
    pub errors: Vec<(usize, String, Error)>,
}

impl PartialCifp {
    pub fn new(magnetic_variation_radii: Vec<f64>) -> Self {
        Self { magnetic_variation_radii, ..Default::default() }
    }

    /// Files a single line record. Grouped records go through
    /// [`Self::add_group`] instead.
    pub fn add_record(&mut self, record: CifpRecord) {
        self.cycle = self.cycle.max(record.cycle());
        match record {
            CifpRecord::GridMora(mora) => self.moras.push(mora),
            CifpRecord::Navaid(navaid) => self.navaids.entry(navaid.identifier.clone()).or_default().push(navaid),
            CifpRecord::Waypoint(waypoint) => self.waypoints.push(waypoint),
            CifpRecord::Aerodrome(aerodrome) => {
                self.aerodromes.insert(aerodrome.identifier.clone(), aerodrome);
            }
            CifpRecord::Runway(runway) => self.runways.entry(runway.airport.clone()).or_default().push(runway),
            CifpRecord::PathPoint(point) => self.path_points.push(point),
            CifpRecord::Msa(msa) => self.msas.push(msa),
            CifpRecord::AirspaceSegment(segment) => self.airspaces.push(Group {
                line_number: 0,
                key: segment.designator.clone(),
                records: vec![segment],
            }),
            CifpRecord::AirwayFix(fix) => self.airways.push(Group {
                line_number: 0,
                key: fix.airway.clone(),
                records: vec![fix],
            }),
            CifpRecord::ProcedureLeg(leg) => self.procedures.push(Group {
                line_number: 0,
                key: format!("{} {}", leg.airport, leg.name),
                records: vec![leg],
            }),
        }
    }

    /// Files one multi-line group of airspace segments, airway fixes or
    /// procedure legs.
    pub fn add_group(&mut self, line_number: usize, key: String, records: Vec<CifpRecord>) {
        let mut segments = Vec::new();
        let mut fixes = Vec::new();
        let mut legs = Vec::new();
        for record in records {
            self.cycle = self.cycle.max(record.cycle());
            match record {
                CifpRecord::AirspaceSegment(segment) => segments.push(segment),
                CifpRecord::AirwayFix(fix) => fixes.push(fix),
                CifpRecord::ProcedureLeg(leg) => legs.push(leg),
                record => self.add_record(record),
            }
        }

        if !segments.is_empty() {
            self.airspaces.push(Group { line_number, key: key.clone(), records: segments });
        }
        if !fixes.is_empty() {
            self.airways.push(Group { line_number, key: key.clone(), records: fixes });
        }
        if !legs.is_empty() {
            self.procedures.push(Group { line_number, key, records: legs });
        }
    }

    /// Every named point: navaids, waypoints, aerodromes, runway thresholds
    /// and path points.
    fn fix_table(&self) -> FixTable {
        let mut fixes = FixTable::default();
        for navaid in self.navaids.values().flatten() {
            fixes.insert(navaid.identifier.as_str(), navaid.position);
        }
        for waypoint in &self.waypoints {
            fixes.insert(waypoint.identifier.as_str(), waypoint.position);
        }
        for aerodrome in self.aerodromes.values() {
            fixes.insert(aerodrome.identifier.as_str(), aerodrome.location);
        }
        for runway in self.runways.values().flatten() {
            for name in runway.fix_names() {
                fixes.insert(name, runway.threshold);
            }
        }
        for point in &self.path_points {
            for name in point.fix_names() {
                fixes.insert(name, point.position);
            }
        }
        fixes
    }
}

fn record_failure(errors: &mut Vec<(usize, String, Error)>, line_number: usize, key: &str, error: Error) {
    warn!(line_number, key, %error, "Skipping group");
    errors.push((line_number, key.to_owned(), error));
}

impl TryFrom<PartialCifp> for Cifp {
    type Error = Error;
    fn try_from(value: PartialCifp) -> Result<Self, Self::Error> {
        let fixes = value.fix_table();
        let mut errors = value.errors;

        let mut airspaces = Vec::with_capacity(value.airspaces.len());
        for group in value.airspaces {
            match Airspace::try_assemble(group.records) {
                Ok(airspace) => airspaces.push(airspace),
                Err(error) => record_failure(&mut errors, group.line_number, &group.key, error),
            }
        }

        let resolver = Resolver {
            fixes: &fixes,
            navaids: &value.navaids,
            aerodromes: &value.aerodromes,
            radii: &value.magnetic_variation_radii,
        };

        let mut airways: HashMap<String, Vec<Airway>> = HashMap::new();
        for group in &value.airways {
            match Airway::try_assemble(&group.records, &resolver) {
                Ok(airway) => airways.entry(airway.identifier.clone()).or_default().push(airway),
                Err(error) => record_failure(&mut errors, group.line_number, &group.key, error),
            }
        }

        let mut procedures: HashMap<String, Vec<Procedure>> = HashMap::new();
        for group in &value.procedures {
            match Procedure::try_assemble(&group.records, &resolver) {
                Ok(procedure) => procedures.entry(procedure.airport().to_owned()).or_default().push(procedure),
                Err(error) => record_failure(&mut errors, group.line_number, &group.key, error),
            }
        }

        Ok(Cifp {
            moras: value.moras,
            airspaces,
            aerodromes: value.aerodromes,
            runways: value.runways,
            msas: value.msas,
            fixes,
            navaids: value.navaids,
            airways,
            procedures,
            cycle: value.cycle,
            non_critical_errors: errors,
        })
    }
}
