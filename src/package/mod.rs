use std::collections::HashMap;

use crate::{
    error::Error,
    geo::{Altitude, Coordinate},
    loaders::cifp::{
        aerodrome::{Aerodrome, AirportMsa, Runway, RunwayIdentifier},
        airspace::GridMora,
        navaid::Navaid,
    },
};

pub mod airspace;
pub mod airway;
pub mod cache;
pub mod guidance;
pub mod map;
pub mod procedure;
pub mod resolver;
pub mod symbol;

pub use procedure::{AltitudeRestriction, Instruction, Procedure, SpeedRestriction};

use airspace::Airspace;
use airway::Airway;
use map::AirspaceMap;
use resolver::{FixTable, Resolver};
use symbol::MapSymbol;

/// The cross-referenced contents of one CIFP distribution.
#[derive(Debug, Default)]
pub struct Cifp {
    pub moras: Vec<GridMora>,
    pub airspaces: Vec<Airspace>,
    pub aerodromes: HashMap<String, Aerodrome>,
    /// Keyed by airport identifier.
    pub runways: HashMap<String, Vec<Runway>>,
    pub msas: Vec<AirportMsa>,
    pub fixes: FixTable,
    pub navaids: HashMap<String, Vec<Navaid>>,
    /// One identifier may name several unconnected airways.
    pub airways: HashMap<String, Vec<Airway>>,
    /// Keyed by airport identifier.
    pub procedures: HashMap<String, Vec<Procedure>>,
    /// Latest AIRAC cycle of any record.
    pub cycle: u16,
    pub non_critical_errors: Vec<(usize, String, Error)>,
}

impl Cifp {
    /// Every candidate position of a named point.
    pub fn fix(&self, name: &str) -> Option<&[Coordinate]> {
        self.fixes.get(name)
    }

    pub fn navaid(&self, identifier: &str) -> Option<&[Navaid]> {
        self.navaids.get(identifier).map(Vec::as_slice)
    }

    pub fn aerodrome(&self, identifier: &str) -> Option<&Aerodrome> {
        self.aerodromes.get(identifier)
    }

    pub fn runways(&self, airport: &str) -> Option<&[Runway]> {
        self.runways.get(airport).map(Vec::as_slice)
    }

    pub fn runway(&self, airport: &str, identifier: &RunwayIdentifier) -> Option<&Runway> {
        self.runways(airport)?.iter().find(|runway| runway.identifier == *identifier)
    }

    pub fn airway(&self, identifier: &str) -> Option<&[Airway]> {
        self.airways.get(identifier).map(Vec::as_slice)
    }

    pub fn procedure(&self, airport: &str, name: &str) -> Option<&Procedure> {
        self.procedures.get(airport)?.iter().find(|procedure| procedure.name() == name)
    }

    /// Every procedure published under `name`, at any airport.
    pub fn procedures_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Procedure> + 'a {
        self.procedures.values().flatten().filter(move |procedure| procedure.name() == name)
    }

    pub fn msa<'a>(&'a self, airport: &'a str) -> impl Iterator<Item = &'a AirportMsa> + 'a {
        self.msas.iter().filter(move |msa| msa.airport == airport)
    }

    pub fn airspaces_containing(&self, point: Coordinate, altitude: Altitude) -> impl Iterator<Item = &Airspace> {
        self.airspaces.iter().filter(move |airspace| airspace.contains(point, altitude))
    }

    /// A resolver over this dataset's fixes, searching `radii` for magnetic
    /// variation.
    pub fn resolver<'a>(&'a self, radii: &'a [f64]) -> Resolver<'a> {
        Resolver {
            fixes: &self.fixes,
            navaids: &self.navaids,
            aerodromes: &self.aerodromes,
            radii,
        }
    }

    /// Airspace polygons keyed by map name.
    pub fn maps(&self) -> anyhow::Result<HashMap<String, AirspaceMap>> {
        let mut maps = HashMap::new();
        for airspace in &self.airspaces {
            let val = AirspaceMap::try_from_airspace(airspace)?;
            maps.insert(val.name.to_string(), val);
        }
        Ok(maps)
    }

    /// Navaid, aerodrome and waypoint symbols keyed by symbol name.
    pub fn symbols(&self) -> anyhow::Result<HashMap<String, MapSymbol>> {
        let mut symbols = HashMap::new();

        // Navaids
        for navaid in self.navaids.values().flatten() {
            let val = MapSymbol::try_from_navaid(navaid)?;
            symbols.insert(val.name.to_string(), val);
        }

        // Aerodromes
        for aerodrome in self.aerodromes.values() {
            let val = MapSymbol::try_from_aerodrome(aerodrome)?;
            symbols.insert(val.name.to_string(), val);
        }

        // Fixes not already drawn
        for (name, positions) in self.fixes.iter() {
            if self.navaids.contains_key(name) || self.aerodromes.contains_key(name) {
                continue;
            }
            for (index, position) in positions.iter().enumerate() {
                let val = match index {
                    0 => MapSymbol::try_from_position("fixes", name, *position)?,
                    _ => MapSymbol::try_from_position("fixes", &format!("{name}_{index}"), *position)?,
                };
                symbols.insert(val.name.to_string(), val);
            }
        }

        Ok(symbols)
    }
}
