use serde::{Deserialize, Serialize};

use crate::{
    error::{CifpResult, Error},
    geo::Coordinate,
    loaders::cifp::enroute::AirwayFixLine,
};

use super::{
    procedure::AltitudeRestriction,
    resolver::{FixReference, Resolver},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirwayFix {
    pub name: String,
    pub point: Coordinate,
    pub inbound_altitude: AltitudeRestriction,
    pub outbound_altitude: AltitudeRestriction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Airway {
    pub identifier: String,
    pub fixes: Vec<AirwayFix>,
    pub cycle: u16,
}

impl Airway {
    /// Resolves each fix against its neighbour: the first against the name of
    /// the second, every later one against the point before it.
    pub fn try_assemble(lines: &[AirwayFixLine], resolver: &Resolver) -> CifpResult<Self> {
        let identifier = lines.first().map(|line| line.airway.clone()).unwrap_or_default();
        let [first, second, ..] = lines else {
            return Err(Error::ShortAirway(identifier));
        };

        let mut fixes: Vec<AirwayFix> = Vec::with_capacity(lines.len());
        let mut previous = resolver.resolve(&first.fix, FixReference::Fix(&second.fix))?;
        fixes.push(airway_fix(first, previous));

        for line in &lines[1..] {
            previous = resolver.resolve(&line.fix, FixReference::Point(previous))?;
            fixes.push(airway_fix(line, previous));
        }

        Ok(Self {
            identifier,
            fixes,
            cycle: lines.iter().map(|line| line.cycle).max().unwrap_or_default(),
        })
    }

    pub fn fix(&self, name: &str) -> Option<&AirwayFix> {
        self.fixes.iter().find(|fix| fix.name == name)
    }

    /// The fixes flown from `entry` to `exit`, in either direction.
    pub fn segment(&self, entry: &str, exit: &str) -> Option<Vec<&AirwayFix>> {
        let from = self.fixes.iter().position(|fix| fix.name == entry)?;
        let to = self.fixes.iter().position(|fix| fix.name == exit)?;
        Some(if from <= to {
            self.fixes[from..=to].iter().collect()
        } else {
            self.fixes[to..=from].iter().rev().collect()
        })
    }
}

fn airway_fix(line: &AirwayFixLine, point: Coordinate) -> AirwayFix {
    AirwayFix {
        name: line.fix.clone(),
        point,
        inbound_altitude: line.inbound_altitude,
        outbound_altitude: line.outbound_altitude,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::{
        loaders::cifp::enroute::AirwayLevel,
        package::resolver::{FixTable, DEFAULT_VARIATION_RADII},
    };

    fn line(fix: &str, sequence: u16) -> AirwayFixLine {
        AirwayFixLine {
            client: "USA".to_owned(),
            airway: "V25".to_owned(),
            sequence,
            fix: fix.to_owned(),
            rnav: false,
            level: AirwayLevel::Low,
            outbound_course: None,
            distance: None,
            inbound_course: None,
            outbound_altitude: AltitudeRestriction::unrestricted(),
            inbound_altitude: AltitudeRestriction::unrestricted(),
            file_record_number: u32::from(sequence),
            cycle: 1703 + sequence % 2,
        }
    }

    #[test]
    fn test_neighbour_resolution() {
        let mut fixes = FixTable::default();
        fixes.insert("ONE", Coordinate::new(34.0, -118.0));
        fixes.insert("ONE", Coordinate::new(-34.0, 151.0));
        fixes.insert("TWO", Coordinate::new(34.5, -118.5));
        fixes.insert("THREE", Coordinate::new(35.0, -119.0));
        fixes.insert("THREE", Coordinate::new(-35.0, 150.0));
        let navaids = HashMap::new();
        let aerodromes = HashMap::new();
        let resolver = Resolver {
            fixes: &fixes,
            navaids: &navaids,
            aerodromes: &aerodromes,
            radii: &DEFAULT_VARIATION_RADII,
        };

        let airway = Airway::try_assemble(&[line("ONE", 10), line("TWO", 20), line("THREE", 30)], &resolver).unwrap();
        assert_eq!(airway.identifier, "V25");
        assert_eq!(airway.cycle, 1704);
        assert_eq!(airway.fixes[0].point, Coordinate::new(34.0, -118.0));
        assert_eq!(airway.fixes[2].point, Coordinate::new(35.0, -119.0));

        let names: Vec<_> = airway.segment("THREE", "TWO").unwrap().iter().map(|fix| fix.name.as_str()).collect();
        assert_eq!(names, ["THREE", "TWO"]);
        assert!(airway.segment("ONE", "FOUR").is_none());
    }

    #[test]
    fn test_short_airway() {
        let fixes = FixTable::default();
        let navaids = HashMap::new();
        let aerodromes = HashMap::new();
        let resolver = Resolver {
            fixes: &fixes,
            navaids: &navaids,
            aerodromes: &aerodromes,
            radii: &DEFAULT_VARIATION_RADII,
        };
        assert!(matches!(
            Airway::try_assemble(&[line("ONE", 10)], &resolver),
            Err(Error::ShortAirway(name)) if name == "V25"
        ));
    }
}
