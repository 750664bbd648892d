use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    error::{CifpResult, Error},
    geo::Coordinate,
    loaders::cifp::{aerodrome::Aerodrome, navaid::Navaid},
};

pub const DEFAULT_VARIATION_RADII: [f64; 5] = [50.0, 100.0, 150.0, 200.0, 250.0];

/// Every named point in the dataset. One identifier may name several
/// different points in different regions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FixTable {
    fixes: HashMap<String, Vec<Coordinate>>,
}

/// What an ambiguous identifier is resolved against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FixReference<'a> {
    None,
    Point(Coordinate),
    Fix(&'a str),
}

impl FixTable {
    pub fn insert(&mut self, name: impl Into<String>, position: Coordinate) {
        let candidates = self.fixes.entry(name.into()).or_default();
        if !candidates.contains(&position) {
            candidates.push(position);
        }
    }

    /// All candidate positions for `name`.
    pub fn get(&self, name: &str) -> Option<&[Coordinate]> {
        self.fixes.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fixes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<Coordinate>)> {
        self.fixes.iter()
    }

    pub fn resolve(&self, name: &str, reference: FixReference) -> CifpResult<Coordinate> {
        let candidates = self.get(name).ok_or_else(|| Error::UnknownFix(name.to_owned()))?;
        if let [only] = candidates {
            return Ok(*only);
        }

        match reference {
            FixReference::Point(point) => nearest(candidates, |candidate| candidate.distance_to(&point)),
            FixReference::Fix(other) => {
                let others = self.get(other).ok_or_else(|| Error::UnknownFix(other.to_owned()))?;
                nearest(candidates, |candidate| {
                    others
                        .iter()
                        .map(|position| candidate.distance_to(position))
                        .fold(f64::INFINITY, f64::min)
                })
            }
            FixReference::None => None,
        }
        .ok_or_else(|| Error::AmbiguousFix(name.to_owned()))
    }
}

fn nearest(candidates: &[Coordinate], score: impl Fn(&Coordinate) -> f64) -> Option<Coordinate> {
    candidates
        .iter()
        .map(|candidate| (score(candidate), *candidate))
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, candidate)| candidate)
}

/// Read only view over the first pass tables used while assembling airways
/// and procedures.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    pub fixes: &'a FixTable,
    pub navaids: &'a HashMap<String, Vec<Navaid>>,
    pub aerodromes: &'a HashMap<String, Aerodrome>,
    pub radii: &'a [f64],
}

impl<'a> Resolver<'a> {
    pub fn resolve(&self, name: &str, reference: FixReference) -> CifpResult<Coordinate> {
        self.fixes.resolve(name, reference)
    }

    /// Variation of the closest navaid called `identifier`, if any carries one.
    pub fn navaid_variation(&self, identifier: &str, near: Coordinate) -> Option<f64> {
        self.navaids
            .get(identifier)?
            .iter()
            .filter_map(|navaid| Some((navaid.position.distance_to(&near), navaid.magnetic_variation?)))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, variation)| variation)
    }

    /// Searches outwards from `around`, preferring navaids over aerodromes
    /// within each radius.
    pub fn local_magnetic_variation(&self, around: Coordinate) -> CifpResult<f64> {
        for radius in self.radii {
            let navaid = self
                .navaids
                .values()
                .flatten()
                .filter_map(|navaid| Some((navaid.position.distance_to(&around), navaid.magnetic_variation?)))
                .filter(|(distance, _)| distance < radius)
                .min_by(|a, b| a.0.total_cmp(&b.0));
            if let Some((_, variation)) = navaid {
                return Ok(variation);
            }

            let aerodrome = self
                .aerodromes
                .values()
                .map(|aerodrome| (aerodrome.location.distance_to(&around), aerodrome.magnetic_variation))
                .filter(|(distance, _)| distance < radius)
                .min_by(|a, b| a.0.total_cmp(&b.0));
            if let Some((_, variation)) = aerodrome {
                return Ok(variation);
            }
        }

        Err(Error::MagneticVariationNotFound(around))
    }
}
