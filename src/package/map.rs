use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde::{Deserialize, Serialize};
use serde_json::Map;

use crate::loaders::cifp::airspace::AirspaceKind;

use super::airspace::Airspace;

/// GeoJSON rendition of one airspace, one polygon per boundary loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirspaceMap {
    pub name: String,
    pub map_type: String,
    pub features: FeatureCollection,
}

pub(crate) fn kind_key(kind: &AirspaceKind) -> String {
    match kind {
        AirspaceKind::Controlled { class } => format!("class_{class:?}").to_lowercase(),
        AirspaceKind::Restrictive { restriction } => format!("restrictive_{restriction:?}").to_lowercase(),
    }
}

impl AirspaceMap {
    pub fn try_from_airspace(airspace: &Airspace) -> anyhow::Result<Self> {
        let map_type = kind_key(&airspace.kind);
        let name = format!("{}_{}", map_type, airspace.designator);

        let mut features = Vec::with_capacity(airspace.loops.len());
        for boundary in &airspace.loops {
            // Properties
            let mut props_map = Map::new();
            props_map.insert("designator".to_string(), serde_json::to_value(&airspace.designator)?);
            if let Some(airspace_name) = &airspace.name {
                props_map.insert("text".to_string(), serde_json::to_value(airspace_name)?);
            }
            if let Some(lower) = boundary.vertical.minimum {
                props_map.insert("lower".to_string(), serde_json::to_value(lower.to_string())?);
            }
            if let Some(upper) = boundary.vertical.maximum {
                props_map.insert("upper".to_string(), serde_json::to_value(upper.to_string())?);
            }

            let ring = boundary
                .outline()?
                .iter()
                .map(|vert| vec![vert.lon, vert.lat])
                .collect::<Vec<Vec<f64>>>();

            features.push(Feature {
                id: None,
                bbox: None,
                foreign_members: None,
                geometry: Some(Geometry::new(Value::Polygon(vec![ring]))),
                properties: Some(props_map),
            });
        }

        Ok(AirspaceMap {
            name,
            map_type,
            features: FeatureCollection {
                bbox: None,
                features,
                foreign_members: None,
            },
        })
    }
}
