use geojson::{Feature, Geometry, Value};
use serde::{Deserialize, Serialize};
use serde_json::Map;

use crate::{
    geo::Coordinate,
    loaders::cifp::{
        aerodrome::{Aerodrome, AerodromeKind},
        navaid::{Navaid, NavaidKind},
    },
};

/// A named point feature: a navaid, an aerodrome or a fix.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapSymbol {
    pub name: String,
    pub symbol_type: String,
    pub feature: Feature,
}

impl MapSymbol {
    pub fn try_from_position(item_type: &str, ident: &str, position: Coordinate) -> anyhow::Result<Self> {
        // Properties
        let mut props_map = Map::new();
        props_map.insert("text".to_string(), serde_json::to_value(ident)?);

        Ok(MapSymbol {
            name: format!("{}_{}", item_type, ident),
            symbol_type: item_type.to_string(),
            feature: Feature {
                id: None,
                bbox: None,
                foreign_members: None,
                geometry: Some(Geometry::new(Value::Point(vec![position.lon, position.lat]))),
                properties: Some(props_map),
            },
        })
    }

    pub fn try_from_navaid(navaid: &Navaid) -> anyhow::Result<Self> {
        let item_type = match navaid.kind {
            NavaidKind::Ndb { .. } => "ndbs",
            NavaidKind::Vor { .. } => "vors",
            NavaidKind::Dme { .. } => "dmes",
            NavaidKind::Localizer { .. } | NavaidKind::Ils { .. } => "localizers",
        };
        let mut symbol = Self::try_from_position(item_type, &navaid.identifier, navaid.position)?;
        if let Some(props_map) = symbol.feature.properties.as_mut() {
            props_map.insert("description".to_string(), serde_json::to_value(&navaid.name)?);
        }
        Ok(symbol)
    }

    pub fn try_from_aerodrome(aerodrome: &Aerodrome) -> anyhow::Result<Self> {
        let item_type = match aerodrome.kind {
            AerodromeKind::Airport { .. } => "airports",
            AerodromeKind::Heliport { .. } => "heliports",
        };
        let mut symbol = Self::try_from_position(item_type, &aerodrome.identifier, aerodrome.location)?;
        if let Some(props_map) = symbol.feature.properties.as_mut() {
            props_map.insert("description".to_string(), serde_json::to_value(&aerodrome.name)?);
            props_map.insert("elevation".to_string(), serde_json::to_value(aerodrome.elevation.feet())?);
        }
        Ok(symbol)
    }
}
