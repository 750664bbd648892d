use std::{fs::File, io::BufReader, path::{Path, PathBuf}};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::package::resolver::DEFAULT_VARIATION_RADII;

/// Settings for loading a distribution. Every field is optional in the JSON
/// document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoaderConfig {
    /// Search radii (nmi) tried in order when a course has no magnetic
    /// variation of its own.
    pub magnetic_variation_radii: Vec<f64>,
    pub include_restrictive_airspace: bool,
    /// Defaults to the platform cache directory.
    pub cache_dir: Option<PathBuf>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            magnetic_variation_radii: DEFAULT_VARIATION_RADII.to_vec(),
            include_restrictive_airspace: true,
            cache_dir: None,
        }
    }
}

impl LoaderConfig {
    pub fn try_new_from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("Could not open config {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file)).with_context(|| format!("Invalid config {}", path.display()))
    }
}
