use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context;
use tracing::info;

use crate::{
    config::LoaderConfig,
    package::{cache, Cifp},
};

use super::reader::CifpReader;

/// Opens distribution files and keeps the on-disk cache in step with them.
#[derive(Debug, Clone, Default)]
pub struct CifpLoader {
    pub config: LoaderConfig,
}

impl CifpLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub fn try_new_from_config_file(config_file: impl AsRef<Path>) -> anyhow::Result<Self> {
        Ok(Self::new(LoaderConfig::try_new_from_file(config_file)?))
    }

    /// The configured cache directory, or the platform one.
    pub fn cache_dir(&self) -> anyhow::Result<PathBuf> {
        match &self.config.cache_dir {
            Some(dir) => Ok(dir.clone()),
            None => cache::default_cache_dir(),
        }
    }

    pub fn load_file(&self, path: impl AsRef<Path>) -> anyhow::Result<Cifp> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("Could not open CIFP file {}", path.display()))?;

        let cifp = CifpReader::with_config(BufReader::new(file), &self.config)
            .try_read()
            .with_context(|| format!("Could not read CIFP file {}", path.display()))?;

        info!(
            cycle = cifp.cycle,
            fixes = cifp.fixes.len(),
            airspaces = cifp.airspaces.len(),
            procedures = cifp.procedures.values().map(Vec::len).sum::<usize>(),
            skipped = cifp.non_critical_errors.len(),
            "Loaded {}",
            path.display()
        );
        Ok(cifp)
    }

    pub fn load_cached(&self) -> anyhow::Result<Cifp> {
        cache::load(&self.cache_dir()?)
    }

    /// Parses `source` and refreshes the cache when the file exists, otherwise
    /// falls back to the cache.
    pub fn load_or_cached(&self, source: Option<&Path>) -> anyhow::Result<Cifp> {
        match source {
            Some(path) if path.exists() => {
                let cifp = self.load_file(path)?;
                cache::save(&cifp, &self.cache_dir()?)?;
                Ok(cifp)
            }
            _ => self.load_cached().context("No CIFP file given and no usable cache"),
        }
    }
}
