//! Gzip compressed JSON snapshot of a loaded [`Cifp`], one document per table.
//!
//! Airspace geometry is not written; a restored model has no airspaces and no
//! non-critical errors.

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use directories::ProjectDirs;
use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::info;

use super::Cifp;

const FORMAT_VERSION: u32 = 1;
const MANIFEST: &str = "manifest";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheManifest {
    pub format_version: u32,
    pub cycle: u16,
}

/// The platform cache directory for this crate.
pub fn default_cache_dir() -> anyhow::Result<PathBuf> {
    Ok(ProjectDirs::from("", "", "cifp-reader")
        .context("Failed to get project directories")?
        .cache_dir()
        .to_path_buf())
}

fn table_path(dir: &Path, table: &str) -> PathBuf {
    dir.join(format!("{table}.json.gz"))
}

fn write_table<T: Serialize + ?Sized>(dir: &Path, table: &str, value: &T) -> anyhow::Result<()> {
    let path = table_path(dir, table);
    let file = File::create(&path).with_context(|| format!("Could not create {}", path.display()))?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    serde_json::to_writer(&mut encoder, value).with_context(|| format!("Could not write {table} table"))?;
    encoder.finish()?.flush()?;
    Ok(())
}

fn read_table<T: DeserializeOwned>(dir: &Path, table: &str) -> anyhow::Result<T> {
    let path = table_path(dir, table);
    let file = File::open(&path).with_context(|| format!("Could not open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(GzDecoder::new(file))).with_context(|| format!("Invalid {table} table"))
}

/// Writes every table of `cifp` into `dir`, creating it if needed. The
/// manifest goes last so an interrupted write is never read back.
pub fn save(cifp: &Cifp, dir: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Could not create cache directory {}", dir.display()))?;

    write_table(dir, "moras", &cifp.moras)?;
    write_table(dir, "fixes", &cifp.fixes)?;
    write_table(dir, "navaids", &cifp.navaids)?;
    write_table(dir, "aerodromes", &cifp.aerodromes)?;
    write_table(dir, "runways", &cifp.runways)?;
    write_table(dir, "msas", &cifp.msas)?;
    write_table(dir, "airways", &cifp.airways)?;
    write_table(dir, "procedures", &cifp.procedures)?;
    write_table(
        dir,
        MANIFEST,
        &CacheManifest {
            format_version: FORMAT_VERSION,
            cycle: cifp.cycle,
        },
    )?;

    info!(cycle = cifp.cycle, dir = %dir.display(), "Saved CIFP cache");
    Ok(())
}

pub fn read_manifest(dir: &Path) -> anyhow::Result<CacheManifest> {
    let manifest: CacheManifest = read_table(dir, MANIFEST)?;
    if manifest.format_version != FORMAT_VERSION {
        bail!(
            "Cache format {} in {} is not supported",
            manifest.format_version,
            dir.display()
        );
    }
    Ok(manifest)
}

pub fn load(dir: &Path) -> anyhow::Result<Cifp> {
    let manifest = read_manifest(dir)?;

    let cifp = Cifp {
        moras: read_table(dir, "moras")?,
        airspaces: Vec::new(),
        aerodromes: read_table(dir, "aerodromes")?,
        runways: read_table(dir, "runways")?,
        msas: read_table(dir, "msas")?,
        fixes: read_table(dir, "fixes")?,
        navaids: read_table(dir, "navaids")?,
        airways: read_table(dir, "airways")?,
        procedures: read_table(dir, "procedures")?,
        cycle: manifest.cycle,
        non_critical_errors: Vec::new(),
    };

    info!(cycle = cifp.cycle, dir = %dir.display(), "Loaded CIFP cache");
    Ok(cifp)
}
