//! Self-hosted OSRM dataset preparation (download + preprocess).
//!
//! The public OSRM demo server is rate limited and has no uptime guarantee.
//! For production the route computer points [`crate::osrm::OsrmClient`] at a
//! local `osrm-routed`, whose data is prepared here with the
//! `osrm/osrm-backend` Docker image using the MLD pipeline.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use tracing::{info, warn};

const OSRM_IMAGE: &str = "osrm/osrm-backend";

#[derive(Debug, Clone)]
pub struct GeofabrikRegion {
    /// Geofabrik region path, e.g. "south-america/chile".
    pub path: String,
}

impl Default for GeofabrikRegion {
    fn default() -> Self {
        Self::new("south-america/chile")
    }
}

impl GeofabrikRegion {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Last path segment, used for file names.
    pub fn name(&self) -> &str {
        self.path
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .unwrap_or("region")
    }

    pub fn url(&self) -> String {
        format!(
            "https://download.geofabrik.de/{}-latest.osm.pbf",
            self.path.trim_matches('/')
        )
    }
}

#[derive(Debug, Clone)]
pub struct OsrmDatasetConfig {
    pub region: GeofabrikRegion,
    pub data_root: PathBuf,
    /// Lua profile inside the OSRM image.
    pub profile: String,
}

impl OsrmDatasetConfig {
    pub fn new(region: GeofabrikRegion, data_root: impl Into<PathBuf>) -> Self {
        Self {
            region,
            data_root: data_root.into(),
            profile: "/opt/car.lua".to_string(),
        }
    }
}

/// Paths of a prepared dataset. `osrm_base` is what `osrm-routed` loads.
#[derive(Debug, Clone)]
pub struct OsrmDataset {
    pub data_dir: PathBuf,
    pub osrm_base: PathBuf,
    pub pbf_path: PathBuf,
}

#[derive(Error, Debug)]
pub enum OsrmDataError {
    #[error("dataset i/o failed: {0}")]
    Io(#[from] io::Error),

    #[error("extract download failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("preprocessing failed: {0}")]
    ProcessFailure(String),
}

impl OsrmDataset {
    /// Downloads and preprocesses the region unless the files already exist.
    pub fn ensure(config: &OsrmDatasetConfig) -> Result<Self, OsrmDataError> {
        let data_root = if config.data_root.is_absolute() {
            config.data_root.clone()
        } else {
            std::env::current_dir()?.join(&config.data_root)
        };
        let name = config.region.name();
        let data_dir = data_root.join(name);
        fs::create_dir_all(&data_dir)?;

        let pbf_path = data_dir.join(format!("{}-latest.osm.pbf", name));
        if !pbf_path.exists() {
            info!(url = %config.region.url(), "downloading OSM extract");
            download_pbf(&config.region.url(), &pbf_path)?;
        }

        let osrm_base = data_dir.join(format!("{}-latest.osrm", name));
        if !osrm_base.exists() {
            info!(region = name, "running osrm-extract");
            run_docker(
                &[
                    "osrm-extract",
                    "-p",
                    &config.profile,
                    &format!("/data/{}", file_name(&pbf_path)),
                ],
                &data_dir,
            )?;
        }

        if !mld_ready(&osrm_base) {
            info!(region = name, "running osrm-partition and osrm-customize");
            let target = format!("/data/{}", file_name(&osrm_base));
            run_docker(&["osrm-partition", &target], &data_dir)?;
            run_docker(&["osrm-customize", &target], &data_dir)?;
        }

        Ok(Self {
            data_dir,
            osrm_base,
            pbf_path,
        })
    }

    /// Name of the `.osrm` file as seen inside the container's `/data`.
    pub fn container_path(&self) -> String {
        format!("/data/{}", file_name(&self.osrm_base))
    }
}

fn download_pbf(url: &str, dest: &Path) -> Result<(), OsrmDataError> {
    let mut response = reqwest::blocking::get(url)?.error_for_status()?;
    let tmp_path = dest.with_extension("tmp");
    let mut writer = BufWriter::new(File::create(&tmp_path)?);
    if let Err(err) = response.copy_to(&mut writer) {
        warn!(path = %tmp_path.display(), "download interrupted, removing partial file");
        drop(writer);
        fs::remove_file(&tmp_path)?;
        return Err(err.into());
    }
    writer.flush()?;
    fs::rename(tmp_path, dest)?;
    Ok(())
}

fn mld_ready(osrm_base: &Path) -> bool {
    let partition = osrm_base.with_extension("osrm.partition");
    let mldgr = osrm_base.with_extension("osrm.mldgr");
    let cells = osrm_base.with_extension("osrm.cells");
    osrm_base.exists() && partition.exists() && mldgr.exists() && cells.exists()
}

fn run_docker(args: &[&str], data_dir: &Path) -> Result<(), OsrmDataError> {
    let status = Command::new("docker")
        .arg("run")
        .arg("--rm")
        .arg("-t")
        .arg("-v")
        .arg(format!("{}:/data", data_dir.display()))
        .arg(OSRM_IMAGE)
        .args(args)
        .status()?;

    if status.success() {
        Ok(())
    } else {
        Err(OsrmDataError::ProcessFailure(format!(
            "{} exited with status {}",
            args.first().unwrap_or(&"docker"),
            status
        )))
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_string()
}
