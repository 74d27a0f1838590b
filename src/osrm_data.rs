//! OSRM dataset preparation (download + docker preprocess).
//!
//! Integration tests need a routable graph. This fetches a Geofabrik
//! extract once and runs the osrm-backend MLD pipeline over it,
//! skipping every stage whose outputs already exist.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

/// A Geofabrik region, e.g. `europe/lithuania`.
#[derive(Debug, Clone)]
pub struct Region {
    path: String,
}

impl Region {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Last path component, used for local file names.
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or("region")
    }

    pub fn download_url(&self) -> String {
        format!("https://download.geofabrik.de/{}-latest.osm.pbf", self.path)
    }
}

#[derive(Debug)]
pub enum DatasetError {
    Io(io::Error),
    Download(reqwest::Error),
    Preprocess(String),
}

impl From<io::Error> for DatasetError {
    fn from(err: io::Error) -> Self {
        DatasetError::Io(err)
    }
}

impl From<reqwest::Error> for DatasetError {
    fn from(err: reqwest::Error) -> Self {
        DatasetError::Download(err)
    }
}

/// A prepared OSRM dataset on disk, ready for `osrm-routed --algorithm mld`.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub data_dir: PathBuf,
    pub graph_base: PathBuf,
}

impl Dataset {
    /// Ensures the extract is downloaded and preprocessed under
    /// `data_root/<region name>`. Every stage is idempotent.
    pub fn ensure(region: &Region, data_root: impl Into<PathBuf>) -> Result<Self, DatasetError> {
        let data_root: PathBuf = data_root.into();
        let data_root = if data_root.is_absolute() {
            data_root
        } else {
            std::env::current_dir()?.join(data_root)
        };
        let data_dir = data_root.join(region.name());
        fs::create_dir_all(&data_dir)?;

        let pbf_path = data_dir.join(format!("{}-latest.osm.pbf", region.name()));
        if !pbf_path.exists() {
            download(&region.download_url(), &pbf_path)?;
        }

        let graph_base = data_dir.join(format!("{}-latest.osrm", region.name()));
        if !graph_base.exists() {
            osrm_backend(
                &data_dir,
                &["osrm-extract", "-p", "/opt/car.lua", &container_path(&pbf_path)],
            )?;
        }

        let mld_outputs = ["osrm.partition", "osrm.mldgr", "osrm.cells"];
        if !mld_outputs
            .iter()
            .all(|ext| graph_base.with_extension(ext).exists())
        {
            osrm_backend(&data_dir, &["osrm-partition", &container_path(&graph_base)])?;
            osrm_backend(&data_dir, &["osrm-customize", &container_path(&graph_base)])?;
        }

        Ok(Self { data_dir, graph_base })
    }
}

fn download(url: &str, dest: &Path) -> Result<(), DatasetError> {
    let response = reqwest::blocking::get(url)?.error_for_status()?;
    // write to a temp name so an interrupted download never looks complete
    let tmp_path = dest.with_extension("tmp");
    let mut writer = BufWriter::new(File::create(&tmp_path)?);
    writer.write_all(&response.bytes()?)?;
    writer.flush()?;
    fs::rename(tmp_path, dest)?;
    Ok(())
}

/// Path of a data-dir file as seen from inside the osrm-backend container.
fn container_path(path: &Path) -> String {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    format!("/data/{name}")
}

fn osrm_backend(data_dir: &Path, args: &[&str]) -> Result<(), DatasetError> {
    let status = Command::new("docker")
        .args(["run", "--rm", "-t", "-v"])
        .arg(format!("{}:/data", data_dir.display()))
        .arg("osrm/osrm-backend")
        .args(args)
        .status()?;

    if status.success() {
        Ok(())
    } else {
        Err(DatasetError::Preprocess(format!(
            "docker {} exited with status {}",
            args.first().unwrap_or(&"run"),
            status
        )))
    }
}
