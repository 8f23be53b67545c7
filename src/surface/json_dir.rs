use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::RenderSurface;
use crate::charts::ChartSpec;
use crate::error::{DashboardError, Result};
use crate::logging::{log, obj, v_str, Domain, Level};

/// Writes one `<id>.json` Chart.js config per slot under a directory.
///
/// A mounted but empty slot holds `null`; destroy removes the file. A static
/// page polling the directory renders whatever is there.
pub struct JsonDirSurface {
    dir: PathBuf,
}

impl JsonDirSurface {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| io_err(&dir.to_string_lossy(), source))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    /// Readers only ever observe a complete file.
    fn write_atomic(&self, id: &str, body: &[u8]) -> Result<()> {
        let target = self.path_for(id);
        let tmp = self.dir.join(format!(".{}.json.tmp", id));
        let mut file = fs::File::create(&tmp).map_err(|e| io_err(id, e))?;
        file.write_all(body).map_err(|e| io_err(id, e))?;
        file.sync_all().map_err(|e| io_err(id, e))?;
        fs::rename(&tmp, &target).map_err(|e| io_err(id, e))
    }
}

impl RenderSurface for JsonDirSurface {
    fn mount(&self, id: &str) -> Result<()> {
        self.write_atomic(id, b"null")
    }

    fn create(&self, id: &str, spec: ChartSpec) -> Result<()> {
        if !self.path_for(id).exists() {
            return Err(DashboardError::MissingTarget(id.to_string()));
        }
        let body = serde_json::to_vec_pretty(&spec).map_err(|e| {
            io_err(id, std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })?;
        self.write_atomic(id, &body)?;
        log(
            Level::Debug,
            Domain::Surface,
            "drawn",
            obj(&[("chart", v_str(id)), ("path", v_str(&self.path_for(id).to_string_lossy()))]),
        );
        Ok(())
    }

    fn destroy(&self, id: &str) -> Result<()> {
        match fs::remove_file(self.path_for(id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_err(id, e)),
        }
    }
}

fn io_err(id: &str, source: std::io::Error) -> DashboardError {
    DashboardError::SurfaceIo {
        id: id.to_string(),
        source,
    }
}
