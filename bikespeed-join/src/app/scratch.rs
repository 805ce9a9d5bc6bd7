use bikespeed_core::model::TripId;
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const SCRATCH_DIRECTORY: &str = ".scratch";

/// per-trip directory for intermediate geoprocessing outputs. the directory
/// and its contents are removed when the guard is dropped, whether or not the
/// trip succeeded.
pub struct TripScratch {
    directory: PathBuf,
}

impl TripScratch {
    pub fn create(parent: &Path, trip_id: TripId) -> Result<TripScratch, std::io::Error> {
        let directory = parent.join(SCRATCH_DIRECTORY).join(trip_id.to_string());
        fs::create_dir_all(&directory)?;
        Ok(TripScratch { directory })
    }

    pub fn path(&self) -> &Path {
        &self.directory
    }

    pub fn write(&self, filename: &str, contents: &str) -> Result<PathBuf, std::io::Error> {
        let path = self.directory.join(filename);
        fs::write(&path, contents)?;
        Ok(path)
    }
}

impl Drop for TripScratch {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_dir_all(&self.directory) {
            log::warn!(
                "failed to remove scratch directory {}: {e}",
                self.directory.display()
            );
        }
    }
}
