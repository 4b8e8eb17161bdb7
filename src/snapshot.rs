//! Exporting the current frame as a PNG
//!
//! The exporter first asks a [`DisplaySurfaceFactory`] for somewhere to show
//! the image. Only when that succeeds does it render a frame offscreen, read
//! it back and encode it. A refused surface is not an error for the caller;
//! the export is skipped with a debug log.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};

use crate::error::{ExportBlockedError, Result};
use crate::gfx::rendering::RenderSurface;
use crate::gfx::scene::Scene;

/// Where an exported frame ends up
pub trait DisplaySurface {
    /// Shows (or stores) an encoded PNG
    fn show(&mut self, png: &[u8]) -> Result<()>;
}

pub trait DisplaySurfaceFactory {
    type Surface: DisplaySurface;

    fn open(&mut self) -> std::result::Result<Self::Surface, ExportBlockedError>;
}

/// Writes snapshots as `snapshot-<n>.png` into a directory
#[derive(Debug, Clone)]
pub struct SnapshotDirectory {
    dir: Option<PathBuf>,
    next: u32,
}

impl SnapshotDirectory {
    /// `None` blocks every export
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir, next: 1 }
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }
}

pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DisplaySurface for SnapshotFile {
    fn show(&mut self, png: &[u8]) -> Result<()> {
        std::fs::write(&self.path, png)?;
        log::info!("saved snapshot {}", self.path.display());
        Ok(())
    }
}

impl DisplaySurfaceFactory for SnapshotDirectory {
    type Surface = SnapshotFile;

    fn open(&mut self) -> std::result::Result<SnapshotFile, ExportBlockedError> {
        let dir = self
            .dir
            .as_ref()
            .ok_or_else(|| ExportBlockedError::new("snapshot exports are disabled"))?;
        std::fs::create_dir_all(dir)
            .map_err(|err| ExportBlockedError::new(format!("{}: {}", dir.display(), err)))?;

        // Never overwrite snapshots from an earlier run
        loop {
            let path = dir.join(format!("snapshot-{}.png", self.next));
            self.next += 1;
            if !path.exists() {
                return Ok(SnapshotFile { path });
            }
        }
    }
}

pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

pub struct SnapshotExporter<F: DisplaySurfaceFactory> {
    factory: F,
}

impl<F: DisplaySurfaceFactory> SnapshotExporter<F> {
    pub fn new(factory: F) -> Self {
        Self { factory }
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Renders and shows one frame. Returns `false` when the factory refused
    /// to open a surface, in which case nothing is rendered.
    pub fn export(&mut self, scene: &mut Scene, surface: &mut impl RenderSurface) -> Result<bool> {
        let mut display = match self.factory.open() {
            Ok(display) => display,
            Err(blocked) => {
                log::debug!("{blocked}");
                return Ok(false);
            }
        };

        let frame = surface.capture(scene)?;
        display.show(&encode_png(&frame)?)?;
        Ok(true)
    }
}
