//! PNG export of a rendered preview.
//!
//! One export may be in flight per [`Exporter`]; overlapping requests fail
//! fast with [`Error::ExportInProgress`] instead of queueing.

use crate::catalog::Platform;
use crate::rendering::node::VisualTree;
use crate::rendering::raster::{Rasterizer, SoftwareRasterizer};
use crate::rendering::snapshot;
use crate::{Error, Result, SessionConfig};
use base64::Engine as _;
use log::{info, warn};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Everything needed to produce one export, captured from an editor
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub tree: VisualTree,
    pub platform: Platform,
    pub template_id: &'static str,
}

/// A finished export, ready to be offered as a download
#[derive(Debug, Clone)]
pub struct ExportedImage {
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    pub png_data: Vec<u8>,
}

impl ExportedImage {
    /// `data:image/png;base64,...` URL of the PNG
    pub fn to_data_url(&self) -> String {
        format!("data:image/png;base64,{}", base64::engine::general_purpose::STANDARD.encode(&self.png_data))
    }

    /// Hex SHA-256 of the PNG bytes
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(&self.png_data))
    }

    /// Write the PNG into `dir` under its file name
    pub fn save_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.png_data)?;
        info!("saved {} ({} bytes)", path.display(), self.png_data.len());
        Ok(path)
    }
}

/// Held while an export runs; releases the in-flight flag on drop
pub struct ExportGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for ExportGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

pub struct Exporter {
    rasterizer: Arc<dyn Rasterizer>,
    in_flight: Arc<AtomicBool>,
    product_name: String,
    scale: u32,
    padding: u32,
}

impl Exporter {
    pub fn new(config: &SessionConfig) -> Self {
        Self::with_rasterizer(config, Arc::new(SoftwareRasterizer))
    }

    pub fn with_rasterizer(config: &SessionConfig, rasterizer: Arc<dyn Rasterizer>) -> Self {
        Self {
            rasterizer,
            in_flight: Arc::new(AtomicBool::new(false)),
            product_name: config.product_name.clone(),
            scale: config.export_scale,
            padding: config.export_padding,
        }
    }

    /// `<product>-<platform>-<template>.png`
    pub fn file_name(&self, platform: Platform, template_id: &str) -> String {
        format!("{}-{}-{}.png", self.product_name, platform.id(), template_id)
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Claim the in-flight slot
    pub fn begin(&self) -> Result<ExportGuard> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| Error::ExportInProgress)?;
        Ok(ExportGuard { flag: Arc::clone(&self.in_flight) })
    }

    pub fn export(&self, request: &ExportRequest) -> Result<ExportedImage> {
        let _guard = self.begin()?;
        self.render(request)
    }

    /// Rasterize without touching the in-flight flag; callers hold an [`ExportGuard`]
    pub fn render(&self, request: &ExportRequest) -> Result<ExportedImage> {
        let file_name = self.file_name(request.platform, request.template_id);
        let shot = snapshot(&request.tree, self.rasterizer.as_ref(), self.scale, self.padding).map_err(|e| {
            warn!("export of {} failed: {}", file_name, e);
            match e {
                Error::ExportError(_) => e,
                other => Error::ExportError(other.to_string()),
            }
        })?;
        if shot.png_data.is_empty() {
            warn!("export of {} produced no data", file_name);
            return Err(Error::ExportError("rasterizer produced an empty image".into()));
        }
        info!("exported {} at {}x{}", file_name, shot.width, shot.height);
        Ok(ExportedImage { file_name, width: shot.width, height: shot.height, png_data: shot.png_data })
    }
}

impl Clone for Exporter {
    /// Clones share the in-flight flag
    fn clone(&self) -> Self {
        Self {
            rasterizer: Arc::clone(&self.rasterizer),
            in_flight: Arc::clone(&self.in_flight),
            product_name: self.product_name.clone(),
            scale: self.scale,
            padding: self.padding,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::paint::PaintCommand;
    use crate::rendering::raster::RasterOptions;
    use crate::rendering::Screenshot;
    use crate::Editor;

    struct FailingRasterizer;

    impl Rasterizer for FailingRasterizer {
        fn rasterize(&self, _: &[PaintCommand], _: (u32, u32), _: &RasterOptions) -> Result<Screenshot> {
            Err(Error::Other("tainted canvas".into()))
        }
    }

    #[test]
    fn file_name_follows_convention() {
        let e = Exporter::new(&SessionConfig::default());
        assert_eq!(e.file_name(Platform::Facebook, "image-post"), "trollify-facebook-image-post.png");
    }

    #[test]
    fn failure_is_reported_and_releases_guard() {
        let cfg = SessionConfig::default();
        let editor = Editor::new(cfg.clone(), "twitter").unwrap();
        let exporter = Exporter::with_rasterizer(&cfg, Arc::new(FailingRasterizer));
        let err = editor.export(&exporter).unwrap_err();
        assert!(matches!(err, Error::ExportError(msg) if msg.contains("tainted")));
        assert!(!exporter.is_busy());
    }

    #[test]
    fn second_begin_while_busy_fails() {
        let e = Exporter::new(&SessionConfig::default());
        let guard = e.begin().unwrap();
        assert!(matches!(e.begin(), Err(Error::ExportInProgress)));
        drop(guard);
        assert!(e.begin().is_ok());
    }

    #[test]
    fn data_url_has_png_prefix() {
        let img = ExportedImage { file_name: "x.png".into(), width: 1, height: 1, png_data: vec![1, 2, 3] };
        assert_eq!(img.to_data_url(), "data:image/png;base64,AQID");
        assert_eq!(img.digest().len(), 64);
    }
}
