//! Rendering pipeline: preview tree → layout → paint commands → PNG.

pub mod glyphs;
pub mod layout;
pub mod node;
pub mod paint;
pub mod preview;
pub mod raster;

use crate::Result;
use node::VisualTree;
use raster::{RasterOptions, Rasterizer};

/// A rasterized preview
#[derive(Debug, Clone)]
pub struct Screenshot {
    pub width: u32,
    pub height: u32,
    pub png_data: Vec<u8>,
}

/// Snapshot a preview tree at `scale`× with `padding` CSS pixels of theme
/// background around the card.
pub fn snapshot(tree: &VisualTree, rasterizer: &dyn Rasterizer, scale: u32, padding: u32) -> Result<Screenshot> {
    let (size, commands) = paint::paint_tree(tree);
    log::debug!("painting {} commands for a {}x{} card", commands.len(), size.0, size.1);
    let options = RasterOptions { scale, background: tree.background, padding };
    rasterizer.rasterize(&commands, size, &options)
}
