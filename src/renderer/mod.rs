//! Rendering capability
//!
//! The core never paints. Each frame it turns the session into a flat list of
//! `DrawCommand`s; `draw_frame` resolves them against the asset table and
//! hands the host `Renderer` either a sprite blit or a solid-color fallback.

pub mod assets;
pub mod sprites;

pub use assets::{AssetId, AssetStatus, AssetTable};
pub use sprites::build_draw_list;

use serde::Serialize;

use crate::sim::Rect;

/// RGBA, 0.0 - 1.0
pub type Color = [f32; 4];

/// Fallback palette
pub mod colors {
    use super::Color;

    pub const RED: Color = [1.0, 0.0, 0.0, 1.0];
    pub const GREEN: Color = [0.0, 0.5, 0.0, 1.0];
    pub const BLUE: Color = [0.0, 0.0, 1.0, 1.0];
    pub const BLACK: Color = [0.0, 0.0, 0.0, 1.0];
    pub const BROWN: Color = [0.65, 0.16, 0.16, 1.0];
    pub const GRAY: Color = [0.5, 0.5, 0.5, 1.0];
    pub const PINK: Color = [1.0, 0.75, 0.8, 1.0];
    pub const GOLD: Color = [1.0, 0.84, 0.0, 1.0];
    pub const PURPLE: Color = [0.5, 0.0, 0.5, 1.0];
    pub const SKY_BLUE: Color = [0.53, 0.81, 0.92, 1.0];
    pub const DARK_BLUE: Color = [0.0, 0.0, 0.55, 1.0];
}

/// One entity's worth of drawing
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DrawCommand {
    pub asset: AssetId,
    /// Sprite-sheet frame; None draws the whole image
    pub source: Option<Rect>,
    pub dest: Rect,
    /// Used when the asset is unavailable
    pub fallback: Color,
    /// Fallback rectangle (usually `dest`)
    pub fallback_dest: Rect,
}

impl DrawCommand {
    pub fn new(asset: AssetId, source: Option<Rect>, dest: Rect, fallback: Color) -> Self {
        Self {
            asset,
            source,
            dest,
            fallback,
            fallback_dest: dest,
        }
    }
}

/// Host drawing surface
pub trait Renderer {
    /// Draw `source` of the named image (or all of it) into `dest`
    fn blit(&mut self, asset: AssetId, source: Option<Rect>, dest: Rect);
    /// Fill `dest` with a solid color
    fn fill(&mut self, color: Color, dest: Rect);
}

/// Paint a frame's commands, falling back to fills for unavailable assets
pub fn draw_frame<R: Renderer + ?Sized>(renderer: &mut R, assets: &AssetTable, commands: &[DrawCommand]) {
    for cmd in commands {
        if assets.is_ready(cmd.asset) {
            renderer.blit(cmd.asset, cmd.source, cmd.dest);
        } else {
            renderer.fill(cmd.fallback, cmd.fallback_dest);
        }
    }
}
