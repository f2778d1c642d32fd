// Palette swap material parameters
//
// A layer carries up to MAX_SWAP_PAIRS (original -> target) colors plus a match
// tolerance. The fragment shader in shaders/palette_swap.wgsl and
// `palette_swap` below implement the same per-pixel rule.

use crate::core::Color;
use bytemuck::{Pod, Zeroable};

/// Name under which the palette swap material is registered
pub const PALETTE_SWAP_MATERIAL: &str = "palette_swap";

/// Built-in shader source for the palette swap material
pub const PALETTE_SWAP_SHADER: &str = include_str!("shaders/palette_swap.wgsl");

/// Number of color pairs the shader exposes
pub const MAX_SWAP_PAIRS: usize = 8;

/// One original -> target color mapping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwapPair {
    pub original: Color,
    pub target: Color,
}

impl SwapPair {
    /// Inert pair used to pad unused shader slots
    pub const IDENTITY: SwapPair = SwapPair {
        original: Color::WHITE,
        target: Color::WHITE,
    };
}

/// The full set of palette parameters bound to one layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwapTable {
    pub tolerance: f32,
    swap_count: usize,
    pairs: [SwapPair; MAX_SWAP_PAIRS],
}

impl SwapTable {
    /// No swaps; every slot holds the inert pair
    pub fn identity(tolerance: f32) -> Self {
        Self {
            tolerance,
            swap_count: 0,
            pairs: [SwapPair::IDENTITY; MAX_SWAP_PAIRS],
        }
    }

    /// Take the first MAX_SWAP_PAIRS pairs; the rest are silently dropped.
    ///
    /// Both colors of every pair are forced opaque.
    pub fn from_pairs<I>(pairs: I, tolerance: f32) -> Self
    where
        I: IntoIterator<Item = (Color, Color)>,
    {
        let mut table = Self::identity(tolerance);
        for (slot, (original, target)) in table.pairs.iter_mut().zip(pairs) {
            *slot = SwapPair {
                original: original.with_alpha(1.0),
                target: target.with_alpha(1.0),
            };
            table.swap_count += 1;
        }
        table
    }

    /// Number of populated pairs (0..=MAX_SWAP_PAIRS)
    pub fn swap_count(&self) -> usize {
        self.swap_count
    }

    /// The populated pairs only
    pub fn active_pairs(&self) -> &[SwapPair] {
        &self.pairs[..self.swap_count]
    }

    /// All shader slots, including inert padding
    pub fn slots(&self) -> &[SwapPair; MAX_SWAP_PAIRS] {
        &self.pairs
    }

    pub fn to_uniform(&self) -> PaletteUniform {
        let mut uniform = PaletteUniform {
            tolerance: self.tolerance,
            swap_count: self.swap_count as u32,
            _padding: [0; 2],
            originals: [[0.0; 4]; MAX_SWAP_PAIRS],
            targets: [[0.0; 4]; MAX_SWAP_PAIRS],
        };
        for (k, pair) in self.pairs.iter().enumerate() {
            uniform.originals[k] = pair.original.to_array();
            uniform.targets[k] = pair.target.to_array();
        }
        uniform
    }
}

impl Default for SwapTable {
    fn default() -> Self {
        Self::identity(0.0)
    }
}

/// GPU layout of SwapTable, matching `Palette` in palette_swap.wgsl
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct PaletteUniform {
    pub tolerance: f32,
    pub swap_count: u32,
    pub _padding: [u32; 2],
    pub originals: [[f32; 4]; MAX_SWAP_PAIRS],
    pub targets: [[f32; 4]; MAX_SWAP_PAIRS],
}

/// Remap one pixel.
///
/// The first populated pair whose original lies within `tolerance` (RGB
/// distance) wins; the pixel keeps its own alpha. Transparent pixels pass through.
pub fn palette_swap(pixel: Color, table: &SwapTable) -> Color {
    if pixel.a <= 0.0 {
        return pixel;
    }

    table
        .active_pairs()
        .iter()
        .find(|pair| pixel.rgb_distance(pair.original) <= table.tolerance)
        .map(|pair| pair.target.with_alpha(pixel.a))
        .unwrap_or(pixel)
}

/// Apply `palette_swap` to every pixel of an image in place
pub fn recolor_image(image: &mut image::RgbaImage, table: &SwapTable) {
    if table.swap_count() == 0 {
        return;
    }

    for pixel in image.pixels_mut() {
        let swapped = palette_swap(Color::from_rgba8(pixel.0), table);
        pixel.0 = swapped.to_rgba8();
    }
}
