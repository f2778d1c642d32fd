// Recolor slots: one base hue plus its derived shades, remapped together

use crate::core::Color;
use crate::engine::renderer::palette::SwapTable;

/// A named group of correlated palette colors.
///
/// Moving `base_color` to `target_color` shifts every relative shade by the
/// same per-channel offset, so highlights and shadows keep their distance to
/// the base hue.
#[derive(Debug, Clone, PartialEq)]
pub struct RecolorSlot {
    pub slot_name: String,
    /// The main color of this region as it appears in the art
    pub base_color: Color,
    /// The region's other shades, as they appear in the art
    pub relative_shades: Vec<Color>,
    /// The color `base_color` is swapped to
    pub target_color: Color,
}

impl RecolorSlot {
    /// Authoring default: white base and target, no shades
    pub fn new(slot_name: impl Into<String>) -> Self {
        Self {
            slot_name: slot_name.into(),
            base_color: Color::WHITE,
            relative_shades: Vec::new(),
            target_color: Color::WHITE,
        }
    }

    pub fn with_colors(
        slot_name: impl Into<String>,
        base_color: Color,
        relative_shades: Vec<Color>,
        target_color: Color,
    ) -> Self {
        Self {
            slot_name: slot_name.into(),
            base_color,
            relative_shades,
            target_color,
        }
    }

    /// Append a new shade, starting from the base color
    pub fn add_relative_shade(&mut self) {
        self.relative_shades.push(self.base_color);
    }

    /// Colors as they appear in the art: base first, then each shade
    pub fn original_colors(&self) -> Vec<Color> {
        std::iter::once(self.base_color)
            .chain(self.relative_shades.iter().copied())
            .collect()
    }

    /// Target palette, index-aligned with `original_colors`.
    ///
    /// `result[0]` is the target color; each shade becomes
    /// `clamp01(target + (shade - base))` per RGB channel with alpha 1. Large
    /// shifts clip at the [0, 1] boundary.
    pub fn compute_target_shades(&self) -> Vec<Color> {
        let base = self.base_color.rgb_vec();
        let target = self.target_color.rgb_vec();

        std::iter::once(self.target_color)
            .chain(self.relative_shades.iter().map(|shade| {
                let diff = shade.rgb_vec() - base;
                Color::from_rgb_vec(target + diff, 1.0).clamp_rgb()
            }))
            .collect()
    }

    /// `(original, target)` pairs for the palette material
    pub fn swap_pairs(&self) -> impl Iterator<Item = (Color, Color)> {
        self.original_colors()
            .into_iter()
            .zip(self.compute_target_shades())
    }
}

/// Flatten every slot's pairs, in slot order, into one layer's swap table.
///
/// Pairs beyond the table's capacity are dropped.
pub fn swap_table_for(slots: &[RecolorSlot], tolerance: f32) -> SwapTable {
    SwapTable::from_pairs(slots.iter().flat_map(RecolorSlot::swap_pairs), tolerance)
}
