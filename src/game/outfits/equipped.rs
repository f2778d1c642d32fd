// Equipped outfit: a character's own copy of an outfit's recolor state

use super::descriptor::OutfitDescriptor;
use super::recolor::{swap_table_for, RecolorSlot};
use crate::core::math::clamp01;
use crate::engine::renderer::palette::SwapTable;
use std::sync::Arc;

/// Match tolerance used when none is specified
pub const DEFAULT_TOLERANCE: f32 = 0.05;

/// One outfit worn by one character.
///
/// The descriptor is shared; the recolor slots are copied out of it on
/// construction, so editing them never reaches the template or other wearers.
#[derive(Debug, Clone)]
pub struct EquippedOutfit {
    base_outfit: Arc<OutfitDescriptor>,
    recolor_slots: Vec<RecolorSlot>,
    tolerance: f32,
}

impl EquippedOutfit {
    pub fn new(base_outfit: Arc<OutfitDescriptor>, tolerance: f32) -> Self {
        let recolor_slots = base_outfit.default_recolor_slots().to_vec();
        Self {
            base_outfit,
            recolor_slots,
            tolerance: clamp01(tolerance),
        }
    }

    pub fn base_outfit(&self) -> &Arc<OutfitDescriptor> {
        &self.base_outfit
    }

    /// Whether this wraps exactly `descriptor`
    pub fn wraps(&self, descriptor: &Arc<OutfitDescriptor>) -> bool {
        Arc::ptr_eq(&self.base_outfit, descriptor)
    }

    pub fn recolor_slots(&self) -> &[RecolorSlot] {
        &self.recolor_slots
    }

    pub(crate) fn recolor_slots_mut(&mut self) -> &mut Vec<RecolorSlot> {
        &mut self.recolor_slots
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    /// Set the color match tolerance, clamped into [0, 1]
    pub fn set_tolerance(&mut self, tolerance: f32) {
        self.tolerance = clamp01(tolerance);
    }

    /// Palette parameters for every layer this outfit produces
    pub fn swap_table(&self) -> SwapTable {
        swap_table_for(&self.recolor_slots, self.tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Color;

    fn outfit() -> Arc<OutfitDescriptor> {
        OutfitDescriptor::builder("Tunic")
            .recolor_slot(RecolorSlot::with_colors(
                "Cloth",
                Color::rgb(1.0, 0.0, 0.0),
                vec![Color::rgb(0.5, 0.0, 0.0)],
                Color::rgb(1.0, 0.0, 0.0),
            ))
            .build()
    }

    #[test]
    fn test_slots_are_deep_copied() {
        let descriptor = outfit();
        let mut first = EquippedOutfit::new(Arc::clone(&descriptor), DEFAULT_TOLERANCE);
        let second = EquippedOutfit::new(Arc::clone(&descriptor), DEFAULT_TOLERANCE);

        first.recolor_slots_mut()[0].target_color = Color::rgb(0.0, 0.0, 1.0);
        first.recolor_slots_mut()[0].relative_shades.push(Color::BLACK);

        assert_eq!(descriptor.default_recolor_slots()[0].target_color, Color::rgb(1.0, 0.0, 0.0));
        assert_eq!(descriptor.default_recolor_slots()[0].relative_shades.len(), 1);
        assert_eq!(second.recolor_slots()[0], descriptor.default_recolor_slots()[0]);
    }

    #[test]
    fn test_tolerance_clamped() {
        let mut equipped = EquippedOutfit::new(outfit(), 3.0);
        assert_eq!(equipped.tolerance(), 1.0);

        equipped.set_tolerance(-0.5);
        assert_eq!(equipped.tolerance(), 0.0);

        equipped.set_tolerance(0.2);
        assert_eq!(equipped.tolerance(), 0.2);
    }

    #[test]
    fn test_identity_by_allocation() {
        let descriptor = outfit();
        let lookalike = outfit();
        let equipped = EquippedOutfit::new(Arc::clone(&descriptor), DEFAULT_TOLERANCE);

        assert!(equipped.wraps(&descriptor));
        assert!(!equipped.wraps(&lookalike));
    }

    #[test]
    fn test_swap_table_uses_own_slots() {
        let mut equipped = EquippedOutfit::new(outfit(), 0.1);
        assert_eq!(equipped.swap_table().swap_count(), 2);

        equipped.recolor_slots_mut().clear();
        let table = equipped.swap_table();
        assert_eq!(table.swap_count(), 0);
        assert_eq!(table.tolerance, 0.1);
    }
}
