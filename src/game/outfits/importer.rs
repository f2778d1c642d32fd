// Outfit importer: assembles a descriptor from three per-direction sprite sheets

use super::descriptor::{OutfitDescriptor, OutfitPartEntry};
use super::recolor::RecolorSlot;
use super::OutfitError;
use crate::core::{BodyPart, Direction};
use crate::engine::assets::{SpriteHandle, SpriteSheet};
use log::{info, warn};
use std::collections::HashMap;
use std::sync::Arc;

/// Builds an outfit from sheets whose sprites are named after body parts
/// (`Chest`, `L_Arm_sleeve`, ...).
pub struct OutfitImporter<'a> {
    name: String,
    sheets: [Option<&'a SpriteSheet>; 3],
    /// Included parts and whether each replaces its base part
    parts: HashMap<BodyPart, bool>,
    recolor_slots: Vec<RecolorSlot>,
}

impl<'a> OutfitImporter<'a> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sheets: [None; 3],
            parts: HashMap::new(),
            recolor_slots: Vec::new(),
        }
    }

    /// Sheet holding the art of one pose
    pub fn with_sheet(mut self, direction: Direction, sheet: &'a SpriteSheet) -> Self {
        self.sheets[direction.index()] = Some(sheet);
        self
    }

    /// Include a part, optionally hiding the base part under it
    pub fn include(mut self, part: BodyPart, replaces_base: bool) -> Self {
        self.parts.insert(part, replaces_base);
        self
    }

    pub fn exclude(mut self, part: BodyPart) -> Self {
        self.parts.remove(&part);
        self
    }

    pub fn with_recolor_slot(mut self, slot: RecolorSlot) -> Self {
        self.recolor_slots.push(slot);
        self
    }

    /// Create the descriptor: one entry per included part, in canonical part
    /// order, with art and sort offset 0.
    ///
    /// Sprites that can't be found are left unset and logged.
    pub fn build(&self) -> Result<Arc<OutfitDescriptor>, OutfitError> {
        if self.name.trim().is_empty() {
            return Err(OutfitError::EmptyName);
        }
        let sheets = Direction::ALL
            .into_iter()
            .map(|direction| self.sheets[direction.index()].ok_or(OutfitError::MissingSheet(direction)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut builder = OutfitDescriptor::builder(self.name.clone());
        for part in BodyPart::ALL {
            let Some(&replaces_base) = self.parts.get(&part) else {
                continue;
            };

            let mut entry = OutfitPartEntry::new(part).with_replaces_base(replaces_base);
            for direction in Direction::ALL {
                entry.sprites[direction.index()] = find_sprite(sheets[direction.index()], part);
            }
            builder = builder.part(entry)?;
        }

        let outfit = self
            .recolor_slots
            .iter()
            .cloned()
            .fold(builder, |builder, slot| builder.recolor_slot(slot))
            .build();

        info!("Imported outfit '{}' with {} parts", outfit.name(), outfit.parts().len());
        Ok(outfit)
    }
}

/// Sprite named exactly after the part, else the first one starting with it
fn find_sprite(sheet: &SpriteSheet, part: BodyPart) -> Option<SpriteHandle> {
    let found = sheet
        .get_region(part.name())
        .map(|region| sheet.sprite_handle(&region.name))
        .or_else(|| sheet.find_prefixed(part.name()));

    if found.is_none() {
        warn!("Sprite for body part '{}' not found in '{}'", part, sheet.name);
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Color;
    use crate::engine::assets::SheetBuilder;

    fn sheet(name: &str, sprites: &[&str]) -> SpriteSheet {
        let mut builder = SheetBuilder::new(name, 256, 256);
        for sprite in sprites {
            builder.place(sprite, 16, 16).unwrap();
        }
        builder.build()
    }

    #[test]
    fn test_build_picks_sprites_by_prefix() {
        let down = sheet("knight_down", &["Chest_plate", "Head"]);
        let side = sheet("knight_side", &["Head_side", "Chest"]);
        let up = sheet("knight_up", &["Chest_back"]);

        let outfit = OutfitImporter::new("Knight")
            .with_sheet(Direction::Down, &down)
            .with_sheet(Direction::Side, &side)
            .with_sheet(Direction::Up, &up)
            .include(BodyPart::Chest, true)
            .include(BodyPart::Head, false)
            .build()
            .unwrap();

        assert_eq!(outfit.parts().len(), 2);
        // Canonical part order, not inclusion order
        assert_eq!(outfit.parts()[0].body_part, BodyPart::Head);

        let chest = outfit.part(BodyPart::Chest).unwrap();
        assert!(chest.has_art && chest.replaces_base);
        assert_eq!(chest.sort_offset, 0);
        assert_eq!(chest.sprite(Direction::Down), Some(down.sprite_handle("Chest_plate")));
        assert_eq!(chest.sprite(Direction::Side), Some(side.sprite_handle("Chest")));
        assert_eq!(chest.sprite(Direction::Up), Some(up.sprite_handle("Chest_back")));

        // Missing art is left unset
        let head = outfit.part(BodyPart::Head).unwrap();
        assert!(!head.replaces_base);
        assert_eq!(head.sprite(Direction::Up), None);
    }

    #[test]
    fn test_exact_name_beats_longer_prefix() {
        let down = sheet("legs", &["L_Leg_Back", "L_Leg"]);
        let outfit = OutfitImporter::new("Greaves")
            .with_sheet(Direction::Down, &down)
            .with_sheet(Direction::Side, &down)
            .with_sheet(Direction::Up, &down)
            .include(BodyPart::LLeg, false)
            .build()
            .unwrap();

        let entry = outfit.part(BodyPart::LLeg).unwrap();
        assert_eq!(entry.sprite(Direction::Down), Some(down.sprite_handle("L_Leg")));
    }

    #[test]
    fn test_empty_outfit_allowed() {
        let empty = sheet("empty", &[]);
        let outfit = OutfitImporter::new("Nothing")
            .with_sheet(Direction::Down, &empty)
            .with_sheet(Direction::Side, &empty)
            .with_sheet(Direction::Up, &empty)
            .include(BodyPart::Chest, false)
            .exclude(BodyPart::Chest)
            .with_recolor_slot(RecolorSlot::new("Cloth"))
            .build()
            .unwrap();

        assert!(outfit.parts().is_empty());
        assert_eq!(outfit.default_recolor_slots()[0].base_color, Color::WHITE);
    }

    #[test]
    fn test_validation_errors() {
        let down = sheet("down", &[]);

        let result = OutfitImporter::new("  ").with_sheet(Direction::Down, &down).build();
        assert!(matches!(result, Err(OutfitError::EmptyName)));

        let result = OutfitImporter::new("Knight").with_sheet(Direction::Down, &down).build();
        assert!(matches!(result, Err(OutfitError::MissingSheet(Direction::Side))));
    }
}
