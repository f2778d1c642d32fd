// Outfit templates: per-part art bindings plus default recolor slots

use super::recolor::RecolorSlot;
use super::OutfitError;
use crate::core::{BodyPart, Direction};
use crate::engine::assets::SpriteHandle;
use std::sync::Arc;

/// Art binding of one outfit for one body part
#[derive(Debug, Clone, PartialEq)]
pub struct OutfitPartEntry {
    pub body_part: BodyPart,
    /// Whether the outfit draws anything for this part at all
    pub has_art: bool,
    /// Hide the bare base part while this outfit is equipped
    pub replaces_base: bool,
    /// Draw order among overlays competing for the same part
    pub sort_offset: i32,
    /// One sprite per direction, indexed by `Direction::index`
    pub sprites: [Option<SpriteHandle>; 3],
}

impl OutfitPartEntry {
    /// Entry with art, drawn on top of the base part, no sprites yet
    pub fn new(body_part: BodyPart) -> Self {
        Self {
            body_part,
            has_art: true,
            replaces_base: false,
            sort_offset: 0,
            sprites: [None; 3],
        }
    }

    pub fn with_sprite(mut self, direction: Direction, sprite: SpriteHandle) -> Self {
        self.sprites[direction.index()] = Some(sprite);
        self
    }

    pub fn with_replaces_base(mut self, replaces_base: bool) -> Self {
        self.replaces_base = replaces_base;
        self
    }

    pub fn with_sort_offset(mut self, sort_offset: i32) -> Self {
        self.sort_offset = sort_offset;
        self
    }

    pub fn with_art(mut self, has_art: bool) -> Self {
        self.has_art = has_art;
        self
    }

    /// Sprite for a pose; the Side sprite serves both facings
    pub fn sprite(&self, direction: Direction) -> Option<SpriteHandle> {
        self.sprites[direction.index()]
    }

    /// Whether equipping this entry hides the base part
    pub fn hides_base(&self) -> bool {
        self.has_art && self.replaces_base
    }
}

/// Immutable outfit template, shared by every character wearing it.
///
/// Two descriptors are the same outfit only if they are the same allocation
/// (`Arc::ptr_eq`); equal contents do not make them interchangeable.
#[derive(Debug)]
pub struct OutfitDescriptor {
    name: String,
    parts: Vec<OutfitPartEntry>,
    default_recolor_slots: Vec<RecolorSlot>,
}

impl OutfitDescriptor {
    pub fn builder(name: impl Into<String>) -> OutfitDescriptorBuilder {
        OutfitDescriptorBuilder {
            name: name.into(),
            parts: Vec::new(),
            default_recolor_slots: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Part entries in authoring order
    pub fn parts(&self) -> &[OutfitPartEntry] {
        &self.parts
    }

    pub fn part(&self, body_part: BodyPart) -> Option<&OutfitPartEntry> {
        self.parts.iter().find(|entry| entry.body_part == body_part)
    }

    pub fn default_recolor_slots(&self) -> &[RecolorSlot] {
        &self.default_recolor_slots
    }
}

/// Collects entries and slots, then freezes them into a shared descriptor
#[derive(Debug)]
pub struct OutfitDescriptorBuilder {
    name: String,
    parts: Vec<OutfitPartEntry>,
    default_recolor_slots: Vec<RecolorSlot>,
}

impl OutfitDescriptorBuilder {
    /// Add a part entry; a second entry for the same body part is rejected
    pub fn part(mut self, entry: OutfitPartEntry) -> Result<Self, OutfitError> {
        if self.parts.iter().any(|e| e.body_part == entry.body_part) {
            return Err(OutfitError::DuplicatePart {
                outfit: self.name,
                part: entry.body_part,
            });
        }
        self.parts.push(entry);
        Ok(self)
    }

    pub fn recolor_slot(mut self, slot: RecolorSlot) -> Self {
        self.default_recolor_slots.push(slot);
        self
    }

    pub fn build(self) -> Arc<OutfitDescriptor> {
        Arc::new(OutfitDescriptor {
            name: self.name,
            parts: self.parts,
            default_recolor_slots: self.default_recolor_slots,
        })
    }
}
