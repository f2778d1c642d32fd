// Drawable layers of the doll scene

use crate::core::{BodyPart, Color, Direction};
use crate::engine::assets::{MaterialHandle, SpriteHandle};
use crate::engine::renderer::palette::SwapTable;
use glam::Vec2;

/// Generational index into the scene's layer arena.
///
/// A destroyed layer's id never resolves again, even after its slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

/// Identifier of a bone in the skeleton driving the rig
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoneId(pub u32);

/// Skeletal binding of a layer; overlays copy their base layer's binding
/// so they deform identically
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkinBinding {
    pub root_bone: BoneId,
    pub bone_transforms: Vec<BoneId>,
    pub auto_rebind: bool,
    pub always_update: bool,
}

impl SkinBinding {
    pub fn new(root_bone: BoneId, bone_transforms: Vec<BoneId>) -> Self {
        Self {
            root_bone,
            bone_transforms,
            auto_rebind: false,
            always_update: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerKind {
    /// Part of the bare skeleton, created once when the rig is attached
    Base(BodyPart),
    /// Generated art of one equipped outfit for one part
    Overlay { part: BodyPart, outfit: String },
}

/// Where a layer hangs in the scene hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerParent {
    Root(Direction),
    Layer(LayerId),
}

/// A single drawable in one direction's pose
#[derive(Debug, Clone)]
pub struct Layer {
    pub name: String,
    pub kind: LayerKind,
    pub direction: Direction,
    pub parent: LayerParent,
    pub sprite: Option<SpriteHandle>,
    /// Order within the sorting layer (higher = drawn on top)
    pub draw_order: i32,
    pub sorting_layer: u32,
    pub tint: Color,
    pub flip_x: bool,
    pub flip_y: bool,
    /// Toggled by animation (a limb hidden for a few frames)
    pub active: bool,
    /// Toggled by the compositor (a base part replaced by an outfit)
    pub visible: bool,
    pub skin: Option<SkinBinding>,
    pub material: Option<MaterialHandle>,
    pub palette: SwapTable,
    /// Offset from the parent's origin, in pixels
    pub local_offset: Vec2,
    pub(crate) sequence: u64,
}

impl Layer {
    /// Create a layer with identity tint, no flip and no skinning
    pub fn new(name: impl Into<String>, kind: LayerKind, direction: Direction, parent: LayerParent) -> Self {
        Self {
            name: name.into(),
            kind,
            direction,
            parent,
            sprite: None,
            draw_order: 0,
            sorting_layer: 0,
            tint: Color::WHITE,
            flip_x: false,
            flip_y: false,
            active: true,
            visible: true,
            skin: None,
            material: None,
            palette: SwapTable::default(),
            local_offset: Vec2::ZERO,
            sequence: 0,
        }
    }

    /// A base part parented to its direction root, named after the part
    pub fn base(part: BodyPart, direction: Direction) -> Self {
        Self::new(
            part.name(),
            LayerKind::Base(part),
            direction,
            LayerParent::Root(direction),
        )
    }

    pub fn body_part(&self) -> BodyPart {
        match &self.kind {
            LayerKind::Base(part) => *part,
            LayerKind::Overlay { part, .. } => *part,
        }
    }

    pub fn is_overlay(&self) -> bool {
        matches!(self.kind, LayerKind::Overlay { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_layer_defaults() {
        let layer = Layer::base(BodyPart::Chest, Direction::Side);

        assert_eq!(layer.name, "Chest");
        assert_eq!(layer.parent, LayerParent::Root(Direction::Side));
        assert_eq!(layer.body_part(), BodyPart::Chest);
        assert!(!layer.is_overlay());
        assert!(layer.active && layer.visible);
        assert_eq!(layer.tint, Color::WHITE);
        assert_eq!(layer.palette.swap_count(), 0);
    }

    #[test]
    fn test_overlay_kind() {
        let layer = Layer::new(
            "Chest_Knight_Overlay_Down",
            LayerKind::Overlay {
                part: BodyPart::Chest,
                outfit: "Knight".to_string(),
            },
            Direction::Down,
            LayerParent::Root(Direction::Down),
        );
        assert!(layer.is_overlay());
        assert_eq!(layer.body_part(), BodyPart::Chest);
    }
}
