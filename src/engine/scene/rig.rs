// Rig construction: builds the three direction poses with their base layers

use super::graph::DollScene;
use super::layer::{Layer, SkinBinding};
use crate::core::{BodyPart, Direction};
use crate::engine::assets::SpriteHandle;

/// Spacing between consecutive base parts, leaving room for overlays in between
pub const BASE_ORDER_STEP: i32 = 10;

const DOWN_ORDER: [BodyPart; 10] = [
    BodyPart::BackArm,
    BodyPart::BackLeg,
    BodyPart::LLegBack,
    BodyPart::RLegBack,
    BodyPart::Chest,
    BodyPart::LLeg,
    BodyPart::RLeg,
    BodyPart::Head,
    BodyPart::FrontArm,
    BodyPart::FrontLeg,
];

// Facing away, the front limbs are hidden behind the body
const UP_ORDER: [BodyPart; 10] = [
    BodyPart::FrontArm,
    BodyPart::FrontLeg,
    BodyPart::LLegBack,
    BodyPart::RLegBack,
    BodyPart::BackArm,
    BodyPart::BackLeg,
    BodyPart::Chest,
    BodyPart::LLeg,
    BodyPart::RLeg,
    BodyPart::Head,
];

/// Standard back-to-front draw order of a base part in a given pose.
///
/// Parts missing from the pose's table are stacked above it in canonical order.
pub fn standard_base_order(direction: Direction, part: BodyPart) -> i32 {
    let table: &[BodyPart] = match direction {
        Direction::Down | Direction::Side => &DOWN_ORDER,
        Direction::Up => &UP_ORDER,
    };

    if let Some(position) = table.iter().position(|p| *p == part) {
        return position as i32 * BASE_ORDER_STEP;
    }

    let extra_rank = BodyPart::ALL
        .iter()
        .filter(|p| !table.contains(*p))
        .position(|p| *p == part)
        .unwrap_or(0);
    (table.len() + extra_rank) as i32 * BASE_ORDER_STEP
}

/// Builder for a doll scene; base layers are registered once, here
pub struct RigBuilder {
    scene: DollScene,
    sorting_layer: u32,
}

impl RigBuilder {
    pub fn new() -> Self {
        Self {
            scene: DollScene::new(),
            sorting_layer: 0,
        }
    }

    /// Rig with every part present in every pose
    pub fn standard<F>(sprite_for: F) -> Self
    where
        F: Fn(Direction, BodyPart) -> Option<SpriteHandle>,
    {
        let mut builder = Self::new();
        for direction in Direction::ALL {
            for part in BodyPart::ALL {
                builder = builder.base_part(direction, part, sprite_for(direction, part));
            }
        }
        builder
    }

    /// Sorting layer applied to base parts added after this call
    pub fn with_sorting_layer(mut self, sorting_layer: u32) -> Self {
        self.sorting_layer = sorting_layer;
        self
    }

    /// Add a base part at its standard draw order
    pub fn base_part(self, direction: Direction, part: BodyPart, sprite: Option<SpriteHandle>) -> Self {
        self.base_part_with(direction, part, |layer| layer.sprite = sprite)
    }

    /// Add a base part and adjust it before registration
    pub fn base_part_with<F>(mut self, direction: Direction, part: BodyPart, configure: F) -> Self
    where
        F: FnOnce(&mut Layer),
    {
        let mut layer = Layer::base(part, direction);
        layer.draw_order = standard_base_order(direction, part);
        layer.sorting_layer = self.sorting_layer;
        configure(&mut layer);
        self.scene.add_base_layer(layer);
        self
    }

    /// Bind one skeleton to every base layer already added for `direction`
    pub fn skinned(mut self, direction: Direction, skin: SkinBinding) -> Self {
        let ids: Vec<_> = self.scene.base_layers(direction).map(|(_, id)| id).collect();
        for id in ids {
            if let Some(layer) = self.scene.layer_mut(id) {
                layer.skin = Some(skin.clone());
            }
        }
        self
    }

    pub fn build(self) -> DollScene {
        self.scene
    }
}

impl Default for RigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scene::BoneId;

    #[test]
    fn test_standard_orders_down() {
        assert_eq!(standard_base_order(Direction::Down, BodyPart::BackArm), 0);
        assert_eq!(standard_base_order(Direction::Down, BodyPart::Chest), 40);
        assert_eq!(standard_base_order(Direction::Down, BodyPart::FrontLeg), 90);
        // L_Arm and R_Arm are not in the table
        assert_eq!(standard_base_order(Direction::Down, BodyPart::LArm), 100);
        assert_eq!(standard_base_order(Direction::Down, BodyPart::RArm), 110);
    }

    #[test]
    fn test_up_pose_puts_front_limbs_behind() {
        assert!(
            standard_base_order(Direction::Up, BodyPart::FrontArm)
                < standard_base_order(Direction::Up, BodyPart::Chest)
        );
        assert!(
            standard_base_order(Direction::Down, BodyPart::FrontArm)
                > standard_base_order(Direction::Down, BodyPart::Chest)
        );
    }

    #[test]
    fn test_orders_are_unique_per_direction() {
        for direction in Direction::ALL {
            let mut orders: Vec<i32> = BodyPart::ALL
                .iter()
                .map(|p| standard_base_order(direction, *p))
                .collect();
            orders.sort();
            orders.dedup();
            assert_eq!(orders.len(), BodyPart::ALL.len());
        }
    }

    #[test]
    fn test_standard_rig_is_complete() {
        let scene = RigBuilder::standard(|_, _| None).build();
        assert_eq!(scene.layer_count(), 36);
        for direction in Direction::ALL {
            assert_eq!(scene.base_layers(direction).count(), 12);
        }
    }

    #[test]
    fn test_partial_rig_and_configuration() {
        let scene = RigBuilder::new()
            .with_sorting_layer(3)
            .base_part_with(Direction::Side, BodyPart::Head, |layer| layer.flip_x = true)
            .skinned(Direction::Side, SkinBinding::new(BoneId(0), vec![BoneId(0), BoneId(1)]))
            .build();

        let id = scene.base_layer(Direction::Side, BodyPart::Head).unwrap();
        let layer = scene.get(id).unwrap();
        assert!(layer.flip_x);
        assert_eq!(layer.sorting_layer, 3);
        assert_eq!(layer.draw_order, standard_base_order(Direction::Side, BodyPart::Head));
        assert_eq!(layer.skin.as_ref().unwrap().bone_transforms.len(), 2);
        assert_eq!(scene.base_layer(Direction::Down, BodyPart::Head), None);
    }
}
