// Paper doll: an outfit set driven by an animation player

use super::animation::{AnimationClip, AnimationPlayer};
use super::outfits::OutfitSet;
use crate::core::{BodyPart, Direction};
use glam::Vec2;
use log::debug;
use std::collections::HashMap;

/// A rigged character with outfits, facing and part animation
pub struct PaperDoll {
    outfits: OutfitSet,
    animator: AnimationPlayer,
    /// Last active state the animation gave each part
    part_states: HashMap<BodyPart, bool>,
}

impl PaperDoll {
    pub fn new(outfits: OutfitSet) -> Self {
        Self {
            outfits,
            animator: AnimationPlayer::new(),
            part_states: HashMap::new(),
        }
    }

    pub fn with_animation(mut self, clip: AnimationClip) -> Self {
        self.animator.add_animation(clip);
        self
    }

    /// Restart an animation from its first frame
    pub fn play(&mut self, name: &str) {
        self.animator.play_from_start(name);
    }

    /// Advance the animation and apply the part visibility keys it crossed
    pub fn update(&mut self, dt: f32) {
        for key in self.animator.update(dt) {
            debug!("Frame {}: {} active = {}", key.frame, key.part, key.active);
            self.apply_part_state(key.part, key.active);
        }
    }

    /// Face along a movement vector; zero movement keeps the current facing
    pub fn face(&mut self, movement: Vec2) {
        let Some((direction, mirrored)) = Direction::from_vector(movement) else {
            return;
        };

        if direction == Direction::Side {
            self.outfits.set_mirrored(mirrored);
        }
        if self.outfits.set_facing_direction(direction) {
            // The new pose's base layers haven't seen the animation yet
            let states: Vec<_> = self.part_states.iter().map(|(p, a)| (*p, *a)).collect();
            for (part, active) in states {
                self.apply_part_state(part, active);
            }
        }
    }

    pub fn outfits(&self) -> &OutfitSet {
        &self.outfits
    }

    pub fn outfits_mut(&mut self) -> &mut OutfitSet {
        &mut self.outfits
    }

    fn apply_part_state(&mut self, part: BodyPart, active: bool) {
        self.part_states.insert(part, active);
        self.outfits.set_base_part_active(part, active);
        self.outfits.sync_overlay_active_state(part);
    }
}
