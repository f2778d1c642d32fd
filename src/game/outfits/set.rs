// Outfit set: turns equipped outfits and a facing direction into overlay layers
//
// Overlay layers are never patched. Any structural change (equip, unequip,
// recolor, turn) tears down every overlay and regenerates the lot from the
// equipped list, so the scene is always a function of that list and the
// current direction.

use super::config::{CompositorConfig, MaterializePolicy};
use super::descriptor::OutfitDescriptor;
use super::equipped::EquippedOutfit;
use super::recolor::RecolorSlot;
use super::OutfitError;
use crate::core::{BodyPart, Direction};
use crate::engine::assets::{MaterialHandle, MaterialSource};
use crate::engine::scene::{DollScene, Layer, LayerId, LayerKind, LayerParent, SceneEvent};
use log::{debug, info, trace, warn};
use std::collections::HashMap;
use std::sync::Arc;

type RecolorEdit<'a> = Box<dyn FnOnce(&mut Vec<RecolorSlot>, &mut f32) + 'a>;

/// A change waiting in an `OutfitEdit`
enum StagedChange<'a> {
    Add(Arc<OutfitDescriptor>),
    Remove(Arc<OutfitDescriptor>),
    Clear,
    SetDirection(Direction),
    Recolor {
        outfit: Arc<OutfitDescriptor>,
        edit: RecolorEdit<'a>,
    },
}

#[derive(Debug, Clone)]
struct OverlayRecord {
    outfit: Arc<OutfitDescriptor>,
    layer: LayerId,
}

/// The outfits one character wears and the overlay layers generated for them
pub struct OutfitSet {
    scene: DollScene,
    config: CompositorConfig,
    palette_material: Option<MaterialHandle>,
    equipped: Vec<EquippedOutfit>,
    current_direction: Direction,
    /// Overlays per (direction, part), in draw order
    overlays: HashMap<(Direction, BodyPart), Vec<OverlayRecord>>,
    rebuilding: bool,
    rebuild_count: u64,
}

impl OutfitSet {
    /// Attach to a rigged scene, facing down with nothing equipped
    pub fn new(scene: DollScene, config: CompositorConfig, materials: &impl MaterialSource) -> Self {
        let palette_material = materials.resolve_material(&config.palette_material);
        if palette_material.is_none() {
            warn!(
                "Material '{}' not found, overlays will carry palette parameters without it",
                config.palette_material
            );
        }

        let mut set = Self {
            scene,
            config,
            palette_material,
            equipped: Vec::new(),
            current_direction: Direction::Down,
            overlays: HashMap::new(),
            rebuilding: false,
            rebuild_count: 0,
        };
        set.request_rebuild();
        set
    }

    /// Stage several changes; they are applied together with at most one rebuild
    pub fn edit(&mut self) -> OutfitEdit<'_> {
        OutfitEdit {
            set: self,
            staged: Vec::new(),
        }
    }

    /// Equip an outfit. Already equipped: no-op
    pub fn add_outfit(&mut self, outfit: &Arc<OutfitDescriptor>) -> bool {
        self.edit().add(outfit).commit()
    }

    /// Unequip an outfit. Not equipped: no-op
    pub fn remove_outfit(&mut self, outfit: &Arc<OutfitDescriptor>) -> bool {
        self.edit().remove(outfit).commit()
    }

    pub fn clear_outfits(&mut self) -> bool {
        self.edit().clear().commit()
    }

    /// Turn to face `direction`. Same direction: no-op
    pub fn set_facing_direction(&mut self, direction: Direction) -> bool {
        self.edit().set_direction(direction).commit()
    }

    /// Mutate one equipped outfit's recolor slots and tolerance, then rebuild.
    ///
    /// Returns false, without calling `edit`, if the outfit is not equipped.
    pub fn edit_recolor<'a, F>(&'a mut self, outfit: &Arc<OutfitDescriptor>, edit: F) -> bool
    where
        F: FnOnce(&mut Vec<RecolorSlot>, &mut f32) + 'a,
    {
        self.edit().recolor(outfit, edit).commit()
    }

    /// Regenerate every overlay. Dropped if a rebuild is already running
    pub fn request_rebuild(&mut self) {
        if self.rebuilding {
            trace!("Dropping nested rebuild request");
            return;
        }
        self.rebuild();
    }

    /// Copy the active flag of the current direction's base layer for `part`
    /// onto that part's overlays, without rebuilding
    pub fn sync_overlay_active_state(&mut self, part: BodyPart) {
        let direction = self.current_direction;
        let base_active = self
            .scene
            .base_layer(direction, part)
            .and_then(|id| self.scene.get(id))
            .map(|layer| layer.active);

        if let (Some(active), Some(records)) = (base_active, self.overlays.get(&(direction, part))) {
            for record in records {
                self.scene.set_active(record.layer, active);
            }
        }
        self.flush_observer_requests();
    }

    /// `sync_overlay_active_state` for a part given by its layer name
    pub fn sync_overlay_active_state_named(&mut self, part_name: &str) -> Result<(), OutfitError> {
        let part: BodyPart = part_name.parse()?;
        self.sync_overlay_active_state(part);
        Ok(())
    }

    /// Show or hide a base part of the current pose (animation driven)
    pub fn set_base_part_active(&mut self, part: BodyPart, active: bool) {
        if let Some(id) = self.scene.base_layer(self.current_direction, part) {
            self.scene.set_active(id, active);
        }
        self.flush_observer_requests();
    }

    /// Face left in the side pose
    pub fn set_mirrored(&mut self, mirrored: bool) {
        self.scene.set_root_mirrored(Direction::Side, mirrored);
    }

    pub fn equipped_outfits(&self) -> &[EquippedOutfit] {
        &self.equipped
    }

    pub fn is_equipped(&self, outfit: &Arc<OutfitDescriptor>) -> bool {
        self.equipped.iter().any(|e| e.wraps(outfit))
    }

    pub fn current_direction(&self) -> Direction {
        self.current_direction
    }

    pub fn is_mirrored(&self) -> bool {
        self.scene.root(Direction::Side).mirrored
    }

    /// The overlay `outfit` contributes to one part of one pose
    pub fn overlay(&self, direction: Direction, part: BodyPart, outfit: &Arc<OutfitDescriptor>) -> Option<LayerId> {
        self.overlays
            .get(&(direction, part))?
            .iter()
            .find(|record| Arc::ptr_eq(&record.outfit, outfit))
            .map(|record| record.layer)
    }

    /// Overlays of one part of one pose, back to front
    pub fn overlays_for(&self, direction: Direction, part: BodyPart) -> Vec<LayerId> {
        self.overlays
            .get(&(direction, part))
            .map(|records| records.iter().map(|r| r.layer).collect())
            .unwrap_or_default()
    }

    pub fn overlay_count(&self) -> usize {
        self.overlays.values().map(Vec::len).sum()
    }

    pub fn scene(&self) -> &DollScene {
        &self.scene
    }

    /// Take the scene's event journal (enabled with `DollScene::set_recording`)
    pub fn drain_scene_events(&mut self) -> Vec<SceneEvent> {
        self.scene.drain_events()
    }

    /// Completed rebuilds since construction
    pub fn rebuild_count(&self) -> u64 {
        self.rebuild_count
    }

    /// Apply staged changes in order; rebuild once if any of them took effect
    fn apply(&mut self, changes: Vec<StagedChange<'_>>) -> bool {
        let start_direction = self.current_direction;
        let mut changed = false;

        for change in changes {
            match change {
                StagedChange::Add(outfit) => {
                    if !self.is_equipped(&outfit) {
                        info!("Equipping outfit '{}'", outfit.name());
                        self.equipped
                            .push(EquippedOutfit::new(outfit, self.config.default_tolerance));
                        changed = true;
                    }
                }
                StagedChange::Remove(outfit) => {
                    if let Some(index) = self.equipped.iter().position(|e| e.wraps(&outfit)) {
                        info!("Removing outfit '{}'", outfit.name());
                        self.equipped.remove(index);
                        changed = true;
                    }
                }
                StagedChange::Clear => {
                    if !self.equipped.is_empty() {
                        info!("Clearing {} outfits", self.equipped.len());
                        self.equipped.clear();
                        changed = true;
                    }
                }
                StagedChange::SetDirection(direction) => {
                    if direction != self.current_direction {
                        info!("Facing {}", direction);
                        self.current_direction = direction;
                    }
                }
                StagedChange::Recolor { outfit, edit } => {
                    if let Some(equipped) = self.equipped.iter_mut().find(|e| e.wraps(&outfit)) {
                        let mut tolerance = equipped.tolerance();
                        edit(equipped.recolor_slots_mut(), &mut tolerance);
                        equipped.set_tolerance(tolerance);
                        changed = true;
                    }
                }
            }
        }

        changed |= self.current_direction != start_direction;
        if changed {
            self.request_rebuild();
        }
        changed
    }

    fn rebuild(&mut self) {
        self.rebuilding = true;

        for (_, records) in self.overlays.drain() {
            for record in records {
                self.scene.destroy(record.layer);
            }
        }

        for direction in Direction::ALL {
            self.scene
                .set_root_active(direction, direction == self.current_direction);

            for part in BodyPart::ALL {
                let replaced = self
                    .equipped
                    .iter()
                    .any(|e| e.base_outfit().part(part).is_some_and(|entry| entry.hides_base()));
                if let Some(base) = self.scene.base_layer(direction, part) {
                    self.scene.set_visible(base, !replaced);
                }
            }
        }

        let directions = match self.config.materialize {
            MaterializePolicy::AllDirections => Direction::ALL.to_vec(),
            MaterializePolicy::ActiveDirectionOnly => vec![self.current_direction],
        };
        for direction in directions {
            for part in BodyPart::ALL {
                self.materialize(direction, part);
            }
        }

        // Events raised above may have asked for another rebuild
        for _ in 0..self.scene.take_rebuild_requests() {
            self.request_rebuild();
        }

        self.rebuilding = false;
        self.rebuild_count += 1;
        debug!(
            "Rebuilt outfit layers: {} outfits, {} overlays, facing {}",
            self.equipped.len(),
            self.overlay_count(),
            self.current_direction
        );
    }

    /// Create the overlays of one part of one pose
    fn materialize(&mut self, direction: Direction, part: BodyPart) {
        // (equip index, sort offset, sprite)
        let mut candidates: Vec<_> = self
            .equipped
            .iter()
            .enumerate()
            .filter_map(|(index, equipped)| {
                let entry = equipped.base_outfit().part(part)?;
                if !entry.has_art {
                    return None;
                }
                entry.sprite(direction).map(|sprite| (index, entry.sort_offset, sprite))
            })
            .collect();
        if candidates.is_empty() {
            return;
        }
        // Stable: equal offsets keep equip order
        candidates.sort_by_key(|(_, sort_offset, _)| *sort_offset);

        let base = self
            .scene
            .base_layer(direction, part)
            .and_then(|id| self.scene.get(id).map(|layer| (id, layer.clone())));

        let mut records = Vec::with_capacity(candidates.len());
        for (index, sort_offset, sprite) in candidates {
            let equipped = &self.equipped[index];
            let outfit = equipped.base_outfit();

            let mut layer = Layer::new(
                format!("{}_{}_Overlay_{}", part, outfit.name(), direction),
                LayerKind::Overlay {
                    part,
                    outfit: outfit.name().to_string(),
                },
                direction,
                LayerParent::Root(direction),
            );
            layer.draw_order = self.config.rootless_base_order + 1 + sort_offset;
            layer.sorting_layer = self.config.sorting_layer;

            if let Some((base_id, base)) = &base {
                layer.parent = LayerParent::Layer(*base_id);
                layer.draw_order = base.draw_order + 1 + sort_offset;
                layer.sorting_layer = base.sorting_layer;
                layer.tint = base.tint;
                layer.flip_x = base.flip_x;
                layer.flip_y = base.flip_y;
                layer.skin = base.skin.clone();
            }

            layer.sprite = Some(sprite);
            layer.material = self.palette_material;
            layer.palette = equipped.swap_table();
            trace!(
                "Overlay '{}' at order {} with {} swap pairs",
                layer.name,
                layer.draw_order,
                layer.palette.swap_count()
            );

            let id = self.scene.spawn(layer);
            records.push(OverlayRecord {
                outfit: Arc::clone(outfit),
                layer: id,
            });
        }

        self.overlays.insert((direction, part), records);
    }

    /// Honor rebuild requests an observer raised outside of a rebuild
    fn flush_observer_requests(&mut self) {
        if self.scene.take_rebuild_requests() > 0 {
            self.request_rebuild();
        }
    }
}

/// Staging guard returned by `OutfitSet::edit`.
///
/// Changes apply in staging order on `commit`, or when the guard is dropped.
pub struct OutfitEdit<'a> {
    set: &'a mut OutfitSet,
    staged: Vec<StagedChange<'a>>,
}

impl<'a> OutfitEdit<'a> {
    pub fn add(mut self, outfit: &Arc<OutfitDescriptor>) -> Self {
        self.staged.push(StagedChange::Add(Arc::clone(outfit)));
        self
    }

    pub fn remove(mut self, outfit: &Arc<OutfitDescriptor>) -> Self {
        self.staged.push(StagedChange::Remove(Arc::clone(outfit)));
        self
    }

    pub fn clear(mut self) -> Self {
        self.staged.push(StagedChange::Clear);
        self
    }

    pub fn set_direction(mut self, direction: Direction) -> Self {
        self.staged.push(StagedChange::SetDirection(direction));
        self
    }

    pub fn recolor<F>(mut self, outfit: &Arc<OutfitDescriptor>, edit: F) -> Self
    where
        F: FnOnce(&mut Vec<RecolorSlot>, &mut f32) + 'a,
    {
        self.staged.push(StagedChange::Recolor {
            outfit: Arc::clone(outfit),
            edit: Box::new(edit),
        });
        self
    }

    /// Apply the staged changes; true if any of them took effect
    pub fn commit(mut self) -> bool {
        let staged = std::mem::take(&mut self.staged);
        self.set.apply(staged)
    }
}

impl Drop for OutfitEdit<'_> {
    fn drop(&mut self) {
        if !self.staged.is_empty() {
            let staged = std::mem::take(&mut self.staged);
            self.set.apply(staged);
        }
    }
}
