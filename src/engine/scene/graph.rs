// Layer arena, direction roots and the base-part registry

use super::layer::{Layer, LayerId, LayerParent};
use crate::core::{BodyPart, Direction};
use glam::Vec2;
use log::trace;
use std::collections::HashMap;

/// Container grouping all layers of one facing pose
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionRoot {
    pub name: &'static str,
    pub active: bool,
    /// Draw the pose mirrored horizontally (facing left in the side pose)
    pub mirrored: bool,
    pub position: Vec2,
}

/// Structural or visibility change in the scene
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneEvent {
    LayerCreated {
        id: LayerId,
        direction: Direction,
        part: BodyPart,
        overlay: bool,
    },
    LayerDestroyed {
        id: LayerId,
        direction: Direction,
        part: BodyPart,
        overlay: bool,
    },
    VisibilityChanged { id: LayerId, visible: bool },
    ActiveChanged { id: LayerId, active: bool },
    RootActivated { direction: Direction, active: bool },
}

impl SceneEvent {
    /// True for overlay creation or destruction
    pub fn is_overlay_churn(&self) -> bool {
        matches!(
            self,
            SceneEvent::LayerCreated { overlay: true, .. }
                | SceneEvent::LayerDestroyed { overlay: true, .. }
        )
    }
}

/// What a scene observer wants done after seeing an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverResponse {
    Continue,
    RequestRebuild,
}

pub type SceneObserver = Box<dyn FnMut(&SceneEvent) -> ObserverResponse>;

struct Slot {
    generation: u32,
    layer: Option<Layer>,
}

/// The hierarchical scene one doll is drawn from
pub struct DollScene {
    slots: Vec<Slot>,
    free: Vec<u32>,
    roots: [DirectionRoot; 3],
    base_layers: HashMap<(Direction, BodyPart), LayerId>,
    next_sequence: u64,
    record_events: bool,
    events: Vec<SceneEvent>,
    observer: Option<SceneObserver>,
    rebuild_requests: usize,
}

impl DollScene {
    /// Empty scene with the Down root active
    pub fn new() -> Self {
        let roots = Direction::ALL.map(|direction| DirectionRoot {
            name: direction.root_name(),
            active: direction == Direction::Down,
            mirrored: false,
            position: Vec2::ZERO,
        });

        Self {
            slots: Vec::new(),
            free: Vec::new(),
            roots,
            base_layers: HashMap::new(),
            next_sequence: 0,
            record_events: false,
            events: Vec::new(),
            observer: None,
            rebuild_requests: 0,
        }
    }

    /// Register the base layer for `layer.direction` and `layer.body_part()`.
    ///
    /// An existing base layer for the same slot is destroyed first.
    pub fn add_base_layer(&mut self, mut layer: Layer) -> LayerId {
        let key = (layer.direction, layer.body_part());
        if let Some(old) = self.base_layers.remove(&key) {
            self.destroy(old);
        }

        layer.parent = LayerParent::Root(layer.direction);
        let id = self.spawn(layer);
        self.base_layers.insert(key, id);
        id
    }

    /// Insert a layer into the arena
    pub fn spawn(&mut self, mut layer: Layer) -> LayerId {
        layer.sequence = self.next_sequence;
        self.next_sequence += 1;

        let direction = layer.direction;
        let part = layer.body_part();
        let overlay = layer.is_overlay();

        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.layer = Some(layer);
                LayerId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    layer: Some(layer),
                });
                LayerId {
                    index: (self.slots.len() - 1) as u32,
                    generation: 0,
                }
            }
        };

        self.emit(SceneEvent::LayerCreated {
            id,
            direction,
            part,
            overlay,
        });
        id
    }

    /// Remove a layer and everything parented to it
    pub fn destroy(&mut self, id: LayerId) -> Option<Layer> {
        self.get(id)?;

        let children: Vec<LayerId> = self
            .iter()
            .filter(|(_, layer)| layer.parent == LayerParent::Layer(id))
            .map(|(child, _)| child)
            .collect();
        for child in children {
            self.destroy(child);
        }

        let slot = &mut self.slots[id.index as usize];
        let layer = slot.layer.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);

        let key = (layer.direction, layer.body_part());
        if self.base_layers.get(&key) == Some(&id) {
            self.base_layers.remove(&key);
        }

        self.emit(SceneEvent::LayerDestroyed {
            id,
            direction: layer.direction,
            part: layer.body_part(),
            overlay: layer.is_overlay(),
        });
        Some(layer)
    }

    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.layer.as_ref())
    }

    /// Iterate over all live layers
    pub fn iter(&self) -> impl Iterator<Item = (LayerId, &Layer)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.layer.as_ref().map(|layer| {
                (
                    LayerId {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    layer,
                )
            })
        })
    }

    pub fn layer_count(&self) -> usize {
        self.iter().count()
    }

    pub fn base_layer(&self, direction: Direction, part: BodyPart) -> Option<LayerId> {
        self.base_layers.get(&(direction, part)).copied()
    }

    /// Base layers of one direction, in canonical body part order
    pub fn base_layers(&self, direction: Direction) -> impl Iterator<Item = (BodyPart, LayerId)> + '_ {
        BodyPart::ALL
            .into_iter()
            .filter_map(move |part| self.base_layer(direction, part).map(|id| (part, id)))
    }

    /// Set the compositor-controlled visibility flag
    pub fn set_visible(&mut self, id: LayerId, visible: bool) {
        let changed = match self.layer_mut(id) {
            Some(layer) if layer.visible != visible => {
                layer.visible = visible;
                true
            }
            _ => false,
        };
        if changed {
            self.emit(SceneEvent::VisibilityChanged { id, visible });
        }
    }

    /// Set the animation-controlled active flag
    pub fn set_active(&mut self, id: LayerId, active: bool) {
        let changed = match self.layer_mut(id) {
            Some(layer) if layer.active != active => {
                layer.active = active;
                true
            }
            _ => false,
        };
        if changed {
            self.emit(SceneEvent::ActiveChanged { id, active });
        }
    }

    pub fn root(&self, direction: Direction) -> &DirectionRoot {
        &self.roots[direction.index()]
    }

    pub fn set_root_active(&mut self, direction: Direction, active: bool) {
        let root = &mut self.roots[direction.index()];
        if root.active != active {
            root.active = active;
            self.emit(SceneEvent::RootActivated { direction, active });
        }
    }

    pub fn set_root_mirrored(&mut self, direction: Direction, mirrored: bool) {
        self.roots[direction.index()].mirrored = mirrored;
    }

    /// Move all three poses together
    pub fn set_position(&mut self, position: Vec2) {
        for root in &mut self.roots {
            root.position = position;
        }
    }

    /// Whether a layer ends up on screen: its root is active, it is visible,
    /// and it and every ancestor layer are active
    pub fn is_drawn(&self, id: LayerId) -> bool {
        let Some(layer) = self.get(id) else {
            return false;
        };
        if !layer.visible || !self.root(layer.direction).active {
            return false;
        }

        let mut current = Some(layer);
        while let Some(layer) = current {
            if !layer.active {
                return false;
            }
            current = match layer.parent {
                LayerParent::Layer(parent) => self.get(parent),
                LayerParent::Root(_) => None,
            };
        }
        true
    }

    /// Drawn layers of a direction, back to front
    pub fn draw_list(&self, direction: Direction) -> Vec<LayerId> {
        let mut drawn: Vec<(LayerId, &Layer)> = self
            .iter()
            .filter(|(id, layer)| layer.direction == direction && self.is_drawn(*id))
            .collect();
        drawn.sort_by_key(|(_, layer)| (layer.sorting_layer, layer.draw_order, layer.sequence));
        drawn.into_iter().map(|(id, _)| id).collect()
    }

    /// Offset of a layer from the scene origin, root position included
    pub fn world_offset(&self, id: LayerId) -> Vec2 {
        let mut offset = Vec2::ZERO;
        let mut current = self.get(id);
        while let Some(layer) = current {
            offset += layer.local_offset;
            current = match layer.parent {
                LayerParent::Layer(parent) => self.get(parent),
                LayerParent::Root(direction) => {
                    offset += self.root(direction).position;
                    None
                }
            };
        }
        offset
    }

    /// Keep a journal of scene events for `drain_events`
    pub fn set_recording(&mut self, record: bool) {
        self.record_events = record;
        if !record {
            self.events.clear();
        }
    }

    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }

    /// Install a callback notified of every scene event
    pub fn set_observer(&mut self, observer: SceneObserver) {
        self.observer = Some(observer);
    }

    /// Rebuild requests raised by the observer since the last call
    pub(crate) fn take_rebuild_requests(&mut self) -> usize {
        std::mem::take(&mut self.rebuild_requests)
    }

    pub(crate) fn layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.layer.as_mut())
    }

    fn emit(&mut self, event: SceneEvent) {
        trace!("Scene event: {:?}", event);
        if let Some(observer) = self.observer.as_mut() {
            if observer(&event) == ObserverResponse::RequestRebuild {
                self.rebuild_requests += 1;
            }
        }
        if self.record_events {
            self.events.push(event);
        }
    }
}

impl Default for DollScene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scene::LayerKind;

    fn overlay(part: BodyPart, direction: Direction, parent: LayerParent) -> Layer {
        Layer::new(
            "overlay",
            LayerKind::Overlay {
                part,
                outfit: "Test".to_string(),
            },
            direction,
            parent,
        )
    }

    #[test]
    fn test_new_scene_roots() {
        let scene = DollScene::new();
        assert!(scene.root(Direction::Down).active);
        assert!(!scene.root(Direction::Side).active);
        assert!(!scene.root(Direction::Up).active);
        assert_eq!(scene.root(Direction::Up).name, "Base_Up_Fixed");
    }

    #[test]
    fn test_base_registry() {
        let mut scene = DollScene::new();
        let id = scene.add_base_layer(Layer::base(BodyPart::Head, Direction::Down));

        assert_eq!(scene.base_layer(Direction::Down, BodyPart::Head), Some(id));
        assert_eq!(scene.base_layer(Direction::Up, BodyPart::Head), None);

        // Re-registering replaces the old layer
        let replacement = scene.add_base_layer(Layer::base(BodyPart::Head, Direction::Down));
        assert_ne!(id, replacement);
        assert!(scene.get(id).is_none());
        assert_eq!(scene.layer_count(), 1);
    }

    #[test]
    fn test_stale_ids_do_not_resolve() {
        let mut scene = DollScene::new();
        let first = scene.spawn(overlay(BodyPart::Chest, Direction::Down, LayerParent::Root(Direction::Down)));
        scene.destroy(first);

        let second = scene.spawn(overlay(BodyPart::Chest, Direction::Down, LayerParent::Root(Direction::Down)));
        assert_eq!(first.index, second.index);
        assert!(scene.get(first).is_none());
        assert!(scene.get(second).is_some());
    }

    #[test]
    fn test_destroy_removes_children() {
        let mut scene = DollScene::new();
        let base = scene.add_base_layer(Layer::base(BodyPart::Chest, Direction::Down));
        let child = scene.spawn(overlay(BodyPart::Chest, Direction::Down, LayerParent::Layer(base)));

        scene.destroy(base);
        assert!(scene.get(child).is_none());
        assert_eq!(scene.base_layer(Direction::Down, BodyPart::Chest), None);
    }

    #[test]
    fn test_is_drawn_follows_ancestors_and_root() {
        let mut scene = DollScene::new();
        let base = scene.add_base_layer(Layer::base(BodyPart::Chest, Direction::Down));
        let child = scene.spawn(overlay(BodyPart::Chest, Direction::Down, LayerParent::Layer(base)));
        assert!(scene.is_drawn(child));

        // Hiding the base renderer does not hide its children
        scene.set_visible(base, false);
        assert!(!scene.is_drawn(base));
        assert!(scene.is_drawn(child));

        // Deactivating the base does
        scene.set_active(base, false);
        assert!(!scene.is_drawn(child));
        scene.set_active(base, true);

        scene.set_root_active(Direction::Down, false);
        assert!(!scene.is_drawn(child));
    }

    #[test]
    fn test_draw_list_order() {
        let mut scene = DollScene::new();
        let root = LayerParent::Root(Direction::Down);

        let mut high = overlay(BodyPart::Head, Direction::Down, root);
        high.draw_order = 5;
        let mut low = overlay(BodyPart::Chest, Direction::Down, root);
        low.draw_order = 1;
        let mut tie = overlay(BodyPart::Chest, Direction::Down, root);
        tie.draw_order = 1;

        let high = scene.spawn(high);
        let low = scene.spawn(low);
        let tie = scene.spawn(tie);
        scene.spawn(overlay(BodyPart::Head, Direction::Up, LayerParent::Root(Direction::Up)));

        assert_eq!(scene.draw_list(Direction::Down), vec![low, tie, high]);
        // Up root is inactive
        assert!(scene.draw_list(Direction::Up).is_empty());
    }

    #[test]
    fn test_world_offset() {
        let mut scene = DollScene::new();
        let mut base = Layer::base(BodyPart::Head, Direction::Down);
        base.local_offset = Vec2::new(0.0, 10.0);
        let base = scene.add_base_layer(base);
        let mut child = overlay(BodyPart::Head, Direction::Down, LayerParent::Layer(base));
        child.local_offset = Vec2::new(1.0, 1.0);
        let child = scene.spawn(child);

        scene.set_position(Vec2::new(100.0, 0.0));
        assert_eq!(scene.world_offset(child), Vec2::new(101.0, 11.0));
    }

    #[test]
    fn test_event_journal_and_observer() {
        use std::cell::Cell;
        use std::rc::Rc;

        let mut scene = DollScene::new();
        scene.set_recording(true);

        let seen = Rc::new(Cell::new(0));
        let counter = Rc::clone(&seen);
        scene.set_observer(Box::new(move |_event: &SceneEvent| {
            counter.set(counter.get() + 1);
            ObserverResponse::RequestRebuild
        }));

        let id = scene.spawn(overlay(BodyPart::Head, Direction::Down, LayerParent::Root(Direction::Down)));
        scene.set_visible(id, true); // unchanged, no event
        scene.destroy(id);

        let events = scene.drain_events();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(SceneEvent::is_overlay_churn));
        assert_eq!(seen.get(), 2);
        assert_eq!(scene.take_rebuild_requests(), 2);
        assert_eq!(scene.take_rebuild_requests(), 0);
    }
}
