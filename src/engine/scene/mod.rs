// Doll scene: explicit layer registry for the three facing poses
//
// Base layers are registered once per (direction, body part) when the rig is
// built; overlays are spawned and destroyed by the outfit compositor.

mod graph;
mod layer;
mod rig;

pub use graph::{DollScene, ObserverResponse, SceneEvent};
pub use layer::{BoneId, Layer, LayerId, LayerKind, LayerParent, SkinBinding};
pub use rig::RigBuilder;
