// Compositor configuration

use super::equipped::DEFAULT_TOLERANCE;
use crate::engine::renderer::palette::PALETTE_SWAP_MATERIAL;

/// Which poses get overlay layers on a rebuild
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaterializePolicy {
    /// Overlays exist for all three poses; switching direction only swaps
    /// which root is active. More layers, no work on a turn.
    #[default]
    AllDirections,
    /// Overlays exist only for the current pose and are rebuilt on every turn
    ActiveDirectionOnly,
}

/// Settings shared by every outfit set built with it
#[derive(Debug, Clone, PartialEq)]
pub struct CompositorConfig {
    /// Tolerance given to newly equipped outfits
    pub default_tolerance: f32,
    /// Name of the palette swap material to resolve
    pub palette_material: String,
    /// Stand-in base order for overlays of parts the rig lacks.
    ///
    /// Such overlays draw at `rootless_base_order + 1 + sort_offset` rather
    /// than at one flat order, so their sort offsets still stack them the
    /// same way they would over a real base layer.
    pub rootless_base_order: i32,
    /// Sorting layer of overlays parented to a root
    pub sorting_layer: u32,
    pub materialize: MaterializePolicy,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            default_tolerance: DEFAULT_TOLERANCE,
            palette_material: PALETTE_SWAP_MATERIAL.to_string(),
            rootless_base_order: 0,
            sorting_layer: 0,
            materialize: MaterializePolicy::AllDirections,
        }
    }
}

impl CompositorConfig {
    pub fn with_default_tolerance(mut self, tolerance: f32) -> Self {
        self.default_tolerance = tolerance;
        self
    }

    pub fn with_palette_material(mut self, name: impl Into<String>) -> Self {
        self.palette_material = name.into();
        self
    }

    pub fn with_rootless_base_order(mut self, order: i32) -> Self {
        self.rootless_base_order = order;
        self
    }

    pub fn with_sorting_layer(mut self, sorting_layer: u32) -> Self {
        self.sorting_layer = sorting_layer;
        self
    }

    pub fn with_materialize(mut self, policy: MaterializePolicy) -> Self {
        self.materialize = policy;
        self
    }
}
