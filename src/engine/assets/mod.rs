// Asset management system
//
// Provides centralized loading and caching of sprite art and named materials.

mod handle;
mod loader;
mod manager;
mod sheet;

pub use handle::{AssetHandle, AssetId, MaterialHandle, SpriteHandle, TextureHandle};
pub use loader::{AssetLoader, AssetType};
pub use manager::AssetManager;
pub use sheet::{SheetBuilder, SpriteRegion, SpriteSheet};

/// Content facility that resolves materials by name
pub trait MaterialSource {
    fn resolve_material(&self, name: &str) -> Option<MaterialHandle>;
}

/// Asset loading errors
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Asset already loaded: {0}")]
    AlreadyLoaded(String),

    #[error("Failed to load asset: {0}")]
    LoadError(String),
}
