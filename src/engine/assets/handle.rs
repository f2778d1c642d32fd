// Typed handles for textures, sprites and materials

use std::marker::PhantomData;

/// Unique identifier for an asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetId(pub(crate) u64);

impl AssetId {
    /// Create a new asset ID from a string path
    pub fn from_path(path: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        path.hash(&mut hasher);
        Self(hasher.finish())
    }
}

/// Type-safe handle to a loaded asset
///
/// The `T` parameter ensures a sprite handle can't be bound where a material is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetHandle<T> {
    pub(crate) id: AssetId,
    _phantom: PhantomData<T>,
}

impl<T> AssetHandle<T> {
    pub(crate) fn new(id: AssetId) -> Self {
        Self {
            id,
            _phantom: PhantomData,
        }
    }

    /// Handle for the asset registered under `path`
    pub(crate) fn from_path(path: &str) -> Self {
        Self::new(AssetId::from_path(path))
    }

    /// Get the underlying asset ID
    pub fn id(&self) -> AssetId {
        self.id
    }
}

// Marker types for different asset types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureAsset;
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteAsset;
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialAsset;

pub type TextureHandle = AssetHandle<TextureAsset>;
/// A rectangular region of a texture, the unit of art bound to a layer
pub type SpriteHandle = AssetHandle<SpriteAsset>;
pub type MaterialHandle = AssetHandle<MaterialAsset>;
