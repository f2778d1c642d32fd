// Central asset management system

use super::sheet::{SpriteRegion, SpriteSheet};
use super::{
    AssetError, AssetHandle, AssetId, AssetLoader, AssetType, MaterialHandle, MaterialSource,
    SpriteHandle, TextureHandle,
};
use anyhow::Result;
use log::{debug, info};
use std::collections::HashMap;
use std::path::Path;

/// Decoded texture pixels; GPU upload is the renderer's business
pub struct TextureData {
    pub name: String,
    pub image: image::RgbaImage,
}

/// A named shader program with the parameters its layers feed it
#[derive(Debug, Clone)]
pub struct Material {
    pub name: String,
    pub shader_source: String,
}

/// Central asset manager for the doll's art and materials
pub struct AssetManager {
    loader: AssetLoader,

    /// Loaded textures
    textures: HashMap<AssetId, TextureData>,

    /// Sprite regions, addressable by sprite handle
    sprites: HashMap<AssetId, SpriteRegion>,

    /// Sprite sheets by name
    sheets: HashMap<String, SpriteSheet>,

    /// Materials, resolved by name
    materials: HashMap<AssetId, Material>,
}

impl AssetManager {
    /// Create a new asset manager
    pub fn new<P: AsRef<Path>>(asset_path: P) -> Self {
        Self {
            loader: AssetLoader::new(asset_path),
            textures: HashMap::new(),
            sprites: HashMap::new(),
            sheets: HashMap::new(),
            materials: HashMap::new(),
        }
    }

    /// Load `textures/<name>.png` and register it under `name`, the same key
    /// a sheet of that name binds to
    pub fn load_texture(&mut self, name: &str) -> Result<TextureHandle> {
        let image = self.loader.load_image(&format!("{}.png", name))?;
        debug!("Loaded texture {} ({}x{})", name, image.width(), image.height());
        self.add_texture_image(name, image)
    }

    /// Register an in-memory image as a texture. Names are unique
    pub fn add_texture_image(&mut self, name: &str, image: image::RgbaImage) -> Result<TextureHandle> {
        let handle: TextureHandle = AssetHandle::from_path(name);
        if self.textures.contains_key(&handle.id()) {
            return Err(AssetError::AlreadyLoaded(name.to_string()).into());
        }

        self.textures.insert(
            handle.id(),
            TextureData {
                name: name.to_string(),
                image,
            },
        );
        Ok(handle)
    }

    pub fn texture(&self, handle: TextureHandle) -> Option<&TextureData> {
        self.textures.get(&handle.id())
    }

    /// Register a sheet and make each of its regions addressable as a sprite
    pub fn add_sheet(&mut self, sheet: SpriteSheet) -> Result<()> {
        if self.sheets.contains_key(&sheet.name) {
            return Err(AssetError::AlreadyLoaded(sheet.name.clone()).into());
        }
        if !self.textures.contains_key(&sheet.texture.id()) {
            return Err(AssetError::NotFound(format!("texture for sheet {}", sheet.name)).into());
        }

        for region in sheet.regions() {
            let handle = sheet.sprite_handle(&region.name);
            self.sprites.insert(handle.id(), region.clone());
        }
        info!(
            "Registered sprite sheet {} with {} sprites",
            sheet.name,
            sheet.regions().len()
        );
        self.sheets.insert(sheet.name.clone(), sheet);
        Ok(())
    }

    pub fn sheet(&self, name: &str) -> Option<&SpriteSheet> {
        self.sheets.get(name)
    }

    pub fn sprite(&self, handle: SpriteHandle) -> Option<&SpriteRegion> {
        self.sprites.get(&handle.id())
    }

    /// Register a material from shader source
    pub fn register_material(&mut self, name: &str, shader_source: impl Into<String>) -> MaterialHandle {
        let handle: MaterialHandle = AssetHandle::from_path(name);
        self.materials.insert(
            handle.id(),
            Material {
                name: name.to_string(),
                shader_source: shader_source.into(),
            },
        );
        handle
    }

    /// Load a material's shader from `shaders/<name>.wgsl`, replacing any registered source
    pub fn load_material(&mut self, name: &str) -> Result<MaterialHandle> {
        let source = self.loader.load_shader(&format!("{}.wgsl", name))?;
        Ok(self.register_material(name, source))
    }

    pub fn material(&self, handle: MaterialHandle) -> Option<&Material> {
        self.materials.get(&handle.id())
    }

    /// Check if an asset exists on disk
    pub fn asset_exists(&self, asset_type: AssetType, name: &str) -> bool {
        self.loader.exists(asset_type, name)
    }

    /// Get statistics about loaded assets
    pub fn stats(&self) -> AssetStats {
        AssetStats {
            texture_count: self.textures.len(),
            sprite_count: self.sprites.len(),
            sheet_count: self.sheets.len(),
            material_count: self.materials.len(),
        }
    }
}

impl MaterialSource for AssetManager {
    fn resolve_material(&self, name: &str) -> Option<MaterialHandle> {
        let handle: MaterialHandle = AssetHandle::from_path(name);
        self.materials.contains_key(&handle.id()).then_some(handle)
    }
}

/// Statistics about loaded assets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetStats {
    pub texture_count: usize,
    pub sprite_count: usize,
    pub sheet_count: usize,
    pub material_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::SheetBuilder;

    #[test]
    fn test_texture_names_are_unique() {
        let mut assets = AssetManager::new(".");
        let white = image::RgbaImage::from_pixel(1, 1, image::Rgba([255; 4]));
        let handle = assets.add_texture_image("white", white.clone()).unwrap();

        let texture = assets.texture(handle).unwrap();
        assert_eq!(texture.image.dimensions(), (1, 1));
        assert!(assets.add_texture_image("white", white).is_err());
    }

    #[test]
    fn test_missing_texture_file_fails() {
        let mut assets = AssetManager::new("/definitely/not/a/real/dir");
        assert!(assets.load_texture("body_down").is_err());
        assert_eq!(assets.stats().texture_count, 0);
    }

    #[test]
    fn test_sheet_regions_become_sprites() {
        let mut assets = AssetManager::new(".");
        let mut builder = SheetBuilder::new("knight_down", 64, 64);
        builder.place("Chest", 16, 16).unwrap();
        builder.place("Head", 8, 8).unwrap();
        let sheet = builder.build();

        // The sheet's texture must exist first
        assert!(assets.add_sheet(sheet.clone()).is_err());

        assets
            .add_texture_image("knight_down", image::RgbaImage::new(64, 64))
            .unwrap();
        assets.add_sheet(sheet.clone()).unwrap();

        let head = assets.sprite(sheet.sprite_handle("Head")).unwrap();
        assert_eq!((head.width, head.height), (8, 8));
        assert_eq!(assets.stats().sprite_count, 2);
    }

    #[test]
    fn test_material_resolution_by_name() {
        let mut assets = AssetManager::new(".");
        assert_eq!(assets.resolve_material("palette_swap"), None);

        let handle = assets.register_material("palette_swap", "// wgsl");
        assert_eq!(assets.resolve_material("palette_swap"), Some(handle));
        assert_eq!(assets.material(handle).unwrap().name, "palette_swap");
    }
}
