// Disk access for textures and material shaders

use super::AssetError;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Kinds of files the viewer reads from disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetType {
    Texture,
    Shader,
}

impl AssetType {
    /// Subdirectory of the asset root holding this type
    pub fn default_directory(&self) -> &'static str {
        match self {
            AssetType::Texture => "textures",
            AssetType::Shader => "shaders",
        }
    }
}

/// Resolves asset names under `<base>/<type dir>/` and reads them
pub struct AssetLoader {
    base_path: PathBuf,
}

impl AssetLoader {
    /// Create a new asset loader with the given base path
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Get the full path for an asset
    pub fn resolve_path(&self, asset_type: AssetType, name: &str) -> PathBuf {
        self.base_path
            .join(asset_type.default_directory())
            .join(name)
    }

    /// Load asset bytes from disk
    pub fn load_bytes(&self, asset_type: AssetType, name: &str) -> Result<Vec<u8>> {
        let path = self.resolve_path(asset_type, name);

        if !path.exists() {
            return Err(AssetError::NotFound(path.to_string_lossy().to_string()).into());
        }

        std::fs::read(&path)
            .map_err(|e| AssetError::LoadError(format!("Failed to read {}: {}", name, e)).into())
    }

    /// Load and decode a texture image into RGBA8
    pub fn load_image(&self, name: &str) -> Result<image::RgbaImage> {
        let bytes = self.load_bytes(AssetType::Texture, name)?;
        let img = image::load_from_memory(&bytes)
            .map_err(|e| AssetError::LoadError(format!("Failed to decode {}: {}", name, e)))?;
        Ok(img.to_rgba8())
    }

    /// Load shader source text
    pub fn load_shader(&self, name: &str) -> Result<String> {
        let bytes = self.load_bytes(AssetType::Shader, name)?;
        String::from_utf8(bytes)
            .map_err(|e| AssetError::LoadError(format!("Shader {} is not UTF-8: {}", name, e)).into())
    }

    /// Check if an asset exists
    pub fn exists(&self, asset_type: AssetType, name: &str) -> bool {
        self.resolve_path(asset_type, name).exists()
    }
}
