// Sprite sheets: named regions packed into one texture

use super::{AssetHandle, SpriteHandle, TextureHandle};
use glam::Vec2;

/// A named region within a sheet texture
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteRegion {
    pub name: String,
    pub texture: TextureHandle,

    /// Position in the texture (pixels)
    pub x: u32,
    pub y: u32,

    /// Size of the region (pixels)
    pub width: u32,
    pub height: u32,

    /// UV coordinates (0.0 to 1.0)
    pub uv_min: Vec2,
    pub uv_max: Vec2,
}

impl SpriteRegion {
    /// Create a region with UVs derived from the sheet size
    pub fn new(
        name: impl Into<String>,
        texture: TextureHandle,
        (x, y): (u32, u32),
        (width, height): (u32, u32),
        (sheet_width, sheet_height): (u32, u32),
    ) -> Self {
        let uv_min = Vec2::new(
            x as f32 / sheet_width as f32,
            y as f32 / sheet_height as f32,
        );
        let uv_max = Vec2::new(
            (x + width) as f32 / sheet_width as f32,
            (y + height) as f32 / sheet_height as f32,
        );

        Self {
            name: name.into(),
            texture,
            x,
            y,
            width,
            height,
            uv_min,
            uv_max,
        }
    }

    /// Size in pixels
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

/// Named sprites cut from one texture, e.g. all part art of one outfit pose
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    pub name: String,
    pub texture: TextureHandle,
    pub width: u32,
    pub height: u32,
    regions: Vec<SpriteRegion>,
}

impl SpriteSheet {
    pub fn new(name: impl Into<String>, texture: TextureHandle, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            texture,
            width,
            height,
            regions: Vec::new(),
        }
    }

    /// Handle under which a region of this sheet is registered
    pub fn sprite_handle(&self, region_name: &str) -> SpriteHandle {
        AssetHandle::from_path(&format!("{}#{}", self.name, region_name))
    }

    pub fn add_region(&mut self, region: SpriteRegion) {
        self.regions.push(region);
    }

    pub fn get_region(&self, name: &str) -> Option<&SpriteRegion> {
        self.regions.iter().find(|r| r.name == name)
    }

    /// First sprite whose name starts with `prefix`, in insertion order
    pub fn find_prefixed(&self, prefix: &str) -> Option<SpriteHandle> {
        self.regions
            .iter()
            .find(|r| r.name.starts_with(prefix))
            .map(|r| self.sprite_handle(&r.name))
    }

    pub fn regions(&self) -> &[SpriteRegion] {
        &self.regions
    }
}

/// Shelf packer for building sheets from loose sprite images
pub struct SheetBuilder {
    name: String,
    texture: TextureHandle,
    width: u32,
    height: u32,
    padding: u32,
    cursor_x: u32,
    cursor_y: u32,
    shelf_height: u32,
    regions: Vec<SpriteRegion>,
}

impl SheetBuilder {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        let name = name.into();
        Self {
            texture: AssetHandle::from_path(&name),
            name,
            width,
            height,
            padding: 1,
            cursor_x: 0,
            cursor_y: 0,
            shelf_height: 0,
            regions: Vec::new(),
        }
    }

    /// Set the padding between sprites
    pub fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    /// Reserve space for a sprite.
    ///
    /// Returns the placed region, or None if the sheet is full
    pub fn place(&mut self, name: &str, width: u32, height: u32) -> Option<SpriteRegion> {
        if self.cursor_x + width > self.width {
            self.cursor_x = 0;
            self.cursor_y += self.shelf_height + self.padding;
            self.shelf_height = 0;
        }

        if self.cursor_x + width > self.width || self.cursor_y + height > self.height {
            return None;
        }

        let region = SpriteRegion::new(
            name,
            self.texture,
            (self.cursor_x, self.cursor_y),
            (width, height),
            (self.width, self.height),
        );
        self.regions.push(region.clone());

        self.cursor_x += width + self.padding;
        self.shelf_height = self.shelf_height.max(height);

        Some(region)
    }

    pub fn build(self) -> SpriteSheet {
        let mut sheet = SpriteSheet::new(self.name, self.texture, self.width, self.height);
        for region in self.regions {
            sheet.add_region(region);
        }
        sheet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tex() -> TextureHandle {
        AssetHandle::from_path("sheet")
    }

    #[test]
    fn test_region_uv() {
        let region = SpriteRegion::new("Chest", tex(), (0, 0), (64, 64), (256, 256));

        assert_eq!(region.uv_min, Vec2::new(0.0, 0.0));
        assert_eq!(region.uv_max, Vec2::new(0.25, 0.25));
        assert_eq!(region.size(), Vec2::new(64.0, 64.0));
    }

    #[test]
    fn test_find_prefixed_uses_first_match() {
        let mut sheet = SpriteSheet::new("knight_down", tex(), 128, 128);
        sheet.add_region(SpriteRegion::new("Head_0", tex(), (0, 0), (8, 8), (128, 128)));
        sheet.add_region(SpriteRegion::new("Head_1", tex(), (8, 0), (8, 8), (128, 128)));

        assert_eq!(sheet.find_prefixed("Head"), Some(sheet.sprite_handle("Head_0")));
        assert_eq!(sheet.find_prefixed("Chest"), None);
    }

    #[test]
    fn test_builder_wraps_to_next_shelf() {
        let mut builder = SheetBuilder::new("s", 100, 100).with_padding(0);

        let first = builder.place("a", 60, 30).unwrap();
        let second = builder.place("b", 60, 30).unwrap();

        assert_eq!(first.y, 0);
        assert_eq!(second.y, 30);
        assert_eq!(builder.build().regions().len(), 2);
    }

    #[test]
    fn test_builder_overflow() {
        let mut builder = SheetBuilder::new("s", 64, 64);
        assert!(builder.place("too_large", 128, 16).is_none());
        assert!(builder.place("too_tall", 16, 128).is_none());
    }
}
