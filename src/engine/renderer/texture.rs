// GPU textures uploaded from the asset manager's decoded images

use crate::engine::assets::{AssetManager, TextureHandle};
use log::debug;
use std::collections::HashMap;

/// A texture with its GPU resources and the bind group sampling it
pub struct GpuTexture {
    // Owns the storage the bind group samples
    _texture: wgpu::Texture,
    pub bind_group: wgpu::BindGroup,
}

impl GpuTexture {
    /// Upload an RGBA image.
    ///
    /// The format is linear `Rgba8Unorm` so the shader compares the same
    /// values the palette's swap colors were authored in. Sampling is nearest
    /// to keep pixel art (and its exact palette colors) intact.
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        rgba: &image::RgbaImage,
        label: Option<&str>,
    ) -> Self {
        let (width, height) = rgba.dimensions();
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label,
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba.as_raw(),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label,
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        Self {
            _texture: texture,
            bind_group,
        }
    }
}

/// Uploads asset textures on first use and keeps them resident
#[derive(Default)]
pub struct TextureCache {
    textures: HashMap<TextureHandle, GpuTexture>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure `handle` is on the GPU. Returns false if the asset manager
    /// doesn't know the texture
    pub fn ensure(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        assets: &AssetManager,
        handle: TextureHandle,
    ) -> bool {
        if self.textures.contains_key(&handle) {
            return true;
        }
        let Some(data) = assets.texture(handle) else {
            return false;
        };

        debug!("Uploading texture {} to the GPU", data.name);
        let texture = GpuTexture::from_image(device, queue, layout, &data.image, Some(&data.name));
        self.textures.insert(handle, texture);
        true
    }

    pub fn get(&self, handle: TextureHandle) -> Option<&GpuTexture> {
        self.textures.get(&handle)
    }
}
