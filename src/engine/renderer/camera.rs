// Orthographic camera for viewing the doll in pixel units

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2};

/// 2D camera; one world unit is one sprite pixel at zoom 1
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec2,
    /// Screen pixels per sprite pixel
    pub zoom: f32,
    viewport_width: f32,
    viewport_height: f32,
    view_proj: Mat4,
}

impl Camera {
    pub fn new(position: Vec2, viewport_width: f32, viewport_height: f32) -> Self {
        let mut camera = Self {
            position,
            zoom: 1.0,
            viewport_width,
            viewport_height,
            view_proj: Mat4::IDENTITY,
        };
        camera.update_view_proj();
        camera
    }

    fn update_view_proj(&mut self) {
        let half_width = (self.viewport_width / 2.0) / self.zoom;
        let half_height = (self.viewport_height / 2.0) / self.zoom;

        self.view_proj = Mat4::orthographic_rh(
            self.position.x - half_width,
            self.position.x + half_width,
            self.position.y - half_height,
            self.position.y + half_height,
            -100.0,
            100.0,
        );
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.update_view_proj();
    }

    /// Set zoom; pixel art stays crisp at whole numbers
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.max(0.1);
        self.update_view_proj();
    }

    /// Largest whole zoom at which `extent` (world units) fits the viewport
    pub fn fit(&mut self, extent: Vec2) {
        let fit_x = self.viewport_width / extent.x.max(1.0);
        let fit_y = self.viewport_height / extent.y.max(1.0);
        self.set_zoom(fit_x.min(fit_y).floor().max(1.0));
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport_width = width;
        self.viewport_height = height;
        self.update_view_proj();
    }

    pub fn view_proj_matrix(&self) -> Mat4 {
        self.view_proj
    }
}

/// Camera uniform for GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new(camera: &Camera) -> Self {
        Self {
            view_proj: camera.view_proj_matrix().to_cols_array_2d(),
        }
    }
}
