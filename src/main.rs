use anyhow::Result;
use glam::Vec2;
use log::{debug, error, info, warn};
use std::path::Path;
use std::sync::Arc;
use winit::{
    event::{Event, WindowEvent},
    event_loop::EventLoop,
    window::WindowBuilder,
};

mod core;
mod engine;
mod game;

use engine::assets::{AssetManager, AssetType};
use engine::game_loop::GameLoop;
use engine::input::{Action, InputConfig};
use engine::renderer::palette::{PALETTE_SWAP_MATERIAL, PALETTE_SWAP_SHADER};
use engine::renderer::Renderer;
use game::outfits::{CompositorConfig, OutfitSet};
use game::showcase;
use game::PaperDoll;

/// Logger settings read from `filter_var`, falling back to info
fn logger_env(filter_var: &str) -> env_logger::Env<'_> {
    env_logger::Env::default().filter_or(filter_var, "info")
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(logger_env("RUST_LOG")).init();

    info!("Starting Paper Doll viewer...");

    let mut assets = AssetManager::new("assets");

    // A shader on disk overrides the built-in one
    let material = if assets.asset_exists(AssetType::Shader, &format!("{}.wgsl", PALETTE_SWAP_MATERIAL)) {
        assets.load_material(PALETTE_SWAP_MATERIAL)?
    } else {
        assets.register_material(PALETTE_SWAP_MATERIAL, PALETTE_SWAP_SHADER)
    };
    let shader_source = assets
        .material(material)
        .map(|m| m.shader_source.clone())
        .ok_or_else(|| anyhow::anyhow!("Palette material missing after registration"))?;

    showcase::paint_art(&mut assets)?;
    let outfits = showcase::build_outfits(&assets)?;
    let scene = showcase::build_rig(&assets)?;
    info!("Assets ready: {:?}", assets.stats());

    let outfit_set = OutfitSet::new(scene, CompositorConfig::default(), &assets);
    let mut doll = PaperDoll::new(outfit_set).with_animation(showcase::wave_clip());

    // Create event loop and window
    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Paper Doll")
            .with_inner_size(winit::dpi::LogicalSize::new(640, 640))
            .with_resizable(true)
            .build(&event_loop)?,
    );

    info!("Window created successfully");

    let mut renderer = pollster::block_on(Renderer::new(window.clone(), &shader_source))?;
    let doll_center = Vec2::new(0.0, 5.0);
    renderer.camera_mut().set_position(doll_center);
    renderer.camera_mut().fit(showcase::doll_extent());

    let input = InputConfig::from_bindings(engine::input::action::default_bindings());
    let mut game_loop = GameLoop::new();
    let mut color_index = 0;

    info!("Arrows/WASD turn, 1-3 toggle outfits, C clears, R recolors, P saves previews, Space waves");

    // Main event loop
    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                info!("Close requested, shutting down...");
                elwt.exit();
            }
            Event::WindowEvent {
                event: WindowEvent::Resized(physical_size),
                ..
            } => {
                renderer.resize(physical_size);
                renderer.camera_mut().fit(showcase::doll_extent());
            }
            Event::WindowEvent {
                event: WindowEvent::KeyboardInput { event, .. },
                ..
            } => {
                let Some(action) = input.action_for_event(&event) else {
                    return;
                };
                match action {
                    Action::FaceDown | Action::FaceUp | Action::FaceLeft | Action::FaceRight => {
                        if let Some(facing) = action.facing_vector() {
                            doll.face(facing);
                        }
                    }
                    Action::ToggleOutfit(index) => {
                        if let Some(outfit) = outfits.get(index) {
                            let set = doll.outfits_mut();
                            if set.is_equipped(outfit) {
                                set.remove_outfit(outfit);
                            } else {
                                set.add_outfit(outfit);
                            }
                        }
                    }
                    Action::ClearOutfits => {
                        doll.outfits_mut().clear_outfits();
                    }
                    Action::CycleColor => {
                        color_index = (color_index + 1) % showcase::CLOTH_CYCLE.len();
                        let target = showcase::CLOTH_CYCLE[color_index];
                        let recolored = outfits.first().is_some_and(|tunic| {
                            doll.outfits_mut().edit_recolor(tunic, move |slots, _| {
                                if let Some(slot) = slots.first_mut() {
                                    slot.target_color = target;
                                }
                            })
                        });
                        if !recolored {
                            info!("Equip the tunic (1) to recolor it");
                        }
                    }
                    Action::SavePreview => {
                        let set = doll.outfits();
                        match showcase::save_recolor_previews(
                            &assets,
                            set.equipped_outfits(),
                            set.current_direction(),
                            Path::new("previews"),
                        ) {
                            Ok(paths) => info!("Saved {} recolor previews", paths.len()),
                            Err(e) => warn!("Preview failed: {}", e),
                        }
                    }
                    Action::PlayWave => doll.play("wave"),
                    Action::Quit => elwt.exit(),
                }
            }
            Event::WindowEvent {
                event: WindowEvent::RedrawRequested,
                ..
            } => {
                for _ in 0..game_loop.begin_frame() {
                    doll.update(game_loop.fixed_timestep());
                }
                if game_loop.frame_count() % 300 == 0 {
                    debug!("{:.1} fps", game_loop.fps());
                }

                let set = doll.outfits();
                if let Err(e) = renderer.render(set.scene(), set.current_direction(), &assets) {
                    match e.downcast_ref::<wgpu::SurfaceError>() {
                        Some(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            warn!("Surface lost, reconfiguring");
                            renderer.resize(window.inner_size());
                        }
                        Some(wgpu::SurfaceError::OutOfMemory) => {
                            error!("GPU out of memory, shutting down");
                            elwt.exit();
                        }
                        _ => warn!("Frame skipped: {}", e),
                    }
                }
            }
            Event::AboutToWait => {
                // Request redraw on next frame
                window.request_redraw();
            }
            _ => {}
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}
