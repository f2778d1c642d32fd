// Showcase content: procedurally painted body and outfit sheets for the viewer

use super::animation::AnimationClip;
use super::outfits::{EquippedOutfit, OutfitDescriptor, OutfitImporter, RecolorSlot};
use crate::core::{BodyPart, Color, Direction};
use crate::engine::assets::{AssetManager, AssetType, SheetBuilder, SpriteRegion};
use crate::engine::renderer::palette::recolor_image;
use crate::engine::scene::{DollScene, RigBuilder};
use anyhow::{anyhow, Result};
use glam::Vec2;
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const SHEET_SIZE: u32 = 64;

const SKIN: [u8; 4] = [232, 190, 150, 255];
const SKIN_SHADE: [u8; 4] = [190, 140, 105, 255];
const CLOTH: [u8; 4] = [200, 30, 30, 255];
const CLOTH_SHADE: [u8; 4] = [130, 15, 15, 255];
const STEEL: [u8; 4] = [170, 175, 185, 255];
const STEEL_SHADE: [u8; 4] = [110, 115, 125, 255];
const LEATHER: [u8; 4] = [120, 75, 40, 255];
const LEATHER_SHADE: [u8; 4] = [80, 50, 25, 255];
const EYE: [u8; 4] = [30, 30, 40, 255];

/// Target colors the viewer cycles the tunic through
pub const CLOTH_CYCLE: [Color; 4] = [
    Color::rgb(0.78, 0.12, 0.12),
    Color::rgb(0.15, 0.35, 0.8),
    Color::rgb(0.2, 0.6, 0.25),
    Color::rgb(0.55, 0.25, 0.65),
];

/// Which part of a sprite gets painted
#[derive(Clone, Copy)]
enum Coverage {
    Full,
    Top(u32),
    Bottom(u32),
}

/// The base parts each pose shows
fn pose_parts(direction: Direction) -> &'static [BodyPart] {
    match direction {
        Direction::Down | Direction::Up => &[
            BodyPart::Head,
            BodyPart::Chest,
            BodyPart::LArm,
            BodyPart::RArm,
            BodyPart::LLeg,
            BodyPart::RLeg,
        ],
        Direction::Side => &[
            BodyPart::Head,
            BodyPart::Chest,
            BodyPart::FrontArm,
            BodyPart::BackArm,
            BodyPart::FrontLeg,
            BodyPart::BackLeg,
        ],
    }
}

/// Sprite size and offset from the pose root, in pixels (y up)
fn part_layout(direction: Direction, part: BodyPart) -> ((u32, u32), Vec2) {
    let side = direction == Direction::Side;
    match part {
        BodyPart::Head if side => ((10, 10), Vec2::new(1.0, 17.0)),
        BodyPart::Head => ((10, 10), Vec2::new(0.0, 17.0)),
        BodyPart::Chest if side => ((8, 14), Vec2::new(0.0, 5.0)),
        BodyPart::Chest => ((12, 14), Vec2::new(0.0, 5.0)),
        BodyPart::LArm => ((4, 12), Vec2::new(8.0, 5.0)),
        BodyPart::RArm => ((4, 12), Vec2::new(-8.0, 5.0)),
        BodyPart::FrontArm => ((4, 12), Vec2::new(1.0, 5.0)),
        BodyPart::BackArm => ((4, 12), Vec2::new(-1.0, 5.0)),
        BodyPart::LLeg | BodyPart::LLegBack => ((5, 10), Vec2::new(3.0, -7.0)),
        BodyPart::RLeg | BodyPart::RLegBack => ((5, 10), Vec2::new(-3.0, -7.0)),
        BodyPart::FrontLeg => ((5, 10), Vec2::new(1.0, -7.0)),
        BodyPart::BackLeg => ((5, 10), Vec2::new(-1.0, -7.0)),
    }
}

/// Area in pixels the doll needs on screen
pub fn doll_extent() -> Vec2 {
    Vec2::new(32.0, 48.0)
}

fn direction_suffix(direction: Direction) -> &'static str {
    match direction {
        Direction::Down => "down",
        Direction::Side => "side",
        Direction::Up => "up",
    }
}

fn sheet_name(prefix: &str, direction: Direction) -> String {
    format!("{}_{}", prefix, direction_suffix(direction))
}

/// Fill a region with `fill`, shading its outer column and bottom row
fn paint(image: &mut image::RgbaImage, region: &SpriteRegion, coverage: Coverage, fill: [u8; 4], shade: [u8; 4]) {
    let x0 = (region.uv_min.x * SHEET_SIZE as f32).round() as u32;
    let y0 = (region.uv_min.y * SHEET_SIZE as f32).round() as u32;
    let size = region.size();
    let (width, height) = (size.x as u32, size.y as u32);

    let (first_row, last_row) = match coverage {
        Coverage::Full => (0, height),
        Coverage::Top(rows) => (0, rows.min(height)),
        Coverage::Bottom(rows) => (height.saturating_sub(rows), height),
    };

    for y in first_row..last_row {
        for x in 0..width {
            let edge = x == 0 || x + 1 == width || y + 1 == last_row;
            let color = if edge { shade } else { fill };
            image.put_pixel(x0 + x, y0 + y, image::Rgba(color));
        }
    }
}

/// Paint one sheet per pose and register both texture and sheet
fn paint_sheets<F>(assets: &mut AssetManager, prefix: &str, mut sprites: F) -> Result<()>
where
    F: FnMut(Direction) -> Vec<(String, BodyPart, Coverage, [u8; 4], [u8; 4])>,
{
    for direction in Direction::ALL {
        let name = sheet_name(prefix, direction);
        let mut builder = SheetBuilder::new(name.clone(), SHEET_SIZE, SHEET_SIZE);
        let mut image = image::RgbaImage::new(SHEET_SIZE, SHEET_SIZE);

        for (sprite, part, coverage, fill, shade) in sprites(direction) {
            let ((width, height), _) = part_layout(direction, part);
            let region = builder
                .place(&sprite, width, height)
                .ok_or_else(|| anyhow!("Sheet {} is full", name))?;
            paint(&mut image, &region, coverage, fill, shade);

            // Give the face a direction
            if part == BodyPart::Head && prefix == "body" && direction != Direction::Up {
                let x0 = (region.uv_min.x * SHEET_SIZE as f32) as u32;
                let y0 = (region.uv_min.y * SHEET_SIZE as f32) as u32;
                let eyes: &[u32] = if direction == Direction::Side { &[7] } else { &[3, 6] };
                for eye in eyes {
                    image.put_pixel(x0 + eye, y0 + 4, image::Rgba(EYE));
                }
            }
        }

        // Art on disk with the same layout replaces the painted sheet
        if assets.asset_exists(AssetType::Texture, &format!("{}.png", name)) {
            assets.load_texture(&name)?;
        } else {
            assets.add_texture_image(&name, image)?;
        }
        assets.add_sheet(builder.build())?;
    }
    Ok(())
}

/// Paint the bare body and the three outfits into `assets`
pub fn paint_art(assets: &mut AssetManager) -> Result<()> {
    paint_sheets(assets, "body", |direction| {
        pose_parts(direction)
            .iter()
            .map(|part| (part.name().to_string(), *part, Coverage::Full, SKIN, SKIN_SHADE))
            .collect()
    })?;

    paint_sheets(assets, "tunic", |direction| {
        let arms: &[BodyPart] = match direction {
            Direction::Side => &[BodyPart::FrontArm, BodyPart::BackArm],
            _ => &[BodyPart::LArm, BodyPart::RArm],
        };
        std::iter::once((
            BodyPart::Chest.name().to_string(),
            BodyPart::Chest,
            Coverage::Full,
            CLOTH,
            CLOTH_SHADE,
        ))
        .chain(arms.iter().map(|arm| {
            (format!("{}_sleeve", arm.name()), *arm, Coverage::Top(6), CLOTH, CLOTH_SHADE)
        }))
        .collect()
    })?;

    paint_sheets(assets, "helm", |_| {
        vec![(
            "Head_helm".to_string(),
            BodyPart::Head,
            Coverage::Top(5),
            STEEL,
            STEEL_SHADE,
        )]
    })?;

    paint_sheets(assets, "boots", |direction| {
        let legs: &[BodyPart] = match direction {
            Direction::Side => &[BodyPart::FrontLeg, BodyPart::BackLeg],
            _ => &[BodyPart::LLeg, BodyPart::RLeg],
        };
        legs.iter()
            .map(|leg| (format!("{}_boot", leg.name()), *leg, Coverage::Bottom(4), LEATHER, LEATHER_SHADE))
            .collect()
    })?;

    Ok(())
}

/// Rig the painted body: each pose gets only the parts it shows
pub fn build_rig(assets: &AssetManager) -> Result<DollScene> {
    let mut rig = RigBuilder::new();
    for direction in Direction::ALL {
        let name = sheet_name("body", direction);
        let sheet = assets
            .sheet(&name)
            .ok_or_else(|| anyhow!("Body sheet {} not loaded", name))?;

        for part in pose_parts(direction) {
            let sprite = sheet.get_region(part.name()).map(|r| sheet.sprite_handle(&r.name));
            let (_, offset) = part_layout(direction, *part);
            rig = rig.base_part_with(direction, *part, |layer| {
                layer.sprite = sprite;
                layer.local_offset = offset;
            });
        }
    }
    Ok(rig.build())
}

fn import<'a>(
    assets: &'a AssetManager,
    prefix: &str,
    configure: impl FnOnce(OutfitImporter<'a>) -> OutfitImporter<'a>,
    name: &str,
) -> Result<Arc<OutfitDescriptor>> {
    let mut importer = OutfitImporter::new(name);
    for direction in Direction::ALL {
        let sheet_name = sheet_name(prefix, direction);
        let sheet = assets
            .sheet(&sheet_name)
            .ok_or_else(|| anyhow!("Outfit sheet {} not loaded", sheet_name))?;
        importer = importer.with_sheet(direction, sheet);
    }
    Ok(configure(importer).build()?)
}

/// Import the showcase outfits: tunic, helm and boots, in that order
pub fn build_outfits(assets: &AssetManager) -> Result<Vec<Arc<OutfitDescriptor>>> {
    let cloth = RecolorSlot::with_colors(
        "Cloth",
        Color::from_rgba8(CLOTH),
        vec![Color::from_rgba8(CLOTH_SHADE)],
        CLOTH_CYCLE[0],
    );
    let leather = RecolorSlot::with_colors(
        "Leather",
        Color::from_rgba8(LEATHER),
        vec![Color::from_rgba8(LEATHER_SHADE)],
        Color::from_rgba8(LEATHER),
    );

    let tunic = import(
        assets,
        "tunic",
        |importer| {
            importer
                .include(BodyPart::Chest, true)
                .include(BodyPart::LArm, false)
                .include(BodyPart::RArm, false)
                .include(BodyPart::FrontArm, false)
                .include(BodyPart::BackArm, false)
                .with_recolor_slot(cloth)
        },
        "Tunic",
    )?;
    let helm = import(assets, "helm", |importer| importer.include(BodyPart::Head, false), "Helm")?;
    let boots = import(
        assets,
        "boots",
        |importer| {
            importer
                .include(BodyPart::LLeg, false)
                .include(BodyPart::RLeg, false)
                .include(BodyPart::FrontLeg, false)
                .include(BodyPart::BackLeg, false)
                .with_recolor_slot(leather)
        },
        "Boots",
    )?;

    Ok(vec![tunic, helm, boots])
}

/// One-shot clip that flicks the weapon arm out of view and back
pub fn wave_clip() -> AnimationClip {
    AnimationClip::one_shot("wave", 12, 12.0)
        .with_key(0, BodyPart::RArm, false)
        .with_key(0, BodyPart::FrontArm, false)
        .with_key(8, BodyPart::RArm, true)
        .with_key(8, BodyPart::FrontArm, true)
}

/// The sheet an equipped outfit draws from in `direction`, recolored on the
/// CPU with the same swap table the palette shader gets
pub fn recolor_preview(
    assets: &AssetManager,
    outfit: &EquippedOutfit,
    direction: Direction,
) -> Option<image::RgbaImage> {
    let texture = outfit
        .base_outfit()
        .parts()
        .iter()
        .filter_map(|entry| entry.sprite(direction))
        .find_map(|sprite| assets.sprite(sprite))
        .and_then(|region| assets.texture(region.texture))?;

    let mut image = texture.image.clone();
    recolor_image(&mut image, &outfit.swap_table());
    Some(image)
}

/// Write a recolor preview of every equipped outfit into `dir`
pub fn save_recolor_previews(
    assets: &AssetManager,
    outfits: &[EquippedOutfit],
    direction: Direction,
    dir: &Path,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    for outfit in outfits {
        let Some(image) = recolor_preview(assets, outfit, direction) else {
            debug!("{} has no art facing {}", outfit.base_outfit().name(), direction);
            continue;
        };
        let prefix = outfit.base_outfit().name().to_lowercase();
        let path = dir.join(format!("{}.png", sheet_name(&prefix, direction)));
        image.save(&path)?;
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::MaterialSource;
    use crate::engine::renderer::palette::{PALETTE_SWAP_MATERIAL, PALETTE_SWAP_SHADER};
    use crate::game::outfits::{CompositorConfig, OutfitSet};

    fn painted() -> AssetManager {
        let mut assets = AssetManager::new("assets");
        paint_art(&mut assets).unwrap();
        assets
    }

    #[test]
    fn test_paint_art_registers_every_sheet() {
        let assets = painted();
        let stats = assets.stats();
        assert_eq!(stats.sheet_count, 12);
        assert_eq!(stats.texture_count, 12);

        let tunic_down = assets.sheet("tunic_down").unwrap();
        assert!(tunic_down.get_region("L_Arm_sleeve").is_some());
    }

    #[test]
    fn test_rig_only_has_pose_parts() {
        let assets = painted();
        let scene = build_rig(&assets).unwrap();

        assert!(scene.base_layer(Direction::Down, BodyPart::LArm).is_some());
        assert!(scene.base_layer(Direction::Down, BodyPart::FrontArm).is_none());
        assert!(scene.base_layer(Direction::Side, BodyPart::FrontArm).is_some());
        assert_eq!(scene.layer_count(), 18);
    }

    #[test]
    fn test_outfits_dress_the_doll() {
        let mut assets = painted();
        assets.register_material(PALETTE_SWAP_MATERIAL, PALETTE_SWAP_SHADER);
        assert!(assets.resolve_material(PALETTE_SWAP_MATERIAL).is_some());

        let outfits = build_outfits(&assets).unwrap();
        let tunic = &outfits[0];
        assert_eq!(tunic.name(), "Tunic");
        assert!(tunic.part(BodyPart::Chest).unwrap().replaces_base);
        // Prefix match picked up the sleeve
        assert!(tunic.part(BodyPart::LArm).unwrap().sprite(Direction::Down).is_some());
        // No side-pose sprite for a front-view arm
        assert!(tunic.part(BodyPart::LArm).unwrap().sprite(Direction::Side).is_none());

        let scene = build_rig(&assets).unwrap();
        let mut set = OutfitSet::new(scene, CompositorConfig::default(), &assets);
        assert!(set.add_outfit(tunic));

        let chest = set.scene().base_layer(Direction::Down, BodyPart::Chest).unwrap();
        assert!(!set.scene().get(chest).unwrap().visible);
        assert_eq!(set.overlays_for(Direction::Down, BodyPart::LArm).len(), 1);
        assert!(set.overlays_for(Direction::Side, BodyPart::LArm).is_empty());
    }

    #[test]
    fn test_wave_hides_the_arm_then_restores_it() {
        let clip = wave_clip();
        assert_eq!(clip.keys_at(0).count(), 2);
        assert!(clip.keys_at(8).all(|key| key.active));
    }

    #[test]
    fn test_recolor_preview_follows_the_equipped_slots() {
        let assets = painted();
        let outfits = build_outfits(&assets).unwrap();
        let scene = build_rig(&assets).unwrap();
        let mut set = OutfitSet::new(scene, CompositorConfig::default(), &assets);
        set.add_outfit(&outfits[0]);
        set.edit_recolor(&outfits[0], |slots, _| slots[0].target_color = CLOTH_CYCLE[1]);

        let tunic = &set.equipped_outfits()[0];
        let preview = recolor_preview(&assets, tunic, Direction::Down).unwrap();
        let chest = assets.sheet("tunic_down").unwrap().get_region("Chest").unwrap();

        // Interior pixel carries the fill, the outer column the shade
        assert_eq!(preview.get_pixel(chest.x + 1, chest.y + 1).0, CLOTH_CYCLE[1].to_rgba8());
        assert_ne!(preview.get_pixel(chest.x, chest.y + 1).0, CLOTH_SHADE);
        // Transparent padding stays transparent
        assert_eq!(preview.get_pixel(SHEET_SIZE - 1, SHEET_SIZE - 1).0[3], 0);
    }
}
