// Outfit system
//
// Paper-doll compositing: outfit templates, per-character equipped copies with
// their recolor slots, and the set that turns them into overlay layers.

pub mod config;
pub mod descriptor;
pub mod equipped;
pub mod importer;
pub mod recolor;
pub mod set;

pub use config::CompositorConfig;
pub use descriptor::{OutfitDescriptor, OutfitPartEntry};
pub use equipped::EquippedOutfit;
pub use importer::OutfitImporter;
pub use recolor::RecolorSlot;
pub use set::OutfitSet;

use crate::core::body::UnknownBodyPart;
use crate::core::{BodyPart, Direction};

/// Errors raised while authoring or importing outfits
#[derive(Debug, thiserror::Error)]
pub enum OutfitError {
    #[error(transparent)]
    UnknownBodyPart(#[from] UnknownBodyPart),

    #[error("Outfit '{outfit}' already has an entry for {part}")]
    DuplicatePart { outfit: String, part: BodyPart },

    #[error("Outfit name must not be empty")]
    EmptyName,

    #[error("No sprite sheet given for the {0} pose")]
    MissingSheet(Direction),
}
