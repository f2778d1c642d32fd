// Game layer: outfits, animation and the paper doll tying them together

pub mod animation;
pub mod doll;
pub mod outfits;
pub mod showcase;

pub use doll::PaperDoll;
