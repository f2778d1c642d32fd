// Viewer actions and their default key bindings

use winit::keyboard::KeyCode;

/// Everything the doll viewer can be asked to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Facing
    FaceDown,
    FaceUp,
    FaceLeft,
    FaceRight,

    // Wardrobe
    ToggleOutfit(usize),
    ClearOutfits,
    CycleColor,
    SavePreview,

    // Animation
    PlayWave,

    Quit,
}

impl Action {
    /// Movement vector a facing action stands for
    pub fn facing_vector(&self) -> Option<glam::Vec2> {
        match self {
            Action::FaceDown => Some(glam::Vec2::NEG_Y),
            Action::FaceUp => Some(glam::Vec2::Y),
            Action::FaceLeft => Some(glam::Vec2::NEG_X),
            Action::FaceRight => Some(glam::Vec2::X),
            _ => None,
        }
    }
}

/// A physical input that can trigger an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Keyboard(KeyCode),
}

impl InputSource {
    pub fn key(code: KeyCode) -> Self {
        Self::Keyboard(code)
    }
}

/// Default bindings: arrows or WASD to turn, number keys for outfits
pub fn default_bindings() -> Vec<(InputSource, Action)> {
    vec![
        (InputSource::key(KeyCode::ArrowDown), Action::FaceDown),
        (InputSource::key(KeyCode::ArrowUp), Action::FaceUp),
        (InputSource::key(KeyCode::ArrowLeft), Action::FaceLeft),
        (InputSource::key(KeyCode::ArrowRight), Action::FaceRight),
        (InputSource::key(KeyCode::KeyS), Action::FaceDown),
        (InputSource::key(KeyCode::KeyW), Action::FaceUp),
        (InputSource::key(KeyCode::KeyA), Action::FaceLeft),
        (InputSource::key(KeyCode::KeyD), Action::FaceRight),
        (InputSource::key(KeyCode::Digit1), Action::ToggleOutfit(0)),
        (InputSource::key(KeyCode::Digit2), Action::ToggleOutfit(1)),
        (InputSource::key(KeyCode::Digit3), Action::ToggleOutfit(2)),
        (InputSource::key(KeyCode::KeyC), Action::ClearOutfits),
        (InputSource::key(KeyCode::KeyR), Action::CycleColor),
        (InputSource::key(KeyCode::KeyP), Action::SavePreview),
        (InputSource::key(KeyCode::Space), Action::PlayWave),
        (InputSource::key(KeyCode::Escape), Action::Quit),
    ]
}
