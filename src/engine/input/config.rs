// Input configuration and remapping

use super::action::{Action, InputSource};
use std::collections::HashMap;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::PhysicalKey;

/// Maps input sources (keys) to viewer actions
#[derive(Debug, Clone, Default)]
pub struct InputConfig {
    bindings: HashMap<InputSource, Action>,

    /// Reverse mapping for quick lookups (action -> all sources)
    action_to_sources: HashMap<Action, Vec<InputSource>>,
}

impl InputConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bindings(bindings: Vec<(InputSource, Action)>) -> Self {
        let mut config = Self::new();
        for (source, action) in bindings {
            config.bind(source, action);
        }
        config
    }

    /// Bind an input source to an action, replacing its previous binding
    pub fn bind(&mut self, source: InputSource, action: Action) {
        self.unbind_source(source);

        self.bindings.insert(source, action);
        self.action_to_sources.entry(action).or_default().push(source);
    }

    pub fn unbind_source(&mut self, source: InputSource) {
        if let Some(action) = self.bindings.remove(&source) {
            if let Some(sources) = self.action_to_sources.get_mut(&action) {
                sources.retain(|s| *s != source);
                if sources.is_empty() {
                    self.action_to_sources.remove(&action);
                }
            }
        }
    }

    pub fn get_action(&self, source: InputSource) -> Option<Action> {
        self.bindings.get(&source).copied()
    }

    pub fn get_sources(&self, action: Action) -> Vec<InputSource> {
        self.action_to_sources
            .get(&action)
            .cloned()
            .unwrap_or_default()
    }

    pub fn has_binding(&self, action: Action) -> bool {
        self.action_to_sources.contains_key(&action)
    }

    /// Action triggered by a winit key event.
    ///
    /// Only fresh presses count; releases and key repeats yield None
    pub fn action_for_event(&self, event: &KeyEvent) -> Option<Action> {
        if event.state != ElementState::Pressed || event.repeat {
            return None;
        }
        match event.physical_key {
            PhysicalKey::Code(code) => self.get_action(InputSource::key(code)),
            PhysicalKey::Unidentified(_) => None,
        }
    }

    pub fn reset_to_defaults(&mut self) {
        *self = Self::from_bindings(super::action::default_bindings());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::KeyCode;

    #[test]
    fn test_bind_action() {
        let mut config = InputConfig::new();
        let source = InputSource::key(KeyCode::KeyQ);
        config.bind(source, Action::Quit);

        assert_eq!(config.get_action(source), Some(Action::Quit));
    }

    #[test]
    fn test_rebind_source() {
        let mut config = InputConfig::new();
        let source = InputSource::key(KeyCode::KeyA);

        config.bind(source, Action::FaceLeft);
        config.bind(source, Action::ClearOutfits);

        assert_eq!(config.get_action(source), Some(Action::ClearOutfits));
        assert!(!config.has_binding(Action::FaceLeft));
    }

    #[test]
    fn test_get_sources() {
        let config = InputConfig::from_bindings(super::super::action::default_bindings());

        let sources = config.get_sources(Action::FaceLeft);
        assert_eq!(sources.len(), 2);
        assert!(sources.contains(&InputSource::key(KeyCode::ArrowLeft)));
        assert!(sources.contains(&InputSource::key(KeyCode::KeyA)));
    }

    #[test]
    fn test_reset_to_defaults() {
        let mut config = InputConfig::new();
        config.bind(InputSource::key(KeyCode::KeyZ), Action::Quit);
        config.reset_to_defaults();

        assert_eq!(config.get_action(InputSource::key(KeyCode::KeyZ)), None);
        assert_eq!(
            config.get_action(InputSource::key(KeyCode::Digit2)),
            Some(Action::ToggleOutfit(1))
        );
    }
}
