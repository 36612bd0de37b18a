// Key binding configuration: user overrides merged over defaults

use super::action::{default_bindings, Action};
use std::collections::HashMap;
use winit::keyboard::KeyCode;

/// Maps each logical action to the key that drives it
#[derive(Debug, Clone)]
pub struct KeyBindings {
    keys: HashMap<Action, KeyCode>,
}

impl KeyBindings {
    /// Default bindings (WASD, space, left shift)
    pub fn new() -> Self {
        Self {
            keys: default_bindings().into_iter().collect(),
        }
    }

    /// Defaults with the given overrides applied on top
    pub fn with_overrides(overrides: &[(Action, KeyCode)]) -> Self {
        let mut bindings = Self::new();
        for (action, key) in overrides {
            bindings.bind(*action, *key);
        }
        bindings
    }

    /// Bind an action to a key, replacing its previous key
    pub fn bind(&mut self, action: Action, key: KeyCode) {
        self.keys.insert(action, key);
    }

    /// Remove an action's binding
    pub fn unbind(&mut self, action: Action) {
        self.keys.remove(&action);
    }

    /// Get the key bound to an action
    pub fn key_for(&self, action: Action) -> Option<KeyCode> {
        self.keys.get(&action).copied()
    }

    /// Resolve a key to its action.
    ///
    /// If several actions share the key, the one latest in `Action::ALL`
    /// order wins.
    pub fn action_for(&self, key: KeyCode) -> Option<Action> {
        Action::ALL
            .iter()
            .rev()
            .find(|action| self.keys.get(action) == Some(&key))
            .copied()
    }

    /// Check if an action has a binding
    pub fn has_binding(&self, action: Action) -> bool {
        self.keys.contains_key(&action)
    }

    /// Get all bindings in resolution order
    pub fn all(&self) -> Vec<(Action, KeyCode)> {
        Action::ALL
            .iter()
            .filter_map(|action| self.key_for(*action).map(|key| (*action, key)))
            .collect()
    }

    pub fn reset_to_defaults(&mut self) {
        *self = Self::new();
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}
