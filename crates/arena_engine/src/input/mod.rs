//! Keyboard input state
//!
//! Key events arrive from the host between frames as discrete
//! pressed/released notifications. [`KeyboardState`] folds them into the set
//! of keys currently held.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    /// A key
    A,
    /// B key
    B,
    /// C key
    C,
    /// D key
    D,
    /// E key
    E,
    /// F key
    F,
    /// G key
    G,
    /// H key
    H,
    /// I key
    I,
    /// J key
    J,
    /// K key
    K,
    /// L key
    L,
    /// M key
    M,
    /// N key
    N,
    /// O key
    O,
    /// P key
    P,
    /// Q key
    Q,
    /// R key
    R,
    /// S key
    S,
    /// T key
    T,
    /// U key
    U,
    /// V key
    V,
    /// W key
    W,
    /// X key
    X,
    /// Y key
    Y,
    /// Z key
    Z,
    /// Space key
    Space,
    /// Enter key
    Enter,
    /// Escape key
    Escape,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
}

/// Keys currently held down
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    pressed: HashSet<KeyCode>,
}

impl KeyboardState {
    /// Create an empty keyboard state
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press; returns false for auto-repeat of a held key
    pub fn press(&mut self, key: KeyCode) -> bool {
        self.pressed.insert(key)
    }

    /// Record a key release; returns false if the key was not held
    pub fn release(&mut self, key: KeyCode) -> bool {
        self.pressed.remove(&key)
    }

    /// Check whether a key is held
    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    /// Release every key (focus loss, room transitions)
    pub fn release_all(&mut self) {
        self.pressed.clear();
    }
}
