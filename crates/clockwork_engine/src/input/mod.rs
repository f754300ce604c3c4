//! Input snapshot handed to the scene each frame
//!
//! Polling the platform is the host's job. The host fills an [`InputSnapshot`]
//! once per frame and the scene exposes it to actors and controllers.

use std::collections::HashSet;

use crate::foundation::math::Vec2;

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A key
    A,
    /// D key
    D,
    /// N key
    N,
    /// S key
    S,
    /// W key
    W,
    /// Y key
    Y,
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

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
}

/// Input state captured for a single frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    keys_down: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,
    buttons_down: HashSet<MouseButton>,
    pointer_delta: Vec2,
    scroll: i32,
}

impl InputSnapshot {
    /// Snapshot with nothing pressed
    pub fn empty() -> Self {
        Self::default()
    }

    /// Mark a key as held
    pub fn with_key_down(mut self, key: KeyCode) -> Self {
        self.keys_down.insert(key);
        self
    }

    /// Mark a key as pressed this frame (it is also held)
    pub fn with_key_pressed(mut self, key: KeyCode) -> Self {
        self.keys_down.insert(key);
        self.keys_pressed.insert(key);
        self
    }

    /// Mark a mouse button as held
    pub fn with_button_down(mut self, button: MouseButton) -> Self {
        self.buttons_down.insert(button);
        self
    }

    /// Set the pointer movement since the previous frame, in pixels
    pub fn with_pointer_delta(mut self, delta: Vec2) -> Self {
        self.pointer_delta = delta;
        self
    }

    /// Set the scroll wheel steps for this frame
    pub fn with_scroll(mut self, steps: i32) -> Self {
        self.scroll = steps;
        self
    }

    /// Is the key held
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Was the key pressed during this frame
    pub fn is_key_just_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Is the mouse button held
    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    /// Pointer movement since the previous frame
    pub fn pointer_delta(&self) -> Vec2 {
        self.pointer_delta
    }

    /// Scroll wheel steps
    pub fn scroll(&self) -> i32 {
        self.scroll
    }
}
