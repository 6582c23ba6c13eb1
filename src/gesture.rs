//! Edit-mode unlock
//!
//! Five quick clicks on the site brand turn edit mode on for the current
//! tab. This is a convenience gesture, not access control: anyone who knows
//! it can edit their own browser's copy of the content.
//!
//! The state machine only counts clicks. Unlocking sets the session flag and
//! the page reloads; edit mode is then whatever the flag says at load time.

use crate::config::EditorConfig;
use crate::consts::{EDIT_MODE_ON, UNLOCK_CLICKS, UNLOCK_WINDOW_MS};
use crate::error::StoreError;
use crate::store::{KeyValueStore, Storage};

/// Click counter state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnlockState {
    Locked,
    /// `count` clicks so far, next one must land by `deadline` (ms)
    Unlocking { count: u32, deadline: f64 },
}

/// What a click did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Still counting; `remaining` clicks to go
    Counting { remaining: u32 },
    /// Threshold reached: set the flag and reload
    Unlocked,
}

/// Rolling-window click counter
#[derive(Debug, Clone)]
pub struct UnlockGesture {
    state: UnlockState,
    clicks: u32,
    window_ms: f64,
}

impl Default for UnlockGesture {
    fn default() -> Self {
        Self::new(UNLOCK_CLICKS, UNLOCK_WINDOW_MS)
    }
}

impl UnlockGesture {
    pub fn new(clicks: u32, window_ms: f64) -> Self {
        Self {
            state: UnlockState::Locked,
            clicks: clicks.max(1),
            window_ms,
        }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(config.unlock_clicks, config.unlock_window_ms)
    }

    pub fn state(&self) -> UnlockState {
        self.state
    }

    /// Register a click at `now` (ms)
    ///
    /// A click after the deadline starts a fresh count, so the gesture works
    /// even if the expiry timer never fired.
    pub fn click(&mut self, now: f64) -> ClickOutcome {
        let count = match self.state {
            UnlockState::Unlocking { count, deadline } if now <= deadline => count + 1,
            _ => 1,
        };

        if count >= self.clicks {
            self.state = UnlockState::Locked;
            log::info!("Edit mode unlock gesture completed");
            return ClickOutcome::Unlocked;
        }

        self.state = UnlockState::Unlocking {
            count,
            deadline: now + self.window_ms,
        };
        ClickOutcome::Counting {
            remaining: self.clicks - count,
        }
    }

    /// Window elapsed without another click
    pub fn expire(&mut self) {
        self.state = UnlockState::Locked;
    }

    /// Tooltip for the brand element
    pub fn hint(&self) -> String {
        match self.state {
            UnlockState::Locked => {
                format!("Click {} times quickly to enter edit mode", self.clicks)
            }
            UnlockState::Unlocking { count, .. } => {
                let left = self.clicks - count;
                let plural = if left == 1 { "" } else { "s" };
                format!("{} more click{} to enter edit mode", left, plural)
            }
        }
    }
}

/// Session-scoped edit-mode flag
#[derive(Debug)]
pub struct EditMode<S> {
    session: Storage<S>,
    key: String,
}

impl<S: KeyValueStore> EditMode<S> {
    pub fn new(session: Storage<S>, key: impl Into<String>) -> Self {
        Self {
            session,
            key: key.into(),
        }
    }

    /// Only the exact string `"true"` counts as on
    pub fn is_enabled(&self) -> bool {
        self.session.get_raw(&self.key).as_deref() == Some(EDIT_MODE_ON)
    }

    pub fn enable(&self) -> Result<(), StoreError> {
        self.session.set_raw(&self.key, EDIT_MODE_ON)
    }

    pub fn disable(&self) {
        self.session.remove(&self.key);
    }
}
