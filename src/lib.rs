//! Lab Edit - in-place content editing for a static lab website
//!
//! Core modules:
//! - `store`: Persistence port, in-memory fake and typed JSON adapter
//! - `content`: Media, team and publication records
//! - `markup`: Structured markup tree with a single escaping serializer
//! - `render`: Pure renderers from stored records to markup
//! - `snapshot`: One-shot import of the page's static content
//! - `editor`: Edit panels, image uploads and the save handler
//! - `gesture`: Five-click unlock and the session edit-mode flag
//! - `platform`: Browser DOM adapter (wasm32 only)

pub mod config;
pub mod content;
pub mod editor;
pub mod error;
pub mod gesture;
pub mod markup;
pub mod page;
pub mod platform;
pub mod render;
pub mod snapshot;
pub mod store;

pub use config::{EditorConfig, StorageKeys};
pub use error::{StoreError, UploadError};
pub use gesture::{ClickOutcome, EditMode, UnlockGesture};
pub use markup::{Node, escape_html};
pub use store::{KeyValueStore, MemoryStore, Storage};

/// Site-wide constants
pub mod consts {
    /// Clicks on the brand needed to enter edit mode
    pub const UNLOCK_CLICKS: u32 = 5;
    /// Maximum gap between unlock clicks (milliseconds)
    pub const UNLOCK_WINDOW_MS: f64 = 3000.0;

    /// Largest image accepted for embedding as a data URL (3 MiB)
    pub const MAX_IMAGE_BYTES: u64 = 3 * 1024 * 1024;

    /// Value of the session flag while edit mode is on
    pub const EDIT_MODE_ON: &str = "true";

    /// Sentinel year for the "Earlier work" publication group
    pub const ARCHIVE_YEAR: &str = "archive";
    /// Display label for the archive group
    pub const ARCHIVE_LABEL: &str = "Earlier work";
}

/// Whether a stored image value holds embedded data rather than a URL
#[inline]
pub fn is_embedded_image(src: &str) -> bool {
    src.starts_with("data:")
}
