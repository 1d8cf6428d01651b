//! Prelude module - commonly used types for convenient import.
//!
//! Use `use okc_core::prelude::*;` to import all essential types.
//!
//! # Example
//!
//! ```rust
//! use okc_core::prelude::*;
//!
//! let mut conversation = Conversation::builtin();
//! assert!(matches!(
//!     conversation.submit_query("build me a spaceship"),
//!     SubmitOutcome::NoMatch
//! ));
//! assert_eq!(conversation.transcript().count(), 2);
//! ```

// Errors
pub use crate::{CoreError, CoreResult};

// Scripts
pub use crate::{ChatEvent, ChatRole, Script, ScriptRepository, TaskKind};

// Playback
pub use crate::{PlaybackSession, PlaybackState};

// Conversation and drivers
pub use crate::{Conversation, ManualDriver, Player, SubmitOutcome, Timing, View};
