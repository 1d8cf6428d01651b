//! OK Computer core - scripted demo playback for a simulated coding assistant.
//!
//! A user types a request; the engine picks a canned [`Script`] and plays it
//! back on a virtual clock, revealing chat messages, task steps and typed-out
//! source lines at their scheduled offsets, and finally exposes the finished
//! artifact. Nothing is generated: every script is compiled-in data.
//!
//! # Layers
//!
//! - [`script`] - the immutable script schema.
//! - [`repository`] - the built-in catalog and the query matcher.
//! - [`session`] - [`PlaybackSession`], a pure state machine (`start`, `tick`,
//!   `type_next_line`, `reset`) plus the reveal projections.
//! - [`conversation`] - the transcript and the `submit_query` / `new_chat`
//!   commands around at most one session.
//! - [`player`] - drives a [`Conversation`] in real time with two cancellable
//!   Tokio timers; [`ManualDriver`] does the same deterministically.
//!
//! # Example
//!
//! ```rust
//! use okc_core::{Conversation, ManualDriver, SubmitOutcome, Timing};
//!
//! let mut conversation = Conversation::builtin();
//! let outcome = conversation.submit_query("Create calculator");
//! assert!(matches!(outcome, SubmitOutcome::Matched(_)));
//!
//! let mut driver = ManualDriver::new(Timing::default());
//! while driver.step(&mut conversation) {}
//!
//! assert!(conversation.session().is_completed());
//! assert_eq!(conversation.session().progress(), 10);
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod conversation;
pub mod player;
pub mod prelude;
pub mod repository;
pub mod script;
pub mod session;

mod error;

pub use conversation::{Conversation, SubmitOutcome, View};
pub use error::{CoreError, CoreResult};
pub use player::{ManualDriver, Player, Timing};
pub use repository::{Preset, ScriptRepository};
pub use script::{ChatEvent, ChatRole, CodeChunk, Script, TaskEvent, TaskKind};
pub use session::{MAX_PROGRESS, PlaybackSession, PlaybackState, SessionView};
