//! # TUI Components
//!
//! The two surfaces of the session screen:
//!
//! - `Transcript`: read-only, auto-scrolling narrative view. Transient
//!   component wrapping persistent `TranscriptState`.
//! - `InputBox`: single command line with history recall. Owns its state
//!   and emits `InputEvent::Submit` upward.
//!
//! Each component file contains its state types, event handling, rendering
//! and tests, so one file tells the whole story of a widget.

pub mod input_box;
pub mod transcript;
pub use input_box::{InputBox, InputEvent};
pub use transcript::{Transcript, TranscriptState};
