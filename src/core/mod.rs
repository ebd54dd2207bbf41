//! # Core Session Logic
//!
//! Everything that is true of a session regardless of how it is displayed:
//! the relay channels, the engine worker, the command history, and the
//! configuration. Nothing in here knows about ratatui or crossterm.
//!
//! ```text
//!   interface thread                        engine worker thread
//!   ┌──────────────────┐   inbound relay    ┌──────────────────┐
//!   │ poll loop        │ ─────────────────▶ │ external         │
//!   │ (tui::run)       │   outbound relay   │ interpreter      │
//!   │                  │ ◀───────────────── │ (StoryEngine)    │
//!   └──────────────────┘                    └──────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`relay`]: bounded FIFO standing in for a blocking text stream
//! - [`engine`]: the background worker hosting the external interpreter
//! - [`history`]: command recall with a clamped cursor
//! - [`config`]: settings with the defaults → file → env → CLI hierarchy

pub mod config;
pub mod engine;
pub mod history;
pub mod relay;
