//! # GuitarMuse
//!
//! Chord playback for GuitarMuse. Builds on [`guitarmuse_core`], which turns
//! chord names and text diagrams into notes and timed events, and adds the
//! parts that touch hardware and the terminal.
//!
//! ## Modules
//!
//! - `audio`: output devices (cpal and offline), the tone generator and
//!   mixer, and the [`PlaybackScheduler`] that lays chords out on the audio
//!   clock.
//! - `commands`: REPL command handlers and their registry.
//! - `repl`: the interactive chord player.

pub mod audio;
pub mod commands;
pub mod repl;

// Re-export commonly used types and functions for convenience
pub use crate::audio::{AudioDevice, Completion, CpalDevice, OfflineDevice, PlaybackScheduler};
pub use guitarmuse_core::{ChordDescriptor, PlaybackConfig};
