//! Command registry for REPL commands
//!
//! Provides a clean, extensible pattern for handling REPL commands.

pub mod audio;
pub mod general;

use crate::audio::{Completion, PlaybackScheduler};
use guitarmuse_core::ChordDescriptor;

/// Result of executing a command
#[derive(Debug)]
pub enum CommandResult {
    /// Command executed successfully, continue REPL
    Success,
    /// Command executed, show this message
    Message(String),
    /// Exit the REPL
    Exit,
    /// No command matched the input
    NotACommand,
    /// Error occurred
    Error(String),
    /// Read diagram lines until a blank line, then play them
    ReadDiagram,
}

/// Context passed to command handlers
pub struct CommandContext {
    pub scheduler: PlaybackScheduler,
    /// Completion of whichever scheduled request ends last
    completion: Option<Completion>,
}

impl CommandContext {
    pub fn new(scheduler: PlaybackScheduler) -> Self {
        Self {
            scheduler,
            completion: None,
        }
    }

    /// Remember a request's completion if it outlasts the current one
    pub fn track(&mut self, completion: Completion) {
        let outlasts = self
            .completion
            .as_ref()
            .map_or(true, |current| completion.deadline() >= current.deadline());
        if outlasts {
            self.completion = Some(completion);
        }
    }

    /// Hand over the latest completion, leaving nothing tracked
    pub fn take_completion(&mut self) -> Option<Completion> {
        self.completion.take()
    }
}

/// Split a chord list on whitespace and commas
pub fn parse_chord_list(args: &str) -> Vec<ChordDescriptor> {
    args.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(ChordDescriptor::name)
        .collect()
}

/// A command handler function
pub type CommandHandler = fn(&str, &mut CommandContext) -> CommandResult;

/// Registry of available commands
pub struct CommandRegistry {
    /// Sorted by prefix length descending for longest-match-first lookup
    commands: Vec<(String, CommandHandler)>,
}

impl CommandRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Register a command with its prefix
    pub fn register(&mut self, prefix: &str, handler: CommandHandler) {
        self.commands.push((prefix.to_string(), handler));
        // Sort by prefix length descending for longest-match-first
        self.commands.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    }

    /// Execute a command, returning NotACommand if no match found
    pub fn execute(&self, input: &str, ctx: &mut CommandContext) -> CommandResult {
        for (prefix, handler) in &self.commands {
            if input == prefix || input.starts_with(&format!("{} ", prefix)) {
                let args = input[prefix.len()..].trim();
                return handler(args, ctx);
            }
        }
        CommandResult::NotACommand
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a fully populated command registry with all built-in commands
pub fn create_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();

    // Playback
    registry.register("chord", audio::cmd_chord);
    registry.register("arp", audio::cmd_arp);
    registry.register("diagram", audio::cmd_diagram);
    registry.register("progression", audio::cmd_progression);
    registry.register("arps", audio::cmd_arps);
    registry.register("string", audio::cmd_string);
    registry.register("load", audio::cmd_load);
    registry.register("volume", audio::cmd_volume);
    registry.register("wait", audio::cmd_wait);

    // General commands
    registry.register("notes", general::cmd_notes);
    registry.register("freq", general::cmd_freq);
    registry.register("tempo", general::cmd_tempo);
    registry.register("help", general::cmd_help);
    registry.register("quit", general::cmd_quit);
    registry.register("exit", general::cmd_quit);

    registry
}
