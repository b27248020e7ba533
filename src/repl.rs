//! REPL (Read-Eval-Print Loop) for chord playback

use crate::audio::{AudioDevice, CpalDevice, OfflineDevice, PlaybackScheduler};
use crate::commands::audio::play_diagram;
use crate::commands::{create_registry, CommandContext, CommandRegistry, CommandResult};
use anyhow::Result;
use colored::*;
use guitarmuse_core::{Envelope, PlaybackConfig};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Interactive chord player
pub struct Repl {
    editor: DefaultEditor,
    registry: CommandRegistry,
    ctx: CommandContext,
    /// No output device was found
    silent: bool,
}

impl Repl {
    /// Create a new REPL instance
    pub fn new(config: PlaybackConfig) -> Result<Self> {
        let editor = DefaultEditor::new()
            .map_err(|e| anyhow::anyhow!("Failed to initialize line editor: {}", e))?;
        let (device, silent) = open_device(config.envelope);
        let scheduler = PlaybackScheduler::new(device, config);

        Ok(Repl {
            editor,
            registry: create_registry(),
            ctx: CommandContext::new(scheduler),
            silent,
        })
    }

    /// Start the REPL loop
    pub fn run(&mut self) -> Result<()> {
        println!(
            "{} {}",
            "🎸".bright_yellow(),
            "GuitarMuse chord player".bright_cyan().bold()
        );
        println!(
            "Try: {}, {}, {}",
            "chord Am".cyan(),
            "arp G7".cyan(),
            "progression Am F C G".cyan()
        );
        println!(
            "Type '{}' for more information, '{}' or {} to exit.\n",
            "help".bright_green(),
            "quit".bright_red(),
            "Ctrl+C".bright_red()
        );
        if self.silent {
            println!("{}\n", offline_notice().yellow());
        }

        loop {
            let prompt = format!("{} ", "guitarmuse>".bright_magenta().bold());
            match self.editor.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    if let Err(e) = self.editor.add_history_entry(line) {
                        log::debug!("history not updated: {}", e);
                    }

                    let result = match self.registry.execute(line, &mut self.ctx) {
                        CommandResult::ReadDiagram => match self.read_diagram() {
                            Some(text) => play_diagram(&text, &mut self.ctx),
                            None => CommandResult::Success,
                        },
                        other => other,
                    };

                    match result {
                        CommandResult::Success | CommandResult::ReadDiagram => {
                            // Command executed, no output needed
                        }
                        CommandResult::Message(msg) => {
                            println!("{}", msg);
                        }
                        CommandResult::Exit => {
                            println!("{} 🎵", "Goodbye!".bright_cyan());
                            break;
                        }
                        CommandResult::Error(e) => {
                            println!("{} {}", "Error:".bright_red().bold(), e.red());
                        }
                        CommandResult::NotACommand => {
                            println!(
                                "{} unknown command {:?} (type '{}')",
                                "Error:".bright_red().bold(),
                                line,
                                "help".bright_green()
                            );
                        }
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    println!("{} 🎵", "Goodbye!".bright_cyan());
                    break;
                }
                Err(err) => {
                    println!(
                        "{} {}",
                        "Error reading input:".bright_red().bold(),
                        err.to_string().red()
                    );
                }
            }
        }

        self.ctx.scheduler.device().close()
    }

    /// Read diagram lines until a blank line. `None` when input ends first
    /// or nothing was entered.
    fn read_diagram(&mut self) -> Option<String> {
        println!("Enter one line per string, high E first. Blank line to finish.");
        let mut lines = Vec::new();
        loop {
            match self.editor.readline("  | ") {
                Ok(line) if line.trim().is_empty() => break,
                Ok(line) => lines.push(line),
                Err(_) => return None,
            }
        }
        (!lines.is_empty()).then(|| lines.join("\n"))
    }
}

/// The default output device, or an offline device when there is none.
/// The flag is set when the offline device was chosen.
fn open_device(envelope: Envelope) -> (Box<dyn AudioDevice>, bool) {
    match CpalDevice::new(envelope) {
        Ok(device) => (Box::new(device), false),
        Err(e) => {
            log::warn!("{}; continuing without audio output", e);
            (Box::new(OfflineDevice::new().with_envelope(envelope)), true)
        }
    }
}

fn offline_notice() -> &'static str {
    "No audio output found. Requests land on a stopped clock at 0.0s \
     and 'wait' only sleeps out their length."
}

/// Convenience function to start the REPL
pub fn start(config: PlaybackConfig) -> Result<()> {
    let mut repl = Repl::new(config)?;
    repl.run()
}
