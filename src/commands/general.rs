//! General REPL commands (help, quit, tempo, lookups)

use crate::commands::{CommandContext, CommandResult};
use colored::*;
use guitarmuse_core::types::{frequency_of, MAX_BPM, MIN_BPM};
use guitarmuse_core::ChordDescriptor;

/// Handle `help` command
pub fn cmd_help(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    print_help();
    CommandResult::Success
}

/// Handle `quit` or `exit` command
pub fn cmd_quit(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    CommandResult::Exit
}

/// Handle `tempo [bpm]` command
pub fn cmd_tempo(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Message(format!(
            "Current tempo: {:.1} BPM",
            ctx.scheduler.tempo()
        ));
    }

    match args.parse::<f64>() {
        Ok(bpm) => {
            let effective = ctx.scheduler.set_tempo(bpm);
            let mut msg = format!("🎵 Tempo set to {:.1} BPM", effective)
                .bright_green()
                .to_string();
            if effective != bpm {
                msg.push_str(&format!(" (limited to {}-{})", MIN_BPM, MAX_BPM));
            }
            CommandResult::Message(msg)
        }
        Err(_) => CommandResult::Error(format!(
            "Invalid tempo. Use a value between {}-{} BPM",
            MIN_BPM, MAX_BPM
        )),
    }
}

/// Handle `notes <chord>`: show what a chord resolves to
pub fn cmd_notes(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: notes <chord>".to_string());
    }

    let resolved = ctx.scheduler.resolve(&ChordDescriptor::name(args));
    let mut msg = format!("{}: {}", args.cyan(), resolved);
    for diagnostic in resolved.diagnostics() {
        msg.push_str(&format!("\n  {} {}", "⚠".yellow(), diagnostic));
    }
    CommandResult::Message(msg)
}

/// Handle `freq <note>`
pub fn cmd_freq(args: &str, _ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: freq <note>".to_string());
    }

    let lookup = frequency_of(args);
    let mut msg = format!("{}: {:.2} Hz", args.cyan(), lookup.hz);
    if let Some(diagnostic) = lookup.diagnostic {
        msg.push_str(&format!("\n  {} {}", "⚠".yellow(), diagnostic));
    }
    CommandResult::Message(msg)
}

/// Print help information
fn print_help() {
    println!("{}", "🎸 GuitarMuse Help".bold());
    println!("{}", "==================".bold());
    println!();
    println!("{}", "Chords:".green());
    println!("  {}       - Strum a chord", "chord <name> [seconds]".cyan());
    println!("  {}        - Arpeggiate a chord", "arp <name> [spacing]".cyan());
    println!(
        "  {}                    - Enter a diagram, high E first, blank line to finish",
        "diagram".cyan()
    );
    println!("  {}                 - Show a chord's notes", "notes <name>".cyan());
    println!();
    println!("{}", "Progressions:".green());
    println!(
        "  {} - One bar per chord at the current tempo",
        "progression <c1> <c2> ...".cyan()
    );
    println!(
        "  {}        - Arpeggiate each chord in turn",
        "arps <c1> <c2> ...".cyan()
    );
    println!(
        "  {}                  - Play a generated progression (JSON)",
        "load <file>".cyan()
    );
    println!();
    println!("{}", "Strings and notes:".green());
    println!(
        "  {}       - Pluck a string (0 = low E)",
        "string <0-5> [fret]".cyan()
    );
    println!("  {}                  - Frequency of a note", "freq <note>".cyan());
    println!();
    println!("{}", "Playback:".green());
    println!("  {}                        - Show current tempo", "tempo".cyan());
    println!("  {}                  - Set tempo (40-240)", "tempo <bpm>".cyan());
    println!(
        "  {}              - Set volume (0-100 or 0.0-1.0)",
        "volume <level>".cyan()
    );
    println!(
        "  {}                         - Wait for playback to finish",
        "wait".cyan()
    );
    println!();
    println!("{}", "Examples:".green());
    println!("  guitarmuse> {}", "chord Am".cyan());
    println!("  🎸 Am [A2, E3, A3, C4, E4]");
    println!();
    println!("  guitarmuse> {}", "notes Bbm7".cyan());
    println!("  Bbm7: [A#3, C#4, F4]");
    println!();
    println!("{}", "Other Commands:".green());
    println!("  {}              - Show this help", "help".bright_green());
    println!("  {}              - Exit the REPL", "quit".bright_red());
}
