//! Playback commands

use crate::commands::{parse_chord_list, CommandContext, CommandResult};
use colored::*;
use guitarmuse_core::types::GeneratorResponse;
use guitarmuse_core::ChordDescriptor;
use std::fs;

/// Handle `chord <name> [seconds]`
pub fn cmd_chord(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let mut parts = args.split_whitespace();
    let Some(name) = parts.next() else {
        return CommandResult::Error("Usage: chord <name> [seconds]".to_string());
    };
    let duration = match parts.next().map(str::parse::<f64>) {
        None => ctx.scheduler.config().chord_duration,
        Some(Ok(secs)) => secs,
        Some(Err(_)) => return CommandResult::Error("Invalid duration".to_string()),
    };

    let chord = ChordDescriptor::name(name);
    let notes = ctx.scheduler.resolve(&chord);
    match ctx.scheduler.play_chord(&chord, duration) {
        Ok(completion) => {
            ctx.track(completion);
            CommandResult::Message(
                format!("🎸 {} {}", name, notes).bright_green().to_string(),
            )
        }
        Err(e) => CommandResult::Error(format!("Failed to play chord: {}", e)),
    }
}

/// Handle `arp <name> [spacing]`
pub fn cmd_arp(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let mut parts = args.split_whitespace();
    let Some(name) = parts.next() else {
        return CommandResult::Error("Usage: arp <name> [spacing]".to_string());
    };
    let spacing = match parts.next().map(str::parse::<f64>) {
        None => ctx.scheduler.config().note_spacing,
        Some(Ok(secs)) => secs,
        Some(Err(_)) => return CommandResult::Error("Invalid spacing".to_string()),
    };

    let chord = ChordDescriptor::name(name);
    let notes = ctx.scheduler.resolve(&chord);
    match ctx.scheduler.play_arpeggio(&chord, spacing) {
        Ok(completion) => {
            ctx.track(completion);
            CommandResult::Message(
                format!("🎶 {} arpeggio {}", name, notes)
                    .bright_green()
                    .to_string(),
            )
        }
        Err(e) => CommandResult::Error(format!("Failed to play arpeggio: {}", e)),
    }
}

/// Handle `diagram`: the REPL collects the diagram lines
pub fn cmd_diagram(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    CommandResult::ReadDiagram
}

/// Play a diagram collected by the REPL
pub fn play_diagram(text: &str, ctx: &mut CommandContext) -> CommandResult {
    let chord = ChordDescriptor::diagram(text);
    let notes = ctx.scheduler.resolve(&chord);
    let duration = ctx.scheduler.config().chord_duration;
    match ctx.scheduler.play_chord(&chord, duration) {
        Ok(completion) => {
            ctx.track(completion);
            CommandResult::Message(format!("🎸 {}", notes).bright_green().to_string())
        }
        Err(e) => CommandResult::Error(format!("Failed to play diagram: {}", e)),
    }
}

/// Handle `progression <chord> <chord> ...`
pub fn cmd_progression(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let chords = parse_chord_list(args);
    if chords.is_empty() {
        return CommandResult::Error("Usage: progression <chord> <chord> ...".to_string());
    }
    play_progression(&chords, ctx)
}

fn play_progression(chords: &[ChordDescriptor], ctx: &mut CommandContext) -> CommandResult {
    match ctx.scheduler.play_progression(chords) {
        Ok(completion) => {
            ctx.track(completion);
            CommandResult::Message(
                format!(
                    "🎵 Playing progression ({} chords, {:.1} BPM)...",
                    chords.len(),
                    ctx.scheduler.tempo()
                )
                .bright_green()
                .to_string(),
            )
        }
        Err(e) => CommandResult::Error(format!("Failed to play progression: {}", e)),
    }
}

/// Handle `arps <chord> <chord> ...`
pub fn cmd_arps(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let chords = parse_chord_list(args);
    if chords.is_empty() {
        return CommandResult::Error("Usage: arps <chord> <chord> ...".to_string());
    }
    match ctx.scheduler.play_arpeggios(&chords) {
        Ok(completion) => {
            ctx.track(completion);
            CommandResult::Message(
                format!(
                    "🎶 Arpeggiating progression ({} chords, {:.1} BPM)...",
                    chords.len(),
                    ctx.scheduler.tempo()
                )
                .bright_green()
                .to_string(),
            )
        }
        Err(e) => CommandResult::Error(format!("Failed to play arpeggios: {}", e)),
    }
}

/// Handle `string <index> [fret]`
pub fn cmd_string(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let mut parts = args.split_whitespace();
    let index = match parts.next().map(str::parse::<usize>) {
        Some(Ok(index)) => index,
        _ => return CommandResult::Error("Usage: string <0-5> [fret]".to_string()),
    };
    let fret = match parts.next().map(str::parse::<u32>) {
        None => 0,
        Some(Ok(fret)) => fret,
        Some(Err(_)) => return CommandResult::Error("Invalid fret number".to_string()),
    };

    match ctx.scheduler.play_string(index, fret) {
        Ok(completion) => {
            ctx.track(completion);
            CommandResult::Message(
                format!("🎸 String {} fret {}", index, fret)
                    .bright_green()
                    .to_string(),
            )
        }
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

/// Handle `load <file>`: decode a generated progression and play it
pub fn cmd_load(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: load <file>".to_string());
    }
    let raw = match fs::read_to_string(args) {
        Ok(raw) => raw,
        Err(e) => return CommandResult::Error(format!("Failed to read {}: {}", args, e)),
    };

    match GeneratorResponse::parse(&raw) {
        GeneratorResponse::Progression(progression) => {
            if let Some(description) = &progression.description {
                println!("{}", description.italic());
            }
            for (i, entry) in progression.chords.iter().enumerate() {
                let function = entry.function.as_deref().unwrap_or("");
                println!("  {}. {} {}", i + 1, entry.label().cyan(), function.dimmed());
                if !entry.alternatives.is_empty() {
                    println!("     try: {}", entry.alternatives.join(", "));
                }
            }
            if let Some(tips) = &progression.playing_tips {
                println!("{} {}", "Tips:".yellow(), tips);
            }
            play_progression(&progression.descriptors(), ctx)
        }
        GeneratorResponse::Failure(failure) => CommandResult::Error(format!(
            "Could not read a progression: {} ({} bytes of raw text)",
            failure.message,
            failure.raw_response.len()
        )),
    }
}

/// Handle `volume [level]`
pub fn cmd_volume(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Message(format!(
            "Current volume: {:.0}%",
            ctx.scheduler.volume() * 100.0
        ));
    }

    match args.parse::<f64>() {
        Ok(vol) => {
            let normalized_vol = if vol > 1.0 { vol / 100.0 } else { vol };
            let effective = ctx.scheduler.set_volume(normalized_vol);
            CommandResult::Message(
                format!("🔊 Volume set to {:.0}%", effective * 100.0)
                    .bright_green()
                    .to_string(),
            )
        }
        Err(_) => CommandResult::Error(
            "Invalid volume value. Use a number between 0-100 or 0.0-1.0".to_string(),
        ),
    }
}

/// Handle `wait`: block until everything scheduled so far should be done
pub fn cmd_wait(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    match ctx.take_completion() {
        Some(completion) if !completion.is_done() => {
            completion.wait();
            CommandResult::Success
        }
        _ => CommandResult::Message("Nothing is playing".to_string()),
    }
}
