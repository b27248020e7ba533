use guitarmuse::audio::{AudioDevice, DeviceState, OfflineDevice, PlaybackScheduler};
use guitarmuse_core::types::GeneratorResponse;
use guitarmuse_core::{ChordDescriptor, PlaybackConfig};

const SAMPLE_RATE: u32 = 8_000;

fn scheduler() -> PlaybackScheduler<OfflineDevice> {
    PlaybackScheduler::new(
        OfflineDevice::with_sample_rate(SAMPLE_RATE),
        PlaybackConfig::default(),
    )
}

fn is_silent(samples: &[f32]) -> bool {
    samples.iter().all(|s| *s == 0.0)
}

#[test]
fn test_generated_progression_plays_end_to_end() {
    let raw = r#"Here's a moody one:
    {
      "progression": [
        { "name": "Am", "function": "i" },
        { "name": "Fmaj7", "function": "VI" },
        { "diagram": "e|--3--\nB|--0--\nG|--0--\nD|--0--\nA|--2--\nE|--3--" },
        { "function": "V" }
      ],
      "description": "Minor pop",
      "playingTips": "Palm mute the verse"
    }"#;

    let progression = match GeneratorResponse::parse(raw) {
        GeneratorResponse::Progression(progression) => progression,
        GeneratorResponse::Failure(failure) => panic!("decode failed: {}", failure.message),
    };

    let scheduler = scheduler();
    let completion = scheduler
        .play_progression_at(&progression.descriptors(), 120.0)
        .unwrap();
    assert_eq!(completion.deadline(), 8.0);

    let events = scheduler.device().events();
    // Am (5) + Fmaj7 triad (3) + G diagram (6) + empty entry fallback (1)
    assert_eq!(events.len(), 15);
    for event in &events {
        let slot = (event.start / 2.0).round();
        assert_eq!(event.start, slot * 2.0);
        assert_eq!(event.end, event.start + 2.0);
    }
}

#[test]
fn test_rendered_chord_occupies_its_window() {
    let scheduler = scheduler();
    scheduler.device().set_time(0.5);
    scheduler
        .play_chord(&ChordDescriptor::name("E"), 1.0)
        .unwrap();

    let samples = scheduler.device().render(2.0);
    let at = |secs: f64| (secs * SAMPLE_RATE as f64) as usize;

    assert!(is_silent(&samples[..at(0.5)]));
    assert!(!is_silent(&samples[at(0.5)..at(1.5)]));
    assert!(is_silent(&samples[at(1.5)..]));
}

#[test]
fn test_volume_applies_to_rendered_output() {
    let scheduler = scheduler();
    scheduler
        .play_arpeggio(&ChordDescriptor::name("G"), 0.1)
        .unwrap();

    scheduler.set_volume(0.0);
    assert!(is_silent(&scheduler.device().render(1.0)));

    scheduler.set_volume(1.0);
    assert!(!is_silent(&scheduler.device().render(1.0)));
}

#[test]
fn test_chained_requests_compose_on_the_audio_clock() {
    let scheduler = scheduler();
    let chord = ChordDescriptor::name("D");

    let first = scheduler.play_chord(&chord, 2.0).unwrap();
    scheduler.device().advance(2.0);
    let second = scheduler.play_chord(&chord, 2.0).unwrap();

    assert_eq!(first.deadline(), 2.0);
    assert_eq!(second.deadline(), 4.0);
    assert_eq!(scheduler.device().state(), DeviceState::Running);
}
