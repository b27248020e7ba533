//! Playback scheduler: turns chords into timed note events on the device clock.
//!
//! Every operation reads "now" from the device's audio clock once, lays out
//! all of its events relative to that instant, and returns immediately with a
//! [`Completion`]. Overlapping requests simply overlap; nothing is cancelled.

use super::device::{AudioDevice, DeviceState};
use anyhow::{anyhow, Result};
use crossbeam_channel::{after, Receiver};
use guitarmuse_core::error::{validate_duration, validate_spacing};
use guitarmuse_core::types::{
    chord_seconds, clamp_tempo, clamp_volume, fretted_note, last_end, Duration,
};
use guitarmuse_core::{ChordDescriptor, ChordResolver, PlaybackConfig, PlaybackEvent, ResolvedChord};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration as StdDuration, Instant};

/// Each arpeggio note rings 20% past the next note's start
const ARPEGGIO_OVERLAP: f64 = 1.2;

/// Note slots reserved per chord when arpeggiating a progression
const ARPEGGIO_SLOTS: f64 = 6.0;

/// Advisory completion signal.
///
/// Fires after a timer computed from the schedule (the last note's end time
/// minus the clock time when the request was made). It does not observe the
/// device, so it is not proof that sound has stopped: a suspended or
/// stalled device keeps the audio clock still while the timer runs on.
#[derive(Debug)]
pub struct Completion {
    deadline: f64,
    delay: StdDuration,
    ready_at: Instant,
    rx: Receiver<Instant>,
}

impl Completion {
    fn new(deadline: f64, delay: StdDuration) -> Self {
        Completion {
            deadline,
            delay,
            ready_at: Instant::now() + delay,
            rx: after(delay),
        }
    }

    /// Audio-clock time at which the last scheduled note ends
    pub fn deadline(&self) -> f64 {
        self.deadline
    }

    /// Timer length from the moment of scheduling
    pub fn delay(&self) -> StdDuration {
        self.delay
    }

    /// Whether the timer has already fired
    pub fn is_done(&self) -> bool {
        Instant::now() >= self.ready_at
    }

    /// Block until the timer fires
    pub fn wait(self) {
        let _ = self.rx.recv();
    }
}

/// Owns the device and the mutable playback settings.
///
/// Volume and tempo are atomics: any holder of a shared reference may change
/// them at any time, last write wins, and a volume change reaches notes that
/// are already sounding.
pub struct PlaybackScheduler<D: AudioDevice = Box<dyn AudioDevice>> {
    device: D,
    resolver: ChordResolver,
    config: PlaybackConfig,
    /// Master volume stored as f64 bits
    volume: AtomicU64,
    /// Tempo in BPM stored as f64 bits
    tempo: AtomicU64,
}

impl<D: AudioDevice> PlaybackScheduler<D> {
    pub fn new(device: D, config: PlaybackConfig) -> Self {
        let config = config.sanitized();
        device.set_master_gain(config.volume);

        PlaybackScheduler {
            device,
            resolver: ChordResolver::new(),
            volume: AtomicU64::new(config.volume.to_bits()),
            tempo: AtomicU64::new(config.tempo.to_bits()),
            config,
        }
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Resolve a chord without playing it
    pub fn resolve(&self, chord: &ChordDescriptor) -> ResolvedChord {
        self.resolver.resolve(chord)
    }

    /// Set the master volume, clamped to [0, 1]. Returns the effective value.
    pub fn set_volume(&self, volume: f64) -> f64 {
        let volume = clamp_volume(volume);
        self.volume.store(volume.to_bits(), Ordering::Relaxed);
        self.device.set_master_gain(volume);
        volume
    }

    pub fn volume(&self) -> f64 {
        f64::from_bits(self.volume.load(Ordering::Relaxed))
    }

    /// Set the default progression tempo, clamped to [40, 240] BPM.
    /// Returns the effective value.
    pub fn set_tempo(&self, bpm: f64) -> f64 {
        let bpm = clamp_tempo(bpm);
        self.tempo.store(bpm.to_bits(), Ordering::Relaxed);
        bpm
    }

    pub fn tempo(&self) -> f64 {
        f64::from_bits(self.tempo.load(Ordering::Relaxed))
    }

    /// Resume a suspended device. Fails only when the device is closed or
    /// cannot start.
    pub fn ensure_running(&self) -> Result<()> {
        match self.device.state() {
            DeviceState::Running => Ok(()),
            DeviceState::Suspended => {
                log::debug!("resuming suspended audio device");
                self.device.resume()
            }
            DeviceState::Closed => Err(anyhow!("Audio device is closed")),
        }
    }

    /// Sound every note of the chord together for `duration` seconds
    pub fn play_chord(&self, chord: &ChordDescriptor, duration: f64) -> Result<Completion> {
        let duration = validate_duration(duration)?;
        self.ensure_running()?;

        let now = self.device.current_time();
        let events = self.chord_events(chord, now, duration);
        self.submit(now, events)
    }

    /// Sound the chord's notes one after another, `spacing` seconds apart
    pub fn play_arpeggio(&self, chord: &ChordDescriptor, spacing: f64) -> Result<Completion> {
        let spacing = validate_spacing(spacing)?;
        self.ensure_running()?;

        let now = self.device.current_time();
        let events = self.arpeggio_events(chord, now, spacing);
        self.submit(now, events)
    }

    /// Play chords back to back, one 4-beat bar each, at the current tempo
    pub fn play_progression(&self, chords: &[ChordDescriptor]) -> Result<Completion> {
        self.play_progression_at(chords, self.tempo())
    }

    /// Play chords back to back, one 4-beat bar each, at `bpm` (clamped)
    pub fn play_progression_at(&self, chords: &[ChordDescriptor], bpm: f64) -> Result<Completion> {
        self.ensure_running()?;

        let slot = chord_seconds(clamp_tempo(bpm));
        let now = self.device.current_time();
        let events = chords
            .iter()
            .enumerate()
            .flat_map(|(i, chord)| self.chord_events(chord, now + i as f64 * slot, slot))
            .collect();
        self.submit(now, events)
    }

    /// Arpeggiate each chord in turn at the current tempo.
    ///
    /// Notes are half a beat apart and every chord gets six note slots, so
    /// chords start on a regular grid whatever their note count.
    pub fn play_arpeggios(&self, chords: &[ChordDescriptor]) -> Result<Completion> {
        self.ensure_running()?;

        let spacing = Duration::Beats(0.5).to_seconds(self.tempo());
        let slot = spacing * ARPEGGIO_SLOTS;
        let now = self.device.current_time();
        let events = chords
            .iter()
            .enumerate()
            .flat_map(|(i, chord)| self.arpeggio_events(chord, now + i as f64 * slot, spacing))
            .collect();
        self.submit(now, events)
    }

    /// Pluck one string. `string` is 0 (low E) to 5 (high E) and `fret` at most
    /// 24; anything else is rejected with a [`guitarmuse_core::InputError`].
    pub fn play_string(&self, string: usize, fret: u32) -> Result<Completion> {
        let note = fretted_note(string, fret)?;
        self.ensure_running()?;

        let now = self.device.current_time();
        let event = PlaybackEvent::new(note, now, now + self.config.string_duration);
        self.submit(now, vec![event])
    }

    fn chord_events(
        &self,
        chord: &ChordDescriptor,
        start: f64,
        duration: f64,
    ) -> Vec<PlaybackEvent> {
        self.resolver
            .resolve(chord)
            .into_notes()
            .into_iter()
            .map(|note| PlaybackEvent::new(note, start, start + duration))
            .collect()
    }

    fn arpeggio_events(
        &self,
        chord: &ChordDescriptor,
        start: f64,
        spacing: f64,
    ) -> Vec<PlaybackEvent> {
        self.resolver
            .resolve(chord)
            .into_notes()
            .into_iter()
            .enumerate()
            .map(|(i, note)| {
                let note_start = start + i as f64 * spacing;
                PlaybackEvent::new(note, note_start, note_start + spacing * ARPEGGIO_OVERLAP)
            })
            .collect()
    }

    fn submit(&self, now: f64, events: Vec<PlaybackEvent>) -> Result<Completion> {
        for event in &events {
            log::debug!(
                "scheduling {} at {:.3}s..{:.3}s",
                event.note,
                event.start,
                event.end
            );
            self.device.schedule(*event)?;
        }

        let deadline = last_end(&events).unwrap_or(now);
        let delay = Duration::Seconds(deadline - now).to_std_duration(self.tempo());
        Ok(Completion::new(deadline, delay))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::offline::OfflineDevice;
    use guitarmuse_core::InputError;

    const EPS: f64 = 1e-9;

    fn scheduler() -> PlaybackScheduler<OfflineDevice> {
        PlaybackScheduler::new(OfflineDevice::new(), PlaybackConfig::default())
    }

    fn names(chords: &[&str]) -> Vec<ChordDescriptor> {
        chords.iter().map(|c| ChordDescriptor::name(*c)).collect()
    }

    #[test]
    fn test_chord_starts_together() {
        let scheduler = scheduler();
        scheduler.device().set_time(3.0);

        let completion = scheduler
            .play_chord(&ChordDescriptor::name("Am"), 2.0)
            .unwrap();
        let events = scheduler.device().events();

        assert_eq!(events.len(), 5);
        assert!(events.iter().all(|e| e.start == 3.0 && e.end == 5.0));
        assert_eq!(completion.deadline(), 5.0);
        assert_eq!(completion.delay(), StdDuration::from_secs(2));
    }

    #[test]
    fn test_auto_resume() {
        let scheduler = scheduler();
        assert_eq!(scheduler.device().state(), DeviceState::Suspended);
        scheduler
            .play_chord(&ChordDescriptor::name("E"), 1.0)
            .unwrap();
        assert_eq!(scheduler.device().state(), DeviceState::Running);
    }

    #[test]
    fn test_closed_device_is_an_error() {
        let scheduler = scheduler();
        scheduler.device().close().unwrap();
        assert!(scheduler.play_chord(&ChordDescriptor::name("E"), 1.0).is_err());
        assert!(scheduler.device().events().is_empty());
    }

    #[test]
    fn test_arpeggio_timing() {
        let scheduler = scheduler();
        scheduler
            .play_arpeggio(&ChordDescriptor::name("Dm"), 0.2)
            .unwrap();
        let events = scheduler.device().events();

        assert_eq!(events.len(), 4);
        for (i, event) in events.iter().enumerate() {
            let start = i as f64 * 0.2;
            assert!((event.start - start).abs() < EPS);
            assert!((event.duration() - 0.24).abs() < EPS);
        }
        // Consecutive notes overlap
        assert!(events[0].end > events[1].start);
    }

    #[test]
    fn test_progression_at_120() {
        let scheduler = scheduler();
        let chords = names(&["Am", "F", "C", "G"]);
        let completion = scheduler.play_progression_at(&chords, 120.0).unwrap();

        let events = scheduler.device().events();
        for (i, chord) in chords.iter().enumerate() {
            let size = scheduler.resolve(chord).len();
            let starts: Vec<f64> = events
                .iter()
                .filter(|e| (e.start - i as f64 * 2.0).abs() < EPS)
                .map(|e| e.start)
                .collect();
            assert_eq!(starts.len(), size, "chord {} is not at {}s", i, i as f64 * 2.0);
        }
        assert_eq!(completion.deadline(), 8.0);
    }

    #[test]
    fn test_progression_uses_current_tempo() {
        let scheduler = scheduler();
        assert_eq!(scheduler.set_tempo(60.0), 60.0);
        scheduler.play_progression(&names(&["E", "A"])).unwrap();

        let starts: Vec<f64> = scheduler.device().events().iter().map(|e| e.start).collect();
        assert!(starts.contains(&0.0));
        assert!(starts.contains(&4.0));
    }

    #[test]
    fn test_progression_tempo_is_clamped() {
        let scheduler = scheduler();
        let completion = scheduler
            .play_progression_at(&names(&["E", "A"]), 1000.0)
            .unwrap();
        // 240 BPM: 1s per chord
        assert_eq!(completion.deadline(), 2.0);
    }

    #[test]
    fn test_empty_progression_completes_immediately() {
        let scheduler = scheduler();
        let completion = scheduler.play_progression(&[]).unwrap();
        assert_eq!(completion.delay(), StdDuration::ZERO);
        completion.wait();
    }

    #[test]
    fn test_arpeggiated_progression_grid() {
        let scheduler = scheduler();
        // 120 BPM: 0.25s spacing, 1.5s per chord
        scheduler.play_arpeggios(&names(&["C", "G"])).unwrap();
        let events = scheduler.device().events();

        let c_size = scheduler.resolve(&ChordDescriptor::name("C")).len();
        assert!((events[1].start - 0.25).abs() < EPS);
        assert!((events[c_size].start - 1.5).abs() < EPS);
    }

    #[test]
    fn test_volume_clamps() {
        let scheduler = scheduler();
        assert_eq!(scheduler.volume(), 0.7);
        assert_eq!(scheduler.device().master_gain(), 0.7);

        assert_eq!(scheduler.set_volume(-5.0), 0.0);
        assert_eq!(scheduler.volume(), 0.0);
        assert_eq!(scheduler.set_volume(5.0), 1.0);
        assert_eq!(scheduler.volume(), 1.0);
        assert_eq!(scheduler.device().master_gain(), 1.0);
    }

    #[test]
    fn test_tempo_clamps() {
        let scheduler = scheduler();
        assert_eq!(scheduler.tempo(), 120.0);
        assert_eq!(scheduler.set_tempo(10.0), 40.0);
        assert_eq!(scheduler.set_tempo(300.0), 240.0);
    }

    #[test]
    fn test_play_string() {
        let scheduler = scheduler();
        scheduler.play_string(0, 3).unwrap();
        scheduler.play_string(5, 0).unwrap();

        let events = scheduler.device().events();
        assert_eq!(events[0].note.to_string(), "G2");
        assert_eq!(events[1].note.to_string(), "E4");
        assert_eq!(events[0].duration(), 1.5);
    }

    #[test]
    fn test_invalid_string_is_rejected() {
        let scheduler = scheduler();
        let err = scheduler.play_string(6, 0).unwrap_err();
        assert_eq!(
            err.downcast_ref::<InputError>(),
            Some(&InputError::InvalidString(6))
        );
        assert!(scheduler.device().events().is_empty());
    }

    #[test]
    fn test_fret_past_the_neck_is_rejected() {
        let scheduler = scheduler();
        for fret in [25, i32::MAX as u32, u32::MAX] {
            let err = scheduler.play_string(0, fret).unwrap_err();
            assert_eq!(
                err.downcast_ref::<InputError>(),
                Some(&InputError::InvalidFret(fret))
            );
        }
        assert!(scheduler.device().events().is_empty());
    }

    #[test]
    fn test_invalid_timing_is_rejected() {
        let scheduler = scheduler();
        let chord = ChordDescriptor::name("Am");

        let err = scheduler.play_chord(&chord, 0.0).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InputError>(),
            Some(InputError::InvalidDuration(_))
        ));
        let err = scheduler.play_arpeggio(&chord, f64::NAN).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InputError>(),
            Some(InputError::InvalidSpacing(_))
        ));
    }

    #[test]
    fn test_unknown_chord_still_plays() {
        let scheduler = scheduler();
        scheduler
            .play_chord(&ChordDescriptor::name("Xmaj9zzz"), 1.0)
            .unwrap();
        assert_eq!(scheduler.device().events().len(), 1);
    }
}
