//! In-memory device with a manually driven clock.
//!
//! Nothing is played. Scheduled events are recorded and can be rendered to a
//! sample buffer through the same [`Mixer`] the native device uses.

use super::device::{AudioDevice, DeviceState};
use super::mixer::Mixer;
use anyhow::{anyhow, Result};
use guitarmuse_core::{Envelope, PlaybackEvent};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

pub struct OfflineDevice {
    state: Mutex<DeviceState>,
    /// Clock position stored as f64 bits
    time: AtomicU64,
    master_gain: AtomicU64,
    events: Mutex<Vec<PlaybackEvent>>,
    envelope: Envelope,
    sample_rate: u32,
}

impl OfflineDevice {
    /// A suspended device at clock time 0
    pub fn new() -> Self {
        Self::with_sample_rate(DEFAULT_SAMPLE_RATE)
    }

    pub fn with_sample_rate(sample_rate: u32) -> Self {
        OfflineDevice {
            state: Mutex::new(DeviceState::Suspended),
            time: AtomicU64::new(0.0f64.to_bits()),
            master_gain: AtomicU64::new(1.0f64.to_bits()),
            events: Mutex::new(Vec::new()),
            envelope: Envelope::PLUCKED,
            sample_rate: sample_rate.max(1),
        }
    }

    /// Envelope used by [`OfflineDevice::render`]
    pub fn with_envelope(mut self, envelope: Envelope) -> Self {
        self.envelope = envelope;
        self
    }

    /// Move the clock forward by `secs`
    pub fn advance(&self, secs: f64) {
        self.set_time(self.current_time() + secs.max(0.0));
    }

    pub fn set_time(&self, secs: f64) {
        self.time.store(secs.to_bits(), Ordering::Release);
    }

    pub fn master_gain(&self) -> f64 {
        f64::from_bits(self.master_gain.load(Ordering::Relaxed))
    }

    /// Every event scheduled so far, in scheduling order
    pub fn events(&self) -> Vec<PlaybackEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn clear_events(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }

    /// Render the first `secs` seconds of the clock, mono, at the current
    /// master gain
    pub fn render(&self, secs: f64) -> Vec<f32> {
        let mut mixer = Mixer::new(self.sample_rate, self.envelope);
        for event in self.events() {
            mixer.schedule(event);
        }
        let frames = (secs.max(0.0) * self.sample_rate as f64).round() as usize;
        mixer.render(0.0, frames, self.master_gain() as f32)
    }

    fn set_state(&self, state: DeviceState) -> Result<()> {
        let mut current = self
            .state
            .lock()
            .map_err(|e| anyhow!("Failed to lock device state: {}", e))?;
        *current = state;
        Ok(())
    }
}

impl Default for OfflineDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioDevice for OfflineDevice {
    fn state(&self) -> DeviceState {
        self.state
            .lock()
            .map(|state| *state)
            .unwrap_or(DeviceState::Closed)
    }

    fn resume(&self) -> Result<()> {
        if self.state() == DeviceState::Closed {
            return Err(anyhow!("Audio device is closed"));
        }
        self.set_state(DeviceState::Running)
    }

    fn close(&self) -> Result<()> {
        self.set_state(DeviceState::Closed)
    }

    fn current_time(&self) -> f64 {
        f64::from_bits(self.time.load(Ordering::Acquire))
    }

    fn schedule(&self, event: PlaybackEvent) -> Result<()> {
        if self.state() == DeviceState::Closed {
            return Err(anyhow!("Audio device is closed"));
        }
        self.events
            .lock()
            .map_err(|e| anyhow!("Failed to lock event log: {}", e))?
            .push(event);
        Ok(())
    }

    fn set_master_gain(&self, gain: f64) {
        self.master_gain.store(gain.to_bits(), Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guitarmuse_core::types::REFERENCE_NOTE;

    #[test]
    fn test_lifecycle() {
        let device = OfflineDevice::new();
        assert_eq!(device.state(), DeviceState::Suspended);
        device.resume().unwrap();
        assert_eq!(device.state(), DeviceState::Running);
        device.close().unwrap();
        assert!(device.resume().is_err());
        assert!(device
            .schedule(PlaybackEvent::new(REFERENCE_NOTE, 0.0, 1.0))
            .is_err());
    }

    #[test]
    fn test_manual_clock() {
        let device = OfflineDevice::new();
        assert_eq!(device.current_time(), 0.0);
        device.advance(1.5);
        device.advance(-3.0);
        assert_eq!(device.current_time(), 1.5);
        device.set_time(10.0);
        assert_eq!(device.current_time(), 10.0);
    }

    #[test]
    fn test_records_and_renders() {
        let device = OfflineDevice::with_sample_rate(8_000);
        device
            .schedule(PlaybackEvent::new(REFERENCE_NOTE, 0.25, 0.75))
            .unwrap();
        assert_eq!(device.events().len(), 1);

        let samples = device.render(1.0);
        assert_eq!(samples.len(), 8_000);
        assert!(samples[..2_000].iter().all(|s| *s == 0.0));
        assert!(samples[2_000..6_000].iter().any(|s| *s != 0.0));
        assert!(samples[6_000..].iter().all(|s| *s == 0.0));

        device.set_master_gain(0.0);
        assert!(device.render(1.0).iter().all(|s| *s == 0.0));

        device.clear_events();
        assert!(device.events().is_empty());
    }
}
