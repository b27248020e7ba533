//! Output device abstraction.
//!
//! A device owns one monotonic audio clock. Every [`PlaybackEvent`] it
//! receives is expressed in seconds on that clock.

use anyhow::Result;
use guitarmuse_core::PlaybackEvent;

/// Lifecycle of an output device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    /// Created but not rendering; the clock does not advance
    Suspended,
    Running,
    /// Shut down for good; resuming fails
    Closed,
}

pub trait AudioDevice {
    fn state(&self) -> DeviceState;

    /// Start (or restart) rendering
    fn resume(&self) -> Result<()>;

    /// Stop rendering permanently
    fn close(&self) -> Result<()>;

    /// Seconds on the device's audio clock
    fn current_time(&self) -> f64;

    /// Register a note to sound over its window
    fn schedule(&self, event: PlaybackEvent) -> Result<()>;

    /// Master gain (0.0-1.0), applied to every sounding note immediately
    fn set_master_gain(&self, gain: f64);
}

impl<D: AudioDevice + ?Sized> AudioDevice for Box<D> {
    fn state(&self) -> DeviceState {
        (**self).state()
    }

    fn resume(&self) -> Result<()> {
        (**self).resume()
    }

    fn close(&self) -> Result<()> {
        (**self).close()
    }

    fn current_time(&self) -> f64 {
        (**self).current_time()
    }

    fn schedule(&self, event: PlaybackEvent) -> Result<()> {
        (**self).schedule(event)
    }

    fn set_master_gain(&self, gain: f64) {
        (**self).set_master_gain(gain)
    }
}
