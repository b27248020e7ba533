//! Native output through the host's default audio device.

use super::clock::SampleClock;
use super::device::{AudioDevice, DeviceState};
use super::mixer::Mixer;
use anyhow::{anyhow, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SampleFormat, SizedSample, Stream, StreamConfig};
use crossbeam_channel::{unbounded, Receiver, Sender};
use guitarmuse_core::{Envelope, PlaybackEvent};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// cpal-backed device. Created suspended; [`AudioDevice::resume`] starts the
/// stream.
///
/// Events travel to the audio callback over a channel. The master gain is an
/// atomic read once per buffer.
pub struct CpalDevice {
    stream: Stream,
    state: Mutex<DeviceState>,
    clock: SampleClock,
    event_tx: Sender<PlaybackEvent>,
    /// Master gain stored as f64 bits
    master_gain: Arc<AtomicU64>,
}

impl CpalDevice {
    pub fn new(envelope: Envelope) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow!("No output device available"))?;
        let config = device.default_output_config()?;

        let sample_format = config.sample_format();
        let config: StreamConfig = config.into();

        let clock = SampleClock::new(config.sample_rate.0);
        let master_gain = Arc::new(AtomicU64::new(1.0f64.to_bits()));
        let (event_tx, event_rx) = unbounded();
        let mixer = Mixer::new(clock.sample_rate(), envelope);

        let stream = match sample_format {
            SampleFormat::F32 => Self::build_stream::<f32>(
                &device,
                &config,
                mixer,
                event_rx,
                clock.clone(),
                master_gain.clone(),
            )?,
            SampleFormat::I16 => Self::build_stream::<i16>(
                &device,
                &config,
                mixer,
                event_rx,
                clock.clone(),
                master_gain.clone(),
            )?,
            SampleFormat::U16 => Self::build_stream::<u16>(
                &device,
                &config,
                mixer,
                event_rx,
                clock.clone(),
                master_gain.clone(),
            )?,
            _ => return Err(anyhow!("Unsupported sample format: {:?}", sample_format)),
        };

        // Some backends start streams on creation
        if let Err(e) = stream.pause() {
            log::debug!("could not pause new stream: {}", e);
        }

        log::info!(
            "Opened output device {:?} at {} Hz, {} channels",
            device.name().unwrap_or_default(),
            config.sample_rate.0,
            config.channels
        );

        Ok(CpalDevice {
            stream,
            state: Mutex::new(DeviceState::Suspended),
            clock,
            event_tx,
            master_gain,
        })
    }

    fn build_stream<T>(
        device: &cpal::Device,
        config: &StreamConfig,
        mut mixer: Mixer,
        event_rx: Receiver<PlaybackEvent>,
        clock: SampleClock,
        master_gain: Arc<AtomicU64>,
    ) -> Result<Stream>
    where
        T: SizedSample + FromSample<f32> + Send + 'static,
    {
        let channels = config.channels as usize;

        let err_fn = |err| log::error!("an error occurred on the output audio stream: {}", err);

        let stream = device
            .build_output_stream(
                config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    for event in event_rx.try_iter() {
                        mixer.schedule(event);
                    }
                    let gain = f64::from_bits(master_gain.load(Ordering::Relaxed)) as f32;

                    let first_frame = clock.frames();
                    let mut rendered = 0u64;
                    for frame in data.chunks_mut(channels) {
                        let time = clock.seconds_at(first_frame + rendered);
                        let value: T = cpal::Sample::from_sample(mixer.next_sample(time, gain));
                        for sample in frame.iter_mut() {
                            *sample = value;
                        }
                        rendered += 1;
                    }
                    clock.advance(rendered);
                },
                err_fn,
                None,
            )
            .map_err(|e| anyhow!("Failed to build output stream: {}", e))?;

        Ok(stream)
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

impl AudioDevice for CpalDevice {
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
        self.stream
            .play()
            .map_err(|e| anyhow!("Failed to play stream: {}", e))?;
        self.set_state(DeviceState::Running)
    }

    fn close(&self) -> Result<()> {
        self.set_state(DeviceState::Closed)?;
        self.stream
            .pause()
            .map_err(|e| anyhow!("Failed to pause stream: {}", e))
    }

    fn current_time(&self) -> f64 {
        self.clock.seconds()
    }

    fn schedule(&self, event: PlaybackEvent) -> Result<()> {
        self.event_tx
            .send(event)
            .map_err(|e| anyhow!("Failed to send event to audio thread: {}", e))
    }

    fn set_master_gain(&self, gain: f64) {
        self.master_gain.store(gain.to_bits(), Ordering::Relaxed);
    }
}
