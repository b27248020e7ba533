pub mod clock;
pub mod device;
pub mod mixer;
pub mod offline;
pub mod output;
pub mod scheduler;
pub mod tone;

pub use device::{AudioDevice, DeviceState};
pub use offline::OfflineDevice;
pub use output::CpalDevice;
pub use scheduler::{Completion, PlaybackScheduler};
