//! Adapter implementations of the scheduler port.

pub mod recording;
pub mod tokio_timer;

pub use recording::RecordingScheduler;
pub use tokio_timer::TokioReminderScheduler;
