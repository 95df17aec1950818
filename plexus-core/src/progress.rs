//! Progress reporting for long-running generators.
//!
//! Generators receive a [`ProgressSink`] explicitly and call it from whatever
//! thread is doing the work. Sinks must not block: there is no buffering,
//! acknowledgement or backpressure, so a slow or absent observer simply misses
//! intermediate values.

use std::sync::{
    Mutex, PoisonError,
    atomic::{AtomicU64, Ordering},
    mpsc::Sender,
};

/// Receiver of progress signals emitted during generation.
pub trait ProgressSink: Sync {
    /// Reports completion as a percentage in `[0, 100]`.
    fn on_progress(&self, percent: f64);

    /// Reports that the generator entered a new named phase.
    fn on_phase(&self, name: &str);
}

/// Sink that discards every signal.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_progress(&self, _percent: f64) {}

    fn on_phase(&self, _name: &str) {}
}

/// Message forwarded by [`ChannelProgress`].
#[derive(Clone, Debug, PartialEq)]
pub enum ProgressEvent {
    /// Percentage complete.
    Percent(f64),
    /// Name of the phase that just started.
    Phase(String),
}

/// Sink that forwards every signal over an `mpsc` channel.
///
/// Sends to a dropped receiver are ignored.
///
/// # Examples
/// ```
/// use std::sync::mpsc;
/// use plexus_core::{ChannelProgress, ProgressEvent, ProgressSink};
///
/// let (sender, receiver) = mpsc::channel();
/// let sink = ChannelProgress::new(sender);
/// sink.on_phase("lattice");
/// sink.on_progress(25.0);
/// drop(sink);
/// let events: Vec<_> = receiver.iter().collect();
/// assert_eq!(
///     events,
///     vec![ProgressEvent::Phase("lattice".into()), ProgressEvent::Percent(25.0)],
/// );
/// ```
#[derive(Debug)]
pub struct ChannelProgress {
    sender: Sender<ProgressEvent>,
}

impl ChannelProgress {
    /// Wraps the sending half of a channel.
    #[must_use]
    pub fn new(sender: Sender<ProgressEvent>) -> Self {
        Self { sender }
    }
}

impl ProgressSink for ChannelProgress {
    fn on_progress(&self, percent: f64) {
        // A disconnected observer just misses the value.
        let _ = self.sender.send(ProgressEvent::Percent(percent));
    }

    fn on_phase(&self, name: &str) {
        let _ = self.sender.send(ProgressEvent::Phase(name.to_owned()));
    }
}

/// Shared cell holding the latest progress values for callers that poll.
#[derive(Debug, Default)]
pub struct ProgressCell {
    percent_bits: AtomicU64,
    phase: Mutex<Option<String>>,
}

impl ProgressCell {
    /// Creates a cell at 0% with no phase.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest reported percentage.
    #[must_use]
    pub fn percent(&self) -> f64 {
        f64::from_bits(self.percent_bits.load(Ordering::Acquire))
    }

    /// Latest reported phase name.
    #[must_use]
    pub fn phase(&self) -> Option<String> {
        self.phase
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ProgressSink for ProgressCell {
    fn on_progress(&self, percent: f64) {
        self.percent_bits.store(percent.to_bits(), Ordering::Release);
    }

    fn on_phase(&self, name: &str) {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner) = Some(name.to_owned());
    }
}
