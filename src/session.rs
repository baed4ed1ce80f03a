//! Generation lifecycle orchestration.
//!
//! A session runs one attempt at a time: it starts the simulated progress
//! reporter, races the provider fetch against a hard deadline, and emits
//! lifecycle events for whatever is rendering the attempt. Three terminal
//! outcomes race per attempt: payload arrival, fetch failure, and timeout.
//! The first to resolve supersedes the attempt's epoch, which makes every
//! straggling callback inert before it can touch shared state.

use crate::config::SessionConfig;
use crate::error::{AntiGenError, Result};
use crate::image::{GeneratedImage, GenerationRequest, ImageProvider};
use crate::progress::{ProgressSimulator, ProgressUpdate};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

/// Lifecycle notifications emitted while an attempt runs.
#[derive(Debug, Clone)]
pub enum GenerationEvent {
    /// A new attempt started.
    Started,
    /// Simulated progress changed.
    Progress(ProgressUpdate),
    /// The payload arrived; progress snaps to 100.
    Completed(ProgressUpdate),
    /// The image may be revealed (the completion message had its moment).
    ImageReady,
    /// The attempt failed; consumers restore their placeholder if nothing
    /// was previously shown.
    Failed(String),
    /// No payload within the deadline.
    TimedOut(String),
}

/// Guard state shared with the reporter task.
///
/// `epoch` identifies the attempt; any task holding a stale epoch observes
/// the mismatch and stops before emitting.
struct SessionState {
    generating: AtomicBool,
    epoch: AtomicU64,
}

impl SessionState {
    fn is_current(&self, epoch: u64) -> bool {
        self.generating.load(Ordering::SeqCst) && self.epoch.load(Ordering::SeqCst) == epoch
    }

    fn supersede(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
    }
}

/// Resets the session on every exit path, including caller cancellation.
struct ResetGuard {
    state: Arc<SessionState>,
}

impl Drop for ResetGuard {
    fn drop(&mut self) {
        self.state.supersede();
        self.state.generating.store(false, Ordering::SeqCst);
    }
}

/// Drives one end-to-end generation attempt at a time.
pub struct GenerationSession {
    provider: Arc<dyn ImageProvider>,
    config: SessionConfig,
    events: mpsc::UnboundedSender<GenerationEvent>,
    state: Arc<SessionState>,
}

impl GenerationSession {
    /// Creates a session around a provider and an event sink.
    pub fn new(
        provider: Arc<dyn ImageProvider>,
        config: SessionConfig,
        events: mpsc::UnboundedSender<GenerationEvent>,
    ) -> Self {
        Self {
            provider,
            config,
            events,
            state: Arc::new(SessionState {
                generating: AtomicBool::new(false),
                epoch: AtomicU64::new(0),
            }),
        }
    }

    /// Whether an attempt is currently in flight.
    pub fn is_generating(&self) -> bool {
        self.state.generating.load(Ordering::SeqCst)
    }

    /// Runs one generation attempt to a terminal outcome.
    ///
    /// Rejects blank prompts before any side effect, and concurrent calls
    /// while an attempt is in flight. On success the completion update goes
    /// out, the reveal delay elapses, and the image is returned; on failure
    /// or timeout the corresponding event goes out and the error is
    /// returned. The session is back to idle on every path.
    pub async fn generate(&self, request: GenerationRequest) -> Result<GeneratedImage> {
        if request.prompt_trimmed().is_empty() {
            return Err(AntiGenError::Validation("prompt must not be empty".into()));
        }
        if self.state.generating.swap(true, Ordering::SeqCst) {
            return Err(AntiGenError::Busy);
        }
        let epoch = self.state.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let _reset = ResetGuard {
            state: Arc::clone(&self.state),
        };

        self.emit(GenerationEvent::Started);
        self.spawn_reporter(epoch);

        let outcome =
            tokio::time::timeout(self.config.timeout, self.provider.generate(&request)).await;

        match outcome {
            Ok(Ok(image)) => {
                // Stop the reporter before the completion update goes out.
                self.state.supersede();
                self.emit(GenerationEvent::Completed(ProgressUpdate::completed()));
                tokio::time::sleep(self.config.reveal_delay).await;
                self.emit(GenerationEvent::ImageReady);
                Ok(image)
            }
            Ok(Err(err)) => {
                self.state.supersede();
                self.emit(GenerationEvent::Failed(err.user_message().into()));
                Err(err)
            }
            Err(_elapsed) => {
                self.state.supersede();
                let err = AntiGenError::Timeout(self.config.timeout);
                self.emit(GenerationEvent::TimedOut(err.user_message().into()));
                Err(err)
            }
        }
    }

    /// Spawns the task that animates simulated progress for one attempt.
    fn spawn_reporter(&self, epoch: u64) {
        let state = Arc::clone(&self.state);
        let events = self.events.clone();
        let tick = self.config.tick_interval;
        tokio::spawn(async move {
            let mut sim = ProgressSimulator::new(tokio::time::Instant::now().into_std());
            let mut ticker = tokio::time::interval(tick);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if !state.is_current(epoch) {
                    break;
                }
                let update = sim.tick(tokio::time::Instant::now().into_std());
                if events.send(GenerationEvent::Progress(update)).is_err() {
                    break;
                }
            }
        });
    }

    fn emit(&self, event: GenerationEvent) {
        // Best effort: a dropped receiver means nothing is rendering.
        let _ = self.events.send(event);
    }
}
