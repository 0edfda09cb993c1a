//! The rotation loop: one card per tick, advancing only on a successful push.
//!
//! The scheduler owns a [`RotationState`] and moves its cursor forward
//! (wrapping) only after `sequence[cursor]` was both built and pushed. Any
//! failure leaves the cursor where it is, so the same kind is retried on the
//! next tick. Ticks never overlap: the sleep before tick `n + 1` starts once
//! tick `n` has resolved.
//!
//! After each tick a [`RotationSnapshot`] is stored in an `ArcSwap` so the
//! status endpoint can read progress without touching the loop.

use std::{sync::Arc, time::Duration};

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::content::{ContentError, ContentKind, ContentSource};
use crate::sender::{DisplaySender, SendError};

/// Shortest allowed pause between ticks.
pub const MIN_INTERVAL: Duration = Duration::from_secs(10);

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

pub fn clamp_interval(interval: Duration) -> Duration {
    interval.max(MIN_INTERVAL)
}

#[derive(Debug, Error)]
pub enum RotationError {
    #[error("rotation sequence is empty")]
    EmptySequence,
}

/// A non-empty sequence of kinds and the index of the next one to show.
#[derive(Debug, Clone)]
pub struct RotationState {
    sequence: Vec<ContentKind>,
    cursor: usize,
}

impl RotationState {
    pub fn new(sequence: Vec<ContentKind>) -> Result<Self, RotationError> {
        if sequence.is_empty() {
            return Err(RotationError::EmptySequence);
        }
        Ok(Self {
            sequence,
            cursor: 0,
        })
    }

    pub fn current(&self) -> &ContentKind {
        &self.sequence[self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Moves to the next kind, wrapping at the end. Returns the new cursor.
    pub fn advance(&mut self) -> usize {
        self.cursor = (self.cursor + 1) % self.sequence.len();
        self.cursor
    }
}

/// Why a tick did not publish.
#[derive(Debug, Error)]
pub enum TickError {
    #[error("build failed: {0}")]
    Build(#[from] ContentError),

    #[error("send failed: {0}")]
    Send(#[from] SendError),
}

impl TickError {
    /// Whether the fetch or the push ran out of time.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Build(ContentError::Provider(e)) => e.is_timeout(),
            Self::Build(ContentError::Validation(_)) => false,
            Self::Send(e) => e.is_timeout(),
        }
    }
}

#[derive(Debug)]
pub enum TickOutcome {
    /// `kind` reached the device; `next` is the new cursor.
    Published { kind: String, next: usize },
    /// `kind` failed and stays current.
    Retained { kind: String, error: TickError },
}

impl TickOutcome {
    pub fn is_published(&self) -> bool {
        matches!(self, Self::Published { .. })
    }
}

/// Read-only view of the loop's progress.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RotationSnapshot {
    pub cursor: usize,
    pub next_kind: String,
    pub last_published: Option<String>,
    pub last_error: Option<String>,
    pub ticks: u64,
    pub failures: u64,
    pub updated_at: Option<DateTime<Utc>>,
}

pub type SharedSnapshot = Arc<ArcSwap<RotationSnapshot>>;

pub struct RotationScheduler<C, S> {
    source: C,
    sender: S,
    state: RotationState,
    interval: Duration,
    snapshot: SharedSnapshot,
}

impl<C, S> RotationScheduler<C, S>
where
    C: ContentSource,
    S: DisplaySender,
{
    /// `interval` is clamped to [`MIN_INTERVAL`].
    pub fn new(source: C, sender: S, state: RotationState, interval: Duration) -> Self {
        let snapshot = Arc::new(ArcSwap::from_pointee(RotationSnapshot {
            cursor: state.cursor(),
            next_kind: state.current().name.clone(),
            ..RotationSnapshot::default()
        }));
        Self {
            source,
            sender,
            state,
            interval: clamp_interval(interval),
            snapshot,
        }
    }

    /// Handle for readers of the progress snapshot.
    pub fn snapshot_handle(&self) -> SharedSnapshot {
        Arc::clone(&self.snapshot)
    }

    pub fn state(&self) -> &RotationState {
        &self.state
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Builds and pushes the current kind. Failures are logged and reported
    /// in the outcome, never returned as errors.
    pub async fn tick(&mut self) -> TickOutcome {
        let kind = self.state.current().clone();

        let outcome = match self.publish(&kind).await {
            Ok(()) => {
                let next = self.state.advance();
                info!(kind = %kind.name, next, "published");
                TickOutcome::Published {
                    kind: kind.name,
                    next,
                }
            }
            Err(error) => {
                warn!(
                    kind = %kind.name,
                    error = %error,
                    timeout = error.is_timeout(),
                    "tick failed, will retry"
                );
                TickOutcome::Retained {
                    kind: kind.name,
                    error,
                }
            }
        };

        self.record(&outcome);
        outcome
    }

    async fn publish(&self, kind: &ContentKind) -> Result<(), TickError> {
        let payload = self.source.build(kind).await?;
        self.sender.push(&payload).await?;
        Ok(())
    }

    fn record(&self, outcome: &TickOutcome) {
        let prev = self.snapshot.load_full();
        let mut next = RotationSnapshot {
            cursor: self.state.cursor(),
            next_kind: self.state.current().name.clone(),
            ticks: prev.ticks + 1,
            updated_at: Some(Utc::now()),
            ..(*prev).clone()
        };
        match outcome {
            TickOutcome::Published { kind, .. } => {
                next.last_published = Some(kind.clone());
                next.last_error = None;
            }
            TickOutcome::Retained { kind, error } => {
                next.failures += 1;
                next.last_error = Some(format!("{kind}: {error}"));
            }
        }
        self.snapshot.store(Arc::new(next));
    }

    /// Ticks until `shutdown` turns `true` or its sender is dropped.
    ///
    /// Shutdown is only observed while sleeping; a tick in flight completes.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) {
        info!(
            kinds = self.state.len(),
            interval_secs = self.interval.as_secs(),
            "starting rotation"
        );

        while !*shutdown.borrow() {
            self.tick().await;

            let sleep = tokio::time::sleep(self.interval);
            tokio::pin!(sleep);

            let stop = loop {
                tokio::select! {
                    _ = &mut sleep => break false,
                    changed = shutdown.changed() => match changed {
                        Ok(()) if *shutdown.borrow() => break true,
                        Ok(()) => continue,
                        Err(_) => break true,
                    },
                }
            };
            if stop {
                break;
            }
        }

        info!("rotation stopped");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::content::{CalendarContent, ContentSpec, DisplayPayload};

    fn kind(name: &str) -> ContentKind {
        ContentKind::new(
            name,
            ContentSpec::Calendar(CalendarContent {
                label: name.into(),
                month: 1,
                day: 1,
                icon: None,
            }),
        )
    }

    fn state(names: &[&str]) -> RotationState {
        RotationState::new(names.iter().map(|n| kind(n)).collect()).unwrap()
    }

    /// Echoes the kind name as the title.
    struct EchoSource;

    #[async_trait]
    impl ContentSource for EchoSource {
        async fn build(&self, kind: &ContentKind) -> Result<DisplayPayload, ContentError> {
            Ok(DisplayPayload {
                title: kind.name.clone(),
                body: String::new(),
                icon: None,
                signature: String::new(),
            })
        }
    }

    /// Records titles; fails on the listed 1-based push attempts.
    #[derive(Default)]
    struct Recorder {
        fail_on: Vec<usize>,
        attempts: AtomicUsize,
        pushed: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl DisplaySender for Recorder {
        async fn push(&self, payload: &DisplayPayload) -> Result<(), SendError> {
            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail_on.contains(&attempt) {
                return Err(SendError::Rejected {
                    status: 503,
                    body: "busy".into(),
                });
            }
            self.pushed.lock().unwrap().push(payload.title.clone());
            Ok(())
        }
    }

    #[test]
    fn empty_sequence_is_rejected() {
        assert!(matches!(
            RotationState::new(Vec::new()),
            Err(RotationError::EmptySequence)
        ));
    }

    #[test]
    fn interval_is_clamped() {
        assert_eq!(clamp_interval(Duration::from_secs(3)), MIN_INTERVAL);
        assert_eq!(clamp_interval(Duration::from_secs(90)), Duration::from_secs(90));
    }

    #[tokio::test]
    async fn visits_each_kind_in_order_then_wraps() {
        let recorder = Arc::new(Recorder::default());
        let mut scheduler = RotationScheduler::new(
            EchoSource,
            Arc::clone(&recorder),
            state(&["a", "b", "c"]),
            DEFAULT_INTERVAL,
        );

        for expected_next in [1, 2, 0] {
            let outcome = scheduler.tick().await;
            assert!(
                matches!(outcome, TickOutcome::Published { next, .. } if next == expected_next)
            );
        }

        assert_eq!(*recorder.pushed.lock().unwrap(), vec!["a", "b", "c"]);
        assert_eq!(scheduler.state().cursor(), 0);
    }

    #[tokio::test]
    async fn failed_push_keeps_cursor_until_retry_succeeds() {
        let recorder = Arc::new(Recorder {
            fail_on: vec![2],
            ..Recorder::default()
        });
        let mut scheduler = RotationScheduler::new(
            EchoSource,
            Arc::clone(&recorder),
            state(&["a", "b", "c"]),
            DEFAULT_INTERVAL,
        );

        assert!(scheduler.tick().await.is_published());
        assert_eq!(scheduler.state().cursor(), 1);

        let outcome = scheduler.tick().await;
        assert!(matches!(
            outcome,
            TickOutcome::Retained { ref kind, error: TickError::Send(_) } if kind == "b"
        ));
        assert_eq!(scheduler.state().cursor(), 1);

        assert!(scheduler.tick().await.is_published());
        assert_eq!(scheduler.state().cursor(), 2);
        assert_eq!(*recorder.pushed.lock().unwrap(), vec!["a", "b"]);

        let snap = scheduler.snapshot_handle().load_full();
        assert_eq!(snap.ticks, 3);
        assert_eq!(snap.failures, 1);
        assert_eq!(snap.next_kind, "c");
        assert_eq!(snap.last_published.as_deref(), Some("b"));
        assert!(snap.last_error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn run_stops_on_shutdown() {
        let recorder = Arc::new(Recorder::default());
        let mut scheduler = RotationScheduler::new(
            EchoSource,
            Arc::clone(&recorder),
            state(&["a", "b"]),
            Duration::from_secs(1),
        );
        assert_eq!(scheduler.interval(), MIN_INTERVAL);

        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(async move {
            scheduler.run(rx).await;
            scheduler
        });

        tokio::time::sleep(Duration::from_secs(25)).await;
        tx.send(true).unwrap();
        let scheduler = handle.await.unwrap();

        // ticks at t=0, 10, 20
        assert_eq!(*recorder.pushed.lock().unwrap(), vec!["a", "b", "a"]);
        assert_eq!(scheduler.state().cursor(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn run_stops_when_signal_sender_dropped() {
        let recorder = Arc::new(Recorder::default());
        let mut scheduler = RotationScheduler::new(
            EchoSource,
            Arc::clone(&recorder),
            state(&["a"]),
            DEFAULT_INTERVAL,
        );

        let (tx, rx) = watch::channel(false);
        drop(tx);
        scheduler.run(rx).await;

        assert_eq!(recorder.pushed.lock().unwrap().len(), 1);
    }

    #[test]
    fn rejections_and_bad_data_are_not_timeouts() {
        let rejected = TickError::from(SendError::Rejected {
            status: 401,
            body: "bad key".into(),
        });
        assert!(!rejected.is_timeout());

        let invalid = TickError::from(ContentError::Validation("no price".into()));
        assert!(!invalid.is_timeout());
    }
}
