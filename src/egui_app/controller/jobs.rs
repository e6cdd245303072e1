//! Worker-thread dispatch for remote calls and request-token bookkeeping.
//!
//! Each call runs on its own short-lived thread and reports back through one
//! channel. The controller drains that channel on the UI thread, so engine
//! state has a single owner.

use crate::record_service::{DeleteOutcome, PredictionResult, RecordService, ServiceError};
use crate::records::Record;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::thread;

/// Kinds of remote operation, each with its own token sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JobKind {
    Fetch,
    Insert,
    Upload,
    Delete,
    Prediction,
}

impl JobKind {
    const ALL: [JobKind; 5] = [
        JobKind::Fetch,
        JobKind::Insert,
        JobKind::Upload,
        JobKind::Delete,
        JobKind::Prediction,
    ];

    fn index(self) -> usize {
        match self {
            JobKind::Fetch => 0,
            JobKind::Insert => 1,
            JobKind::Upload => 2,
            JobKind::Delete => 3,
            JobKind::Prediction => 4,
        }
    }
}

/// Identifies one dispatched request; later tokens of the same kind supersede it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestToken {
    pub kind: JobKind,
    pub seq: u64,
}

/// Monotonic token counters per job kind.
#[derive(Clone, Debug, Default)]
pub(crate) struct RequestTokens {
    latest: [u64; JobKind::ALL.len()],
}

impl RequestTokens {
    pub(crate) fn issue(&mut self, kind: JobKind) -> RequestToken {
        let slot = &mut self.latest[kind.index()];
        *slot += 1;
        RequestToken { kind, seq: *slot }
    }

    pub(crate) fn is_latest(&self, token: RequestToken) -> bool {
        self.latest[token.kind.index()] == token.seq
    }
}

/// Result payload of a finished job.
#[derive(Debug)]
pub(crate) enum JobOutcome {
    Fetched(Result<Vec<Record>, ServiceError>),
    Inserted(Result<String, ServiceError>),
    Uploaded(Result<String, ServiceError>),
    Deleted(Result<DeleteOutcome, ServiceError>),
    Predicted(Result<PredictionResult, ServiceError>),
}

impl JobOutcome {
    fn failed(kind: JobKind, err: ServiceError) -> Self {
        match kind {
            JobKind::Fetch => Self::Fetched(Err(err)),
            JobKind::Insert => Self::Inserted(Err(err)),
            JobKind::Upload => Self::Uploaded(Err(err)),
            JobKind::Delete => Self::Deleted(Err(err)),
            JobKind::Prediction => Self::Predicted(Err(err)),
        }
    }
}

#[derive(Debug)]
pub(crate) struct JobMessage {
    pub(crate) token: RequestToken,
    pub(crate) outcome: JobOutcome,
}

pub(crate) struct ControllerJobs {
    message_tx: Sender<JobMessage>,
    message_rx: Receiver<JobMessage>,
    tokens: RequestTokens,
    in_flight: [usize; JobKind::ALL.len()],
}

impl ControllerJobs {
    pub(crate) fn new() -> Self {
        let (message_tx, message_rx) = std::sync::mpsc::channel::<JobMessage>();
        Self {
            message_tx,
            message_rx,
            tokens: RequestTokens::default(),
            in_flight: [0; JobKind::ALL.len()],
        }
    }

    /// Run `work` against the service on a worker thread.
    ///
    /// A message is always sent back, even if the worker panics, so the
    /// in-flight count is released on every path.
    pub(crate) fn spawn<F>(
        &mut self,
        kind: JobKind,
        service: Arc<dyn RecordService>,
        work: F,
    ) -> RequestToken
    where
        F: FnOnce(&dyn RecordService) -> JobOutcome + Send + 'static,
    {
        let token = self.tokens.issue(kind);
        self.in_flight[kind.index()] += 1;
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let outcome = catch_unwind(AssertUnwindSafe(|| work(service.as_ref())))
                .unwrap_or_else(|_| {
                    tracing::error!("{kind:?} worker panicked");
                    JobOutcome::failed(
                        kind,
                        ServiceError::Transport("Request worker panicked".into()),
                    )
                });
            let _ = tx.send(JobMessage { token, outcome });
        });
        tracing::debug!("Dispatched {kind:?} request #{}", token.seq);
        token
    }

    pub(crate) fn try_recv_message(&self) -> Result<JobMessage, TryRecvError> {
        self.message_rx.try_recv()
    }

    /// Release a finished job; returns whether its token is still the latest.
    pub(crate) fn finish(&mut self, token: RequestToken) -> bool {
        let slot = &mut self.in_flight[token.kind.index()];
        *slot = slot.saturating_sub(1);
        self.tokens.is_latest(token)
    }

    pub(crate) fn in_flight(&self, kind: JobKind) -> usize {
        self.in_flight[kind.index()]
    }

    pub(crate) fn any_in_flight(&self) -> bool {
        self.in_flight.iter().any(|count| *count > 0)
    }
}
