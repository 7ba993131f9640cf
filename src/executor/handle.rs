//! Asynchronous execution handle.
//!
//! An [`ExecutionHandle`] represents one pending request. Exactly one of two
//! terminal outcomes is eventually delivered: a response (any HTTP status) or
//! a failure. Success and failure callbacks are mutually exclusive and
//! exactly one fires exactly once per execution, never both, never neither,
//! never more than once. A callback attached after the outcome has already
//! arrived is invoked immediately.

use crate::executor::error::RequestFailure;
use crate::models::response::ShortcutResponse;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use uuid::Uuid;

/// The terminal outcome of one execution.
pub type ExecutionResult = Result<ShortcutResponse, RequestFailure>;

type SuccessCallback = Box<dyn FnOnce(ShortcutResponse) + Send + 'static>;
type FailureCallback = Box<dyn FnOnce(RequestFailure) + Send + 'static>;

enum State {
    /// The request is in flight; callbacks wait here until the outcome
    /// arrives.
    Pending {
        on_success: Option<SuccessCallback>,
        on_failure: Option<FailureCallback>,
    },
    /// The outcome has arrived. `Some` until the matching callback consumes
    /// it, then `None` forever.
    Settled(Option<ExecutionResult>),
}

struct Shared {
    state: Mutex<State>,
    /// Set once `settle` has finished, including any callback attached at
    /// settlement time.
    completed: AtomicBool,
    notify: Notify,
}

/// A handle to one pending execution.
///
/// Cloneable so that multiple observers can await settlement; the outcome
/// itself is still delivered to at most one success or failure callback.
#[derive(Clone)]
pub struct ExecutionHandle {
    request_id: Arc<String>,
    shared: Arc<Shared>,
}

/// The producer half of a handle. Consumed by settling, so a second delivery
/// is unrepresentable.
pub(crate) struct Settler {
    shared: Arc<Shared>,
}

enum Fire {
    Success(SuccessCallback, ShortcutResponse),
    Failure(FailureCallback, RequestFailure),
}

impl ExecutionHandle {
    /// Creates a pending handle and its one-shot settler.
    pub(crate) fn new() -> (Self, Settler) {
        let shared = Arc::new(Shared {
            state: Mutex::new(State::Pending {
                on_success: None,
                on_failure: None,
            }),
            completed: AtomicBool::new(false),
            notify: Notify::new(),
        });

        let handle = Self {
            request_id: Arc::new(Uuid::new_v4().to_string()),
            shared: shared.clone(),
        };

        (handle, Settler { shared })
    }

    /// Unique identifier for correlating this execution in logs.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Attaches the success callback.
    ///
    /// If the execution already settled successfully, the callback is invoked
    /// immediately. Attaching a second success callback before delivery
    /// replaces the first.
    pub fn on_success<F>(&self, callback: F)
    where
        F: FnOnce(ShortcutResponse) + Send + 'static,
    {
        let callback: SuccessCallback = Box::new(callback);
        let fire = {
            let mut state = self.shared.state.lock().unwrap();
            match &mut *state {
                State::Pending { on_success, .. } => {
                    *on_success = Some(callback);
                    None
                }
                State::Settled(outcome) => match outcome {
                    Some(Ok(_)) => match outcome.take() {
                        Some(Ok(response)) => Some((callback, response)),
                        _ => None,
                    },
                    _ => None,
                },
            }
        };
        if let Some((callback, response)) = fire {
            callback(response);
        }
    }

    /// Attaches the failure callback.
    ///
    /// If the execution already settled with a failure, the callback is
    /// invoked immediately. Attaching a second failure callback before
    /// delivery replaces the first.
    pub fn on_failure<F>(&self, callback: F)
    where
        F: FnOnce(RequestFailure) + Send + 'static,
    {
        let callback: FailureCallback = Box::new(callback);
        let fire = {
            let mut state = self.shared.state.lock().unwrap();
            match &mut *state {
                State::Pending { on_failure, .. } => {
                    *on_failure = Some(callback);
                    None
                }
                State::Settled(outcome) => match outcome {
                    Some(Err(_)) => match outcome.take() {
                        Some(Err(failure)) => Some((callback, failure)),
                        _ => None,
                    },
                    _ => None,
                },
            }
        };
        if let Some((callback, failure)) = fire {
            callback(failure);
        }
    }

    /// Whether the outcome has arrived (delivered or awaiting its callback).
    pub fn is_settled(&self) -> bool {
        matches!(*self.shared.state.lock().unwrap(), State::Settled(_))
    }

    /// Waits until the execution has settled.
    ///
    /// Callbacks attached before settlement have fired by the time this
    /// returns.
    pub async fn settled(&self) {
        loop {
            let notified = self.shared.notify.notified();
            if self.shared.completed.load(Ordering::SeqCst) {
                return;
            }
            notified.await;
        }
    }
}

impl std::fmt::Debug for ExecutionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionHandle")
            .field("request_id", &self.request_id)
            .field("settled", &self.is_settled())
            .finish()
    }
}

impl Settler {
    /// Delivers the terminal outcome.
    ///
    /// Fires the matching callback if one is attached; otherwise the outcome
    /// is parked for a later attachment. Consumes the settler, so delivery
    /// happens at most once.
    pub(crate) fn settle(self, result: ExecutionResult) {
        let fire = {
            let mut state = self.shared.state.lock().unwrap();
            let previous = std::mem::replace(&mut *state, State::Settled(None));
            match previous {
                State::Pending {
                    on_success,
                    on_failure,
                } => match result {
                    Ok(response) => match on_success {
                        Some(callback) => Some(Fire::Success(callback, response)),
                        None => {
                            *state = State::Settled(Some(Ok(response)));
                            None
                        }
                    },
                    Err(failure) => match on_failure {
                        Some(callback) => Some(Fire::Failure(callback, failure)),
                        None => {
                            *state = State::Settled(Some(Err(failure)));
                            None
                        }
                    },
                },
                settled @ State::Settled(_) => {
                    *state = settled;
                    None
                }
            }
        };

        // Callbacks run outside the lock, before waiters resume
        match fire {
            Some(Fire::Success(callback, response)) => callback(response),
            Some(Fire::Failure(callback, failure)) => callback(failure),
            None => {}
        }

        self.shared.completed.store(true, Ordering::SeqCst);
        self.shared.notify.notify_waiters();
    }
}
