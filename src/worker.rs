//! Background execution of an organize run.
//!
//! [`spawn`] moves an [`Organizer`] onto its own thread and hands back an
//! [`OrganizeHandle`]. The handle is an iterator over [`WorkerEvent`]s: every
//! log line as it happens, then exactly one [`WorkerEvent::Finished`].
//! Nothing flows the other way once the run has started, and a run cannot be
//! cancelled.

use crate::events::{LogEvent, RunSummary, WorkerEvent};
use crate::organizer::Organizer;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

/// Receiving end of a running organize job.
pub struct OrganizeHandle {
    receiver: Receiver<WorkerEvent>,
    thread: Option<JoinHandle<()>>,
    finished: bool,
}

/// Starts `organizer` on a background thread.
///
/// # Examples
///
/// ```no_run
/// use reorg::events::WorkerEvent;
/// use reorg::organizer::Organizer;
/// use reorg::strategy::Strategy;
/// use reorg::worker;
///
/// let handle = worker::spawn(Organizer::new("/home/me/Downloads", Strategy::Flatten));
/// for event in handle {
///     match event {
///         WorkerEvent::Log(log) => println!("{}", log),
///         WorkerEvent::Finished(summary) => println!("done: {:?}", summary),
///     }
/// }
/// ```
pub fn spawn(organizer: Organizer) -> OrganizeHandle {
    let (sender, receiver) = mpsc::channel();

    let thread = thread::spawn(move || {
        let log_sender = sender.clone();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            organizer.run(|event| {
                // The receiver may be gone; the run still goes to completion.
                let _ = log_sender.send(WorkerEvent::Log(event));
            })
        }));

        let summary = match outcome {
            Ok(summary) => summary,
            Err(payload) => {
                let message = format!("An error occurred: {}", panic_message(payload.as_ref()));
                let _ = sender.send(WorkerEvent::Log(LogEvent::error(message)));
                RunSummary {
                    aborted: true,
                    ..RunSummary::default()
                }
            }
        };

        let _ = sender.send(WorkerEvent::Finished(summary));
    });

    OrganizeHandle {
        receiver,
        thread: Some(thread),
        finished: false,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "worker panicked".to_string()
    }
}

impl OrganizeHandle {
    /// Drains the remaining events, passing log lines to `on_log`, and
    /// returns the final summary.
    pub fn wait<F>(self, mut on_log: F) -> RunSummary
    where
        F: FnMut(LogEvent),
    {
        let mut summary = None;
        for event in self {
            match event {
                WorkerEvent::Log(log) => on_log(log),
                WorkerEvent::Finished(done) => summary = Some(done),
            }
        }

        summary.unwrap_or(RunSummary {
            aborted: true,
            ..RunSummary::default()
        })
    }
}

impl Iterator for OrganizeHandle {
    type Item = WorkerEvent;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.receiver.recv() {
            Ok(event) => {
                if matches!(event, WorkerEvent::Finished(_)) {
                    self.finished = true;
                    if let Some(thread) = self.thread.take() {
                        let _ = thread.join();
                    }
                }
                Some(event)
            }
            // Sender gone without a Finished event.
            Err(_) => {
                self.finished = true;
                None
            }
        }
    }
}
