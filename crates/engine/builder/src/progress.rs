//! Progress and result reporting

use crate::RequesterId;

/// Terminal result of a batch task. Every task produces exactly one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// A build finished; `placed` cells written
    Built { placed: usize, failed_writes: usize },
    /// An undo replay finished; `restored` cells written back
    Restored { restored: usize, failed_writes: usize },
}

/// Receiver for per-requester progress updates and terminal messages
///
/// The service only calls `progress` when the integer percentage changed
/// since the previous report for that task.
pub trait ProgressSink {
    fn progress(
        &mut self,
        requester: &RequesterId,
        percent: u8,
        cursor: usize,
        total: usize,
        is_undo: bool,
    );

    fn completed(&mut self, requester: &RequesterId, outcome: TaskOutcome);
}

/// Sink that forwards everything to the tracing subscriber
#[derive(Debug, Default)]
pub struct LogSink;

impl ProgressSink for LogSink {
    fn progress(
        &mut self,
        requester: &RequesterId,
        percent: u8,
        cursor: usize,
        total: usize,
        is_undo: bool,
    ) {
        let label = if is_undo { "restoring" } else { "building" };
        tracing::debug!(%requester, percent, cursor, total, "{label}");
    }

    fn completed(&mut self, requester: &RequesterId, outcome: TaskOutcome) {
        match outcome {
            TaskOutcome::Built { placed, .. } => {
                tracing::info!(%requester, placed, "build complete");
            }
            TaskOutcome::Restored { restored, .. } => {
                tracing::info!(%requester, restored, "restore complete");
            }
        }
    }
}
