//! Deferred work that must run only after the next layout pass.
//!
//! Mutations enqueue tasks; the loop drains them once the host reports a
//! finished measurement pass. `begin_pass` hands out only the tasks queued so
//! far: anything scheduled while a pass runs waits for the following pass,
//! which is how an overflow check re-triggers itself one migration at a time.
//! Page indices carried by tasks may be stale by the time they run and must
//! be re-validated by the consumer.

use std::collections::VecDeque;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutTask {
    /// Re-measure a page and migrate its last paragraph if it overflows.
    CheckOverflow { page: usize },
}

#[derive(Debug, Default)]
pub struct LayoutQueue {
    pending: VecDeque<LayoutTask>,
}

impl LayoutQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `task` for the next pass. A task already pending is not duplicated.
    pub fn schedule(&mut self, task: LayoutTask) {
        if self.pending.contains(&task) {
            return;
        }
        trace!(target: "events.layout", ?task, pending = self.pending.len() + 1, "schedule");
        self.pending.push_back(task);
    }

    /// Take every task queued before this call, in FIFO order.
    pub fn begin_pass(&mut self) -> Vec<LayoutTask> {
        let batch: Vec<_> = self.pending.drain(..).collect();
        if !batch.is_empty() {
            trace!(target: "events.layout", tasks = batch.len(), "begin_pass");
        }
        batch
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
