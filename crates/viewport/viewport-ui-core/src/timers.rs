//! Deadline queue for the engine's delayed work.
//!
//! These are the only delays the engine uses: counter stagger starts, the
//! completion pulse, the drawer-link scroll and the initial section check.
//! The host wakes the engine at `next_deadline()`.

use crate::ids::ElementId;

#[derive(Clone, Debug, PartialEq)]
pub enum TimerTask {
    StartCounter { index: usize },
    EndPulse { element: ElementId },
    DrawerScroll { element: ElementId },
    InitialSectionCheck,
}

#[derive(Debug)]
struct Timer {
    deadline: f64,
    seq: u64,
    task: TimerTask,
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    timers: Vec<Timer>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, deadline: f64, task: TimerTask) {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.timers.push(Timer {
            deadline,
            seq,
            task,
        });
    }

    /// Remove and return the earliest timer due at `now`. Equal deadlines
    /// come out in scheduling order.
    pub fn pop_due(&mut self, now: f64) -> Option<(f64, TimerTask)> {
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.deadline <= now)
            .min_by(|(_, a), (_, b)| {
                a.deadline
                    .total_cmp(&b.deadline)
                    .then(a.seq.cmp(&b.seq))
            })
            .map(|(i, _)| i)?;
        let timer = self.timers.remove(idx);
        Some((timer.deadline, timer.task))
    }

    pub fn next_deadline(&self) -> Option<f64> {
        self.timers
            .iter()
            .map(|t| t.deadline)
            .min_by(|a, b| a.total_cmp(b))
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_deadline_then_schedule_order() {
        let mut q = TimerQueue::new();
        q.schedule(300.0, TimerTask::InitialSectionCheck);
        q.schedule(150.0, TimerTask::StartCounter { index: 1 });
        q.schedule(150.0, TimerTask::StartCounter { index: 2 });
        q.schedule(0.0, TimerTask::StartCounter { index: 0 });

        assert_eq!(q.next_deadline(), Some(0.0));
        assert_eq!(q.pop_due(100.0), Some((0.0, TimerTask::StartCounter { index: 0 })));
        assert_eq!(q.pop_due(100.0), None);
        assert_eq!(q.pop_due(200.0), Some((150.0, TimerTask::StartCounter { index: 1 })));
        assert_eq!(q.pop_due(200.0), Some((150.0, TimerTask::StartCounter { index: 2 })));
        assert_eq!(q.len(), 1);
        q.clear();
        assert!(q.is_empty());
        assert_eq!(q.next_deadline(), None);
    }
}
