//! Cancellable scheduled-task abstraction for reveal pacing and auto-play.
//!
//! The core never owns a timer thread. Hosts implement [`Scheduler`] over
//! whatever timing facility they have (an animation frame loop, a JS
//! interval, a test clock); the deterministic [`ManualScheduler`] backs
//! tests and the native harness. Every scheduled task carries a handle
//! whose `cancel` is explicit, so teardown cannot leak a ticking timer.

use std::cell::Cell;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::rc::Rc;

/// Whether a repeating task should stay scheduled after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Again,
    Done,
}

/// Handle to a scheduled task.
#[derive(Debug, Clone, Default)]
pub struct TaskHandle {
    cancelled: Rc<Cell<bool>>,
}

impl TaskHandle {
    /// Cancel the task. A task observed mid-tick completes that tick;
    /// it is never re-armed afterwards, so no event is lost or doubled.
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

/// Host seam for scheduling work against a mutable context.
pub trait Scheduler<C> {
    /// Run `task` once after `delay_ms`.
    fn schedule_once(&mut self, delay_ms: u64, task: Box<dyn FnMut(&mut C, u64)>) -> TaskHandle;

    /// Run `task` every `interval_ms` until it returns [`Repeat::Done`]
    /// or its handle is cancelled.
    fn schedule_repeating(
        &mut self,
        interval_ms: u64,
        task: Box<dyn FnMut(&mut C, u64) -> Repeat>,
    ) -> TaskHandle;
}

struct QueuedTask<C> {
    due_ms: u64,
    seq: u64,
    interval_ms: Option<u64>,
    handle: TaskHandle,
    task: Box<dyn FnMut(&mut C, u64) -> Repeat>,
}

/// Deterministic scheduler driven by explicit time advancement.
///
/// Tasks fire in due-time order; ties fire in scheduling order.
pub struct ManualScheduler<C> {
    now_ms: u64,
    seq: u64,
    queue: BinaryHeap<Reverse<QueuedEntry<C>>>,
}

struct QueuedEntry<C>(QueuedTask<C>);

impl<C> PartialEq for QueuedEntry<C> {
    fn eq(&self, other: &Self) -> bool {
        self.0.due_ms == other.0.due_ms && self.0.seq == other.0.seq
    }
}

impl<C> Eq for QueuedEntry<C> {}

impl<C> PartialOrd for QueuedEntry<C> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<C> Ord for QueuedEntry<C> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.0.due_ms, self.0.seq).cmp(&(other.0.due_ms, other.0.seq))
    }
}

impl<C> Default for ManualScheduler<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> ManualScheduler<C> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            seq: 0,
            queue: BinaryHeap::new(),
        }
    }

    #[must_use]
    pub const fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of live (not yet cancelled) queued tasks.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue
            .iter()
            .filter(|entry| !entry.0.0.handle.is_cancelled())
            .count()
    }

    fn push(&mut self, task: QueuedTask<C>) {
        self.queue.push(Reverse(QueuedEntry(task)));
    }

    /// Advance the clock, firing every due task against `ctx`.
    pub fn advance_to(&mut self, now_ms: u64, ctx: &mut C) {
        self.now_ms = self.now_ms.max(now_ms);
        while let Some(Reverse(entry)) = self.queue.peek() {
            if entry.0.due_ms > self.now_ms {
                break;
            }
            let Some(Reverse(QueuedEntry(mut task))) = self.queue.pop() else {
                break;
            };
            if task.handle.is_cancelled() {
                continue;
            }
            let outcome = (task.task)(ctx, task.due_ms);
            if let Some(interval) = task.interval_ms {
                if outcome == Repeat::Again && !task.handle.is_cancelled() {
                    task.due_ms += interval.max(1);
                    self.push(task);
                }
            }
        }
    }

    /// Advance the clock by a delta, firing due tasks.
    pub fn advance_by(&mut self, delta_ms: u64, ctx: &mut C) {
        self.advance_to(self.now_ms + delta_ms, ctx);
    }
}

impl<C: 'static> Scheduler<C> for ManualScheduler<C> {
    fn schedule_once(&mut self, delay_ms: u64, mut task: Box<dyn FnMut(&mut C, u64)>) -> TaskHandle {
        self.schedule_repeating(
            delay_ms,
            Box::new(move |ctx, now_ms| {
                task(ctx, now_ms);
                Repeat::Done
            }),
        )
    }

    fn schedule_repeating(
        &mut self,
        interval_ms: u64,
        task: Box<dyn FnMut(&mut C, u64) -> Repeat>,
    ) -> TaskHandle {
        let handle = TaskHandle::default();
        self.seq += 1;
        let queued = QueuedTask {
            due_ms: self.now_ms + interval_ms,
            seq: self.seq,
            // One-shot wrappers return Done; only true repeats re-arm.
            interval_ms: Some(interval_ms),
            handle: handle.clone(),
            task,
        };
        self.push(queued);
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_shot_fires_exactly_once_at_due_time() {
        let mut scheduler: ManualScheduler<u32> = ManualScheduler::new();
        let mut fired = 0u32;
        scheduler.schedule_once(100, Box::new(|count, _now| *count += 1));
        scheduler.advance_to(99, &mut fired);
        assert_eq!(fired, 0);
        scheduler.advance_to(100, &mut fired);
        assert_eq!(fired, 1);
        scheduler.advance_to(10_000, &mut fired);
        assert_eq!(fired, 1);
    }

    #[test]
    fn cancelled_task_never_fires() {
        let mut scheduler: ManualScheduler<u32> = ManualScheduler::new();
        let mut fired = 0u32;
        let handle = scheduler.schedule_once(50, Box::new(|count, _now| *count += 1));
        handle.cancel();
        scheduler.advance_to(1_000, &mut fired);
        assert_eq!(fired, 0);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn repeating_task_ticks_on_interval_until_cancelled() {
        let mut scheduler: ManualScheduler<Vec<u64>> = ManualScheduler::new();
        let mut ticks: Vec<u64> = Vec::new();
        let handle = scheduler.schedule_repeating(
            10,
            Box::new(|ticks: &mut Vec<u64>, now_ms| {
                ticks.push(now_ms);
                Repeat::Again
            }),
        );
        scheduler.advance_to(35, &mut ticks);
        assert_eq!(ticks, vec![10, 20, 30]);
        handle.cancel();
        scheduler.advance_to(100, &mut ticks);
        assert_eq!(ticks.len(), 3);
    }

    #[test]
    fn repeating_task_can_stop_itself() {
        let mut scheduler: ManualScheduler<u32> = ManualScheduler::new();
        let mut fired = 0u32;
        scheduler.schedule_repeating(
            5,
            Box::new(|count, _now| {
                *count += 1;
                if *count >= 2 { Repeat::Done } else { Repeat::Again }
            }),
        );
        scheduler.advance_to(1_000, &mut fired);
        assert_eq!(fired, 2);
    }

    #[test]
    fn due_ties_fire_in_scheduling_order() {
        let mut scheduler: ManualScheduler<Vec<u8>> = ManualScheduler::new();
        let mut order: Vec<u8> = Vec::new();
        scheduler.schedule_once(10, Box::new(|order: &mut Vec<u8>, _now| order.push(1)));
        scheduler.schedule_once(10, Box::new(|order: &mut Vec<u8>, _now| order.push(2)));
        scheduler.advance_to(10, &mut order);
        assert_eq!(order, vec![1, 2]);
    }
}
