//! Cooperative scheduled-task slots for widget effects.
//!
//! The widget is single-threaded and timer-driven: the host pumps
//! [`Scheduler::poll`] from its frame loop and reacts to fired ticks. Each
//! effect owns exactly one slot, and the abstraction enforces at most one
//! active task per slot: scheduling into an occupied slot cancels and
//! replaces the previous task. Cancellation is immediate; there is no token
//! propagated into an already-fired tick, so a fired tick always completes
//! its single unit of work in the caller.
//!
//! Slots:
//! - `Debounce`: one-shot deferred refresh coalescing push bursts
//! - `Transition`: the 20-step value animation
//! - `Pulsation`: the ~60 Hz alarm glow wave
//! - `ButtonRefresh`: one-shot optimistic button state refresh after a
//!   command dispatch

use std::time::{Duration, Instant};

/// Maximum ticks a single poll will fire for one slot. A stalled host
/// (window dragged, machine asleep) fast-forwards instead of replaying
/// every missed tick.
const MAX_CATCHUP_TICKS: u32 = 32;

/// Effect slots. One task per slot, enforced by [`Scheduler`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectSlot {
    Debounce,
    Transition,
    Pulsation,
    ButtonRefresh,
}

const SLOT_COUNT: usize = 4;

impl EffectSlot {
    const fn index(self) -> usize {
        match self {
            Self::Debounce => 0,
            Self::Transition => 1,
            Self::Pulsation => 2,
            Self::ButtonRefresh => 3,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Task {
    next_due: Instant,
    period: Duration,
    /// Remaining ticks for finite tasks; `None` runs until cancelled.
    remaining: Option<u32>,
}

/// Slot-keyed task scheduler, driven by explicit `now` timestamps.
#[derive(Debug, Default)]
pub struct Scheduler {
    slots: [Option<Task>; SLOT_COUNT],
}

impl Scheduler {
    pub const fn new() -> Self {
        Self { slots: [None; SLOT_COUNT] }
    }

    /// Schedule a one-shot task, replacing any task already in the slot.
    pub fn schedule_once(&mut self, slot: EffectSlot, delay: Duration, now: Instant) {
        self.schedule_repeating(slot, delay, Some(1), now);
    }

    /// Schedule a repeating task firing every `period`, replacing any task
    /// already in the slot. `steps` limits the number of ticks; `None`
    /// repeats until cancelled. Finite tasks release their slot after the
    /// final tick.
    pub fn schedule_repeating(&mut self, slot: EffectSlot, period: Duration, steps: Option<u32>, now: Instant) {
        if steps == Some(0) {
            self.slots[slot.index()] = None;
            return;
        }
        // A zero period would spin forever in poll; floor it to 1ms.
        let period = period.max(Duration::from_millis(1));
        self.slots[slot.index()] = Some(Task {
            next_due: now + period,
            period,
            remaining: steps,
        });
    }

    /// Cancel the slot's task, if any. Safe to call repeatedly.
    pub fn cancel(&mut self, slot: EffectSlot) {
        self.slots[slot.index()] = None;
    }

    /// Cancel every slot. Used during teardown; idempotent.
    pub fn cancel_all(&mut self) {
        self.slots = [None; SLOT_COUNT];
    }

    pub fn is_active(&self, slot: EffectSlot) -> bool {
        self.slots[slot.index()].is_some()
    }

    /// Fire every tick of the slot's task that is due at `now`.
    ///
    /// Returns the number of ticks fired (0 when idle or not yet due).
    /// Finite tasks decrement their remaining count and release the slot
    /// after the last tick. Catch-up is bounded by [`MAX_CATCHUP_TICKS`];
    /// past the bound the task fast-forwards to the next future due time.
    pub fn poll(&mut self, slot: EffectSlot, now: Instant) -> u32 {
        let idx = slot.index();
        let Some(mut task) = self.slots[idx] else {
            return 0;
        };

        let mut fired = 0u32;
        let mut finished = false;
        while task.next_due <= now {
            fired += 1;
            task.next_due += task.period;

            if let Some(remaining) = &mut task.remaining {
                *remaining -= 1;
                if *remaining == 0 {
                    finished = true;
                    break;
                }
            }

            if fired >= MAX_CATCHUP_TICKS {
                while task.next_due <= now {
                    task.next_due += task.period;
                }
                break;
            }
        }
        self.slots[idx] = if finished { None } else { Some(task) };
        fired
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_idle_slot_fires_nothing() {
        let mut sched = Scheduler::new();
        assert_eq!(sched.poll(EffectSlot::Debounce, Instant::now()), 0);
        assert!(!sched.is_active(EffectSlot::Debounce));
    }

    #[test]
    fn test_once_fires_once_and_releases() {
        let mut sched = Scheduler::new();
        let t0 = Instant::now();
        sched.schedule_once(EffectSlot::Debounce, ms(100), t0);

        assert_eq!(sched.poll(EffectSlot::Debounce, t0 + ms(50)), 0, "not yet due");
        assert!(sched.is_active(EffectSlot::Debounce));

        assert_eq!(sched.poll(EffectSlot::Debounce, t0 + ms(100)), 1);
        assert!(!sched.is_active(EffectSlot::Debounce), "one-shot releases its slot");
        assert_eq!(sched.poll(EffectSlot::Debounce, t0 + ms(500)), 0, "never fires again");
    }

    #[test]
    fn test_reschedule_replaces_pending_task() {
        // Debounce semantics: each reschedule pushes the due time out.
        let mut sched = Scheduler::new();
        let t0 = Instant::now();
        sched.schedule_once(EffectSlot::Debounce, ms(100), t0);
        sched.schedule_once(EffectSlot::Debounce, ms(100), t0 + ms(80));

        assert_eq!(sched.poll(EffectSlot::Debounce, t0 + ms(120)), 0, "original due time was replaced");
        assert_eq!(sched.poll(EffectSlot::Debounce, t0 + ms(180)), 1);
    }

    #[test]
    fn test_repeating_finite_self_terminates() {
        let mut sched = Scheduler::new();
        let t0 = Instant::now();
        sched.schedule_repeating(EffectSlot::Transition, ms(40), Some(20), t0);

        let mut total = 0;
        for frame in 1..=50 {
            total += sched.poll(EffectSlot::Transition, t0 + ms(frame * 20));
        }
        assert_eq!(total, 20, "exactly the configured step count fires");
        assert!(!sched.is_active(EffectSlot::Transition), "finite task releases its slot");
    }

    #[test]
    fn test_repeating_infinite_runs_until_cancelled() {
        let mut sched = Scheduler::new();
        let t0 = Instant::now();
        sched.schedule_repeating(EffectSlot::Pulsation, ms(16), None, t0);

        assert!(sched.poll(EffectSlot::Pulsation, t0 + ms(100)) > 0);
        assert!(sched.is_active(EffectSlot::Pulsation));

        sched.cancel(EffectSlot::Pulsation);
        assert!(!sched.is_active(EffectSlot::Pulsation));
        assert_eq!(sched.poll(EffectSlot::Pulsation, t0 + ms(500)), 0);
    }

    #[test]
    fn test_multiple_due_ticks_fire_together() {
        let mut sched = Scheduler::new();
        let t0 = Instant::now();
        sched.schedule_repeating(EffectSlot::Pulsation, ms(16), None, t0);
        // 5 periods elapsed in one poll (slow frame).
        assert_eq!(sched.poll(EffectSlot::Pulsation, t0 + ms(80)), 5);
    }

    #[test]
    fn test_catchup_is_bounded() {
        let mut sched = Scheduler::new();
        let t0 = Instant::now();
        sched.schedule_repeating(EffectSlot::Pulsation, ms(1), None, t0);
        // Ten seconds of backlog must not replay 10000 ticks.
        let fired = sched.poll(EffectSlot::Pulsation, t0 + ms(10_000));
        assert_eq!(fired, MAX_CATCHUP_TICKS);
        // Next poll resumes from a future due time, not the backlog.
        assert_eq!(sched.poll(EffectSlot::Pulsation, t0 + ms(10_000)), 0);
    }

    #[test]
    fn test_slots_are_independent() {
        let mut sched = Scheduler::new();
        let t0 = Instant::now();
        sched.schedule_once(EffectSlot::Debounce, ms(50), t0);
        sched.schedule_repeating(EffectSlot::Pulsation, ms(16), None, t0);

        sched.cancel(EffectSlot::Debounce);
        assert!(sched.is_active(EffectSlot::Pulsation), "cancelling one slot leaves others alone");
    }

    #[test]
    fn test_cancel_all_idempotent() {
        let mut sched = Scheduler::new();
        let t0 = Instant::now();
        sched.schedule_once(EffectSlot::Debounce, ms(50), t0);
        sched.schedule_repeating(EffectSlot::Transition, ms(40), Some(20), t0);

        sched.cancel_all();
        sched.cancel_all();
        for slot in [
            EffectSlot::Debounce,
            EffectSlot::Transition,
            EffectSlot::Pulsation,
            EffectSlot::ButtonRefresh,
        ] {
            assert!(!sched.is_active(slot));
        }
    }

    #[test]
    fn test_zero_steps_is_a_no_op() {
        let mut sched = Scheduler::new();
        let t0 = Instant::now();
        sched.schedule_repeating(EffectSlot::Transition, ms(40), Some(0), t0);
        assert!(!sched.is_active(EffectSlot::Transition));
    }
}
