//! One delay queue for every timed transition, drained once per tick by the
//! frame loop. Nothing mutates game state from another thread.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use hecs::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    EndInvulnerability,
    /// Flip visibility; reschedules itself every `interval` ticks until done.
    BlinkToggle { toggles_left: u32, interval: u64 },
    BeginChase,
    EndChase,
    /// Advance the player's dash by one tick.
    ThrustStep,
    /// Ask the app to shut down.
    Exit,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    fire_at: u64,
    seq: u64,
    target: Option<Entity>,
    transition: Transition,
}

// Min-heap on (fire_at, seq): earliest first, ties in scheduling order.
impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        (other.fire_at, other.seq).cmp(&(self.fire_at, self.seq))
    }
}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.fire_at == other.fire_at && self.seq == other.seq
    }
}

impl Eq for Pending {}

pub struct Timeline {
    now: u64,
    next_seq: u64,
    pending: BinaryHeap<Pending>,
}

impl Timeline {
    pub fn new() -> Self {
        Self {
            now: 0,
            next_seq: 0,
            pending: BinaryHeap::new(),
        }
    }

    /// Current tick.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Move to the next tick.
    pub fn advance(&mut self) -> u64 {
        self.now += 1;
        self.now
    }

    /// Fire `transition` after `delay` ticks, never earlier than the next tick.
    pub fn schedule(&mut self, delay: u64, target: Option<Entity>, transition: Transition) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Pending {
            fire_at: self.now + delay.max(1),
            seq,
            target,
            transition,
        });
    }

    /// Pop the next transition due at or before the current tick.
    pub fn pop_due(&mut self) -> Option<(Option<Entity>, Transition)> {
        if self.pending.peek()?.fire_at > self.now {
            return None;
        }
        self.pending.pop().map(|p| (p.target, p.transition))
    }

    /// Drop everything aimed at `entity`.
    pub fn cancel(&mut self, entity: Entity) {
        self.pending.retain(|p| p.target != Some(entity));
    }

    pub fn pending_for(&self, entity: Entity) -> usize {
        self.pending
            .iter()
            .filter(|p| p.target == Some(entity))
            .count()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(timeline: &mut Timeline) -> Vec<Transition> {
        let mut out = Vec::new();
        while let Some((_, t)) = timeline.pop_due() {
            out.push(t);
        }
        out
    }

    #[test]
    fn fires_in_time_then_schedule_order() {
        let mut timeline = Timeline::new();
        timeline.schedule(2, None, Transition::EndChase);
        timeline.schedule(1, None, Transition::BeginChase);
        timeline.schedule(2, None, Transition::Exit);

        timeline.advance();
        assert_eq!(drain(&mut timeline), vec![Transition::BeginChase]);
        timeline.advance();
        assert_eq!(drain(&mut timeline), vec![Transition::EndChase, Transition::Exit]);
        assert_eq!(timeline.len(), 0);
    }

    #[test]
    fn zero_delay_waits_for_next_tick() {
        let mut timeline = Timeline::new();
        timeline.schedule(0, None, Transition::ThrustStep);
        assert!(timeline.pop_due().is_none());
        timeline.advance();
        assert_eq!(drain(&mut timeline), vec![Transition::ThrustStep]);
    }

    #[test]
    fn cancel_drops_only_that_entity() {
        let mut world = hecs::World::new();
        let a = world.spawn(());
        let b = world.spawn(());
        let mut timeline = Timeline::new();
        timeline.schedule(1, Some(a), Transition::BeginChase);
        timeline.schedule(1, Some(b), Transition::EndInvulnerability);
        timeline.schedule(3, Some(a), Transition::EndChase);

        timeline.cancel(a);
        assert_eq!(timeline.pending_for(a), 0);
        assert_eq!(timeline.pending_for(b), 1);
    }
}
