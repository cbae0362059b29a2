use instant::Instant;

/// Which phase of the frame is being timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Phase {
    Timeline = 0,
    Spawn = 1,
    Creatures = 2,
    Purge = 3,
    Player = 4,
    Camera = 5,
    BuildInstances = 6,
    Render = 7,
}

impl Phase {
    pub const ALL: [Phase; 8] = [
        Self::Timeline,
        Self::Spawn,
        Self::Creatures,
        Self::Purge,
        Self::Player,
        Self::Camera,
        Self::BuildInstances,
        Self::Render,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Timeline => "Timeline",
            Self::Spawn => "Spawn",
            Self::Creatures => "Creatures",
            Self::Purge => "Purge",
            Self::Player => "Player",
            Self::Camera => "Camera",
            Self::BuildInstances => "Build Inst.",
            Self::Render => "Render",
        }
    }
}

/// Per-phase timing with exponential moving average smoothing.
pub struct PhaseTimers {
    /// EMA-smoothed duration in microseconds per phase.
    pub durations_us: [f64; 8],
    start: Instant,
}

const EMA_ALPHA: f64 = 0.1;

impl PhaseTimers {
    pub fn new() -> Self {
        Self {
            durations_us: [0.0; 8],
            start: Instant::now(),
        }
    }

    pub fn begin(&mut self) {
        self.start = Instant::now();
    }

    /// Record time since `begin()` for `phase`, then restart the clock so
    /// consecutive phases can be chained.
    pub fn end(&mut self, phase: Phase) {
        let elapsed_us = self.start.elapsed().as_secs_f64() * 1_000_000.0;
        let idx = phase as usize;
        self.durations_us[idx] = self.durations_us[idx] * (1.0 - EMA_ALPHA) + elapsed_us * EMA_ALPHA;
        self.start = Instant::now();
    }

    pub fn get(&self, phase: Phase) -> f64 {
        self.durations_us[phase as usize]
    }

    /// Sum of all phase durations (microseconds).
    pub fn total_us(&self) -> f64 {
        self.durations_us.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_index_their_slot() {
        for (i, p) in Phase::ALL.iter().enumerate() {
            assert_eq!(*p as usize, i);
        }
    }

    #[test]
    fn end_records_nonnegative_time() {
        let mut timers = PhaseTimers::new();
        timers.begin();
        timers.end(Phase::Camera);
        assert!(timers.get(Phase::Camera) >= 0.0);
        assert_eq!(timers.get(Phase::Spawn), 0.0);
        assert!(timers.total_us() >= timers.get(Phase::Camera));
    }
}
