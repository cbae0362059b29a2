//! The camera never moves on screen. It shifts the whole universe the other
//! way, following a running average of the player's recent motion.

use glam::DVec2;

use super::universe::Universe;
use crate::config::Settings;
use crate::geometry::{angle, average, clamp, from_polar};
use crate::util::ring::RingBuffer;

pub struct Camera {
    /// Accumulated shift since the start of the game.
    position: DVec2,
    /// Where the player should sit on screen.
    desired: DVec2,
    samples: RingBuffer<DVec2>,
    min: DVec2,
    max: DVec2,
    return_velocity: f64,
    return_distance: f64,
}

impl Camera {
    pub fn new(settings: &Settings) -> Self {
        let (min, max) = map_boundary(settings);
        let screen = settings.screen;
        Self {
            position: DVec2::ZERO,
            desired: DVec2::new(f64::from(screen.width) / 2.0, f64::from(screen.height) / 2.0),
            samples: RingBuffer::new(settings.camera.max_samples),
            min,
            max,
            return_velocity: settings.camera.return_velocity,
            return_distance: settings.camera.return_distance,
        }
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Add a motion sample, zeroing any component that would push the view
    /// further past a map edge it has already crossed.
    pub fn push_sample(&mut self, sample: DVec2) {
        self.samples.push(self.hold_at_edges(sample));
    }

    /// Mean of the sample window. Zero when no samples have been taken.
    pub fn shift(&self) -> DVec2 {
        average(self.samples.iter()).unwrap_or(DVec2::ZERO)
    }

    /// Feed this frame's player velocity, pull back toward the desired spot if
    /// the player strayed, and apply the averaged shift. Returns the shift.
    pub fn update(
        &mut self,
        universe: &mut Universe,
        player_velocity: DVec2,
        player_position: DVec2,
        player_center: DVec2,
    ) -> DVec2 {
        self.push_sample(player_velocity);

        if self.desired.distance(player_position) > self.return_distance {
            let toward = from_polar(-self.return_velocity, angle(self.desired - player_center));
            let toward = self.hold_at_edges(clamp(toward, self.min, self.max));
            self.apply(universe, toward);
        }

        let shift = self.shift();
        self.apply(universe, shift);
        shift
    }

    fn apply(&mut self, universe: &mut Universe, delta: DVec2) {
        universe.translate(-delta);
        self.position += delta;
    }

    fn hold_at_edges(&self, mut v: DVec2) -> DVec2 {
        if self.position.x < self.min.x {
            v.x = v.x.max(0.0);
        }
        if self.position.x > self.max.x {
            v.x = v.x.min(0.0);
        }
        if self.position.y < self.min.y {
            v.y = v.y.max(0.0);
        }
        if self.position.y > self.max.y {
            v.y = v.y.min(0.0);
        }
        v
    }
}

/// How far the view may scroll from its start before leaving the map,
/// as (top-left, bottom-right).
pub fn map_boundary(settings: &Settings) -> (DVec2, DVec2) {
    let right = f64::from(settings.map.width) / 2.0 - f64::from(settings.screen.width) / 2.0;
    let down = f64::from(settings.map.height) / 2.0 - f64::from(settings.screen.height) / 2.0;
    (DVec2::new(-right, -down), DVec2::new(right, down))
}
