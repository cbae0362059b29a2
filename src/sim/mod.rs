//! Headless game state and the fixed-order frame pipeline.
//!
//! `Simulation::tick` runs one logical frame:
//! timeline -> spawn -> creature updates -> purge -> player -> camera -> texts.

pub mod barracuda;
pub mod camera;
pub mod components;
pub mod creature;
pub mod player;
pub mod population;
pub mod timeline;
pub mod universe;

use glam::DVec2;
use hecs::Entity;

use self::camera::Camera;
use self::components::{Facing, Vitals, Visual};
use self::population::{FishType, Population, Spawner};
use self::timeline::{Timeline, Transition};
use self::universe::Universe;
use crate::audio::{AudioSink, Cue};
use crate::config::Settings;
use crate::hud::{FloatingTexts, ScoreCounter};
use crate::sprites::SpriteAtlas;
use crate::util::timer::{Phase, PhaseTimers};

pub struct Simulation {
    pub settings: Settings,
    pub universe: Universe,
    pub population: Population,
    pub camera: Camera,
    pub timeline: Timeline,
    pub texts: FloatingTexts,
    pub score: ScoreCounter,
    pub sprites: SpriteAtlas,
    pub timers: PhaseTimers,
    pub player: Entity,
    pub background: Entity,
    /// Pointer position in screen pixels.
    pub pointer: DVec2,
    audio: Box<dyn AudioSink>,
    rng: fastrand::Rng,
    exit_requested: bool,
}

impl Simulation {
    pub fn new(settings: Settings, audio: Box<dyn AudioSink>, rng: fastrand::Rng) -> Self {
        let mut sprites = SpriteAtlas::builtin();
        let mut universe = Universe::new();
        let mut population = Population::new();
        let background = population.place_background(&mut universe, &settings, &mut sprites);
        let player = population.spawn_player(&mut universe, &settings, &mut sprites);

        let mut sim = Self {
            camera: Camera::new(&settings),
            texts: FloatingTexts::new(&settings),
            score: ScoreCounter::new(&settings.hud),
            settings,
            universe,
            population,
            timeline: Timeline::new(),
            sprites,
            timers: PhaseTimers::new(),
            player,
            background,
            pointer: DVec2::ZERO,
            audio,
            rng,
            exit_requested: false,
        };
        // Start with the pointer on the player so it holds still.
        sim.pointer = player::center(&sim);
        sim
    }

    pub fn tick(&mut self) {
        self.timers.begin();
        self.timeline.advance();
        while let Some((target, transition)) = self.timeline.pop_due() {
            self.apply(target, transition);
        }
        self.timers.end(Phase::Timeline);

        self.spawn_around_player(self.settings.simulation.spawn_rate);
        self.timers.end(Phase::Spawn);

        creature::update_all(self);
        self.timers.end(Phase::Creatures);

        let purged = self.purge_dead();
        if purged > 0 {
            log::trace!("purged {purged} creatures");
        }
        self.timers.end(Phase::Purge);

        player::steer(self);
        player::check_level(self);
        self.timers.end(Phase::Player);

        let velocity = self
            .universe
            .read::<components::Velocity>(self.player)
            .map_or(DVec2::ZERO, |v| v.0);
        let (position, center) = (player::position(self), player::center(self));
        self.camera
            .update(&mut self.universe, velocity, position, center);
        self.texts.advance();
        if let Some(stats) = player::stats(self) {
            self.score.update(stats.score);
        }
        self.timers.end(Phase::Camera);
    }

    fn apply(&mut self, target: Option<Entity>, transition: Transition) {
        let entity = match (target, transition) {
            (_, Transition::Exit) => {
                log::info!("Exit requested");
                self.exit_requested = true;
                return;
            }
            (Some(e), _) if self.universe.contains(e) => e,
            _ => return,
        };
        match transition {
            Transition::EndInvulnerability => {
                self.universe
                    .update::<Vitals, _>(entity, |v| v.invulnerable = false);
            }
            Transition::BlinkToggle {
                toggles_left,
                interval,
            } => creature::blink_toggle(self, entity, toggles_left, interval),
            Transition::BeginChase => barracuda::begin_chase(self, entity),
            Transition::EndChase => barracuda::end_chase(self, entity),
            Transition::ThrustStep => player::thrust_step(self),
            Transition::Exit => {}
        }
    }

    fn split(&mut self) -> (&mut Population, Spawner<'_>) {
        (
            &mut self.population,
            Spawner {
                universe: &mut self.universe,
                settings: &self.settings,
                sprites: &mut self.sprites,
                rng: &mut self.rng,
            },
        )
    }

    pub fn spawn(&mut self, kind: FishType) -> Vec<Entity> {
        let (population, mut ctx) = self.split();
        population.spawn(&mut ctx, kind)
    }

    pub fn spawn_around_player(&mut self, rate: f32) -> usize {
        let (population, mut ctx) = self.split();
        population.spawn_around_player(&mut ctx, rate)
    }

    pub fn spawn_enemy(&mut self, position: DVec2, velocity: DVec2, level: u32) -> Entity {
        let (population, mut ctx) = self.split();
        population.spawn_enemy(&mut ctx, position, velocity, level)
    }

    pub fn spawn_barracuda(&mut self, position: DVec2, velocity: DVec2) -> Entity {
        let (population, mut ctx) = self.split();
        population.spawn_barracuda(&mut ctx, position, velocity)
    }

    pub fn purge_dead(&mut self) -> usize {
        self.population
            .purge_dead(&mut self.universe, &mut self.timeline, self.player)
    }

    /// Dash toward the pointer.
    pub fn thrust(&mut self) {
        let target = self.pointer;
        player::thrust(self, target);
    }

    pub fn play(&mut self, cue: Cue) {
        self.audio.play(cue);
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Whether a creature's sprite should be drawn this frame.
    pub fn is_visible(&self, entity: Entity) -> bool {
        self.universe
            .read::<Visual>(entity)
            .map_or(true, |v| v.visible)
    }

    pub fn facing_right(&self, entity: Entity) -> bool {
        self.universe
            .read::<Facing>(entity)
            .is_some_and(|f| f.right)
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use crate::audio::testing::RecordingAudio;

    /// Headless simulation with spawning off, a fixed seed and recorded audio.
    pub fn quiet_sim() -> (Simulation, RecordingAudio) {
        let mut settings = Settings::embedded().unwrap();
        settings.simulation.spawn_rate = 0.0;
        let audio = RecordingAudio::default();
        let sim = Simulation::new(settings, Box::new(audio.clone()), fastrand::Rng::with_seed(7));
        (sim, audio)
    }

    /// Run ticks until `done` holds, up to `limit` ticks.
    pub fn run_until(sim: &mut Simulation, limit: u32, mut done: impl FnMut(&Simulation) -> bool) -> bool {
        for _ in 0..limit {
            sim.tick();
            if done(sim) {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::components::{BarracudaBrain, Behavior, Creature, CreatureKind, Position, Size, Velocity};
    use super::testing::{quiet_sim, run_until};
    use super::*;
    use crate::hud::TextColor;
    use approx::assert_relative_eq;

    fn pos(sim: &Simulation, e: Entity) -> DVec2 {
        sim.universe.read::<Position>(e).unwrap().0
    }

    fn dead(sim: &Simulation, e: Entity) -> bool {
        sim.universe.read::<Vitals>(e).map_or(true, |v| v.dead)
    }

    fn lives(sim: &Simulation, b: Entity) -> (u32, Behavior) {
        let brain = sim.universe.read::<BarracudaBrain>(b).unwrap();
        (brain.lives_left, brain.behavior)
    }

    /// Put an enemy so its body overlaps the player's left-facing mouth.
    fn enemy_at_player(sim: &mut Simulation, level: u32) -> Entity {
        let at = player::position(sim) + DVec2::new(-5.0, 5.0);
        sim.spawn_enemy(at, DVec2::ZERO, level)
    }

    #[test]
    fn player_eats_equal_level_and_gains_xp() {
        let (mut sim, audio) = quiet_sim();
        let prey = enemy_at_player(&mut sim, 1);
        sim.tick();

        assert!(!sim.universe.contains(prey));
        let stats = player::stats(&sim).unwrap();
        assert_eq!(stats.experience, 300);
        assert_eq!(stats.score, 300);
        assert_eq!(audio.count(Cue::Bite), 1);
        assert!(sim.texts.iter().any(|t| t.text == "+300" && t.color == TextColor::White));
    }

    #[test]
    fn bigger_enemy_resets_player() {
        let (mut sim, audio) = quiet_sim();
        sim.universe
            .update::<components::PlayerStats, _>(sim.player, |s| {
                s.experience = 500;
                s.score = 900;
            });
        let shark = enemy_at_player(&mut sim, 3);
        sim.tick();

        let stats = player::stats(&sim).unwrap();
        assert_eq!(stats.experience, 0);
        assert_eq!(stats.score, 0);
        assert_eq!(player::level(&sim), 1);
        assert!(sim.universe.read::<Vitals>(sim.player).unwrap().invulnerable);
        assert!(!dead(&sim, sim.player));
        assert!(sim.universe.contains(shark));
        assert_eq!(audio.count(Cue::Bite), 1);
        assert!(sim.texts.iter().any(|t| t.text == "OH NO!" && t.color == TextColor::Red));
    }

    #[test]
    fn invulnerability_wears_off_and_blink_ends_visible() {
        let (mut sim, _) = quiet_sim();
        let shark = enemy_at_player(&mut sim, 3);
        sim.tick();
        sim.universe.update::<Vitals, _>(shark, |v| v.dead = true);
        let player = sim.player;
        assert!(sim.universe.read::<Visual>(player).unwrap().blinking);

        let five_secs = sim.settings.ticks(5.0) as u32;
        let ended = run_until(&mut sim, five_secs + 2, |s| {
            !s.universe.read::<Vitals>(player).unwrap().invulnerable
        });
        assert!(ended);

        let visual_done = run_until(&mut sim, 120, |s| {
            !s.universe.read::<Visual>(player).unwrap().blinking
        });
        assert!(visual_done);
        assert!(sim.universe.read::<Visual>(player).unwrap().visible);
    }

    #[test]
    fn invulnerable_player_survives_contact() {
        let (mut sim, audio) = quiet_sim();
        sim.universe
            .update::<Vitals, _>(sim.player, |v| v.invulnerable = true);
        sim.universe
            .update::<components::PlayerStats, _>(sim.player, |s| s.score = 42);
        enemy_at_player(&mut sim, 3);
        sim.tick();
        assert_eq!(player::stats(&sim).unwrap().score, 42);
        assert_eq!(audio.count(Cue::Bite), 0);
    }

    #[test]
    fn enemies_eat_strictly_smaller_enemies_silently() {
        let (mut sim, audio) = quiet_sim();
        let far = DVec2::new(100.0, 100.0);
        let big = sim.spawn_enemy(far, DVec2::ZERO, 2);
        let small = sim.spawn_enemy(far + DVec2::new(-2.0, 4.0), DVec2::ZERO, 1);
        let twin = sim.spawn_enemy(far + DVec2::new(1.0, 0.0), DVec2::ZERO, 2);
        sim.tick();

        assert!(!sim.universe.contains(small));
        assert!(sim.universe.contains(big));
        assert!(sim.universe.contains(twin));
        assert_eq!(player::stats(&sim).unwrap().experience, 0);
        assert_eq!(audio.count(Cue::Bite), 0);
    }

    #[test]
    fn creature_killed_earlier_in_the_frame_stays_inert() {
        // The big fish's mouth covers the middle one's body, and the middle
        // one's right-facing mouth covers the small one's body.
        let (big_at, mid_at, small_at) = (
            DVec2::new(100.0, 100.0),
            DVec2::new(120.0, 160.0),
            DVec2::new(175.0, 170.0),
        );
        let drift = DVec2::new(0.0001, 0.0);

        let (mut alone, _) = quiet_sim();
        alone.spawn_enemy(mid_at, drift, 2);
        let lunch = alone.spawn_enemy(small_at, DVec2::ZERO, 1);
        alone.tick();
        assert!(!alone.universe.contains(lunch));

        let (mut sim, _) = quiet_sim();
        let big = sim.spawn_enemy(big_at, DVec2::ZERO, 3);
        let mid = sim.spawn_enemy(mid_at, drift, 2);
        let small = sim.spawn_enemy(small_at, DVec2::ZERO, 1);
        sim.tick();

        assert!(sim.universe.contains(big));
        assert!(!sim.universe.contains(mid));
        assert!(sim.universe.contains(small));
        assert!(!dead(&sim, small));
    }

    #[test]
    fn distant_creatures_despawn_regardless_of_level() {
        let (mut sim, _) = quiet_sim();
        let remote = player::center(&sim) + DVec2::new(2500.0, 0.0);
        let e = sim.spawn_barracuda(remote, DVec2::ZERO);
        sim.universe
            .update::<Vitals, _>(e, |v| v.invulnerable = true);
        sim.tick();
        assert!(!sim.universe.contains(e));
        assert_eq!(sim.population.len(), 1);
    }

    #[test]
    fn purge_keeps_player_and_is_idempotent() {
        let (mut sim, _) = quiet_sim();
        let e = sim.spawn_enemy(DVec2::new(50.0, 50.0), DVec2::ZERO, 1);
        sim.universe.update::<Vitals, _>(e, |v| v.dead = true);
        sim.universe
            .update::<Vitals, _>(sim.player, |v| v.dead = true);

        let purged = sim.purge_dead();
        assert_eq!(purged, 1);
        let again = sim.purge_dead();
        assert_eq!(again, 0);
        assert_eq!(sim.population.entities(), &[sim.player]);
    }

    #[test]
    fn die_is_idempotent() {
        let (mut sim, audio) = quiet_sim();
        let e = sim.spawn_enemy(DVec2::new(50.0, 50.0), DVec2::ZERO, 2);
        creature::die(&mut sim, e);
        creature::die(&mut sim, e);
        assert_eq!(player::stats(&sim).unwrap().experience, 848);
        assert_eq!(audio.count(Cue::Bite), 1);
        assert_eq!(sim.texts.len(), 1);
    }

    #[test]
    fn level_up_doubles_size_and_triples_threshold() {
        let (mut sim, _) = quiet_sim();
        sim.universe
            .update::<components::PlayerStats, _>(sim.player, |s| s.experience = 7000);
        sim.tick();
        let stats = player::stats(&sim).unwrap();
        assert_eq!(player::level(&sim), 2);
        assert_eq!(stats.experience, 0);
        assert_eq!(stats.xp_to_next_level, 21000);
        assert_eq!(sim.universe.read::<Size>(sim.player).unwrap().0, DVec2::splat(60.0));
    }

    #[test]
    fn winning_schedules_exit_once() {
        let (mut sim, _) = quiet_sim();
        sim.universe
            .update::<Creature, _>(sim.player, |c| c.level = 3);
        sim.universe
            .update::<components::PlayerStats, _>(sim.player, |s| s.experience = s.xp_to_next_level);
        sim.tick();
        sim.tick();

        let wins = sim.texts.iter().filter(|t| t.text == "YOU WIN!").count();
        assert_eq!(wins, 1);
        assert!(player::stats(&sim).unwrap().has_won);
        assert!(!sim.exit_requested());

        let delay = sim.settings.ticks(3.0) as u32;
        assert!(run_until(&mut sim, delay + 1, Simulation::exit_requested));
    }

    #[test]
    fn thrust_is_not_reentrant() {
        let (mut sim, audio) = quiet_sim();
        let target = player::center(&sim) + DVec2::new(300.0, 0.0);

        player::thrust(&mut sim, target);
        player::thrust(&mut sim, target);
        assert_eq!(audio.count(Cue::Dash), 1);

        let finished = run_until(&mut sim, 400, |s| player::stats(s).unwrap().thrust.is_none());
        assert!(finished);
        player::thrust(&mut sim, target);
        assert_eq!(audio.count(Cue::Dash), 2);
    }

    #[test]
    fn thrust_travels_in_world_space() {
        let (mut sim, _) = quiet_sim();
        let bg_start = pos(&sim, sim.background);
        let player_start = pos(&sim, sim.player);
        let target = player::center(&sim) + DVec2::new(0.0, 300.0);
        player::thrust(&mut sim, target);
        run_until(&mut sim, 400, |s| player::stats(s).unwrap().thrust.is_none());

        // Player position relative to the background grew downward.
        let before = player_start - bg_start;
        let after = pos(&sim, sim.player) - pos(&sim, sim.background);
        assert!(after.y > before.y + 10.0);
        assert_relative_eq!(after.x, before.x, epsilon = 1e-6);
    }

    #[test]
    fn tail_bite_then_wait_chase_and_cruise() {
        let (mut sim, audio) = quiet_sim();
        let player_pos = pos(&sim, sim.player);
        // Player faces left; its mouth is at its left edge. Park the tail there.
        // Left-facing barracuda: tail at center + 150, so put center 150 - 25 px left of the mouth.
        let barracuda_pos = DVec2::new(player_pos.x - 225.0 - 150.0 + 10.0, player_pos.y - 50.0 + 5.0);
        let b = sim.spawn_barracuda(barracuda_pos, DVec2::new(-7.0, 0.0));
        // Freeze it so the first update keeps the tail under the mouth.
        sim.universe
            .update::<Velocity, _>(b, |v| v.0 = DVec2::new(-0.0001, 0.0));
        sim.tick();

        let brain = sim.universe.read::<BarracudaBrain>(b).unwrap();
        assert_eq!(brain.behavior, Behavior::Waiting);
        assert_eq!(brain.lives_left, 2);
        assert!(sim.universe.read::<Vitals>(b).unwrap().invulnerable);
        assert_eq!(sim.universe.read::<Velocity>(b).unwrap().0, DVec2::ZERO);
        assert_eq!(player::stats(&sim).unwrap().experience, 1000);
        assert_eq!(audio.count(Cue::Bite), 1);
        assert!(sim.texts.iter().any(|t| t.text == "TAIL BITE!" && t.color == TextColor::Orange));

        // A second bite during the wait changes nothing.
        sim.tick();
        barracuda::tail_bitten(&mut sim, b);
        assert_eq!(lives(&sim, b), (2, Behavior::Waiting));
        assert_eq!(player::stats(&sim).unwrap().experience, 1000);

        let wait = sim.settings.ticks(3.0) as u32;
        assert!(run_until(&mut sim, wait + 1, |s| {
            s.universe.read::<BarracudaBrain>(b).unwrap().behavior == Behavior::Chasing
        }));
        barracuda::tail_bitten(&mut sim, b);
        assert_eq!(lives(&sim, b), (2, Behavior::Chasing));
        // Keep the player out of reach while it chases.
        sim.universe
            .update::<Vitals, _>(sim.player, |v| v.invulnerable = true);
        let chase = sim.settings.ticks(5.0) as u32;
        assert!(run_until(&mut sim, chase + 1, |s| {
            s.universe.read::<BarracudaBrain>(b).unwrap().behavior == Behavior::Default
        }));

        assert!(!sim.universe.read::<Vitals>(b).unwrap().invulnerable);
        let v = sim.universe.read::<Velocity>(b).unwrap().0;
        assert_eq!(v.x.abs(), 4.0);
        assert_eq!(v.y, 0.0);
    }

    #[test]
    fn last_life_tail_bite_kills_with_xp() {
        let (mut sim, audio) = quiet_sim();
        let b = sim.spawn_barracuda(DVec2::new(0.0, 0.0), DVec2::ZERO);
        sim.universe
            .update::<BarracudaBrain, _>(b, |brain| brain.lives_left = 1);
        barracuda::tail_bitten(&mut sim, b);
        assert!(dead(&sim, b));
        assert_eq!(
            player::stats(&sim).unwrap().experience,
            creature::xp_from_level(&sim.settings.experience, 15)
        );
        assert_eq!(audio.count(Cue::Bite), 1);
    }

    #[test]
    fn three_tail_bites_kill_and_mid_cycle_bites_are_ignored() {
        let (mut sim, audio) = quiet_sim();
        let b = sim.spawn_barracuda(DVec2::new(0.0, 0.0), DVec2::ZERO);
        let xp = |s: &Simulation| player::stats(s).unwrap().experience;

        barracuda::tail_bitten(&mut sim, b);
        assert_eq!(lives(&sim, b), (2, Behavior::Waiting));
        assert_eq!(xp(&sim), 1000);

        barracuda::begin_chase(&mut sim, b);
        barracuda::tail_bitten(&mut sim, b);
        assert_eq!(lives(&sim, b), (2, Behavior::Chasing));
        assert_eq!(xp(&sim), 1000);

        barracuda::end_chase(&mut sim, b);
        barracuda::tail_bitten(&mut sim, b);
        assert_eq!(lives(&sim, b), (1, Behavior::Waiting));
        assert_eq!(xp(&sim), 2000);

        // On the last life, bites while waiting or chasing still do nothing.
        barracuda::tail_bitten(&mut sim, b);
        assert_eq!(lives(&sim, b), (1, Behavior::Waiting));
        barracuda::begin_chase(&mut sim, b);
        barracuda::tail_bitten(&mut sim, b);
        assert_eq!(lives(&sim, b), (1, Behavior::Chasing));
        assert!(!dead(&sim, b));
        assert_eq!(xp(&sim), 2000);

        barracuda::end_chase(&mut sim, b);
        barracuda::tail_bitten(&mut sim, b);
        assert!(dead(&sim, b));
        assert_eq!(
            xp(&sim),
            2000 + creature::xp_from_level(&sim.settings.experience, 15)
        );
        assert_eq!(audio.count(Cue::Bite), 3);
    }

    #[test]
    fn chase_timers_on_removed_barracuda_are_noops() {
        let (mut sim, _) = quiet_sim();
        let b = sim.spawn_barracuda(DVec2::new(0.0, 0.0), DVec2::ZERO);
        barracuda::tail_bitten(&mut sim, b);
        assert_eq!(sim.timeline.pending_for(b), 1);

        sim.universe.update::<Vitals, _>(b, |v| v.dead = true);
        sim.purge_dead();
        assert_eq!(sim.timeline.pending_for(b), 0);

        // A stray transition for the removed entity is ignored too.
        sim.timeline.schedule(1, Some(b), Transition::EndChase);
        sim.tick();
        assert!(!sim.universe.contains(b));
    }

    #[test]
    fn barracuda_mouth_reaches_player() {
        let (mut sim, _) = quiet_sim();
        let player_pos = pos(&sim, sim.player);
        // Left-facing mouth hangs 180 px left of the center line, at y + 80.
        let at = DVec2::new(player_pos.x - 225.0 + 180.0 + 25.0 - 10.0, player_pos.y - 80.0 - 10.0);
        sim.spawn_barracuda(at, DVec2::new(-0.0001, 0.0));
        sim.universe
            .update::<components::PlayerStats, _>(sim.player, |s| s.score = 10);
        sim.tick();
        assert_eq!(player::stats(&sim).unwrap().score, 0);
        assert!(sim.universe.read::<Vitals>(sim.player).unwrap().invulnerable);
    }

    #[test]
    fn spawns_land_off_screen_and_registered() {
        let (mut sim, _) = quiet_sim();
        let made = sim.spawn(FishType::Medium);
        assert_eq!(made.len(), 1);
        let p = pos(&sim, made[0]);
        assert!(p.x == -320.0 || p.x == 1320.0);
        assert!((0.0..1200.0).contains(&p.y));
        let v = sim.universe.read::<Velocity>(made[0]).unwrap().0;
        assert_relative_eq!(v.x.abs(), 0.7);
        assert!(v.x.signum() == if p.x < 0.0 { 1.0 } else { -1.0 });
        assert!((-0.5..0.5).contains(&v.y));
        assert_eq!(sim.universe.read::<Creature>(made[0]).unwrap().level, 2);

        let b = sim.spawn(FishType::Barracuda);
        let bp = pos(&sim, b[0]);
        assert!(bp.x == -820.0 || bp.x == 1820.0);
        assert_eq!(sim.universe.read::<Velocity>(b[0]).unwrap().0.x.abs(), 7.0);
        assert_eq!(sim.population.len(), 3);
    }

    #[test]
    fn school_members_share_heading() {
        let (mut sim, _) = quiet_sim();
        let members = sim.spawn(FishType::School);
        assert!((3..=6).contains(&members.len()));
        let first = sim.universe.read::<Velocity>(members[0]).unwrap().0;
        for &m in &members {
            assert_eq!(sim.universe.read::<Velocity>(m).unwrap().0, first);
            let c = sim.universe.read::<Creature>(m).unwrap();
            assert_eq!(c.kind, CreatureKind::School);
            assert_eq!(c.level, 1);
        }
        let ids: Vec<_> = members
            .iter()
            .map(|&m| sim.universe.read::<components::SchoolId>(m).unwrap())
            .collect();
        assert!(ids.iter().all(|id| *id == ids[0]));
    }

    #[test]
    fn spawn_gate_closed_at_zero_rate() {
        let (mut sim, _) = quiet_sim();
        for _ in 0..200 {
            assert_eq!(sim.spawn_around_player(0.0), 0);
        }
        let mut opened = 0;
        for _ in 0..20 {
            opened += sim.spawn_around_player(1.0);
        }
        assert!(opened >= 20);
    }

    #[test]
    fn unknown_level_scales_smallest_tier() {
        let (mut sim, _) = quiet_sim();
        let e = sim.spawn_enemy(DVec2::new(0.0, 0.0), DVec2::ZERO, 5);
        assert_eq!(sim.universe.read::<Size>(e).unwrap().0, DVec2::new(250.0, 80.0));
    }

    #[test]
    fn background_is_decoration_not_creature() {
        let (sim, _) = quiet_sim();
        assert!(!sim.population.entities().contains(&sim.background));
        assert_eq!(pos(&sim, sim.background), DVec2::new(-800.0, -600.0));
        assert_eq!(
            sim.universe.read::<Size>(sim.background).unwrap().0,
            DVec2::new(2600.0, 1900.0)
        );
    }
}
