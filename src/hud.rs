//! Presentation-side state the simulation feeds: floating "+N" texts and the
//! animated score counter.

use glam::DVec2;

use crate::config::{HudSettings, Settings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextColor {
    White,
    Orange,
    Red,
    Green,
}

impl TextColor {
    pub fn rgb(self) -> [u8; 3] {
        match self {
            Self::White => [255, 255, 255],
            Self::Orange => [255, 200, 0],
            Self::Red => [255, 0, 0],
            Self::Green => [0, 255, 0],
        }
    }
}

/// Screen-space text drifting toward the score display.
#[derive(Debug, Clone)]
pub struct FloatingText {
    pub position: DVec2,
    pub speed: f64,
    pub text: String,
    pub size: f32,
    pub color: TextColor,
    reached: bool,
}

/// Queue of floating texts. Texts are retired once they reach the target.
pub struct FloatingTexts {
    items: Vec<FloatingText>,
    target: DVec2,
    smoothing: f64,
    reach_margin: f64,
}

impl FloatingTexts {
    pub fn new(settings: &Settings) -> Self {
        Self {
            items: Vec::new(),
            target: score_anchor(settings),
            smoothing: settings.text.approach_smoothing,
            reach_margin: settings.text.reach_margin,
        }
    }

    pub fn enqueue(
        &mut self,
        position: DVec2,
        speed: f64,
        text: impl Into<String>,
        size: f32,
        color: TextColor,
    ) {
        self.items.push(FloatingText {
            position,
            speed,
            text: text.into(),
            size,
            color,
            reached: false,
        });
    }

    /// Move every text toward the target, slowing as it closes in, and drop
    /// the ones that arrived.
    pub fn advance(&mut self) {
        for t in &mut self.items {
            let delta = self.target - t.position;
            let dist = delta.length();
            t.position += delta / (dist + self.smoothing) * t.speed;
            if dist < self.reach_margin {
                t.reached = true;
            }
        }
        self.items.retain(|t| !t.reached);
    }

    pub fn iter(&self) -> impl Iterator<Item = &FloatingText> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn target(&self) -> DVec2 {
        self.target
    }
}

/// Where the score is drawn, and where floating texts fly to.
pub fn score_anchor(settings: &Settings) -> DVec2 {
    DVec2::new(
        settings.screen.width as f64 - settings.hud.score_right_margin,
        settings.hud.score_top_margin,
    )
}

/// Score display that counts up toward the real score a step at a time.
pub struct ScoreCounter {
    shown: u64,
    increment: u64,
}

impl ScoreCounter {
    pub fn new(hud: &HudSettings) -> Self {
        Self {
            shown: 0,
            increment: hud.score_increment,
        }
    }

    /// Step toward `score`. Drops immediately when the score went down.
    pub fn update(&mut self, score: u64) -> u64 {
        if self.shown > score {
            self.shown = score;
        }
        self.shown += (score - self.shown).min(self.increment);
        self.shown
    }

    pub fn shown(&self) -> u64 {
        self.shown
    }
}

/// Fill fraction of the experience bar, clamped to [0, 1].
pub fn progress_fraction(experience: u64, xp_to_next_level: u64) -> f32 {
    if xp_to_next_level == 0 {
        return 1.0;
    }
    (experience as f32 / xp_to_next_level as f32).clamp(0.0, 1.0)
}
