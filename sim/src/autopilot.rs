//! Scripted pilot that flies the aircraft from published frames.
//!
//! The autopilot only sees what a remote client would: the scene snapshot and
//! the HUD. Each decision:
//! - swerves away from the nearest obstacle in its path
//! - otherwise heads for the nearest star or ring ahead
//! - holds a cruise altitude well clear of the ground
//! - boosts when the path is clear and energy allows

use rand::Rng;
use sky_voyager_shared::config::WorldConfig;
use sky_voyager_shared::protocol::{
    ControlState, EntityCategory, EntityWire, GamePhase, HudMsg, SceneSnapshot,
};

/// How far ahead (world units along -z) the pilot looks
const LOOKAHEAD: f64 = 120.0;
/// Ticks of velocity to lead when steering
const VELOCITY_LEAD: f64 = 10.0;
/// Dead band around the steering target
const STEER_BAND: f64 = 0.5;
/// Extra lateral clearance kept from obstacles
const OBSTACLE_MARGIN: f64 = 4.0;
/// Never aim lower than this above the ground
const GROUND_MARGIN: f64 = 15.0;
const CRUISE_ALTITUDE: f64 = 20.0;

/// Pilot temperament; changes how eagerly it boosts and detours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PilotStyle {
    /// Boosts only with a full-ish tank and ignores far pickups
    Cautious,
    /// Boosts early and chases anything in reach
    Greedy,
}

impl PilotStyle {
    /// Minimum energy fraction before boosting
    fn boost_threshold(&self) -> f64 {
        match self {
            PilotStyle::Cautious => 0.8,
            PilotStyle::Greedy => 0.3,
        }
    }

    /// Maximum lateral detour for a pickup
    fn seek_range(&self) -> f64 {
        match self {
            PilotStyle::Cautious => 25.0,
            PilotStyle::Greedy => 60.0,
        }
    }

    pub fn random(rng: &mut impl Rng) -> Self {
        if rng.gen_bool(0.5) {
            PilotStyle::Cautious
        } else {
            PilotStyle::Greedy
        }
    }
}

#[derive(Debug)]
pub struct Autopilot {
    pub style: PilotStyle,
    config: WorldConfig,
    hud: Option<HudMsg>,
}

impl Autopilot {
    pub fn new(config: WorldConfig, style: PilotStyle) -> Self {
        Self {
            style,
            config,
            hud: None,
        }
    }

    /// Remember the latest HUD values for boost and phase decisions.
    pub fn observe_hud(&mut self, hud: HudMsg) {
        self.hud = Some(hud);
    }

    /// Whether the last HUD reported a finished run.
    pub fn run_over(&self) -> bool {
        matches!(self.hud.as_ref().map(|h| h.phase), Some(GamePhase::Over))
    }

    /// Control snapshot for the given scene.
    pub fn decide(&self, scene: &SceneSnapshot) -> ControlState {
        let [px, py, pz] = scene.aircraft.pos;
        let [vx, vy, _] = scene.aircraft.velocity;
        let ahead = |e: &&EntityWire| e.visible && e.pos[2] < pz && e.pos[2] > pz - LOOKAHEAD;

        let threat = scene
            .entities
            .iter()
            .filter(|e| e.category == EntityCategory::Obstacle)
            .filter(ahead)
            .filter(|o| {
                let clearance = o.radius.unwrap_or(1.0) + scene.aircraft.radius + OBSTACLE_MARGIN;
                lateral_distance(o.pos, [px, py]) < clearance
            })
            .max_by(|a, b| a.pos[2].total_cmp(&b.pos[2]));

        let (target_x, target_y) = match threat {
            Some(o) => {
                let clearance = o.radius.unwrap_or(1.0) + scene.aircraft.radius + OBSTACLE_MARGIN;
                // Dodge along the axis with the most room
                let away_x = if px >= o.pos[0] { 1.0 } else { -1.0 };
                let away_y = if py >= o.pos[1] { 1.0 } else { -1.0 };
                if (px - o.pos[0]).abs() >= (py - o.pos[1]).abs() {
                    (o.pos[0] + away_x * clearance * 1.5, py)
                } else {
                    (px, o.pos[1] + away_y * clearance * 1.5)
                }
            }
            None => scene
                .entities
                .iter()
                .filter(|e| matches!(e.category, EntityCategory::Star | EntityCategory::Ring))
                .filter(ahead)
                .filter(|e| lateral_distance(e.pos, [px, py]) < self.style.seek_range())
                .max_by(|a, b| a.pos[2].total_cmp(&b.pos[2]))
                .map(|e| (e.pos[0], e.pos[1]))
                .unwrap_or((px, CRUISE_ALTITUDE)),
        };

        let floor = self.config.ground_level() + GROUND_MARGIN;
        let target_y = target_y.max(floor);

        let err_x = target_x - (px + vx * VELOCITY_LEAD);
        let err_y = target_y - (py + vy * VELOCITY_LEAD);

        let mut control = ControlState {
            left: err_x < -STEER_BAND,
            right: err_x > STEER_BAND,
            up: err_y > STEER_BAND,
            down: err_y < -STEER_BAND,
            boost: false,
        };
        if py < floor {
            control.up = true;
            control.down = false;
        }

        control.boost = threat.is_none()
            && self.hud.as_ref().is_some_and(|h| {
                h.boost_max > 0.0 && h.boost_energy / h.boost_max >= self.style.boost_threshold()
            });
        control
    }
}

fn lateral_distance(pos: [f64; 3], aircraft: [f64; 2]) -> f64 {
    let dx = pos[0] - aircraft[0];
    let dy = pos[1] - aircraft[1];
    (dx * dx + dy * dy).sqrt()
}
