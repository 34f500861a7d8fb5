use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::config::WorldConfig;

/// Protocol version - increment when making breaking changes.
pub const PROTOCOL_VERSION: u32 = 1;

// === Shared enums ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../web/src/generated/")]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    NotStarted,
    Running,
    Paused,
    Over,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../web/src/generated/")]
#[serde(rename_all = "snake_case")]
pub enum EntityCategory {
    Aircraft,
    Star,
    Obstacle,
    Ring,
    Cloud,
}

/// Named audio cues. The audio collaborator maps these to assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../web/src/generated/")]
#[serde(rename_all = "snake_case")]
pub enum AudioCue {
    Engine,
    Boost,
    Collect,
    Explosion,
    Ring,
}

impl AudioCue {
    pub fn name(&self) -> &'static str {
        match self {
            AudioCue::Engine => "engine",
            AudioCue::Boost => "boost",
            AudioCue::Collect => "collect",
            AudioCue::Explosion => "explosion",
            AudioCue::Ring => "ring",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../web/src/generated/")]
#[serde(rename_all = "snake_case")]
pub enum CrashCause {
    Ground,
    Obstacle,
}

/// Normalized input snapshot. Missing fields mean "not pressed".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../web/src/generated/")]
#[serde(default)]
pub struct ControlState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub boost: bool,
}

// === Host -> Collaborators ===

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../web/src/generated/")]
#[serde(tag = "type")]
pub enum ServerMsg {
    #[serde(rename = "welcome")]
    Welcome(WelcomeMsg),
    #[serde(rename = "hud")]
    Hud(HudMsg),
    #[serde(rename = "scene")]
    Scene(SceneSnapshot),
    #[serde(rename = "play_cue")]
    PlayCue(PlayCueMsg),
    #[serde(rename = "stop_cue")]
    StopCue { cue: AudioCue },
    #[serde(rename = "status")]
    Status(StatusMsg),
    #[serde(rename = "game_over")]
    GameOver(GameOverMsg),
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../web/src/generated/")]
#[serde(rename_all = "camelCase")]
pub struct WelcomeMsg {
    pub protocol_version: u32,
    pub config: WorldConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../web/src/generated/")]
#[serde(rename_all = "camelCase")]
pub struct HudMsg {
    pub frame: u32,
    pub phase: GamePhase,
    pub distance: f64,
    pub stars: u32,
    pub speed: f64,
    pub boost_energy: f64,
    pub boost_max: f64,
    pub boost_active: bool,
}

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../web/src/generated/")]
#[serde(rename_all = "camelCase")]
pub struct SceneSnapshot {
    pub aircraft: AircraftWire,
    pub camera_eye: [f64; 3],
    pub camera_target: [f64; 3],
    pub entities: Vec<EntityWire>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../web/src/generated/")]
#[serde(rename_all = "camelCase")]
pub struct AircraftWire {
    pub pos: [f64; 3],
    pub velocity: [f64; 3],
    pub rotation: [f64; 3],
    pub propeller_angle: f64,
    pub radius: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../web/src/generated/")]
#[serde(rename_all = "camelCase")]
pub struct EntityWire {
    pub id: u32,
    pub category: EntityCategory,
    pub pos: [f64; 3],
    pub rotation: [f64; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    /// Cloud scale, ring glow intensity; 1.0 otherwise
    pub intensity: f64,
    pub visible: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../web/src/generated/")]
#[serde(rename_all = "camelCase")]
pub struct PlayCueMsg {
    pub cue: AudioCue,
    #[serde(default)]
    pub looped: bool,
    pub volume: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../web/src/generated/")]
#[serde(rename_all = "camelCase")]
pub struct StatusMsg {
    pub message: String,
    pub duration_ms: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../web/src/generated/")]
#[serde(rename_all = "camelCase")]
pub struct GameOverMsg {
    pub distance: f64,
    pub stars: u32,
    pub cause: CrashCause,
}

// === Collaborators -> Host ===

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../web/src/generated/")]
#[serde(tag = "type")]
pub enum ClientMsg {
    #[serde(rename = "start")]
    Start,
    #[serde(rename = "restart")]
    Restart,
    #[serde(rename = "toggle_pause")]
    TogglePause,
    #[serde(rename = "control")]
    Control(ControlState),
}

// === Conversion helpers ===

/// Round to 4 decimal places (keeps JSON frames compact)
#[inline]
pub fn round4(v: f64) -> f64 {
    (v * 10000.0).round() / 10000.0
}

/// Round each component of a wire vector.
#[inline]
pub fn round4_array(v: [f64; 3]) -> [f64; 3] {
    [round4(v[0]), round4(v[1]), round4(v[2])]
}
