//! Output seams between the simulation and whatever presents it.
//!
//! The session never calls these directly. After every tick the host drains
//! the session's frame events and samples its HUD and scene, handing both to a
//! [`Collaborators`] bundle.

use crate::events::{FrameEvent, PlayOptions};
use crate::session::GameSession;
use sky_voyager_shared::protocol::{
    AudioCue, CrashCause, GameOverMsg, HudMsg, PlayCueMsg, SceneSnapshot, ServerMsg, StatusMsg,
};
use tokio::sync::broadcast;

pub trait Renderer: Send {
    fn present(&mut self, scene: &SceneSnapshot);
}

/// Fire-and-forget named cues. Failures are reported but never fatal.
pub trait AudioOutput: Send {
    fn play(&mut self, cue: AudioCue, options: PlayOptions) -> Result<(), String>;
    fn stop(&mut self, cue: AudioCue) -> Result<(), String>;
}

pub trait StatusDisplay: Send {
    fn show(&mut self, message: &str, duration_ms: u32);
}

pub trait ScoreDisplay: Send {
    fn update(&mut self, hud: &HudMsg);
    fn game_over(&mut self, distance: f64, stars: u32, cause: CrashCause);
}

pub struct Collaborators {
    renderer: Box<dyn Renderer>,
    audio: Box<dyn AudioOutput>,
    status: Box<dyn StatusDisplay>,
    score: Box<dyn ScoreDisplay>,
}

impl Collaborators {
    pub fn new(
        renderer: Box<dyn Renderer>,
        audio: Box<dyn AudioOutput>,
        status: Box<dyn StatusDisplay>,
        score: Box<dyn ScoreDisplay>,
    ) -> Self {
        Self {
            renderer,
            audio,
            status,
            score,
        }
    }

    /// Every collaborator publishes onto the host's broadcast channel.
    pub fn broadcast(tx: broadcast::Sender<ServerMsg>) -> Self {
        let sink = BroadcastSink { tx };
        Self::new(
            Box::new(sink.clone()),
            Box::new(sink.clone()),
            Box::new(sink.clone()),
            Box::new(sink),
        )
    }

    /// Drain the session's pending events and dispatch them in order.
    /// Returns how many were presented.
    pub fn present_events(&mut self, session: &mut GameSession) -> usize {
        let events = session.drain_events();
        for event in &events {
            match event {
                FrameEvent::PlayCue { cue, options } => {
                    if let Err(e) = self.audio.play(*cue, *options) {
                        tracing::warn!("Failed to play {} cue: {}", cue.name(), e);
                    }
                }
                FrameEvent::StopCue { cue } => {
                    if let Err(e) = self.audio.stop(*cue) {
                        tracing::warn!("Failed to stop {} cue: {}", cue.name(), e);
                    }
                }
                FrameEvent::Status {
                    message,
                    duration_ms,
                } => self.status.show(message, *duration_ms),
                FrameEvent::GameOver {
                    distance,
                    stars,
                    cause,
                } => self.score.game_over(*distance, *stars, *cause),
            }
        }
        events.len()
    }

    /// Push the current HUD values and scene.
    pub fn present_frame(&mut self, session: &GameSession) {
        self.score.update(&session.hud_msg());
        self.renderer.present(&session.scene_snapshot());
    }
}

/// Adapter that turns collaborator calls into [`ServerMsg`]s.
#[derive(Clone)]
pub struct BroadcastSink {
    tx: broadcast::Sender<ServerMsg>,
}

impl BroadcastSink {
    fn send(&self, msg: ServerMsg) {
        // No subscribers is not an error
        let _ = self.tx.send(msg);
    }
}

impl Renderer for BroadcastSink {
    fn present(&mut self, scene: &SceneSnapshot) {
        self.send(ServerMsg::Scene(scene.clone()));
    }
}

impl AudioOutput for BroadcastSink {
    fn play(&mut self, cue: AudioCue, options: PlayOptions) -> Result<(), String> {
        self.send(ServerMsg::PlayCue(PlayCueMsg {
            cue,
            looped: options.looped,
            volume: options.volume,
        }));
        Ok(())
    }

    fn stop(&mut self, cue: AudioCue) -> Result<(), String> {
        self.send(ServerMsg::StopCue { cue });
        Ok(())
    }
}

impl StatusDisplay for BroadcastSink {
    fn show(&mut self, message: &str, duration_ms: u32) {
        self.send(ServerMsg::Status(StatusMsg {
            message: message.to_string(),
            duration_ms,
        }));
    }
}

impl ScoreDisplay for BroadcastSink {
    fn update(&mut self, hud: &HudMsg) {
        self.send(ServerMsg::Hud(hud.clone()));
    }

    fn game_over(&mut self, distance: f64, stars: u32, cause: CrashCause) {
        self.send(ServerMsg::GameOver(GameOverMsg {
            distance,
            stars,
            cause,
        }));
    }
}

/// Floor `value` and group its digits by thousands: `12345.9` -> `"12,345"`.
pub fn format_thousands(value: f64) -> String {
    let whole = value.floor();
    if !whole.is_finite() {
        return whole.to_string();
    }
    let digits = format!("{}", whole.abs() as u64);
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if whole < 0.0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// One-line score summary, as shown on the game-over screen.
pub fn score_line(distance: f64, stars: u32) -> String {
    format!("Distance: {} m  Stars: {}", format_thousands(distance), stars)
}
