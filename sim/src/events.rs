use sky_voyager_shared::protocol::{
    AudioCue, CrashCause, GameOverMsg, PlayCueMsg, ServerMsg, StatusMsg,
};

/// Duration of transient status messages.
pub const STATUS_DURATION_MS: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayOptions {
    pub looped: bool,
    pub volume: f64,
}

impl PlayOptions {
    pub fn once(volume: f64) -> Self {
        Self {
            looped: false,
            volume,
        }
    }

    pub fn looping(volume: f64) -> Self {
        Self {
            looped: true,
            volume,
        }
    }
}

/// Side effects produced by the session during a tick, drained by the host
/// and handed to the audio and status collaborators.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameEvent {
    PlayCue { cue: AudioCue, options: PlayOptions },
    StopCue { cue: AudioCue },
    Status { message: String, duration_ms: u32 },
    GameOver {
        distance: f64,
        stars: u32,
        cause: CrashCause,
    },
}

impl FrameEvent {
    pub fn status(message: impl Into<String>) -> Self {
        FrameEvent::Status {
            message: message.into(),
            duration_ms: STATUS_DURATION_MS,
        }
    }

    pub fn to_server_msg(&self) -> ServerMsg {
        match self {
            FrameEvent::PlayCue { cue, options } => ServerMsg::PlayCue(PlayCueMsg {
                cue: *cue,
                looped: options.looped,
                volume: options.volume,
            }),
            FrameEvent::StopCue { cue } => ServerMsg::StopCue { cue: *cue },
            FrameEvent::Status {
                message,
                duration_ms,
            } => ServerMsg::Status(StatusMsg {
                message: message.clone(),
                duration_ms: *duration_ms,
            }),
            FrameEvent::GameOver {
                distance,
                stars,
                cause,
            } => ServerMsg::GameOver(GameOverMsg {
                distance: *distance,
                stars: *stars,
                cause: *cause,
            }),
        }
    }
}
