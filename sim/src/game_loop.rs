use crate::collaborators::Collaborators;
use crate::config::SessionConfig;
use crate::session::GameSession;
use sky_voyager_shared::protocol::{
    ClientMsg, ControlState, ServerMsg, WelcomeMsg, PROTOCOL_VERSION,
};
use tokio::sync::{broadcast, mpsc};
use tokio::time::Instant;

/// Run the session host. Owns the session; returns once the command channel
/// closes.
pub async fn run_game_loop(
    mut cmd_rx: mpsc::Receiver<ClientMsg>,
    broadcast_tx: broadcast::Sender<ServerMsg>,
    config: SessionConfig,
) {
    let mut session = GameSession::new(&config);
    let mut collaborators = Collaborators::broadcast(broadcast_tx.clone());

    let _ = broadcast_tx.send(ServerMsg::Welcome(WelcomeMsg {
        protocol_version: PROTOCOL_VERSION,
        config: config.world,
    }));

    let mut tick_count: u64 = 0;
    let epoch = Instant::now();
    // Latest input; copied into the session at each tick
    let mut control = ControlState::default();

    let mut tick_interval = tokio::time::interval(config.tick_duration());
    tick_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    tracing::info!("Game loop running at {} Hz", config.tick_rate_hz);

    loop {
        tokio::select! {
            _ = tick_interval.tick(), if session.is_live() => {
                session.tick(epoch.elapsed().as_secs_f64(), control);
                collaborators.present_events(&mut session);
                collaborators.present_frame(&session);
                tick_count += 1;
            }

            cmd = cmd_rx.recv() => {
                let Some(cmd) = cmd else { break };
                let now = epoch.elapsed().as_secs_f64();
                match cmd {
                    ClientMsg::Control(c) => {
                        control = c;
                        continue;
                    }
                    ClientMsg::Start => {
                        session.start(now);
                        tick_interval.reset();
                    }
                    ClientMsg::Restart => {
                        session.restart(now);
                        tick_interval.reset();
                    }
                    ClientMsg::TogglePause => session.toggle_pause(),
                }
                collaborators.present_events(&mut session);
                collaborators.present_frame(&session);
            }
        }
    }

    let score = session.score();
    tracing::info!(
        "Game loop ended after {} ticks (distance {:.0}, stars {})",
        tick_count,
        score.distance,
        score.stars
    );
}
