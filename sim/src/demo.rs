//! Headless client that flies the autopilot over the host's channels.

use crate::autopilot::{Autopilot, PilotStyle};
use crate::collaborators::score_line;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sky_voyager_shared::protocol::{ClientMsg, ControlState, CrashCause, ServerMsg};
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, mpsc};
use tokio::time::Instant;

/// Outcome of one demo round. `cause` is `None` when the round hit the time limit.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RoundResult {
    pub round: u32,
    pub distance: f64,
    pub stars: u32,
    pub cause: Option<CrashCause>,
}

/// Play `rounds` runs with the autopilot, restarting after each one.
///
/// Subscribe `rx` before the host starts so the welcome message is seen.
/// Returns early if either channel closes.
pub async fn run_demo(
    cmd_tx: mpsc::Sender<ClientMsg>,
    mut rx: broadcast::Receiver<ServerMsg>,
    rounds: u32,
    round_limit: Duration,
    seed: u64,
) -> Vec<RoundResult> {
    let mut results = Vec::new();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut pilot = loop {
        match rx.recv().await {
            Ok(ServerMsg::Welcome(w)) => {
                break Autopilot::new(w.config, PilotStyle::random(&mut rng))
            }
            Ok(_) => continue,
            Err(RecvError::Lagged(_)) => continue,
            Err(RecvError::Closed) => return results,
        }
    };
    tracing::info!("Autopilot flying {:?} for {} rounds", pilot.style, rounds);

    if cmd_tx.send(ClientMsg::Start).await.is_err() {
        return results;
    }
    let mut deadline = Instant::now() + round_limit;
    let mut last_control = ControlState::default();
    let mut last_hud = None;

    while (results.len() as u32) < rounds {
        let msg = tokio::select! {
            msg = rx.recv() => msg,
            _ = tokio::time::sleep_until(deadline) => {
                let round = results.len() as u32 + 1;
                let (distance, stars) = last_hud.unwrap_or((0.0, 0));
                tracing::info!("Round {} timed out: {}", round, score_line(distance, stars));
                results.push(RoundResult { round, distance, stars, cause: None });
                if results.len() as u32 == rounds {
                    break;
                }
                if cmd_tx.send(ClientMsg::Restart).await.is_err() {
                    break;
                }
                deadline = Instant::now() + round_limit;
                continue;
            }
        };

        match msg {
            Ok(ServerMsg::Hud(hud)) => {
                last_hud = Some((hud.distance, hud.stars));
                pilot.observe_hud(hud);
            }
            Ok(ServerMsg::Scene(scene)) => {
                if pilot.run_over() {
                    continue;
                }
                let control = pilot.decide(&scene);
                if control != last_control {
                    last_control = control;
                    if cmd_tx.send(ClientMsg::Control(control)).await.is_err() {
                        break;
                    }
                }
            }
            Ok(ServerMsg::GameOver(over)) => {
                let round = results.len() as u32 + 1;
                tracing::info!(
                    "Round {} over ({:?}): {}",
                    round,
                    over.cause,
                    score_line(over.distance, over.stars)
                );
                results.push(RoundResult {
                    round,
                    distance: over.distance,
                    stars: over.stars,
                    cause: Some(over.cause),
                });
                if (results.len() as u32) < rounds {
                    pilot.style = PilotStyle::random(&mut rng);
                    last_hud = None;
                    if cmd_tx.send(ClientMsg::Restart).await.is_err() {
                        break;
                    }
                    deadline = Instant::now() + round_limit;
                }
            }
            Ok(ServerMsg::Status(status)) => tracing::debug!("{}", status.message),
            Ok(_) => {}
            Err(RecvError::Lagged(n)) => tracing::warn!("Autopilot lagged {} messages", n),
            Err(RecvError::Closed) => break,
        }
    }

    results
}
