use sky_voyager_shared::protocol::{ClientMsg, ServerMsg};
use sky_voyager_sim::config::SessionConfig;
use sky_voyager_sim::demo::run_demo;
use sky_voyager_sim::game_loop::run_game_loop;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};

const DEMO_ROUNDS: u32 = 3;
/// Wall-clock cap per round, in case the autopilot never crashes
const ROUND_LIMIT: Duration = Duration::from_secs(120);

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = SessionConfig::default();

    // Validate configuration before starting
    if let Err(e) = config.validate() {
        eprintln!("Invalid session configuration: {}", e);
        std::process::exit(1);
    }

    let seed = config.rng_seed;
    let (cmd_tx, cmd_rx) = mpsc::channel::<ClientMsg>(256);
    let (broadcast_tx, broadcast_rx) = broadcast::channel::<ServerMsg>(256);

    // Spawn game loop
    let game = tokio::spawn(async move {
        run_game_loop(cmd_rx, broadcast_tx, config).await;
    });

    tracing::info!("Starting headless Sky Voyager demo");
    let results = run_demo(cmd_tx, broadcast_rx, DEMO_ROUNDS, ROUND_LIMIT, seed).await;

    // run_demo dropped the command sender, so the loop winds down
    if let Err(e) = game.await {
        tracing::warn!("Game loop task failed: {}", e);
    }

    match serde_json::to_string_pretty(&results) {
        Ok(json) => tracing::info!("Final scores:\n{}", json),
        Err(e) => tracing::warn!("Failed to serialize scores: {}", e),
    }
}
