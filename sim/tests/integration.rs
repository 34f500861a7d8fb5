//! Integration tests for the simulation host.
//!
//! These tests spawn a real game loop task and drive it over its command and
//! broadcast channels, the same way a client would.

use sky_voyager_shared::protocol::{
    AudioCue, ClientMsg, ControlState, CrashCause, GamePhase, ServerMsg,
};
use sky_voyager_sim::config::SessionConfig;
use sky_voyager_sim::demo::run_demo;
use sky_voyager_sim::game_loop::run_game_loop;
use sky_voyager_sim::input::InputMapper;
use std::time::Duration;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

struct TestHost {
    cmd_tx: mpsc::Sender<ClientMsg>,
    rx: broadcast::Receiver<ServerMsg>,
    handle: JoinHandle<()>,
}

fn start_host(config: SessionConfig) -> TestHost {
    let (cmd_tx, cmd_rx) = mpsc::channel::<ClientMsg>(256);
    let (broadcast_tx, rx) = broadcast::channel::<ServerMsg>(1024);
    let handle = tokio::spawn(async move {
        run_game_loop(cmd_rx, broadcast_tx, config).await;
    });
    TestHost { cmd_tx, rx, handle }
}

/// Quiet world so runs only end when the test wants them to.
fn empty_world() -> SessionConfig {
    let mut config = SessionConfig {
        rng_seed: 12345,
        ..Default::default()
    };
    config.world.star_spawn_rate = 0.0;
    config.world.obstacle_spawn_rate = 0.0;
    config.world.ring_spawn_rate = 0.0;
    config
}

/// Receive until `pred` matches or `timeout` elapses.
async fn recv_until<F>(
    rx: &mut broadcast::Receiver<ServerMsg>,
    timeout: Duration,
    mut pred: F,
) -> Option<ServerMsg>
where
    F: FnMut(&ServerMsg) -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        match tokio::time::timeout_at(deadline, rx.recv()).await {
            Ok(Ok(msg)) if pred(&msg) => return Some(msg),
            Ok(Ok(_)) | Ok(Err(RecvError::Lagged(_))) => continue,
            Ok(Err(RecvError::Closed)) | Err(_) => return None,
        }
    }
}

fn hud_phase(msg: &ServerMsg) -> Option<GamePhase> {
    match msg {
        ServerMsg::Hud(h) => Some(h.phase),
        _ => None,
    }
}

#[tokio::test]
async fn test_welcome_carries_world_config() {
    let mut host = start_host(SessionConfig::default());
    let msg = recv_until(&mut host.rx, Duration::from_secs(1), |m| {
        matches!(m, ServerMsg::Welcome(_))
    })
    .await
    .expect("Should receive welcome");
    match msg {
        ServerMsg::Welcome(w) => {
            assert_eq!(w.protocol_version, 1);
            assert_eq!(w.config.spawn_distance, -200.0);
            assert_eq!(w.config.bounds_y, [-50.0, 100.0]);
        }
        _ => unreachable!(),
    }
}

#[tokio::test]
async fn test_nothing_ticks_before_start() {
    let mut host = start_host(SessionConfig::default());
    recv_until(&mut host.rx, Duration::from_secs(1), |m| {
        matches!(m, ServerMsg::Welcome(_))
    })
    .await
    .expect("Should receive welcome");
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(matches!(host.rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_start_plays_engine_and_streams_frames() {
    let mut host = start_host(empty_world());
    host.cmd_tx.send(ClientMsg::Start).await.unwrap();

    let cue = recv_until(&mut host.rx, Duration::from_secs(1), |m| {
        matches!(m, ServerMsg::PlayCue(_))
    })
    .await
    .expect("Should receive engine cue");
    match cue {
        ServerMsg::PlayCue(c) => {
            assert_eq!(c.cue, AudioCue::Engine);
            assert!(c.looped);
        }
        _ => unreachable!(),
    }

    let mut huds = 0;
    let mut scenes = 0;
    while huds < 3 || scenes < 3 {
        match recv_until(&mut host.rx, Duration::from_secs(1), |m| {
            matches!(m, ServerMsg::Hud(_) | ServerMsg::Scene(_))
        })
        .await
        .expect("Should keep streaming frames")
        {
            ServerMsg::Hud(h) => {
                assert_eq!(h.phase, GamePhase::Running);
                huds += 1;
            }
            ServerMsg::Scene(s) => {
                assert_eq!(s.entities.len(), 30, "only clouds in an empty world");
                scenes += 1;
            }
            _ => unreachable!(),
        }
    }
}

#[tokio::test]
async fn test_every_tick_reaches_score_display() {
    let mut host = start_host(empty_world());
    host.cmd_tx.send(ClientMsg::Start).await.unwrap();

    let mut frames = Vec::new();
    while frames.len() < 20 {
        match recv_until(&mut host.rx, Duration::from_secs(1), |m| {
            matches!(m, ServerMsg::Hud(_))
        })
        .await
        .expect("Should keep streaming HUD updates")
        {
            ServerMsg::Hud(h) => {
                assert_eq!(h.phase, GamePhase::Running);
                frames.push(h.frame);
            }
            _ => unreachable!(),
        }
    }
    for pair in frames.windows(2) {
        assert_eq!(pair[1], pair[0] + 1, "HUD skipped a frame: {:?}", frames);
    }
}

#[tokio::test]
async fn test_control_input_moves_aircraft() {
    let mut host = start_host(empty_world());
    host.cmd_tx.send(ClientMsg::Start).await.unwrap();
    host.cmd_tx
        .send(ClientMsg::Control(ControlState {
            up: true,
            right: true,
            ..Default::default()
        }))
        .await
        .unwrap();

    let climbed = recv_until(&mut host.rx, Duration::from_secs(3), |m| match m {
        ServerMsg::Scene(s) => s.aircraft.pos[1] > 5.0 && s.aircraft.pos[0] > 5.0,
        _ => false,
    })
    .await;
    assert!(climbed.is_some(), "Aircraft should climb and bank right");
}

#[tokio::test]
async fn test_falling_aircraft_crashes_and_loop_idles() {
    let mut host = start_host(empty_world());
    host.cmd_tx.send(ClientMsg::Start).await.unwrap();

    let over = recv_until(&mut host.rx, Duration::from_secs(5), |m| {
        matches!(m, ServerMsg::GameOver(_))
    })
    .await
    .expect("Neutral input should end in a ground crash");
    match over {
        ServerMsg::GameOver(g) => {
            assert_eq!(g.cause, CrashCause::Ground);
            assert!(g.distance > 0.0);
        }
        _ => unreachable!(),
    }

    let final_hud = recv_until(&mut host.rx, Duration::from_secs(1), |m| {
        hud_phase(m).is_some()
    })
    .await
    .expect("Should publish the final frame");
    assert_eq!(hud_phase(&final_hud), Some(GamePhase::Over));
    recv_until(&mut host.rx, Duration::from_millis(100), |m| {
        matches!(m, ServerMsg::Scene(_))
    })
    .await;

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(
        matches!(host.rx.try_recv(), Err(TryRecvError::Empty)),
        "No ticks after game over"
    );
}

#[tokio::test]
async fn test_restart_after_crash_resumes_running() {
    let mut host = start_host(empty_world());
    host.cmd_tx.send(ClientMsg::Start).await.unwrap();
    recv_until(&mut host.rx, Duration::from_secs(5), |m| {
        matches!(m, ServerMsg::GameOver(_))
    })
    .await
    .expect("Should crash");

    host.cmd_tx.send(ClientMsg::Restart).await.unwrap();
    let hud = recv_until(&mut host.rx, Duration::from_secs(1), |m| {
        hud_phase(m) == Some(GamePhase::Running)
    })
    .await
    .expect("Restart should resume running");
    match hud {
        ServerMsg::Hud(h) => {
            assert_eq!(h.stars, 0);
            assert!(h.distance < 5.0);
            assert_eq!(h.boost_energy, 100.0);
        }
        _ => unreachable!(),
    }
}

#[tokio::test]
async fn test_pause_freezes_distance() {
    let mut host = start_host(empty_world());
    let mut input = InputMapper::new();
    host.cmd_tx.send(ClientMsg::Start).await.unwrap();
    input.key_down("w");
    host.cmd_tx.send(input.control_msg()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    let pause = input.key_down("p").expect("p is the pause key");
    host.cmd_tx.send(pause.into()).await.unwrap();
    let paused = recv_until(&mut host.rx, Duration::from_secs(1), |m| {
        hud_phase(m) == Some(GamePhase::Paused)
    })
    .await
    .expect("Should report paused");
    let frozen = match paused {
        ServerMsg::Hud(h) => h.distance,
        _ => unreachable!(),
    };

    tokio::time::sleep(Duration::from_millis(300)).await;
    let mut later = None;
    while let Ok(msg) = host.rx.try_recv() {
        if let ServerMsg::Hud(h) = msg {
            later = Some(h.distance);
        }
    }
    if let Some(d) = later {
        assert_eq!(d, frozen);
    }

    let pause = input.key_down("p").expect("p is the pause key");
    host.cmd_tx.send(pause.into()).await.unwrap();
    let resumed = recv_until(&mut host.rx, Duration::from_secs(1), |m| match m {
        ServerMsg::Hud(h) => h.phase == GamePhase::Running && h.distance > frozen,
        _ => false,
    })
    .await
    .expect("Should resume");
    match resumed {
        // No catch-up jump after the pause
        ServerMsg::Hud(h) => assert!(h.distance - frozen < 5.0),
        _ => unreachable!(),
    }
}

#[tokio::test]
async fn test_loop_ends_when_commands_close() {
    let host = start_host(SessionConfig::default());
    host.cmd_tx.send(ClientMsg::Start).await.unwrap();
    drop(host.cmd_tx);
    let joined = tokio::time::timeout(Duration::from_secs(1), host.handle).await;
    assert!(joined.is_ok(), "Game loop should stop after channel close");
}

#[tokio::test]
async fn test_demo_plays_requested_rounds() {
    let (cmd_tx, cmd_rx) = mpsc::channel::<ClientMsg>(256);
    let (broadcast_tx, rx) = broadcast::channel::<ServerMsg>(1024);
    let handle = tokio::spawn(async move {
        run_game_loop(cmd_rx, broadcast_tx, SessionConfig::default()).await;
    });

    let results = tokio::time::timeout(
        Duration::from_secs(10),
        run_demo(cmd_tx, rx, 2, Duration::from_millis(500), 7),
    )
    .await
    .expect("Demo should finish");

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].round, 1);
    assert_eq!(results[1].round, 2);
    for r in &results {
        assert!(r.distance >= 0.0);
    }

    let joined = tokio::time::timeout(Duration::from_secs(1), handle).await;
    assert!(joined.is_ok());
}
