use crate::boost::{BoostEdge, BoostEnergy};
use crate::collision::{self, CollisionReport};
use crate::config::SessionConfig;
use crate::entity::Aircraft;
use crate::events::{FrameEvent, PlayOptions};
use crate::physics::{self, BoundaryContact};
use crate::registry::WorldObjectRegistry;
use crate::spawn::SpawnScheduler;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sky_voyager_shared::config::WorldConfig;
use sky_voyager_shared::protocol::{
    round4, round4_array, AudioCue, ControlState, CrashCause, EntityCategory, GamePhase, HudMsg,
    SceneSnapshot,
};
use sky_voyager_shared::vec3::{add, vec3};

const ENGINE_VOLUME: f64 = 0.3;
const BOOST_VOLUME: f64 = 0.3;
const EFFECT_VOLUME: f64 = 0.5;

/// Entities advance and despawn in this order each tick.
const MOVING: [EntityCategory; 4] = [
    EntityCategory::Star,
    EntityCategory::Obstacle,
    EntityCategory::Ring,
    EntityCategory::Cloud,
];
const SPAWNED: [EntityCategory; 3] = [
    EntityCategory::Star,
    EntityCategory::Obstacle,
    EntityCategory::Ring,
];

#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize)]
pub struct Score {
    pub distance: f64,
    pub stars: u32,
}

/// One play session: phase machine, score, boost pool, aircraft and world.
///
/// Time is passed in as monotonic seconds; the session never reads a clock.
pub struct GameSession {
    world: WorldConfig,
    phase: GamePhase,
    score: Score,
    speed: f64,
    boost: BoostEnergy,
    aircraft: Aircraft,
    registry: WorldObjectRegistry,
    spawner: SpawnScheduler,
    rng: ChaCha8Rng,
    last_time: f64,
    frame: u32,
    /// Reusable buffer, drained by the host after each tick
    events: Vec<FrameEvent>,
}

impl GameSession {
    pub fn new(config: &SessionConfig) -> Self {
        let world = config.world;
        let mut rng = ChaCha8Rng::seed_from_u64(config.rng_seed);
        let spawner = SpawnScheduler::new(world);
        let mut registry = WorldObjectRegistry::new();
        registry.populate_clouds(world.cloud_count as usize, &spawner, &world, &mut rng);

        Self {
            world,
            phase: GamePhase::NotStarted,
            score: Score::default(),
            speed: world.base_speed,
            boost: BoostEnergy::new(world.max_boost_energy),
            aircraft: Aircraft::default(),
            registry,
            spawner,
            rng,
            last_time: 0.0,
            frame: 0,
            events: Vec::new(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Whether ticks do anything (Running or Paused).
    pub fn is_live(&self) -> bool {
        matches!(self.phase, GamePhase::Running | GamePhase::Paused)
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn boost(&self) -> &BoostEnergy {
        &self.boost
    }

    pub fn aircraft(&self) -> &Aircraft {
        &self.aircraft
    }

    pub fn registry(&self) -> &WorldObjectRegistry {
        &self.registry
    }

    pub fn world(&self) -> &WorldConfig {
        &self.world
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Begin a run. Ignored while a run is already live.
    pub fn start(&mut self, now: f64) {
        if self.is_live() {
            return;
        }
        self.score = Score::default();
        self.boost.reset();
        self.speed = self.world.base_speed;
        self.last_time = now;
        self.phase = GamePhase::Running;
        self.events.push(FrameEvent::PlayCue {
            cue: AudioCue::Engine,
            options: PlayOptions::looping(ENGINE_VOLUME),
        });
        tracing::info!("Run started");
    }

    /// Reset the world and begin a new run from any phase.
    pub fn restart(&mut self, now: f64) {
        if self.is_live() {
            self.events.push(FrameEvent::StopCue {
                cue: AudioCue::Engine,
            });
            if self.boost.is_active() {
                self.events.push(FrameEvent::StopCue {
                    cue: AudioCue::Boost,
                });
            }
        }
        self.registry.clear_hazards();
        self.registry.rewind_clouds(&self.world, &mut self.rng);
        self.aircraft.reset();
        self.phase = GamePhase::NotStarted;
        tracing::info!("Restarting");
        self.start(now);
    }

    /// Flip between Running and Paused; a no-op in any other phase.
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            GamePhase::Running => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Running,
            _ => return,
        };
        tracing::info!("Phase now {:?}", self.phase);
    }

    /// End the current run. Only acts while Running.
    pub fn game_over(&mut self, cause: CrashCause) {
        if self.phase != GamePhase::Running {
            return;
        }
        self.phase = GamePhase::Over;
        self.events.push(FrameEvent::StopCue {
            cue: AudioCue::Engine,
        });
        self.events.push(FrameEvent::StopCue {
            cue: AudioCue::Boost,
        });
        self.events.push(FrameEvent::PlayCue {
            cue: AudioCue::Explosion,
            options: PlayOptions::once(EFFECT_VOLUME),
        });
        self.events.push(FrameEvent::GameOver {
            distance: self.score.distance,
            stars: self.score.stars,
            cause,
        });
        tracing::info!(
            "Game over ({:?}): distance {:.0}, stars {}",
            cause,
            self.score.distance,
            self.score.stars
        );
    }

    /// Advance the simulation to `now` using the control snapshot taken at
    /// tick start.
    pub fn tick(&mut self, now: f64, control: ControlState) {
        if !self.is_live() {
            return;
        }
        let delta = (now - self.last_time).clamp(0.0, self.world.max_delta);
        self.last_time = now;
        if self.phase == GamePhase::Paused {
            return;
        }
        self.frame = self.frame.wrapping_add(1);

        // Distance uses last tick's speed
        self.score.distance += self.speed * delta;

        let boost = self.boost.update(control.boost, delta, &self.world);
        self.speed = boost.speed;
        match boost.edge {
            Some(BoostEdge::Started) => self.events.push(FrameEvent::PlayCue {
                cue: AudioCue::Boost,
                options: PlayOptions::looping(BOOST_VOLUME),
            }),
            Some(BoostEdge::Stopped) => self.events.push(FrameEvent::StopCue {
                cue: AudioCue::Boost,
            }),
            None => {}
        }

        if physics::integrate(&mut self.aircraft, &control, delta, &self.world)
            == BoundaryContact::Ground
        {
            self.game_over(CrashCause::Ground);
            return;
        }

        for category in MOVING {
            self.registry.advance(category, self.speed, delta);
            self.registry.despawn_pass(
                category,
                self.world.despawn_distance,
                &self.world,
                &mut self.rng,
            );
        }

        for category in SPAWNED {
            let active = self.registry.count(category);
            if let Some(mut entity) = self.spawner.try_spawn(category, 0, active, &mut self.rng) {
                entity.id = self.registry.allocate_id();
                tracing::debug!("Spawned {:?} {}", category, entity.id);
                self.registry.insert(entity);
            }
        }

        let report = collision::resolve(&self.aircraft, &mut self.registry, &self.world);
        self.apply_collisions(&report);
    }

    fn apply_collisions(&mut self, report: &CollisionReport) {
        if report.is_empty() {
            return;
        }
        for _ in &report.collected_stars {
            self.score.stars += self.world.star_bonus;
            self.events.push(FrameEvent::PlayCue {
                cue: AudioCue::Collect,
                options: PlayOptions::once(EFFECT_VOLUME),
            });
            self.events.push(FrameEvent::status(format!(
                "Star collected! +{}",
                self.world.star_bonus
            )));
        }
        for _ in &report.ring_bonuses {
            self.score.stars += self.world.ring_bonus;
            self.events.push(FrameEvent::PlayCue {
                cue: AudioCue::Ring,
                options: PlayOptions::once(EFFECT_VOLUME),
            });
            self.events.push(FrameEvent::status(format!(
                "Ring bonus! +{} stars",
                self.world.ring_bonus
            )));
        }
        if report.fatal.is_some() {
            self.game_over(CrashCause::Obstacle);
        }
    }

    /// Take every event queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<FrameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Camera follows the aircraft from behind and above.
    pub fn scene_snapshot(&self) -> SceneSnapshot {
        let pos = self.aircraft.pos;
        SceneSnapshot {
            aircraft: self.aircraft.to_wire(),
            camera_eye: round4_array(add(pos, vec3(0.0, 5.0, 10.0)).to_array()),
            camera_target: round4_array(add(pos, vec3(0.0, 0.0, -10.0)).to_array()),
            entities: self.registry.iter_all().map(|e| e.to_wire()).collect(),
        }
    }

    /// Score, speed and boost gauge for the HUD.
    pub fn hud_msg(&self) -> HudMsg {
        HudMsg {
            frame: self.frame,
            phase: self.phase,
            distance: round4(self.score.distance),
            stars: self.score.stars,
            speed: self.speed,
            boost_energy: round4(self.boost.current()),
            boost_max: self.boost.max(),
            boost_active: self.boost.is_active(),
        }
    }
}
