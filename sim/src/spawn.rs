use crate::entity::{EntityKind, SpatialEntity};
use rand::Rng;
use sky_voyager_shared::config::WorldConfig;
use sky_voyager_shared::protocol::EntityCategory;
use sky_voyager_shared::vec3::Vec3;
use std::f64::consts::{FRAC_PI_2, TAU};

/// Sub-range of the world's x/y bounds that a category spawns into.
/// Tighter than the full bounds so objects stay on reachable flight paths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnLane {
    pub x: [f64; 2],
    pub y: [f64; 2],
}

impl SpawnLane {
    pub fn for_category(category: EntityCategory, config: &WorldConfig) -> Self {
        let [x0, x1] = config.bounds_x;
        let [y0, y1] = config.bounds_y;
        match category {
            EntityCategory::Star => Self {
                x: [x0 * 0.8, x1 * 0.8],
                y: [y0 + 10.0, y1 * 0.8],
            },
            EntityCategory::Obstacle => Self {
                x: [x0 * 0.8, x1 * 0.8],
                y: [y0 + 5.0, y1 * 0.5],
            },
            EntityCategory::Ring => Self {
                x: [x0 * 0.6, x1 * 0.6],
                y: [y0 + 15.0, y1 * 0.7],
            },
            EntityCategory::Cloud => Self {
                x: [x0, x1],
                y: [y0 + 20.0, y1],
            },
            EntityCategory::Aircraft => Self {
                x: [x0, x1],
                y: [y0, y1],
            },
        }
    }

    /// Uniform (x, y) inside the lane.
    pub fn sample(&self, rng: &mut impl Rng) -> (f64, f64) {
        (
            random_between(rng, self.x[0], self.x[1]),
            random_between(rng, self.y[0], self.y[1]),
        )
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x[0] && x <= self.x[1] && y >= self.y[0] && y <= self.y[1]
    }
}

/// Uniform float in `[min, max)`; returns `min` for an empty range.
pub fn random_between(rng: &mut impl Rng, min: f64, max: f64) -> f64 {
    min + rng.gen::<f64>() * (max - min)
}

/// Per-frame probabilistic spawner for stars, obstacles and rings.
#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    config: WorldConfig,
}

impl SpawnScheduler {
    pub fn new(config: WorldConfig) -> Self {
        Self { config }
    }

    /// Per-frame spawn probability. Clouds and the aircraft are never spawned here.
    pub fn rate(&self, category: EntityCategory) -> f64 {
        match category {
            EntityCategory::Star => self.config.star_spawn_rate,
            EntityCategory::Obstacle => self.config.obstacle_spawn_rate,
            EntityCategory::Ring => self.config.ring_spawn_rate,
            EntityCategory::Cloud | EntityCategory::Aircraft => 0.0,
        }
    }

    /// Soft cap on concurrently active entities of a category.
    pub fn cap(&self, category: EntityCategory) -> usize {
        match category {
            EntityCategory::Star => self.config.max_active_stars as usize,
            EntityCategory::Obstacle => self.config.max_active_obstacles as usize,
            EntityCategory::Ring => self.config.max_active_rings as usize,
            EntityCategory::Cloud => self.config.cloud_count as usize,
            EntityCategory::Aircraft => 1,
        }
    }

    /// Bernoulli decision for one frame given a uniform roll in `[0, 1)`.
    pub fn trial(&self, category: EntityCategory, roll: f64) -> bool {
        roll < self.rate(category)
    }

    /// Roll the frame's trial for `category` and, on success, build the new entity
    /// at the spawn distance. `active` is the category's current population; a
    /// successful roll at the cap spawns nothing.
    pub fn try_spawn(
        &self,
        category: EntityCategory,
        id: u32,
        active: usize,
        rng: &mut impl Rng,
    ) -> Option<SpatialEntity> {
        let roll: f64 = rng.gen();
        if !self.trial(category, roll) {
            return None;
        }
        if active >= self.cap(category) {
            tracing::debug!("{:?} spawn skipped at cap {}", category, active);
            return None;
        }
        Some(self.place(category, id, rng))
    }

    /// Build a fresh entity of `category` at the spawn distance.
    pub fn place(&self, category: EntityCategory, id: u32, rng: &mut impl Rng) -> SpatialEntity {
        let (x, y) = SpawnLane::for_category(category, &self.config).sample(rng);
        let pos = Vec3::new(x, y, self.config.spawn_distance);
        let kind = match category {
            EntityCategory::Star => EntityKind::Star {
                spin: random_between(rng, 0.5, 2.0),
                collected: false,
            },
            EntityCategory::Obstacle => EntityKind::Obstacle {
                spin: random_between(rng, -0.1, 0.1),
            },
            EntityCategory::Ring => EntityKind::Ring {
                passed: false,
                glow: 0.3,
            },
            EntityCategory::Cloud | EntityCategory::Aircraft => EntityKind::Cloud {
                scale: random_between(rng, 2.0, 5.0),
            },
        };
        let mut entity = SpatialEntity::new(id, pos, kind);
        entity.phase = random_between(rng, 0.0, TAU);
        if category == EntityCategory::Ring {
            // Face the player
            entity.rotation.y = FRAC_PI_2;
        }
        entity
    }
}
