use crate::entity::{Aircraft, EntityKind};
use crate::registry::WorldObjectRegistry;
use sky_voyager_shared::config::WorldConfig;
use sky_voyager_shared::protocol::EntityCategory;
use sky_voyager_shared::vec3::{distance, Vec3};

/// Radius used when an entity carries no collision radius of its own.
const FALLBACK_RADIUS: f64 = 1.0;

/// What the aircraft touched this frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionReport {
    pub collected_stars: Vec<u32>,
    pub ring_bonuses: Vec<u32>,
    /// Id of the obstacle that ended the run.
    pub fatal: Option<u32>,
}

impl CollisionReport {
    pub fn is_empty(&self) -> bool {
        self.collected_stars.is_empty() && self.ring_bonuses.is_empty() && self.fatal.is_none()
    }
}

/// Scaled sphere test: `|a - b| < (ra + rb) * tolerance`.
pub fn spheres_overlap(a: Vec3, ra: f64, b: Vec3, rb: f64, tolerance: f64) -> bool {
    distance(a, b) < (ra + rb) * tolerance
}

/// Axis-aligned box test around a ring center.
pub fn ring_pass(aircraft: Vec3, ring: Vec3, half_extents: [f64; 3]) -> bool {
    (aircraft.x - ring.x).abs() < half_extents[0]
        && (aircraft.y - ring.y).abs() < half_extents[1]
        && (aircraft.z - ring.z).abs() < half_extents[2]
}

/// Test the aircraft against stars, obstacles and rings.
///
/// Touched stars are marked collected and removed. Touched rings are marked
/// passed and stay in the world. Only the first obstacle hit is reported.
pub fn resolve(
    aircraft: &Aircraft,
    registry: &mut WorldObjectRegistry,
    config: &WorldConfig,
) -> CollisionReport {
    let mut report = CollisionReport::default();

    let hits: Vec<u32> = registry
        .iter(EntityCategory::Star)
        .rev()
        .filter(|s| !s.is_collected())
        .filter(|s| {
            spheres_overlap(
                aircraft.pos,
                aircraft.collision_radius,
                s.pos,
                s.collision_radius.unwrap_or(FALLBACK_RADIUS),
                config.star_tolerance,
            )
        })
        .map(|s| s.id)
        .collect();
    for id in hits {
        if let Some(mut star) = registry.remove(EntityCategory::Star, id) {
            if let EntityKind::Star { collected, .. } = &mut star.kind {
                *collected = true;
            }
            report.collected_stars.push(id);
        }
    }

    report.fatal = registry
        .iter(EntityCategory::Obstacle)
        .find(|o| {
            spheres_overlap(
                aircraft.pos,
                aircraft.collision_radius,
                o.pos,
                o.collision_radius.unwrap_or(FALLBACK_RADIUS),
                config.obstacle_tolerance,
            )
        })
        .map(|o| o.id);

    for ring in registry.iter_mut(EntityCategory::Ring) {
        if let EntityKind::Ring { passed, .. } = &mut ring.kind {
            if !*passed && ring_pass(aircraft.pos, ring.pos, config.ring_half_extents) {
                *passed = true;
                report.ring_bonuses.push(ring.id);
            }
        }
    }

    report
}
