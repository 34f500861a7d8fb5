use sky_voyager_shared::protocol::{round4_array, AircraftWire, EntityCategory, EntityWire};
use sky_voyager_shared::vec3::Vec3;

pub const AIRCRAFT_RADIUS: f64 = 2.0;
pub const STAR_RADIUS: f64 = 1.2;
pub const OBSTACLE_RADIUS: f64 = 7.0;
pub const RING_RADIUS: f64 = 5.0;

/// Propeller spin (rad/s)
const PROPELLER_RATE: f64 = 15.0;
/// Star bob frequency (rad/s of phase)
const STAR_BOB_FREQ: f64 = 2.0;
const STAR_BOB_AMPLITUDE: f64 = 0.1;
/// Ring spin around its facing axis (rad/s)
const RING_SPIN: f64 = 0.5;
const RING_GLOW_FREQ: f64 = 3.0;

/// Category-specific state of a world object.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityKind {
    Star { spin: f64, collected: bool },
    Obstacle { spin: f64 },
    Ring { passed: bool, glow: f64 },
    Cloud { scale: f64 },
}

impl EntityKind {
    pub fn category(&self) -> EntityCategory {
        match self {
            EntityKind::Star { .. } => EntityCategory::Star,
            EntityKind::Obstacle { .. } => EntityCategory::Obstacle,
            EntityKind::Ring { .. } => EntityCategory::Ring,
            EntityKind::Cloud { .. } => EntityCategory::Cloud,
        }
    }

    /// Nominal collision radius; clouds are decoration and have none.
    pub fn collision_radius(&self) -> Option<f64> {
        match self {
            EntityKind::Star { .. } => Some(STAR_RADIUS),
            EntityKind::Obstacle { .. } => Some(OBSTACLE_RADIUS),
            EntityKind::Ring { .. } => Some(RING_RADIUS),
            EntityKind::Cloud { .. } => None,
        }
    }
}

/// A positioned world object owned by the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialEntity {
    pub id: u32,
    pub pos: Vec3,
    pub rotation: Vec3,
    pub collision_radius: Option<f64>,
    /// Per-entity animation clock (seconds)
    pub phase: f64,
    pub kind: EntityKind,
}

impl SpatialEntity {
    pub fn new(id: u32, pos: Vec3, kind: EntityKind) -> Self {
        Self {
            id,
            pos,
            rotation: Vec3::ZERO,
            collision_radius: kind.collision_radius(),
            phase: 0.0,
            kind,
        }
    }

    pub fn category(&self) -> EntityCategory {
        self.kind.category()
    }

    pub fn is_collected(&self) -> bool {
        matches!(self.kind, EntityKind::Star { collected: true, .. })
    }

    pub fn is_passed(&self) -> bool {
        matches!(self.kind, EntityKind::Ring { passed: true, .. })
    }

    pub fn to_wire(&self) -> EntityWire {
        let intensity = match self.kind {
            EntityKind::Ring { glow, .. } => glow,
            EntityKind::Cloud { scale } => scale,
            _ => 1.0,
        };
        EntityWire {
            id: self.id,
            category: self.category(),
            pos: round4_array(self.pos.to_array()),
            rotation: round4_array(self.rotation.to_array()),
            radius: self.collision_radius,
            intensity,
            visible: !self.is_collected(),
        }
    }
}

/// Advance the per-kind animation of one entity by `delta` seconds.
/// Collected stars are frozen.
pub fn animate(entity: &mut SpatialEntity, delta: f64) {
    match &mut entity.kind {
        EntityKind::Star {
            spin,
            collected: false,
        } => {
            entity.phase += delta;
            entity.rotation.y += delta * *spin;
            entity.rotation.x += delta * *spin * 0.5;
            entity.pos.y += (entity.phase * STAR_BOB_FREQ).sin() * delta * STAR_BOB_AMPLITUDE;
        }
        EntityKind::Star { collected: true, .. } => {}
        EntityKind::Obstacle { spin } => {
            entity.phase += delta;
            entity.rotation.y += delta * *spin;
        }
        EntityKind::Ring { glow, .. } => {
            entity.phase += delta;
            entity.rotation.z += delta * RING_SPIN;
            *glow = 0.3 + (entity.phase * RING_GLOW_FREQ).sin() * 0.2;
        }
        EntityKind::Cloud { .. } => {}
    }
}

/// The player-controlled aircraft.
#[derive(Debug, Clone, PartialEq)]
pub struct Aircraft {
    pub pos: Vec3,
    pub velocity: Vec3,
    /// Recomputed every integration step
    pub acceleration: Vec3,
    /// Visual tilt only; not used by collision
    pub rotation: Vec3,
    pub propeller_angle: f64,
    pub collision_radius: f64,
}

impl Default for Aircraft {
    fn default() -> Self {
        Self {
            pos: Vec3::ZERO,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            rotation: Vec3::ZERO,
            propeller_angle: 0.0,
            collision_radius: AIRCRAFT_RADIUS,
        }
    }
}

impl Aircraft {
    /// Back to origin, at rest, level.
    pub fn reset(&mut self) {
        *self = Self {
            collision_radius: self.collision_radius,
            ..Self::default()
        };
    }

    pub fn spin_propeller(&mut self, delta: f64) {
        self.propeller_angle += delta * PROPELLER_RATE;
    }

    pub fn to_wire(&self) -> AircraftWire {
        AircraftWire {
            pos: round4_array(self.pos.to_array()),
            velocity: round4_array(self.velocity.to_array()),
            rotation: round4_array(self.rotation.to_array()),
            propeller_angle: self.propeller_angle,
            radius: self.collision_radius,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sky_voyager_shared::vec3::vec3;

    fn star(spin: f64) -> SpatialEntity {
        SpatialEntity::new(
            1,
            vec3(0.0, 10.0, -200.0),
            EntityKind::Star {
                spin,
                collected: false,
            },
        )
    }

    #[test]
    fn kinds_map_to_categories_and_radii() {
        let cases = [
            (
                EntityKind::Star {
                    spin: 1.0,
                    collected: false,
                },
                EntityCategory::Star,
                Some(STAR_RADIUS),
            ),
            (
                EntityKind::Obstacle { spin: 0.05 },
                EntityCategory::Obstacle,
                Some(OBSTACLE_RADIUS),
            ),
            (
                EntityKind::Ring {
                    passed: false,
                    glow: 0.3,
                },
                EntityCategory::Ring,
                Some(RING_RADIUS),
            ),
            (EntityKind::Cloud { scale: 3.0 }, EntityCategory::Cloud, None),
        ];
        for (kind, category, radius) in cases {
            let e = SpatialEntity::new(1, Vec3::ZERO, kind);
            assert_eq!(e.category(), category);
            assert_eq!(e.collision_radius, radius);
        }
    }

    #[test]
    fn star_spins_and_advances_phase() {
        let mut s = star(2.0);
        animate(&mut s, 0.5);
        assert!((s.rotation.y - 1.0).abs() < 1e-9);
        assert!((s.rotation.x - 0.5).abs() < 1e-9);
        assert!((s.phase - 0.5).abs() < 1e-9);
    }

    #[test]
    fn star_bob_is_small() {
        let mut s = star(1.0);
        for _ in 0..100 {
            animate(&mut s, 0.016);
        }
        assert!((s.pos.y - 10.0).abs() < 0.2);
    }

    #[test]
    fn collected_star_is_frozen() {
        let mut s = star(1.0);
        s.kind = EntityKind::Star {
            spin: 1.0,
            collected: true,
        };
        let before = s.clone();
        animate(&mut s, 0.1);
        assert_eq!(s, before);
        assert!(!s.to_wire().visible);
    }

    #[test]
    fn ring_glow_stays_in_range() {
        let mut r = SpatialEntity::new(
            2,
            Vec3::ZERO,
            EntityKind::Ring {
                passed: false,
                glow: 0.3,
            },
        );
        for _ in 0..500 {
            animate(&mut r, 0.016);
            match r.kind {
                EntityKind::Ring { glow, .. } => assert!((0.1..=0.5).contains(&glow)),
                _ => unreachable!(),
            }
        }
        assert!(r.rotation.z > 0.0);
    }

    #[test]
    fn cloud_does_not_animate() {
        let mut c = SpatialEntity::new(3, vec3(1.0, 2.0, 3.0), EntityKind::Cloud { scale: 2.5 });
        let before = c.clone();
        animate(&mut c, 0.1);
        assert_eq!(c, before);
        assert_eq!(c.to_wire().intensity, 2.5);
    }

    #[test]
    fn independent_phases_animate_independently() {
        let mut a = star(1.0);
        let mut b = star(1.0);
        b.phase = 1.3;
        animate(&mut a, 0.1);
        animate(&mut b, 0.1);
        assert_ne!(a.pos.y, b.pos.y);
    }

    #[test]
    fn aircraft_reset_keeps_radius() {
        let mut a = Aircraft::default();
        a.pos = vec3(5.0, -3.0, 1.0);
        a.velocity = vec3(0.1, 0.2, 0.0);
        a.rotation = vec3(0.3, 0.0, -0.2);
        a.spin_propeller(1.0);
        a.reset();
        assert_eq!(a, Aircraft::default());
        assert_eq!(a.collision_radius, AIRCRAFT_RADIUS);
    }

    #[test]
    fn propeller_spins_with_delta() {
        let mut a = Aircraft::default();
        a.spin_propeller(0.1);
        assert!((a.propeller_angle - 1.5).abs() < 1e-9);
    }
}
