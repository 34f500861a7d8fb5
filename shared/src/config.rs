/// World configuration shared by physics, spawning and collision.
///
/// Bounds are `[min, max]` pairs in world units. Per-frame quantities (drag,
/// control acceleration, gravity, tilt smoothing, spawn rates) are applied once
/// per tick regardless of delta.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize, ts_rs::TS)]
#[ts(export, export_to = "../../web/src/generated/")]
#[serde(rename_all = "camelCase")]
pub struct WorldConfig {
    pub bounds_x: [f64; 2],
    pub bounds_y: [f64; 2],
    pub bounds_z: [f64; 2],
    /// z where new entities appear (ahead of the aircraft)
    pub spawn_distance: f64,
    /// z past which entities are despawned (behind the camera)
    pub despawn_distance: f64,

    pub drag: f64,
    pub max_speed: f64,
    pub gravity: f64,
    pub control_accel: f64,
    pub tilt_factor: f64,
    pub tilt_smoothing: f64,

    pub base_speed: f64,
    pub boost_speed: f64,
    pub max_boost_energy: f64,
    /// Energy per second while boosting
    pub boost_drain_rate: f64,
    /// Energy per second while not boosting
    pub boost_recharge_rate: f64,

    /// Per-frame spawn probabilities
    pub star_spawn_rate: f64,
    pub obstacle_spawn_rate: f64,
    pub ring_spawn_rate: f64,
    pub max_active_stars: u32,
    pub max_active_obstacles: u32,
    pub max_active_rings: u32,
    pub cloud_count: u32,

    pub star_tolerance: f64,
    pub obstacle_tolerance: f64,
    /// Half extents of the ring pass box (x, y, z)
    pub ring_half_extents: [f64; 3],
    pub star_bonus: u32,
    pub ring_bonus: u32,

    /// Upper bound on simulated seconds per tick
    pub max_delta: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            bounds_x: [-100.0, 100.0],
            bounds_y: [-50.0, 100.0],
            bounds_z: [-1000.0, 200.0],
            spawn_distance: -200.0,
            despawn_distance: 50.0,

            drag: 0.95,
            max_speed: 0.5,
            gravity: -0.05,
            control_accel: 0.1,
            tilt_factor: 0.5,
            tilt_smoothing: 0.1,

            base_speed: 20.0,
            boost_speed: 40.0,
            max_boost_energy: 100.0,
            boost_drain_rate: 30.0,
            boost_recharge_rate: 10.0,

            star_spawn_rate: 0.02,
            obstacle_spawn_rate: 0.005,
            ring_spawn_rate: 0.01,
            max_active_stars: 64,
            max_active_obstacles: 24,
            max_active_rings: 32,
            cloud_count: 30,

            star_tolerance: 1.5,
            obstacle_tolerance: 0.8,
            ring_half_extents: [5.0, 5.0, 1.0],
            star_bonus: 1,
            ring_bonus: 5,

            max_delta: 0.1,
        }
    }
}

fn check_bounds(name: &str, bounds: [f64; 2]) -> Result<(), String> {
    if !bounds[0].is_finite() || !bounds[1].is_finite() || bounds[0] >= bounds[1] {
        return Err(format!("{} must be finite with min < max", name));
    }
    Ok(())
}

fn check_probability(name: &str, p: f64) -> Result<(), String> {
    if !(0.0..=1.0).contains(&p) {
        return Err(format!("{} must be within [0, 1]", name));
    }
    Ok(())
}

impl WorldConfig {
    pub fn validate(&self) -> Result<(), String> {
        check_bounds("bounds_x", self.bounds_x)?;
        check_bounds("bounds_y", self.bounds_y)?;
        check_bounds("bounds_z", self.bounds_z)?;
        if self.spawn_distance >= self.despawn_distance {
            return Err("spawn_distance must be < despawn_distance".to_string());
        }
        if self.spawn_distance < self.bounds_z[0] || self.despawn_distance > self.bounds_z[1] {
            return Err("spawn/despawn distances must lie within bounds_z".to_string());
        }
        if !(0.0..=1.0).contains(&self.drag) {
            return Err("drag must be within [0, 1]".to_string());
        }
        if !self.max_speed.is_finite() || self.max_speed <= 0.0 {
            return Err("max_speed must be finite and > 0".to_string());
        }
        if self.base_speed < 0.0 || self.boost_speed < self.base_speed {
            return Err("boost_speed must be >= base_speed >= 0".to_string());
        }
        if !self.max_boost_energy.is_finite() || self.max_boost_energy <= 0.0 {
            return Err("max_boost_energy must be finite and > 0".to_string());
        }
        if self.boost_drain_rate < 0.0 || self.boost_recharge_rate < 0.0 {
            return Err("boost rates must be >= 0".to_string());
        }
        check_probability("star_spawn_rate", self.star_spawn_rate)?;
        check_probability("obstacle_spawn_rate", self.obstacle_spawn_rate)?;
        check_probability("ring_spawn_rate", self.ring_spawn_rate)?;
        if self.star_tolerance <= 0.0 || self.obstacle_tolerance <= 0.0 {
            return Err("collision tolerances must be > 0".to_string());
        }
        if self.ring_half_extents.iter().any(|e| *e <= 0.0) {
            return Err("ring_half_extents must be > 0".to_string());
        }
        if !self.max_delta.is_finite() || self.max_delta <= 0.0 {
            return Err("max_delta must be finite and > 0".to_string());
        }
        Ok(())
    }

    /// Lowest altitude the aircraft may reach; touching it is a ground impact.
    pub fn ground_level(&self) -> f64 {
        self.bounds_y[0]
    }
}
