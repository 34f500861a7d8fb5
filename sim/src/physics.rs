//! Arcade flight model: linear acceleration, per-frame drag, speed clamp and
//! axis-independent world bounds.

use crate::entity::Aircraft;
use sky_voyager_shared::config::WorldConfig;
use sky_voyager_shared::protocol::ControlState;
use sky_voyager_shared::vec3::{add, clamp_length, length, normalize, scale, Vec3};

/// What boundary enforcement ran into this step.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryContact {
    Clear,
    /// The aircraft reached the lower y bound. Terminal for the run.
    Ground,
}

/// Control input as a unit-or-shorter direction in the x/y plane.
pub fn control_direction(control: &ControlState) -> Vec3 {
    let mut dir = Vec3::ZERO;
    if control.up {
        dir.y += 1.0;
    }
    if control.down {
        dir.y -= 1.0;
    }
    if control.left {
        dir.x -= 1.0;
    }
    if control.right {
        dir.x += 1.0;
    }
    // No diagonal speed advantage
    if length(dir) > 1.0 {
        dir = normalize(dir);
    }
    dir
}

/// One physics step for the aircraft.
///
/// Velocity and position update once per call; `delta` only drives the
/// propeller. Tilt eases toward the velocity-derived target at a fixed
/// per-frame rate.
pub fn integrate(
    aircraft: &mut Aircraft,
    control: &ControlState,
    delta: f64,
    config: &WorldConfig,
) -> BoundaryContact {
    aircraft.acceleration = add(
        scale(control_direction(control), config.control_accel),
        Vec3::new(0.0, config.gravity, 0.0),
    );

    aircraft.velocity = scale(add(aircraft.velocity, aircraft.acceleration), config.drag);
    aircraft.velocity = clamp_length(aircraft.velocity, config.max_speed);

    aircraft.pos = add(aircraft.pos, aircraft.velocity);

    let contact = enforce_boundaries(aircraft, config);

    let target_x = -aircraft.velocity.y * config.tilt_factor;
    let target_z = -aircraft.velocity.x * config.tilt_factor;
    aircraft.rotation.x += (target_x - aircraft.rotation.x) * config.tilt_smoothing;
    aircraft.rotation.z += (target_z - aircraft.rotation.z) * config.tilt_smoothing;

    aircraft.spin_propeller(delta);

    contact
}

/// Clamp the aircraft into the world box.
///
/// x clamps zero vx on either side. y clamps zero vy; reaching the lower bound
/// is reported as [`BoundaryContact::Ground`]. z only zeroes vz at the upper
/// bound.
pub fn enforce_boundaries(aircraft: &mut Aircraft, config: &WorldConfig) -> BoundaryContact {
    let [x0, x1] = config.bounds_x;
    let [y0, y1] = config.bounds_y;
    let [z0, z1] = config.bounds_z;
    let pos = &mut aircraft.pos;
    let vel = &mut aircraft.velocity;

    if pos.x < x0 {
        pos.x = x0;
        vel.x = 0.0;
    } else if pos.x > x1 {
        pos.x = x1;
        vel.x = 0.0;
    }

    let mut contact = BoundaryContact::Clear;
    if pos.y <= y0 {
        pos.y = y0;
        vel.y = 0.0;
        contact = BoundaryContact::Ground;
    } else if pos.y > y1 {
        pos.y = y1;
        vel.y = 0.0;
    }

    if pos.z < z0 {
        pos.z = z0;
    } else if pos.z > z1 {
        pos.z = z1;
        vel.z = 0.0;
    }

    contact
}
