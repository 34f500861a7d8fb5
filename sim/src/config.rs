use sky_voyager_shared::config::WorldConfig;
use std::time::Duration;

/// Host configuration for a simulation session.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// Ticks per second; every tick also presents HUD and scene
    pub tick_rate_hz: u32,
    pub rng_seed: u64,
    pub world: WorldConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 60,
            rng_seed: 42,
            world: WorldConfig::default(),
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.tick_rate_hz == 0 {
            return Err("tick_rate_hz must be > 0".to_string());
        }
        if self.tick_rate_hz > 1000 {
            return Err("tick_rate_hz must be <= 1000".to_string());
        }
        self.world.validate()
    }

    /// Wall-clock period of one tick.
    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate_hz.max(1) as f64)
    }
}
