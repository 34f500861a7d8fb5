use sky_voyager_shared::config::WorldConfig;

/// Rising or falling edge of the boost state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoostEdge {
    Started,
    Stopped,
}

/// Result of one boost update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoostUpdate {
    pub speed: f64,
    pub energy: f64,
    pub active: bool,
    /// Set only on the frame the boost state flips
    pub edge: Option<BoostEdge>,
}

/// Drainable/rechargeable boost energy pool.
#[derive(Debug, Clone, PartialEq)]
pub struct BoostEnergy {
    current: f64,
    max: f64,
    active: bool,
}

impl BoostEnergy {
    pub fn new(max: f64) -> Self {
        Self {
            current: max,
            max,
            active: false,
        }
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Full energy, boost off.
    pub fn reset(&mut self) {
        self.current = self.max;
        self.active = false;
    }

    /// Boost only engages while energy remains at the start of the frame.
    pub fn update(&mut self, requested: bool, delta: f64, config: &WorldConfig) -> BoostUpdate {
        let mut edge = None;
        let speed = if requested && self.current > 0.0 {
            if !self.active {
                self.active = true;
                edge = Some(BoostEdge::Started);
            }
            self.current = (self.current - config.boost_drain_rate * delta).max(0.0);
            config.boost_speed
        } else {
            if self.active {
                self.active = false;
                edge = Some(BoostEdge::Stopped);
            }
            self.current = (self.current + config.boost_recharge_rate * delta).min(self.max);
            config.base_speed
        };

        BoostUpdate {
            speed,
            energy: self.current,
            active: self.active,
            edge,
        }
    }
}
