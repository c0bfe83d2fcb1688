//! Configuration for the dynamic community detection run and the algebraic distance estimator

use serde::{Deserialize, Serialize};

use crate::error::{EvalError, Result};

/// Settings of a dynamic community detection run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynCdConfig {
    /// Simulated time horizon; must be a multiple of `delta_t`
    pub t_max: u64,

    /// Length of one simulated interval between snapshots
    pub delta_t: u64,

    /// Fail the run when a snapshot is not a proper clustering of the working graph
    pub check_snapshots: bool,
}

impl Default for DynCdConfig {
    fn default() -> Self {
        Self {
            t_max: 60,
            delta_t: 6,
            check_snapshots: true,
        }
    }
}

impl DynCdConfig {
    /// Create a new configuration with custom values
    pub fn new(t_max: u64, delta_t: u64) -> Self {
        Self {
            t_max,
            delta_t,
            ..Self::default()
        }
    }

    /// Number of snapshots recorded per detector
    pub fn steps(&self) -> u64 {
        self.t_max / self.delta_t
    }

    pub fn validate(&self) -> Result<()> {
        if self.delta_t == 0 {
            return Err(EvalError::InvalidConfig("delta_t must be positive".into()));
        }
        if self.t_max == 0 {
            return Err(EvalError::InvalidConfig("t_max must be positive".into()));
        }
        if self.t_max % self.delta_t != 0 {
            return Err(EvalError::InvalidConfig(format!(
                "t_max ({}) is not a multiple of delta_t ({})",
                self.t_max, self.delta_t
            )));
        }
        Ok(())
    }
}

/// How per-system load differences are aggregated into one distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Norm {
    /// Sum of absolute differences
    Sum,
    /// Square root of the sum of squared differences
    Euclidean,
    /// Largest absolute difference
    Max,
}

/// Settings of the algebraic distance estimator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlgebraicDistanceConfig {
    /// Number of independent load vectors
    pub num_systems: usize,

    /// Relaxation rounds per system
    pub num_iters: usize,

    /// Relaxation factor in (0, 1]
    pub omega: f64,

    /// Aggregation over systems
    pub norm: Norm,

    /// Seed of the random initial loads
    pub seed: u64,
}

impl Default for AlgebraicDistanceConfig {
    fn default() -> Self {
        Self {
            num_systems: 10,
            num_iters: 20,
            omega: 0.5,
            norm: Norm::Euclidean,
            seed: 42,
        }
    }
}

impl AlgebraicDistanceConfig {
    /// Create a new configuration with custom values
    pub fn new(num_systems: usize, num_iters: usize, omega: f64, norm: Norm) -> Self {
        Self {
            num_systems,
            num_iters,
            omega,
            norm,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_systems == 0 {
            return Err(EvalError::InvalidConfig("num_systems must be positive".into()));
        }
        if self.num_iters == 0 {
            return Err(EvalError::InvalidConfig("num_iters must be positive".into()));
        }
        if !(self.omega > 0.0 && self.omega <= 1.0) {
            return Err(EvalError::InvalidConfig(format!(
                "omega must lie in (0, 1], got {}",
                self.omega
            )));
        }
        Ok(())
    }
}
