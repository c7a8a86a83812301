use std::fmt;

use crate::scene::NodeId;
use crate::time::MAX_RATE_HZ;

/// Which rate a [`ConfigError::InvalidRate`] refers to.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RateAxis {
    Logic,
    Render,
}

impl fmt::Display for RateAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateAxis::Logic => f.write_str("logic"),
            RateAxis::Render => f.write_str("render"),
        }
    }
}

/// Scheduler configuration error.
///
/// Reported synchronously by [`SchedulerBuilder::build`](super::SchedulerBuilder::build)
/// and the rate setters. Permanent: rebuild with valid parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("frame scheduler is missing required parameter `{0}`")]
    Missing(&'static str),

    #[error("scene root {0:?} does not exist in the scene")]
    UnknownRoot(NodeId),

    #[error("invalid {axis} rate {value}: expected a finite rate in (0, {max}] per second", max = MAX_RATE_HZ)]
    InvalidRate { axis: RateAxis, value: f64 },
}
