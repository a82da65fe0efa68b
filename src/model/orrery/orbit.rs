use std::f64::consts::TAU;

use nalgebra::Vector3;

use crate::error::{OrreryError, Result};
use crate::math::transform::wrap_angle;

/// A prescribed circular path in the horizontal (XZ) plane around some parent.
/// A period of zero means the body doesn't orbit at all; a negative period
/// runs the orbit clockwise instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularOrbit {
    radius: f64,
    period: f64,
    // Invariant: always in [0, 2pi)
    angle: f64,
}

impl CircularOrbit {
    pub fn new(radius: f64, period: f64) -> Result<Self> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(OrreryError::config(format!(
                "orbital radius must be non-negative, got {}",
                radius
            )));
        }
        if !period.is_finite() {
            return Err(OrreryError::config(format!(
                "orbital period must be finite, got {}",
                period
            )));
        }

        Ok(CircularOrbit {
            radius,
            period,
            angle: 0.0,
        })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn period(&self) -> f64 {
        self.period
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn is_active(&self) -> bool {
        self.period != 0.0
    }

    /// Moves the body along its orbit. Does nothing if the orbit is inactive.
    pub fn advance(&mut self, delta_time: f64) {
        if !self.is_active() {
            return;
        }
        // Drop whole periods before scaling, so that no finite step can
        // overflow the angle
        let turns = (delta_time % self.period) / self.period;
        self.angle = wrap_angle(self.angle + TAU * turns);
    }

    /// Where the body sits relative to its parent. The vertical component is
    /// always zero.
    pub fn offset(&self) -> Vector3<f64> {
        Vector3::new(
            self.radius * self.angle.cos(),
            0.0,
            self.radius * self.angle.sin(),
        )
    }
}
