//! Trapezoidal velocity profile over a known distance.
//!
//! Starts and ends at rest. Accelerates at `a` up to `v_max`, cruises, then
//! decelerates symmetrically. When the distance is too short to reach
//! `v_max` the cruise phase vanishes and the profile is triangular with peak
//! `sqrt(a * L)`.

use pathkit_core::constants::EPSILON;
use pathkit_core::KinematicLimits;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrapezoidProfile {
    length: f64,
    acceleration: f64,
    peak_velocity: f64,
    /// Distance covered by each ramp.
    ramp_distance: f64,
    /// Time spent in each ramp.
    ramp_time: f64,
    cruise_time: f64,
}

impl TrapezoidProfile {
    pub fn new(length: f64, limits: &KinematicLimits) -> Self {
        let length = if length.is_finite() { length.max(0.0) } else { 0.0 };
        let a = limits.max_acceleration;
        let v_max = limits.max_velocity;

        if length <= EPSILON {
            return Self {
                length: 0.0,
                acceleration: a,
                peak_velocity: 0.0,
                ramp_distance: 0.0,
                ramp_time: 0.0,
                cruise_time: 0.0,
            };
        }

        let full_ramp = v_max * v_max / (2.0 * a);
        let (peak_velocity, ramp_distance) = if 2.0 * full_ramp <= length {
            (v_max, full_ramp)
        } else {
            ((a * length).sqrt(), length / 2.0)
        };
        let ramp_time = peak_velocity / a;
        let cruise_time = (length - 2.0 * ramp_distance).max(0.0) / peak_velocity;

        Self {
            length,
            acceleration: a,
            peak_velocity,
            ramp_distance,
            ramp_time,
            cruise_time,
        }
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn peak_velocity(&self) -> f64 {
        self.peak_velocity
    }

    pub fn is_triangular(&self) -> bool {
        self.length > 0.0 && self.cruise_time <= EPSILON
    }

    pub fn total_time(&self) -> f64 {
        2.0 * self.ramp_time + self.cruise_time
    }

    /// Elapsed time when the robot has covered `distance`. Non-decreasing.
    pub fn time_at_distance(&self, distance: f64) -> f64 {
        if self.length <= 0.0 {
            return 0.0;
        }
        let s = distance.clamp(0.0, self.length);
        let decel_start = self.length - self.ramp_distance;

        if s <= self.ramp_distance {
            (2.0 * s / self.acceleration).sqrt()
        } else if s <= decel_start {
            self.ramp_time + (s - self.ramp_distance) / self.peak_velocity
        } else {
            let remaining = self.length - s;
            self.total_time() - (2.0 * remaining / self.acceleration).sqrt()
        }
    }

    /// Speed once `distance` has been covered.
    pub fn velocity_at_distance(&self, distance: f64) -> f64 {
        if self.length <= 0.0 {
            return 0.0;
        }
        let s = distance.clamp(0.0, self.length);
        let accelerating = (2.0 * self.acceleration * s).sqrt();
        let braking = (2.0 * self.acceleration * (self.length - s)).sqrt();
        accelerating.min(braking).min(self.peak_velocity)
    }
}
