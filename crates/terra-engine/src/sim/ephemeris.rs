//! Time-to-pose mapper: pure functions from a simulated timestamp to body
//! poses and a sun direction.
//!
//! Every angle is derived from `t mod period` on the integer timestamp before
//! any float conversion, so the result for a given `t` is exact to reproduce
//! and does not lose precision after long sessions. Nothing is accumulated
//! across frames.
//!
//! Coordinate frame: +Y is Earth's spin axis, orbits lie in the XZ plane.

use std::f64::consts::TAU;

use chrono::{DateTime, Datelike, Utc};
use glam::DVec3;
use serde::{Deserialize, Serialize};

pub const DAY_LENGTH_MS: i64 = 86_400_000;
/// 23h 56m 4.0905s.
pub const SIDEREAL_DAY_MS: f64 = 86_164_090.5;
pub const MAX_DECLINATION_DEG: f64 = 23.45;
/// Day-of-year of the March equinox in the declination approximation.
pub const EQUINOX_DAY_OF_YEAR: f64 = 81.0;
pub const DAYS_PER_YEAR: f64 = 365.0;
/// Mean Gregorian year, used only outside chrono's calendar range.
const MEAN_YEAR_DAYS: f64 = 365.2425;
pub const DEFAULT_CLOUD_SPIN_FACTOR: f64 = 0.8;

/// Fixed circular, equatorial orbit of one body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitParams {
    /// Orbit radius in scene units (Earth radius = 1).
    pub radius: f64,
    /// Orbital period in milliseconds.
    pub period_ms: i64,
    /// Phase offset in radians added after the time fraction.
    #[serde(default)]
    pub phase: f64,
}

impl OrbitParams {
    pub fn new(radius: f64, period_ms: i64, phase: f64) -> Self {
        Self { radius, period_ms, phase }
    }
}

/// Periods and factors shared by every frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EphemerisConfig {
    pub day_length_ms: i64,
    pub sidereal_day_ms: f64,
    /// Cloud spin = Earth spin × this factor (cosmetic).
    pub cloud_spin_factor: f64,
}

impl Default for EphemerisConfig {
    fn default() -> Self {
        Self {
            day_length_ms: DAY_LENGTH_MS,
            sidereal_day_ms: SIDEREAL_DAY_MS,
            cloud_spin_factor: DEFAULT_CLOUD_SPIN_FACTOR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EarthRotation {
    /// Spin about +Y, in [0, 2π).
    pub spin: f64,
    pub clouds: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyPose {
    /// Orbital angle in [0, 2π).
    pub angle: f64,
    pub position: DVec3,
}

/// Everything the scene needs for one timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePoses {
    pub time_ms: i64,
    pub earth: EarthRotation,
    pub bodies: Vec<BodyPose>,
    /// Unit vector from Earth towards the sun.
    pub sun_direction: DVec3,
}

/// Fraction of the period elapsed at `t`, in [0, 1). Non-positive periods
/// yield 0 so the mapper stays total.
pub fn period_fraction(t_ms: i64, period_ms: i64) -> f64 {
    if period_ms <= 0 {
        return 0.0;
    }
    t_ms.rem_euclid(period_ms) as f64 / period_ms as f64
}

/// Wrap any finite angle into [0, 2π).
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid of a tiny negative value rounds up to exactly TAU.
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

pub fn earth_spin_angle(t_ms: i64, day_length_ms: i64) -> f64 {
    wrap_angle(period_fraction(t_ms, day_length_ms) * TAU)
}

pub fn earth_rotation(t_ms: i64, config: &EphemerisConfig) -> EarthRotation {
    let spin = earth_spin_angle(t_ms, config.day_length_ms);
    EarthRotation {
        spin,
        clouds: spin * config.cloud_spin_factor,
    }
}

pub fn orbit_angle(t_ms: i64, orbit: &OrbitParams) -> f64 {
    wrap_angle(period_fraction(t_ms, orbit.period_ms) * TAU + orbit.phase)
}

pub fn orbit_position(angle: f64, radius: f64) -> DVec3 {
    DVec3::new(radius * angle.cos(), 0.0, radius * angle.sin())
}

pub fn body_pose(t_ms: i64, orbit: &OrbitParams) -> BodyPose {
    let angle = orbit_angle(t_ms, orbit);
    BodyPose {
        angle,
        position: orbit_position(angle, orbit.radius),
    }
}

/// 1-based UTC day of the year.
pub fn day_of_year(t_ms: i64) -> u32 {
    match DateTime::<Utc>::from_timestamp_millis(t_ms) {
        Some(date) => date.ordinal(),
        None => {
            let days = t_ms.div_euclid(DAY_LENGTH_MS) as f64;
            days.rem_euclid(MEAN_YEAR_DAYS).floor() as u32 + 1
        }
    }
}

/// Seasonal tilt of the sun, in radians.
pub fn solar_declination(day_of_year: u32) -> f64 {
    let season = TAU * (day_of_year as f64 - EQUINOX_DAY_OF_YEAR) / DAYS_PER_YEAR;
    MAX_DECLINATION_DEG.to_radians() * season.sin()
}

/// Sidereal rotation angle in [0, 2π).
///
/// The sidereal day is not a whole number of milliseconds, so the reduction
/// runs in half-millisecond units with 128-bit intermediates.
pub fn sidereal_angle(t_ms: i64, sidereal_day_ms: f64) -> f64 {
    let period_half_ms = (sidereal_day_ms * 2.0).round() as i128;
    if period_half_ms <= 0 {
        return 0.0;
    }
    let reduced = (t_ms as i128 * 2).rem_euclid(period_half_ms);
    wrap_angle(reduced as f64 / period_half_ms as f64 * TAU)
}

pub fn sun_direction(t_ms: i64, config: &EphemerisConfig) -> DVec3 {
    let declination = solar_declination(day_of_year(t_ms));
    let theta = sidereal_angle(t_ms, config.sidereal_day_ms);
    DVec3::new(
        declination.cos() * theta.cos(),
        declination.sin(),
        declination.cos() * theta.sin(),
    )
    .normalize_or(DVec3::X)
}

/// The whole mapper: one call per frame, no hidden state.
pub fn compute_poses(t_ms: i64, config: &EphemerisConfig, orbits: &[OrbitParams]) -> FramePoses {
    FramePoses {
        time_ms: t_ms,
        earth: earth_rotation(t_ms, config),
        bodies: orbits.iter().map(|orbit| body_pose(t_ms, orbit)).collect(),
        sun_direction: sun_direction(t_ms, config),
    }
}
