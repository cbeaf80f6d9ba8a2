//! # Constants and type definitions for Razel
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **common type
//! definitions** used throughout the `razel` library.
//!
//! ## Overview
//!
//! - Earth ellipsoid and rotation constants
//! - Time-scale epochs and offsets (J2000, JD ↔ MJD, TT − TAI)
//! - Unit conversions (degrees ↔ radians, arcseconds ↔ radians)
//! - Core type aliases used across the crate
//!
//! These definitions are used by all main modules: time scales, reference-frame
//! reductions, site geometry and the topocentric observables.

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Number of days in a Julian century
pub const DAYS_PER_CENTURY: f64 = 36_525.0;

/// MJD epoch of J2000.0 (2000-01-01 12:00:00 TT)
pub const T2000: f64 = 51544.5;

/// Conversion factor between Julian Date and Modified Julian Date
pub const JDTOMJD: f64 = 2400000.5;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Arcseconds → radians
pub const RADSEC: f64 = std::f64::consts::PI / 648000.0;

/// TT − TAI offset in seconds (defining constant)
pub const TT_TAI_OFFSET: f64 = 32.184;

/// Earth equatorial radius in kilometers
pub const EARTH_MAJOR_AXIS: Kilometer = 6378.1363;

/// Flattening of the reference ellipsoid
pub const EARTH_FLATTENING: f64 = 0.0033528131;

/// Earth polar radius in kilometers, derived from the flattening
pub const EARTH_MINOR_AXIS: Kilometer = EARTH_MAJOR_AXIS * (1.0 - EARTH_FLATTENING);

/// Earth rotation rate in radians per second
pub const EARTH_ROTATION_RATE: f64 = 7.292115146706979e-5;

/// Lowest admissible site height below the reference ellipsoid, in meters
pub const MIN_SITE_HEIGHT: Meter = -1000.0;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in arcseconds
pub type ArcSec = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Distance in meters
pub type Meter = f64;

/// Julian Date (days)
pub type JD = f64;

/// Modified Julian Date (days)
pub type MJD = f64;
