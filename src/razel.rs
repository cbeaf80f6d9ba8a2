//! # Topocentric observables (RAZEL)
//!
//! Range, azimuth, elevation and their rates as seen from a ground site, derived
//! from an Earth-fixed relative state projected into the local
//! south-east-zenith (SEZ) frame.
//!
//! The azimuth convention is **clockwise from north**, in `[0, 2π)`; elevation is
//! positive above the local horizon, in `[−π/2, π/2]`. A target below the horizon
//! is a valid result, not an error.

use nalgebra::{Matrix3, Vector3};

use crate::constants::{Kilometer, Radian, DPI};
use crate::earth_orientation::PolarMotion;
use crate::fk5::{eci_to_ecef, EcefState, InertialState};
use crate::observers::GeodeticPosition;
use crate::razel_errors::RazelError;
use crate::ref_system::{rot2, rot3};
use crate::time::Epoch;

/// Range, azimuth, elevation and their time derivatives for one observation.
///
/// Units: range in kilometers, angles in radians, range rate in km/s, angle
/// rates in rad/s. Immutable once computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopocentricObservables {
    /// Slant range ρ, in kilometers.
    pub range: Kilometer,
    /// Azimuth β, clockwise from north, in `[0, 2π)` radians.
    pub azimuth: Radian,
    /// Elevation above the local horizon, in `[−π/2, π/2]` radians.
    pub elevation: Radian,
    /// Range rate ρ̇, in km/s.
    pub range_rate: f64,
    /// Azimuth rate β̇, in rad/s.
    pub azimuth_rate: f64,
    /// Elevation rate, in rad/s.
    pub elevation_rate: f64,
}

/// Construct the ECEF → SEZ frame rotation for a site, directly from the
/// trigonometric functions of its geodetic latitude and longitude.
///
/// Rows of the matrix are the south, east and zenith unit vectors expressed in
/// the Earth-fixed frame:
///
/// ```text
///         ⎡  sinφ·cosλ   sinφ·sinλ   −cosφ ⎤
/// D(φ,λ) = ⎢  −sinλ        cosλ        0   ⎥
///         ⎣  cosφ·cosλ   cosφ·sinλ    sinφ ⎦
/// ```
///
/// Identical (a required invariant, property-tested) to the axis-rotation
/// composition built by [`sez_rotation_composed`].
pub fn sez_rotation(latitude: Radian, longitude: Radian) -> Matrix3<f64> {
    let (sin_phi, cos_phi) = (latitude.sin(), latitude.cos());
    let (sin_lambda, cos_lambda) = (longitude.sin(), longitude.cos());

    Matrix3::new(
        sin_phi * cos_lambda,
        sin_phi * sin_lambda,
        -cos_phi,
        -sin_lambda,
        cos_lambda,
        0.0,
        cos_phi * cos_lambda,
        cos_phi * sin_lambda,
        sin_phi,
    )
}

/// Construct the ECEF → SEZ frame rotation by composing principal-axis
/// rotations: about the polar axis by the longitude, then about the rotated
/// east axis by (90° − latitude).
///
/// ```text
/// D(φ,λ) = rot2(π/2 − φ) · rot3(λ)
/// ```
pub fn sez_rotation_composed(latitude: Radian, longitude: Radian) -> Matrix3<f64> {
    rot2(std::f64::consts::FRAC_PI_2 - latitude) * rot3(longitude)
}

/// Resolve the azimuth of a topocentric relative state, clockwise from north.
///
/// The quadrant is resolved with `atan2` over the (south, east) components,
/// since a bare arcsine is only valid in one quadrant. When the horizontal position
/// components are exactly zero (target on the zenith/nadir axis), the
/// position-based azimuth is undefined and the direction of the horizontal
/// **rate** components is used instead; with no horizontal rate either, the
/// azimuth is genuinely undefined and [`RazelError::SingularGeometry`] is
/// returned.
pub fn azimuth_from_sez(
    rho_sez: &Vector3<f64>,
    rho_dot_sez: &Vector3<f64>,
) -> Result<Radian, RazelError> {
    let (south, east) = (rho_sez.x, rho_sez.y);
    if south == 0.0 && east == 0.0 {
        let (south_rate, east_rate) = (rho_dot_sez.x, rho_dot_sez.y);
        if south_rate == 0.0 && east_rate == 0.0 {
            return Err(RazelError::SingularGeometry);
        }
        return Ok(normalize_two_pi(east_rate.atan2(-south_rate)));
    }

    Ok(normalize_two_pi(east.atan2(-south)))
}

/// Derive the full observable set from a relative state already expressed in
/// the SEZ frame.
///
/// Steps (Vallado's RAZEL formulation):
/// * ρ = ‖ρ_sez‖,
/// * el = asin(ρ_z / ρ),
/// * β from [`azimuth_from_sez`],
/// * ρ̇ = (ρ_sez · ρ̇_sez) / ρ,
/// * β̇ = (ρ̇_s·ρ_e − ρ̇_e·ρ_s) / (ρ_s² + ρ_e²),
/// * el̇ = (ρ̇_z − ρ̇·sin el) / √(ρ_s² + ρ_e²).
///
/// Fails with [`RazelError::SingularGeometry`] when the horizontal denominator
/// ρ_s² + ρ_e² is exactly zero (target on the zenith/nadir axis): the azimuth
/// and elevation rates are undefined there, and a partial observable set is
/// not returned in their place.
pub fn topocentric_observables(
    rho_sez: &Vector3<f64>,
    rho_dot_sez: &Vector3<f64>,
) -> Result<TopocentricObservables, RazelError> {
    let range = rho_sez.norm();
    if range == 0.0 {
        return Err(RazelError::SingularGeometry);
    }

    let elevation = (rho_sez.z / range).asin();
    let azimuth = azimuth_from_sez(rho_sez, rho_dot_sez)?;

    let horizontal_sq = rho_sez.x * rho_sez.x + rho_sez.y * rho_sez.y;
    if horizontal_sq == 0.0 {
        return Err(RazelError::SingularGeometry);
    }

    let range_rate = rho_sez.dot(rho_dot_sez) / range;
    let azimuth_rate =
        (rho_dot_sez.x * rho_sez.y - rho_dot_sez.y * rho_sez.x) / horizontal_sq;
    let elevation_rate =
        (rho_dot_sez.z - range_rate * elevation.sin()) / horizontal_sq.sqrt();

    Ok(TopocentricObservables {
        range,
        azimuth,
        elevation,
        range_rate,
        azimuth_rate,
        elevation_rate,
    })
}

/// Compute the topocentric observables of an Earth-fixed state seen from a
/// ground site.
///
/// The relative position is taken against the site vector on the reference
/// ellipsoid; the relative velocity is the ECEF velocity itself, since the
/// site is fixed in the rotating frame and has zero ECEF velocity. Both are
/// rotated into the site's SEZ frame before extracting the observables.
pub fn razel_from_ecef(
    state: &EcefState,
    site: &GeodeticPosition,
) -> Result<TopocentricObservables, RazelError> {
    let rho_ecef = state.position - site.body_fixed_coord();
    let rho_dot_ecef = state.velocity;

    let sez = sez_rotation(site.latitude.to_radians(), site.longitude.to_radians());

    topocentric_observables(&(sez * rho_ecef), &(sez * rho_dot_ecef))
}

/// Compute range, azimuth, elevation and their rates from an inertial state.
///
/// This is the caller-facing entry point of the pipeline: the inertial state is
/// reduced to the Earth-fixed frame ([`eci_to_ecef`]), the site vector is built
/// from the geodetic position, and the relative state is projected into the
/// topocentric SEZ frame.
///
/// Arguments
/// ---------
/// * `state`: inertial position (km) and velocity (km/s) of the object.
/// * `epoch`: observation epoch carrying the ΔUT1/ΔAT corrections.
/// * `site`: geodetic site location (degrees east-positive, meters).
/// * `polar_motion`: pole offsets in arcseconds; `None` applies zero offsets.
///
/// Return
/// ------
/// * The observables, or a typed failure: [`RazelError::UnsupportedEpoch`]
///   outside the reduction model validity window,
///   [`RazelError::SingularGeometry`] for a target exactly on the zenith/nadir
///   axis. A negative elevation (below the horizon) is a valid result.
pub fn razel(
    state: &InertialState,
    epoch: &Epoch,
    site: &GeodeticPosition,
    polar_motion: Option<PolarMotion>,
) -> Result<TopocentricObservables, RazelError> {
    let pm = polar_motion.unwrap_or_default();
    let ecef = eci_to_ecef(state, epoch, &pm)?;
    razel_from_ecef(&ecef, site)
}

fn normalize_two_pi(angle: Radian) -> Radian {
    if angle < 0.0 {
        angle + DPI
    } else {
        angle
    }
}
