use nalgebra::{Matrix3, Vector3};

use crate::constants::EARTH_ROTATION_RATE;
use crate::earth_orientation::{polar_motion_matrix, PolarMotion};
use crate::razel_errors::RazelError;
use crate::ref_system::{equequ, nutation_matrix, precession_matrix, rot3};
use crate::time::{gmst, Epoch};

/// Validity half-window of the IAU 1976/1980 precession/nutation models,
/// in Julian centuries around J2000.
const MODEL_VALIDITY_CENTURIES: f64 = 1.0;

/// Position/velocity pair in the Earth-Centered Inertial frame
/// (mean equator and equinox of J2000).
///
/// Units: position in kilometers, velocity in kilometers per second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InertialState {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
}

impl InertialState {
    pub fn new(position: Vector3<f64>, velocity: Vector3<f64>) -> Self {
        InertialState { position, velocity }
    }
}

/// Position/velocity pair in the Earth-Centered Earth-Fixed frame.
///
/// Units: position in kilometers, velocity in kilometers per second.
/// Derived through [`eci_to_ecef`], never constructed independently by the
/// pipeline itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EcefState {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
}

impl EcefState {
    pub fn new(position: Vector3<f64>, velocity: Vector3<f64>) -> Self {
        EcefState { position, velocity }
    }
}

/// The four frame rotations of the reduction, evaluated at one epoch:
/// precession `P`, nutation `N`, Earth rotation `R`, polar motion `W`.
struct ReductionMatrices {
    precession: Matrix3<f64>,
    nutation: Matrix3<f64>,
    earth_rotation: Matrix3<f64>,
    polar_motion: Matrix3<f64>,
}

/// Evaluate the four reduction rotations for an epoch and pole offsets.
///
/// Fails with [`RazelError::UnsupportedEpoch`] when the epoch lies outside the
/// stated validity window of the IAU 1976/1980 models (±1 Julian century of
/// J2000); the polynomials are not silently extrapolated beyond it.
fn reduction_matrices(
    epoch: &Epoch,
    polar_motion: &PolarMotion,
) -> Result<ReductionMatrices, RazelError> {
    let mjd_tt = epoch.mjd_tt();
    if epoch.tt_centuries().abs() > MODEL_VALIDITY_CENTURIES {
        return Err(RazelError::UnsupportedEpoch(mjd_tt));
    }

    // Greenwich apparent sidereal time: mean sidereal time from UT1 plus the
    // equation of the equinoxes from TT.
    let gast = gmst(epoch.mjd_ut1()) + equequ(mjd_tt);

    Ok(ReductionMatrices {
        precession: precession_matrix(mjd_tt),
        nutation: nutation_matrix(mjd_tt),
        earth_rotation: rot3(gast),
        polar_motion: polar_motion_matrix(polar_motion),
    })
}

/// Transform an inertial state into the Earth-fixed frame (FK5 reduction).
///
/// The reduction chains four frame rotations, rightmost applied first:
///
/// ```text
/// r_ecef = W · R(gast) · N · P · r_eci
/// ```
///
/// * `P` – IAU 1976 precession, J2000 → mean equator/equinox of date,
/// * `N` – IAU 1980 nutation, mean → true equator/equinox of date,
/// * `R` – Earth rotation by the Greenwich apparent sidereal time (from UT1),
/// * `W` – polar motion, pseudo-Earth-fixed → conventional terrestrial frame.
///
/// The velocity additionally carries the transport term when leaving the
/// inertial frame for the rotating one:
///
/// ```text
/// v_pef = R(gast) · v_tod − ω⊕ × r_pef
/// ```
///
/// Arguments
/// ---------
/// * `state`: inertial position (km) and velocity (km/s).
/// * `epoch`: observation epoch carrying the ΔUT1/ΔAT corrections.
/// * `polar_motion`: pole offsets (arcseconds) for the epoch.
///
/// Return
/// ------
/// * The Earth-fixed state, or [`RazelError::UnsupportedEpoch`] outside the
///   precession/nutation model validity window.
pub fn eci_to_ecef(
    state: &InertialState,
    epoch: &Epoch,
    polar_motion: &PolarMotion,
) -> Result<EcefState, RazelError> {
    let m = reduction_matrices(epoch, polar_motion)?;

    let r_tod = m.nutation * (m.precession * state.position);
    let v_tod = m.nutation * (m.precession * state.velocity);

    let r_pef = m.earth_rotation * r_tod;
    let omega = Vector3::new(0.0, 0.0, EARTH_ROTATION_RATE);
    let v_pef = m.earth_rotation * v_tod - omega.cross(&r_pef);

    Ok(EcefState::new(
        m.polar_motion * r_pef,
        m.polar_motion * v_pef,
    ))
}

/// Transform an Earth-fixed state into the inertial frame (inverse FK5
/// reduction).
///
/// Applies the transposes of the [`eci_to_ecef`] rotations in reverse order and
/// restores the transport term before leaving the rotating frame:
///
/// ```text
/// v_tod = Rᵀ(gast) · (v_pef + ω⊕ × r_pef)
/// ```
///
/// so an Earth-fixed site (zero ECEF velocity) comes out with its inertial
/// rotation velocity ω⊕ × r.
pub fn ecef_to_eci(
    state: &EcefState,
    epoch: &Epoch,
    polar_motion: &PolarMotion,
) -> Result<InertialState, RazelError> {
    let m = reduction_matrices(epoch, polar_motion)?;

    let r_pef = m.polar_motion.transpose() * state.position;
    let v_pef = m.polar_motion.transpose() * state.velocity;

    let omega = Vector3::new(0.0, 0.0, EARTH_ROTATION_RATE);
    let r_tod = m.earth_rotation.transpose() * r_pef;
    let v_tod = m.earth_rotation.transpose() * (v_pef + omega.cross(&r_pef));

    Ok(InertialState::new(
        m.precession.transpose() * (m.nutation.transpose() * r_tod),
        m.precession.transpose() * (m.nutation.transpose() * v_tod),
    ))
}
