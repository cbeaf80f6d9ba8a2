use nalgebra::Matrix3;

use crate::constants::{ArcSec, MJD, RADSEC};
use crate::razel_errors::RazelError;
use crate::ref_system::{rot1, rot2};

/// Pole offsets (x_p, y_p) of the instantaneous rotation axis relative to the
/// conventional terrestrial pole, in **arcseconds**, valid for a given date.
///
/// Arcseconds are the unit IERS bulletins publish and the unit used at every
/// interface of this crate; conversion to radians happens only inside
/// [`polar_motion_matrix`]. The default value is zero pole offsets.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PolarMotion {
    /// Pole offset along the Greenwich meridian, in arcseconds.
    pub x_p: ArcSec,
    /// Pole offset along the 90° W meridian, in arcseconds.
    pub y_p: ArcSec,
}

impl PolarMotion {
    pub fn new(x_p: ArcSec, y_p: ArcSec) -> Self {
        PolarMotion { x_p, y_p }
    }
}

/// Construct the polar-motion frame rotation.
///
/// Returns the matrix `W` carrying vectors from the pseudo-Earth-fixed frame
/// (true equator, Greenwich meridian) to the conventional terrestrial frame:
///
/// ```text
/// x_ecef = W · x_pef,    W = rot2(−x_p) · rot1(−y_p)
/// ```
///
/// The pole offsets are small angles (fractions of an arcsecond), so `W` stays
/// within microradians of identity.
pub fn polar_motion_matrix(polar_motion: &PolarMotion) -> Matrix3<f64> {
    rot2(-polar_motion.x_p * RADSEC) * rot1(-polar_motion.y_p * RADSEC)
}

/// Source of published Earth-orientation corrections for a requested date.
///
/// This is the seam to the bulletin data (IERS Bulletin A/C/D): retrieval,
/// parsing, caching and retry policy all live behind the implementation.
/// Implementations report missing or stale data as
/// [`RazelError::InvalidEpoch`]; this crate never retries.
///
/// The provider is always passed explicitly (dependency injection); there is
/// no ambient singleton fetching live bulletins.
pub trait EarthOrientationProvider {
    /// ΔAT, the TAI − UTC leap-second count, in integer seconds.
    fn current_leap_second_count(&self, mjd_utc: MJD) -> Result<i32, RazelError>;

    /// ΔUT1, the UT1 − UTC offset in seconds (|value| < 1.0).
    fn current_ut1_offset(&self, mjd_utc: MJD) -> Result<f64, RazelError>;

    /// Pole offsets (x_p, y_p) in arcseconds.
    fn current_polar_motion(&self, mjd_utc: MJD) -> Result<PolarMotion, RazelError>;
}

/// Fixed correction values read once from a bulletin, with an optional validity
/// window.
///
/// This is the deterministic provider used in tests and by callers that resolve
/// the bulletin values themselves: it hands back the stored numbers for any date
/// inside the window and fails with [`RazelError::InvalidEpoch`] outside it
/// (stale data is a hard input-validation failure, not something to retry).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BulletinValues {
    pub delta_at: i32,
    pub delta_ut1: f64,
    pub polar_motion: PolarMotion,
    /// Inclusive MJD range the stored values are published for, if bounded.
    pub validity: Option<(MJD, MJD)>,
}

impl BulletinValues {
    /// Bulletin values usable for any date.
    pub fn new(delta_at: i32, delta_ut1: f64, polar_motion: PolarMotion) -> Self {
        BulletinValues {
            delta_at,
            delta_ut1,
            polar_motion,
            validity: None,
        }
    }

    /// Bulletin values valid only inside `[from, until]` (MJD, inclusive).
    pub fn with_validity(
        delta_at: i32,
        delta_ut1: f64,
        polar_motion: PolarMotion,
        from: MJD,
        until: MJD,
    ) -> Self {
        BulletinValues {
            delta_at,
            delta_ut1,
            polar_motion,
            validity: Some((from, until)),
        }
    }

    fn check_validity(&self, mjd_utc: MJD) -> Result<(), RazelError> {
        match self.validity {
            Some((from, until)) if mjd_utc < from || mjd_utc > until => {
                Err(RazelError::InvalidEpoch(format!(
                    "MJD {mjd_utc} outside the bulletin validity range [{from}, {until}]"
                )))
            }
            _ => Ok(()),
        }
    }
}

impl EarthOrientationProvider for BulletinValues {
    fn current_leap_second_count(&self, mjd_utc: MJD) -> Result<i32, RazelError> {
        self.check_validity(mjd_utc)?;
        Ok(self.delta_at)
    }

    fn current_ut1_offset(&self, mjd_utc: MJD) -> Result<f64, RazelError> {
        self.check_validity(mjd_utc)?;
        Ok(self.delta_ut1)
    }

    fn current_polar_motion(&self, mjd_utc: MJD) -> Result<PolarMotion, RazelError> {
        self.check_validity(mjd_utc)?;
        Ok(self.polar_motion)
    }
}
