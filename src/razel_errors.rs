use thiserror::Error;

use crate::constants::MJD;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RazelError {
    #[error("Invalid epoch: {0}")]
    InvalidEpoch(String),

    #[error("Invalid geodetic input: {0}")]
    InvalidGeodeticInput(String),

    #[error("Epoch outside the validity range of the precession/nutation model: MJD {0}")]
    UnsupportedEpoch(MJD),

    #[error("Topocentric geometry is singular (target at the zenith/nadir axis)")]
    SingularGeometry,
}
