use nalgebra::Vector3;

use crate::constants::{
    Degree, Kilometer, Meter, Radian, EARTH_MAJOR_AXIS, EARTH_MINOR_AXIS, MIN_SITE_HEIGHT,
};
use crate::razel_errors::RazelError;

/// Geodetic location of a ground site on the reference ellipsoid.
///
/// Units and sign conventions (fixed across the whole crate):
/// * `latitude`: geodetic latitude in **degrees**, positive north.
/// * `longitude`: geodetic longitude in **degrees**, positive **east** of
///   Greenwich (a site at 104.883° W is expressed as −104.883).
/// * `height`: height above the reference ellipsoid in **meters**.
///
/// Immutable once constructed; [`GeodeticPosition::new`] is the validated path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodeticPosition {
    /// Geodetic latitude in degrees, positive north.
    pub latitude: Degree,
    /// Geodetic longitude in degrees, positive east of Greenwich.
    pub longitude: Degree,
    /// Height above the reference ellipsoid in meters.
    pub height: Meter,
}

impl GeodeticPosition {
    /// Build a validated geodetic position.
    ///
    /// Return
    /// ------
    /// * The position, or [`RazelError::InvalidGeodeticInput`] when |latitude| > 90°,
    ///   the height is more than 1000 m below the ellipsoid, or any field is not
    ///   finite.
    pub fn new(
        latitude: Degree,
        longitude: Degree,
        height: Meter,
    ) -> Result<GeodeticPosition, RazelError> {
        if !latitude.is_finite() || !longitude.is_finite() || !height.is_finite() {
            return Err(RazelError::InvalidGeodeticInput(
                "non-finite coordinate".to_string(),
            ));
        }
        if latitude.abs() > 90.0 {
            return Err(RazelError::InvalidGeodeticInput(format!(
                "latitude {latitude}° outside [-90°, 90°]"
            )));
        }
        if height < MIN_SITE_HEIGHT {
            return Err(RazelError::InvalidGeodeticInput(format!(
                "height {height} m below the {MIN_SITE_HEIGHT} m tolerance under the ellipsoid"
            )));
        }

        Ok(GeodeticPosition {
            latitude,
            longitude,
            height,
        })
    }

    /// Compute the ECEF position vector of the site on the reference ellipsoid.
    ///
    /// The geodetic latitude and height are first turned into normalized parallax
    /// coordinates (ρ·cosφ, ρ·sinφ) via [`geodetic_to_parallax`], accounting for
    /// the Earth's oblateness, then scaled by the equatorial radius and spread
    /// over the site longitude.
    ///
    /// Return
    /// ------
    /// * Site position in the Earth-fixed frame, in **kilometers**.
    pub fn body_fixed_coord(&self) -> Vector3<Kilometer> {
        let (rho_cos_phi, rho_sin_phi) = geodetic_to_parallax(self.latitude, self.height);
        let lon_radians = self.longitude.to_radians();

        Vector3::new(
            EARTH_MAJOR_AXIS * rho_cos_phi * lon_radians.cos(),
            EARTH_MAJOR_AXIS * rho_cos_phi * lon_radians.sin(),
            EARTH_MAJOR_AXIS * rho_sin_phi,
        )
    }
}

/// Convert geodetic latitude and height into normalized parallax coordinates
/// on the Earth.
///
/// The resulting values are dimensionless, expressed in units of the Earth's
/// equatorial radius.
///
/// Arguments
/// ---------
/// * `lat` - Geodetic latitude of the site in **radians**.
/// * `height` - Height above the reference ellipsoid in **kilometers**.
///
/// Returns
/// -------
/// A tuple `(rho_cos_phi, rho_sin_phi)`:
/// * `rho_cos_phi`: normalized distance of the site projected on the equatorial
///   plane.
/// * `rho_sin_phi`: normalized distance of the site projected on the rotation
///   (polar) axis.
///
/// Details
/// -------
/// The computation uses the parametric latitude on the ellipsoid defined by
/// `EARTH_MAJOR_AXIS` / `EARTH_MINOR_AXIS`:
///
/// ```text
/// u = atan( (sin φ · (b/a)) / cos φ )
/// ρ·sinφ = (b/a) · sin u + (h/a) · sin φ
/// ρ·cosφ = cos u + (h/a) · cos φ
/// ```
///
/// The oblateness term moves a mid-latitude site by several kilometers, so no
/// spherical-Earth shortcut is offered.
pub fn lat_alt_to_parallax(lat: Radian, height: Kilometer) -> (f64, f64) {
    let axis_ratio = EARTH_MINOR_AXIS / EARTH_MAJOR_AXIS;

    // Parametric latitude, correcting for the Earth's oblateness
    let u = (lat.sin() * axis_ratio).atan2(lat.cos());

    let rho_sin_phi = axis_ratio * u.sin() + (height / EARTH_MAJOR_AXIS) * lat.sin();
    let rho_cos_phi = u.cos() + (height / EARTH_MAJOR_AXIS) * lat.cos();

    (rho_cos_phi, rho_sin_phi)
}

/// Convert geodetic latitude (in degrees) and height (in meters) into
/// normalized parallax coordinates.
///
/// Convenience wrapper around [`lat_alt_to_parallax`] performing the
/// degrees-to-radians and meters-to-kilometers conversions.
pub fn geodetic_to_parallax(lat: Degree, height: Meter) -> (f64, f64) {
    lat_alt_to_parallax(lat.to_radians(), height / 1000.0)
}
