use approx::assert_relative_eq;
use nalgebra::Vector3;

use razel::earth_orientation::{BulletinValues, EarthOrientationProvider, PolarMotion};
use razel::fk5::{ecef_to_eci, eci_to_ecef, EcefState, InertialState};
use razel::observers::GeodeticPosition;
use razel::razel::{razel, razel_from_ecef};
use razel::razel_errors::RazelError;
use razel::time::Epoch;

/// Bulletin values published for mid-June 2025.
fn bulletin() -> BulletinValues {
    BulletinValues::with_validity(
        37,
        0.0362,
        PolarMotion::new(0.1424, 0.4571),
        60800.0,
        60900.0,
    )
}

/// An overhead station pass: the target sits 420 km above a site near
/// Greenwich, moving north-east at orbital speed. The inertial state below is
/// the exact image of that Earth-fixed geometry at the epoch.
#[test]
fn overhead_pass_observables() {
    let (epoch, polar_motion) =
        Epoch::from_provider(2025, 6, 15, 21, 10, 30.0, &bulletin()).unwrap();
    let site = GeodeticPosition::new(51.5, 0.51, 50.0).unwrap();

    let state = InertialState::new(
        Vector3::new(-3003.976423936722, -2844.7169139920384, 5379.35753151661),
        Vector3::new(7.085948920010483, -1.3189095011413132, 3.1875404677158428),
    );

    let obs = razel(&state, &epoch, &site, Some(polar_motion)).unwrap();

    // Observables of the fabricated SEZ geometry (ρ_sez = (−120, 80, 420) km,
    // ρ̇_sez = (−5.4, 5.43, −0.2) km/s).
    assert_relative_eq!(obs.range, 444.07206622349213, epsilon = 1e-5);
    assert_relative_eq!(obs.azimuth, 0.5880026035475789, epsilon = 1e-7);
    assert_relative_eq!(obs.elevation, 1.2400259670535874, epsilon = 1e-7);
    assert_relative_eq!(obs.range_rate, 2.248283726762316, epsilon = 1e-7);
    assert_relative_eq!(obs.azimuth_rate, 0.010557692307691791, epsilon = 1e-9);
    assert_relative_eq!(obs.elevation_rate, -0.01613074921538133, epsilon = 1e-9);

    // High pass, well above the horizon and closing on the north-east.
    assert!(obs.elevation > 1.2);
    assert!(obs.azimuth > 0.0 && obs.azimuth < std::f64::consts::FRAC_PI_2);
}

/// The entry point must agree with composing the reduction and the
/// topocentric projection by hand.
#[test]
fn razel_matches_manual_composition() {
    let (epoch, polar_motion) =
        Epoch::from_provider(2025, 6, 15, 21, 10, 30.0, &bulletin()).unwrap();
    let site = GeodeticPosition::new(51.5, 0.51, 50.0).unwrap();
    let state = InertialState::new(
        Vector3::new(-3003.976423936722, -2844.7169139920384, 5379.35753151661),
        Vector3::new(7.085948920010483, -1.3189095011413132, 3.1875404677158428),
    );

    let through_entry_point = razel(&state, &epoch, &site, Some(polar_motion)).unwrap();

    let ecef = eci_to_ecef(&state, &epoch, &polar_motion).unwrap();
    let composed = razel_from_ecef(&ecef, &site).unwrap();

    assert_eq!(through_entry_point, composed);
}

/// Reducing to the Earth-fixed frame and lifting back must reproduce the
/// inertial state, including the transport term on the velocity.
#[test]
fn reduction_round_trip() {
    let (epoch, polar_motion) =
        Epoch::from_provider(2025, 6, 15, 21, 10, 30.0, &bulletin()).unwrap();
    let state = InertialState::new(
        Vector3::new(-3003.976423936722, -2844.7169139920384, 5379.35753151661),
        Vector3::new(7.085948920010483, -1.3189095011413132, 3.1875404677158428),
    );

    let ecef = eci_to_ecef(&state, &epoch, &polar_motion).unwrap();
    let back = ecef_to_eci(&ecef, &epoch, &polar_motion).unwrap();

    for i in 0..3 {
        assert_relative_eq!(back.position[i], state.position[i], epsilon = 1e-8);
        assert_relative_eq!(back.velocity[i], state.velocity[i], epsilon = 1e-11);
    }

    // The ECEF speed differs from the inertial speed by the frame rotation.
    let transport = Vector3::new(0.0, 0.0, razel::constants::EARTH_ROTATION_RATE)
        .cross(&ecef.position);
    assert_relative_eq!(
        (ecef.velocity + transport).norm(),
        state.velocity.norm(),
        epsilon = 1e-5
    );
}

/// Stale bulletin data is a hard failure before any geometry is computed.
#[test]
fn stale_bulletin_is_rejected() {
    let result = Epoch::from_provider(2026, 1, 1, 0, 0, 0.0, &bulletin());
    assert!(matches!(result, Err(RazelError::InvalidEpoch(_))));

    // The provider itself reports the same failure for a direct query.
    assert!(bulletin().current_ut1_offset(61000.0).is_err());
}

/// A target exactly on the site zenith axis in the Earth-fixed frame is a
/// singular geometry for the rates.
#[test]
fn zenith_geometry_is_singular() {
    let site = GeodeticPosition::new(0.0, 0.0, 0.0).unwrap();
    // On the equator at zero longitude the zenith is the ECEF X axis, so the
    // horizontal SEZ components cancel exactly.
    let state = EcefState::new(
        site.body_fixed_coord() + Vector3::new(400.0, 0.0, 0.0),
        Vector3::new(-1.2, 0.0, 0.0),
    );
    assert!(matches!(
        razel_from_ecef(&state, &site),
        Err(RazelError::SingularGeometry)
    ));
}
