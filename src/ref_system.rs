use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::constants::{ArcSec, Radian, DAYS_PER_CENTURY, MJD, RADEG, RADSEC, T2000};

/// Right-handed rotation of the coordinate frame about the X axis.
///
/// Returns the 3×3 orthonormal matrix `R` such that `x_rotated = R · x`, where
/// `x_rotated` expresses the same vector in the frame rotated by `alpha` radians
/// about X (the classical ROT1 operator). Any real angle is valid; the matrix has
/// determinant 1 and its transpose is its inverse.
pub fn rot1(alpha: Radian) -> Matrix3<f64> {
    Rotation3::from_axis_angle(&Vector3::x_axis(), -alpha).into()
}

/// Right-handed rotation of the coordinate frame about the Y axis (ROT2).
pub fn rot2(alpha: Radian) -> Matrix3<f64> {
    Rotation3::from_axis_angle(&Vector3::y_axis(), -alpha).into()
}

/// Right-handed rotation of the coordinate frame about the Z axis (ROT3).
pub fn rot3(alpha: Radian) -> Matrix3<f64> {
    Rotation3::from_axis_angle(&Vector3::z_axis(), -alpha).into()
}

/// Compute the mean obliquity of the ecliptic at a given epoch (IAU 1976 model).
///
/// This function returns the mean obliquity angle ε, defined as the angle between
/// the Earth's equator and the ecliptic plane, using the standard IAU 1976 polynomial
/// model. The result is expressed in radians.
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date (TT scale).
///
/// Returns
/// --------
/// * Mean obliquity of the ecliptic in radians.
///
/// The cubic polynomial in Julian centuries since J2000 is evaluated with Horner's
/// method, with the coefficients in arcseconds converted to radians.
pub fn obleq(tjm: MJD) -> Radian {
    // Obliquity coefficients
    let ob0 = ((23.0 * 3600.0 + 26.0 * 60.0) + 21.448) * RADSEC;
    let ob1 = -46.815 * RADSEC;
    let ob2 = -0.0006 * RADSEC;
    let ob3 = 0.00181 * RADSEC;

    let t = (tjm - T2000) / DAYS_PER_CENTURY;

    ((ob3 * t + ob2) * t + ob1) * t + ob0
}

/// One periodic term of the IAU 1980 nutation series.
///
/// The five integers multiply the fundamental lunar/solar arguments (l, l', F, D, Ω);
/// the coefficients are in units of 0.0001 arcsecond, with a secular part per
/// Julian century.
struct NutationTerm {
    l: i8,
    lp: i8,
    f: i8,
    d: i8,
    om: i8,
    psi: f64,
    psi_t: f64,
    eps: f64,
    eps_t: f64,
}

const fn term(
    l: i8,
    lp: i8,
    f: i8,
    d: i8,
    om: i8,
    psi: f64,
    psi_t: f64,
    eps: f64,
    eps_t: f64,
) -> NutationTerm {
    NutationTerm {
        l,
        lp,
        f,
        d,
        om,
        psi,
        psi_t,
        eps,
        eps_t,
    }
}

/// IAU 1980 nutation series truncated below 1 mas in longitude.
///
/// Coefficients in 0.0001 arcsecond, from the 1980 IAU theory (Wahr). The omitted
/// tail contributes a few milliarcseconds at most.
const NUTATION_1980_TERMS: [NutationTerm; 35] = [
    term(0, 0, 0, 0, 1, -171996.0, -174.2, 92025.0, 8.9),
    term(0, 0, 0, 0, 2, 2062.0, 0.2, -895.0, 0.5),
    term(-2, 0, 2, 0, 1, 46.0, 0.0, -24.0, 0.0),
    term(2, 0, -2, 0, 0, 11.0, 0.0, 0.0, 0.0),
    term(0, 0, 2, -2, 2, -13187.0, -1.6, 5736.0, -3.1),
    term(0, 1, 0, 0, 0, 1426.0, -3.4, 54.0, -0.1),
    term(0, 1, 2, -2, 2, -517.0, 1.2, 224.0, -0.6),
    term(0, -1, 2, -2, 2, 217.0, -0.5, -95.0, 0.3),
    term(0, 0, 2, -2, 1, 129.0, 0.1, -70.0, 0.0),
    term(2, 0, 0, -2, 0, 48.0, 0.0, 1.0, 0.0),
    term(0, 0, 2, -2, 0, -22.0, 0.0, 0.0, 0.0),
    term(0, 2, 0, 0, 0, 17.0, -0.1, 0.0, 0.0),
    term(0, 1, 0, 0, 1, -15.0, 0.0, 9.0, 0.0),
    term(0, 2, 2, -2, 2, -16.0, 0.1, 7.0, 0.0),
    term(0, -1, 0, 0, 1, -12.0, 0.0, 6.0, 0.0),
    term(0, 0, 2, 0, 2, -2274.0, -0.2, 977.0, -0.5),
    term(1, 0, 0, 0, 0, 712.0, 0.1, -7.0, 0.0),
    term(0, 0, 2, 0, 1, -386.0, -0.4, 200.0, 0.0),
    term(1, 0, 2, 0, 2, -301.0, 0.0, 129.0, -0.1),
    term(1, 0, 0, -2, 0, -158.0, 0.0, -1.0, 0.0),
    term(-1, 0, 2, 0, 2, 123.0, 0.0, -53.0, 0.0),
    term(0, 0, 0, 2, 0, 63.0, 0.0, -2.0, 0.0),
    term(1, 0, 0, 0, 1, 63.0, 0.1, -33.0, 0.0),
    term(-1, 0, 0, 0, 1, -58.0, -0.1, 32.0, 0.0),
    term(-1, 0, 2, 2, 2, -59.0, 0.0, 26.0, 0.0),
    term(1, 0, 2, 0, 1, -51.0, 0.0, 27.0, 0.0),
    term(0, 0, 2, 2, 2, -38.0, 0.0, 16.0, 0.0),
    term(2, 0, 0, 0, 0, 29.0, 0.0, -1.0, 0.0),
    term(1, 0, 2, -2, 2, 29.0, 0.0, -12.0, 0.0),
    term(2, 0, 2, 0, 2, -31.0, 0.0, 13.0, 0.0),
    term(0, 0, 2, 0, 0, 26.0, 0.0, -1.0, 0.0),
    term(-1, 0, 2, 0, 1, 21.0, 0.0, -10.0, 0.0),
    term(-1, 0, 0, 2, 1, 16.0, 0.0, -8.0, 0.0),
    term(1, 0, 0, -2, 1, -13.0, 0.0, 7.0, 0.0),
    term(-1, 0, 2, 2, 1, -10.0, 0.0, 5.0, 0.0),
];

/// Compute the nutation angles in longitude and obliquity (IAU 1980 model).
///
/// Returns the nutation angles (Δψ, Δε): the periodic deviations in ecliptic
/// longitude and in obliquity of the ecliptic, both in arcseconds.
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date (TT scale).
///
/// Returns
/// --------
/// * `(Δψ, Δε)` in arcseconds.
///
/// Description
/// -----------
/// The five fundamental lunar and solar arguments (mean anomaly of the Moon l,
/// mean anomaly of the Sun l', argument of latitude of the Moon F, mean
/// elongation of the Moon from the Sun D, longitude of the Moon's ascending
/// node Ω) are evaluated as 3rd-order polynomials in Julian centuries from
/// J2000, and the angles accumulated over [`NUTATION_1980_TERMS`]. The series is
/// truncated below 1 mas; callers see only the `(Δψ, Δε)` pair, so the precision
/// level is an internal choice.
pub fn nutation_angles(tjm: MJD) -> (ArcSec, ArcSec) {
    let t = (tjm - T2000) / DAYS_PER_CENTURY;
    let t2 = t * t;
    let t3 = t2 * t;

    // Fundamental arguments, in radians
    let l = (485866.733 + 1717915922.633 * t + 31.310 * t2 + 0.064 * t3) * RADSEC;
    let lp = (1287099.804 + 129596581.224 * t - 0.577 * t2 - 0.012 * t3) * RADSEC;
    let f = (335778.877 + 1739527263.137 * t - 13.257 * t2 + 0.011 * t3) * RADSEC;
    let d = (1072261.307 + 1602961601.328 * t - 6.891 * t2 + 0.019 * t3) * RADSEC;
    let om = (450160.280 - 6962890.539 * t + 7.455 * t2 + 0.008 * t3) * RADSEC;

    let mut dpsi = 0.0;
    let mut deps = 0.0;
    for term in &NUTATION_1980_TERMS {
        let arg = term.l as f64 * l
            + term.lp as f64 * lp
            + term.f as f64 * f
            + term.d as f64 * d
            + term.om as f64 * om;
        dpsi += (term.psi + term.psi_t * t) * arg.sin();
        deps += (term.eps + term.eps_t * t) * arg.cos();
    }

    // Convert from 0.0001 arcseconds to arcseconds
    (dpsi * 1e-4, deps * 1e-4)
}

/// Construct the nutation frame rotation (IAU 1980 model).
///
/// Returns the matrix `N` carrying vectors from the mean equator and equinox of
/// date to the true equator and equinox of date:
///
/// ```text
/// x_tod = N · x_mod,    N = rot1(−ε − Δε) · rot3(−Δψ) · rot1(ε)
/// ```
///
/// with ε the mean obliquity from [`obleq`] and (Δψ, Δε) from [`nutation_angles`].
pub fn nutation_matrix(tjm: MJD) -> Matrix3<f64> {
    let epsm = obleq(tjm);

    let (dpsi, deps) = nutation_angles(tjm);
    let dpsi = dpsi * RADSEC;
    let epst = epsm + deps * RADSEC;

    rot1(-epst) * rot3(-dpsi) * rot1(epsm)
}

/// Construct the precession frame rotation from J2000 to the mean equator and
/// equinox of a given epoch (IAU 1976 model).
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date in TT scale (epoch of transformation).
///
/// Returns
/// --------
/// * The matrix `P` such that `x_mod = P · x_j2000`.
///
/// Method
/// ------
/// The equatorial precession angles are polynomials in Julian centuries
/// `T = (tjm − T2000) / 36525`:
///
/// ```text
/// ζ(T) = (0.6406161 + 0.0000839·T + 0.0000050·T²) · T  [deg]
/// θ(T) = (0.5567530 − 0.0001185·T − 0.0000116·T²) · T  [deg]
/// z(T) = (0.6406161 + 0.0003041·T + 0.0000051·T²) · T  [deg]
/// ```
///
/// and the frame rotation is assembled as `rot3(−z) · rot2(θ) · rot3(−ζ)`,
/// rightmost applied first. Valid within a few centuries of J2000.
pub fn precession_matrix(tjm: MJD) -> Matrix3<f64> {
    // Precession polynomial coefficients (in radians)
    let zed = 0.6406161 * RADEG;
    let zd = 0.6406161 * RADEG;
    let thd = 0.5567530 * RADEG;

    let zedd = 0.0000839 * RADEG;
    let zdd = 0.0003041 * RADEG;
    let thdd = -0.0001185 * RADEG;

    let zeddd = 0.0000050 * RADEG;
    let zddd = 0.0000051 * RADEG;
    let thddd = -0.0000116 * RADEG;

    // Julian centuries since J2000
    let t = (tjm - T2000) / DAYS_PER_CENTURY;

    // Precession angles (in radians)
    let zeta = ((zeddd * t + zedd) * t + zed) * t;
    let z = ((zddd * t + zdd) * t + zd) * t;
    let theta = ((thddd * t + thdd) * t + thd) * t;

    rot3(-z) * rot2(theta) * rot3(-zeta)
}

/// Compute the equation of the equinoxes (nutation correction) in radians.
///
/// This term accounts for the small difference between apparent sidereal time
/// and mean sidereal time due to the nutation of Earth's rotation axis:
/// `Eq_eq = Δψ · cos(ε)`.
///
/// # Arguments
/// * `tjm` - Modified Julian Date (MJD, TT time scale)
///
/// # Returns
/// * Equation of the equinoxes in **radians**.
pub fn equequ(tjm: MJD) -> Radian {
    let oblm = obleq(tjm);
    let (dpsi, _deps) = nutation_angles(tjm);

    RADSEC * dpsi * oblm.cos()
}

#[cfg(test)]
mod ref_system_test {
    use super::*;

    use approx::assert_relative_eq;

    fn assert_orthonormal(m: &Matrix3<f64>, tol: f64) {
        let prod = m * m.transpose();
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!(
                    (prod[(i, j)] - expected).abs() < tol,
                    "not orthonormal at ({i},{j}): {}",
                    prod[(i, j)]
                );
            }
        }
        assert_relative_eq!(m.determinant(), 1.0, epsilon = tol);
    }

    #[test]
    fn test_rotation_invariants() {
        let angles = [
            0.0,
            std::f64::consts::FRAC_PI_2,
            std::f64::consts::PI,
            -std::f64::consts::FRAC_PI_2,
            -1.234567,
            5.0,
        ];
        let rotations: [fn(Radian) -> Matrix3<f64>; 3] = [rot1, rot2, rot3];
        for &alpha in &angles {
            for rot in rotations {
                assert_orthonormal(&rot(alpha), 1e-14);
            }
        }
    }

    #[test]
    fn test_rotation_frame_convention() {
        // Frame rotation about Z by +90°: the old +Y axis becomes the new +X axis.
        let r = rot3(std::f64::consts::FRAC_PI_2);
        let rotated = r * Vector3::new(0.0, 1.0, 0.0);
        assert_relative_eq!(rotated.x, 1.0, epsilon = 1e-15);
        assert_relative_eq!(rotated.y, 0.0, epsilon = 1e-15);
        assert_relative_eq!(rotated.z, 0.0, epsilon = 1e-15);

        // ROT1 layout: positive sine above the diagonal
        let r = rot1(0.3);
        assert_relative_eq!(r[(1, 2)], 0.3_f64.sin(), epsilon = 1e-15);
        assert_relative_eq!(r[(2, 1)], -0.3_f64.sin(), epsilon = 1e-15);
    }

    #[test]
    fn test_obliquity() {
        let obl = obleq(T2000);
        assert_eq!(obl, 0.40909280422232897)
    }

    #[test]
    fn test_nutation_angles() {
        // Truncated series at J2000
        let (dpsi, deps) = nutation_angles(T2000);
        assert_relative_eq!(dpsi, -13.923604622351606, epsilon = 1e-12);
        assert_relative_eq!(deps, -5.77367798012483, epsilon = 1e-12);

        // The omitted tail of the series is below 0.01 arcsec of the full
        // 106-term evaluation.
        assert!((dpsi - -13.923385169502602).abs() < 1e-2);
        assert!((deps - -5.773808263765919).abs() < 1e-2);

        let (dpsi, deps) = nutation_angles(53101.5);
        assert_relative_eq!(dpsi, -12.290258740577693, epsilon = 1e-12);
        assert_relative_eq!(deps, 7.303962897403923, epsilon = 1e-12);
    }

    #[test]
    fn test_nutation_matrix_near_identity() {
        let n = nutation_matrix(T2000);
        assert_orthonormal(&n, 1e-12);
        // Nutation is a sub-arcminute correction: diagonal within 1e-6 of unity.
        for i in 0..3 {
            assert!((n[(i, i)] - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_precession_identity_at_j2000() {
        let p = precession_matrix(T2000);
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(p[(i, j)], expected, epsilon = 1e-15);
            }
        }
    }

    #[test]
    fn test_precession_accumulates_over_a_century() {
        let p = precession_matrix(T2000 + DAYS_PER_CENTURY);
        assert_orthonormal(&p, 1e-12);
        // ~0.224° equinox drift over one century: visibly off identity.
        assert!((p[(0, 1)]).abs() > 1e-3);
        assert!((1.0 - p[(0, 0)]).abs() > 1e-6);
    }

    #[test]
    fn test_equequ_at_j2000() {
        let eqeq = equequ(T2000);
        let (dpsi, _) = nutation_angles(T2000);
        let expected = RADSEC * dpsi * obleq(T2000).cos();
        assert_relative_eq!(eqeq, expected, epsilon = 1e-15);
        // Always a sub-arcminute correction
        assert!(eqeq.abs() < 1e-3);
    }

    #[test]
    fn test_equequ_changes_with_time() {
        let eq0 = equequ(51544.5);
        let eq1 = equequ(60000.0);
        assert!((eq1 - eq0).abs() > 1e-7);
    }
}
