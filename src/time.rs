use crate::constants::{DAYS_PER_CENTURY, DPI, JDTOMJD, SECONDS_PER_DAY, T2000, TT_TAI_OFFSET};
use crate::constants::{JD, MJD};
use crate::earth_orientation::{EarthOrientationProvider, PolarMotion};
use crate::razel_errors::RazelError;

/// Number of days in each month of a non-leap year.
const DAYS_IN_MONTH: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// A calendar UTC timestamp together with the Earth-orientation correction values
/// needed to derive the UT1, TAI and TT time scales.
///
/// The calendar fields are interpreted in the UTC scale. `delta_ut1` is the published
/// UT1 − UTC offset in seconds (|ΔUT1| < 1.0 by construction), `delta_at` the published
/// TAI − UTC leap-second count in integer seconds.
///
/// An `Epoch` is immutable once constructed; [`Epoch::new`] is the validated path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Epoch {
    year: i32,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: f64,
    delta_ut1: f64,
    delta_at: i32,
}

impl Epoch {
    /// Build a validated epoch from calendar UTC fields and correction values.
    ///
    /// Arguments
    /// ---------
    /// * `year`: calendar year. Dates are restricted to 1900-03-01 through
    ///   2100-02-28, the validity range of the Gregorian day-count formula used
    ///   by [`Epoch::julian_date`] (the century leap-year rule bites just
    ///   outside it).
    /// * `month`, `day`, `hour`, `minute`: calendar fields, usual ranges.
    /// * `second`: seconds with fraction, in `[0, 61)` so that a leap-second
    ///   timestamp (23:59:60.x) stays representable.
    /// * `delta_ut1`: UT1 − UTC in seconds, |ΔUT1| must be < 1.0.
    /// * `delta_at`: TAI − UTC leap-second count in seconds, must be ≥ 0.
    ///
    /// Return
    /// ------
    /// * The epoch, or [`RazelError::InvalidEpoch`] when a field is out of calendar
    ///   range or a correction value is implausible (stale or corrupt bulletin data).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: f64,
        delta_ut1: f64,
        delta_at: i32,
    ) -> Result<Epoch, RazelError> {
        if !(1900..=2100).contains(&year) {
            return Err(RazelError::InvalidEpoch(format!(
                "year {year} outside 1900..=2100"
            )));
        }
        if !(1..=12).contains(&month) {
            return Err(RazelError::InvalidEpoch(format!("month {month}")));
        }
        if day < 1 || day > days_in_month(year, month) {
            return Err(RazelError::InvalidEpoch(format!(
                "day {day} for {year}-{month:02}"
            )));
        }
        if (year == 1900 && month < 3) || (year == 2100 && month > 2) {
            return Err(RazelError::InvalidEpoch(format!(
                "{year}-{month:02} outside the 1900-03-01..2100-02-28 day-count validity range"
            )));
        }
        if hour > 23 {
            return Err(RazelError::InvalidEpoch(format!("hour {hour}")));
        }
        if minute > 59 {
            return Err(RazelError::InvalidEpoch(format!("minute {minute}")));
        }
        if !second.is_finite() || !(0.0..61.0).contains(&second) {
            return Err(RazelError::InvalidEpoch(format!("second {second}")));
        }
        if !delta_ut1.is_finite() || delta_ut1.abs() >= 1.0 {
            return Err(RazelError::InvalidEpoch(format!(
                "ΔUT1 = {delta_ut1} s (|ΔUT1| must be < 1.0)"
            )));
        }
        if delta_at < 0 {
            return Err(RazelError::InvalidEpoch(format!(
                "ΔAT = {delta_at} s (must be ≥ 0)"
            )));
        }

        Ok(Epoch {
            year,
            month,
            day,
            hour,
            minute,
            second,
            delta_ut1,
            delta_at,
        })
    }

    /// Build an epoch from a [`hifitime::Epoch`] plus correction values.
    ///
    /// The hifitime epoch is expanded into its Gregorian UTC fields and validated
    /// through [`Epoch::new`].
    pub fn from_hifitime(
        epoch: &hifitime::Epoch,
        delta_ut1: f64,
        delta_at: i32,
    ) -> Result<Epoch, RazelError> {
        let (year, month, day, hour, minute, second, nanos) = epoch.to_gregorian_utc();
        Epoch::new(
            year,
            month,
            day,
            hour,
            minute,
            second as f64 + nanos as f64 * 1e-9,
            delta_ut1,
            delta_at,
        )
    }

    /// Build an epoch and the matching pole offsets from an injected
    /// Earth-orientation provider.
    ///
    /// The provider is queried once at the date of the timestamp; unavailable or
    /// stale data surfaces as the provider's own [`RazelError::InvalidEpoch`].
    ///
    /// Return
    /// ------
    /// * `(epoch, polar_motion)` ready to feed into
    ///   [`razel`](crate::razel::razel) or [`eci_to_ecef`](crate::fk5::eci_to_ecef).
    pub fn from_provider(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: f64,
        provider: &impl EarthOrientationProvider,
    ) -> Result<(Epoch, PolarMotion), RazelError> {
        // Correction-free probe, used only to locate the date for the provider queries.
        let probe = Epoch::new(year, month, day, hour, minute, second, 0.0, 0)?;
        let mjd = probe.modified_julian_date();

        let delta_at = provider.current_leap_second_count(mjd)?;
        let delta_ut1 = provider.current_ut1_offset(mjd)?;
        let polar_motion = provider.current_polar_motion(mjd)?;

        let epoch = Epoch::new(year, month, day, hour, minute, second, delta_ut1, delta_at)?;
        Ok((epoch, polar_motion))
    }

    /// Compute the Julian Date (UTC scale) of this epoch.
    ///
    /// Uses the standard Gregorian day-count formula (Vallado, Algorithm 14) with
    /// true floor division on the integer terms and the fractional-day term
    /// `(((s/60 + m)/60 + h)/24)` on the **true hour**, so the result is continuous
    /// through midnight and strictly increasing in calendar time.
    pub fn julian_date(&self) -> JD {
        let year = self.year as f64;
        let month = self.month as f64;
        let day = self.day as f64;

        let day_count = 367.0 * year - (7.0 * (year + ((month + 9.0) / 12.0).floor()) / 4.0).floor()
            + (275.0 * month / 9.0).floor()
            + day
            + 1_721_013.5;
        let day_fraction =
            ((self.second / 60.0 + self.minute as f64) / 60.0 + self.hour as f64) / 24.0;

        day_count + day_fraction
    }

    /// Modified Julian Date (UTC scale): JD − 2400000.5, exactly.
    pub fn modified_julian_date(&self) -> MJD {
        self.julian_date() - JDTOMJD
    }

    /// Modified Julian Date in the UT1 scale: UTC + ΔUT1.
    pub fn mjd_ut1(&self) -> MJD {
        self.modified_julian_date() + self.delta_ut1 / SECONDS_PER_DAY
    }

    /// Modified Julian Date in the TAI scale: UTC + ΔAT.
    pub fn mjd_tai(&self) -> MJD {
        self.modified_julian_date() + self.delta_at as f64 / SECONDS_PER_DAY
    }

    /// Modified Julian Date in the TT scale: TAI + 32.184 s.
    pub fn mjd_tt(&self) -> MJD {
        self.mjd_tai() + TT_TAI_OFFSET / SECONDS_PER_DAY
    }

    /// Julian centuries of TT elapsed since J2000.0.
    pub fn tt_centuries(&self) -> f64 {
        (self.mjd_tt() - T2000) / DAYS_PER_CENTURY
    }
}

fn days_in_month(year: i32, month: u8) -> u8 {
    let leap = (year % 4 == 0 && year % 100 != 0) || year % 400 == 0;
    if month == 2 && leap {
        29
    } else {
        DAYS_IN_MONTH[(month - 1) as usize]
    }
}

/// Compute the Greenwich Mean Sidereal Time (GMST) in radians
/// for a given Modified Julian Date (UT1 time scale).
///
/// This function implements the IAU 1982 polynomial formula
/// for the mean sidereal time at 0h UT1, plus the fractional-day
/// correction term due to Earth's rotation rate.
///
/// # Arguments
/// * `tjm` - Modified Julian Date (MJD, UT1 time scale)
///
/// # Returns
/// * GMST angle in radians, normalized to the interval [0, 2π).
///
/// # Details
/// The GMST is computed in two steps:
/// 1. Use a cubic polynomial (coefficients C0–C3) to get GMST at 0h UT1
///    in seconds for the given date.
/// 2. Add the contribution of Earth's rotation during the fractional day
///    using the factor `RAP`, which converts solar days to sidereal days.
pub fn gmst(tjm: MJD) -> f64 {
    // Polynomial coefficients for GMST at 0h UT1 (in seconds)
    const C0: f64 = 24110.54841;
    const C1: f64 = 8640184.812866;
    const C2: f64 = 9.3104e-2;
    const C3: f64 = -6.2e-6;

    // Ratio of sidereal day to solar day
    const RAP: f64 = 1.00273790934;

    // Extract the integer MJD (0h UT1) and compute centuries since J2000.0
    let itjm = tjm.floor();
    let t = (itjm - T2000) / DAYS_PER_CENTURY;

    // GMST at 0h UT1, converted from seconds to radians
    let mut gmst0 = ((C3 * t + C2) * t + C1) * t + C0;
    gmst0 *= DPI / SECONDS_PER_DAY;

    // Contribution from the fraction of the day, scaled to the sidereal rate
    let h = tjm.fract() * DPI;
    let mut gmst = gmst0 + h * RAP;

    // Normalize to the [0, 2π) range
    let mut i: i64 = (gmst / DPI).floor() as i64;
    if gmst < 0.0 {
        i -= 1;
    }
    gmst -= i as f64 * DPI;

    gmst
}
