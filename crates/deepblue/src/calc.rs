//! Compliance calculators.
//!
//! Pure, deterministic transformations from small numeric inputs to derived
//! maritime metrics. Inputs are validated before any arithmetic so a bad
//! slider value yields an explicit error instead of a NaN or infinity
//! leaking into a display.

use crate::error::{Error, Result};
use crate::records::RestLog;

/// Absolute trim above which the reading is flagged.
pub const TRIM_WARNING_M: f64 = 2.0;

/// Slip percentage above which the reading is flagged.
pub const SLIP_WARNING_PERCENT: f64 = 15.0;

/// Spread between air temperature and dew point below which cargo-hold
/// ventilation is advised.
pub const VENTILATION_MARGIN_C: f64 = 3.0;

/// Minimum daily rest hours before a day is flagged as a violation.
///
/// Policy constant without a demonstrated derivation from the convention
/// text; operators can override it via configuration or
/// [`rest_compliance_with_minimum`].
pub const MIN_REST_HOURS: u32 = 10;

/// Meters per nautical mile.
const METERS_PER_NM: f64 = 1852.0;

/// Reject a non-finite or non-positive value with a named error.
fn require_positive(value: f64, name: &str) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::invalid_input(format!("{name} must be positive")));
    }
    Ok(())
}

/// Vessel trim: the signed difference between aft and fore draft.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimReading {
    /// Trim in meters; positive means stern-down.
    pub meters: f64,
}

impl TrimReading {
    /// Whether the trim magnitude exceeds the warning threshold.
    #[must_use]
    pub fn is_warning(&self) -> bool {
        self.meters.abs() > TRIM_WARNING_M
    }
}

/// Compute vessel trim from fore and aft drafts in meters.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if either draft is non-positive or
/// non-finite.
pub fn trim(fore_draft_m: f64, aft_draft_m: f64) -> Result<TrimReading> {
    require_positive(fore_draft_m, "fore draft")?;
    require_positive(aft_draft_m, "aft draft")?;

    Ok(TrimReading {
        meters: aft_draft_m - fore_draft_m,
    })
}

/// Propeller slip: how far actual speed falls short of pitch speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlipReading {
    /// Slip percentage; negative values mean the vessel outruns its pitch
    /// speed (following current).
    pub percent: f64,
}

impl SlipReading {
    /// Whether the slip exceeds the warning threshold.
    #[must_use]
    pub fn is_warning(&self) -> bool {
        self.percent > SLIP_WARNING_PERCENT
    }
}

/// Compute propeller slip from shaft RPM, propeller pitch (m), and observed
/// speed (knots).
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if any input is non-positive or
/// non-finite; a zero denominator is rejected here rather than computed.
pub fn propeller_slip(rpm: f64, pitch_m: f64, speed_kn: f64) -> Result<SlipReading> {
    require_positive(rpm, "rpm")?;
    require_positive(pitch_m, "propeller pitch")?;
    require_positive(speed_kn, "observed speed")?;

    let advance_m_per_hour = speed_kn * METERS_PER_NM;
    let pitch_m_per_hour = rpm * pitch_m * 60.0;

    Ok(SlipReading {
        percent: (1.0 - advance_m_per_hour / pitch_m_per_hour) * 100.0,
    })
}

/// Dew point estimate and the ventilation call derived from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DewPointReading {
    /// Estimated dew point in °C.
    pub dew_point_c: f64,
    /// Air temperature the estimate was computed from.
    pub temperature_c: f64,
}

impl DewPointReading {
    /// Whether cargo-hold ventilation is advised.
    ///
    /// Advised only when the spread is strictly below the margin; a spread
    /// of exactly 3.0 °C is not a ventilation call.
    #[must_use]
    pub fn ventilation_advised(&self) -> bool {
        (self.temperature_c - self.dew_point_c) < VENTILATION_MARGIN_C
    }
}

/// Estimate the dew point from air temperature (°C) and relative humidity
/// (percent, 10–100).
///
/// This is the coarse linear approximation `temp − (100 − rh) / 5`, kept for
/// parity with shipboard practice. It is not the Magnus formula and is not
/// measurement-grade.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if the temperature is non-finite or the
/// humidity is outside 10..=100.
pub fn dew_point(temperature_c: f64, relative_humidity: f64) -> Result<DewPointReading> {
    if !temperature_c.is_finite() {
        return Err(Error::invalid_input("temperature must be finite"));
    }
    if !relative_humidity.is_finite() || !(10.0..=100.0).contains(&relative_humidity) {
        return Err(Error::invalid_input(
            "relative humidity must be between 10 and 100 percent",
        ));
    }

    Ok(DewPointReading {
        dew_point_c: temperature_c - (100.0 - relative_humidity) / 5.0,
        temperature_c,
    })
}

/// Estimate the UTC offset (whole hours) for a longitude in degrees.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if the longitude is outside −180..=180.
pub fn utc_offset(longitude_deg: f64) -> Result<i32> {
    if !longitude_deg.is_finite() || !(-180.0..=180.0).contains(&longitude_deg) {
        return Err(Error::invalid_input(
            "longitude must be between -180 and 180 degrees",
        ));
    }

    #[allow(clippy::cast_possible_truncation)]
    let zone = (longitude_deg / 15.0).round() as i32;
    Ok(zone)
}

/// Result of a rest-hour compliance check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestCompliance {
    /// Resting (off-duty) hours in the day.
    pub rest_hours: u32,
    /// Whether the day falls below the required minimum.
    pub violation: bool,
}

/// Check a rest log against the default minimum rest requirement.
#[must_use]
pub fn rest_compliance(log: &RestLog) -> RestCompliance {
    rest_compliance_with_minimum(log, MIN_REST_HOURS)
}

/// Check a rest log against an explicit minimum rest requirement.
#[must_use]
pub fn rest_compliance_with_minimum(log: &RestLog, min_rest_hours: u32) -> RestCompliance {
    let rest_hours = log.rest_hours();
    RestCompliance {
        rest_hours,
        violation: rest_hours < min_rest_hours,
    }
}
