use crate::CoreError;

pub fn ensure_finite(v: f64, what: &'static str) -> Result<f64, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Round to a fixed number of decimal places.
///
/// Rounds the exact binary value of `v`, so `18.95` (stored as
/// 18.94999...) goes down to 18.9. Exact ties go to the even digit.
/// Scaling by `10^decimals` first would perturb values sitting next to a
/// tie, which is why this goes through the decimal formatter instead.
///
/// Telemetry values (damper settings, fan power, reported temperatures) are
/// published at fixed precision, so every rounding site goes through here.
pub fn round_to(v: f64, decimals: u32) -> f64 {
    if !v.is_finite() {
        return v;
    }
    format!("{:.*}", decimals as usize, v).parse().unwrap_or(v)
}
