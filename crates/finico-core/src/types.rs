use serde::{Deserialize, Serialize};

use crate::error::FinicoError;
use crate::FinicoResult;

/// Monetary amounts, in whatever single unit the caller works in.
pub type Money = f64;

/// Rates expressed as percentages (7.0 = 7%), the unit every request uses.
pub type Percent = f64;

/// Rates expressed as decimal fractions (0.07 = 7%), used in result metadata.
pub type Fraction = f64;

/// Magnitude beyond which a series is flagged as numerically unstable.
/// Longest horizon accepted by any projection or simulation, in years.
pub const MAX_HORIZON_YEARS: u32 = 1_000;

pub const NUMERIC_WARNING_THRESHOLD: f64 = 1e15;

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "ieee754_f64".to_string(),
        },
    }
}

/// Push a warning when any value in `values` is non-finite or overflow-adjacent.
///
/// Values are never altered; IEEE-754 infinities and NaNs propagate to the
/// caller untouched.
pub fn flag_numeric_instability(label: &str, values: &[f64], warnings: &mut Vec<String>) {
    let non_finite = values.iter().filter(|v| !v.is_finite()).count();
    if non_finite > 0 {
        tracing::warn!(series = label, non_finite, "non-finite values in result");
        warnings.push(format!(
            "{label}: {non_finite} non-finite value(s); inputs exceed floating-point range"
        ));
        return;
    }
    if let Some(peak) = values
        .iter()
        .map(|v| v.abs())
        .find(|v| *v > NUMERIC_WARNING_THRESHOLD)
    {
        tracing::warn!(series = label, peak, "magnitude near floating-point limits");
        warnings.push(format!(
            "{label}: magnitude {peak:.3e} exceeds {NUMERIC_WARNING_THRESHOLD:e}; precision degraded"
        ));
    }
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

pub(crate) fn require_finite(field: &str, value: f64) -> FinicoResult<()> {
    if !value.is_finite() {
        return Err(FinicoError::invalid(field, "Must be a finite number"));
    }
    Ok(())
}

pub(crate) fn require_non_negative(field: &str, value: f64) -> FinicoResult<()> {
    require_finite(field, value)?;
    if value < 0.0 {
        return Err(FinicoError::invalid(field, "Must be >= 0"));
    }
    Ok(())
}

pub(crate) fn require_positive(field: &str, value: f64) -> FinicoResult<()> {
    require_finite(field, value)?;
    if value <= 0.0 {
        return Err(FinicoError::invalid(field, "Must be > 0"));
    }
    Ok(())
}

/// Whole-year horizon between 1 and [`MAX_HORIZON_YEARS`].
pub(crate) fn require_horizon_years(field: &str, years: u32) -> FinicoResult<()> {
    if years == 0 {
        return Err(FinicoError::invalid(field, "Must be at least 1"));
    }
    if years > MAX_HORIZON_YEARS {
        return Err(FinicoError::invalid(
            field,
            format!("Must not exceed {MAX_HORIZON_YEARS} years"),
        ));
    }
    Ok(())
}
