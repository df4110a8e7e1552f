//! Conversions between annual and monthly effective rates and volatilities.
//!
//! All functions take and return percentages. Negative rates are valid and
//! describe contraction; nothing here can fail.

use serde::{Deserialize, Serialize};

use crate::types::{Fraction, Percent};

const MONTHS_PER_YEAR: f64 = 12.0;

/// Annual effective rate (percent) to the equivalent monthly rate (percent).
pub fn annual_to_monthly_rate(annual_pct: Percent) -> Percent {
    ((1.0 + annual_pct / 100.0).powf(1.0 / MONTHS_PER_YEAR) - 1.0) * 100.0
}

/// Monthly effective rate (percent) to the equivalent annual rate (percent).
pub fn monthly_to_annual_rate(monthly_pct: Percent) -> Percent {
    ((1.0 + monthly_pct / 100.0).powi(12) - 1.0) * 100.0
}

/// Annual volatility (percent) scaled down to one month.
pub fn annual_to_monthly_sigma(sigma_annual_pct: Percent) -> Percent {
    sigma_annual_pct / MONTHS_PER_YEAR.sqrt()
}

/// Monthly volatility (percent) scaled up to one year.
pub fn monthly_sigma_to_annual(sigma_monthly_pct: Percent) -> Percent {
    sigma_monthly_pct * MONTHS_PER_YEAR.sqrt()
}

/// Annual percent straight to a monthly decimal fraction.
pub fn monthly_fraction_from_annual(annual_pct: Percent) -> Fraction {
    annual_to_monthly_rate(annual_pct) / 100.0
}

/// A rate with exactly one authoritative unit.
///
/// The other unit is always derived on demand and is never fed back as an
/// input, so a value typed as monthly is not put through a lossy round trip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "pct", rename_all = "snake_case")]
pub enum RateSpec {
    Annual(Percent),
    Monthly(Percent),
}

impl RateSpec {
    pub fn annual_pct(self) -> Percent {
        match self {
            RateSpec::Annual(pct) => pct,
            RateSpec::Monthly(pct) => monthly_to_annual_rate(pct),
        }
    }

    pub fn monthly_pct(self) -> Percent {
        match self {
            RateSpec::Annual(pct) => annual_to_monthly_rate(pct),
            RateSpec::Monthly(pct) => pct,
        }
    }

    pub fn monthly_fraction(self) -> Fraction {
        self.monthly_pct() / 100.0
    }
}
