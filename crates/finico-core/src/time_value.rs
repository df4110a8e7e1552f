use crate::error::FinicoError;
use crate::types::{Fraction, Money};
use crate::FinicoResult;

/// Below this gap the growing-annuity factor switches to its limit form.
const GROWTH_EQUALITY_EPSILON: f64 = 1e-9;

/// Level payment that amortizes `principal` over `nper` periods at `rate` per period.
pub fn annuity_payment(principal: Money, rate: Fraction, nper: u32) -> FinicoResult<Money> {
    if nper == 0 {
        return Err(FinicoError::invalid(
            "nper",
            "Number of periods must be > 0",
        ));
    }

    let n = f64::from(nper);
    if rate == 0.0 {
        return Ok(principal / n);
    }

    Ok(principal * rate / (1.0 - (1.0 + rate).powf(-n)))
}

/// Value of `present` after compounding for `nper` periods.
pub fn future_value(present: Money, rate: Fraction, nper: u32) -> Money {
    present * (1.0 + rate).powi(nper as i32)
}

/// Future value of an end-of-period level annuity.
pub fn future_value_annuity(payment: Money, rate: Fraction, nper: u32) -> Money {
    let n = f64::from(nper);
    if rate == 0.0 {
        return payment * n;
    }
    payment * ((1.0 + rate).powi(nper as i32) - 1.0) / rate
}

/// Future value of one unit of an end-of-period annuity whose payment grows by
/// `growth` every period, compounding at `rate`.
pub fn growing_annuity_factor(rate: Fraction, growth: Fraction, nper: u32) -> f64 {
    let n = nper as i32;
    if (rate - growth).abs() < GROWTH_EQUALITY_EPSILON {
        return f64::from(nper) * (1.0 + rate).powi(n - 1);
    }
    ((1.0 + rate).powi(n) - (1.0 + growth).powi(n)) / (rate - growth)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_known_mortgage() {
        // 250k at 6.5% over 30 years monthly => ~1580.17
        let pmt = annuity_payment(250_000.0, 0.065 / 12.0, 360).unwrap();
        assert!((pmt - 1580.17).abs() < 0.01, "pmt={pmt}");
    }

    #[test]
    fn test_payment_zero_rate() {
        let pmt = annuity_payment(1200.0, 0.0, 12).unwrap();
        assert_eq!(pmt, 100.0);
    }

    #[test]
    fn test_payment_zero_periods_rejected() {
        assert!(annuity_payment(1000.0, 0.01, 0).is_err());
    }

    #[test]
    fn test_future_value_annuity_zero_rate() {
        assert_eq!(future_value_annuity(300.0, 0.0, 240), 72_000.0);
    }

    #[test]
    fn test_growing_factor_reduces_to_level_annuity() {
        let level = future_value_annuity(1.0, 0.005, 120);
        let growing = growing_annuity_factor(0.005, 0.0, 120);
        assert!((level - growing).abs() < 1e-9);
    }

    #[test]
    fn test_growing_factor_limit_when_rates_match() {
        let f = growing_annuity_factor(0.004, 0.004, 12);
        assert!((f - 12.0 * 1.004f64.powi(11)).abs() < 1e-12);
    }
}
