//! Random return paths shared by the simulator and the contribution solver.
//!
//! Every path owns an RNG stream derived from `(base_seed, path_index)`, so a
//! run is reproducible from its base seed regardless of how rayon splits the
//! work, and two callers using the same seed see the same scenarios.

use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use statrs::distribution::Normal;

use crate::error::FinicoError;
use crate::rates::{annual_to_monthly_sigma, monthly_fraction_from_annual};
use crate::types::{Fraction, Money, Percent};
use crate::FinicoResult;

/// Monthly return and inflation assumptions as decimal fractions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyDynamics {
    /// Mean monthly return net of fee drag.
    pub mu: Fraction,
    pub sigma: Fraction,
    pub inflation: Fraction,
}

impl MonthlyDynamics {
    pub fn from_annual(
        mean_return_pct: Percent,
        stdev_return_pct: Percent,
        inflation_pct: Percent,
        fee_pct: Percent,
    ) -> Self {
        Self {
            mu: monthly_fraction_from_annual(mean_return_pct)
                - monthly_fraction_from_annual(fee_pct),
            sigma: annual_to_monthly_sigma(stdev_return_pct) / 100.0,
            inflation: monthly_fraction_from_annual(inflation_pct),
        }
    }
}

/// Source of monthly returns for one path.
#[derive(Debug, Clone)]
pub enum ReturnSampler {
    /// Zero volatility: every month earns the mean.
    Fixed(Fraction),
    Normal(Normal),
}

impl ReturnSampler {
    pub fn new(dynamics: &MonthlyDynamics) -> FinicoResult<Self> {
        if dynamics.sigma == 0.0 {
            return Ok(ReturnSampler::Fixed(dynamics.mu));
        }
        let normal =
            Normal::new(dynamics.mu, dynamics.sigma).map_err(|e| FinicoError::InvalidInput {
                field: "stdev_annual_return_pct".into(),
                reason: format!("Invalid Normal parameters: {e}"),
            })?;
        Ok(ReturnSampler::Normal(normal))
    }

    #[inline]
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Fraction {
        match self {
            ReturnSampler::Fixed(mu) => *mu,
            ReturnSampler::Normal(normal) => normal.sample(rng),
        }
    }
}

/// Use the caller's seed, or draw a fresh one from the thread RNG.
pub fn resolve_base_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(rand::random)
}

pub fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

pub fn path_rng(base_seed: u64, path: usize) -> StdRng {
    StdRng::seed_from_u64(splitmix64(base_seed ^ splitmix64(path as u64)))
}

/// Cumulative price index at each year boundary, compounded monthly.
pub fn year_deflators(monthly_inflation: Fraction, horizon_years: u32) -> Vec<f64> {
    let mut deflators = Vec::with_capacity(horizon_years as usize + 1);
    let mut index = 1.0_f64;
    deflators.push(index);
    for _ in 0..horizon_years {
        for _ in 0..12 {
            index *= 1.0 + monthly_inflation;
        }
        deflators.push(index);
    }
    deflators
}

/// Simulate every path and return real balances at each year boundary.
///
/// The grid is path-major: row `p` holds `horizon_years + 1` values for path `p`.
pub(crate) fn simulate_real_grid(
    sampler: &ReturnSampler,
    deflators: &[f64],
    initial_balance: Money,
    monthly_contribution: Money,
    simulations: usize,
    base_seed: u64,
) -> Vec<f64> {
    let width = deflators.len();
    let mut grid = vec![0.0_f64; simulations * width];

    grid.par_chunks_mut(width)
        .enumerate()
        .for_each(|(path, row)| {
            let mut rng = path_rng(base_seed, path);
            let mut balance = initial_balance;
            row[0] = initial_balance;
            for year in 1..width {
                for _ in 0..12 {
                    let r = sampler.draw(&mut rng);
                    balance = balance * (1.0 + r) + monthly_contribution;
                }
                row[year] = balance / deflators[year];
            }
        });

    grid
}

/// Terminal balance of each path split into its linear parts.
///
/// For path `p`, the nominal balance after the horizon is
/// `initial * growth[p] + contribution * annuity[p]`; the draws are identical
/// to those [`simulate_real_grid`] makes with the same seed.
#[derive(Debug, Clone)]
pub struct TerminalFactors {
    pub growth: Vec<f64>,
    pub annuity: Vec<f64>,
    pub deflator: f64,
}

impl TerminalFactors {
    pub(crate) fn generate(
        sampler: &ReturnSampler,
        monthly_inflation: Fraction,
        horizon_years: u32,
        simulations: usize,
        base_seed: u64,
    ) -> Self {
        let months = horizon_years as usize * 12;
        let (growth, annuity): (Vec<f64>, Vec<f64>) = (0..simulations)
            .into_par_iter()
            .map(|path| {
                let mut rng = path_rng(base_seed, path);
                let mut growth = 1.0_f64;
                let mut annuity = 0.0_f64;
                for _ in 0..months {
                    let factor = 1.0 + sampler.draw(&mut rng);
                    growth *= factor;
                    annuity = annuity * factor + 1.0;
                }
                (growth, annuity)
            })
            .unzip();

        let deflator = year_deflators(monthly_inflation, horizon_years)
            .last()
            .copied()
            .unwrap_or(1.0);

        Self {
            growth,
            annuity,
            deflator,
        }
    }

    pub fn paths(&self) -> usize {
        self.growth.len()
    }

    /// Real terminal balance of every path for a given monthly contribution.
    pub fn real_balances(
        &self,
        initial_balance: Money,
        monthly_contribution: Money,
    ) -> impl Iterator<Item = f64> + '_ {
        self.growth
            .iter()
            .zip(&self.annuity)
            .map(move |(g, a)| (initial_balance * g + monthly_contribution * a) / self.deflator)
    }

    /// Fraction of paths whose real terminal balance meets `target`.
    pub fn success_rate(
        &self,
        initial_balance: Money,
        monthly_contribution: Money,
        target: Money,
    ) -> f64 {
        if self.paths() == 0 {
            return 0.0;
        }
        let hits = self
            .real_balances(initial_balance, monthly_contribution)
            .filter(|real| *real >= target)
            .count();
        hits as f64 / self.paths() as f64
    }
}
