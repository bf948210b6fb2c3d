// Inverse cdf ----------------------------------------------------------------------------------------------

use crate::error::{Result, SimError};
use crate::parameters::ICDF_RES;
use rand::Rng;

/// Duration distribution tabulated as its inverse cdf at RES + 1 evenly
/// spaced quantiles, scaled by `mean`.
#[derive(Debug, Clone, PartialEq)]
pub struct InverseCdf {
    mean: f64,
    table: Vec<f64>,
}

impl InverseCdf {
    pub fn new(mean: f64, table: &[f64]) -> Result<InverseCdf> {
        if table.len() != ICDF_RES + 1 {
            return Err(SimError::invariant(format!(
                "inverse cdf table needs {} entries, got {}",
                ICDF_RES + 1,
                table.len()
            )));
        }
        if !mean.is_finite() || mean < 0.0 {
            return Err(SimError::validation(format!(
                "inverse cdf mean must be finite and non negative, got {}",
                mean
            )));
        }
        Ok(InverseCdf {
            mean,
            table: table.to_vec(),
        })
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Draws a duration in days, linearly interpolating between table entries.
    pub fn choose_days<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let u: f64 = rng.gen();
        let q = u * ICDF_RES as f64;
        // u is in [0, 1) so i < RES, the guard only matters for u rounding up
        let i = (q.floor() as usize).min(ICDF_RES - 1);
        let q = q - i as f64;
        self.mean * (q * self.table[i + 1] + (1.0 - q) * self.table[i])
    }

    /// Draws a duration in whole timesteps.
    pub fn choose<R: Rng + ?Sized>(&self, time_steps_per_day: usize, rng: &mut R) -> Result<f64> {
        let days = self.choose_days(rng);
        let steps = (0.5 + days * time_steps_per_day as f64).floor();
        if steps < 0.0 || !steps.is_finite() {
            return Err(SimError::invariant(format!(
                "sampled transition time {} is not a valid duration",
                steps
            )));
        }
        Ok(steps)
    }
}
