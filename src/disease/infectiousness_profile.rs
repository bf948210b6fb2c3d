// Infectiousness profile -----------------------------------------------------------------------------------
//
// per timestep scaling of infectiousness since onset, interpolated from the
// profile table and normalised to a mean of 1 over the infectious period

use crate::error::{Result, SimError};

pub const MAX_INFECTIOUS_STEPS: usize = 2550;

#[derive(Debug, Clone, PartialEq)]
pub struct InfectiousnessProfile {
    values: Vec<f64>,
}

impl InfectiousnessProfile {
    /// `infectious_period` is in days, `model_time_step` the length of a
    /// timestep in days.
    pub fn new(
        profile: &[f64],
        infectious_period: f64,
        model_time_step: f64,
    ) -> Result<InfectiousnessProfile> {
        if profile.len() < 2 {
            return Err(SimError::validation(
                "infectiousness profile needs at least two entries",
            ));
        }
        let k = (infectious_period / model_time_step).ceil();
        if k.is_nan() || k < 1.0 || k >= MAX_INFECTIOUS_STEPS as f64 {
            return Err(SimError::invariant(format!(
                "{} infectious timesteps is outside 1..{}",
                k, MAX_INFECTIOUS_STEPS
            )));
        }
        let k = k as usize;

        let res = profile.len() - 1;
        let mut table = profile.to_vec();
        table[res] = 0.0;

        let mut values = vec![0.0; MAX_INFECTIOUS_STEPS];
        for (i, value) in values.iter_mut().enumerate().take(k) {
            let t = (i as f64 * model_time_step / infectious_period) * res as f64;
            let j = t.floor() as usize;
            let t = t - j as f64;
            *value = if j < res {
                table[j] * (1.0 - t) + table[j + 1] * t
            } else {
                table[res]
            };
        }
        let mean = values[..k].iter().sum::<f64>() / k as f64;
        if mean <= 0.0 {
            return Err(SimError::validation(
                "infectiousness profile must be positive somewhere",
            ));
        }
        for value in values.iter_mut().take(k) {
            *value /= mean;
        }
        Ok(InfectiousnessProfile { values })
    }

    /// scaling after `steps` whole timesteps of infectiousness
    pub fn scale(&self, steps: usize) -> f64 {
        self.values.get(steps).copied().unwrap_or(0.0)
    }
}
