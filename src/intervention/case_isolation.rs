// Case isolation -------------------------------------------------------------------------------------------
//
// symptomatic people stay home with some probability, for a fixed period

use super::Intervention;
use crate::error::Result;
use crate::parameters::{CaseIsolationParams, PolicyParams};
use crate::world::Population;
use log::debug;
use rand::{Rng, RngCore};

#[derive(Debug, Clone)]
pub struct CaseIsolation {
    params: CaseIsolationParams,
}

impl CaseIsolation {
    pub fn new(params: CaseIsolationParams) -> CaseIsolation {
        CaseIsolation { params }
    }
}

impl Intervention for CaseIsolation {
    fn name(&self) -> &'static str {
        "case_isolation"
    }

    fn policy(&self) -> &PolicyParams {
        &self.params.policy
    }

    fn apply(
        &mut self,
        population: &mut Population,
        time: f64,
        rng: &mut dyn RngCore,
    ) -> Result<()> {
        let mut started = 0;
        for id in population.person_ids() {
            let person = population.person_mut(id);
            match person.isolation_start_time {
                Some(start) => {
                    if time > start + self.params.isolation_duration {
                        person.isolation_start_time = None;
                    }
                }
                None => {
                    if person.is_symptomatic() && rng.gen::<f64>() < self.params.isolation_probability
                    {
                        person.isolation_start_time = Some(time + self.params.isolation_delay);
                        started += 1;
                    }
                }
            }
        }
        debug!("t={} case isolation: {} people start isolating", time, started);
        Ok(())
    }

    fn turn_off(&mut self, population: &mut Population) {
        for id in population.person_ids() {
            population.person_mut(id).isolation_start_time = None;
        }
    }
}
