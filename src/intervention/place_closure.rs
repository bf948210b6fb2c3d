// Place closure --------------------------------------------------------------------------------------------
//
// microcells with enough cases close their places of the configured types

use super::Intervention;
use crate::error::Result;
use crate::parameters::{PlaceClosureParams, PolicyParams};
use crate::world::Population;
use log::debug;
use rand::RngCore;

#[derive(Debug, Clone)]
pub struct PlaceClosure {
    params: PlaceClosureParams,
}

impl PlaceClosure {
    pub fn new(params: PlaceClosureParams) -> PlaceClosure {
        PlaceClosure { params }
    }
}

impl Intervention for PlaceClosure {
    fn name(&self) -> &'static str {
        "place_closure"
    }

    fn policy(&self) -> &PolicyParams {
        &self.params.policy
    }

    fn apply(
        &mut self,
        population: &mut Population,
        time: f64,
        _rng: &mut dyn RngCore,
    ) -> Result<()> {
        let mut closed = 0;
        for id in population.microcell_ids() {
            let microcell = population.microcell_mut(id);
            match microcell.closure_start_time {
                Some(start) => {
                    if time > start + self.params.closure_duration {
                        microcell.closure_start_time = None;
                    }
                }
                None => {
                    if microcell.number_infectious() >= self.params.case_microcell_threshold {
                        microcell.closure_start_time = Some(time + self.params.closure_delay);
                        closed += 1;
                    }
                }
            }
        }
        debug!("t={} place closure: {} microcells close", time, closed);
        Ok(())
    }

    fn turn_off(&mut self, population: &mut Population) {
        for id in population.microcell_ids() {
            population.microcell_mut(id).closure_start_time = None;
        }
    }
}
