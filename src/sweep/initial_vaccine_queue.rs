// Initial vaccine queue sweep ------------------------------------------------------------------------------

use crate::error::Result;
use crate::parameters::Parameters;
use crate::world::{PersonId, Population};
use log::info;
use rand::seq::SliceRandom;
use rand::Rng;
use std::rc::Rc;

/// Orders the population for vaccination: oldest priority group first,
/// random order within a group. People younger than every group's lower
/// bound are not queued.
#[derive(Debug, Clone)]
pub struct InitialVaccineQueueSweep {
    params: Rc<Parameters>,
}

impl InitialVaccineQueueSweep {
    pub fn new(params: Rc<Parameters>) -> InitialVaccineQueueSweep {
        InitialVaccineQueueSweep { params }
    }

    pub fn invoke<R: Rng + ?Sized>(&mut self, population: &mut Population, rng: &mut R) -> Result<()> {
        let vaccination = match &self.params.interventions.vaccination {
            Some(v) => v,
            None => return Ok(()),
        };
        let mut queue: Vec<(usize, PersonId)> = population
            .persons()
            .iter()
            .filter_map(|p| {
                vaccination
                    .min_ages
                    .iter()
                    .position(|min_age| p.age >= *min_age)
                    .map(|group| (group, p.id()))
            })
            .collect();
        queue.shuffle(rng);
        queue.sort_by_key(|(group, _)| *group);

        let waiting = population.vaccine_queue_mut();
        waiting.clear();
        waiting.extend(queue.into_iter().map(|(_, id)| id));
        info!("{} people queued for vaccination", waiting.len());
        Ok(())
    }
}
