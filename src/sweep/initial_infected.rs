// Initial infected sweep -----------------------------------------------------------------------------------

use crate::disease::HostProgression;
use crate::error::{Result, SimError};
use crate::parameters::SimulationParams;
use crate::world::{InfectionStatus, PersonId, Population};
use log::info;
use rand::seq::index;
use rand::Rng;
use std::rc::Rc;

/// Seeds the epidemic: a random set of susceptible people start out mildly
/// infected at the simulation start time.
#[derive(Debug, Clone)]
pub struct InitialInfectedSweep {
    progression: Rc<HostProgression>,
}

impl InitialInfectedSweep {
    pub fn new(progression: Rc<HostProgression>) -> InitialInfectedSweep {
        InitialInfectedSweep { progression }
    }

    pub fn invoke<R: Rng + ?Sized>(
        &mut self,
        population: &mut Population,
        sim_params: &SimulationParams,
        rng: &mut R,
    ) -> Result<()> {
        let wanted = sim_params.initial_infected_number;
        let susceptible: Vec<PersonId> = population
            .persons()
            .iter()
            .filter(|p| p.is_susceptible())
            .map(|p| p.id())
            .collect();
        if wanted > susceptible.len() {
            return Err(SimError::validation(format!(
                "cannot infect {} people, only {} are susceptible",
                wanted,
                susceptible.len()
            )));
        }
        let time = sim_params.simulation_start_time;
        for i in index::sample(rng, susceptible.len(), wanted).into_iter() {
            self.progression.infect(
                population,
                susceptible[i],
                InfectionStatus::InfectMild,
                time,
                rng,
            )?;
        }
        info!("{} people infected at t={}", wanted, time);
        Ok(())
    }
}
