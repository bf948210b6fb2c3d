// Household sweep ------------------------------------------------------------------------------------------

use crate::error::{Result, SimError};
use crate::infection::HouseholdInfection;
use crate::parameters::Parameters;
use crate::world::{CellId, PersonId, Population};
use log::trace;
use rand::Rng;
use std::rc::Rc;

/// Every infectious person tries to infect each susceptible member of their
/// household.
#[derive(Debug, Clone)]
pub struct HouseholdSweep {
    infection: HouseholdInfection,
}

impl HouseholdSweep {
    pub fn new(params: Rc<Parameters>) -> HouseholdSweep {
        HouseholdSweep {
            infection: HouseholdInfection::new(params),
        }
    }

    pub fn invoke<R: Rng + ?Sized>(
        &mut self,
        population: &mut Population,
        time: f64,
        rng: &mut R,
    ) -> Result<()> {
        for c in 0..population.cells().len() {
            let infectors: Vec<PersonId> = infectious_in_cell(population, CellId(c));
            for infector in infectors {
                let household = population.person(infector).household().ok_or_else(|| {
                    SimError::invariant(format!(
                        "infectious person {:?} does not belong to a household",
                        infector
                    ))
                })?;
                for infectee in population.susceptible_household_members(household) {
                    let force =
                        self.infection
                            .force_of_infection(population, infector, infectee, time);
                    if rng.gen::<f64>() < force {
                        trace!("t={} household: {:?} -> {:?}", time, infector, infectee);
                        population.enqueue_person(infectee);
                    }
                }
            }
        }
        Ok(())
    }
}

pub(super) fn infectious_in_cell(population: &Population, cell: CellId) -> Vec<PersonId> {
    population
        .cell(cell)
        .persons()
        .iter()
        .filter(|p| population.person(**p).is_infectious())
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::InfectionStatus;
    use rand::rngs::mock::StepRng;

    fn forced_params() -> Rc<Parameters> {
        Rc::new(Parameters {
            household_transmission: 1.0,
            ..Parameters::default()
        })
    }

    #[test]
    fn forced_household_infection_queues_housemates() {
        let mut population = Population::new();
        let cell = population.add_cells(1)[0];
        let microcell = population.add_microcells(cell, 1)[0];
        let persons = population.add_people(microcell, 3).unwrap();
        population.add_household(microcell, &persons).unwrap();
        population.setup();
        population
            .update_status(persons[0], InfectionStatus::InfectMild)
            .unwrap();
        population.person_mut(persons[0]).infectiousness = 1.0;

        let mut sweep = HouseholdSweep::new(forced_params());
        let mut rng = StepRng::new(0, 0);
        sweep.invoke(&mut population, 1.0, &mut rng).unwrap();
        assert_eq!(population.cell(cell).queue_len(), 2);
    }

    #[test]
    fn infector_without_household_aborts() {
        let mut population = Population::new();
        let cell = population.add_cells(1)[0];
        let microcell = population.add_microcells(cell, 1)[0];
        let persons = population.add_people(microcell, 1).unwrap();
        population.setup();
        population
            .update_status(persons[0], InfectionStatus::InfectGP)
            .unwrap();
        let mut sweep = HouseholdSweep::new(forced_params());
        let mut rng = StepRng::new(0, 0);
        match sweep.invoke(&mut population, 1.0, &mut rng) {
            Err(SimError::Invariant(_)) => (),
            other => panic!("expected an invariant error, got {:?}", other),
        }
    }
}
