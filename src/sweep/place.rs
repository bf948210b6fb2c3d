// Place sweep ----------------------------------------------------------------------------------------------

use crate::error::Result;
use crate::infection::PlaceInfection;
use crate::parameters::Parameters;
use crate::world::{PersonId, PlaceId, Population};
use log::trace;
use rand::Rng;
use std::rc::Rc;

/// Every infectious member of a place tries to infect its susceptible members.
#[derive(Debug, Clone)]
pub struct PlaceSweep {
    infection: PlaceInfection,
}

impl PlaceSweep {
    pub fn new(params: Rc<Parameters>) -> PlaceSweep {
        PlaceSweep {
            infection: PlaceInfection::new(params),
        }
    }

    pub fn invoke<R: Rng + ?Sized>(
        &mut self,
        population: &mut Population,
        time: f64,
        rng: &mut R,
    ) -> Result<()> {
        for cell in 0..population.cells().len() {
            let places: Vec<PlaceId> = population.cells()[cell].places().to_vec();
            for place in places {
                if self.infection.is_closed(population, place, time) {
                    continue;
                }
                let members: Vec<PersonId> = population.place(place).persons().to_vec();
                let infectors = members
                    .iter()
                    .filter(|p| population.person(**p).is_infectious())
                    .copied()
                    .collect::<Vec<_>>();
                for infector in infectors {
                    for infectee in members.iter().copied() {
                        if !population.person(infectee).is_susceptible() {
                            continue;
                        }
                        let force = self.infection.force_of_infection(
                            population, place, infector, infectee, time,
                        );
                        if rng.gen::<f64>() < force {
                            trace!("t={} place {:?}: {:?} -> {:?}", time, place, infector, infectee);
                            population.enqueue_person(infectee);
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::{InterventionParams, PlaceClosureParams};
    use crate::world::{InfectionStatus, PlaceType};
    use rand::rngs::mock::StepRng;

    fn workplace(params: &Parameters) -> (Population, Vec<PersonId>) {
        let mut population = Population::new();
        let cell = population.add_cells(1)[0];
        let microcell = population.add_microcells(cell, 1)[0];
        let persons = population.add_people(microcell, 4).unwrap();
        let place = population
            .add_place(cell, microcell, (0.0, 0.0), PlaceType::Workplace)
            .unwrap();
        for p in persons.iter().take(3) {
            population.add_person_to_place(place, *p);
        }
        population.setup();
        population
            .update_status(persons[0], InfectionStatus::InfectMild)
            .unwrap();
        population.person_mut(persons[0]).infectiousness =
            params.mean_place_group_size[PlaceType::Workplace.index()] / params.place_transmission;
        (population, persons)
    }

    #[test]
    fn members_are_queued_and_outsiders_are_not() {
        let params = Parameters::default();
        let (mut population, persons) = workplace(&params);
        let mut sweep = PlaceSweep::new(Rc::new(params));
        let mut rng = StepRng::new(0, 0);
        sweep.invoke(&mut population, 0.0, &mut rng).unwrap();
        let cell = population.cells()[0].id();
        assert_eq!(population.cell(cell).queue_len(), 2);
        let mut queued = Vec::new();
        while let Some(p) = population.cell_mut(cell).dequeue_person() {
            queued.push(p);
        }
        assert!(!queued.contains(&persons[3]));
    }

    #[test]
    fn closed_places_are_skipped() {
        let params = Parameters {
            interventions: InterventionParams {
                place_closure: Some(PlaceClosureParams {
                    closure_place_type: vec![PlaceType::Workplace],
                    ..PlaceClosureParams::default()
                }),
                ..InterventionParams::default()
            },
            ..Parameters::default()
        };
        let (mut population, persons) = workplace(&params);
        let microcell = population.person(persons[0]).microcell();
        population.microcell_mut(microcell).closure_start_time = Some(0.0);
        let mut sweep = PlaceSweep::new(Rc::new(params));
        let mut rng = StepRng::new(0, 0);
        sweep.invoke(&mut population, 0.0, &mut rng).unwrap();
        assert_eq!(population.cells()[0].queue_len(), 0);
    }
}
