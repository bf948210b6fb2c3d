// Vaccination ----------------------------------------------------------------------------------------------

use super::Intervention;
use crate::error::Result;
use crate::parameters::{PolicyParams, VaccinationParams};
use crate::world::{InfectionStatus, Population};
use log::debug;
use rand::RngCore;

#[derive(Debug, Clone)]
pub struct Vaccination {
    params: VaccinationParams,
}

impl Vaccination {
    pub fn new(params: VaccinationParams) -> Vaccination {
        Vaccination { params }
    }
}

impl Intervention for Vaccination {
    fn name(&self) -> &'static str {
        "vaccination"
    }

    fn policy(&self) -> &PolicyParams {
        &self.params.policy
    }

    /// Gives today's doses to the front of the priority queue.
    fn apply(
        &mut self,
        population: &mut Population,
        time: f64,
        _rng: &mut dyn RngCore,
    ) -> Result<()> {
        let mut doses = 0;
        while doses < self.params.daily_doses {
            let id = match population.vaccine_queue_mut().pop_front() {
                Some(id) => id,
                None => break,
            };
            let person = population.person_mut(id);
            if person.date_vaccinated.is_some()
                || person.infection_status() == InfectionStatus::Dead
            {
                continue;
            }
            person.date_vaccinated = Some(time);
            doses += 1;
        }
        debug!(
            "t={} vaccination: {} doses, {} people waiting",
            time,
            doses,
            population.vaccine_queue().len()
        );
        Ok(())
    }

    // doses already given stay given
    fn turn_off(&mut self, _population: &mut Population) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    #[test]
    fn daily_doses_follow_queue_order() {
        let mut vaccination = Vaccination::new(VaccinationParams {
            daily_doses: 2,
            ..VaccinationParams::default()
        });
        let mut population = Population::new();
        let cell = population.add_cells(1)[0];
        let microcell = population.add_microcells(cell, 1)[0];
        let persons = population.add_people(microcell, 4).unwrap();
        population.setup();
        population
            .update_status(persons[2], InfectionStatus::Dead)
            .unwrap();
        population
            .vaccine_queue_mut()
            .extend(vec![persons[3], persons[2], persons[1], persons[0]]);

        let mut rng = StepRng::new(0, 0);
        vaccination.apply(&mut population, 1.0, &mut rng).unwrap();
        assert_eq!(population.person(persons[3]).date_vaccinated, Some(1.0));
        assert_eq!(population.person(persons[2]).date_vaccinated, None);
        assert_eq!(population.person(persons[1]).date_vaccinated, Some(1.0));
        assert_eq!(population.vaccine_queue().len(), 1);

        vaccination.apply(&mut population, 2.0, &mut rng).unwrap();
        vaccination.apply(&mut population, 3.0, &mut rng).unwrap();
        assert_eq!(population.person(persons[0]).date_vaccinated, Some(2.0));
        assert!(population.vaccine_queue().is_empty());
    }
}
