// Queue sweep ----------------------------------------------------------------------------------------------

use crate::disease::HostProgression;
use crate::error::Result;
use crate::world::{CellId, Population};
use log::trace;
use rand::Rng;
use std::rc::Rc;

/// Drains every cell's queue, exposing the people infected this step. A
/// person queued twice is only exposed once.
#[derive(Debug, Clone)]
pub struct QueueSweep {
    progression: Rc<HostProgression>,
}

impl QueueSweep {
    pub fn new(progression: Rc<HostProgression>) -> QueueSweep {
        QueueSweep { progression }
    }

    pub fn invoke<R: Rng + ?Sized>(
        &mut self,
        population: &mut Population,
        time: f64,
        rng: &mut R,
    ) -> Result<()> {
        let mut exposed = 0;
        for c in 0..population.cells().len() {
            while let Some(person) = population.cell_mut(CellId(c)).dequeue_person() {
                if self.progression.expose(population, person, time, rng)? {
                    exposed += 1;
                }
            }
        }
        trace!("t={} {} people exposed", time, exposed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::Parameters;
    use crate::world::InfectionStatus;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn queued_people_are_exposed_once() {
        let progression = Rc::new(HostProgression::new(Rc::new(Parameters::default())).unwrap());
        let mut population = Population::new();
        let cell = population.add_cells(1)[0];
        let microcell = population.add_microcells(cell, 1)[0];
        let persons = population.add_people(microcell, 3).unwrap();
        population.setup();
        population.enqueue_person(persons[1]);
        population.enqueue_person(persons[1]);
        population.enqueue_person(persons[2]);

        let mut sweep = QueueSweep::new(progression);
        let mut rng = StdRng::seed_from_u64(0);
        sweep.invoke(&mut population, 4.0, &mut rng).unwrap();

        assert_eq!(population.cell(cell).queue_len(), 0);
        assert_eq!(
            population.person(persons[0]).infection_status(),
            InfectionStatus::Susceptible
        );
        for p in persons[1..].iter() {
            let person = population.person(*p);
            assert_eq!(person.infection_status(), InfectionStatus::Exposed);
            assert!(person.time_of_status_change.unwrap() >= 4.0);
        }
        let counter = population.cell(cell).compartment_counter();
        assert_eq!(counter.count(InfectionStatus::Exposed), 2);
    }
}
