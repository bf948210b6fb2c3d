// Host progression sweep -----------------------------------------------------------------------------------

use crate::disease::HostProgression;
use crate::error::Result;
use crate::world::{PersonId, Population};
use rand::Rng;
use std::rc::Rc;

/// Advances every person whose scheduled transition is due, cell by cell.
#[derive(Debug, Clone)]
pub struct HostProgressionSweep {
    progression: Rc<HostProgression>,
}

impl HostProgressionSweep {
    pub fn new(progression: Rc<HostProgression>) -> HostProgressionSweep {
        HostProgressionSweep { progression }
    }

    pub fn invoke<R: Rng + ?Sized>(
        &mut self,
        population: &mut Population,
        time: f64,
        rng: &mut R,
    ) -> Result<()> {
        for c in 0..population.cells().len() {
            let persons: Vec<PersonId> = population.cells()[c].persons().to_vec();
            for person in persons {
                self.progression.advance(population, person, time, rng)?;
            }
        }
        Ok(())
    }
}
