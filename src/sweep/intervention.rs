// Intervention sweep ---------------------------------------------------------------------------------------

use crate::error::{Result, SimError};
use crate::intervention::{self, Intervention};
use crate::parameters::Parameters;
use crate::world::Population;
use log::info;
use rand::Rng;
use std::rc::Rc;

struct Slot {
    intervention: Box<dyn Intervention>,
    was_active: bool,
}

/// Applies each configured intervention while its policy is active and turns
/// it off when it stops being so.
pub struct InterventionSweep {
    params: Rc<Parameters>,
    slots: Option<Vec<Slot>>,
}

impl std::fmt::Debug for InterventionSweep {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let names: Vec<&str> = self
            .slots
            .iter()
            .flatten()
            .map(|s| s.intervention.name())
            .collect();
        f.debug_struct("InterventionSweep")
            .field("interventions", &names)
            .finish()
    }
}

impl InterventionSweep {
    pub fn new(params: Rc<Parameters>) -> InterventionSweep {
        InterventionSweep {
            params,
            slots: None,
        }
    }

    pub fn bind_population(&mut self, _population: &Population) -> Result<()> {
        let slots = intervention::from_params(&self.params.interventions)
            .into_iter()
            .map(|intervention| Slot {
                intervention,
                was_active: false,
            })
            .collect();
        self.slots = Some(slots);
        Ok(())
    }

    pub fn invoke<R: Rng>(
        &mut self,
        population: &mut Population,
        time: f64,
        rng: &mut R,
    ) -> Result<()> {
        let slots = self
            .slots
            .as_mut()
            .ok_or_else(|| SimError::invariant("intervention sweep invoked before binding"))?;
        let cases = population.number_infectious();
        for slot in slots.iter_mut() {
            if slot.intervention.is_active(time, cases) {
                if !slot.was_active {
                    info!("t={} {} starts with {} cases", time, slot.intervention.name(), cases);
                }
                slot.intervention.apply(population, time, rng)?;
                slot.was_active = true;
            } else if slot.was_active {
                info!("t={} {} ends", time, slot.intervention.name());
                slot.intervention.turn_off(population);
                slot.was_active = false;
            }
        }
        Ok(())
    }
}
