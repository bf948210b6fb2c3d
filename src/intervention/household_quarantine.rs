// Household quarantine -------------------------------------------------------------------------------------
//
// the household of someone starting isolation this step may quarantine with
// them. A start time belongs to the step t with t <= start < t + 1, so
// fractional isolation delays trigger exactly once

use super::Intervention;
use crate::error::Result;
use crate::parameters::{HouseholdQuarantineParams, PolicyParams};
use crate::world::{PersonId, Population};
use log::debug;
use rand::{Rng, RngCore};

#[derive(Debug, Clone)]
pub struct HouseholdQuarantine {
    params: HouseholdQuarantineParams,
}

impl HouseholdQuarantine {
    pub fn new(params: HouseholdQuarantineParams) -> HouseholdQuarantine {
        HouseholdQuarantine { params }
    }
}

impl Intervention for HouseholdQuarantine {
    fn name(&self) -> &'static str {
        "household_quarantine"
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
        // quarantines that have run their course end first
        for id in population.person_ids() {
            let person = population.person_mut(id);
            if let Some(start) = person.quarantine_start_time {
                if time > start + self.params.quarantine_duration {
                    person.quarantine_start_time = None;
                }
            }
        }

        let mut quarantined = 0;
        for id in population.person_ids() {
            let person = population.person(id);
            match person.isolation_start_time {
                Some(start) if start >= time && start < time + 1.0 => (),
                _ => continue,
            }
            let household = match person.household() {
                Some(h) => h,
                None => continue,
            };
            if rng.gen::<f64>() >= self.params.quarantine_house_compliant {
                continue;
            }
            let members: Vec<PersonId> = population.household(household).persons().to_vec();
            for member in members.into_iter().filter(|m| *m != id) {
                let housemate = population.person_mut(member);
                if housemate.isolation_start_time.is_some()
                    || housemate.quarantine_start_time.is_some()
                {
                    continue;
                }
                if rng.gen::<f64>() < self.params.quarantine_individual_compliant {
                    housemate.quarantine_start_time = Some(time + self.params.quarantine_delay);
                    quarantined += 1;
                }
            }
        }
        debug!("t={} household quarantine: {} people quarantined", time, quarantined);
        Ok(())
    }

    fn turn_off(&mut self, population: &mut Population) {
        for id in population.person_ids() {
            population.person_mut(id).quarantine_start_time = None;
        }
    }
}
