// Social distancing ----------------------------------------------------------------------------------------
//
// microcells with enough cases start distancing; some residents, mostly the
// elderly, distance more strictly

use super::Intervention;
use crate::error::Result;
use crate::parameters::{PolicyParams, SocialDistancingParams};
use crate::world::{PersonId, Population};
use log::debug;
use rand::{Rng, RngCore};

#[derive(Debug, Clone)]
pub struct SocialDistancing {
    params: SocialDistancingParams,
}

impl SocialDistancing {
    pub fn new(params: SocialDistancingParams) -> SocialDistancing {
        SocialDistancing { params }
    }
}

impl Intervention for SocialDistancing {
    fn name(&self) -> &'static str {
        "social_distancing"
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
        let mut started = 0;
        for id in population.microcell_ids() {
            let microcell = population.microcell_mut(id);
            let residents: Vec<PersonId> = microcell.persons().to_vec();
            match microcell.distancing_start_time {
                Some(start) => {
                    if time > start + self.params.distancing_duration {
                        microcell.distancing_start_time = None;
                        for person in residents {
                            population.person_mut(person).distancing_enhanced = false;
                        }
                    }
                }
                None => {
                    if microcell.number_infectious() >= self.params.case_microcell_threshold {
                        microcell.distancing_start_time =
                            Some(time + self.params.distancing_delay);
                        started += 1;
                        for person in residents {
                            let person = population.person_mut(person);
                            let p = self.params.distancing_enhanced_prob[person.age_group()];
                            person.distancing_enhanced = rng.gen::<f64>() < p;
                        }
                    }
                }
            }
        }
        debug!("t={} social distancing: {} microcells start", time, started);
        Ok(())
    }

    fn turn_off(&mut self, population: &mut Population) {
        for id in population.microcell_ids() {
            population.microcell_mut(id).distancing_start_time = None;
        }
        for id in population.person_ids() {
            population.person_mut(id).distancing_enhanced = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::InfectionStatus;
    use rand::rngs::mock::StepRng;

    #[test]
    fn elderly_residents_distance_more() {
        let mut distancing = SocialDistancing::new(SocialDistancingParams {
            case_microcell_threshold: 1,
            distancing_duration: 5.0,
            ..SocialDistancingParams::default()
        });
        let mut population = Population::new();
        let cell = population.add_cells(1)[0];
        let microcell = population.add_microcells(cell, 1)[0];
        let young = population.add_person(microcell, 20.0).unwrap();
        let old = population.add_person(microcell, 82.0).unwrap();
        population.setup();
        population.update_status(young, InfectionStatus::InfectMild).unwrap();

        let mut rng = StepRng::new(0, 0);
        distancing.apply(&mut population, 1.0, &mut rng).unwrap();
        assert_eq!(population.microcell(microcell).distancing_start_time, Some(1.0));
        assert!(!population.person(young).distancing_enhanced);
        assert!(population.person(old).distancing_enhanced);

        distancing.apply(&mut population, 7.0, &mut rng).unwrap();
        assert_eq!(population.microcell(microcell).distancing_start_time, None);
        assert!(!population.person(old).distancing_enhanced);
    }
}
