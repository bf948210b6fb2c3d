// Household force of infection -----------------------------------------------------------------------------

use super::{
    age_contact, distancing, involves_care_home, is_active, vaccine_infectiousness,
    vaccine_susceptibility,
};
use crate::parameters::Parameters;
use crate::world::{PersonId, Population};
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct HouseholdInfection {
    params: Rc<Parameters>,
}

impl HouseholdInfection {
    pub fn new(params: Rc<Parameters>) -> HouseholdInfection {
        HouseholdInfection { params }
    }

    pub fn infectiousness(&self, population: &Population, infector: PersonId, time: f64) -> f64 {
        let params = &self.params;
        let person = population.person(infector);
        let microcell = population.microcell_of(infector);
        let mut infectiousness = params.household_transmission * person.infectiousness;
        if is_active(microcell.closure_start_time, time) {
            infectiousness *= params.interventions.closure_household_infectiousness();
        }
        if is_active(person.isolation_start_time, time) {
            infectiousness *= params.interventions.isolation_house_effectiveness();
        }
        if is_active(person.quarantine_start_time, time) {
            infectiousness *= params.interventions.quarantine_house_effectiveness();
        }
        infectiousness * vaccine_infectiousness(params, person, time)
    }

    pub fn susceptibility(
        &self,
        population: &Population,
        _infector: PersonId,
        infectee: PersonId,
        time: f64,
    ) -> f64 {
        let params = &self.params;
        let person = population.person(infectee);
        let microcell = population.microcell_of(infectee);
        person.susceptibility
            * age_contact(params, person)
            * distancing(params, microcell, person, time, |p, enhanced| {
                if enhanced {
                    p.distancing_house_enhanced_susc
                } else {
                    p.distancing_house_susc
                }
            })
            * vaccine_susceptibility(params, person, time)
    }

    pub fn force_of_infection(
        &self,
        population: &Population,
        infector: PersonId,
        infectee: PersonId,
        time: f64,
    ) -> f64 {
        let mut force = self.infectiousness(population, infector, time)
            * self.susceptibility(population, infector, infectee, time);
        if involves_care_home(population.person(infector), population.person(infectee)) {
            force *= self.params.carehome.household_scaling;
        }
        force
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::{CaseIsolationParams, InterventionParams, SocialDistancingParams};
    use approx::assert_relative_eq;

    fn pair() -> (Population, PersonId, PersonId) {
        let mut population = Population::new();
        let cell = population.add_cells(1)[0];
        let microcell = population.add_microcells(cell, 1)[0];
        let persons = population.add_people(microcell, 2).unwrap();
        population.add_household(microcell, &persons).unwrap();
        population.person_mut(persons[0]).infectiousness = 2.0;
        (population, persons[0], persons[1])
    }

    fn with_isolation(effectiveness: f64) -> Rc<Parameters> {
        Rc::new(Parameters {
            household_transmission: 0.3,
            interventions: InterventionParams {
                case_isolation: Some(CaseIsolationParams {
                    isolation_house_effectiveness: effectiveness,
                    ..CaseIsolationParams::default()
                }),
                ..InterventionParams::default()
            },
            ..Parameters::default()
        })
    }

    #[test]
    fn isolation_halves_household_force() {
        let calculator = HouseholdInfection::new(with_isolation(0.5));
        let (mut population, infector, infectee) = pair();
        let before = calculator.force_of_infection(&population, infector, infectee, 4.0);
        assert_relative_eq!(before, 0.3 * 2.0);

        population.person_mut(infector).isolation_start_time = Some(3.0);
        let after = calculator.force_of_infection(&population, infector, infectee, 4.0);
        assert_relative_eq!(after, before * 0.5);

        // isolation that has not started yet changes nothing
        population.person_mut(infector).isolation_start_time = Some(6.0);
        let pending = calculator.force_of_infection(&population, infector, infectee, 4.0);
        assert_relative_eq!(pending, before);
    }

    #[test]
    fn enhanced_distancing_uses_its_own_multiplier() {
        let params = Rc::new(Parameters {
            interventions: InterventionParams {
                social_distancing: Some(SocialDistancingParams {
                    distancing_house_susc: 1.2,
                    distancing_house_enhanced_susc: 0.8,
                    ..SocialDistancingParams::default()
                }),
                ..InterventionParams::default()
            },
            ..Parameters::default()
        });
        let calculator = HouseholdInfection::new(params);
        let (mut population, infector, infectee) = pair();
        let microcell = population.person(infectee).microcell();
        population.microcell_mut(microcell).distancing_start_time = Some(0.0);
        assert_relative_eq!(
            calculator.susceptibility(&population, infector, infectee, 1.0),
            1.2
        );
        population.person_mut(infectee).distancing_enhanced = true;
        assert_relative_eq!(
            calculator.susceptibility(&population, infector, infectee, 1.0),
            0.8
        );
    }

    #[test]
    fn care_home_scaling_applies_to_either_side() {
        let mut params = Parameters::default();
        params.carehome.household_scaling = 0.5;
        let calculator = HouseholdInfection::new(Rc::new(params));
        let (mut population, infector, infectee) = pair();
        let base = calculator.force_of_infection(&population, infector, infectee, 0.0);
        population.person_mut(infectee).care_home_resident = true;
        assert_relative_eq!(
            calculator.force_of_infection(&population, infector, infectee, 0.0),
            base * 0.5
        );
    }
}
