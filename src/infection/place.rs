// Place force of infection ---------------------------------------------------------------------------------

use super::{
    age_contact, distancing, involves_care_home, is_active, vaccine_infectiousness,
    vaccine_susceptibility,
};
use crate::parameters::Parameters;
use crate::world::{PersonId, PlaceId, Population};
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct PlaceInfection {
    params: Rc<Parameters>,
}

impl PlaceInfection {
    pub fn new(params: Rc<Parameters>) -> PlaceInfection {
        PlaceInfection { params }
    }

    /// true when the place's microcell is closed to places of its type
    pub fn is_closed(&self, population: &Population, place: PlaceId, time: f64) -> bool {
        let place = population.place(place);
        self.params
            .interventions
            .is_closed_place_type(place.place_type())
            && is_active(population.microcell(place.microcell()).closure_start_time, time)
    }

    pub fn infectiousness(
        &self,
        population: &Population,
        place: PlaceId,
        infector: PersonId,
        time: f64,
    ) -> f64 {
        if self.is_closed(population, place, time) {
            return 0.0;
        }
        let params = &self.params;
        let place = population.place(place);
        let place_type = place.place_type();
        let person = population.person(infector);
        let mut infectiousness = params.place_transmission
            / params.mean_place_group_size[place_type.index()]
            * place.infectiousness
            * person.infectiousness;
        if is_active(person.isolation_start_time, time) {
            infectiousness *= params.interventions.isolation_effectiveness();
        }
        if is_active(person.quarantine_start_time, time) {
            infectiousness *= params.interventions.quarantine_place_effectiveness(place_type);
        }
        infectiousness * vaccine_infectiousness(params, person, time)
    }

    pub fn susceptibility(
        &self,
        population: &Population,
        place: PlaceId,
        _infector: PersonId,
        infectee: PersonId,
        time: f64,
    ) -> f64 {
        let params = &self.params;
        let person = population.person(infectee);
        let microcell = population.microcell_of(infectee);
        population.place(place).susceptibility
            * person.susceptibility
            * age_contact(params, person)
            * distancing(params, microcell, person, time, |p, enhanced| {
                if enhanced {
                    p.distancing_place_enhanced_susc
                } else {
                    p.distancing_place_susc
                }
            })
            * vaccine_susceptibility(params, person, time)
    }

    pub fn force_of_infection(
        &self,
        population: &Population,
        place: PlaceId,
        infector: PersonId,
        infectee: PersonId,
        time: f64,
    ) -> f64 {
        let mut force = self.infectiousness(population, place, infector, time)
            * self.susceptibility(population, place, infector, infectee, time);
        if involves_care_home(population.person(infector), population.person(infectee)) {
            force *= self.params.carehome.place_scaling;
        }
        force
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::{HouseholdQuarantineParams, InterventionParams, PlaceClosureParams};
    use crate::world::PlaceType;
    use approx::assert_relative_eq;

    fn school() -> (Population, PlaceId, PersonId, PersonId) {
        let mut population = Population::new();
        let cell = population.add_cells(1)[0];
        let microcell = population.add_microcells(cell, 1)[0];
        let persons = population.add_people(microcell, 2).unwrap();
        let place = population
            .add_place(cell, microcell, (0.0, 0.0), PlaceType::PrimarySchool)
            .unwrap();
        for p in persons.iter() {
            population.add_person_to_place(place, *p);
        }
        population.person_mut(persons[0]).infectiousness = 1.0;
        (population, place, persons[0], persons[1])
    }

    #[test]
    fn transmission_is_shared_across_the_group() {
        let params = Rc::new(Parameters::default());
        let calculator = PlaceInfection::new(params.clone());
        let (population, place, infector, infectee) = school();
        assert_relative_eq!(
            calculator.force_of_infection(&population, place, infector, infectee, 0.0),
            params.place_transmission / params.mean_place_group_size[0]
        );
    }

    #[test]
    fn closed_schools_do_not_transmit() {
        let params = Rc::new(Parameters {
            interventions: InterventionParams {
                place_closure: Some(PlaceClosureParams::default()),
                ..InterventionParams::default()
            },
            ..Parameters::default()
        });
        let calculator = PlaceInfection::new(params);
        let (mut population, place, infector, infectee) = school();
        let microcell = population.place(place).microcell();
        population.microcell_mut(microcell).closure_start_time = Some(1.0);
        assert!(calculator.force_of_infection(&population, place, infector, infectee, 0.0) > 0.0);
        assert_eq!(
            calculator.force_of_infection(&population, place, infector, infectee, 1.0),
            0.0
        );
    }

    #[test]
    fn quarantine_uses_the_place_type_multiplier() {
        let mut quarantine = HouseholdQuarantineParams::default();
        quarantine.quarantine_place_effectiveness[PlaceType::PrimarySchool.index()] = 0.1;
        let params = Rc::new(Parameters {
            interventions: InterventionParams {
                household_quarantine: Some(quarantine),
                ..InterventionParams::default()
            },
            ..Parameters::default()
        });
        let calculator = PlaceInfection::new(params);
        let (mut population, place, infector, infectee) = school();
        let base = calculator.force_of_infection(&population, place, infector, infectee, 2.0);
        population.person_mut(infector).quarantine_start_time = Some(2.0);
        assert_relative_eq!(
            calculator.force_of_infection(&population, place, infector, infectee, 2.0),
            base * 0.1
        );
    }

    #[test]
    fn place_baselines_scale_both_sides() {
        let calculator = PlaceInfection::new(Rc::new(Parameters::default()));
        let (mut population, place, infector, infectee) = school();
        let base = calculator.force_of_infection(&population, place, infector, infectee, 0.0);
        population.place_mut(place).infectiousness = 0.5;
        assert_relative_eq!(
            calculator.infectiousness(&population, place, infector, 0.0),
            base * 0.5
        );
        population.place_mut(place).susceptibility = 0.4;
        assert_relative_eq!(
            calculator.force_of_infection(&population, place, infector, infectee, 0.0),
            base * 0.2
        );
    }
}
