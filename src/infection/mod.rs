/////////////////////////////////////////////////////////////////////////////////////
//
// Outbreak model
//
// infection module
//
// force of infection between an infector and an infectee, for each way people
// meet: at home, in places and across space. A force is the product of the
// infector's infectiousness and the infectee's susceptibility, both reduced or
// raised by whatever interventions are acting on them
//
////////////////////////////////////////////////////////////////////////////////////

mod household;
mod place;
mod spatial;

pub use household::HouseholdInfection;
pub use place::PlaceInfection;
pub use spatial::SpatialInfection;

use crate::parameters::{Parameters, SocialDistancingParams, VaccinationParams};
use crate::world::{Microcell, Person};

// an intervention start time counts once it is set and reached
pub(crate) fn is_active(start_time: Option<f64>, time: f64) -> bool {
    start_time.map_or(false, |start| start <= time)
}

pub(crate) fn age_contact(params: &Parameters, person: &Person) -> f64 {
    if params.use_ages {
        params.age_contact[person.age_group()]
    } else {
        1.0
    }
}

// vaccination parameters, if the person's vaccine has taken effect by `time`
fn effective_vaccine<'a>(
    params: &'a Parameters,
    person: &Person,
    time: f64,
) -> Option<&'a VaccinationParams> {
    let vaccination = params.interventions.vaccination.as_ref()?;
    let date = person.date_vaccinated?;
    if time >= date + vaccination.time_to_efficacy {
        Some(vaccination)
    } else {
        None
    }
}

pub(crate) fn vaccine_infectiousness(params: &Parameters, person: &Person, time: f64) -> f64 {
    effective_vaccine(params, person, time).map_or(1.0, |v| 1.0 - v.vacc_inf_drop)
}

pub(crate) fn vaccine_susceptibility(params: &Parameters, person: &Person, time: f64) -> f64 {
    effective_vaccine(params, person, time).map_or(1.0, |v| 1.0 - v.vacc_susc_drop)
}

pub(crate) fn involves_care_home(infector: &Person, infectee: &Person) -> bool {
    infector.care_home_resident || infectee.care_home_resident
}

/// Susceptibility multiplier for someone living in a distancing microcell.
pub(crate) fn distancing<F>(
    params: &Parameters,
    microcell: &Microcell,
    infectee: &Person,
    time: f64,
    select: F,
) -> f64
where
    F: Fn(&SocialDistancingParams, bool) -> f64,
{
    match &params.interventions.social_distancing {
        Some(p) if is_active(microcell.distancing_start_time, time) => {
            select(p, infectee.distancing_enhanced)
        }
        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::InterventionParams;
    use crate::world::{InfectionStatus, Population};
    use approx::assert_relative_eq;

    #[test]
    fn start_times_activate_when_reached() {
        assert!(!is_active(None, 5.0));
        assert!(!is_active(Some(6.0), 5.0));
        assert!(is_active(Some(5.0), 5.0));
    }

    #[test]
    fn vaccine_takes_effect_after_efficacy_delay() {
        let params = Parameters {
            interventions: InterventionParams {
                vaccination: Some(VaccinationParams {
                    time_to_efficacy: 10.0,
                    vacc_susc_drop: 0.75,
                    vacc_inf_drop: 0.5,
                    ..VaccinationParams::default()
                }),
                ..Default::default()
            },
            ..Parameters::default()
        };
        let mut population = Population::new();
        let cell = population.add_cells(1)[0];
        let microcell = population.add_microcells(cell, 1)[0];
        let id = population.add_people(microcell, 1).unwrap()[0];
        population.person_mut(id).date_vaccinated = Some(2.0);
        let person = population.person(id);
        assert_eq!(person.infection_status(), InfectionStatus::Susceptible);
        assert_relative_eq!(vaccine_susceptibility(&params, person, 11.0), 1.0);
        assert_relative_eq!(vaccine_susceptibility(&params, person, 12.0), 0.25);
        assert_relative_eq!(vaccine_infectiousness(&params, person, 12.0), 0.5);
    }
}
