// Spatial force of infection -------------------------------------------------------------------------------
//
// infection between cells. A cell first draws how many infection events its
// infectious people cause, then each event is accepted with the pairwise force

use super::{
    age_contact, distancing, involves_care_home, is_active, vaccine_infectiousness,
    vaccine_susceptibility,
};
use crate::parameters::Parameters;
use crate::world::{CellId, PersonId, Population};
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct SpatialInfection {
    params: Rc<Parameters>,
}

impl SpatialInfection {
    pub fn new(params: Rc<Parameters>) -> SpatialInfection {
        SpatialInfection { params }
    }

    /// expected number of infection events caused from `cell` this step
    pub fn cell_infectiousness(&self, population: &Population, cell: CellId) -> f64 {
        population.cell(cell).number_infectious() as f64 * self.params.basic_reproduction_num
    }

    pub fn infectiousness(&self, population: &Population, infector: PersonId, time: f64) -> f64 {
        let params = &self.params;
        let person = population.person(infector);
        let microcell = population.microcell_of(infector);
        let mut infectiousness = person.infectiousness * age_contact(params, person);
        if is_active(microcell.closure_start_time, time) {
            infectiousness *= params.interventions.closure_spatial_params();
        }
        if is_active(person.isolation_start_time, time) {
            infectiousness *= params.interventions.isolation_effectiveness();
        }
        if is_active(person.quarantine_start_time, time) {
            infectiousness *= params.interventions.quarantine_spatial_effectiveness();
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
                    p.distancing_spatial_enhanced_susc
                } else {
                    p.distancing_spatial_susc
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
            force *= self.params.carehome.spatial_scaling;
        }
        force
    }
}
