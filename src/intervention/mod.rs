/////////////////////////////////////////////////////////////////////////////////////
//
// Outbreak model
//
// intervention module
//
// policies that change how people mix once an outbreak is under way. Each one
// marks people or microcells with start times; the force of infection
// calculators read those marks
//
////////////////////////////////////////////////////////////////////////////////////

mod case_isolation;
mod household_quarantine;
mod place_closure;
mod social_distancing;
mod vaccination;

pub use case_isolation::CaseIsolation;
pub use household_quarantine::HouseholdQuarantine;
pub use place_closure::PlaceClosure;
pub use social_distancing::SocialDistancing;
pub use vaccination::Vaccination;

use crate::error::Result;
use crate::parameters::{InterventionParams, PolicyParams};
use crate::world::Population;
use rand::RngCore;

pub trait Intervention {
    fn name(&self) -> &'static str;

    fn policy(&self) -> &PolicyParams;

    /// inside the policy window and at or above the case threshold
    fn is_active(&self, time: f64, case_count: usize) -> bool {
        let policy = self.policy();
        policy.start_time <= time
            && time < policy.start_time + policy.policy_duration
            && case_count >= policy.case_threshold
    }

    fn apply(&mut self, population: &mut Population, time: f64, rng: &mut dyn RngCore)
        -> Result<()>;

    /// clears every mark the intervention has left
    fn turn_off(&mut self, population: &mut Population);
}

/// Builds the configured interventions, in a fixed order.
pub fn from_params(params: &InterventionParams) -> Vec<Box<dyn Intervention>> {
    let mut interventions: Vec<Box<dyn Intervention>> = Vec::new();
    if let Some(p) = &params.case_isolation {
        interventions.push(Box::new(CaseIsolation::new(p.clone())));
    }
    if let Some(p) = &params.place_closure {
        interventions.push(Box::new(PlaceClosure::new(p.clone())));
    }
    if let Some(p) = &params.household_quarantine {
        interventions.push(Box::new(HouseholdQuarantine::new(p.clone())));
    }
    if let Some(p) = &params.social_distancing {
        interventions.push(Box::new(SocialDistancing::new(p.clone())));
    }
    if let Some(p) = &params.vaccination {
        interventions.push(Box::new(Vaccination::new(p.clone())));
    }
    interventions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::{CaseIsolationParams, VaccinationParams};

    #[test]
    fn policy_window_and_threshold() {
        let isolation = CaseIsolation::new(CaseIsolationParams {
            policy: PolicyParams {
                start_time: 5.0,
                policy_duration: 10.0,
                case_threshold: 3,
            },
            ..CaseIsolationParams::default()
        });
        assert!(!isolation.is_active(4.0, 10));
        assert!(isolation.is_active(5.0, 3));
        assert!(!isolation.is_active(5.0, 2));
        assert!(isolation.is_active(14.5, 3));
        assert!(!isolation.is_active(15.0, 3));
    }

    #[test]
    fn only_configured_interventions_are_built() {
        let params = InterventionParams {
            case_isolation: Some(CaseIsolationParams::default()),
            vaccination: Some(VaccinationParams::default()),
            ..InterventionParams::default()
        };
        let names: Vec<&str> = from_params(&params).iter().map(|i| i.name()).collect();
        assert_eq!(names, vec!["case_isolation", "vaccination"]);
        assert!(from_params(&InterventionParams::default()).is_empty());
    }
}
