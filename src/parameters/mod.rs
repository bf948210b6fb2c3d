/////////////////////////////////////////////////////////////////////////////////////
//
// Outbreak model
//
// parameters module
//
// model parameters. One immutable Parameters value is built at start up
// (defaults, then overridden from parms.yaml) and shared by Rc with every
// sweep and force of infection calculator
//
////////////////////////////////////////////////////////////////////////////////////

use crate::error::{Result, SimError};
use crate::world::{InfectionStatus, PlaceType, AGE_GROUP_COUNT};

/// number of intervals in an inverse cdf table, tables have RES + 1 entries
pub const ICDF_RES: usize = 20;

// published latent period distribution (days, scaled by the mean)
pub const LATENT_ICDF: [f64; ICDF_RES + 1] = [
    0.0,
    0.098616903,
    0.171170649,
    0.239705594,
    0.307516598,
    0.376194441,
    0.446827262,
    0.520343677,
    0.597665592,
    0.679808341,
    0.767974922,
    0.863671993,
    0.968878064,
    1.086313899,
    1.219915022,
    1.37573215,
    1.563841395,
    1.803041398,
    2.135346254,
    2.694118208,
    3.964172493,
];

pub const RECOVERY_ICDF: [f64; ICDF_RES + 1] = [
    0.0,
    0.341579599,
    0.436192391,
    0.509774887,
    0.574196702,
    0.633830053,
    0.690927761,
    0.74691114,
    0.802830695,
    0.859578883,
    0.918015187,
    0.97906363,
    1.043815683,
    1.113669859,
    1.190557274,
    1.277356871,
    1.378761429,
    1.50338422,
    1.670195767,
    1.938414132,
    2.511279379,
];

// infectiousness over the infectious period, sampled at 21 even points
pub const INFECTIOUSNESS_PROFILE: [f64; ICDF_RES + 1] = [
    0.487464241,
    1.0,
    1.229764827,
    1.312453175,
    1.307955665,
    1.251658015,
    1.166040534,
    1.065716007,
    0.960199394,
    0.855580833,
    0.755628545,
    0.662333051,
    0.576923934,
    0.499932875,
    0.431338468,
    0.370710938,
    0.317338919,
    0.270347765,
    0.229173749,
    0.19305012,
    0.161430526,
];

/// Table of an exponential distribution with unit mean. The last entry
/// stands in for the infinite tail.
pub fn exponential_icdf(tail: f64) -> Vec<f64> {
    let mut table: Vec<f64> = (0..ICDF_RES)
        .map(|i| -(1.0 - i as f64 / ICDF_RES as f64).ln())
        .collect();
    table.push(tail);
    table
}

// Transition times ------------------------------------------------------------------------------------------

/// Dwell time distribution of one (current, next) status pair. Pairs that are
/// not listed take no time.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionTimeParams {
    pub from: InfectionStatus,
    pub to: InfectionStatus,
    // days
    pub mean: f64,
    pub icdf: Vec<f64>,
}

impl TransitionTimeParams {
    pub fn new(from: InfectionStatus, to: InfectionStatus, mean: f64, icdf: &[f64]) -> Self {
        TransitionTimeParams {
            from,
            to,
            mean,
            icdf: icdf.to_vec(),
        }
    }
}

fn default_transition_times() -> Vec<TransitionTimeParams> {
    use InfectionStatus::*;
    let exp = exponential_icdf(5.0);
    vec![
        TransitionTimeParams::new(Exposed, InfectASympt, 4.59, &LATENT_ICDF),
        TransitionTimeParams::new(Exposed, InfectMild, 4.59, &LATENT_ICDF),
        TransitionTimeParams::new(Exposed, InfectGP, 4.59, &LATENT_ICDF),
        TransitionTimeParams::new(InfectASympt, Recovered, 7.0, &RECOVERY_ICDF),
        TransitionTimeParams::new(InfectMild, Recovered, 7.0, &RECOVERY_ICDF),
        TransitionTimeParams::new(InfectGP, Recovered, 7.0, &RECOVERY_ICDF),
        TransitionTimeParams::new(InfectGP, InfectHosp, 5.0, &exp),
        TransitionTimeParams::new(InfectHosp, Recovered, 8.75, &RECOVERY_ICDF),
        TransitionTimeParams::new(InfectHosp, InfectICU, 5.14, &exp),
        TransitionTimeParams::new(InfectHosp, Dead, 10.19, &exp),
        TransitionTimeParams::new(InfectICU, InfectICURecov, 13.58, &RECOVERY_ICDF),
        TransitionTimeParams::new(InfectICU, Dead, 11.12, &exp),
        TransitionTimeParams::new(InfectICURecov, Recovered, 3.0, &RECOVERY_ICDF),
    ]
}

// Intervention parameters -----------------------------------------------------------------------------------

/// When an intervention may act: inside its time window and once enough
/// people are infectious.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyParams {
    pub start_time: f64,
    pub policy_duration: f64,
    pub case_threshold: usize,
}

impl Default for PolicyParams {
    fn default() -> Self {
        PolicyParams {
            start_time: 0.0,
            policy_duration: f64::INFINITY,
            case_threshold: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseIsolationParams {
    pub policy: PolicyParams,
    pub isolation_delay: f64,
    pub isolation_duration: f64,
    pub isolation_probability: f64,
    pub isolation_effectiveness: f64,
    pub isolation_house_effectiveness: f64,
}

impl Default for CaseIsolationParams {
    fn default() -> Self {
        CaseIsolationParams {
            policy: PolicyParams::default(),
            isolation_delay: 1.0,
            isolation_duration: 7.0,
            isolation_probability: 0.7,
            isolation_effectiveness: 0.25,
            isolation_house_effectiveness: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HouseholdQuarantineParams {
    pub policy: PolicyParams,
    pub quarantine_delay: f64,
    pub quarantine_duration: f64,
    pub quarantine_house_compliant: f64,
    pub quarantine_individual_compliant: f64,
    pub quarantine_house_effectiveness: f64,
    pub quarantine_spatial_effectiveness: f64,
    pub quarantine_place_effectiveness: [f64; PlaceType::COUNT],
}

impl Default for HouseholdQuarantineParams {
    fn default() -> Self {
        HouseholdQuarantineParams {
            policy: PolicyParams::default(),
            quarantine_delay: 1.0,
            quarantine_duration: 14.0,
            quarantine_house_compliant: 0.5,
            quarantine_individual_compliant: 1.0,
            quarantine_house_effectiveness: 1.5,
            quarantine_spatial_effectiveness: 0.25,
            quarantine_place_effectiveness: [0.25, 0.25, 0.25, 0.25, 0.5, 0.5],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaceClosureParams {
    pub policy: PolicyParams,
    pub closure_delay: f64,
    pub closure_duration: f64,
    pub closure_place_type: Vec<PlaceType>,
    pub closure_household_infectiousness: f64,
    pub closure_spatial_params: f64,
    pub case_microcell_threshold: usize,
}

impl Default for PlaceClosureParams {
    fn default() -> Self {
        PlaceClosureParams {
            policy: PolicyParams::default(),
            closure_delay: 0.0,
            closure_duration: 28.0,
            closure_place_type: vec![
                PlaceType::PrimarySchool,
                PlaceType::SecondarySchool,
                PlaceType::University,
            ],
            closure_household_infectiousness: 1.5,
            closure_spatial_params: 1.25,
            case_microcell_threshold: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SocialDistancingParams {
    pub policy: PolicyParams,
    pub distancing_delay: f64,
    pub distancing_duration: f64,
    pub case_microcell_threshold: usize,
    pub distancing_enhanced_prob: [f64; AGE_GROUP_COUNT],
    pub distancing_house_susc: f64,
    pub distancing_house_enhanced_susc: f64,
    pub distancing_place_susc: f64,
    pub distancing_place_enhanced_susc: f64,
    pub distancing_spatial_susc: f64,
    pub distancing_spatial_enhanced_susc: f64,
}

impl Default for SocialDistancingParams {
    fn default() -> Self {
        let mut enhanced = [0.0; AGE_GROUP_COUNT];
        // 70+ are asked to shield
        for p in enhanced.iter_mut().skip(14) {
            *p = 0.8;
        }
        SocialDistancingParams {
            policy: PolicyParams::default(),
            distancing_delay: 0.0,
            distancing_duration: 90.0,
            case_microcell_threshold: 1,
            distancing_enhanced_prob: enhanced,
            distancing_house_susc: 1.25,
            distancing_house_enhanced_susc: 1.0,
            distancing_place_susc: 0.25,
            distancing_place_enhanced_susc: 0.25,
            distancing_spatial_susc: 0.25,
            distancing_spatial_enhanced_susc: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VaccinationParams {
    pub policy: PolicyParams,
    pub daily_doses: usize,
    // lower age bound of each priority group, oldest group first
    pub min_ages: Vec<f64>,
    pub time_to_efficacy: f64,
    pub vacc_inf_drop: f64,
    pub vacc_susc_drop: f64,
}

impl Default for VaccinationParams {
    fn default() -> Self {
        VaccinationParams {
            policy: PolicyParams::default(),
            daily_doses: 10,
            min_ages: vec![80.0, 65.0, 50.0, 18.0],
            time_to_efficacy: 14.0,
            vacc_inf_drop: 0.5,
            vacc_susc_drop: 0.7,
        }
    }
}

/// Every intervention is optional; an absent one is never constructed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterventionParams {
    pub case_isolation: Option<CaseIsolationParams>,
    pub household_quarantine: Option<HouseholdQuarantineParams>,
    pub place_closure: Option<PlaceClosureParams>,
    pub social_distancing: Option<SocialDistancingParams>,
    pub vaccination: Option<VaccinationParams>,
}

// the multipliers below are only reached once the matching intervention has
// marked someone, so an absent intervention reads as "no effect"
impl InterventionParams {
    pub fn isolation_effectiveness(&self) -> f64 {
        self.case_isolation
            .as_ref()
            .map_or(1.0, |p| p.isolation_effectiveness)
    }

    pub fn isolation_house_effectiveness(&self) -> f64 {
        self.case_isolation
            .as_ref()
            .map_or(1.0, |p| p.isolation_house_effectiveness)
    }

    pub fn quarantine_house_effectiveness(&self) -> f64 {
        self.household_quarantine
            .as_ref()
            .map_or(1.0, |p| p.quarantine_house_effectiveness)
    }

    pub fn quarantine_spatial_effectiveness(&self) -> f64 {
        self.household_quarantine
            .as_ref()
            .map_or(1.0, |p| p.quarantine_spatial_effectiveness)
    }

    pub fn quarantine_place_effectiveness(&self, place_type: PlaceType) -> f64 {
        self.household_quarantine
            .as_ref()
            .map_or(1.0, |p| p.quarantine_place_effectiveness[place_type.index()])
    }

    pub fn closure_household_infectiousness(&self) -> f64 {
        self.place_closure
            .as_ref()
            .map_or(1.0, |p| p.closure_household_infectiousness)
    }

    pub fn closure_spatial_params(&self) -> f64 {
        self.place_closure
            .as_ref()
            .map_or(1.0, |p| p.closure_spatial_params)
    }

    pub fn is_closed_place_type(&self, place_type: PlaceType) -> bool {
        self.place_closure
            .as_ref()
            .map_or(false, |p| p.closure_place_type.contains(&place_type))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CareHomeParams {
    pub household_scaling: f64,
    pub place_scaling: f64,
    pub spatial_scaling: f64,
}

impl Default for CareHomeParams {
    fn default() -> Self {
        CareHomeParams {
            household_scaling: 1.0,
            place_scaling: 1.0,
            spatial_scaling: 1.0,
        }
    }
}

// Parameters ------------------------------------------------------------------------------------------------
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub time_steps_per_day: usize,
    pub household_transmission: f64,
    pub place_transmission: f64,
    // indexed by PlaceType
    pub mean_place_group_size: [f64; PlaceType::COUNT],
    pub basic_reproduction_num: f64,
    // cells further apart than this never infect each other
    pub infection_radius: f64,
    pub use_ages: bool,
    pub age_contact: [f64; AGE_GROUP_COUNT],
    // days
    pub latent_to_sympt_delay: f64,
    pub asympt_infectiousness: f64,
    pub sympt_infectiousness: f64,
    pub asympt_infect_period: f64,
    pub infectiousness_prof: Vec<f64>,
    // (current, next, probability) entries written over the default matrix
    pub state_transition: Vec<(InfectionStatus, InfectionStatus, f64)>,
    pub transition_times: Vec<TransitionTimeParams>,
    pub carehome: CareHomeParams,
    pub interventions: InterventionParams,
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            time_steps_per_day: 1,
            household_transmission: 0.1,
            place_transmission: 0.2,
            mean_place_group_size: [14.0, 24.0, 20.0, 10.0, 5.0, 1.0],
            basic_reproduction_num: 2.4,
            infection_radius: 1.5,
            use_ages: false,
            age_contact: [
                0.6, 0.7, 0.75, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.75,
                0.5,
            ],
            latent_to_sympt_delay: 0.5,
            asympt_infectiousness: 1.0,
            sympt_infectiousness: 1.5,
            asympt_infect_period: 14.0,
            infectiousness_prof: INFECTIOUSNESS_PROFILE.to_vec(),
            state_transition: Vec::new(),
            transition_times: default_transition_times(),
            carehome: CareHomeParams::default(),
            interventions: InterventionParams::default(),
        }
    }
}

impl Parameters {
    /// length of one timestep, in days
    pub fn model_time_step(&self) -> f64 {
        1.0 / self.time_steps_per_day as f64
    }

    /// Checks the values the rest of the model relies on.
    pub fn validate(&self) -> Result<()> {
        if self.time_steps_per_day == 0 {
            return Err(SimError::validation("time_steps_per_day must be positive"));
        }
        if self.infectiousness_prof.len() < 2 {
            return Err(SimError::validation(
                "infectiousness_prof needs at least two entries",
            ));
        }
        if self.asympt_infect_period <= 0.0 {
            return Err(SimError::validation("asympt_infect_period must be positive"));
        }
        if self.mean_place_group_size.iter().any(|g| *g <= 0.0) {
            return Err(SimError::validation("mean_place_group_size must be positive"));
        }
        for (_, _, p) in self.state_transition.iter() {
            check_probability("state_transition", *p)?;
        }
        if let Some(p) = &self.interventions.case_isolation {
            check_probability("isolation_probability", p.isolation_probability)?;
        }
        if let Some(p) = &self.interventions.household_quarantine {
            check_probability("quarantine_house_compliant", p.quarantine_house_compliant)?;
            check_probability(
                "quarantine_individual_compliant",
                p.quarantine_individual_compliant,
            )?;
        }
        if let Some(p) = &self.interventions.social_distancing {
            for prob in p.distancing_enhanced_prob.iter() {
                check_probability("distancing_enhanced_prob", *prob)?;
            }
        }
        if let Some(p) = &self.interventions.vaccination {
            check_probability("vacc_inf_drop", p.vacc_inf_drop)?;
            check_probability("vacc_susc_drop", p.vacc_susc_drop)?;
        }
        Ok(())
    }
}

pub fn check_probability(name: &str, p: f64) -> Result<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(SimError::validation(format!(
            "{} must be a probability in [0, 1], got {}",
            name, p
        )))
    }
}

// Simulation parameters -------------------------------------------------------------------------------------
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationParams {
    pub simulation_start_time: f64,
    pub simulation_end_time: f64,
    pub initial_infected_number: usize,
    pub simulation_seed: Option<u64>,
    pub output_dir: String,
    pub output_file: String,
}

impl Default for SimulationParams {
    fn default() -> Self {
        SimulationParams {
            simulation_start_time: 0.0,
            simulation_end_time: 60.0,
            initial_infected_number: 10,
            simulation_seed: None,
            output_dir: String::from("output"),
            output_file: String::from("output.csv"),
        }
    }
}
