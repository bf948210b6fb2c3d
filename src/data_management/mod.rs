/////////////////////////////////////////////////////////////////////////////////////
//
// Outbreak model
//
// data_management module
//
// reads the model definition from <model_root>/parms.yaml and prepares the
// output location. Keys missing from the file keep their defaults
//
////////////////////////////////////////////////////////////////////////////////////

use crate::error::{Result, SimError};
use crate::parameters::{
    CaseIsolationParams, HouseholdQuarantineParams, Parameters, PlaceClosureParams,
    PolicyParams, SimulationParams, SocialDistancingParams, TransitionTimeParams,
    VaccinationParams,
};
use crate::world::{InfectionStatus, PlaceType, ToyPopulation};
use log::info;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use yaml_rust::{Yaml, YamlLoader};

// -------------------------------- File paths -------------------------------------------------------------
pub struct ModelDataStore {
    model_root: PathBuf,
    parameter_file: PathBuf,
}

impl ModelDataStore {
    // the model root and its parameter file must both exist
    pub fn new<P: AsRef<Path>>(model_root: P) -> Result<ModelDataStore> {
        let model_root = model_root.as_ref().to_path_buf();
        let parameter_file = model_root.join("parms.yaml");
        if !model_root.is_dir() {
            return Err(SimError::IoError(io::Error::new(
                io::ErrorKind::NotFound,
                format!("model root {} is not a directory", model_root.display()),
            )));
        }
        if !parameter_file.is_file() {
            return Err(SimError::IoError(io::Error::new(
                io::ErrorKind::NotFound,
                format!("parameter file {} not found", parameter_file.display()),
            )));
        }
        info!("model root: {}", model_root.display());
        Ok(ModelDataStore {
            model_root,
            parameter_file,
        })
    }

    pub fn get_model_parms(&self) -> Result<ModelParameters> {
        let parm_string = fs::read_to_string(&self.parameter_file)?;
        ModelParameters::from_yaml_str(&parm_string)
    }

    /// Creates the output directory (relative to the model root) and returns
    /// the path of the output file inside it.
    pub fn create_output_file(&self, sim_params: &SimulationParams) -> Result<PathBuf> {
        let output_dir = self.model_root.join(&sim_params.output_dir);
        fs::create_dir_all(&output_dir)?;
        Ok(output_dir.join(&sim_params.output_file))
    }
}

// -------------------------------- Model parameters -------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelParameters {
    pub parameters: Parameters,
    pub simulation: SimulationParams,
    pub population: ToyPopulation,
}

impl ModelParameters {
    pub fn from_yaml_str(source: &str) -> Result<ModelParameters> {
        // the loader creates an array of yaml documents, only the first one interests us
        let docs = YamlLoader::load_from_str(source)?;
        let doc = match docs.first() {
            Some(doc) => doc,
            None => return Err(SimError::validation("parameter file is empty")),
        };

        let mut model = ModelParameters::default();
        parse_simulation(&doc["simulation"], &mut model.simulation)?;
        parse_population(&doc["population"], &mut model.population)?;
        parse_parameters(&doc["parameters"], &mut model.parameters)?;
        model.parameters.validate()?;
        Ok(model)
    }
}

fn parse_simulation(node: &Yaml, sim: &mut SimulationParams) -> Result<()> {
    set_f64(node, "simulation_start_time", &mut sim.simulation_start_time)?;
    set_f64(node, "simulation_end_time", &mut sim.simulation_end_time)?;
    set_usize(node, "initial_infected_number", &mut sim.initial_infected_number)?;
    if let Some(seed) = get_usize(node, "simulation_seed")? {
        sim.simulation_seed = Some(seed as u64);
    }
    set_string(node, "output_dir", &mut sim.output_dir)?;
    set_string(node, "output_file", &mut sim.output_file)
}

fn parse_population(node: &Yaml, pop: &mut ToyPopulation) -> Result<()> {
    set_usize(node, "population_size", &mut pop.population_size)?;
    set_usize(node, "cell_number", &mut pop.cell_number)?;
    set_usize(node, "microcell_per_cell", &mut pop.microcell_per_cell)?;
    set_usize(node, "household_number", &mut pop.household_number)?;
    set_usize(node, "places_per_microcell", &mut pop.places_per_microcell)?;
    set_bool(node, "if_households", &mut pop.if_households)
}

fn parse_parameters(node: &Yaml, p: &mut Parameters) -> Result<()> {
    set_usize(node, "time_steps_per_day", &mut p.time_steps_per_day)?;
    set_f64(node, "household_transmission", &mut p.household_transmission)?;
    set_f64(node, "place_transmission", &mut p.place_transmission)?;
    set_f64_array(node, "mean_place_group_size", &mut p.mean_place_group_size)?;
    set_f64(node, "basic_reproduction_num", &mut p.basic_reproduction_num)?;
    set_f64(node, "infection_radius", &mut p.infection_radius)?;
    set_bool(node, "use_ages", &mut p.use_ages)?;
    set_f64_array(node, "age_contact", &mut p.age_contact)?;
    set_f64(node, "latent_to_sympt_delay", &mut p.latent_to_sympt_delay)?;
    set_f64(node, "asympt_infectiousness", &mut p.asympt_infectiousness)?;
    set_f64(node, "sympt_infectiousness", &mut p.sympt_infectiousness)?;
    set_f64(node, "asympt_infect_period", &mut p.asympt_infect_period)?;
    if let Some(profile) = get_f64_vec(node, "infectiousness_prof")? {
        p.infectiousness_prof = profile;
    }

    // entries are [current, next, probability]
    if let Some(entries) = get_vec(node, "state_transition")? {
        for entry in entries {
            let triple = entry.as_vec().filter(|v| v.len() == 3).ok_or_else(|| {
                SimError::validation("state_transition entries must be [current, next, probability]")
            })?;
            p.state_transition.push((
                parse_status(&triple[0])?,
                parse_status(&triple[1])?,
                as_f64(&triple[2], "state_transition probability")?,
            ));
        }
    }

    // a listed transition replaces the default for that pair
    if let Some(entries) = get_vec(node, "transition_times")? {
        for entry in entries {
            let from = parse_status(&entry["from"])?;
            let to = parse_status(&entry["to"])?;
            let mean = as_f64(&entry["mean"], "transition_times mean")?;
            let icdf = get_f64_vec(entry, "icdf")?
                .ok_or_else(|| SimError::validation("transition_times entry needs an icdf"))?;
            p.transition_times.retain(|t| !(t.from == from && t.to == to));
            p.transition_times
                .push(TransitionTimeParams::new(from, to, mean, &icdf));
        }
    }

    let carehome = &node["carehome"];
    set_f64(carehome, "household_scaling", &mut p.carehome.household_scaling)?;
    set_f64(carehome, "place_scaling", &mut p.carehome.place_scaling)?;
    set_f64(carehome, "spatial_scaling", &mut p.carehome.spatial_scaling)?;

    parse_interventions(&node["interventions"], p)
}

// an intervention is switched on by its key being present
fn parse_interventions(node: &Yaml, p: &mut Parameters) -> Result<()> {
    let i = &mut p.interventions;

    let n = &node["case_isolation"];
    if !n.is_badvalue() {
        let mut c = CaseIsolationParams::default();
        parse_policy(n, &mut c.policy)?;
        set_f64(n, "isolation_delay", &mut c.isolation_delay)?;
        set_f64(n, "isolation_duration", &mut c.isolation_duration)?;
        set_f64(n, "isolation_probability", &mut c.isolation_probability)?;
        set_f64(n, "isolation_effectiveness", &mut c.isolation_effectiveness)?;
        set_f64(n, "isolation_house_effectiveness", &mut c.isolation_house_effectiveness)?;
        i.case_isolation = Some(c);
    }

    let n = &node["household_quarantine"];
    if !n.is_badvalue() {
        let mut q = HouseholdQuarantineParams::default();
        parse_policy(n, &mut q.policy)?;
        set_f64(n, "quarantine_delay", &mut q.quarantine_delay)?;
        set_f64(n, "quarantine_duration", &mut q.quarantine_duration)?;
        set_f64(n, "quarantine_house_compliant", &mut q.quarantine_house_compliant)?;
        set_f64(n, "quarantine_individual_compliant", &mut q.quarantine_individual_compliant)?;
        set_f64(n, "quarantine_house_effectiveness", &mut q.quarantine_house_effectiveness)?;
        set_f64(n, "quarantine_spatial_effectiveness", &mut q.quarantine_spatial_effectiveness)?;
        set_f64_array(n, "quarantine_place_effectiveness", &mut q.quarantine_place_effectiveness)?;
        i.household_quarantine = Some(q);
    }

    let n = &node["place_closure"];
    if !n.is_badvalue() {
        let mut c = PlaceClosureParams::default();
        parse_policy(n, &mut c.policy)?;
        set_f64(n, "closure_delay", &mut c.closure_delay)?;
        set_f64(n, "closure_duration", &mut c.closure_duration)?;
        set_f64(n, "closure_household_infectiousness", &mut c.closure_household_infectiousness)?;
        set_f64(n, "closure_spatial_params", &mut c.closure_spatial_params)?;
        set_usize(n, "case_microcell_threshold", &mut c.case_microcell_threshold)?;
        if let Some(types) = get_vec(n, "closure_place_type")? {
            c.closure_place_type = types
                .iter()
                .map(|t| {
                    t.as_str()
                        .ok_or_else(|| SimError::validation("closure_place_type must be names"))
                        .and_then(|s| s.parse::<PlaceType>())
                })
                .collect::<Result<Vec<PlaceType>>>()?;
        }
        i.place_closure = Some(c);
    }

    let n = &node["social_distancing"];
    if !n.is_badvalue() {
        let mut d = SocialDistancingParams::default();
        parse_policy(n, &mut d.policy)?;
        set_f64(n, "distancing_delay", &mut d.distancing_delay)?;
        set_f64(n, "distancing_duration", &mut d.distancing_duration)?;
        set_usize(n, "case_microcell_threshold", &mut d.case_microcell_threshold)?;
        set_f64_array(n, "distancing_enhanced_prob", &mut d.distancing_enhanced_prob)?;
        set_f64(n, "distancing_house_susc", &mut d.distancing_house_susc)?;
        set_f64(n, "distancing_house_enhanced_susc", &mut d.distancing_house_enhanced_susc)?;
        set_f64(n, "distancing_place_susc", &mut d.distancing_place_susc)?;
        set_f64(n, "distancing_place_enhanced_susc", &mut d.distancing_place_enhanced_susc)?;
        set_f64(n, "distancing_spatial_susc", &mut d.distancing_spatial_susc)?;
        set_f64(n, "distancing_spatial_enhanced_susc", &mut d.distancing_spatial_enhanced_susc)?;
        i.social_distancing = Some(d);
    }

    let n = &node["vaccination"];
    if !n.is_badvalue() {
        let mut v = VaccinationParams::default();
        parse_policy(n, &mut v.policy)?;
        set_usize(n, "daily_doses", &mut v.daily_doses)?;
        if let Some(min_ages) = get_f64_vec(n, "min_ages")? {
            v.min_ages = min_ages;
        }
        set_f64(n, "time_to_efficacy", &mut v.time_to_efficacy)?;
        set_f64(n, "vacc_inf_drop", &mut v.vacc_inf_drop)?;
        set_f64(n, "vacc_susc_drop", &mut v.vacc_susc_drop)?;
        i.vaccination = Some(v);
    }
    Ok(())
}

fn parse_policy(node: &Yaml, policy: &mut PolicyParams) -> Result<()> {
    set_f64(node, "start_time", &mut policy.start_time)?;
    set_f64(node, "policy_duration", &mut policy.policy_duration)?;
    set_usize(node, "case_threshold", &mut policy.case_threshold)
}

// -------------------------------- yaml helpers -----------------------------------------------------------
fn parse_status(node: &Yaml) -> Result<InfectionStatus> {
    node.as_str()
        .ok_or_else(|| SimError::validation(format!("expected a status name, got {:?}", node)))?
        .parse()
}

fn as_f64(node: &Yaml, key: &str) -> Result<f64> {
    match node {
        Yaml::Real(_) => node
            .as_f64()
            .ok_or_else(|| SimError::validation(format!("{} is not a number", key))),
        Yaml::Integer(i) => Ok(*i as f64),
        _ => Err(SimError::validation(format!("{} must be a number", key))),
    }
}

fn get_f64(node: &Yaml, key: &str) -> Result<Option<f64>> {
    match &node[key] {
        Yaml::BadValue => Ok(None),
        value => as_f64(value, key).map(Some),
    }
}

fn get_usize(node: &Yaml, key: &str) -> Result<Option<usize>> {
    match &node[key] {
        Yaml::BadValue => Ok(None),
        Yaml::Integer(i) if *i >= 0 => Ok(Some(*i as usize)),
        _ => Err(SimError::validation(format!(
            "{} must be a non negative integer",
            key
        ))),
    }
}

fn get_vec<'a>(node: &'a Yaml, key: &str) -> Result<Option<&'a Vec<Yaml>>> {
    match &node[key] {
        Yaml::BadValue => Ok(None),
        Yaml::Array(values) => Ok(Some(values)),
        _ => Err(SimError::validation(format!("{} must be a list", key))),
    }
}

fn get_f64_vec(node: &Yaml, key: &str) -> Result<Option<Vec<f64>>> {
    match get_vec(node, key)? {
        None => Ok(None),
        Some(values) => values
            .iter()
            .map(|v| as_f64(v, key))
            .collect::<Result<Vec<f64>>>()
            .map(Some),
    }
}

fn set_f64(node: &Yaml, key: &str, target: &mut f64) -> Result<()> {
    if let Some(value) = get_f64(node, key)? {
        *target = value;
    }
    Ok(())
}

fn set_usize(node: &Yaml, key: &str, target: &mut usize) -> Result<()> {
    if let Some(value) = get_usize(node, key)? {
        *target = value;
    }
    Ok(())
}

fn set_bool(node: &Yaml, key: &str, target: &mut bool) -> Result<()> {
    match &node[key] {
        Yaml::BadValue => Ok(()),
        Yaml::Boolean(b) => {
            *target = *b;
            Ok(())
        }
        _ => Err(SimError::validation(format!("{} must be true or false", key))),
    }
}

fn set_string(node: &Yaml, key: &str, target: &mut String) -> Result<()> {
    match &node[key] {
        Yaml::BadValue => Ok(()),
        Yaml::String(s) => {
            *target = s.clone();
            Ok(())
        }
        _ => Err(SimError::validation(format!("{} must be a string", key))),
    }
}

// fixed length tables must be given in full
fn set_f64_array(node: &Yaml, key: &str, target: &mut [f64]) -> Result<()> {
    if let Some(values) = get_f64_vec(node, key)? {
        if values.len() != target.len() {
            return Err(SimError::validation(format!(
                "{} needs {} values, got {}",
                key,
                target.len(),
                values.len()
            )));
        }
        target.copy_from_slice(&values);
    }
    Ok(())
}
