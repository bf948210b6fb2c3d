/////////////////////////////////////////////////////////////////////////////////////
//
// Outbreak model
//
// disease module
//
// natural history of the infection: which status follows which, how long each
// one lasts and how infectious a person is along the way
//
////////////////////////////////////////////////////////////////////////////////////

mod infectiousness_profile;
mod inverse_cdf;
mod progression;
mod state_transition;
mod transition_time;

pub use infectiousness_profile::{InfectiousnessProfile, MAX_INFECTIOUS_STEPS};
pub use inverse_cdf::InverseCdf;
pub use progression::HostProgression;
pub use state_transition::StateTransitionMatrix;
pub use transition_time::{TransitionTime, TransitionTimeMatrix};
