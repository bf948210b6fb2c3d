/////////////////////////////////////////////////////////////////////////////////////
//
// Outbreak model
//
// library root
//
// an agent based epidemic model: people live in microcells grouped into cells,
// share households and places, and move through infection statuses as the
// simulation sweeps over them once per timestep
//
////////////////////////////////////////////////////////////////////////////////////

pub mod data_management;
pub mod disease;
pub mod error;
pub mod infection;
pub mod intervention;
pub mod parameters;
pub mod simulation;
pub mod stats;
pub mod sweep;
pub mod utilities;
pub mod world;
