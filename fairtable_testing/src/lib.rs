//! Test tooling shared by the table crates: data generation, statistical checks on hash
//! quality and the contract suite every backend runs.
pub use fairtable_core;

pub mod stat;
pub use stat::*;

pub mod generate;
pub use generate::*;

pub mod table;
pub use table::*;

pub mod equivalence;
pub use equivalence::*;
