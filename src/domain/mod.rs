pub mod artifact;
pub mod ledger;
pub mod model;
pub mod registry;
pub mod verify;
