//! Raw dump schemas

pub mod user;
pub mod world;

pub use user::{EconomyModel, UserDump};
pub use world::WorldDump;
