pub mod agent;
pub mod config;
pub mod engine;
pub mod grid;
pub mod history;
pub mod rng;
pub mod scenario;
pub mod snapshot;
pub mod systems;
pub mod web;
pub mod world;

pub use agent::Agent;
pub use config::Params;
pub use engine::{Engine, EngineBuilder, EngineSettings, TickPacer};
pub use scenario::{Scenario, ScenarioLoader};
pub use world::{TickReport, World, WorldFrame};
