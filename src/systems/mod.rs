mod carnivores;
mod grass;
mod herbivores;

pub use carnivores::CarnivoreSystem;
pub use grass::GrassSystem;
pub use herbivores::HerbivoreSystem;
