use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    rng::SystemRng,
    world::World,
};

/// Regrowth pass. Runs first each tick, so grass eaten last tick starts its
/// clock before any herbivore moves this tick.
pub struct GrassSystem;

impl GrassSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GrassSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for GrassSystem {
    fn name(&self) -> &str {
        "grass"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        world.grid.update(ctx.params.grass_regrow_time);
        Ok(())
    }
}
