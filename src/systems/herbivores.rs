use anyhow::Result;

use crate::{
    agent::Agent,
    config::Params,
    engine::{System, SystemContext},
    grid::GrassGrid,
    rng::SystemRng,
    world::World,
};

/// Grazer pass: pay upkeep, wander, eat, then reproduce. Runs over exactly
/// the herbivores alive at entry; offspring join at the end of the pass and
/// first act next tick.
pub struct HerbivoreSystem;

impl HerbivoreSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HerbivoreSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for HerbivoreSystem {
    fn name(&self) -> &str {
        "herbivores"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let params = ctx.params;
        let mut offspring = Vec::new();
        for herbivore in world.herbivores.iter_mut() {
            graze(herbivore, params, &mut world.grid, rng);
            if herbivore.energy > params.herb_reproduce_energy && herbivore.cooldown == 0 {
                offspring.push(reproduce(herbivore, params.herb_reproduce_cooldown));
            }
        }
        // Deaths are settled after reproduction, so an agent that reproduced
        // into the red this tick still leaves its offspring behind.
        world.herbivores.retain(|herbivore| !herbivore.is_dead());
        world.herbivores.append(&mut offspring);
        Ok(())
    }
}

/// One herbivore turn: upkeep cost, cooldown countdown, a wander step, and a
/// bite at whatever cell it lands on.
fn graze(herbivore: &mut Agent, params: &Params, grid: &mut GrassGrid, rng: &mut SystemRng<'_>) {
    herbivore.energy -= params.herb_move_cost;
    if herbivore.cooldown > 0 {
        herbivore.cooldown -= 1;
    }
    herbivore.wander(grid.width(), grid.height(), rng);
    if grid.consume(herbivore.x, herbivore.y) {
        herbivore.energy += params.herb_grass_gain;
    }
}

/// Halve the parent's energy and return the offspring: same cell, the halved
/// energy, and a full cooldown on both parent and child.
fn reproduce(parent: &mut Agent, cooldown: u32) -> Agent {
    parent.energy /= 2.0;
    parent.cooldown = cooldown;
    Agent {
        x: parent.x,
        y: parent.y,
        energy: parent.energy,
        cooldown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RngManager;

    fn fixed_params() -> Params {
        Params {
            herb_move_cost: 0.5,
            herb_grass_gain: 3.0,
            herb_reproduce_energy: 10.0,
            herb_reproduce_cooldown: 5,
            ..Params::default()
        }
    }

    #[test]
    fn graze_on_full_grid_nets_gain_minus_cost() {
        let params = fixed_params();
        let mut grid = GrassGrid::new(5, 5);
        let mut manager = RngManager::new(1);
        let mut rng = manager.stream("herbivores");
        let mut herbivore = Agent::spawn(2, 2, 15.0);
        graze(&mut herbivore, &params, &mut grid, &mut rng);
        // Every cell has grass, so wherever it lands: 15 - 0.5 + 3.
        assert_eq!(herbivore.energy, 17.5);
        assert!(!grid.has_grass(herbivore.x, herbivore.y));
    }

    #[test]
    fn graze_on_bare_grid_only_pays_the_cost() {
        let params = fixed_params();
        let mut grid = GrassGrid::new(3, 3);
        for x in 0..3 {
            for y in 0..3 {
                grid.consume(x, y);
            }
        }
        let mut manager = RngManager::new(1);
        let mut rng = manager.stream("herbivores");
        let mut herbivore = Agent::spawn(1, 1, 15.0);
        graze(&mut herbivore, &params, &mut grid, &mut rng);
        assert_eq!(herbivore.energy, 14.5);
    }

    #[test]
    fn cooldown_counts_down_during_graze() {
        let params = fixed_params();
        let mut grid = GrassGrid::new(3, 3);
        let mut manager = RngManager::new(1);
        let mut rng = manager.stream("herbivores");
        let mut herbivore = Agent {
            x: 1,
            y: 1,
            energy: 15.0,
            cooldown: 2,
        };
        graze(&mut herbivore, &params, &mut grid, &mut rng);
        assert_eq!(herbivore.cooldown, 1);
        graze(&mut herbivore, &params, &mut grid, &mut rng);
        assert_eq!(herbivore.cooldown, 0);
        graze(&mut herbivore, &params, &mut grid, &mut rng);
        assert_eq!(herbivore.cooldown, 0);
    }

    #[test]
    fn reproduce_halves_energy_exactly_and_arms_both_cooldowns() {
        let mut parent = Agent::spawn(4, 7, 25.0);
        let child = reproduce(&mut parent, 5);
        assert_eq!(parent.energy, 12.5);
        assert_eq!(child.energy, 12.5);
        assert_eq!(parent.cooldown, 5);
        assert_eq!(child.cooldown, 5);
        assert_eq!((child.x, child.y), (4, 7));
    }
}
