use anyhow::Result;

use crate::{
    agent::Agent,
    engine::{System, SystemContext},
    rng::SystemRng,
    world::World,
};

/// Predator pass: pay upkeep, wander, hunt, then reproduce. Runs after the
/// herbivore pass, so prey have already moved when hunters strike. Kills
/// land immediately; a herbivore taken early in the pass is gone for every
/// later hunter in the same tick.
pub struct CarnivoreSystem;

impl CarnivoreSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CarnivoreSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for CarnivoreSystem {
    fn name(&self) -> &str {
        "carnivores"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let params = ctx.params;
        let width = world.grid.width();
        let height = world.grid.height();
        let mut offspring = Vec::new();
        for carnivore in world.carnivores.iter_mut() {
            carnivore.energy -= params.carn_move_cost;
            carnivore.wander(width, height, rng);
            hunt(carnivore, &mut world.herbivores, params.carn_prey_gain);
            if carnivore.energy > params.carn_reproduce_energy {
                offspring.push(reproduce(carnivore));
            }
        }
        world.carnivores.retain(|carnivore| !carnivore.is_dead());
        world.carnivores.append(&mut offspring);
        Ok(())
    }
}

/// Take the first herbivore sharing the hunter's cell, in storage order. At
/// most one kill per turn, energy-positive or not.
fn hunt(carnivore: &mut Agent, herbivores: &mut Vec<Agent>, prey_gain: f64) -> bool {
    let found = herbivores
        .iter()
        .position(|prey| prey.x == carnivore.x && prey.y == carnivore.y);
    match found {
        Some(index) => {
            herbivores.remove(index);
            carnivore.energy += prey_gain;
            true
        }
        None => false,
    }
}

/// Halve the parent's energy and return the offspring on the same cell.
/// Carnivores carry no reproduction cooldown.
fn reproduce(parent: &mut Agent) -> Agent {
    parent.energy /= 2.0;
    Agent::spawn(parent.x, parent.y, parent.energy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hunt_takes_the_first_colocated_prey_only() {
        let mut carnivore = Agent::spawn(2, 2, 10.0);
        let mut herbivores = vec![
            Agent::spawn(1, 2, 4.0),
            Agent::spawn(2, 2, 5.0),
            Agent::spawn(2, 2, 6.0),
        ];
        assert!(hunt(&mut carnivore, &mut herbivores, 8.0));
        assert_eq!(carnivore.energy, 18.0);
        assert_eq!(herbivores.len(), 2);
        // Storage order decides the victim: the 5.0 one went first.
        assert_eq!(herbivores[1].energy, 6.0);
    }

    #[test]
    fn hunt_misses_when_nobody_shares_the_cell() {
        let mut carnivore = Agent::spawn(0, 0, 10.0);
        let mut herbivores = vec![Agent::spawn(1, 0, 4.0)];
        assert!(!hunt(&mut carnivore, &mut herbivores, 8.0));
        assert_eq!(carnivore.energy, 10.0);
        assert_eq!(herbivores.len(), 1);
    }

    #[test]
    fn reproduce_halves_energy_without_a_cooldown() {
        let mut parent = Agent::spawn(3, 1, 32.0);
        let child = reproduce(&mut parent);
        assert_eq!(parent.energy, 16.0);
        assert_eq!(child.energy, 16.0);
        assert_eq!(child.cooldown, 0);
        assert_eq!((child.x, child.y), (3, 1));
    }
}
