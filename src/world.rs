use rand::Rng;
use serde::Serialize;

use crate::agent::Agent;
use crate::config::Params;
use crate::grid::GrassGrid;
use crate::rng::SystemRng;

/// Per-tick counts for observers. `step` is 0 on a fresh world; the first
/// completed tick reports 1.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TickReport {
    pub step: u64,
    pub grass: usize,
    pub herbivores: usize,
    pub carnivores: usize,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct AgentView {
    pub x: u32,
    pub y: u32,
    pub energy: f64,
}

impl From<&Agent> for AgentView {
    fn from(agent: &Agent) -> Self {
        Self {
            x: agent.x,
            y: agent.y,
            energy: agent.energy,
        }
    }
}

/// Everything a drawing surface needs for one frame: row-major grass
/// booleans plus both populations with positions and energies.
#[derive(Clone, Debug, Serialize)]
pub struct WorldFrame {
    pub step: u64,
    pub width: u32,
    pub height: u32,
    pub grass: Vec<bool>,
    pub herbivores: Vec<AgentView>,
    pub carnivores: Vec<AgentView>,
}

/// Complete simulation state: the grass field, both populations, and the
/// step counter. Systems reach into the fields directly; everything outside
/// the crate goes through the read accessors.
pub struct World {
    step: u64,
    pub(crate) grid: GrassGrid,
    pub(crate) herbivores: Vec<Agent>,
    pub(crate) carnivores: Vec<Agent>,
}

impl World {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            step: 0,
            grid: GrassGrid::new(width, height),
            herbivores: Vec::new(),
            carnivores: Vec::new(),
        }
    }

    /// Reinitialize in place from the current parameter snapshot: fully
    /// grown grid, fresh populations at uniform random positions, step back
    /// to zero. Each newcomer starts with half its kind's reproduction
    /// threshold, so nobody reproduces on the very first tick.
    pub fn reset(&mut self, params: &Params, rng: &mut SystemRng<'_>) {
        self.grid.reset();
        self.herbivores.clear();
        self.carnivores.clear();
        let width = self.grid.width();
        let height = self.grid.height();
        for _ in 0..params.initial_herbivores {
            let x = rng.gen_range(0..width);
            let y = rng.gen_range(0..height);
            self.herbivores
                .push(Agent::spawn(x, y, params.herb_reproduce_energy / 2.0));
        }
        for _ in 0..params.initial_carnivores {
            let x = rng.gen_range(0..width);
            let y = rng.gen_range(0..height);
            self.carnivores
                .push(Agent::spawn(x, y, params.carn_reproduce_energy / 2.0));
        }
        self.step = 0;
    }

    pub fn step(&self) -> u64 {
        self.step
    }

    pub(crate) fn advance_step(&mut self) {
        self.step += 1;
    }

    pub fn grid(&self) -> &GrassGrid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut GrassGrid {
        &mut self.grid
    }

    pub fn herbivores(&self) -> &[Agent] {
        &self.herbivores
    }

    pub fn carnivores(&self) -> &[Agent] {
        &self.carnivores
    }

    /// Drop an extra herbivore in. Used by tests to pin exact placements;
    /// normal runs populate through `reset`.
    pub fn add_herbivore(&mut self, agent: Agent) {
        self.herbivores.push(agent);
    }

    pub fn add_carnivore(&mut self, agent: Agent) {
        self.carnivores.push(agent);
    }

    pub fn report(&self) -> TickReport {
        TickReport {
            step: self.step,
            grass: self.grid.count_grass(),
            herbivores: self.herbivores.len(),
            carnivores: self.carnivores.len(),
        }
    }

    pub fn frame(&self) -> WorldFrame {
        WorldFrame {
            step: self.step,
            width: self.grid.width(),
            height: self.grid.height(),
            grass: self.grid.grass_cells(),
            herbivores: self.herbivores.iter().map(AgentView::from).collect(),
            carnivores: self.carnivores.iter().map(AgentView::from).collect(),
        }
    }
}
