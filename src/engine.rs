use std::path::PathBuf;

use anyhow::Result;

use crate::config::Params;
use crate::rng::{RngManager, SystemRng};
use crate::snapshot::SnapshotWriter;
use crate::world::{TickReport, World};

pub struct EngineSettings {
    pub scenario_name: String,
    pub seed: u64,
    pub snapshot_interval_ticks: u64,
    pub snapshot_dir: PathBuf,
}

/// Read-only tick context handed to every system.
pub struct SystemContext<'a> {
    pub step: u64,
    pub params: &'a Params,
}

/// One phase of the tick. Systems run in registration order, each drawing
/// from its own named random stream, and always run to completion over the
/// whole world before the next system starts. `Send` because the web driver
/// runs the engine on a blocking worker thread.
pub trait System: Send {
    fn name(&self) -> &str;

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        rng: &mut SystemRng<'_>,
    ) -> Result<()>;
}

pub struct EngineBuilder {
    settings: EngineSettings,
    systems: Vec<Box<dyn System>>,
}

impl EngineBuilder {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            systems: Vec::new(),
        }
    }

    pub fn with_system(mut self, system: impl System + 'static) -> Self {
        self.systems.push(Box::new(system));
        self
    }

    pub fn build(self) -> Engine {
        let rng = RngManager::new(self.settings.seed);
        let snapshot_writer = SnapshotWriter::new(
            &self.settings.snapshot_dir,
            self.settings.snapshot_interval_ticks,
        );
        Engine {
            rng,
            systems: self.systems,
            snapshot_writer,
            settings: self.settings,
        }
    }
}

/// Orchestrates ticks over an externally owned `World`. The engine holds the
/// pieces that persist across resets: system order, random streams, and the
/// snapshot writer.
pub struct Engine {
    rng: RngManager,
    systems: Vec<Box<dyn System>>,
    snapshot_writer: SnapshotWriter,
    settings: EngineSettings,
}

impl Engine {
    /// Rebuild the world from `params`: grown grid, fresh populations, step
    /// zero. Used at startup and by the reset control. Does not reseed, so
    /// consecutive resets in one process explore different spawns.
    pub fn reset(&mut self, world: &mut World, params: &Params) {
        world.reset(params, &mut self.rng.stream("spawn"));
    }

    /// Execute exactly one tick against a fixed parameter snapshot: every
    /// system in order, then the step counter, then a snapshot if due. An
    /// error from any system leaves the remaining systems unrun.
    pub fn step(&mut self, world: &mut World, params: &Params) -> Result<TickReport> {
        let step = world.step();
        for system in &mut self.systems {
            let ctx = SystemContext { step, params };
            let mut rng = self.rng.stream(system.name());
            system.run(&ctx, world, &mut rng)?;
        }
        world.advance_step();
        self.snapshot_writer
            .maybe_write(world, &self.settings.scenario_name)?;
        Ok(world.report())
    }

    pub fn run(&mut self, world: &mut World, params: &Params, ticks: u64) -> Result<()> {
        for _ in 0..ticks {
            self.step(world, params)?;
        }
        Ok(())
    }

    /// Like `run`, but invokes `hook` with the report after every tick.
    /// Observers hang off this; the engine itself never blocks on them.
    pub fn run_with_hook(
        &mut self,
        world: &mut World,
        params: &Params,
        ticks: u64,
        mut hook: impl FnMut(TickReport),
    ) -> Result<()> {
        for _ in 0..ticks {
            let report = self.step(world, params)?;
            hook(report);
        }
        Ok(())
    }

    pub fn scenario_name(&self) -> &str {
        &self.settings.scenario_name
    }
}

/// Fixed-point pacing for interactive drivers. Each displayed frame deposits
/// the configured speed into an accumulator, and one whole tick runs per unit
/// banked there. Fractional credit carries to the next frame; ticks never
/// subdivide.
#[derive(Debug, Default)]
pub struct TickPacer {
    accumulator: f64,
}

impl TickPacer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account one frame at `speed` and return how many whole ticks to run
    /// now. Speeds below one trade frames per tick; speeds above one run
    /// several ticks per frame.
    pub fn advance(&mut self, speed: f64) -> u64 {
        self.accumulator += speed.max(0.0);
        let whole = self.accumulator.floor();
        self.accumulator -= whole;
        whole as u64
    }

    /// Drop any carried fraction. Called on reset so stale credit from the
    /// previous run cannot trigger an immediate tick.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
