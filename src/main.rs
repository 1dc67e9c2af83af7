use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use savanna::{
    engine::{EngineBuilder, EngineSettings},
    scenario::ScenarioLoader,
    systems::{CarnivoreSystem, GrassSystem, HerbivoreSystem},
    web::{self, WebServerConfig},
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Grassland predator-prey simulator")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/serengeti.yaml")]
    scenario: PathBuf,

    /// Override tick count for headless runs (uses scenario default when omitted)
    #[arg(long)]
    ticks: Option<u64>,

    /// Override the scenario random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override snapshot interval in ticks (0 disables snapshots)
    #[arg(long)]
    snapshot_interval: Option<u64>,

    /// Directory for snapshots
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,

    /// Serve the browser UI instead of running headless
    #[arg(long)]
    serve: bool,

    /// Host to bind the UI server to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port for the UI server
    #[arg(long, default_value_t = 8000)]
    port: u16,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");
    let scenario = loader.load(&cli.scenario)?;
    let seed = cli.seed.unwrap_or(scenario.seed);
    let snapshot_interval = cli
        .snapshot_interval
        .unwrap_or(scenario.snapshot_interval_ticks);
    let snapshot_dir = cli
        .snapshot_dir
        .unwrap_or_else(|| PathBuf::from("snapshots"));

    if cli.serve {
        let config = WebServerConfig {
            scenario,
            seed,
            snapshot_interval,
            snapshot_dir,
            host: cli.host,
            port: cli.port,
        };
        return tokio::runtime::Runtime::new()?.block_on(web::run(config));
    }

    let ticks = scenario.ticks(cli.ticks);
    let mut world = scenario.build_world();
    let settings = EngineSettings {
        scenario_name: scenario.name.clone(),
        seed,
        snapshot_interval_ticks: snapshot_interval,
        snapshot_dir,
    };

    let mut engine = EngineBuilder::new(settings)
        .with_system(GrassSystem::new())
        .with_system(HerbivoreSystem::new())
        .with_system(CarnivoreSystem::new())
        .build();

    engine.reset(&mut world, &scenario.params);
    engine.run(&mut world, &scenario.params, ticks)?;

    let report = world.report();
    println!(
        "Scenario '{}' completed after {} ticks: {} grass, {} herbivores, {} carnivores",
        scenario.name, report.step, report.grass, report.herbivores, report.carnivores
    );
    Ok(())
}
