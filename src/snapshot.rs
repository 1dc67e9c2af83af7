use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::world::{World, WorldFrame};

#[derive(Serialize)]
struct SnapshotDoc<'a> {
    scenario: &'a str,
    written_at: DateTime<Utc>,
    frame: WorldFrame,
}

/// Writes the full world frame as pretty JSON every `interval_ticks` ticks,
/// under `<dir>/<scenario>/step_NNNNNN.json`. An interval of zero disables
/// the writer entirely.
pub struct SnapshotWriter {
    dir: PathBuf,
    interval_ticks: u64,
}

impl SnapshotWriter {
    pub fn new(dir: impl AsRef<Path>, interval_ticks: u64) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            interval_ticks,
        }
    }

    /// Write a snapshot if the world's step is on the interval. Returns the
    /// path written, if any. The directory is created on first write so dry
    /// runs leave no empty folders behind.
    pub fn maybe_write(&self, world: &World, scenario_name: &str) -> Result<Option<PathBuf>> {
        if self.interval_ticks == 0 || world.step() % self.interval_ticks != 0 {
            return Ok(None);
        }

        let dir = self.dir.join(scenario_name);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create snapshot directory {}", dir.display()))?;
        let path = dir.join(format!("step_{:06}.json", world.step()));
        let doc = SnapshotDoc {
            scenario: scenario_name,
            written_at: Utc::now(),
            frame: world.frame(),
        };
        let json = serde_json::to_string_pretty(&doc).context("Failed to serialize snapshot")?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write snapshot {}", path.display()))?;
        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Agent;

    fn world_at_step(step: u64) -> World {
        let mut world = World::new(4, 3);
        world.add_herbivore(Agent::spawn(1, 2, 5.0));
        for _ in 0..step {
            world.advance_step();
        }
        world
    }

    #[test]
    fn zero_interval_never_writes() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SnapshotWriter::new(dir.path(), 0);
        let world = world_at_step(10);
        assert!(writer.maybe_write(&world, "quiet").unwrap().is_none());
        assert!(!dir.path().join("quiet").exists());
    }

    #[test]
    fn writes_only_on_the_interval() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SnapshotWriter::new(dir.path(), 3);
        assert!(writer
            .maybe_write(&world_at_step(2), "savanna")
            .unwrap()
            .is_none());
        let path = writer
            .maybe_write(&world_at_step(3), "savanna")
            .unwrap()
            .expect("step 3 is on the interval");
        assert_eq!(path, dir.path().join("savanna").join("step_000003.json"));
    }

    #[test]
    fn snapshot_document_carries_the_frame() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SnapshotWriter::new(dir.path(), 1);
        let path = writer
            .maybe_write(&world_at_step(1), "savanna")
            .unwrap()
            .expect("every step is on interval 1");
        let text = fs::read_to_string(path).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(doc["scenario"], "savanna");
        assert_eq!(doc["frame"]["step"], 1);
        assert_eq!(doc["frame"]["width"], 4);
        assert_eq!(doc["frame"]["grass"].as_array().unwrap().len(), 12);
        assert_eq!(doc["frame"]["herbivores"][0]["x"], 1);
        assert!(doc["written_at"].is_string());
    }
}
