use crate::{error::PhysicsError, hash_set::POOLED_BUFFER_SIZE};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub elasticity: f32,
    pub friction: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Number of hash set bins allocated each time the bin pool runs dry.
    pub pool_batch_size: usize,
    /// Number of steps a cached pair survives without being seen by the broadphase.
    pub collision_persistence: u64,
    pub default_material: Material,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            pool_batch_size: POOLED_BUFFER_SIZE,
            collision_persistence: 3,
            default_material: Material::default(),
        }
    }
}

impl PhysicsConfig {
    pub fn from_json_str(json: &str) -> Result<Self, PhysicsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, PhysicsError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let config = serde_json::from_reader(reader)?;

        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PhysicsError> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);

        serde_json::to_writer_pretty(writer, self)?;

        Ok(())
    }
}
