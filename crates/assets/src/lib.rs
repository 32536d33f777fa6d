//! Resource registry: maps resource ids to their descriptors.
//!
//! The simulation core refers to resources by id only. Drops look up the
//! descriptor they carry here, and placement reads `places_material` from it.
//!
//! # Layout
//! The registry can be written to and read from a JSON file for inspection
//! or modding; the built-in catalogue is used when no file is supplied.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tileworld_common::{MaterialClass, ResourceDescriptor, ResourceId};

/// Errors from registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("resource not found: {0:?}")]
    NotFound(ResourceId),
    #[error("duplicate resource id {0:?} in registry file")]
    Duplicate(ResourceId),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Ids of the built-in resources.
pub mod ids {
    use tileworld_common::ResourceId;

    pub const DIRT: ResourceId = ResourceId(1);
    pub const LOG: ResourceId = ResourceId(2);
    pub const ROCK_SHARDS: ResourceId = ResourceId(3);
    pub const WOOD_PLANK: ResourceId = ResourceId(4);
}

/// Id-keyed store of resource descriptors.
///
/// Uses BTreeMap so listing and serialization order is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceRegistry {
    resources: BTreeMap<ResourceId, ResourceDescriptor>,
}

/// On-disk form: a flat list is friendlier to hand-edit than a map keyed by id.
#[derive(Serialize, Deserialize)]
struct RegistryFile {
    resources: Vec<ResourceDescriptor>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock catalogue: dirt, log, rock shards and wood planks.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(ResourceDescriptor {
            placeable: true,
            places_material: Some(1),
            ..ResourceDescriptor::basic(ids::DIRT, "Dirt")
        });
        registry.register(ResourceDescriptor::basic(ids::LOG, "Log"));
        registry.register(ResourceDescriptor {
            placeable: true,
            places_material: Some(3),
            ..ResourceDescriptor::basic(ids::ROCK_SHARDS, "Rock Shards")
        });
        registry.register(ResourceDescriptor {
            attack: 2,
            effective_against: MaterialClass::Living,
            placeable: true,
            places_material: Some(5),
            ..ResourceDescriptor::basic(ids::WOOD_PLANK, "Wood Plank")
        });
        registry
    }

    /// Insert or replace a descriptor. Returns the previous one for that id.
    pub fn register(&mut self, descriptor: ResourceDescriptor) -> Option<ResourceDescriptor> {
        self.resources.insert(descriptor.id, descriptor)
    }

    pub fn get(&self, id: ResourceId) -> Option<&ResourceDescriptor> {
        self.resources.get(&id)
    }

    /// Like [`get`](Self::get) but reports a missing id as an error.
    pub fn require(&self, id: ResourceId) -> Result<&ResourceDescriptor, RegistryError> {
        self.get(id).ok_or(RegistryError::NotFound(id))
    }

    /// Descriptor for `id`, or a plain placeholder when the id is unknown.
    pub fn resolve(&self, id: ResourceId) -> ResourceDescriptor {
        match self.get(id) {
            Some(d) => d.clone(),
            None => {
                tracing::warn!(?id, "resource not registered, using placeholder");
                ResourceDescriptor::basic(id, format!("unknown #{}", id.0))
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceDescriptor> {
        self.resources.values()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Parse a registry from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, RegistryError> {
        let file: RegistryFile = serde_json::from_str(text)?;
        Self::from_file(file)
    }

    /// Save the registry to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RegistryError> {
        let file = std::fs::File::create(path)?;
        let contents = RegistryFile {
            resources: self.resources.values().cloned().collect(),
        };
        serde_json::to_writer_pretty(file, &contents)?;
        Ok(())
    }

    /// Load a registry from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let file = std::fs::File::open(path)?;
        let contents: RegistryFile = serde_json::from_reader(file)?;
        Self::from_file(contents)
    }

    fn from_file(file: RegistryFile) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for descriptor in file.resources {
            let id = descriptor.id;
            if registry.register(descriptor).is_some() {
                return Err(RegistryError::Duplicate(id));
            }
        }
        tracing::debug!(count = registry.len(), "resource registry loaded");
        Ok(registry)
    }
}
