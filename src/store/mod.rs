use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use thiserror::Error;

use crate::model::node::ModuleNode;
use crate::model::package::Package;
use crate::model::{NodeId, PackageId};

/// Typed lookup and record-decoding failures. Missing keys are loud: once a
/// node's linkage pass has run, every identifier it recorded must resolve.
#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("node '{0}' is not in the store")]
    NodeNotFound(NodeId),

    #[error("package '{0}' is not in the store")]
    PackageNotFound(PackageId),

    #[error("node record declares unknown kind '{kind}'")]
    UnknownRecordKind { kind: String },

    #[error("node record carries no kind discriminator")]
    MissingRecordKind,
}

/// Keyed registry owning every node and package in a loaded graph. All other
/// cross-references in the model are bare identifiers resolved through here.
///
/// Mutation is in-memory only; persistence is the explicit `load`/`save`
/// pair, never a side effect.
#[derive(Debug, Default)]
pub struct ObjectStore {
    nodes: BTreeMap<NodeId, ModuleNode>,
    packages: BTreeMap<PackageId, Package>,
}

impl ObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_node(&self, id: &NodeId) -> Result<&ModuleNode, StoreError> {
        self.nodes
            .get(id)
            .ok_or_else(|| StoreError::NodeNotFound(id.clone()))
    }

    pub fn get_node_mut(&mut self, id: &NodeId) -> Result<&mut ModuleNode, StoreError> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| StoreError::NodeNotFound(id.clone()))
    }

    /// Insert or replace, returning the key.
    pub fn set_node(&mut self, id: NodeId, node: ModuleNode) -> NodeId {
        self.nodes.insert(id.clone(), node);
        id
    }

    pub fn get_package(&self, id: &PackageId) -> Result<&Package, StoreError> {
        self.packages
            .get(id)
            .ok_or_else(|| StoreError::PackageNotFound(id.clone()))
    }

    pub fn get_package_mut(&mut self, id: &PackageId) -> Result<&mut Package, StoreError> {
        self.packages
            .get_mut(id)
            .ok_or_else(|| StoreError::PackageNotFound(id.clone()))
    }

    pub fn set_package(&mut self, id: PackageId, package: Package) -> PackageId {
        self.packages.insert(id.clone(), package);
        id
    }

    /// First package matching name and version. Linear scan; packages are few
    /// relative to nodes.
    pub fn find_package(&self, name: &str, version: &str) -> Option<PackageId> {
        self.packages
            .iter()
            .find(|(_, p)| p.name == name && p.version == version)
            .map(|(id, _)| id.clone())
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.packages.clear();
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (&NodeId, &ModuleNode)> {
        self.nodes.iter()
    }

    pub fn packages(&self) -> impl Iterator<Item = (&PackageId, &Package)> {
        self.packages.iter()
    }

    /// Replace both registries from the persisted layout under `dir`
    /// (`nodes/` and `packages/`, one JSON record per key, filename = key).
    ///
    /// All-or-nothing: both directories are read completely into fresh maps
    /// before the in-memory registries are touched, so a failed load leaves
    /// the prior state intact.
    pub fn load(&mut self, dir: &Path) -> Result<()> {
        let nodes = load_node_records(&dir.join("nodes"))?;
        let packages = load_package_records(&dir.join("packages"))?;
        self.nodes = nodes;
        self.packages = packages;
        Ok(())
    }

    /// Write every current entry under `dir`, creating `nodes/` and
    /// `packages/` if absent. No dirty tracking; a save rewrites every key.
    pub fn save(&self, dir: &Path) -> Result<()> {
        let nodes_dir = dir.join("nodes");
        fs::create_dir_all(&nodes_dir)
            .with_context(|| format!("failed to create {}", nodes_dir.display()))?;
        for (id, node) in &self.nodes {
            let record = serde_json::to_string(node)
                .with_context(|| format!("failed to serialize node '{}'", id))?;
            let path = nodes_dir.join(id.as_str());
            fs::write(&path, record)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }

        let packages_dir = dir.join("packages");
        fs::create_dir_all(&packages_dir)
            .with_context(|| format!("failed to create {}", packages_dir.display()))?;
        for (id, package) in &self.packages {
            let record = serde_json::to_string(package)
                .with_context(|| format!("failed to serialize package '{}'", id))?;
            let path = packages_dir.join(id.as_str());
            fs::write(&path, record)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }

        Ok(())
    }
}

/// Decode a node record, dispatching on its `kind` discriminator. Unknown
/// kinds fail loudly; the deserializer never guesses a variant.
pub fn node_from_value(value: serde_json::Value) -> Result<ModuleNode> {
    let kind = value
        .get("kind")
        .and_then(|k| k.as_str())
        .ok_or(StoreError::MissingRecordKind)?;
    match kind {
        "file" | "folder" => {
            serde_json::from_value(value).context("failed to decode node record")
        }
        other => Err(StoreError::UnknownRecordKind {
            kind: other.to_string(),
        }
        .into()),
    }
}

fn load_node_records(dir: &Path) -> Result<BTreeMap<NodeId, ModuleNode>> {
    let mut nodes = BTreeMap::new();
    if !dir.is_dir() {
        return Ok(nodes);
    }
    for entry in fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let value = serde_json::from_str(&content)
            .with_context(|| format!("invalid JSON in {}", path.display()))?;
        let node = node_from_value(value)
            .with_context(|| format!("bad node record {}", path.display()))?;
        let id = NodeId::new(entry.file_name().to_string_lossy().into_owned());
        nodes.insert(id, node);
    }
    Ok(nodes)
}

fn load_package_records(dir: &Path) -> Result<BTreeMap<PackageId, Package>> {
    let mut packages = BTreeMap::new();
    if !dir.is_dir() {
        return Ok(packages);
    }
    for entry in fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let package: Package = serde_json::from_str(&content)
            .with_context(|| format!("bad package record {}", path.display()))?;
        let id = PackageId::new(entry.file_name().to_string_lossy().into_owned());
        packages.insert(id, package);
    }
    Ok(packages)
}
