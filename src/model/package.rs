use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::NodeId;

/// Coarse ingestion lifecycle of a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageStatus {
    Initiating,
    Parsing,
    Ready,
}

impl PackageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageStatus::Initiating => "initiating",
            PackageStatus::Parsing => "parsing",
            PackageStatus::Ready => "ready",
        }
    }
}

impl fmt::Display for PackageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named, versioned ingestion root: a single file or a package directory.
///
/// `root` is set if and only if the status has moved past `Initiating`; the
/// transition helpers keep the two in step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub is_file: bool,
    pub status: PackageStatus,
    pub file_path: PathBuf,
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<NodeId>,
}

impl Package {
    pub fn new(
        is_file: bool,
        file_path: impl Into<PathBuf>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Package {
            is_file,
            status: PackageStatus::Initiating,
            file_path: file_path.into(),
            name: name.into(),
            version: version.into(),
            root: None,
        }
    }

    /// Enter the structural-build phase, recording the root node. The only
    /// place the root is ever set.
    pub fn begin_parsing(&mut self, root: NodeId) {
        self.root = Some(root);
        self.status = PackageStatus::Parsing;
    }

    /// Mark the import-linkage pass complete.
    pub fn mark_ready(&mut self) {
        debug_assert!(self.root.is_some(), "package marked ready without a root");
        self.status = PackageStatus::Ready;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_keeps_root_and_status_in_step() {
        let mut pkg = Package::new(false, "/repo/torchvision", "torchvision", "0.15.2");
        assert_eq!(pkg.status, PackageStatus::Initiating);
        assert!(pkg.root.is_none());

        pkg.begin_parsing(NodeId::from("n1"));
        assert_eq!(pkg.status, PackageStatus::Parsing);
        assert_eq!(pkg.root, Some(NodeId::from("n1")));

        pkg.mark_ready();
        assert_eq!(pkg.status, PackageStatus::Ready);
        assert_eq!(pkg.root, Some(NodeId::from("n1")));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let mut pkg = Package::new(true, "/repo/single.py", "single", "1.0.0");
        let value = serde_json::to_value(&pkg).unwrap();
        assert_eq!(value["status"], "initiating");
        assert!(value.get("root").is_none());

        pkg.begin_parsing(NodeId::from("n1"));
        pkg.mark_ready();
        let value = serde_json::to_value(&pkg).unwrap();
        assert_eq!(value["status"], "ready");
        assert_eq!(value["root"], "n1");
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let bad = serde_json::json!({
            "is_file": false,
            "status": "exploded",
            "file_path": "/repo/p",
            "name": "p",
            "version": "0.1.0",
        });
        let result: Result<Package, _> = serde_json::from_value(bad);
        assert!(result.is_err());
    }

    #[test]
    fn test_round_trip() {
        let mut pkg = Package::new(false, "/repo/torch", "torch", "2.0.1");
        pkg.begin_parsing(NodeId::from("root-1"));
        let json = serde_json::to_string(&pkg).unwrap();
        let back: Package = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pkg);
    }
}
