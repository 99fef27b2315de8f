use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{ClassInfo, FuncInfo, ImportInfo, NodeId};

/// Linkage mapping populated by the import pass: locally visible name to
/// (name on the source side, target node).
pub type LinkMap = BTreeMap<String, (String, NodeId)>;

/// Attributes shared by both node variants.
///
/// The three linkage maps start empty and `parsed_import` false; the import
/// linker is their sole writer. Until it has run, lookups that traverse them
/// simply find fewer matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleData {
    pub id: NodeId,
    /// Filesystem path seen at parse time. Identity lives in `id`, not here.
    pub path: PathBuf,
    /// Basename without extension.
    pub name: String,
    /// Segments from the package root to this node's parent, root name first.
    /// Empty for the root node itself.
    pub relative_path: Vec<String>,
    #[serde(default)]
    pub classes: Vec<ClassInfo>,
    #[serde(default)]
    pub functions: Vec<FuncInfo>,
    #[serde(default)]
    pub imports: Vec<ImportInfo>,
    /// Declared `__all__`, when present. Stored for consumers; resolution
    /// does not filter by it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_list: Option<Vec<String>>,
    #[serde(default)]
    pub imported_modules: LinkMap,
    #[serde(default)]
    pub imported_classes: LinkMap,
    #[serde(default)]
    pub imported_functions: LinkMap,
    #[serde(default)]
    pub parsed_import: bool,
}

impl ModuleData {
    fn new(id: NodeId, path: PathBuf, relative_path: Vec<String>) -> Self {
        let name = module_name(&path);
        ModuleData {
            id,
            path,
            name,
            relative_path,
            classes: Vec::new(),
            functions: Vec::new(),
            imports: Vec::new(),
            export_list: None,
            imported_modules: LinkMap::new(),
            imported_classes: LinkMap::new(),
            imported_functions: LinkMap::new(),
            parsed_import: false,
        }
    }

    /// The class declared directly on this node with the given name, if any.
    pub fn class_named(&self, name: &str) -> Option<&ClassInfo> {
        self.classes.iter().find(|c| c.name == name)
    }

    /// All functions declared directly on this node with the given name.
    pub fn functions_named(&self, name: &str) -> Vec<&FuncInfo> {
        self.functions.iter().filter(|f| f.name == name).collect()
    }
}

/// A leaf module: one Python source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileNode {
    #[serde(flatten)]
    pub data: ModuleData,
}

/// A package directory. Children are held by identifier, in order; the node's
/// own declarations represent symbols re-exported at `__init__` level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderNode {
    #[serde(flatten)]
    pub data: ModuleData,
    pub children: Vec<NodeId>,
}

/// A unit of the module graph. Closed set of two variants; records carry a
/// `kind` discriminator (`"file"` / `"folder"`) so they can be told apart on
/// reload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ModuleNode {
    File(FileNode),
    Folder(FolderNode),
}

impl ModuleNode {
    pub fn new_file(id: NodeId, path: impl Into<PathBuf>, relative_path: Vec<String>) -> Self {
        ModuleNode::File(FileNode {
            data: ModuleData::new(id, path.into(), relative_path),
        })
    }

    pub fn new_folder(id: NodeId, path: impl Into<PathBuf>, relative_path: Vec<String>) -> Self {
        ModuleNode::Folder(FolderNode {
            data: ModuleData::new(id, path.into(), relative_path),
            children: Vec::new(),
        })
    }

    pub fn data(&self) -> &ModuleData {
        match self {
            ModuleNode::File(file) => &file.data,
            ModuleNode::Folder(folder) => &folder.data,
        }
    }

    pub fn data_mut(&mut self) -> &mut ModuleData {
        match self {
            ModuleNode::File(file) => &mut file.data,
            ModuleNode::Folder(folder) => &mut folder.data,
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.data().id
    }

    pub fn name(&self) -> &str {
        &self.data().name
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, ModuleNode::Folder(_))
    }

    /// Direct children, in order. Empty for file nodes.
    pub fn children(&self) -> &[NodeId] {
        match self {
            ModuleNode::File(_) => &[],
            ModuleNode::Folder(folder) => &folder.children,
        }
    }

    /// Append a child to a folder node. No-op on a file node.
    pub fn add_child(&mut self, child: NodeId) {
        if let ModuleNode::Folder(folder) = self {
            folder.children.push(child);
        }
    }
}

/// Basename without extension: `pkg/sub/util.py` -> `util`, `pkg/sub` -> `sub`.
pub fn module_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
