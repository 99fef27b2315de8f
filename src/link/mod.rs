//! The import-linkage pass: the second phase of the two-phase build.
//!
//! Nodes are first registered with their structural declarations only and
//! empty linkage maps. Linking a node resolves each of its declared import
//! statements to a target node through the resolution engine and records the
//! resulting bindings. This pass is the sole writer of the three maps; until
//! it has run for a node, lookups through that node simply see fewer names.
//!
//! Unresolvable imports are skipped, never errors: a node may be linked while
//! its neighbours are still being registered, and an absolute import of a
//! foreign package has no target inside a single package graph at all.

use crate::model::node::ModuleNode;
use crate::model::{ImportTarget, Importees, NodeId, RelativePathInfo};
use crate::resolve::{ResolveError, Resolver};
use crate::store::ObjectStore;

enum BindKind {
    Module,
    Class,
    Function,
}

struct Binding {
    kind: BindKind,
    local: String,
    source: String,
    target: NodeId,
}

/// Run the linkage pass for one node of the package rooted at `root`:
/// resolve its declared imports, write the linkage maps, and mark the node
/// linked. Always sets `parsed_import`, also on a node with no imports.
pub fn link_imports(
    store: &mut ObjectStore,
    root: &NodeId,
    node: &NodeId,
) -> Result<(), ResolveError> {
    let bindings = collect_bindings(store, root, node)?;

    let data = store.get_node_mut(node)?.data_mut();
    for binding in bindings {
        let entry = (binding.source, binding.target);
        match binding.kind {
            BindKind::Module => data.imported_modules.insert(binding.local, entry),
            BindKind::Class => data.imported_classes.insert(binding.local, entry),
            BindKind::Function => data.imported_functions.insert(binding.local, entry),
        };
    }
    data.parsed_import = true;
    Ok(())
}

/// Link every node reachable from `root`, children first, then the root
/// itself, so package-level re-exports can already see their children's
/// bindings.
pub fn link_tree(store: &mut ObjectStore, root: &NodeId) -> Result<(), ResolveError> {
    link_subtree(store, root, root)
}

fn link_subtree(
    store: &mut ObjectStore,
    root: &NodeId,
    node: &NodeId,
) -> Result<(), ResolveError> {
    let children: Vec<NodeId> = store.get_node(node)?.children().to_vec();
    for child in &children {
        link_subtree(store, root, child)?;
    }
    link_imports(store, root, node)
}

fn collect_bindings(
    store: &ObjectStore,
    root: &NodeId,
    node: &NodeId,
) -> Result<Vec<Binding>, ResolveError> {
    let resolver = Resolver::new(store);
    let node = store.get_node(node)?;
    let mut bindings = Vec::new();

    for import in &node.data().imports {
        let Some(path) = absolute_source_path(node, &import.source) else {
            continue;
        };
        let Some(target) = resolver.submodule(root, &path, import.source.from_file)? else {
            continue;
        };

        match &import.importees {
            // `import a.b` / `import a.b as c`: one module binding
            None => {
                let source_name = store.get_node(&target)?.name().to_string();
                let local = import.alias.clone().unwrap_or_else(|| source_name.clone());
                bindings.push(Binding {
                    kind: BindKind::Module,
                    local,
                    source: source_name,
                    target: target.clone(),
                });
            }
            // wildcard importees are stored but never expanded into bindings
            Some(Importees::Wildcard) => {}
            Some(Importees::Names(names)) => {
                for name in names {
                    if let Some(binding) = classify(&resolver, store, &target, name)? {
                        bindings.push(binding);
                    }
                }
            }
        }
    }

    Ok(bindings)
}

/// Decide which map a `from ... import name` binding belongs in by asking the
/// target what `name` is: a visible class, a visible function, or one of its
/// submodules. Re-exports need no special case here; lookups recurse through
/// the target's own maps at query time. An unclassifiable name (the target
/// may not be linked yet) stays unbound.
fn classify(
    resolver: &Resolver,
    store: &ObjectStore,
    target: &NodeId,
    name: &ImportTarget,
) -> Result<Option<Binding>, ResolveError> {
    let source = name.source_name();
    let local = name.local_name().to_string();

    if resolver.find_class(target, source)?.is_some() {
        return Ok(Some(Binding {
            kind: BindKind::Class,
            local,
            source: source.to_string(),
            target: target.clone(),
        }));
    }
    if !resolver.find_functions(target, source)?.is_empty() {
        return Ok(Some(Binding {
            kind: BindKind::Function,
            local,
            source: source.to_string(),
            target: target.clone(),
        }));
    }

    let target_name = store.get_node(target)?.name().to_string();
    let sub_path = vec![target_name, source.to_string()];
    if let Some(submodule) = resolver.submodule(target, &sub_path, false)? {
        return Ok(Some(Binding {
            kind: BindKind::Module,
            local,
            source: source.to_string(),
            target: submodule,
        }));
    }

    Ok(None)
}

/// The package-absolute dotted path an import source denotes, or `None` when
/// it cannot denote anything inside this package (foreign absolute import,
/// or a relative import climbing past the root).
fn absolute_source_path(node: &ModuleNode, source: &RelativePathInfo) -> Option<Vec<String>> {
    if source.level == 0 {
        if source.source.is_empty() {
            return None;
        }
        return Some(source.source.clone());
    }

    let data = node.data();
    // one dot names the containing package; a package __init__ counts as its
    // own container
    let mut base = data.relative_path.clone();
    if node.is_folder() {
        base.push(data.name.clone());
    }
    for _ in 1..source.level {
        base.pop()?;
    }
    if base.is_empty() {
        return None;
    }
    base.extend(source.source.iter().cloned());
    Some(base)
}
