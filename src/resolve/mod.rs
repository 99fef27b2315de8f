use thiserror::Error;

use crate::model::node::ModuleNode;
use crate::model::{ClassInfo, FuncInfo, NodeId, PackageId};
use crate::store::{ObjectStore, StoreError};

/// Failures of a resolution walk. "Nothing matched" is not among them: the
/// lookups report that through `Option`/empty `Vec` and callers treat it as a
/// normal branch.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A chain of import aliases closed on itself.
    #[error("import alias cycle while resolving '{name}' through node '{node}'")]
    ImportCycle { node: NodeId, name: String },

    /// Base-class declarations form a cycle.
    #[error("inheritance cycle through class '{class}' in node '{node}'")]
    InheritanceCycle { node: NodeId, class: String },
}

/// Read-only resolution engine over an [`ObjectStore`].
///
/// Every operation tolerates a partially linked graph (it just finds fewer
/// matches); dangling identifiers recorded by a completed linkage pass
/// surface as [`StoreError::NodeNotFound`].
pub struct Resolver<'a> {
    store: &'a ObjectStore,
}

impl<'a> Resolver<'a> {
    pub fn new(store: &'a ObjectStore) -> Self {
        Resolver { store }
    }

    /// Resolve a dotted path to the node it denotes, starting at `node`.
    ///
    /// The first segment must name the receiver. Longer paths descend through
    /// the receiver's module aliases first (an alias can splice another
    /// subtree into the apparent path), then through its literal children.
    /// `from_file` suppresses the alias step, the way a file-relative import
    /// never consults sibling bindings.
    pub fn submodule(
        &self,
        node: &NodeId,
        path: &[String],
        from_file: bool,
    ) -> Result<Option<NodeId>, ResolveError> {
        let node = self.store.get_node(node)?;
        let data = node.data();
        let Some((first, rest)) = path.split_first() else {
            return Ok(None);
        };
        if first != &data.name {
            return Ok(None);
        }
        let Some(next) = rest.first() else {
            // the path named exactly this node
            return Ok(Some(data.id.clone()));
        };

        if !from_file {
            if let Some((source_name, target)) = data.imported_modules.get(next) {
                // continue under the name the target knows itself by
                let mut spliced = Vec::with_capacity(rest.len());
                spliced.push(source_name.clone());
                spliced.extend(rest[1..].iter().cloned());
                if let Some(found) = self.submodule(target, &spliced, from_file)? {
                    return Ok(Some(found));
                }
            }
        }

        if let ModuleNode::Folder(folder) = node {
            for child_id in &folder.children {
                if self.store.get_node(child_id)?.name() == next.as_str() {
                    return self.submodule(child_id, rest, from_file);
                }
            }
        }

        Ok(None)
    }

    /// Resolve a dotted path against a package's root node. No result while
    /// the package has no root yet.
    pub fn package_submodule(
        &self,
        package: &PackageId,
        path: &[String],
        from_file: bool,
    ) -> Result<Option<NodeId>, ResolveError> {
        match &self.store.get_package(package)?.root {
            Some(root) => self.submodule(root, path, from_file),
            None => Ok(None),
        }
    }

    /// The class visible from `node` under `name`. Local declarations shadow
    /// imports; imported names are followed to their defining module under
    /// the source-side name recorded by the linker.
    pub fn find_class(&self, node: &NodeId, name: &str) -> Result<Option<ClassInfo>, ResolveError> {
        self.class_walk(node, name, &mut Vec::new())
    }

    fn class_walk(
        &self,
        node: &NodeId,
        name: &str,
        walk: &mut Vec<(NodeId, String)>,
    ) -> Result<Option<ClassInfo>, ResolveError> {
        let key = (node.clone(), name.to_string());
        if walk.contains(&key) {
            return Err(ResolveError::ImportCycle {
                node: node.clone(),
                name: name.to_string(),
            });
        }
        let data = self.store.get_node(node)?.data();
        if let Some(class) = data.class_named(name) {
            return Ok(Some(class.clone()));
        }
        let Some((source_name, target)) = data.imported_classes.get(name) else {
            return Ok(None);
        };
        walk.push(key);
        let found = self.class_walk(target, source_name, walk)?;
        walk.pop();
        Ok(found)
    }

    /// All functions visible from `node` under `name`: every local
    /// declaration with that name, or, only when none exists, the imported
    /// ones resolved the same way as classes.
    pub fn find_functions(
        &self,
        node: &NodeId,
        name: &str,
    ) -> Result<Vec<FuncInfo>, ResolveError> {
        self.function_walk(node, name, &mut Vec::new())
    }

    fn function_walk(
        &self,
        node: &NodeId,
        name: &str,
        walk: &mut Vec<(NodeId, String)>,
    ) -> Result<Vec<FuncInfo>, ResolveError> {
        let key = (node.clone(), name.to_string());
        if walk.contains(&key) {
            return Err(ResolveError::ImportCycle {
                node: node.clone(),
                name: name.to_string(),
            });
        }
        let data = self.store.get_node(node)?.data();
        let local: Vec<FuncInfo> = data
            .functions
            .iter()
            .filter(|f| f.name == name)
            .cloned()
            .collect();
        if !local.is_empty() {
            return Ok(local);
        }
        let Some((source_name, target)) = data.imported_functions.get(name) else {
            return Ok(Vec::new());
        };
        walk.push(key);
        let found = self.function_walk(target, source_name, walk)?;
        walk.pop();
        Ok(found)
    }

    /// The full visible class table of `node`: every local declaration plus
    /// every imported binding not shadowed by a local one of the same name.
    pub fn visible_classes(&self, node: &NodeId) -> Result<Vec<ClassInfo>, ResolveError> {
        let data = self.store.get_node(node)?.data();
        let mut classes = data.classes.clone();
        for (local_name, (source_name, target)) in &data.imported_classes {
            if data.class_named(local_name).is_some() {
                continue;
            }
            if let Some(class) = self.find_class(target, source_name)? {
                classes.push(class);
            }
        }
        Ok(classes)
    }

    /// The full visible function table of `node`, shadowing rules as for
    /// classes.
    pub fn visible_functions(&self, node: &NodeId) -> Result<Vec<FuncInfo>, ResolveError> {
        let data = self.store.get_node(node)?.data();
        let mut functions = data.functions.clone();
        for (local_name, (source_name, target)) in &data.imported_functions {
            if !data.functions_named(local_name).is_empty() {
                continue;
            }
            functions.extend(self.find_functions(target, source_name)?);
        }
        Ok(functions)
    }

    /// Inheritance-aware method lookup: find `method` on the class visible
    /// from `node` as `class_name`, walking declared bases across module
    /// boundaries when the class itself has no match.
    ///
    /// `None` means the class could not be found at all. A found class with
    /// no match anywhere yields `Some` of an empty list. A matching method
    /// declared on the class fully shadows base implementations; otherwise
    /// bases contribute in declaration order, and sibling bases reaching the
    /// same ancestor each contribute (no diamond deduplication). Only a base
    /// chain that closes on itself is an error.
    pub fn find_method(
        &self,
        node: &NodeId,
        class_name: &str,
        method: &str,
    ) -> Result<Option<Vec<FuncInfo>>, ResolveError> {
        self.method_walk(node, class_name, method, &mut Vec::new())
    }

    fn method_walk(
        &self,
        node: &NodeId,
        class_name: &str,
        method: &str,
        walk: &mut Vec<(NodeId, String)>,
    ) -> Result<Option<Vec<FuncInfo>>, ResolveError> {
        let key = (node.clone(), class_name.to_string());
        if walk.contains(&key) {
            return Err(ResolveError::InheritanceCycle {
                node: node.clone(),
                class: class_name.to_string(),
            });
        }
        let Some(class) = self.find_class(node, class_name)? else {
            return Ok(None);
        };

        let own: Vec<FuncInfo> = class.functions_named(method).into_iter().cloned().collect();
        if !own.is_empty() {
            return Ok(Some(own));
        }
        let Some(bases) = &class.bases else {
            return Ok(Some(Vec::new()));
        };

        // bases resolve in the scope of the module that declared the class,
        // which need not be the node the lookup started from
        let owner = &class.module_id;
        walk.push(key);
        let mut matches = Vec::new();
        for base in bases {
            match base.rsplit_once('.') {
                None => {
                    if let Some(found) = self.method_walk(owner, base, method, walk)? {
                        matches.extend(found);
                    }
                }
                Some((prefix, base_class)) => {
                    let owner_name = self.store.get_node(owner)?.name().to_string();
                    let mut module_path = vec![owner_name];
                    module_path.extend(prefix.split('.').map(str::to_string));
                    if let Some(target) = self.submodule(owner, &module_path, false)? {
                        if let Some(found) =
                            self.method_walk(&target, base_class, method, walk)?
                        {
                            matches.extend(found);
                        }
                    }
                }
            }
        }
        walk.pop();
        Ok(Some(matches))
    }

    /// Indented textual dump of a node's subtree, for diagnostics.
    pub fn dump_tree(&self, node: &NodeId) -> Result<String, ResolveError> {
        let mut out = String::new();
        self.dump_into(node, "", &mut out)?;
        Ok(out)
    }

    fn dump_into(
        &self,
        node: &NodeId,
        indent: &str,
        out: &mut String,
    ) -> Result<(), ResolveError> {
        let node = self.store.get_node(node)?;
        let data = node.data();
        let label = if node.is_folder() { "package" } else { "module" };
        out.push_str(&format!(
            "{}{} {} ({})\n",
            indent,
            label,
            data.name,
            data.path.display()
        ));

        let inner = format!("{}  ", indent);
        for class in &data.classes {
            out.push_str(&format!("{}{}\n", inner, class));
            for method in &class.functions {
                out.push_str(&format!("{}  def {}\n", inner, method));
            }
        }
        for function in &data.functions {
            out.push_str(&format!("{}def {}\n", inner, function));
        }
        for child in node.children() {
            self.dump_into(child, &inner, out)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::node::ModuleNode;
    use crate::model::package::Package;

    fn file(store: &mut ObjectStore, id: &str, path: &str, relative: &[&str]) -> NodeId {
        let node_id = NodeId::from(id);
        let node = ModuleNode::new_file(
            node_id.clone(),
            path,
            relative.iter().map(|s| s.to_string()).collect(),
        );
        store.set_node(node_id.clone(), node);
        node_id
    }

    fn folder(store: &mut ObjectStore, id: &str, path: &str, relative: &[&str]) -> NodeId {
        let node_id = NodeId::from(id);
        let node = ModuleNode::new_folder(
            node_id.clone(),
            path,
            relative.iter().map(|s| s.to_string()).collect(),
        );
        store.set_node(node_id.clone(), node);
        node_id
    }

    fn attach(store: &mut ObjectStore, parent: &NodeId, child: &NodeId) {
        store.get_node_mut(parent).unwrap().add_child(child.clone());
    }

    fn class_with_method(module: &NodeId, class: &str, method: &str) -> ClassInfo {
        let mut info = ClassInfo::new(class, module.clone(), None);
        info.add_function(FuncInfo::new(method));
        info
    }

    fn segments(path: &[&str]) -> Vec<String> {
        path.iter().map(|s| s.to_string()).collect()
    }

    /// pkg/ with children a.py and b.py.
    fn small_tree() -> (ObjectStore, NodeId, NodeId, NodeId) {
        let mut store = ObjectStore::new();
        let root = folder(&mut store, "n-pkg", "/repo/pkg", &[]);
        let a = file(&mut store, "n-a", "/repo/pkg/a.py", &["pkg"]);
        let b = file(&mut store, "n-b", "/repo/pkg/b.py", &["pkg"]);
        attach(&mut store, &root, &a);
        attach(&mut store, &root, &b);
        (store, root, a, b)
    }

    #[test]
    fn test_submodule_resolves_own_path_for_every_node() {
        let (store, root, a, b) = small_tree();
        let resolver = Resolver::new(&store);

        for id in [&root, &a, &b] {
            let data = store.get_node(id).unwrap().data().clone();
            let mut path = data.relative_path.clone();
            path.push(data.name.clone());
            for from_file in [false, true] {
                assert_eq!(
                    resolver.submodule(&root, &path, from_file).unwrap(),
                    Some(id.clone()),
                    "path {:?} from_file {}",
                    path,
                    from_file
                );
            }
        }
    }

    #[test]
    fn test_submodule_picks_the_named_child() {
        let (store, root, _, b) = small_tree();
        let resolver = Resolver::new(&store);
        assert_eq!(
            resolver
                .submodule(&root, &segments(&["pkg", "b"]), false)
                .unwrap(),
            Some(b)
        );
    }

    #[test]
    fn test_submodule_rejects_foreign_prefix_and_empty_path() {
        let (store, root, _, _) = small_tree();
        let resolver = Resolver::new(&store);
        assert_eq!(
            resolver
                .submodule(&root, &segments(&["other", "b"]), false)
                .unwrap(),
            None
        );
        assert_eq!(resolver.submodule(&root, &[], false).unwrap(), None);
        assert_eq!(
            resolver
                .submodule(&root, &segments(&["pkg", "ghost"]), false)
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_submodule_alias_splices_other_subtree() {
        // pkg imports sibling subtree "vendor.impl" as "compat":
        // pkg.compat.impl resolves into the vendor tree.
        let mut store = ObjectStore::new();
        let root = folder(&mut store, "n-pkg", "/repo/pkg", &[]);
        let vendor = folder(&mut store, "n-vendor", "/repo/vendor", &[]);
        let impl_file = file(&mut store, "n-impl", "/repo/vendor/impl.py", &["vendor"]);
        attach(&mut store, &vendor, &impl_file);
        store
            .get_node_mut(&root)
            .unwrap()
            .data_mut()
            .imported_modules
            .insert("compat".to_string(), ("vendor".to_string(), vendor.clone()));

        let resolver = Resolver::new(&store);
        assert_eq!(
            resolver
                .submodule(&root, &segments(&["pkg", "compat", "impl"]), false)
                .unwrap(),
            Some(impl_file)
        );
        // a file-relative walk never descends through the alias
        assert_eq!(
            resolver
                .submodule(&root, &segments(&["pkg", "compat", "impl"]), true)
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_submodule_alias_shadows_child_of_same_name() {
        // the alias is consulted before the literal child
        let mut store = ObjectStore::new();
        let root = folder(&mut store, "n-pkg", "/repo/pkg", &[]);
        let local = file(&mut store, "n-local", "/repo/pkg/util.py", &["pkg"]);
        let other = file(&mut store, "n-other", "/repo/ext/util.py", &["ext"]);
        attach(&mut store, &root, &local);
        store
            .get_node_mut(&root)
            .unwrap()
            .data_mut()
            .imported_modules
            .insert("util".to_string(), ("util".to_string(), other.clone()));

        let resolver = Resolver::new(&store);
        assert_eq!(
            resolver
                .submodule(&root, &segments(&["pkg", "util"]), false)
                .unwrap(),
            Some(other)
        );
        assert_eq!(
            resolver
                .submodule(&root, &segments(&["pkg", "util"]), true)
                .unwrap(),
            Some(local)
        );
    }

    #[test]
    fn test_package_submodule_without_root_is_no_result() {
        let mut store = ObjectStore::new();
        let pkg_id = store.set_package(
            PackageId::from("p1"),
            Package::new(false, "/repo/pkg", "pkg", "0.1.0"),
        );
        let resolver = Resolver::new(&store);
        assert_eq!(
            resolver
                .package_submodule(&pkg_id, &segments(&["pkg"]), false)
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_local_class_shadows_import() {
        let (mut store, _, a, b) = small_tree();
        store
            .get_node_mut(&a)
            .unwrap()
            .data_mut()
            .classes
            .push(class_with_method(&a, "Foo", "local_method"));
        {
            let data = store.get_node_mut(&b).unwrap().data_mut();
            data.classes
                .push(class_with_method(&b, "Foo", "own_method"));
            data.imported_classes
                .insert("Foo".to_string(), ("Foo".to_string(), a.clone()));
        }

        let resolver = Resolver::new(&store);
        let found = resolver.find_class(&b, "Foo").unwrap().unwrap();
        assert_eq!(found.module_id, b);
        assert_eq!(found.functions[0].name, "own_method");
    }

    #[test]
    fn test_imported_class_followed_under_source_name() {
        let (mut store, _, a, b) = small_tree();
        store
            .get_node_mut(&a)
            .unwrap()
            .data_mut()
            .classes
            .push(class_with_method(&a, "Foo", "bar"));
        store
            .get_node_mut(&b)
            .unwrap()
            .data_mut()
            .imported_classes
            .insert("Base".to_string(), ("Foo".to_string(), a.clone()));

        let resolver = Resolver::new(&store);
        let found = resolver.find_class(&b, "Base").unwrap().unwrap();
        assert_eq!(found.name, "Foo");
        assert_eq!(found.module_id, a);
        assert_eq!(resolver.find_class(&b, "Foo").unwrap(), None);
    }

    #[test]
    fn test_import_alias_cycle_is_an_error() {
        let (mut store, _, a, b) = small_tree();
        store
            .get_node_mut(&a)
            .unwrap()
            .data_mut()
            .imported_classes
            .insert("X".to_string(), ("Y".to_string(), b.clone()));
        store
            .get_node_mut(&b)
            .unwrap()
            .data_mut()
            .imported_classes
            .insert("Y".to_string(), ("X".to_string(), a.clone()));

        let resolver = Resolver::new(&store);
        let err = resolver.find_class(&a, "X").unwrap_err();
        assert!(matches!(err, ResolveError::ImportCycle { .. }));
    }

    #[test]
    fn test_find_functions_prefers_local_overloads() {
        let (mut store, _, a, b) = small_tree();
        {
            let data = store.get_node_mut(&a).unwrap().data_mut();
            data.functions.push(FuncInfo::new("helper"));
        }
        {
            let data = store.get_node_mut(&b).unwrap().data_mut();
            data.functions.push(FuncInfo::new("helper"));
            data.functions.push(FuncInfo::new("helper"));
            data.imported_functions
                .insert("helper".to_string(), ("helper".to_string(), a.clone()));
        }

        let resolver = Resolver::new(&store);
        // both local overloads, the import never consulted
        assert_eq!(resolver.find_functions(&b, "helper").unwrap().len(), 2);

        // without local declarations the import is followed
        {
            let data = store.get_node_mut(&b).unwrap().data_mut();
            data.functions.clear();
        }
        let resolver = Resolver::new(&store);
        assert_eq!(resolver.find_functions(&b, "helper").unwrap().len(), 1);
        assert!(resolver.find_functions(&b, "missing").unwrap().is_empty());
    }

    #[test]
    fn test_visible_symbols_merge_and_shadow() {
        let (mut store, _, a, b) = small_tree();
        {
            let data = store.get_node_mut(&a).unwrap().data_mut();
            data.classes.push(class_with_method(&a, "Shared", "from_a"));
            data.classes.push(class_with_method(&a, "OnlyA", "m"));
            data.functions.push(FuncInfo::new("util"));
        }
        {
            let data = store.get_node_mut(&b).unwrap().data_mut();
            data.classes.push(class_with_method(&b, "Shared", "from_b"));
            data.imported_classes
                .insert("Shared".to_string(), ("Shared".to_string(), a.clone()));
            data.imported_classes
                .insert("OnlyA".to_string(), ("OnlyA".to_string(), a.clone()));
            data.imported_functions
                .insert("util".to_string(), ("util".to_string(), a.clone()));
        }

        let resolver = Resolver::new(&store);
        let classes = resolver.visible_classes(&b).unwrap();
        assert_eq!(classes.len(), 2);
        // the local Shared wins; OnlyA comes from a
        let shared = classes.iter().find(|c| c.name == "Shared").unwrap();
        assert_eq!(shared.module_id, b);
        assert!(classes.iter().any(|c| c.name == "OnlyA" && c.module_id == a));

        let functions = resolver.visible_functions(&b).unwrap();
        assert_eq!(functions.len(), 1);
        assert_eq!(functions[0].name, "util");
    }

    #[test]
    fn test_find_method_on_class_without_bases() {
        let (mut store, _, a, _) = small_tree();
        store
            .get_node_mut(&a)
            .unwrap()
            .data_mut()
            .classes
            .push(class_with_method(&a, "Foo", "bar"));

        let resolver = Resolver::new(&store);
        let found = resolver.find_method(&a, "Foo", "bar").unwrap().unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "bar");

        // class found, method nowhere: empty list, not an error
        assert_eq!(
            resolver.find_method(&a, "Foo", "missing").unwrap(),
            Some(Vec::new())
        );
        // class not found at all
        assert_eq!(resolver.find_method(&a, "Ghost", "bar").unwrap(), None);
    }

    #[test]
    fn test_find_method_local_shadows_base() {
        let (mut store, _, a, _) = small_tree();
        {
            let data = store.get_node_mut(&a).unwrap().data_mut();
            data.classes.push(class_with_method(&a, "Base", "bar"));
            let mut child = ClassInfo::new("Child", a.clone(), Some(vec!["Base".to_string()]));
            let mut own = FuncInfo::new("bar");
            own.add_parameter(crate::model::ParameterInfo::new("self", None));
            child.add_function(own);
            data.classes.push(child);
        }

        let resolver = Resolver::new(&store);
        let found = resolver.find_method(&a, "Child", "bar").unwrap().unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].parameters.len(), 1, "must be Child's own bar");
    }

    #[test]
    fn test_find_method_walks_bare_base_in_same_module() {
        let (mut store, _, a, _) = small_tree();
        {
            let data = store.get_node_mut(&a).unwrap().data_mut();
            data.classes.push(class_with_method(&a, "Base", "bar"));
            data.classes
                .push(ClassInfo::new("Child", a.clone(), Some(vec!["Base".into()])));
        }

        let resolver = Resolver::new(&store);
        let found = resolver.find_method(&a, "Child", "bar").unwrap().unwrap();
        assert_eq!(found.len(), 1);

        // base present but method absent everywhere
        assert_eq!(
            resolver.find_method(&a, "Child", "missing").unwrap(),
            Some(Vec::new())
        );
    }

    #[test]
    fn test_find_method_follows_imported_base_across_modules() {
        // b imports Foo from a as "Base"; Child in b inherits from it
        let (mut store, _, a, b) = small_tree();
        store
            .get_node_mut(&a)
            .unwrap()
            .data_mut()
            .classes
            .push(class_with_method(&a, "Foo", "bar"));
        {
            let data = store.get_node_mut(&b).unwrap().data_mut();
            data.imported_classes
                .insert("Base".to_string(), ("Foo".to_string(), a.clone()));
            data.classes
                .push(ClassInfo::new("Child", b.clone(), Some(vec!["Base".into()])));
        }

        let resolver = Resolver::new(&store);
        let found = resolver.find_method(&b, "Child", "bar").unwrap().unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "bar");
    }

    #[test]
    fn test_find_method_resolves_dotted_base_through_module_alias() {
        // a.py: import vendor.layers as nn; class Net(nn.Module)
        let mut store = ObjectStore::new();
        let root = folder(&mut store, "n-pkg", "/repo/pkg", &[]);
        let a = file(&mut store, "n-a", "/repo/pkg/a.py", &["pkg"]);
        attach(&mut store, &root, &a);
        let vendor = folder(&mut store, "n-vendor", "/repo/vendor", &[]);
        let layers = file(&mut store, "n-layers", "/repo/vendor/layers.py", &["vendor"]);
        attach(&mut store, &vendor, &layers);
        store
            .get_node_mut(&layers)
            .unwrap()
            .data_mut()
            .classes
            .push(class_with_method(&layers, "Module", "forward"));
        {
            let data = store.get_node_mut(&a).unwrap().data_mut();
            data.imported_modules
                .insert("nn".to_string(), ("layers".to_string(), layers.clone()));
            data.classes.push(ClassInfo::new(
                "Net",
                a.clone(),
                Some(vec!["nn.Module".to_string()]),
            ));
        }

        let resolver = Resolver::new(&store);
        let found = resolver.find_method(&a, "Net", "forward").unwrap().unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "forward");
    }

    #[test]
    fn test_find_method_diamond_contributes_twice() {
        // D(B, C); B(A); C(A); only A declares the method
        let (mut store, _, a, _) = small_tree();
        {
            let data = store.get_node_mut(&a).unwrap().data_mut();
            data.classes.push(class_with_method(&a, "A", "m"));
            data.classes
                .push(ClassInfo::new("B", a.clone(), Some(vec!["A".into()])));
            data.classes
                .push(ClassInfo::new("C", a.clone(), Some(vec!["A".into()])));
            data.classes.push(ClassInfo::new(
                "D",
                a.clone(),
                Some(vec!["B".into(), "C".into()]),
            ));
        }

        let resolver = Resolver::new(&store);
        let found = resolver.find_method(&a, "D", "m").unwrap().unwrap();
        assert_eq!(found.len(), 2, "both base branches reach A");
    }

    #[test]
    fn test_find_method_base_cycle_is_an_error() {
        let (mut store, _, a, _) = small_tree();
        {
            let data = store.get_node_mut(&a).unwrap().data_mut();
            data.classes
                .push(ClassInfo::new("A", a.clone(), Some(vec!["B".into()])));
            data.classes
                .push(ClassInfo::new("B", a.clone(), Some(vec!["A".into()])));
        }

        let resolver = Resolver::new(&store);
        let err = resolver.find_method(&a, "A", "m").unwrap_err();
        assert!(matches!(err, ResolveError::InheritanceCycle { .. }));
    }

    #[test]
    fn test_dangling_link_target_surfaces_not_found() {
        let (mut store, _, _, b) = small_tree();
        store
            .get_node_mut(&b)
            .unwrap()
            .data_mut()
            .imported_classes
            .insert("Foo".to_string(), ("Foo".to_string(), NodeId::from("gone")));

        let resolver = Resolver::new(&store);
        let err = resolver.find_class(&b, "Foo").unwrap_err();
        assert!(matches!(
            err,
            ResolveError::Store(StoreError::NodeNotFound(_))
        ));
    }

    #[test]
    fn test_dump_tree_renders_nested_structure() {
        let (mut store, root, a, _) = small_tree();
        {
            let data = store.get_node_mut(&a).unwrap().data_mut();
            data.classes.push(class_with_method(&a, "Foo", "bar"));
            data.functions.push(FuncInfo::new("helper"));
        }

        let resolver = Resolver::new(&store);
        let dump = resolver.dump_tree(&root).unwrap();
        assert!(dump.contains("package pkg (/repo/pkg)"));
        assert!(dump.contains("  module a (/repo/pkg/a.py)"));
        assert!(dump.contains("    class Foo"));
        assert!(dump.contains("      def bar()"));
        assert!(dump.contains("    def helper()"));
        assert!(dump.contains("  module b (/repo/pkg/b.py)"));
    }
}
