use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::model::{NodeId, PackageId};
use crate::resolve::Resolver;
use crate::store::ObjectStore;

use super::output::{format_classes, format_functions, format_json};
use super::OutputFormat;

fn open_store(store_dir: &Path) -> Result<ObjectStore> {
    let mut store = ObjectStore::new();
    store
        .load(store_dir)
        .with_context(|| format!("failed to load graph from {}", store_dir.display()))?;
    Ok(store)
}

pub fn run_summary(store_dir: &Path, format: &OutputFormat) -> Result<String> {
    let store = open_store(store_dir)?;

    let folders = store.nodes().filter(|(_, n)| n.is_folder()).count();
    let files = store.node_count() - folders;
    let linked = store
        .nodes()
        .filter(|(_, n)| n.data().parsed_import)
        .count();

    match format {
        OutputFormat::Text => Ok(format!(
            "{} packages, {} nodes ({} modules, {} package dirs), {} linked",
            store.package_count(),
            store.node_count(),
            files,
            folders,
            linked,
        )),
        _ => {
            let summary = serde_json::json!({
                "packages": store.package_count(),
                "nodes": store.node_count(),
                "file_nodes": files,
                "folder_nodes": folders,
                "linked_nodes": linked,
            });
            Ok(format_json(&summary, format))
        }
    }
}

pub fn run_packages(store_dir: &Path, format: &OutputFormat) -> Result<String> {
    let store = open_store(store_dir)?;

    match format {
        OutputFormat::Text => {
            let mut out = String::new();
            for (id, pkg) in store.packages() {
                let root = pkg
                    .root
                    .as_ref()
                    .map(|r| r.as_str())
                    .unwrap_or("-");
                out.push_str(&format!(
                    "{:<24} {:<12} {:<10} root={} ({})\n",
                    pkg.name, pkg.version, pkg.status, root, id,
                ));
            }
            Ok(out)
        }
        _ => {
            let packages: Vec<_> = store
                .packages()
                .map(|(id, pkg)| {
                    serde_json::json!({
                        "id": id,
                        "name": pkg.name,
                        "version": pkg.version,
                        "status": pkg.status,
                        "is_file": pkg.is_file,
                        "root": pkg.root,
                    })
                })
                .collect();
            Ok(format_json(&packages, format))
        }
    }
}

pub fn run_tree(store_dir: &Path, node: &str, format: &OutputFormat) -> Result<String> {
    let store = open_store(store_dir)?;
    let resolver = Resolver::new(&store);
    let dump = resolver.dump_tree(&NodeId::from(node))?;
    match format {
        OutputFormat::Text => Ok(dump),
        _ => Ok(format_json(&serde_json::json!({ "tree": dump }), format)),
    }
}

pub fn run_resolve(
    store_dir: &Path,
    package: &str,
    version: Option<&str>,
    path: &str,
    from_file: bool,
    format: &OutputFormat,
) -> Result<String> {
    let store = open_store(store_dir)?;

    let Some(package_id) = find_package_id(&store, package, version) else {
        bail!("package '{}' is not in the store", package);
    };

    let segments: Vec<String> = path.split('.').map(str::to_string).collect();
    let resolver = Resolver::new(&store);
    let resolved = resolver.package_submodule(&package_id, &segments, from_file)?;

    match format {
        OutputFormat::Text => Ok(match resolved {
            Some(id) => format!("{} -> {}", path, id),
            None => format!("{} does not resolve", path),
        }),
        _ => Ok(format_json(
            &serde_json::json!({ "path": path, "node": resolved }),
            format,
        )),
    }
}

pub fn run_class(store_dir: &Path, node: &str, name: &str, format: &OutputFormat) -> Result<String> {
    let store = open_store(store_dir)?;
    let resolver = Resolver::new(&store);
    match resolver.find_class(&NodeId::from(node), name)? {
        Some(class) => Ok(format_classes(&[class], format)),
        None => match format {
            OutputFormat::Text => Ok(format!("class '{}' is not visible from {}", name, node)),
            _ => Ok(format_json(&serde_json::Value::Null, format)),
        },
    }
}

pub fn run_function(
    store_dir: &Path,
    node: &str,
    name: &str,
    format: &OutputFormat,
) -> Result<String> {
    let store = open_store(store_dir)?;
    let resolver = Resolver::new(&store);
    let functions = resolver.find_functions(&NodeId::from(node), name)?;
    if functions.is_empty() {
        if let OutputFormat::Text = format {
            return Ok(format!("function '{}' is not visible from {}", name, node));
        }
    }
    Ok(format_functions(&functions, format))
}

pub fn run_method(
    store_dir: &Path,
    node: &str,
    class: &str,
    name: &str,
    format: &OutputFormat,
) -> Result<String> {
    let store = open_store(store_dir)?;
    let resolver = Resolver::new(&store);
    match resolver.find_method(&NodeId::from(node), class, name)? {
        None => match format {
            OutputFormat::Text => Ok(format!("class '{}' is not visible from {}", class, node)),
            _ => Ok(format_json(&serde_json::Value::Null, format)),
        },
        Some(methods) => {
            if methods.is_empty() {
                if let OutputFormat::Text = format {
                    return Ok(format!(
                        "no method '{}' on '{}' or its bases",
                        name, class
                    ));
                }
            }
            Ok(format_functions(&methods, format))
        }
    }
}

pub fn run_symbols(store_dir: &Path, node: &str, format: &OutputFormat) -> Result<String> {
    let store = open_store(store_dir)?;
    let resolver = Resolver::new(&store);
    let node_id = NodeId::from(node);
    let classes = resolver.visible_classes(&node_id)?;
    let functions = resolver.visible_functions(&node_id)?;

    match format {
        OutputFormat::Text => {
            let mut out = format_classes(&classes, format);
            out.push_str(&format_functions(&functions, format));
            Ok(out)
        }
        _ => Ok(format_json(
            &serde_json::json!({ "classes": classes, "functions": functions }),
            format,
        )),
    }
}

/// Find a package id by name, preferring an exact version match.
pub fn find_package_id(
    store: &ObjectStore,
    name: &str,
    version: Option<&str>,
) -> Option<PackageId> {
    match version {
        Some(version) => store.find_package(name, version),
        None => store
            .packages()
            .find(|(_, p)| p.name == name)
            .map(|(id, _)| id.clone()),
    }
}
