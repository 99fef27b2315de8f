use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

pub mod commands;
pub mod output;

#[derive(Parser)]
#[command(
    name = "pygraph",
    version,
    about = "Query persisted Python module graphs: paths, classes, functions, inherited methods"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding the persisted graph (nodes/ and packages/)
    #[arg(long, global = true, default_value = ".pygraph")]
    pub store: PathBuf,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Overview of the loaded graph
    Summary,

    /// List packages with status, version and root node
    Packages,

    /// Indented subtree dump of a node
    Tree {
        /// Node identifier
        node: String,
    },

    /// Resolve a dotted module path inside a package
    Resolve {
        /// Package name
        package: String,
        /// Dotted path, e.g. pkg.sub.module
        path: String,
        /// Package version (default: first match by name)
        #[arg(long)]
        version: Option<String>,
        /// Resolve as a file-relative import (skips module aliases)
        #[arg(long)]
        from_file: bool,
    },

    /// Look up a class visible from a node
    Class {
        /// Node identifier
        node: String,
        /// Class name
        name: String,
    },

    /// Look up functions visible from a node (all overloads)
    Function {
        /// Node identifier
        node: String,
        /// Function name
        name: String,
    },

    /// Inheritance-aware method lookup inside a class
    Method {
        /// Node identifier
        node: String,
        /// Class name as visible from the node
        class: String,
        /// Method name
        name: String,
    },

    /// List every class and function visible from a node
    Symbols {
        /// Node identifier
        node: String,
    },
}

#[derive(Clone, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Compact,
}
