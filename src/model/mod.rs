use std::fmt;

use serde::{Deserialize, Serialize};

pub mod node;
pub mod package;

/// Identifier of a module-graph node. Opaque, globally unique, and stable for
/// the lifetime of a loaded graph; independent of the node's filesystem path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId(s.to_string())
    }
}

/// Identifier of a package record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PackageId(pub String);

impl PackageId {
    pub fn new(id: impl Into<String>) -> Self {
        PackageId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PackageId {
    fn from(s: &str) -> Self {
        PackageId(s.to_string())
    }
}

/// A class declaration: name, declared base-class references, owning module,
/// and the methods declared directly on the class.
///
/// A base reference is either a bare name (resolved in the owning module's
/// visible scope) or a dotted path whose last segment is the class name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bases: Option<Vec<String>>,
    pub module_id: NodeId,
    #[serde(default)]
    pub functions: Vec<FuncInfo>,
}

impl ClassInfo {
    pub fn new(name: impl Into<String>, module_id: NodeId, bases: Option<Vec<String>>) -> Self {
        ClassInfo {
            name: name.into(),
            bases,
            module_id,
            functions: Vec::new(),
        }
    }

    pub fn add_function(&mut self, function: FuncInfo) {
        self.functions.push(function);
    }

    /// Methods declared directly on the class with the given name.
    pub fn functions_named(&self, name: &str) -> Vec<&FuncInfo> {
        self.functions.iter().filter(|f| f.name == name).collect()
    }
}

impl fmt::Display for ClassInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class {}", self.name)?;
        match &self.bases {
            Some(bases) if !bases.is_empty() => write!(f, "({})", bases.join(", ")),
            _ => Ok(()),
        }
    }
}

/// A function signature. A module or class may declare several entries with
/// the same name; lookups return all of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuncInfo {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<ParameterInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<TypeInfo>,
}

impl FuncInfo {
    pub fn new(name: impl Into<String>) -> Self {
        FuncInfo {
            name: name.into(),
            parameters: Vec::new(),
            return_type: None,
        }
    }

    pub fn add_parameter(&mut self, parameter: ParameterInfo) {
        self.parameters.push(parameter);
    }
}

impl fmt::Display for FuncInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self.parameters.iter().map(|p| p.to_string()).collect();
        write!(f, "{}({})", self.name, params.join(", "))?;
        if let Some(ret) = &self.return_type {
            write!(f, " -> {}", ret)?;
        }
        Ok(())
    }
}

/// A single function parameter. `star`/`power` mark variadic positional and
/// variadic keyword parameters; the default value is kept as source text,
/// never evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_hint: Option<TypeInfo>,
    #[serde(default)]
    pub star: bool,
    #[serde(default)]
    pub power: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_value: Option<String>,
}

impl ParameterInfo {
    pub fn new(name: impl Into<String>, type_hint: Option<TypeInfo>) -> Self {
        ParameterInfo {
            name: name.into(),
            type_hint,
            star: false,
            power: false,
            initial_value: None,
        }
    }

    fn prefix(&self) -> &'static str {
        if self.power {
            "**"
        } else if self.star {
            "*"
        } else {
            ""
        }
    }

    /// Render the parameter back to its Python source form, without the
    /// type annotation.
    pub fn to_source_string(&self) -> String {
        let mut out = format!("{}{}", self.prefix(), self.name);
        if let Some(value) = &self.initial_value {
            out.push('=');
            out.push_str(value);
        }
        out
    }
}

impl fmt::Display for ParameterInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix(), self.name)?;
        if let Some(hint) = &self.type_hint {
            write!(f, ": {}", hint)?;
        }
        if let Some(value) = &self.initial_value {
            write!(f, " = {}", value)?;
        }
        Ok(())
    }
}

/// A possibly parametrized type annotation, e.g. `Dict[str, List[int]]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtypes: Vec<TypeInfo>,
}

impl TypeInfo {
    pub fn new(name: impl Into<String>) -> Self {
        TypeInfo {
            name: name.into(),
            subtypes: Vec::new(),
        }
    }

    pub fn parametrized(name: impl Into<String>, subtypes: Vec<TypeInfo>) -> Self {
        TypeInfo {
            name: name.into(),
            subtypes,
        }
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.subtypes.is_empty() {
            let subs: Vec<String> = self.subtypes.iter().map(|s| s.to_string()).collect();
            write!(f, "[{}]", subs.join(", "))?;
        }
        Ok(())
    }
}

/// One declared import statement: the source it names, the selected names
/// (absent for `import a.b`-style statements), and the module alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportInfo {
    pub source: RelativePathInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importees: Option<Importees>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl ImportInfo {
    pub fn new(
        source: RelativePathInfo,
        importees: Option<Importees>,
        alias: Option<String>,
    ) -> Self {
        ImportInfo {
            source,
            importees,
            alias,
        }
    }
}

/// The selected names of a `from ... import ...` statement: either an
/// explicit list or the wildcard sentinel.
///
/// Serialized as `"*"` for the wildcard, otherwise as the list itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Importees {
    Wildcard,
    Names(Vec<ImportTarget>),
}

impl Serialize for Importees {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Importees::Wildcard => serializer.serialize_str("*"),
            Importees::Names(names) => names.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Importees {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::String(s) if s == "*" => Ok(Importees::Wildcard),
            serde_json::Value::Array(_) => serde_json::from_value(value)
                .map(Importees::Names)
                .map_err(D::Error::custom),
            other => Err(D::Error::custom(format!(
                "expected \"*\" or a list of import targets, got {}",
                other
            ))),
        }
    }
}

/// A single imported name, possibly bound under a local alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImportTarget {
    Name(String),
    Aliased(String, String),
}

impl ImportTarget {
    /// The name as exported by the source module.
    pub fn source_name(&self) -> &str {
        match self {
            ImportTarget::Name(name) => name,
            ImportTarget::Aliased(name, _) => name,
        }
    }

    /// The name the import binds locally.
    pub fn local_name(&self) -> &str {
        match self {
            ImportTarget::Name(name) => name,
            ImportTarget::Aliased(_, alias) => alias,
        }
    }
}

/// The source of an import statement. `level` counts the leading relative
/// dots (0 = absolute); `from_file` marks an import relative to the importing
/// file's own module rather than its parent package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelativePathInfo {
    pub level: usize,
    pub source: Vec<String>,
    pub from_file: bool,
}

impl RelativePathInfo {
    pub fn absolute(source: Vec<String>) -> Self {
        RelativePathInfo {
            level: 0,
            source,
            from_file: false,
        }
    }

    pub fn relative(level: usize, source: Vec<String>, from_file: bool) -> Self {
        RelativePathInfo {
            level,
            source,
            from_file,
        }
    }
}
