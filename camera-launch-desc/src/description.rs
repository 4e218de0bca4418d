//! Launch description values handed to the host launch runtime.

use std::path::{Path, PathBuf};

/// An ordered list of actions. The description owns every action added to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchDescription {
    actions: Vec<Action>,
}

impl LaunchDescription {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_action<A>(&mut self, action: A)
    where
        A: Into<Action>,
    {
        self.actions.push(action.into());
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.actions.iter().map(|action| match action {
            Action::Node(node) => node,
        })
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Parameter files referenced by any node that do not exist on disk.
    pub fn missing_parameter_files(&self) -> Vec<&Path> {
        self.nodes()
            .flat_map(|node| node.parameter_files())
            .filter(|path| !path.is_file())
            .collect()
    }
}

impl<A> FromIterator<A> for LaunchDescription
where
    A: Into<Action>,
{
    fn from_iter<T: IntoIterator<Item = A>>(iter: T) -> Self {
        Self {
            actions: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl IntoIterator for LaunchDescription {
    type Item = Action;
    type IntoIter = std::vec::IntoIter<Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.into_iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Node(Node),
}

impl From<Node> for Action {
    fn from(node: Node) -> Self {
        Self::Node(node)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterSource {
    File(PathBuf),
    Value { name: String, value: String },
}

/// A node to be spawned from an executable of an installed package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    package: String,
    executable: String,
    name: Option<String>,
    namespace: Option<String>,
    parameters: Vec<ParameterSource>,
    remappings: Vec<(String, String)>,
    arguments: Vec<String>,
    respawn: bool,
}

impl Node {
    pub fn new<P, E>(package: P, executable: E) -> Self
    where
        P: ToString,
        E: ToString,
    {
        Self {
            package: package.to_string(),
            executable: executable.to_string(),
            name: None,
            namespace: None,
            parameters: vec![],
            remappings: vec![],
            arguments: vec![],
            respawn: false,
        }
    }

    pub fn name<S>(mut self, name: S) -> Self
    where
        S: ToString,
    {
        self.name = Some(name.to_string());
        self
    }

    pub fn namespace<S>(mut self, namespace: S) -> Self
    where
        S: ToString,
    {
        self.namespace = Some(namespace.to_string());
        self
    }

    pub fn parameter_file<P>(mut self, path: P) -> Self
    where
        P: AsRef<Path>,
    {
        self.parameters
            .push(ParameterSource::File(path.as_ref().to_owned()));
        self
    }

    pub fn parameter<N, V>(mut self, name: N, value: V) -> Self
    where
        N: ToString,
        V: ToString,
    {
        self.parameters.push(ParameterSource::Value {
            name: name.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn parameters<I>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = ParameterSource>,
    {
        self.parameters.extend(sources);
        self
    }

    pub fn remap<F, T>(mut self, from: F, to: T) -> Self
    where
        F: ToString,
        T: ToString,
    {
        self.remappings.push((from.to_string(), to.to_string()));
        self
    }

    pub fn argument<S>(mut self, arg: S) -> Self
    where
        S: ToString,
    {
        self.arguments.push(arg.to_string());
        self
    }

    pub const fn respawn(mut self, yes: bool) -> Self {
        self.respawn = yes;
        self
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }

    /// The node name. Falls back to the executable name.
    pub fn node_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.executable)
    }

    /// The namespace, always absolute and without a trailing slash.
    pub fn node_namespace(&self) -> String {
        normalize_namespace(self.namespace.as_deref().unwrap_or("/"))
    }

    pub fn fully_qualified_name(&self) -> String {
        let namespace = self.node_namespace();
        if namespace == "/" {
            format!("/{}", self.node_name())
        } else {
            format!("{}/{}", namespace, self.node_name())
        }
    }

    pub fn parameter_sources(&self) -> &[ParameterSource] {
        &self.parameters
    }

    pub fn parameter_files(&self) -> impl Iterator<Item = &Path> {
        self.parameters.iter().filter_map(|source| match source {
            ParameterSource::File(path) => Some(path.as_path()),
            ParameterSource::Value { .. } => None,
        })
    }

    pub fn remappings(&self) -> &[(String, String)] {
        &self.remappings
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    pub const fn is_respawn(&self) -> bool {
        self.respawn
    }
}

fn normalize_namespace(namespace: &str) -> String {
    let trimmed = namespace.trim_matches('/');
    format!("/{}", trimmed)
}
