//! Command-line and record generation

use std::{
    collections::{btree_map::Entry, BTreeMap, BTreeSet},
    fs,
    path::{Path, PathBuf},
};

use camera_launch_ament::AmentIndex;
use itertools::chain;
use path_macro::path;

use crate::{
    description::{LaunchDescription, Node, ParameterSource},
    error::GenerationError,
    params::parse_param_file,
    record::{LaunchRecord, NodeRecord},
};

/// Turns launch descriptions into records against a package index.
#[derive(Debug, Clone, Copy)]
pub struct RecordGenerator<'a> {
    index: &'a AmentIndex,
}

impl<'a> RecordGenerator<'a> {
    pub const fn new(index: &'a AmentIndex) -> Self {
        Self { index }
    }

    pub fn launch_record(&self, ld: &LaunchDescription) -> Result<LaunchRecord, GenerationError> {
        let mut files = FileCache::default();
        let node = ld
            .nodes()
            .map(|node| self.node_record_with(node, &mut files))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(LaunchRecord {
            node,
            file_data: files.contents,
        })
    }

    pub fn node_record(&self, node: &Node) -> Result<NodeRecord, GenerationError> {
        self.node_record_with(node, &mut FileCache::default())
    }

    fn node_record_with(
        &self,
        node: &Node,
        files: &mut FileCache,
    ) -> Result<NodeRecord, GenerationError> {
        let cmd = self.node_command(node)?;
        let fq_name = node.fully_qualified_name();

        let mut params = vec![];
        let mut params_files = vec![];

        for source in node.parameter_sources() {
            match source {
                ParameterSource::File(path) => {
                    params_files.push(path.display().to_string());

                    let content = match files.read(path) {
                        Some(content) => content,
                        None => continue,
                    };
                    match parse_param_file(content, path, &fq_name) {
                        Ok(file_params) => params.extend(file_params),
                        Err(err) => {
                            log::warn!("failed to load parameters for {}: {}", fq_name, err);
                        }
                    }
                }
                ParameterSource::Value { name, value } => {
                    params.push((name.clone(), value.clone()));
                }
            }
        }

        Ok(NodeRecord {
            executable: node.executable().to_string(),
            package: node.package().to_string(),
            name: node.node_name().to_string(),
            namespace: node.node_namespace(),
            params,
            params_files,
            remaps: node.remappings().to_vec(),
            args: node.arguments().to_vec(),
            cmd,
            respawn: node.is_respawn(),
        })
    }

    /// The command line used to spawn `node`.
    ///
    /// `<exe> [args..] --ros-args -r __node:=<name> -r __ns:=<ns> [-r from:=to]..
    /// [-p name:=value | --params-file path]..`
    pub fn node_command(&self, node: &Node) -> Result<Vec<String>, GenerationError> {
        let exec_path = self.executable_path(node)?;

        let ros_args = [
            "--ros-args".to_string(),
            "-r".to_string(),
            format!("__node:={}", node.node_name()),
            "-r".to_string(),
            format!("__ns:={}", node.node_namespace()),
        ];

        let remaps = node
            .remappings()
            .iter()
            .flat_map(|(from, to)| ["-r".to_string(), format!("{}:={}", from, to)]);

        let params = node
            .parameter_sources()
            .iter()
            .flat_map(|source| match source {
                ParameterSource::File(path) => {
                    ["--params-file".to_string(), path.display().to_string()]
                }
                ParameterSource::Value { name, value } => {
                    ["-p".to_string(), format!("{}:={}", name, value)]
                }
            });

        let cmd: Vec<_> = chain!(
            [exec_path.display().to_string()],
            node.arguments().iter().cloned(),
            ros_args,
            remaps,
            params
        )
        .collect();
        Ok(cmd)
    }

    fn executable_path(&self, node: &Node) -> Result<PathBuf, GenerationError> {
        let libexec_dir = self.index.package_libexec_directory(node.package())?;
        let exec_path = path!(libexec_dir / node.executable());

        if !exec_path.is_file() {
            return Err(GenerationError::ExecutableNotFound {
                package: node.package().to_string(),
                executable: node.executable().to_string(),
                path: exec_path,
            });
        }

        Ok(exec_path)
    }
}

/// Parameter files read so far. Each path is read at most once.
#[derive(Debug, Default)]
struct FileCache {
    contents: BTreeMap<String, String>,
    unreadable: BTreeSet<String>,
}

impl FileCache {
    fn read(&mut self, path: &Path) -> Option<&str> {
        let key = path.display().to_string();
        if self.unreadable.contains(&key) {
            return None;
        }

        match self.contents.entry(key) {
            Entry::Occupied(entry) => Some(entry.into_mut().as_str()),
            Entry::Vacant(entry) => match fs::read_to_string(path) {
                Ok(content) => Some(entry.insert(content).as_str()),
                Err(err) => {
                    log::warn!("unable to read parameter file {}: {}", entry.key(), err);
                    self.unreadable.insert(entry.into_key());
                    None
                }
            },
        }
    }
}
