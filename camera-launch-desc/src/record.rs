//! Serializable records of what the host runtime will spawn.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LaunchRecord {
    pub node: Vec<NodeRecord>,
    /// Parameter file contents keyed by path. Unreadable files are absent.
    pub file_data: BTreeMap<String, String>,
}

impl LaunchRecord {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub executable: String,
    pub package: String,
    pub name: String,
    pub namespace: String,
    pub params: Vec<(String, String)>,
    pub params_files: Vec<String>,
    pub remaps: Vec<(String, String)>,
    pub args: Vec<String>,
    pub cmd: Vec<String>,
    pub respawn: bool,
}
