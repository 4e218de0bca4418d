use std::path::{Path, PathBuf};

use anyhow::Result;
use camera_launch_ament::AmentIndex;
use itertools::chain;

/// Where packages are looked up.
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    pub(crate) search_env: bool,
    pub(crate) ament_prefix_paths: Vec<PathBuf>,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl LaunchConfig {
    pub const fn new() -> Self {
        Self {
            search_env: true,
            ament_prefix_paths: vec![],
        }
    }

    pub const fn search_env(mut self, yes: bool) -> Self {
        self.search_env = yes;
        self
    }

    pub fn ament_prefix_path<P>(mut self, dir: P) -> Self
    where
        P: AsRef<Path>,
    {
        self.ament_prefix_paths.push(dir.as_ref().to_owned());
        self
    }

    pub fn ament_prefix_paths<P, I>(mut self, dirs: I) -> Self
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        self.ament_prefix_paths
            .extend(dirs.into_iter().map(|dir| dir.as_ref().to_owned()));
        self
    }

    /// Environment prefixes come first, then the explicitly added ones.
    pub fn build_index(&self) -> Result<AmentIndex> {
        let env_index = if self.search_env {
            AmentIndex::from_env()?
        } else {
            AmentIndex::default()
        };

        let prefixes = chain!(env_index.prefixes(), &self.ament_prefix_paths);
        let index = AmentIndex::new(prefixes);
        log::debug!("ament prefixes: {:?}", index.prefixes());
        Ok(index)
    }
}
