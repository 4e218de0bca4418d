#![warn(
    rust_2018_idioms,
    elided_lifetimes_in_paths,
    clippy::all,
    clippy::nursery
)]

//! Launch description for `generic_camera_node`.
//!
//! The node reads its parameters from `config/params.yaml` in the share
//! directory of `generic_camera_driver_node` and runs under `/camera`.

pub mod config;
pub mod host;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use camera_launch_ament::AmentIndex;
use camera_launch_desc::{LaunchDescription, Node};
use path_macro::path;

pub use config::LaunchConfig;

/// Package whose share directory holds the parameter file.
pub const CONFIG_PACKAGE: &str = "generic_camera_driver_node";
pub const NODE_PACKAGE: &str = "generic_camera_node";
pub const NODE_EXECUTABLE: &str = "generic_camera_node";
pub const NODE_NAME: &str = "generic_camera_node";
pub const NODE_NAMESPACE: &str = "/camera";

/// `<share of CONFIG_PACKAGE>/config/params.yaml`. The file is not required
/// to exist.
pub fn config_path(index: &AmentIndex) -> Result<PathBuf> {
    let share_dir = index
        .package_share_directory(CONFIG_PACKAGE)
        .with_context(|| format!("unable to locate the parameters of '{}'", NODE_NAME))?;
    Ok(path!(share_dir / "config" / "params.yaml"))
}

pub fn generate_launch_description_with(index: &AmentIndex) -> Result<LaunchDescription> {
    let config = config_path(index)?;

    let node = Node::new(NODE_PACKAGE, NODE_EXECUTABLE)
        .name(NODE_NAME)
        .namespace(NODE_NAMESPACE)
        .parameter_file(config);

    let mut ld = LaunchDescription::new();
    ld.add_action(node);
    Ok(ld)
}

/// Resolves packages through `$AMENT_PREFIX_PATH`.
pub fn generate_launch_description() -> Result<LaunchDescription> {
    let index = AmentIndex::from_env()?;
    generate_launch_description_with(&index)
}
