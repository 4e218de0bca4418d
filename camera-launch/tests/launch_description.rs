use std::{env, fs, path::Path};

use camera_launch::{
    config_path, generate_launch_description, generate_launch_description_with, host,
    CONFIG_PACKAGE,
};
use camera_launch_ament::{AmentError, AmentIndex};
use camera_launch_desc::{Action, LaunchRecord, ParameterSource, RecordGenerator};
use tempfile::TempDir;

fn register(prefix: &Path, package: &str) {
    let marker_dir = prefix.join("share/ament_index/resource_index/packages");
    fs::create_dir_all(&marker_dir).unwrap();
    fs::write(marker_dir.join(package), "").unwrap();
}

fn share_dir(prefix: &Path) -> std::path::PathBuf {
    prefix.join("share").join(CONFIG_PACKAGE)
}

#[test]
fn config_path_is_share_dir_joined_with_params_file() {
    let prefix = TempDir::new().unwrap();
    register(prefix.path(), CONFIG_PACKAGE);
    let index = AmentIndex::new([prefix.path()]);

    assert_eq!(
        config_path(&index).unwrap(),
        share_dir(prefix.path()).join("config").join("params.yaml")
    );
}

#[test]
fn description_holds_single_camera_node() {
    let prefix = TempDir::new().unwrap();
    register(prefix.path(), CONFIG_PACKAGE);
    let index = AmentIndex::new([prefix.path()]);

    let ld = generate_launch_description_with(&index).unwrap();
    assert_eq!(ld.len(), 1);

    let Action::Node(node) = &ld.actions()[0];
    assert_eq!(node.package(), "generic_camera_node");
    assert_eq!(node.executable(), "generic_camera_node");
    assert_eq!(node.node_name(), "generic_camera_node");
    assert_eq!(node.node_namespace(), "/camera");

    let expected = share_dir(prefix.path()).join("config/params.yaml");
    assert_eq!(
        node.parameter_sources(),
        [ParameterSource::File(expected.clone())]
    );

    // the parameter file is only referenced, never checked
    assert!(!expected.exists());
    assert_eq!(ld.missing_parameter_files(), [expected.as_path()]);
}

#[test]
fn uninstalled_config_package_fails_before_describing() {
    let prefix = TempDir::new().unwrap();
    register(prefix.path(), "generic_camera_node");
    let index = AmentIndex::new([prefix.path()]);

    let err = generate_launch_description_with(&index).unwrap_err();
    let cause = err.downcast_ref::<AmentError>().unwrap();
    assert!(matches!(cause, AmentError::PackageNotFound(name) if name == CONFIG_PACKAGE));
}

#[test]
fn record_of_installed_workspace() {
    let prefix = TempDir::new().unwrap();
    register(prefix.path(), CONFIG_PACKAGE);
    register(prefix.path(), "generic_camera_node");

    let lib_dir = prefix.path().join("lib/generic_camera_node");
    fs::create_dir_all(&lib_dir).unwrap();
    fs::write(lib_dir.join("generic_camera_node"), "").unwrap();

    let config_dir = share_dir(prefix.path()).join("config");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("params.yaml"),
        "/camera/generic_camera_node:\n  ros__parameters:\n    width: 1280\n    height: 720\n",
    )
    .unwrap();

    let index = AmentIndex::new([prefix.path()]);
    let ld = generate_launch_description_with(&index).unwrap();
    assert!(ld.missing_parameter_files().is_empty());

    let record = RecordGenerator::new(&index).launch_record(&ld).unwrap();
    let node = &record.node[0];
    assert_eq!(node.namespace, "/camera");
    assert_eq!(node.params.len(), 2);
    assert_eq!(
        &node.cmd[1..6],
        ["--ros-args", "-r", "__node:=generic_camera_node", "-r", "__ns:=/camera"]
    );
    assert_eq!(node.cmd.last().map(String::as_str), Some(node.params_files[0].as_str()));
}

#[test]
fn zero_argument_form_reads_ament_prefix_path() {
    let prefix = TempDir::new().unwrap();

    env::set_var("AMENT_PREFIX_PATH", prefix.path());
    assert!(generate_launch_description().is_err());

    register(prefix.path(), CONFIG_PACKAGE);
    let ld = generate_launch_description().unwrap();
    assert_eq!(ld.nodes().count(), 1);

    env::remove_var("AMENT_PREFIX_PATH");
    let err = generate_launch_description().unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AmentError>(),
        Some(AmentError::PrefixPathUnset)
    ));
}

fn install_workspace(prefix: &Path, params: Option<&str>) {
    register(prefix, CONFIG_PACKAGE);
    register(prefix, "generic_camera_node");

    let lib_dir = prefix.join("lib/generic_camera_node");
    fs::create_dir_all(&lib_dir).unwrap();
    fs::write(lib_dir.join("generic_camera_node"), "").unwrap();

    if let Some(params) = params {
        let config_dir = share_dir(prefix).join("config");
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join("params.yaml"), params).unwrap();
    }
}

#[test]
fn check_fails_without_params_file() {
    let prefix = TempDir::new().unwrap();
    install_workspace(prefix.path(), None);
    let index = AmentIndex::new([prefix.path()]);
    let ld = generate_launch_description_with(&index).unwrap();

    assert!(!host::check(&ld));

    install_workspace(prefix.path(), Some("{}\n"));
    assert!(host::check(&ld));
}

#[test]
fn describe_emits_launch_record_json() {
    let prefix = TempDir::new().unwrap();
    install_workspace(
        prefix.path(),
        Some("/**:\n  ros__parameters:\n    frame_id: camera_optical\n"),
    );
    let index = AmentIndex::new([prefix.path()]);
    let ld = generate_launch_description_with(&index).unwrap();

    let json = host::describe(&index, &ld).unwrap();
    let record: LaunchRecord = serde_json::from_str(&json).unwrap();

    assert_eq!(record.node.len(), 1);
    assert_eq!(record.node[0].name, "generic_camera_node");
    assert_eq!(
        record.node[0].params,
        [("frame_id".to_string(), "camera_optical".to_string())]
    );
    assert_eq!(record.file_data.len(), 1);
}

#[test]
fn cmd_lists_ros_args_line() {
    let prefix = TempDir::new().unwrap();
    install_workspace(prefix.path(), None);
    let index = AmentIndex::new([prefix.path()]);
    let ld = generate_launch_description_with(&index).unwrap();

    let cmds = host::node_commands(&index, &ld).unwrap();
    assert_eq!(cmds.len(), 1);

    let exe = prefix.path().join("lib/generic_camera_node/generic_camera_node");
    let params = share_dir(prefix.path()).join("config/params.yaml");
    assert_eq!(
        cmds[0].join(" "),
        format!(
            "{} --ros-args -r __node:=generic_camera_node -r __ns:=/camera --params-file {}",
            exe.display(),
            params.display()
        )
    );
}
