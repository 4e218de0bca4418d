//! What the `camera-launch` subcommands do with a launch description.

use std::{
    future::Future,
    os::unix::process::ExitStatusExt as _,
    process::ExitStatus,
    time::Duration,
};

use anyhow::{bail, Context as _, Result};
use camera_launch_ament::AmentIndex;
use camera_launch_desc::{LaunchDescription, RecordGenerator};
use nix::{
    sys::signal::{kill, Signal},
    unistd::Pid,
};
use tokio::process::Command;

/// How long a node may take to exit after SIGINT before it is killed.
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// The launch record as pretty-printed JSON.
pub fn describe(index: &AmentIndex, ld: &LaunchDescription) -> Result<String> {
    let json = RecordGenerator::new(index).launch_record(ld)?.to_json()?;
    Ok(json)
}

pub fn node_commands(index: &AmentIndex, ld: &LaunchDescription) -> Result<Vec<Vec<String>>> {
    let generator = RecordGenerator::new(index);
    let cmds = ld
        .nodes()
        .map(|node| generator.node_command(node))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(cmds)
}

/// Returns false and logs every missing parameter file.
pub fn check(ld: &LaunchDescription) -> bool {
    let missing = ld.missing_parameter_files();
    for path in &missing {
        log::error!("parameter file {} does not exist", path.display());
    }
    missing.is_empty()
}

/// Process exit code for a child status, `128 + signal` for signalled
/// children as shells report it.
pub fn exit_status_code(status: ExitStatus) -> u8 {
    match (status.code(), status.signal()) {
        (Some(code), _) => code as u8,
        (None, Some(signal)) => (128 + signal) as u8,
        (None, None) => 1,
    }
}

/// Spawns the single node of `ld` and waits for it.
///
/// When `shutdown` completes first, the node receives SIGINT and is given
/// `grace` to exit, which counts as a clean stop. A node still running after
/// that is killed and its signal status is returned.
pub async fn run<F>(
    index: &AmentIndex,
    ld: &LaunchDescription,
    shutdown: F,
    grace: Duration,
) -> Result<u8>
where
    F: Future<Output = ()>,
{
    let cmds = node_commands(index, ld)?;
    let cmd = match cmds.as_slice() {
        [cmd] => cmd,
        _ => bail!("expected exactly one node, found {}", cmds.len()),
    };
    let (program, args) = cmd.split_first().context("empty command line")?;

    log::info!("spawning {}", cmd.join(" "));
    let mut child = Command::new(program)
        .args(args)
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("unable to spawn '{}'", program))?;

    let status = tokio::select! {
        status = child.wait() => status?,
        _ = shutdown => {
            let pid = child.id().context("camera node already exited")?;
            log::info!("interrupted, sending SIGINT to the camera node");
            kill(Pid::from_raw(pid as i32), Signal::SIGINT)
                .context("unable to interrupt the camera node")?;

            match tokio::time::timeout(grace, child.wait()).await {
                Ok(status) => {
                    log::info!("camera node stopped with {}", status?);
                    return Ok(0);
                }
                Err(_) => {
                    log::warn!(
                        "camera node still running {:?} after SIGINT, killing it",
                        grace
                    );
                    child.kill().await?;
                    child.wait().await?
                }
            }
        }
    };

    if !status.success() {
        log::error!("camera node exited with {}", status);
    }
    Ok(exit_status_code(status))
}

#[cfg(test)]
mod tests {
    use std::{os::unix::process::ExitStatusExt as _, process::Command};

    use super::*;

    #[test]
    fn exit_status_code_keeps_child_code() {
        let status = Command::new("/bin/sh").args(["-c", "exit 3"]).status().unwrap();
        assert_eq!(exit_status_code(status), 3);

        let status = Command::new("/bin/sh").args(["-c", "kill -9 $$"]).status().unwrap();
        assert_eq!(exit_status_code(status), 137);
    }

    #[test]
    fn exit_status_code_of_raw_status() {
        assert_eq!(exit_status_code(ExitStatus::from_raw(0)), 0);
        assert_eq!(exit_status_code(ExitStatus::from_raw(2)), 130);
    }
}
