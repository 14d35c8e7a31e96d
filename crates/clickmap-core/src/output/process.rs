// Clickmap Process Output
// Launching applications and shell commands for LaunchApp / RunCommand

use std::env;
use std::process::{Command, Stdio};
use std::thread;

use super::EffectorError;

/// Launcher used for desktop-entry identifiers
const DESKTOP_LAUNCHER: &str = "gtk-launch";

/// Build the command that runs `command` through the user's shell
pub fn shell_command(command: &str) -> Command {
    let shell = env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string());
    let mut cmd = Command::new(shell);
    cmd.arg("-c").arg(command);
    cmd
}

/// Build the command that launches an application.
///
/// Identifiers containing a path separator are executed directly;
/// anything else is treated as a desktop-entry id.
pub fn launch_command(identifier: &str) -> Command {
    if identifier.contains('/') {
        Command::new(identifier)
    } else {
        let mut cmd = Command::new(DESKTOP_LAUNCHER);
        cmd.arg(identifier.trim_end_matches(".desktop"));
        cmd
    }
}

/// Start a command without waiting for it.
///
/// A small reaper thread waits for the child so it does not linger as a
/// zombie, and logs a non-zero exit.
pub fn spawn_detached(mut cmd: Command, label: &str) -> Result<(), EffectorError> {
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    log::debug!("spawned {} (pid {})", label, child.id());

    let label = label.to_string();
    thread::Builder::new()
        .name("clickmap-reaper".to_string())
        .spawn(move || match child.wait() {
            Ok(status) if !status.success() => log::warn!("{} exited with {}", label, status),
            Ok(_) => {}
            Err(e) => log::warn!("failed to wait for {}: {}", label, e),
        })?;
    Ok(())
}
