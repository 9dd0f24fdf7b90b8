use std::io;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use textscout::RevealAction;
use tracing::debug;

/// Opens the platform file manager with the matched file selected.
///
/// Linux desktops have no common "select" verb, so there the containing
/// folder is opened instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellReveal;

impl ShellReveal {
    fn command(path: &Path) -> Command {
        if cfg!(target_os = "windows") {
            // Passed as two arguments so std's quoting never escapes inside
            // the switch
            let mut cmd = Command::new("explorer.exe");
            cmd.arg("/select,").arg(path);
            cmd
        } else if cfg!(target_os = "macos") {
            let mut cmd = Command::new("open");
            cmd.arg("-R").arg(path);
            cmd
        } else {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(path.parent().unwrap_or(path));
            cmd
        }
    }
}

impl RevealAction for ShellReveal {
    fn reveal(&self, path: &Path) -> io::Result<()> {
        let cmd = Self::command(path);
        debug!("Revealing {} with {:?}", path.display(), cmd);
        spawn_detached(cmd)
    }
}

/// Starts `cmd` without waiting for it; the child is reaped on a separate
/// thread so it does not linger as a zombie
fn spawn_detached(mut cmd: Command) -> io::Result<()> {
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    thread::spawn(move || {
        if let Err(e) = child.wait() {
            debug!("Reveal process {} not reaped: {}", child.id(), e);
        }
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_targets_path() {
        let path = Path::new("/data/reports/q1.txt");
        let cmd = ShellReveal::command(path);
        let args: Vec<String> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        if cfg!(target_os = "windows") {
            assert_eq!(cmd.get_program(), "explorer.exe");
            assert_eq!(args, vec!["/select,", "/data/reports/q1.txt"]);
        } else if cfg!(target_os = "macos") {
            assert_eq!(args, vec!["-R", "/data/reports/q1.txt"]);
        } else {
            assert_eq!(cmd.get_program(), "xdg-open");
            assert_eq!(args, vec!["/data/reports"]);
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_spawn_detached() {
        assert!(spawn_detached(Command::new("true")).is_ok());

        let err = spawn_detached(Command::new("textscout-no-such-program")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
