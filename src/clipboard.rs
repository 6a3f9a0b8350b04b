use anyhow::{Context, Result};
use arboard::Clipboard;
#[cfg(target_os = "linux")]
use arboard::SetExtLinux;

/// Hidden argv flag that switches the process into clipboard-daemon mode.
pub const DAEMON_FLAG: &str = "__clipboard_daemon";

#[cfg(target_os = "linux")]
fn run_daemon_mode() -> Result<()> {
    let text = std::io::read_to_string(std::io::stdin())?;

    let mut clipboard = Clipboard::new().context("Failed to access the system clipboard")?;
    match clipboard.set().wait().text(text) {
        Ok(()) => {
            // X11/Wayland selections die with their owner; park so the chunk
            // data survives until another application takes the selection.
            std::thread::park();
            unreachable!("clipboard daemon should park indefinitely");
        }
        Err(e) => Err(anyhow::Error::from(e)),
    }
}

/// Checks if the DAEMON_FLAG is present in args. If so, runs in daemon mode.
/// Returns Ok(true) if daemon mode was handled, Ok(false) otherwise.
pub fn check_and_run_daemon_if_requested() -> Result<bool> {
    if std::env::args().any(|a| a == DAEMON_FLAG) {
        #[cfg(target_os = "linux")]
        {
            run_daemon_mode()?;
            return Ok(true);
        }
        #[cfg(not(target_os = "linux"))]
        {
            // The flag only ever comes from our own Linux re-exec.
            eprintln!("Warning: {DAEMON_FLAG} flag used on non-Linux system. Ignoring.");
            std::process::exit(0);
        }
    }
    Ok(false)
}

/// Put the chunk data on the system clipboard.
pub fn copy_chunk_to_clipboard(text: String) -> Result<()> {
    #[cfg(not(target_os = "linux"))]
    {
        let mut clipboard = Clipboard::new().context("Failed to access the system clipboard")?;
        clipboard
            .set_text(text)
            .context("Failed to write chunk data to the clipboard")?;
    }

    #[cfg(target_os = "linux")]
    {
        use std::io::Write;
        use std::process::{Command, Stdio};

        // This process exits right after the copy, so hand the text to a
        // detached copy of ourselves that keeps the selection alive.
        let mut child = Command::new(std::env::current_exe()?)
            .arg(DAEMON_FLAG)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .current_dir("/")
            .spawn()
            .context("Failed to spawn the clipboard daemon")?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes())?;
            stdin.flush()?;
        } else {
            return Err(anyhow::anyhow!("Failed to get stdin for clipboard daemon"));
        }
        tracing::debug!("Clipboard daemon spawned (pid {})", child.id());
    }
    Ok(())
}
