//! Adapters around the external diagnostic tools.
//!
//! Every process invocation goes through [`ToolRunner`], so the parsers
//! here only ever see text and tests can feed them captured output.

pub mod lsblk;
pub mod lspci;
pub mod lsscsi;
pub mod nvme;
pub mod smartctl;
pub mod storcli;
pub mod tw_cli;

use anyhow::{bail, Context, Result};
use log::debug;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Runs an external tool and hands back its standard output.
pub trait ToolRunner {
    fn run(&self, program: &Path, args: &[&str]) -> Result<String>;
}

/// Runs tools as real child processes with a per-call timeout.
pub struct SystemRunner {
    timeout: Duration,
}

impl SystemRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl ToolRunner for SystemRunner {
    fn run(&self, program: &Path, args: &[&str]) -> Result<String> {
        debug!("exec {} {}", program.display(), args.join(" "));

        let child = Command::new(program)
            .args(args)
            .env("LANG", "C")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("failed to start {}", program.display()))?;
        let pid = Pid::from_raw(child.id() as i32);

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(child.wait_with_output());
        });

        // Vendor tools set non-zero status bits on perfectly usable output,
        // so the exit status is logged but never treated as failure.
        match rx.recv_timeout(self.timeout) {
            Ok(out) => {
                let out = out.with_context(|| format!("failed to read output of {}", program.display()))?;
                let text = String::from_utf8_lossy(&out.stdout).into_owned();
                debug!("{} exited with {} ({} bytes)", program.display(), out.status, text.len());
                Ok(text)
            }
            Err(_) => {
                let _ = kill(pid, Signal::SIGKILL);
                bail!("{} timed out after {}s", program.display(), self.timeout.as_secs())
            }
        }
    }
}

#[cfg(test)]
pub mod fake {
    use super::ToolRunner;
    use anyhow::{anyhow, Result};
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::path::Path;

    /// Canned tool output keyed by the full command line.
    #[derive(Default)]
    pub struct FakeRunner {
        responses: HashMap<String, String>,
        calls:     RefCell<Vec<String>>,
    }

    impl FakeRunner {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(mut self, command: &str, output: &str) -> Self {
            self.responses.insert(command.to_string(), output.to_string());
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }

        /// True if any recorded call started with `program`.
        pub fn invoked(&self, program: &str) -> bool {
            self.calls.borrow().iter().any(|c| c.split(' ').next() == Some(program))
        }
    }

    impl ToolRunner for FakeRunner {
        fn run(&self, program: &Path, args: &[&str]) -> Result<String> {
            let mut command = program.display().to_string();
            for a in args {
                command.push(' ');
                command.push_str(a);
            }
            self.calls.borrow_mut().push(command.clone());
            self.responses
                .get(&command)
                .cloned()
                .ok_or_else(|| anyhow!("no such command: {}", command))
        }
    }
}
