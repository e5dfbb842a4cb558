//! Running ledger-cli as a child process.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::{
    error::{LedgerError, Result},
    options::Options,
    traits::Engine,
};

/// Environment variable naming the ledger executable.
pub const LEDGER_BIN_ENV: &str = "LEDGER_BIN";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerCli {
    pub program: PathBuf,
}

impl Default for LedgerCli {
    fn default() -> Self {
        LedgerCli::new("ledger")
    }
}

impl LedgerCli {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        LedgerCli {
            program: program.into(),
        }
    }

    /// `$LEDGER_BIN` if set, otherwise `ledger` from `PATH`.
    pub fn from_env() -> Self {
        match std::env::var_os(LEDGER_BIN_ENV) {
            Some(program) if !program.is_empty() => LedgerCli::new(program),
            _ => LedgerCli::default(),
        }
    }
}

impl Engine for LedgerCli {
    fn run(&self, options: &Options, args: &[String], stdin: Option<&str>) -> Result<String> {
        let mut cmd = Command::new(&self.program);
        cmd.args(options.engine_args())
            .args(args)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        debug!(program = %self.program.display(), ?args, "running ledger");

        let mut child = cmd.spawn().map_err(|e| LedgerError::EngineInvocation {
            message: format!("cannot start {}: {e}", self.program.display()),
            stderr: String::new(),
        })?;

        let input = stdin.zip(child.stdin.take());
        // stdin is fed on its own thread so a full stdout pipe can't stall ledger
        let (output, written) = std::thread::scope(|s| {
            let writer = input.map(|(text, mut pipe)| {
                s.spawn(move || {
                    // dropping the pipe afterwards closes ledger's stdin
                    match pipe.write_all(text.as_bytes()) {
                        // ledger quit early; its exit status and stderr say why
                        Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
                        other => other,
                    }
                })
            });
            let output = child.wait_with_output();
            let written = match writer {
                Some(handle) => handle.join().unwrap_or_else(|_| {
                    Err(std::io::Error::new(
                        std::io::ErrorKind::Other,
                        "stdin writer panicked",
                    ))
                }),
                None => Ok(()),
            };
            (output, written)
        });
        let output = output?;
        written?;
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !output.status.success() {
            return Err(LedgerError::EngineInvocation {
                message: format!("{} exited with {}", self.program.display(), output.status),
                stderr,
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Formatting options plus the engine they are used with. This is the
/// context handed to everything that has to talk to ledger-cli.
#[derive(Debug, Clone)]
pub struct Ledger<E = LedgerCli> {
    pub options: Options,
    pub engine: E,
}

impl Ledger<LedgerCli> {
    pub fn new(options: Options) -> Self {
        Ledger {
            options,
            engine: LedgerCli::from_env(),
        }
    }
}

/// The `en` preset with the binary named by `LEDGER_BIN`, like [`Ledger::new`].
impl Default for Ledger<LedgerCli> {
    fn default() -> Self {
        Ledger::new(Options::default())
    }
}

impl<E: Engine> Ledger<E> {
    pub fn with_engine(options: Options, engine: E) -> Self {
        Ledger { options, engine }
    }

    pub fn run(&self, args: &[String], stdin: Option<&str>) -> Result<String> {
        self.options.run(&self.engine, args, stdin)
    }
}
