//! Seams between the codecs and the outside world: reading/writing
//! transactions over std::io::{BufRead, Write}, and the external engine.

use crate::{error::Result, model::Transaction, options::Options};
use std::io::{BufRead, Write};

pub trait ReadFormat {
    fn read<R: BufRead>(r: R, options: &Options) -> Result<Vec<Transaction>>;
}

pub trait WriteFormat {
    fn write<W: Write>(w: W, transactions: &[Transaction], options: &Options) -> Result<()>;
}

/// The external accounting engine (ledger-cli or a stand-in).
///
/// `run` receives the caller's options so the engine can be told which date
/// format and decimal separator to use, followed by the mode arguments
/// (`-f <path> xml`, `-f - print`, ...). It returns captured stdout.
pub trait Engine {
    fn run(&self, options: &Options, args: &[String], stdin: Option<&str>) -> Result<String>;
}

impl<E: Engine + ?Sized> Engine for &E {
    fn run(&self, options: &Options, args: &[String], stdin: Option<&str>) -> Result<String> {
        (**self).run(options, args, stdin)
    }
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    fn run(&self, options: &Options, args: &[String], stdin: Option<&str>) -> Result<String> {
        (**self).run(options, args, stdin)
    }
}
