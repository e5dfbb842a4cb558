//! A ledger journal file: its transactions and where they came from.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{
    engine::Ledger,
    error::{LedgerError, Result},
    formats::{ledger::journal_text, xml::LedgerXml},
    model::{Accounts, Transaction},
    options::Options,
    traits::{Engine, ReadFormat},
};

#[derive(Debug, Clone, Default)]
pub struct Journal {
    pub transactions: Vec<Transaction>,
    path: Option<PathBuf>,
}

/// Journals are equal when they hold equal transactions; the file they were
/// loaded from doesn't matter.
impl PartialEq for Journal {
    fn eq(&self, other: &Self) -> bool {
        self.transactions == other.transactions
    }
}

impl Journal {
    /// An empty in-memory journal. It can't be saved, see [`Journal::save`].
    pub fn new() -> Self {
        Journal::default()
    }

    pub fn open<E: Engine>(path: impl AsRef<Path>, ledger: &Ledger<E>) -> Result<Self> {
        let no_args: &[&str] = &[];
        Journal::load(path, no_args, ledger)
    }

    /// Loads `path` through `ledger xml`. `ledger_args` are passed on to
    /// ledger-cli before the `xml` command, e.g. `["-p", "2010/12/20"]` to
    /// load only some transactions.
    pub fn load<E, S>(path: impl AsRef<Path>, ledger_args: &[S], ledger: &Ledger<E>) -> Result<Self>
    where
        E: Engine,
        S: AsRef<str>,
    {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LedgerError::FileNotFound(path.to_path_buf()));
        }

        let mut args = vec!["-f".to_string(), path.to_string_lossy().into_owned()];
        args.extend(ledger_args.iter().map(|a| a.as_ref().to_string()));
        args.push("xml".to_string());

        let xml = ledger.run(&args, None)?;
        let mut journal = Journal::from_xml(xml.as_bytes(), &ledger.options)?;
        journal.path = Some(path.to_path_buf());
        debug!(path = %path.display(), transactions = journal.transactions.len(), "journal loaded");
        Ok(journal)
    }

    /// A journal from an XML export that is already at hand. It has no path.
    pub fn from_xml<R: BufRead>(r: R, options: &Options) -> Result<Self> {
        Ok(Journal {
            transactions: LedgerXml::read(r, options)?,
            path: None,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The journal as ledger text. With `pretty_print` the text goes through
    /// `ledger print` first; if that fails the unformatted text is returned.
    pub fn serialize<E: Engine>(&self, pretty_print: bool, ledger: &Ledger<E>) -> Result<String> {
        let text = journal_text(&self.transactions, &ledger.options)?;
        if !pretty_print {
            return Ok(text);
        }

        let args = ["-f", "-", "print"].map(String::from);
        match ledger.run(&args, Some(&text)) {
            Ok(printed) => {
                let mut out = printed
                    .lines()
                    .map(str::trim_end)
                    .collect::<Vec<_>>()
                    .join("\n");
                let trimmed = out.trim_end_matches('\n').len();
                out.truncate(trimmed);
                out.push('\n');
                Ok(out)
            }
            Err(e) => {
                warn!(error = %e, "couldn't format journal, writing it unformatted");
                Ok(text)
            }
        }
    }

    /// Overwrites the file the journal was loaded from.
    pub fn save<E: Engine>(&self, ledger: &Ledger<E>) -> Result<()> {
        let path = self.path.as_ref().ok_or(LedgerError::NoAssociatedPath)?;
        let text = self.serialize(true, ledger)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Transactions with at least one posting to any of `accounts`, in
    /// journal order.
    pub fn transactions_with_account<'a>(
        &self,
        accounts: impl Into<Accounts<'a>>,
    ) -> Vec<&Transaction> {
        let accounts = accounts.into().to_set();
        self.transactions
            .iter()
            .filter(|tx| tx.has_posting_to(&accounts))
            .collect()
    }
}
