//! ledgerjournal — read and write ledger journal files (ledger-cli's plain
//! text format), using ledger-cli itself for parsing (XML export) and
//! pretty-printing.

pub mod engine;
pub mod error;
pub mod journal;
pub mod model;
pub mod options;
pub mod traits;

pub mod formats {
    pub mod ledger;
    pub mod xml;
}

