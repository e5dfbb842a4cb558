//! Ledger journal text, as written by `ledger print`:
//!
//! ```text
//! 2010/12/20 ! Organic Co-op
//!     Expenses:Food:Groceries                  $ 37.50
//!     Assets:Checking                         $ -37.50 = $ 962.50
//! ```

use crate::{
    error::Result,
    model::{Posting, Transaction},
    options::Options,
    traits::WriteFormat,
};
use std::io::Write;

/// Width of a posting line up to the end of its amount.
pub const AMOUNT_COLUMN: usize = 48;

const INDENT: &str = "    ";

impl Posting {
    /// Posting lines without indentation or trailing newline. Metadata
    /// entries follow the posting line in insertion order.
    pub fn to_ledger(&self, options: &Options) -> String {
        let account = format!("{}   ", self.account);
        let amount = format!("{} {}", self.currency, options.format_amount(self.amount));
        let width = AMOUNT_COLUMN.saturating_sub(account.chars().count());
        let mut line = format!("{account}{amount:>width$}");
        if let Some(balance) = self.balance_assignment {
            line.push_str(&format!(
                " = {} {}",
                self.currency,
                options.format_amount(balance)
            ));
        }

        let mut lines = vec![line];
        lines.extend(self.metadata.iter().map(|(k, v)| format!("; {k}: {v}")));
        lines.join("\n")
    }
}

impl Transaction {
    /// The transaction as journal text, without a trailing newline.
    pub fn to_ledger(&self, options: &Options) -> Result<String> {
        let mut lines = vec![format!(
            "{} {} {}",
            options.format_date(self.date)?,
            self.state.glyph(),
            self.payee
        )];
        lines.extend(
            self.metadata
                .iter()
                .map(|(k, v)| format!("{INDENT}; {k}: {v}")),
        );
        for posting in &self.postings {
            lines.extend(
                posting
                    .to_ledger(options)
                    .lines()
                    .map(|l| format!("{INDENT}{l}")),
            );
        }
        Ok(lines.join("\n"))
    }
}

/// Transactions separated by one blank line; the text ends with a single
/// newline unless there is nothing to write.
pub fn journal_text(transactions: &[Transaction], options: &Options) -> Result<String> {
    let blocks = transactions
        .iter()
        .map(|tx| tx.to_ledger(options))
        .collect::<Result<Vec<_>>>()?;
    if blocks.is_empty() {
        return Ok(String::new());
    }
    let mut text = blocks.join("\n\n");
    text.push('\n');
    Ok(text)
}

pub struct LedgerText;

impl WriteFormat for LedgerText {
    fn write<W: Write>(mut w: W, transactions: &[Transaction], options: &Options) -> Result<()> {
        w.write_all(journal_text(transactions, options)?.as_bytes())?;
        Ok(())
    }
}
