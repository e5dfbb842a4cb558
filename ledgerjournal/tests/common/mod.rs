#![allow(dead_code)]

use std::cell::RefCell;

use chrono::NaiveDate;
use ledgerjournal::{
    error::{LedgerError, Result},
    journal::Journal,
    model::{Posting, State, Transaction},
    options::Options,
    traits::Engine,
};
use rust_decimal::Decimal;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str_exact(s).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Stands in for ledger-cli: answers every call with the same canned stdout
/// (or failure) and remembers what it was asked.
pub struct StubEngine {
    response: std::result::Result<String, String>,
    pub calls: RefCell<Vec<Call>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub args: Vec<String>,
    pub stdin: Option<String>,
}

impl StubEngine {
    pub fn answering(stdout: impl Into<String>) -> Self {
        StubEngine {
            response: Ok(stdout.into()),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn failing(stderr: impl Into<String>) -> Self {
        StubEngine {
            response: Err(stderr.into()),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn last_call(&self) -> Call {
        self.calls.borrow().last().cloned().expect("engine was not called")
    }
}

impl Engine for StubEngine {
    fn run(&self, options: &Options, args: &[String], stdin: Option<&str>) -> Result<String> {
        let mut full = options.engine_args();
        full.extend(args.iter().cloned());
        self.calls.borrow_mut().push(Call {
            args: full,
            stdin: stdin.map(str::to_string),
        });
        match &self.response {
            Ok(stdout) => Ok(stdout.clone()),
            Err(stderr) => Err(LedgerError::EngineInvocation {
                message: "stub exited with 1".into(),
                stderr: stderr.clone(),
            }),
        }
    }
}

pub fn example_journal_en() -> Journal {
    let mut journal = Journal::new();
    journal.transactions.push(Transaction::new(
        date(2010, 12, 1),
        "Checking balance",
        vec![
            Posting::new("Assets:Checking", "$", dec("1000")),
            Posting::new("Equity:Opening Balances", "$", dec("-1000")),
        ],
    ));
    journal.transactions.push(
        Transaction::new(
            date(2010, 12, 20),
            "Organic Co-op",
            vec![
                Posting::new("Expenses:Food:Groceries", "$", dec("37.50")),
                Posting::new("Assets:Checking", "$", dec("-37.50"))
                    .with_balance_assignment(dec("962.50")),
            ],
        )
        .with_state(State::Pending),
    );
    journal
}

pub const EXAMPLE_JOURNAL_EN: &str = "\
2010/12/01 * Checking balance
    Assets:Checking                        $ 1000.00
    Equity:Opening Balances               $ -1000.00

2010/12/20 ! Organic Co-op
    Expenses:Food:Groceries                  $ 37.50
    Assets:Checking                         $ -37.50 = $ 962.50
";

pub fn example_journal_de() -> Journal {
    let mut journal = Journal::new();
    journal.transactions.push(
        Transaction::new(
            date(2020, 1, 2),
            "Example Payee",
            vec![
                Posting::new("Expenses:Unknown", "EUR", dec("1234.56"))
                    .with_metadata("Foo", "Bar")
                    .with_metadata("Description", "Example Posting"),
                Posting::new("Assets:Checking", "EUR", dec("-1234.56")),
            ],
        )
        .with_metadata("Foo", "Bar")
        .with_metadata("Description", "Example Transaction"),
    );
    journal
}

pub const EXAMPLE_JOURNAL_DE: &str = "\
02.01.2020 * Example Payee
    ; Foo: Bar
    ; Description: Example Transaction
    Expenses:Unknown                     EUR 1234,56
    ; Foo: Bar
    ; Description: Example Posting
    Assets:Checking                     EUR -1234,56
";

/// Ledger XML for the postings of `example_journal_en`, the way ledger-cli
/// nests it (accounts and commodities sections included).
pub const EXAMPLE_JOURNAL_EN_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<ledger version="197888">
  <commodities>
    <commodity flags="PT"><symbol>$</symbol></commodity>
  </commodities>
  <accounts>
    <account id="0x1"><name/><fullname/></account>
  </accounts>
  <transactions>
    <transaction state="cleared">
      <date>2010/12/01</date>
      <payee>Checking balance</payee>
      <postings>
        <posting>
          <account ref="0x2"><name>Assets:Checking</name></account>
          <post-amount>
            <amount><commodity flags="PT"><symbol>$</symbol></commodity><quantity>1000.00</quantity></amount>
          </post-amount>
          <total><amount><commodity flags="PT"><symbol>$</symbol></commodity><quantity>1000.00</quantity></amount></total>
        </posting>
        <posting>
          <account ref="0x3"><name>Equity:Opening Balances</name></account>
          <post-amount>
            <amount><commodity flags="PT"><symbol>$</symbol></commodity><quantity>-1000.00</quantity></amount>
          </post-amount>
        </posting>
      </postings>
    </transaction>
    <transaction state="pending">
      <date>2010/12/20</date>
      <payee>Organic Co-op</payee>
      <postings>
        <posting state="pending">
          <account ref="0x4"><name>Expenses:Food:Groceries</name></account>
          <post-amount>
            <amount><commodity flags="PT"><symbol>$</symbol></commodity><quantity>37.50</quantity></amount>
          </post-amount>
        </posting>
        <posting state="pending">
          <account ref="0x2"><name>Assets:Checking</name></account>
          <post-amount>
            <amount><commodity flags="PT"><symbol>$</symbol></commodity><quantity>-37.50</quantity></amount>
          </post-amount>
          <balance-assignment><commodity flags="PT"><symbol>$</symbol></commodity><quantity>962.50</quantity></balance-assignment>
        </posting>
      </postings>
    </transaction>
  </transactions>
</ledger>
"#;
