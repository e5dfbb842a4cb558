//! Domain model of a ledger journal: transactions made of postings.

use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Tag/value pairs attached with `; key: value` comments. Keeps insertion
/// order for output; compares as a map.
pub type Metadata = IndexMap<String, String>;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum State {
    #[default]
    Cleared,
    Pending,
}

impl State {
    pub fn glyph(self) -> char {
        match self {
            State::Cleared => '*',
            State::Pending => '!',
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            State::Cleared => "cleared",
            State::Pending => "pending",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Posting {
    pub account: String,
    pub currency: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    /// When set, ledger-cli checks the account balance after this posting.
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub balance_assignment: Option<Decimal>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Posting {
    pub fn new(account: impl Into<String>, currency: impl Into<String>, amount: Decimal) -> Self {
        Posting {
            account: account.into(),
            currency: currency.into(),
            amount,
            balance_assignment: None,
            metadata: Metadata::new(),
        }
    }

    pub fn with_balance_assignment(mut self, balance: Decimal) -> Self {
        self.balance_assignment = Some(balance);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub date: NaiveDate,
    #[serde(default)]
    pub state: State,
    pub payee: String,
    #[serde(default)]
    pub metadata: Metadata,
    pub postings: Vec<Posting>,
}

impl Transaction {
    pub fn new(date: NaiveDate, payee: impl Into<String>, postings: Vec<Posting>) -> Self {
        Transaction {
            date,
            state: State::Cleared,
            payee: payee.into(),
            metadata: Metadata::new(),
            postings,
        }
    }

    pub fn with_state(mut self, state: State) -> Self {
        self.state = state;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// First posting booked to one of `accounts`. Candidates are tried in the
    /// given order, so `["B", "A"]` prefers a posting to `B` even when a
    /// posting to `A` comes first in the transaction.
    pub fn posting_for_accounts<'a>(&self, accounts: impl Into<Accounts<'a>>) -> Option<&Posting> {
        let idx = self.posting_index(&accounts.into())?;
        self.postings.get(idx)
    }

    pub fn posting_for_accounts_mut<'a>(
        &mut self,
        accounts: impl Into<Accounts<'a>>,
    ) -> Option<&mut Posting> {
        let idx = self.posting_index(&accounts.into())?;
        self.postings.get_mut(idx)
    }

    pub fn has_posting_to(&self, accounts: &HashSet<&str>) -> bool {
        self.postings
            .iter()
            .any(|p| accounts.contains(p.account.as_str()))
    }

    fn posting_index(&self, accounts: &Accounts<'_>) -> Option<usize> {
        accounts.iter().find_map(|candidate| {
            self.postings
                .iter()
                .position(|p| p.account == candidate)
        })
    }
}

/// One or more account names, as accepted by the account lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Accounts<'a>(Vec<&'a str>);

impl<'a> Accounts<'a> {
    pub fn iter(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.0.iter().copied()
    }

    pub fn to_set(&self) -> HashSet<&'a str> {
        self.0.iter().copied().collect()
    }
}

impl<'a> From<&'a str> for Accounts<'a> {
    fn from(account: &'a str) -> Self {
        Accounts(vec![account])
    }
}

impl<'a> From<&'a String> for Accounts<'a> {
    fn from(account: &'a String) -> Self {
        Accounts(vec![account.as_str()])
    }
}

impl<'a, S: AsRef<str>> From<&'a [S]> for Accounts<'a> {
    fn from(accounts: &'a [S]) -> Self {
        Accounts(accounts.iter().map(AsRef::as_ref).collect())
    }
}

impl<'a, S: AsRef<str>, const N: usize> From<&'a [S; N]> for Accounts<'a> {
    fn from(accounts: &'a [S; N]) -> Self {
        Accounts(accounts.iter().map(AsRef::as_ref).collect())
    }
}

impl<'a, S: AsRef<str>> From<&'a Vec<S>> for Accounts<'a> {
    fn from(accounts: &'a Vec<S>) -> Self {
        Accounts(accounts.iter().map(AsRef::as_ref).collect())
    }
}

impl<'a, S: AsRef<str>> From<&'a HashSet<S>> for Accounts<'a> {
    fn from(accounts: &'a HashSet<S>) -> Self {
        Accounts(accounts.iter().map(AsRef::as_ref).collect())
    }
}

impl<'a, S: AsRef<str>> From<&'a BTreeSet<S>> for Accounts<'a> {
    fn from(accounts: &'a BTreeSet<S>) -> Self {
        Accounts(accounts.iter().map(AsRef::as_ref).collect())
    }
}
