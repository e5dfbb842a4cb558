//! Locale-dependent formatting rules and the matching ledger-cli flags.

use std::fmt::{self, Write as _};
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::{
    error::{LedgerError, Result},
    traits::Engine,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    De,
}

impl FromStr for Locale {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "de" => Ok(Locale::De),
            _ => Err(LedgerError::UnsupportedLocale(s.to_string())),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::En => f.write_str("en"),
            Locale::De => f.write_str("de"),
        }
    }
}

/// How dates and amounts are written, and how ledger-cli has to be called so
/// that it reads and prints them the same way.
///
/// There is no global instance: every codec call takes the options it should
/// use. `Options::default()` is the `en` preset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Options {
    /// strftime pattern, e.g. `%Y/%m/%d`.
    pub date_format: String,
    /// `true` uses `,` as decimal separator, otherwise `.`.
    pub decimal_comma: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options::locale(Locale::En)
    }
}

impl Options {
    pub fn new(date_format: impl Into<String>, decimal_comma: bool) -> Self {
        Options {
            date_format: date_format.into(),
            decimal_comma,
        }
    }

    pub fn locale(locale: Locale) -> Self {
        match locale {
            Locale::En => Options::new("%Y/%m/%d", false),
            Locale::De => Options::new("%d.%m.%Y", true),
        }
    }

    /// Preset for a locale tag (`en`, `de`).
    pub fn for_locale(tag: &str) -> Result<Self> {
        Ok(Options::locale(tag.parse()?))
    }

    pub fn decimal_separator(&self) -> char {
        if self.decimal_comma {
            ','
        } else {
            '.'
        }
    }

    /// Parses a decimal written with this locale's separator. With a decimal
    /// comma, dots are thousands separators and get dropped.
    pub fn parse_amount(&self, text: &str) -> Result<Decimal> {
        let trimmed = text.trim();
        let canonical = if self.decimal_comma {
            trimmed.replace('.', "").replace(',', ".")
        } else {
            trimmed.to_string()
        };
        Decimal::from_str_exact(&canonical)
            .map_err(|_| LedgerError::MalformedAmount(text.to_string()))
    }

    pub fn format_amount(&self, amount: Decimal) -> String {
        let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let s = format!("{rounded:.2}");
        if self.decimal_comma {
            s.replace('.', ",")
        } else {
            s
        }
    }

    pub fn format_date(&self, date: NaiveDate) -> Result<String> {
        let mut out = String::new();
        // DelayedFormat reports bad patterns through fmt::Error instead of panicking here
        write!(out, "{}", date.format(&self.date_format))
            .map_err(|_| LedgerError::InvalidDateFormat(self.date_format.clone()))?;
        Ok(out)
    }

    pub fn parse_date(&self, text: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(text.trim(), &self.date_format)
            .map_err(|_| LedgerError::MalformedDate(text.to_string()))
    }

    /// Flags that make ledger-cli read and print dates and amounts the way
    /// these options do.
    pub fn engine_args(&self) -> Vec<String> {
        let mut args = vec![
            "--args-only".to_string(),
            "--date-format".to_string(),
            self.date_format.clone(),
            "--input-date-format".to_string(),
            self.date_format.clone(),
        ];
        if self.decimal_comma {
            args.push("--decimal-comma".to_string());
        }
        args
    }

    /// Runs the engine with these options, returning its stdout.
    pub fn run<E: Engine + ?Sized>(
        &self,
        engine: &E,
        args: &[String],
        stdin: Option<&str>,
    ) -> Result<String> {
        engine.run(self, args, stdin)
    }
}
