//! ledger-cli's XML export (`ledger xml`):
//! `<ledger><transactions><transaction state="cleared"><date/><payee/>
//! <metadata/><postings><posting>...</posting></postings></transaction>...`
//!
//! The document is read into a small element tree first; transactions are
//! picked up at any depth so wrapper elements don't matter.

use crate::{
    error::{LedgerError, Result},
    model::{Metadata, Posting, State, Transaction},
    options::Options,
    traits::{ReadFormat, WriteFormat},
};
use chrono::NaiveDate;
use quick_xml::{
    events::{BytesDecl, BytesStart, BytesText, Event},
    Reader, Writer,
};
use std::io::{BufRead, Write};

/// ledger-cli always writes XML dates like this, whatever `--date-format` says.
pub const WRITTEN_DATE_FORMAT: &str = "%Y/%m/%d";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Follows a `a/b/c` path of first-matching children.
    pub fn path(&self, path: &str) -> Option<&Element> {
        path.split('/').try_fold(self, |node, name| node.child(name))
    }

    pub fn text_at(&self, path: &str) -> Option<&str> {
        self.path(path).map(|e| e.text.as_str())
    }

    pub fn require_text(&self, path: &str) -> Result<&str> {
        self.text_at(path)
            .ok_or_else(|| LedgerError::MissingNode(format!("{}/{}", self.name, path)))
    }

    /// Every element called `name` below (and including) this one, in
    /// document order.
    pub fn descendants<'a>(&'a self, name: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.collect_descendants(name, &mut found);
        found
    }

    fn collect_descendants<'a>(&'a self, name: &str, found: &mut Vec<&'a Element>) {
        if self.name == name {
            found.push(self);
        }
        for c in &self.children {
            c.collect_descendants(name, found);
        }
    }
}

fn xml<E: std::fmt::Display>(e: E) -> LedgerError {
    LedgerError::Xml(e.to_string())
}

fn element_from(e: &BytesStart<'_>) -> Result<Element> {
    let mut el = Element::new(String::from_utf8_lossy(e.local_name().as_ref()));
    for a in e.attributes() {
        let a = a.map_err(xml)?;
        let key = String::from_utf8_lossy(a.key.local_name().as_ref()).into_owned();
        let value = a.unescape_value().map_err(xml)?.into_owned();
        el.attributes.push((key, value));
    }
    Ok(el)
}

/// Reads a whole XML document into its root element.
pub fn parse_document<R: BufRead>(r: R) -> Result<Element> {
    let mut reader = Reader::from_reader(r);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    // closes `el`: attach to the open parent, or it is the root
    fn close(el: Element, stack: &mut [Element], root: &mut Option<Element>) {
        match stack.last_mut() {
            Some(parent) => parent.children.push(el),
            None => {
                if root.is_none() {
                    *root = Some(el);
                }
            }
        }
    }

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => stack.push(element_from(&e)?),
            Ok(Event::Empty(e)) => close(element_from(&e)?, &mut stack, &mut root),
            Ok(Event::Text(t)) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&t.unescape().map_err(xml)?);
                }
            }
            Ok(Event::CData(c)) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Ok(Event::End(_)) => {
                let el = stack
                    .pop()
                    .ok_or_else(|| LedgerError::Xml("unbalanced end tag".into()))?;
                close(el, &mut stack, &mut root);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml(e)),
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(LedgerError::Xml(format!("unclosed element <{}>", open.name)));
    }
    root.ok_or_else(|| LedgerError::MissingNode("document root".into()))
}

fn parse_metadata(node: &Element) -> Result<Metadata> {
    let mut metadata = Metadata::new();
    if let Some(values) = node.child("metadata") {
        for value in values.children("value") {
            let key = value
                .attr("key")
                .ok_or_else(|| LedgerError::MissingNode(format!("{}/metadata/value@key", node.name)))?;
            let text = value.text_at("string").unwrap_or_default();
            metadata.insert(key.to_string(), text.to_string());
        }
    }
    Ok(metadata)
}

impl Posting {
    /// Builds a posting from a `<posting>` element. A balance assignment in
    /// another commodity than the posting amount is rejected.
    pub fn parse_xml(node: &Element, options: &Options) -> Result<Posting> {
        let currency = node
            .text_at("post-amount/amount/commodity/symbol")
            .unwrap_or_default()
            .to_string();

        let balance_assignment = match node.child("balance-assignment") {
            Some(balance) => {
                let assignment = balance.text_at("commodity/symbol").unwrap_or_default();
                if assignment != currency {
                    return Err(LedgerError::CurrencyMismatch {
                        posting: currency,
                        assignment: assignment.to_string(),
                    });
                }
                Some(options.parse_amount(balance.require_text("quantity")?)?)
            }
            None => None,
        };

        Ok(Posting {
            account: node.require_text("account/name")?.to_string(),
            amount: options.parse_amount(node.require_text("post-amount/amount/quantity")?)?,
            currency,
            balance_assignment,
            metadata: parse_metadata(node)?,
        })
    }
}

fn parse_state(node: &Element) -> Result<State> {
    match node.attr("state") {
        Some("cleared") => Ok(State::Cleared),
        Some("pending") => Ok(State::Pending),
        other => Err(LedgerError::UnknownState(
            other.unwrap_or_default().to_string(),
        )),
    }
}

impl Transaction {
    pub fn parse_xml(node: &Element, options: &Options) -> Result<Transaction> {
        let date_text = node.require_text("date")?;
        // ledger-cli ignores --date-format here; the caller's format is only a fallback
        let date = NaiveDate::parse_from_str(date_text.trim(), WRITTEN_DATE_FORMAT)
            .or_else(|_| options.parse_date(date_text))
            .map_err(|_| LedgerError::MalformedDate(date_text.to_string()))?;

        let postings = match node.child("postings") {
            Some(postings) => postings
                .children("posting")
                .map(|p| Posting::parse_xml(p, options))
                .collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };

        Ok(Transaction {
            date,
            state: parse_state(node)?,
            payee: node.require_text("payee")?.to_string(),
            metadata: parse_metadata(node)?,
            postings,
        })
    }
}

pub struct LedgerXml;

impl ReadFormat for LedgerXml {
    fn read<R: BufRead>(r: R, options: &Options) -> Result<Vec<Transaction>> {
        let root = parse_document(r)?;
        root.descendants("transaction")
            .into_iter()
            .map(|tx| Transaction::parse_xml(tx, options))
            .collect()
    }
}

/* ------------------------------- WRITE ---------------------------------- */

impl WriteFormat for LedgerXml {
    fn write<W: Write>(mut w: W, transactions: &[Transaction], options: &Options) -> Result<()> {
        let mut wr = Writer::new_with_indent(&mut w, b' ', 2);

        wr.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .map_err(xml)?;
        wr.write_event(Event::Start(BytesStart::new("ledger")))
            .map_err(xml)?;
        wr.write_event(Event::Start(BytesStart::new("transactions")))
            .map_err(xml)?;

        for tx in transactions {
            write_transaction(&mut wr, tx, options).map_err(xml)?;
        }

        wr.write_event(Event::End(BytesStart::new("transactions").to_end()))
            .map_err(xml)?;
        wr.write_event(Event::End(BytesStart::new("ledger").to_end()))
            .map_err(xml)?;
        Ok(())
    }
}

fn write_text<W: Write>(
    wr: &mut Writer<W>,
    name: &str,
    text: &str,
) -> std::result::Result<(), quick_xml::Error> {
    wr.write_event(Event::Start(BytesStart::new(name)))?;
    wr.write_event(Event::Text(BytesText::new(text)))?;
    wr.write_event(Event::End(BytesStart::new(name).to_end()))?;
    Ok(())
}

fn write_commodity_amount<W: Write>(
    wr: &mut Writer<W>,
    currency: &str,
    quantity: &str,
) -> std::result::Result<(), quick_xml::Error> {
    wr.write_event(Event::Start(BytesStart::new("commodity")))?;
    write_text(wr, "symbol", currency)?;
    wr.write_event(Event::End(BytesStart::new("commodity").to_end()))?;
    write_text(wr, "quantity", quantity)
}

fn write_metadata<W: Write>(
    wr: &mut Writer<W>,
    metadata: &Metadata,
) -> std::result::Result<(), quick_xml::Error> {
    if metadata.is_empty() {
        return Ok(());
    }
    wr.write_event(Event::Start(BytesStart::new("metadata")))?;
    for (key, value) in metadata {
        wr.write_event(Event::Start(
            BytesStart::new("value").with_attributes([("key", key.as_str())]),
        ))?;
        write_text(wr, "string", value)?;
        wr.write_event(Event::End(BytesStart::new("value").to_end()))?;
    }
    wr.write_event(Event::End(BytesStart::new("metadata").to_end()))?;
    Ok(())
}

fn write_posting<W: Write>(
    wr: &mut Writer<W>,
    p: &Posting,
    options: &Options,
) -> std::result::Result<(), quick_xml::Error> {
    wr.write_event(Event::Start(BytesStart::new("posting")))?;

    wr.write_event(Event::Start(BytesStart::new("account")))?;
    write_text(wr, "name", &p.account)?;
    wr.write_event(Event::End(BytesStart::new("account").to_end()))?;

    // <post-amount><amount><commodity><symbol/></commodity><quantity/></amount></post-amount>
    wr.write_event(Event::Start(BytesStart::new("post-amount")))?;
    wr.write_event(Event::Start(BytesStart::new("amount")))?;
    write_commodity_amount(wr, &p.currency, &options.format_amount(p.amount))?;
    wr.write_event(Event::End(BytesStart::new("amount").to_end()))?;
    wr.write_event(Event::End(BytesStart::new("post-amount").to_end()))?;

    if let Some(balance) = p.balance_assignment {
        wr.write_event(Event::Start(BytesStart::new("balance-assignment")))?;
        write_commodity_amount(wr, &p.currency, &options.format_amount(balance))?;
        wr.write_event(Event::End(BytesStart::new("balance-assignment").to_end()))?;
    }

    write_metadata(wr, &p.metadata)?;

    wr.write_event(Event::End(BytesStart::new("posting").to_end()))?;
    Ok(())
}

fn write_transaction<W: Write>(
    wr: &mut Writer<W>,
    tx: &Transaction,
    options: &Options,
) -> std::result::Result<(), quick_xml::Error> {
    wr.write_event(Event::Start(
        BytesStart::new("transaction").with_attributes([("state", tx.state.as_str())]),
    ))?;

    let date = tx.date.format(WRITTEN_DATE_FORMAT).to_string();
    write_text(wr, "date", &date)?;
    write_text(wr, "payee", &tx.payee)?;
    write_metadata(wr, &tx.metadata)?;

    wr.write_event(Event::Start(BytesStart::new("postings")))?;
    for p in &tx.postings {
        write_posting(wr, p, options)?;
    }
    wr.write_event(Event::End(BytesStart::new("postings").to_end()))?;

    wr.write_event(Event::End(BytesStart::new("transaction").to_end()))?;
    Ok(())
}
