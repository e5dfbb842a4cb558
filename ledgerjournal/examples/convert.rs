use ledgerjournal::{
    formats::{ledger::LedgerText, xml::LedgerXml},
    options::Options,
    traits::{ReadFormat, WriteFormat},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // e.g. `ledger -f journal.ledger xml | cargo run --example convert`
    let options = Options::default();
    let transactions = LedgerXml::read(std::io::BufReader::new(std::io::stdin()), &options)?;
    LedgerText::write(std::io::stdout(), &transactions, &options)?;
    Ok(())
}
