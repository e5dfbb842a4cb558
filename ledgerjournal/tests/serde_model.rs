mod common;

use common::{date, dec, example_journal_en};
use ledgerjournal::{
    model::{Posting, State, Transaction},
    options::{Locale, Options},
};
use serde_json::json;

#[test]
fn options_and_locale_serde() {
    let de = Options::locale(Locale::De);
    let value = serde_json::to_value(&de).unwrap();
    assert_eq!(value, json!({ "date_format": "%d.%m.%Y", "decimal_comma": true }));
    assert_eq!(serde_json::from_value::<Options>(value).unwrap(), de);

    assert_eq!(serde_json::to_string(&Locale::En).unwrap(), r#""en""#);
    assert_eq!(serde_json::from_str::<Locale>(r#""de""#).unwrap(), Locale::De);
    assert!(serde_json::from_str::<Locale>(r#""fr""#).is_err());
}

#[test]
fn posting_amounts_serialize_as_strings() {
    let posting = Posting::new("Assets:Checking", "EUR", dec("-1234.50"))
        .with_balance_assignment(dec("100.00"))
        .with_metadata("Foo", "Bar");
    let value = serde_json::to_value(&posting).unwrap();
    assert_eq!(value["amount"], json!("-1234.50"));
    assert_eq!(value["balance_assignment"], json!("100.00"));
    assert_eq!(serde_json::from_value::<Posting>(value).unwrap(), posting);

    let bare: Posting = serde_json::from_value(json!({
        "account": "Expenses:Food",
        "currency": "$",
        "amount": "0.1"
    }))
    .unwrap();
    assert_eq!(bare.amount, dec("0.1"));
    assert_eq!(bare.balance_assignment, None);
    assert!(bare.metadata.is_empty());
}

#[test]
fn transactions_survive_json() {
    let tx = Transaction::new(
        date(2020, 1, 2),
        "Payee",
        vec![Posting::new("A", "EUR", dec("1")), Posting::new("B", "EUR", dec("-1"))],
    )
    .with_state(State::Pending);
    let text = serde_json::to_string(&tx).unwrap();
    assert!(text.contains(r#""state":"pending""#));
    assert_eq!(serde_json::from_str::<Transaction>(&text).unwrap(), tx);

    for tx in &example_journal_en().transactions {
        let back: Transaction = serde_json::from_value(serde_json::to_value(tx).unwrap()).unwrap();
        assert_eq!(&back, tx);
    }
}
