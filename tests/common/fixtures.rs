use devis_model::{Quote, QuoteInput};
use serde_json::{Value, json};

/// The reference record: one item of 2 × 100.00 at 20% tax.
pub fn sample_quote() -> Value {
    json!({
        "number": "Q-001",
        "issue_date": "2024-01-01",
        "due_date": "2024-01-31",
        "company": {
            "name": "Elios",
            "address": "1 rue de la Paix, Paris",
            "email": "contact@elios.fr",
            "phone": "+33 1 00 00 00 00"
        },
        "client": {
            "name": "ACME",
            "address": "2 avenue du Client, Lyon",
            "email": "achats@acme.fr",
            "phone": "+33 4 00 00 00 00"
        },
        "items": [
            { "description": "Service A", "quantity": 2, "unit_price": 100.0 }
        ],
        "tax_rate": 0.2
    })
}

pub fn parse_quote(value: Value) -> Quote {
    let input: QuoteInput = serde_json::from_value(value).expect("fixture deserializes");
    input.validate().expect("fixture validates")
}
