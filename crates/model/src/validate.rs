use serde::{Deserialize, Deserializer, Serialize, de};
use thiserror::Error;

use crate::quote::{Client, Company, Quote, QuoteItem};

/// The raw, unvalidated input shape. Every field is optional so that a
/// missing field surfaces as a violation instead of a deserialization
/// failure, and the whole record can be checked in one pass.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuoteInput {
    pub number: Option<String>,
    pub issue_date: Option<String>,
    pub due_date: Option<String>,
    pub company: Option<CompanyInput>,
    pub client: Option<ClientInput>,
    pub items: Option<Vec<ItemInput>>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub tax_rate: Option<f64>,
    pub notes: Option<String>,
    pub status: Option<String>,
    pub payment_terms: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyInput {
    pub name: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub siret: Option<String>,
    pub vat_number: Option<String>,
    pub iban: Option<String>,
    pub bic: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientInput {
    pub name: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemInput {
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub quantity: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub unit_price: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCode {
    Missing,
    TooShort,
    OutOfRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: String,
    pub code: ViolationCode,
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// The complete set of constraint violations found in one record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid quote record: {}", .violations.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl QuoteInput {
    /// Checks every constraint and either returns the validated record
    /// or the full list of violations.
    pub fn validate(self) -> Result<Quote, ValidationError> {
        let violations = self.check();
        if violations.is_empty() {
            Ok(self.into_quote())
        } else {
            Err(ValidationError { violations })
        }
    }

    fn check(&self) -> Vec<Violation> {
        let mut checker = Checker::default();
        checker.required_str("number", self.number.as_deref(), 1);
        checker.required_str("issue_date", self.issue_date.as_deref(), 1);
        checker.required_str("due_date", self.due_date.as_deref(), 1);

        match &self.company {
            None => checker.missing("company"),
            Some(company) => {
                checker.required_str("company.name", company.name.as_deref(), 1);
                checker.required_str("company.address", company.address.as_deref(), 1);
                checker.required_str("company.email", company.email.as_deref(), 3);
                checker.required_str("company.phone", company.phone.as_deref(), 3);
            }
        }
        match &self.client {
            None => checker.missing("client"),
            Some(client) => {
                checker.required_str("client.name", client.name.as_deref(), 1);
                checker.required_str("client.address", client.address.as_deref(), 1);
                checker.required_str("client.email", client.email.as_deref(), 3);
                checker.required_str("client.phone", client.phone.as_deref(), 3);
            }
        }

        match &self.items {
            None => checker.missing("items"),
            Some(items) => {
                for (index, item) in items.iter().enumerate() {
                    checker.required_str(
                        &format!("items[{index}].description"),
                        item.description.as_deref(),
                        1,
                    );
                    match item.quantity {
                        None => checker.missing(&format!("items[{index}].quantity")),
                        Some(quantity) if quantity <= 0.0 => checker.out_of_range(
                            &format!("items[{index}].quantity"),
                            "must be greater than 0",
                        ),
                        Some(_) => {}
                    }
                    match item.unit_price {
                        None => checker.missing(&format!("items[{index}].unit_price")),
                        Some(price) if price < 0.0 => checker.out_of_range(
                            &format!("items[{index}].unit_price"),
                            "must not be negative",
                        ),
                        Some(_) => {}
                    }
                }
            }
        }

        if let Some(rate) = self.tax_rate {
            if rate < 0.0 {
                checker.out_of_range("tax_rate", "must not be negative");
            }
        }
        checker.violations
    }

    /// Builds the validated record. Only called once `check` found no
    /// violations, so the defaults below never mask a missing required
    /// field.
    fn into_quote(self) -> Quote {
        let company = self.company.unwrap_or_default();
        let client = self.client.unwrap_or_default();
        Quote {
            number: self.number.unwrap_or_default(),
            issue_date: self.issue_date.unwrap_or_default(),
            due_date: self.due_date.unwrap_or_default(),
            company: Company {
                name: company.name.unwrap_or_default(),
                address: company.address.unwrap_or_default(),
                email: company.email.unwrap_or_default(),
                phone: company.phone.unwrap_or_default(),
                website: normalize_optional(company.website),
                siret: normalize_optional(company.siret),
                vat_number: normalize_optional(company.vat_number),
                iban: normalize_optional(company.iban),
                bic: normalize_optional(company.bic),
            },
            client: Client {
                name: client.name.unwrap_or_default(),
                address: client.address.unwrap_or_default(),
                email: client.email.unwrap_or_default(),
                phone: client.phone.unwrap_or_default(),
            },
            items: self
                .items
                .unwrap_or_default()
                .into_iter()
                .map(|item| QuoteItem {
                    description: item.description.unwrap_or_default(),
                    quantity: item.quantity.unwrap_or_default(),
                    unit_price: item.unit_price.unwrap_or_default(),
                })
                .collect(),
            tax_rate: self.tax_rate.unwrap_or(crate::DEFAULT_TAX_RATE),
            notes: normalize_optional(self.notes),
            status: normalize_optional(self.status)
                .unwrap_or_else(|| crate::DEFAULT_STATUS.to_string()),
            payment_terms: match self.payment_terms {
                None => Some(crate::DEFAULT_PAYMENT_TERMS.to_string()),
                Some(terms) => normalize_optional(Some(terms)),
            },
        }
    }
}

/// An empty optional string means the same as an absent one.
fn normalize_optional(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

#[derive(Default)]
struct Checker {
    violations: Vec<Violation>,
}

impl Checker {
    fn missing(&mut self, field: &str) {
        self.violations.push(Violation {
            field: field.to_string(),
            code: ViolationCode::Missing,
            message: "is required".to_string(),
        });
    }

    fn required_str(&mut self, field: &str, value: Option<&str>, min_len: usize) {
        match value {
            None => self.missing(field),
            Some(s) if s.chars().count() < min_len => self.violations.push(Violation {
                field: field.to_string(),
                code: ViolationCode::TooShort,
                message: if min_len == 1 {
                    "must not be empty".to_string()
                } else {
                    format!("must be at least {min_len} characters")
                },
            }),
            Some(_) => {}
        }
    }

    fn out_of_range(&mut self, field: &str, message: &str) {
        self.violations.push(Violation {
            field: field.to_string(),
            code: ViolationCode::OutOfRange,
            message: message.to_string(),
        });
    }
}

/// Accepts a JSON number or a numeric string, matching the loose
/// coercion of the upstream record format.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid number: {s:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_input() -> serde_json::Value {
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

    fn parse(value: serde_json::Value) -> Result<Quote, ValidationError> {
        let input: QuoteInput = serde_json::from_value(value).unwrap();
        input.validate()
    }

    #[test]
    fn accepts_a_complete_record() {
        let quote = parse(valid_input()).unwrap();
        assert_eq!(quote.number, "Q-001");
        assert_eq!(quote.items.len(), 1);
        assert_eq!(quote.items[0].total(), 200.0);
        assert_eq!(quote.tax_rate, 0.2);
    }

    #[test]
    fn applies_defaults_when_optionals_are_omitted() {
        let mut value = valid_input();
        value.as_object_mut().unwrap().remove("tax_rate");
        let quote = parse(value).unwrap();
        assert_eq!(quote.status, crate::DEFAULT_STATUS);
        assert_eq!(quote.tax_rate, crate::DEFAULT_TAX_RATE);
        assert_eq!(quote.notes, None);
        assert_eq!(quote.payment_terms.as_deref(), Some(crate::DEFAULT_PAYMENT_TERMS));
    }

    #[test]
    fn reports_every_violation_at_once() {
        let mut value = valid_input();
        value["company"]["name"] = json!("");
        value["items"][0]["quantity"] = json!(0);
        value["tax_rate"] = json!(-0.1);
        let error = parse(value).unwrap_err();

        let fields: Vec<&str> = error.violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, ["company.name", "items[0].quantity", "tax_rate"]);
        assert_eq!(error.violations[0].code, ViolationCode::TooShort);
        assert_eq!(error.violations[1].code, ViolationCode::OutOfRange);
        assert_eq!(error.violations[2].code, ViolationCode::OutOfRange);
    }

    #[test]
    fn reports_missing_required_sections() {
        let error = parse(json!({})).unwrap_err();
        let fields: Vec<&str> = error.violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, ["number", "issue_date", "due_date", "company", "client", "items"]);
        assert!(error.violations.iter().all(|v| v.code == ViolationCode::Missing));
    }

    #[test]
    fn enforces_minimum_lengths_for_contact_fields() {
        let mut value = valid_input();
        value["client"]["email"] = json!("ab");
        let error = parse(value).unwrap_err();
        assert_eq!(error.violations.len(), 1);
        assert_eq!(error.violations[0].field, "client.email");
        assert_eq!(error.violations[0].code, ViolationCode::TooShort);
    }

    #[test]
    fn empty_optional_strings_behave_like_absent_ones() {
        let mut value = valid_input();
        value["company"]["website"] = json!("");
        value["company"]["siret"] = json!("");
        value["notes"] = json!("");
        value["status"] = json!("");
        value["payment_terms"] = json!("");
        let quote = parse(value).unwrap();
        assert_eq!(quote.company.website, None);
        assert_eq!(quote.company.siret, None);
        assert_eq!(quote.notes, None);
        assert_eq!(quote.status, crate::DEFAULT_STATUS);
        assert_eq!(quote.payment_terms, None);
    }

    #[test]
    fn coerces_numeric_strings() {
        let mut value = valid_input();
        value["items"][0]["quantity"] = json!("2");
        value["tax_rate"] = json!("0.1");
        let quote = parse(value).unwrap();
        assert_eq!(quote.items[0].quantity, 2.0);
        assert_eq!(quote.tax_rate, 0.1);
    }

    #[test]
    fn rejects_an_unparseable_numeric_string() {
        let mut value = valid_input();
        value["tax_rate"] = json!("a lot");
        let result = serde_json::from_value::<QuoteInput>(value);
        assert!(result.is_err());
    }

    #[test]
    fn zero_unit_price_is_allowed() {
        let mut value = valid_input();
        value["items"][0]["unit_price"] = json!(0);
        let quote = parse(value).unwrap();
        assert_eq!(quote.items[0].unit_price, 0.0);
    }

    #[test]
    fn error_display_lists_every_violation() {
        let mut value = valid_input();
        value["company"]["name"] = json!("");
        value["tax_rate"] = json!(-0.1);
        let error = parse(value).unwrap_err();
        let message = error.to_string();
        assert!(message.contains("company.name"));
        assert!(message.contains("tax_rate"));
    }
}
