/// The issuing party. Legal identifiers are `None` when not provided;
/// the rendered footer only carries the ones that are present.
#[derive(Debug, Clone, PartialEq)]
pub struct Company {
    pub name: String,
    pub address: String,
    pub email: String,
    pub phone: String,
    pub website: Option<String>,
    pub siret: Option<String>,
    pub vat_number: Option<String>,
    pub iban: Option<String>,
    pub bic: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Client {
    pub name: String,
    pub address: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuoteItem {
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
}

impl QuoteItem {
    /// Line total, always derived from quantity and unit price.
    pub fn total(&self) -> f64 {
        self.quantity * self.unit_price
    }
}

/// A validated quote record. Constructed through
/// [`QuoteInput::validate`](crate::QuoteInput::validate) and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub number: String,
    pub issue_date: String,
    pub due_date: String,
    pub company: Company,
    pub client: Client,
    pub items: Vec<QuoteItem>,
    pub tax_rate: f64,
    pub notes: Option<String>,
    pub status: String,
    pub payment_terms: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    pub subtotal: f64,
    pub tax_amount: f64,
    pub total: f64,
}

impl Quote {
    /// Computes the monetary totals from the item sequence, summing in
    /// input order so the result is reproducible.
    pub fn totals(&self) -> Totals {
        let subtotal: f64 = self.items.iter().map(QuoteItem::total).sum();
        let tax_amount = subtotal * self.tax_rate;
        Totals { subtotal, tax_amount, total: subtotal + tax_amount }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote_with_items(items: Vec<QuoteItem>, tax_rate: f64) -> Quote {
        Quote {
            number: "Q-001".into(),
            issue_date: "2024-01-01".into(),
            due_date: "2024-01-31".into(),
            company: Company {
                name: "Elios".into(),
                address: "1 rue de la Paix, Paris".into(),
                email: "contact@elios.fr".into(),
                phone: "+33 1 00 00 00 00".into(),
                website: None,
                siret: None,
                vat_number: None,
                iban: None,
                bic: None,
            },
            client: Client {
                name: "ACME".into(),
                address: "2 avenue du Client, Lyon".into(),
                email: "achats@acme.fr".into(),
                phone: "+33 4 00 00 00 00".into(),
            },
            items,
            tax_rate,
            notes: None,
            status: crate::DEFAULT_STATUS.into(),
            payment_terms: Some(crate::DEFAULT_PAYMENT_TERMS.into()),
        }
    }

    #[test]
    fn item_total_is_derived() {
        let item = QuoteItem { description: "Service A".into(), quantity: 2.0, unit_price: 100.0 };
        assert_eq!(item.total(), 200.0);
    }

    #[test]
    fn totals_follow_the_item_order() {
        let quote = quote_with_items(
            vec![
                QuoteItem { description: "Service A".into(), quantity: 2.0, unit_price: 100.0 },
                QuoteItem { description: "Service B".into(), quantity: 1.0, unit_price: 50.0 },
            ],
            0.2,
        );
        let totals = quote.totals();
        assert_eq!(totals.subtotal, 250.0);
        assert_eq!(totals.tax_amount, 50.0);
        assert_eq!(totals.total, 300.0);
        assert_eq!(totals.total - totals.subtotal - totals.tax_amount, 0.0);
    }

    #[test]
    fn zero_tax_rate_yields_no_tax() {
        let quote = quote_with_items(
            vec![QuoteItem { description: "Conseil".into(), quantity: 3.0, unit_price: 10.0 }],
            0.0,
        );
        let totals = quote.totals();
        assert_eq!(totals.tax_amount, 0.0);
        assert_eq!(totals.total, totals.subtotal);
    }
}
