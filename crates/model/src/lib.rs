//! The quote record model: validated domain types plus the raw input
//! shape they are parsed from.
//!
//! Input is deserialized into [`QuoteInput`], where every field is
//! optional, then checked as a whole so a single [`ValidationError`]
//! reports every violation at once. Only a fully valid input yields a
//! [`Quote`], which is immutable from then on.

pub mod quote;
pub mod validate;

pub use quote::{Client, Company, Quote, QuoteItem, Totals};
pub use validate::{QuoteInput, ValidationError, Violation, ViolationCode};

/// Status used when the record carries none.
pub const DEFAULT_STATUS: &str = "En attente";
/// Payment terms used when the record carries none.
pub const DEFAULT_PAYMENT_TERMS: &str = "Paiement à 30 jours.";
/// Tax rate used when the record carries none.
pub const DEFAULT_TAX_RATE: f64 = 0.20;
