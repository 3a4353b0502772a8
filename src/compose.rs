//! Builds the document block sequence for a quote: header with brand
//! mark, the two party blocks, the line-item table, totals, optional
//! notes and the legal/payment footer.

use devis_idf::{Block, SharedData, TableBlock, TableColumn, TableRow, TableStyle};
use devis_model::Quote;
use devis_style::{
    Border, Color, ElementStyle, FontWeight, Margins, PageLayout, Stylesheet, TextAlign,
};

pub const BRAND_NAME: &str = "Elios";

const INK: Color = Color::rgb(0x0F, 0x17, 0x2A);
const MUTED: Color = Color::rgb(0x47, 0x55, 0x69);
const BORDER: Color = Color::rgb(0xE2, 0xE8, 0xF0);
const SOFT: Color = Color::rgb(0xF8, 0xFA, 0xFC);
const MARK_FILL: Color = Color::rgb(0x11, 0x18, 0x27);

/// A4 with 40pt margins plus the named styles the composition uses.
pub fn document_stylesheet() -> Stylesheet {
    let cell_padding = Margins { top: 3.0, right: 6.0, bottom: 3.0, left: 6.0 };
    Stylesheet { page: PageLayout::default(), styles: Default::default() }
        .with_style(
            "brand",
            ElementStyle {
                font_size: Some(24.0),
                font_weight: Some(FontWeight::Bold),
                line_height: Some(24.0),
                color: Some(INK),
                ..Default::default()
            },
        )
        .with_style(
            "meta",
            ElementStyle {
                font_size: Some(10.5),
                line_height: Some(14.0),
                text_align: Some(TextAlign::Right),
                color: Some(MUTED),
                ..Default::default()
            },
        )
        .with_style(
            "meta-strong",
            ElementStyle {
                font_size: Some(10.5),
                font_weight: Some(FontWeight::Bold),
                line_height: Some(14.0),
                text_align: Some(TextAlign::Right),
                color: Some(MUTED),
                ..Default::default()
            },
        )
        .with_style(
            "section",
            ElementStyle {
                font_size: Some(10.5),
                font_weight: Some(FontWeight::Bold),
                line_height: Some(13.0),
                color: Some(INK),
                margin: Some(Margins::vertical(6.0, 4.0)),
                ..Default::default()
            },
        )
        .with_style(
            "body",
            ElementStyle {
                font_size: Some(10.7),
                line_height: Some(14.0),
                color: Some(INK),
                ..Default::default()
            },
        )
        .with_style(
            "body-strong",
            ElementStyle {
                font_size: Some(10.7),
                font_weight: Some(FontWeight::Bold),
                line_height: Some(14.0),
                color: Some(INK),
                ..Default::default()
            },
        )
        .with_style(
            "foot",
            ElementStyle {
                font_size: Some(9.0),
                line_height: Some(12.0),
                color: Some(MUTED),
                ..Default::default()
            },
        )
        .with_style(
            "header-row",
            ElementStyle {
                padding: Some(Margins { top: 0.0, right: 0.0, bottom: 12.0, left: 0.0 }),
                border_bottom: Some(Border { width: 0.6, color: BORDER }),
                ..Default::default()
            },
        )
        .with_style(
            "th",
            ElementStyle {
                font_size: Some(10.0),
                font_weight: Some(FontWeight::Bold),
                line_height: Some(12.0),
                color: Some(Color::WHITE),
                background_color: Some(INK),
                padding: Some(cell_padding),
                ..Default::default()
            },
        )
        .with_style(
            "td",
            ElementStyle {
                font_size: Some(10.0),
                line_height: Some(12.0),
                color: Some(INK),
                padding: Some(cell_padding),
                ..Default::default()
            },
        )
        .with_style(
            "td-num",
            ElementStyle {
                font_size: Some(10.0),
                line_height: Some(12.0),
                text_align: Some(TextAlign::Right),
                color: Some(INK),
                padding: Some(cell_padding),
                ..Default::default()
            },
        )
        .with_style(
            "total-label",
            ElementStyle {
                font_size: Some(10.0),
                line_height: Some(12.0),
                color: Some(INK),
                padding: Some(cell_padding),
                ..Default::default()
            },
        )
        .with_style(
            "total-value",
            ElementStyle {
                font_size: Some(10.0),
                line_height: Some(12.0),
                text_align: Some(TextAlign::Right),
                color: Some(INK),
                padding: Some(cell_padding),
                ..Default::default()
            },
        )
        .with_style(
            "total-label-strong",
            ElementStyle {
                font_size: Some(10.0),
                font_weight: Some(FontWeight::Bold),
                line_height: Some(12.0),
                color: Some(INK),
                padding: Some(cell_padding),
                ..Default::default()
            },
        )
        .with_style(
            "total-value-strong",
            ElementStyle {
                font_size: Some(10.0),
                font_weight: Some(FontWeight::Bold),
                line_height: Some(12.0),
                text_align: Some(TextAlign::Right),
                color: Some(INK),
                padding: Some(cell_padding),
                ..Default::default()
            },
        )
}

/// Two decimals, thousands grouped with a space: 1234.5 -> "1 234.50".
pub fn format_currency(value: f64) -> String {
    let fixed = format!("{value:.2}");
    let (int_part, dec_part) = match fixed.split_once('.') {
        Some(parts) => parts,
        None => (fixed.as_str(), "00"),
    };
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };

    let mut grouped = String::new();
    let count = digits.len();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (count - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    format!("{sign}{grouped}.{dec_part}")
}

fn format_money(value: f64) -> String {
    format!("{} €", format_currency(value))
}

fn format_quantity(value: f64) -> String {
    format!("{value}")
}

pub fn quote_blocks(quote: &Quote, logo: Option<SharedData>) -> Vec<Block> {
    let totals = quote.totals();
    let mut blocks = Vec::new();

    // Header: brand mark and title on the left, the quote metadata
    // right-aligned on the right, a rule under the whole row.
    let mark = match logo {
        Some(data) => Block::Image { data, width: 42.0, height: 42.0 },
        None => Block::VectorMark {
            letter: 'E',
            diameter: 36.0,
            fill: MARK_FILL,
            letter_color: Color::WHITE,
            font_size: 18.0,
        },
    };
    let brand_block = Block::Columns {
        widths: vec![46.0, 180.0],
        cells: vec![
            vec![mark],
            vec![Block::Paragraph { text: BRAND_NAME.into(), style: "brand".into() }],
        ],
        align: TextAlign::Left,
        style: None,
    };
    let meta_block = vec![
        Block::Paragraph {
            text: format!("Devis {}", quote.number),
            style: "meta-strong".into(),
        },
        Block::Paragraph {
            text: format!(
                "Statut: {}\nÉmis le {}\nÉchéance {}",
                quote.status, quote.issue_date, quote.due_date
            ),
            style: "meta".into(),
        },
    ];
    blocks.push(Block::Columns {
        widths: vec![260.0, 200.0],
        cells: vec![vec![brand_block], meta_block],
        align: TextAlign::Center,
        style: Some("header-row".into()),
    });
    blocks.push(Block::Spacer { height: 14.0 });

    // Party details, company left, client right.
    let mut company_lines = vec![
        quote.company.address.clone(),
        format!("Email: {}", quote.company.email),
        format!("Téléphone: {}", quote.company.phone),
    ];
    if let Some(website) = &quote.company.website {
        company_lines.push(format!("Site: {website}"));
    }
    let company_cell = vec![
        Block::Heading { text: "Société".into(), style: "section".into() },
        Block::Paragraph { text: quote.company.name.clone(), style: "body-strong".into() },
        Block::Paragraph { text: company_lines.join("\n"), style: "body".into() },
    ];
    let client_cell = vec![
        Block::Heading { text: "Client".into(), style: "section".into() },
        Block::Paragraph { text: quote.client.name.clone(), style: "body-strong".into() },
        Block::Paragraph {
            text: format!(
                "{}\nEmail: {}\nTéléphone: {}",
                quote.client.address, quote.client.email, quote.client.phone
            ),
            style: "body".into(),
        },
    ];
    blocks.push(Block::Columns {
        widths: vec![240.0, 240.0],
        cells: vec![company_cell, client_cell],
        align: TextAlign::Center,
        style: None,
    });
    blocks.push(Block::Spacer { height: 16.0 });

    // Line items.
    blocks.push(Block::Heading { text: "Détails".into(), style: "section".into() });
    let item_rows = quote
        .items
        .iter()
        .map(|item| {
            TableRow::new(vec![
                (item.description.clone(), Some("td".to_string())),
                (format_quantity(item.quantity), Some("td-num".to_string())),
                (format_money(item.unit_price), Some("td-num".to_string())),
                (format_money(item.total()), Some("td-num".to_string())),
            ])
        })
        .collect();
    blocks.push(Block::Table(TableBlock {
        columns: vec![
            TableColumn { width: 260.0, align: TextAlign::Left },
            TableColumn { width: 50.0, align: TextAlign::Left },
            TableColumn { width: 80.0, align: TextAlign::Left },
            TableColumn { width: 80.0, align: TextAlign::Left },
        ],
        header: Some(TableRow::new(vec![
            ("Description", Some("th")),
            ("Qté", Some("th")),
            ("PU", Some("th")),
            ("Total", Some("th")),
        ])),
        rows: item_rows,
        align: TextAlign::Center,
        style: TableStyle {
            grid: Some(Border { width: 0.25, color: BORDER }),
            banded_rows: Some((Color::WHITE, SOFT)),
            rule_above_last: None,
        },
    }));
    blocks.push(Block::Spacer { height: 12.0 });

    // Totals, a narrow borderless table with the grand total set off
    // by a rule and bold type.
    let tax_percent = (quote.tax_rate * 100.0) as i64;
    blocks.push(Block::Table(TableBlock {
        columns: vec![
            TableColumn { width: 330.0, align: TextAlign::Left },
            TableColumn { width: 140.0, align: TextAlign::Left },
        ],
        header: None,
        rows: vec![
            TableRow::new(vec![
                ("Sous-total".to_string(), Some("total-label".to_string())),
                (format_money(totals.subtotal), Some("total-value".to_string())),
            ]),
            TableRow::new(vec![
                (format!("TVA ({tax_percent}%)"), Some("total-label".to_string())),
                (format_money(totals.tax_amount), Some("total-value".to_string())),
            ]),
            TableRow::new(vec![
                ("Total TTC".to_string(), Some("total-label-strong".to_string())),
                (format_money(totals.total), Some("total-value-strong".to_string())),
            ]),
        ],
        align: TextAlign::Center,
        style: TableStyle {
            grid: None,
            banded_rows: None,
            rule_above_last: Some(Border { width: 0.6, color: INK }),
        },
    }));

    if let Some(notes) = &quote.notes {
        blocks.push(Block::Spacer { height: 12.0 });
        blocks.push(Block::Heading { text: "Notes".into(), style: "section".into() });
        blocks.push(Block::Paragraph { text: notes.clone(), style: "body".into() });
    }

    let mut legal = Vec::new();
    if let Some(siret) = &quote.company.siret {
        legal.push(format!("SIRET: {siret}"));
    }
    if let Some(vat) = &quote.company.vat_number {
        legal.push(format!("TVA: {vat}"));
    }
    if let Some(iban) = &quote.company.iban {
        legal.push(format!("IBAN: {iban}"));
    }
    if let Some(bic) = &quote.company.bic {
        legal.push(format!("BIC: {bic}"));
    }

    let mut footer = Vec::new();
    if !legal.is_empty() {
        footer.push(legal.join(" • "));
    }
    if let Some(terms) = &quote.payment_terms {
        footer.push(terms.clone());
    }
    if !footer.is_empty() {
        blocks.push(Block::Spacer { height: 14.0 });
        blocks.push(Block::Paragraph { text: footer.join("\n"), style: "foot".into() });
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use devis_model::{Client, Company, QuoteItem};

    fn sample_quote() -> Quote {
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
            items: vec![QuoteItem {
                description: "Service A".into(),
                quantity: 2.0,
                unit_price: 100.0,
            }],
            tax_rate: 0.2,
            notes: None,
            status: "En attente".into(),
            payment_terms: Some("Paiement à 30 jours.".into()),
        }
    }

    fn all_text(blocks: &[Block]) -> String {
        fn walk(block: &Block, out: &mut String) {
            match block {
                Block::Heading { text, .. } | Block::Paragraph { text, .. } => {
                    out.push_str(text);
                    out.push('\n');
                }
                Block::Columns { cells, .. } => {
                    for cell in cells {
                        for inner in cell {
                            walk(inner, out);
                        }
                    }
                }
                Block::Table(table) => {
                    for row in table.header.iter().chain(table.rows.iter()) {
                        for cell in &row.cells {
                            out.push_str(&cell.text);
                            out.push('\n');
                        }
                    }
                }
                _ => {}
            }
        }
        let mut out = String::new();
        for block in blocks {
            walk(block, &mut out);
        }
        out
    }

    #[test]
    fn formats_currency_with_space_grouping() {
        assert_eq!(format_currency(1234.5), "1 234.50");
        assert_eq!(format_currency(0.0), "0.00");
        assert_eq!(format_currency(999.999), "1 000.00");
        assert_eq!(format_currency(1_234_567.891), "1 234 567.89");
        assert_eq!(format_currency(240.0), "240.00");
    }

    #[test]
    fn currency_formatting_is_idempotent_on_equal_input() {
        assert_eq!(format_currency(1234.5), format_currency(1234.5));
    }

    #[test]
    fn totals_block_lists_the_three_amounts_in_order() {
        let blocks = quote_blocks(&sample_quote(), None);
        let text = all_text(&blocks);
        let subtotal = text.find("200.00 €").expect("subtotal missing");
        let tax = text.find("40.00 €").expect("tax missing");
        let total = text.find("240.00 €").expect("total missing");
        assert!(subtotal < tax && tax < total);
        assert!(text.contains("TVA (20%)"));
        assert!(text.contains("Total TTC"));
    }

    #[test]
    fn falls_back_to_a_vector_mark_without_a_logo() {
        let blocks = quote_blocks(&sample_quote(), None);
        let text = format!("{blocks:?}");
        assert!(text.contains("VectorMark"));
    }

    #[test]
    fn uses_the_logo_image_when_present() {
        let data: SharedData = std::sync::Arc::new(vec![1, 2, 3]);
        let blocks = quote_blocks(&sample_quote(), Some(data));
        let debug = format!("{blocks:?}");
        assert!(debug.contains("Image"));
        assert!(!debug.contains("VectorMark"));
    }

    #[test]
    fn omits_conditional_sections_when_absent() {
        let blocks = quote_blocks(&sample_quote(), None);
        let text = all_text(&blocks);
        assert!(!text.contains("Notes"));
        assert!(!text.contains("SIRET:"));
        assert!(!text.contains("Site:"));
        assert!(text.contains("Paiement à 30 jours."));
    }

    #[test]
    fn includes_legal_identifiers_when_present() {
        let mut quote = sample_quote();
        quote.company.siret = Some("123 456 789 00010".into());
        quote.company.vat_number = Some("FR12345678900".into());
        quote.notes = Some("Offre valable 30 jours.".into());
        let blocks = quote_blocks(&quote, None);
        let text = all_text(&blocks);
        assert!(text.contains("SIRET: 123 456 789 00010 • TVA: FR12345678900"));
        assert!(text.contains("Notes"));
        assert!(text.contains("Offre valable 30 jours."));
    }

    #[test]
    fn subtotal_line_appears_before_tax_even_with_zero_rate() {
        let mut quote = sample_quote();
        quote.tax_rate = 0.0;
        let blocks = quote_blocks(&quote, None);
        let text = all_text(&blocks);
        assert!(text.contains("TVA (0%)"));
        assert!(text.contains("Sous-total"));
    }
}
