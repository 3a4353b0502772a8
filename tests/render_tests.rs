mod common;

use std::sync::Arc;

use common::{GeneratedPdf, TestResult, fixtures};
use devis::PipelineError;
use serde_json::json;

#[test]
fn renders_the_reference_quote_to_one_page() -> TestResult {
    let quote = fixtures::parse_quote(fixtures::sample_quote());
    let bytes = devis::render_quote(&quote, None)?;
    let pdf = GeneratedPdf::from_bytes(bytes)?;

    assert_eq!(pdf.page_count(), 1);
    assert!(pdf.bytes.starts_with(b"%PDF"));
    Ok(())
}

#[test]
fn totals_block_carries_the_three_amounts_in_order() -> TestResult {
    let quote = fixtures::parse_quote(fixtures::sample_quote());
    let bytes = devis::render_quote(&quote, None)?;
    let text = GeneratedPdf::from_bytes(bytes)?.extract_text()?;

    let subtotal = text.find("200.00").ok_or("subtotal missing from document text")?;
    let tax = text.find("40.00").ok_or("tax missing from document text")?;
    let total = text.find("240.00").ok_or("total missing from document text")?;
    assert!(subtotal < tax && tax < total, "totals out of order in {text:?}");
    assert!(text.contains("Sous-total"));
    assert!(text.contains("Total TTC"));
    Ok(())
}

#[test]
fn rendering_is_deterministic_without_an_asset() -> TestResult {
    let quote = fixtures::parse_quote(fixtures::sample_quote());
    let first = devis::render_quote(&quote, None)?;
    let second = devis::render_quote(&quote, None)?;
    assert_eq!(first, second, "two renders of the same record must be byte-identical");
    Ok(())
}

#[test]
fn defaults_show_up_in_the_rendered_document() -> TestResult {
    let mut value = fixtures::sample_quote();
    value.as_object_mut().ok_or("fixture is an object")?.remove("tax_rate");
    let quote = fixtures::parse_quote(value);
    let text = GeneratedPdf::from_bytes(devis::render_quote(&quote, None)?)?.extract_text()?;

    assert!(text.contains("En attente"));
    assert!(text.contains("TVA (20%)"));
    assert!(text.contains("Paiement"));
    assert!(!text.contains("Notes"));
    Ok(())
}

#[test]
fn long_item_lists_flow_onto_further_pages() -> TestResult {
    let mut value = fixtures::sample_quote();
    let items: Vec<_> = (0..80)
        .map(|i| json!({ "description": format!("Prestation {i}"), "quantity": 1, "unit_price": 10.0 }))
        .collect();
    value["items"] = json!(items);
    let quote = fixtures::parse_quote(value);
    let pdf = GeneratedPdf::from_bytes(devis::render_quote(&quote, None)?)?;
    assert!(pdf.page_count() >= 2, "80 rows should not fit one A4 page");
    Ok(())
}

#[test]
fn corrupt_asset_bytes_fail_the_render() {
    let quote = fixtures::parse_quote(fixtures::sample_quote());
    let logo = Arc::new(b"definitely not an image".to_vec());
    let error = devis::render_quote(&quote, Some(logo)).unwrap_err();
    assert!(matches!(error, PipelineError::Render(_)), "got {error:?}");
}

#[test]
fn render_quote_json_surfaces_validation_errors() {
    let mut value = fixtures::sample_quote();
    value["items"][0]["quantity"] = json!(0);
    value["company"]["name"] = json!("");
    let error = devis::render_quote_json(value.to_string().as_bytes(), None).unwrap_err();
    match error {
        PipelineError::Validation(e) => {
            let fields: Vec<&str> = e.violations.iter().map(|v| v.field.as_str()).collect();
            assert_eq!(fields, ["company.name", "items[0].quantity"]);
        }
        other => panic!("expected a validation error, got {other:?}"),
    }
}

#[test]
fn render_quote_json_rejects_malformed_input() {
    let error = devis::render_quote_json(b"{ not json", None).unwrap_err();
    assert!(matches!(error, PipelineError::Json(_)));
}

#[test]
fn cli_pipeline_writes_a_pdf_file() -> TestResult {
    let dir = tempfile::tempdir()?;
    let input_path = dir.path().join("devis.json");
    let output_path = dir.path().join("devis.pdf");
    std::fs::write(&input_path, fixtures::sample_quote().to_string())?;

    let raw = std::fs::read(&input_path)?;
    let pdf = devis::render_quote_json(&raw, None)?;
    std::fs::write(&output_path, &pdf)?;

    let written = std::fs::read(&output_path)?;
    assert!(written.starts_with(b"%PDF"));
    Ok(())
}
