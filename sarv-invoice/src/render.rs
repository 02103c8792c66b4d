//! Invoice document assembly
//!
//! Builds a single A4 PDF from an invoice description. Layout is a plain
//! receipt: cafe header, one line per item, total, optional customer phone.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

use crate::error::{InvoiceError, InvoiceResult};

/// One rendered invoice line (quantity x name at snapshot price)
#[derive(Debug, Clone)]
pub struct InvoiceLine {
    pub name: String,
    pub quantity: i64,
    pub price: f64,
}

/// Invoice description handed over by the application
#[derive(Debug, Clone)]
pub struct Invoice {
    pub invoice_id: i64,
    pub cafe_name: String,
    pub lines: Vec<InvoiceLine>,
    pub total: f64,
    pub phone: Option<String>,
}

// A4 media box and text layout constants (points)
const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN_X: i64 = 50;
const HEADER_Y: i64 = PAGE_HEIGHT - 50;
const FIRST_LINE_Y: i64 = PAGE_HEIGHT - 90;
const LINE_STEP: i64 = 20;
const LINES_PER_PAGE: usize = 34;

/// Render the invoice into PDF bytes.
///
/// Fails only on an empty invoice or a PDF encoding error; the caller is
/// expected to treat any failure as non-fatal to the sale itself.
pub fn render_invoice(invoice: &Invoice) -> InvoiceResult<Vec<u8>> {
    if invoice.lines.is_empty() {
        return Err(InvoiceError::InvalidInvoice("no line items".into()));
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for chunk in invoice.lines.chunks(LINES_PER_PAGE) {
        let is_first = kids.is_empty();
        let is_last = kids.len() == (invoice.lines.len() - 1) / LINES_PER_PAGE;
        let content = page_content(invoice, chunk, is_first, is_last);
        let encoded = content
            .encode()
            .map_err(|e| InvoiceError::Encoding(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;

    tracing::debug!(
        invoice_id = invoice.invoice_id,
        pages = count,
        size = bytes.len(),
        "Invoice rendered"
    );

    Ok(bytes)
}

/// Content stream for one page of line items
fn page_content(invoice: &Invoice, lines: &[InvoiceLine], header: bool, footer: bool) -> Content {
    let mut ops = vec![Operation::new("BT", vec![])];
    let mut y = FIRST_LINE_Y;

    if header {
        ops.push(Operation::new("Tf", vec!["F1".into(), 18.into()]));
        ops.push(Operation::new("Td", vec![MARGIN_X.into(), HEADER_Y.into()]));
        ops.push(Operation::new(
            "Tj",
            vec![Object::string_literal(format!(
                "{} - Invoice #{}",
                invoice.cafe_name, invoice.invoice_id
            ))],
        ));
        ops.push(Operation::new("ET", vec![]));
        ops.push(Operation::new("BT", vec![]));
    }

    ops.push(Operation::new("Tf", vec!["F1".into(), 12.into()]));
    ops.push(Operation::new("Td", vec![MARGIN_X.into(), y.into()]));
    ops.push(Operation::new("TL", vec![LINE_STEP.into()]));
    for line in lines {
        ops.push(Operation::new(
            "Tj",
            vec![Object::string_literal(format!(
                "{} x {} - {:.2}",
                line.quantity, line.name, line.price
            ))],
        ));
        ops.push(Operation::new("T*", vec![]));
        y -= LINE_STEP;
    }
    ops.push(Operation::new("ET", vec![]));

    if footer {
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new("Tf", vec!["F1".into(), 14.into()]));
        ops.push(Operation::new(
            "Td",
            vec![MARGIN_X.into(), (y - LINE_STEP).into()],
        ));
        ops.push(Operation::new(
            "Tj",
            vec![Object::string_literal(format!("Total: {:.2}", invoice.total))],
        ));
        if let Some(phone) = &invoice.phone {
            ops.push(Operation::new("Tf", vec!["F1".into(), 10.into()]));
            ops.push(Operation::new("Td", vec![0.into(), (-LINE_STEP).into()]));
            ops.push(Operation::new(
                "Tj",
                vec![Object::string_literal(format!("Customer: {phone}"))],
            ));
        }
        ops.push(Operation::new("ET", vec![]));
    }

    Content { operations: ops }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_invoice() -> Invoice {
        Invoice {
            invoice_id: 1001,
            cafe_name: "Sarv".to_string(),
            lines: vec![
                InvoiceLine {
                    name: "Espresso".to_string(),
                    quantity: 2,
                    price: 50000.0,
                },
                InvoiceLine {
                    name: "Cheesecake".to_string(),
                    quantity: 1,
                    price: 30000.0,
                },
            ],
            total: 130000.0,
            phone: Some("09123456789".to_string()),
        }
    }

    #[test]
    fn renders_valid_pdf_header() {
        let bytes = render_invoice(&sample_invoice()).expect("render failed");
        assert!(bytes.starts_with(b"%PDF-1.5"));
        assert!(bytes.len() > 200);
    }

    #[test]
    fn empty_invoice_is_rejected() {
        let mut invoice = sample_invoice();
        invoice.lines.clear();
        assert!(matches!(
            render_invoice(&invoice),
            Err(InvoiceError::InvalidInvoice(_))
        ));
    }

    #[test]
    fn long_invoice_spans_multiple_pages() {
        let mut invoice = sample_invoice();
        invoice.lines = (0..80)
            .map(|i| InvoiceLine {
                name: format!("Item {i}"),
                quantity: 1,
                price: 1000.0,
            })
            .collect();
        let bytes = render_invoice(&invoice).expect("render failed");
        let doc = Document::load_mem(&bytes).expect("reparse failed");
        assert!(doc.get_pages().len() >= 2);
    }
}
