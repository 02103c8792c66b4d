//! 发票生成（尽力而为）
//!
//! 销售建单成功后渲染一份 PDF 发票写入 work_dir/invoices/。
//! 渲染或写盘失败只记日志并在响应中以 `invoice_path: null` 呈现，
//! 绝不回滚或失败销售本身。

use std::path::Path;

use sarv_invoice::{Invoice, InvoiceLine, render_invoice};

use crate::db::models::SaleWithItems;

/// Render and persist the invoice for a freshly created sale.
///
/// Returns the file path on success, `None` on any failure. The render and
/// the file write run on a blocking task so the request path is not tied up.
pub async fn generate_invoice_file(
    invoices_dir: &Path,
    sale: &SaleWithItems,
    cafe_name: &str,
) -> Option<String> {
    let invoice = Invoice {
        invoice_id: sale.sale.id,
        cafe_name: cafe_name.to_string(),
        lines: sale
            .items
            .iter()
            .map(|item| InvoiceLine {
                name: item.name.clone().unwrap_or_else(|| "Item".to_string()),
                quantity: item.qty,
                price: item.price,
            })
            .collect(),
        total: sale.sale.total,
        phone: sale.sale.phone.clone(),
    };
    let path = invoices_dir.join(format!("{}.pdf", sale.sale.id));
    let path_str = path.to_string_lossy().to_string();

    let result = tokio::task::spawn_blocking(move || -> Result<(), String> {
        let bytes = render_invoice(&invoice).map_err(|e| e.to_string())?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        std::fs::write(&path, bytes).map_err(|e| e.to_string())?;
        Ok(())
    })
    .await;

    match result {
        Ok(Ok(())) => Some(path_str),
        Ok(Err(e)) => {
            tracing::warn!(sale_id = sale.sale.id, error = %e, "Invoice generation failed");
            None
        }
        Err(e) => {
            tracing::warn!(sale_id = sale.sale.id, error = %e, "Invoice task panicked");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{PaymentMethod, Sale, SaleItemDetail};

    fn sample_sale() -> SaleWithItems {
        SaleWithItems {
            sale: Sale {
                id: 99,
                user_id: 1,
                total: 100_000.0,
                tax: 0.0,
                phone: None,
                payment_method: PaymentMethod::Cash,
                created_at: 0,
            },
            items: vec![SaleItemDetail {
                id: 1,
                sale_id: 99,
                menu_item_id: Some(5),
                product_id: None,
                qty: 2,
                price: 50_000.0,
                name: Some("Espresso".to_string()),
                menu_cost: None,
                product_price: None,
            }],
        }
    }

    #[tokio::test]
    async fn writes_invoice_pdf_to_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = generate_invoice_file(dir.path(), &sample_sale(), "Sarv")
            .await
            .expect("invoice should be written");
        let bytes = std::fs::read(&path).expect("file exists");
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn unwritable_directory_degrades_to_none() {
        // A file used as a directory makes the write fail
        let file = tempfile::NamedTempFile::new().expect("tempfile");
        let result =
            generate_invoice_file(file.path(), &sample_sale(), "Sarv").await;
        assert!(result.is_none());
    }
}
