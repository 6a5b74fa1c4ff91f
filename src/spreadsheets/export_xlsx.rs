use crate::domain::diagnostic::ClassifiedProduct;
use crate::domain::stats::PortfolioStats;
use crate::errors::TrackerError;
use rust_xlsxwriter::Workbook;

/// Exports the active inventory (with diagnostics) and the category /
/// portfolio statistics as a two-sheet workbook. Returns the xlsx bytes;
/// the caller decides where they go.
pub fn export_inventory_xlsx(
    active: &[ClassifiedProduct],
    stats: &PortfolioStats,
) -> Result<Vec<u8>, TrackerError> {
    let mut workbook = Workbook::new();

    write_inventory_sheet(&mut workbook, active)?;
    write_stats_sheet(&mut workbook, stats)?;

    workbook
        .save_to_buffer()
        .map_err(|e| TrackerError::ExportError(format!("Failed to save workbook: {}", e)))
}

fn write_inventory_sheet(
    workbook: &mut Workbook,
    active: &[ClassifiedProduct],
) -> Result<(), TrackerError> {
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name("Inventory")
        .map_err(|e| TrackerError::ExportError(e.to_string()))?;

    // Headers
    let headers = [
        "Id",
        "Title",
        "Brand",
        "Category",
        "Price",
        "Views",
        "Favorites",
        "Days Listed",
        "Reposts",
        "Diagnostic",
        "Hot",
        "Cold",
    ];

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header).map_err(|e| {
            TrackerError::ExportError(format!("Failed to write header '{}': {}", header, e))
        })?;
    }

    // Rows
    for (i, entry) in active.iter().enumerate() {
        let r = (i + 1) as u32;
        let product = &entry.product;

        let diagnostic = entry
            .diagnostic
            .map(|d| d.to_string())
            .unwrap_or_default();

        worksheet
            .write_string(r, 0, &product.id)
            .and_then(|ws| ws.write_string(r, 1, &product.title))
            .and_then(|ws| ws.write_string(r, 2, product.brand.as_deref().unwrap_or("")))
            .and_then(|ws| ws.write_string(r, 3, product.category.as_deref().unwrap_or("")))
            .and_then(|ws| ws.write_number(r, 4, product.price))
            .and_then(|ws| ws.write_number(r, 5, product.views as f64))
            .and_then(|ws| ws.write_number(r, 6, product.favorites as f64))
            .and_then(|ws| ws.write_number(r, 7, entry.days_old as f64))
            .and_then(|ws| ws.write_number(r, 8, product.repost_count as f64))
            .and_then(|ws| ws.write_string(r, 9, &diagnostic))
            .and_then(|ws| ws.write_string(r, 10, if entry.is_hot { "Yes" } else { "No" }))
            .and_then(|ws| ws.write_string(r, 11, if entry.is_cold { "Yes" } else { "No" }))
            .map_err(|e| {
                TrackerError::ExportError(format!("Failed to write row for {}: {}", product.id, e))
            })?;
    }

    Ok(())
}

fn write_stats_sheet(workbook: &mut Workbook, stats: &PortfolioStats) -> Result<(), TrackerError> {
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name("Stats")
        .map_err(|e| TrackerError::ExportError(e.to_string()))?;

    let headers = ["Category", "Sold", "Avg Days To Sale", "Total Profit", "Avg Profit"];
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header).map_err(|e| {
            TrackerError::ExportError(format!("Failed to write header '{}': {}", header, e))
        })?;
    }

    let mut r: u32 = 1;
    for (category, bucket) in &stats.by_category {
        worksheet
            .write_string(r, 0, category)
            .and_then(|ws| ws.write_number(r, 1, bucket.sold_count as f64))
            .and_then(|ws| ws.write_number(r, 2, bucket.avg_days_to_sale))
            .and_then(|ws| ws.write_number(r, 3, bucket.total_profit))
            .and_then(|ws| ws.write_number(r, 4, bucket.avg_profit))
            .map_err(|e| {
                TrackerError::ExportError(format!("Failed to write stats for {}: {}", category, e))
            })?;
        r += 1;
    }

    // Portfolio totals on a final row.
    worksheet
        .write_string(r, 0, "TOTAL")
        .and_then(|ws| ws.write_number(r, 1, stats.total_sold as f64))
        .and_then(|ws| ws.write_number(r, 2, stats.avg_days_to_sale))
        .and_then(|ws| ws.write_number(r, 3, stats.total_profit))
        .and_then(|ws| ws.write_number(r, 4, stats.avg_profit))
        .map_err(|e| TrackerError::ExportError(format!("Failed to write totals: {}", e)))?;

    Ok(())
}
