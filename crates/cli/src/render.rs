//! Plain-text rendering of ledger views.

use std::fmt::Write;

use chrono::NaiveDate;

use petstock_inventory::{MovementRecord, ProductStats, StockEntry, Totals};

/// Left-aligned columns separated by two spaces.
fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &widths, headers.iter().copied());
    for row in rows {
        push_line(&mut out, &widths, row.iter().map(String::as_str));
    }
    out
}

fn push_line<'a>(out: &mut String, widths: &[usize], cells: impl Iterator<Item = &'a str>) {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    let _ = writeln!(out, "{}", padded.join("  ").trim_end());
}

pub fn stock_table(entries: &[StockEntry]) -> String {
    if entries.is_empty() {
        return "No products registered.\n".to_string();
    }
    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|e| {
            vec![
                e.category.clone(),
                e.product.clone(),
                e.quantity.to_string(),
                e.unit_value.to_string(),
            ]
        })
        .collect();
    table(&["Category", "Product", "Quantity", "Unit value"], &rows)
}

pub fn totals(totals: &Totals) -> String {
    format!(
        "Registered rows: {}\nTotal quantity: {}\nTotal value: R$ {:.2}\n",
        totals.count, totals.total_quantity, totals.total_value
    )
}

pub fn product_stats(stats: &[ProductStats]) -> String {
    if stats.is_empty() {
        return "No products registered.\n".to_string();
    }
    let rows: Vec<Vec<String>> = stats
        .iter()
        .map(|s| {
            vec![
                s.product.clone(),
                s.total_quantity.to_string(),
                format!("{:.2}", s.mean_unit_value),
                format!("{:.2}", s.total_value),
            ]
        })
        .collect();
    table(&["Product", "Quantity", "Mean unit value", "Total value"], &rows)
}

pub fn daily_report(date: NaiveDate, movements: &[MovementRecord]) -> String {
    let day = date.format("%d/%m/%Y");
    if movements.is_empty() {
        return format!("No movements on {day}.\n");
    }
    let rows: Vec<Vec<String>> = movements
        .iter()
        .map(|m| {
            vec![
                m.date.to_string(),
                m.kind.to_string(),
                m.product.clone(),
                m.quantity.to_string(),
            ]
        })
        .collect();
    format!(
        "Movements on {day}\n{}",
        table(&["Date", "Type", "Product", "Quantity"], &rows)
    )
}
