//! Discrepancy report artifacts
//!
//! Writes two deterministic artifacts per comparison: a flat tabular CSV and
//! a structured JSON mirror of the same records. NaN sentinels and missing
//! sides serialize as empty cells / null.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::observability::Logger;

use super::compare::{compare_items, Discrepancy, Summary};
use super::errors::ReconcileResult;
use super::extract::extract_from_pdf;

const CSV_ARTIFACT: &str = "pdf_discrepancies.csv";
const JSON_ARTIFACT: &str = "pdf_discrepancies.json";

/// Full outcome of one reconciliation request.
#[derive(Debug)]
pub struct ReconcileOutcome {
    pub discrepancies: Vec<Discrepancy>,
    pub summary: Summary,
    pub csv_path: PathBuf,
    pub json_path: PathBuf,
}

/// One flat report record; the CSV and JSON artifacts share this shape.
#[derive(Debug, Serialize)]
struct ReportRecord {
    sku: String,
    issues: String,
    qty_po: Option<i64>,
    qty_pi: Option<i64>,
    unit_price_po: Option<f64>,
    unit_price_pi: Option<f64>,
    discount_po: Option<f64>,
    discount_pi: Option<f64>,
    tax_po: Option<f64>,
    tax_pi: Option<f64>,
}

impl ReportRecord {
    fn from_discrepancy(d: &Discrepancy) -> Self {
        let money = |v: Option<f64>| v.filter(|x| !x.is_nan());
        Self {
            sku: d.sku.clone(),
            issues: d
                .issues
                .iter()
                .map(|i| i.as_str())
                .collect::<Vec<_>>()
                .join(";"),
            qty_po: d.po.as_ref().map(|i| i.qty),
            qty_pi: d.pi.as_ref().map(|i| i.qty),
            unit_price_po: money(d.po.as_ref().map(|i| i.unit_price)),
            unit_price_pi: money(d.pi.as_ref().map(|i| i.unit_price)),
            discount_po: money(d.po.as_ref().map(|i| i.discount_pct)),
            discount_pi: money(d.pi.as_ref().map(|i| i.discount_pct)),
            tax_po: money(d.po.as_ref().map(|i| i.tax_pct)),
            tax_pi: money(d.pi.as_ref().map(|i| i.tax_pct)),
        }
    }
}

/// Reconciles a purchase order against a proforma invoice and writes both
/// report artifacts under `out_dir` (created if missing).
pub fn compare_documents(
    po_pdf: &Path,
    pi_pdf: &Path,
    out_dir: &Path,
) -> ReconcileResult<ReconcileOutcome> {
    let po_items = extract_from_pdf(po_pdf)?;
    let pi_items = extract_from_pdf(pi_pdf)?;

    let (discrepancies, summary) = compare_items(&po_items, &pi_items);
    let (csv_path, json_path) = write_reports(&discrepancies, out_dir)?;

    Logger::info(
        "reconciliation_completed",
        &[
            ("po_items", &summary.po_items.to_string()),
            ("pi_items", &summary.pi_items.to_string()),
            ("discrepancies", &summary.discrepancy_count.to_string()),
        ],
    );

    Ok(ReconcileOutcome {
        discrepancies,
        summary,
        csv_path,
        json_path,
    })
}

/// Writes the tabular and structured artifacts, returning their paths.
pub fn write_reports(
    discrepancies: &[Discrepancy],
    out_dir: &Path,
) -> ReconcileResult<(PathBuf, PathBuf)> {
    fs::create_dir_all(out_dir)?;
    let records: Vec<ReportRecord> = discrepancies
        .iter()
        .map(ReportRecord::from_discrepancy)
        .collect();

    let csv_path = out_dir.join(CSV_ARTIFACT);
    let mut writer = csv::Writer::from_path(&csv_path)?;
    for record in &records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    let json_path = out_dir.join(JSON_ARTIFACT);
    fs::write(&json_path, serde_json::to_vec_pretty(&records)?)?;

    Ok((csv_path, json_path))
}
