//! Printable contribution batch report

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::currency::format_amount;
use crate::reconciliation::BatchReconciliation;
use crate::types::*;

/// One row of the report table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportLine {
    pub donor_name: String,
    pub fund: String,
    pub method: String,
    /// "N/A" when the payment had no check number
    pub check_number: String,
    pub amount: BigDecimal,
    pub formatted_amount: String,
}

/// Batch report for printing or export
///
/// Totals come from [`BatchReconciliation`], so the report always agrees with
/// the batch detail screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub church_name: String,
    pub batch_id: String,
    pub batch_name: String,
    pub batch_date: NaiveDate,
    pub status: BatchStatus,
    pub currency: String,
    pub lines: Vec<ReportLine>,
    pub reconciliation: BatchReconciliation,
    pub generated_at: NaiveDateTime,
}

impl BatchReport {
    pub fn build(
        church_name: &str,
        batch: &Batch,
        contributions: &[Contribution],
        tolerance: &BigDecimal,
        generated_at: NaiveDateTime,
    ) -> Self {
        let lines = contributions
            .iter()
            .map(|c| ReportLine {
                donor_name: c.donor.display_name().to_string(),
                fund: c.fund.clone(),
                method: c.method.to_string(),
                check_number: c.check_number.clone().unwrap_or_else(|| "N/A".to_string()),
                amount: c.amount.clone(),
                formatted_amount: format_amount(&c.amount, &batch.currency),
            })
            .collect();

        Self {
            church_name: church_name.to_string(),
            batch_id: batch.id.clone(),
            batch_name: batch.name.clone(),
            batch_date: batch.date_created,
            status: batch.status,
            currency: batch.currency.clone(),
            lines,
            reconciliation: BatchReconciliation::compute(batch, contributions, tolerance),
            generated_at,
        }
    }

    pub fn entered_total_display(&self) -> String {
        format_amount(&self.reconciliation.entered_total, &self.currency)
    }

    pub fn counted_total_display(&self) -> String {
        format_amount(&self.reconciliation.counted_total, &self.currency)
    }

    pub fn difference_display(&self) -> String {
        format_amount(&self.reconciliation.difference, &self.currency)
    }

    /// Plain-text rendering with aligned columns
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.church_name);
        let _ = writeln!(out, "Contribution Batch Report");
        let _ = writeln!(out);
        let _ = writeln!(out, "Batch Name:   {}", self.batch_name);
        let _ = writeln!(out, "Batch Date:   {}", self.batch_date.format("%Y-%m-%d"));
        let _ = writeln!(out, "Batch Status: {}", self.status);
        let _ = writeln!(out);

        let amount_width = self
            .lines
            .iter()
            .map(|l| l.formatted_amount.chars().count())
            .chain([
                self.entered_total_display().chars().count(),
                self.counted_total_display().chars().count(),
                "Amount".len(),
            ])
            .max()
            .unwrap_or(6);

        let _ = writeln!(
            out,
            "{:<24} {:<18} {:<20} {:<10} {:>width$}",
            "Member Name",
            "Fund",
            "Method",
            "Check #",
            "Amount",
            width = amount_width
        );
        for line in &self.lines {
            let _ = writeln!(
                out,
                "{:<24} {:<18} {:<20} {:<10} {:>width$}",
                line.donor_name,
                line.fund,
                line.method,
                line.check_number,
                line.formatted_amount,
                width = amount_width
            );
        }
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{:>76} {:>width$}",
            "Entered Total:",
            self.entered_total_display(),
            width = amount_width
        );
        let _ = writeln!(
            out,
            "{:>76} {:>width$}",
            "Counted Total:",
            self.counted_total_display(),
            width = amount_width
        );
        if !self.reconciliation.is_reconciled {
            let _ = writeln!(
                out,
                "{:>76} {:>width$}",
                "Difference:",
                self.difference_display(),
                width = amount_width
            );
        }
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Report generated on: {}",
            self.generated_at.format("%Y-%m-%d %H:%M:%S")
        );
        out
    }
}
