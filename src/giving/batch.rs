//! Contribution batch management

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::currency::format_amount;
use crate::giving::{BatchReport, ContributionFilter, ContributionSearch};
use crate::reconciliation::{validate_line_items, BatchReconciliation, ReconciliationConfig};
use crate::traits::*;
use crate::types::*;
use crate::utils::validation::{validate_currency_code, validate_non_negative_amount};

/// A batch with its derived reconciliation figures, as shown in batch lists
///
/// `reconciliation` is `None` when the batch's line items could not be
/// reconciled; `error` then says why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub batch: Batch,
    pub reconciliation: Option<BatchReconciliation>,
    pub error: Option<String>,
}

impl BatchSummary {
    pub fn is_reconciled(&self) -> bool {
        self.reconciliation
            .as_ref()
            .is_some_and(|r| r.is_reconciled)
    }
}

/// Batch manager for entering, reconciling and closing contribution batches
pub struct BatchManager<S: GivingStorage> {
    pub(crate) storage: S,
    validator: Box<dyn ContributionValidator>,
    config: ReconciliationConfig,
}

impl<S: GivingStorage> BatchManager<S> {
    /// Create a new batch manager with the default tolerance
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            validator: Box::new(DefaultContributionValidator),
            config: ReconciliationConfig::default(),
        }
    }

    /// Create a new batch manager with custom reconciliation settings
    pub fn with_config(storage: S, config: ReconciliationConfig) -> Self {
        Self {
            storage,
            validator: Box::new(DefaultContributionValidator),
            config,
        }
    }

    /// Replace the contribution validator
    pub fn with_validator(mut self, validator: Box<dyn ContributionValidator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn config(&self) -> &ReconciliationConfig {
        &self.config
    }

    /// Open a new, empty batch
    pub async fn create_batch(
        &mut self,
        name: String,
        date: NaiveDate,
        currency: String,
        counted_total: BigDecimal,
        entered_by: Option<String>,
    ) -> ChurchResult<Batch> {
        if name.trim().is_empty() {
            return Err(ChurchError::Validation(
                "Batch name and Counted Total are required.".to_string(),
            ));
        }
        validate_non_negative_amount(&counted_total)?;
        validate_currency_code(&currency)?;

        let mut batch = Batch::new(
            format!("B{}", Uuid::new_v4().simple()),
            name.trim().to_string(),
            date,
            currency.trim().to_string(),
            counted_total,
        );
        batch.entered_by = entered_by;

        self.storage.save_batch(&batch).await?;
        info!(batch_id = %batch.id, name = %batch.name, "created contribution batch");

        Ok(batch)
    }

    /// Get a batch by ID
    pub async fn get_batch(&self, batch_id: &str) -> ChurchResult<Option<Batch>> {
        self.storage.get_batch(batch_id).await
    }

    /// Get a batch by ID, returning an error if not found
    pub async fn get_batch_required(&self, batch_id: &str) -> ChurchResult<Batch> {
        self.storage
            .get_batch(batch_id)
            .await?
            .ok_or_else(|| ChurchError::BatchNotFound(batch_id.to_string()))
    }

    /// List all batches, newest first
    pub async fn list_batches(&self) -> ChurchResult<Vec<Batch>> {
        let mut batches = self.storage.list_batches().await?;
        batches.sort_by(|a, b| {
            b.date_created
                .cmp(&a.date_created)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(batches)
    }

    /// Line items of a batch, most recent entry first
    pub async fn contributions(&self, batch_id: &str) -> ChurchResult<Vec<Contribution>> {
        self.get_batch_required(batch_id).await?;
        self.storage.list_batch_contributions(batch_id).await
    }

    /// Correct the counted total of an open batch
    pub async fn set_counted_total(
        &mut self,
        batch_id: &str,
        counted_total: BigDecimal,
    ) -> ChurchResult<Batch> {
        let mut batch = self.open_batch(batch_id).await?;
        validate_non_negative_amount(&counted_total)?;

        batch.counted_total = counted_total;
        batch.updated_at = chrono::Utc::now().naive_utc();
        self.storage.update_batch(&batch).await?;

        Ok(batch)
    }

    /// Enter a contribution into its batch
    pub async fn add_contribution(
        &mut self,
        contribution: Contribution,
    ) -> ChurchResult<Contribution> {
        self.open_batch(&contribution.batch_id).await?;
        self.validator.validate_contribution(&contribution)?;

        self.storage.save_contribution(&contribution).await?;
        debug!(
            batch_id = %contribution.batch_id,
            contribution_id = %contribution.id,
            amount = %contribution.amount,
            "added contribution"
        );

        Ok(contribution)
    }

    /// Remove a contribution from an open batch
    pub async fn remove_contribution(
        &mut self,
        batch_id: &str,
        contribution_id: &str,
    ) -> ChurchResult<()> {
        self.open_batch(batch_id).await?;

        match self.storage.get_contribution(contribution_id).await? {
            Some(c) if c.batch_id == batch_id => {}
            _ => {
                return Err(ChurchError::ContributionNotFound(
                    contribution_id.to_string(),
                ))
            }
        }

        self.storage.delete_contribution(contribution_id).await?;
        debug!(batch_id, contribution_id, "removed contribution");

        Ok(())
    }

    /// Compute the current reconciliation figures for a batch
    pub async fn reconcile(&self, batch_id: &str) -> ChurchResult<BatchReconciliation> {
        let batch = self.get_batch_required(batch_id).await?;
        let contributions = self.storage.list_batch_contributions(batch_id).await?;
        validate_line_items(&contributions)?;

        let reconciliation = BatchReconciliation::compute(
            &batch,
            &contributions,
            self.config.tolerance_for(&batch.currency),
        );
        debug!(
            batch_id,
            entered = %reconciliation.entered_total,
            difference = %reconciliation.difference,
            reconciled = reconciliation.is_reconciled,
            "reconciled batch"
        );

        Ok(reconciliation)
    }

    /// Close a batch once its entered total matches the counted total
    ///
    /// Nothing changes when the batch cannot be closed.
    pub async fn close_batch(&mut self, batch_id: &str) -> ChurchResult<Batch> {
        let mut batch = self.get_batch_required(batch_id).await?;
        if !batch.is_open() {
            return Err(ChurchError::BatchClosed(batch_id.to_string()));
        }

        let reconciliation = self.reconcile(batch_id).await?;
        if !reconciliation.can_close {
            let difference = format_amount(&reconciliation.difference, &batch.currency);
            warn!(batch_id, %difference, "refused to close unreconciled batch");
            return Err(ChurchError::NotReconciled {
                batch_id: batch_id.to_string(),
                difference,
            });
        }

        batch.mark_closed(chrono::Utc::now().date_naive());
        self.storage.update_batch(&batch).await?;
        info!(batch_id, name = %batch.name, "closed contribution batch");

        Ok(batch)
    }

    /// Every batch with its reconciliation figures, newest first
    ///
    /// A batch with bad line items is listed with its error instead of
    /// failing the whole list. Storage failures still propagate.
    pub async fn batch_summaries(&self) -> ChurchResult<Vec<BatchSummary>> {
        let mut summaries = Vec::new();
        for batch in self.list_batches().await? {
            let summary = match self.reconcile(&batch.id).await {
                Ok(reconciliation) => BatchSummary {
                    batch,
                    reconciliation: Some(reconciliation),
                    error: None,
                },
                Err(ChurchError::Validation(message)) => {
                    warn!(batch_id = %batch.id, %message, "batch cannot be reconciled");
                    BatchSummary {
                        batch,
                        reconciliation: None,
                        error: Some(message),
                    }
                }
                Err(e) => return Err(e),
            };
            summaries.push(summary);
        }
        Ok(summaries)
    }

    /// Search contributions across all batches
    pub async fn search_contributions(
        &self,
        filter: &ContributionFilter,
    ) -> ChurchResult<ContributionSearch> {
        let contributions = self
            .storage
            .list_contributions(filter.start_date, filter.end_date)
            .await?
            .into_iter()
            .filter(|c| filter.matches(c))
            .collect();
        Ok(ContributionSearch::new(contributions))
    }

    /// A member's giving history, most recent gift first
    pub async fn giving_history(&self, member_id: &str) -> ChurchResult<ContributionSearch> {
        let mut contributions = self.storage.list_member_contributions(member_id).await?;
        contributions.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(ContributionSearch::new(contributions))
    }

    /// Build the printable report for a batch
    pub async fn batch_report(
        &self,
        batch_id: &str,
        church_name: &str,
    ) -> ChurchResult<BatchReport> {
        let batch = self.get_batch_required(batch_id).await?;
        let contributions = self.storage.list_batch_contributions(batch_id).await?;
        validate_line_items(&contributions)?;

        Ok(BatchReport::build(
            church_name,
            &batch,
            &contributions,
            self.config.tolerance_for(&batch.currency),
            chrono::Utc::now().naive_utc(),
        ))
    }

    async fn open_batch(&self, batch_id: &str) -> ChurchResult<Batch> {
        let batch = self.get_batch_required(batch_id).await?;
        if batch.is_open() {
            Ok(batch)
        } else {
            Err(ChurchError::BatchClosed(batch_id.to_string()))
        }
    }
}
