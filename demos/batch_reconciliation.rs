//! Batch reconciliation walkthrough using the sample data

use church_core::utils::{fixtures, MemoryStorage};
use church_core::{
    authorize, format_amount, BatchManager, ChurchConfig, ChurchError, ContributionBuilder,
    PaymentMethod, Role, RouteDecision, Session,
};
use bigdecimal::BigDecimal;
use chrono::NaiveDate;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    church_core::init();
    println!("⛪ Church Core - Batch Reconciliation Example\n");

    let config = ChurchConfig::default();
    let mut storage = MemoryStorage::new();
    fixtures::seed(&mut storage).await?;
    let mut manager = BatchManager::with_config(storage, config.reconciliation.clone());

    // 1. Overview of every batch
    println!("📦 Contribution Batches...");
    for summary in manager.batch_summaries().await? {
        let batch = &summary.batch;
        let Some(r) = &summary.reconciliation else {
            println!(
                "  {} {:<28} ⚠ {}",
                batch.id,
                batch.name,
                summary.error.as_deref().unwrap_or("cannot reconcile")
            );
            continue;
        };
        println!(
            "  {} {:<28} {:<6} entered {:>14}  counted {:>14}  {}",
            batch.id,
            batch.name,
            batch.status.to_string(),
            format_amount(&r.entered_total, &batch.currency),
            format_amount(&r.counted_total, &batch.currency),
            if r.is_reconciled { "✓ balanced" } else { "✗ out of balance" }
        );
    }
    println!();

    // 2. Try to close the open batch
    println!("🔒 Closing B004...");
    match manager.close_batch("B004").await {
        Err(ChurchError::NotReconciled { difference, .. }) => {
            println!("  ✗ Refused: difference is {}", difference);
        }
        Err(e) => return Err(e.into()),
        Ok(_) => println!("  ✓ Closed"),
    }
    println!();

    // 3. Enter the missing envelope and try again
    println!("✍️  Entering the missing contribution...");
    let envelope = ContributionBuilder::new("B004")
        .member("m004", "Peter Jones")
        .amount(BigDecimal::from(100))
        .fund("Building Fund")
        .method(PaymentMethod::Check)
        .check_number("456")
        .date(NaiveDate::from_ymd_opt(2023, 11, 5).ok_or("invalid date")?)
        .build()?;
    manager.add_contribution(envelope).await?;

    let reconciliation = manager.reconcile("B004").await?;
    println!(
        "  Entered {} of {} ({} items)",
        format_amount(&reconciliation.entered_total, &reconciliation.currency),
        format_amount(&reconciliation.counted_total, &reconciliation.currency),
        reconciliation.item_count
    );

    let closed = manager.close_batch("B004").await?;
    println!("  ✓ {} is now {}\n", closed.id, closed.status);

    // 4. Printable report
    println!("🖨️  Batch Report\n");
    let report = manager.batch_report("B004", &config.church_name).await?;
    println!("{}", report.render_text());

    // 5. Who may open the print view
    println!("🔑 Access to the print view...");
    for role in [Role::Admin, Role::FinanceAdmin, Role::Pastor, Role::Member] {
        let decision = authorize("/dashboard/giving/batch/B004/print", &Session::signed_in(role));
        let outcome = match decision {
            RouteDecision::Allow(_) => "allowed".to_string(),
            RouteDecision::Redirect(to) => format!("redirected to {}", to),
            RouteDecision::NotFound { home } => format!("not found (home: {})", home),
        };
        println!("  {:<16} {}", role.as_str(), outcome);
    }

    Ok(())
}
