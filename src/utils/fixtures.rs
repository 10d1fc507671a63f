//! Sample records for demos and tests
//!
//! Four batches matching a typical month of Sunday offerings (three closed and
//! one open and out of balance) plus the members who gave into them.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;

use crate::traits::*;
use crate::types::*;

fn cents(value: i64) -> BigDecimal {
    BigDecimal::new(value.into(), 2)
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

fn member(id: &str, first_name: &str, last_name: &str) -> Member {
    Member {
        id: id.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        preferred_name: None,
        email: None,
        phone: None,
        membership_status: MembershipStatus::Member,
        join_date: None,
        created_at: chrono::Utc::now().naive_utc(),
    }
}

fn giver(id: &str, name: &str) -> Donor {
    Donor::Member {
        id: id.to_string(),
        name: name.to_string(),
    }
}

struct Line<'a> {
    id: &'a str,
    donor: Donor,
    fund: &'a str,
    method: PaymentMethod,
    check_number: Option<&'a str>,
    amount: BigDecimal,
}

#[allow(clippy::too_many_arguments)]
fn batch(
    id: &str,
    name: &str,
    created: NaiveDate,
    currency: &str,
    counted: BigDecimal,
    entered_by: &str,
    closed: Option<NaiveDate>,
    lines: Vec<Line<'_>>,
) -> (Batch, Vec<Contribution>) {
    let mut batch = Batch::new(
        id.to_string(),
        name.to_string(),
        created,
        currency.to_string(),
        counted,
    );
    batch.entered_by = Some(entered_by.to_string());
    if let Some(closed_on) = closed {
        batch.mark_closed(closed_on);
    }

    let contributions = lines
        .into_iter()
        .map(|line| Contribution {
            id: line.id.to_string(),
            batch_id: id.to_string(),
            donor: line.donor,
            fund: line.fund.to_string(),
            method: line.method,
            check_number: line.check_number.map(str::to_string),
            amount: line.amount,
            date: created,
            transaction_id: None,
            notes: None,
            created_at: chrono::Utc::now().naive_utc(),
        })
        .collect();

    (batch, contributions)
}

/// Members referenced by the sample batches
pub fn sample_members() -> Vec<Member> {
    vec![
        member("m002", "Jane", "Doe"),
        member("m003", "John", "Smith"),
        member("m004", "Peter", "Jones"),
    ]
}

/// Sample batches with their line items
pub fn sample_batches() -> Vec<(Batch, Vec<Contribution>)> {
    vec![
        batch(
            "B001",
            "Sunday Offering 2023-10-29",
            date(2023, 10, 29),
            "USD",
            cents(125050),
            "Admin User",
            Some(date(2023, 10, 30)),
            vec![
                Line {
                    id: "c101",
                    donor: giver("m003", "John Smith"),
                    fund: "General Tithes",
                    method: PaymentMethod::Swipe,
                    check_number: None,
                    amount: cents(20000),
                },
                Line {
                    id: "c102",
                    donor: giver("m004", "Peter Jones"),
                    fund: "General Tithes",
                    method: PaymentMethod::Cash,
                    check_number: None,
                    amount: cents(5000),
                },
                Line {
                    id: "c103",
                    donor: Donor::Anonymous,
                    fund: "Loose Offering",
                    method: PaymentMethod::Cash,
                    check_number: None,
                    amount: cents(100050),
                },
            ],
        ),
        batch(
            "B002",
            "SWIPE Machine 2023-10-29",
            date(2023, 10, 29),
            "ZiG",
            cents(45000),
            "System",
            Some(date(2023, 10, 29)),
            vec![Line {
                id: "c201",
                donor: Donor::Named("SWIPE Machine Summary".to_string()),
                fund: "General Tithes",
                method: PaymentMethod::Card,
                check_number: None,
                amount: cents(45000),
            }],
        ),
        batch(
            "B003",
            "Youth Fundraiser",
            date(2023, 10, 20),
            "ZiG",
            cents(5000000),
            "Admin User",
            Some(date(2023, 10, 21)),
            vec![
                Line {
                    id: "c301",
                    donor: giver("m002", "Jane Doe"),
                    fund: "Youth Fund",
                    method: PaymentMethod::Cash,
                    check_number: None,
                    amount: cents(1500000),
                },
                Line {
                    id: "c302",
                    donor: giver("m003", "John Smith"),
                    fund: "Youth Fund",
                    method: PaymentMethod::Cash,
                    check_number: None,
                    amount: cents(3500000),
                },
            ],
        ),
        batch(
            "B004",
            "Sunday Offering 2023-11-05",
            date(2023, 11, 5),
            "USD",
            cents(97500),
            "Finance Team",
            None,
            vec![
                Line {
                    id: "c001",
                    donor: giver("m002", "Jane Doe"),
                    fund: "General Tithes",
                    method: PaymentMethod::Check,
                    check_number: Some("123"),
                    amount: cents(10000),
                },
                Line {
                    id: "c002",
                    donor: giver("m003", "John Smith"),
                    fund: "Missions Fund",
                    method: PaymentMethod::Cash,
                    check_number: None,
                    amount: cents(2500),
                },
                Line {
                    id: "c003",
                    donor: Donor::Anonymous,
                    fund: "Loose Offering",
                    method: PaymentMethod::Cash,
                    check_number: None,
                    amount: cents(75000),
                },
            ],
        ),
    ]
}

/// Load the sample members, batches and contributions into a storage backend
pub async fn seed<S>(storage: &mut S) -> ChurchResult<()>
where
    S: GivingStorage + DirectoryStorage,
{
    for member in sample_members() {
        storage.save_member(&member).await?;
    }

    for (batch, contributions) in sample_batches() {
        storage.save_batch(&batch).await?;
        for contribution in &contributions {
            storage.save_contribution(contribution).await?;
        }
    }

    Ok(())
}
