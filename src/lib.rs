//! # Church Core
//!
//! Core library for church administration: giving batches and their
//! reconciliation, currency display, a member/group/event directory, and
//! role-based route authorization for the admin console and member portal.
//!
//! ## Features
//!
//! - **Batch reconciliation**: Exact decimal totals with a configurable tolerance
//! - **Giving**: Contribution entry, batch closing, search and printable reports
//! - **Currency formatting**: en-US style amounts for any ISO 4217 code
//! - **Directory**: Members, groups, events, event sign-ups and attendance reports
//! - **Access control**: Role guards for every console and portal route
//! - **Storage abstraction**: Database-agnostic design with trait-based storage
//!
//! ## Quick Start
//!
//! ```rust
//! use church_core::{format_amount, compute_difference, is_reconciled_default};
//! use bigdecimal::BigDecimal;
//! use std::str::FromStr;
//!
//! let entered = BigDecimal::from_str("875.00").unwrap();
//! let counted = BigDecimal::from_str("975.00").unwrap();
//! let difference = compute_difference(&entered, &counted);
//!
//! assert!(!is_reconciled_default(&difference));
//! assert_eq!(format_amount(&difference, "USD"), "-$100.00");
//! ```

pub mod access;
pub mod config;
pub mod currency;
pub mod directory;
pub mod giving;
pub mod reconciliation;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use access::{authorize, Role, RouteDecision, RouteMatch, RouteTable, Session};
pub use config::ChurchConfig;
pub use currency::{format_amount, format_currency};
pub use directory::*;
pub use giving::*;
pub use reconciliation::*;
pub use traits::*;
pub use types::*;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Church Core tracing initialized.");
    });
}
