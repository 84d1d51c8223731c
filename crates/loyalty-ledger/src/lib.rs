//! Points ledger for the loyalty program.
//!
//! This crate provides:
//!
//! - [`LedgerStore`]: customers and transactions, earn/redeem/enroll operations,
//!   and write-through persistence to a [`loyalty_store::BlobStore`]
//! - [`report`]: customer standing, dashboard figures, and customer search
//! - [`export`]: CSV export of the customer list
//!
//! # Example
//!
//! ```
//! use loyalty_core::NewCustomer;
//! use loyalty_ledger::LedgerStore;
//! use loyalty_store::MemoryStore;
//!
//! let mut ledger = LedgerStore::open(MemoryStore::new());
//! let customer = ledger
//!     .add_customer(NewCustomer::new("Ada", "ada@example.com"))
//!     .unwrap();
//!
//! ledger.add_points(&customer.id, 150, "Welcome bonus").unwrap();
//! assert_eq!(ledger.customer(&customer.id).unwrap().points, 150);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod export;
pub mod ledger;
pub mod report;

pub use export::{export_customers_csv, export_file_name, CSV_HEADERS};
pub use ledger::{today, Adjustment, LedgerStore};
pub use report::{CustomerFilter, CustomerSummary, DashboardStats, TierCount};
