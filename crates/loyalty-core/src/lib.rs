//! Core types and the tier policy for the loyalty ledger.
//!
//! This crate provides the foundational types used throughout the workspace:
//!
//! - **Identifiers**: `CustomerId`, `TransactionId`, `RewardId`
//! - **Customers**: `Customer`, `NewCustomer`, `ProfileUpdate`
//! - **Transactions**: `PointsTransaction`, `TransactionKind`, `PointsAmount`
//! - **Tiers**: `TierPolicy`, `TierBand`
//! - **Rewards**: `Reward`
//! - **Seed data**: the dataset used before anything has been stored
//!
//! # Points
//!
//! Points are whole, non-negative numbers stored as `u64`. Earning adds to a
//! balance; redeeming subtracts and clamps at zero.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod customer;
pub mod error;
pub mod ids;
pub mod reward;
pub mod seed;
pub mod tier;
pub mod transaction;

pub use customer::{Customer, NewCustomer, ProfileUpdate};
pub use error::{LoyaltyError, Result};
pub use ids::{CustomerId, IdError, RewardId, TransactionId};
pub use reward::{rewards_by_cost, Reward};
pub use tier::{TierBand, TierPolicy, BRONZE_MIN_POINTS, GOLD_MIN_POINTS, SILVER_MIN_POINTS};
pub use transaction::{total_for, PointsAmount, PointsTransaction, TransactionKind, DEFAULT_NOTE};
