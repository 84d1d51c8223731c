//! The points ledger.
//!
//! [`LedgerStore`] owns the customer and transaction collections, applies
//! earn/redeem/enroll operations, and writes each changed collection through
//! the injected [`BlobStore`] before reporting success.

use chrono::{NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use loyalty_core::{
    seed, Customer, CustomerId, LoyaltyError, NewCustomer, PointsAmount, PointsTransaction,
    ProfileUpdate, Result, Reward, TierPolicy, TransactionKind,
};
use loyalty_store::{BlobStore, Slot};

use crate::export::export_customers_csv;
use crate::report::{CustomerFilter, CustomerSummary, DashboardStats};

/// The outcome of a successful points adjustment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Adjustment {
    /// The transaction that was recorded.
    pub transaction: PointsTransaction,

    /// Balance before the adjustment.
    pub balance_before: u64,

    /// Balance after the adjustment.
    pub balance_after: u64,
}

impl Adjustment {
    /// Points actually added or removed. Smaller than the recorded amount when
    /// a redemption was clamped at zero.
    #[must_use]
    pub fn applied(&self) -> u64 {
        self.balance_before.abs_diff(self.balance_after)
    }

    /// Whether the balance could not cover the full redemption.
    #[must_use]
    pub fn was_clamped(&self) -> bool {
        self.applied() < self.transaction.amount
    }
}

/// Customer balances plus the transaction history that justifies them.
///
/// Transactions are kept most recent first; that order is what gets stored
/// and what readers see.
pub struct LedgerStore<S> {
    storage: S,
    customers: Vec<Customer>,
    transactions: Vec<PointsTransaction>,
    rewards: Vec<Reward>,
    policy: TierPolicy,
}

impl<S: BlobStore> LedgerStore<S> {
    /// Load the ledger from storage.
    ///
    /// A slot that is missing, blank, unreadable, or not valid JSON is replaced
    /// by the seed dataset. The seed is not written back until something changes.
    pub fn open(storage: S) -> Self {
        let customers = load_slot(&storage, Slot::Customers, seed::customers);
        let transactions = load_slot(&storage, Slot::Transactions, seed::transactions);
        let rewards = load_slot(&storage, Slot::Rewards, seed::rewards);

        tracing::info!(
            customers = customers.len(),
            transactions = transactions.len(),
            rewards = rewards.len(),
            "Ledger loaded"
        );

        Self {
            storage,
            customers,
            transactions,
            rewards,
            policy: TierPolicy::standard(),
        }
    }

    /// Replace the tier policy.
    #[must_use]
    pub fn with_policy(mut self, policy: TierPolicy) -> Self {
        self.policy = policy;
        self
    }

    // =========================================================================
    // Read access
    // =========================================================================

    /// All customers, newest enrollment first.
    #[must_use]
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    /// All transactions, most recent first.
    #[must_use]
    pub fn transactions(&self) -> &[PointsTransaction] {
        &self.transactions
    }

    /// The rewards catalog.
    #[must_use]
    pub fn rewards(&self) -> &[Reward] {
        &self.rewards
    }

    /// The tier policy in effect.
    #[must_use]
    pub fn policy(&self) -> &TierPolicy {
        &self.policy
    }

    /// The storage backend.
    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Look up a customer.
    #[must_use]
    pub fn customer(&self, customer_id: &CustomerId) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == *customer_id)
    }

    /// A customer's transactions, most recent first.
    #[must_use]
    pub fn history(&self, customer_id: &CustomerId) -> Vec<&PointsTransaction> {
        self.transactions
            .iter()
            .filter(|t| t.customer_id == *customer_id)
            .collect()
    }

    /// Tier standing and lifetime totals for a customer.
    #[must_use]
    pub fn summary(&self, customer_id: &CustomerId) -> Option<CustomerSummary<'_>> {
        self.customer(customer_id)
            .map(|c| CustomerSummary::for_customer(c, &self.transactions, &self.policy))
    }

    /// Program-wide figures.
    #[must_use]
    pub fn dashboard(&self) -> DashboardStats<'_> {
        DashboardStats::compute(&self.customers, &self.transactions, &self.policy)
    }

    /// Customers matching a search filter, in stored order.
    #[must_use]
    pub fn search(&self, filter: &CustomerFilter) -> Vec<&Customer> {
        filter.apply(&self.customers, &self.policy)
    }

    /// The customer list as CSV.
    #[must_use]
    pub fn export_csv(&self) -> String {
        export_customers_csv(&self.customers, &self.transactions, &self.policy)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Credit points to a customer.
    ///
    /// Records an `earned` transaction at the front of the history and raises
    /// the balance. An unknown customer id changes nothing and yields `Ok(None)`.
    /// Both happen or neither does: if the balance cannot be stored, the
    /// stored history is put back as it was.
    ///
    /// # Errors
    ///
    /// - [`LoyaltyError::InvalidAmount`] if `amount` is not positive; nothing changes.
    /// - [`LoyaltyError::Storage`] if a collection cannot be written.
    pub fn add_points(
        &mut self,
        customer_id: &CustomerId,
        amount: i64,
        note: &str,
    ) -> Result<Option<Adjustment>> {
        let amount = PointsAmount::new(amount)?;
        self.adjust(customer_id, TransactionKind::Earned, amount, note)
    }

    /// Redeem points from a customer.
    ///
    /// The balance is clamped at zero when `amount` exceeds it; the transaction
    /// still records the requested amount. An unknown customer id changes
    /// nothing and yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// - [`LoyaltyError::InvalidAmount`] if `amount` is not positive; nothing changes.
    /// - [`LoyaltyError::Storage`] if a collection cannot be written.
    pub fn subtract_points(
        &mut self,
        customer_id: &CustomerId,
        amount: i64,
        note: &str,
    ) -> Result<Option<Adjustment>> {
        let amount = PointsAmount::new(amount)?;
        self.adjust(customer_id, TransactionKind::Redeemed, amount, note)
    }

    fn adjust(
        &mut self,
        customer_id: &CustomerId,
        kind: TransactionKind,
        amount: PointsAmount,
        note: &str,
    ) -> Result<Option<Adjustment>> {
        let Some(index) = self.customers.iter().position(|c| c.id == *customer_id) else {
            tracing::warn!(
                customer_id = %customer_id,
                kind = %kind,
                amount = amount.get(),
                "Ignoring points adjustment for unknown customer"
            );
            return Ok(None);
        };

        let date = today();
        let owner = customer_id.clone();
        let transaction = match kind {
            TransactionKind::Earned => PointsTransaction::earned(owner, amount, note, date),
            TransactionKind::Redeemed => PointsTransaction::redeemed(owner, amount, note, date),
        };

        let balance_before = self.customers[index].points;
        let balance_after = match kind {
            TransactionKind::Earned => balance_before.saturating_add(amount.get()),
            TransactionKind::Redeemed => balance_before.saturating_sub(amount.get()),
        };

        let mut updated = self.customers[index].clone();
        updated.points = balance_after;

        let next: Vec<&PointsTransaction> = std::iter::once(&transaction)
            .chain(&self.transactions)
            .collect();
        self.persist(Slot::Transactions, &next)?;
        if let Err(e) = self.persist(Slot::Customers, &self.with_replaced(index, &updated)) {
            return Err(self.restore(Slot::Transactions, &self.transactions, e));
        }

        self.transactions.insert(0, transaction.clone());
        self.customers[index] = updated;

        let adjustment = Adjustment {
            transaction,
            balance_before,
            balance_after,
        };

        if adjustment.was_clamped() {
            tracing::warn!(
                customer_id = %customer_id,
                requested = amount.get(),
                applied = adjustment.applied(),
                "Redemption exceeded balance, clamped to zero"
            );
        }
        tracing::info!(
            customer_id = %customer_id,
            transaction_id = %adjustment.transaction.id,
            kind = %kind,
            amount = amount.get(),
            balance = balance_after,
            "Points adjusted"
        );

        Ok(Some(adjustment))
    }

    /// Enroll a customer.
    ///
    /// The new record gets a fresh id, today's join date, and a zero balance,
    /// and is placed at the front of the customer list.
    ///
    /// # Errors
    ///
    /// - [`LoyaltyError::InvalidCustomer`] if name or email is missing.
    /// - [`LoyaltyError::Storage`] if the customer list cannot be written.
    pub fn add_customer(&mut self, fields: NewCustomer) -> Result<Customer> {
        fields.validate()?;

        let mut customer = Customer::enroll(fields, today());
        while self.customer(&customer.id).is_some() {
            customer.id = CustomerId::generate();
        }

        let next: Vec<&Customer> = std::iter::once(&customer)
            .chain(&self.customers)
            .collect();
        self.persist(Slot::Customers, &next)?;
        self.customers.insert(0, customer.clone());

        tracing::info!(customer_id = %customer.id, "Customer enrolled");
        Ok(customer)
    }

    /// Edit a customer's name, address, and date of birth.
    ///
    /// Returns `Ok(None)` without changes if the customer does not exist.
    ///
    /// # Errors
    ///
    /// - [`LoyaltyError::InvalidCustomer`] if the new name is blank.
    /// - [`LoyaltyError::Storage`] if the customer list cannot be written.
    pub fn update_profile(
        &mut self,
        customer_id: &CustomerId,
        update: &ProfileUpdate,
    ) -> Result<Option<Customer>> {
        let Some(index) = self.customers.iter().position(|c| c.id == *customer_id) else {
            tracing::warn!(customer_id = %customer_id, "Ignoring profile update for unknown customer");
            return Ok(None);
        };

        let mut updated = self.customers[index].clone();
        update.apply_to(&mut updated)?;

        self.persist(Slot::Customers, &self.with_replaced(index, &updated))?;
        self.customers[index] = updated.clone();

        tracing::info!(customer_id = %customer_id, "Customer profile updated");
        Ok(Some(updated))
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    fn with_replaced<'a>(&'a self, index: usize, replacement: &'a Customer) -> Vec<&'a Customer> {
        self.customers
            .iter()
            .enumerate()
            .map(|(i, c)| if i == index { replacement } else { c })
            .collect()
    }

    /// Put a slot back to `previous` after a later write in the same
    /// operation failed, and return the error to report.
    fn restore<T: Serialize>(&self, slot: Slot, previous: &[T], cause: LoyaltyError) -> LoyaltyError {
        match self.persist(slot, previous) {
            Ok(()) => {
                tracing::warn!(slot = %slot, error = %cause, "Write failed, restored previous slot contents");
                cause
            }
            Err(rollback) => {
                tracing::error!(
                    slot = %slot,
                    error = %cause,
                    rollback_error = %rollback,
                    "Write failed and slot could not be restored"
                );
                LoyaltyError::Storage(format!("{cause}; restoring {slot} also failed: {rollback}"))
            }
        }
    }

    fn persist<T: Serialize>(&self, slot: Slot, items: &[T]) -> Result<()> {
        let json = serde_json::to_string(items)?;
        self.storage
            .write(slot.key(), &json)
            .map_err(|e| LoyaltyError::Storage(format!("writing {slot}: {e}")))?;
        tracing::debug!(slot = %slot, records = items.len(), "Slot persisted");
        Ok(())
    }
}

/// Read one slot, falling back to its seed on any problem.
fn load_slot<S, T>(storage: &S, slot: Slot, seed: fn() -> Vec<T>) -> Vec<T>
where
    S: BlobStore,
    T: DeserializeOwned,
{
    match storage.read(slot.key()) {
        Ok(Some(raw)) if !raw.trim().is_empty() => match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(slot = %slot, error = %e, "Stored slot is corrupt, using seed data");
                seed()
            }
        },
        Ok(_) => {
            tracing::debug!(slot = %slot, "Slot is empty, using seed data");
            seed()
        }
        Err(e) => {
            tracing::warn!(slot = %slot, error = %e, "Slot could not be read, using seed data");
            seed()
        }
    }
}

/// Today's calendar date in UTC.
#[must_use]
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
