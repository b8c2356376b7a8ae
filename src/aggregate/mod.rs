//! Derived statistics over a document.
//!
//! Everything here is a pure function of a borrowed [`Document`](crate::Document):
//! nothing is cached and nothing is mutated, so callers recompute after every
//! change.

mod query;
mod stats;

pub use query::{child_names, GiftQuery, GiftRow, GiftSort};
pub use stats::{
    average_price, budget_balance, budget_status, gift_count, gift_count_child,
    spending_by_child, status_counts, total_spent, total_spent_child, BudgetBalance,
    BudgetStatus, ChildStats, SpendingByChild, StatusCounts, Summary, BALANCE_THRESHOLD,
};
