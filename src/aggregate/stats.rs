//! Spending statistics.
//!
//! Every gift counts toward spend regardless of its status.

use crate::model::{Child, Document};
use crate::types::{ChildId, GiftStatus};
use serde::Serialize;

/// Largest spread between the highest and lowest spending child that still
/// counts as balanced, in currency units.
pub const BALANCE_THRESHOLD: f64 = 10.0;

/// Sum of the prices of all gifts of one child.
pub fn total_spent_child(child: &Child) -> f64 {
    child.gifts().iter().map(|g| g.price()).sum()
}

/// Sum of [`total_spent_child`] over all children.
pub fn total_spent(doc: &Document) -> f64 {
    doc.children().iter().map(total_spent_child).sum()
}

pub fn gift_count_child(child: &Child) -> usize {
    child.gifts().len()
}

pub fn gift_count(doc: &Document) -> usize {
    doc.children().iter().map(gift_count_child).sum()
}

/// Mean gift price, 0 when there are no gifts.
pub fn average_price(doc: &Document) -> f64 {
    match gift_count(doc) {
        0 => 0.0,
        n => total_spent(doc) / n as f64,
    }
}

/// Spend grouped by child name, in first-appearance order.
///
/// Names are a display grouping, not an identity: two children with the same
/// name share one entry.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SpendingByChild(Vec<(String, f64)>);

impl SpendingByChild {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(n, v)| (n.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub fn spending_by_child(doc: &Document) -> SpendingByChild {
    let mut groups: Vec<(String, f64)> = Vec::new();
    for child in doc.children() {
        let spent = total_spent_child(child);
        match groups.iter_mut().find(|(n, _)| n == child.name()) {
            Some((_, total)) => *total += spent,
            None => groups.push((child.name().to_string(), spent)),
        }
    }
    SpendingByChild(groups)
}

/// Whether spending is spread evenly across children.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BudgetBalance {
    pub balanced: bool,
    /// Highest child total minus lowest child total.
    pub spread: f64,
    pub message: String,
}

pub fn budget_balance(doc: &Document) -> BudgetBalance {
    let totals: Vec<f64> = doc.children().iter().map(total_spent_child).collect();
    if totals.len() < 2 {
        return BudgetBalance {
            balanced: true,
            spread: 0.0,
            message: "Only one child, easy to balance!".to_string(),
        };
    }

    let max = totals.iter().copied().fold(f64::MIN, f64::max);
    let min = totals.iter().copied().fold(f64::MAX, f64::min);
    let spread = max - min;

    if spread <= BALANCE_THRESHOLD {
        BudgetBalance {
            balanced: true,
            spread,
            message: format!(
                "Nice work! Budgets are balanced within ${:.0}.",
                BALANCE_THRESHOLD
            ),
        }
    } else {
        BudgetBalance {
            balanced: false,
            spread,
            message: format!("Budgets vary by ${spread:.2}. Time to even it out!"),
        }
    }
}

/// Spend measured against a child's budget.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BudgetStatus {
    pub budget: f64,
    pub spent: f64,
    /// Budget left, negative when over budget.
    pub remaining: f64,
    pub over_budget: bool,
}

/// `None` when the child has no budget.
pub fn budget_status(child: &Child) -> Option<BudgetStatus> {
    let budget = child.budget()?;
    let spent = total_spent_child(child);
    Some(BudgetStatus {
        budget,
        spent,
        remaining: budget - spent,
        over_budget: spent > budget,
    })
}

/// Number of gifts in each status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub idea: usize,
    pub purchased: usize,
    pub wrapped: usize,
}

impl StatusCounts {
    pub fn get(&self, status: GiftStatus) -> usize {
        match status {
            GiftStatus::Idea => self.idea,
            GiftStatus::Purchased => self.purchased,
            GiftStatus::Wrapped => self.wrapped,
        }
    }
}

pub fn status_counts(doc: &Document) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for gift in doc.children().iter().flat_map(|c| c.gifts()) {
        match gift.status() {
            GiftStatus::Idea => counts.idea += 1,
            GiftStatus::Purchased => counts.purchased += 1,
            GiftStatus::Wrapped => counts.wrapped += 1,
        }
    }
    counts
}

/// Per-child line of a [`Summary`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChildStats {
    pub id: ChildId,
    pub name: String,
    pub total_spent: f64,
    pub gift_count: usize,
    pub budget: Option<BudgetStatus>,
}

/// Everything a dashboard shows about the current document.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub total_spent: f64,
    pub gift_count: usize,
    pub average_price: f64,
    pub statuses: StatusCounts,
    pub children: Vec<ChildStats>,
    pub balance: BudgetBalance,
}

impl Summary {
    pub fn of(doc: &Document) -> Self {
        let children = doc
            .children()
            .iter()
            .map(|c| ChildStats {
                id: c.id(),
                name: c.name().to_string(),
                total_spent: total_spent_child(c),
                gift_count: gift_count_child(c),
                budget: budget_status(c),
            })
            .collect();

        Self {
            total_spent: total_spent(doc),
            gift_count: gift_count(doc),
            average_price: average_price(doc),
            statuses: status_counts(doc),
            children,
            balance: budget_balance(doc),
        }
    }
}
