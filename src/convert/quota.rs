//! Quota ledger - tracks provider cost units spent during one conversion run.
//!
//! Providers like the YouTube Data API charge a fixed number of units per
//! operation against a daily allowance. The ledger mirrors that accounting
//! locally so a run can stop *before* the provider starts refusing calls.
//!
//! The usable ceiling is `budget - safety_margin`; a charge that would push
//! `spent` past the ceiling is refused and leaves `spent` unchanged.

use serde::{Deserialize, Serialize};

/// A provider operation that carries a cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    CreatePlaylist,
    Search,
    AppendItem,
}

/// Cost in provider units for each operation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostTable {
    pub create_playlist: u64,
    pub search: u64,
    pub append_item: u64,
}

impl CostTable {
    /// YouTube Data API v3 unit costs
    pub const YOUTUBE: CostTable = CostTable {
        create_playlist: 50,
        search: 100,
        append_item: 50,
    };

    /// Spotify has no unit quota; every request counts as one
    pub const SPOTIFY: CostTable = CostTable {
        create_playlist: 1,
        search: 1,
        append_item: 1,
    };

    pub fn cost(&self, kind: OperationKind) -> u64 {
        match kind {
            OperationKind::CreatePlaylist => self.create_playlist,
            OperationKind::Search => self.search,
            OperationKind::AppendItem => self.append_item,
        }
    }

    /// Most expensive single operation
    pub fn worst_case(&self) -> u64 {
        self.create_playlist.max(self.search).max(self.append_item)
    }
}

impl Default for CostTable {
    fn default() -> Self {
        Self::YOUTUBE
    }
}

/// Budget settings for one destination provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotaSettings {
    /// Provider ceiling for the accounting period (e.g. daily allowance)
    pub daily_budget: u64,
    /// Reserved headroom below the budget; defaults to the worst-case operation cost
    pub safety_margin: Option<u64>,
    pub costs: CostTable,
}

impl QuotaSettings {
    pub fn youtube() -> Self {
        Self {
            daily_budget: 10_000,
            safety_margin: None,
            costs: CostTable::YOUTUBE,
        }
    }

    pub fn spotify() -> Self {
        Self {
            daily_budget: 100_000,
            safety_margin: None,
            costs: CostTable::SPOTIFY,
        }
    }

    pub fn effective_safety_margin(&self) -> u64 {
        self.safety_margin.unwrap_or_else(|| self.costs.worst_case())
    }
}

impl Default for QuotaSettings {
    fn default() -> Self {
        Self::youtube()
    }
}

/// A charge was refused because it would cross the usable ceiling
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind:?} costs {cost} units but only {remaining} of {ceiling} remain (spent {spent})")]
pub struct QuotaExceeded {
    pub kind: OperationKind,
    pub cost: u64,
    pub spent: u64,
    pub remaining: u64,
    pub ceiling: u64,
}

/// Per-run cost counter
#[derive(Debug, Clone)]
pub struct QuotaLedger {
    spent: u64,
    budget: u64,
    safety_margin: u64,
    costs: CostTable,
}

impl QuotaLedger {
    /// Start a fresh ledger at zero
    pub fn new(settings: &QuotaSettings) -> Self {
        Self {
            spent: 0,
            budget: settings.daily_budget,
            safety_margin: settings.effective_safety_margin(),
            costs: settings.costs,
        }
    }

    pub fn spent(&self) -> u64 {
        self.spent
    }

    pub fn budget(&self) -> u64 {
        self.budget
    }

    pub fn cost(&self, kind: OperationKind) -> u64 {
        self.costs.cost(kind)
    }

    /// Highest value `spent` may reach
    pub fn ceiling(&self) -> u64 {
        self.budget.saturating_sub(self.safety_margin)
    }

    /// Nominal units left before the provider budget
    pub fn remaining_budget(&self) -> u64 {
        self.budget.saturating_sub(self.spent)
    }

    /// Units left before the ceiling
    pub fn headroom(&self) -> u64 {
        self.ceiling().saturating_sub(self.spent)
    }

    pub fn would_exceed(&self, kind: OperationKind) -> bool {
        self.cost(kind) > self.headroom()
    }

    /// Record the cost of `kind`, returning the new total.
    pub fn charge(&mut self, kind: OperationKind) -> Result<u64, QuotaExceeded> {
        let cost = self.cost(kind);
        if self.would_exceed(kind) {
            return Err(QuotaExceeded {
                kind,
                cost,
                spent: self.spent,
                remaining: self.headroom(),
                ceiling: self.ceiling(),
            });
        }
        self.spent += cost;
        Ok(self.spent)
    }

    /// How many times the given sequence of operations still fits under the ceiling.
    ///
    /// Returns `None` when the sequence is free.
    pub fn estimated_capacity(&self, kinds: &[OperationKind]) -> Option<u64> {
        let per_round: u64 = kinds.iter().map(|k| self.cost(*k)).sum();
        (per_round > 0).then(|| self.headroom() / per_round)
    }
}


/// Property-based tests using proptest
#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn operation_kind() -> impl Strategy<Value = OperationKind> {
        prop_oneof![
            Just(OperationKind::CreatePlaylist),
            Just(OperationKind::Search),
            Just(OperationKind::AppendItem),
        ]
    }

    proptest! {
        /// `spent` always equals the sum of the successful charges
        #[test]
        fn spent_is_sum_of_successful_charges(
            budget in 0u64..20_000,
            margin in 0u64..500,
            kinds in prop::collection::vec(operation_kind(), 0..200),
        ) {
            let settings = QuotaSettings {
                daily_budget: budget,
                safety_margin: Some(margin),
                costs: CostTable::YOUTUBE,
            };
            let mut ledger = QuotaLedger::new(&settings);
            let mut expected = 0u64;

            for kind in kinds {
                let before = ledger.spent();
                match ledger.charge(kind) {
                    Ok(total) => {
                        expected += CostTable::YOUTUBE.cost(kind);
                        prop_assert_eq!(total, expected);
                        prop_assert!(total <= budget.saturating_sub(margin));
                    }
                    Err(_) => prop_assert_eq!(ledger.spent(), before),
                }
                prop_assert!(ledger.spent() >= before);
            }
            prop_assert_eq!(ledger.spent(), expected);
        }
    }
}
