//! Per-tool credit costs.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::ToolKind;

/// Fixed credit cost per tool invocation.
///
/// The default table matches the platform's standard pricing; deployments may
/// override individual entries. Tools missing from the table fall back to a
/// cost of 1 credit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostTable {
    /// Credit cost by tool.
    pub costs: HashMap<ToolKind, i64>,
}

impl Default for CostTable {
    fn default() -> Self {
        let mut costs = HashMap::new();
        costs.insert(ToolKind::LiveTv, 1);
        costs.insert(ToolKind::TamashaOtp, 2);
        costs.insert(ToolKind::TempEmail, 1);
        costs.insert(ToolKind::YoutubeDownload, 3);
        costs.insert(ToolKind::ImageEnhance, 2);
        costs.insert(ToolKind::PhoneLookup, 1);
        costs.insert(ToolKind::EyeconLookup, 1);
        Self { costs }
    }
}

impl CostTable {
    /// Get the credit cost of one invocation of `tool`.
    #[must_use]
    pub fn cost_of(&self, tool: ToolKind) -> i64 {
        self.costs.get(&tool).copied().unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_costs() {
        let table = CostTable::default();
        assert_eq!(table.cost_of(ToolKind::LiveTv), 1);
        assert_eq!(table.cost_of(ToolKind::TamashaOtp), 2);
        assert_eq!(table.cost_of(ToolKind::YoutubeDownload), 3);
        assert_eq!(table.cost_of(ToolKind::ImageEnhance), 2);
    }

    #[test]
    fn every_tool_is_priced() {
        let table = CostTable::default();
        for tool in ToolKind::ALL {
            assert!(table.cost_of(tool) >= 1);
        }
    }

    #[test]
    fn missing_entry_falls_back_to_one() {
        let table = CostTable {
            costs: HashMap::new(),
        };
        assert_eq!(table.cost_of(ToolKind::EyeconLookup), 1);
    }
}
