//! Inventory summary supplied by the inventory collaborator.

use serde::{Deserialize, Serialize};

/// Coarse inventory item category as the collaborator reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InventoryCategory {
    Application,
    Infrastructure,
    Other,
}

/// One structured inventory line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub name: String,
    pub category: InventoryCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_cost: Option<f64>,
    /// True when the item is shared with the parent/seller estate rather
    /// than dedicated to the target.
    pub shared: bool,
}

/// Inventory summary used by the cost model's transitional-service scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventorySummary {
    pub items: Vec<InventoryItem>,
}

impl InventorySummary {
    pub fn new(items: Vec<InventoryItem>) -> Self {
        Self { items }
    }

    pub fn shared_application_count(&self) -> usize {
        self.count_shared(InventoryCategory::Application)
    }

    pub fn shared_infrastructure_count(&self) -> usize {
        self.count_shared(InventoryCategory::Infrastructure)
    }

    fn count_shared(&self, category: InventoryCategory) -> usize {
        self.items
            .iter()
            .filter(|item| item.shared && item.category == category)
            .count()
    }
}
