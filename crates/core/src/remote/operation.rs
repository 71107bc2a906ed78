//! The vendor operations the bridge knows how to call.

use std::fmt;
use std::time::Duration;

/// Item classification refreshes get a shorter budget than the long lane.
const ITEM_CLASSIFICATION_BUDGET_SECS: u64 = 1200;

/// Named task lanes with their own wall-clock budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lane {
    /// Per-document submissions and searches.
    Default,
    /// Bulk reference-data refreshes.
    Long,
}

impl Lane {
    /// Returns the lane name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Long => "long",
        }
    }
}

/// Budgets applied to each lane.
#[derive(Debug, Clone, Copy)]
pub struct LaneBudgets {
    /// Budget of the default lane.
    pub default: Duration,
    /// Budget of the long lane.
    pub long: Duration,
}

impl LaneBudgets {
    /// Budgets from seconds.
    #[must_use]
    pub const fn from_secs(default: u64, long: u64) -> Self {
        Self {
            default: Duration::from_secs(default),
            long: Duration::from_secs(long),
        }
    }

    /// Wall-clock budget for a task running `operation`.
    #[must_use]
    pub fn budget_for(&self, operation: Operation) -> Duration {
        match operation {
            Operation::SearchItemClassifications => self
                .long
                .min(Duration::from_secs(ITEM_CLASSIFICATION_BUDGET_SECS)),
            op if op.lane() == Lane::Long => self.long,
            _ => self.default,
        }
    }
}

impl Default for LaneBudgets {
    fn default() -> Self {
        Self::from_secs(300, 1800)
    }
}

/// A single vendor endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// OSCU device initialization.
    InitializeDevice,
    /// Sales and credit-note transactions.
    SaveSales,
    /// Purchase transactions.
    SavePurchase,
    /// Stock in/out movements.
    SaveStockMovement,
    /// Residual quantity per item.
    SaveStockMaster,
    /// Item registration.
    SaveItem,
    /// Customer lookup by PIN.
    SearchCustomer,
    /// Branch insurance registration.
    SaveBranchInsurance,
    /// Branch customer registration.
    SaveBranchCustomer,
    /// Branch user registration.
    SaveBranchUser,
    /// Imported items awaiting mapping.
    SearchImportedItems,
    /// Imported item status update.
    UpdateImportedItem,
    /// Notices published by the authority.
    SearchNotices,
    /// Stock movements recorded against the taxpayer.
    SearchStockMovements,
    /// Branches registered for the taxpayer.
    SearchBranches,
    /// Item composition (bill of materials).
    SaveItemComposition,
    /// Reference code lists.
    SearchCodeLists,
    /// Item classification list.
    SearchItemClassifications,
}

impl Operation {
    /// Every operation, in route order.
    pub const ALL: [Self; 18] = [
        Self::InitializeDevice,
        Self::SaveSales,
        Self::SavePurchase,
        Self::SaveStockMovement,
        Self::SaveStockMaster,
        Self::SaveItem,
        Self::SearchCustomer,
        Self::SaveBranchInsurance,
        Self::SaveBranchCustomer,
        Self::SaveBranchUser,
        Self::SearchImportedItems,
        Self::UpdateImportedItem,
        Self::SearchNotices,
        Self::SearchStockMovements,
        Self::SearchBranches,
        Self::SaveItemComposition,
        Self::SearchCodeLists,
        Self::SearchItemClassifications,
    ];

    /// Vendor route, relative to the API base URL.
    #[must_use]
    pub const fn route(&self) -> &'static str {
        match self {
            Self::InitializeDevice => "/selectInitOsdcInfo",
            Self::SaveSales => "/TrnsSalesSaveWrReq",
            Self::SavePurchase => "/TrnsPurchaseSaveReq",
            Self::SaveStockMovement => "/StockIOSaveReq",
            Self::SaveStockMaster => "/StockMasterSaveReq",
            Self::SaveItem => "/ItemSaveReq",
            Self::SearchCustomer => "/CustSearchReq",
            Self::SaveBranchInsurance => "/BhfInsuranceSaveReq",
            Self::SaveBranchCustomer => "/BhfCustSaveReq",
            Self::SaveBranchUser => "/BhfUserSaveReq",
            Self::SearchImportedItems => "/ImportItemSearchReq",
            Self::UpdateImportedItem => "/ImportItemUpdateReq",
            Self::SearchNotices => "/NoticeSearchReq",
            Self::SearchStockMovements => "/StockMoveReq",
            Self::SearchBranches => "/BhfSearchReq",
            Self::SaveItemComposition => "/SaveItemComposition",
            Self::SearchCodeLists => "/CodeSearchReq",
            Self::SearchItemClassifications => "/ItemClsSearchReq",
        }
    }

    /// Client method name, used in audit URLs.
    #[must_use]
    pub const fn sdk_method(&self) -> &'static str {
        match self {
            Self::InitializeDevice => "select_init_osdc_info",
            Self::SaveSales => "save_transaction_sales_osdc",
            Self::SavePurchase => "save_purchase",
            Self::SaveStockMovement => "save_stock_movement",
            Self::SaveStockMaster => "save_stock_master",
            Self::SaveItem => "save_item",
            Self::SearchCustomer => "select_customer",
            Self::SaveBranchInsurance => "save_branch_insurance",
            Self::SaveBranchCustomer => "save_branch_customer",
            Self::SaveBranchUser => "save_branch_user",
            Self::SearchImportedItems => "select_imported_items",
            Self::UpdateImportedItem => "update_imported_item",
            Self::SearchNotices => "select_notice_list",
            Self::SearchStockMovements => "select_stock_movements",
            Self::SearchBranches => "select_branches",
            Self::SaveItemComposition => "save_item_composition",
            Self::SearchCodeLists => "select_code_list",
            Self::SearchItemClassifications => "select_item_classes",
        }
    }

    /// Lane the operation's task runs on.
    #[must_use]
    pub const fn lane(&self) -> Lane {
        match self {
            Self::SearchCodeLists | Self::SearchItemClassifications => Lane::Long,
            _ => Lane::Default,
        }
    }

    /// Looks an operation up by route.
    #[must_use]
    pub fn from_route(route: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.route() == route)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sdk_method())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_routes_are_unique() {
        let routes: HashSet<_> = Operation::ALL.iter().map(Operation::route).collect();
        assert_eq!(routes.len(), Operation::ALL.len());
    }

    #[test]
    fn test_from_route_round_trips() {
        for op in Operation::ALL {
            assert_eq!(Operation::from_route(op.route()), Some(op));
        }
        assert_eq!(Operation::from_route("/Unknown"), None);
    }

    #[test]
    fn test_lanes() {
        assert_eq!(Operation::SaveSales.lane(), Lane::Default);
        assert_eq!(Operation::SearchCodeLists.lane(), Lane::Long);
        assert_eq!(Operation::SearchItemClassifications.lane(), Lane::Long);
    }

    #[test]
    fn test_budgets() {
        let budgets = LaneBudgets::default();
        assert_eq!(budgets.budget_for(Operation::SaveSales), Duration::from_secs(300));
        assert_eq!(budgets.budget_for(Operation::SearchCodeLists), Duration::from_secs(1800));
        assert_eq!(
            budgets.budget_for(Operation::SearchItemClassifications),
            Duration::from_secs(1200)
        );

        let tight = LaneBudgets::from_secs(1, 2);
        assert_eq!(
            tight.budget_for(Operation::SearchItemClassifications),
            Duration::from_secs(2)
        );
    }
}
