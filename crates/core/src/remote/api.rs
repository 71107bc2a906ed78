//! The vendor client seam.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use super::error::RemoteError;
use super::operation::Operation;
use super::response::RemoteResponse;
use crate::payload::wire::{
    BranchCustomerPayload, BranchUserPayload, CompositionPayload, CustomerSearchRequest,
    DeviceInitRequest, ImportedItemUpdatePayload, InsurancePayload, ItemPayload,
    LastRequestQuery, PurchasePayload, SalesPayload, StockMasterPayload, StockMovementPayload,
};

fn encode<T: Serialize>(payload: &T) -> Result<Value, RemoteError> {
    serde_json::to_value(payload).map_err(|e| RemoteError::Encode(e.to_string()))
}

/// An authenticated client for one taxpayer branch.
///
/// Implementors provide [`EtimsApi::call`]; the typed methods encode their
/// payload and delegate to it.
#[async_trait]
pub trait EtimsApi: Send + Sync {
    /// Posts `body` to the operation's route and parses the envelope.
    async fn call(&self, operation: Operation, body: Value) -> Result<RemoteResponse, RemoteError>;

    /// `/selectInitOsdcInfo`
    async fn select_init_osdc_info(
        &self,
        request: &DeviceInitRequest,
    ) -> Result<RemoteResponse, RemoteError> {
        self.call(Operation::InitializeDevice, encode(request)?).await
    }

    /// `/TrnsSalesSaveWrReq`
    async fn save_transaction_sales_osdc(
        &self,
        payload: &SalesPayload,
    ) -> Result<RemoteResponse, RemoteError> {
        self.call(Operation::SaveSales, encode(payload)?).await
    }

    /// `/TrnsPurchaseSaveReq`
    async fn save_purchase(&self, payload: &PurchasePayload) -> Result<RemoteResponse, RemoteError> {
        self.call(Operation::SavePurchase, encode(payload)?).await
    }

    /// `/StockIOSaveReq`
    async fn save_stock_movement(
        &self,
        payload: &StockMovementPayload,
    ) -> Result<RemoteResponse, RemoteError> {
        self.call(Operation::SaveStockMovement, encode(payload)?).await
    }

    /// `/StockMasterSaveReq`
    async fn save_stock_master(
        &self,
        payload: &StockMasterPayload,
    ) -> Result<RemoteResponse, RemoteError> {
        self.call(Operation::SaveStockMaster, encode(payload)?).await
    }

    /// `/ItemSaveReq`
    async fn save_item(&self, payload: &ItemPayload) -> Result<RemoteResponse, RemoteError> {
        self.call(Operation::SaveItem, encode(payload)?).await
    }

    /// `/CustSearchReq`
    async fn select_customer(
        &self,
        request: &CustomerSearchRequest,
    ) -> Result<RemoteResponse, RemoteError> {
        self.call(Operation::SearchCustomer, encode(request)?).await
    }

    /// `/BhfInsuranceSaveReq`
    async fn save_branch_insurance(
        &self,
        payload: &InsurancePayload,
    ) -> Result<RemoteResponse, RemoteError> {
        self.call(Operation::SaveBranchInsurance, encode(payload)?).await
    }

    /// `/BhfCustSaveReq`
    async fn save_branch_customer(
        &self,
        payload: &BranchCustomerPayload,
    ) -> Result<RemoteResponse, RemoteError> {
        self.call(Operation::SaveBranchCustomer, encode(payload)?).await
    }

    /// `/BhfUserSaveReq`
    async fn save_branch_user(
        &self,
        payload: &BranchUserPayload,
    ) -> Result<RemoteResponse, RemoteError> {
        self.call(Operation::SaveBranchUser, encode(payload)?).await
    }

    /// `/ImportItemSearchReq`
    async fn select_imported_items(
        &self,
        query: &LastRequestQuery,
    ) -> Result<RemoteResponse, RemoteError> {
        self.call(Operation::SearchImportedItems, encode(query)?).await
    }

    /// `/ImportItemUpdateReq`
    async fn update_imported_item(
        &self,
        payload: &ImportedItemUpdatePayload,
    ) -> Result<RemoteResponse, RemoteError> {
        self.call(Operation::UpdateImportedItem, encode(payload)?).await
    }

    /// `/NoticeSearchReq`
    async fn select_notice_list(
        &self,
        query: &LastRequestQuery,
    ) -> Result<RemoteResponse, RemoteError> {
        self.call(Operation::SearchNotices, encode(query)?).await
    }

    /// `/StockMoveReq`
    async fn select_stock_movements(
        &self,
        query: &LastRequestQuery,
    ) -> Result<RemoteResponse, RemoteError> {
        self.call(Operation::SearchStockMovements, encode(query)?).await
    }

    /// `/BhfSearchReq`
    async fn select_branches(&self, query: &LastRequestQuery) -> Result<RemoteResponse, RemoteError> {
        self.call(Operation::SearchBranches, encode(query)?).await
    }

    /// `/SaveItemComposition`
    async fn save_item_composition(
        &self,
        payload: &CompositionPayload,
    ) -> Result<RemoteResponse, RemoteError> {
        self.call(Operation::SaveItemComposition, encode(payload)?).await
    }

    /// `/CodeSearchReq`
    async fn select_code_list(&self, query: &LastRequestQuery) -> Result<RemoteResponse, RemoteError> {
        self.call(Operation::SearchCodeLists, encode(query)?).await
    }

    /// `/ItemClsSearchReq`
    async fn select_item_classes(
        &self,
        query: &LastRequestQuery,
    ) -> Result<RemoteResponse, RemoteError> {
        self.call(Operation::SearchItemClassifications, encode(query)?)
            .await
    }
}
