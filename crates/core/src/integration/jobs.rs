//! Scheduler entry points.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::service::EtimsService;
use crate::submission::{DocumentKind, SubmissionError};
use crate::sweep::{SweepReport, run_sweep};

/// How often the scheduler runs an entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    /// Every scheduler tick.
    All,
    /// Hourly.
    Hourly,
    /// Monthly.
    Monthly,
}

/// A periodic or manually triggered entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Job {
    /// Re-drive unsubmitted sales invoices.
    SendPendingSales,
    /// Re-drive unsubmitted POS invoices.
    SendPendingPos,
    /// Re-drive unsubmitted purchase invoices.
    SendPendingPurchases,
    /// Re-drive stock ledger entries whose movement was not accepted.
    SendPendingStock,
    /// Report residual quantities of accepted stock movements.
    SendPendingInventory,
    /// Pull every code list.
    SyncCodeLists,
    /// Pull item classifications.
    SyncItemClassifications,
    /// Pull notices for every active branch.
    RefreshNotices,
}

impl Job {
    /// Every entry point.
    pub const ALL: [Self; 8] = [
        Self::SendPendingSales,
        Self::SendPendingPos,
        Self::SendPendingPurchases,
        Self::SendPendingStock,
        Self::SendPendingInventory,
        Self::SyncCodeLists,
        Self::SyncItemClassifications,
        Self::RefreshNotices,
    ];

    /// Name used in logs and the manual trigger route.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SendPendingSales => "send-pending-sales",
            Self::SendPendingPos => "send-pending-pos",
            Self::SendPendingPurchases => "send-pending-purchases",
            Self::SendPendingStock => "send-pending-stock",
            Self::SendPendingInventory => "send-pending-inventory",
            Self::SyncCodeLists => "sync-code-lists",
            Self::SyncItemClassifications => "sync-item-classifications",
            Self::RefreshNotices => "refresh-notices",
        }
    }

    /// Scheduler cadence.
    #[must_use]
    pub const fn cadence(&self) -> Cadence {
        match self {
            Self::SendPendingStock | Self::SendPendingInventory => Cadence::All,
            Self::SendPendingSales
            | Self::SendPendingPos
            | Self::SendPendingPurchases
            | Self::RefreshNotices => Cadence::Hourly,
            Self::SyncCodeLists | Self::SyncItemClassifications => Cadence::Monthly,
        }
    }

    /// Entry points of one cadence.
    pub fn of(cadence: Cadence) -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().filter(move |job| job.cadence() == cadence)
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Job {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|job| job.name() == s)
            .ok_or_else(|| format!("Unknown job: {s}"))
    }
}

impl EtimsService {
    /// Runs one entry point to the point where its attempts are enqueued.
    pub async fn run_job(&self, job: Job) -> Result<SweepReport, SubmissionError> {
        tracing::info!(job = job.name(), "Running job");
        let report = match job {
            Job::SendPendingSales => self.send_pending(job, DocumentKind::SalesInvoice).await?,
            Job::SendPendingPos => self.send_pending(job, DocumentKind::PosInvoice).await?,
            Job::SendPendingPurchases => self.send_pending(job, DocumentKind::PurchaseInvoice).await?,
            Job::SendPendingStock => self.send_pending(job, DocumentKind::StockLedgerEntry).await?,
            Job::SendPendingInventory => {
                let names = self.pending_inventory().await?;
                run_sweep(job.name(), names, |name| async move { self.submit_inventory(&name).await }).await
            }
            Job::SyncCodeLists => {
                let target = self.first_target().await?;
                run_sweep(job.name(), target, |_| self.refresh_code_lists()).await
            }
            Job::SyncItemClassifications => {
                let target = self.first_target().await?;
                run_sweep(job.name(), target, |_| self.refresh_item_classes()).await
            }
            Job::RefreshNotices => {
                let targets = self.branch_targets().await?;
                run_sweep(job.name(), targets, |target| async move {
                    let (company, branch) = split_target(&target)?;
                    self.search_notices(company, branch).await
                })
                .await
            }
        };
        Ok(report)
    }

    async fn send_pending(&self, job: Job, kind: DocumentKind) -> Result<SweepReport, SubmissionError> {
        let names = self.pending(kind).await?;
        Ok(run_sweep(job.name(), names, |name| async move { self.submit(kind, &name).await }).await)
    }

    /// `company:bhfid` for every active settings record.
    async fn branch_targets(&self) -> Result<Vec<String>, SubmissionError> {
        Ok(self
            .active_settings()
            .await?
            .into_iter()
            .map(|s| format!("{}:{}", s.company, s.bhfid))
            .collect())
    }

    async fn first_target(&self) -> Result<Vec<String>, SubmissionError> {
        Ok(self.branch_targets().await?.into_iter().take(1).collect())
    }
}

fn split_target(target: &str) -> Result<(&str, &str), SubmissionError> {
    target
        .rsplit_once(':')
        .ok_or_else(|| SubmissionError::Validation(format!("malformed job target '{target}'")))
}
