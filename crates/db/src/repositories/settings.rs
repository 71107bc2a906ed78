//! Settings repository.

use async_trait::async_trait;
use chrono::Utc;
use etims_core::settings::{Environment, EtimsSettings, SettingsStore};
use etims_core::store::StoreError;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use super::backend;
use crate::entities::etims_settings;

/// Settings repository backed by `etims_settings`.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    db: DatabaseConnection,
}

impl SettingsRepository {
    /// Creates a new settings repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn to_domain(model: etims_settings::Model) -> Result<EtimsSettings, StoreError> {
        let environment: Environment = model
            .environment
            .parse()
            .map_err(|e| StoreError::Backend(format!("settings {}: {e}", model.id)))?;

        Ok(EtimsSettings {
            id: model.id,
            company: model.company,
            vendor: model.vendor,
            environment,
            bhfid: model.bhfid,
            tin: model.tin,
            dvc_srl_no: model.dvc_srl_no,
            consumer_key: model.consumer_key,
            consumer_secret: model.consumer_secret,
            communication_key: model.communication_key,
            scu_id: model.scu_id,
            is_active: model.is_active,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        })
    }

    fn to_active(settings: &EtimsSettings) -> etims_settings::ActiveModel {
        etims_settings::ActiveModel {
            id: Set(settings.id),
            company: Set(settings.company.clone()),
            vendor: Set(settings.vendor.clone()),
            environment: Set(settings.environment.as_str().to_string()),
            bhfid: Set(settings.bhfid.clone()),
            tin: Set(settings.tin.clone()),
            dvc_srl_no: Set(settings.dvc_srl_no.clone()),
            consumer_key: Set(settings.consumer_key.clone()),
            consumer_secret: Set(settings.consumer_secret.clone()),
            communication_key: Set(settings.communication_key.clone()),
            scu_id: Set(settings.scu_id.clone()),
            is_active: Set(settings.is_active),
            created_at: Set(settings.created_at.into()),
            updated_at: Set(settings.updated_at.into()),
        }
    }

    /// Clears the active flag of every other record of the same branch.
    async fn demote_siblings<C: ConnectionTrait>(
        conn: &C,
        keep: Uuid,
        company: &str,
        environment: &str,
        bhfid: &str,
    ) -> Result<u64, StoreError> {
        let result = etims_settings::Entity::update_many()
            .col_expr(etims_settings::Column::IsActive, Expr::value(false))
            .col_expr(etims_settings::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(etims_settings::Column::Company.eq(company))
            .filter(etims_settings::Column::Environment.eq(environment))
            .filter(etims_settings::Column::Bhfid.eq(bhfid))
            .filter(etims_settings::Column::IsActive.eq(true))
            .filter(etims_settings::Column::Id.ne(keep))
            .exec(conn)
            .await
            .map_err(backend)?;
        Ok(result.rows_affected)
    }
}

#[async_trait]
impl SettingsStore for SettingsRepository {
    async fn get(&self, id: Uuid) -> Result<Option<EtimsSettings>, StoreError> {
        etims_settings::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(backend)?
            .map(Self::to_domain)
            .transpose()
    }

    async fn find_active(
        &self,
        company: &str,
        vendor: &str,
        environment: Environment,
        bhfid: &str,
    ) -> Result<Option<EtimsSettings>, StoreError> {
        etims_settings::Entity::find()
            .filter(etims_settings::Column::Company.eq(company))
            .filter(etims_settings::Column::Vendor.eq(vendor))
            .filter(etims_settings::Column::Environment.eq(environment.as_str()))
            .filter(etims_settings::Column::Bhfid.eq(bhfid))
            .filter(etims_settings::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(backend)?
            .map(Self::to_domain)
            .transpose()
    }

    async fn insert(&self, settings: &EtimsSettings) -> Result<(), StoreError> {
        let txn = self.db.begin().await.map_err(backend)?;
        if settings.is_active {
            Self::demote_siblings(
                &txn,
                settings.id,
                &settings.company,
                settings.environment.as_str(),
                &settings.bhfid,
            )
            .await?;
        }
        Self::to_active(settings).insert(&txn).await.map_err(backend)?;
        txn.commit().await.map_err(backend)
    }

    async fn update(&self, settings: &EtimsSettings) -> Result<(), StoreError> {
        let txn = self.db.begin().await.map_err(backend)?;
        if settings.is_active {
            Self::demote_siblings(
                &txn,
                settings.id,
                &settings.company,
                settings.environment.as_str(),
                &settings.bhfid,
            )
            .await?;
        }

        let mut model = Self::to_active(settings);
        model.created_at = sea_orm::ActiveValue::NotSet;
        match model.update(&txn).await {
            Ok(_) => {}
            Err(sea_orm::DbErr::RecordNotUpdated) => {
                return Err(StoreError::NotFound(format!("settings {}", settings.id)));
            }
            Err(e) => return Err(backend(e)),
        }
        txn.commit().await.map_err(backend)
    }

    async fn activate(&self, id: Uuid) -> Result<(), StoreError> {
        let txn = self.db.begin().await.map_err(backend)?;

        let model = etims_settings::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(backend)?
            .ok_or_else(|| StoreError::NotFound(format!("settings {id}")))?;

        let demoted =
            Self::demote_siblings(&txn, id, &model.company, &model.environment, &model.bhfid).await?;

        etims_settings::Entity::update_many()
            .col_expr(etims_settings::Column::IsActive, Expr::value(true))
            .col_expr(etims_settings::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(etims_settings::Column::Id.eq(id))
            .exec(&txn)
            .await
            .map_err(backend)?;

        txn.commit().await.map_err(backend)?;

        if demoted > 0 {
            tracing::info!(settings_id = %id, demoted, "Demoted previously active settings");
        }
        Ok(())
    }

    async fn count_active(
        &self,
        company: &str,
        environment: Environment,
        bhfid: &str,
    ) -> Result<u64, StoreError> {
        etims_settings::Entity::find()
            .filter(etims_settings::Column::Company.eq(company))
            .filter(etims_settings::Column::Environment.eq(environment.as_str()))
            .filter(etims_settings::Column::Bhfid.eq(bhfid))
            .filter(etims_settings::Column::IsActive.eq(true))
            .count(&self.db)
            .await
            .map_err(backend)
    }

    async fn list_active(&self) -> Result<Vec<EtimsSettings>, StoreError> {
        etims_settings::Entity::find()
            .filter(etims_settings::Column::IsActive.eq(true))
            .order_by_asc(etims_settings::Column::Company)
            .order_by_asc(etims_settings::Column::Bhfid)
            .all(&self.db)
            .await
            .map_err(backend)?
            .into_iter()
            .map(Self::to_domain)
            .collect()
    }

    async fn list(&self, company: Option<&str>) -> Result<Vec<EtimsSettings>, StoreError> {
        let mut query = etims_settings::Entity::find();
        if let Some(company) = company {
            query = query.filter(etims_settings::Column::Company.eq(company));
        }

        query
            .order_by_asc(etims_settings::Column::Company)
            .order_by_asc(etims_settings::Column::Bhfid)
            .order_by_desc(etims_settings::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(backend)?
            .into_iter()
            .map(Self::to_domain)
            .collect()
    }
}
