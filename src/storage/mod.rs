mod json_file;
mod memory;

pub use json_file::JsonFileStorage;
pub use memory::MemoryStorage;

use std::collections::HashMap;

use anyhow::Result;

use crate::models::{CashflowConfig, Id, Property, UserProfile, ValuationEntry};

/// Data access for one or more users' portfolios.
///
/// Readers return rows in storage order; sorting for aggregation happens in
/// [`crate::portfolio`].
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    // Users
    async fn get_user(&self, id: &Id) -> Result<Option<UserProfile>>;
    async fn save_user(&self, user: &UserProfile) -> Result<()>;

    // Properties
    async fn list_properties(&self, user_id: &Id) -> Result<Vec<Property>>;
    async fn get_property(&self, id: &Id) -> Result<Option<Property>>;
    async fn save_property(&self, property: &Property) -> Result<()>;

    // Valuations
    async fn get_valuations(&self, property_id: &Id) -> Result<Vec<ValuationEntry>>;
    async fn append_valuation(&self, entry: &ValuationEntry) -> Result<()>;

    // Cashflow configurations
    async fn get_cashflows(&self, property_id: &Id) -> Result<Vec<CashflowConfig>>;
    async fn append_cashflow(&self, config: &CashflowConfig) -> Result<()>;

    /// Valuations for several properties at once. Every requested id is
    /// present in the result, with an empty list if it has no entries.
    async fn get_valuations_for(
        &self,
        property_ids: &[Id],
    ) -> Result<HashMap<Id, Vec<ValuationEntry>>> {
        let mut out = HashMap::with_capacity(property_ids.len());
        for id in property_ids {
            out.insert(id.clone(), self.get_valuations(id).await?);
        }
        Ok(out)
    }

    /// Cashflow configurations for several properties at once. Every
    /// requested id is present in the result.
    async fn get_cashflows_for(
        &self,
        property_ids: &[Id],
    ) -> Result<HashMap<Id, Vec<CashflowConfig>>> {
        let mut out = HashMap::with_capacity(property_ids.len());
        for id in property_ids {
            out.insert(id.clone(), self.get_cashflows(id).await?);
        }
        Ok(out)
    }
}
