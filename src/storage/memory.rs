//! In-memory storage implementation for testing.

use std::collections::HashMap;

use anyhow::Result;
use tokio::sync::Mutex;

use super::Storage;
use crate::models::{CashflowConfig, Id, Property, UserProfile, ValuationEntry};

pub struct MemoryStorage {
    users: Mutex<HashMap<Id, UserProfile>>,
    properties: Mutex<HashMap<Id, Property>>,
    valuations: Mutex<HashMap<Id, Vec<ValuationEntry>>>,
    cashflows: Mutex<HashMap<Id, Vec<CashflowConfig>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
            properties: Mutex::new(HashMap::new()),
            valuations: Mutex::new(HashMap::new()),
            cashflows: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Storage for MemoryStorage {
    async fn get_user(&self, id: &Id) -> Result<Option<UserProfile>> {
        let users = self.users.lock().await;
        Ok(users.get(id).cloned())
    }

    async fn save_user(&self, user: &UserProfile) -> Result<()> {
        let mut users = self.users.lock().await;
        users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn list_properties(&self, user_id: &Id) -> Result<Vec<Property>> {
        let properties = self.properties.lock().await;
        let mut owned: Vec<Property> = properties
            .values()
            .filter(|p| &p.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(owned)
    }

    async fn get_property(&self, id: &Id) -> Result<Option<Property>> {
        let properties = self.properties.lock().await;
        Ok(properties.get(id).cloned())
    }

    async fn save_property(&self, property: &Property) -> Result<()> {
        let mut properties = self.properties.lock().await;
        properties.insert(property.id.clone(), property.clone());
        Ok(())
    }

    async fn get_valuations(&self, property_id: &Id) -> Result<Vec<ValuationEntry>> {
        let valuations = self.valuations.lock().await;
        Ok(valuations.get(property_id).cloned().unwrap_or_default())
    }

    async fn append_valuation(&self, entry: &ValuationEntry) -> Result<()> {
        let mut valuations = self.valuations.lock().await;
        valuations
            .entry(entry.property_id.clone())
            .or_default()
            .push(entry.clone());
        Ok(())
    }

    async fn get_cashflows(&self, property_id: &Id) -> Result<Vec<CashflowConfig>> {
        let cashflows = self.cashflows.lock().await;
        Ok(cashflows.get(property_id).cloned().unwrap_or_default())
    }

    async fn append_cashflow(&self, config: &CashflowConfig) -> Result<()> {
        let mut cashflows = self.cashflows.lock().await;
        cashflows
            .entry(config.property_id.clone())
            .or_default()
            .push(config.clone());
        Ok(())
    }

    async fn get_valuations_for(
        &self,
        property_ids: &[Id],
    ) -> Result<HashMap<Id, Vec<ValuationEntry>>> {
        let valuations = self.valuations.lock().await;
        Ok(property_ids
            .iter()
            .map(|id| (id.clone(), valuations.get(id).cloned().unwrap_or_default()))
            .collect())
    }
}
