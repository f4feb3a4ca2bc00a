use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, warn};

use super::Storage;
use crate::models::{CashflowConfig, Id, Property, UserProfile, ValuationEntry};

/// JSON file-based storage.
///
/// Directory structure:
/// ```text
/// data/
///   users/
///     {id}/
///       user.json
///   properties/
///     {id}/
///       property.json
///       valuations.jsonl
///       cashflows.jsonl
/// ```
pub struct JsonFileStorage {
    base_path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn users_dir(&self) -> PathBuf {
        self.base_path.join("users")
    }

    fn properties_dir(&self) -> PathBuf {
        self.base_path.join("properties")
    }

    fn segment(id: &Id) -> Result<&str> {
        if !Id::is_path_safe(id.as_str()) {
            anyhow::bail!("Refusing to use unsafe id as a path segment: {id:?}");
        }
        Ok(id.as_str())
    }

    fn user_file(&self, id: &Id) -> Result<PathBuf> {
        Ok(self.users_dir().join(Self::segment(id)?).join("user.json"))
    }

    fn property_dir(&self, id: &Id) -> Result<PathBuf> {
        Ok(self.properties_dir().join(Self::segment(id)?))
    }

    fn property_file(&self, id: &Id) -> Result<PathBuf> {
        Ok(self.property_dir(id)?.join("property.json"))
    }

    fn valuations_file(&self, property_id: &Id) -> Result<PathBuf> {
        Ok(self.property_dir(property_id)?.join("valuations.jsonl"))
    }

    fn cashflows_file(&self, property_id: &Id) -> Result<PathBuf> {
        Ok(self.property_dir(property_id)?.join("cashflows.jsonl"))
    }

    async fn ensure_parent(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        Ok(())
    }

    async fn read_json<T: for<'de> serde::Deserialize<'de>>(&self, path: &Path) -> Result<Option<T>> {
        match fs::read_to_string(path).await {
            Ok(content) => {
                let value = serde_json::from_str(&content)
                    .with_context(|| format!("Failed to parse JSON from {}", path.display()))?;
                Ok(Some(value))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    async fn write_json<T: serde::Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        self.ensure_parent(path).await?;
        let content = serde_json::to_string_pretty(value).context("Failed to serialize JSON")?;
        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    async fn read_jsonl<T: for<'de> serde::Deserialize<'de>>(&self, path: &Path) -> Result<Vec<T>> {
        let file = match fs::File::open(path).await {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e).with_context(|| format!("Failed to open {}", path.display())),
        };

        let reader = BufReader::new(file);
        let mut lines = reader.lines();
        let mut items = Vec::new();

        while let Some(line) = lines.next_line().await.context("Failed to read line")? {
            if line.trim().is_empty() {
                continue;
            }
            let item: T = serde_json::from_str(&line)
                .with_context(|| format!("Failed to parse JSONL line in {}: {line}", path.display()))?;
            items.push(item);
        }

        Ok(items)
    }

    async fn append_jsonl<T: serde::Serialize>(&self, path: &Path, item: &T) -> Result<()> {
        self.ensure_parent(path).await?;

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .with_context(|| format!("Failed to open {} for append", path.display()))?;

        let mut line = serde_json::to_string(item).context("Failed to serialize item")?;
        line.push('\n');
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Names of subdirectories that are usable ids. Anything else is skipped.
    async fn list_dirs(&self, path: &Path) -> Result<Vec<Id>> {
        let mut ids = Vec::new();

        let mut entries = match fs::read_dir(path).await {
            Ok(e) => e,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(ids),
            Err(e) => return Err(e).with_context(|| format!("Failed to read {}", path.display())),
        };

        while let Some(entry) = entries.next_entry().await.context("Failed to read entry")? {
            let Ok(file_type) = entry.file_type().await else {
                continue;
            };
            if !file_type.is_dir() {
                continue;
            }
            match entry.file_name().to_str().map(Id::from_string_checked) {
                Some(Ok(id)) => ids.push(id),
                _ => warn!(path = %entry.path().display(), "skipping directory with invalid id"),
            }
        }

        ids.sort();
        Ok(ids)
    }
}

#[async_trait::async_trait]
impl Storage for JsonFileStorage {
    async fn get_user(&self, id: &Id) -> Result<Option<UserProfile>> {
        self.read_json(&self.user_file(id)?).await
    }

    async fn save_user(&self, user: &UserProfile) -> Result<()> {
        self.write_json(&self.user_file(&user.id)?, user).await
    }

    async fn list_properties(&self, user_id: &Id) -> Result<Vec<Property>> {
        let ids = self.list_dirs(&self.properties_dir()).await?;
        let mut properties = Vec::new();

        for id in ids {
            let Some(property) = self.get_property(&id).await? else {
                debug!(property_id = %id, "property directory without property.json");
                continue;
            };
            if &property.user_id == user_id {
                properties.push(property);
            }
        }

        Ok(properties)
    }

    async fn get_property(&self, id: &Id) -> Result<Option<Property>> {
        let property: Option<Property> = self.read_json(&self.property_file(id)?).await?;
        if let Some(property) = &property {
            if &property.id != id {
                anyhow::bail!(
                    "Property id mismatch: directory {id} contains property {}",
                    property.id
                );
            }
        }
        Ok(property)
    }

    async fn save_property(&self, property: &Property) -> Result<()> {
        self.write_json(&self.property_file(&property.id)?, property)
            .await
    }

    async fn get_valuations(&self, property_id: &Id) -> Result<Vec<ValuationEntry>> {
        self.read_jsonl(&self.valuations_file(property_id)?).await
    }

    async fn append_valuation(&self, entry: &ValuationEntry) -> Result<()> {
        self.append_jsonl(&self.valuations_file(&entry.property_id)?, entry)
            .await
    }

    async fn get_cashflows(&self, property_id: &Id) -> Result<Vec<CashflowConfig>> {
        self.read_jsonl(&self.cashflows_file(property_id)?).await
    }

    async fn append_cashflow(&self, config: &CashflowConfig) -> Result<()> {
        self.append_jsonl(&self.cashflows_file(&config.property_id)?, config)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_files_read_as_empty() -> Result<()> {
        let dir = TempDir::new()?;
        let storage = JsonFileStorage::new(dir.path());
        let id = Id::from("nothing-here");

        assert!(storage.get_user(&id).await?.is_none());
        assert!(storage.get_property(&id).await?.is_none());
        assert!(storage.get_valuations(&id).await?.is_empty());
        assert!(storage.list_properties(&id).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn rejects_path_traversal_ids() -> Result<()> {
        let dir = TempDir::new()?;
        let storage = JsonFileStorage::new(dir.path());

        let err = storage
            .get_valuations(&Id::from_string("../escape"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("unsafe id"));
        Ok(())
    }

    #[tokio::test]
    async fn user_round_trips() -> Result<()> {
        let dir = TempDir::new()?;
        let storage = JsonFileStorage::new(dir.path());
        let user = UserProfile::new(Id::from("u1"), "owner@example.com");

        storage.save_user(&user).await?;
        let loaded = storage.get_user(&user.id).await?.unwrap();
        assert_eq!(loaded.email, "owner@example.com");
        assert!(dir.path().join("users/u1/user.json").exists());
        Ok(())
    }
}
