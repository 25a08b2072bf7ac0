use std::collections::BTreeSet;

use camino::Utf8Path;
use tokio::fs;
use tracing::debug;

use crate::error::RegistryError;

/// Read-only lookup of valid mission targets. Population of the catalog
/// is owned elsewhere; the registry only asks whether a name is known.
pub trait TargetCatalog: Send + Sync {
    fn exists(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<bool, RegistryError>> + Send;
}

/// Catalog backed by a JSON file holding an array of target names, read
/// once at load time.
#[derive(Debug, Clone)]
pub struct FileTargetCatalog {
    targets: BTreeSet<String>,
}

impl FileTargetCatalog {
    pub async fn load(path: &Utf8Path) -> Result<Self, RegistryError> {
        let content = fs::read_to_string(path.as_std_path())
            .await
            .map_err(|err| RegistryError::Catalog(format!("{path}: {err}")))?;
        let names: Vec<String> = serde_json::from_str(&content)
            .map_err(|err| RegistryError::Catalog(format!("{path}: {err}")))?;
        debug!(targets = names.len(), %path, "target catalog loaded");
        Ok(Self {
            targets: names.into_iter().collect(),
        })
    }
}

impl TargetCatalog for FileTargetCatalog {
    async fn exists(&self, name: &str) -> Result<bool, RegistryError> {
        Ok(self.targets.contains(name))
    }
}

/// In-memory catalog with a fixed set of names.
#[derive(Debug, Clone, Default)]
pub struct FixedTargetCatalog {
    targets: BTreeSet<String>,
}

impl FixedTargetCatalog {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            targets: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl TargetCatalog for FixedTargetCatalog {
    async fn exists(&self, name: &str) -> Result<bool, RegistryError> {
        Ok(self.targets.contains(name))
    }
}
