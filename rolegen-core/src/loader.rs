//! Matrix loading abstraction.

use async_trait::async_trait;

use crate::error::RolegenResult;
use crate::matrix::SecurityMatrix;
use crate::record::SecurityRecord;

/// A source of security matrix records.
#[async_trait]
pub trait MatrixLoader: Send + Sync {
    /// Fetch every record of the matrix.
    async fn load(&self) -> RolegenResult<Vec<SecurityRecord>>;

    /// Short description of the source, for diagnostics.
    fn describe(&self) -> String;

    /// Fetch and group the matrix.
    async fn load_matrix(&self) -> RolegenResult<SecurityMatrix> {
        let records = self.load().await?;
        tracing::info!(source = %self.describe(), records = records.len(), "Security matrix loaded");
        Ok(SecurityMatrix::new(records))
    }
}

/// A loader over records already in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticLoader {
    records: Vec<SecurityRecord>,
}

impl StaticLoader {
    /// Create a loader returning `records`.
    pub fn new(records: Vec<SecurityRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl MatrixLoader for StaticLoader {
    async fn load(&self) -> RolegenResult<Vec<SecurityRecord>> {
        Ok(self.records.clone())
    }

    fn describe(&self) -> String {
        format!("{} in-memory records", self.records.len())
    }
}
