//! In-memory record source

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::AccountSource;
use crate::error::Result;
use crate::layout::RecordAddress;

/// Serves records already held in memory
#[derive(Debug, Default)]
pub struct MemorySource {
    records: RwLock<HashMap<RecordAddress, Bytes>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `bytes` at `address`, returning the previous record if any
    pub async fn insert(&self, address: RecordAddress, bytes: impl Into<Bytes>) -> Option<Bytes> {
        self.records.write().await.insert(address, bytes.into())
    }

    pub async fn remove(&self, address: &RecordAddress) -> Option<Bytes> {
        self.records.write().await.remove(address)
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl AccountSource for MemorySource {
    async fn fetch_bytes(&self, address: &RecordAddress) -> Result<Option<Bytes>> {
        Ok(self.records.read().await.get(address).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::testing::address;

    #[tokio::test]
    async fn test_insert_fetch_remove() {
        let source = MemorySource::new();
        assert!(source.is_empty().await);

        assert!(source.insert(address(1), vec![1u8, 2, 3]).await.is_none());
        assert_eq!(source.len().await, 1);
        assert_eq!(
            source.fetch_bytes(&address(1)).await.unwrap(),
            Some(Bytes::from_static(&[1, 2, 3]))
        );
        assert_eq!(source.fetch_bytes(&address(2)).await.unwrap(), None);

        assert!(source.remove(&address(1)).await.is_some());
        assert_eq!(source.fetch_bytes(&address(1)).await.unwrap(), None);
    }
}
