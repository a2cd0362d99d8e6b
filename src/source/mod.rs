//! Byte sources for ledger records
//!
//! Fetching is the only asynchronous step; decoding stays synchronous.

mod file;
mod memory;

pub use file::FileSource;
pub use memory::MemorySource;

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;

use crate::error::Result;
use crate::layout::RecordAddress;

#[cfg(test)]
use mockall::automock;

/// Retrieves the raw bytes stored at a record address
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AccountSource: Send + Sync {
    /// `Ok(None)` when no record exists at `address`; transport failures are errors
    async fn fetch_bytes(&self, address: &RecordAddress) -> Result<Option<Bytes>>;
}

#[async_trait]
impl<S: AccountSource + ?Sized> AccountSource for Arc<S> {
    async fn fetch_bytes(&self, address: &RecordAddress) -> Result<Option<Bytes>> {
        (**self).fetch_bytes(address).await
    }
}
