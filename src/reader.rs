//! View assembly
//!
//! Turns fetched record bytes into public views. A missing record is
//! `Ok(None)`; bytes that fail to decode are always an error.

use futures_util::future::try_join;
use tracing::{debug, warn};

use crate::error::{BookError, Result};
use crate::filllog::{project, FillLogView};
use crate::layout::{FillLogRecord, OrderBookRecord, RecordAddress, RecordKind, DISCRIMINATOR_LEN};
use crate::orderbook::{aggregate, LegBooks, OrderBookView};
use crate::source::AccountSource;

/// Check length, then the leading discriminator, against the requested kind
fn expect_kind(bytes: &[u8], kind: RecordKind) -> Result<()> {
    kind.check_len(bytes)?;

    let mut found = [0u8; DISCRIMINATOR_LEN];
    found.copy_from_slice(&bytes[..DISCRIMINATOR_LEN]);
    if found != kind.discriminator() {
        return Err(BookError::UnknownRecordKind {
            expected: kind,
            found,
        });
    }
    Ok(())
}

/// Decode an order book snapshot into its aggregated depth view
pub fn order_book_view(bytes: &[u8]) -> Result<OrderBookView> {
    expect_kind(bytes, RecordKind::OrderBook)?;
    let record = OrderBookRecord::decode(bytes)?;

    Ok(OrderBookView {
        side: record.side(),
        levels: aggregate(&record),
    })
}

/// Decode a fill log snapshot into its public identity view
pub fn fill_log_view(bytes: &[u8]) -> Result<FillLogView> {
    expect_kind(bytes, RecordKind::FillLog)?;
    let record = FillLogRecord::decode(bytes)?;
    Ok(project(&record))
}

pub fn assemble_order_book(bytes: Option<&[u8]>) -> Result<Option<OrderBookView>> {
    bytes.map(order_book_view).transpose()
}

pub fn assemble_fill_log(bytes: Option<&[u8]>) -> Result<Option<FillLogView>> {
    bytes.map(fill_log_view).transpose()
}

/// Fetches records from a source and assembles their views
#[derive(Debug, Clone)]
pub struct BookReader<S> {
    source: S,
}

impl<S: AccountSource> BookReader<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Aggregated depth for the order book at `address`
    pub async fn order_book(&self, address: &RecordAddress) -> Result<Option<OrderBookView>> {
        let bytes = self.source.fetch_bytes(address).await?;
        if bytes.is_none() {
            debug!(address = %address, "Order book not found");
        }

        assemble_order_book(bytes.as_deref()).map_err(|e| {
            warn!(address = %address, error = %e, "Failed to decode order book");
            e
        })
    }

    /// Identity view of the fill log at `address`
    pub async fn fill_log(&self, address: &RecordAddress) -> Result<Option<FillLogView>> {
        let bytes = self.source.fetch_bytes(address).await?;
        if bytes.is_none() {
            debug!(address = %address, "Fill log not found");
        }

        assemble_fill_log(bytes.as_deref()).map_err(|e| {
            warn!(address = %address, error = %e, "Failed to decode fill log");
            e
        })
    }

    /// Both sides of a market leg, fetched concurrently
    pub async fn leg_books(&self, yes: &RecordAddress, no: &RecordAddress) -> Result<LegBooks> {
        let (yes, no) = try_join(self.order_book(yes), self.order_book(no)).await?;
        Ok(LegBooks { yes, no })
    }
}
