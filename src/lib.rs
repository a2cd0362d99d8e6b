//! Prediction market snapshot reader
//!
//! Decodes fixed-layout order book and fill log records into aggregated,
//! information-hiding views, and provides the tick/currency arithmetic the
//! decoder and its callers share.

pub mod config;
pub mod error;
pub mod filllog;
pub mod layout;
pub mod orderbook;
pub mod price;
pub mod reader;
pub mod source;

pub use config::Config;
pub use error::{BookError, Result};
pub use filllog::{project, FillLogView};
pub use layout::{FillLogRecord, OrderBookRecord, OrderSlot, RecordAddress, RecordKind};
pub use orderbook::{aggregate, DepthMetrics, LegBooks, OrderBookView, PriceLevel, Side};
pub use reader::{
    assemble_fill_log, assemble_order_book, fill_log_view, order_book_view, BookReader,
};
pub use source::{AccountSource, FileSource, MemorySource};
