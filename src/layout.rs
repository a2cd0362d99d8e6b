//! Fixed-layout record decoder
//!
//! Reads order book and fill log snapshots at their fixed byte offsets. All
//! multi-byte integers are little-endian; 32-byte references are copied as
//! opaque identifiers. Offsets include the 8-byte record discriminator the
//! ledger prepends. The decoder checks structure only and borrows the input
//! buffer instead of copying the bulk regions.

use byteorder::{ByteOrder, LittleEndian};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tracing::trace;

use crate::error::{BookError, Result};
use crate::orderbook::Side;
use crate::price::{PriceTick, PRICE_TICKS};

pub const DISCRIMINATOR_LEN: usize = 8;
pub const ADDRESS_LEN: usize = 32;

pub const ORDER_BOOK_DISCRIMINATOR: [u8; DISCRIMINATOR_LEN] = [55, 230, 125, 218, 149, 39, 65, 248];
pub const FILL_LOG_DISCRIMINATOR: [u8; DISCRIMINATOR_LEN] = [117, 168, 16, 123, 102, 249, 153, 9];

/// Capacity of the order tree allocator
pub const MAX_ORDERS: usize = 512;

// Order book layout
const SIDE_OFFSET: usize = 8;
const INDEX_OFFSET: usize = 9;
// 6 bytes padding
const MARKET_OFFSET: usize = 16;
const ORDER_COUNT_OFFSET: usize = 48;
const FILL_LOG_REF_OFFSET: usize = 56;
const TICKS_OFFSET: usize = 88;
const TICK_COUNTER_SIZE: usize = 4;

/// Start of the order tree allocator region
pub const ORDERS_OFFSET: usize = TICKS_OFFSET + PRICE_TICKS * TICK_COUNTER_SIZE;

/// Allocator bookkeeping ahead of the first slot
pub const ALLOCATOR_HEADER_SIZE: usize = 16;

/// One allocator node: key + value + tree metadata
pub const SLOT_SIZE: usize = 32;
const KEY_SIZE: usize = 8;
const VALUE_SIZE: usize = 8;
const SLOT_ENTRY_SIZE: usize = KEY_SIZE + VALUE_SIZE;

/// Header, slots and a 16-byte allocator trailer
pub const ORDER_TREE_SIZE: usize = ALLOCATOR_HEADER_SIZE + MAX_ORDERS * SLOT_SIZE + 16;

/// Allocated size of an order book record, tail padding included
pub const ORDER_BOOK_SIZE: usize = ORDERS_OFFSET + ORDER_TREE_SIZE + 4;

// Fill log layout
const FILL_MARKET_OFFSET: usize = 8;
const FILL_INDEX_OFFSET: usize = 40;
const FILL_SIDE_OFFSET: usize = 41;
// 6 bytes padding
const FILL_TICKS_OFFSET: usize = 48;
const FILL_TICK_SIZE: usize = 16;

pub const FILL_LOG_SIZE: usize = FILL_TICKS_OFFSET + PRICE_TICKS * FILL_TICK_SIZE;

/// Low 56 bits of a packed slot value
pub const QUANTITY_MASK: u64 = 0x00FF_FFFF_FFFF_FFFF;
const TAG_SHIFT: u32 = 56;

/// Kind of ledger record a buffer is decoded as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    OrderBook,
    FillLog,
}

impl RecordKind {
    /// Minimum buffer length for this kind
    pub const fn min_size(self) -> usize {
        match self {
            RecordKind::OrderBook => ORDER_BOOK_SIZE,
            RecordKind::FillLog => FILL_LOG_SIZE,
        }
    }

    pub const fn discriminator(self) -> [u8; DISCRIMINATOR_LEN] {
        match self {
            RecordKind::OrderBook => ORDER_BOOK_DISCRIMINATOR,
            RecordKind::FillLog => FILL_LOG_DISCRIMINATOR,
        }
    }

    /// Identify a buffer by its leading discriminator
    pub fn identify(bytes: &[u8]) -> Option<Self> {
        let prefix = bytes.get(..DISCRIMINATOR_LEN)?;
        [RecordKind::OrderBook, RecordKind::FillLog]
            .into_iter()
            .find(|kind| prefix == kind.discriminator())
    }

    /// Fail with `TruncatedRecord` unless `bytes` can hold this kind
    pub fn check_len(self, bytes: &[u8]) -> Result<()> {
        if bytes.len() < self.min_size() {
            return Err(BookError::TruncatedRecord {
                kind: self,
                expected: self.min_size(),
                actual: bytes.len(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::OrderBook => write!(f, "order book"),
            RecordKind::FillLog => write!(f, "fill log"),
        }
    }
}

/// Opaque 32-byte reference to a ledger record
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct RecordAddress([u8; ADDRESS_LEN]);

impl RecordAddress {
    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    fn read(bytes: &[u8], offset: usize) -> Self {
        let mut address = [0u8; ADDRESS_LEN];
        address.copy_from_slice(&bytes[offset..offset + ADDRESS_LEN]);
        Self(address)
    }
}

impl fmt::Display for RecordAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for RecordAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordAddress({})", self)
    }
}

impl FromStr for RecordAddress {
    type Err = BookError;

    fn from_str(s: &str) -> Result<Self> {
        let mut address = [0u8; ADDRESS_LEN];
        hex::decode_to_slice(s.trim(), &mut address)
            .map_err(|e| BookError::InvalidAddress(format!("{s}: {e}")))?;
        Ok(Self(address))
    }
}

impl Serialize for RecordAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RecordAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Decoded order book record, borrowing the tick and tree regions
#[derive(Debug, Clone, Copy)]
pub struct OrderBookRecord<'a> {
    pub side_tag: u8,
    pub leg_index: u8,
    pub market: RecordAddress,
    pub order_count: u64,
    pub fill_log: RecordAddress,
    tick_counters: &'a [u8],
    order_tree: &'a [u8],
}

impl<'a> OrderBookRecord<'a> {
    /// Decode an order book from a snapshot buffer
    pub fn decode(bytes: &'a [u8]) -> Result<Self> {
        RecordKind::OrderBook.check_len(bytes)?;

        let record = Self {
            side_tag: bytes[SIDE_OFFSET],
            leg_index: bytes[INDEX_OFFSET],
            market: RecordAddress::read(bytes, MARKET_OFFSET),
            order_count: LittleEndian::read_u64(&bytes[ORDER_COUNT_OFFSET..]),
            fill_log: RecordAddress::read(bytes, FILL_LOG_REF_OFFSET),
            tick_counters: &bytes[TICKS_OFFSET..ORDERS_OFFSET],
            order_tree: &bytes[ORDERS_OFFSET..],
        };

        trace!(
            market = %record.market,
            leg = record.leg_index,
            order_count = record.order_count,
            "Decoded order book record"
        );
        Ok(record)
    }

    pub fn side(&self) -> Side {
        Side::from_byte(self.side_tag)
    }

    /// Per-tick order id counter, `None` outside `1..=999`
    pub fn tick_counter(&self, tick: PriceTick) -> Option<u32> {
        let index = usize::from(tick).checked_sub(1)?;
        let offset = index * TICK_COUNTER_SIZE;
        self.tick_counters
            .get(offset..offset + TICK_COUNTER_SIZE)
            .map(LittleEndian::read_u32)
    }

    /// Allocator slots in index order, stopping at the end of the buffer.
    ///
    /// Yields raw slots, empty ones included.
    pub fn slots(&self) -> impl Iterator<Item = OrderSlot> + 'a {
        let tree = self.order_tree;
        (0..MAX_ORDERS)
            .map(|i| ALLOCATOR_HEADER_SIZE + i * SLOT_SIZE)
            .map_while(move |offset| {
                tree.get(offset..offset + SLOT_ENTRY_SIZE)
                    .and_then(|raw| <&[u8; SLOT_ENTRY_SIZE]>::try_from(raw).ok())
            })
            .map(OrderSlot::decode)
    }
}

/// One allocator cell: order key and packed quantity/tag value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSlot {
    pub price_tick: PriceTick,
    pub inverted_sequence: u32,
    pub quantity: u64,
    pub tag: u8,
}

impl OrderSlot {
    pub fn decode(raw: &[u8; SLOT_ENTRY_SIZE]) -> Self {
        let value = LittleEndian::read_u64(&raw[KEY_SIZE..]);
        Self {
            price_tick: LittleEndian::read_u16(&raw[0..2]),
            inverted_sequence: LittleEndian::read_u32(&raw[4..8]),
            quantity: value & QUANTITY_MASK,
            tag: (value >> TAG_SHIFT) as u8,
        }
    }

    /// Order sequence number; keys store it inverted so older orders sort first
    pub fn sequence(&self) -> u32 {
        !self.inverted_sequence
    }

    /// Unallocated cells carry a zero price or a zero quantity
    pub fn is_empty(&self) -> bool {
        self.price_tick == 0 || self.quantity == 0
    }
}

/// Decoded fill log record.
///
/// Settlement entries stay inside this type; the public view is
/// [`crate::filllog::FillLogView`].
#[derive(Debug, Clone, Copy)]
pub struct FillLogRecord<'a> {
    pub market: RecordAddress,
    pub leg_index: u8,
    pub side_tag: u8,
    entries: &'a [u8],
}

/// Per-tick settlement counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillTick {
    pub next_fill_position: u32,
    pub partial_remainder: u64,
}

impl<'a> FillLogRecord<'a> {
    pub fn decode(bytes: &'a [u8]) -> Result<Self> {
        RecordKind::FillLog.check_len(bytes)?;

        let record = Self {
            market: RecordAddress::read(bytes, FILL_MARKET_OFFSET),
            leg_index: bytes[FILL_INDEX_OFFSET],
            side_tag: bytes[FILL_SIDE_OFFSET],
            entries: &bytes[FILL_TICKS_OFFSET..FILL_LOG_SIZE],
        };

        trace!(market = %record.market, leg = record.leg_index, "Decoded fill log record");
        Ok(record)
    }

    pub fn side(&self) -> Side {
        Side::from_byte(self.side_tag)
    }

    pub fn settlement_entry(&self, tick: PriceTick) -> Option<FillTick> {
        let index = usize::from(tick).checked_sub(1)?;
        let offset = index * FILL_TICK_SIZE;
        let raw = self.entries.get(offset..offset + FILL_TICK_SIZE)?;
        Some(FillTick {
            next_fill_position: LittleEndian::read_u32(&raw[0..4]),
            partial_remainder: LittleEndian::read_u64(&raw[8..16]),
        })
    }
}
