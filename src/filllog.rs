//! Fill log projection
//!
//! A fill log carries per-tick settlement bookkeeping that callers must not
//! see. `project` narrows a decoded record to its identity fields.

use serde::{Deserialize, Serialize};

use crate::layout::{FillLogRecord, RecordAddress};
use crate::orderbook::Side;

/// Public identity of a fill log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillLogView {
    pub market: RecordAddress,
    pub leg_index: u8,
    pub side: Side,
}

/// Copy the identity fields, dropping the settlement entries
pub fn project(record: &FillLogRecord<'_>) -> FillLogView {
    FillLogView {
        market: record.market,
        leg_index: record.leg_index,
        side: record.side(),
    }
}

impl From<&FillLogRecord<'_>> for FillLogView {
    fn from(record: &FillLogRecord<'_>) -> Self {
        project(record)
    }
}
