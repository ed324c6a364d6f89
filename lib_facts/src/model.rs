//! # Fact Models
//!
//! The domain value and its wire-shape counterpart.
//!
//! The facts endpoint answers with a bare JSON array, no object envelope:
//!
//! ```json
//! [
//!   { "fact": "Many foot disorders in dogs are caused by long toenails." }
//! ]
//! ```

use serde::{Deserialize, Serialize};

/// A single piece of display text about dogs.
///
/// Facts are only ever built from a decoded [`FactsTransferRecord`], whether
/// it came from the network or from a store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fact {
    text: String,
}

impl Fact {
    /// The fact text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl From<FactsTransferRecord> for Fact {
    fn from(record: FactsTransferRecord) -> Self {
        Self { text: record.fact }
    }
}

impl From<&Fact> for FactsTransferRecord {
    fn from(fact: &Fact) -> Self {
        Self {
            fact: fact.text.clone(),
        }
    }
}

/// Wire record decoded from the facts response array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactsTransferRecord {
    /// The fact text as sent by the server.
    pub fact: String,
}

/// The decoded response root: the array itself.
pub type FactsTransferRecords = Vec<FactsTransferRecord>;
