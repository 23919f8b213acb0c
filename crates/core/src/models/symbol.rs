use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::CoreError;

/// The fixed set of assets the calculator knows about.
///
/// Parsing is case-insensitive ("btc", "Btc" and "BTC" are the same asset);
/// anything outside the set is rejected with `CoreError::UnknownSymbol`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Symbol {
    Btc,
    Ether,
    Sol,
    Bnb,
}

impl Symbol {
    /// Every supported symbol, in display order.
    pub const ALL: [Symbol; 4] = [Symbol::Btc, Symbol::Sol, Symbol::Ether, Symbol::Bnb];

    /// Ticker as shown to the user (e.g., "BTC", "ETHER").
    pub fn as_str(&self) -> &'static str {
        match self {
            Symbol::Btc => "BTC",
            Symbol::Ether => "ETHER",
            Symbol::Sol => "SOL",
            Symbol::Bnb => "BNB",
        }
    }

    /// Lowercase stem used for series data files (`btc.json`, `ether.json`, ...).
    pub fn file_stem(&self) -> &'static str {
        match self {
            Symbol::Btc => "btc",
            Symbol::Ether => "ether",
            Symbol::Sol => "sol",
            Symbol::Bnb => "bnb",
        }
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Symbol {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BTC" => Ok(Symbol::Btc),
            "ETHER" => Ok(Symbol::Ether),
            "SOL" => Ok(Symbol::Sol),
            "BNB" => Ok(Symbol::Bnb),
            _ => Err(CoreError::UnknownSymbol(s.to_string())),
        }
    }
}
