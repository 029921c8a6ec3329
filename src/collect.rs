//! Share collection from JSON documents.
//!
//! A share file looks like
//!
//! ```json
//! {
//!     "keys": { "n": 4, "k": 3 },
//!     "1": { "base": "10", "value": "4" },
//!     "2": { "base": "2", "value": "111" }
//! }
//! ```
//!
//! Every top-level key made only of ASCII digits is a share whose x is the
//! key, and such a key must fit in a `u64`. Other keys are ignored. `k` is
//! read from `keys`, or from the top level when `keys` is absent.

use crate::{Share, ShareSet, SssError};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

/// One share exactly as it appears in the input, before its value is decoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawShare {
    pub x: u64,
    pub base: u32,
    pub digits: String,
}

/// A threshold and the undecoded shares found alongside it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawShareSet {
    pub threshold: usize,
    /// The `n` a document declares, if any; informational only
    pub declared_total: Option<usize>,
    pub shares: Vec<RawShare>,
}

impl RawShareSet {
    pub fn from_json(input: &str) -> Result<Self, SssError> {
        let document: Value = serde_json::from_str(input)
            .map_err(|e| SssError::MalformedInput(format!("invalid JSON: {}", e)))?;
        let object = document
            .as_object()
            .ok_or_else(|| malformed("top level must be a JSON object"))?;

        let keys = object.get("keys").and_then(Value::as_object).unwrap_or(object);
        let threshold = read_count(keys, "k")?
            .ok_or_else(|| malformed("missing threshold field \"k\""))?;
        let declared_total = read_count(keys, "n")?;

        let mut shares = Vec::new();
        for (key, entry) in object {
            if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
                continue;
            }
            let x = key
                .parse::<u64>()
                .map_err(|_| malformed(format!("share index {} is out of range", key)))?;
            shares.push(read_share(x, entry)?);
        }

        Ok(RawShareSet {
            threshold,
            declared_total,
            shares,
        })
    }

    /// Decodes every share value and validates the result as a [`ShareSet`].
    pub fn decode(self) -> Result<ShareSet, SssError> {
        if let Some(total) = self.declared_total {
            if total != self.shares.len() {
                warn!(
                    declared = total,
                    found = self.shares.len(),
                    "share count differs from declared n"
                );
            }
        }

        let shares = self
            .shares
            .iter()
            .map(|raw| Share::from_digits(raw.x, raw.base, &raw.digits))
            .collect::<Result<Vec<_>, _>>()?;

        ShareSet::new(self.threshold, shares)
    }
}

impl FromStr for RawShareSet {
    type Err = SssError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RawShareSet::from_json(s)
    }
}

/// Parses and decodes a JSON document into a [`ShareSet`].
pub fn parse_share_set(input: &str) -> Result<ShareSet, SssError> {
    RawShareSet::from_json(input)?.decode()
}

/// Reads a share file from disk and decodes it.
pub fn load_share_set(path: impl AsRef<Path>) -> Result<ShareSet, SssError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let set = parse_share_set(&contents)?;
    debug!(
        path = %path.display(),
        threshold = set.threshold(),
        shares = set.len(),
        "loaded share set"
    );
    Ok(set)
}

fn read_share(x: u64, entry: &Value) -> Result<RawShare, SssError> {
    let fields = entry
        .as_object()
        .ok_or_else(|| malformed(format!("share {} must be an object", x)))?;

    let base = match fields.get("base") {
        Some(Value::String(s)) => s.trim().parse::<u32>().ok(),
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(_) => None,
        None => return Err(malformed(format!("share {} is missing \"base\"", x))),
    }
    .ok_or_else(|| malformed(format!("share {} has a non-integer base", x)))?;

    let digits = match fields.get("value") {
        Some(Value::String(s)) => s.clone(),
        Some(_) => return Err(malformed(format!("share {} value must be a string", x))),
        None => return Err(malformed(format!("share {} is missing \"value\"", x))),
    };

    Ok(RawShare { x, base, digits })
}

/// Reads a non-negative integer field, accepting either a JSON number or a
/// numeric string.
fn read_count(object: &Map<String, Value>, field: &str) -> Result<Option<usize>, SssError> {
    let value = match object.get(field) {
        Some(value) => value,
        None => return Ok(None),
    };
    let count = match value {
        Value::Number(n) => n.as_u64().and_then(|n| usize::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<usize>().ok(),
        _ => None,
    };
    count
        .map(Some)
        .ok_or_else(|| malformed(format!("\"{}\" must be a non-negative integer", field)))
}

fn malformed(message: impl Into<String>) -> SssError {
    SssError::MalformedInput(message.into())
}
