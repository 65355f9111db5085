use serde::{Deserialize, Deserializer, Serialize};

/// Block as returned by `eth_getBlockByNumber` with full transaction objects.
///
/// Decoding is permissive: fields the scanner does not use are ignored, and
/// missing or `null` ones fall back to their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Block {
    #[serde(default, deserialize_with = "null_as_default")]
    pub number: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    #[serde(default, deserialize_with = "null_as_default")]
    pub hash: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub from: String,
    /// `None` for contract-creation transactions
    #[serde(default)]
    pub to: Option<String>,
    /// Hex-encoded wei
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
    #[serde(default, rename = "blockNumber", deserialize_with = "null_as_default")]
    pub block_number: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Transaction {
    /// Exact, case-sensitive comparison against sender and recipient.
    pub fn touches(&self, address: &str) -> bool {
        self.from == address || self.to.as_deref() == Some(address)
    }
}
