//! U256 as a decimal string
//!
//! Use with `#[serde(serialize_with = "crate::domain_types::uint256::serialize")]`.
//!
//! ethers serializes U256 as a 0x-prefixed hex quantity. JSON APIs that take
//! arbitrary-precision amounts expect plain decimal strings instead, and a JSON
//! number would lose precision above 2^53.

use ethers::types::U256;
use serde::Serializer;

pub fn serialize<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_string())
}
