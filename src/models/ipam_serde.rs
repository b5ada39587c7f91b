//! Serde helpers for phpIPAM's JSON.
//!
//! The API sends integers as strings (`"mask": "24"`) and uses `"0"` or
//! `null` for an unset reference.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::Deserialize;
use std::fmt::Display;
use std::str::FromStr;

#[derive(Deserialize)]
#[serde(untagged)]
enum Raw {
    Str(String),
    Num(u64),
}

/// Integer field sent and received as a string.
pub mod string_int {
    use super::*;

    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Display,
        S: Serializer,
    {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        let text = match Raw::deserialize(deserializer)? {
            Raw::Str(s) => s,
            Raw::Num(n) => n.to_string(),
        };
        text.trim().parse().map_err(de::Error::custom)
    }
}

/// Optional reference id, `0`, `""` and `null` all mean unset.
pub mod opt_id {
    use super::*;

    pub fn serialize<S>(value: &Option<u32>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(id) => serializer.collect_str(id),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = match Option::<Raw>::deserialize(deserializer)? {
            None => return Ok(None),
            Some(Raw::Str(s)) => s,
            Some(Raw::Num(n)) => n.to_string(),
        };
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        let id: u32 = text.parse().map_err(de::Error::custom)?;
        Ok((id != 0).then_some(id))
    }
}

/// Strings phpIPAM may send as `null`.
pub fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Row {
        #[serde(with = "super::string_int")]
        mask: u8,
        #[serde(
            default,
            with = "super::opt_id",
            skip_serializing_if = "Option::is_none"
        )]
        parent: Option<u32>,
    }

    #[test]
    fn test_reads_strings_and_numbers() {
        let p: Row = serde_json::from_str(r#"{"mask":"24","parent":"7"}"#).unwrap();
        assert_eq!(p, Row { mask: 24, parent: Some(7) });
        let p: Row = serde_json::from_str(r#"{"mask":16,"parent":7}"#).unwrap();
        assert_eq!(p, Row { mask: 16, parent: Some(7) });
    }

    #[test]
    fn test_zero_and_null_are_unset() {
        for json in [
            r#"{"mask":"8","parent":"0"}"#,
            r#"{"mask":"8","parent":null}"#,
            r#"{"mask":"8","parent":""}"#,
            r#"{"mask":"8"}"#,
        ] {
            let p: Row = serde_json::from_str(json).unwrap();
            assert_eq!(p.parent, None, "{json}");
        }
    }

    #[test]
    fn test_writes_strings() {
        let json = serde_json::to_string(&Row { mask: 24, parent: Some(3) }).unwrap();
        assert_eq!(json, r#"{"mask":"24","parent":"3"}"#);
        let json = serde_json::to_string(&Row { mask: 24, parent: None }).unwrap();
        assert_eq!(json, r#"{"mask":"24"}"#);
    }
}
