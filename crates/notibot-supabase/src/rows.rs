//! PostgREST row shapes and the lenient decoding they need.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

#[derive(Debug, Deserialize)]
pub(crate) struct BindCodeRow {
    pub bind_code: String,
    #[serde(deserialize_with = "opaque_id")]
    pub user_id: String,
    pub expires_at: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserNameRow {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LinkedUserRow {
    pub name: Option<String>,
    #[serde(deserialize_with = "opaque_id")]
    pub telegram_chat_id: String,
}

/// Ids may be uuid strings or integers depending on the column type.
fn opaque_id<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(de)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

/// `timestamptz` comes back as RFC 3339; a plain `timestamp` has no offset and
/// is taken as UTC.
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn parses_timestamp_variants() {
        let want = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-01-01T00:00:00Z"), Some(want));
        assert_eq!(parse_timestamp("2024-01-01T03:00:00+03:00"), Some(want));
        assert_eq!(parse_timestamp("2024-01-01T00:00:00"), Some(want));
        assert_eq!(parse_timestamp("2024-01-01 00:00:00.000"), Some(want));
        assert_eq!(parse_timestamp("tomorrow"), None);
    }

    #[test]
    fn ids_decode_from_strings_and_numbers() {
        let row: BindCodeRow = serde_json::from_str(
            r#"{"bind_code":"A","user_id":42,"expires_at":"2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(row.user_id, "42");

        let row: LinkedUserRow =
            serde_json::from_str(r#"{"name":null,"telegram_chat_id":"-1001"}"#).unwrap();
        assert_eq!(row.telegram_chat_id, "-1001");
        assert!(row.name.is_none());

        assert!(serde_json::from_str::<LinkedUserRow>(r#"{"name":"x","telegram_chat_id":[1]}"#).is_err());
    }
}
