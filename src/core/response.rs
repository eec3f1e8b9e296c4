use crate::core::errors::BittrexError;
use chrono::{Local, NaiveDateTime, TimeZone};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

/// Source-side field names whose string values carry the exchange's datetime
/// format. `T` is the candle timestamp on the v2 tick endpoint.
const TIMESTAMP_FIELDS: [&str; 7] = [
    "Created",
    "TimeStamp",
    "Opened",
    "Closed",
    "LastChecked",
    "T",
    "LastUpdated",
];

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S.%f";
const DATETIME_FORMAT_NO_FRACTION: &str = "%Y-%m-%dT%H:%M:%S";

static WORD_BOUNDARY_RE: OnceLock<Regex> = OnceLock::new();
static CASE_BOUNDARY_RE: OnceLock<Regex> = OnceLock::new();

/// Converts the exchange's mixed/Pascal-case field names to snake_case.
///
/// Two boundary-insertion passes: first before a capitalized word followed by
/// lowercase, then between a lowercase/digit and an uppercase. Downstream
/// consumers key on these names, so the transformation must stay stable.
pub fn to_snake_case(name: &str) -> String {
    let word = WORD_BOUNDARY_RE
        .get_or_init(|| Regex::new("(.)([A-Z][a-z]+)").expect("valid word boundary regex"));
    let case = CASE_BOUNDARY_RE
        .get_or_init(|| Regex::new("([a-z0-9])([A-Z])").expect("valid case boundary regex"));

    let pass_one = word.replace_all(name, "${1}_${2}");
    case.replace_all(&pass_one, "${1}_${2}").to_lowercase()
}

/// Parses the exchange datetime format into local-time epoch seconds.
///
/// The primary format requires fractional seconds; some endpoints omit them,
/// so parsing is retried once without the fraction before failing.
fn parse_timestamp(raw: &str) -> Result<i64, BittrexError> {
    let parsed = NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT_NO_FRACTION))
        .map_err(|e| {
            BittrexError::Response(format!("unparseable timestamp '{}': {}", raw, e))
        })?;

    Local
        .from_local_datetime(&parsed)
        .earliest()
        .map(|datetime| datetime.timestamp())
        .ok_or_else(|| {
            BittrexError::Response(format!("unrepresentable local time '{}'", raw))
        })
}

/// One normalized entity from an envelope `result`.
///
/// Keys are snake_case; values are the source JSON values, except the
/// timestamp fields, which hold epoch seconds. Iteration order matches the
/// source object. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    pub(crate) fn from_object(object: &Map<String, Value>) -> Result<Self, BittrexError> {
        let mut fields = Map::new();

        for (key, value) in object {
            let normalized = if TIMESTAMP_FIELDS.contains(&key.as_str()) {
                match value {
                    Value::String(raw) => Value::from(parse_timestamp(raw)?),
                    // null and non-string values pass through untouched
                    other => other.clone(),
                }
            } else {
                value.clone()
            };

            fields.insert(to_snake_case(key), normalized);
        }

        Ok(Self { fields })
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    pub fn f64_field(&self, field: &str) -> Option<f64> {
        self.fields.get(field).and_then(Value::as_f64)
    }

    pub fn i64_field(&self, field: &str) -> Option<i64> {
        self.fields.get(field).and_then(Value::as_i64)
    }

    pub fn bool_field(&self, field: &str) -> Option<bool> {
        self.fields.get(field).and_then(Value::as_bool)
    }

    /// Market identifier, present on market and summary records.
    pub fn market_name(&self) -> Option<&str> {
        self.str_field("market_name")
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }
}

/// Normalized form of the envelope's `result` field.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// `result` was a sequence; source order is preserved.
    Many(Vec<Record>),
    /// `result` was a single object.
    One(Record),
}

impl Payload {
    /// Sequence view, failing when the endpoint returned a single object.
    pub fn into_many(self) -> Result<Vec<Record>, BittrexError> {
        match self {
            Self::Many(records) => Ok(records),
            Self::One(_) => Err(BittrexError::Response(
                "expected a sequence of records, got a single record".to_string(),
            )),
        }
    }

    /// Single-record view, failing when the endpoint returned a sequence.
    pub fn into_one(self) -> Result<Record, BittrexError> {
        match self {
            Self::One(record) => Ok(record),
            Self::Many(_) => Err(BittrexError::Response(
                "expected a single record, got a sequence".to_string(),
            )),
        }
    }
}

/// Normalizes a decoded `{success, message, result}` envelope.
///
/// `success: false` surfaces the exchange's message as a request error;
/// `result` must be an array of objects or a single object, anything else is
/// a response error. No partial record lists are returned on mid-parse
/// failure.
pub fn parse_envelope(body: &Value) -> Result<Payload, BittrexError> {
    let success = body
        .get("success")
        .and_then(Value::as_bool)
        .ok_or_else(|| BittrexError::Response(format!("envelope missing success flag: {}", body)))?;

    if !success {
        let message = body.get("message").and_then(Value::as_str).unwrap_or("");
        return Err(BittrexError::Request(message.to_string()));
    }

    match body.get("result") {
        Some(Value::Array(items)) => {
            let mut records = Vec::with_capacity(items.len());
            for item in items {
                let object = item
                    .as_object()
                    .ok_or_else(|| BittrexError::Response(format!("parsing failed: {}", item)))?;
                records.push(Record::from_object(object)?);
            }
            Ok(Payload::Many(records))
        }
        Some(Value::Object(object)) => Ok(Payload::One(Record::from_object(object)?)),
        other => Err(BittrexError::Response(format!(
            "parsing failed: {}",
            other.unwrap_or(&Value::Null)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn local_epoch(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> i64 {
        Local
            .with_ymd_and_hms(y, mo, d, h, mi, s)
            .earliest()
            .unwrap()
            .timestamp()
    }

    #[test]
    fn snake_case_matches_source_transformation() {
        assert_eq!(to_snake_case("MarketName"), "market_name");
        assert_eq!(to_snake_case("BaseCurrency"), "base_currency");
        assert_eq!(to_snake_case("MinTradeSize"), "min_trade_size");
        assert_eq!(to_snake_case("IsActive"), "is_active");
        assert_eq!(to_snake_case("TxFee"), "tx_fee");
        assert_eq!(to_snake_case("OrderUuid"), "order_uuid");
        assert_eq!(to_snake_case("T"), "t");
        assert_eq!(to_snake_case("BTC"), "btc");
        assert_eq!(to_snake_case("PricePerUnit"), "price_per_unit");
    }

    #[test]
    fn normalizes_market_record_with_timestamp() {
        let body = json!({
            "success": true,
            "message": "",
            "result": [{"MarketName": "BTC-LTC", "Created": "2016-01-01T00:00:00.000"}]
        });

        let records = parse_envelope(&body).unwrap().into_many().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].market_name(), Some("BTC-LTC"));
        assert_eq!(
            records[0].i64_field("created"),
            Some(local_epoch(2016, 1, 1, 0, 0, 0))
        );
    }

    #[test]
    fn timestamp_without_fraction_parses_via_fallback() {
        assert_eq!(
            parse_timestamp("2016-01-01T00:00:00").unwrap(),
            local_epoch(2016, 1, 1, 0, 0, 0)
        );
    }

    #[test]
    fn timestamp_with_fraction_parses_via_primary_format() {
        assert_eq!(
            parse_timestamp("2017-06-15T12:30:45.1234567").unwrap(),
            local_epoch(2017, 6, 15, 12, 30, 45)
        );
    }

    #[test]
    fn garbage_timestamp_is_a_response_error() {
        assert!(matches!(
            parse_timestamp("not-a-date"),
            Err(BittrexError::Response(_))
        ));
    }

    #[test]
    fn null_timestamp_passes_through() {
        let body = json!({
            "success": true,
            "result": {"Opened": null, "Closed": "2016-01-01T00:00:00"}
        });

        let record = parse_envelope(&body).unwrap().into_one().unwrap();
        assert_eq!(record.get("opened"), Some(&Value::Null));
        assert_eq!(
            record.i64_field("closed"),
            Some(local_epoch(2016, 1, 1, 0, 0, 0))
        );
    }

    #[test]
    fn non_timestamp_values_are_not_coerced() {
        let body = json!({
            "success": true,
            "result": {"Quantity": "12.5", "IsOpen": true, "Limit": 0.0001}
        });

        let record = parse_envelope(&body).unwrap().into_one().unwrap();
        assert_eq!(record.str_field("quantity"), Some("12.5"));
        assert_eq!(record.bool_field("is_open"), Some(true));
        assert_eq!(record.f64_field("limit"), Some(0.0001));
    }

    #[test]
    fn failed_envelope_raises_request_error_with_message() {
        let body = json!({"success": false, "message": "INVALID_MARKET"});
        match parse_envelope(&body) {
            Err(BittrexError::Request(message)) => assert_eq!(message, "INVALID_MARKET"),
            other => panic!("expected request error, got {:?}", other),
        }
    }

    #[test]
    fn scalar_result_is_a_response_error() {
        let body = json!({"success": true, "result": "oops"});
        assert!(matches!(
            parse_envelope(&body),
            Err(BittrexError::Response(_))
        ));
    }

    #[test]
    fn null_result_is_a_response_error() {
        let body = json!({"success": true, "result": null});
        assert!(matches!(
            parse_envelope(&body),
            Err(BittrexError::Response(_))
        ));
    }

    #[test]
    fn sequence_order_is_preserved() {
        let body = json!({
            "success": true,
            "result": [
                {"MarketName": "BTC-LTC"},
                {"MarketName": "BTC-ETH"},
                {"MarketName": "BTC-DOGE"}
            ]
        });

        let records = parse_envelope(&body).unwrap().into_many().unwrap();
        let names: Vec<&str> = records.iter().filter_map(Record::market_name).collect();
        assert_eq!(names, vec!["BTC-LTC", "BTC-ETH", "BTC-DOGE"]);
    }

    #[test]
    fn record_iteration_follows_source_key_order() {
        let body = json!({
            "success": true,
            "result": {"MarketName": "BTC-LTC", "High": 1.0, "Low": 0.5}
        });

        let record = parse_envelope(&body).unwrap().into_one().unwrap();
        let keys: Vec<&str> = record.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["market_name", "high", "low"]);
    }
}
