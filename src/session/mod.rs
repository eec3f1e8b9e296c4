pub mod asynchronous;
pub mod blocking;
pub mod endpoints;

pub use asynchronous::BittrexSession;
pub use blocking::BittrexBlockingSession;
pub use endpoints::OrderBookType;

use crate::core::errors::BittrexError;
use crate::core::response::{Payload, Record};

/// Scans a market list for an exact `market_name` match.
///
/// A miss is a lookup result internally and becomes a request error only
/// here, at the public boundary.
pub(crate) fn find_market(markets: Vec<Record>, market_name: &str) -> Result<Record, BittrexError> {
    markets
        .into_iter()
        .find(|market| market.market_name() == Some(market_name))
        .ok_or_else(|| BittrexError::Request(format!("Could not find {}", market_name)))
}

/// Keeps only the last candle of a full series, as a single-element sequence.
pub(crate) fn latest_candle(mut candles: Vec<Record>) -> Result<Payload, BittrexError> {
    candles
        .pop()
        .map(|candle| Payload::Many(vec![candle]))
        .ok_or_else(|| BittrexError::Request("empty candle series".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::response::parse_envelope;
    use serde_json::json;

    fn markets() -> Vec<Record> {
        let body = json!({
            "success": true,
            "result": [{"MarketName": "BTC-LTC"}, {"MarketName": "BTC-ETH"}]
        });
        parse_envelope(&body).unwrap().into_many().unwrap()
    }

    #[test]
    fn find_market_returns_exact_match() {
        let market = find_market(markets(), "BTC-ETH").unwrap();
        assert_eq!(market.market_name(), Some("BTC-ETH"));
    }

    #[test]
    fn find_market_is_case_sensitive() {
        assert!(matches!(
            find_market(markets(), "btc-eth"),
            Err(BittrexError::Request(_))
        ));
    }

    #[test]
    fn find_market_miss_is_a_request_error() {
        match find_market(markets(), "BTC-XMR") {
            Err(BittrexError::Request(message)) => {
                assert_eq!(message, "Could not find BTC-XMR");
            }
            other => panic!("expected request error, got {:?}", other),
        }
    }

    #[test]
    fn latest_candle_keeps_only_the_last_element() {
        let body = json!({
            "success": true,
            "result": [{"C": 1.0}, {"C": 2.0}, {"C": 3.0}]
        });
        let candles = parse_envelope(&body).unwrap().into_many().unwrap();
        let last = candles.last().cloned().unwrap();

        match latest_candle(candles).unwrap() {
            Payload::Many(records) => assert_eq!(records, vec![last]),
            Payload::One(_) => panic!("latest candle should stay a sequence"),
        }
    }

    #[test]
    fn latest_candle_of_empty_series_fails() {
        assert!(matches!(
            latest_candle(Vec::new()),
            Err(BittrexError::Request(_))
        ));
    }
}
