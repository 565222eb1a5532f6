//! Decoding of kline stream payloads.
//!
//! Only the symbol (`s`), close price (`k.c`) and closed flag (`k.x`) are
//! read; every other field of the payload is ignored.

use serde::Deserialize;

use crate::errors::{AppError, AppResult};
use crate::marketdata::events::CandleUpdate;

#[derive(Debug, Deserialize)]
struct KlineEnvelope {
    #[serde(rename = "s")]
    symbol: String,
    #[serde(rename = "k")]
    kline: KlinePayload,
}

#[derive(Debug, Deserialize)]
struct KlinePayload {
    #[serde(rename = "c")]
    close: DecimalField,
    #[serde(rename = "x")]
    is_closed: bool,
}

/// The exchange sends decimals as strings; bare numbers are accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DecimalField {
    Text(String),
    Number(f64),
}

impl DecimalField {
    fn to_f64(&self) -> AppResult<f64> {
        match self {
            DecimalField::Text(raw) => raw
                .parse::<f64>()
                .map_err(|e| AppError::Decode(format!("invalid close price {raw:?}: {e}"))),
            DecimalField::Number(value) => Ok(*value),
        }
    }
}

pub fn decode_message(raw: &str) -> AppResult<CandleUpdate> {
    let envelope: KlineEnvelope =
        serde_json::from_str(raw).map_err(|e| AppError::Decode(e.to_string()))?;
    let close_price = envelope.kline.close.to_f64()?;
    Ok(CandleUpdate {
        symbol: envelope.symbol,
        close_price,
        is_closed: envelope.kline.is_closed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BNBBTC_KLINE: &str = r#"{
        "e": "kline",
        "E": 123456789,
        "s": "BNBBTC",
        "k": {
            "t": 123400000,
            "T": 123460000,
            "s": "BNBBTC",
            "i": "1m",
            "f": 100,
            "L": 200,
            "o": "0.0010",
            "c": "0.0020",
            "h": "0.0025",
            "l": "0.0015",
            "v": "1000",
            "n": 100,
            "x": false,
            "q": "1.0000",
            "V": "500",
            "Q": "0.500",
            "B": "123456"
        }
    }"#;

    #[test]
    fn decodes_full_kline_payload() {
        let update = decode_message(BNBBTC_KLINE).unwrap();
        assert_eq!(update.symbol, "BNBBTC");
        assert_eq!(update.close_price, 0.0020);
        assert!(!update.is_closed);
    }

    #[test]
    fn accepts_numeric_close_price() {
        let update = decode_message(r#"{"s":"test_pair","k":{"x":true,"c":3}}"#).unwrap();
        assert_eq!(update.close_price, 3.0);
        assert!(update.is_closed);
    }

    #[test]
    fn missing_close_price_is_a_decode_error() {
        let err = decode_message(r#"{"s":"BNBBTC","k":{"x":true}}"#).unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));
    }

    #[test]
    fn non_json_is_a_decode_error() {
        let err = decode_message("not json at all").unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));
    }

    #[test]
    fn mistyped_fields_are_decode_errors() {
        for raw in [
            r#"{"s":"BNBBTC","k":{"c":"abc","x":true}}"#,
            r#"{"s":"BNBBTC","k":{"c":"1.0","x":"yes"}}"#,
            r#"{"s":42,"k":{"c":"1.0","x":true}}"#,
            r#"{"s":"BNBBTC"}"#,
        ] {
            assert!(
                matches!(decode_message(raw), Err(AppError::Decode(_))),
                "expected decode error for {raw}"
            );
        }
    }
}
