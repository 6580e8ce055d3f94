use alloy::dyn_abi::DynSolValue;
use alloy::json_abi::Function;
use alloy::primitives::U256;
use chrono::{DateTime, Utc};

use crate::data::error::{BridgeError, BridgeResult};
use crate::data::types::WaveRecord;

/// Component names of the contract's `Wave` struct.
const WAVER_FIELD: &str = "waver";
const TIMESTAMP_FIELD: &str = "timestamp";
const MESSAGE_FIELD: &str = "message";

pub struct WaveDecoder;

impl WaveDecoder {
    /// Decode the single `uint256` returned by `getTotalWaves`.
    pub fn decode_count(values: &[DynSolValue]) -> BridgeResult<U256> {
        values
            .first()
            .and_then(DynSolValue::as_uint)
            .map(|(count, _)| count)
            .ok_or_else(|| BridgeError::Decode("expected a uint wave count".to_string()))
    }

    /// Decode the struct array returned by `getAllWaves`.
    ///
    /// Fields are located by the component names declared in the ABI, so the
    /// struct layout of the deployed contract does not have to match ours.
    pub fn decode_waves(func: &Function, values: &[DynSolValue]) -> BridgeResult<Vec<WaveRecord>> {
        let output = func
            .outputs
            .first()
            .ok_or_else(|| BridgeError::Decode(format!("`{}` declares no outputs", func.name)))?;

        let field_index = |field: &str| {
            output
                .components
                .iter()
                .position(|c| c.name == field)
                .ok_or_else(|| BridgeError::Decode(format!("wave struct has no `{field}` field")))
        };
        let waver_idx = field_index(WAVER_FIELD)?;
        let timestamp_idx = field_index(TIMESTAMP_FIELD)?;
        let message_idx = field_index(MESSAGE_FIELD)?;

        let items = values
            .first()
            .and_then(DynSolValue::as_array)
            .ok_or_else(|| BridgeError::Decode("expected an array of waves".to_string()))?;

        items
            .iter()
            .map(|item| {
                let fields = item
                    .as_tuple()
                    .ok_or_else(|| BridgeError::Decode("wave entry is not a struct".to_string()))?;

                let address = fields
                    .get(waver_idx)
                    .and_then(DynSolValue::as_address)
                    .ok_or_else(|| BridgeError::Decode("`waver` is not an address".to_string()))?;
                let seconds = fields
                    .get(timestamp_idx)
                    .and_then(DynSolValue::as_uint)
                    .map(|(secs, _)| secs)
                    .ok_or_else(|| BridgeError::Decode("`timestamp` is not a uint".to_string()))?;
                let message = fields
                    .get(message_idx)
                    .and_then(DynSolValue::as_str)
                    .ok_or_else(|| BridgeError::Decode("`message` is not a string".to_string()))?;

                Ok(WaveRecord {
                    address,
                    timestamp: timestamp_from_secs(seconds)?,
                    message: message.to_string(),
                })
            })
            .collect()
    }
}

/// Convert on-chain seconds since the epoch into a UTC date-time.
pub fn timestamp_from_secs(seconds: U256) -> BridgeResult<DateTime<Utc>> {
    u64::try_from(seconds)
        .ok()
        .and_then(|secs| i64::try_from(secs).ok())
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .ok_or_else(|| BridgeError::Decode(format!("timestamp {seconds} out of range")))
}

/// Format a dynamic Solidity value to a human-readable string.
pub fn format_sol_value(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::Int(i, _) => i.to_string(),
        DynSolValue::Uint(u, _) => u.to_string(),
        DynSolValue::Address(a) => format!("{a}"),
        DynSolValue::String(s) => format!("\"{s}\""),
        DynSolValue::Array(arr) | DynSolValue::FixedArray(arr) => {
            let inner: Vec<String> = arr.iter().map(format_sol_value).collect();
            format!("[{}]", inner.join(", "))
        }
        DynSolValue::Tuple(parts) => {
            let inner: Vec<String> = parts.iter().map(format_sol_value).collect();
            format!("({})", inner.join(", "))
        }
        other => format!("{other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::json_abi::JsonAbi;
    use alloy::primitives::Address;

    fn get_all_waves(components: &str) -> Function {
        let json = format!(
            r#"[{{"type":"function","name":"getAllWaves","inputs":[],"outputs":[{{"name":"","type":"tuple[]","components":{components}}}],"stateMutability":"view"}}]"#
        );
        let abi: JsonAbi = serde_json::from_str(&json).unwrap();
        abi.function("getAllWaves").unwrap()[0].clone()
    }

    fn standard_layout() -> Function {
        get_all_waves(
            r#"[{"name":"waver","type":"address"},{"name":"message","type":"string"},{"name":"timestamp","type":"uint256"}]"#,
        )
    }

    fn wave_tuple(waver: Address, message: &str, timestamp: u64) -> DynSolValue {
        DynSolValue::Tuple(vec![
            DynSolValue::Address(waver),
            DynSolValue::String(message.to_string()),
            DynSolValue::Uint(U256::from(timestamp), 256),
        ])
    }

    #[test]
    fn test_decode_count() {
        let values = vec![DynSolValue::Uint(U256::from(5u64), 256)];
        assert_eq!(WaveDecoder::decode_count(&values).unwrap(), U256::from(5u64));
    }

    #[test]
    fn test_decode_count_wrong_type() {
        assert!(WaveDecoder::decode_count(&[]).is_err());
        let values = vec![DynSolValue::String("5".to_string())];
        assert!(WaveDecoder::decode_count(&values).is_err());
    }

    #[test]
    fn test_decode_single_wave() {
        let waver = Address::from_slice(&[0xab; 20]);
        let values = vec![DynSolValue::Array(vec![wave_tuple(waver, "hi", 1000)])];

        let waves = WaveDecoder::decode_waves(&standard_layout(), &values).unwrap();

        assert_eq!(waves.len(), 1);
        assert_eq!(waves[0].address, waver);
        assert_eq!(waves[0].message, "hi");
        assert_eq!(waves[0].timestamp.timestamp(), 1000);
        assert_eq!(
            waves[0].timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            "1970-01-01 00:16:40"
        );
    }

    #[test]
    fn test_decode_waves_preserves_order() {
        let values = vec![DynSolValue::Array(vec![
            wave_tuple(Address::from_slice(&[0x01; 20]), "first", 10),
            wave_tuple(Address::from_slice(&[0x02; 20]), "second", 20),
        ])];
        let waves = WaveDecoder::decode_waves(&standard_layout(), &values).unwrap();
        let messages: Vec<&str> = waves.iter().map(|w| w.message.as_str()).collect();
        assert_eq!(messages, ["first", "second"]);
    }

    #[test]
    fn test_decode_waves_by_field_name() {
        // Same struct with timestamp declared before message.
        let func = get_all_waves(
            r#"[{"name":"waver","type":"address"},{"name":"timestamp","type":"uint256"},{"name":"message","type":"string"}]"#,
        );
        let waver = Address::from_slice(&[0x07; 20]);
        let values = vec![DynSolValue::Array(vec![DynSolValue::Tuple(vec![
            DynSolValue::Address(waver),
            DynSolValue::Uint(U256::from(42u64), 256),
            DynSolValue::String("gm".to_string()),
        ])])];

        let waves = WaveDecoder::decode_waves(&func, &values).unwrap();
        assert_eq!(waves[0].message, "gm");
        assert_eq!(waves[0].timestamp.timestamp(), 42);
    }

    #[test]
    fn test_decode_waves_empty() {
        let values = vec![DynSolValue::Array(vec![])];
        assert!(WaveDecoder::decode_waves(&standard_layout(), &values).unwrap().is_empty());
    }

    #[test]
    fn test_decode_waves_missing_field() {
        let func = get_all_waves(r#"[{"name":"waver","type":"address"},{"name":"message","type":"string"}]"#);
        let values = vec![DynSolValue::Array(vec![])];
        let err = WaveDecoder::decode_waves(&func, &values).unwrap_err();
        assert!(matches!(err, BridgeError::Decode(ref msg) if msg.contains("timestamp")));
    }

    #[test]
    fn test_decode_waves_bad_entry_fails_whole_list() {
        let values = vec![DynSolValue::Array(vec![
            wave_tuple(Address::ZERO, "ok", 1),
            DynSolValue::Bool(true),
        ])];
        assert!(WaveDecoder::decode_waves(&standard_layout(), &values).is_err());
    }

    #[test]
    fn test_timestamp_out_of_range() {
        assert!(timestamp_from_secs(U256::MAX).is_err());
        assert!(timestamp_from_secs(U256::from(u64::MAX)).is_err());
        assert_eq!(timestamp_from_secs(U256::ZERO).unwrap().timestamp(), 0);
    }

    #[test]
    fn test_format_sol_value_wave() {
        let value = DynSolValue::Array(vec![wave_tuple(Address::ZERO, "hi", 1000)]);
        assert_eq!(
            format_sol_value(&value),
            "[(0x0000000000000000000000000000000000000000, \"hi\", 1000)]"
        );
    }
}
