use serde::{Deserialize, Serialize};

pub const SATS_PER_BTC: u64 = 100_000_000;

/// Unspent output as reported by an Esplora-style index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utxo {
    #[serde(default)]
    pub txid: String,
    #[serde(default)]
    pub vout: u32,
    /// Amount in satoshis
    pub value: u64,
}

/// Sum of values, saturating
pub fn total_value(utxos: &[Utxo]) -> u64 {
    utxos
        .iter()
        .fold(0u64, |acc, utxo| acc.saturating_add(utxo.value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_esplora_entry() {
        let json = r#"[{"txid":"ab","vout":1,"status":{"confirmed":true},"value":5000}]"#;
        let utxos: Vec<Utxo> = serde_json::from_str(json).unwrap();
        assert_eq!(utxos.len(), 1);
        assert_eq!(utxos[0].value, 5000);
    }

    #[test]
    fn test_total_value() {
        let utxos = vec![
            Utxo { txid: "a".into(), vout: 0, value: 100 },
            Utxo { txid: "b".into(), vout: 1, value: 250 },
        ];
        assert_eq!(total_value(&utxos), 350);
        assert_eq!(total_value(&[]), 0);
    }
}
