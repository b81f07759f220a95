/*!
# Client Data Types

Data structures for simulation results and transaction history, plus the
display helpers shared by every surface that prints signatures.
*/

use solana_client::rpc_response::{
    RpcConfirmedTransactionStatusWithSignature, RpcSimulateTransactionResult,
};

/// Result of transaction simulation
#[derive(Debug)]
pub struct SimulationResult {
    /// Whether the simulation succeeded
    pub success: bool,
    /// Compute units consumed
    pub compute_units: Option<u64>,
    /// Error message if simulation failed
    pub error: Option<String>,
    /// Raw simulation result
    pub raw: RpcSimulateTransactionResult,
}

impl SimulationResult {
    pub fn from_rpc_result(result: RpcSimulateTransactionResult) -> Self {
        let success = result.err.is_none();
        let compute_units = result.units_consumed;
        let error = result.err.as_ref().map(|e| e.to_string());

        Self {
            success,
            compute_units,
            error,
            raw: result,
        }
    }

    /// Full failure payload: the error followed by every program log line,
    /// unabridged. Callers surface this verbatim.
    pub fn failure_message(&self) -> String {
        let mut message = self
            .error
            .clone()
            .unwrap_or_else(|| "Unknown error".to_string());
        if let Some(logs) = &self.raw.logs {
            for line in logs {
                message.push('\n');
                message.push_str(line);
            }
        }
        message
    }
}

/// One confirmed transaction involving the wallet, newest first.
#[derive(Debug, Clone)]
pub struct TransactionRecord {
    pub signature: String,
    pub slot: u64,
    pub success: bool,
    pub block_time: Option<i64>,
}

impl From<RpcConfirmedTransactionStatusWithSignature> for TransactionRecord {
    fn from(status: RpcConfirmedTransactionStatusWithSignature) -> Self {
        Self {
            success: status.err.is_none(),
            signature: status.signature,
            slot: status.slot,
            block_time: status.block_time,
        }
    }
}

/// Solana explorer link for a transaction signature, pinned to devnet.
pub fn explorer_tx_url(signature: &str) -> String {
    format!("https://explorer.solana.com/tx/{signature}?cluster=devnet")
}

/// Shorten a signature or address to its first and last four characters.
pub fn shorten(value: &str) -> String {
    if value.len() <= 8 {
        return value.to_string();
    }
    format!("{}...{}", &value[..4], &value[value.len() - 4..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorten_long_signature() {
        let sig = "5j7s6NiJS3JAkvgkoc18WVAsiSaci2pxB2A6ueCJP4tprA2TFg9wSyTLeYouxPBJEMzJinENTkpA52YStRW5Dia7";
        assert_eq!(shorten(sig), "5j7s...Dia7");
    }

    #[test]
    fn test_shorten_leaves_short_values() {
        assert_eq!(shorten("abcd1234"), "abcd1234");
        assert_eq!(shorten(""), "");
    }

    #[test]
    fn test_explorer_url_targets_devnet() {
        assert_eq!(
            explorer_tx_url("abc"),
            "https://explorer.solana.com/tx/abc?cluster=devnet"
        );
    }
}
