/*!
# Submission Driver

The state machine that takes a compression request from amount entry to
confirmation: parse, snapshot the balance, build (which simulates), sign,
send, confirm, notify. One submission at a time; nothing is retried and
nothing in flight is cancelable. A failed attempt leaves the driver
reusable from the start.
*/

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use solana_sdk::{signature::Signature, signer::Signer};
use tracing::{debug, info};
use zipline_sdk::AmountError;

use crate::{
    balance::AssetSelector,
    errors::{ClientError, ClientResult},
    types::explorer_tx_url,
    ZiplineClient,
};

/// Where a submission currently stands. `Succeeded` and `Failed` are
/// terminal for the attempt; the driver accepts a new submission from
/// either.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    Idle,
    Validating,
    Building,
    AwaitingSignature,
    Confirming,
    Succeeded,
    Failed,
}

impl fmt::Display for SubmissionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SubmissionPhase::Idle => "idle",
            SubmissionPhase::Validating => "validating input",
            SubmissionPhase::Building => "building transaction",
            SubmissionPhase::AwaitingSignature => "awaiting signature",
            SubmissionPhase::Confirming => "confirming",
            SubmissionPhase::Succeeded => "succeeded",
            SubmissionPhase::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// What a confirmed submission hands back to the caller.
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub signature: Signature,
    pub amount: Decimal,
    pub symbol: String,
    pub notification: String,
    pub explorer_url: String,
}

/// Drives one compression submission at a time against a shared client.
pub struct SubmissionDriver {
    client: Arc<ZiplineClient>,
    phase: SubmissionPhase,
    in_flight: bool,
}

impl SubmissionDriver {
    pub fn new(client: Arc<ZiplineClient>) -> Self {
        Self {
            client,
            phase: SubmissionPhase::Idle,
            in_flight: false,
        }
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    /// Run a full submission: `amount_input` is the raw user string in
    /// human units.
    ///
    /// Refuses to start while another submission is in flight, mirroring a
    /// disabled submit control. On success a balance refresh is spawned
    /// fire-and-forget; the outcome does not wait for it.
    pub async fn submit(
        &mut self,
        payer: &dyn Signer,
        amount_input: &str,
        selector: &AssetSelector,
    ) -> ClientResult<SubmissionOutcome> {
        if self.in_flight {
            return Err(ClientError::SubmissionInProgress);
        }
        self.in_flight = true;

        let result = self.run(payer, amount_input, selector).await;
        self.phase = match result {
            Ok(_) => SubmissionPhase::Succeeded,
            Err(_) => SubmissionPhase::Failed,
        };
        self.in_flight = false;
        result
    }

    async fn run(
        &mut self,
        payer: &dyn Signer,
        amount_input: &str,
        selector: &AssetSelector,
    ) -> ClientResult<SubmissionOutcome> {
        self.transition(SubmissionPhase::Validating);
        let amount = Decimal::from_str(amount_input.trim())
            .map_err(|_| ClientError::UnparsableAmount(amount_input.to_string()))?;
        if amount <= Decimal::ZERO {
            return Err(ClientError::InvalidAmount(AmountError::NonPositive(amount)));
        }

        // Snapshot check in human units; the builder re-checks in base units
        // against a fresh read before constructing anything.
        let owner = payer.pubkey();
        let snapshot = self.client.get_balance(&owner, selector).await;
        if amount > snapshot.total {
            return Err(ClientError::AmountExceedsBalance {
                requested: amount,
                available: snapshot.total,
            });
        }

        self.transition(SubmissionPhase::Building);
        let mut tx = self.client.build_compression_tx(payer, amount, selector).await?;

        self.transition(SubmissionPhase::AwaitingSignature);
        let recent_blockhash = tx.message.recent_blockhash;
        tx.try_sign(&[payer], recent_blockhash)?;

        self.transition(SubmissionPhase::Confirming);
        let signature = self.client.send_and_confirm_transaction(&tx).await?;

        let symbol = selector.symbol();
        info!(%signature, %amount, symbol, "compression confirmed");
        self.spawn_balance_refresh(owner, *selector);

        Ok(SubmissionOutcome {
            signature,
            amount,
            notification: format!("Compressed {amount} {symbol} successfully!"),
            explorer_url: explorer_tx_url(&signature.to_string()),
            symbol,
        })
    }

    fn transition(&mut self, phase: SubmissionPhase) {
        debug!(from = %self.phase, to = %phase, "submission phase change");
        self.phase = phase;
    }

    /// Post-success refresh. Not ordered against any other read and its
    /// result is only logged.
    fn spawn_balance_refresh(&self, owner: solana_sdk::pubkey::Pubkey, selector: AssetSelector) {
        let client = Arc::clone(&self.client);
        tokio::spawn(async move {
            let view = client.get_balance(&owner, &selector).await;
            debug!(%owner, total = %view.total, "post-submission balance refresh");
        });
    }
}

#[cfg(test)]
mod tests {
    use solana_sdk::signature::Keypair;

    use super::*;

    // Unroutable endpoint: validation failures must surface before any
    // network call would be made.
    fn offline_driver() -> SubmissionDriver {
        SubmissionDriver::new(Arc::new(ZiplineClient::new(
            "http://127.0.0.1:1".to_string(),
        )))
    }

    #[tokio::test]
    async fn test_rejects_non_numeric_amount() {
        let mut driver = offline_driver();
        let payer = Keypair::new();

        let result = driver
            .submit(&payer, "one point five", &AssetSelector::Sol)
            .await;
        assert!(matches!(result, Err(ClientError::UnparsableAmount(_))));
        assert_eq!(driver.phase(), SubmissionPhase::Failed);
    }

    #[tokio::test]
    async fn test_rejects_non_positive_amounts() {
        let mut driver = offline_driver();
        let payer = Keypair::new();

        for input in ["0", "-1.5"] {
            let result = driver.submit(&payer, input, &AssetSelector::Sol).await;
            assert!(matches!(
                result,
                Err(ClientError::InvalidAmount(AmountError::NonPositive(_)))
            ));
        }
    }

    #[tokio::test]
    async fn test_refuses_concurrent_submission() {
        let mut driver = offline_driver();
        driver.in_flight = true;

        let payer = Keypair::new();
        let result = driver.submit(&payer, "1", &AssetSelector::Sol).await;
        assert!(matches!(result, Err(ClientError::SubmissionInProgress)));
    }

    #[tokio::test]
    async fn test_snapshot_gate_uses_degraded_balance() {
        // The offline endpoint degrades the snapshot to zero, so any
        // positive amount exceeds it before the builder runs.
        let mut driver = offline_driver();
        let payer = Keypair::new();

        let result = driver.submit(&payer, "1", &AssetSelector::Sol).await;
        match result {
            Err(ClientError::AmountExceedsBalance {
                requested,
                available,
            }) => {
                assert_eq!(requested, Decimal::ONE);
                assert_eq!(available, Decimal::ZERO);
            }
            other => panic!("expected AmountExceedsBalance, got {other:?}"),
        }
        assert_eq!(driver.phase(), SubmissionPhase::Failed);
    }

    #[tokio::test]
    async fn test_driver_is_reusable_after_failure() {
        let mut driver = offline_driver();
        let payer = Keypair::new();

        let first = driver.submit(&payer, "abc", &AssetSelector::Sol).await;
        assert!(first.is_err());

        // A second attempt is accepted and fails on its own merits.
        let second = driver.submit(&payer, "xyz", &AssetSelector::Sol).await;
        assert!(matches!(second, Err(ClientError::UnparsableAmount(_))));
    }

    #[test]
    fn test_phase_labels() {
        assert_eq!(SubmissionPhase::Idle.to_string(), "idle");
        assert_eq!(SubmissionPhase::Confirming.to_string(), "confirming");
    }
}
