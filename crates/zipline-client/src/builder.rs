/*!
# Compression Transaction Builder

Drives a compression request from a human-unit amount to a simulated,
unsigned transaction: balance sufficiency check, associated-account
bootstrap for token flows, base-unit conversion against the mint's own
decimals, assembly through [`zipline_sdk`], and the mandatory preflight
simulation.

Everything here is a write path: lookups do not degrade to zero, every
failure aborts the build and carries its cause to the caller.
*/

use rust_decimal::Decimal;
use solana_sdk::{pubkey::Pubkey, signer::Signer, transaction::Transaction};
use spl_associated_token_account::get_associated_token_address;
use spl_token::state::Account as TokenAccount;
use tracing::{debug, info};
use zipline_sdk::{
    build_compress_sol_tx, build_compress_token_tx, build_create_ata_tx, convert_to_lamports,
    convert_to_token_amount,
};

use crate::{
    balance::AssetSelector,
    errors::{ClientError, ClientResult},
    ZiplineClient,
};

impl ZiplineClient {
    /// Build the unsigned transaction that compresses `amount` (human units)
    /// of the selected asset held by `payer`.
    ///
    /// The returned transaction has already passed preflight simulation and
    /// is ready to sign. `payer` signs only when a missing associated token
    /// account has to be created first; the compression transaction itself
    /// is returned unsigned.
    pub async fn build_compression_tx(
        &self,
        payer: &dyn Signer,
        amount: Decimal,
        selector: &AssetSelector,
    ) -> ClientResult<Transaction> {
        let tx = match selector {
            AssetSelector::Sol => self.build_sol_compression(&payer.pubkey(), amount).await?,
            AssetSelector::Usdc | AssetSelector::Custom(_) => {
                // mint() is Some for both token selectors
                let mint = selector
                    .mint()
                    .ok_or_else(|| ClientError::InvalidAddress(selector.to_string()))?;
                self.build_token_compression(payer, amount, &mint).await?
            }
        };

        // One preflight per build, after assembly and before any signature
        // request. A failed simulation carries the ledger's own diagnostics
        // verbatim.
        let simulation = self.simulate_transaction(&tx).await?;
        if !simulation.success {
            return Err(ClientError::SimulationFailed(simulation.failure_message()));
        }

        Ok(tx)
    }

    async fn build_sol_compression(
        &self,
        payer: &Pubkey,
        amount: Decimal,
    ) -> ClientResult<Transaction> {
        let required = convert_to_lamports(amount)?;
        let available = self.get_sol_balance(payer).await?;
        if required > available {
            return Err(ClientError::InsufficientBalance {
                required,
                available,
            });
        }

        debug!(%payer, lamports = required, "building SOL compression");
        let recent_blockhash = self.get_latest_blockhash().await?;
        Ok(build_compress_sol_tx(payer, required, recent_blockhash)?)
    }

    async fn build_token_compression(
        &self,
        payer: &dyn Signer,
        amount: Decimal,
        mint: &Pubkey,
    ) -> ClientResult<Transaction> {
        let owner = payer.pubkey();
        let ata = get_associated_token_address(&owner, mint);
        let token_account = self.ensure_associated_token_account(payer, mint, &ata).await?;

        let mint_account = self
            .get_mint(mint)
            .await?
            .ok_or_else(|| ClientError::AccountNotFound(format!("mint {mint}")))?;
        let required = convert_to_token_amount(amount, mint_account.decimals)?;

        if token_account.amount < required {
            return Err(ClientError::InsufficientBalance {
                required,
                available: token_account.amount,
            });
        }

        debug!(%owner, %mint, base_units = required, "building token compression");
        let recent_blockhash = self.get_latest_blockhash().await?;
        Ok(build_compress_token_tx(
            &owner,
            mint,
            &ata,
            required,
            recent_blockhash,
        )?)
    }

    /// Read the payer's associated token account for `mint`, creating it as
    /// its own confirmed transaction when it does not exist yet.
    ///
    /// The creation instruction is idempotent, so racing another creator
    /// resolves to the account existing either way.
    async fn ensure_associated_token_account(
        &self,
        payer: &dyn Signer,
        mint: &Pubkey,
        ata: &Pubkey,
    ) -> ClientResult<TokenAccount> {
        if let Some(account) = self.get_token_account(ata).await? {
            return Ok(account);
        }

        let owner = payer.pubkey();
        info!(%ata, %mint, "associated token account missing, creating");

        let recent_blockhash = self.get_latest_blockhash().await?;
        let mut tx = build_create_ata_tx(&owner, &owner, mint, recent_blockhash);
        tx.try_sign(&[payer], recent_blockhash)?;
        let signature = self.send_and_confirm_transaction(&tx).await?;
        info!(%signature, %ata, "associated token account created");

        self.get_token_account(ata)
            .await?
            .ok_or_else(|| ClientError::AccountNotFound(format!("associated token account {ata}")))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::sync::{Arc, Mutex};
    use std::thread;

    use rust_decimal::dec;
    use serde_json::{json, Value};
    use solana_sdk::{hash::Hash, signature::Keypair, signature::Signature, signer::Signer};

    use super::*;

    type Hits = Arc<Mutex<HashMap<String, usize>>>;

    /// Minimal local JSON-RPC responder: one canned result per method, every
    /// call counted. Methods without a canned result answer `null`, which
    /// the client surfaces as an RPC error.
    fn spawn_rpc_stub(responses: HashMap<&'static str, Value>) -> (String, Hits) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let hits: Hits = Arc::new(Mutex::new(HashMap::new()));

        let accept_hits = Arc::clone(&hits);
        thread::spawn(move || {
            let responses = Arc::new(responses);
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { break };
                let responses = Arc::clone(&responses);
                let hits = Arc::clone(&accept_hits);
                thread::spawn(move || {
                    let _ = serve_connection(&mut stream, &responses, &hits);
                });
            }
        });

        (url, hits)
    }

    fn serve_connection(
        stream: &mut TcpStream,
        responses: &HashMap<&'static str, Value>,
        hits: &Hits,
    ) -> std::io::Result<()> {
        loop {
            let mut head = Vec::new();
            let mut byte = [0u8; 1];
            while !head.ends_with(b"\r\n\r\n") {
                if stream.read(&mut byte)? == 0 {
                    return Ok(());
                }
                head.push(byte[0]);
            }

            let head_text = String::from_utf8_lossy(&head);
            let content_length = head_text
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);

            let mut body = vec![0u8; content_length];
            stream.read_exact(&mut body)?;
            let request: Value = serde_json::from_slice(&body).unwrap();
            let method = request["method"].as_str().unwrap_or_default().to_string();

            *hits.lock().unwrap().entry(method.clone()).or_insert(0) += 1;

            let result = responses.get(method.as_str()).cloned().unwrap_or(Value::Null);
            let body = json!({ "jsonrpc": "2.0", "id": request["id"], "result": result }).to_string();
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
                body.len(),
                body
            );
            stream.write_all(response.as_bytes())?;
        }
    }

    fn hit_count(hits: &Hits, method: &str) -> usize {
        hits.lock().unwrap().get(method).copied().unwrap_or(0)
    }

    fn balance_response(lamports: u64) -> Value {
        json!({ "context": { "slot": 1 }, "value": lamports })
    }

    fn blockhash_response() -> Value {
        json!({
            "context": { "slot": 1 },
            "value": {
                "blockhash": Hash::new_unique().to_string(),
                "lastValidBlockHeight": 100u64,
            }
        })
    }

    fn simulation_response(err: Value, logs: Value) -> Value {
        json!({
            "context": { "slot": 1 },
            "value": {
                "err": err,
                "logs": logs,
                "accounts": null,
                "unitsConsumed": 5000u64,
                "returnData": null,
                "innerInstructions": null,
            }
        })
    }

    #[tokio::test]
    async fn test_insufficient_sol_fails_before_any_write() {
        let (url, hits) = spawn_rpc_stub(HashMap::from([(
            "getBalance",
            balance_response(500_000_000),
        )]));
        let client = ZiplineClient::new(url);
        let payer = Keypair::new();

        let result = client
            .build_compression_tx(&payer, dec!(1), &AssetSelector::Sol)
            .await;

        match result {
            Err(ClientError::InsufficientBalance {
                required,
                available,
            }) => {
                assert_eq!(required, 1_000_000_000);
                assert_eq!(available, 500_000_000);
            }
            other => panic!("expected InsufficientBalance, got {other:?}"),
        }

        // The build stops at the balance check: no blockhash fetch, no
        // simulation, nothing broadcast.
        assert_eq!(hit_count(&hits, "getBalance"), 1);
        assert_eq!(hit_count(&hits, "getLatestBlockhash"), 0);
        assert_eq!(hit_count(&hits, "simulateTransaction"), 0);
        assert_eq!(hit_count(&hits, "sendTransaction"), 0);
    }

    #[tokio::test]
    async fn test_simulation_failure_carries_payload_and_blocks_signing() {
        let (url, hits) = spawn_rpc_stub(HashMap::from([
            ("getBalance", balance_response(2_000_000_000)),
            ("getLatestBlockhash", blockhash_response()),
            (
                "simulateTransaction",
                simulation_response(
                    json!("AccountNotFound"),
                    json!(["Program log: no sol pool liquidity"]),
                ),
            ),
        ]));
        let client = ZiplineClient::new(url);
        let payer = Keypair::new();

        let result = client
            .build_compression_tx(&payer, dec!(1), &AssetSelector::Sol)
            .await;

        match result {
            Err(ClientError::SimulationFailed(detail)) => {
                // The ledger's error rendering plus the program logs,
                // unabridged.
                assert!(
                    detail.contains("prior credit") || detail.contains("AccountNotFound"),
                    "missing error detail: {detail}"
                );
                assert!(detail.contains("Program log: no sol pool liquidity"));
            }
            other => panic!("expected SimulationFailed, got {other:?}"),
        }

        assert_eq!(hit_count(&hits, "simulateTransaction"), 1);
        assert_eq!(hit_count(&hits, "sendTransaction"), 0);
    }

    #[tokio::test]
    async fn test_sol_build_simulates_once_and_returns_unsigned_tx() {
        let (url, hits) = spawn_rpc_stub(HashMap::from([
            ("getBalance", balance_response(2_000_000_000)),
            ("getLatestBlockhash", blockhash_response()),
            (
                "simulateTransaction",
                simulation_response(Value::Null, Value::Null),
            ),
        ]));
        let client = ZiplineClient::new(url);
        let payer = Keypair::new();

        let tx = client
            .build_compression_tx(&payer, dec!(1), &AssetSelector::Sol)
            .await
            .unwrap();

        // Three instructions, fee payer = requester, still unsigned.
        assert_eq!(tx.message.instructions.len(), 3);
        assert_eq!(tx.message.account_keys[0], payer.pubkey());
        assert_eq!(tx.signatures, vec![Signature::default()]);

        assert_eq!(hit_count(&hits, "simulateTransaction"), 1);
        assert_eq!(hit_count(&hits, "sendTransaction"), 0);
    }
}
