//! # Both Roles over HTTP
//!
//! Starts a real authority and client node on loopback sockets and drives
//! them through their public routes.

#[cfg(test)]
mod tests {
    use crate::fixtures::transactions;
    use node_runtime::config::Secret32;
    use node_runtime::{NodeConfig, NodeRole, NodeRuntime};
    use serde_json::Value;
    use shared_crypto::{Ed25519KeyPair, EncryptionKeyPair};
    use shared_types::{PayloadShape, Transaction};
    use std::time::Duration;

    fn authority_config(dir: &tempfile::TempDir) -> NodeConfig {
        let mut config = NodeConfig {
            authority_seed: Some(Secret32::new([9; 32])),
            data_file: dir.path().join("chain.json"),
            ..NodeConfig::default()
        };
        config.gateway.http_addr = "127.0.0.1:0".parse().unwrap();
        config.authority.seal_threshold = 2;
        config
    }

    fn client_config(authority: &NodeRuntime) -> NodeConfig {
        let mut config = NodeConfig {
            role: NodeRole::Client,
            ..NodeConfig::default()
        };
        config.gateway.http_addr = "127.0.0.1:0".parse().unwrap();
        config.sync.authority_url = format!("http://{}", authority.local_addr());
        config.sync.sync_interval_secs = 1;
        config
    }

    async fn wait_for_height(node: &NodeRuntime, height: usize) {
        for _ in 0..50 {
            if node.height() >= height {
                return;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        panic!("node stuck at height {}, wanted {}", node.height(), height);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_client_forwards_and_replicates() {
        let dir = tempfile::tempdir().unwrap();
        let authority = NodeRuntime::start(authority_config(&dir)).await.unwrap();
        let client = NodeRuntime::start(client_config(&authority)).await.unwrap();
        let http = reqwest::Client::new();

        for tx in transactions(2) {
            let response = http
                .post(format!("http://{}/addTransaction", client.local_addr()))
                .json(&tx)
                .send()
                .await
                .unwrap();
            assert_eq!(response.status(), 200);
        }
        assert_eq!(authority.height(), 2);

        wait_for_height(&client, 2).await;
        let chain: Value = http
            .get(format!("http://{}/getBlockchain", client.local_addr()))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(chain.as_array().unwrap().len(), 2);

        client.shutdown().await.unwrap();
        authority.shutdown().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_authority_rejects_duplicates_and_forgeries() {
        let dir = tempfile::tempdir().unwrap();
        let authority = NodeRuntime::start(authority_config(&dir)).await.unwrap();
        let base = format!("http://{}", authority.local_addr());
        let http = reqwest::Client::new();

        let doctor = Ed25519KeyPair::generate();
        let record = crate::fixtures::record(1);
        let tx = Transaction::new_record(
            &record,
            &doctor,
            &EncryptionKeyPair::generate().public_key(),
            PayloadShape::Whole,
        )
        .unwrap();

        let post = |body: Value| {
            let http = http.clone();
            let url = format!("{}/addTransaction", base);
            async move { http.post(url).json(&body).send().await.unwrap() }
        };

        let body = serde_json::to_value(&tx).unwrap();
        assert_eq!(post(body.clone()).await.status(), 200);
        assert_eq!(post(body.clone()).await.status(), 409);

        let mut forged = body;
        forged["signature"] = Value::String("00".repeat(64));
        let response = post(forged).await;
        assert_eq!(response.status(), 400);
        let error: Value = response.json().await.unwrap();
        assert_eq!(error["error"]["kind"], "invalid_transaction");

        authority.shutdown().await.unwrap();
    }
}
