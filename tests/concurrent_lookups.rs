//! Lookups under concurrent rule replacement.

use std::sync::Arc;

use serde_json::json;

use redirect_mapper::routing::Redirector;
use redirect_mapper::storage::MemoryStore;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_readers_never_see_partial_sets() {
    let store = Arc::new(MemoryStore::new(json!([
        {"from": "/a", "to": "/v0"},
        {"from": "/b", "to": "/v0"},
    ])));
    let redirector = Arc::new(Redirector::load(store).unwrap());

    let writer = {
        let redirector = Arc::clone(&redirector);
        tokio::spawn(async move {
            for i in 1..=200 {
                let to = format!("/v{i}");
                redirector
                    .replace(&json!([{"from": "/a", "to": to}, {"from": "/b", "to": to}]))
                    .await
                    .unwrap();
            }
        })
    };

    let mut readers = Vec::new();
    for _ in 0..4 {
        let redirector = Arc::clone(&redirector);
        readers.push(tokio::spawn(async move {
            for _ in 0..2_000 {
                let snapshot = redirector.snapshot();
                assert_eq!(snapshot.len(), 2);
                assert_eq!(snapshot.lookup("/a"), snapshot.lookup("/b"));
                tokio::task::yield_now().await;
            }
        }));
    }

    writer.await.unwrap();
    for reader in readers {
        reader.await.unwrap();
    }

    assert_eq!(redirector.resolve("/a").as_deref(), Some("/v200"));
}
