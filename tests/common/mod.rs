//! Common test utilities for integration tests.
#![allow(dead_code)] // not every test binary uses every helper

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use kbchat::adapters::MockTransport;
use kbchat::{ChatEngine, Message, Notifier, Role};

/// Initialize test logging once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("kbchat=debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Build an engine around a scripted transport.
pub fn engine_with(transport: MockTransport) -> ChatEngine {
    init_tracing();
    ChatEngine::new(Arc::new(transport), Notifier::default())
}

/// Wait until a published snapshot satisfies the predicate, with a timeout.
pub async fn wait_for_snapshot<F>(
    rx: &mut watch::Receiver<Arc<Vec<Message>>>,
    predicate: F,
) -> Arc<Vec<Message>>
where
    F: Fn(&[Message]) -> bool,
{
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let snapshot = rx.borrow_and_update().clone();
            if predicate(&snapshot) {
                return snapshot;
            }
            rx.changed().await.expect("conversation state dropped");
        }
    })
    .await
    .expect("timed out waiting for snapshot")
}

/// The last assistant message in a snapshot.
pub fn last_assistant(messages: &[Message]) -> &Message {
    messages
        .iter()
        .rev()
        .find(|m| m.role == Role::Assistant)
        .expect("no assistant message in snapshot")
}
