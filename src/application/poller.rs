//! # Polling Loop
//!
//! Fetch-and-dispatch cycle against the transport: pull a batch with the
//! opaque cursor, translate each raw payload, dispatch in order, then
//! sleep a fixed interval regardless of success or failure. Transport
//! errors are logged and the loop continues; only the stop flag ends it,
//! and it does so before the next iteration, never mid-batch.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::application::dispatcher::Dispatcher;
use crate::domain::traits::Transport;
use crate::domain::types::parse_update;

pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

pub struct Poller {
    transport: Arc<dyn Transport>,
    dispatcher: Dispatcher,
    running: AtomicBool,
}

impl Poller {
    pub fn new(transport: Arc<dyn Transport>, dispatcher: Dispatcher) -> Self {
        Self {
            transport,
            dispatcher,
            running: AtomicBool::new(false),
        }
    }

    /// Request a cooperative stop: the current iteration finishes, the
    /// next one never starts.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub async fn run(&self) {
        self.running.store(true, Ordering::SeqCst);
        let mut cursor: Option<String> = None;

        while self.running.load(Ordering::SeqCst) {
            match self.transport.fetch(cursor.as_deref()).await {
                Ok((payloads, next_cursor)) => {
                    for payload in &payloads {
                        match parse_update(payload) {
                            Some(update) => self.dispatcher.dispatch(update).await,
                            None => {
                                tracing::warn!("Dropping unrecognized update payload: {payload}")
                            }
                        }
                    }
                    if next_cursor.is_some() {
                        cursor = next_cursor;
                    }
                }
                Err(error) => tracing::error!("Failed to poll updates: {error:#}"),
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
        tracing::info!("Polling loop stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dispatcher::SharedContext;
    use crate::application::predicate::Predicate;
    use anyhow::Result;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Mutex;

    use crate::domain::types::Keypad;

    /// Scripted transport: hands out one batch per fetch, then empties.
    struct ScriptedTransport {
        batches: Mutex<Vec<(Vec<Value>, Option<String>)>>,
        cursors_seen: Mutex<Vec<Option<String>>>,
        fail_first: AtomicBool,
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn fetch(&self, cursor: Option<&str>) -> Result<(Vec<Value>, Option<String>)> {
            self.cursors_seen
                .lock()
                .await
                .push(cursor.map(str::to_string));
            if self.fail_first.swap(false, Ordering::SeqCst) {
                anyhow::bail!("transient transport failure");
            }
            let mut batches = self.batches.lock().await;
            if batches.is_empty() {
                Ok((Vec::new(), None))
            } else {
                Ok(batches.remove(0))
            }
        }

        async fn send_message(
            &self,
            _chat_id: &str,
            _text: &str,
            _keypad: Option<Keypad>,
        ) -> Result<Option<String>> {
            Ok(None)
        }

        async fn edit_message(
            &self,
            _chat_id: &str,
            _message_id: &str,
            _text: &str,
            _keypad: Option<Keypad>,
        ) -> Result<()> {
            Ok(())
        }

        async fn delete_message(&self, _chat_id: &str, _message_id: &str) -> Result<()> {
            Ok(())
        }
    }

    fn message_payload(text: &str) -> Value {
        json!({
            "chat_id": "b1",
            "new_message": { "message_id": "m", "sender_id": 1, "text": text }
        })
    }

    #[tokio::test(start_paused = true)]
    async fn polls_dispatches_and_advances_cursor_despite_errors() {
        let transport = Arc::new(ScriptedTransport {
            batches: Mutex::new(vec![
                (
                    vec![
                        message_payload("one"),
                        json!({ "garbage": true }),
                        message_payload("two"),
                    ],
                    Some("cursor-1".to_string()),
                ),
                (vec![message_payload("three")], None),
            ]),
            cursors_seen: Mutex::new(Vec::new()),
            fail_first: AtomicBool::new(true),
        });

        let seen = Arc::new(AtomicUsize::new(0));
        let mut dispatcher = Dispatcher::new(SharedContext::new());
        let seen_clone = seen.clone();
        dispatcher.register(
            Predicate::TextPresent,
            Arc::new(move |_, _| {
                let seen = seen_clone.clone();
                Box::pin(async move {
                    seen.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                })
            }),
        );

        let poller = Arc::new(Poller::new(transport.clone(), dispatcher));
        let runner = {
            let poller = poller.clone();
            tokio::spawn(async move { poller.run().await })
        };

        // First fetch fails, then two batches, then idle fetches.
        for _ in 0..5 {
            tokio::time::sleep(POLL_INTERVAL).await;
        }
        poller.stop();
        tokio::time::sleep(POLL_INTERVAL).await;
        runner.await.expect("poller task completes");

        // Malformed payload dropped, three well-formed messages routed.
        assert_eq!(seen.load(Ordering::SeqCst), 3);

        let cursors = transport.cursors_seen.lock().await;
        // Cursor advances after the first successful batch and sticks
        // when the transport stops returning one.
        assert!(cursors.contains(&Some("cursor-1".to_string())));
        let last = cursors.last().expect("at least one fetch");
        assert_eq!(last.as_deref(), Some("cursor-1"));
    }
}
