//! # Handler Registry & Dispatcher
//!
//! Ordered bindings of (predicate, async action) and the broadcast
//! dispatch over them: every matching binding runs, in registration
//! order, for each update. Action failures are caught and logged at this
//! boundary; one action failing never blocks later actions for the same
//! update or later updates.

use std::sync::Arc;

use anyhow::Result;
use futures::future::BoxFuture;
use tokio::sync::Mutex;

use crate::application::context::ContextStore;
use crate::application::predicate::Predicate;
use crate::domain::types::Update;

/// Shared handle handed to every action alongside the update. The store
/// holds the per-actor / per-conversation scratch state; the lock is
/// uncontended because dispatch is strictly sequential.
#[derive(Clone)]
pub struct SharedContext {
    pub store: Arc<Mutex<ContextStore>>,
}

impl SharedContext {
    pub fn new() -> Self {
        Self {
            store: Arc::new(Mutex::new(ContextStore::new())),
        }
    }
}

impl Default for SharedContext {
    fn default() -> Self {
        Self::new()
    }
}

pub type HandlerFuture = BoxFuture<'static, Result<()>>;
pub type HandlerAction = Arc<dyn Fn(Update, SharedContext) -> HandlerFuture + Send + Sync>;

struct Binding {
    predicate: Predicate,
    action: HandlerAction,
}

/// Wrap a handler struct method into a registrable action.
pub fn action_of<H, F, Fut>(handler: &Arc<H>, method: F) -> HandlerAction
where
    H: Send + Sync + 'static,
    F: Fn(Arc<H>, Update, SharedContext) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = Result<()>> + Send + 'static,
{
    let handler = Arc::clone(handler);
    Arc::new(move |update, context| {
        let handler = Arc::clone(&handler);
        Box::pin(method(handler, update, context))
    })
}

pub struct Dispatcher {
    bindings: Vec<Binding>,
    context: SharedContext,
}

impl Dispatcher {
    pub fn new(context: SharedContext) -> Self {
        Self {
            bindings: Vec::new(),
            context,
        }
    }

    /// Append a binding. Registration order is dispatch order.
    pub fn register(&mut self, predicate: Predicate, action: HandlerAction) {
        self.bindings.push(Binding { predicate, action });
    }

    pub fn context(&self) -> SharedContext {
        self.context.clone()
    }

    /// Broadcast one update to every matching binding.
    pub async fn dispatch(&self, update: Update) {
        for (index, binding) in self.bindings.iter().enumerate() {
            if !binding.predicate.matches(&update) {
                continue;
            }
            if let Err(error) = (binding.action)(update.clone(), self.context.clone()).await {
                tracing::error!(handler = index, "Handler failed: {error:#}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{ChatKind, IncomingMessage, Sender};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn text_update(text: &str) -> Update {
        Update::Message(IncomingMessage {
            id: "m".into(),
            chat_id: "b1".into(),
            chat_kind: ChatKind::Private,
            sender: Sender::new(1),
            text: Some(text.into()),
        })
    }

    #[tokio::test]
    async fn all_matching_bindings_run_in_order() {
        let mut dispatcher = Dispatcher::new(SharedContext::new());
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second"] {
            let order = order.clone();
            dispatcher.register(
                Predicate::TextPresent,
                Arc::new(move |_, _| {
                    let order = order.clone();
                    Box::pin(async move {
                        order.lock().await.push(tag);
                        Ok(())
                    })
                }),
            );
        }
        dispatcher.register(
            Predicate::command("never"),
            Arc::new(|_, _| Box::pin(async { panic!("must not match") })),
        );

        dispatcher.dispatch(text_update("hello")).await;
        assert_eq!(*order.lock().await, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn a_failing_action_does_not_block_the_next() {
        let mut dispatcher = Dispatcher::new(SharedContext::new());
        let ran = Arc::new(AtomicUsize::new(0));

        dispatcher.register(
            Predicate::Any,
            Arc::new(|_, _| Box::pin(async { Err(anyhow::anyhow!("boom")) })),
        );
        let ran_clone = ran.clone();
        dispatcher.register(
            Predicate::Any,
            Arc::new(move |_, _| {
                let ran = ran_clone.clone();
                Box::pin(async move {
                    ran.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                })
            }),
        );

        dispatcher.dispatch(text_update("x")).await;
        dispatcher.dispatch(text_update("y")).await;
        assert_eq!(ran.load(Ordering::SeqCst), 2);
    }
}
