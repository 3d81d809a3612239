//! Chat coordinator
//!
//! Maintains an append-only message log and a draft input. Blank drafts are
//! ignored without surfacing an error; the submit control is simply disabled
//! for them. The draft is cleared optimistically as soon as the send is
//! dispatched, not when it settles (see DESIGN.md for the policy choice).

use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::info;

use crate::actions::ChatSendAction;
use xt_core::{AsyncOperation, Message};

/// Coordinates the chat log, draft input, and send dispatch
pub struct ChatInterface {
    messages: Vec<Message>,
    draft: String,
    action: Arc<dyn ChatSendAction>,
    operation: AsyncOperation<String>,
}

impl ChatInterface {
    pub fn new(action: Arc<dyn ChatSendAction>, runtime: Handle) -> Self {
        Self {
            messages: Vec::new(),
            draft: String::new(),
            action,
            operation: AsyncOperation::new(runtime),
        }
    }

    /// The message log, in insertion order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Mutable access for the input widget to bind to
    pub fn draft_mut(&mut self) -> &mut String {
        &mut self.draft
    }

    /// Whether the submit control should be enabled
    pub fn can_submit(&self) -> bool {
        !self.draft.trim().is_empty() && !self.operation.is_pending()
    }

    /// Send the trimmed draft as a user message.
    ///
    /// A blank draft is ignored silently. On dispatch the user message is
    /// appended and the draft cleared immediately; the assistant reply is
    /// harvested later by `poll`. Returns whether a send was dispatched.
    pub fn submit(&mut self) -> bool {
        let content = self.draft.trim().to_string();
        if content.is_empty() {
            return false;
        }

        let action = self.action.clone();
        let outgoing = content.clone();
        if !self
            .operation
            .trigger(async move { action.send(&outgoing).await })
        {
            return false;
        }

        info!(chars = content.len(), "chat message dispatched");
        self.messages.push(Message::user(content));
        self.draft.clear();
        true
    }

    /// Fold a settled send back into the log.
    ///
    /// Call once per frame: a successful send appends the assistant reply
    /// and returns the operation to idle; a failure stays visible through
    /// `send_error` until the next submit or `clear_error`.
    pub fn poll(&mut self) {
        if let Some(reply) = self.operation.take_success() {
            self.messages.push(Message::assistant(reply));
        }
    }

    pub fn is_sending(&self) -> bool {
        self.operation.is_pending()
    }

    /// Message from a failed send, if the last one failed
    pub fn send_error(&self) -> Option<String> {
        self.operation.error()
    }

    /// Dismiss a displayed send failure
    pub fn clear_error(&mut self) {
        if self.send_error().is_some() {
            self.operation.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use xt_core::Role;

    struct RecordingSend {
        calls: AtomicUsize,
        received: Mutex<Vec<String>>,
        fail_with: Option<String>,
    }

    impl RecordingSend {
        fn succeeding() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                received: Mutex::new(Vec::new()),
                fail_with: None,
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                received: Mutex::new(Vec::new()),
                fail_with: Some(message.to_string()),
            })
        }
    }

    #[async_trait]
    impl ChatSendAction for RecordingSend {
        async fn send(&self, content: &str) -> anyhow::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.received.lock().push(content.to_string());
            match &self.fail_with {
                Some(message) => Err(anyhow::anyhow!("{message}")),
                None => Ok(format!("echo: {content}")),
            }
        }
    }

    fn wait_until(deadline_ms: u64, mut done: impl FnMut() -> bool) -> bool {
        for _ in 0..deadline_ms / 5 {
            if done() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        done()
    }

    #[test]
    fn test_submit_appends_user_message_and_clears_draft() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let action = RecordingSend::succeeding();
        let mut chat = ChatInterface::new(action.clone(), rt.handle().clone());

        chat.draft_mut().push_str("  What drives satisfaction?  ");
        assert!(chat.can_submit());
        assert!(chat.submit());

        // Draft cleared on dispatch, user message trimmed into the log
        assert_eq!(chat.draft(), "");
        assert_eq!(chat.messages().len(), 1);
        assert_eq!(chat.messages()[0].role, Role::User);
        assert_eq!(chat.messages()[0].content, "What drives satisfaction?");

        assert!(wait_until(1000, || !chat.is_sending()));
        chat.poll();
        assert_eq!(chat.messages().len(), 2);
        assert_eq!(chat.messages()[1].role, Role::Assistant);
        assert_eq!(chat.messages()[1].content, "echo: What drives satisfaction?");
        assert_eq!(
            action.received.lock().as_slice(),
            &["What drives satisfaction?".to_string()]
        );
    }

    #[test]
    fn test_blank_draft_is_ignored_silently() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let action = RecordingSend::succeeding();
        let mut chat = ChatInterface::new(action.clone(), rt.handle().clone());

        chat.draft_mut().push_str("   \n\t ");
        assert!(!chat.can_submit());
        assert!(!chat.submit());

        assert!(chat.messages().is_empty());
        assert!(chat.send_error().is_none());
        assert_eq!(action.calls.load(Ordering::SeqCst), 0);
    }

    struct GatedSend {
        calls: AtomicUsize,
        gate: tokio::sync::Semaphore,
    }

    #[async_trait]
    impl ChatSendAction for GatedSend {
        async fn send(&self, _content: &str) -> anyhow::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let _permit = self.gate.acquire().await;
            Ok("done".to_string())
        }
    }

    #[test]
    fn test_submit_while_sending_is_ignored() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let action = Arc::new(GatedSend {
            calls: AtomicUsize::new(0),
            gate: tokio::sync::Semaphore::new(0),
        });
        let mut chat = ChatInterface::new(action.clone(), rt.handle().clone());

        chat.draft_mut().push_str("first");
        assert!(chat.submit());
        assert!(wait_until(1000, || action.calls.load(Ordering::SeqCst) == 1));

        // The first send is held open by the gate, so this one must not
        // dispatch and must not enter the log.
        chat.draft_mut().push_str("second");
        assert!(chat.is_sending());
        assert!(!chat.submit());
        assert_eq!(chat.messages().len(), 1);
        assert_eq!(chat.draft(), "second");
        assert_eq!(action.calls.load(Ordering::SeqCst), 1);

        action.gate.add_permits(1);
        assert!(wait_until(1000, || {
            chat.poll();
            chat.messages().iter().any(|m| m.role == Role::Assistant)
        }));
        assert_eq!(action.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_send_keeps_log_and_surfaces_message() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let action = RecordingSend::failing("Model overloaded");
        let mut chat = ChatInterface::new(action, rt.handle().clone());

        chat.draft_mut().push_str("hello?");
        assert!(chat.submit());

        assert!(wait_until(1000, || chat.send_error().is_some()));
        chat.poll();

        // User message stays, no assistant reply, error is verbatim
        assert_eq!(chat.messages().len(), 1);
        assert_eq!(chat.send_error().as_deref(), Some("Model overloaded"));
        assert!(!chat.is_sending());

        chat.clear_error();
        assert!(chat.send_error().is_none());
    }

    #[test]
    fn test_log_preserves_insertion_order() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let action = RecordingSend::succeeding();
        let mut chat = ChatInterface::new(action, rt.handle().clone());

        for text in ["one", "two", "three"] {
            chat.draft_mut().push_str(text);
            assert!(chat.submit());
            assert!(wait_until(1000, || {
                chat.poll();
                !chat.is_sending() && chat.messages().last().map(|m| m.role) == Some(Role::Assistant)
            }));
        }

        let contents: Vec<&str> = chat.messages().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(
            contents,
            vec![
                "one",
                "echo: one",
                "two",
                "echo: two",
                "three",
                "echo: three"
            ]
        );
    }
}
