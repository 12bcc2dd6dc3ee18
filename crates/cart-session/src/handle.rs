//! Shared, serialized access to a [`VoiceSession`].

use crate::{CheckoutOutcome, Result, SessionSnapshot, SpeechEvent, Turn, VoiceSession};
use intent_parser::Size;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Cloneable handle. Each utterance holds the session lock from cleanup to
/// cart mutation, so a later utterance always sees the earlier one's state.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<Mutex<VoiceSession>>,
}

impl SessionHandle {
    pub fn new(session: VoiceSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    pub async fn submit(&self, utterance: &str) -> Option<Turn> {
        self.inner.lock().await.submit(utterance).await
    }

    pub async fn on_speech(&self, event: SpeechEvent) -> Option<Turn> {
        self.inner.lock().await.on_speech(event).await
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.inner.lock().await.snapshot()
    }

    pub async fn checkout(&self) -> CheckoutOutcome {
        self.inner.lock().await.checkout().await
    }

    pub async fn adjust_quantity(&self, name: &str, size: Size, delta: i64) -> Result<String> {
        self.inner.lock().await.adjust_quantity(name, size, delta)
    }

    pub async fn change_size(&self, name: &str, from: Size, to: Size) -> Result<Option<String>> {
        self.inner.lock().await.change_size(name, from, to)
    }

    /// Run `f` with exclusive access to the session.
    pub async fn with_session<R>(&self, f: impl FnOnce(&mut VoiceSession) -> R) -> R {
        let mut session = self.inner.lock().await;
        f(&mut session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SessionConfig;
    use intent_parser::Catalog;
    use shop_services::MockServices;
    use std::time::Duration;

    fn handle(mock: &Arc<MockServices>) -> SessionHandle {
        SessionHandle::new(VoiceSession::new(
            Arc::new(Catalog::builtin()),
            mock.clone(),
            SessionConfig::default(),
        ))
    }

    #[tokio::test]
    async fn test_slow_lookup_does_not_race_follow_up() {
        let mock = Arc::new(
            MockServices::new()
                .with_default_match("stadium-mesh-pants")
                .with_latency(Duration::from_millis(30)),
        );
        let handle = handle(&mock);

        let (first, second) = tokio::join!(
            handle.submit("add to cart the comfy thing"),
            handle.submit("medium"),
        );
        assert_eq!(first.map(|t| t.command.target_id), Some(Some("stadium-mesh-pants".to_string())));
        assert_eq!(second.map(|t| t.command.size), Some(Some(Size::Medium)));

        let snapshot = handle.snapshot().await;
        assert_eq!(snapshot.cart.len(), 1);
        assert_eq!(snapshot.cart[0].name, "Stadium Mesh Pants");
        assert_eq!(snapshot.cart[0].size, Size::Medium);
        assert_eq!(snapshot.cart[0].qty, 1);
        assert!(snapshot.pending.is_none());
    }

    #[tokio::test]
    async fn test_clones_share_one_session() {
        let mock = Arc::new(MockServices::new());
        let a = handle(&mock);
        let b = a.clone();

        a.submit("add to cart the velocity track jacket size large").await;
        b.submit("add to cart the velocity track jacket size large").await;
        let toast = b
            .adjust_quantity("Velocity Track Jacket", Size::Large, -1)
            .await
            .unwrap();
        assert_eq!(toast, "Velocity Track Jacket (L) removed");
        assert_eq!(a.snapshot().await.cart[0].qty, 1);
        assert_eq!(a.with_session(|s| s.log().len()).await, 2);
    }
}
