use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use dnstrace_domain::{DomainError, Message};
use std::sync::atomic::{AtomicU16, Ordering};
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::debug;

pub type ReplySender = oneshot::Sender<Result<Message, DomainError>>;
pub type ReplyReceiver = oneshot::Receiver<Result<Message, DomainError>>;

pub struct PendingQuery {
    pub id: u16,
    pub server: String,
    pub sender: ReplySender,
    pub deadline: Instant,
}

/// Outstanding queries keyed by transaction id.
///
/// Every exit path (`complete`, `reject`, `remove`, `sweep_expired`) takes the
/// entry out of the map first, so a query settles at most once and settling
/// an id that is already gone is a no-op.
pub struct TransactionRegistry {
    next_id: AtomicU16,
    pending: DashMap<u16, PendingQuery>,
}

impl TransactionRegistry {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    pub fn starting_at(first_id: u16) -> Self {
        Self {
            next_id: AtomicU16::new(first_id),
            pending: DashMap::new(),
        }
    }

    /// Draws the next id from the cyclic counter and registers it.
    ///
    /// Fails with `IdSpaceExhausted` when that id is still outstanding,
    /// which means the counter has lapped 65536 live queries.
    pub fn register(
        &self,
        server: impl Into<String>,
        deadline: Instant,
    ) -> Result<(u16, ReplyReceiver), DomainError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        match self.pending.entry(id) {
            Entry::Occupied(_) => Err(DomainError::IdSpaceExhausted),
            Entry::Vacant(slot) => {
                let (sender, receiver) = oneshot::channel();
                slot.insert(PendingQuery {
                    id,
                    server: server.into(),
                    sender,
                    deadline,
                });
                Ok((id, receiver))
            }
        }
    }

    pub fn complete(&self, id: u16, message: Message) -> bool {
        match self.pending.remove(&id) {
            Some((_, pending)) => {
                let _ = pending.sender.send(Ok(message));
                true
            }
            None => false,
        }
    }

    pub fn reject(&self, id: u16, error: DomainError) -> bool {
        match self.pending.remove(&id) {
            Some((_, pending)) => {
                let _ = pending.sender.send(Err(error));
                true
            }
            None => false,
        }
    }

    pub fn remove(&self, id: u16) -> bool {
        self.pending.remove(&id).is_some()
    }

    pub fn contains(&self, id: u16) -> bool {
        self.pending.contains_key(&id)
    }

    /// Fails every query whose deadline has passed. Covers waiters that were
    /// dropped before their own timeout fired.
    pub fn sweep_expired(&self, now: Instant) -> usize {
        let expired: Vec<u16> = self
            .pending
            .iter()
            .filter(|entry| entry.deadline <= now)
            .map(|entry| *entry.key())
            .collect();

        let mut swept = 0;
        for id in expired {
            if let Some((_, pending)) = self.pending.remove_if(&id, |_, p| p.deadline <= now) {
                debug!(id = pending.id, server = %pending.server, "Expiring stale transaction");
                let _ = pending.sender.send(Err(DomainError::Timeout {
                    server: pending.server,
                }));
                swept += 1;
            }
        }
        swept
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Default for TransactionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dnstrace_domain::{Question, RecordType};
    use std::time::Duration;

    fn far_deadline() -> Instant {
        Instant::now() + Duration::from_secs(60)
    }

    fn reply(id: u16) -> Message {
        let mut msg = Message::query(id, Question::new("example.com.", RecordType::A), false);
        msg.flags.response = true;
        msg
    }

    #[tokio::test]
    async fn test_ids_advance_and_wrap() {
        let registry = TransactionRegistry::starting_at(u16::MAX);
        let (first, _rx1) = registry.register("s", far_deadline()).unwrap();
        let (second, _rx2) = registry.register("s", far_deadline()).unwrap();
        assert_eq!(first, u16::MAX);
        assert_eq!(second, 0);
    }

    #[tokio::test]
    async fn test_complete_delivers_once() {
        let registry = TransactionRegistry::new();
        let (id, rx) = registry.register("s", far_deadline()).unwrap();
        assert!(registry.complete(id, reply(id)));
        assert!(!registry.complete(id, reply(id)));
        assert!(!registry.reject(id, DomainError::IdSpaceExhausted));
        assert!(!registry.remove(id));
        assert_eq!(rx.await.unwrap().unwrap().id, id);
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_reject_delivers_error() {
        let registry = TransactionRegistry::new();
        let (id, rx) = registry.register("s", far_deadline()).unwrap();
        assert!(registry.reject(id, DomainError::Io("boom".into())));
        assert_eq!(rx.await.unwrap(), Err(DomainError::Io("boom".into())));
    }

    #[tokio::test]
    async fn test_exhausted_id_space() {
        let registry = TransactionRegistry::new();
        let mut receivers = Vec::with_capacity(65536);
        for _ in 0..65536u32 {
            receivers.push(registry.register("s", far_deadline()).unwrap());
        }
        assert_eq!(registry.len(), 65536);
        assert!(matches!(
            registry.register("s", far_deadline()),
            Err(DomainError::IdSpaceExhausted)
        ));
        // A freed id becomes usable once the counter comes back around to it.
        assert!(registry.remove(1));
        assert!(registry.register("s", far_deadline()).is_ok());
    }

    #[tokio::test]
    async fn test_sweep_expired_times_out_stale_entries() {
        let registry = TransactionRegistry::new();
        let past = Instant::now();
        let (stale, rx) = registry.register("192.0.2.1:53", past).unwrap();
        let (fresh, _keep) = registry.register("192.0.2.1:53", far_deadline()).unwrap();

        assert_eq!(registry.sweep_expired(Instant::now()), 1);
        assert!(!registry.contains(stale));
        assert!(registry.contains(fresh));
        assert!(rx.await.unwrap().unwrap_err().is_timeout());
    }
}
