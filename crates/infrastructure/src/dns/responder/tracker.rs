use dnstrace_application::ports::QuerySightings;
use dnstrace_domain::dns_name;
use lru::LruCache;
use std::net::IpAddr;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Client addresses remembered per name. Older sightings fall off first.
const MAX_CLIENTS_PER_NAME: usize = 256;

struct Sightings {
    clients: Vec<IpAddr>,
    expires_at: Instant,
}

/// Which clients asked the responder about which names.
///
/// Bounded to `capacity` names with least-recently-used eviction; a name
/// not asked about again within `ttl` is forgotten.
pub struct QueryTracker {
    entries: Mutex<LruCache<String, Sightings>>,
    ttl: Duration,
}

impl QueryTracker {
    pub fn new(capacity: NonZeroUsize, ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    fn key(name: &str) -> String {
        dns_name::fqdn(name).to_ascii_lowercase()
    }

    pub fn record(&self, name: &str, client: IpAddr) {
        self.record_at(name, client, Instant::now());
    }

    fn record_at(&self, name: &str, client: IpAddr, now: Instant) {
        let key = Self::key(name);
        let mut entries = self.entries.lock().unwrap_or_else(|p| p.into_inner());

        let mut clients = match entries.pop(&key) {
            Some(existing) if existing.expires_at > now => existing.clients,
            _ => Vec::new(),
        };
        clients.push(client);
        if clients.len() > MAX_CLIENTS_PER_NAME {
            let excess = clients.len() - MAX_CLIENTS_PER_NAME;
            clients.drain(..excess);
        }

        entries.put(
            key,
            Sightings {
                clients,
                expires_at: now + self.ttl,
            },
        );
    }

    fn seen_at(&self, name: &str, now: Instant) -> Vec<IpAddr> {
        let key = Self::key(name);
        let mut entries = self.entries.lock().unwrap_or_else(|p| p.into_inner());

        match entries.get(&key) {
            Some(sightings) if sightings.expires_at > now => sightings.clients.clone(),
            Some(_) => {
                entries.pop(&key);
                Vec::new()
            }
            None => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl QuerySightings for QueryTracker {
    fn queries_seen_for(&self, name: &str) -> Vec<IpAddr> {
        self.seen_at(name, Instant::now())
    }
}
