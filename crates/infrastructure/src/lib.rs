//! dnstrace infrastructure: wire codec, UDP/TCP transport and the
//! authoritative responder.
pub mod dns;

pub use dns::{AuthoritativeResponder, QueryTracker, UdpTransport};
