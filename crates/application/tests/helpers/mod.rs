mod replies;
mod scripted_transport;

pub use replies::{authoritative, name_error, referral, server_failure};
pub use scripted_transport::{RecordedQuery, ScriptedTransport};
