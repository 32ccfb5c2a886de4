pub mod codec;
pub mod responder;
pub mod transport;

pub use codec::{decode, encode};
pub use responder::{AuthoritativeResponder, QueryTracker};
pub use transport::UdpTransport;
