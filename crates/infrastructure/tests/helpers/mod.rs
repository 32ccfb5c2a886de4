#![allow(dead_code)]
mod builders;
mod dns_server_mock;

pub use builders::{a_answer, reply_to, test_transport_config};
pub use dns_server_mock::{MockDnsServer, ReversingUdpServer, Script};
