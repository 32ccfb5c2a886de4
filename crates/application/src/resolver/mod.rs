//! Iterative resolution from the root servers down to an authoritative
//! answer.
//!
//! Each outer iteration works through a candidate set of nameservers in
//! random order until one of them either answers authoritatively or refers
//! the query to a more specific zone. CNAMEs restart the walk at the root
//! for the alias, sharing the visited-name set and the iteration budget.

mod context;
mod referral;

pub use context::ResolutionContext;
pub use referral::referral_nameservers;

use crate::ports::{DnsTransport, QueryOptions};
use dnstrace_domain::config::ResolverConfig;
use dnstrace_domain::dns_name::fqdn;
use dnstrace_domain::{
    root_servers, DomainError, Message, Nameserver, RData, RecordType, ResourceRecord,
    ResponseCode, TraceSink,
};
use futures::future::BoxFuture;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ResolverSettings {
    pub max_iterations: u32,
    /// Candidates every walk starts from.
    pub root_hints: Vec<Nameserver>,
}

impl ResolverSettings {
    pub fn from_config(config: &ResolverConfig) -> Result<Self, DomainError> {
        let root_hints = config
            .root_nameservers()
            .map_err(DomainError::InvalidDomainName)?;
        Ok(Self {
            max_iterations: config.max_iterations,
            root_hints,
        })
    }
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            max_iterations: 32,
            root_hints: root_servers(),
        }
    }
}

/// What one authoritative reply settles.
enum Authoritative {
    Answer(Vec<ResourceRecord>),
    /// The reply aliased the name but holds nothing for the alias.
    Restart,
}

pub struct IterativeResolver {
    transport: Arc<dyn DnsTransport>,
    settings: ResolverSettings,
}

impl IterativeResolver {
    pub fn new(transport: Arc<dyn DnsTransport>, settings: ResolverSettings) -> Self {
        Self {
            transport,
            settings,
        }
    }

    /// Resolves `name` starting at the root hints.
    ///
    /// An empty result means the name or the requested type does not exist.
    /// Failures are written to `trace` at error level before being returned.
    pub async fn resolve(
        &self,
        name: &str,
        record_type: RecordType,
        trace: &dyn TraceSink,
    ) -> Result<Vec<ResourceRecord>, DomainError> {
        let mut ctx = ResolutionContext::new(fqdn(name), record_type);
        let result = self.walk(&mut ctx, trace).await;
        if let Err(e) = &result {
            trace.error(format!("<<< Fatal: {}", e));
        }
        result
    }

    fn walk<'a>(
        &'a self,
        ctx: &'a mut ResolutionContext,
        trace: &'a dyn TraceSink,
    ) -> BoxFuture<'a, Result<Vec<ResourceRecord>, DomainError>> {
        Box::pin(async move {
            trace.info(format!(
                ">>> Beginning resolution of \"{}\" ({})",
                ctx.target, ctx.record_type
            ));
            let mut candidates = self.settings.root_hints.clone();

            loop {
                let iteration = ctx.next_iteration(self.settings.max_iterations)?;
                trace.info(format!(
                    "Iteration {}: nameservers {}",
                    iteration,
                    candidates
                        .iter()
                        .map(|ns| ns.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                ));

                let mut referral = None;
                while !candidates.is_empty() {
                    let nameserver = candidates.swap_remove(fastrand::usize(..candidates.len()));
                    let reply = match self.ask(&nameserver, ctx, trace).await {
                        Some(reply) => reply,
                        None => continue,
                    };

                    if reply.flags.authoritative {
                        if reply.is_name_error() {
                            trace.info("<<< Answer: the name does not exist".to_string());
                            return Ok(Vec::new());
                        }
                        match self.settle(&reply, ctx, trace)? {
                            Authoritative::Answer(records) => return Ok(records),
                            Authoritative::Restart => return self.walk(ctx, trace).await,
                        }
                    }

                    trace.info("Reply is not authoritative, checking for a referral".to_string());
                    let next = referral_nameservers(&reply, &ctx.target, trace);
                    if next.is_empty() {
                        trace.warn(format!("{} gave no usable referral", nameserver));
                        continue;
                    }
                    referral = Some(next);
                    break;
                }

                match referral {
                    Some(next) => candidates = next,
                    None => {
                        return Err(DomainError::NoAuthorityReached {
                            name: ctx.target.clone(),
                        })
                    }
                }
            }
        })
    }

    /// One query to one candidate. Transport failures and error response
    /// codes disqualify the candidate and yield `None`.
    async fn ask(
        &self,
        nameserver: &Nameserver,
        ctx: &ResolutionContext,
        trace: &dyn TraceSink,
    ) -> Option<Message> {
        trace.info(format!("Sent query to nameserver {}", nameserver));
        debug!(nameserver = %nameserver, name = %ctx.target, record_type = %ctx.record_type, "Querying nameserver");

        let started = std::time::Instant::now();
        let reply = match self
            .transport
            .query(
                &nameserver.target(),
                &ctx.target,
                ctx.record_type,
                QueryOptions::default(),
            )
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                trace.warn(format!("Error querying {}: {}", nameserver, e));
                return None;
            }
        };
        trace.info(format!(
            "Received reply ({}ms)",
            started.elapsed().as_millis()
        ));

        match reply.response_code {
            ResponseCode::Ok => Some(reply),
            ResponseCode::NameError if reply.flags.authoritative => Some(reply),
            code => {
                trace.warn(format!("{} replied with error: {}", nameserver, code));
                None
            }
        }
    }

    /// Interprets an authoritative OK reply: direct answers first, then the
    /// CNAME chain as far as the same reply carries it.
    fn settle(
        &self,
        reply: &Message,
        ctx: &mut ResolutionContext,
        trace: &dyn TraceSink,
    ) -> Result<Authoritative, DomainError> {
        trace.info("Reply is authoritative".to_string());
        let mut aliased = false;

        loop {
            let answers: Vec<ResourceRecord> = reply
                .records_for(&ctx.target, ctx.record_type)
                .cloned()
                .collect();
            if !answers.is_empty() {
                trace.info(format!("<<< Answer: received {} records", answers.len()));
                return Ok(Authoritative::Answer(answers));
            }

            let cnames: Vec<&ResourceRecord> =
                reply.records_for(&ctx.target, RecordType::CNAME).collect();

            match cnames.as_slice() {
                [] if aliased => {
                    trace.info(format!(
                        "No records for CNAME \"{}\" in this reply, performing another lookup",
                        ctx.target
                    ));
                    return Ok(Authoritative::Restart);
                }
                [] => {
                    trace.info(format!(
                        "<<< Answer: no {} records for \"{}\"",
                        ctx.record_type, ctx.target
                    ));
                    return Ok(Authoritative::Answer(Vec::new()));
                }
                [cname] => {
                    let RData::Cname(alias) = &cname.rdata else {
                        return Err(DomainError::MalformedMessage(format!(
                            "CNAME record for {} carries no target",
                            ctx.target
                        )));
                    };
                    let alias = fqdn(alias);
                    trace.info(format!("\"{}\" is an alias for \"{}\"", ctx.target, alias));
                    ctx.follow_cname(&alias)?;
                    aliased = true;
                }
                _ => {
                    return Err(DomainError::MultipleCnames {
                        name: ctx.target.clone(),
                    })
                }
            }
        }
    }
}
