use dnstrace_domain::dns_name::names_equal;
use dnstrace_domain::{DomainError, RecordType};

/// State owned by one top-level resolution and threaded through every
/// CNAME restart it triggers.
#[derive(Debug, Clone)]
pub struct ResolutionContext {
    /// Name currently being resolved. Changes when a CNAME is followed.
    pub target: String,
    pub record_type: RecordType,
    /// Every name visited so far, in order, starting with the original.
    visited: Vec<String>,
    /// Outer iterations spent, across the whole CNAME chain.
    pub iteration: u32,
}

impl ResolutionContext {
    pub fn new(target: impl Into<String>, record_type: RecordType) -> Self {
        let target = target.into();
        Self {
            visited: vec![target.clone()],
            target,
            record_type,
            iteration: 0,
        }
    }

    /// Spends one iteration of the shared budget.
    pub fn next_iteration(&mut self, max_iterations: u32) -> Result<u32, DomainError> {
        if self.iteration >= max_iterations {
            return Err(DomainError::MaxIterationsExceeded(max_iterations));
        }
        self.iteration += 1;
        Ok(self.iteration)
    }

    /// Moves the resolution to `alias`. Fails with `CnameLoop`, naming the
    /// whole chain, when `alias` was already visited.
    pub fn follow_cname(&mut self, alias: &str) -> Result<(), DomainError> {
        if self.visited.iter().any(|name| names_equal(name, alias)) {
            let mut chain = self.visited.clone();
            chain.push(alias.to_string());
            return Err(DomainError::CnameLoop { chain });
        }
        self.visited.push(alias.to_string());
        self.target = alias.to_string();
        Ok(())
    }
}
