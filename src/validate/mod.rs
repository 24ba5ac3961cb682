//! Module for the business rules a parsed reading must pass before acceptance.

use crate::domain::{Account, MeterReading};


/// Outcome of a validation rule. An invalid verdict always carries its reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Invalid { reason: String },
}

impl Verdict {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid {
            reason: reason.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// One business rule evaluated against a candidate reading and its account.
pub trait ReadingValidator {
    fn validate(&self, reading: &MeterReading, account: &Account) -> Verdict;
}

/// Ordered set of validation rules.
///
/// Rules run sequentially in insertion order and the first invalid verdict is
/// the chain's verdict, so the reported reason is deterministic for a given
/// chain.
pub struct ValidationChain {
    rules: Vec<Box<dyn ReadingValidator>>,
}

impl ValidationChain {
    /// A chain with no rules; every reading passes.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// The standard chain: most-recent-wins only.
    pub fn standard() -> Self {
        Self::empty().with_rule(MostRecentValidator)
    }

    /// Appends a rule; it runs after every rule added before it.
    pub fn with_rule(mut self, rule: impl ReadingValidator + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn check(&self, reading: &MeterReading, account: &Account) -> Verdict {
        for rule in &self.rules {
            if let Verdict::Invalid { reason } = rule.validate(reading, account) {
                return Verdict::Invalid { reason };
            }
        }
        Verdict::Valid
    }
}

impl Default for ValidationChain {
    fn default() -> Self {
        Self::standard()
    }
}

/// Most-recent-wins: a candidate must be strictly newer than the account's
/// current reading. Rejects duplicates (same timestamp) and backdated
/// submissions with one comparison.
pub struct MostRecentValidator;

impl ReadingValidator for MostRecentValidator {
    fn validate(&self, reading: &MeterReading, account: &Account) -> Verdict {
        if let Some(current) = account.current_reading()
            && current.timestamp() >= reading.timestamp()
        {
            return Verdict::invalid("Newer reading already exists");
        }
        Verdict::Valid
    }
}
