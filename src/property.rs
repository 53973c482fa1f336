use serde::{Deserialize, Serialize};

////////////////////////////////////////////////////////////////////////////////

/// Temporal property checked by a run. Selected once, immutable for the
/// whole run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Property {
    /// Find a state with no enabled rule.
    Deadlock,

    /// Find a state satisfying the named predicate.
    Reachability(String),

    /// Find a state violating the named safety predicate, i.e. reach its
    /// negation witness.
    RefuteSafety(String),

    /// Refute liveness via a reachable cycle or deadlock.
    RefuteLiveness,
}

impl Property {
    /// Predicate name the fitness metric is measured against, if any.
    pub fn predicate(&self) -> Option<&str> {
        match self {
            Property::Reachability(q) | Property::RefuteSafety(q) => Some(q),
            Property::Deadlock | Property::RefuteLiveness => None,
        }
    }

    /// Reachability-style properties verify; safety/liveness refute.
    pub fn is_refutation(&self) -> bool {
        matches!(self, Property::RefuteSafety(_) | Property::RefuteLiveness)
    }
}
