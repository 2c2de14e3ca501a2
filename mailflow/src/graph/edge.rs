//! Transition rules between nodes.
//!
//! Each source node has at most one [`EdgeRule`]: a direct successor or a
//! conditional dispatch through a router's decision map.

use std::collections::HashMap;

use super::END;

/// Where an edge leads: a named node or the end marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Transition {
    To(String),
    End,
}

impl Transition {
    /// Maps a builder-facing name to a transition, treating [`END`] as the
    /// terminal sentinel.
    pub(crate) fn from_name(name: impl Into<String>) -> Self {
        let name = name.into();
        if name == END {
            Transition::End
        } else {
            Transition::To(name)
        }
    }
}

/// Outgoing rule for one source node. Last registration wins per source, so a
/// conditional rule replaces a direct one and vice versa.
#[derive(Debug, Clone)]
pub(crate) enum EdgeRule {
    /// Single fixed successor.
    Direct(Transition),
    /// Dispatch through the named router node's decision, looked up in
    /// `routes`. The router must be registered and router-capable.
    Conditional {
        router: String,
        routes: HashMap<String, Transition>,
    },
}
