//! Which hierarchical nodes are currently expanded

use std::collections::HashMap;

/// Expanded/collapsed flag per node id. Absent ids are collapsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    nodes: HashMap<String, bool>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the node and return its new state. The first toggle expands.
    pub fn toggle(&mut self, id: &str) -> bool {
        let expanded = self.nodes.entry(id.to_string()).or_insert(false);
        *expanded = !*expanded;
        *expanded
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.nodes.get(id).copied().unwrap_or(false)
    }

    pub fn expand(&mut self, id: &str) {
        self.nodes.insert(id.to_string(), true);
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Number of currently expanded nodes
    #[cfg(test)]
    pub fn expanded_count(&self) -> usize {
        self.nodes.values().filter(|e| **e).count()
    }
}
