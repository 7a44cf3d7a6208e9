use std::collections::HashMap;

/// Population-scoped registry assigning stable innovation ids to
/// (start, end) connection events.
///
/// Two organisms that independently evolve the same connection receive
/// the same id because `get_or_assign` is idempotent over the pair.
/// Re-enabling a previously disabled gene reuses the original id for
/// the same reason: disabling is a property of one organism's copy,
/// not a new event.
#[derive(Debug, Clone, Default)]
pub struct InnovationRegistry {
    connections: HashMap<(usize, usize), usize>,
    next_connection_id: usize,
    next_node_id: usize,
}

impl InnovationRegistry {
    /// Creates a registry whose node ids start past the organism's
    /// initial input/output/hidden node count, so that hidden nodes
    /// inserted later never collide with the seed topology.
    pub fn new(initial_node_count: usize) -> Self {
        Self {
            connections: HashMap::new(),
            next_connection_id: 0,
            next_node_id: initial_node_count,
        }
    }

    /// Returns the existing innovation id for (start, end), or
    /// allocates and records the next sequential id.
    pub fn get_or_assign(&mut self, start: usize, end: usize) -> usize {
        if let Some(&id) = self.connections.get(&(start, end)) {
            return id;
        }
        let id = self.next_connection_id;
        self.next_connection_id += 1;
        self.connections.insert((start, end), id);
        id
    }

    /// Looks up an existing (start, end) without allocating.
    pub fn lookup(&self, start: usize, end: usize) -> Option<usize> {
        self.connections.get(&(start, end)).copied()
    }

    /// Allocates a new hidden node index. Strictly greater than any
    /// index handed out before it, preserving the ascending
    /// feed-forward node ordering propagation depends on.
    pub fn new_node(&mut self) -> usize {
        let id = self.next_node_id;
        self.next_node_id += 1;
        id
    }

    pub fn connection_count(&self) -> usize {
        self.next_connection_id
    }

    pub fn node_count(&self) -> usize {
        self.next_node_id
    }
}
