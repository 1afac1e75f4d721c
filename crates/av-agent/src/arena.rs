//! Generational agent storage.

use slotmap::{new_key_type, SlotMap};

use crate::agent::Agent;

new_key_type! {
    /// Generational handle to a live agent.
    ///
    /// Keys from despawned agents keep failing lookups even after the slot
    /// is reused — exactly the "invalid agent reference" recovery the
    /// scheduler relies on.
    pub struct AgentId;
}

/// The population store.
///
/// A thin wrapper over a slotmap that also counts total spawns, which
/// doubles as the per-agent RNG stream index (stable across despawns, so
/// reruns with the same seed stay reproducible as the population churns).
#[derive(Default)]
pub struct AgentArena {
    agents: SlotMap<AgentId, Agent>,
    total_spawned: u64,
}

impl AgentArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new agent, returning its handle.
    pub fn insert(&mut self, agent: Agent) -> AgentId {
        self.total_spawned += 1;
        self.agents.insert(agent)
    }

    /// Remove an agent.  Safe to call with a stale id (returns `None`).
    pub fn remove(&mut self, id: AgentId) -> Option<Agent> {
        self.agents.remove(id)
    }

    #[inline]
    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.get_mut(id)
    }

    #[inline]
    pub fn contains(&self, id: AgentId) -> bool {
        self.agents.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Number of agents ever spawned (not just currently live) — the next
    /// agent's RNG stream index.
    pub fn total_spawned(&self) -> u64 {
        self.total_spawned
    }

    pub fn iter(&self) -> impl Iterator<Item = (AgentId, &Agent)> {
        self.agents.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (AgentId, &mut Agent)> {
        self.agents.iter_mut()
    }

    pub fn ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.agents.keys()
    }
}
