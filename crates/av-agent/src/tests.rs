//! Unit tests for agent storage.

#[cfg(test)]
mod spawn_request {
    use av_core::NodeId;

    use crate::SpawnRequest;

    #[test]
    fn defaults_are_law_abiding_wanderers() {
        let req = SpawnRequest::at(NodeId(3));
        assert_eq!(req.start, NodeId(3));
        assert!(req.target.is_none());
        assert!(req.avoid.is_none());
        assert!(!req.aggressive);
        assert!(req.cruise_speed > 0.0);
    }

    #[test]
    fn builder_methods_compose() {
        let req = SpawnRequest::at(NodeId(0))
            .toward(NodeId(9))
            .avoiding(NodeId(4))
            .aggressive()
            .cruise(55.0);
        assert_eq!(req.target, Some(NodeId(9)));
        assert_eq!(req.avoid, Some(NodeId(4)));
        assert!(req.aggressive);
        assert_eq!(req.cruise_speed, 55.0);
    }
}

#[cfg(test)]
mod arena {
    use glam::Vec3;

    use av_control::DriveState;
    use av_core::{AgentRng, NodeId, Pose};
    use av_graph::Route;

    use crate::{Agent, AgentArena, SpawnRequest};

    fn test_agent(seed_stream: u64) -> Agent {
        Agent::new(
            &SpawnRequest::at(NodeId(0)),
            Pose::new(Vec3::ZERO, 0.0),
            Route::empty(),
            AgentRng::new(42, seed_stream),
        )
    }

    #[test]
    fn insert_then_get() {
        let mut arena = AgentArena::new();
        let id = arena.insert(test_agent(0));
        assert!(arena.contains(id));
        assert_eq!(arena.len(), 1);
        assert_eq!(arena.get(id).unwrap().node, NodeId(0));
    }

    #[test]
    fn new_agents_start_stopped_at_rest() {
        let agent = test_agent(0);
        assert_eq!(agent.controller.state, DriveState::Stopping);
        assert_eq!(agent.speed, 0.0);
        assert!(agent.route.is_empty());
        assert!(!agent.braking);
    }

    #[test]
    fn removed_id_stays_stale() {
        let mut arena = AgentArena::new();
        let id = arena.insert(test_agent(0));
        assert!(arena.remove(id).is_some());
        assert!(!arena.contains(id));
        assert!(arena.get(id).is_none());
        assert!(arena.remove(id).is_none(), "double despawn is a no-op");
    }

    #[test]
    fn stale_id_survives_slot_reuse() {
        let mut arena = AgentArena::new();
        let first = arena.insert(test_agent(0));
        arena.remove(first);
        // The new agent may reuse the slot; the old key must not see it.
        let second = arena.insert(test_agent(1));
        assert!(!arena.contains(first));
        assert!(arena.get(first).is_none());
        assert!(arena.contains(second));
        assert_ne!(first, second);
    }

    #[test]
    fn total_spawned_counts_despawned() {
        let mut arena = AgentArena::new();
        let a = arena.insert(test_agent(0));
        arena.insert(test_agent(1));
        arena.remove(a);
        arena.insert(test_agent(2));
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.total_spawned(), 3);
    }
}
