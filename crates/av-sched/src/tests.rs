//! Unit tests for the rotation scheduler.
//!
//! All timing goes through `ManualClock`, so budget behavior is exact.

#[cfg(test)]
mod rotation {
    use std::time::Duration;

    use av_agent::AgentId;
    use av_core::ManualClock;
    use slotmap::KeyData;

    use crate::{AgentScheduler, Visit};

    /// Distinct ids without standing up an arena.
    fn ids(n: u64) -> Vec<AgentId> {
        (1..=n).map(|i| AgentId::from(KeyData::from_ffi(i << 32 | i))).collect()
    }

    fn queue_of(sched: &AgentScheduler) -> Vec<AgentId> {
        sched.iter().collect()
    }

    #[test]
    fn unlimited_budget_is_one_fair_rotation() {
        let agents = ids(4);
        let mut sched = AgentScheduler::new(Duration::from_secs(3600));
        for &id in &agents {
            sched.enqueue(id);
        }
        let before = queue_of(&sched);

        let mut clock = ManualClock::frozen();
        let mut visited = Vec::new();
        let report = sched.run_tick(&mut clock, |id| {
            visited.push(id);
            Visit::Updated
        });

        // Exactly N updates, each agent exactly once.
        assert_eq!(report.processed, 4);
        assert_eq!(report.dropped, 0);
        assert_eq!(report.deferred, 0);
        assert_eq!(visited, before);
        // Queue order after the tick equals queue order before it.
        assert_eq!(queue_of(&sched), before);
    }

    #[test]
    fn budget_defers_the_tail() {
        let agents = ids(4);
        // Every clock read costs 1 ms; the budget allows two visits.
        let mut clock = ManualClock::stepping(Duration::from_millis(1));
        let mut sched = AgentScheduler::new(Duration::from_micros(2500));
        for &id in &agents {
            sched.enqueue(id);
        }

        let mut visited = Vec::new();
        let report = sched.run_tick(&mut clock, |id| {
            visited.push(id);
            Visit::Updated
        });

        assert_eq!(report.processed, 2);
        assert_eq!(report.deferred, 2);
        assert_eq!(visited, vec![agents[0], agents[1]]);
        // Deferred agents stay at the head; processed ones rotated to the tail.
        assert_eq!(
            queue_of(&sched),
            vec![agents[2], agents[3], agents[0], agents[1]]
        );
    }

    #[test]
    fn no_agent_runs_twice_before_others_ran_once() {
        let agents = ids(4);
        let mut sched = AgentScheduler::new(Duration::from_micros(2500));
        for &id in &agents {
            sched.enqueue(id);
        }

        // Two budget-limited ticks must cover all four agents exactly once.
        let mut visited = Vec::new();
        for _ in 0..2 {
            let mut clock = ManualClock::stepping(Duration::from_millis(1));
            sched.run_tick(&mut clock, |id| {
                visited.push(id);
                Visit::Updated
            });
        }
        let mut sorted = visited.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(visited.len(), 4);
        assert_eq!(sorted.len(), 4, "some agent was visited twice: {visited:?}");
    }

    #[test]
    fn zero_budget_defers_everything() {
        let agents = ids(3);
        let mut clock = ManualClock::stepping(Duration::from_millis(1));
        let mut sched = AgentScheduler::new(Duration::ZERO);
        for &id in &agents {
            sched.enqueue(id);
        }
        let report = sched.run_tick(&mut clock, |_| Visit::Updated);
        assert_eq!(report.processed, 0);
        assert_eq!(report.deferred, 3);
        assert_eq!(queue_of(&sched), agents);
    }

    #[test]
    fn stale_ids_dropped_silently() {
        let agents = ids(3);
        let mut sched = AgentScheduler::new(Duration::from_secs(3600));
        for &id in &agents {
            sched.enqueue(id);
        }

        let gone = agents[1];
        let mut clock = ManualClock::frozen();
        let mut visited = Vec::new();
        let report = sched.run_tick(&mut clock, |id| {
            visited.push(id);
            if id == gone { Visit::Gone } else { Visit::Updated }
        });

        // The stale entry was seen once, discarded, and not re-enqueued.
        assert_eq!(report.processed, 2);
        assert_eq!(report.dropped, 1);
        assert_eq!(report.deferred, 0);
        assert_eq!(visited, agents);
        assert_eq!(queue_of(&sched), vec![agents[0], agents[2]]);
        assert!(!sched.contains(gone));
    }

    #[test]
    fn drops_never_cause_a_second_visit() {
        // A dropped entry must not let the rotation wrap around and visit a
        // re-enqueued agent again within the same tick.
        let agents = ids(2);
        let mut sched = AgentScheduler::new(Duration::from_secs(3600));
        for &id in &agents {
            sched.enqueue(id);
        }

        let mut clock = ManualClock::frozen();
        let mut visited = Vec::new();
        sched.run_tick(&mut clock, |id| {
            visited.push(id);
            if id == agents[0] { Visit::Gone } else { Visit::Updated }
        });
        assert_eq!(visited, agents, "each snapshot entry visited exactly once");
    }

    #[test]
    fn enqueue_is_idempotent() {
        let agents = ids(1);
        let mut sched = AgentScheduler::new(Duration::from_millis(1));
        assert!(sched.enqueue(agents[0]));
        assert!(!sched.enqueue(agents[0]));
        assert_eq!(sched.len(), 1);
    }

    #[test]
    fn explicit_remove() {
        let agents = ids(3);
        let mut sched = AgentScheduler::new(Duration::from_millis(1));
        for &id in &agents {
            sched.enqueue(id);
        }
        assert!(sched.remove(agents[1]));
        assert!(!sched.remove(agents[1]));
        assert_eq!(queue_of(&sched), vec![agents[0], agents[2]]);
    }

    #[test]
    fn empty_queue_is_a_noop_tick() {
        let mut sched = AgentScheduler::new(Duration::from_millis(1));
        let mut clock = ManualClock::frozen();
        let report = sched.run_tick(&mut clock, |_| Visit::Updated);
        assert_eq!(report.processed, 0);
        assert_eq!(report.dropped, 0);
        assert_eq!(report.deferred, 0);
    }
}
