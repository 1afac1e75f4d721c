//! Unit tests for av-core primitives.

#[cfg(test)]
mod ids {
    use crate::{EdgeId, NodeId};

    #[test]
    fn index_roundtrip() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NodeId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(NodeId(0) < NodeId(1));
        assert!(EdgeId(100) > EdgeId(99));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(NodeId::INVALID.0, u32::MAX);
        assert_eq!(EdgeId::INVALID.0, u32::MAX);
        assert_eq!(NodeId::default(), NodeId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(NodeId(7).to_string(), "NodeId(7)");
    }
}

#[cfg(test)]
mod pose {
    use crate::Pose;
    use glam::Vec3;

    #[test]
    fn forward_right_orthonormal() {
        for h in [0.0_f32, 0.7, 1.9, -2.4] {
            let p = Pose::new(Vec3::ZERO, h);
            assert!((p.forward().length() - 1.0).abs() < 1e-6);
            assert!((p.right().length() - 1.0).abs() < 1e-6);
            assert!(p.forward().dot(p.right()).abs() < 1e-6);
        }
    }

    #[test]
    fn heading_zero_faces_plus_z() {
        let p = Pose::new(Vec3::ZERO, 0.0);
        assert!((p.forward() - Vec3::Z).length() < 1e-6);
        assert!((p.right() - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn steer_full_right() {
        let p = Pose::new(Vec3::ZERO, 0.0);
        // Target exactly to the right: lateral fraction 1.0.
        assert!((p.steer_fraction_to(Vec3::new(3.0, 0.0, 0.0)) - 1.0).abs() < 1e-5);
        // Exactly to the left: -1.0.
        assert!((p.steer_fraction_to(Vec3::new(-3.0, 0.0, 0.0)) + 1.0).abs() < 1e-5);
    }

    #[test]
    fn steer_straight_ahead_is_zero() {
        let p = Pose::new(Vec3::ZERO, 0.0);
        assert!(p.steer_fraction_to(Vec3::new(0.0, 0.0, 10.0)).abs() < 1e-6);
        // Same after rotating the whole frame.
        let p = Pose::new(Vec3::ZERO, std::f32::consts::FRAC_PI_2);
        assert!(p.steer_fraction_to(Vec3::new(10.0, 0.0, 0.0)).abs() < 1e-5);
    }

    #[test]
    fn steer_diagonal() {
        let p = Pose::new(Vec3::ZERO, 0.0);
        let s = p.steer_fraction_to(Vec3::new(1.0, 0.0, 1.0));
        assert!((s - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-5);
    }

    #[test]
    fn degenerate_direction_is_zero_not_nan() {
        let p = Pose::new(Vec3::new(4.0, 0.0, -2.0), 1.3);
        let s = p.steer_fraction_to(p.position);
        assert_eq!(s, 0.0);
        assert!(s.is_finite());
    }

    #[test]
    fn to_local_roundtrip_axes() {
        let p = Pose::new(Vec3::new(10.0, 0.0, 5.0), 0.9);
        let ahead = p.position + p.forward() * 7.0;
        let local = p.to_local(ahead);
        assert!(local.x.abs() < 1e-4);
        assert!((local.z - 7.0).abs() < 1e-4);
    }
}

#[cfg(test)]
mod time {
    use crate::{ManualClock, SimConfig, Tick, TickClock};
    use std::time::Duration;

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(t.offset(3), Tick(13));
        assert_eq!(Tick(15) - Tick(10), 5u64);
    }

    #[test]
    fn tick_advance() {
        let mut t = Tick::ZERO;
        t.advance();
        t.advance();
        assert_eq!(t, Tick(2));
    }

    #[test]
    fn manual_clock_frozen() {
        let mut clock = ManualClock::frozen();
        assert_eq!(clock.elapsed(), Duration::ZERO);
        assert_eq!(clock.elapsed(), Duration::ZERO);
        clock.advance(Duration::from_millis(5));
        assert_eq!(clock.elapsed(), Duration::from_millis(5));
    }

    #[test]
    fn manual_clock_steps_per_read() {
        let mut clock = ManualClock::stepping(Duration::from_micros(100));
        assert_eq!(clock.elapsed(), Duration::ZERO);
        assert_eq!(clock.elapsed(), Duration::from_micros(100));
        assert_eq!(clock.elapsed(), Duration::from_micros(200));
    }

    #[test]
    fn config_default_is_sane() {
        let cfg = SimConfig::default();
        assert!(cfg.tick_budget > Duration::ZERO);
        assert!(cfg.step_secs > 0.0);
        assert!(cfg.route_node_cap.is_none());
    }
}

#[cfg(test)]
mod rng {
    use crate::{AgentRng, SimRng};

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = AgentRng::new(12345, 0);
        let mut r2 = AgentRng::new(12345, 0);
        for _ in 0..100 {
            let a: f32 = r1.random();
            let b: f32 = r2.random();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn different_streams_differ() {
        let mut r0 = AgentRng::new(1, 0);
        let mut r1 = AgentRng::new(1, 1);
        let a: u64 = r0.random();
        let b: u64 = r1.random();
        assert_ne!(a, b, "seeds for adjacent streams should diverge");
    }

    #[test]
    fn gen_range_in_bounds() {
        let mut rng = AgentRng::new(0, 0);
        for _ in 0..1000 {
            let v = rng.gen_range(0.0f32..1.0);
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn gen_bool_extremes() {
        let mut rng = AgentRng::new(0, 0);
        assert!(!rng.gen_bool(0.0));
        assert!(rng.gen_bool(1.0));
    }

    #[test]
    fn choose_empty_is_none() {
        let mut rng = AgentRng::new(0, 0);
        let empty: [u32; 0] = [];
        assert!(rng.choose(&empty).is_none());
    }

    #[test]
    fn sim_rng_children_diverge() {
        let mut root = SimRng::new(7);
        let mut a = root.child(0);
        let mut b = root.child(1);
        let x: u64 = a.random();
        let y: u64 = b.random();
        assert_ne!(x, y);
    }
}
