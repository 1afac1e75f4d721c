//! Driving-behavior tuning constants.

/// Every threshold and gain the controller consults, in one plain struct.
///
/// One `DriveTuning` is shared by the whole population (it is behavior
/// calibration, not per-agent state); per-agent variation comes from the
/// aggressive flag and cruise speed on the agent itself.  Distances are in
/// world units, speeds in units per second, angles in radians.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DriveTuning {
    // ── Waypoint arrival ──────────────────────────────────────────────────
    /// A node closer than this counts as reached.
    pub arrival_tolerance: f32,
    /// Looser arrival radius for aggressive drivers (they cut corners).
    pub aggressive_arrival_tolerance: f32,
    /// Velocity extrapolation horizon for the aggressive early-cut check.
    pub cut_lookahead_secs: f32,

    // ── Speed policy ──────────────────────────────────────────────────────
    /// Queue state: closer than this to the node means full stop.
    pub stop_threshold: f32,
    /// Below this speed a static obstacle means "stuck" (back out) rather
    /// than "swerve".
    pub low_speed_threshold: f32,
    /// Fixed reverse target magnitude while backing from stuck.
    pub reverse_speed: f32,
    /// Floor for the Drive-state target so heavy steering never stalls the
    /// agent outright.
    pub min_drive_speed: f32,
    /// Speed-limit multiplier applied to aggressive drivers.
    pub aggressive_speed_factor: f32,
    /// Hard cap on target speed while avoiding a collision.
    pub avoid_speed_cap: f32,

    // ── Throttle / brake ──────────────────────────────────────────────────
    /// Brake only once current speed exceeds target by this margin.
    pub brake_hysteresis: f32,
    /// Targets below this count as "stopped": brake, never throttle.
    pub min_moving_target: f32,

    // ── Probe rig ─────────────────────────────────────────────────────────
    /// Ray origin offset ahead of the pose (front bumper).
    pub probe_forward_offset: f32,
    /// Lateral offset of the two side rays.
    pub probe_side_offset: f32,
    /// Ray length floor.
    pub min_probe_length: f32,
    /// Ray length per unit of current speed (seconds of lookahead).
    pub probe_seconds: f32,
    /// Angle floor for the two angled rays.
    pub min_probe_angle: f32,
    /// Angle per unit of |steering| for the angled rays.
    pub probe_angle_gain: f32,

    // ── Avoidance vector ──────────────────────────────────────────────────
    /// Contribution of a direct side-probe hit.
    pub side_probe_weight: f32,
    /// Contribution of an angled-probe hit.
    pub angled_probe_weight: f32,
}

impl Default for DriveTuning {
    fn default() -> Self {
        Self {
            arrival_tolerance:            4.0,
            aggressive_arrival_tolerance: 8.0,
            cut_lookahead_secs:           1.0,

            stop_threshold:               8.0,
            low_speed_threshold:          5.0,
            reverse_speed:                6.0,
            min_drive_speed:              10.0,
            aggressive_speed_factor:      1.25,
            avoid_speed_cap:              15.0,

            brake_hysteresis:             2.0,
            min_moving_target:            0.5,

            probe_forward_offset:         2.5,
            probe_side_offset:            1.2,
            min_probe_length:             6.0,
            probe_seconds:                1.0,
            min_probe_angle:              0.15,
            probe_angle_gain:             0.6,

            side_probe_weight:            45.0,
            angled_probe_weight:          10.0,
        }
    }
}
