//! Control output — the interface to the vehicle-dynamics collaborator.

/// One tick's worth of driving intent.
///
/// `steering` is a percentage in `[-1, 1]`, positive to the right.
/// `throttle` is in `[-1, 1]`; negative values request reverse (emitted only
/// while backing from stuck).  `braking` is a discrete pedal flag.
///
/// Every field is finite by construction — the steering math guards its one
/// degenerate case at the source.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlOutput {
    pub steering: f32,
    pub throttle: f32,
    pub braking: bool,
}

impl ControlOutput {
    /// No steering, no throttle, brake held — the "no valid route" posture.
    pub const HOLD: ControlOutput = ControlOutput {
        steering: 0.0,
        throttle: 0.0,
        braking: true,
    };

    /// Clamp steering and throttle into their documented ranges.
    pub fn clamped(self) -> Self {
        Self {
            steering: self.steering.clamp(-1.0, 1.0),
            throttle: self.throttle.clamp(-1.0, 1.0),
            braking: self.braking,
        }
    }
}
