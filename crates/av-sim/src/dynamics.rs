//! The vehicle-dynamics collaborator interface.
//!
//! Real vehicle physics (wheel torque, steering geometry, suspension) is an
//! external concern.  The sim hands each agent's [`ControlOutput`] to a
//! [`VehicleDynamics`] implementation; [`KinematicDynamics`] is the
//! deliberately simple built-in stand-in — a forward-Euler integrator with
//! constant acceleration rates, not a physical model.

use av_agent::Agent;
use av_control::ControlOutput;

/// Consumes control intents and moves the agent.
pub trait VehicleDynamics {
    /// Advance `agent` by `dt` simulated seconds under `output`.
    fn integrate(&self, agent: &mut Agent, output: &ControlOutput, dt: f32);
}

/// Forward-Euler kinematics: steering turns the heading at a fixed maximum
/// yaw rate, throttle and brake move speed at fixed rates, and the pose
/// advances along the heading.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KinematicDynamics {
    /// Full-throttle acceleration, units/s².
    pub accel: f32,
    /// Braking deceleration toward zero, units/s².
    pub brake_decel: f32,
    /// Coasting deceleration when neither pedal is active, units/s².
    pub drag_decel: f32,
    /// Heading change at full steering lock, rad/s.
    pub max_yaw_rate: f32,
    /// Reverse speed clamp (positive magnitude).
    pub max_reverse_speed: f32,
}

impl Default for KinematicDynamics {
    fn default() -> Self {
        Self {
            accel:             8.0,
            brake_decel:       20.0,
            drag_decel:        4.0,
            max_yaw_rate:      1.5,
            max_reverse_speed: 10.0,
        }
    }
}

/// Move `current` toward `target` by at most `max_delta`.
fn approach(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else if target > current {
        current + max_delta
    } else {
        current - max_delta
    }
}

impl VehicleDynamics for KinematicDynamics {
    fn integrate(&self, agent: &mut Agent, output: &ControlOutput, dt: f32) {
        agent.pose.heading += output.steering * self.max_yaw_rate * dt;

        if output.braking {
            agent.speed = approach(agent.speed, 0.0, self.brake_decel * dt);
        } else if output.throttle != 0.0 {
            agent.speed += output.throttle * self.accel * dt;
        } else {
            agent.speed = approach(agent.speed, 0.0, self.drag_decel * dt);
        }
        agent.speed = agent.speed.max(-self.max_reverse_speed);

        agent.velocity = agent.pose.forward() * agent.speed;
        agent.pose.position += agent.velocity * dt;
    }
}
