use crate::{AxisConvention, Pose, SimContext, Twist};

/// A pose integration strategy.
pub trait Integrator {
    /// Advances `pose` by one timestep under a body twist held constant over the step.
    fn step(&self, ctx: &SimContext, twist: &Twist, pose: &mut Pose);
}

/// Explicit (forward) Euler integrator.
/// Translation uses the heading at the start of the step, then the heading is advanced.
/// First-order accurate; `dt` may vary from one call to the next.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExplicitEuler {
    pub axis: AxisConvention,
}

impl ExplicitEuler {
    pub fn new(axis: AxisConvention) -> Self {
        ExplicitEuler { axis }
    }
}

impl Integrator for ExplicitEuler {
    fn step(&self, ctx: &SimContext, twist: &Twist, pose: &mut Pose) {
        let dt = ctx.dt;
        let heading = pose.heading;

        pose.x += twist.linear * heading.cos() * dt;
        pose.y += self.axis.y_sign() * twist.linear * heading.sin() * dt;
        pose.heading += twist.angular * dt;
    }
}
