//! Fixed-step runner
//!
//! Converts variable frame times into a whole number of fixed physics steps.
//! Leftover time carries into the next frame.

use crate::world::{PhysicsWorld, StepHooks};

/// Fixed timestep accumulator driving a [`PhysicsWorld`]
#[derive(Clone, Debug)]
pub struct Runner {
    timestep: f32,
    max_substeps: u32,
    accumulator: f32,
}

impl Default for Runner {
    fn default() -> Self {
        Self::new(1.0 / 60.0, 5)
    }
}

impl Runner {
    /// Create a runner stepping `timestep` seconds at a time, at most
    /// `max_substeps` times per frame
    pub fn new(timestep: f32, max_substeps: u32) -> Self {
        Self {
            timestep: timestep.max(f32::EPSILON),
            max_substeps: max_substeps.max(1),
            accumulator: 0.0,
        }
    }

    /// Drop any banked time
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    /// Advance the world by `frame_dt` seconds of wall-clock time
    ///
    /// Returns the number of steps taken. When the substep cap is hit the
    /// backlog is discarded down to less than one step, so a long stall does
    /// not make later frames catch up in a burst.
    pub fn tick<H: StepHooks + ?Sized>(&mut self, world: &mut PhysicsWorld, frame_dt: f32, hooks: &mut H) -> u32 {
        self.accumulator += frame_dt.max(0.0);

        let mut steps = 0;
        while self.accumulator >= self.timestep && steps < self.max_substeps {
            world.step_with_hooks(self.timestep, hooks);
            self.accumulator -= self.timestep;
            steps += 1;
        }

        if steps == self.max_substeps {
            self.accumulator = self.accumulator.min(self.timestep * 0.999);
        }
        steps
    }
}
