//! Fixed-timestep frame scheduler
//!
//! Wall time accumulates as debt; each simulation step pays off one fixed
//! step. Every frame renders exactly once, however many steps ran.

use crate::config::GameConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct FixedStep {
    step: f32,
    max_frame_time: f32,
    debt: f32,
}

impl FixedStep {
    pub fn new(step: f32, max_frame_time: f32) -> Self {
        Self {
            step,
            max_frame_time,
            debt: 0.0,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.fixed_step, config.max_frame_time)
    }

    #[inline]
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Wall time not yet simulated
    #[inline]
    pub fn debt(&self) -> f32 {
        self.debt
    }

    /// Run one frame: catch up on `elapsed` seconds, then render once.
    ///
    /// `elapsed` is capped at the max frame time so a backgrounded tab does
    /// not trigger a runaway catch-up. Steps run while the debt strictly
    /// exceeds one step. Returns the step count and the render result.
    pub fn run_fixed_step<C, R>(
        &mut self,
        elapsed: f32,
        ctx: &mut C,
        mut on_step: impl FnMut(&mut C, f32),
        on_render: impl FnOnce(&mut C) -> R,
    ) -> (u32, R) {
        let elapsed = if elapsed.is_nan() {
            0.0
        } else {
            elapsed.clamp(0.0, self.max_frame_time)
        };
        self.debt += elapsed;

        let mut steps = 0;
        while self.debt > self.step {
            on_step(ctx, self.step);
            self.debt -= self.step;
            steps += 1;
        }

        if steps > 1 {
            log::trace!("Caught up {} steps, debt {:.4}s", steps, self.debt);
        }

        (steps, on_render(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{MAX_FRAME_TIME, SIM_DT};
    use crate::platform::{ManualClock, Ticker};
    use proptest::prelude::*;

    #[derive(Default)]
    struct Counts {
        steps: u32,
        renders: u32,
        steps_at_render: Vec<u32>,
    }

    fn frame(sched: &mut FixedStep, elapsed: f32, counts: &mut Counts) -> u32 {
        let (steps, ()) = sched.run_fixed_step(
            elapsed,
            counts,
            |c, dt| {
                assert_eq!(dt, SIM_DT);
                c.steps += 1;
            },
            |c| {
                c.renders += 1;
                c.steps_at_render.push(c.steps);
            },
        );
        steps
    }

    #[test]
    fn test_step_requires_strictly_more_debt() {
        let mut sched = FixedStep::new(SIM_DT, MAX_FRAME_TIME);
        let mut counts = Counts::default();
        assert_eq!(frame(&mut sched, SIM_DT, &mut counts), 0);
        assert_eq!(counts.renders, 1);
        assert_eq!(frame(&mut sched, SIM_DT, &mut counts), 1);
        assert_eq!(counts.renders, 2);
    }

    #[test]
    fn test_zero_elapsed_still_renders() {
        let mut sched = FixedStep::new(SIM_DT, MAX_FRAME_TIME);
        let mut counts = Counts::default();
        assert_eq!(frame(&mut sched, 0.0, &mut counts), 0);
        assert_eq!(frame(&mut sched, -1.0, &mut counts), 0);
        assert_eq!(frame(&mut sched, f32::NAN, &mut counts), 0);
        assert_eq!(counts.renders, 3);
        assert_eq!(sched.debt(), 0.0);
    }

    #[test]
    fn test_backgrounded_tab_is_capped() {
        let mut sched = FixedStep::new(SIM_DT, MAX_FRAME_TIME);
        let mut counts = Counts::default();
        let steps = frame(&mut sched, 3600.0, &mut counts);
        // 5 s at 60 Hz, minus the strict comparison's last step
        assert!((299..=300).contains(&steps), "steps = {}", steps);
        assert_eq!(counts.renders, 1);
    }

    #[test]
    fn test_render_sees_every_step() {
        let mut sched = FixedStep::new(SIM_DT, MAX_FRAME_TIME);
        let mut counts = Counts::default();
        frame(&mut sched, 0.1, &mut counts);
        frame(&mut sched, 0.05, &mut counts);
        assert_eq!(counts.steps_at_render.last().copied(), Some(counts.steps));
    }

    #[test]
    fn test_driven_by_ticker() {
        let clock = ManualClock::new();
        let mut ticker = Ticker::new(clock.clone());
        let mut sched = FixedStep::new(SIM_DT, MAX_FRAME_TIME);
        let mut counts = Counts::default();

        frame(&mut sched, ticker.lap(), &mut counts);
        for _ in 0..120 {
            clock.advance(1.0 / 60.0);
            frame(&mut sched, ticker.lap(), &mut counts);
        }
        assert_eq!(counts.renders, 121);
        assert!((118..=120).contains(&counts.steps), "steps = {}", counts.steps);
    }

    proptest! {
        #[test]
        fn prop_time_is_conserved(frames in proptest::collection::vec(0.0f32..0.5, 1..50)) {
            let mut sched = FixedStep::new(SIM_DT, MAX_FRAME_TIME);
            let mut counts = Counts::default();
            let mut total = 0.0f64;

            for elapsed in &frames {
                let before = sched.debt();
                let steps = frame(&mut sched, *elapsed, &mut counts);
                let paid = steps as f32 * SIM_DT;
                prop_assert!((before + elapsed - paid - sched.debt()).abs() < 1e-4);
                prop_assert!(sched.debt() <= SIM_DT);
                total += *elapsed as f64;
            }

            prop_assert_eq!(counts.renders as usize, frames.len());
            let simulated = counts.steps as f64 * SIM_DT as f64 + sched.debt() as f64;
            prop_assert!((simulated - total).abs() < 1e-2);
        }
    }
}
