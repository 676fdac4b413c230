use std::time::Duration;

use crate::constants::*;
use crate::state::CrossfadeState;
use crate::timer::TimerQueue;

/// Anything the looper can fade: it only ever reads and writes opacity.
pub trait Layer {
    fn opacity(&self) -> f32;
    fn set_opacity(&mut self, opacity: f32);
}

/// Indices of the visible slide and the one that fades in next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPair {
    pub current: usize,
    pub next: usize,
}

impl CursorPair {
    fn start(len: usize) -> Self {
        Self {
            current: 0,
            next: 1 % len.max(1),
        }
    }

    fn advance(&mut self, len: usize) {
        self.current = self.next;
        self.next = (self.next + 1) % len;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    Overlap,
    Settle,
}

/// Cross-fades a fixed, stacked set of layers forever.
///
/// Every `CYCLE_PERIOD` the next layer is raised to half opacity; after
/// `OVERLAP_DURATION` the current layer is hidden, the next one shown and
/// the cursor moves on. The cycle period is measured from the overlap cue,
/// so the settle runs concurrently with the wait for the following cue.
pub struct Crossfader<L: Layer> {
    layers: Vec<L>,
    cursor: CursorPair,
    state: CrossfadeState,
    timers: TimerQueue<Event>,
    cycles: u64,
}

impl<L: Layer> Crossfader<L> {
    /// Shows the first layer, hides the rest and arms the first cue.
    /// An empty set is accepted and never does anything.
    pub fn start(mut layers: Vec<L>) -> Self {
        let mut timers = TimerQueue::new();
        let cursor = CursorPair::start(layers.len());

        if !layers.is_empty() {
            for layer in layers.iter_mut() {
                layer.set_opacity(0.0);
            }
            layers[cursor.current].set_opacity(1.0);
            timers.schedule(START_DELAY, Event::Overlap);
        }

        tracing::debug!(layers = layers.len(), armed = !timers.is_idle(), "crossfade started");

        Self {
            layers,
            cursor,
            state: CrossfadeState::Resting,
            timers,
            cycles: 0,
        }
    }

    /// Advances virtual time by `dt`, firing every timer that falls due.
    pub fn update(&mut self, dt: Duration) {
        let until = self.timers.now() + dt;
        while let Some(event) = self.timers.pop_due(until) {
            match event {
                Event::Overlap => self.overlap(),
                Event::Settle => self.settle(),
            }
        }
        self.timers.advance_to(until);
    }

    fn overlap(&mut self) {
        let CursorPair { current, next } = self.cursor;
        if current != next {
            self.layers[next].set_opacity(OVERLAP_OPACITY);
        }
        self.state = CrossfadeState::Overlapping;
        self.timers.schedule(OVERLAP_DURATION, Event::Settle);
        self.timers.schedule(CYCLE_PERIOD, Event::Overlap);
    }

    fn settle(&mut self) {
        let CursorPair { current, next } = self.cursor;
        // A single layer has nothing to fade into.
        if current != next {
            self.layers[current].set_opacity(0.0);
            self.layers[next].set_opacity(1.0);
        }
        self.cursor.advance(self.layers.len());
        self.state = CrossfadeState::Resting;
        self.cycles += 1;
        tracing::debug!(
            current = self.cursor.current,
            next = self.cursor.next,
            cycles = self.cycles,
            at = ?self.timers.now(),
            "crossfade settled"
        );
    }

    pub fn cursor(&self) -> CursorPair {
        self.cursor
    }

    pub fn state(&self) -> CrossfadeState {
        self.state
    }

    pub fn layers(&self) -> &[L] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Virtual time since start.
    pub fn elapsed(&self) -> Duration {
        self.timers.now()
    }

    /// Number of completed settles.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Plate {
        opacity: f32,
    }

    impl Layer for Plate {
        fn opacity(&self) -> f32 {
            self.opacity
        }

        fn set_opacity(&mut self, opacity: f32) {
            self.opacity = opacity;
        }
    }

    // Starts from a messy state to check that `start` resets everything.
    fn plates(n: usize) -> Vec<Plate> {
        (0..n).map(|i| Plate { opacity: 0.25 * (i % 4) as f32 }).collect()
    }

    fn opacities(looper: &Crossfader<Plate>) -> Vec<f32> {
        looper.layers().iter().map(Layer::opacity).collect()
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn start_shows_only_first_layer() {
        let looper = Crossfader::start(plates(4));
        assert_eq!(opacities(&looper), vec![1.0, 0.0, 0.0, 0.0]);
        assert_eq!(looper.cursor(), CursorPair { current: 0, next: 1 });
        assert_eq!(looper.state(), CrossfadeState::Resting);
    }

    #[test]
    fn empty_set_is_a_silent_no_op() {
        let mut looper: Crossfader<Plate> = Crossfader::start(Vec::new());
        looper.update(ms(60_000));
        assert!(looper.is_empty());
        assert_eq!(looper.cycles(), 0);
        assert_eq!(looper.state(), CrossfadeState::Resting);
        assert_eq!(looper.elapsed(), ms(60_000));
    }

    #[test]
    fn three_layer_scenario() {
        let mut looper = Crossfader::start(plates(3));
        assert_eq!(opacities(&looper), vec![1.0, 0.0, 0.0]);

        looper.update(ms(7000));
        assert_eq!(opacities(&looper), vec![1.0, 0.5, 0.0]);
        assert_eq!(looper.state(), CrossfadeState::Overlapping);

        looper.update(ms(2000));
        assert_eq!(opacities(&looper), vec![0.0, 1.0, 0.0]);
        assert_eq!(looper.cursor(), CursorPair { current: 1, next: 2 });
        assert_eq!(looper.state(), CrossfadeState::Resting);

        looper.update(ms(5000));
        assert_eq!(opacities(&looper), vec![0.0, 1.0, 0.5]);

        looper.update(ms(2000));
        assert_eq!(opacities(&looper), vec![0.0, 0.0, 1.0]);
        assert_eq!(looper.cursor(), CursorPair { current: 2, next: 0 });

        looper.update(ms(7000));
        assert_eq!(opacities(&looper), vec![1.0, 0.0, 0.0]);
        assert_eq!(looper.cursor(), CursorPair { current: 0, next: 1 });
        assert_eq!(looper.cycles(), 3);
    }

    #[test]
    fn honours_exact_timings() {
        let mut looper = Crossfader::start(plates(2));

        looper.update(ms(6999));
        assert_eq!(opacities(&looper), vec![1.0, 0.0]);
        looper.update(ms(1));
        assert_eq!(opacities(&looper), vec![1.0, 0.5]);

        looper.update(ms(1999));
        assert_eq!(looper.state(), CrossfadeState::Overlapping);
        looper.update(ms(1));
        assert_eq!(opacities(&looper), vec![0.0, 1.0]);

        // Next cue is 7000 ms after the previous cue, not after the settle.
        looper.update(ms(4999));
        assert_eq!(looper.state(), CrossfadeState::Resting);
        looper.update(ms(1));
        assert_eq!(looper.state(), CrossfadeState::Overlapping);
        assert_eq!(looper.elapsed(), ms(14_000));
        assert_eq!(opacities(&looper), vec![0.5, 1.0]);
    }

    #[test]
    fn one_large_step_fires_every_due_timer() {
        let mut looper = Crossfader::start(plates(3));
        // Cues at 7s, 14s, 21s; settles at 9s, 16s, 23s.
        looper.update(ms(23_000));
        assert_eq!(looper.cycles(), 3);
        assert_eq!(looper.cursor(), CursorPair { current: 0, next: 1 });
        assert_eq!(opacities(&looper), vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn frame_sized_steps_match_one_large_step() {
        let mut framed = Crossfader::start(plates(5));
        let mut single = Crossfader::start(plates(5));
        for _ in 0..(60 * 40) {
            framed.update(Duration::from_secs_f32(FRAME_TIME));
        }
        single.update(framed.elapsed());
        assert_eq!(framed.cursor(), single.cursor());
        assert_eq!(opacities(&framed), opacities(&single));
    }

    #[test]
    fn single_layer_never_changes() {
        let mut looper = Crossfader::start(plates(1));
        assert_eq!(looper.cursor(), CursorPair { current: 0, next: 0 });
        for _ in 0..100 {
            looper.update(ms(1000));
            assert_eq!(opacities(&looper), vec![1.0]);
        }
        assert!(looper.cycles() > 0);
    }

    proptest! {
        #[test]
        fn one_cycle_advances_cursor(n in 2usize..40, cycles in 0u64..20) {
            let mut looper = Crossfader::start(plates(n));
            looper.update(START_DELAY + OVERLAP_DURATION);
            looper.update(CYCLE_PERIOD * cycles as u32);

            let i = (1 + cycles as usize) % n;
            prop_assert_eq!(looper.cursor(), CursorPair { current: i, next: (i + 1) % n });
            prop_assert_ne!(looper.cursor().current, looper.cursor().next);

            let before = looper.cursor();
            looper.update(CYCLE_PERIOD);
            prop_assert_eq!(looper.cursor().current, (before.current + 1) % n);
            prop_assert_eq!(looper.cursor().next, (before.current + 2) % n);
            prop_assert_eq!(looper.layers()[before.current].opacity(), 0.0);
            prop_assert_eq!(looper.layers()[before.next].opacity(), 1.0);
        }

        #[test]
        fn exactly_one_opaque_layer_at_rest(n in 1usize..20, steps in proptest::collection::vec(1u64..5000, 1..40)) {
            let mut looper = Crossfader::start(plates(n));
            for step in steps {
                looper.update(ms(step));
                if looper.state() == CrossfadeState::Resting {
                    let opaque = opacities(&looper).iter().filter(|o| **o == 1.0).count();
                    let hidden = opacities(&looper).iter().filter(|o| **o == 0.0).count();
                    prop_assert_eq!(opaque, 1);
                    prop_assert_eq!(hidden, n - 1);
                    prop_assert_eq!(looper.layers()[looper.cursor().current].opacity(), 1.0);
                }
            }
        }
    }
}
