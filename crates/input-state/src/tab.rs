//! Short/long Tab disambiguation (spec §4.F, glossary "Long/short Tab").

use std::env;
use std::time::Instant;

fn quick_press_threshold_secs() -> f64 {
    env::var("LILUSH_QUICK_PRESS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(0.093)
}

#[derive(Debug, Default)]
pub struct TabState {
    press_start: Option<Instant>,
    long: bool,
}

impl TabState {
    pub fn new() -> Self {
        TabState::default()
    }

    pub fn on_press(&mut self) {
        self.press_start = Some(Instant::now());
        self.long = false;
    }

    /// Call on Tab release; returns whether the hold qualified as "long"
    /// (scroll) rather than "short" (promote).
    pub fn on_release(&mut self) -> bool {
        let long = match self.press_start.take() {
            Some(start) => start.elapsed().as_secs_f64() > quick_press_threshold_secs(),
            None => false,
        };
        self.long = long;
        long
    }

    pub fn is_long(&self) -> bool {
        self.long
    }
}
