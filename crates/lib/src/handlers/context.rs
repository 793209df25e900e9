//! Per-process handler dependencies: random source, wall clock, joke source.

use crate::config::Config;
use crate::jokes::{JokeApiClient, JokeError, JokeSource};
use chrono::Timelike;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};

/// Uniform index source. `pick(bound)` returns a value in `[0, bound)`; `bound` is never zero.
pub trait Picker: Send + Sync {
    fn pick(&self, bound: usize) -> usize;
}

/// Picker backed by the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngPicker;

impl Picker for ThreadRngPicker {
    fn pick(&self, bound: usize) -> usize {
        rand::thread_rng().gen_range(0..bound)
    }
}

/// Deterministic picker for reproducible runs and tests.
pub struct SeededPicker {
    rng: Mutex<StdRng>,
}

impl SeededPicker {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Picker for SeededPicker {
    fn pick(&self, bound: usize) -> usize {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen_range(0..bound)
    }
}

/// Source of the current hour of day (0..=23).
pub trait Clock: Send + Sync {
    fn hour(&self) -> u32;
}

/// Local wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn hour(&self) -> u32 {
        chrono::Local::now().hour()
    }
}

/// Clock pinned to one hour.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u32);

impl Clock for FixedClock {
    fn hour(&self) -> u32 {
        self.0
    }
}

/// Shared, read-only dependencies handed to every tag handler.
#[derive(Clone)]
pub struct HandlerContext {
    pub picker: Arc<dyn Picker>,
    pub clock: Arc<dyn Clock>,
    pub jokes: Arc<dyn JokeSource>,
    /// Reply used by the `joke` tag when the joke source fails.
    pub joke_fallback: String,
}

impl HandlerContext {
    /// Context with the thread RNG and the local clock.
    pub fn new(jokes: Arc<dyn JokeSource>, joke_fallback: impl Into<String>) -> Self {
        Self {
            picker: Arc::new(ThreadRngPicker),
            clock: Arc::new(LocalClock),
            jokes,
            joke_fallback: joke_fallback.into(),
        }
    }

    /// Production context: JokeAPI client built from config (CXHOOK_JOKE_URL applied).
    pub fn from_config(config: &Config) -> Result<Self, JokeError> {
        let url = crate::config::resolve_joke_url(config);
        let client = JokeApiClient::from_config(&config.joke, url)?;
        log::debug!("joke source: {}", client.url());
        Ok(Self::new(Arc::new(client), config.joke.fallback.clone()))
    }

    pub fn with_picker(mut self, picker: Arc<dyn Picker>) -> Self {
        self.picker = picker;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Index in `[0, bound)`, clamped in case a picker overshoots.
    pub fn pick(&self, bound: usize) -> usize {
        self.picker.pick(bound).min(bound.saturating_sub(1))
    }
}
