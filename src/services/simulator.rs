//! Simulated wavemeter for dev mode.
//!
//! Each channel random-walks around a centre frequency and occasionally
//! reports an exposure sentinel, enough to exercise every tile state.

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

use crate::models::frame::{OVEREXPOSED, UNDEREXPOSED};
use crate::models::{AppConfig, Frame, CHANNEL_COUNT};
use crate::services::feed::{FeedError, FrameSource};

/// Default centre wavelengths (nm), deep red to violet
const DEFAULT_CENTRES_NM: [f64; CHANNEL_COUNT] =
    [780.24, 689.0, 637.0, 589.0, 532.0, 495.0, 461.0, 405.0];

/// Per-frame random walk step bound (GHz)
const WALK_STEP: f64 = 0.05;

/// Walk is pulled back once it strays further than this (GHz)
const WALK_LIMIT: f64 = 5.0;

const UNDEREXPOSED_CHANCE: f64 = 0.01;
const OVEREXPOSED_CHANCE: f64 = 0.005;

pub struct SimulatedSource {
    centres: [f64; CHANNEL_COUNT],
    offsets: [f64; CHANNEL_COUNT],
    interval: Duration,
    rng: StdRng,
}

impl SimulatedSource {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Deterministic source for tests
    pub fn seeded(config: &AppConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &AppConfig, rng: StdRng) -> Self {
        let mut centres = DEFAULT_CENTRES_NM.map(|nm| 3.0e8 / nm);
        for channel in &config.channels {
            if let (Some(centre), Some(slot)) = (channel.centre, centres.get_mut(channel.index)) {
                *slot = centre;
            }
        }

        Self {
            centres,
            offsets: [0.0; CHANNEL_COUNT],
            interval: config.feed.simulate_interval(),
            rng,
        }
    }

    /// Next synthetic frame, without waiting
    pub fn generate(&mut self) -> Frame {
        let mut readings = [0.0; CHANNEL_COUNT];
        let mut powers = [0.0; CHANNEL_COUNT];

        for ch in 0..CHANNEL_COUNT {
            let step = self.rng.gen_range(-WALK_STEP..=WALK_STEP);
            let offset = self.offsets[ch] + step;
            self.offsets[ch] = if offset.abs() > WALK_LIMIT {
                offset * 0.5
            } else {
                offset
            };

            let roll: f64 = self.rng.gen();
            readings[ch] = if roll < UNDEREXPOSED_CHANCE {
                UNDEREXPOSED
            } else if roll < UNDEREXPOSED_CHANCE + OVEREXPOSED_CHANCE {
                OVEREXPOSED
            } else {
                self.centres[ch] + self.offsets[ch]
            };
            powers[ch] = self.rng.gen_range(1.0..50.0);
        }

        Frame::new(readings, powers)
    }
}

#[async_trait]
impl FrameSource for SimulatedSource {
    fn describe(&self) -> String {
        "simulator".to_string()
    }

    async fn connect(&mut self) -> Result<(), FeedError> {
        Ok(())
    }

    async fn next_frame(&mut self) -> Result<Option<Frame>, FeedError> {
        tokio::time::sleep(self.interval).await;
        Ok(Some(self.generate()))
    }
}
