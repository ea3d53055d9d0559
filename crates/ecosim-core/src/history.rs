//! Population history - periodic samples of the living population,
//! feeding graph widgets.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Counts of the living species at one sample time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Population {
    pub grass: usize,
    pub herbivores: usize,
    pub carnivores: usize,
    pub carcasses: usize,
}

impl Population {
    /// The graphed series: grass, herbivores, carnivores
    pub fn series(&self) -> [usize; 3] {
        [self.grass, self.herbivores, self.carnivores]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Simulated seconds when the sample was taken
    pub time: f64,
    pub values: [usize; 3],
    /// Set when a user action happened since the previous sample
    pub mark: bool,
}

impl Sample {
    /// Cumulative share of the total for each series, for stacked area plots.
    /// All zero when nothing is alive.
    pub fn shares(&self) -> [f32; 3] {
        let total: usize = self.values.iter().sum();
        let mut out = [0.0; 3];
        if total == 0 {
            return out;
        }
        let mut running = 0;
        for (i, v) in self.values.iter().enumerate() {
            running += v;
            out[i] = running as f32 / total as f32;
        }
        out
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationHistory {
    samples: VecDeque<Sample>,
    interval: f32,
    capacity: usize,
    time_till_collect: f32,
    pending_mark: bool,
}

impl PopulationHistory {
    /// Start a history with an initial sample
    pub fn new(interval: f32, capacity: usize, time: f64, population: Population) -> Self {
        let mut history = Self {
            samples: VecDeque::with_capacity(capacity.min(1024)),
            interval,
            capacity: capacity.max(1),
            time_till_collect: interval,
            pending_mark: false,
        };
        history.collect(time, population);
        history
    }

    /// Advance by one timestep, sampling when the interval elapses
    pub fn update(&mut self, dt: f32, time: f64, population: Population) {
        self.time_till_collect -= dt;
        if self.time_till_collect <= 0.0 {
            self.time_till_collect += self.interval;
            self.collect(time, population);
        }
    }

    /// Flag the next sample
    pub fn add_mark(&mut self) {
        self.pending_mark = true;
    }

    pub fn has_pending_mark(&self) -> bool {
        self.pending_mark
    }

    pub fn samples(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    fn collect(&mut self, time: f64, population: Population) {
        self.samples.push_back(Sample {
            time,
            values: population.series(),
            mark: self.pending_mark,
        });
        self.pending_mark = false;
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }
}
