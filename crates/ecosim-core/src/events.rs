//! Event log - births, deaths and regrowth, stamped with simulated time.
//!
//! Only the most recent entries are kept; older ones fall off the front.
//! Every recorded event is also emitted through the `log` facade.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::components::{DeathReason, Kind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    Born { kind: Kind },
    Died { kind: Kind, reason: DeathReason },
    /// Grass sprouted from a carcass
    Regrew,
    /// A spawn was refused because the kind is at its population cap
    CapReached { kind: Kind },
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::Born { kind } => write!(f, "{} was born", kind),
            EventKind::Died { kind, reason } => write!(f, "{} died of {}", kind, reason),
            EventKind::Regrew => write!(f, "Grass regrew from a carcass"),
            EventKind::CapReached { kind } => write!(f, "Too many {} agents", kind),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimEvent {
    /// Simulated seconds
    pub at: f64,
    pub kind: EventKind,
}

impl SimEvent {
    /// "<event> (<age> ago)"
    pub fn describe(&self, now: f64) -> String {
        format!("{} ({} ago)", self.kind, format_age(now - self.at))
    }
}

/// Whole minutes once at least a minute old, otherwise whole seconds
pub fn format_age(elapsed: f64) -> String {
    let elapsed = elapsed.max(0.0);
    let minutes = (elapsed / 60.0).floor();
    if minutes > 0.0 {
        format!("{:.0}m", minutes)
    } else {
        format!("{:.0}s", elapsed.floor())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    events: VecDeque<SimEvent>,
    capacity: usize,
    /// Totals since creation, unaffected by the capacity
    births: u64,
    deaths: u64,
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: VecDeque::new(),
            capacity,
            births: 0,
            deaths: 0,
        }
    }

    pub fn record(&mut self, at: f64, kind: EventKind) {
        match kind {
            EventKind::CapReached { .. } => log::warn!("{}", kind),
            _ => log::debug!("t={:.1}s {}", at, kind),
        }
        match kind {
            EventKind::Born { .. } => self.births += 1,
            EventKind::Died { .. } => self.deaths += 1,
            _ => {}
        }
        if self.capacity == 0 {
            return;
        }
        self.events.push_back(SimEvent { at, kind });
        while self.events.len() > self.capacity {
            self.events.pop_front();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &SimEvent> {
        self.events.iter()
    }

    /// Births recorded so far, including those no longer retained
    pub fn total_births(&self) -> u64 {
        self.births
    }

    /// Deaths recorded so far, including those no longer retained
    pub fn total_deaths(&self) -> u64 {
        self.deaths
    }

    pub fn last(&self) -> Option<&SimEvent> {
        self.events.back()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
