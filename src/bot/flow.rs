//! Interactive character creation: village, then clan, then name.
//!
//! Each step waits at most `timeout` for the user's answer. An expired flow is
//! dropped without persisting anything; the user has to `start` again.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::game::{Clan, Village};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowStep {
    ChooseVillage,
    /// `offers` stay fixed for the step, so a re-prompt shows the same clans.
    ChooseClan { village: Village, offers: Vec<Clan> },
    /// `clan: None` draws a random clan at creation (one-step `create` fallback).
    ChooseName { village: Village, clan: Option<Clan> },
}

#[derive(Debug, Clone)]
pub struct PendingCreation {
    pub step: FlowStep,
    /// When the current step's prompt was sent.
    pub prompted_at: Instant,
}

/// Result of looking up a user's flow when they send plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowLookup {
    None,
    Expired,
    Active(FlowStep),
}

#[derive(Debug)]
pub struct CreationFlows {
    pending: HashMap<String, PendingCreation>,
    timeout: Duration,
}

impl CreationFlows {
    pub fn new(timeout: Duration) -> Self {
        Self {
            pending: HashMap::new(),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Open (or restart) a flow at the village step.
    pub fn begin(&mut self, user_id: &str) {
        self.set_step(user_id, FlowStep::ChooseVillage);
    }

    /// Move to `step`, restarting the step timer.
    pub fn set_step(&mut self, user_id: &str, step: FlowStep) {
        self.pending.insert(
            user_id.to_string(),
            PendingCreation {
                step,
                prompted_at: Instant::now(),
            },
        );
    }

    /// Restart the timer of the current step (after a re-prompt).
    pub fn touch(&mut self, user_id: &str) {
        if let Some(p) = self.pending.get_mut(user_id) {
            p.prompted_at = Instant::now();
        }
    }

    pub fn cancel(&mut self, user_id: &str) -> bool {
        self.pending.remove(user_id).is_some()
    }

    /// Current step for `user_id`, discarding the flow if its step timed out.
    pub fn lookup(&mut self, user_id: &str) -> FlowLookup {
        self.lookup_at(user_id, Instant::now())
    }

    fn lookup_at(&mut self, user_id: &str, now: Instant) -> FlowLookup {
        let Some(p) = self.pending.get(user_id) else {
            return FlowLookup::None;
        };
        if now.duration_since(p.prompted_at) >= self.timeout {
            self.pending.remove(user_id);
            return FlowLookup::Expired;
        }
        FlowLookup::Active(p.step.clone())
    }

    /// Drop every flow whose step timed out. Returns the affected user ids.
    pub fn prune_expired(&mut self) -> Vec<String> {
        self.prune_expired_at(Instant::now())
    }

    fn prune_expired_at(&mut self, now: Instant) -> Vec<String> {
        let timeout = self.timeout;
        let mut expired = Vec::new();
        self.pending.retain(|user, p| {
            let live = now.duration_since(p.prompted_at) < timeout;
            if !live {
                expired.push(user.clone());
            }
            live
        });
        expired.sort();
        expired
    }
}
