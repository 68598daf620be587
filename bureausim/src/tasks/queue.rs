//! "Now serving" counter for the queue departments.

use std::time::{Duration, Instant};

use rand::Rng;

/// Simulated ticket queue.
///
/// The serving number starts somewhere below 100; a drawn ticket is
/// between 100 and 999. Once a ticket is held the counter advances one
/// step per period and stops at the ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueCounter {
    serving: u32,
    ticket: Option<u32>,
    step: Duration,
    next_step: Option<Instant>,
}

impl QueueCounter {
    /// A fresh queue advancing every `step`.
    pub fn new(step: Duration, rng: &mut impl Rng) -> Self {
        Self {
            serving: rng.random_range(0..100),
            ticket: None,
            step,
            next_step: None,
        }
    }

    /// Draw a ticket and start the counter. Does nothing if one is held.
    pub fn take_number(&mut self, now: Instant, rng: &mut impl Rng) {
        if self.ticket.is_some() {
            return;
        }
        self.ticket = Some(rng.random_range(100..1000));
        self.next_step = Some(now + self.step);
    }

    /// Advance for every whole step elapsed up to `now`.
    pub fn tick(&mut self, now: Instant) {
        let Some(ticket) = self.ticket else {
            return;
        };
        while let Some(at) = self.next_step {
            if self.serving >= ticket {
                self.serving = ticket;
                self.next_step = None;
                break;
            }
            if now < at {
                break;
            }
            self.serving += 1;
            self.next_step = Some(at + self.step);
        }
    }

    /// Number currently being served.
    #[must_use]
    pub const fn serving(&self) -> u32 {
        self.serving
    }

    /// The player's ticket, if drawn.
    #[must_use]
    pub const fn ticket(&self) -> Option<u32> {
        self.ticket
    }

    /// Whether the player's number has come up.
    #[must_use]
    pub fn reached(&self) -> bool {
        self.ticket.is_some_and(|t| self.serving >= t)
    }

    /// Whether the counter is still moving.
    #[must_use]
    pub const fn is_advancing(&self) -> bool {
        self.next_step.is_some()
    }
}
