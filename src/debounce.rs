//! Single-slot debounce handle
//!
//! Each [`Debouncer::schedule`] hands out a fresh [`Ticket`] and replaces
//! whatever was waiting in the slot. When the quiet period for a ticket runs
//! out, the caller asks [`Debouncer::fire`]; only the ticket still in the
//! slot is allowed through, so a burst of movements yields one search.
//!
//! The timer itself lives with the caller (an iced `Task` sleeping on the
//! tokio runtime); this type only decides which timer wins.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

#[derive(Debug)]
pub struct Debouncer {
    quiet: Duration,
    next: u64,
    pending: Option<Ticket>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            next: 0,
            pending: None,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    /// Schedule a new trigger, cancelling any pending one
    pub fn schedule(&mut self) -> Ticket {
        self.next += 1;
        let ticket = Ticket(self.next);
        if let Some(old) = self.pending.replace(ticket) {
            tracing::debug!("Debounce: {:?} superseded by {:?}", old, ticket);
        }
        ticket
    }

    /// Consume the slot if `ticket` is still the pending one
    pub fn fire(&mut self, ticket: Ticket) -> bool {
        if self.pending == Some(ticket) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Sleep for the quiet period, then hand the ticket back
    pub async fn wait(quiet: Duration, ticket: Ticket) -> Ticket {
        tokio::time::sleep(quiet).await;
        ticket
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_fires_once() {
        let mut d = Debouncer::new(Duration::from_millis(500));
        let t = d.schedule();
        assert!(d.is_pending());
        assert!(d.fire(t));
        assert!(!d.fire(t));
        assert!(!d.is_pending());
    }

    #[test]
    fn test_burst_only_last_fires() {
        let mut d = Debouncer::new(Duration::from_millis(500));
        let tickets: Vec<Ticket> = (0..5).map(|_| d.schedule()).collect();
        let fired = tickets.iter().filter(|t| d.fire(**t)).count();
        assert_eq!(fired, 1);
        // the winner is the newest one even when timers resolve out of order
        let mut d = Debouncer::new(Duration::from_millis(500));
        let a = d.schedule();
        let b = d.schedule();
        assert!(!d.fire(a));
        assert!(d.fire(b));
    }

    #[test]
    fn test_cancel() {
        let mut d = Debouncer::new(Duration::from_millis(500));
        let t = d.schedule();
        d.cancel();
        assert!(!d.fire(t));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_respects_quiet_period() {
        let quiet = Duration::from_millis(500);
        let mut d = Debouncer::new(quiet);
        let start = tokio::time::Instant::now();
        let ticket = Debouncer::wait(d.quiet_period(), d.schedule()).await;
        assert!(start.elapsed() >= quiet);
        assert!(d.fire(ticket));
    }
}
