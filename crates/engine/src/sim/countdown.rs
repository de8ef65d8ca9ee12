/// Tick-granular countdown timer.
///
/// Collapses the handful of "decrement an integer until it reaches zero"
/// timers in the sim (hit stun, grenade fuse, enemy wake delay, detection
/// grace) into one type with a single decrement rule: [`Countdown::tick`]
/// consumes one tick and reports whether the countdown was still running
/// before the decrement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
}

impl Countdown {
    pub const fn new(ticks: u32) -> Self {
        Self { remaining: ticks }
    }

    /// Inactive countdown. `tick` on it returns false and does nothing.
    pub const fn idle() -> Self {
        Self { remaining: 0 }
    }

    /// Restarts the countdown at `ticks`, replacing any remaining time.
    pub fn arm(&mut self, ticks: u32) {
        self.remaining = ticks;
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Consumes one tick. Returns true when the countdown was active going
    /// into this tick, false once it has run out.
    pub fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_countdown_never_fires() {
        let mut countdown = Countdown::idle();
        assert!(!countdown.is_active());
        assert!(!countdown.tick());
        assert_eq!(countdown.remaining(), 0);
    }

    #[test]
    fn runs_for_exactly_the_armed_tick_count() {
        let mut countdown = Countdown::new(3);
        assert!(countdown.tick());
        assert!(countdown.tick());
        assert!(countdown.tick());
        assert!(!countdown.tick());
        assert!(!countdown.is_active());
    }

    #[test]
    fn arm_replaces_remaining_time() {
        let mut countdown = Countdown::new(2);
        assert!(countdown.tick());
        countdown.arm(5);
        assert_eq!(countdown.remaining(), 5);
        assert!(countdown.is_active());
    }

    #[test]
    fn default_is_idle() {
        assert_eq!(Countdown::default(), Countdown::idle());
    }
}
