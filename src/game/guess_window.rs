// src/game/guess_window.rs
use chrono::{DateTime, Utc};

/// Whether a guess may still be submitted for a game scheduled at `kickoff`.
///
/// The window closes at kickoff: a submission at exactly the scheduled start
/// time is already too late. Always evaluated server-side at submission time;
/// whatever open/closed state a client shows is advisory only.
pub fn can_guess(now: DateTime<Utc>, kickoff: DateTime<Utc>) -> bool {
    now < kickoff
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn open_before_kickoff() {
        let kickoff = Utc::now() + Duration::hours(1);
        assert!(can_guess(Utc::now(), kickoff));
    }

    #[test]
    fn closed_at_exact_kickoff() {
        let kickoff = Utc::now();
        assert!(!can_guess(kickoff, kickoff));
    }

    #[test]
    fn closed_after_kickoff() {
        let kickoff = Utc::now() - Duration::hours(1);
        assert!(!can_guess(Utc::now(), kickoff));
    }

    #[test]
    fn one_second_before_kickoff_is_still_open() {
        let kickoff = Utc::now() + Duration::seconds(1);
        assert!(can_guess(Utc::now(), kickoff));
    }
}
