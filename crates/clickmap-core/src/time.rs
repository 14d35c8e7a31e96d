// Clickmap Timestamps
// Event-time instants used for every timing window

use std::fmt;
use std::ops::Add;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// An instant on the event source's clock, stored as an offset from the Unix epoch.
///
/// Timing windows are always computed between two of these, never against
/// the wall time at which a timer happened to wake up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Timestamp(Duration);

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(Duration::ZERO);

    pub fn from_duration(offset: Duration) -> Self {
        Timestamp(offset)
    }

    pub fn from_millis(millis: u64) -> Self {
        Timestamp(Duration::from_millis(millis))
    }

    /// Current wall-clock time, on the same scale as evdev event stamps
    pub fn now() -> Self {
        Self::from(SystemTime::now())
    }

    pub fn as_duration(self) -> Duration {
        self.0
    }

    /// Time elapsed from `earlier` to `self`; zero if `earlier` is later
    pub fn saturating_since(self, earlier: Timestamp) -> Duration {
        self.0.saturating_sub(earlier.0)
    }
}

impl From<SystemTime> for Timestamp {
    fn from(time: SystemTime) -> Self {
        Timestamp(time.duration_since(UNIX_EPOCH).unwrap_or_default())
    }
}

impl Add<Duration> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: Duration) -> Self::Output {
        Timestamp(self.0.saturating_add(rhs))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.0.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saturating_since() {
        let a = Timestamp::from_millis(100);
        let b = Timestamp::from_millis(350);
        assert_eq!(b.saturating_since(a), Duration::from_millis(250));
        assert_eq!(a.saturating_since(b), Duration::ZERO);
    }

    #[test]
    fn test_add_duration() {
        let t = Timestamp::from_millis(50) + Duration::from_millis(300);
        assert_eq!(t, Timestamp::from_millis(350));
    }

    #[test]
    fn test_from_system_time() {
        let t = Timestamp::from(UNIX_EPOCH + Duration::from_secs(5));
        assert_eq!(t.as_duration(), Duration::from_secs(5));
        assert_eq!(Timestamp::from(UNIX_EPOCH), Timestamp::ZERO);
    }

    #[test]
    fn test_display() {
        assert_eq!(Timestamp::from_millis(1250).to_string(), "1.250s");
    }
}
