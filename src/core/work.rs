use std::time::Duration;

pub const DEFAULT_WORK_DELAY: Duration = Duration::from_millis(1500);

/// Stand-in for the cost of a real optimisation run. The HTTP layer waits on
/// this before answering; tests and the offline CLI use [`WorkDelay::none`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkDelay(Duration);

impl WorkDelay {
    pub const fn new(duration: Duration) -> Self {
        Self(duration)
    }

    pub const fn none() -> Self {
        Self(Duration::ZERO)
    }

    pub fn duration(self) -> Duration {
        self.0
    }

    pub async fn wait(self) {
        if !self.0.is_zero() {
            tokio::time::sleep(self.0).await;
        }
    }
}

impl Default for WorkDelay {
    fn default() -> Self {
        Self(DEFAULT_WORK_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_delay_is_one_and_a_half_seconds() {
        assert_eq!(WorkDelay::default().duration(), Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn wait_advances_by_the_configured_duration() {
        let start = tokio::time::Instant::now();
        WorkDelay::new(Duration::from_millis(250)).wait().await;
        assert!(start.elapsed() >= Duration::from_millis(250));
    }

    #[tokio::test]
    async fn none_returns_immediately() {
        let start = std::time::Instant::now();
        WorkDelay::none().wait().await;
        assert!(start.elapsed() < Duration::from_millis(100));
    }
}
