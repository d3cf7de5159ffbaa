//! Timing profiles and the per-spin cascade schedule
//!
//! A spin cycle is a fixed plan of timestamps: a staggered reel-start
//! cascade, a staggered reel-stop cascade after the spin duration, and a
//! final win-check strictly after the last stop. The plan carries no
//! behavior; the orchestrator turns it into scheduled actions.

use serde::{Deserialize, Serialize};

/// Timing profile identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingProfile {
    /// Normal gameplay timing
    #[default]
    Normal,
    /// Fast mode
    Turbo,
    /// Zero delays (tests, batch simulation)
    Instant,
    /// Scaled or hand-tuned
    Custom,
}

/// Delay configuration for one spin cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Profile type
    pub profile: TimingProfile,
    /// Base spin time before the first reel stops (ms)
    pub spin_duration_ms: f64,
    /// Delay between successive reel starts (ms)
    pub reel_start_delay_ms: f64,
    /// Delay between successive reel stops (ms)
    pub reel_stop_delay_ms: f64,
    /// Delay between the last reel stop and the win check (ms)
    pub win_check_delay_ms: f64,
}

impl TimingConfig {
    /// Normal gameplay timing
    pub fn normal() -> Self {
        Self {
            profile: TimingProfile::Normal,
            spin_duration_ms: 8000.0,
            reel_start_delay_ms: 500.0,
            reel_stop_delay_ms: 500.0,
            win_check_delay_ms: 100.0,
        }
    }

    /// Turbo mode
    pub fn turbo() -> Self {
        Self {
            profile: TimingProfile::Turbo,
            spin_duration_ms: 2000.0,
            reel_start_delay_ms: 125.0,
            reel_stop_delay_ms: 125.0,
            win_check_delay_ms: 25.0,
        }
    }

    /// Zero-delay profile: a whole cycle resolves on the next tick
    pub fn instant() -> Self {
        Self {
            profile: TimingProfile::Instant,
            spin_duration_ms: 0.0,
            reel_start_delay_ms: 0.0,
            reel_stop_delay_ms: 0.0,
            win_check_delay_ms: 0.0,
        }
    }

    /// Get config for a profile
    pub fn from_profile(profile: TimingProfile) -> Self {
        match profile {
            TimingProfile::Normal => Self::normal(),
            TimingProfile::Turbo => Self::turbo(),
            TimingProfile::Instant => Self::instant(),
            TimingProfile::Custom => Self::normal(),
        }
    }

    /// Scale all delays by a factor (< 1.0 = faster)
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            profile: TimingProfile::Custom,
            spin_duration_ms: self.spin_duration_ms * factor,
            reel_start_delay_ms: self.reel_start_delay_ms * factor,
            reel_stop_delay_ms: self.reel_stop_delay_ms * factor,
            win_check_delay_ms: self.win_check_delay_ms * factor,
        }
    }

    /// Time from spin start until the first reel stop
    ///
    /// The start cascade pushes the whole stop cascade back, so the spin
    /// reads as one continuous motion.
    pub fn total_spin_duration(&self, reels: u8) -> f64 {
        self.spin_duration_ms + (reels.max(1) as f64 - 1.0) * self.reel_start_delay_ms
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::normal()
    }
}

/// The timestamp plan for one spin cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinSchedule {
    /// Reel-start timestamps, reel order (ms)
    pub reel_starts: Vec<f64>,
    /// Reel-stop timestamps, reel order (ms)
    pub reel_stops: Vec<f64>,
    /// Win-check timestamp (ms)
    pub win_check: f64,
}

impl SpinSchedule {
    /// Generate the plan for a spin issued at `start_ms`
    pub fn generate(config: &TimingConfig, reels: u8, start_ms: f64) -> Self {
        let reel_starts = (0..reels)
            .map(|i| start_ms + i as f64 * config.reel_start_delay_ms)
            .collect();

        let stops_begin = start_ms + config.total_spin_duration(reels);
        let reel_stops: Vec<f64> = (0..reels)
            .map(|i| stops_begin + i as f64 * config.reel_stop_delay_ms)
            .collect();

        let win_check = reel_stops.last().copied().unwrap_or(start_ms) + config.win_check_delay_ms;

        Self {
            reel_starts,
            reel_stops,
            win_check,
        }
    }

    /// Timestamp of the last scheduled event
    pub fn end(&self) -> f64 {
        self.win_check
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles() {
        let normal = TimingConfig::normal();
        let turbo = TimingConfig::turbo();
        let instant = TimingConfig::instant();

        assert!(turbo.spin_duration_ms < normal.spin_duration_ms);
        assert_eq!(instant.total_spin_duration(3), 0.0);
    }

    #[test]
    fn test_total_spin_duration_matches_cascade() {
        let config = TimingConfig::normal();
        // 8000 + 2 × 500 start stagger
        assert_eq!(config.total_spin_duration(3), 9000.0);
        assert_eq!(config.total_spin_duration(1), 8000.0);
    }

    #[test]
    fn test_schedule_ordering() {
        let config = TimingConfig::normal();
        let plan = SpinSchedule::generate(&config, 3, 1000.0);

        // Starts strictly staggered, stops strictly staggered
        for pair in plan.reel_starts.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        for pair in plan.reel_stops.windows(2) {
            assert!(pair[0] < pair[1]);
        }

        // Every stop comes after every start; win check after the last stop
        let last_start = *plan.reel_starts.last().unwrap();
        let first_stop = plan.reel_stops[0];
        let last_stop = *plan.reel_stops.last().unwrap();
        assert!(last_start < first_stop);
        assert!(last_stop < plan.win_check);
        assert_eq!(plan.end(), plan.win_check);
    }

    #[test]
    fn test_instant_schedule_collapses_to_start() {
        let plan = SpinSchedule::generate(&TimingConfig::instant(), 3, 42.0);
        assert!(plan.reel_starts.iter().all(|&t| t == 42.0));
        assert!(plan.reel_stops.iter().all(|&t| t == 42.0));
        assert_eq!(plan.win_check, 42.0);
    }

    #[test]
    fn test_scaled() {
        let half = TimingConfig::normal().scaled(0.5);
        assert_eq!(half.profile, TimingProfile::Custom);
        assert_eq!(half.spin_duration_ms, 4000.0);
        assert_eq!(half.win_check_delay_ms, 50.0);
    }
}
