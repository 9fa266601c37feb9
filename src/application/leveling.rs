//! # Leveling
//!
//! Pure mapping from cumulative XP to level and progress. The curve is
//! quadratic in cumulative terms: reaching level `n` costs
//! `T(n) = 50 * n * (n + 1)` XP in total, so each level needs
//! `100 * level` more XP than the one before it (level 1 at 100,
//! level 2 at 300, level 3 at 600, ...).

/// Snapshot of where a point total sits on the curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelProgress {
    pub level: u32,
    pub xp_into_level: i64,
    pub current_threshold: i64,
    pub next_threshold: i64,
    pub xp_to_next: i64,
}

/// Cumulative XP required to reach `level`.
fn threshold(level: u32) -> i64 {
    let level = level as i64;
    50 * level * (level + 1)
}

/// Deterministic, side-effect free and monotonic non-decreasing in
/// `points`. Negative inputs are clamped to zero.
pub fn level_progress(points: i64) -> LevelProgress {
    let points = points.max(0);
    let mut level = 0u32;
    while threshold(level + 1) <= points {
        level += 1;
    }
    let current_threshold = threshold(level);
    let next_threshold = threshold(level + 1);
    LevelProgress {
        level,
        xp_into_level: points - current_threshold,
        current_threshold,
        next_threshold,
        xp_to_next: next_threshold - points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_follow_documented_curve() {
        assert_eq!(level_progress(0).level, 0);
        assert_eq!(level_progress(99).level, 0);
        assert_eq!(level_progress(100).level, 1);
        assert_eq!(level_progress(299).level, 1);
        assert_eq!(level_progress(300).level, 2);
        assert_eq!(level_progress(600).level, 3);
    }

    #[test]
    fn progress_fields_are_consistent() {
        let progress = level_progress(350);
        assert_eq!(progress.level, 2);
        assert_eq!(progress.current_threshold, 300);
        assert_eq!(progress.next_threshold, 600);
        assert_eq!(progress.xp_into_level, 50);
        assert_eq!(progress.xp_to_next, 250);
        assert!(progress.xp_into_level >= 0);
        assert!(progress.xp_into_level < progress.next_threshold - progress.current_threshold);
    }

    #[test]
    fn monotonic_and_deterministic() {
        let mut previous = 0;
        for points in 0..5_000 {
            let progress = level_progress(points);
            assert!(progress.level >= previous, "level dipped at {points}");
            previous = progress.level;
            assert_eq!(progress, level_progress(points));
        }
    }

    #[test]
    fn negative_points_clamp_to_zero() {
        assert_eq!(level_progress(-50), level_progress(0));
    }
}
