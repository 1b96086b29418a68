use std::fmt;

use crate::application::errors::ParseError;

/// A player's position on the leaderboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Standing {
    pub rank: u32,
    pub points: u64,
}

impl Standing {
    pub fn new(rank: u32, points: u64) -> Self {
        Self { rank, points }
    }

    /// Build a standing from the raw text shown on the leaderboard.
    /// Points may carry thousands separators (`1,234`).
    pub fn parse(rank: &str, points: &str) -> Result<Self, ParseError> {
        let rank = rank
            .trim()
            .parse::<u32>()
            .map_err(|_| ParseError::Rank(rank.to_string()))?;

        let digits: String = points.trim().chars().filter(|c| *c != ',').collect();
        if digits.is_empty() {
            return Err(ParseError::Points(points.to_string()));
        }
        let points = digits
            .parse::<u64>()
            .map_err(|_| ParseError::Points(points.to_string()))?;

        Ok(Self::new(rank, points))
    }

    pub fn points_display(&self) -> String {
        format_points(self.points)
    }
}

impl fmt::Display for Standing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ranking={}, points={}", self.rank, self.points_display())
    }
}

/// Render points the way Steam does, e.g. `1234567` -> `1,234,567`
pub fn format_points(points: u64) -> String {
    let digits = points.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Transition between the last known standing and the current one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandingChange {
    pub previous: Option<Standing>,
    pub current: Standing,
}

impl StandingChange {
    pub fn new(previous: Option<Standing>, current: Standing) -> Self {
        Self { previous, current }
    }

    /// Positive when the player climbed (rank number went down)
    pub fn rank_delta(&self) -> i64 {
        match self.previous {
            Some(prev) => i64::from(prev.rank) - i64::from(self.current.rank),
            None => 0,
        }
    }

    pub fn points_delta(&self) -> i64 {
        match self.previous {
            Some(prev) => self.current.points as i64 - prev.points as i64,
            None => 0,
        }
    }

    pub fn is_change(&self) -> bool {
        self.previous != Some(self.current)
    }

    pub fn is_first_sighting(&self) -> bool {
        self.previous.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_separators() {
        let s = Standing::parse("42", "1,234,567").unwrap();
        assert_eq!(s, Standing::new(42, 1_234_567));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(
            Standing::parse("#4", "10"),
            Err(ParseError::Rank("#4".to_string()))
        );
        assert_eq!(
            Standing::parse("4", ","),
            Err(ParseError::Points(",".to_string()))
        );
    }

    #[test]
    fn test_format_points() {
        assert_eq!(format_points(0), "0");
        assert_eq!(format_points(999), "999");
        assert_eq!(format_points(1000), "1,000");
        assert_eq!(format_points(123456), "123,456");
        assert_eq!(format_points(1234567), "1,234,567");
    }

    #[test]
    fn test_display() {
        assert_eq!(Standing::new(7, 12500).to_string(), "ranking=7, points=12,500");
    }

    #[test]
    fn test_change_deltas() {
        let change = StandingChange::new(Some(Standing::new(10, 900)), Standing::new(7, 1200));
        assert_eq!(change.rank_delta(), 3);
        assert_eq!(change.points_delta(), 300);
        assert!(change.is_change());

        let slip = StandingChange::new(Some(Standing::new(7, 1200)), Standing::new(12, 1100));
        assert_eq!(slip.rank_delta(), -5);
        assert_eq!(slip.points_delta(), -100);
    }

    #[test]
    fn test_same_standing_is_not_a_change() {
        let s = Standing::new(3, 50);
        assert!(!StandingChange::new(Some(s), s).is_change());
        assert!(StandingChange::new(None, s).is_change());
        assert!(StandingChange::new(None, s).is_first_sighting());
    }
}
