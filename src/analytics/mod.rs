pub mod parlay;
pub mod segments;
pub mod settlement;

pub use parlay::{Parlay, ParlayKind, build_parlays};
pub use segments::{RoiCell, SummaryMetrics, roi_heatmap, summarize, top_segments};
pub use settlement::{resolve_ah_profit, settle_games};

/// Handicap-line band used to key the ROI heatmap. Bands follow the
/// performance export: the betted side's line, favorite-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LineBand {
    HeavyFavorite,
    Favorite,
    NearEven,
    Underdog,
    HeavyUnderdog,
}

impl LineBand {
    pub fn of(line: f64) -> LineBand {
        if line <= -1.5 {
            LineBand::HeavyFavorite
        } else if line <= -0.5 {
            LineBand::Favorite
        } else if line < 0.5 {
            LineBand::NearEven
        } else if line < 1.5 {
            LineBand::Underdog
        } else {
            LineBand::HeavyUnderdog
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LineBand::HeavyFavorite => "<= -1.5",
            LineBand::Favorite => "(-1.5, -0.5]",
            LineBand::NearEven => "(-0.5, +0.5)",
            LineBand::Underdog => "[+0.5, +1.5)",
            LineBand::HeavyUnderdog => ">= +1.5",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_bands() {
        assert_eq!(LineBand::of(-2.0), LineBand::HeavyFavorite);
        assert_eq!(LineBand::of(-1.5), LineBand::HeavyFavorite);
        assert_eq!(LineBand::of(-1.0), LineBand::Favorite);
        assert_eq!(LineBand::of(-0.5), LineBand::Favorite);
        assert_eq!(LineBand::of(-0.25), LineBand::NearEven);
        assert_eq!(LineBand::of(0.0), LineBand::NearEven);
        assert_eq!(LineBand::of(0.25), LineBand::NearEven);
        assert_eq!(LineBand::of(0.5), LineBand::Underdog);
        assert_eq!(LineBand::of(1.0), LineBand::Underdog);
        assert_eq!(LineBand::of(1.5), LineBand::HeavyUnderdog);
    }
}
