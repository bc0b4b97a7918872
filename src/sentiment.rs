use serde::{Deserialize, Serialize};

/// Discrete sentiment bucket derived from a model score.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLevel {
    Bullish,
    Neutral,
    Bearish,
}

impl SentimentLevel {
    pub fn label(&self) -> &'static str {
        match self {
            SentimentLevel::Bullish => "Bullish",
            SentimentLevel::Neutral => "Neutral",
            SentimentLevel::Bearish => "Bearish",
        }
    }

    pub fn color_class(&self) -> &'static str {
        match self {
            SentimentLevel::Bullish => "text-sentiment-positive",
            SentimentLevel::Neutral => "text-sentiment-neutral",
            SentimentLevel::Bearish => "text-sentiment-negative",
        }
    }

    pub fn bg_color_class(&self) -> &'static str {
        match self {
            SentimentLevel::Bullish => "bg-sentiment-positive/10 border-sentiment-positive/20",
            SentimentLevel::Neutral => "bg-sentiment-neutral/10 border-sentiment-neutral/20",
            SentimentLevel::Bearish => "bg-sentiment-negative/10 border-sentiment-negative/20",
        }
    }
}

/// Maps a bullish-probability score onto a discrete level.
///
/// Scores are clamped to [0, 1] before thresholding, so out-of-range model
/// outputs classify as the nearest valid extreme. NaN classifies as bearish.
pub fn classify(score: f64) -> SentimentLevel {
    let score = if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    };

    if score >= 0.7 {
        SentimentLevel::Bullish
    } else if score >= 0.4 {
        SentimentLevel::Neutral
    } else {
        SentimentLevel::Bearish
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_partition_the_score_range() {
        assert_eq!(classify(0.0), SentimentLevel::Bearish);
        assert_eq!(classify(0.39), SentimentLevel::Bearish);
        assert_eq!(classify(0.4), SentimentLevel::Neutral);
        assert_eq!(classify(0.69), SentimentLevel::Neutral);
        assert_eq!(classify(0.7), SentimentLevel::Bullish);
        assert_eq!(classify(1.0), SentimentLevel::Bullish);
    }

    #[test]
    fn out_of_range_scores_clamp_to_the_nearest_extreme() {
        assert_eq!(classify(-3.2), SentimentLevel::Bearish);
        assert_eq!(classify(1.8), SentimentLevel::Bullish);
        assert_eq!(classify(f64::NAN), SentimentLevel::Bearish);
    }

    #[test]
    fn display_metadata_matches_level() {
        assert_eq!(classify(0.9).label(), "Bullish");
        assert_eq!(classify(0.5).color_class(), "text-sentiment-neutral");
        assert_eq!(
            classify(0.1).bg_color_class(),
            "bg-sentiment-negative/10 border-sentiment-negative/20"
        );
    }
}
