//! Lexicon-based sentiment scoring

use reddit_research_domain::{Sentiment, SentimentAnalyzer};
use vader_sentiment::SentimentIntensityAnalyzer;

/// Sentiment scorer backed by the VADER lexicon.
///
/// Polarity is VADER's compound score; subjectivity is the proportion of the
/// text VADER does not classify as neutral.
#[derive(Debug, Clone, Copy, Default)]
pub struct VaderSentiment;

impl SentimentAnalyzer for VaderSentiment {
    fn score(&self, text: &str) -> Sentiment {
        // The analyzer borrows its lexicon, so it cannot be stored in the
        // struct; construction per call is cheap at polling cadence.
        let analyzer = SentimentIntensityAnalyzer::new();
        let scores = analyzer.polarity_scores(text);

        let polarity = scores.get("compound").copied().unwrap_or(0.0);
        let neutral = scores.get("neu").copied().unwrap_or(1.0);

        Sentiment {
            polarity: polarity.clamp(-1.0, 1.0),
            subjectivity: (1.0 - neutral).clamp(0.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_text_scores_positive_polarity() {
        let sentiment = VaderSentiment.score("This is a great and wonderful idea, I love it!");
        assert!(sentiment.polarity > 0.0);
    }

    #[test]
    fn negative_text_scores_negative_polarity() {
        let sentiment = VaderSentiment.score("This is terrible, awful, and I hate it.");
        assert!(sentiment.polarity < 0.0);
    }

    #[test]
    fn scores_stay_within_bounds() {
        for text in [
            "",
            "neutral factual statement about hardware",
            "AMAZING!!! best thing ever!!!",
            "horrible horrible horrible",
        ] {
            let sentiment = VaderSentiment.score(text);
            assert!((-1.0..=1.0).contains(&sentiment.polarity));
            assert!((0.0..=1.0).contains(&sentiment.subjectivity));
        }
    }

    #[test]
    fn scoring_is_deterministic() {
        let first = VaderSentiment.score("I really like this phone");
        let second = VaderSentiment.score("I really like this phone");
        assert_eq!(first, second);
    }
}
