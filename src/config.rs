//! Card configuration. Everything is a fixed constant by default; with the
//! `serde_json` feature a JS caller may override any subset of fields.

#[cfg(feature = "serde")]
use serde::Deserialize;

use crate::error::CardError;

pub const DEFAULT_TOTAL_CANDLES: u32 = 5;
pub const DEFAULT_TOTAL_BALLOONS: u32 = 5;
/// Delay between automatic candle lights while celebrating.
pub const DEFAULT_CELEBRATION_INTERVAL_MS: i32 = 500;
pub const DEFAULT_CONFETTI_PIECES: u32 = 5000;
/// Upper bound for either row; each item is a DOM node.
pub const MAX_ITEMS: u32 = 64;

pub const CANDLE_COLORS: &[&str] = &["#FF5733", "#FFBD33", "#DBFF33", "#75FF33", "#33FF57"];
pub const BALLOON_COLORS: &[&str] = &["#FF5733", "#33C1FF", "#8C33FF", "#FF33B4", "#FF33C1"];
pub const CONFETTI_COLORS: &[&str] = &[
    "#FF5733", "#FFD700", "#32CD32", "#1E90FF", "#FF69B4", "#FF4500", "#DA70D6",
];
/// Unlit candles and popped balloons.
pub const INACTIVE_COLOR: &str = "#D1D5DB";

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct CardConfig {
    pub total_candles: u32,
    pub total_balloons: u32,
    pub celebration_interval_ms: i32,
    pub confetti_pieces: u32,
    pub candle_colors: Vec<String>,
    pub balloon_colors: Vec<String>,
    pub confetti_colors: Vec<String>,
    pub inactive_color: String,
    pub title: String,
    pub recipient: String,
    pub date_line: String,
}

impl Default for CardConfig {
    fn default() -> Self {
        let owned = |colors: &[&str]| colors.iter().map(|c| c.to_string()).collect();
        Self {
            total_candles: DEFAULT_TOTAL_CANDLES,
            total_balloons: DEFAULT_TOTAL_BALLOONS,
            celebration_interval_ms: DEFAULT_CELEBRATION_INTERVAL_MS,
            confetti_pieces: DEFAULT_CONFETTI_PIECES,
            candle_colors: owned(CANDLE_COLORS),
            balloon_colors: owned(BALLOON_COLORS),
            confetti_colors: owned(CONFETTI_COLORS),
            inactive_color: INACTIVE_COLOR.to_string(),
            title: "Happy 28th Birthday!".to_string(),
            recipient: "DANISH".to_string(),
            date_line: "February 16th".to_string(),
        }
    }
}

impl CardConfig {
    /// Parse a JSON object of overrides; missing fields keep their defaults.
    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, CardError> {
        let cfg: CardConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Palettes are indexed modulo their length and the interval feeds
    /// `setInterval`, so neither may be empty / non-positive. Rows need at
    /// least one item, otherwise confetti would show before any click.
    pub fn validate(&self) -> Result<(), CardError> {
        for (name, total) in [
            ("totalCandles", self.total_candles),
            ("totalBalloons", self.total_balloons),
        ] {
            if !(1..=MAX_ITEMS).contains(&total) {
                return Err(CardError::InvalidConfig(format!(
                    "{name} must be between 1 and {MAX_ITEMS}, got {total}"
                )));
            }
        }
        if self.celebration_interval_ms <= 0 {
            return Err(CardError::InvalidConfig(format!(
                "celebrationIntervalMs must be positive, got {}",
                self.celebration_interval_ms
            )));
        }
        for (name, palette) in [
            ("candleColors", &self.candle_colors),
            ("balloonColors", &self.balloon_colors),
            ("confettiColors", &self.confetti_colors),
        ] {
            if palette.is_empty() {
                return Err(CardError::InvalidConfig(format!("{name} must not be empty")));
            }
        }
        Ok(())
    }

    pub fn candle_color(&self, index: u32) -> &str {
        &self.candle_colors[index as usize % self.candle_colors.len()]
    }

    pub fn balloon_color(&self, index: u32) -> &str {
        &self.balloon_colors[index as usize % self.balloon_colors.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = CardConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.total_candles, 5);
        assert_eq!(cfg.total_balloons, 5);
        assert_eq!(cfg.celebration_interval_ms, 500);
        assert_eq!(cfg.confetti_colors.len(), 7);
    }

    #[test]
    fn palette_wraps_around() {
        let cfg = CardConfig {
            total_candles: 7,
            ..CardConfig::default()
        };
        assert_eq!(cfg.candle_color(0), "#FF5733");
        assert_eq!(cfg.candle_color(5), "#FF5733");
        assert_eq!(cfg.balloon_color(6), "#33C1FF");
    }

    #[test]
    fn rejects_empty_palette_and_zero_interval() {
        let cfg = CardConfig {
            balloon_colors: Vec::new(),
            ..CardConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(CardError::InvalidConfig(_))));

        let cfg = CardConfig {
            celebration_interval_ms: 0,
            ..CardConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(CardError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_empty_or_oversized_rows() {
        for (candles, balloons) in [(0, 5), (5, 0), (0, 0), (MAX_ITEMS + 1, 5), (5, u32::MAX)] {
            let cfg = CardConfig {
                total_candles: candles,
                total_balloons: balloons,
                ..CardConfig::default()
            };
            assert!(
                matches!(cfg.validate(), Err(CardError::InvalidConfig(_))),
                "{candles}/{balloons} accepted"
            );
        }
        let cfg = CardConfig {
            total_candles: 1,
            total_balloons: MAX_ITEMS,
            ..CardConfig::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn zero_totals_in_json_are_rejected() {
        assert!(matches!(
            CardConfig::from_json(r#"{"totalCandles": 0, "totalBalloons": 0}"#),
            Err(CardError::InvalidConfig(_))
        ));
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn json_overrides_merge_onto_defaults() {
        let cfg = CardConfig::from_json(r#"{"totalCandles": 3, "recipient": "SAM"}"#).unwrap();
        assert_eq!(cfg.total_candles, 3);
        assert_eq!(cfg.recipient, "SAM");
        assert_eq!(cfg.total_balloons, 5);
        assert_eq!(cfg.title, "Happy 28th Birthday!");
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn json_errors_surface() {
        assert!(matches!(CardConfig::from_json("{not json"), Err(CardError::Json(_))));
        assert!(matches!(
            CardConfig::from_json(r#"{"confettiColors": []}"#),
            Err(CardError::InvalidConfig(_))
        ));
    }
}
