//! Free text to token config
//!
//! Pure and total: every input maps to a usable [`TokenConfig`], falling
//! back to `AxisToken` / `AXIS` when nothing meaningful is left.

use axis_types::TokenConfig;

/// Articles and prepositions ignored when deriving a config
const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "about", "above", "across", "after", "against", "along", "among",
    "around", "at", "before", "behind", "below", "beneath", "beside", "between", "beyond", "by",
    "during", "for", "from", "in", "inside", "into", "near", "of", "on", "onto", "over", "past",
    "through", "to", "toward", "towards", "under", "upon", "with", "within", "without",
];

const NAME_WORDS: usize = 3;
const ACRONYM_WORDS: usize = 3;
const MIN_ACRONYM_LEN: usize = 3;
const PREFIX_TICKER_LEN: usize = 4;

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.iter().any(|s| s.eq_ignore_ascii_case(word))
}

/// Whitespace-normalized words stripped to ASCII alphanumerics, with
/// punctuation-only tokens and stop words dropped
pub fn meaningful_words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|token| {
            token
                .chars()
                .filter(char::is_ascii_alphanumeric)
                .collect::<String>()
        })
        .filter(|word| !word.is_empty() && !is_stop_word(word))
        .collect()
}

/// Derive a token config from a free-text description
pub fn derive_token_config(text: &str) -> TokenConfig {
    let words = meaningful_words(text);
    if words.is_empty() {
        return TokenConfig::fallback();
    }

    let name = words
        .iter()
        .take(NAME_WORDS)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");

    TokenConfig::from_parts_or_fallback(&name, &derive_ticker(&words))
}

fn derive_ticker(words: &[String]) -> String {
    let prefix = |word: &str| {
        word.chars()
            .take(PREFIX_TICKER_LEN)
            .collect::<String>()
            .to_ascii_uppercase()
    };

    match words {
        [] => String::new(),
        [only] => prefix(only.as_str()),
        [first, ..] => {
            let acronym: String = words
                .iter()
                .take(ACRONYM_WORDS)
                .filter_map(|w| w.chars().next())
                .map(|c| c.to_ascii_uppercase())
                .collect();
            if acronym.len() < MIN_ACRONYM_LEN {
                prefix(first.as_str())
            } else {
                acronym
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axis_types::{MAX_NAME_LEN, MAX_TICKER_LEN};

    #[test]
    fn test_meme_coin_example() {
        let config = derive_token_config("A meme coin about cats on Bitcoin");
        assert_eq!(config.name(), "meme coin cats");
        assert_eq!(config.ticker(), "MCC");
    }

    #[test]
    fn test_empty_input_falls_back() {
        assert_eq!(derive_token_config(""), TokenConfig::fallback());
        assert_eq!(derive_token_config("   \t\n "), TokenConfig::fallback());
    }

    #[test]
    fn test_only_stop_words_or_punctuation_falls_back() {
        let fallback = TokenConfig::fallback();
        assert_eq!(derive_token_config("the of a on"), fallback);
        assert_eq!(derive_token_config("!!! ... ???"), fallback);
        assert_eq!(derive_token_config("The, of; A!"), fallback);
    }

    #[test]
    fn test_stop_words_are_case_insensitive() {
        let config = derive_token_config("THE Moon ABOUT Rockets");
        assert_eq!(config.name(), "Moon Rockets");
        // two words give a two-letter acronym, so the first word's prefix wins
        assert_eq!(config.ticker(), "MOON");
    }

    #[test]
    fn test_single_word_uses_prefix() {
        let config = derive_token_config("Orbital");
        assert_eq!(config.name(), "Orbital");
        assert_eq!(config.ticker(), "ORBI");

        assert_eq!(derive_token_config("ox").ticker(), "OX");
    }

    #[test]
    fn test_punctuation_is_stripped_per_token() {
        let config = derive_token_config("Doge's   moon-shot, (v2)");
        assert_eq!(config.name(), "Doges moonshot v2");
        assert_eq!(config.ticker(), "DMV");
    }

    #[test]
    fn test_long_words_truncate_name() {
        let config = derive_token_config("supercalifragilistic expialidocious tokens");
        assert_eq!(config.name().len(), MAX_NAME_LEN);
        assert_eq!(config.name(), "supercalifragilistic exp");
        assert_eq!(config.ticker(), "SET");
    }

    #[test]
    fn test_bounds_hold_for_varied_inputs() {
        let long = "z".repeat(200);
        let inputs = [
            "",
            "a",
            "A meme coin about cats on Bitcoin",
            "🚀🚀🚀 to the moon",
            "über café naïve",
            "x y",
            "1 2 3 4 5 6 7 8 9",
            "    lots     of     spaces    between    words   ",
            "the the the",
            "ALLCAPS SHOUTING TOKEN NAME HERE",
            "dog-coin",
            long.as_str(),
        ];

        for input in inputs {
            let config = derive_token_config(input);
            let ticker = config.ticker();
            assert!(
                !ticker.is_empty() && ticker.len() <= MAX_TICKER_LEN,
                "bad ticker {:?} for {:?}",
                ticker,
                input
            );
            assert!(ticker.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
            assert!(config.name().len() <= MAX_NAME_LEN, "long name for {:?}", input);
            assert!(!config.name().is_empty());
        }
    }

    #[test]
    fn test_derivation_is_deterministic() {
        for input in ["A meme coin about cats on Bitcoin", "", "Orbital", "x y"] {
            assert_eq!(derive_token_config(input), derive_token_config(input));
        }
    }

    #[test]
    fn test_meaningful_words() {
        assert_eq!(
            meaningful_words("A meme coin about cats on Bitcoin"),
            vec!["meme", "coin", "cats", "Bitcoin"]
        );
        assert!(is_stop_word("ABOUT"));
        assert!(!is_stop_word("cats"));
    }
}
