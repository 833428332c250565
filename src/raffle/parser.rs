//! Chat-log scraping: turns pasted dice-roll chatter into `CustomerRoll`s.
//!
//! Lines that do not look like a roll are dropped without complaint; chat
//! logs are mostly noise.

use super::models::CustomerRoll;
use regex::Regex;
use std::sync::OnceLock;
use tracing::trace;

// <name> <verb> [particle] <1-4 digits> <points marker>
const ROLL_LINE: &str = r"^(?P<name>.+?)\s*(?:\b(?i:rolls?|throws?)|掷|投|扔)\s*(?:出了|出|了|得|(?i:out|result))?\s*[:：]?\s*(?P<value>[0-9]{1,4})\s*(?:(?i:points?|pts)|点)";

// Echo of the dice command, e.g. "(max100)" or "（max 100）".
const MAX_ANNOTATION: &str = r"(?i)[(（]\s*max\s*[:：=]?\s*[0-9]";

const TAG_PREFIX: &str = r"^(?:[\[【(（<《「{][^\]】)）>》」}]*[\]】)）>》」}]\s*)+";

const EDGE_NOISE: &str = r"^[^\p{L}A-Za-z0-9_\- ]+|[^\p{L}A-Za-z0-9_\- ]+$";

fn roll_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(ROLL_LINE).expect("roll line pattern compiles"))
}

fn max_annotation() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(MAX_ANNOTATION).expect("max annotation pattern compiles"))
}

fn tag_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(TAG_PREFIX).expect("tag prefix pattern compiles"))
}

fn edge_noise() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EDGE_NOISE).expect("edge noise pattern compiles"))
}

/// Parse every recognizable roll line, in input order. Duplicates are kept.
pub fn parse(raw: &str) -> Vec<CustomerRoll> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(parse_line)
        .collect()
}

/// Parse a single (already trimmed) line.
pub fn parse_line(line: &str) -> Option<CustomerRoll> {
    if max_annotation().is_match(line) {
        trace!(line, "skipping dice command echo");
        return None;
    }

    let caps = roll_line().captures(line)?;
    let customer_id = clean_name(&caps["name"]);
    if customer_id.is_empty() {
        trace!(line, "roll line without a usable name");
        return None;
    }

    let roll_value = caps["value"].parse::<u32>().ok()?;
    Some(CustomerRoll {
        customer_id,
        roll_value,
    })
}

/// Strip guild/channel tags and stray punctuation around a display name.
pub fn clean_name(fragment: &str) -> String {
    let untagged = tag_prefix().replace(fragment.trim(), "");
    edge_noise().replace_all(&untagged, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &str) -> Vec<(String, u32)> {
        parse(raw)
            .into_iter()
            .map(|r| (r.customer_id, r.roll_value))
            .collect()
    }

    #[test]
    fn parses_tagged_and_plain_lines_in_order() {
        let raw = "[TagA] Alice rolls 672 points!\nBob rolls 127 points!";
        assert_eq!(
            pairs(raw),
            vec![("Alice".to_string(), 672), ("Bob".to_string(), 127)]
        );
    }

    #[test]
    fn drops_lines_with_max_annotation() {
        assert!(parse("Alice rolls 88 points (max100)").is_empty());
        assert!(parse("Alice rolls 88 points （Max 100）").is_empty());
    }

    #[test]
    fn ignores_noise_and_blank_lines() {
        let raw = "\n   \nhello everyone\nCarol: anyone here?\nDave rolls 5 points\n";
        assert_eq!(pairs(raw), vec![("Dave".to_string(), 5)]);
    }

    #[test]
    fn understands_chinese_verbs_and_markers() {
        let raw = "【公会】小明 掷出了 672 点\n(频道) 小红投出 15点\n阿强 扔了 9999 点";
        assert_eq!(
            pairs(raw),
            vec![
                ("小明".to_string(), 672),
                ("小红".to_string(), 15),
                ("阿强".to_string(), 9999),
            ]
        );
    }

    #[test]
    fn strips_repeated_tag_prefixes_and_edge_punctuation() {
        assert_eq!(clean_name("[EU] 【Guild】 ~Alice~:"), "Alice");
        assert_eq!(clean_name("  *Mary-Jane_2*  "), "Mary-Jane_2");
    }

    #[test]
    fn keeps_duplicate_rollers() {
        let raw = "Alice rolls 10 points\nAlice rolls 20 points";
        assert_eq!(
            pairs(raw),
            vec![("Alice".to_string(), 10), ("Alice".to_string(), 20)]
        );
    }

    #[test]
    fn rejects_five_digit_values() {
        assert!(parse("Eve rolls 12345 points").is_empty());
    }

    #[test]
    fn rejects_lines_whose_name_is_only_tags() {
        assert!(parse("[TagA] !! rolls 50 points").is_empty());
    }

    #[test]
    fn english_particles_and_case() {
        assert_eq!(
            pairs("Frank ROLLS out 42 Points\nGina throws result 7 pts"),
            vec![("Frank".to_string(), 42), ("Gina".to_string(), 7)]
        );
    }

    #[test]
    fn verbs_inside_words_are_not_rolls() {
        assert!(parse("Scroll 3 points").is_empty());
        assert!(parse("my payroll 1000 points").is_empty());
        assert!(parse("Throwback 12 pts").is_empty());
    }

    #[test]
    fn max_words_in_parentheses_are_not_dice_echoes() {
        assert_eq!(
            pairs("(Maxine) Bob rolls 5 points\nCarl rolls 127 points (Maxwell fan)"),
            vec![("Bob".to_string(), 5), ("Carl".to_string(), 127)]
        );
        assert!(parse("Alice rolls 88 points (max100)").is_empty());
        assert!(parse("Alice rolls 88 points （Max 100）").is_empty());
        assert!(parse("Alice rolls 88 points (max: 100)").is_empty());
    }

    #[test]
    fn parse_is_deterministic() {
        let raw = "[x] A rolls 1 points\nB rolls 2 points\nnoise";
        assert_eq!(parse(raw), parse(raw));
    }
}
