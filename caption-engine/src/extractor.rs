//! Turns raw model text into an ordered list of captions.
//!
//! Recognized ordinal markers at the start of a trimmed line:
//! - `1.`..`9.`, `1:`..`9:`, `1)`..`9)` and the same for `10`
//! - emoji keycaps `1️⃣`..`9️⃣` (with or without U+FE0F) and `🔟`
//!
//! Marker lines keep whatever follows the marker. Other lines are kept only
//! when they look like prose (more than three words), which drops preambles
//! such as "Sure!" or "Here you go:".

/// Emoji digits in caption order.
const EMOJI_MARKERS: [&str; 10] = [
    "1\u{fe0f}\u{20e3}",
    "2\u{fe0f}\u{20e3}",
    "3\u{fe0f}\u{20e3}",
    "4\u{fe0f}\u{20e3}",
    "5\u{fe0f}\u{20e3}",
    "6\u{fe0f}\u{20e3}",
    "7\u{fe0f}\u{20e3}",
    "8\u{fe0f}\u{20e3}",
    "9\u{fe0f}\u{20e3}",
    "\u{1f51f}",
];

const KEYCAP: char = '\u{20e3}';

/// Minimum word count for an unnumbered line to count as a caption.
const MIN_PROSE_WORDS: usize = 4;

/// Extracts captions from a model response, preserving order.
///
/// Never deduplicates and never pads; the result may hold fewer or more
/// than ten entries.
///
/// # Examples
/// ```
/// use caption_engine::extract_captions;
///
/// let text = "Sure!\n1. Coffee first, questions later\n2️⃣ Sunday mood\n🔟 The end";
/// assert_eq!(
///     extract_captions(text),
///     vec!["Coffee first, questions later", "Sunday mood", "The end"]
/// );
/// ```
pub fn extract_captions(response: &str) -> Vec<String> {
    after_output_marker(response)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| match strip_marker(line) {
            Some(rest) => {
                let caption = rest.trim();
                (!caption.is_empty()).then(|| caption.to_string())
            }
            None => (word_count(line) >= MIN_PROSE_WORDS).then(|| line.to_string()),
        })
        .collect()
}

/// Returns the remainder of `line` after a leading ordinal marker, if any.
pub fn strip_marker(line: &str) -> Option<&str> {
    for emoji in EMOJI_MARKERS {
        if let Some(rest) = line.strip_prefix(emoji) {
            return Some(rest);
        }
    }

    let mut chars = line.char_indices();
    let (_, first) = chars.next()?;
    let (second_at, second) = chars.next()?;

    // Keycap without the variation selector: `1⃣`.
    if ('1'..='9').contains(&first) && second == KEYCAP {
        return Some(&line[second_at + KEYCAP.len_utf8()..]);
    }

    if let Some(rest) = line.strip_prefix("10") {
        if let Some(after) = strip_punct(rest) {
            return Some(after);
        }
    }

    if ('1'..='9').contains(&first) {
        return strip_punct(&line[second_at..]);
    }

    None
}

fn strip_punct(s: &str) -> Option<&str> {
    s.strip_prefix(['.', ':', ')'])
}

/// Counts runs of word characters (alphanumeric or `_`).
fn word_count(line: &str) -> usize {
    line.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
        .count()
}

/// Some endpoints echo the prompt and then write an `Output:` line; only the
/// text after the last such line is the model's answer.
fn after_output_marker(text: &str) -> &str {
    let mut start = 0;
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let t = line.trim();
        if t == "Output" || t == "Output:" {
            start = offset + line.len();
        }
        offset += line.len();
    }
    &text[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_digit_markers() {
        assert_eq!(extract_captions("1. foo"), vec!["foo"]);
        assert_eq!(extract_captions("4: bar baz"), vec!["bar baz"]);
        assert_eq!(extract_captions("7) seven"), vec!["seven"]);
        assert_eq!(extract_captions("10. last one"), vec!["last one"]);
        assert_eq!(extract_captions("10)tight"), vec!["tight"]);
    }

    #[test]
    fn strips_emoji_markers() {
        assert_eq!(extract_captions("3️⃣ bar"), vec!["bar"]);
        assert_eq!(extract_captions("🔟 baz"), vec!["baz"]);
        assert_eq!(extract_captions("5\u{20e3} no selector"), vec!["no selector"]);
    }

    #[test]
    fn skips_markers_with_nothing_after_them() {
        assert!(extract_captions("1.\n2️⃣   \n🔟").is_empty());
    }

    #[test]
    fn unnumbered_lines_need_more_than_three_words() {
        let text = "Here you go:\n:\nSure!\nThis one has five words\nfour words are enough";
        assert_eq!(
            extract_captions(text),
            vec!["This one has five words", "four words are enough"]
        );
    }

    #[test]
    fn three_words_are_not_enough() {
        assert!(extract_captions("just three words").is_empty());
    }

    #[test]
    fn number_without_punctuation_is_not_a_marker() {
        // Falls back to the prose rule and is kept whole.
        assert_eq!(
            extract_captions("1 morning coffee is life"),
            vec!["1 morning coffee is life"]
        );
        assert!(extract_captions("12 cats").is_empty());
    }

    #[test]
    fn keeps_order_and_duplicates() {
        let text = "2. same\n1. same\n3. other";
        assert_eq!(extract_captions(text), vec!["same", "same", "other"]);
    }

    #[test]
    fn keeps_emphasis_and_quotes_verbatim() {
        let text = "1. \"I said what I said\"\n2. **Bold** and brash **too**\n3️⃣ “Curly”";
        assert_eq!(
            extract_captions(text),
            vec!["\"I said what I said\"", "**Bold** and brash **too**", "“Curly”"]
        );
    }

    #[test]
    fn drops_echoed_prompt_before_output_line() {
        let text = "Prompt:\nFormat:\n1️⃣ [first caption]\n2️⃣ [second caption]\nOutput:\n1️⃣ Real one\n2️⃣ Real two";
        assert_eq!(extract_captions(text), vec!["Real one", "Real two"]);
    }

    #[test]
    fn handles_crlf_and_indentation() {
        let text = "  1. alpha  \r\n\t2. beta\r\n";
        assert_eq!(extract_captions(text), vec!["alpha", "beta"]);
    }

    #[test]
    fn may_return_more_than_ten() {
        let text: String = (1..=9)
            .map(|i| format!("{i}. caption {i}\n"))
            .chain(std::iter::once("10. caption 10\n".to_string()))
            .chain(std::iter::once("Bonus caption that was not asked for\n".to_string()))
            .collect();
        assert_eq!(extract_captions(&text).len(), 11);
    }
}
