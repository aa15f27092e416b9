//! Markdown and emoji stripping for model output
//!
//! Models tend to answer with markdown decoration and emoji even when asked
//! for plain text. The blessing is shown and copied as plain text, so every
//! completion passes through [`sanitize`] before it is returned.

use once_cell::sync::Lazy;
use regex::Regex;

// Microblog answers sometimes carry `##topic##` lines (closed or unclosed)
static HASHTAG_LINE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[^\n]*(?:##[^#\n]+##|##[^#\s])[^\n]*(?:\n|$)").unwrap());

static BOLD_STAR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static BOLD_UNDERSCORE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"__(.+?)__").unwrap());

// The wrapped text may not start or end with whitespace, so `2 * 3 * 4` survives
static ITALIC_STAR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*([^*\s](?:[^*\n]*[^*\s])?)\*").unwrap());
static ITALIC_UNDERSCORE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_([^_\s](?:[^_\n]*[^_\s])?)_").unwrap());

static STRIKETHROUGH_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"~~(.+?)~~").unwrap());

// The space after the hashes is optional (`###春节`); a seventh `#` is not a heading
static HEADING_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*#{1,6}(?:[ \t]+|([^#\s]))").unwrap());
static TOPIC_MARKER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"##[^#\s][^#\n]*##").unwrap());

static IMAGE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"!\[[^\]\n]*\]\([^)\n]*\)").unwrap());
static LINK_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]\n]+)\]\([^)\n]*\)").unwrap());

static CODE_FENCE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```.*?```").unwrap());
static INLINE_CODE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`\n]+)`").unwrap());

static BLOCKQUOTE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[ \t]*(?:>[ \t]?)+").unwrap());
static LIST_MARKER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*(?:(?:[-*+]|\d+[.、])[ \t]+)+").unwrap());
// `1.步步高升` without the space, but not decimals like `1.5倍`
static TIGHT_ORDERED_MARKER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*\d+[.、]([^\d\s])").unwrap());
static HORIZONTAL_RULE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[ \t]*(?:(?:-[ \t]*){3,}|(?:\*[ \t]*){3,}|(?:_[ \t]*){3,})$").unwrap()
});

/// Emoji, pictograph and symbol blocks.
///
/// Stays clear of CJK blocks: ideographs, CJK punctuation (U+3000..U+303F)
/// and the enclosed ideographic supplement (U+1F200..U+1F2FF) are kept.
static EMOJI_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        "[",
        r"\x{1F000}-\x{1F1FF}", // mahjong, cards, enclosed alphanumerics, regional indicators
        r"\x{1F300}-\x{1F5FF}", // misc symbols and pictographs
        r"\x{1F600}-\x{1F64F}", // emoticons
        r"\x{1F680}-\x{1F6FF}", // transport and map
        r"\x{1F700}-\x{1F7FF}", // alchemical, geometric shapes extended
        r"\x{1F800}-\x{1F8FF}", // supplemental arrows-c
        r"\x{1F900}-\x{1F9FF}", // supplemental symbols and pictographs
        r"\x{1FA00}-\x{1FAFF}", // chess, symbols and pictographs extended-a
        r"\x{2300}-\x{23FF}",   // misc technical (⌛ ⏰)
        r"\x{2600}-\x{26FF}",   // misc symbols
        r"\x{2700}-\x{27BF}",   // dingbats
        r"\x{2B00}-\x{2BFF}",   // misc symbols and arrows (⭐)
        r"\x{FE00}-\x{FE0F}",   // variation selectors
        r"\x{200D}",            // zero width joiner
        r"\x{20E3}",            // combining keycap
        r"\x{E0020}-\x{E007F}", // tag characters
        "]",
    ))
    .unwrap()
});

static BLANK_LINES_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n[ \t]*\n(?:[ \t]*\n)+").unwrap());

/// Strip markdown decoration and emoji from a completion.
///
/// `is_microblog` additionally drops lines carrying `##topic##` markers.
/// The pass is repeated until the text stops changing; every step only
/// removes characters, so the loop terminates and the result is a fixed
/// point (`sanitize(sanitize(x)) == sanitize(x)`).
pub fn sanitize(text: &str, is_microblog: bool) -> String {
    let mut current = text.to_string();
    loop {
        let next = sanitize_pass(&current, is_microblog);
        if next == current {
            return next;
        }
        current = next;
    }
}

fn sanitize_pass(text: &str, is_microblog: bool) -> String {
    let mut s = text.to_string();

    if is_microblog {
        s = HASHTAG_LINE_REGEX.replace_all(&s, "").into_owned();
    }

    s = BOLD_STAR_REGEX.replace_all(&s, "${1}").into_owned();
    s = BOLD_UNDERSCORE_REGEX.replace_all(&s, "${1}").into_owned();

    s = ITALIC_STAR_REGEX.replace_all(&s, "${1}").into_owned();
    s = ITALIC_UNDERSCORE_REGEX.replace_all(&s, "${1}").into_owned();

    s = STRIKETHROUGH_REGEX.replace_all(&s, "${1}").into_owned();

    s = strip_headings(&s);

    s = IMAGE_REGEX.replace_all(&s, "").into_owned();
    s = LINK_REGEX.replace_all(&s, "${1}").into_owned();

    s = CODE_FENCE_REGEX.replace_all(&s, "").into_owned();
    s = INLINE_CODE_REGEX.replace_all(&s, "${1}").into_owned();

    s = strip_line_markers(&s);

    s = strip_emoji(&s);

    BLANK_LINES_REGEX.replace_all(&s, "\n\n").trim().to_string()
}

/// Leading `#` markers, except on lines carrying a closed `##topic##` marker
fn strip_headings(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            if TOPIC_MARKER_REGEX.is_match(line) {
                line.into()
            } else {
                HEADING_REGEX.replace(line, "${1}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Blockquotes, horizontal rules and list markers, one line at a time.
///
/// Rules are checked before list markers so `- - -` is dropped as a rule
/// instead of being peeled down to a lone dash.
fn strip_line_markers(text: &str) -> String {
    text.split('\n')
        .filter_map(|line| {
            let line = BLOCKQUOTE_REGEX.replace(line, "");
            if HORIZONTAL_RULE_REGEX.is_match(&line) {
                return None;
            }
            let line = LIST_MARKER_REGEX.replace(&line, "");
            Some(TIGHT_ORDERED_MARKER_REGEX.replace(&line, "${1}").into_owned())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn strip_emoji(text: &str) -> String {
    EMOJI_REGEX.replace_all(text, "").into_owned()
}
