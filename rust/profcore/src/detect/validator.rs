//! Name Validator - "does this cell text look like a person?"
//!
//! Pure predicate applied to every cell the scanner proposes. Rules run in a
//! fixed order and short-circuit on the first rejection:
//!
//! | # | Rule                                   | Rejects            |
//! |---|----------------------------------------|--------------------|
//! | 1 | 3..=40 chars after trim                | "Jo", long prose   |
//! | 2 | no UI/structural vocabulary            | "Course Title"     |
//! | 3 | not ALL CAPS when longer than 5 chars  | "JOHN SMITH"       |
//! | 4 | no digits or markup punctuation        | "CSE 142"          |
//! | 5 | no comma                               | "Smith, John"      |
//! | 6 | at least one whitespace                | "Smith"            |
//! | 7 | matches the capitalized-name pattern   | "john smith"       |

use regex::Regex;
use std::sync::OnceLock;

pub const MIN_NAME_CHARS: usize = 3;
pub const MAX_NAME_CHARS: usize = 40;

/// Words that show up in schedule chrome but never inside a real name.
/// Matched as lowercase substrings.
pub const NOISE_WORDS: &[&str] = &[
    "instructor",
    "course",
    "credits",
    "schedule",
    "section",
    "click",
    "select",
    "search",
    "status",
    "enrollment",
    "syllabus",
    "time",
    "location",
    "building",
    "campus",
    "quarter",
    "waitlist",
    "lecture",
    "seminar",
    "details",
    "online",
    "hybrid",
    "tba",
    "announced",
    "session",
];

const FORBIDDEN_PUNCTUATION: &[char] = &[
    '!', '@', '#', '$', '%', '^', '&', '*', '(', ')', '+', '=', '[', ']', '{', '}', ';', '"',
    '\\', '|', '<', '>', '?', '/',
];

/// First word (optionally hyphenated), optional middle initial, then one or
/// more capitalized groups that may carry apostrophes, hyphens or periods.
const NAME_PATTERN: &str =
    r"^[A-Z][a-zA-Z']+(?:-[A-Z][a-zA-Z']+)?(?:\s+[A-Z]\.?)?(?:\s+[A-Z][a-zA-Z'.\-]+)+$";

fn name_regex() -> &'static Regex {
    static NAME_RE: OnceLock<Regex> = OnceLock::new();
    NAME_RE.get_or_init(|| Regex::new(NAME_PATTERN).expect("name pattern is a valid regex"))
}

/// Which rule rejected a text (or `Accepted`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameVerdict {
    Accepted,
    BadLength,
    NoiseWord,
    AllCaps,
    ForbiddenCharacter,
    Comma,
    SingleToken,
    PatternMismatch,
}

/// Run the rules and report the first failing one.
pub fn classify_name(text: &str) -> NameVerdict {
    let text = text.trim();

    let len = text.chars().count();
    if !(MIN_NAME_CHARS..=MAX_NAME_CHARS).contains(&len) {
        return NameVerdict::BadLength;
    }

    let lower = text.to_lowercase();
    if NOISE_WORDS.iter().any(|w| lower.contains(w)) {
        return NameVerdict::NoiseWord;
    }

    if len > 5 && text == text.to_uppercase() {
        return NameVerdict::AllCaps;
    }

    if text
        .chars()
        .any(|c| c.is_ascii_digit() || FORBIDDEN_PUNCTUATION.contains(&c))
    {
        return NameVerdict::ForbiddenCharacter;
    }

    if text.contains(',') {
        return NameVerdict::Comma;
    }

    if !text.chars().any(char::is_whitespace) {
        return NameVerdict::SingleToken;
    }

    if !name_regex().is_match(text) {
        return NameVerdict::PatternMismatch;
    }

    NameVerdict::Accepted
}

/// True when `text` plausibly names a person ("First [M.] Last").
pub fn is_plausible_name(text: &str) -> bool {
    classify_name(text) == NameVerdict::Accepted
}
