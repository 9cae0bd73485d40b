use std::collections::HashSet;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z][a-z]+(?:[\s&&[^\r\n]]+[A-Z][a-z]+)+").unwrap());
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\w.-]+@[\w.-]+\.\w+").unwrap());
static WEBSITE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:https?://)?(?:www\.)?[\w.]+(?:\.[\w.]+)+(?:/[\w./?%&=-]*)?").unwrap()
});
static SOCIAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:https?://)?(?:www\.)?linkedin\.com/in/[\w-]+/?").unwrap()
});
static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(&title_pattern()).unwrap());

/// Role vocabulary. Matched case-insensitively; repeats collapse to one entry.
pub const TITLE_KEYWORDS: &[&str] = &[
    "CEO",
    "CTO",
    "CFO",
    "Director",
    "Manager",
    "Head",
    "Lead",
    "Senior",
    "Junior",
    "Analyst",
    "Consultant",
    "Advisor",
    "Specialist",
    "Officer",
    "Coordinator",
    "Executive",
    "President",
    "Vice President",
    "VP",
    "MD",
    "Managing Director",
    "Chief",
    "Partner",
    "Principal",
    "Associate",
    "Assistant",
    "Representative",
    "Administrator",
    "Supervisor",
];

/// Lowercase markers of an organisational entity, matched as substrings of a line.
pub const ORG_KEYWORDS: &[&str] = &[
    "fund",
    "pension",
    "investment",
    "management",
    "ltd",
    "inc",
    "ag",
    "sa",
];

/// The six field categories a contact block is scanned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    CompanyName,
    ContactName,
    JobTitle,
    Email,
    Website,
    SocialProfile,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::CompanyName,
        Field::ContactName,
        Field::JobTitle,
        Field::Email,
        Field::Website,
        Field::SocialProfile,
    ];
}

/// Byte range of the first match for `field` in `text`, in document order.
pub fn locate(field: Field, text: &str) -> Option<Range<usize>> {
    match field {
        Field::CompanyName => organization_line(text),
        Field::ContactName => first(&NAME_RE, text),
        Field::JobTitle => first(&TITLE_RE, text),
        Field::Email => first(&EMAIL_RE, text),
        Field::Website => first(&WEBSITE_RE, text),
        Field::SocialProfile => first(&SOCIAL_RE, text),
    }
}

/// First matched value for `field`, trimmed. `None` when nothing matches.
pub fn recognize(field: Field, text: &str) -> Option<&str> {
    locate(field, text)
        .map(|r| text[r].trim())
        .filter(|v| !v.is_empty())
}

/// Every email span in `text`, used to keep addresses opaque to the other recognizers.
pub fn email_spans(text: &str) -> Vec<Range<usize>> {
    EMAIL_RE.find_iter(text).map(|m| m.range()).collect()
}

fn first(re: &Regex, text: &str) -> Option<Range<usize>> {
    re.find(text).map(|m| m.range())
}

/// Range of the first line containing an organisation keyword, line terminator excluded.
fn organization_line(text: &str) -> Option<Range<usize>> {
    let mut start = 0;
    for raw in text.split_inclusive('\n') {
        let line = raw.trim_end_matches(['\n', '\r']);
        let lower = line.to_lowercase();
        if ORG_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
            return Some(start..start + line.len());
        }
        start += raw.len();
    }
    None
}

/// Alternation over the deduplicated vocabulary, longest keyword first so that
/// "Managing Director" wins over "Director" at the same position.
fn title_pattern() -> String {
    let mut seen = HashSet::new();
    let mut words: Vec<&str> = TITLE_KEYWORDS
        .iter()
        .copied()
        .filter(|w| seen.insert(w.to_lowercase()))
        .collect();
    words.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    let alternatives: Vec<String> = words.iter().map(|w| regex::escape(w)).collect();
    format!("(?i)(?:{})", alternatives.join("|"))
}
