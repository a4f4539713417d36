//! Text normalization shared by the catalog builder and the ranking index.

pub const MAX_KEYWORDS: usize = 10;
const MIN_KEYWORD_LEN: usize = 3;
const MIN_TOKEN_LEN: usize = 2;
const ALIAS_PHRASE_WORDS: usize = 3;

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "been", "but", "by", "can", "for", "from", "has",
    "have", "in", "into", "is", "it", "its", "of", "on", "or", "that", "the", "their", "them",
    "then", "these", "this", "those", "to", "was", "were", "which", "will", "with", "you", "your",
];

pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}

/// Lowercase and replace every non-alphanumeric character with a space.
pub fn normalize(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect()
}

/// Ranking tokenizer: normalized words longer than one character.
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split_whitespace()
        .filter(|t| t.chars().count() >= MIN_TOKEN_LEN)
        .map(str::to_string)
        .collect()
}

/// Up to ten distinct, non-stopword tokens of `name` and `description`
/// in first-seen order.
pub fn extract_keywords(name: &str, description: &str) -> Vec<String> {
    let text = normalize(&format!("{name} {description}"));
    let mut keywords: Vec<String> = Vec::new();

    for token in text.split_whitespace() {
        if keywords.len() >= MAX_KEYWORDS {
            break;
        }
        if token.chars().count() < MIN_KEYWORD_LEN || is_stopword(token) {
            continue;
        }
        if !keywords.iter().any(|k| k == token) {
            keywords.push(token.to_string());
        }
    }

    keywords
}

/// `github_create_issue` -> `Github Create Issue`, `listPullRequests` -> `List Pull Requests`.
pub fn display_name(name: &str) -> String {
    let mut spaced = String::with_capacity(name.len() + 8);
    let mut prev: Option<char> = None;

    for ch in name.chars() {
        if ch == '_' || ch == '-' {
            spaced.push(' ');
            prev = None;
            continue;
        }
        if ch.is_uppercase() && prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit()) {
            spaced.push(' ');
        }
        spaced.push(ch);
        prev = Some(ch);
    }

    spaced
        .split_whitespace()
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Human-friendly variants: the spaced name, then the opening words of the
/// description when it has at least three.
pub fn generate_aliases(name: &str, description: &str) -> Vec<String> {
    let mut aliases = vec![name.replace('_', " ")];

    let words: Vec<&str> = description
        .split_whitespace()
        .take(ALIAS_PHRASE_WORDS)
        .collect();
    if words.len() == ALIAS_PHRASE_WORDS {
        let phrase = words.join(" ").to_lowercase();
        if !aliases.contains(&phrase) {
            aliases.push(phrase);
        }
    }

    aliases
}
