//! Pluralization
//!
//! A small rule table covering the names that show up as binding scopes:
//! irregulars, uncountables, and the usual English suffix rules. No regex,
//! lowercase-in lowercase-out. Used for the nested-presentation plural
//! fallback and for form route naming.

const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("woman", "women"),
    ("child", "children"),
    ("foot", "feet"),
    ("tooth", "teeth"),
    ("goose", "geese"),
    ("mouse", "mice"),
    ("ox", "oxen"),
    ("datum", "data"),
    ("medium", "media"),
    ("analysis", "analyses"),
    ("criterion", "criteria"),
];

const UNCOUNTABLE: &[&str] = &[
    "equipment", "information", "money", "news", "series", "sheep", "species", "fish", "deer",
];

const ES_ONLY_O: &[&str] = &["echo", "hero", "potato", "tomato", "torpedo", "veto"];

fn is_vowel(c: u8) -> bool {
    matches!(c, b'a' | b'e' | b'i' | b'o' | b'u')
}

/// Pluralize an English noun
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }
    if UNCOUNTABLE.contains(&word) {
        return word.to_string();
    }
    if let Some(&(_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == word) {
        return plural.to_string();
    }

    let bytes = word.as_bytes();

    // consonant + y -> ies
    if bytes.len() >= 2 && bytes[bytes.len() - 1] == b'y' && !is_vowel(bytes[bytes.len() - 2]) {
        return format!("{}ies", &word[..word.len() - 1]);
    }

    // knife -> knives, leaf -> leaves
    if let Some(stem) = word.strip_suffix("fe") {
        return format!("{}ves", stem);
    }
    if let Some(stem) = word.strip_suffix('f') {
        return format!("{}ves", stem);
    }

    // sibilants take es
    if word.ends_with('s')
        || word.ends_with('x')
        || word.ends_with('z')
        || word.ends_with("ch")
        || word.ends_with("sh")
    {
        return format!("{}es", word);
    }

    if ES_ONLY_O.contains(&word) {
        return format!("{}es", word);
    }

    format!("{}s", word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular() {
        assert_eq!(pluralize("post"), "posts");
        assert_eq!(pluralize("comment"), "comments");
        assert_eq!(pluralize("user"), "users");
    }

    #[test]
    fn test_sibilants() {
        assert_eq!(pluralize("class"), "classes");
        assert_eq!(pluralize("box"), "boxes");
        assert_eq!(pluralize("match"), "matches");
        assert_eq!(pluralize("dish"), "dishes");
    }

    #[test]
    fn test_consonant_y() {
        assert_eq!(pluralize("category"), "categories");
        assert_eq!(pluralize("reply"), "replies");
        assert_eq!(pluralize("day"), "days");
    }

    #[test]
    fn test_f_endings() {
        assert_eq!(pluralize("leaf"), "leaves");
        assert_eq!(pluralize("knife"), "knives");
    }

    #[test]
    fn test_irregular() {
        assert_eq!(pluralize("person"), "people");
        assert_eq!(pluralize("child"), "children");
    }

    #[test]
    fn test_uncountable() {
        assert_eq!(pluralize("news"), "news");
        assert_eq!(pluralize("equipment"), "equipment");
    }

    #[test]
    fn test_o_endings() {
        assert_eq!(pluralize("hero"), "heroes");
        assert_eq!(pluralize("photo"), "photos");
    }
}
