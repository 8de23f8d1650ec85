use std::collections::HashSet;

use regex::Regex;

use crate::models::Heading;
use crate::tags::TagIndex;

/// Extracts the content-bearing tokens of a query: lowercase word tokens with
/// function words removed. This stopword classifier stands in for a
/// part-of-speech tagger; what survives is close to the noun/verb skeleton of
/// the query. Surface forms are preserved, no lemmatization.
pub fn content_tokens(query: &str) -> Vec<String> {
    // Hyphenated compounds stay whole so tags like "check-in" and "carry-on"
    // can hit.
    let token_re =
        Regex::new(r"[a-z0-9]+(?:-[a-z0-9]+)*").unwrap_or_else(|_| Regex::new("^").unwrap());
    let stopwords = function_words();

    let lowered = query.to_lowercase();
    token_re
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .filter(|token| !stopwords.contains(token.as_str()))
        .collect()
}

/// Resolves a free-text query to the set of canonical headings it could
/// concern. Tests every ordered 1- and 2-token arrangement of the content
/// tokens against each heading's tag set; first match wins per heading.
/// An empty result is the "unknown topic" signal, not an error.
pub fn match_headings(query: &str, tags: &TagIndex) -> HashSet<Heading> {
    let tokens = content_tokens(query);
    let mut matched = HashSet::new();
    if tokens.is_empty() {
        return matched;
    }

    // Full permutations rather than a sliding window: "weight baggage" must
    // still reach the "baggage weight" tag. Capped at length 2 to match the
    // 1-2 word tag vocabulary, so this stays O(k^2) in the token count.
    let mut phrases: Vec<String> = tokens.clone();
    if tokens.len() >= 2 {
        for (i, first) in tokens.iter().enumerate() {
            for (j, second) in tokens.iter().enumerate() {
                if i != j {
                    phrases.push(format!("{first} {second}"));
                }
            }
        }
    }

    for phrase in &phrases {
        for heading in Heading::ALL {
            if matched.contains(&heading) {
                continue;
            }
            if tags.contains(heading, phrase) {
                matched.insert(heading);
            }
        }
        if matched.len() == Heading::ALL.len() {
            break;
        }
    }

    matched
}

fn function_words() -> HashSet<&'static str> {
    [
        // determiners, pronouns
        "a", "an", "the", "this", "that", "these", "those", "i", "you", "we", "they", "he",
        "she", "it", "me", "us", "them", "my", "our", "your", "his", "her", "their", "its",
        "mine", "yours", "myself", "anyone", "someone", "something", "anything",
        // wh-words
        "what", "when", "where", "which", "who", "whom", "whose", "why", "how",
        // auxiliaries and copulas
        "is", "are", "was", "were", "am", "be", "been", "being", "do", "does", "did", "done",
        "has", "have", "had", "having", "will", "would", "shall", "should", "can", "could",
        "might", "must",
        // prepositions, conjunctions, particles
        "and", "or", "but", "if", "then", "else", "so", "not", "no", "nor", "of", "in", "on",
        "at", "to", "from", "with", "by", "as", "for", "about", "off", "up", "out", "into",
        "over", "under", "per",
        // filler
        "there", "here", "any", "some", "all", "also", "just", "only", "very", "too",
        "please", "kindly", "tell", "give", "know", "need", "want", "much", "many",
    ]
    .into_iter()
    .collect()
}
