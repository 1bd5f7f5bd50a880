//! Keyword retrieval over the record set.
//!
//! Two matching behaviors, one per caller: `retrieve` feeds the RAG prompt
//! (record tags matched as substrings of the cleaned query) and `search`
//! backs the standalone search endpoint (query matched against a per-record
//! haystack).

use std::collections::HashSet;

use crate::record::{Directory, Record};

/// Fixed stop words stripped from queries before tag matching.
const STOP_WORDS: [&str; 8] = ["a", "for", "is", "in", "of", "the", "my", "i"];

/// Lowercase a query, drop stop words, and rejoin with single spaces.
fn clean_query(query: &str) -> String {
    query
        .to_lowercase()
        .split_whitespace()
        .filter(|word| !STOP_WORDS.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}

impl Directory {
    /// Retrieve records relevant to a free-text query.
    ///
    /// A record matches when any of its keyword tags occurs as a substring
    /// of the cleaned query, or its name or specialty does. Duplicates are
    /// suppressed and results keep dataset order. An empty cleaned query
    /// yields an empty result.
    pub fn retrieve(&self, query: &str) -> Vec<&Record> {
        let cleaned = clean_query(query);
        if cleaned.is_empty() {
            return Vec::new();
        }

        let mut seen: HashSet<u32> = HashSet::new();
        let mut matches = Vec::new();
        for record in self.records() {
            let tag_hit = record
                .keywords
                .iter()
                .any(|tag| cleaned.contains(&tag.to_lowercase()));
            let field_hit = cleaned.contains(&record.name.to_lowercase())
                || cleaned.contains(&record.specialty.to_lowercase());
            if (tag_hit || field_hit) && seen.insert(record.id) {
                matches.push(record);
            }
        }
        matches
    }

    /// Free-text containment search over all record fields.
    ///
    /// The trimmed, lowercased keyword is matched against a haystack of
    /// name, specialty, city, hospital, and tags. An empty keyword yields
    /// an empty result.
    pub fn search(&self, keyword: &str) -> Vec<&Record> {
        let needle = keyword.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.records()
            .iter()
            .filter(|record| {
                let haystack = format!(
                    "{} {} {} {} {}",
                    record.name,
                    record.specialty,
                    record.city,
                    record.hospital,
                    record.keywords.join(" ")
                )
                .to_lowercase();
                haystack.contains(&needle)
            })
            .collect()
    }
}
