//! Localized strings, grouped by topic
//!
//! Topics are named `namespace:topic` (e.g. `gridclasskey:default`). A topic
//! has to be loaded before its entries become visible to lookups.

use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    topics: HashMap<String, BTreeMap<String, String>>,
    loaded: Vec<String>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a topic's entries available for loading
    pub fn add_topic(&mut self, topic: &str, entries: impl IntoIterator<Item = (String, String)>) {
        self.topics
            .entry(normalize_topic(topic))
            .or_default()
            .extend(entries);
    }

    /// Activate a topic. Returns false if the topic is unknown.
    pub fn load(&mut self, topic: &str) -> bool {
        let topic = normalize_topic(topic);
        if !self.topics.contains_key(&topic) {
            return false;
        }
        if !self.loaded.contains(&topic) {
            self.loaded.push(topic);
        }
        true
    }

    pub fn is_loaded(&self, topic: &str) -> bool {
        self.loaded.contains(&normalize_topic(topic))
    }

    /// Look up an entry across loaded topics; later loads win.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.loaded
            .iter()
            .rev()
            .filter_map(|topic| self.topics.get(topic))
            .find_map(|entries| entries.get(key))
            .map(|s| s.as_str())
    }
}

/// `namespace` alone means `namespace:default`
fn normalize_topic(topic: &str) -> String {
    if topic.contains(':') {
        topic.to_string()
    } else {
        format!("{}:default", topic)
    }
}
