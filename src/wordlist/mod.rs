use once_cell::sync::Lazy;
use rand::seq::IndexedRandom;
use std::path::Path;
use tokio::fs;

/// Words used when no word file is available
static DEFAULT_WORDS: Lazy<Vec<String>> = Lazy::new(|| {
    ["banana", "spaceship", "library", "piano"]
        .into_iter()
        .map(String::from)
        .collect()
});

/// Candidate secret words for game assignment. Read-only after load and
/// safely shared across all games. Guaranteed non-empty: an unreadable or
/// empty source falls back to the built-in default list.
pub struct WordList {
    words: Vec<String>,
}

impl WordList {
    /// Load the word list from a file, one word per line, blank lines skipped.
    /// Falls back to the defaults if the file cannot be read or yields nothing.
    pub async fn load<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path).await {
            Ok(content) => {
                let words: Vec<String> = content
                    .lines()
                    .map(|line| line.trim().to_string())
                    .filter(|word| !word.is_empty())
                    .collect();
                if words.is_empty() {
                    tracing::warn!(
                        "Word list at {} is empty, using default words",
                        path.as_ref().display()
                    );
                    Self::fallback()
                } else {
                    tracing::info!("Loaded {} candidate secret words", words.len());
                    Self { words }
                }
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to read word list at {}: {}. Using default words",
                    path.as_ref().display(),
                    e
                );
                Self::fallback()
            }
        }
    }

    /// The built-in default word list
    pub fn fallback() -> Self {
        Self {
            words: DEFAULT_WORDS.clone(),
        }
    }

    /// Build from an in-memory list; empty input falls back to the defaults
    pub fn from_words(words: Vec<String>) -> Self {
        let words: Vec<String> = words
            .into_iter()
            .map(|w| w.trim().to_string())
            .filter(|w| !w.is_empty())
            .collect();
        if words.is_empty() {
            Self::fallback()
        } else {
            Self { words }
        }
    }

    /// Draw one word uniformly at random
    pub fn pick(&self) -> &str {
        self.words
            .choose(&mut rand::rng())
            .map(String::as_str)
            .unwrap_or("banana")
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
