//! Quote production: source seam, bounded-retry generator, corpus source.

use crate::config::LengthRange;
use crate::error::{BotError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;

/// Hard ceiling on generation attempts per quote.
const MAX_ATTEMPTS: u32 = 100;

/// Returned when no qualifying quote comes back within the attempt budget.
pub const FALLBACK_QUOTE: &str = "I don't like coffee.";

/// A text generator. Implementations aim for at least `min_length`
/// characters but guarantee no upper bound, may come back shorter, and
/// never fail.
pub trait QuoteSource: Send + Sync {
    /// Produce one statement of roughly `min_length` characters or more.
    fn statement(&self, min_length: usize) -> String;
}

/// One quote, produced per post and consumed immediately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    /// Quote text.
    pub text: String,
    /// Length in characters.
    pub length: usize,
}

impl Quote {
    fn new(text: String) -> Self {
        let length = text.chars().count();
        Self { text, length }
    }
}

/// Applies the bounded-retry acceptance policy over a [`QuoteSource`].
pub struct QuoteGenerator {
    source: Arc<dyn QuoteSource>,
}

impl QuoteGenerator {
    /// Create a generator over the given source.
    #[must_use]
    pub fn new(source: Arc<dyn QuoteSource>) -> Self {
        Self { source }
    }

    /// Produce a quote whose length is strictly inside `bounds`.
    ///
    /// Asks the source up to 100 times and accepts the first statement with
    /// `min < len < max`. Exhausting the budget yields [`FALLBACK_QUOTE`];
    /// this is a normal outcome, not an error, so `produce` always returns
    /// a value.
    #[must_use]
    pub fn produce(&self, bounds: LengthRange) -> Quote {
        for _ in 0..MAX_ATTEMPTS {
            let wisdom = self.source.statement(bounds.min);
            let len = wisdom.chars().count();
            if len > bounds.min && len < bounds.max {
                return Quote::new(wisdom);
            }
        }

        tracing::debug!("quote budget exhausted, using fallback");
        Quote::new(FALLBACK_QUOTE.to_owned())
    }
}

/// File-backed quote source: samples stored lines uniformly.
///
/// Satisfies the [`QuoteSource`] contract only; sampled lines carry no
/// length guarantee, so the generator's acceptance policy still applies.
pub struct CorpusQuoteSource {
    entries: Vec<String>,
    rng: Mutex<StdRng>,
}

impl CorpusQuoteSource {
    /// Load a corpus from a file with one quote per line. Blank lines and
    /// `#` comments are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or holds no quotes.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| BotError::Corpus(format!("failed to read {}: {e}", path.display())))?;
        let entries: Vec<String> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_owned)
            .collect();

        if entries.is_empty() {
            return Err(BotError::Corpus(format!(
                "no quotes found in {}",
                path.display()
            )));
        }

        tracing::info!(count = entries.len(), "loaded quote corpus");
        Ok(Self {
            entries,
            rng: Mutex::new(StdRng::from_entropy()),
        })
    }

    #[cfg(test)]
    fn from_entries(entries: Vec<String>, seed: u64) -> Self {
        Self {
            entries,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl QuoteSource for CorpusQuoteSource {
    fn statement(&self, _min_length: usize) -> String {
        let index = match self.rng.lock() {
            Ok(mut rng) => rng.gen_range(0..self.entries.len()),
            Err(_) => 0,
        };
        self.entries[index].clone()
    }
}
