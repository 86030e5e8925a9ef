//! Tally for chat guessing games.
//!
//! Collects one numeric guess per chatter and scores the round against a
//! revealed target, either "closest wins" or "closest without going over".

use std::collections::HashMap;

/// Guess collection for one round.
#[derive(Debug)]
pub struct GuessTally {
    /// When true, a chatter's newest guess replaces any earlier one;
    /// otherwise only the first guess counts.
    use_latest_reply: bool,
    guesses: HashMap<String, i64>,
}

/// Summary statistics over the collected guesses.
#[derive(Debug, Clone, PartialEq)]
pub struct GuessStats {
    pub count: usize,
    pub min: i64,
    pub max: i64,
    pub mean: f64,
    /// Sample standard deviation; `None` with fewer than two guesses.
    pub stdev: Option<f64>,
    pub median: f64,
}

impl GuessTally {
    /// New tally. `use_latest_reply` controls whether repeat guesses
    /// overwrite.
    #[must_use]
    pub fn new(use_latest_reply: bool) -> Self {
        Self {
            use_latest_reply,
            guesses: HashMap::new(),
        }
    }

    /// Record a guess.
    pub fn accept_guess(&mut self, name: &str, value: i64) {
        if self.use_latest_reply {
            self.guesses.insert(name.to_owned(), value);
        } else {
            self.guesses.entry(name.to_owned()).or_insert(value);
        }
    }

    /// Number of chatters with a recorded guess.
    #[must_use]
    pub fn num_replies(&self) -> usize {
        self.guesses.len()
    }

    /// Score the round: the winning value(s) and every chatter who guessed
    /// one of them. Empty when nobody guessed.
    ///
    /// With `closest_without_going_over`, the winning value is the largest
    /// guess not exceeding the target; when every guess overshoots, the
    /// smallest guess wins. Otherwise the winners are everyone at minimum
    /// absolute distance, ties included.
    #[must_use]
    pub fn score(&self, target: f64, closest_without_going_over: bool) -> (Vec<String>, Vec<i64>) {
        let mut values: Vec<i64> = self.guesses.values().copied().collect();
        if values.is_empty() {
            return (Vec::new(), Vec::new());
        }
        values.sort_unstable();
        values.dedup();

        let winning: Vec<i64> = if closest_without_going_over {
            let not_over = values
                .iter()
                .rev()
                .find(|&&v| (v as f64) <= target)
                .copied();
            vec![not_over.unwrap_or(values[0])]
        } else {
            let min_diff = values
                .iter()
                .map(|&v| (v as f64 - target).abs())
                .fold(f64::INFINITY, f64::min);
            values
                .iter()
                .copied()
                .filter(|&v| ((v as f64 - target).abs() - min_diff).abs() < f64::EPSILON)
                .collect()
        };

        let mut names: Vec<String> = self
            .guesses
            .iter()
            .filter(|(_, value)| winning.contains(value))
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();

        (names, winning)
    }

    /// Summary statistics, or `None` when nobody guessed.
    #[must_use]
    pub fn stats(&self) -> Option<GuessStats> {
        let mut values: Vec<i64> = self.guesses.values().copied().collect();
        if values.is_empty() {
            return None;
        }
        values.sort_unstable();

        let count = values.len();
        let mean = values.iter().map(|&v| v as f64).sum::<f64>() / count as f64;

        let stdev = if count > 1 {
            let variance = values
                .iter()
                .map(|&v| (v as f64 - mean).powi(2))
                .sum::<f64>()
                / (count - 1) as f64;
            Some(variance.sqrt())
        } else {
            None
        };

        let median = if count % 2 == 1 {
            values[count / 2] as f64
        } else {
            (values[count / 2 - 1] as f64 + values[count / 2] as f64) / 2.0
        };

        Some(GuessStats {
            count,
            min: values[0],
            max: values[count - 1],
            mean,
            stdev,
            median,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn latest_reply_overwrites() {
        let mut tally = GuessTally::new(true);
        tally.accept_guess("ana", 10);
        tally.accept_guess("ana", 20);

        assert_eq!(tally.num_replies(), 1);
        assert_eq!(tally.score(20.0, false).1, vec![20]);
    }

    #[test]
    fn first_reply_sticks_when_latest_disabled() {
        let mut tally = GuessTally::new(false);
        tally.accept_guess("ana", 10);
        tally.accept_guess("ana", 20);

        assert_eq!(tally.score(20.0, false).1, vec![10]);
    }

    #[test]
    fn closest_wins_with_ties() {
        let mut tally = GuessTally::new(true);
        tally.accept_guess("ana", 8);
        tally.accept_guess("ben", 12);
        tally.accept_guess("cal", 30);

        let (names, values) = tally.score(10.0, false);
        assert_eq!(names, vec!["ana".to_owned(), "ben".to_owned()]);
        assert_eq!(values, vec![8, 12]);
    }

    #[test]
    fn closest_without_going_over_picks_largest_not_over() {
        let mut tally = GuessTally::new(true);
        tally.accept_guess("ana", 8);
        tally.accept_guess("ben", 12);
        tally.accept_guess("cal", 9);

        let (names, values) = tally.score(10.0, true);
        assert_eq!(names, vec!["cal".to_owned()]);
        assert_eq!(values, vec![9]);
    }

    #[test]
    fn all_overshooting_falls_back_to_smallest() {
        let mut tally = GuessTally::new(true);
        tally.accept_guess("ana", 50);
        tally.accept_guess("ben", 60);

        let (names, values) = tally.score(10.0, true);
        assert_eq!(names, vec!["ana".to_owned()]);
        assert_eq!(values, vec![50]);
    }

    #[test]
    fn empty_round_scores_nobody() {
        let tally = GuessTally::new(true);
        let (names, values) = tally.score(10.0, false);
        assert!(names.is_empty());
        assert!(values.is_empty());
        assert!(tally.stats().is_none());
    }

    #[test]
    fn stats_summarise_the_round() {
        let mut tally = GuessTally::new(true);
        tally.accept_guess("ana", 2);
        tally.accept_guess("ben", 4);
        tally.accept_guess("cal", 6);
        tally.accept_guess("dot", 8);

        let stats = tally.stats().unwrap();
        assert_eq!(stats.count, 4);
        assert_eq!(stats.min, 2);
        assert_eq!(stats.max, 8);
        assert!((stats.mean - 5.0).abs() < f64::EPSILON);
        assert!((stats.median - 5.0).abs() < f64::EPSILON);
        let stdev = stats.stdev.unwrap();
        assert!((stdev - 2.581_988_897_471_611).abs() < 1e-9);
    }

    #[test]
    fn single_guess_has_no_stdev() {
        let mut tally = GuessTally::new(true);
        tally.accept_guess("ana", 5);

        let stats = tally.stats().unwrap();
        assert_eq!(stats.count, 1);
        assert!(stats.stdev.is_none());
        assert!((stats.median - 5.0).abs() < f64::EPSILON);
    }
}
