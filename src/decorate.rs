//! Cosmetic decoration applied to a quote before transmission.

use rand::Rng;

/// One in this many posts goes out festive.
const FESTIVE_ODDS: u32 = 201;

/// Marker token wrapped around ordinary announcements.
const MARKER: &str = "sergeSnerge";

/// Marker token wrapped around festive announcements.
const FESTIVE_MARKER: &str = "[UwU]";

/// Apply the festive letter mutation.
///
/// The `"ove"` substitution must run before the single-letter ones;
/// otherwise its own output would be mutated again.
#[must_use]
pub fn owo_magic(text: &str) -> String {
    text.replace("ove", "wuw")
        .replace('R', "W")
        .replace('r', "w")
        .replace('L', "W")
        .replace('l', "w")
}

/// Wrap a quote in announcement markers, festive or not.
///
/// Pure function of the text and the branch; [`decorate`] supplies the
/// random draw.
#[must_use]
pub fn decorate_with(text: &str, festive: bool) -> String {
    if festive {
        format!("{FESTIVE_MARKER} {} {FESTIVE_MARKER}", owo_magic(text))
    } else {
        format!("{MARKER} {text} {MARKER}")
    }
}

/// Draw the festive coin: true once in 201 draws.
pub fn festive_roll<R: Rng>(rng: &mut R) -> bool {
    rng.gen_range(0..FESTIVE_ODDS) == 0
}

/// Decorate a quote for transmission, drawing the festive coin from `rng`.
pub fn decorate<R: Rng>(text: &str, rng: &mut R) -> String {
    decorate_with(text, festive_roll(rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn owo_substring_runs_before_single_letters() {
        // "ove" -> "wuw" first gives "Lwuw"; then L -> W gives "Wwuw".
        assert_eq!(owo_magic("Love"), "Wwuw");
    }

    #[test]
    fn owo_replaces_each_letter_case() {
        assert_eq!(owo_magic("Really loud LLAMA roar"), "Weawwy woud WWAMA woaw");
    }

    #[test]
    fn owo_leaves_unaffected_text_alone() {
        assert_eq!(owo_magic("sixty watts"), "sixty watts");
    }

    #[test]
    fn plain_decoration_wraps_unmutated_text() {
        assert_eq!(
            decorate_with("Love the hedge", false),
            "sergeSnerge Love the hedge sergeSnerge"
        );
    }

    #[test]
    fn festive_decoration_wraps_mutated_text() {
        assert_eq!(decorate_with("Love", true), "[UwU] Wwuw [UwU]");
    }

    #[test]
    fn decorate_is_plain_far_more_often_than_festive() {
        let mut rng = StdRng::seed_from_u64(42);
        let festive = (0..1000)
            .filter(|_| decorate("quote", &mut rng).starts_with(FESTIVE_MARKER))
            .count();
        // 1/201 odds: ~5 expected out of 1000, allow generous slack.
        assert!(festive < 30, "festive came up {festive} times in 1000");
    }
}
