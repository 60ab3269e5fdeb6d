//! Hero typewriter: types a text, pauses, deletes it, moves to the next.
//!
//! The host calls [`Typewriter::tick`], shows the returned text, and waits
//! `delay_ms` before ticking again.

/// Default hero texts, in display order.
pub const HERO_TEXTS: &[&str] = &[
    "Dhruv Vaishnav",
    "Critical Problem Thinker",
    "Future Tech Leader",
    "Aspiring World's Best",
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypewriterTiming {
    pub type_ms: f64,
    pub delete_ms: f64,
    /// Delay after the last character of a text has been typed.
    pub pause_ms: f64,
}

impl Default for TypewriterTiming {
    fn default() -> Self {
        Self {
            type_ms: 100.0,
            delete_ms: 50.0,
            pause_ms: 2000.0,
        }
    }
}

/// What to display now and how long to wait before the next tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TypewriterStep {
    pub text: String,
    pub delay_ms: f64,
}

#[derive(Debug, Clone)]
pub struct Typewriter {
    texts: Vec<Vec<char>>,
    timing: TypewriterTiming,
    text_index: usize,
    char_index: usize,
    deleting: bool,
}

impl Typewriter {
    pub fn new<I, S>(texts: I, timing: TypewriterTiming) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            texts: texts
                .into_iter()
                .map(|t| t.as_ref().chars().collect())
                .collect(),
            timing,
            text_index: 0,
            char_index: 0,
            deleting: false,
        }
    }

    /// The hero texts with the default timing.
    pub fn hero() -> Self {
        Self::new(HERO_TEXTS.iter().copied(), TypewriterTiming::default())
    }

    pub fn text_index(&self) -> usize {
        self.text_index
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting
    }

    /// Advances by one character.
    ///
    /// Typing shows one more character every `type_ms`; reaching the full
    /// text waits `pause_ms` and switches to deleting. Deleting removes one
    /// character every `delete_ms`; reaching the empty string moves on to
    /// the next text, wrapping around. With no texts the display stays empty.
    pub fn tick(&mut self) -> TypewriterStep {
        let Some(current) = self.texts.get(self.text_index) else {
            return TypewriterStep {
                text: String::new(),
                delay_ms: self.timing.pause_ms,
            };
        };
        let len = current.len();

        let shown = if self.deleting {
            self.char_index.saturating_sub(1)
        } else {
            (self.char_index + 1).min(len)
        };
        let text: String = current[..shown].iter().collect();
        self.char_index = shown;

        let mut delay_ms = if self.deleting {
            self.timing.delete_ms
        } else {
            self.timing.type_ms
        };
        if !self.deleting && self.char_index >= len {
            delay_ms = self.timing.pause_ms;
            self.deleting = true;
        } else if self.deleting && self.char_index == 0 {
            self.deleting = false;
            self.text_index = (self.text_index + 1) % self.texts.len();
        }

        TypewriterStep { text, delay_ms }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(tw: &mut Typewriter, n: usize) -> Vec<TypewriterStep> {
        (0..n).map(|_| tw.tick()).collect()
    }

    #[test]
    fn types_pauses_deletes_and_advances() {
        let mut tw = Typewriter::new(["abc", "de"], TypewriterTiming::default());
        let steps = run(&mut tw, 6);
        let shown: Vec<&str> = steps.iter().map(|s| s.text.as_str()).collect();
        let delays: Vec<f64> = steps.iter().map(|s| s.delay_ms).collect();
        assert_eq!(shown, ["a", "ab", "abc", "ab", "a", ""]);
        assert_eq!(delays, [100.0, 100.0, 2000.0, 50.0, 50.0, 50.0]);
        assert_eq!(tw.text_index(), 1);
        assert!(!tw.is_deleting());

        assert_eq!(tw.tick().text, "d");
    }

    #[test]
    fn texts_cycle() {
        let mut tw = Typewriter::new(["x", "y"], TypewriterTiming::default());
        let shown: Vec<String> = run(&mut tw, 6).into_iter().map(|s| s.text).collect();
        assert_eq!(shown, ["x", "", "y", "", "x", ""]);
    }

    #[test]
    fn multibyte_characters_are_typed_whole() {
        let mut tw = Typewriter::new(["∑μ"], TypewriterTiming::default());
        assert_eq!(tw.tick().text, "∑");
        assert_eq!(tw.tick().text, "∑μ");
    }

    #[test]
    fn hero_starts_with_the_name() {
        let mut tw = Typewriter::hero();
        let steps = run(&mut tw, "Dhruv Vaishnav".len());
        assert_eq!(steps.last().unwrap().text, "Dhruv Vaishnav");
        assert_eq!(steps.last().unwrap().delay_ms, 2000.0);
    }

    #[test]
    fn empty_list_stays_blank() {
        let mut tw = Typewriter::new(Vec::<String>::new(), TypewriterTiming::default());
        assert_eq!(tw.tick().text, "");
    }

    #[test]
    fn empty_text_does_not_stall() {
        let mut tw = Typewriter::new(["", "a"], TypewriterTiming::default());
        let shown: Vec<String> = run(&mut tw, 4).into_iter().map(|s| s.text).collect();
        assert_eq!(shown, ["", "", "a", ""]);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn display_is_always_a_prefix_of_the_current_text(
                texts in proptest::collection::vec("[a-z∑ ]{0,8}", 1..4),
                ticks in 1usize..80,
            ) {
                let mut tw = Typewriter::new(&texts, TypewriterTiming::default());
                for _ in 0..ticks {
                    let index = tw.text_index();
                    let step = tw.tick();
                    prop_assert!(texts[index].starts_with(&step.text));
                    prop_assert!([50.0, 100.0, 2000.0].contains(&step.delay_ms));
                }
            }
        }
    }
}
