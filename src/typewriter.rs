//! Typewriter word rotation.
//!
//! Cycles through a word list the way a hero heading does: type a word
//! character by character, hold it, delete it, rest, move on. The
//! original effect chained one-shot timers; here the machine keeps an
//! absolute deadline and is polled from the frame loop, so virtual time
//! drives it exactly like every other component.

/// Where the machine is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Appending one character per step.
    Typing,
    /// Word complete, waiting before deletion starts.
    Holding,
    /// Removing one character per step.
    Deleting,
    /// Word gone, waiting before the next word starts.
    Resting,
}

/// Configuration for a [`Typewriter`].
#[derive(Debug, Clone, Copy)]
pub struct TypewriterConfig {
    /// Seconds per typed character. Default: 0.08.
    pub type_speed: f32,
    /// Seconds per deleted character. Default: 0.05.
    pub delete_speed: f32,
    /// Seconds a completed word stays before deleting. Default: 2.0.
    pub hold_time: f32,
    /// Seconds between words. Default: 0.5.
    pub rest_time: f32,
    /// Wrap around after the last word. When false, the machine stops on
    /// the last fully-typed word. Default: true.
    pub looping: bool,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            type_speed: 0.08,
            delete_speed: 0.05,
            hold_time: 2.0,
            rest_time: 0.5,
            looping: true,
        }
    }
}

/// Word-rotation state machine driven by the frame clock.
#[derive(Debug)]
pub struct Typewriter {
    words: Vec<String>,
    config: TypewriterConfig,
    word_index: usize,
    typed_chars: usize,
    phase: Phase,
    next_step_at: f32,
    finished: bool,
}

impl Typewriter {
    /// Create a machine over the given words. An empty word list is
    /// permanently finished.
    pub fn new(words: Vec<String>, config: TypewriterConfig) -> Self {
        let finished = words.is_empty();
        Self {
            words,
            config,
            word_index: 0,
            typed_chars: 0,
            phase: Phase::Typing,
            next_step_at: 0.0,
            finished,
        }
    }

    /// Advance the machine to `now`. Returns `true` if the visible text
    /// changed.
    ///
    /// Catches up on every deadline passed since the last call, so a
    /// dropped frame never stalls the cycle.
    pub fn tick(&mut self, now: f32) -> bool {
        let before = (self.word_index, self.typed_chars);
        while !self.finished && now >= self.next_step_at {
            self.step();
        }
        (self.word_index, self.typed_chars) != before
    }

    /// The currently visible text.
    pub fn text(&self) -> String {
        self.current_word().chars().take(self.typed_chars).collect()
    }

    /// The word currently being cycled.
    pub fn current_word(&self) -> &str {
        self.words
            .get(self.word_index)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Current phase of the cycle.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether a non-looping machine has reached its final word.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn step(&mut self) {
        // Delays chain off the previous deadline so cadence stays exact
        // regardless of frame timing.
        match self.phase {
            Phase::Typing => self.step_typing(),
            Phase::Holding => {
                self.typed_chars = self.typed_chars.saturating_sub(1);
                if self.typed_chars == 0 {
                    self.advance_word();
                } else {
                    self.phase = Phase::Deleting;
                    self.defer(self.config.delete_speed);
                }
            }
            Phase::Deleting => {
                self.typed_chars = self.typed_chars.saturating_sub(1);
                if self.typed_chars == 0 {
                    self.advance_word();
                } else {
                    self.defer(self.config.delete_speed);
                }
            }
            Phase::Resting => {
                // The rest deadline doubles as the first keystroke of the
                // next word.
                self.phase = Phase::Typing;
                self.typed_chars = 0;
                self.step_typing();
            }
        }
    }

    fn step_typing(&mut self) {
        let word_len = self.current_word().chars().count();
        self.typed_chars = (self.typed_chars + 1).min(word_len);
        if self.typed_chars >= word_len {
            if !self.config.looping && self.word_index + 1 >= self.words.len() {
                self.finished = true;
                return;
            }
            self.phase = Phase::Holding;
            self.defer(self.config.hold_time);
        } else {
            self.defer(self.config.type_speed);
        }
    }

    fn advance_word(&mut self) {
        self.word_index = (self.word_index + 1) % self.words.len();
        self.phase = Phase::Resting;
        self.defer(self.config.rest_time);
    }

    fn defer(&mut self, delay: f32) {
        // A zero or negative speed would spin the catch-up loop forever
        self.next_step_at += delay.max(1e-3);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine(words: &[&str]) -> Typewriter {
        let config = TypewriterConfig {
            type_speed: 1.0,
            delete_speed: 1.0,
            hold_time: 5.0,
            rest_time: 2.0,
            looping: true,
        };
        Typewriter::new(words.iter().map(|w| w.to_string()).collect(), config)
    }

    #[test]
    fn test_types_word_progressively() {
        let mut tw = machine(&["Rust"]);

        tw.tick(0.0);
        assert_eq!(tw.text(), "R");
        tw.tick(1.0);
        assert_eq!(tw.text(), "Ru");
        tw.tick(2.0);
        assert_eq!(tw.text(), "Rus");
        tw.tick(3.0);
        assert_eq!(tw.text(), "Rust");
        assert_eq!(tw.phase(), Phase::Holding);
    }

    #[test]
    fn test_holds_then_deletes() {
        let mut tw = machine(&["ab"]);

        tw.tick(1.0); // "ab" typed at t=1, holding until t=6
        assert_eq!(tw.text(), "ab");

        tw.tick(5.9);
        assert_eq!(tw.text(), "ab");

        tw.tick(6.0); // first deletion
        assert_eq!(tw.text(), "a");
        assert_eq!(tw.phase(), Phase::Deleting);

        tw.tick(7.0); // empty, resting
        assert_eq!(tw.text(), "");
        assert_eq!(tw.phase(), Phase::Resting);
    }

    #[test]
    fn test_wraps_to_next_word() {
        let mut tw = machine(&["ab", "cd"]);

        // ab: typed by t=1, hold to 6, deleted by 7, rest to 9
        tw.tick(9.0);
        assert_eq!(tw.current_word(), "cd");
        assert_eq!(tw.text(), "c");

        // cd completes at t=10; cycle back around to ab eventually
        tw.tick(10.0);
        assert_eq!(tw.text(), "cd");
        tw.tick(18.0);
        assert_eq!(tw.current_word(), "ab");
    }

    #[test]
    fn test_catches_up_after_dropped_frames() {
        let mut fine = machine(&["abc"]);
        let mut coarse = machine(&["abc"]);

        for i in 0..30 {
            fine.tick(i as f32 * 0.25);
        }
        coarse.tick(29.0 * 0.25);

        assert_eq!(fine.text(), coarse.text());
        assert_eq!(fine.phase(), coarse.phase());
    }

    #[test]
    fn test_non_looping_stops_on_last_word() {
        let config = TypewriterConfig {
            type_speed: 1.0,
            delete_speed: 1.0,
            hold_time: 1.0,
            rest_time: 1.0,
            looping: false,
        };
        let mut tw = Typewriter::new(vec!["hi".to_string()], config);

        tw.tick(1.0);
        assert_eq!(tw.text(), "hi");
        assert!(tw.is_finished());

        // Stays put forever after
        tw.tick(100.0);
        assert_eq!(tw.text(), "hi");
    }

    #[test]
    fn test_empty_word_list_is_inert() {
        let mut tw = Typewriter::new(Vec::new(), TypewriterConfig::default());
        assert!(tw.is_finished());
        assert!(!tw.tick(10.0));
        assert_eq!(tw.text(), "");
    }
}
