//! Scroll-triggered reveal state machine.
//!
//! Each observed target sits in one of two states: pending or revealed.
//! The first intersection report at or above the configured threshold
//! flips it to revealed, observation for that target stops, and no later
//! report can flip it back. Different reveal styles share the same
//! machine; the style only selects the visual treatment applied by the
//! presentation layer.

/// Visual treatment applied when a target reveals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealStyle {
    /// Fade in while translating up.
    FadeUp,
    /// Fade in while translating from the left.
    FadeLeft,
    /// Fade in while translating from the right.
    FadeRight,
    /// Fade in while scaling up from slightly shrunk.
    Scale,
    /// Children fade up one after another.
    Stagger,
}

impl RevealStyle {
    /// Extra delay for the nth child of a staggered group, in seconds.
    ///
    /// Non-staggered styles reveal all content together.
    pub fn child_delay(&self, child_index: usize) -> f32 {
        match self {
            RevealStyle::Stagger => 0.1 * (child_index + 1).min(5) as f32,
            _ => 0.0,
        }
    }
}

/// Options for a [`RevealObserver`].
#[derive(Debug, Clone, Copy)]
pub struct RevealOptions {
    /// Minimum visible-area fraction required to reveal. Default: 0.1.
    pub threshold: f32,
    /// Bottom margin in pixels subtracted from the viewport before
    /// intersection is computed. Default: 50.0.
    pub bottom_margin: f32,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            bottom_margin: 50.0,
        }
    }
}

/// Handle for one observed target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RevealId(usize);

#[derive(Debug)]
struct RevealTarget {
    style: RevealStyle,
    revealed: bool,
}

/// Watches targets for viewport intersection and latches their reveal.
#[derive(Debug)]
pub struct RevealObserver {
    options: RevealOptions,
    targets: Vec<RevealTarget>,
}

impl RevealObserver {
    /// Create an observer with the given options.
    pub fn new(options: RevealOptions) -> Self {
        Self {
            options,
            targets: Vec::new(),
        }
    }

    /// Register a target for observation. Targets start pending.
    pub fn observe(&mut self, style: RevealStyle) -> RevealId {
        self.targets.push(RevealTarget {
            style,
            revealed: false,
        });
        RevealId(self.targets.len() - 1)
    }

    /// Register a batch of targets sharing one style.
    pub fn observe_all(&mut self, style: RevealStyle, count: usize) -> Vec<RevealId> {
        (0..count).map(|_| self.observe(style)).collect()
    }

    /// Report an intersection sample for a target.
    ///
    /// Returns `true` when this report transitions the target to
    /// revealed. A revealed target ignores all further reports, so the
    /// transition fires at most once per target.
    pub fn on_intersection(&mut self, id: RevealId, visible_fraction: f32) -> bool {
        let Some(target) = self.targets.get_mut(id.0) else {
            return false;
        };
        if target.revealed || visible_fraction < self.options.threshold {
            return false;
        }
        target.revealed = true;
        true
    }

    /// Whether a target has revealed.
    pub fn is_revealed(&self, id: RevealId) -> bool {
        self.targets.get(id.0).map(|t| t.revealed).unwrap_or(false)
    }

    /// Whether a target is still waiting for intersection reports.
    pub fn is_observing(&self, id: RevealId) -> bool {
        self.targets.get(id.0).map(|t| !t.revealed).unwrap_or(false)
    }

    /// The style registered for a target.
    pub fn style(&self, id: RevealId) -> Option<RevealStyle> {
        self.targets.get(id.0).map(|t| t.style)
    }

    /// Number of targets still pending.
    pub fn pending_count(&self) -> usize {
        self.targets.iter().filter(|t| !t.revealed).count()
    }

    /// The configured options.
    pub fn options(&self) -> RevealOptions {
        self.options
    }
}
