//! Page-transition overlay and navigation intercept.
//!
//! A full-screen overlay masks page loads: activating an outbound link
//! covers the screen, the navigation itself happens after a fixed delay,
//! and the next page fades the overlay back out. The deferred navigation
//! is timeout-driven and not cancellable, so even when reduced-motion
//! settings skip the fade the navigation still happens on schedule.
//!
//! Fragment links, `mailto:` links, and links opening a new tab are never
//! intercepted.

/// Overlay visibility state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlayState {
    /// Fully transparent and inactive.
    Hidden,
    /// Fully opaque, masking the page.
    Covering,
    /// Animating from hidden toward covering.
    FadingIn { started: f32, duration: f32 },
    /// Animating from covering toward hidden.
    FadingOut { started: f32, duration: f32 },
}

/// Configuration for a [`TransitionOverlay`].
#[derive(Debug, Clone, Copy)]
pub struct OverlayConfig {
    /// Seconds between link activation and the deferred navigation.
    /// Default: 0.6.
    pub navigation_delay: f32,
    /// Default fade duration in seconds. Default: 0.4.
    pub fade_duration: f32,
    /// Skip fade animations (reduced motion). Navigation timing is
    /// unaffected. Default: false.
    pub reduced_motion: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            navigation_delay: 0.6,
            fade_duration: 0.4,
            reduced_motion: false,
        }
    }
}

/// What to do with an activated link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterceptDecision {
    /// Let the host handle the activation untouched.
    PassThrough,
    /// The overlay took over; navigation fires after the configured delay.
    Deferred,
}

#[derive(Debug, Clone)]
struct PendingNavigation {
    href: String,
    due_at: f32,
}

/// Full-screen transition overlay with deferred navigation.
#[derive(Debug)]
pub struct TransitionOverlay {
    config: OverlayConfig,
    state: OverlayState,
    pending: Option<PendingNavigation>,
}

impl TransitionOverlay {
    /// Create an overlay. It starts covering, matching a fresh page load
    /// that reveals its content after the first fade-out.
    pub fn new(config: OverlayConfig) -> Self {
        Self {
            config,
            state: OverlayState::Covering,
            pending: None,
        }
    }

    /// Current state, resolving any finished fade first.
    pub fn state(&mut self, now: f32) -> OverlayState {
        self.settle(now);
        self.state
    }

    /// Current opacity in [0, 1].
    pub fn opacity(&mut self, now: f32) -> f32 {
        self.settle(now);
        match self.state {
            OverlayState::Hidden => 0.0,
            OverlayState::Covering => 1.0,
            OverlayState::FadingIn { started, duration } => {
                ((now - started) / duration).clamp(0.0, 1.0)
            }
            OverlayState::FadingOut { started, duration } => {
                1.0 - ((now - started) / duration).clamp(0.0, 1.0)
            }
        }
    }

    /// Jump straight to the covering state.
    pub fn show_covering(&mut self) {
        self.state = OverlayState::Covering;
    }

    /// Start fading toward covering. With reduced motion the overlay
    /// covers immediately.
    pub fn fade_in(&mut self, now: f32, duration: f32) {
        self.state = if self.config.reduced_motion || duration <= 0.0 {
            OverlayState::Covering
        } else {
            OverlayState::FadingIn {
                started: now,
                duration,
            }
        };
    }

    /// Start fading toward hidden. With reduced motion the overlay hides
    /// immediately.
    pub fn fade_out(&mut self, now: f32, duration: f32) {
        self.state = if self.config.reduced_motion || duration <= 0.0 {
            OverlayState::Hidden
        } else {
            OverlayState::FadingOut {
                started: now,
                duration,
            }
        };
    }

    /// Handle an activated link.
    ///
    /// Same-document navigations are deferred: the overlay starts
    /// covering and the navigation is scheduled `navigation_delay`
    /// seconds out. Fragment links, `mailto:` links, and new-tab targets
    /// pass through untouched.
    pub fn intercept(&mut self, href: &str, opens_new_tab: bool, now: f32) -> InterceptDecision {
        if href.is_empty() || href.starts_with('#') || href.starts_with("mailto:") || opens_new_tab
        {
            return InterceptDecision::PassThrough;
        }

        self.fade_in(now, self.config.fade_duration);
        self.pending = Some(PendingNavigation {
            href: href.to_string(),
            due_at: now + self.config.navigation_delay,
        });
        InterceptDecision::Deferred
    }

    /// The href of the navigation waiting to fire, if any.
    pub fn pending_href(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.href.as_str())
    }

    /// Take the deferred navigation once its deadline has passed.
    ///
    /// Returns `None` until `navigation_delay` has elapsed since the
    /// intercept. The pending navigation cannot be cancelled; it is only
    /// consumed by this call.
    pub fn due_navigation(&mut self, now: f32) -> Option<String> {
        match &self.pending {
            Some(p) if now >= p.due_at => self.pending.take().map(|p| p.href),
            _ => None,
        }
    }

    fn settle(&mut self, now: f32) {
        match self.state {
            OverlayState::FadingIn { started, duration } if now >= started + duration => {
                self.state = OverlayState::Covering;
            }
            OverlayState::FadingOut { started, duration } if now >= started + duration => {
                self.state = OverlayState::Hidden;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlay() -> TransitionOverlay {
        TransitionOverlay::new(OverlayConfig::default())
    }

    #[test]
    fn test_starts_covering_then_reveals() {
        let mut o = overlay();
        assert_eq!(o.state(0.0), OverlayState::Covering);
        assert_eq!(o.opacity(0.0), 1.0);

        o.fade_out(0.1, 0.4);
        assert!(o.opacity(0.3) < 1.0);
        assert!(o.opacity(0.3) > 0.0);
        assert_eq!(o.state(0.6), OverlayState::Hidden);
        assert_eq!(o.opacity(0.6), 0.0);
    }

    #[test]
    fn test_fragment_mailto_and_new_tab_pass_through() {
        let mut o = overlay();
        o.fade_out(0.0, 0.0);

        assert_eq!(o.intercept("#team", false, 1.0), InterceptDecision::PassThrough);
        assert_eq!(
            o.intercept("mailto:hello@example.org", false, 1.0),
            InterceptDecision::PassThrough
        );
        assert_eq!(
            o.intercept("/projects.html", true, 1.0),
            InterceptDecision::PassThrough
        );
        assert_eq!(o.intercept("", false, 1.0), InterceptDecision::PassThrough);

        assert!(o.pending_href().is_none());
        assert_eq!(o.state(1.0), OverlayState::Hidden);
    }

    #[test]
    fn test_navigation_defers_by_exactly_the_configured_delay() {
        let mut o = overlay();
        let delay = OverlayConfig::default().navigation_delay;
        assert_eq!(
            o.intercept("/projects.html", false, 2.0),
            InterceptDecision::Deferred
        );

        // Never immediately
        assert!(o.due_navigation(2.0).is_none());
        // Not a moment before the deadline
        assert!(o.due_navigation(2.0 + delay - 0.01).is_none());
        // At the deadline it fires
        assert_eq!(
            o.due_navigation(2.0 + delay).as_deref(),
            Some("/projects.html")
        );
        // And only once
        assert!(o.due_navigation(3.0).is_none());
    }

    #[test]
    fn test_intercept_covers_the_screen() {
        let mut o = overlay();
        o.fade_out(0.0, 0.0);
        assert_eq!(o.state(0.5), OverlayState::Hidden);

        o.intercept("/about.html", false, 1.0);
        // Mid-fade the overlay is on its way to covering
        assert!(matches!(o.state(1.1), OverlayState::FadingIn { .. }));
        assert_eq!(o.state(2.0), OverlayState::Covering);
    }

    #[test]
    fn test_reduced_motion_skips_fade_but_not_navigation() {
        let mut o = TransitionOverlay::new(OverlayConfig {
            reduced_motion: true,
            ..OverlayConfig::default()
        });

        o.fade_out(0.0, 0.4);
        // Fade skipped entirely
        assert_eq!(o.state(0.0), OverlayState::Hidden);

        o.intercept("/contact.html", false, 1.0);
        assert_eq!(o.state(1.0), OverlayState::Covering);

        // Navigation still waits for the full delay, then fires
        assert!(o.due_navigation(1.3).is_none());
        assert_eq!(o.due_navigation(1.6).as_deref(), Some("/contact.html"));
    }

    #[test]
    fn test_zero_duration_fades_settle_immediately() {
        let mut o = overlay();
        o.fade_out(1.0, 0.0);
        assert_eq!(o.state(1.0), OverlayState::Hidden);
        o.fade_in(2.0, 0.0);
        assert_eq!(o.state(2.0), OverlayState::Covering);
    }
}
