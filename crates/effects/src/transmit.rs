//! Contact form submit button.
//!
//! The network request itself belongs to the host; this only tracks what the
//! button says and whether it accepts clicks.

pub const IDLE_LABEL: &str = "Transmit";
pub const BUSY_LABEL: &str = "Transmitting...";
pub const FAILED_LABEL: &str = "Transmission Failed";
pub const SUCCESS_TITLE: &str = "Response Submitted";

/// How long the failure label stays before the button re-enables.
pub const FAILURE_HOLD_MS: f64 = 2000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransmitState {
    Idle,
    Transmitting,
    Failed { at_ms: f64 },
    /// Terminal: the form is replaced by [`SUCCESS_TITLE`].
    Submitted,
}

/// The submit button's state. Only an idle button accepts clicks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransmitButton {
    state: TransmitState,
    hold_ms: f64,
}

impl Default for TransmitButton {
    fn default() -> Self {
        Self::new()
    }
}

impl TransmitButton {
    pub fn new() -> Self {
        Self {
            state: TransmitState::Idle,
            hold_ms: FAILURE_HOLD_MS,
        }
    }

    pub fn state(&self) -> TransmitState {
        self.state
    }

    pub fn label(&self) -> &'static str {
        match self.state {
            TransmitState::Idle => IDLE_LABEL,
            TransmitState::Transmitting => BUSY_LABEL,
            TransmitState::Failed { .. } => FAILED_LABEL,
            TransmitState::Submitted => SUCCESS_TITLE,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.state == TransmitState::Idle
    }

    /// A click. Returns whether the host should send the form.
    pub fn submit(&mut self) -> bool {
        if !self.is_enabled() {
            return false;
        }
        self.state = TransmitState::Transmitting;
        true
    }

    /// Ignored unless a transmission is in flight.
    pub fn succeed(&mut self) {
        if self.state == TransmitState::Transmitting {
            self.state = TransmitState::Submitted;
        }
    }

    /// The request failed at `now_ms`. No retry is scheduled.
    pub fn fail(&mut self, now_ms: f64) {
        if self.state == TransmitState::Transmitting {
            log::warn!("contact form transmission failed");
            self.state = TransmitState::Failed { at_ms: now_ms };
        }
    }

    /// Re-enables the button once the failure label has been shown for the
    /// hold time. Returns whether the state changed.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        match self.state {
            TransmitState::Failed { at_ms } if now_ms - at_ms >= self.hold_ms => {
                self.state = TransmitState::Idle;
                true
            }
            _ => false,
        }
    }
}
