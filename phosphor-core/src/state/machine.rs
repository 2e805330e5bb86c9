//! State machine definition

use super::events::Event;

/// Refresh states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Nothing to display
    #[default]
    Idle,
    /// Producer is appending to its first frame
    Filling,
    /// A complete frame is ready and re-streams every period
    Armed,
    /// The backend is streaming the armed frame
    Refreshing,
    /// Screen saver expired; output blanked, frame kept
    ScreenBlanked,
}

impl State {
    /// Whether the beam may be driven in this state
    pub fn output_allowed(&self) -> bool {
        matches!(self, State::Armed | State::Refreshing)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use State::*;

        match (self, event) {
            // The saver wins from anywhere
            (ScreenBlanked, Activity) => Armed,
            (ScreenBlanked, _) => ScreenBlanked,
            (_, SaverExpired) => ScreenBlanked,

            (Idle, FrameStarted) => Filling,

            (Idle | Filling | Armed, FrameArmed) => Armed,
            (Idle | Filling | Armed, FrameCleared) => Idle,

            (Armed, TransferStarted) => Refreshing,
            (Refreshing, TransferComplete) => Armed,

            // Default: stay in current state
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_flow() {
        let state = State::Idle;
        let filling = state.transition(Event::FrameStarted);
        assert_eq!(filling, State::Filling);

        let armed = filling.transition(Event::FrameArmed);
        assert_eq!(armed, State::Armed);

        let refreshing = armed.transition(Event::TransferStarted);
        assert_eq!(refreshing, State::Refreshing);

        assert_eq!(refreshing.transition(Event::TransferComplete), State::Armed);
    }

    #[test]
    fn test_new_frame_waits_for_transfer() {
        // A frame armed mid-transfer is picked up after completion
        let state = State::Refreshing;
        assert_eq!(state.transition(Event::FrameArmed), State::Refreshing);
    }

    #[test]
    fn test_saver_from_any_state() {
        let states = [State::Idle, State::Filling, State::Armed, State::Refreshing];

        for state in states {
            let next = state.transition(Event::SaverExpired);
            assert_eq!(next, State::ScreenBlanked);
            assert!(!next.output_allowed());
        }
    }

    #[test]
    fn test_blanked_until_activity() {
        let state = State::ScreenBlanked;
        assert_eq!(state.transition(Event::FrameArmed), State::ScreenBlanked);
        assert_eq!(state.transition(Event::TransferStarted), State::ScreenBlanked);
        assert_eq!(state.transition(Event::Activity), State::Armed);
    }

    #[test]
    fn test_empty_frame_returns_to_idle() {
        assert_eq!(State::Armed.transition(Event::FrameCleared), State::Idle);
        assert_eq!(State::Idle.transition(Event::TransferStarted), State::Idle);
    }
}
