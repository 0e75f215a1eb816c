// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::RequestId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Validating,
    Submitting,
    /// Saved; the submit control stays disabled until the form is edited.
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleOutcome {
    Idle,
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionCommand {
    Begin,
    ValidationFailed,
    ValidationPassed,
    Settled {
        request: RequestId,
        outcome: SettleOutcome,
    },
    Rearm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    Busy,
    Disabled,
    StaleReply,
    OutOfOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionEvent {
    PhaseChanged(SubmissionPhase),
    RequestIssued(RequestId),
    Ignored(IgnoreReason),
}

/// Per-form submission state. The phase is the only guard between overlapping submissions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubmissionState {
    pub phase: SubmissionPhase,
    pub in_flight: Option<RequestId>,
    issued: usize,
}

impl SubmissionState {
    pub fn dispatch(&mut self, command: SubmissionCommand) -> Vec<SubmissionEvent> {
        match command {
            SubmissionCommand::Begin => match self.phase {
                SubmissionPhase::Idle => self.set_phase(SubmissionPhase::Validating),
                SubmissionPhase::Validating | SubmissionPhase::Submitting => {
                    vec![SubmissionEvent::Ignored(IgnoreReason::Busy)]
                }
                SubmissionPhase::Disabled => {
                    vec![SubmissionEvent::Ignored(IgnoreReason::Disabled)]
                }
            },
            SubmissionCommand::ValidationFailed => {
                if self.phase != SubmissionPhase::Validating {
                    return vec![SubmissionEvent::Ignored(IgnoreReason::OutOfOrder)];
                }
                self.set_phase(SubmissionPhase::Idle)
            }
            SubmissionCommand::ValidationPassed => {
                if self.phase != SubmissionPhase::Validating {
                    return vec![SubmissionEvent::Ignored(IgnoreReason::OutOfOrder)];
                }
                self.issued += 1;
                let request = RequestId::new(self.issued);
                self.in_flight = Some(request);
                let mut events = self.set_phase(SubmissionPhase::Submitting);
                events.push(SubmissionEvent::RequestIssued(request));
                events
            }
            SubmissionCommand::Settled { request, outcome } => {
                if self.phase != SubmissionPhase::Submitting || self.in_flight != Some(request) {
                    return vec![SubmissionEvent::Ignored(IgnoreReason::StaleReply)];
                }
                self.in_flight = None;
                let phase = match outcome {
                    SettleOutcome::Idle => SubmissionPhase::Idle,
                    SettleOutcome::Disabled => SubmissionPhase::Disabled,
                };
                self.set_phase(phase)
            }
            SubmissionCommand::Rearm => {
                if self.phase != SubmissionPhase::Disabled {
                    return Vec::new();
                }
                self.set_phase(SubmissionPhase::Idle)
            }
        }
    }

    pub const fn is_busy(&self) -> bool {
        matches!(
            self.phase,
            SubmissionPhase::Validating | SubmissionPhase::Submitting
        )
    }

    fn set_phase(&mut self, phase: SubmissionPhase) -> Vec<SubmissionEvent> {
        self.phase = phase;
        vec![SubmissionEvent::PhaseChanged(phase)]
    }
}

#[cfg(test)]
mod tests {
    use super::{
        IgnoreReason, SettleOutcome, SubmissionCommand, SubmissionEvent, SubmissionPhase,
        SubmissionState,
    };
    use crate::RequestId;

    fn submitting() -> (SubmissionState, RequestId) {
        let mut state = SubmissionState::default();
        state.dispatch(SubmissionCommand::Begin);
        let events = state.dispatch(SubmissionCommand::ValidationPassed);
        let Some(SubmissionEvent::RequestIssued(request)) = events.last().copied() else {
            panic!("expected a request id, got {events:?}");
        };
        (state, request)
    }

    #[test]
    fn failed_validation_returns_to_idle() {
        let mut state = SubmissionState::default();

        let events = state.dispatch(SubmissionCommand::Begin);
        assert_eq!(
            events,
            vec![SubmissionEvent::PhaseChanged(SubmissionPhase::Validating)]
        );

        state.dispatch(SubmissionCommand::ValidationFailed);
        assert_eq!(state.phase, SubmissionPhase::Idle);
        assert_eq!(state.in_flight, None);
    }

    #[test]
    fn second_submit_while_in_flight_is_ignored() {
        let (mut state, request) = submitting();
        assert!(state.is_busy());

        let events = state.dispatch(SubmissionCommand::Begin);
        assert_eq!(events, vec![SubmissionEvent::Ignored(IgnoreReason::Busy)]);
        assert_eq!(state.in_flight, Some(request));
    }

    #[test]
    fn settled_reply_restores_idle() {
        let (mut state, request) = submitting();

        let events = state.dispatch(SubmissionCommand::Settled {
            request,
            outcome: SettleOutcome::Idle,
        });
        assert_eq!(
            events,
            vec![SubmissionEvent::PhaseChanged(SubmissionPhase::Idle)]
        );
        assert!(!state.is_busy());
    }

    #[test]
    fn stale_reply_is_dropped() {
        let (mut state, request) = submitting();
        state.dispatch(SubmissionCommand::Settled {
            request,
            outcome: SettleOutcome::Idle,
        });
        state.dispatch(SubmissionCommand::Begin);
        state.dispatch(SubmissionCommand::ValidationPassed);

        let events = state.dispatch(SubmissionCommand::Settled {
            request,
            outcome: SettleOutcome::Idle,
        });
        assert_eq!(
            events,
            vec![SubmissionEvent::Ignored(IgnoreReason::StaleReply)]
        );
        assert_eq!(state.phase, SubmissionPhase::Submitting);
    }

    #[test]
    fn disabled_form_ignores_submits_until_rearmed() {
        let (mut state, request) = submitting();
        state.dispatch(SubmissionCommand::Settled {
            request,
            outcome: SettleOutcome::Disabled,
        });
        assert_eq!(state.phase, SubmissionPhase::Disabled);

        let events = state.dispatch(SubmissionCommand::Begin);
        assert_eq!(events, vec![SubmissionEvent::Ignored(IgnoreReason::Disabled)]);

        let events = state.dispatch(SubmissionCommand::Rearm);
        assert_eq!(
            events,
            vec![SubmissionEvent::PhaseChanged(SubmissionPhase::Idle)]
        );
        assert!(state.dispatch(SubmissionCommand::Rearm).is_empty());
    }

    #[test]
    fn validation_results_outside_validating_are_out_of_order() {
        let mut state = SubmissionState::default();
        assert_eq!(
            state.dispatch(SubmissionCommand::ValidationPassed),
            vec![SubmissionEvent::Ignored(IgnoreReason::OutOfOrder)]
        );
    }
}
