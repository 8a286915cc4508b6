//! Score submission
//!
//! The core never looks inside an identity; it only checks that one is
//! present. `ScoreSubmitter` guards the sink: won runs only, signed-in players
//! only, and one accepted submission per run.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::SubmitError;
use crate::sim::{Outcome, TerminalReport};

/// Opaque signed-in identity supplied by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: Option<String>,
}

impl Identity {
    pub fn new(id: impl Into<String>, email: Option<String>) -> Self {
        Self {
            id: id.into(),
            email,
        }
    }

    /// Leaderboard name: the part of the email before `@`, or "Anonymous"
    pub fn display_name(&self) -> String {
        self.email
            .as_deref()
            .and_then(|email| email.split('@').next())
            .filter(|name| !name.is_empty())
            .unwrap_or("Anonymous")
            .to_string()
    }
}

/// Source of the current identity (auth lives outside the core)
pub trait IdentityProvider {
    fn current(&self) -> Option<Identity>;
}

impl IdentityProvider for Option<Identity> {
    fn current(&self) -> Option<Identity> {
        self.clone()
    }
}

/// One final score headed for the sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub run_id: u64,
    pub score: u64,
    pub username: String,
    pub identity: Identity,
}

/// Where final scores go (a database, a local leaderboard, ...)
pub trait ScoreSink {
    fn submit(&mut self, submission: &Submission) -> Result<(), SubmitError>;
}

/// Applies the submission rules in front of a sink
#[derive(Debug, Clone, Default)]
pub struct ScoreSubmitter {
    accepted: HashSet<u64>,
}

impl ScoreSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Submit a finished run. Sink failures are returned as retryable and can
    /// be retried with the same report.
    pub fn submit(
        &mut self,
        report: &TerminalReport,
        identity: &impl IdentityProvider,
        sink: &mut impl ScoreSink,
    ) -> Result<Submission, SubmitError> {
        if report.outcome != Outcome::Won {
            return Err(SubmitError::NotWon);
        }
        if self.accepted.contains(&report.run_id) {
            return Err(SubmitError::AlreadySubmitted {
                run_id: report.run_id,
            });
        }
        let identity = identity.current().ok_or(SubmitError::NoIdentity)?;

        let submission = Submission {
            run_id: report.run_id,
            score: report.final_score,
            username: identity.display_name(),
            identity,
        };
        match sink.submit(&submission) {
            Ok(()) => {
                self.accepted.insert(report.run_id);
                log::info!(
                    "Submitted score {} for {} (run {})",
                    submission.score,
                    submission.username,
                    submission.run_id
                );
                Ok(submission)
            }
            Err(e) => {
                log::warn!("Score submission for run {} failed: {}", report.run_id, e);
                Err(e)
            }
        }
    }

    pub fn was_submitted(&self, run_id: u64) -> bool {
        self.accepted.contains(&run_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sink that fails a set number of times before accepting
    #[derive(Default)]
    struct FlakySink {
        failures_left: u32,
        received: Vec<Submission>,
    }

    impl ScoreSink for FlakySink {
        fn submit(&mut self, submission: &Submission) -> Result<(), SubmitError> {
            if self.failures_left > 0 {
                self.failures_left -= 1;
                return Err(SubmitError::Sink {
                    message: "network down".into(),
                });
            }
            self.received.push(submission.clone());
            Ok(())
        }
    }

    fn report(outcome: Outcome) -> TerminalReport {
        TerminalReport {
            run_id: 4,
            outcome,
            final_score: 20,
            kill_count: 20,
        }
    }

    fn signed_in() -> Option<Identity> {
        Some(Identity::new("u-1", Some("ada@example.com".into())))
    }

    #[test]
    fn test_display_name() {
        assert_eq!(signed_in().unwrap().display_name(), "ada");
        assert_eq!(Identity::new("x", None).display_name(), "Anonymous");
        assert_eq!(
            Identity::new("x", Some("@nowhere".into())).display_name(),
            "Anonymous"
        );
    }

    #[test]
    fn test_lost_runs_rejected() {
        let mut submitter = ScoreSubmitter::new();
        let mut sink = FlakySink::default();
        let err = submitter
            .submit(&report(Outcome::Lost), &signed_in(), &mut sink)
            .unwrap_err();
        assert_eq!(err, SubmitError::NotWon);
        assert!(sink.received.is_empty());
    }

    #[test]
    fn test_identity_required() {
        let mut submitter = ScoreSubmitter::new();
        let mut sink = FlakySink::default();
        let err = submitter
            .submit(&report(Outcome::Won), &None, &mut sink)
            .unwrap_err();
        assert_eq!(err, SubmitError::NoIdentity);
        assert!(!submitter.was_submitted(4));
    }

    #[test]
    fn test_at_most_once_per_run() {
        let mut submitter = ScoreSubmitter::new();
        let mut sink = FlakySink::default();
        let ok = submitter
            .submit(&report(Outcome::Won), &signed_in(), &mut sink)
            .unwrap();
        assert_eq!(ok.username, "ada");
        assert_eq!(ok.score, 20);

        let err = submitter
            .submit(&report(Outcome::Won), &signed_in(), &mut sink)
            .unwrap_err();
        assert_eq!(err, SubmitError::AlreadySubmitted { run_id: 4 });
        assert_eq!(sink.received.len(), 1);
    }

    #[test]
    fn test_sink_failure_is_retryable() {
        let mut submitter = ScoreSubmitter::new();
        let mut sink = FlakySink {
            failures_left: 1,
            ..Default::default()
        };
        let err = submitter
            .submit(&report(Outcome::Won), &signed_in(), &mut sink)
            .unwrap_err();
        assert!(err.is_retryable());
        assert!(!submitter.was_submitted(4));

        assert!(submitter
            .submit(&report(Outcome::Won), &signed_in(), &mut sink)
            .is_ok());
        assert_eq!(sink.received.len(), 1);
    }
}
