// src/jobsupervisor/monit/reload.rs

//! Bounded reload-and-verify protocol for the monit daemon.
//!
//! [`ReloadMachine`] is a pure, synchronous state machine: it consumes
//! [`ReloadEvent`]s describing what happened and answers with the next
//! [`ReloadCommand`] to perform. The monit supervisor is the IO shell that
//! runs `monit reload`, fetches status and sleeps.
//!
//! ```text
//! Idle -> Reloading -> Checking -> Converged
//!            ^            |
//!            +------------+  (checks exhausted, attempts left)
//!                         |
//!                         +--> Failed (attempts exhausted)
//! ```
//!
//! A transport error at any point only consumes budget: a failed baseline
//! fetch or reload command ends the current attempt, a failed status fetch
//! counts as one unsuccessful check.

use std::time::Duration;

use crate::jobsupervisor::monit::status::MonitStatus;

/// Retry bounds for one reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitReloadOptions {
    /// Number of times `monit reload` is issued at most.
    pub max_tries: u32,
    /// Status checks after each reload before it counts as unsuccessful.
    pub max_check_tries: u32,
    /// Sleep between two status checks of the same attempt.
    pub delay_between_check_tries: Duration,
}

impl Default for MonitReloadOptions {
    fn default() -> Self {
        Self {
            max_tries: 3,
            max_check_tries: 6,
            delay_between_check_tries: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadState {
    Idle,
    Reloading { attempt: u32 },
    Checking { attempt: u32, check: u32 },
    Converged,
    Failed,
}

/// What the IO shell observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadEvent {
    /// Incarnation before reloading, `None` if it could not be fetched.
    BaselineFetched(Option<u64>),
    /// Whether `monit reload` ran and exited successfully.
    ReloadIssued(bool),
    /// Result of one status check, `None` if it could not be fetched.
    StatusChecked(Option<MonitStatus>),
}

/// What the IO shell should do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadCommand {
    FetchBaseline { attempt: u32 },
    IssueReload { attempt: u32 },
    /// Sleep `delay`, then fetch status.
    CheckStatus {
        attempt: u32,
        check: u32,
        delay: Duration,
    },
    Converged(ReloadReport),
    Exhausted {
        attempts: u32,
        before: Option<u64>,
        after: Option<u64>,
    },
}

/// Budget consumed by a converged reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloadReport {
    /// Reload attempts started, including the successful one.
    pub attempts: u32,
    /// Status checks performed across all attempts.
    pub checks: u32,
    pub before: u64,
    pub after: u64,
}

#[derive(Debug, Clone)]
pub struct ReloadMachine {
    options: MonitReloadOptions,
    group: String,
    state: ReloadState,
    before: Option<u64>,
    last_seen: Option<u64>,
    checks: u32,
}

impl ReloadMachine {
    /// `group` is the monit service group whose services must all have
    /// settled before the reload counts as converged.
    pub fn new(options: MonitReloadOptions, group: impl Into<String>) -> Self {
        Self {
            options,
            group: group.into(),
            state: ReloadState::Idle,
            before: None,
            last_seen: None,
            checks: 0,
        }
    }

    pub fn state(&self) -> ReloadState {
        self.state
    }

    /// Leave `Idle` and begin the first attempt.
    pub fn start(&mut self) -> ReloadCommand {
        if self.options.max_tries == 0 {
            return self.exhaust();
        }
        self.begin_attempt(1)
    }

    pub fn step(&mut self, event: ReloadEvent) -> ReloadCommand {
        match (self.state, event) {
            (ReloadState::Reloading { attempt }, ReloadEvent::BaselineFetched(Some(incarnation))) => {
                self.before = Some(incarnation);
                ReloadCommand::IssueReload { attempt }
            }
            (ReloadState::Reloading { attempt }, ReloadEvent::BaselineFetched(None)) => {
                self.next_attempt(attempt)
            }
            (ReloadState::Reloading { attempt }, ReloadEvent::ReloadIssued(true)) => {
                if self.options.max_check_tries == 0 {
                    return self.next_attempt(attempt);
                }
                self.begin_check(attempt, 1)
            }
            (ReloadState::Reloading { attempt }, ReloadEvent::ReloadIssued(false)) => {
                self.next_attempt(attempt)
            }
            (ReloadState::Checking { attempt, check }, ReloadEvent::StatusChecked(status)) => {
                self.checks = self.checks.saturating_add(1);

                if let Some(ref status) = status {
                    self.last_seen = Some(status.incarnation);
                    if let Some(report) = self.converged(attempt, status) {
                        self.state = ReloadState::Converged;
                        return ReloadCommand::Converged(report);
                    }
                }

                self.next_check(attempt, check)
            }
            // Events outside the protocol (e.g. after a terminal state) end
            // the reload as exhausted.
            _ => self.exhaust(),
        }
    }

    fn converged(&self, attempt: u32, status: &MonitStatus) -> Option<ReloadReport> {
        let before = self.before?;
        let settled = status
            .services_in_group(&self.group)
            .iter()
            .all(|service| !service.is_pending());

        (status.incarnation > before && settled).then_some(ReloadReport {
            attempts: attempt,
            checks: self.checks,
            before,
            after: status.incarnation,
        })
    }

    /// Move past `attempt`, exhausting once it was the last allowed one.
    fn next_attempt(&mut self, attempt: u32) -> ReloadCommand {
        if attempt >= self.options.max_tries {
            return self.exhaust();
        }
        self.begin_attempt(attempt + 1)
    }

    fn next_check(&mut self, attempt: u32, check: u32) -> ReloadCommand {
        if check >= self.options.max_check_tries {
            return self.next_attempt(attempt);
        }
        self.begin_check(attempt, check + 1)
    }

    fn begin_attempt(&mut self, attempt: u32) -> ReloadCommand {
        self.state = ReloadState::Reloading { attempt };
        if self.before.is_none() {
            ReloadCommand::FetchBaseline { attempt }
        } else {
            ReloadCommand::IssueReload { attempt }
        }
    }

    fn begin_check(&mut self, attempt: u32, check: u32) -> ReloadCommand {
        self.state = ReloadState::Checking { attempt, check };
        let delay = if check == 1 {
            Duration::ZERO
        } else {
            self.options.delay_between_check_tries
        };
        ReloadCommand::CheckStatus {
            attempt,
            check,
            delay,
        }
    }

    fn exhaust(&mut self) -> ReloadCommand {
        self.state = ReloadState::Failed;
        ReloadCommand::Exhausted {
            attempts: self.options.max_tries,
            before: self.before,
            after: self.last_seen,
        }
    }
}

