//! Submission controller.
//!
//! Tracks the single in-flight submission as a generation number plus a
//! [`CancellationToken`]. Starting a submission cancels the previous token;
//! a settling submission may write results only while its generation is
//! still the in-flight one.

use crate::error::ValidationError;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Handle given to one submission attempt.
#[derive(Debug, Clone)]
pub struct SubmissionTicket {
    /// Generation number of this attempt
    pub generation: u64,
    /// Fires when a newer attempt supersedes this one
    pub token: CancellationToken,
}

#[derive(Debug)]
struct InFlight {
    generation: u64,
    token: CancellationToken,
}

/// Owner of the request lifecycle.
#[derive(Debug, Default)]
pub struct SubmissionController {
    generation: u64,
    in_flight: Option<InFlight>,
}

impl SubmissionController {
    /// Create a controller with nothing in flight.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the in-flight attempt, if any. Returns its generation.
    pub fn cancel_in_flight(&mut self) -> Option<u64> {
        let in_flight = self.in_flight.take()?;
        in_flight.token.cancel();
        debug!("Cancelled submission #{}", in_flight.generation);
        Some(in_flight.generation)
    }

    /// Supersede any in-flight attempt and start a new one.
    pub fn begin(&mut self) -> SubmissionTicket {
        self.cancel_in_flight();
        self.generation += 1;
        let token = CancellationToken::new();
        self.in_flight = Some(InFlight {
            generation: self.generation,
            token: token.clone(),
        });
        SubmissionTicket {
            generation: self.generation,
            token,
        }
    }

    /// Whether `generation` is the attempt currently in flight.
    #[must_use]
    pub fn is_current(&self, generation: u64) -> bool {
        self.in_flight
            .as_ref()
            .is_some_and(|f| f.generation == generation)
    }

    /// Settle an attempt. Returns `false` when it was superseded, in which
    /// case nothing changes.
    pub fn finish(&mut self, generation: u64) -> bool {
        if self.is_current(generation) {
            self.in_flight = None;
            true
        } else {
            false
        }
    }

    /// Cancel and settle an attempt that ended before its response arrived.
    /// Returns `false` when it was already settled or superseded.
    pub fn abandon(&mut self, generation: u64) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.cancel_in_flight();
        true
    }

    /// Whether an attempt is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Generation of the most recent attempt (0 before the first).
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Terminal state of one `submit` call.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// Refused before any network call
    Rejected(ValidationError),
    /// Superseded by a newer submission; nothing was written
    Cancelled,
    /// The service answered with a non-2xx status
    HttpError {
        /// HTTP status code
        status: u16,
        /// Message written to the result state
        message: String,
    },
    /// A new preview was installed
    Success {
        /// Size of the processed image in bytes
        bytes: usize,
    },
    /// Transport or other failure
    NetworkError {
        /// Message written to the result state
        message: String,
    },
}

impl SubmissionOutcome {
    /// Short label for logs and the command surface.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Rejected(_) => "rejected",
            Self::Cancelled => "cancelled",
            Self::HttpError { .. } => "http_error",
            Self::Success { .. } => "success",
            Self::NetworkError { .. } => "network_error",
        }
    }
}
