//! Veil Session - the redaction client's state and orchestration.
//!
//! A [`Session`] composes three parts:
//!
//! - **Capability probe**: run once on [`Session::mount`]; gates which methods are offered
//! - **Form state** ([`form`]): user selections, domain checks, and the offline guard
//! - **Submission control** ([`submission`]): one cancellable request at a time
//!
//! ```text
//! probe ──► capability ──► available methods / offline guard
//!                               │
//! user ──► FormAction ──► FormState ──► submit() ──► RedactionApi
//!                                                        │
//!              ResultState (preview, message, metadata) ◄┘
//! ```
//!
//! Only the submission holding the current generation may write
//! [`ResultState`]; superseded submissions settle as
//! [`SubmissionOutcome::Cancelled`] without touching it.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod error;
pub mod form;
pub mod preview;
pub mod result;
pub mod session;
pub mod submission;

pub use error::{SessionError, ValidationError};
pub use form::{FormAction, FormState, SelectedFile, DEFAULT_PERSONA, OFFLINE_SWITCH_MESSAGE};
pub use preview::{PreviewHandle, PreviewInfo, PreviewStore};
pub use result::{ResultState, SUCCESS_MESSAGE};
pub use session::{FileInfo, Session, SessionSnapshot};
pub use submission::{SubmissionController, SubmissionOutcome, SubmissionTicket};
