//! Optional observability helpers for OAuth 1.0a flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `oauth1_broker.flow` with the `step` (flow
//!   step) and `stage` (call site) fields; `outcome` and `http_status` are filled in once the
//!   step finishes.
//! - Enable `metrics` to increment the `oauth1_broker_flow_total` counter for every
//!   attempt/success/failure, labeled by `step` + `outcome`, and to record finished steps in the
//!   `oauth1_broker_flow_duration_seconds` histogram.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// std
use std::time::Instant;
// self
use crate::_prelude::*;

/// Protocol steps observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowStep {
	/// Temporary credential request (RFC 5849 §2.1).
	TemporaryCredentials,
	/// Resource owner authorization redirect (RFC 5849 §2.2).
	Authorization,
	/// Verifier exchange for access credentials (RFC 5849 §2.3).
	AccessCredentials,
	/// Authenticated request against a protected resource.
	ProtectedResource,
}
impl FlowStep {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowStep::TemporaryCredentials => "temporary_credentials",
			FlowStep::Authorization => "authorization",
			FlowStep::AccessCredentials => "access_credentials",
			FlowStep::ProtectedResource => "protected_resource",
		}
	}
}
impl Display for FlowStep {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a flow helper.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Runs `fut` inside a flow span, recording the outcome and duration of `step`.
pub(crate) async fn observe<T, Fut>(step: FlowStep, stage: &'static str, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = FlowSpan::new(step, stage);
	let started = Instant::now();

	record_flow_outcome(step, FlowOutcome::Attempt);

	let result = span.instrument(fut).await;
	let outcome = match &result {
		Ok(_) => FlowOutcome::Success,
		Err(e) => {
			if let Some(status) = e.http_status() {
				span.record_http_status(status);
			}

			#[cfg(feature = "tracing")]
			::tracing::warn!(step = step.as_str(), stage, error = %e, "OAuth flow step failed.");

			FlowOutcome::Failure
		},
	};

	span.record_outcome(outcome);
	record_flow_outcome(step, outcome);
	record_flow_duration(step, outcome, started.elapsed());

	result
}
