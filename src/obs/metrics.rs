// std
use std::time::Duration as StdDuration;
// self
use crate::obs::{FlowOutcome, FlowStep};

/// Increments `oauth1_broker_flow_total{step, outcome}` (when the `metrics` feature is enabled).
pub fn record_flow_outcome(step: FlowStep, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"oauth1_broker_flow_total",
			"step" => step.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = (step, outcome);
	}
}

/// Records how long a finished step took in `oauth1_broker_flow_duration_seconds{step, outcome}`.
pub fn record_flow_duration(step: FlowStep, outcome: FlowOutcome, elapsed: StdDuration) {
	#[cfg(feature = "metrics")]
	{
		metrics::histogram!(
			"oauth1_broker_flow_duration_seconds",
			"step" => step.as_str(),
			"outcome" => outcome.as_str()
		)
		.record(elapsed.as_secs_f64());
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = (step, outcome, elapsed);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recording_without_a_recorder_is_harmless() {
		record_flow_outcome(FlowStep::AccessCredentials, FlowOutcome::Failure);
		record_flow_duration(
			FlowStep::AccessCredentials,
			FlowOutcome::Failure,
			StdDuration::from_millis(12),
		);
	}
}
