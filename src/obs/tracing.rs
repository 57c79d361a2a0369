// self
use crate::{
	_prelude::*,
	obs::{FlowOutcome, FlowStep},
};

/// Future returned by [`FlowSpan::instrument`]; instrumented only when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedFlow<F> = tracing::instrument::Instrumented<F>;
/// Future returned by [`FlowSpan::instrument`]; instrumented only when tracing is enabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFlow<F> = F;

/// Span covering one flow step.
///
/// The span opens with `step` and `stage` set; `outcome` and `http_status` stay empty until the
/// step finishes and [`FlowSpan::record_outcome`] / [`FlowSpan::record_http_status`] fill them.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	/// Opens a span for `step`, tagged with the calling `stage`.
	pub fn new(step: FlowStep, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"oauth1_broker.flow",
				step = step.as_str(),
				stage,
				outcome = tracing::field::Empty,
				http_status = tracing::field::Empty,
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (step, stage);

			Self {}
		}
	}

	/// Records how the step ended.
	pub fn record_outcome(&self, outcome: FlowOutcome) {
		#[cfg(feature = "tracing")]
		{
			self.span.record("outcome", outcome.as_str());
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = outcome;
		}
	}

	/// Records the HTTP status the service answered with.
	pub fn record_http_status(&self, status: u16) {
		#[cfg(feature = "tracing")]
		{
			self.span.record("http_status", status);
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = status;
		}
	}

	/// Instruments `fut` so every poll runs inside the span; no guard is held across `.await`.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFlow<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}
