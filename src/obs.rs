//! Optional tracing instrumentation for adapter operations.

// self
use crate::_prelude::*;

/// Adapter operations that get their own span.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationKind {
	/// Authorization URL construction.
	Authorization,
	/// Authorization-code exchange.
	CodeExchange,
	/// Refresh token exchange.
	Refresh,
	/// Token revocation.
	Revocation,
}
impl OperationKind {
	/// Stable label used as the span's `operation` field.
	pub fn as_str(self) -> &'static str {
		match self {
			OperationKind::Authorization => "authorization",
			OperationKind::CodeExchange => "code_exchange",
			OperationKind::Refresh => "refresh",
			OperationKind::Revocation => "revocation",
		}
	}
}

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedOperation<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOperation<F> = F;

/// Span builder used by the client facade.
#[derive(Clone, Debug)]
pub struct OperationSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OperationSpan {
	/// Creates a span tagged with the operation kind.
	pub fn new(kind: OperationKind) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("oauth2_omron.operation", operation = kind.as_str());

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = kind;

			Self {}
		}
	}

	/// Enters the span for synchronous sections.
	pub fn entered(self) -> OperationSpanGuard {
		#[cfg(feature = "tracing")]
		{
			OperationSpanGuard { guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			OperationSpanGuard {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOperation<Fut>
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

/// RAII guard returned by [`OperationSpan::entered`].
pub struct OperationSpanGuard {
	#[cfg(feature = "tracing")]
	#[allow(dead_code)]
	guard: tracing::span::EnteredSpan,
}
impl Debug for OperationSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("OperationSpanGuard(..)")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn span_guard_is_a_noop_without_tracing() {
		let _guard = OperationSpan::new(OperationKind::Revocation).entered();
		// Compile-time smoke test ensures the guard exists even when tracing is disabled.
	}

	#[test]
	fn operation_labels_are_stable() {
		assert_eq!(OperationKind::Authorization.as_str(), "authorization");
		assert_eq!(OperationKind::CodeExchange.as_str(), "code_exchange");
		assert_eq!(OperationKind::Refresh.as_str(), "refresh");
		assert_eq!(OperationKind::Revocation.as_str(), "revocation");
	}
}
