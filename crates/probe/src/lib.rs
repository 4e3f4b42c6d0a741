//! Liveness probing for the language-model API.
//!
//! The dashboard never issues prompts; it only needs to know whether the
//! provider answers at all, so the probe performs the cheapest read-only
//! call the API offers (listing models) behind the [`LivenessTarget`] seam.

mod openai;

use async_trait::async_trait;
use tracing::debug;

use leadboard_domain::model::ProbeResult;

pub use openai::OpenAiTarget;

/// One minimal remote operation against a language-model provider.
#[async_trait]
pub trait LivenessTarget: Send + Sync {
    /// Performs the cheapest available read-only call. The call's payload is
    /// discarded; only success or failure matters.
    async fn list_models(&self) -> ProbeResult<()>;
}

/// Maps any probe failure to `false` and success to `true`. Detail beyond
/// the boolean is deliberately not surfaced here; callers wanting the error
/// text use [`LivenessTarget::list_models`] directly.
pub async fn check_liveness(target: &dyn LivenessTarget) -> bool {
    match target.list_models().await {
        Ok(()) => true,
        Err(err) => {
            debug!(error = %err, "language-model liveness probe failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadboard_domain::model::DependencyError;

    struct AlwaysUp;

    #[async_trait]
    impl LivenessTarget for AlwaysUp {
        async fn list_models(&self) -> ProbeResult<()> {
            Ok(())
        }
    }

    struct AlwaysDown;

    #[async_trait]
    impl LivenessTarget for AlwaysDown {
        async fn list_models(&self) -> ProbeResult<()> {
            Err(DependencyError::unreachable("401 Unauthorized"))
        }
    }

    #[tokio::test]
    async fn success_maps_to_true() {
        assert!(check_liveness(&AlwaysUp).await);
    }

    #[tokio::test]
    async fn any_failure_maps_to_false() {
        assert!(!check_liveness(&AlwaysDown).await);
    }

    #[tokio::test]
    async fn unroutable_endpoint_maps_to_false() {
        // Connection refused on a reserved port; no real provider involved.
        let target = OpenAiTarget::with_base_url("sk-test", "http://127.0.0.1:9/v1");
        assert!(!check_liveness(&target).await);
    }
}
