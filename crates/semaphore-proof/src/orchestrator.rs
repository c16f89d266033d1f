//! # Proof Orchestrator
//!
//! Sequences the components for a single proof operation:
//!
//! ```text
//! Validating → ResolvingArtifact → Hashing → AssemblingInputs → Invoking → Done
//!      └──────────────┴───────────────┴──────────────┴──────────────┴──→ Failed
//! ```
//!
//! Every stage is logged on the operation's span. Errors surface in stage
//! order, so an invalid record never triggers an artifact lookup and a
//! missing artifact never reaches the backend.
//!
//! ## Security Invariant
//!
//! `verify_proof` never turns a backend error into `false` and never turns a
//! rejection into an error. The verdict is the backend's, against the vector
//! derived from the record, and `false` whenever the record's own
//! `publicInputs` disagree with that vector.

use std::fmt;

use semaphore_artifacts::{ArtifactResolver, CachedResolver, FsArtifactResolver};
use semaphore_backend::{BackendInstance, BackendOptions, BbCliEngine, ProvingEngine};
use semaphore_core::validate::parse_signal;
use semaphore_core::{
    generate_inputs, resolve_depth, validate, Identity, Membership, PublicInputs, SemaphoreProof,
};
use tracing::Instrument;

use crate::config::{SemaphoreConfig, DEFAULT_PROJECT};
use crate::error::ProofError;

/// Progress of a proof operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Checking the record or the generation request.
    Validating,
    /// Looking up the circuit for the depth.
    ResolvingArtifact,
    /// Hashing scope and message.
    Hashing,
    /// Laying out public inputs or the witness.
    AssemblingInputs,
    /// Loading the circuit and calling the backend.
    Invoking,
    /// Finished with a result.
    Done,
    /// Finished with an error.
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Validating => "validating",
            Self::ResolvingArtifact => "resolving_artifact",
            Self::Hashing => "hashing",
            Self::AssemblingInputs => "assembling_inputs",
            Self::Invoking => "invoking",
            Self::Done => "done",
            Self::Failed => "failed",
        })
    }
}

fn enter(stage: Stage) {
    tracing::debug!(%stage, "stage");
}

/// Generates and verifies Semaphore proofs with an injected artifact
/// resolver and proving engine.
#[derive(Debug)]
pub struct Semaphore<R, E> {
    resolver: R,
    engine: E,
    project: String,
    options: BackendOptions,
}

impl Semaphore<CachedResolver<FsArtifactResolver>, BbCliEngine> {
    /// A Barretenberg-backed orchestrator over the configured artifact tree.
    pub fn from_config(config: &SemaphoreConfig) -> Self {
        Semaphore::new(
            CachedResolver::new(FsArtifactResolver::new(&config.artifacts_dir)),
            BbCliEngine::new(&config.bb_bin, &config.nargo_bin),
        )
        .with_project(&config.project)
        .with_options(config.backend_options())
    }
}

impl<R: ArtifactResolver, E: ProvingEngine> Semaphore<R, E> {
    /// Use `resolver` and `engine` with the default project and options.
    pub fn new(resolver: R, engine: E) -> Self {
        Self {
            resolver,
            engine,
            project: DEFAULT_PROJECT.to_string(),
            options: BackendOptions::default(),
        }
    }

    /// Resolve artifacts for `project` instead of the default.
    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = project.into();
        self
    }

    /// Load circuits with `options`.
    pub fn with_options(mut self, options: BackendOptions) -> Self {
        self.options = options;
        self
    }

    /// The artifact resolver.
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// The proving engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Verify a proof record.
    ///
    /// # Errors
    ///
    /// [`ProofError::Validation`] for a malformed record,
    /// [`ProofError::ArtifactResolution`] when no circuit exists for its
    /// depth, and [`ProofError::Backend`] when the backend cannot reach a
    /// verdict. A proof the backend rejects is `Ok(false)`, as is a record
    /// whose supplied `publicInputs` disagree with its other fields.
    pub async fn verify_proof(&self, proof: &SemaphoreProof) -> Result<bool, ProofError> {
        let span = tracing::info_span!(
            "verify_proof",
            depth = proof.merkle_tree_depth,
            project = %self.project,
        );
        let result = self.verify_stages(proof).instrument(span.clone()).await;
        span.in_scope(|| match &result {
            Ok(valid) => tracing::info!(stage = %Stage::Done, valid, "proof verified"),
            Err(error) => tracing::warn!(stage = %Stage::Failed, %error, "verification failed"),
        });
        result
    }

    async fn verify_stages(&self, proof: &SemaphoreProof) -> Result<bool, ProofError> {
        enter(Stage::Validating);
        let validated = validate(proof)?;

        enter(Stage::ResolvingArtifact);
        let artifact = self
            .resolver
            .resolve(&self.project, validated.merkle_tree_depth)
            .await?;

        enter(Stage::Hashing);
        let public_inputs = validated.public_inputs;
        tracing::trace!(
            scope_hash = %public_inputs.scope_hash.to_hex(),
            message_hash = %public_inputs.message_hash.to_hex(),
            "hashed scope and message"
        );

        enter(Stage::AssemblingInputs);
        tracing::trace!(public_inputs = ?public_inputs.to_hex_strings(), "public inputs");
        let mismatch = validated.public_inputs_mismatch();
        if let Some(index) = mismatch {
            tracing::debug!(index, "supplied public inputs disagree with the record");
        }

        enter(Stage::Invoking);
        let instance = self.engine.load(artifact, &self.options).await?;
        let accepted = instance.verify(&validated.proof, &public_inputs).await?;
        Ok(accepted && mismatch.is_none())
    }

    /// Generate a proof that `identity` belongs to the group described by
    /// `membership`, signaling `message` within `scope`.
    ///
    /// `message` and `scope` take the record forms accepted by
    /// [`Signal::parse`](semaphore_core::Signal::parse); the record stores
    /// their canonical decimal form. The depth defaults to the membership
    /// path length.
    ///
    /// # Errors
    ///
    /// As for [`Semaphore::verify_proof`], plus [`ProofError::Generation`]
    /// when the backend's public outputs disagree with the request.
    pub async fn generate_proof<'a>(
        &self,
        identity: &Identity,
        membership: impl Into<Membership<'a>>,
        message: &str,
        scope: &str,
        merkle_tree_depth: Option<u32>,
    ) -> Result<SemaphoreProof, ProofError> {
        let span = tracing::info_span!(
            "generate_proof",
            depth = tracing::field::Empty,
            project = %self.project,
        );
        let membership = membership.into();
        let result = self
            .generate_stages(identity, membership, message, scope, merkle_tree_depth)
            .instrument(span.clone())
            .await;
        span.in_scope(|| match &result {
            Ok(proof) => tracing::info!(
                stage = %Stage::Done,
                nullifier = %proof.nullifier,
                "proof generated"
            ),
            Err(error) => tracing::warn!(stage = %Stage::Failed, %error, "generation failed"),
        });
        result
    }

    async fn generate_stages(
        &self,
        identity: &Identity,
        membership: Membership<'_>,
        message: &str,
        scope: &str,
        merkle_tree_depth: Option<u32>,
    ) -> Result<SemaphoreProof, ProofError> {
        enter(Stage::Validating);
        let message = parse_signal(message, "message")?;
        let scope = parse_signal(scope, "scope")?;
        let merkle_proof = membership.merkle_proof(identity)?;
        let depth = resolve_depth(merkle_tree_depth, merkle_proof.siblings.len())?;
        tracing::Span::current().record("depth", depth);

        enter(Stage::ResolvingArtifact);
        let artifact = self.resolver.resolve(&self.project, depth).await?;

        enter(Stage::Hashing);
        enter(Stage::AssemblingInputs);
        let inputs = generate_inputs(identity, &merkle_proof, &message, &scope, Some(depth))?;

        enter(Stage::Invoking);
        let instance = self.engine.load(artifact, &self.options).await?;
        let data = instance.prove(&inputs).await?;

        let public_inputs = PublicInputs::from_slice(&data.public_inputs).map_err(|_| {
            ProofError::Generation(format!(
                "backend returned {} public inputs",
                data.public_inputs.len()
            ))
        })?;
        if public_inputs.scope_hash != inputs.scope || public_inputs.message_hash != inputs.message
        {
            return Err(ProofError::Generation(
                "backend public inputs are bound to a different scope or message".to_string(),
            ));
        }
        if public_inputs.merkle_tree_root != merkle_proof.root {
            return Err(ProofError::Generation(format!(
                "circuit computed root {} but the membership path leads to {}",
                public_inputs.merkle_tree_root, merkle_proof.root
            )));
        }

        Ok(SemaphoreProof {
            merkle_tree_depth: depth,
            merkle_tree_root: public_inputs.merkle_tree_root.to_decimal(),
            nullifier: public_inputs.nullifier.to_decimal(),
            message: message.to_decimal(),
            scope: scope.to_decimal(),
            proof: data.proof,
            public_inputs: public_inputs.to_hex_strings(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use semaphore_artifacts::{ArtifactError, CircuitArtifact, MemoryResolver};
    use semaphore_backend::{mock_identity, BackendError, MockEngine, MockGroup, ProofData};
    use semaphore_core::{hash, CircuitInputs, FieldElement, Signal, ValidationError, MAX_DEPTH};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn artifacts() -> MemoryResolver {
        (1..=MAX_DEPTH).fold(MemoryResolver::new(), |r, depth| {
            r.with(CircuitArtifact::new(
                DEFAULT_PROJECT,
                depth,
                format!("{{\"bytecode\":\"circuit-{depth}\"}}").into_bytes(),
            ))
        })
    }

    fn semaphore() -> Semaphore<MemoryResolver, MockEngine> {
        Semaphore::new(artifacts(), MockEngine)
    }

    async fn proof_at_depth_20() -> SemaphoreProof {
        let identity = mock_identity(1);
        let group = MockGroup::new((1..=3).map(|s| mock_identity(s).commitment));
        semaphore()
            .generate_proof(&identity, &group, "2", "1", Some(20))
            .await
            .unwrap()
    }

    /// Counts lookups and always misses.
    #[derive(Default)]
    struct CountingResolver(AtomicUsize);

    impl ArtifactResolver for CountingResolver {
        async fn resolve(
            &self,
            project: &str,
            depth: u32,
        ) -> Result<Arc<CircuitArtifact>, ArtifactError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Err(ArtifactError::NotFound {
                project: project.to_string(),
                depth,
            })
        }
    }

    /// Loads anything; every call fails.
    struct BrokenEngine;
    struct BrokenInstance;

    impl ProvingEngine for BrokenEngine {
        type Instance = BrokenInstance;

        async fn load(
            &self,
            _artifact: Arc<CircuitArtifact>,
            _options: &BackendOptions,
        ) -> Result<BrokenInstance, BackendError> {
            Ok(BrokenInstance)
        }
    }

    impl BackendInstance for BrokenInstance {
        async fn verify(
            &self,
            _proof: &[u8],
            _public_inputs: &PublicInputs,
        ) -> Result<bool, BackendError> {
            Err(BackendError::Execution {
                program: "fake".to_string(),
                reason: "crashed".to_string(),
            })
        }

        async fn prove(&self, _inputs: &CircuitInputs) -> Result<ProofData, BackendError> {
            Err(BackendError::Unsupported("fake".to_string()))
        }
    }

    #[tokio::test]
    async fn test_generated_proof_verifies() {
        let proof = proof_at_depth_20().await;
        assert_eq!(proof.merkle_tree_depth, 20);
        assert_eq!(proof.scope, "1");
        assert_eq!(proof.message, "2");
        assert!(semaphore().verify_proof(&proof).await.unwrap());
    }

    #[tokio::test]
    async fn test_recorded_public_inputs_are_in_circuit_order() {
        let proof = proof_at_depth_20().await;
        let root = FieldElement::parse(&proof.merkle_tree_root).unwrap();
        let nullifier = FieldElement::parse(&proof.nullifier).unwrap();
        assert_eq!(
            proof.public_inputs,
            vec![
                hash(&Signal::from(1)).to_hex(),
                hash(&Signal::from(2)).to_hex(),
                root.to_hex(),
                nullifier.to_hex(),
            ]
        );
    }

    #[tokio::test]
    async fn test_changed_scope_verifies_false() {
        let mut proof = proof_at_depth_20().await;
        proof.scope = "3".to_string();
        assert!(!semaphore().verify_proof(&proof).await.unwrap());
    }

    #[tokio::test]
    async fn test_changed_message_verifies_false() {
        let mut proof = proof_at_depth_20().await;
        proof.message = "hello".to_string();
        assert!(!semaphore().verify_proof(&proof).await.unwrap());
    }

    #[tokio::test]
    async fn test_changed_root_verifies_false() {
        let mut proof = proof_at_depth_20().await;
        proof.merkle_tree_root = "12345".to_string();
        assert!(!semaphore().verify_proof(&proof).await.unwrap());
    }

    #[tokio::test]
    async fn test_changed_nullifier_verifies_false() {
        let mut proof = proof_at_depth_20().await;
        proof.nullifier = "12345".to_string();
        assert!(!semaphore().verify_proof(&proof).await.unwrap());
    }

    #[tokio::test]
    async fn test_changed_public_inputs_verify_false() {
        let mut proof = proof_at_depth_20().await;
        proof.public_inputs.swap(0, 1);
        assert!(!semaphore().verify_proof(&proof).await.unwrap());
    }

    #[tokio::test]
    async fn test_consistent_tampering_verifies_false() {
        // Scope and its public input changed together: the record is
        // self-consistent, so the backend itself must reject it.
        let mut proof = proof_at_depth_20().await;
        proof.scope = "3".to_string();
        proof.public_inputs[0] = hash(&Signal::from(3)).to_hex();
        assert!(!semaphore().verify_proof(&proof).await.unwrap());
    }

    #[tokio::test]
    async fn test_mismatch_still_surfaces_backend_errors() {
        let mut proof = proof_at_depth_20().await;
        proof.scope = "3".to_string();
        let broken = Semaphore::new(artifacts(), BrokenEngine);
        assert!(matches!(
            broken.verify_proof(&proof).await,
            Err(ProofError::Backend(_))
        ));
    }

    #[tokio::test]
    async fn test_backend_error_is_not_false() {
        let proof = proof_at_depth_20().await;
        let broken = Semaphore::new(artifacts(), BrokenEngine);
        let err = broken.verify_proof(&proof).await.unwrap_err();
        assert!(matches!(err, ProofError::Backend(BackendError::Execution { .. })));
    }

    #[tokio::test]
    async fn test_malformed_proof_bytes_are_backend_error() {
        let mut proof = proof_at_depth_20().await;
        proof.proof.truncate(5);
        let err = semaphore().verify_proof(&proof).await.unwrap_err();
        assert!(matches!(err, ProofError::Backend(BackendError::MalformedProof(_))));
    }

    #[tokio::test]
    async fn test_validation_precedes_artifact_lookup() {
        let mut proof = proof_at_depth_20().await;
        proof.merkle_tree_depth = 0;
        let counting = Semaphore::new(CountingResolver::default(), MockEngine);

        let err = counting.verify_proof(&proof).await.unwrap_err();
        assert!(matches!(
            err,
            ProofError::Validation(ValidationError::DepthOutOfRange { .. })
        ));
        assert_eq!(err.field(), Some("proof.merkleTreeDepth"));
        assert_eq!(counting.resolver().0.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_artifact_failure_precedes_backend() {
        let proof = proof_at_depth_20().await;
        let counting = Semaphore::new(CountingResolver::default(), BrokenEngine);
        let err = counting.verify_proof(&proof).await.unwrap_err();
        assert!(matches!(
            err,
            ProofError::ArtifactResolution(ArtifactError::NotFound { depth: 20, .. })
        ));
        assert_eq!(counting.resolver().0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_depth_not_substituted() {
        let proof = proof_at_depth_20().await;
        let sparse = Semaphore::new(
            MemoryResolver::new().with(CircuitArtifact::new(DEFAULT_PROJECT, 21, b"{}".to_vec())),
            MockEngine,
        );
        assert!(matches!(
            sparse.verify_proof(&proof).await,
            Err(ProofError::ArtifactResolution(ArtifactError::NotFound { depth: 20, .. }))
        ));
    }

    #[tokio::test]
    async fn test_proof_for_other_depth_verifies_false() {
        let mut proof = proof_at_depth_20().await;
        proof.merkle_tree_depth = 21;
        assert!(!semaphore().verify_proof(&proof).await.unwrap());
    }

    #[tokio::test]
    async fn test_depth_defaults_to_group_depth() {
        let identity = mock_identity(4);
        let group = MockGroup::new((1..=8).map(|s| mock_identity(s).commitment));
        let proof = semaphore()
            .generate_proof(&identity, &group, "msg", "topic", None)
            .await
            .unwrap();
        assert_eq!(proof.merkle_tree_depth, 3);
        assert!(semaphore().verify_proof(&proof).await.unwrap());
    }

    #[tokio::test]
    async fn test_non_member_cannot_generate() {
        let outsider = mock_identity(99);
        let group = MockGroup::new([mock_identity(1).commitment]);
        let err = semaphore()
            .generate_proof(&outsider, &group, "1", "1", None)
            .await
            .unwrap_err();
        assert_eq!(err.field(), Some("group"));
    }

    #[tokio::test]
    async fn test_generation_rejects_bad_signal_before_lookup() {
        let counting = Semaphore::new(CountingResolver::default(), MockEngine);
        let identity = mock_identity(1);
        let group = MockGroup::new([identity.commitment]);
        let err = counting
            .generate_proof(&identity, &group, "", "1", None)
            .await
            .unwrap_err();
        assert_eq!(err.field(), Some("message"));
        assert_eq!(counting.resolver().0.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_backend_prove_failure_propagates() {
        let identity = mock_identity(1);
        let group = MockGroup::new([identity.commitment]);
        let err = Semaphore::new(artifacts(), BrokenEngine)
            .generate_proof(&identity, &group, "1", "1", None)
            .await
            .unwrap_err();
        assert!(matches!(err, ProofError::Backend(BackendError::Unsupported(_))));
    }

    #[tokio::test]
    async fn test_foreign_root_rejected() {
        let identity = mock_identity(1);
        let group = MockGroup::new([identity.commitment, mock_identity(2).commitment]);
        let mut path = semaphore_core::Group::generate_merkle_proof(&group, 0).unwrap();
        path.root = FieldElement::from(12345u64);

        let err = semaphore()
            .generate_proof(&identity, path, "1", "1", None)
            .await
            .unwrap_err();
        assert!(matches!(err, ProofError::Generation(_)));
    }
}
