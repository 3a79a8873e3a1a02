use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tempdir::TempDir;
use tokio::process::Command;
use zk_primitives::Element;

use crate::{CircuitKind, Proof, ProofOutput, Prover, ProverError, VerifierProof, Witness};

/// A [`Prover`] that shells out to the snarkjs CLI
///
/// The compiled circuits are expected at `<artifacts_dir>/<circuit>/<circuit>.wasm` and
/// `<artifacts_dir>/<circuit>/<circuit>.zkey`, next to the circuit's `verification_key.json`.
/// Circuit names are the [`Display`](std::fmt::Display) form of [`CircuitKind`].
#[derive(Debug, Clone)]
pub struct SnarkjsProver {
    artifacts_dir: PathBuf,
    snarkjs: PathBuf,
}

impl SnarkjsProver {
    /// Create a prover that runs `snarkjs` against the circuits in `artifacts_dir`
    pub fn new(artifacts_dir: impl Into<PathBuf>, snarkjs: impl Into<PathBuf>) -> Self {
        Self {
            artifacts_dir: artifacts_dir.into(),
            snarkjs: snarkjs.into(),
        }
    }

    fn artifact(&self, kind: CircuitKind, file: &str) -> Result<PathBuf, ProverError> {
        let path = self.artifacts_dir.join(kind.to_string()).join(file);
        if !path.exists() {
            return Err(ProverError::MissingArtifact(path));
        }

        Ok(path)
    }

    /// Run snarkjs with `args`, returning its stdout if it succeeds
    async fn run<I, S>(&self, args: I) -> Result<String, ProverError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = Command::new(&self.snarkjs);
        command.args(args);

        let output = command.output().await?;
        if !output.status.success() {
            return Err(ProverError::Command {
                command: format!("{command:?}"),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

async fn write_json<T>(path: &Path, value: &T) -> Result<(), ProverError>
where
    T: serde::Serialize + ?Sized,
{
    tokio::fs::write(path, serde_json::to_vec(value)?).await?;
    Ok(())
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ProverError> {
    let bytes = tokio::fs::read(path).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[async_trait]
impl Prover for SnarkjsProver {
    #[tracing::instrument(skip_all, fields(circuit = %witness.kind()))]
    async fn prove(&self, witness: &Witness) -> Result<ProofOutput, ProverError> {
        let kind = witness.kind();
        let wasm = self.artifact(kind, &format!("{kind}.wasm"))?;
        let zkey = self.artifact(kind, &format!("{kind}.zkey"))?;

        let dir = TempDir::new("zktips_prove")?;
        let input = dir.path().join("input.json");
        let proof = dir.path().join("proof.json");
        let public = dir.path().join("public.json");

        write_json(&input, witness.inputs()).await?;

        tracing::debug!("running snarkjs groth16 fullprove");
        self.run([
            OsStr::new("groth16"),
            OsStr::new("fullprove"),
            input.as_os_str(),
            wasm.as_os_str(),
            zkey.as_os_str(),
            proof.as_os_str(),
            public.as_os_str(),
        ])
        .await?;

        let proof: Proof = read_json(&proof).await?;
        let public_signals: Vec<Element> = read_json(&public).await?;

        if public_signals != witness.public_signals() {
            return Err(ProverError::PublicSignalMismatch {
                kind,
                expected: witness.public_signals().to_vec(),
                found: public_signals,
            });
        }

        Ok(ProofOutput {
            proof,
            public_signals,
        })
    }

    #[tracing::instrument(skip_all, fields(circuit = %kind))]
    async fn verify(
        &self,
        kind: CircuitKind,
        public_signals: &[Element],
        proof: &VerifierProof,
    ) -> Result<bool, ProverError> {
        let vkey = self.artifact(kind, "verification_key.json")?;

        let dir = TempDir::new("zktips_verify")?;
        let public = dir.path().join("public.json");
        let proof_path = dir.path().join("proof.json");

        write_json(&public, public_signals).await?;
        write_json(&proof_path, &proof.to_snarkjs_format()).await?;

        let result = self
            .run([
                OsStr::new("groth16"),
                OsStr::new("verify"),
                vkey.as_os_str(),
                public.as_os_str(),
                proof_path.as_os_str(),
            ])
            .await;

        match result {
            Ok(stdout) => Ok(stdout.contains("OK")),
            // snarkjs exits non-zero when a proof is rejected
            Err(ProverError::Command { stderr, .. }) if stderr.contains("Invalid") => Ok(false),
            Err(err) => Err(err),
        }
    }
}
