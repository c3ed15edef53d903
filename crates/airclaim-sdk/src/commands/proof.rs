//! Claim inspection, signing and verification.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use airclaim_core::base::Hash;
use airclaim_proofs::{AirdropKey, AirdropProof, ClaimVerifier, KeyContext, VerifiedClaim};
use eyre::{Context as _, bail, ensure};
use rand_core::OsRng;
use serde::Serialize;
use serde_with::hex::Hex;
use serde_with::serde_as;
use tracing::{info, warn};

use crate::common::{
    load_snapshot_config, read_json, read_proof, read_secret_key, read_tweak, write_json,
};

/// What `proof inspect` reports about a claim.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimSummary {
    /// Key variant, or `None` if the key bytes do not decode.
    pub key_type: Option<&'static str>,
    /// Digest the claim signature covers.
    #[serde_as(as = "Hex")]
    pub signature_hash: Hash,
    /// Bit in the shared claim bitfield.
    pub position: Option<u32>,
    /// Value claimed before the fee.
    pub value: u64,
    /// Declared fee.
    pub fee: u64,
    /// Encoded size.
    pub weight: usize,
    /// `ceil(weight / 4)`.
    pub virtual_size: usize,
    /// Whether every bound check passes.
    pub sane: bool,
}

/// Summarise a claim without checking its path or signature.
///
/// The summary is written as JSON to `output`, or printed when no output is
/// given.
///
/// # Errors
/// Returns an error if the claim or configuration cannot be loaded.
#[allow(clippy::print_stdout, reason = "Prints summary to stdout")]
pub async fn proof_inspect(
    proof_file: &Path,
    config_file: &Path,
    output: Option<&Path>,
) -> eyre::Result<ClaimSummary> {
    let trees = load_snapshot_config(config_file).await?;
    let proof = read_proof(proof_file).await?;

    let summary = ClaimSummary {
        key_type: proof.decode_key().ok().map(|key| key.key_type().name()),
        signature_hash: proof.signature_hash()?,
        position: proof.position(&trees),
        value: proof.value(&trees),
        fee: proof.fee,
        weight: proof.weight(),
        virtual_size: proof.virtual_size(),
        sane: proof.is_sane(&trees),
    };

    match output {
        Some(path) => write_json(path, &summary).await?,
        None => println!("{}", serde_json::to_string_pretty(&summary)?),
    }
    Ok(summary)
}

/// Attach the originating RSA key a GOO key was blinded from.
async fn attach_origin(key: AirdropKey, origin_file: &Path) -> eyre::Result<AirdropKey> {
    let AirdropKey::Goo(goo) = key else {
        bail!("An origin key only applies to GOO keys");
    };
    let origin: AirdropKey = read_json(origin_file, "origin key").await?;
    let AirdropKey::Rsa(origin) = origin else {
        bail!("Origin key must be an RSA key");
    };
    Ok(AirdropKey::Goo(goo.with_origin(origin)))
}

/// Files needed to sign a claim.
#[derive(Debug, Clone)]
pub struct SigningInputs {
    /// Unsigned claim, JSON or hex.
    pub proof_file: PathBuf,
    /// Key the claim was built for, JSON.
    pub key_file: PathBuf,
    /// Secret-key JSON.
    pub secret_file: PathBuf,
    /// Blinding tweak, hex. Required for blinded keys.
    pub tweak_file: Option<PathBuf>,
    /// RSA key a GOO key was blinded from. Required for GOO keys.
    pub origin_file: Option<PathBuf>,
}

/// Sign a claim and write the signed claim as JSON to `output`.
///
/// # Errors
/// Returns an error if an input cannot be loaded, the key does not match the
/// claim, or the key refuses to sign.
pub async fn proof_sign(
    inputs: &SigningInputs,
    output: &Path,
    ctx: &KeyContext<'_>,
) -> eyre::Result<AirdropProof> {
    let proof = read_proof(&inputs.proof_file).await?;
    let mut key: AirdropKey = read_json(&inputs.key_file, "key").await?;
    if let Some(origin_file) = &inputs.origin_file {
        key = attach_origin(key, origin_file).await?;
    }
    let secret = read_secret_key(&inputs.secret_file).await?;
    let tweak = match &inputs.tweak_file {
        Some(path) => Some(read_tweak(path).await?),
        None => None,
    };

    let signed = proof
        .sign(&key, &secret, tweak.as_ref(), ctx, &mut OsRng)
        .with_context(|| format!("Failed to sign claim with {} key", key.key_type().name()))?;

    write_json(output, &signed).await?;
    info!(
        file = ?output,
        key_type = key.key_type().name(),
        signature_len = signed.signature.len(),
        "Signed claim written"
    );
    Ok(signed)
}

/// Verify a batch of claims against the snapshot.
///
/// Every claim is checked and reported; the call fails if any claim is
/// rejected or two claims take the same bitfield position.
///
/// # Errors
/// Returns an error if an input cannot be loaded or any claim is invalid.
pub async fn proof_verify(
    proof_files: &[PathBuf],
    config_file: &Path,
    expected_root: Option<Hash>,
    ctx: &KeyContext<'_>,
) -> eyre::Result<Vec<VerifiedClaim>> {
    ensure!(!proof_files.is_empty(), "No claims to verify");

    let trees = load_snapshot_config(config_file).await?;
    let mut verifier = ClaimVerifier::new(trees, *ctx);
    if let Some(root) = expected_root {
        verifier = verifier.with_expected_root(root);
    }

    let mut accepted = Vec::with_capacity(proof_files.len());
    let mut claimed: BTreeMap<u32, &Path> = BTreeMap::new();
    let mut invalid_count = 0_usize;

    for file in proof_files {
        let proof = read_proof(file).await?;
        match verifier.verify(&proof) {
            Ok(claim) => {
                if let Some(first) = claimed.insert(claim.position, file.as_path()) {
                    invalid_count = invalid_count.saturating_add(1);
                    warn!(
                        file = ?file,
                        first = ?first,
                        position = claim.position,
                        "Claim DUPLICATE"
                    );
                    continue;
                }
                info!(
                    file = ?file,
                    position = claim.position,
                    value = claim.value,
                    fee = claim.fee,
                    "Claim VALID"
                );
                accepted.push(claim);
            }
            Err(reason) => {
                invalid_count = invalid_count.saturating_add(1);
                warn!(file = ?file, %reason, "Claim INVALID");
            }
        }
    }

    ensure!(
        invalid_count == 0,
        "{invalid_count} of {} claims failed verification",
        proof_files.len()
    );
    info!(count = accepted.len(), "All claims are VALID");
    Ok(accepted)
}

#[cfg(test)]
mod tests {
    use tempfile::{TempDir, tempdir};
    use test_utils::{TransparentGoo, rsa_fixture, rsa_secret_components};

    use super::*;

    struct GooClaim {
        dir: TempDir,
        inputs: SigningInputs,
    }

    async fn goo_claim(ctx: &KeyContext<'_>) -> GooClaim {
        let dir = tempdir().expect("tempdir");
        let path = |name: &str| dir.path().join(name);

        let rsa = AirdropKey::from_rsa_public(&rsa_fixture().to_public_key()).expect("rsa");
        let (tweak, goo) = rsa.generate(ctx, &mut OsRng).expect("blind");
        let proof = AirdropProof::new(&goo, 0, vec![0x5c; 20], 1_000).expect("proof");

        write_json(&path("claim.json"), &proof).await.expect("write");
        write_json(&path("goo.json"), &goo).await.expect("write");
        write_json(&path("rsa.json"), &rsa).await.expect("write");
        tokio::fs::write(path("tweak.hex"), hex::encode(tweak.expose()))
            .await
            .expect("write");

        let (d, p, q, qi) = rsa_secret_components();
        let secret = serde_json::json!({
            "pgp": { "rsa": {
                "d": hex::encode(d),
                "p": hex::encode(p),
                "q": hex::encode(q),
                "qi": hex::encode(qi),
            } }
        });
        tokio::fs::write(path("secret.json"), secret.to_string())
            .await
            .expect("write");

        let inputs = SigningInputs {
            proof_file: path("claim.json"),
            key_file: path("goo.json"),
            secret_file: path("secret.json"),
            tweak_file: Some(path("tweak.hex")),
            origin_file: Some(path("rsa.json")),
        };
        GooClaim { dir, inputs }
    }

    #[tokio::test]
    async fn goo_claim_is_signed_with_origin() {
        let backend = TransparentGoo;
        let ctx = KeyContext::new(&backend);
        let claim = goo_claim(&ctx).await;
        let output = claim.dir.path().join("signed.json");

        let signed = proof_sign(&claim.inputs, &output, &ctx).await.expect("sign");
        assert!(signed.verify_signature(&ctx));
        assert_eq!(read_proof(&output).await.expect("read back"), signed);
    }

    #[tokio::test]
    async fn goo_claim_needs_origin_and_tweak() {
        let backend = TransparentGoo;
        let ctx = KeyContext::new(&backend);
        let claim = goo_claim(&ctx).await;
        let output = claim.dir.path().join("signed.json");

        let no_origin = SigningInputs {
            origin_file: None,
            ..claim.inputs.clone()
        };
        assert!(proof_sign(&no_origin, &output, &ctx).await.is_err());

        let no_tweak = SigningInputs {
            tweak_file: None,
            ..claim.inputs.clone()
        };
        assert!(proof_sign(&no_tweak, &output, &ctx).await.is_err());

        // An origin is meaningless for anything but a GOO key.
        let wrong_origin = SigningInputs {
            key_file: claim.inputs.origin_file.clone().expect("origin"),
            ..claim.inputs.clone()
        };
        assert!(proof_sign(&wrong_origin, &output, &ctx).await.is_err());
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn verify_needs_claims() {
        let dir = tempdir().expect("tempdir");
        let result = proof_verify(
            &[],
            &dir.path().join("missing.json"),
            None,
            &KeyContext::default(),
        )
        .await;
        assert!(result.is_err());
    }
}
