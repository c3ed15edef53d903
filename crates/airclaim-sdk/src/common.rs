//! CLI-independent input loading.

use std::path::Path;

use airclaim_core::schema::config::SnapshotTreeConfig;
use airclaim_proofs::{AirdropProof, SecretKey, Tweak};
use eyre::{Context as _, ensure};
use secrecy::{ExposeSecret as _, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use zeroize::Zeroizing;

/// Read and parse a JSON document.
///
/// # Errors
/// Returns an error if the file cannot be read or does not parse as `T`.
pub async fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> eyre::Result<T> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {what} file {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {what} JSON"))
}

/// Serialize `value` as pretty JSON into `path`.
///
/// # Errors
/// Returns an error if serialization or the write fails.
pub async fn write_json<T: Serialize>(path: &Path, value: &T) -> eyre::Result<()> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    tokio::fs::write(path, text)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Load the snapshot tree parameters and check they are consistent.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed, or fails validation.
pub async fn load_snapshot_config(path: &Path) -> eyre::Result<SnapshotTreeConfig> {
    let config: SnapshotTreeConfig = read_json(path, "snapshot config").await?;
    config
        .validate()
        .with_context(|| format!("Invalid snapshot config {}", path.display()))?;
    Ok(config)
}

async fn read_secret_file(path: &Path) -> eyre::Result<SecretString> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let text = Zeroizing::new(text);
    Ok(SecretString::new(text.trim().to_owned().into_boxed_str()))
}

/// Read secret-key material from a JSON file.
///
/// # Errors
/// Returns an error if the file cannot be read or is not a secret-key document.
pub async fn read_secret_key(path: &Path) -> eyre::Result<SecretKey> {
    let text = read_secret_file(path).await?;
    serde_json::from_str(text.expose_secret()).context("Failed to parse secret key JSON")
}

/// Read a hex-encoded blinding tweak.
///
/// # Errors
/// Returns an error if the file cannot be read or does not hold 32 hex bytes.
pub async fn read_tweak(path: &Path) -> eyre::Result<Tweak> {
    let text = read_secret_file(path).await?;
    let bytes = Zeroizing::new(hex::decode(text.expose_secret()).context("Invalid hex tweak")?);
    ensure!(
        bytes.len() == 32,
        "Tweak must be exactly 32 bytes (64 hex characters), got {} bytes",
        bytes.len()
    );
    Ok(Tweak::from_slice(&bytes)?)
}

/// Read a claim stored either as JSON or as hex of the binary encoding.
///
/// # Errors
/// Returns an error if the file cannot be read or holds neither form.
pub async fn read_proof(path: &Path) -> eyre::Result<AirdropProof> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read claim file {}", path.display()))?;
    let text = text.trim();
    if text.starts_with('{') {
        return serde_json::from_str(text).context("Failed to parse claim JSON");
    }
    let bytes = hex::decode(text).context("Claim file is neither JSON nor hex")?;
    AirdropProof::decode(&bytes).context("Failed to decode claim")
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[tokio::test]
    async fn tweak_must_be_32_bytes() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("tweak.hex");

        tokio::fs::write(&path, format!("{}\n", "07".repeat(32)))
            .await
            .expect("write");
        let tweak = read_tweak(&path).await.expect("tweak");
        assert_eq!(tweak.expose(), &[7; 32]);

        tokio::fs::write(&path, "0707").await.expect("write");
        assert!(read_tweak(&path).await.is_err());
    }

    #[tokio::test]
    async fn proof_reads_json_and_hex() {
        let dir = tempdir().expect("tempdir");
        let proof = AirdropProof {
            key: vec![3; 65],
            address: vec![1; 20],
            fee: 9,
            ..AirdropProof::default()
        };

        let hex_path = dir.path().join("claim.hex");
        let bytes = proof.encode().expect("encode");
        tokio::fs::write(&hex_path, hex::encode(bytes))
            .await
            .expect("write");
        assert_eq!(read_proof(&hex_path).await.expect("hex"), proof);

        let json_path = dir.path().join("claim.json");
        let ed = airclaim_proofs::AirdropKey::from_ed25519_point(&[3; 32]).expect("key");
        let keyed = AirdropProof::new(&ed, 0, vec![1; 20], 9).expect("proof");
        write_json(&json_path, &keyed).await.expect("write");
        assert_eq!(read_proof(&json_path).await.expect("json"), keyed);
    }

    #[tokio::test]
    async fn invalid_config_is_rejected() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("trees.json");
        tokio::fs::write(
            &path,
            serde_json::json!({
                "version": 1,
                "airdrop": {
                    "root": "11".repeat(32),
                    "depth": 2, "subdepth": 1, "leaves": 9, "subleaves": 2, "reward": 1
                },
                "faucet": { "root": "22".repeat(32), "depth": 1, "leaves": 2 }
            })
            .to_string(),
        )
        .await
        .expect("write");
        assert!(load_snapshot_config(&path).await.is_err());
    }
}
