//! Snapshot key utilities.

use std::path::Path;

use airclaim_proofs::{AirdropKey, KeyContext};
use eyre::Context as _;
use rand_core::OsRng;
use tracing::info;
use zeroize::Zeroizing;

use super::sensitive_output::write_sensitive_output;
use crate::common::{read_json, write_json};

/// Build an address-grant key and write it as JSON to `output`.
///
/// Returns the key's leaf hash.
///
/// # Errors
/// Returns an error if the address is not an accepted witness address or the
/// output cannot be written.
pub async fn key_address(
    address: &str,
    value: u64,
    sponsor: bool,
    output: &Path,
) -> eyre::Result<[u8; 32]> {
    let key = AirdropKey::from_address(address, value, sponsor)
        .with_context(|| format!("Invalid grant address {address}"))?;
    let hash = key.hash()?;

    write_json(output, &key).await?;
    info!(
        file = ?output,
        hash = %hex::encode(hash),
        value,
        sponsor,
        "Address key written"
    );
    Ok(hash)
}

/// Blind the key in `key_file` with a fresh tweak.
///
/// The blinded key is written to `key_out`; the tweak is written as hex to
/// `tweak_out` with owner-only permissions. The tweak is needed later to sign
/// the claim, so losing it forfeits the claim.
///
/// # Errors
/// Returns an error if the key cannot be read, cannot be blinded, or an
/// output cannot be written.
pub async fn key_blind(
    key_file: &Path,
    key_out: &Path,
    tweak_out: &Path,
    ctx: &KeyContext<'_>,
) -> eyre::Result<AirdropKey> {
    let key: AirdropKey = read_json(key_file, "key").await?;
    let (tweak, blinded) = key
        .generate(ctx, &mut OsRng)
        .with_context(|| format!("Failed to blind {} key", key.key_type().name()))?;

    let hex = Zeroizing::new(format!("{}\n", hex::encode(tweak.expose())));
    write_sensitive_output(tweak_out, &hex).await?;
    info!(file = ?tweak_out, "Tweak written");

    write_json(key_out, &blinded).await?;
    info!(
        file = ?key_out,
        from = key.key_type().name(),
        to = blinded.key_type().name(),
        "Blinded key written"
    );
    Ok(blinded)
}

#[cfg(test)]
mod tests {
    use airclaim_proofs::{AddressKey, SigningPolicy};
    use tempfile::tempdir;
    use test_utils::{TransparentGoo, rsa_fixture};

    use super::*;
    use crate::common::read_tweak;

    fn grant_address(hrp: &str) -> String {
        AddressKey {
            version: 0,
            address: vec![0x42; 20],
            value: 0,
            sponsor: false,
        }
        .to_bech32(hrp)
        .expect("bech32")
    }

    #[tokio::test]
    async fn address_key_is_written_as_json() {
        let dir = tempdir().expect("tempdir");
        let output = dir.path().join("grant.json");
        let address = grant_address("hs");

        let hash = key_address(&address, 7_000_000, false, &output)
            .await
            .expect("address key");

        let key: AirdropKey = read_json(&output, "key").await.expect("read back");
        assert!(key.is_address());
        assert_eq!(key.hash().expect("hash"), hash);
    }

    #[tokio::test]
    async fn unknown_prefix_is_rejected() {
        let dir = tempdir().expect("tempdir");
        let output = dir.path().join("grant.json");
        let address = grant_address("bc");
        assert!(key_address(&address, 1, false, &output).await.is_err());
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn rsa_key_blinds_to_goo() {
        let dir = tempdir().expect("tempdir");
        let key_file = dir.path().join("rsa.json");
        let key_out = dir.path().join("goo.json");
        let tweak_out = dir.path().join("tweak.hex");

        let rsa = AirdropKey::from_rsa_public(&rsa_fixture().to_public_key()).expect("rsa");
        write_json(&key_file, &rsa).await.expect("write");

        let goo = TransparentGoo;
        let ctx = KeyContext::new(&goo);
        let blinded = key_blind(&key_file, &key_out, &tweak_out, &ctx)
            .await
            .expect("blind");
        assert!(blinded.is_goo());

        let tweak = read_tweak(&tweak_out).await.expect("tweak");
        assert_eq!(rsa.apply_tweak(&tweak, &ctx).expect("reblind"), blinded);
    }

    #[tokio::test]
    async fn ed25519_blinding_keeps_variant() {
        let dir = tempdir().expect("tempdir");
        let key_file = dir.path().join("ed.json");
        let key_out = dir.path().join("ed-blinded.json");
        let tweak_out = dir.path().join("tweak.hex");

        let point = airclaim_crypto::ed25519_key::public_key_create(&[5; 32]).expect("point");
        let key = AirdropKey::from_ed25519_point(&point).expect("key");
        write_json(&key_file, &key).await.expect("write");

        let ctx = KeyContext::default().with_policy(SigningPolicy::default());
        let blinded = key_blind(&key_file, &key_out, &tweak_out, &ctx)
            .await
            .expect("blind");
        assert!(blinded.is_ed25519());
        assert_ne!(blinded, key);

        let tweak = read_tweak(&tweak_out).await.expect("tweak");
        assert_eq!(blinded.nonce(), Some(&tweak.commitment()));
    }

    #[tokio::test]
    async fn address_key_cannot_be_blinded() {
        let dir = tempdir().expect("tempdir");
        let key_file = dir.path().join("grant.json");
        key_address(&grant_address("ts"), 1, true, &key_file)
            .await
            .expect("address key");

        let result = key_blind(
            &key_file,
            &dir.path().join("out.json"),
            &dir.path().join("tweak.hex"),
            &KeyContext::default(),
        )
        .await;
        assert!(result.is_err());
        assert!(!dir.path().join("tweak.hex").exists());
    }
}
