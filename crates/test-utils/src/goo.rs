use airclaim_core::base::{ByteReader, ByteWriter, DecodeError};
use airclaim_crypto::{CryptoError, GOO_C1_SIZE, GooScheme, Tweak, rsa_key};
use rand_core::CryptoRngCore;
use rsa::traits::PublicKeyParts as _;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest as _, Sha256};

/// Goo backend that hides nothing.
///
/// `C1` is a hash expansion of `secret || n || e`, and a signature carries
/// `n`, `e` and the secret in the clear next to an RSASSA-PSS signature. It
/// binds signatures to commitments the same way a real backend must, which is
/// all the claim logic depends on. Encryption is plain RSA-OAEP.
#[derive(Debug, Default, Clone, Copy)]
pub struct TransparentGoo;

fn commit(secret: &[u8], n: &[u8], e: &[u8]) -> [u8; GOO_C1_SIZE] {
    let mut c1 = [0_u8; GOO_C1_SIZE];
    for (counter, block) in (0_u8..).zip(c1.chunks_mut(32)) {
        let digest = Sha256::new()
            .chain_update([counter])
            .chain_update(secret)
            .chain_update(n)
            .chain_update(e)
            .finalize();
        block.copy_from_slice(&digest);
    }
    c1
}

type SignatureParts<'a> = (&'a [u8], &'a [u8], [u8; 32], &'a [u8]);

fn parse_signature(sig: &[u8]) -> Result<SignatureParts<'_>, DecodeError> {
    let mut reader = ByteReader::new(sig);
    let n = reader.read_var_bytes()?;
    let e = reader.read_var_bytes()?;
    let secret = reader.read_array()?;
    let pss = reader.read_var_bytes()?;
    reader.finish()?;
    Ok((n, e, secret, pss))
}

impl GooScheme for TransparentGoo {
    fn challenge(
        &self,
        secret: &Tweak,
        key: &RsaPublicKey,
    ) -> Result<[u8; GOO_C1_SIZE], CryptoError> {
        let (n, e) = rsa_key::public_parts(key);
        Ok(commit(secret.expose(), &n, &e))
    }

    fn sign(
        &self,
        msg: &[u8],
        secret: &Tweak,
        key: &RsaPrivateKey,
        rng: &mut dyn CryptoRngCore,
    ) -> Result<Vec<u8>, CryptoError> {
        let pss = rsa_key::sign(key, msg, rng)?;
        let mut writer = ByteWriter::default();
        writer
            .write_var_bytes(&key.n().to_bytes_be())
            .write_var_bytes(&key.e().to_bytes_be())
            .write_bytes(secret.expose())
            .write_var_bytes(&pss);
        Ok(writer.into_inner())
    }

    fn verify(&self, msg: &[u8], sig: &[u8], c1: &[u8; GOO_C1_SIZE]) -> bool {
        let Ok((n, e, secret, pss)) = parse_signature(sig) else {
            return false;
        };
        &commit(&secret, n, e) == c1 && rsa_key::verify(n, e, msg, pss)
    }

    fn encrypt(
        &self,
        msg: &[u8],
        key: &RsaPublicKey,
        rng: &mut dyn CryptoRngCore,
    ) -> Result<Vec<u8>, CryptoError> {
        key.encrypt(&mut &mut *rng, Oaep::new::<Sha256>(), msg)
            .map_err(|_| CryptoError::Encryption)
    }

    fn decrypt(&self, ciphertext: &[u8], key: &RsaPrivateKey) -> Result<Vec<u8>, CryptoError> {
        key.decrypt(Oaep::new::<Sha256>(), ciphertext)
            .map_err(|_| CryptoError::Decryption)
    }
}
