//! End-to-end claims against a small snapshot built with the reference tree.

#![allow(missing_docs)]
#![allow(
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing,
    reason = "Test code should panic on invalid data"
)]

use airclaim_core::base::Hash;
use airclaim_core::schema::config::{AirdropTree, FaucetTree, SNAPSHOT_CONFIG_VERSION, SnapshotTreeConfig};
use airclaim_crypto::{ed25519_key, p256_key};
use airclaim_proofs::key::{PgpSecretKey, SshPrivateKey};
use airclaim_proofs::proof::{RECIPIENT_FEE, SPONSOR_FEE};
use airclaim_proofs::{
    AddressKey, AirdropKey, AirdropProof, ClaimRejection, ClaimVerifier, KeyContext, SanityError,
    SecretKey, SigningPolicy, Tweak,
};
use rand_core::OsRng;
use rsa::Pss;
use sha2::Sha256;
use test_utils::{MerkleTree, TransparentGoo, rsa_fixture, rsa_secret_components};

const SUBLEAVES: usize = 2;
const DESTINATION: [u8; 20] = [0x5c; 20];

/// Two-level airdrop tree plus flat faucet tree.
struct Snapshot {
    trees: SnapshotTreeConfig,
    subtrees: Vec<MerkleTree>,
    outer: MerkleTree,
    faucet: MerkleTree,
}

impl Snapshot {
    fn new(airdrop: &[AirdropKey], faucet: &[AirdropKey]) -> Self {
        let leaves: Vec<Hash> = airdrop.iter().map(|key| key.hash().expect("hash")).collect();
        let subtrees: Vec<MerkleTree> = leaves
            .chunks(SUBLEAVES)
            .map(|chunk| MerkleTree::new(chunk.to_vec()))
            .collect();
        let outer = MerkleTree::new(subtrees.iter().map(MerkleTree::root).collect());
        let faucet = MerkleTree::new(faucet.iter().map(|key| key.hash().expect("hash")).collect());

        let trees = SnapshotTreeConfig {
            version: SNAPSHOT_CONFIG_VERSION,
            airdrop: AirdropTree {
                root: outer.root(),
                depth: u8::try_from(outer.depth()).expect("depth"),
                subdepth: 1,
                leaves: u32::try_from(outer.len()).expect("leaves"),
                subleaves: u16::try_from(SUBLEAVES).expect("subleaves"),
                reward: 4_000_000_000,
            },
            faucet: FaucetTree {
                root: faucet.root(),
                depth: u8::try_from(faucet.depth()).expect("depth"),
                leaves: u32::try_from(faucet.len()).expect("leaves"),
            },
        };
        trees.validate().expect("valid trees");

        Self {
            trees,
            subtrees,
            outer,
            faucet,
        }
    }

    fn airdrop_claim(&self, key: &AirdropKey, slot: usize, fee: u64) -> AirdropProof {
        let (index, subindex) = (slot / SUBLEAVES, slot % SUBLEAVES);
        AirdropProof::new(key, 0, DESTINATION.to_vec(), fee)
            .expect("proof")
            .with_airdrop_path(
                u32::try_from(index).expect("index"),
                self.outer.path(index),
                u8::try_from(subindex).expect("subindex"),
                self.subtrees[index].path(subindex),
            )
    }

    fn faucet_claim(&self, key: &AirdropKey, slot: usize, fee: u64) -> AirdropProof {
        let AirdropKey::Address(grant) = key else {
            panic!("faucet keys are address grants");
        };
        AirdropProof::new(key, grant.version, grant.address.clone(), fee)
            .expect("proof")
            .with_faucet_path(u32::try_from(slot).expect("index"), self.faucet.path(slot))
    }
}

struct Holder {
    key: AirdropKey,
    secret: SecretKey,
    tweak: Option<Tweak>,
}

fn ed25519_holder() -> Holder {
    let seed = [0x17_u8; 32];
    Holder {
        key: AirdropKey::from_ed25519_point(&ed25519_key::public_key_create(&seed).expect("point"))
            .expect("key"),
        secret: SecretKey::Ssh(SshPrivateKey::Ecc { key: seed.to_vec() }),
        tweak: None,
    }
}

fn p256_holder() -> Holder {
    let scalar = [0x29_u8; 32];
    Holder {
        key: AirdropKey::from_p256_point(&p256_key::public_key_create(&scalar).expect("point"))
            .expect("key"),
        secret: SecretKey::Pgp(PgpSecretKey::Ecc { d: scalar.to_vec() }),
        tweak: None,
    }
}

fn rsa_holder() -> Holder {
    let (d, p, q, qi) = rsa_secret_components();
    Holder {
        key: AirdropKey::from_rsa_public(&rsa_fixture().to_public_key()).expect("key"),
        secret: SecretKey::Pgp(PgpSecretKey::Rsa { d, p, q, qi }),
        tweak: None,
    }
}

fn goo_holder(ctx: &KeyContext<'_>) -> Holder {
    let rsa = AirdropKey::from_rsa_public(&rsa_fixture().to_public_key()).expect("key");
    let (tweak, key) = rsa.generate(ctx, &mut OsRng).expect("blind");
    let (d, p, q, qi) = rsa_secret_components();
    Holder {
        key,
        secret: SecretKey::Pgp(PgpSecretKey::Rsa { d, p, q, qi }),
        tweak: Some(tweak),
    }
}

fn grant(byte: u8, value: u64, sponsor: bool) -> AirdropKey {
    AirdropKey::Address(AddressKey {
        version: 0,
        address: vec![byte; 20],
        value,
        sponsor,
    })
}

fn sign(holder: &Holder, proof: &AirdropProof, ctx: &KeyContext<'_>) -> AirdropProof {
    proof
        .sign(&holder.key, &holder.secret, holder.tweak.as_ref(), ctx, &mut OsRng)
        .expect("sign")
}

#[test]
fn signed_claims_verify_for_every_signing_variant() {
    let goo = TransparentGoo;
    let ctx = KeyContext::new(&goo);
    let holders = [ed25519_holder(), p256_holder(), rsa_holder(), goo_holder(&ctx)];
    let keys: Vec<AirdropKey> = holders.iter().map(|holder| holder.key.clone()).collect();
    let snapshot = Snapshot::new(&keys, &[grant(1, 10, false)]);
    let verifier = ClaimVerifier::new(snapshot.trees.clone(), ctx);

    for (slot, holder) in holders.iter().enumerate() {
        let claim = sign(holder, &snapshot.airdrop_claim(&holder.key, slot, 1_000), &ctx);
        assert!(claim.verify(&snapshot.trees, &ctx, None), "slot {slot}");

        let bytes = claim.encode().expect("encode");
        let outcome = verifier.verify_bytes(&bytes).expect("verified");
        assert_eq!(outcome.position, u32::try_from(slot / SUBLEAVES).expect("position"));
        assert_eq!(outcome.value, snapshot.trees.airdrop.reward);

        let json = serde_json::to_string(&claim).expect("json");
        assert_eq!(serde_json::from_str::<AirdropProof>(&json).expect("parse"), claim);

        let amended = AirdropProof {
            fee: claim.fee + 1,
            ..claim.clone()
        };
        assert!(!amended.verify(&snapshot.trees, &ctx, None), "amended slot {slot}");
    }
}

#[test]
fn rsa_claim_signed_over_the_signature_hash_verifies() {
    let ctx = KeyContext::default();
    let holder = rsa_holder();
    let snapshot = Snapshot::new(&[holder.key.clone()], &[grant(1, 10, false)]);
    let unsigned = snapshot.airdrop_claim(&holder.key, 0, 1_000);
    let digest = unsigned.signature_hash().expect("signature hash");

    // PSS with the signature hash itself as the message hash.
    let signature = rsa_fixture()
        .sign_with_rng(&mut OsRng, Pss::new::<Sha256>(), &digest)
        .expect("sign digest");
    let claim = AirdropProof {
        signature,
        ..unsigned.clone()
    };
    assert!(claim.verify_signature(&ctx));
    assert!(claim.verify(&snapshot.trees, &ctx, None));

    let ours = sign(&holder, &unsigned, &ctx);
    rsa_fixture()
        .to_public_key()
        .verify(Pss::new::<Sha256>(), &digest, &ours.signature)
        .expect("signature covers the signature hash");
}

#[test]
fn tampered_paths_and_indices_fail() {
    let ctx = KeyContext::default();
    let holders = [ed25519_holder(), p256_holder()];
    let keys: Vec<AirdropKey> = holders.iter().map(|holder| holder.key.clone()).collect();
    let extra: Vec<AirdropKey> = (0..5_u8)
        .map(|i| AirdropKey::from_ed25519_point(&[i; 32]).expect("key"))
        .collect();
    let snapshot = Snapshot::new(&[keys, extra].concat(), &[grant(1, 10, false)]);

    let claim = sign(&holders[1], &snapshot.airdrop_claim(&holders[1].key, 1, 0), &ctx);
    assert!(claim.verify_merkle(&snapshot.trees, None));

    for level in 0..claim.proof.len() {
        for byte in [0, 31] {
            let mut tampered = claim.clone();
            tampered.proof[level][byte] ^= 1;
            assert!(!tampered.verify_merkle(&snapshot.trees, None));
        }
    }
    let mut tampered = claim.clone();
    tampered.subproof[0][7] ^= 0x80;
    assert!(!tampered.verify_merkle(&snapshot.trees, None));

    let moved = AirdropProof {
        subindex: 0,
        ..claim.clone()
    };
    assert!(!moved.verify_merkle(&snapshot.trees, None));

    let out_of_range = AirdropProof {
        index: snapshot.trees.airdrop.leaves,
        ..claim.clone()
    };
    assert!(!out_of_range.is_sane(&snapshot.trees));
    assert!(!out_of_range.verify(&snapshot.trees, &ctx, None));
}

#[test]
fn goo_commitment_tampering_fails() {
    let goo = TransparentGoo;
    let ctx = KeyContext::new(&goo);
    let holder = goo_holder(&ctx);
    let snapshot = Snapshot::new(&[holder.key.clone()], &[grant(1, 10, false)]);
    let claim = sign(&holder, &snapshot.airdrop_claim(&holder.key, 0, 0), &ctx);
    assert!(claim.verify_signature(&ctx));

    let mut tampered = claim.clone();
    let last = tampered.key.len() - 1;
    tampered.key[last] ^= 1;
    assert!(!tampered.verify_signature(&ctx));
    assert!(!tampered.verify(&snapshot.trees, &ctx, None));

    assert!(
        !claim.verify_signature(&KeyContext::default()),
        "an unavailable backend must not accept GOO signatures"
    );
}

#[test]
fn tweaked_ec_claim_needs_opt_in() {
    let ctx = KeyContext::default();
    let holder = ed25519_holder();
    let (tweak, blinded) = holder.key.generate(&ctx, &mut OsRng).expect("blind");
    let blinded_holder = Holder {
        key: blinded,
        secret: holder.secret.clone(),
        tweak: Some(tweak),
    };
    let snapshot = Snapshot::new(&[blinded_holder.key.clone()], &[grant(1, 10, false)]);
    let unsigned = snapshot.airdrop_claim(&blinded_holder.key, 0, 0);

    assert!(
        unsigned
            .sign(
                &blinded_holder.key,
                &blinded_holder.secret,
                blinded_holder.tweak.as_ref(),
                &ctx,
                &mut OsRng
            )
            .is_err()
    );

    let permissive = ctx.with_policy(SigningPolicy {
        allow_tweaked_ec: true,
    });
    let claim = sign(&blinded_holder, &unsigned, &permissive);
    assert!(claim.verify(&snapshot.trees, &ctx, None));
}

#[test]
fn address_grant_scenario() {
    let ctx = KeyContext::default();
    let recipient = grant(0xa0, 2_000_000_000, false);
    let sponsor = grant(0xb0, 2_000_000_000, true);
    let snapshot = Snapshot::new(
        &[ed25519_holder().key],
        &[recipient.clone(), sponsor.clone(), grant(0xc0, 5, false)],
    );

    let claim = snapshot.faucet_claim(&recipient, 0, RECIPIENT_FEE);
    assert!(claim.verify(&snapshot.trees, &ctx, None));
    assert_eq!(
        claim.position(&snapshot.trees),
        Some(snapshot.trees.airdrop.leaves)
    );

    let overpaid = snapshot.faucet_claim(&recipient, 0, RECIPIENT_FEE + 1);
    assert!(overpaid.is_sane(&snapshot.trees));
    assert!(!overpaid.verify(&snapshot.trees, &ctx, None));

    let sponsored = snapshot.faucet_claim(&sponsor, 1, SPONSOR_FEE);
    assert!(sponsored.verify(&snapshot.trees, &ctx, None));

    let signed = AirdropProof {
        signature: vec![0; 64],
        ..claim.clone()
    };
    assert!(!signed.verify(&snapshot.trees, &ctx, None));

    // A 5-unit grant cannot cover the fixed fee.
    let tiny = snapshot.faucet_claim(&grant(0xc0, 5, false), 2, RECIPIENT_FEE);
    assert_eq!(
        tiny.check_sanity(&snapshot.trees),
        Err(SanityError::Fee {
            fee: RECIPIENT_FEE,
            value: 5
        })
    );
}

#[test]
fn single_grant_faucet_has_leaf_as_root() {
    let ctx = KeyContext::default();
    let recipient = grant(0xa1, 2_000_000_000, false);
    let snapshot = Snapshot::new(&[ed25519_holder().key], &[recipient.clone()]);
    let leaf = recipient.hash().expect("hash");
    assert_eq!(snapshot.trees.faucet.depth, 0);
    assert_eq!(snapshot.trees.faucet.root, leaf);

    let claim = snapshot.faucet_claim(&recipient, 0, RECIPIENT_FEE);
    assert!(claim.proof.is_empty());
    assert!(claim.is_sane(&snapshot.trees));
    assert!(claim.verify_merkle(&snapshot.trees, Some(&leaf)));
    assert!(claim.verify_signature(&ctx));
    assert!(claim.verify(&snapshot.trees, &ctx, Some(&leaf)));

    let overpaid = AirdropProof {
        fee: RECIPIENT_FEE + 1,
        ..claim
    };
    assert!(!overpaid.verify(&snapshot.trees, &ctx, Some(&leaf)));
}

#[test]
fn claims_cannot_cross_trees() {
    let ctx = KeyContext::default();
    let holder = ed25519_holder();
    let recipient = grant(0xa0, 2_000_000_000, false);
    let snapshot = Snapshot::new(&[holder.key.clone()], &[recipient.clone()]);
    let verifier = ClaimVerifier::new(snapshot.trees.clone(), ctx);

    let faucet_claim = snapshot.faucet_claim(&recipient, 0, RECIPIENT_FEE);
    assert!(faucet_claim.verify(&snapshot.trees, &ctx, Some(&snapshot.trees.faucet.root)));
    assert!(!faucet_claim.verify(&snapshot.trees, &ctx, Some(&snapshot.trees.airdrop.root)));

    let airdrop_claim = sign(&holder, &snapshot.airdrop_claim(&holder.key, 0, 0), &ctx);
    assert!(!airdrop_claim.verify(&snapshot.trees, &ctx, Some(&snapshot.trees.faucet.root)));
    assert_eq!(
        verifier
            .with_expected_root(snapshot.trees.faucet.root)
            .verify(&airdrop_claim),
        Err(ClaimRejection::NotInSnapshot)
    );
}
