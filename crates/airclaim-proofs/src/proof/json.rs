//! JSON form of [`AirdropProof`]: hex hashes and bytes, the key expanded to
//! its own JSON form.

use airclaim_core::base::Hash;
use serde::{Deserialize, Serialize};
use serde_with::hex::Hex;
use serde_with::serde_as;

use super::AirdropProof;
use crate::ProofError;
use crate::key::AirdropKey;

#[serde_as]
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub(super) struct ProofJson {
    index: u32,
    #[serde_as(as = "Vec<Hex>")]
    proof: Vec<Hash>,
    subindex: u8,
    #[serde_as(as = "Vec<Hex>")]
    subproof: Vec<Hash>,
    /// `None` when the key bytes do not decode.
    key: Option<AirdropKey>,
    version: u8,
    #[serde_as(as = "Hex")]
    address: Vec<u8>,
    fee: u64,
    #[serde_as(as = "Hex")]
    signature: Vec<u8>,
}

impl From<AirdropProof> for ProofJson {
    fn from(proof: AirdropProof) -> Self {
        let key = proof.decode_key().ok();
        Self {
            index: proof.index,
            proof: proof.proof,
            subindex: proof.subindex,
            subproof: proof.subproof,
            key,
            version: proof.version,
            address: proof.address,
            fee: proof.fee,
            signature: proof.signature,
        }
    }
}

impl TryFrom<ProofJson> for AirdropProof {
    type Error = ProofError;

    fn try_from(json: ProofJson) -> Result<Self, Self::Error> {
        let key = match &json.key {
            Some(key) => key.encode()?,
            None => Vec::new(),
        };
        Ok(Self {
            index: json.index,
            proof: json.proof,
            subindex: json.subindex,
            subproof: json.subproof,
            key,
            version: json.version,
            address: json.address,
            fee: json.fee,
            signature: json.signature,
        })
    }
}
