//! Sign / verify (spec §4.1).
//!
//! The signed payload is `plaintext || timestamp_utc.to_be_bytes()`, so
//! tampering with either field invalidates the signature.

use std::time::{SystemTime, UNIX_EPOCH};

use rand_core::OsRng;
use rsa::pss::{Signature as PssSignature, SigningKey as PssSigningKey, VerifyingKey as PssVerifyingKey};
use serde::{Deserialize, Serialize};
use signature::{RandomizedSigner, SignatureEncoding, Signer, Verifier};

use crate::algo::{AsymmetricKeyType, SignatureAlgo};
use crate::asymmetric::{AsymmetricKeypair, AsymmetricPublicKey};
use crate::error::PrimitiveError;

/// `{digest, type, timestamp_utc}` (spec §3/§6).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub digest: Vec<u8>,
    #[serde(rename = "type")]
    pub sig_type: String,
    pub timestamp_utc: i64,
}

fn signed_payload(plaintext: &[u8], timestamp_utc: i64) -> Vec<u8> {
    let mut payload = Vec::with_capacity(plaintext.len() + 8);
    payload.extend_from_slice(plaintext);
    payload.extend_from_slice(&timestamp_utc.to_be_bytes());
    payload
}

fn now_utc_seconds() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before the epoch")
        .as_secs() as i64
}

/// Sign `plaintext` with `keypair` under `algo`, binding in the current
/// UTC timestamp.
pub fn sign(
    keypair: &AsymmetricKeypair,
    plaintext: &[u8],
    algo: SignatureAlgo,
) -> Result<Signature, PrimitiveError> {
    let timestamp_utc = now_utc_seconds();
    let payload = signed_payload(plaintext, timestamp_utc);

    let digest = match (algo, keypair) {
        (SignatureAlgo::Pss, AsymmetricKeypair::Rsa(sk)) => {
            let signing_key = PssSigningKey::<sha2::Sha256>::new((**sk).clone());
            let sig: PssSignature = signing_key.sign_with_rng(&mut OsRng, &payload);
            sig.to_vec()
        }
        (SignatureAlgo::Dss, AsymmetricKeypair::Dsa(sk)) => {
            let sig: dsa::Signature = RandomizedSigner::sign_with_rng(&**sk, &mut OsRng, &payload);
            sig.to_vec()
        }
        (SignatureAlgo::Dss, AsymmetricKeypair::Ecc(sk)) => {
            let sig: p256::ecdsa::Signature = Signer::sign(&**sk, &payload);
            sig.to_vec()
        }
        _ => {
            return Err(PrimitiveError::AlgorithmNotSupported(format!(
                "{} with a {} key",
                algo,
                keypair.key_type()
            )))
        }
    };

    Ok(Signature {
        digest,
        sig_type: algo.to_string(),
        timestamp_utc,
    })
}

/// Verify `signature` over `plaintext` with `public_key`. Any mismatch in
/// `digest`, `timestamp_utc`, or `plaintext` is surfaced as
/// [`PrimitiveError::SignatureVerificationError`].
pub fn verify(
    public_key: &AsymmetricPublicKey,
    plaintext: &[u8],
    signature: &Signature,
    algo: SignatureAlgo,
) -> Result<(), PrimitiveError> {
    let payload = signed_payload(plaintext, signature.timestamp_utc);
    let fail = |reason: &str| PrimitiveError::SignatureVerificationError(reason.to_string());

    match (algo, public_key) {
        (SignatureAlgo::Pss, AsymmetricPublicKey::Rsa(pk)) => {
            let verifying_key = PssVerifyingKey::<sha2::Sha256>::new(pk.clone());
            let sig = PssSignature::try_from(signature.digest.as_slice())
                .map_err(|_| fail("malformed PSS signature"))?;
            Verifier::verify(&verifying_key, &payload, &sig).map_err(|_| fail("PSS check failed"))
        }
        (SignatureAlgo::Dss, AsymmetricPublicKey::Dsa(pk)) => {
            let sig = dsa::Signature::try_from(signature.digest.as_slice())
                .map_err(|_| fail("malformed DSA signature"))?;
            Verifier::verify(pk, &payload, &sig).map_err(|_| fail("DSA check failed"))
        }
        (SignatureAlgo::Dss, AsymmetricPublicKey::Ecc(pk)) => {
            let sig = p256::ecdsa::Signature::try_from(signature.digest.as_slice())
                .map_err(|_| fail("malformed ECDSA signature"))?;
            Verifier::verify(pk, &payload, &sig).map_err(|_| fail("ECDSA check failed"))
        }
        _ => Err(PrimitiveError::AlgorithmNotSupported(format!(
            "{} with a {} key",
            algo,
            public_key.key_type()
        ))),
    }
}

/// The signature algorithm implied by a key type, for the common case of
/// "sign with whatever this escrow's key supports."
pub fn default_signature_algo(key_type: AsymmetricKeyType) -> SignatureAlgo {
    match key_type {
        AsymmetricKeyType::Rsa => SignatureAlgo::Pss,
        AsymmetricKeyType::Dsa | AsymmetricKeyType::Ecc => SignatureAlgo::Dss,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::AsymmetricKeyType;

    #[test]
    fn every_key_type_round_trips_its_signature() {
        for key_type in [
            AsymmetricKeyType::Rsa,
            AsymmetricKeyType::Dsa,
            AsymmetricKeyType::Ecc,
        ] {
            let keypair = AsymmetricKeypair::generate(key_type).unwrap();
            let algo = default_signature_algo(key_type);
            let public = keypair.public_key();
            let sig = sign(&keypair, b"Hello", algo).unwrap();
            verify(&public, b"Hello", &sig, algo).unwrap();
        }
    }

    #[test]
    fn tampering_digest_breaks_verification() {
        let keypair = AsymmetricKeypair::generate(AsymmetricKeyType::Rsa).unwrap();
        let public = keypair.public_key();
        let mut sig = sign(&keypair, b"Hello", SignatureAlgo::Pss).unwrap();
        sig.digest[0] ^= 0xFF;
        assert!(verify(&public, b"Hello", &sig, SignatureAlgo::Pss).is_err());
    }

    #[test]
    fn tampering_timestamp_breaks_verification() {
        let keypair = AsymmetricKeypair::generate(AsymmetricKeyType::Ecc).unwrap();
        let public = keypair.public_key();
        let mut sig = sign(&keypair, b"Hello", SignatureAlgo::Dss).unwrap();
        sig.timestamp_utc += 1;
        assert!(verify(&public, b"Hello", &sig, SignatureAlgo::Dss).is_err());
    }

    #[test]
    fn tampering_plaintext_breaks_verification() {
        let keypair = AsymmetricKeypair::generate(AsymmetricKeyType::Dsa).unwrap();
        let public = keypair.public_key();
        let sig = sign(&keypair, b"Hello", SignatureAlgo::Dss).unwrap();
        assert!(verify(&public, b"Hellx", &sig, SignatureAlgo::Dss).is_err());
    }
}
