//! # Public inputs and witness construction
//!
//! Pure assembly of the two proof-facing views of a verified receipt.
//! `PublicInputs` is the small, disclosure-safe set of fixed-width
//! values a proof is checked against; `Witness` carries the canonical
//! bytes and signature that support the proof and may be large or
//! sensitive. The two are separate types so an artifact writer cannot
//! accidentally publish witness data as public.
//!
//! Builders never fail on their own: optional fields materialize only
//! when the receipt carries the corresponding data, and every failure
//! mode belongs to an upstream check.

use arv_core::{sha256_digest, CanonicalBytes, ContentDigest, Receipt};
use arv_crypto::{GatewayAddress, RecoverableSignature, SignerMode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The disclosed values a proof binds to.
///
/// All hash and address fields are `0x`-prefixed lowercase hex of
/// fixed-width byte values; no raw receipt text appears here. The
/// policy and consent commitments are carried exactly as the receipt
/// states them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicInputs {
    /// SHA-256 of the canonical receipt bytes; the audit identifier.
    pub receipt_hash: String,
    /// The receipt's embedded policy commitment.
    pub policy_hash: String,
    /// The receipt's embedded consent snapshot commitment.
    pub consent_hash: String,
    /// The signer address used or accepted by verification.
    pub gateway_address: GatewayAddress,
    /// Whether the signer was pinned (`fixed`) or accepted as recovered
    /// (`auto`). Auto mode forgoes identity pinning and consumers must
    /// be able to see that.
    pub signer_mode: SignerMode,
    /// L2 transaction hash, present once the receipt is anchored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor_tx_hash: Option<String>,
    /// SHA-256 of the receipt id's canonical JSON encoding, when the
    /// receipt carries an id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_id_hash: Option<String>,
}

/// The supporting data behind a proof: canonical bytes, the signature
/// triple, and the anchor block when present.
///
/// Written to `witness.json` only; never embedded in a proof beyond the
/// summary in [`crate::WitnessSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Witness {
    /// The canonical signed content as a UTF-8 JSON string.
    pub canonical_receipt: String,
    /// The 65-byte recoverable signature over the signing digest.
    pub signature: RecoverableSignature,
    /// The receipt's identifier, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_id: Option<String>,
    /// The full anchor block, if the receipt has been anchored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<Value>,
}

/// Assemble public inputs from the verified receipt and the outputs of
/// the digest and signature stages.
pub fn build_public_inputs(
    receipt: &Receipt,
    receipt_hash: &ContentDigest,
    gateway_address: GatewayAddress,
    signer_mode: SignerMode,
) -> PublicInputs {
    let receipt_id_hash = receipt.receipt_id().and_then(|id| {
        CanonicalBytes::new(&id)
            .ok()
            .map(|cb| sha256_digest(&cb).to_prefixed_hex())
    });
    PublicInputs {
        receipt_hash: receipt_hash.to_prefixed_hex(),
        policy_hash: receipt.policy_hash().unwrap_or_default().to_string(),
        consent_hash: receipt.consent_hash().unwrap_or_default().to_string(),
        gateway_address,
        signer_mode,
        anchor_tx_hash: receipt.anchor_tx_hash().map(String::from),
        receipt_id_hash,
    }
}

/// Assemble the witness from the receipt, its canonical bytes, and the
/// signature.
pub fn build_witness(
    receipt: &Receipt,
    canonical: &CanonicalBytes,
    signature: &RecoverableSignature,
) -> Witness {
    Witness {
        canonical_receipt: canonical.as_str().to_string(),
        signature: *signature,
        receipt_id: receipt.receipt_id().map(String::from),
        anchor: receipt.anchor().cloned(),
    }
}
