// Copyright 2026 - See NOTICE file for copyright holders.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//	http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::ecdsa::{RecoveryId, Signature as K256Signature, SigningKey, VerifyingKey};
use sha3::{Digest, Keccak256};

// Test-side counterpart of the contract's signature verification: produces
// 65-byte (r || s || v) signatures over the prefixed message hash that
// recover to `address()`.
pub struct EthSigner {
    skey: SigningKey,
    pubkey: VerifyingKey,
    addr: [u8; 20],
}

impl EthSigner {
    pub fn random() -> Self {
        let skey = SigningKey::random(&mut rand::thread_rng());
        let pubkey = *skey.verifying_key();
        let addr = eth_address(&pubkey);
        Self { skey, pubkey, addr }
    }

    pub fn address(&self) -> [u8; 20] {
        self.addr
    }

    pub fn sign(&self, message_hash: &[u8; 32]) -> [u8; 65] {
        let hash = signed_msg_hash(message_hash);

        // `sign_prehash()` only returns `r || s`; `v` has to be recovered.
        let sig: K256Signature = self.skey.sign_prehash(&hash).unwrap();

        let mut sig_bytes = [0u8; 65];
        sig_bytes[..64].copy_from_slice(&sig.to_bytes());
        sig_bytes[64] = self.compute_recovery_id(&hash, &sig) + 27;
        sig_bytes
    }

    // Produces a signature whose recovery byte is out of range.
    pub fn sign_malformed(&self, message_hash: &[u8; 32]) -> [u8; 65] {
        let mut sig_bytes = self.sign(message_hash);
        sig_bytes[64] = 42;
        sig_bytes
    }

    fn compute_recovery_id(&self, hash: &[u8; 32], sig: &K256Signature) -> u8 {
        let rec_0 = VerifyingKey::recover_from_prehash(hash, sig, RecoveryId::new(false, false));
        let rec_1 = VerifyingKey::recover_from_prehash(hash, sig, RecoveryId::new(true, false));

        match (rec_0, rec_1) {
            (Ok(pubkey_0), _) if pubkey_0 == self.pubkey => 0,
            (_, Ok(pubkey_1)) if pubkey_1 == self.pubkey => 1,
            _ => panic!("failed to recover public key"),
        }
    }
}

fn eth_address(key: &VerifyingKey) -> [u8; 20] {
    // The first byte of the uncompressed encoding is not part of the key.
    let pk_bytes: [u8; 65] = key.to_encoded_point(false).as_bytes().try_into().unwrap();
    let hash: [u8; 32] = Keccak256::digest(&pk_bytes[1..]).into();

    let mut addr = [0u8; 20];
    addr.copy_from_slice(&hash[12..]);
    addr
}

fn signed_msg_hash(hash: &[u8; 32]) -> [u8; 32] {
    // Packed encoding, so no serializer.
    let mut hasher = Keccak256::new();
    hasher.update(b"\x19Ethereum Signed Message:\n32");
    hasher.update(hash);
    hasher.finalize().into()
}
