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

use alloy_primitives::keccak256;
use soroban_sdk::{Bytes, BytesN, Env};

use crate::Error;

// Domain-separation prefix applied to every message hash before recovery.
const SIGNED_MSG_PREFIX: &[u8; 28] = b"\x19Ethereum Signed Message:\n32";

// verify checks that `sig` (r || s || v) over the prefixed `message_hash`
// recovers exactly to the 20-byte address `expected`. The recovery byte is
// validated before any host crypto runs; the 65-byte signature length is
// enforced by the type.
pub fn verify(
    env: &Env,
    message_hash: &[u8; 32],
    sig: &BytesN<65>,
    expected: &BytesN<20>,
) -> Result<(), Error> {
    let sig_bytes = sig.to_array();
    let recovery_id: u32 = match sig_bytes[64] {
        0 | 27 => 0,
        1 | 28 => 1,
        _ => return Err(Error::MalformedSignature),
    };

    let mut prefixed = [0u8; 60];
    prefixed[..28].copy_from_slice(SIGNED_MSG_PREFIX);
    prefixed[28..].copy_from_slice(message_hash);
    let digest = env.crypto().keccak256(&Bytes::from_slice(env, &prefixed));

    let mut rs = [0u8; 64];
    rs.copy_from_slice(&sig_bytes[..64]);
    let recovered =
        env.crypto()
            .secp256k1_recover(&digest, &BytesN::from_array(env, &rs), recovery_id);

    if eth_address(&recovered) != expected.to_array() {
        return Err(Error::InvalidSignature);
    }
    Ok(())
}

// eth_address derives the address of an uncompressed secp256k1 public key:
// the last 20 bytes of the keccak256 hash of the key material (the leading
// encoding byte is not part of the key).
fn eth_address(pubkey: &BytesN<65>) -> [u8; 20] {
    let pk = pubkey.to_array();
    let hash = keccak256(&pk[1..]);
    let mut addr = [0u8; 20];
    addr.copy_from_slice(&hash[12..]);
    addr
}
