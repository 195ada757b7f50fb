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

use alloc::vec::Vec as RustVec;

use alloy_primitives::{keccak256, FixedBytes, U256};
use alloy_sol_types::{sol, SolValue};
use soroban_sdk::BytesN;

use crate::asset::AssetSpec;

// The dual-signed state update is hashed over its Solidity ABI encoding, not
// over any ledger-local serialization. Both legs of a swap, whichever ledger
// they run on, therefore hash the identical bytes and accept the identical
// pair of signatures.
sol! {
    struct AssetSpecSol {
        uint8 kind;
        uint256 amount;
        uint64[] items;
    }

    struct UpdateSol {
        bytes32 channelId;
        uint64 nonce;
        AssetSpecSol buyerSpec;
        AssetSpecSol sellerSpec;
    }
}

const KIND_AMOUNT: u8 = 0;
const KIND_ITEMS: u8 = 1;

fn convert_spec(spec: &AssetSpec) -> AssetSpecSol {
    match spec {
        // Amounts are validated non-negative before they reach the encoder.
        AssetSpec::Amount(amount) => AssetSpecSol {
            kind: KIND_AMOUNT,
            amount: U256::from(*amount as u128),
            items: RustVec::new(),
        },
        AssetSpec::Items(ids) => AssetSpecSol {
            kind: KIND_ITEMS,
            amount: U256::ZERO,
            items: ids.iter().collect(),
        },
    }
}

// update_hash computes the canonical message hash of a state update:
// keccak256 of the ABI encoding of (channelId, nonce, buyerSpec, sellerSpec).
pub fn update_hash(
    channel_id: &BytesN<32>,
    nonce: u64,
    buyer_spec: &AssetSpec,
    seller_spec: &AssetSpec,
) -> [u8; 32] {
    let payload = UpdateSol {
        channelId: FixedBytes::from(channel_id.to_array()),
        nonce,
        buyerSpec: convert_spec(buyer_spec),
        sellerSpec: convert_spec(seller_spec),
    };
    keccak256(payload.abi_encode()).0
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::{testutils::BytesN as _, vec, Env};

    #[test]
    fn hash_is_sensitive_to_every_field() {
        let env = Env::default();
        let id = BytesN::<32>::random(&env);
        let buyer = AssetSpec::Amount(100);
        let seller = AssetSpec::Items(vec![&env, 7]);

        let base = update_hash(&id, 1, &buyer, &seller);
        assert_ne!(base, update_hash(&id, 2, &buyer, &seller));
        assert_ne!(base, update_hash(&id, 1, &AssetSpec::Amount(101), &seller));
        assert_ne!(
            base,
            update_hash(&id, 1, &buyer, &AssetSpec::Items(vec![&env, 8]))
        );
        let other_id = BytesN::<32>::random(&env);
        assert_ne!(base, update_hash(&other_id, 1, &buyer, &seller));
    }

    #[test]
    fn hash_is_deterministic() {
        let env = Env::default();
        let id = BytesN::<32>::random(&env);
        let buyer = AssetSpec::Items(vec![&env, 1, 2, 3]);
        let seller = AssetSpec::Amount(55);
        assert_eq!(
            update_hash(&id, 9, &buyer, &seller),
            update_hash(&id, 9, &buyer, &seller)
        );
    }

    #[test]
    fn amount_and_items_specs_never_collide() {
        let env = Env::default();
        let id = BytesN::<32>::random(&env);
        // An empty item set and a zero amount encode under different kind tags.
        let a = update_hash(&id, 1, &AssetSpec::Amount(0), &AssetSpec::Amount(0));
        let b = update_hash(
            &id,
            1,
            &AssetSpec::Items(vec![&env]),
            &AssetSpec::Amount(0),
        );
        assert_ne!(a, b);
    }
}
