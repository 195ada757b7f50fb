// Copyright 2025 - See NOTICE file for copyright holders.
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

use soroban_sdk::{contractclient, contracttype, token, Address, Env, Vec};

use crate::Error;

// The concrete on-ledger asset a channel takes into custody. Native assets
// are reached through their Stellar Asset Contract, so the transfer path is
// the same as for any other fungible token; the variants stay separate
// because a swap leg is typed by its asset kind.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Asset {
    Native(Address),
    Token(Address),
    Nft(Address),
}

// An amount-or-set of assets. `Items` is kept strictly ascending so that
// membership is a binary search and set-minus is a single merge pass.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AssetSpec {
    Amount(i128),
    Items(Vec<u64>),
}

// Minimal transfer interface a non-fungible collection contract must expose.
#[contractclient(name = "NftClient")]
pub trait NonFungible {
    fn transfer(env: Env, from: Address, to: Address, id: u64);
}

// acquire pulls `spec` from `from` into the custody of the current contract.
pub fn acquire(env: &Env, asset: &Asset, from: &Address, spec: &AssetSpec) -> Result<(), Error> {
    transfer_spec(env, asset, from, &env.current_contract_address(), spec)
}

// release pushes `spec` out of contract custody to `to`. A failure on any
// single transfer aborts the whole invocation, so a release is all-or-nothing.
pub fn release(env: &Env, asset: &Asset, to: &Address, spec: &AssetSpec) -> Result<(), Error> {
    transfer_spec(env, asset, &env.current_contract_address(), to, spec)
}

fn transfer_spec(
    env: &Env,
    asset: &Asset,
    from: &Address,
    to: &Address,
    spec: &AssetSpec,
) -> Result<(), Error> {
    match (asset, spec) {
        (Asset::Native(contract) | Asset::Token(contract), AssetSpec::Amount(amount)) => {
            let client = token::Client::new(env, contract);
            match client.try_transfer(from, to, amount) {
                Ok(Ok(())) => Ok(()),
                _ => Err(Error::TransferFailed),
            }
        }
        (Asset::Nft(collection), AssetSpec::Items(ids)) => {
            let client = NftClient::new(env, collection);
            for id in ids.iter() {
                match client.try_transfer(from, to, &id) {
                    Ok(Ok(())) => (),
                    _ => return Err(Error::TransferFailed),
                }
            }
            Ok(())
        }
        _ => Err(Error::AssetKindMismatch),
    }
}

// contains reports whether `subset` is fully backed by `held`.
pub fn contains(held: &AssetSpec, subset: &AssetSpec) -> Result<bool, Error> {
    match (held, subset) {
        (AssetSpec::Amount(h), AssetSpec::Amount(s)) => Ok(*s <= *h),
        (AssetSpec::Items(h), AssetSpec::Items(s)) => {
            for id in s.iter() {
                if h.binary_search(id).is_err() {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        _ => Err(Error::AssetKindMismatch),
    }
}

// difference computes held minus subset. Callers check `contains` first, so
// the scalar result is never negative and every item of `subset` is present.
pub fn difference(env: &Env, held: &AssetSpec, subset: &AssetSpec) -> Result<AssetSpec, Error> {
    match (held, subset) {
        (AssetSpec::Amount(h), AssetSpec::Amount(s)) => Ok(AssetSpec::Amount(h - s)),
        (AssetSpec::Items(h), AssetSpec::Items(s)) => {
            let mut rest = Vec::new(env);
            for id in h.iter() {
                if s.binary_search(id).is_err() {
                    rest.push_back(id);
                }
            }
            Ok(AssetSpec::Items(rest))
        }
        _ => Err(Error::AssetKindMismatch),
    }
}

// check_well_formed rejects negative amounts and item lists that are not
// strictly ascending. The ordering requirement also rules out duplicates.
pub fn check_well_formed(spec: &AssetSpec) -> Result<(), Error> {
    match spec {
        AssetSpec::Amount(amount) => {
            if *amount < 0 {
                return Err(Error::InvalidAmount);
            }
        }
        AssetSpec::Items(ids) => {
            for i in 1..ids.len() {
                if ids.get_unchecked(i - 1) >= ids.get_unchecked(i) {
                    return Err(Error::UnsortedItems);
                }
            }
        }
    }
    Ok(())
}

pub fn is_empty(spec: &AssetSpec) -> bool {
    match spec {
        AssetSpec::Amount(amount) => *amount == 0,
        AssetSpec::Items(ids) => ids.is_empty(),
    }
}

pub fn empty_like(env: &Env, spec: &AssetSpec) -> AssetSpec {
    match spec {
        AssetSpec::Amount(_) => AssetSpec::Amount(0),
        AssetSpec::Items(_) => AssetSpec::Items(Vec::new(env)),
    }
}

pub fn kind_matches(asset: &Asset, spec: &AssetSpec) -> bool {
    matches!(
        (asset, spec),
        (Asset::Native(_) | Asset::Token(_), AssetSpec::Amount(_))
            | (Asset::Nft(_), AssetSpec::Items(_))
    )
}
