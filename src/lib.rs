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

#![no_std]

extern crate alloc;

pub mod asset;
pub mod ecdsa;
pub mod encoding;

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, symbol_short, Address, Bytes, BytesN,
    Env, Symbol,
};

use asset::{Asset, AssetSpec};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    ChannelNotFound = 1,
    ChannelAlreadyOpen = 2,
    ChannelNotOpen = 3,
    EmptyAssetSpec = 4,
    InvalidAmount = 5,
    UnsortedItems = 6,
    AssetKindMismatch = 7,
    SelfCounterparty = 8,
    NotParticipant = 9,
    NotCounterparty = 10,
    UnauthorizedActor = 11,
    StaleNonce = 12,
    LockActive = 13,
    NoActiveLock = 14,
    TimelockNotInFuture = 15,
    TimelockExpired = 16,
    TimelockNotExpired = 17,
    MalformedSignature = 18,
    InvalidSignature = 19,
    PreimageMismatch = 20,
    SpecNotCovered = 21,
    TransferFailed = 22,
    ZeroHashlock = 23,
}

// One side of the two-party protocol: the ledger address that holds custody
// and authorizes calls, and the 20-byte address its state-update signatures
// recover to.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Participant {
    pub addr: Address,
    pub signer: BytesN<20>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Channel {
    pub participant: Participant,
    pub counterparty: Participant,
    pub asset: Asset,
    pub held: AssetSpec,
    pub locked: AssetSpec,
    pub nonce: u64,
    // Whether this leg's participant takes the buyer role of the dual-signed
    // payload. Fixed at open time so both legs of a swap read the same
    // payload consistently.
    pub is_buyer: bool,
    pub is_open: bool,
    // The all-zero hashlock encodes "no active lock"; `lock` rejects it as an
    // input. `preimage` stays empty until a reveal and is reset on re-lock.
    pub hashlock: BytesN<32>,
    pub timelock: u64,
    pub preimage: Bytes,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Channel(BytesN<32>),
}

const SWAPS: Symbol = symbol_short!("swapchan");

#[contract]
pub struct SwapChannel;

#[contractimpl]
impl SwapChannel {
    // open creates a channel under `channel_id` and takes the deposit into
    // custody in the same invocation. This is the only entry point that
    // acquires new assets.
    pub fn open(
        env: Env,
        participant: Participant,
        counterparty: Participant,
        asset: Asset,
        spec: AssetSpec,
        is_buyer: bool,
        channel_id: BytesN<32>,
    ) -> Result<(), Error> {
        participant.addr.require_auth();

        // checks
        asset::check_well_formed(&spec)?;
        if asset::is_empty(&spec) {
            return Err(Error::EmptyAssetSpec);
        }
        if !asset::kind_matches(&asset, &spec) {
            return Err(Error::AssetKindMismatch);
        }
        if participant.addr == counterparty.addr {
            return Err(Error::SelfCounterparty);
        }
        if let Some(existing) = read_channel_opt(&env, &channel_id) {
            // A closed record is inert and may be superseded.
            if existing.is_open {
                return Err(Error::ChannelAlreadyOpen);
            }
        }

        // effects
        let channel = Channel {
            participant: participant.clone(),
            counterparty,
            asset: asset.clone(),
            held: spec.clone(),
            locked: asset::empty_like(&env, &spec),
            nonce: 0,
            is_buyer,
            is_open: true,
            hashlock: zero_hash(&env),
            timelock: 0,
            preimage: Bytes::new(&env),
        };
        write_channel(&env, &channel_id, &channel);

        // interact
        asset::acquire(&env, &asset, &participant.addr, &spec)?;

        env.events()
            .publish((SWAPS, symbol_short!("open"), channel_id), channel);
        Ok(())
    }

    // update applies a dual-signed state update: both parties' signatures
    // over the canonical payload are required, and the leg's own role selects
    // which half of the payload becomes the new locked subset.
    pub fn update(
        env: Env,
        actor: Address,
        channel_id: BytesN<32>,
        nonce: u64,
        buyer_spec: AssetSpec,
        seller_spec: AssetSpec,
        buyer_sig: BytesN<65>,
        seller_sig: BytesN<65>,
    ) -> Result<(), Error> {
        // checks
        let mut channel = read_open_channel(&env, &channel_id)?;
        if actor != channel.participant.addr && actor != channel.counterparty.addr {
            return Err(Error::UnauthorizedActor);
        }
        actor.require_auth();
        if nonce <= channel.nonce {
            return Err(Error::StaleNonce);
        }
        if has_active_lock(&env, &channel) {
            return Err(Error::LockActive);
        }
        asset::check_well_formed(&buyer_spec)?;
        asset::check_well_formed(&seller_spec)?;

        let digest = encoding::update_hash(&channel_id, nonce, &buyer_spec, &seller_spec);
        let (buyer_signer, seller_signer) = if channel.is_buyer {
            (&channel.participant.signer, &channel.counterparty.signer)
        } else {
            (&channel.counterparty.signer, &channel.participant.signer)
        };
        ecdsa::verify(&env, &digest, &buyer_sig, buyer_signer)?;
        ecdsa::verify(&env, &digest, &seller_sig, seller_signer)?;

        let candidate = if channel.is_buyer {
            buyer_spec
        } else {
            seller_spec
        };
        if !asset::kind_matches(&channel.asset, &candidate) {
            return Err(Error::AssetKindMismatch);
        }
        if !asset::contains(&channel.held, &candidate)? {
            return Err(Error::SpecNotCovered);
        }

        // effects
        channel.locked = candidate;
        channel.nonce = nonce;
        write_channel(&env, &channel_id, &channel);

        env.events().publish(
            (SWAPS, symbol_short!("update"), channel_id),
            (nonce, channel.locked.clone()),
        );
        Ok(())
    }

    // lock places a hash/time lock over the currently earmarked subset. Only
    // the depositing participant may lock its own deposit.
    pub fn lock(
        env: Env,
        actor: Address,
        channel_id: BytesN<32>,
        hashlock: BytesN<32>,
        timelock: u64,
    ) -> Result<(), Error> {
        // checks
        let mut channel = read_open_channel(&env, &channel_id)?;
        if actor != channel.participant.addr {
            return Err(Error::NotParticipant);
        }
        actor.require_auth();
        if hashlock == zero_hash(&env) {
            return Err(Error::ZeroHashlock);
        }
        if has_active_lock(&env, &channel) {
            return Err(Error::LockActive);
        }
        if timelock <= env.ledger().timestamp() {
            return Err(Error::TimelockNotInFuture);
        }

        // effects
        channel.hashlock = hashlock.clone();
        channel.timelock = timelock;
        // A reveal from a previous lock round must not linger.
        channel.preimage = Bytes::new(&env);
        write_channel(&env, &channel_id, &channel);

        env.events()
            .publish((SWAPS, symbol_short!("lock"), channel_id), (hashlock, timelock));
        Ok(())
    }

    // unlock resolves an active lock by preimage reveal: the locked subset
    // leaves custody to the counterparty and the preimage is recorded in the
    // channel and in the event, where the mirror leg's operator picks it up.
    pub fn unlock(
        env: Env,
        actor: Address,
        channel_id: BytesN<32>,
        preimage: Bytes,
    ) -> Result<(), Error> {
        // checks
        let mut channel = read_open_channel(&env, &channel_id)?;
        if actor != channel.counterparty.addr {
            return Err(Error::NotCounterparty);
        }
        actor.require_auth();
        if !has_active_lock(&env, &channel) {
            return Err(Error::NoActiveLock);
        }
        if env.ledger().timestamp() > channel.timelock {
            return Err(Error::TimelockExpired);
        }
        let digest: BytesN<32> = env.crypto().sha256(&preimage).into();
        if digest != channel.hashlock {
            return Err(Error::PreimageMismatch);
        }

        // effects
        let claimed = channel.locked.clone();
        channel.held = asset::difference(&env, &channel.held, &claimed)?;
        channel.locked = asset::empty_like(&env, &claimed);
        channel.hashlock = zero_hash(&env);
        channel.timelock = 0;
        channel.preimage = preimage.clone();
        write_channel(&env, &channel_id, &channel);

        // interact
        asset::release(&env, &channel.asset, &channel.counterparty.addr, &claimed)?;

        env.events().publish(
            (SWAPS, symbol_short!("unlock"), channel_id),
            (claimed, preimage),
        );
        Ok(())
    }

    // refund clears an expired lock without moving assets; the previously
    // locked subset is simply owned by the participant inside the channel
    // again.
    pub fn refund(env: Env, actor: Address, channel_id: BytesN<32>) -> Result<(), Error> {
        // checks
        let mut channel = read_open_channel(&env, &channel_id)?;
        if actor != channel.participant.addr {
            return Err(Error::NotParticipant);
        }
        actor.require_auth();
        if !has_active_lock(&env, &channel) {
            return Err(Error::NoActiveLock);
        }
        if env.ledger().timestamp() <= channel.timelock {
            return Err(Error::TimelockNotExpired);
        }

        // effects
        let released = channel.locked.clone();
        channel.locked = asset::empty_like(&env, &released);
        channel.hashlock = zero_hash(&env);
        channel.timelock = 0;
        write_channel(&env, &channel_id, &channel);

        env.events()
            .publish((SWAPS, symbol_short!("refund"), channel_id), released);
        Ok(())
    }

    // close returns the remaining deposit to the participant and retires the
    // channel. A live, still-timely lock blocks closing; an expired one does
    // not.
    pub fn close(env: Env, actor: Address, channel_id: BytesN<32>) -> Result<(), Error> {
        // checks
        let mut channel = read_open_channel(&env, &channel_id)?;
        if actor != channel.participant.addr {
            return Err(Error::NotParticipant);
        }
        actor.require_auth();
        if has_active_lock(&env, &channel) && env.ledger().timestamp() <= channel.timelock {
            return Err(Error::LockActive);
        }

        // effects
        let residual = channel.held.clone();
        channel.held = asset::empty_like(&env, &residual);
        channel.locked = asset::empty_like(&env, &residual);
        channel.hashlock = zero_hash(&env);
        channel.timelock = 0;
        channel.is_open = false;
        // The record stays in storage for audit; every entry point rejects it
        // from here on.
        write_channel(&env, &channel_id, &channel);

        // interact
        if !asset::is_empty(&residual) {
            asset::release(&env, &channel.asset, &channel.participant.addr, &residual)?;
        }

        env.events()
            .publish((SWAPS, symbol_short!("close"), channel_id), residual);
        Ok(())
    }

    pub fn get_channel(env: Env, channel_id: BytesN<32>) -> Result<Channel, Error> {
        read_channel(&env, &channel_id)
    }
}

fn zero_hash(env: &Env) -> BytesN<32> {
    BytesN::from_array(env, &[0u8; 32])
}

fn has_active_lock(env: &Env, channel: &Channel) -> bool {
    channel.hashlock != zero_hash(env)
}

fn read_channel_opt(env: &Env, id: &BytesN<32>) -> Option<Channel> {
    env.storage().persistent().get(&DataKey::Channel(id.clone()))
}

fn read_channel(env: &Env, id: &BytesN<32>) -> Result<Channel, Error> {
    read_channel_opt(env, id).ok_or(Error::ChannelNotFound)
}

fn read_open_channel(env: &Env, id: &BytesN<32>) -> Result<Channel, Error> {
    let channel = read_channel(env, id)?;
    if !channel.is_open {
        return Err(Error::ChannelNotOpen);
    }
    Ok(channel)
}

fn write_channel(env: &Env, id: &BytesN<32>, channel: &Channel) {
    env.storage()
        .persistent()
        .set(&DataKey::Channel(id.clone()), channel);
}

#[cfg(test)]
mod testnft;
#[cfg(test)]
mod testsig;
