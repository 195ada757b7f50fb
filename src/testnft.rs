// Minimal non-fungible collection used by the set-leg tests. Implements the
// `NonFungible` transfer interface the channel engine invokes.

use soroban_sdk::{contract, contractimpl, contracttype, Address, Env};

#[contracttype]
pub enum NftKey {
    Owner(u64),
}

#[contract]
pub struct TestNft;

#[contractimpl]
impl TestNft {
    pub fn mint(env: Env, to: Address, id: u64) {
        env.storage().persistent().set(&NftKey::Owner(id), &to);
    }

    pub fn transfer(env: Env, from: Address, to: Address, id: u64) {
        from.require_auth();
        let owner: Address = env
            .storage()
            .persistent()
            .get(&NftKey::Owner(id))
            .expect("unknown id");
        if owner != from {
            panic!("transfer from non-owner");
        }
        env.storage().persistent().set(&NftKey::Owner(id), &to);
    }

    pub fn owner(env: Env, id: u64) -> Address {
        env.storage()
            .persistent()
            .get(&NftKey::Owner(id))
            .expect("unknown id")
    }
}
