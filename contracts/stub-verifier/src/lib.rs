#![no_std]

//! # Stub Verifier
//!
//! Development stand-in for the Groth16 verifier consumed by the ZK
//! Rock-Paper-Scissors contract.  It speaks the same interface:
//!
//! `verify(proof, public_inputs) -> bool`
//!
//! No curve arithmetic is performed.  A proof is accepted when it is
//! well-formed (non-zero `a` and `c` points, exactly four public inputs),
//! the verifier is accepting, and the public inputs have not been blocked by
//! the admin.  The admin switches give test networks a way to exercise the
//! rejection path of the game.

use soroban_sdk::{
    contract, contractevent, contractimpl, contracttype, log, Address, BytesN, Env, Vec, U256,
};

/// Number of field elements in a commitment (the public inputs of a proof).
pub const PUBLIC_INPUT_COUNT: u32 = 4;

/// TTL for blocked-input entries: 30 days in ledgers (~5 seconds per ledger).
const BLOCKED_TTL_LEDGERS: u32 = 518_400;

// ============================================================================
// Data Types
// ============================================================================

/// Groth16 proof points, uncompressed BN254 coordinates.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Proof {
    pub a: BytesN<64>,
    pub b: BytesN<128>,
    pub c: BytesN<64>,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Accepting,
    Blocked(Vec<U256>),
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VerificationChecked {
    pub accepted: bool,
}

fn is_zero<const N: usize>(point: &BytesN<N>) -> bool {
    point.to_array().iter().all(|b| *b == 0)
}

fn admin(env: &Env) -> Address {
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .expect("Admin not set")
}

// ============================================================================
// Contract
// ============================================================================

#[contract]
pub struct StubVerifier;

#[contractimpl]
impl StubVerifier {
    pub fn __constructor(env: Env, admin: Address) {
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::Accepting, &true);
    }

    /// Check `proof` against `public_inputs`.
    pub fn verify(env: Env, proof: Proof, public_inputs: Vec<U256>) -> bool {
        let accepting: bool = env
            .storage()
            .instance()
            .get(&DataKey::Accepting)
            .unwrap_or(true);

        let accepted = accepting
            && public_inputs.len() == PUBLIC_INPUT_COUNT
            && !is_zero(&proof.a)
            && !is_zero(&proof.c)
            && !env
                .storage()
                .persistent()
                .has(&DataKey::Blocked(public_inputs.clone()));

        log!(&env, "stub verify", accepted);
        VerificationChecked { accepted }.publish(&env);
        accepted
    }

    // ============================================================ Admin fns

    /// Accept (`true`) or reject (`false`) every proof from now on.
    pub fn set_accepting(env: Env, accepting: bool) {
        admin(&env).require_auth();
        env.storage().instance().set(&DataKey::Accepting, &accepting);
    }

    /// Reject every proof presented with exactly these public inputs.
    pub fn block_inputs(env: Env, public_inputs: Vec<U256>) {
        admin(&env).require_auth();
        let key = DataKey::Blocked(public_inputs);
        env.storage().persistent().set(&key, &true);
        env.storage()
            .persistent()
            .extend_ttl(&key, BLOCKED_TTL_LEDGERS, BLOCKED_TTL_LEDGERS);
    }

    pub fn get_admin(env: Env) -> Address {
        admin(&env)
    }
}

#[cfg(test)]
mod test;
