#![cfg(test)]

use crate::{DataKey, Proof, StubVerifier, StubVerifierClient};
use soroban_sdk::testutils::Address as _;
use soroban_sdk::{vec, Address, BytesN, Env, Vec, U256};

fn setup(env: &Env) -> StubVerifierClient<'static> {
    env.mock_all_auths();
    let admin = Address::generate(env);
    let contract_id = env.register(StubVerifier, (&admin,));
    StubVerifierClient::new(env, &contract_id)
}

fn proof(env: &Env, fill: u8) -> Proof {
    Proof {
        a: BytesN::from_array(env, &[fill; 64]),
        b: BytesN::from_array(env, &[fill; 128]),
        c: BytesN::from_array(env, &[fill; 64]),
    }
}

fn inputs(env: &Env, seed: u128) -> Vec<U256> {
    vec![
        env,
        U256::from_u128(env, seed),
        U256::from_u128(env, seed + 1),
        U256::from_u128(env, seed + 2),
        U256::from_u128(env, seed + 3),
    ]
}

#[test]
fn test_accepts_well_formed_proof() {
    let env = Env::default();
    let client = setup(&env);
    assert!(client.verify(&proof(&env, 7), &inputs(&env, 10)));
}

#[test]
fn test_rejects_zero_points() {
    let env = Env::default();
    let client = setup(&env);
    assert!(!client.verify(&proof(&env, 0), &inputs(&env, 10)));
}

#[test]
fn test_rejects_wrong_input_count() {
    let env = Env::default();
    let client = setup(&env);
    let short = vec![&env, U256::from_u32(&env, 1), U256::from_u32(&env, 2)];
    assert!(!client.verify(&proof(&env, 7), &short));
}

#[test]
fn test_set_accepting_toggles_verdict() {
    let env = Env::default();
    let client = setup(&env);

    client.set_accepting(&false);
    assert!(!client.verify(&proof(&env, 7), &inputs(&env, 10)));

    client.set_accepting(&true);
    assert!(client.verify(&proof(&env, 7), &inputs(&env, 10)));
}

#[test]
fn test_blocked_inputs_only_affect_that_commitment() {
    let env = Env::default();
    let client = setup(&env);

    client.block_inputs(&inputs(&env, 10));

    assert!(!client.verify(&proof(&env, 7), &inputs(&env, 10)));
    assert!(client.verify(&proof(&env, 7), &inputs(&env, 20)));
}

#[test]
fn test_blocked_inputs_live_in_persistent_storage() {
    let env = Env::default();
    let client = setup(&env);

    client.block_inputs(&inputs(&env, 10));

    let key = DataKey::Blocked(inputs(&env, 10));
    env.as_contract(&client.address, || {
        assert!(env.storage().persistent().has(&key));
        assert!(!env.storage().instance().has(&key));
    });
}
