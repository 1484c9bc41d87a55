//! Commitment encoding shared by the commit and reveal steps.
//!
//! `digest = sha256(DOMAIN || be4(game_id) || xdr(player) || be32(choice) || be32(b0..b3))`
//!
//! A commitment opens only for its author, in the game it was made for.
//!
//! The 32-byte digest is split into four big-endian 64-bit limbs, each
//! carried as a field element.  Clients build their commitment off-chain with
//! the same function and keep `(choice, blinding)` secret until the reveal.

use soroban_sdk::{xdr::ToXdr, Address, Bytes, Env, Vec, U256};

/// Field elements per commitment and per blinding vector.
pub const ENCODED_LEN: u32 = 4;

const COMMITMENT_DOMAIN: &[u8] = b"ZK_RPS_COMMIT_V1";

/// Encode `player`'s `(choice, blinding)` for game `game_id`.
///
/// `blinding` must hold exactly [`ENCODED_LEN`] elements; callers check this
/// before encoding.
pub fn encode(
    env: &Env,
    game_id: u32,
    player: &Address,
    choice: u32,
    blinding: &Vec<U256>,
) -> Vec<U256> {
    let mut pre = Bytes::from_slice(env, COMMITMENT_DOMAIN);
    pre.extend_from_array(&game_id.to_be_bytes());
    pre.append(&player.clone().to_xdr(env));
    pre.append(&U256::from_u32(env, choice).to_be_bytes());
    for element in blinding.iter() {
        pre.append(&element.to_be_bytes());
    }

    let digest = env.crypto().sha256(&pre).to_array();

    let mut limbs = Vec::new(env);
    for chunk in digest.chunks_exact(8) {
        let mut limb = [0u8; 8];
        limb.copy_from_slice(chunk);
        limbs.push_back(U256::from_u128(env, u64::from_be_bytes(limb) as u128));
    }
    limbs
}

/// `true` when `value` has the fixed encoded length.
pub fn is_well_formed(value: &Vec<U256>) -> bool {
    value.len() == ENCODED_LEN
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::testutils::Address as _;
    use soroban_sdk::vec;

    fn blinding(env: &Env, parts: [u32; 4]) -> Vec<U256> {
        vec![
            env,
            U256::from_u32(env, parts[0]),
            U256::from_u32(env, parts[1]),
            U256::from_u32(env, parts[2]),
            U256::from_u32(env, parts[3]),
        ]
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let env = Env::default();
        let player = Address::generate(&env);
        let b = blinding(&env, [23, 53, 32, 22]);
        assert_eq!(encode(&env, 0, &player, 1, &b), encode(&env, 0, &player, 1, &b));
        assert!(is_well_formed(&encode(&env, 0, &player, 1, &b)));
    }

    #[test]
    fn test_limbs_fit_in_64_bits() {
        let env = Env::default();
        let player = Address::generate(&env);
        let b = blinding(&env, [123, 456, 789, 321]);
        for element in encode(&env, 0, &player, 2, &b).iter() {
            let bytes = element.to_be_bytes();
            assert_eq!(bytes.len(), 32);
            for i in 0..24 {
                assert_eq!(bytes.get(i), Some(0));
            }
        }
    }

    #[test]
    fn test_choice_and_blinding_both_bind() {
        let env = Env::default();
        let player = Address::generate(&env);
        let b = blinding(&env, [23, 53, 32, 22]);
        let base = encode(&env, 0, &player, 1, &b);

        assert_ne!(base, encode(&env, 0, &player, 0, &b));
        assert_ne!(base, encode(&env, 0, &player, 2, &b));
        assert_ne!(base, encode(&env, 0, &player, 1, &blinding(&env, [23, 53, 32, 23])));
        // element order matters
        assert_ne!(base, encode(&env, 0, &player, 1, &blinding(&env, [53, 23, 32, 22])));
    }

    #[test]
    fn test_player_and_game_bind() {
        let env = Env::default();
        let p1 = Address::generate(&env);
        let p2 = Address::generate(&env);
        let b = blinding(&env, [23, 53, 32, 22]);
        let base = encode(&env, 0, &p1, 1, &b);

        // Same opening, different author or game
        assert_ne!(base, encode(&env, 0, &p2, 1, &b));
        assert_ne!(base, encode(&env, 1, &p1, 1, &b));
    }

    #[test]
    fn test_well_formed_length() {
        let env = Env::default();
        assert!(is_well_formed(&blinding(&env, [1, 2, 3, 4])));
        assert!(!is_well_formed(&vec![&env, U256::from_u32(&env, 1)]));
        assert!(!is_well_formed(&Vec::new(&env)));
    }
}
