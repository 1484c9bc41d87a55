#![no_std]

//! # ZK Rock-Paper-Scissors  –  staked, commit / prove / reveal
//!
//! A two-player Rock-Paper-Scissors round where each player deposits the same
//! stake and fairness is enforced by the protocol rather than a referee.
//!
//! ## ZK Mechanic
//! Each player submits an opaque commitment (four field elements) to their
//! hand and four blinding elements, bound to the game id and the player's
//! address.  Before anyone reveals, each player must
//! submit a Groth16 proof, checked by an external verifier contract, that the
//! commitment encodes a legal hand.  Only after **both** proofs are accepted
//! may the plaintext hands be revealed; the contract re-encodes every reveal
//! and compares it with the stored commitment.
//!
//! ## Game States
//! 0. **Open**      – created by player 1 with a stake, waiting for player 2
//! 1. **Joined**    – player 2 matched the stake; waiting for both commitments
//! 2. **Committed** – both commitments stored; waiting for both proofs
//! 3. **Proved**    – both proofs accepted; waiting for both reveals
//! 4. **Revealed**  – both hands known; `compute_winner` may settle once
//!
//! ## Settlement
//! Settlement only credits the claims ledger.  Tokens leave the contract
//! through `withdraw`, which debits the claim before transferring.

use soroban_sdk::{
    contract, contractclient, contracterror, contractevent, contractimpl, contracttype, log,
    token, Address, BytesN, Env, Vec, U256,
};

pub mod commitment;
pub mod settlement;

// ============================================================================
// Verifier Interface
// ============================================================================

#[contractclient(name = "VerifierClient")]
pub trait Verifier {
    fn verify(env: Env, proof: Proof, public_inputs: Vec<U256>) -> bool;
}

// ============================================================================
// Errors
// ============================================================================

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    NotFound            = 1,
    WrongState          = 2,
    NotAPlayer          = 3,
    SelfJoin            = 4,
    StakeMismatch       = 5,
    InvalidStake        = 6,
    AlreadyCommitted    = 7,
    AlreadyProved       = 8,
    AlreadyRevealed     = 9,
    AlreadySettled      = 10,
    InvalidProof        = 11,
    CommitmentMismatch  = 12,
    InvalidChoice       = 13,
    MalformedEncoding   = 14,
    InvalidAmount       = 15,
    InsufficientClaim   = 16,
    NotInitialized      = 17,
    DuplicateCommitment = 18,
}

// ============================================================================
// Data Types
// ============================================================================

#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum GameState {
    Open      = 0,
    Joined    = 1,
    Committed = 2,
    Proved    = 3,
    Revealed  = 4,
}

/// Hand values: 0 = Rock, 1 = Paper, 2 = Scissors
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum Choice {
    Rock     = 0,
    Paper    = 1,
    Scissors = 2,
}

impl Choice {
    pub fn from_u32(value: u32) -> Result<Self, Error> {
        match value {
            0 => Ok(Choice::Rock),
            1 => Ok(Choice::Paper),
            2 => Ok(Choice::Scissors),
            _ => Err(Error::InvalidChoice),
        }
    }
}

#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    Player1Wins,
    Player2Wins,
    Tie,
}

/// Groth16 proof points, uncompressed BN254 coordinates.  Opaque here; only
/// the verifier contract reads them.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Proof {
    pub a: BytesN<64>,
    pub b: BytesN<128>,
    pub c: BytesN<64>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Game {
    pub id: u32,
    pub player1: Address,
    pub player2: Option<Address>,
    pub bet_size: i128,
    pub state: GameState,
    /// Ledger timestamp of the join; 0 while open.
    pub game_start_snapshot: u64,

    pub p1_commitment: Option<Vec<U256>>,
    pub p2_commitment: Option<Vec<U256>>,

    pub p1_proved: bool,
    pub p2_proved: bool,

    pub p1_revealed: bool,
    pub p2_revealed: bool,
    /// Revealed hand values (see [`Choice`]).
    pub p1_choice: Option<u32>,
    pub p2_choice: Option<u32>,

    pub settled: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Seat {
    One,
    Two,
}

impl Seat {
    fn other(self) -> Seat {
        match self {
            Seat::One => Seat::Two,
            Seat::Two => Seat::One,
        }
    }
}

impl Game {
    fn seat_of(&self, player: &Address) -> Result<Seat, Error> {
        if *player == self.player1 {
            Ok(Seat::One)
        } else if self.player2.as_ref() == Some(player) {
            Ok(Seat::Two)
        } else {
            Err(Error::NotAPlayer)
        }
    }

    fn commitment(&self, seat: Seat) -> Option<&Vec<U256>> {
        match seat {
            Seat::One => self.p1_commitment.as_ref(),
            Seat::Two => self.p2_commitment.as_ref(),
        }
    }

    fn proved(&self, seat: Seat) -> bool {
        match seat {
            Seat::One => self.p1_proved,
            Seat::Two => self.p2_proved,
        }
    }

    fn revealed(&self, seat: Seat) -> bool {
        match seat {
            Seat::One => self.p1_revealed,
            Seat::Two => self.p2_revealed,
        }
    }
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Verifier,
    Token,
    GameCount,
    Game(u32),
    Claim(Address),
}

// ============================================================================
// Events
// ============================================================================

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GameCreated {
    #[topic]
    pub game_id: u32,
    pub player1: Address,
    pub bet_size: i128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GameJoined {
    #[topic]
    pub game_id: u32,
    pub player2: Address,
    pub game_start_snapshot: u64,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChoiceCommitted {
    #[topic]
    pub game_id: u32,
    pub player: Address,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProofAccepted {
    #[topic]
    pub game_id: u32,
    pub player: Address,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChoiceRevealed {
    #[topic]
    pub game_id: u32,
    pub player: Address,
    pub choice: Choice,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GameSettled {
    #[topic]
    pub game_id: u32,
    pub outcome: Outcome,
    pub player1_credit: i128,
    pub player2_credit: i128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClaimWithdrawn {
    #[topic]
    pub player: Address,
    pub amount: i128,
}

// ============================================================================
// Storage TTL  (30 days ≈ 518 400 ledgers at ~5 s each)
// ============================================================================

const GAME_TTL_LEDGERS: u32 = 518_400;
const GAME_TTL_THRESHOLD: u32 = GAME_TTL_LEDGERS / 2;

// ============================================================================
// Helpers
// ============================================================================

fn config(env: &Env, key: &DataKey) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(key)
        .ok_or(Error::NotInitialized)
}

fn load_game(env: &Env, id: u32) -> Result<Game, Error> {
    let count: u32 = env
        .storage()
        .instance()
        .get(&DataKey::GameCount)
        .unwrap_or(0);
    if id >= count {
        return Err(Error::NotFound);
    }
    env.storage()
        .persistent()
        .get(&DataKey::Game(id))
        .ok_or(Error::NotFound)
}

fn save_game(env: &Env, game: &Game) {
    let key = DataKey::Game(game.id);
    env.storage().persistent().set(&key, game);
    env.storage()
        .persistent()
        .extend_ttl(&key, GAME_TTL_THRESHOLD, GAME_TTL_LEDGERS);
    env.storage()
        .instance()
        .extend_ttl(GAME_TTL_THRESHOLD, GAME_TTL_LEDGERS);
}

fn claim_of(env: &Env, player: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::Claim(player.clone()))
        .unwrap_or(0)
}

fn set_claim(env: &Env, player: &Address, amount: i128) {
    let key = DataKey::Claim(player.clone());
    env.storage().persistent().set(&key, &amount);
    env.storage()
        .persistent()
        .extend_ttl(&key, GAME_TTL_THRESHOLD, GAME_TTL_LEDGERS);
}

fn credit(env: &Env, player: &Address, amount: i128) {
    if amount > 0 {
        set_claim(env, player, claim_of(env, player) + amount);
    }
}

/// Move `amount` from `player` into contract custody.
fn take_stake(env: &Env, player: &Address, amount: i128) -> Result<(), Error> {
    let token_addr = config(env, &DataKey::Token)?;
    token::Client::new(env, &token_addr).transfer(
        player,
        &env.current_contract_address(),
        &amount,
    );
    Ok(())
}

// ============================================================================
// Contract
// ============================================================================

#[contract]
pub struct ZkRpsContract;

#[contractimpl]
impl ZkRpsContract {
    // ------------------------------------------------------------------ init

    /// Initialize the contract with admin, verifier contract and stake token.
    pub fn __constructor(env: Env, admin: Address, verifier: Address, token: Address) {
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::Verifier, &verifier);
        env.storage().instance().set(&DataKey::Token, &token);
        env.storage().instance().set(&DataKey::GameCount, &0u32);
    }

    // ----------------------------------------------------------- create_game

    /// Open a new game.  `stake` is transferred from `player1` into custody
    /// and becomes the bet size player 2 has to match.
    pub fn create_game(env: Env, player1: Address, stake: i128) -> Result<u32, Error> {
        player1.require_auth();

        if stake <= 0 {
            return Err(Error::InvalidStake);
        }

        take_stake(&env, &player1, stake)?;

        let id: u32 = env
            .storage()
            .instance()
            .get(&DataKey::GameCount)
            .unwrap_or(0);

        let game = Game {
            id,
            player1: player1.clone(),
            player2: None,
            bet_size: stake,
            state: GameState::Open,
            game_start_snapshot: 0,
            p1_commitment: None,
            p2_commitment: None,
            p1_proved: false,
            p2_proved: false,
            p1_revealed: false,
            p2_revealed: false,
            p1_choice: None,
            p2_choice: None,
            settled: false,
        };

        env.storage().instance().set(&DataKey::GameCount, &(id + 1));
        save_game(&env, &game);

        log!(&env, "game created", id, stake);
        GameCreated {
            game_id: id,
            player1,
            bet_size: stake,
        }
        .publish(&env);
        Ok(id)
    }

    // ------------------------------------------------------------- join_game

    /// Join an open game by depositing exactly its bet size.
    pub fn join_game(env: Env, id: u32, player2: Address, stake: i128) -> Result<(), Error> {
        player2.require_auth();

        let mut game = load_game(&env, id)?;

        if game.state != GameState::Open {
            return Err(Error::WrongState);
        }
        if player2 == game.player1 {
            return Err(Error::SelfJoin);
        }
        if stake != game.bet_size {
            return Err(Error::StakeMismatch);
        }

        take_stake(&env, &player2, stake)?;

        game.player2 = Some(player2.clone());
        game.game_start_snapshot = env.ledger().timestamp();
        game.state = GameState::Joined;
        save_game(&env, &game);

        GameJoined {
            game_id: id,
            player2,
            game_start_snapshot: game.game_start_snapshot,
        }
        .publish(&env);
        Ok(())
    }

    // ------------------------------------------------- submit_encoded_choice

    /// Store the caller's commitment.  Once both players have committed the
    /// game moves to `Committed`.
    pub fn submit_encoded_choice(
        env: Env,
        id: u32,
        player: Address,
        encoded_choice: Vec<U256>,
    ) -> Result<(), Error> {
        player.require_auth();

        let mut game = load_game(&env, id)?;

        if game.state != GameState::Joined {
            return Err(Error::WrongState);
        }
        let seat = game.seat_of(&player)?;
        if game.commitment(seat).is_some() {
            return Err(Error::AlreadyCommitted);
        }
        if !commitment::is_well_formed(&encoded_choice) {
            return Err(Error::MalformedEncoding);
        }
        // Copied opponent commitment.
        if game.commitment(seat.other()) == Some(&encoded_choice) {
            return Err(Error::DuplicateCommitment);
        }

        match seat {
            Seat::One => game.p1_commitment = Some(encoded_choice),
            Seat::Two => game.p2_commitment = Some(encoded_choice),
        }

        // Auto-advance when both have committed
        if game.p1_commitment.is_some() && game.p2_commitment.is_some() {
            game.state = GameState::Committed;
        }

        save_game(&env, &game);
        ChoiceCommitted {
            game_id: id,
            player,
        }
        .publish(&env);
        Ok(())
    }

    // ---------------------------------------------------------- submit_proof

    /// Submit a proof that the caller's commitment encodes a legal hand.
    ///
    /// The verifier is called with the caller's stored commitment as public
    /// inputs.  A rejected proof leaves the game untouched so the player can
    /// retry.
    pub fn submit_proof(env: Env, id: u32, player: Address, proof: Proof) -> Result<(), Error> {
        player.require_auth();

        let mut game = load_game(&env, id)?;

        if game.state != GameState::Committed {
            return Err(Error::WrongState);
        }
        let seat = game.seat_of(&player)?;
        if game.proved(seat) {
            return Err(Error::AlreadyProved);
        }
        let public_inputs = game.commitment(seat).cloned().ok_or(Error::WrongState)?;

        let verifier = VerifierClient::new(&env, &config(&env, &DataKey::Verifier)?);
        if !verifier.verify(&proof, &public_inputs) {
            log!(&env, "proof rejected", id, player);
            return Err(Error::InvalidProof);
        }

        match seat {
            Seat::One => game.p1_proved = true,
            Seat::Two => game.p2_proved = true,
        }

        if game.p1_proved && game.p2_proved {
            game.state = GameState::Proved;
        }

        save_game(&env, &game);
        ProofAccepted {
            game_id: id,
            player,
        }
        .publish(&env);
        Ok(())
    }

    // --------------------------------------------------------- reveal_choice

    /// Reveal the hand and blinding elements behind the caller's commitment.
    pub fn reveal_choice(
        env: Env,
        id: u32,
        player: Address,
        choice: u32,
        blinding: Vec<U256>,
    ) -> Result<(), Error> {
        player.require_auth();

        let mut game = load_game(&env, id)?;

        if game.state != GameState::Proved {
            return Err(Error::WrongState);
        }
        let seat = game.seat_of(&player)?;
        if game.revealed(seat) {
            return Err(Error::AlreadyRevealed);
        }
        let hand = Choice::from_u32(choice)?;
        if !commitment::is_well_formed(&blinding) {
            return Err(Error::MalformedEncoding);
        }

        let stored = game.commitment(seat).ok_or(Error::WrongState)?;
        if commitment::encode(&env, id, &player, choice, &blinding) != *stored {
            return Err(Error::CommitmentMismatch);
        }

        match seat {
            Seat::One => {
                game.p1_choice = Some(choice);
                game.p1_revealed = true;
            }
            Seat::Two => {
                game.p2_choice = Some(choice);
                game.p2_revealed = true;
            }
        }

        if game.p1_revealed && game.p2_revealed {
            game.state = GameState::Revealed;
        }

        save_game(&env, &game);
        ChoiceRevealed {
            game_id: id,
            player,
            choice: hand,
        }
        .publish(&env);
        Ok(())
    }

    // --------------------------------------------------------- compute_winner

    /// Settle a fully revealed game into the claims ledger.  Callable by
    /// anyone, effective once.
    pub fn compute_winner(env: Env, id: u32) -> Result<Outcome, Error> {
        let mut game = load_game(&env, id)?;

        if game.state != GameState::Revealed {
            return Err(Error::WrongState);
        }
        if game.settled {
            return Err(Error::AlreadySettled);
        }

        let (h1, h2) = match (game.p1_choice, game.p2_choice) {
            (Some(h1), Some(h2)) => (Choice::from_u32(h1)?, Choice::from_u32(h2)?),
            _ => return Err(Error::WrongState),
        };
        let player2 = game.player2.clone().ok_or(Error::WrongState)?;

        let outcome = settlement::outcome(h1, h2);
        let (p1_credit, p2_credit) = settlement::payouts(outcome, game.bet_size);

        credit(&env, &game.player1, p1_credit);
        credit(&env, &player2, p2_credit);

        game.settled = true;
        save_game(&env, &game);

        log!(&env, "game settled", id, p1_credit, p2_credit);
        GameSettled {
            game_id: id,
            outcome,
            player1_credit: p1_credit,
            player2_credit: p2_credit,
        }
        .publish(&env);
        Ok(outcome)
    }

    // -------------------------------------------------------------- withdraw

    /// Withdraw `amount` of the caller's settled winnings.
    pub fn withdraw(env: Env, player: Address, amount: i128) -> Result<(), Error> {
        player.require_auth();

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        let balance = claim_of(&env, &player);
        if amount > balance {
            return Err(Error::InsufficientClaim);
        }
        let token_addr = config(&env, &DataKey::Token)?;

        // Debit before the transfer leaves the contract.
        set_claim(&env, &player, balance - amount);

        token::Client::new(&env, &token_addr).transfer(
            &env.current_contract_address(),
            &player,
            &amount,
        );

        ClaimWithdrawn { player, amount }.publish(&env);
        Ok(())
    }

    // ============================================================ Read views

    pub fn game_count(env: Env) -> u32 {
        env.storage()
            .instance()
            .get(&DataKey::GameCount)
            .unwrap_or(0)
    }

    pub fn get_game(env: Env, id: u32) -> Result<Game, Error> {
        load_game(&env, id)
    }

    /// `(player1, player2)` proof-accepted flags.
    pub fn get_is_proof(env: Env, id: u32) -> Result<(bool, bool), Error> {
        let game = load_game(&env, id)?;
        Ok((game.p1_proved, game.p2_proved))
    }

    /// `(player1, player2)` revealed flags.
    pub fn get_is_revealed(env: Env, id: u32) -> Result<(bool, bool), Error> {
        let game = load_game(&env, id)?;
        Ok((game.p1_revealed, game.p2_revealed))
    }

    pub fn claims(env: Env, player: Address) -> i128 {
        claim_of(&env, &player)
    }

    // ============================================================ Admin fns

    pub fn get_admin(env: Env) -> Result<Address, Error> {
        config(&env, &DataKey::Admin)
    }

    pub fn set_admin(env: Env, new_admin: Address) -> Result<(), Error> {
        config(&env, &DataKey::Admin)?.require_auth();
        env.storage().instance().set(&DataKey::Admin, &new_admin);
        Ok(())
    }

    pub fn get_verifier(env: Env) -> Result<Address, Error> {
        config(&env, &DataKey::Verifier)
    }

    /// Point proof checks at a new verifier.  Proofs already accepted stay
    /// accepted.
    pub fn set_verifier(env: Env, new_verifier: Address) -> Result<(), Error> {
        config(&env, &DataKey::Admin)?.require_auth();
        env.storage()
            .instance()
            .set(&DataKey::Verifier, &new_verifier);
        Ok(())
    }

    pub fn get_token(env: Env) -> Result<Address, Error> {
        config(&env, &DataKey::Token)
    }

    pub fn upgrade(env: Env, new_wasm_hash: BytesN<32>) -> Result<(), Error> {
        config(&env, &DataKey::Admin)?.require_auth();
        env.deployer().update_current_contract_wasm(new_wasm_hash);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
