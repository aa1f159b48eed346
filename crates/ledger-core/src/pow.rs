use crate::{constants::ZERO_DIGIT, error::MiningError, Block};
use tracing::debug;

/// Mine the block by incrementing its proof until the hash starts with
/// `difficulty` zero digits. Returns the number of hashes computed.
///
/// The proof is bumped before every attempt, so even `difficulty == 0` stores
/// the hash for `proof + 1`.
pub fn mine(block: &mut Block, difficulty: u32) -> u64 {
    let attempts = search(block, difficulty, u64::MAX);
    debug!(
        proof = block.proof,
        attempts,
        hash = %block.hash,
        "mined block at difficulty {difficulty}"
    );
    attempts
}

/// Like [`mine`], but gives up after `max_attempts` hashes.
pub fn mine_bounded(
    block: &mut Block,
    difficulty: u32,
    max_attempts: u64,
) -> Result<u64, MiningError> {
    let attempts = search(block, difficulty, max_attempts);
    if attempts == 0 || !meets_difficulty(&block.hash, difficulty) {
        return Err(MiningError::Exhausted { attempts });
    }
    debug!(
        proof = block.proof,
        attempts,
        hash = %block.hash,
        "mined block at difficulty {difficulty}"
    );
    Ok(attempts)
}

fn search(block: &mut Block, difficulty: u32, max_attempts: u64) -> u64 {
    let mut attempts = 0u64;
    while attempts < max_attempts {
        attempts += 1;
        block.proof = block.proof.wrapping_add(1);
        block.hash = block.compute_hash();
        if meets_difficulty(&block.hash, difficulty) {
            break;
        }
    }
    attempts
}

pub fn meets_difficulty(hash: &str, difficulty: u32) -> bool {
    count_leading_zero_digits(hash) >= difficulty
}

pub fn count_leading_zero_digits(hash: &str) -> u32 {
    hash.chars().take_while(|c| *c == ZERO_DIGIT).count() as u32
}

pub fn target_prefix(difficulty: u32) -> String {
    std::iter::repeat(ZERO_DIGIT)
        .take(difficulty as usize)
        .collect()
}
