//! Short random identifiers for new nodes.

use tracing::debug;
use uuid::Uuid;

pub const DEFAULT_ID_LENGTH: usize = 8;

/// Upper bound of the hex alphabet a v4 UUID provides.
const MAX_ID_LENGTH: usize = 32;

/// Misses tolerated at one length before the id gets one character longer.
const ATTEMPTS_PER_LENGTH: usize = 64;

/// Random lowercase alphanumeric id of `length` characters (1..=32).
///
/// Collisions are only improbable, see [`generate_unique_id`].
pub fn generate_id(length: usize) -> String {
    let length = length.clamp(1, MAX_ID_LENGTH);
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(length);
    id
}

/// Random id for which `is_taken` returns false.
///
/// Starts at `length` and widens the id after repeated misses, so a crowded
/// short id space cannot stall the caller.
pub fn generate_unique_id(length: usize, is_taken: impl Fn(&str) -> bool) -> String {
    let mut length = length.clamp(1, MAX_ID_LENGTH);
    let mut misses = 0;
    loop {
        let id = generate_id(length);
        if !is_taken(&id) {
            return id;
        }
        misses += 1;
        if misses == ATTEMPTS_PER_LENGTH && length < MAX_ID_LENGTH {
            debug!("id space of length {} crowded, widening", length);
            length += 1;
            misses = 0;
        }
    }
}
