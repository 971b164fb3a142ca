//! License key generation
//!
//! A key is four groups of five characters from `A-Z0-9`, joined by `-`:
//! `XXXXX-XXXXX-XXXXX-XXXXX`.

use std::collections::HashSet;

use rand::Rng;

const KEY_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const GROUP_LENGTH: usize = 5;
const GROUP_COUNT: usize = 4;

/// Generate `count` pairwise distinct license keys
pub fn generate(count: usize) -> Vec<String> {
    let mut rng = rand::thread_rng();
    let mut seen = HashSet::with_capacity(count);
    let mut keys = Vec::with_capacity(count);

    while keys.len() < count {
        let key = random_key(&mut rng);
        if seen.insert(key.clone()) {
            keys.push(key);
        }
    }

    keys
}

fn random_key<R: Rng>(rng: &mut R) -> String {
    (0..GROUP_COUNT)
        .map(|_| random_group(rng))
        .collect::<Vec<_>>()
        .join("-")
}

fn random_group<R: Rng>(rng: &mut R) -> String {
    (0..GROUP_LENGTH)
        .map(|_| {
            let idx = rng.gen_range(0..KEY_ALPHABET.len());
            KEY_ALPHABET[idx] as char
        })
        .collect()
}

/// Check that `key` has the `XXXXX-XXXXX-XXXXX-XXXXX` shape
pub fn is_well_formed(key: &str) -> bool {
    let groups: Vec<&str> = key.split('-').collect();
    groups.len() == GROUP_COUNT
        && groups.iter().all(|g| {
            g.len() == GROUP_LENGTH && g.bytes().all(|b| KEY_ALPHABET.contains(&b))
        })
}
