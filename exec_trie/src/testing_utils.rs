use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};

/// Some tests check that all values inserted are retrievable, and if we end up
/// generating multiple inserts for the same key, then these tests will fail.
/// Making the min key bytes sufficiently high will significantly decrease the
/// chances of these collisions occurring.
const MIN_BYTES_FOR_VAR_KEY: usize = 5;

pub(crate) type TestInsertValEntry = (Vec<u8>, Vec<u8>);

pub(crate) fn common_setup() {
    // Try init since multiple tests calling `init` will cause an error.
    let _ = pretty_env_logger::try_init();
}

pub(crate) fn generate_n_random_fixed_trie_value_entries(
    n: usize,
    seed: u64,
) -> impl Iterator<Item = TestInsertValEntry> {
    gen_n_random_trie_value_entries_common(n, seed, gen_fixed_key, gen_rand_u256_bytes)
}

pub(crate) fn generate_n_random_variable_trie_value_entries(
    n: usize,
    seed: u64,
) -> impl Iterator<Item = TestInsertValEntry> {
    gen_n_random_trie_value_entries_common(n, seed, gen_variable_key, gen_rand_u256_bytes)
}

/// `n` random byte strings whose lengths vary between `1` and `max_len`.
pub(crate) fn generate_n_random_items(n: usize, max_len: usize, seed: u64) -> Vec<Vec<u8>> {
    let mut rng = StdRng::seed_from_u64(seed);

    (0..n)
        .map(|_| {
            let mut item = vec![0; rng.gen_range(1..=max_len)];
            rng.fill_bytes(&mut item);
            item
        })
        .collect()
}

fn gen_n_random_trie_value_entries_common<
    K: Fn(&mut StdRng) -> Vec<u8>,
    V: Fn(&mut StdRng) -> Vec<u8>,
>(
    n: usize,
    seed: u64,
    key_gen_f: K,
    val_gen_f: V,
) -> impl Iterator<Item = TestInsertValEntry> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(move |_| (key_gen_f(&mut rng), val_gen_f(&mut rng)))
}

fn gen_fixed_key(rng: &mut StdRng) -> Vec<u8> {
    rng.gen::<[u8; 32]>().to_vec()
}

fn gen_variable_key(rng: &mut StdRng) -> Vec<u8> {
    let n_bytes = rng.gen_range(MIN_BYTES_FOR_VAR_KEY..=32);

    let mut bytes = vec![0; n_bytes];
    rng.fill_bytes(&mut bytes);

    bytes
}

fn gen_rand_u256_bytes(rng: &mut StdRng) -> Vec<u8> {
    let num_bytes = 256 / 8;

    let mut buf = vec![0; num_bytes];
    rng.fill_bytes(&mut buf);

    buf
}
