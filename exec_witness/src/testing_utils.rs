use rand::{rngs::StdRng, Rng};

use crate::key::{Stem, TreeKey};

pub(crate) fn common_setup() {
    // Try init since multiple tests calling `init` will cause an error.
    let _ = pretty_env_logger::try_init();
}

/// `n` random keys spread over a handful of stems, so that stems and
/// sometimes whole keys repeat.
pub(crate) fn random_keys(rng: &mut StdRng, n: usize) -> Vec<TreeKey> {
    (0..n)
        .map(|_| {
            let mut stem = [0; 31];
            stem[0] = rng.gen_range(0..4);
            TreeKey::new(Stem(stem), rng.gen_range(0..16))
        })
        .collect()
}
