use bloomtree::{BloomTree, DistBloomFilter, Options, Sha2Hasher};
use tracing_subscriber::EnvFilter;

pub const SEED: &[u8] = b"secret seed";

pub type Tree = BloomTree<DistBloomFilter, Sha2Hasher>;

/// Install a log subscriber filtered by `BLOOMTREE_LOG`. Safe to call from every test.
#[allow(dead_code)]
pub fn init_logging() {
    let filter = EnvFilter::try_from_env("BLOOMTREE_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// A filter sized for 200 elements at a 0.2 false positive rate, which gives 670 bits in 11
/// chunks and 2 hash functions.
#[allow(dead_code)]
pub fn generate_dbf<E: AsRef<[u8]>>(elements: impl IntoIterator<Item = E>) -> DistBloomFilter {
    let mut dbf = DistBloomFilter::new(200, 0.2, SEED);
    for element in elements {
        dbf.add(element.as_ref());
    }
    dbf
}

pub fn build(filter: DistBloomFilter) -> Tree {
    Tree::new(filter, Options::new()).unwrap()
}

/// An element derived from an id. Elements must look random, so use a PRNG seeded with the id.
#[allow(dead_code)]
pub fn element(id: u64) -> Vec<u8> {
    use rand::{RngCore as _, SeedableRng as _};
    let mut seed = [0; 16];
    seed[0..8].copy_from_slice(&id.to_le_bytes());
    let mut rng = rand_pcg::Lcg64Xsh32::from_seed(seed);
    let mut element = vec![0; 16];
    rng.fill_bytes(&mut element);
    element
}

/// A filter with 8 hash functions over `bit_len` bits, holding elements `0..count`.
#[allow(dead_code)]
pub fn populated(bit_len: usize, count: u64) -> DistBloomFilter {
    let mut dbf = DistBloomFilter::with_params(bit_len, 8, SEED);
    for id in 0..count {
        dbf.add(&element(id));
    }
    dbf
}
