//! # Concurrent Submission
//!
//! N transactions submitted from several threads in random order, with
//! threshold T, yield exactly ⌊N/T⌋ blocks. Every transaction ends up in
//! exactly one place: one block, or the pool.

#[cfg(test)]
mod tests {
    use crate::fixtures::{authority, transactions};
    use mc_02_ledger::validate_chain;
    use mc_03_authority::BlockSigner;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;
    use std::collections::HashSet;
    use std::sync::Arc;

    const THREADS: usize = 4;

    fn run(count: usize, threshold: usize, seed: u64) {
        let authority = authority(threshold);
        let mut txs = transactions(count);
        txs.shuffle(&mut StdRng::seed_from_u64(seed));
        let expected: HashSet<String> = txs.iter().map(|tx| tx.hash_hex()).collect();

        let chunk = count.div_ceil(THREADS).max(1);
        let handles: Vec<_> = txs
            .chunks(chunk)
            .map(|part| {
                let engine = Arc::clone(&authority.engine);
                let part = part.to_vec();
                std::thread::spawn(move || {
                    for tx in part {
                        engine.submit(tx).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let chain = authority.engine.blocks();
        assert_eq!(chain.len() - 1, count / threshold);
        assert!(chain[1..].iter().all(|b| b.transactions.len() == threshold));
        assert!(validate_chain(&chain, &authority.signer.public_key()).is_ok());

        let mut seen = HashSet::new();
        let confirmed = chain.iter().flat_map(|b| b.transactions.iter());
        for tx in confirmed.chain(authority.engine.pending_transactions().iter()) {
            assert!(seen.insert(tx.hash_hex()), "{} appears twice", tx.hash_hex());
        }
        assert_eq!(seen, expected);
        assert_eq!(authority.engine.pending_count(), count % threshold);
    }

    #[test]
    fn test_forty_submissions_threshold_ten() {
        run(40, 10, 7);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(12))]

        #[test]
        fn prop_block_count_is_floor_of_n_over_t(
            count in 1usize..48,
            threshold in 1usize..8,
            seed in any::<u64>(),
        ) {
            run(count, threshold, seed);
        }
    }
}
