use proptest::prelude::*;

use shuffle_fees::{FeeEngine, NonceBook};
use shuffle_heap::TopHeap;
use shuffle_types::{Address, U256};

fn addr(n: u8) -> Address {
    Address::repeat_byte(n)
}

proptest! {
    #[test]
    fn fees_never_exceed_gross(gross in 1u128.., divisor in 2u64..1_000) {
        let split = FeeEngine::new(divisor).split(U256::from(gross));
        prop_assert!(split.burn + split.reward <= U256::from(gross));
        prop_assert!(split.burn >= U256::from(1u64));
    }

    #[test]
    fn each_fee_is_ceil_of_one_percent(gross in 2u128..) {
        let split = FeeEngine::new(100).split(U256::from(gross));
        let expected = U256::from(gross.div_ceil(100));
        prop_assert_eq!(split.burn, expected);
        prop_assert_eq!(split.reward, expected);
    }

    #[test]
    fn outcome_conserves_gross(gross in 1u64.., residents in 0u8..10) {
        let mut heap = TopHeap::new(16);
        for n in 0..residents {
            heap.insert_or_update(addr(n + 10), U256::from(n as u64 + 1));
        }
        let mut nonces = NonceBook::new();
        let outcome = FeeEngine::new(100)
            .apply_transfer_fees(&heap, &mut nonces, addr(1), addr(2), U256::from(gross));
        prop_assert_eq!(outcome.net_to_receiver + outcome.burn + outcome.reward, outcome.gross);
        prop_assert_eq!(outcome.winner.is_some(), residents > 0);
        if let Some(winner) = outcome.winner {
            prop_assert!(heap.contains(&winner));
        }
    }

    #[test]
    fn same_history_same_winners(amounts in prop::collection::vec(1u64..1_000_000, 1..20)) {
        let mut heap = TopHeap::new(16);
        for n in 0..8u8 {
            heap.insert_or_update(addr(n + 10), U256::from(n as u64 * 7 + 1));
        }
        let engine = FeeEngine::new(100);
        let run = || {
            let mut nonces = NonceBook::new();
            amounts
                .iter()
                .map(|&a| engine.apply_transfer_fees(&heap, &mut nonces, addr(1), addr(2), U256::from(a)).winner)
                .collect::<Vec<_>>()
        };
        prop_assert_eq!(run(), run());
    }
}
