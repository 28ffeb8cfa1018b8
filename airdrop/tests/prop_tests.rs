use proptest::prelude::*;

use shuffle_airdrop::{ClaimRegistry, Voucher};
use shuffle_crypto::SignerKey;
use shuffle_ledger::ShuffleToken;
use shuffle_types::{tokens, Address, TokenParams, U256};

const OWNER: Address = Address::new([0xee; 20]);
const REGISTRY: Address = Address::new([0xad; 20]);

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn claimed_never_exceeds_ceiling(
        ceiling in 1u64..1_000,
        claims in prop::collection::vec((0u8..3, 1u64..400), 1..10),
    ) {
        let params = TokenParams::default();
        let mut token = ShuffleToken::new(OWNER, &params).unwrap();
        token.init(OWNER, REGISTRY, tokens(1_000_000)).unwrap();
        let mut registry = ClaimRegistry::new(OWNER, REGISTRY, &params).unwrap();
        let key = SignerKey::from_bytes(&[0x42; 32]).unwrap();
        registry.set_signer(OWNER, key.address(), true).unwrap();
        registry.set_max_claimed_by(OWNER, U256::from(ceiling)).unwrap();

        for (who, amount) in claims {
            let recipient = Address::repeat_byte(who + 1);
            let before = registry.claimed_by(&recipient);
            let voucher = Voucher::sign(recipient, U256::from(amount), &key).unwrap();
            match registry.redeem(&mut token, &voucher) {
                Ok(receipt) => {
                    prop_assert_eq!(registry.claimed_by(&recipient), before + U256::from(amount));
                    prop_assert_eq!(receipt.tokens, U256::from(amount * 150));
                }
                Err(_) => prop_assert_eq!(registry.claimed_by(&recipient), before),
            }
            prop_assert!(registry.claimed_by(&recipient) <= U256::from(ceiling));
        }
        prop_assert_eq!(token.total_supply() + token.total_burned(), tokens(1_000_000));
    }
}
