//! Fee split, winner draw and settlement arithmetic.

use serde::Serialize;
use shuffle_crypto::winner_digest;
use shuffle_heap::TopHeap;
use shuffle_types::{ceil_div, order_of_magnitude, Address, U256};

use crate::nonce::NonceBook;

/// Burn and reward charged on a gross amount.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeeSplit {
    pub burn: U256,
    pub reward: U256,
}

/// Who the drawn winner is relative to the transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WinnerRole {
    Sender,
    Receiver,
    ThirdParty,
}

/// Fees and winner of one transfer.
///
/// `net_to_receiver` is always `gross - burn - reward`. How the reward lands
/// depends on [`WinnerRole`]; see [`FeeOutcome::sender_debit`] and
/// [`FeeOutcome::receiver_credit`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FeeOutcome {
    pub from: Address,
    pub to: Address,
    pub gross: U256,
    pub burn: U256,
    pub reward: U256,
    pub net_to_receiver: U256,
    /// `None` when the heap was empty and no draw happened.
    pub winner: Option<Address>,
}

impl FeeOutcome {
    pub fn winner_role(&self) -> Option<WinnerRole> {
        let winner = self.winner?;
        Some(if winner == self.from {
            WinnerRole::Sender
        } else if winner == self.to {
            WinnerRole::Receiver
        } else {
            WinnerRole::ThirdParty
        })
    }

    /// Net decrease of the sender's balance.
    pub fn sender_debit(&self) -> U256 {
        match self.winner_role() {
            Some(WinnerRole::Sender) => self.gross - self.reward,
            _ => self.gross,
        }
    }

    /// Net increase of the receiver's balance.
    pub fn receiver_credit(&self) -> U256 {
        match self.winner_role() {
            Some(WinnerRole::Receiver) => self.net_to_receiver + self.reward,
            _ => self.net_to_receiver,
        }
    }

    /// Reward paid out-of-band, only when the winner is neither party.
    pub fn third_party_credit(&self) -> Option<(Address, U256)> {
        match self.winner_role() {
            Some(WinnerRole::ThirdParty) => self.winner.map(|w| (w, self.reward)),
            _ => None,
        }
    }
}

/// Stateless fee calculator; nonces live in the caller's [`NonceBook`].
#[derive(Clone, Copy, Debug)]
pub struct FeeEngine {
    divisor: U256,
}

impl FeeEngine {
    /// # Panics
    /// Panics if `fee_divisor` is zero; `TokenParams::validate` rejects it.
    pub fn new(fee_divisor: u64) -> Self {
        assert!(fee_divisor > 0, "fee divisor must be non-zero");
        Self {
            divisor: U256::from(fee_divisor),
        }
    }

    /// Burn and reward are each `ceil(gross / divisor)`, rounded separately.
    ///
    /// The reward is capped at what is left after the burn, so a single raw
    /// unit is burned whole instead of driving the receiver negative.
    pub fn split(&self, gross: U256) -> FeeSplit {
        let burn = ceil_div(gross, self.divisor);
        let reward = burn.min(gross - burn);
        FeeSplit { burn, reward }
    }

    /// Winner the next draw by `from` for `gross` would pick, without
    /// consuming the nonce.
    pub fn preview_winner(
        &self,
        heap: &TopHeap,
        nonces: &NonceBook,
        from: &Address,
        gross: U256,
    ) -> Option<Address> {
        let magnitude = order_of_magnitude(gross);
        draw(heap, from, nonces.get(from, magnitude), magnitude)
    }

    /// Compute fees and draw a winner from `heap` as it stands.
    ///
    /// The caller applies the sender debit to `heap` first; the draw then
    /// indexes the post-debit layout. An empty heap skips the draw, leaves the
    /// nonce untouched and waives the reward.
    pub fn apply_transfer_fees(
        &self,
        heap: &TopHeap,
        nonces: &mut NonceBook,
        from: Address,
        to: Address,
        gross: U256,
    ) -> FeeOutcome {
        let split = self.split(gross);
        let winner = if heap.is_empty() {
            None
        } else {
            let magnitude = order_of_magnitude(gross);
            let nonce = nonces.next(from, magnitude);
            draw(heap, &from, nonce, magnitude)
        };
        let reward = if winner.is_some() { split.reward } else { U256::ZERO };

        FeeOutcome {
            from,
            to,
            gross,
            burn: split.burn,
            reward,
            net_to_receiver: gross - split.burn - reward,
            winner,
        }
    }
}

/// `heap[keccak256(from ‖ nonce ‖ magnitude) mod size]`.
fn draw(heap: &TopHeap, from: &Address, nonce: u64, magnitude: u32) -> Option<Address> {
    if heap.is_empty() {
        return None;
    }
    let digest = U256::from_be_bytes(winner_digest(from, nonce, magnitude).0);
    let slot = digest % U256::from(heap.size() as u64);
    heap.entry_at(slot.as_limbs()[0] as usize)
        .ok()
        .map(|entry| entry.address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shuffle_types::tokens;

    fn addr(n: u8) -> Address {
        Address::repeat_byte(n)
    }

    fn engine() -> FeeEngine {
        FeeEngine::new(100)
    }

    #[test]
    fn split_rounds_each_fee_up() {
        let split = engine().split(U256::from(101u64));
        assert_eq!(split.burn, U256::from(2u64));
        assert_eq!(split.reward, U256::from(2u64));

        let split = engine().split(U256::from(100u64));
        assert_eq!(split.burn, U256::from(1u64));
        assert_eq!(split.reward, U256::from(1u64));
    }

    #[test]
    fn split_of_one_unit_burns_only() {
        let split = engine().split(U256::from(1u64));
        assert_eq!(split.burn, U256::from(1u64));
        assert_eq!(split.reward, U256::ZERO);
    }

    #[test]
    fn split_of_two_units_leaves_nothing() {
        let split = engine().split(U256::from(2u64));
        assert_eq!(split.burn + split.reward, U256::from(2u64));
    }

    #[test]
    fn split_of_four_tokens() {
        let split = engine().split(tokens(4));
        let fee = U256::from(40_000_000_000_000_000u64);
        assert_eq!(split, FeeSplit { burn: fee, reward: fee });
    }

    #[test]
    fn empty_heap_skips_draw_and_reward() {
        let heap = TopHeap::new(8);
        let mut nonces = NonceBook::new();
        let outcome = engine().apply_transfer_fees(&heap, &mut nonces, addr(1), addr(2), U256::from(1_000u64));
        assert_eq!(outcome.winner, None);
        assert_eq!(outcome.reward, U256::ZERO);
        assert_eq!(outcome.burn, U256::from(10u64));
        assert_eq!(outcome.net_to_receiver, U256::from(990u64));
        assert!(nonces.is_empty());
    }

    #[test]
    fn single_resident_always_wins() {
        let mut heap = TopHeap::new(8);
        heap.insert_or_update(addr(9), U256::from(5_000u64));
        let mut nonces = NonceBook::new();
        for _ in 0..5 {
            let outcome = engine().apply_transfer_fees(&heap, &mut nonces, addr(1), addr(2), U256::from(1_000u64));
            assert_eq!(outcome.winner, Some(addr(9)));
            assert_eq!(outcome.winner_role(), Some(WinnerRole::ThirdParty));
        }
        assert_eq!(nonces.get(&addr(1), 3), 5);
    }

    #[test]
    fn draw_matches_preview_then_advances() {
        let mut heap = TopHeap::new(8);
        for n in 1..=6u8 {
            heap.insert_or_update(addr(n), U256::from(n as u64 * 1_000));
        }
        let mut nonces = NonceBook::new();
        let gross = U256::from(12_345u64);
        let expected = engine().preview_winner(&heap, &nonces, &addr(1), gross);
        let outcome = engine().apply_transfer_fees(&heap, &mut nonces, addr(1), addr(2), gross);
        assert_eq!(outcome.winner, expected);
        assert_eq!(nonces.get(&addr(1), 4), 1);
    }

    #[test]
    fn draw_index_is_digest_mod_size() {
        let mut heap = TopHeap::new(8);
        for n in 1..=5u8 {
            heap.insert_or_update(addr(n), U256::from(n as u64 * 10));
        }
        let digest = U256::from_be_bytes(winner_digest(&addr(7), 0, 2).0);
        let slot = (digest % U256::from(5u64)).as_limbs()[0] as usize;
        let expected = heap.entry_at(slot).unwrap().address;
        assert_eq!(draw(&heap, &addr(7), 0, 2), Some(expected));
    }

    fn outcome_with(winner: Option<Address>) -> FeeOutcome {
        FeeOutcome {
            from: addr(1),
            to: addr(2),
            gross: U256::from(1_000u64),
            burn: U256::from(10u64),
            reward: U256::from(10u64),
            net_to_receiver: U256::from(980u64),
            winner,
        }
    }

    #[test]
    fn settlement_when_sender_wins() {
        let o = outcome_with(Some(addr(1)));
        assert_eq!(o.sender_debit(), U256::from(990u64));
        assert_eq!(o.receiver_credit(), U256::from(980u64));
        assert_eq!(o.third_party_credit(), None);
    }

    #[test]
    fn settlement_when_receiver_wins() {
        let o = outcome_with(Some(addr(2)));
        assert_eq!(o.sender_debit(), U256::from(1_000u64));
        assert_eq!(o.receiver_credit(), U256::from(990u64));
        assert_eq!(o.third_party_credit(), None);
    }

    #[test]
    fn settlement_when_third_party_wins() {
        let o = outcome_with(Some(addr(3)));
        assert_eq!(o.sender_debit(), U256::from(1_000u64));
        assert_eq!(o.receiver_credit(), U256::from(980u64));
        assert_eq!(o.third_party_credit(), Some((addr(3), U256::from(10u64))));
    }
}
