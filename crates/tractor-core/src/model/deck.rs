use crate::model::card::{Card, Joker};
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

pub const DECK_COPIES: u8 = 2;

#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Two full decks including both jokers of each: 108 cards.
    pub fn double() -> Self {
        let mut cards = Vec::with_capacity(108);
        for deck in 0..DECK_COPIES {
            for suit in Suit::ALL.iter().copied() {
                for rank in Rank::ORDERED.iter().copied() {
                    cards.push(Card::new(rank, suit).copy(deck));
                }
            }
            cards.push(Card::joker(Joker::Small).copy(deck));
            cards.push(Card::joker(Joker::Big).copy(deck));
        }
        Self { cards }
    }

    pub fn shuffled<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::double();
        deck.shuffle_in_place(rng);
        deck
    }

    pub fn shuffled_with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::shuffled(&mut rng)
    }

    pub fn shuffle_in_place<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn into_cards(self) -> Vec<Card> {
        self.cards
    }
}
