pub mod card;
pub mod combo;
pub mod deck;
pub mod player;
pub mod rank;
pub mod suit;
pub mod trick;
pub mod trump;
