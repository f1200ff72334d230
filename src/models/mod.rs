pub mod case;
pub mod delivery;
pub mod event;
pub mod outcome;
pub mod party;
