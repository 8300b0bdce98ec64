//! Game core: player records, clans, progression, missions, the shop and the
//! daily reward, plus the store they persist to.
//!
//! The pure rule functions (`clan`, `progression`, `mission`, `shop`, `actions`)
//! take a `&mut Player` and an injected RNG and know nothing about storage.
//! [`GameService`] binds them to a [`PlayerStore`].

pub mod actions;
pub mod catalog;
pub mod clan;
pub mod errors;
pub mod mission;
pub mod progression;
pub mod rules;
pub mod service;
pub mod shop;
pub mod storage;
pub mod types;

pub use catalog::Catalog;
pub use errors::GameError;
pub use rules::GameRules;
pub use service::GameService;
pub use storage::{JsonPlayerStore, PlayerStore, SledPlayerStore, SledPlayerStoreBuilder};
pub use types::{Clan, ClanAssignment, Mission, Player, Rarity, Village};
