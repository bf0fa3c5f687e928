//! Game entity and builder.
//!
//! # Invariants
//! - `price` is finite and non-negative.
//! - `platforms` / `genres` hold names; the DAO resolves them to ids on write.
//! - `(name, price)` is the natural key used to locate rows.

use super::{require_non_empty, EntityKind, EntityValidationError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Game {
    pub name: String,
    pub price: f64,
    /// Platform names this game is associated with.
    #[serde(default)]
    pub platforms: BTreeSet<String>,
    /// Genre names this game is associated with.
    #[serde(default)]
    pub genres: BTreeSet<String>,
}

impl Game {
    /// Creates a game with no associations.
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
            platforms: BTreeSet::new(),
            genres: BTreeSet::new(),
        }
    }

    pub fn validate(&self) -> Result<(), EntityValidationError> {
        require_non_empty(EntityKind::Game, "name", &self.name)?;
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(EntityValidationError::InvalidPrice(self.price));
        }
        for platform in &self.platforms {
            require_non_empty(EntityKind::Game, "platforms", platform)?;
        }
        for genre in &self.genres {
            require_non_empty(EntityKind::Game, "genres", genre)?;
        }
        Ok(())
    }
}

impl Display for Game {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "game '{}' ({:.2})", self.name, self.price)
    }
}

/// Step-wise constructor for `Game`.
#[derive(Debug, Default)]
pub struct GameBuilder {
    game: Game,
}

impl GameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards everything set so far.
    pub fn reset(&mut self) -> &mut Self {
        self.game = Game::default();
        self
    }

    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.game.name = name.into();
        self
    }

    pub fn price(&mut self, price: f64) -> &mut Self {
        self.game.price = price;
        self
    }

    pub fn add_platforms<I, S>(&mut self, platforms: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.game
            .platforms
            .extend(platforms.into_iter().map(Into::into));
        self
    }

    pub fn clear_platforms(&mut self) -> &mut Self {
        self.game.platforms.clear();
        self
    }

    pub fn add_genres<I, S>(&mut self, genres: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.game.genres.extend(genres.into_iter().map(Into::into));
        self
    }

    pub fn clear_genres(&mut self) -> &mut Self {
        self.game.genres.clear();
        self
    }

    /// Returns a snapshot of the game built so far.
    pub fn build(&self) -> Game {
        self.game.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::{Game, GameBuilder};
    use crate::model::EntityValidationError;

    #[test]
    fn builder_collects_unique_associations() {
        let game = GameBuilder::new()
            .name("csgo")
            .price(11.99)
            .add_platforms(["pc", "x", "pc"])
            .add_genres(["fps"])
            .build();

        assert_eq!(game.name, "csgo");
        assert_eq!(game.platforms.len(), 2);
        assert!(game.genres.contains("fps"));
    }

    #[test]
    fn builder_reset_and_clear() {
        let mut builder = GameBuilder::new();
        builder.name("dota").add_platforms(["pc"]).add_genres(["moba"]);
        builder.clear_platforms();
        assert!(builder.build().platforms.is_empty());
        assert!(!builder.build().genres.is_empty());

        builder.reset();
        assert_eq!(builder.build(), Game::default());
    }

    #[test]
    fn validate_rejects_negative_and_nan_price() {
        assert_eq!(
            Game::new("free", -1.0).validate(),
            Err(EntityValidationError::InvalidPrice(-1.0))
        );
        assert!(Game::new("broken", f64::NAN).validate().is_err());
        assert!(Game::new("free", 0.0).validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_name() {
        let err = Game::new("  ", 1.0).validate().unwrap_err();
        assert!(err.to_string().contains("game.name"));
    }
}
