//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `gamestore_core` wiring end to end on a throwaway store.
//! - Route game writes through the access gateway using the configured roles.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Usage: `gamestore_cli [config.json]`

use gamestore_core::{
    add_all, init_logging_from_config, AccessGateway, CoreConfig, Dao, DaoHistory, Game,
    GameBuilder, Genre, LoggingSubscriber, Platform, Predicate, Sha256Hasher, SqliteDao,
    StoreHandle, User, UserDirectory,
};
use log::error;
use std::error::Error;
use std::process::ExitCode;

const SMOKE_LOGIN: &str = "curator";
const SMOKE_SECRET: &str = "curator";
const SMOKE_ROLE: &str = "admin";
use std::sync::Arc;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => CoreConfig::load(path)?,
        None => CoreConfig::default(),
    };
    init_logging_from_config(&config)?;

    let mut store = StoreHandle::new();
    let conn = match config.database_path.as_ref() {
        Some(path) => store.open(path)?,
        None => store.open_in_memory()?,
    };

    println!("gamestore_core version={}", gamestore_core::core_version());

    add_all(
        &mut SqliteDao::<Genre>::new(conn),
        &[Genre::new("fps"), Genre::new("mmo"), Genre::new("moba")],
    )?;
    add_all(
        &mut SqliteDao::<Platform>::with_subscriber(conn, Arc::new(LoggingSubscriber)),
        &[Platform::new("pc"), Platform::new("ps"), Platform::new("x")],
    )?;

    let csgo = GameBuilder::new()
        .name("csgo")
        .price(11.99)
        .add_platforms(["pc", "x"])
        .add_genres(["fps", "mmo"])
        .build();
    let mut users = SqliteDao::<User>::new(conn);
    if users.find_by_login(SMOKE_LOGIN)?.is_empty() {
        users.add(&User::with_secret(
            SMOKE_LOGIN,
            SMOKE_SECRET,
            SMOKE_ROLE,
            &Sha256Hasher,
        ))?;
    }

    let gateway = AccessGateway::new(SqliteDao::<Game>::new(conn), users)
        .with_policy(config.roles.clone());
    let mut games = DaoHistory::new(gateway);
    if !games.dao_mut().login(SMOKE_LOGIN, SMOKE_SECRET)? {
        return Err(format!("login failed for `{SMOKE_LOGIN}`").into());
    }
    println!(
        "session login={SMOKE_LOGIN} privilege={}",
        games
            .dao()
            .session()
            .privilege()
            .map_or("none", |privilege| privilege.as_str())
    );

    games.dao_mut().add(&csgo)?;
    print_games("added", games.dao())?;

    let paid = games
        .dao()
        .filter(&[Predicate::parse("price", ">", 0)?])?;
    println!("paid games={}", paid.len());

    games.backup();
    games.dao_mut().update(&csgo, &Game::new("1.6", 5.99))?;
    games.backup();
    print_games("updated", games.dao())?;

    for entry in games.show_history() {
        println!("history {entry}");
    }

    let outcome = games.undo();
    println!("undo reverted={}", outcome.is_reverted());
    print_games("restored", games.dao())?;

    drop(games);
    store.close()?;
    Ok(())
}

fn print_games(stage: &str, dao: &impl Dao<Entity = Game>) -> Result<(), Box<dyn Error>> {
    for stored in dao.get_all()? {
        let game = stored.entity;
        println!(
            "{stage} id={} name={} price={:.2} platforms={:?} genres={:?}",
            stored.id, game.name, game.price, game.platforms, game.genres
        );
    }
    Ok(())
}
