use gamestore_core::db::open_db_in_memory;
use gamestore_core::{
    AccessGateway, CoreConfig, CredentialHasher, Dao, DaoError, DaoHistory, EntityKind, Genre,
    MutationRecord, Privilege, Role, RolePolicy, SessionState, Sha256Hasher, SqliteDao, Subscriber,
    SubscriberError, User,
};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

fn seed_users(conn: &Connection) {
    let mut users = SqliteDao::<User>::new(conn);
    users
        .add(&User::with_secret("root", "toor", "admin", &Sha256Hasher))
        .unwrap();
    users
        .add(&User::with_secret("guest", "guest", "user", &Sha256Hasher))
        .unwrap();
}

fn seed_genres(conn: &Connection) {
    let mut genres = SqliteDao::<Genre>::new(conn);
    genres.add(&Genre::new("fps")).unwrap();
    genres.add(&Genre::new("rts")).unwrap();
}

fn gateway(conn: &Connection) -> AccessGateway<SqliteDao<'_, Genre>, SqliteDao<'_, User>> {
    AccessGateway::new(SqliteDao::new(conn), SqliteDao::new(conn))
}

#[derive(Default)]
struct Counter {
    calls: Mutex<usize>,
}

impl Subscriber<Genre> for Counter {
    fn on_mutation(
        &self,
        _kind: EntityKind,
        _record: &MutationRecord<Genre>,
    ) -> Result<(), SubscriberError> {
        *self.calls.lock().unwrap() += 1;
        Ok(())
    }
}

#[test]
fn anonymous_reads_are_empty_and_writes_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    seed_genres(&conn);
    let mut genres = gateway(&conn);

    assert_eq!(genres.session(), &SessionState::Anonymous);
    assert!(genres.get_all().unwrap().is_empty());
    assert!(genres.filter(&[]).unwrap().is_empty());

    let err = genres.add(&Genre::new("moba")).unwrap_err();
    assert!(matches!(err, DaoError::Unauthenticated));
    assert!(err.is_access_denied());
    assert!(matches!(
        genres.remove(&Genre::new("fps")).unwrap_err(),
        DaoError::Unauthenticated
    ));

    assert_eq!(genres.inner().get_all().unwrap().len(), 2);
    assert!(genres.last_mutation().is_none());
}

#[test]
fn read_role_sees_data_but_cannot_write() {
    let conn = open_db_in_memory().unwrap();
    seed_users(&conn);
    seed_genres(&conn);
    let mut genres = gateway(&conn);

    assert!(genres.login("guest", "guest").unwrap());
    assert_eq!(genres.session().privilege(), Some(Privilege::Read));
    assert_eq!(genres.get_all().unwrap().len(), 2);

    let err = genres
        .update(&Genre::new("fps"), &Genre::new("shooter"))
        .unwrap_err();
    match err {
        DaoError::Unauthorized { role, required } => {
            assert_eq!(role, "user");
            assert_eq!(required, Privilege::Full);
        }
        other => panic!("unexpected error: {other}"),
    }

    let names: Vec<String> = genres
        .get_all()
        .unwrap()
        .into_iter()
        .map(|stored| stored.entity.name)
        .collect();
    assert_eq!(names, vec!["fps".to_string(), "rts".to_string()]);
}

#[test]
fn full_role_passes_through_with_notification() {
    let conn = open_db_in_memory().unwrap();
    seed_users(&conn);
    let counter = Arc::new(Counter::default());
    let mut genres = gateway(&conn);
    genres.attach(counter.clone());

    assert!(genres.login("root", "toor").unwrap());
    genres.add(&Genre::new("moba")).unwrap();

    assert_eq!(*counter.calls.lock().unwrap(), 1);
    assert_eq!(
        genres.last_mutation(),
        Some(&MutationRecord::Added {
            object: Genre::new("moba")
        })
    );
    assert_eq!(genres.kind(), EntityKind::Genre);
    assert_eq!(genres.remove(&Genre::new("moba")).unwrap(), 1);
}

#[test]
fn failed_login_leaves_or_resets_anonymous() {
    let conn = open_db_in_memory().unwrap();
    seed_users(&conn);
    let mut genres = gateway(&conn);

    assert!(!genres.login("root", "wrong").unwrap());
    assert!(!genres.session().is_authenticated());
    assert!(!genres.login("nobody", "toor").unwrap());
    assert!(!genres.session().is_authenticated());

    assert!(genres.login("root", "toor").unwrap());
    assert!(genres.session().is_authenticated());
    assert!(!genres.login("root", "bad").unwrap());
    assert_eq!(genres.session(), &SessionState::Anonymous);
}

#[test]
fn relogin_overwrites_the_session() {
    let conn = open_db_in_memory().unwrap();
    seed_users(&conn);
    let mut genres = gateway(&conn);

    assert!(genres.login("root", "toor").unwrap());
    genres.add(&Genre::new("fps")).unwrap();

    assert!(genres.login("guest", "guest").unwrap());
    assert_eq!(
        genres.session(),
        &SessionState::Authenticated {
            login: "guest".to_string(),
            role: "user".to_string(),
            privilege: Some(Privilege::Read),
        }
    );
    assert!(genres.add(&Genre::new("rts")).is_err());
    assert_eq!(genres.get_all().unwrap().len(), 1);
}

#[test]
fn custom_policy_and_unrecognized_roles() {
    let conn = open_db_in_memory().unwrap();
    seed_users(&conn);
    seed_genres(&conn);
    let mut roles = SqliteDao::<Role>::new(&conn);
    roles.add(&Role::new("editor")).unwrap();
    roles.add(&Role::new("intern")).unwrap();
    let mut users = SqliteDao::<User>::new(&conn);
    users
        .add(&User::with_secret("ed", "pw", "editor", &Sha256Hasher))
        .unwrap();
    users
        .add(&User::with_secret("ivy", "pw", "intern", &Sha256Hasher))
        .unwrap();

    let policy = RolePolicy::from_grants([("editor", Privilege::Full)]);
    let mut genres = gateway(&conn).with_policy(policy);

    assert!(genres.login("ed", "pw").unwrap());
    genres.add(&Genre::new("moba")).unwrap();

    // Authenticated, but the role grants nothing.
    assert!(genres.login("ivy", "pw").unwrap());
    assert_eq!(genres.session().privilege(), None);
    assert!(genres.get_all().unwrap().is_empty());
    assert!(matches!(
        genres.add(&Genre::new("rpg")).unwrap_err(),
        DaoError::Unauthorized { .. }
    ));

    // `admin` is not part of this policy either.
    assert!(genres.login("root", "toor").unwrap());
    assert!(genres.get_all().unwrap().is_empty());

    assert_eq!(genres.inner().get_all().unwrap().len(), 3);
}

struct Reversed;

impl CredentialHasher for Reversed {
    fn hash(&self, secret: &str) -> String {
        secret.chars().rev().collect()
    }
}

#[test]
fn custom_hasher_verifies_stored_credentials() {
    let conn = open_db_in_memory().unwrap();
    SqliteDao::<User>::new(&conn)
        .add(&User::with_secret("mallory", "secret", "admin", &Reversed))
        .unwrap();

    let mut genres = gateway(&conn);
    assert!(!genres.login("mallory", "secret").unwrap());

    let mut genres = gateway(&conn).with_hasher(Reversed);
    assert!(genres.login("mallory", "secret").unwrap());
}

#[test]
fn history_over_gateway_undoes_authorized_updates() {
    let conn = open_db_in_memory().unwrap();
    seed_users(&conn);
    seed_genres(&conn);

    let mut genres = gateway(&conn);
    assert!(genres.login("root", "toor").unwrap());
    let mut history = DaoHistory::new(genres);

    history
        .dao_mut()
        .update(&Genre::new("rts"), &Genre::new("strategy"))
        .unwrap();
    history.backup();
    assert!(history.undo().is_reverted());

    let names: Vec<String> = history
        .dao()
        .get_all()
        .unwrap()
        .into_iter()
        .map(|stored| stored.entity.name)
        .collect();
    assert_eq!(names, vec!["fps".to_string(), "rts".to_string()]);

    // Undo replays through the gateway, so a downgraded session cannot revert.
    history
        .dao_mut()
        .update(&Genre::new("fps"), &Genre::new("shooter"))
        .unwrap();
    history.backup();
    assert!(history.dao_mut().login("guest", "guest").unwrap());
    assert!(!history.undo().is_reverted());
    assert_eq!(
        history.into_inner().inner().get_all().unwrap()[0].entity.name,
        "shooter"
    );
}

#[test]
fn configured_role_policy_governs_the_gateway() {
    let conn = open_db_in_memory().unwrap();
    seed_users(&conn);
    let config =
        CoreConfig::from_json_str(r#"{"roles": {"user": "full", "admin": "read"}}"#).unwrap();

    let mut genres = gateway(&conn).with_policy(config.roles.clone());
    assert_eq!(genres.policy(), &config.roles);

    assert!(genres.login("guest", "guest").unwrap());
    genres.add(&Genre::new("moba")).unwrap();

    assert!(genres.login("root", "toor").unwrap());
    assert_eq!(genres.get_all().unwrap().len(), 1);
    assert!(matches!(
        genres.remove(&Genre::new("moba")).unwrap_err(),
        DaoError::Unauthorized { .. }
    ));
}
