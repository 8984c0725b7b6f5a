use notes_core::db::open_db_in_memory;
use notes_core::{
    check_credentials, AccountError, AccountService, PreparedSignup, SignupInput,
    SqliteUserRepository,
};

#[test]
fn signup_then_authenticate() {
    let conn = open_db_in_memory().unwrap();
    let service = AccountService::new(SqliteUserRepository::try_new(&conn).unwrap());

    let created = service
        .signup(&SignupInput::new("reader", "long-enough-pass"))
        .unwrap();
    assert_eq!(created.username, "reader");

    let logged_in = service.authenticate("reader", "long-enough-pass").unwrap();
    assert_eq!(logged_in.id, created.id);
    assert_eq!(service.get_user(created.id).unwrap(), Some(created));
}

#[test]
fn password_is_stored_hashed() {
    let conn = open_db_in_memory().unwrap();
    let service = AccountService::new(SqliteUserRepository::try_new(&conn).unwrap());
    service
        .signup(&SignupInput::new("reader", "long-enough-pass"))
        .unwrap();

    let stored: String = conn
        .query_row(
            "SELECT password_hash FROM users WHERE username = 'reader';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_ne!(stored, "long-enough-pass");
    assert!(stored.starts_with("$argon2id$"));
}

#[test]
fn duplicate_username_is_a_field_error() {
    let conn = open_db_in_memory().unwrap();
    let service = AccountService::new(SqliteUserRepository::try_new(&conn).unwrap());
    service
        .signup(&SignupInput::new("reader", "long-enough-pass"))
        .unwrap();

    let err = service
        .signup(&SignupInput::new("reader", "another-pass-1"))
        .unwrap_err();
    match err {
        AccountError::Invalid(errors) => {
            assert!(errors.field("username")[0].contains("already exists"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn wrong_password_and_unknown_user_are_indistinguishable() {
    let conn = open_db_in_memory().unwrap();
    let service = AccountService::new(SqliteUserRepository::try_new(&conn).unwrap());
    service
        .signup(&SignupInput::new("reader", "long-enough-pass"))
        .unwrap();

    assert!(matches!(
        service.authenticate("reader", "wrong-password").unwrap_err(),
        AccountError::InvalidCredentials
    ));
    assert!(matches!(
        service.authenticate("nobody", "long-enough-pass").unwrap_err(),
        AccountError::InvalidCredentials
    ));
}

#[test]
fn signup_is_prepared_before_any_connection_exists() {
    let prepared = PreparedSignup::new(&SignupInput::new(" reader ", "long-enough-pass")).unwrap();
    assert_eq!(prepared.username(), "reader");

    let conn = open_db_in_memory().unwrap();
    let service = AccountService::new(SqliteUserRepository::try_new(&conn).unwrap());
    let user = service.register(prepared).unwrap();
    assert_eq!(service.authenticate("reader", "long-enough-pass").unwrap(), user);
}

#[test]
fn invalid_signup_fails_during_preparation() {
    let err = PreparedSignup::new(&SignupInput::new("reader", "short")).unwrap_err();
    assert!(matches!(err, AccountError::Invalid(_)));
}

#[test]
fn register_rejects_username_taken_after_preparation() {
    let conn = open_db_in_memory().unwrap();
    let service = AccountService::new(SqliteUserRepository::try_new(&conn).unwrap());
    let first = PreparedSignup::new(&SignupInput::new("reader", "long-enough-pass")).unwrap();
    let second = PreparedSignup::new(&SignupInput::new("reader", "another-pass-1")).unwrap();

    service.register(first).unwrap();
    match service.register(second).unwrap_err() {
        AccountError::Invalid(errors) => {
            assert!(errors.field("username")[0].contains("already exists"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn credentials_are_checked_after_the_connection_is_released() {
    let conn = open_db_in_memory().unwrap();
    let service = AccountService::new(SqliteUserRepository::try_new(&conn).unwrap());
    let created = service
        .signup(&SignupInput::new("reader", "long-enough-pass"))
        .unwrap();

    let found = service.find_credentials("reader").unwrap();
    let missing = service.find_credentials("nobody").unwrap();
    drop(service);
    drop(conn);

    assert_eq!(check_credentials(found.clone(), "long-enough-pass").unwrap(), created);
    assert!(matches!(
        check_credentials(found, "wrong-password").unwrap_err(),
        AccountError::InvalidCredentials
    ));
    assert!(matches!(
        check_credentials(missing, "long-enough-pass").unwrap_err(),
        AccountError::InvalidCredentials
    ));
}
