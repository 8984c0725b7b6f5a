use notes_core::db::open_db_in_memory;
use notes_core::{
    Note, NoteRepository, RepoError, SqliteNoteRepository, SqliteUserRepository, User, UserId,
    UserRepository,
};
use rusqlite::Connection;

fn seed_user(conn: &Connection, username: &str) -> UserId {
    let repo = SqliteUserRepository::try_new(conn).unwrap();
    repo.create_user(&User::new(username), "$argon2id$placeholder")
        .unwrap()
}

#[test]
fn create_and_get_roundtrip_assigns_timestamps() {
    let conn = open_db_in_memory().unwrap();
    let author = seed_user(&conn, "author");
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let note = Note::new(author, "Заголовок", "Текст", "zagolovok");
    let id = repo.create_note(&note).unwrap();

    let loaded = repo.get_note(id).unwrap().unwrap();
    assert_eq!(loaded.title, "Заголовок");
    assert_eq!(loaded.text, "Текст");
    assert_eq!(loaded.slug, "zagolovok");
    assert_eq!(loaded.author, author);
    assert!(loaded.created_at > 0);
    assert!(loaded.updated_at >= loaded.created_at);
}

#[test]
fn find_note_for_author_hides_other_authors_notes() {
    let conn = open_db_in_memory().unwrap();
    let author = seed_user(&conn, "author");
    let reader = seed_user(&conn, "reader");
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();
    repo.create_note(&Note::new(author, "t", "x", "owned"))
        .unwrap();

    assert!(repo.find_note_for_author("owned", author).unwrap().is_some());
    assert!(repo.find_note_for_author("owned", reader).unwrap().is_none());
}

#[test]
fn list_is_scoped_to_author() {
    let conn = open_db_in_memory().unwrap();
    let author = seed_user(&conn, "author");
    let reader = seed_user(&conn, "reader");
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();
    repo.create_note(&Note::new(author, "a", "x", "a-note"))
        .unwrap();
    repo.create_note(&Note::new(reader, "r", "x", "r-note"))
        .unwrap();

    let listed = repo.list_notes_for_author(reader).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].slug, "r-note");
}

#[test]
fn duplicate_slug_insert_surfaces_as_conflict() {
    let conn = open_db_in_memory().unwrap();
    let author = seed_user(&conn, "author");
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();
    repo.create_note(&Note::new(author, "t", "x", "same"))
        .unwrap();

    let err = repo
        .create_note(&Note::new(author, "t2", "x", "same"))
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict(ref target) if target == "notes.slug"));
    assert_eq!(repo.count_notes().unwrap(), 1);
}

#[test]
fn slug_taken_ignores_excluded_note() {
    let conn = open_db_in_memory().unwrap();
    let author = seed_user(&conn, "author");
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();
    let id = repo
        .create_note(&Note::new(author, "t", "x", "mine"))
        .unwrap();

    assert!(repo.slug_taken("mine", None).unwrap());
    assert!(!repo.slug_taken("mine", Some(id)).unwrap());
    assert!(!repo.slug_taken("free", None).unwrap());
}

#[test]
fn update_and_delete_require_ownership() {
    let conn = open_db_in_memory().unwrap();
    let author = seed_user(&conn, "author");
    let reader = seed_user(&conn, "reader");
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();
    let note = Note::new(author, "t", "x", "owned");
    repo.create_note(&note).unwrap();

    let mut hijacked = note.clone();
    hijacked.author = reader;
    hijacked.title = "changed".to_string();
    assert!(matches!(
        repo.update_note(&hijacked).unwrap_err(),
        RepoError::NotFound(_)
    ));
    assert!(matches!(
        repo.delete_note(note.id, reader).unwrap_err(),
        RepoError::NotFound(_)
    ));

    let unchanged = repo.get_note(note.id).unwrap().unwrap();
    assert_eq!(unchanged.title, "t");
    assert_eq!(unchanged.author, author);

    repo.delete_note(note.id, author).unwrap();
    assert_eq!(repo.count_notes().unwrap(), 0);
}

#[test]
fn try_new_rejects_connection_without_notes_table() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqliteNoteRepository::try_new(&conn).err().unwrap();
    assert!(matches!(err, RepoError::MissingRequiredTable("notes")));
}

#[test]
fn list_puts_notes_created_back_to_back_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let author = seed_user(&conn, "author");
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let mut created = Vec::new();
    for index in 0..5 {
        let note = Note::new(author, "t", "x", format!("note-{index}"));
        created.push(repo.create_note(&note).unwrap());
    }

    let listed: Vec<_> = repo
        .list_notes_for_author(author)
        .unwrap()
        .into_iter()
        .map(|note| note.id)
        .collect();
    created.reverse();
    assert_eq!(listed, created);
}

#[test]
fn edit_moves_note_to_front_within_the_same_second() {
    let conn = open_db_in_memory().unwrap();
    let author = seed_user(&conn, "author");
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();
    let older = Note::new(author, "older", "x", "older");
    repo.create_note(&older).unwrap();
    repo.create_note(&Note::new(author, "newer", "x", "newer"))
        .unwrap();

    std::thread::sleep(std::time::Duration::from_millis(5));
    let mut edited = repo.get_note(older.id).unwrap().unwrap();
    edited.text = "changed".to_string();
    repo.update_note(&edited).unwrap();

    let listed = repo.list_notes_for_author(author).unwrap();
    assert_eq!(listed[0].id, older.id);
    assert!(listed[0].updated_at > listed[1].updated_at);
}
