use laybe_core::db::open_db_in_memory;
use laybe_core::{
    Argument, ArgumentRepository, ArgumentSortField, ArgumentType, EntityKind, PageRequest,
    Proposition, PropositionId, PropositionRepository, RepoError, SortDirection,
    SqliteArgumentRepository, SqlitePropositionRepository,
};
use rusqlite::Connection;

fn seed_pair(conn: &Connection) -> (PropositionId, PropositionId) {
    let repo = SqlitePropositionRepository::try_new(conn).unwrap();
    let rain = repo
        .create_proposition(&Proposition::single("rain"))
        .unwrap();
    let wet = repo.create_proposition(&Proposition::single("wet")).unwrap();
    (rain.id.unwrap(), wet.id.unwrap())
}

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let (rain, wet) = seed_pair(&conn);
    let repo = SqliteArgumentRepository::try_new(&conn).unwrap();

    let created = repo
        .create_argument(&Argument::new(ArgumentType::Implication, rain, wet))
        .unwrap();
    let loaded = repo.get_argument(created.id.unwrap()).unwrap().unwrap();

    assert_eq!(loaded, created);
    assert_eq!(loaded.kind, ArgumentType::Implication);
    assert_eq!(loaded.premise, Some(rain));
    assert_eq!(loaded.conclusion, Some(wet));
}

#[test]
fn premise_and_conclusion_may_be_the_same_proposition() {
    let conn = open_db_in_memory().unwrap();
    let (rain, _) = seed_pair(&conn);
    let repo = SqliteArgumentRepository::try_new(&conn).unwrap();

    let created = repo
        .create_argument(&Argument::new(ArgumentType::Abjunction, rain, rain))
        .unwrap();
    assert_eq!(created.premise, created.conclusion);
}

#[test]
fn create_rejects_already_identified_record() {
    let conn = open_db_in_memory().unwrap();
    let (rain, wet) = seed_pair(&conn);
    let repo = SqliteArgumentRepository::try_new(&conn).unwrap();

    let mut argument = Argument::new(ArgumentType::Implication, rain, wet);
    argument.id = Some(1);
    let err = repo.create_argument(&argument).unwrap_err();
    assert!(matches!(
        err,
        RepoError::AlreadyIdentified(EntityKind::Argument)
    ));
}

#[test]
fn update_replaces_fields_and_missing_id_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let (rain, wet) = seed_pair(&conn);
    let repo = SqliteArgumentRepository::try_new(&conn).unwrap();

    let mut argument = repo
        .create_argument(&Argument::new(ArgumentType::Implication, rain, wet))
        .unwrap();
    argument.kind = ArgumentType::Abjunction;
    argument.premise = Some(wet);
    argument.conclusion = None;
    repo.update_argument(&argument).unwrap();

    let loaded = repo.get_argument(argument.id.unwrap()).unwrap().unwrap();
    assert_eq!(loaded.kind, ArgumentType::Abjunction);
    assert_eq!(loaded.premise, Some(wet));
    assert_eq!(loaded.conclusion, None);

    let mut missing = Argument::new(ArgumentType::Implication, rain, wet);
    missing.id = Some(999);
    let err = repo.update_argument(&missing).unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            entity: EntityKind::Argument,
            id: 999
        }
    ));
}

#[test]
fn delete_removes_record_and_missing_delete_is_noop() {
    let conn = open_db_in_memory().unwrap();
    let (rain, wet) = seed_pair(&conn);
    let repo = SqliteArgumentRepository::try_new(&conn).unwrap();

    let created = repo
        .create_argument(&Argument::new(ArgumentType::Implication, rain, wet))
        .unwrap();
    let id = created.id.unwrap();

    repo.delete_argument(id).unwrap();
    assert!(repo.get_argument(id).unwrap().is_none());
    repo.delete_argument(id).unwrap();
}

#[test]
fn premise_and_conclusion_lookups_are_derived_queries() {
    let conn = open_db_in_memory().unwrap();
    let (rain, wet) = seed_pair(&conn);
    let repo = SqliteArgumentRepository::try_new(&conn).unwrap();

    let forward = repo
        .create_argument(&Argument::new(ArgumentType::Implication, rain, wet))
        .unwrap();
    let backward = repo
        .create_argument(&Argument::new(ArgumentType::Abjunction, wet, rain))
        .unwrap();

    assert_eq!(repo.find_by_premise(rain).unwrap(), vec![forward.clone()]);
    assert_eq!(repo.find_by_conclusion(rain).unwrap(), vec![backward.clone()]);
    assert_eq!(repo.find_by_premise(wet).unwrap(), vec![backward]);
    assert_eq!(repo.find_by_conclusion(wet).unwrap(), vec![forward]);
}

#[test]
fn pagination_sorts_by_type_with_id_tie_break() {
    let conn = open_db_in_memory().unwrap();
    let (rain, wet) = seed_pair(&conn);
    let repo = SqliteArgumentRepository::try_new(&conn).unwrap();

    let first = repo
        .create_argument(&Argument::new(ArgumentType::Implication, rain, wet))
        .unwrap();
    let second = repo
        .create_argument(&Argument::new(ArgumentType::Abjunction, rain, wet))
        .unwrap();
    let third = repo
        .create_argument(&Argument::new(ArgumentType::Implication, wet, rain))
        .unwrap();

    let request =
        PageRequest::new(0, 10).sorted_by(ArgumentSortField::Type, SortDirection::Ascending);
    let page = repo.page_arguments(&request).unwrap();

    assert_eq!(page.total_count, 3);
    assert_eq!(page.items, vec![second, first, third]);
}
