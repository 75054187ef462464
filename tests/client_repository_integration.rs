use client_registry::domain::entities::client::ClientDraft;
use client_registry::domain::services::conflict::ConflictField;
use client_registry::infrastructure::db::postgres::PostgresDatabase;
use client_registry::infrastructure::db::postgres::client_store_postgres::ClientStorePostgres;
use client_registry::infrastructure::db::repositories::client_repository::ClientRepository;
use client_registry::infrastructure::db::stores::client_store::ClientRepositoryError;
use std::sync::Arc;
use time::macros::date;

fn test_db_url() -> Option<String> {
    std::env::var("DATABASE_URL").ok()
}

async fn setup_repo() -> Option<ClientRepository> {
    let url = test_db_url()?;
    let db = Arc::new(PostgresDatabase::connect(&url).await.ok()?);
    db.migrate().await.ok()?;
    let store = ClientStorePostgres::new(db);
    Some(ClientRepository::new(Arc::new(store)))
}

/// A draft whose CUIT and email are unique per call.
fn sample_draft(first_name: &str) -> ClientDraft {
    let n = uuid::Uuid::new_v4().as_u128();
    ClientDraft {
        first_name: first_name.to_string(),
        last_name: "Integración".to_string(),
        corporate_name: "Integración SRL".to_string(),
        cuit: format!("{:02}-{:08}-{}", n % 100, (n / 100) % 100_000_000, (n / 10) % 10),
        birthdate: date!(1975 - 08 - 21),
        cell_phone: "1144443333".to_string(),
        email: format!("{n:x}@repo.test"),
    }
}

#[tokio::test]
async fn given_draft_when_insert_should_round_trip_through_get() {
    let Some(repo) = setup_repo().await else {
        return;
    };
    let draft = sample_draft("Lucía");

    let stored = repo.insert(&draft).await.unwrap();
    let fetched = repo.get(stored.id).await.unwrap().unwrap();

    assert_eq!(fetched.to_draft(), draft);
    repo.delete(&stored).await.unwrap();
}

#[tokio::test]
async fn given_existing_client_when_update_should_persist_new_fields() {
    let Some(repo) = setup_repo().await else {
        return;
    };
    let mut client = repo.insert(&sample_draft("Lucía")).await.unwrap();
    client.apply(sample_draft("Lucas"));

    let updated = repo.update(&client).await.unwrap();

    assert_eq!(updated, client);
    assert_eq!(repo.get(client.id).await.unwrap().unwrap().first_name, "Lucas");
    repo.delete(&client).await.unwrap();
}

#[tokio::test]
async fn given_deleted_client_when_get_should_return_none() {
    let Some(repo) = setup_repo().await else {
        return;
    };
    let stored = repo.insert(&sample_draft("Lucía")).await.unwrap();

    repo.delete(&stored).await.unwrap();

    assert!(repo.get(stored.id).await.unwrap().is_none());
    assert!(matches!(
        repo.delete(&stored).await,
        Err(ClientRepositoryError::NotFound)
    ));
}

#[tokio::test]
async fn given_taken_email_when_insert_should_report_email_conflict() {
    let Some(repo) = setup_repo().await else {
        return;
    };
    let first = repo.insert(&sample_draft("Lucía")).await.unwrap();
    let mut draft = sample_draft("Lucas");
    draft.email = first.email.clone();

    let result = repo.insert(&draft).await;

    assert!(matches!(
        result,
        Err(ClientRepositoryError::Conflict(ConflictField::Email))
    ));
    repo.delete(&first).await.unwrap();
}

#[tokio::test]
async fn given_matching_cuit_and_email_when_find_conflict_should_return_cuit_owner() {
    let Some(repo) = setup_repo().await else {
        return;
    };
    let by_email = repo.insert(&sample_draft("Lucía")).await.unwrap();
    let by_cuit = repo.insert(&sample_draft("Lucas")).await.unwrap();

    let found = repo
        .find_conflict(&by_cuit.cuit, &by_email.email)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(found.id, by_cuit.id);
    repo.delete(&by_email).await.unwrap();
    repo.delete(&by_cuit).await.unwrap();
}

#[tokio::test]
async fn given_accented_last_name_when_search_without_accents_should_match() {
    let Some(repo) = setup_repo().await else {
        return;
    };
    let stored = repo.insert(&sample_draft("Lucía")).await.unwrap();

    let found = repo.search_by_name("integracion").await.unwrap();

    assert!(found.iter().any(|c| c.id == stored.id));
    repo.delete(&stored).await.unwrap();
}
