use glamour_salon::auth::{hash_password, verify_password};
use glamour_salon::models::{ROLE_PELANGGAN, ROLE_STAFF};
use glamour_salon::repo::users;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");
    pool
}

#[actix_web::test]
async fn login_verifies_against_stored_hash() {
    let pool = test_pool().await;
    let hash = hash_password("rahasia123").unwrap();
    users::register(&pool, "dewi", &hash, ROLE_PELANGGAN, "Dewi", "0812", "Jl. Anggrek")
        .await
        .unwrap();

    let user = users::find_by_username(&pool, "dewi")
        .await
        .unwrap()
        .expect("account exists");
    assert!(verify_password("rahasia123", &user.password_hash));
    assert!(!verify_password("salah", &user.password_hash));
}

#[actix_web::test]
async fn unknown_username_finds_nothing() {
    let pool = test_pool().await;
    let user = users::find_by_username(&pool, "tidak_ada").await.unwrap();
    assert!(user.is_none());
}

#[actix_web::test]
async fn username_change_to_taken_name_is_refused() {
    let pool = test_pool().await;
    users::register(&pool, "dewi", "h1", ROLE_PELANGGAN, "Dewi", "", "")
        .await
        .unwrap();
    users::register(&pool, "sari", "h2", ROLE_STAFF, "", "", "")
        .await
        .unwrap();

    let sari = users::find_by_username(&pool, "sari")
        .await
        .unwrap()
        .unwrap();
    let applied = users::update_account(&pool, sari.id_user, "dewi", None)
        .await
        .unwrap();
    assert!(!applied);

    // The old name still resolves to the same account.
    let still = users::find_by_username(&pool, "sari").await.unwrap();
    assert!(still.is_some());
}

#[actix_web::test]
async fn account_update_can_rotate_the_password() {
    let pool = test_pool().await;
    let old_hash = hash_password("lama").unwrap();
    users::register(&pool, "dewi", &old_hash, ROLE_PELANGGAN, "Dewi", "", "")
        .await
        .unwrap();
    let user = users::find_by_username(&pool, "dewi")
        .await
        .unwrap()
        .unwrap();

    let new_hash = hash_password("baru").unwrap();
    let applied = users::update_account(&pool, user.id_user, "dewi_baru", Some(&new_hash))
        .await
        .unwrap();
    assert!(applied);

    let user = users::find_by_username(&pool, "dewi_baru")
        .await
        .unwrap()
        .expect("renamed account");
    assert!(verify_password("baru", &user.password_hash));
    assert!(!verify_password("lama", &user.password_hash));
}

#[actix_web::test]
async fn password_reset_replaces_the_hash() {
    let pool = test_pool().await;
    let old_hash = hash_password("lama").unwrap();
    users::register(&pool, "dewi", &old_hash, ROLE_PELANGGAN, "Dewi", "", "")
        .await
        .unwrap();

    let new_hash = hash_password("baru").unwrap();
    let applied = users::reset_password(&pool, "dewi", &new_hash).await.unwrap();
    assert!(applied);

    let user = users::find_by_username(&pool, "dewi")
        .await
        .unwrap()
        .unwrap();
    assert!(verify_password("baru", &user.password_hash));
}

#[actix_web::test]
async fn deleting_a_customer_removes_profile_and_account() {
    let pool = test_pool().await;
    users::register(&pool, "dewi", "h1", ROLE_PELANGGAN, "Dewi", "0812", "Jl. Anggrek")
        .await
        .unwrap();
    let user = users::find_by_username(&pool, "dewi")
        .await
        .unwrap()
        .unwrap();

    users::delete_customer(&pool, user.id_user).await.unwrap();

    assert!(users::find_by_username(&pool, "dewi")
        .await
        .unwrap()
        .is_none());
    let profil = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM profil_pelanggan WHERE id_user = ?",
    )
    .bind(user.id_user)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(profil, 0);
}
