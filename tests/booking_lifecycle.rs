use glamour_salon::models::{
    ROLE_PELANGGAN, STATUS_DITERIMA, STATUS_DITOLAK, STATUS_MENUNGGU, STATUS_SELESAI,
};
use glamour_salon::repo::{
    bookings::{self, Payment},
    services, staff_members, users,
};
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

struct Fixture {
    id_user: i64,
    id_layanan: i64,
    id_pelayan: i64,
}

async fn seed(pool: &SqlitePool) -> Fixture {
    let created = users::register(
        pool,
        "rina",
        "hash",
        ROLE_PELANGGAN,
        "Rina Putri",
        "081234567890",
        "Jl. Melati 5",
    )
    .await
    .expect("register customer");
    assert!(created);

    let id_user = users::find_by_username(pool, "rina")
        .await
        .expect("lookup")
        .expect("customer exists")
        .id_user;

    let id_layanan = services::insert(
        pool,
        "Creambath",
        "Perawatan Rambut",
        150_000,
        "Creambath dengan pijat kepala",
        None,
    )
    .await
    .expect("insert service");

    let id_pelayan = staff_members::insert(pool, None, "Sari", "Hair Styling", "Aktif", None)
        .await
        .expect("insert staff");

    Fixture {
        id_user,
        id_layanan,
        id_pelayan,
    }
}

async fn book(pool: &SqlitePool, fx: &Fixture) -> i64 {
    bookings::create(
        pool,
        fx.id_user,
        fx.id_layanan,
        fx.id_pelayan,
        "2026-09-01",
        "10:00",
    )
    .await
    .expect("create booking")
}

#[actix_web::test]
async fn new_booking_waits_with_no_payment() {
    let pool = test_pool().await;
    let fx = seed(&pool).await;
    let id = book(&pool, &fx).await;

    let row = bookings::find(&pool, id).await.unwrap().unwrap();
    assert_eq!(row.status, STATUS_MENUNGGU);
    assert_eq!(row.total_bayar, 0);
    assert_eq!(row.metode_bayar, None);
    assert_eq!(row.uang_bayar, 0);
    assert_eq!(row.kembalian, 0);
}

#[actix_web::test]
async fn completion_snapshots_current_price() {
    let pool = test_pool().await;
    let fx = seed(&pool).await;
    let id = book(&pool, &fx).await;

    let applied = bookings::transition_status(
        &pool,
        id,
        STATUS_SELESAI,
        None,
        Some(Payment {
            metode: "Tunai".to_string(),
            uang_bayar: 200_000,
            kembalian: 50_000,
        }),
    )
    .await
    .unwrap();
    assert!(applied);

    let row = bookings::find(&pool, id).await.unwrap().unwrap();
    assert_eq!(row.status, STATUS_SELESAI);
    // Amount owed comes from the catalog, not from the cashier input.
    assert_eq!(row.total_bayar, 150_000);
    assert_eq!(row.metode_bayar.as_deref(), Some("Tunai"));
    assert_eq!(row.uang_bayar, 200_000);
    assert_eq!(row.kembalian, 50_000);
}

#[actix_web::test]
async fn snapshot_survives_later_price_change() {
    let pool = test_pool().await;
    let fx = seed(&pool).await;
    let id = book(&pool, &fx).await;

    bookings::transition_status(&pool, id, STATUS_SELESAI, None, Some(Payment::default()))
        .await
        .unwrap();
    services::update_price(&pool, fx.id_layanan, 999_000)
        .await
        .unwrap();

    let row = bookings::find(&pool, id).await.unwrap().unwrap();
    assert_eq!(row.total_bayar, 150_000);
}

#[actix_web::test]
async fn rejection_clears_every_payment_field() {
    let pool = test_pool().await;
    let fx = seed(&pool).await;
    let id = book(&pool, &fx).await;

    bookings::transition_status(&pool, id, STATUS_SELESAI, None, Some(Payment::default()))
        .await
        .unwrap();
    let applied = bookings::transition_status(&pool, id, STATUS_DITOLAK, None, None)
        .await
        .unwrap();
    assert!(applied);

    let row = bookings::find(&pool, id).await.unwrap().unwrap();
    assert_eq!(row.status, STATUS_DITOLAK);
    assert_eq!(row.total_bayar, 0);
    assert_eq!(row.metode_bayar, None);
    assert_eq!(row.uang_bayar, 0);
    assert_eq!(row.kembalian, 0);

    // Rejecting again changes nothing.
    let again = bookings::transition_status(&pool, id, STATUS_DITOLAK, None, None)
        .await
        .unwrap();
    assert!(again);
    let row = bookings::find(&pool, id).await.unwrap().unwrap();
    assert_eq!(row.status, STATUS_DITOLAK);
    assert_eq!(row.total_bayar, 0);
}

#[actix_web::test]
async fn reopening_clears_method_but_keeps_amount() {
    let pool = test_pool().await;
    let fx = seed(&pool).await;
    let id = book(&pool, &fx).await;

    bookings::transition_status(&pool, id, STATUS_SELESAI, None, Some(Payment::default()))
        .await
        .unwrap();
    bookings::transition_status(&pool, id, STATUS_DITERIMA, None, None)
        .await
        .unwrap();

    let row = bookings::find(&pool, id).await.unwrap().unwrap();
    assert_eq!(row.status, STATUS_DITERIMA);
    assert_eq!(row.metode_bayar, None);
    // The amount columns keep their prior values on this path.
    assert_eq!(row.total_bayar, 150_000);
}

#[actix_web::test]
async fn queue_and_history_split_by_status() {
    let pool = test_pool().await;
    let fx = seed(&pool).await;

    let waiting = book(&pool, &fx).await;
    let accepted = book(&pool, &fx).await;
    let done = book(&pool, &fx).await;
    let rejected = book(&pool, &fx).await;

    bookings::transition_status(&pool, accepted, STATUS_DITERIMA, None, None)
        .await
        .unwrap();
    bookings::transition_status(&pool, done, STATUS_SELESAI, None, Some(Payment::default()))
        .await
        .unwrap();
    bookings::transition_status(&pool, rejected, STATUS_DITOLAK, None, None)
        .await
        .unwrap();

    let active = bookings::active(&pool).await.unwrap();
    let active_ids: Vec<i64> = active.iter().map(|b| b.id_booking).collect();
    assert_eq!(active.len(), 2);
    assert!(active_ids.contains(&waiting));
    assert!(active_ids.contains(&accepted));

    let history = bookings::history(&pool).await.unwrap();
    let history_ids: Vec<i64> = history.iter().map(|b| b.id_booking).collect();
    assert_eq!(history.len(), 2);
    assert!(history_ids.contains(&done));
    assert!(history_ids.contains(&rejected));

    let report = bookings::completed_report(&pool).await.unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(report[0].id_booking, done);

    let mine = bookings::by_customer(&pool, fx.id_user).await.unwrap();
    assert_eq!(mine.len(), 4);
}

#[actix_web::test]
async fn unknown_status_is_rejected_and_row_unchanged() {
    let pool = test_pool().await;
    let fx = seed(&pool).await;
    let id = book(&pool, &fx).await;

    let result = bookings::transition_status(&pool, id, "Dibatalkan", None, None).await;
    assert!(result.is_err());

    let row = bookings::find(&pool, id).await.unwrap().unwrap();
    assert_eq!(row.status, STATUS_MENUNGGU);
}

#[actix_web::test]
async fn missing_booking_reports_no_match() {
    let pool = test_pool().await;
    seed(&pool).await;

    let applied = bookings::transition_status(&pool, 9999, STATUS_DITERIMA, None, None)
        .await
        .unwrap();
    assert!(!applied);
}

#[actix_web::test]
async fn stale_precondition_leaves_row_untouched() {
    let pool = test_pool().await;
    let fx = seed(&pool).await;
    let id = book(&pool, &fx).await;

    bookings::transition_status(&pool, id, STATUS_DITERIMA, Some(STATUS_MENUNGGU), None)
        .await
        .unwrap();

    // A second actor still expecting Menunggu loses the race.
    let applied =
        bookings::transition_status(&pool, id, STATUS_DITOLAK, Some(STATUS_MENUNGGU), None)
            .await
            .unwrap();
    assert!(!applied);

    let row = bookings::find(&pool, id).await.unwrap().unwrap();
    assert_eq!(row.status, STATUS_DITERIMA);
}

#[actix_web::test]
async fn completion_with_matching_precondition_applies() {
    let pool = test_pool().await;
    let fx = seed(&pool).await;
    let id = book(&pool, &fx).await;

    bookings::transition_status(&pool, id, STATUS_DITERIMA, Some(STATUS_MENUNGGU), None)
        .await
        .unwrap();
    let applied = bookings::transition_status(
        &pool,
        id,
        STATUS_SELESAI,
        Some(STATUS_DITERIMA),
        Some(Payment::default()),
    )
    .await
    .unwrap();
    assert!(applied);

    let row = bookings::find(&pool, id).await.unwrap().unwrap();
    assert_eq!(row.status, STATUS_SELESAI);
    assert_eq!(row.total_bayar, 150_000);
}

#[actix_web::test]
async fn duplicate_username_leaves_store_unchanged() {
    let pool = test_pool().await;
    seed(&pool).await;

    let before = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();

    let created = users::register(&pool, "rina", "hash2", ROLE_PELANGGAN, "Lain", "", "")
        .await
        .unwrap();
    assert!(!created);

    let after = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(before, after);
}

#[actix_web::test]
async fn customer_registration_creates_profile_row() {
    let pool = test_pool().await;
    let fx = seed(&pool).await;

    let profil = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM profil_pelanggan WHERE id_user = ?",
    )
    .bind(fx.id_user)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(profil, 1);
}

#[actix_web::test]
async fn password_reset_for_unknown_user_reports_no_match() {
    let pool = test_pool().await;
    seed(&pool).await;

    let applied = users::reset_password(&pool, "tidak_ada", "hash")
        .await
        .unwrap();
    assert!(!applied);
}

#[actix_web::test]
async fn admin_stats_count_members_revenue_and_pending() {
    let pool = test_pool().await;
    let fx = seed(&pool).await;

    book(&pool, &fx).await;
    let done = book(&pool, &fx).await;
    bookings::transition_status(&pool, done, STATUS_SELESAI, None, Some(Payment::default()))
        .await
        .unwrap();

    let stats = bookings::admin_stats(&pool).await.unwrap();
    assert_eq!(stats.member, 1);
    assert_eq!(stats.pending, 1);
    assert_eq!(stats.pendapatan, 150_000);

    let breakdown = bookings::status_breakdown(&pool).await.unwrap();
    assert_eq!(breakdown.len(), 4);
    let count_of = |status: &str| {
        breakdown
            .iter()
            .find(|c| c.status == status)
            .map(|c| c.jumlah)
            .unwrap()
    };
    assert_eq!(count_of(STATUS_MENUNGGU), 1);
    assert_eq!(count_of(STATUS_SELESAI), 1);
    assert_eq!(count_of(STATUS_DITERIMA), 0);
    assert_eq!(count_of(STATUS_DITOLAK), 0);
}
