//! Booking lifecycle and payment finalization. This module is the only place
//! that encodes the status/payment invariants:
//!
//! - payment fields are real values only while status is Selesai,
//! - completion snapshots the service's price at that moment,
//! - rejection zeroes every payment field,
//! - a transition either applies fully or not at all.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::{
    AdminStats, BookingListRow, BookingRow, CustomerBookingRow, EarningRow, QueueRow,
    RevenuePerStaffRow, StaffPerformanceRow, StaffStats, StatusCount, TrendPoint, ALL_STATUSES,
    STATUS_DITERIMA, STATUS_DITOLAK, STATUS_MENUNGGU, STATUS_SELESAI,
};

/// Cashier input captured when a booking is completed.
#[derive(Debug, Clone)]
pub struct Payment {
    pub metode: String,
    pub uang_bayar: i64,
    pub kembalian: i64,
}

impl Default for Payment {
    fn default() -> Self {
        Self {
            metode: "Tunai".to_string(),
            uang_bayar: 0,
            kembalian: 0,
        }
    }
}

/// Inserts a new booking in state Menunggu with no payment fields set.
/// References are not validated here; a dangling id is accepted the same way
/// the store accepts it.
pub async fn create(
    pool: &SqlitePool,
    id_user: i64,
    id_layanan: i64,
    id_pelayan: i64,
    tgl: &str,
    jam: &str,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"INSERT INTO booking (id_user, id_layanan, id_pelayan, tgl_booking, jam_booking, status, tgl_input)
           VALUES (?, ?, ?, ?, ?, 'Menunggu', ?)"#,
    )
    .bind(id_user)
    .bind(id_layanan)
    .bind(id_pelayan)
    .bind(tgl)
    .bind(jam)
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

/// Moves a booking to `status` and settles the payment columns accordingly,
/// atomically.
///
/// `expected` is an optimistic precondition: when `Some`, the update only
/// applies while the row still carries that status (compare-and-swap on the
/// status column). `None` keeps the last-write-wins behavior.
///
/// Returns `Ok(false)` when no row matched, either because the booking does
/// not exist or because the precondition failed; the store is unchanged in
/// that case. Any store error leaves the row exactly as it was.
pub async fn transition_status(
    pool: &SqlitePool,
    id_booking: i64,
    status: &str,
    expected: Option<&str>,
    payment: Option<Payment>,
) -> Result<bool, sqlx::Error> {
    let guard = if expected.is_some() {
        " AND status = ?"
    } else {
        ""
    };

    let mut tx = pool.begin().await?;

    let result = match status {
        STATUS_SELESAI => {
            // Server-side price authority: the amount owed is the service's
            // current price, never a caller-supplied number.
            let harga = sqlx::query_scalar::<_, i64>(
                r#"SELECT l.harga FROM layanan l JOIN booking b ON l.id_layanan = b.id_layanan
                   WHERE b.id_booking = ?"#,
            )
            .bind(id_booking)
            .fetch_optional(&mut *tx)
            .await?
            .unwrap_or(0);

            let payment = payment.unwrap_or_default();
            let sql = format!(
                "UPDATE booking SET status = ?, total_bayar = ?, metode_bayar = ?, uang_bayar = ?, kembalian = ? WHERE id_booking = ?{guard}"
            );
            let mut query = sqlx::query(&sql)
                .bind(status)
                .bind(harga)
                .bind(&payment.metode)
                .bind(payment.uang_bayar)
                .bind(payment.kembalian)
                .bind(id_booking);
            if let Some(expected) = expected {
                query = query.bind(expected);
            }
            query.execute(&mut *tx).await?
        }
        STATUS_DITOLAK => {
            // A rejected booking carries no payment trace, whatever came before.
            let sql = format!(
                "UPDATE booking SET status = ?, total_bayar = 0, metode_bayar = NULL, uang_bayar = 0, kembalian = 0 WHERE id_booking = ?{guard}"
            );
            let mut query = sqlx::query(&sql).bind(status).bind(id_booking);
            if let Some(expected) = expected {
                query = query.bind(expected);
            }
            query.execute(&mut *tx).await?
        }
        _ => {
            // Menunggu / Diterima: only the method is cleared. The remaining
            // payment columns keep their prior values.
            let sql = format!(
                "UPDATE booking SET status = ?, metode_bayar = NULL WHERE id_booking = ?{guard}"
            );
            let mut query = sqlx::query(&sql).bind(status).bind(id_booking);
            if let Some(expected) = expected {
                query = query.bind(expected);
            }
            query.execute(&mut *tx).await?
        }
    };

    tx.commit().await?;
    Ok(result.rows_affected() > 0)
}

pub async fn find(
    pool: &SqlitePool,
    id_booking: i64,
) -> Result<Option<BookingRow>, sqlx::Error> {
    sqlx::query_as::<_, BookingRow>(
        r#"SELECT id_booking, id_user, id_layanan, id_pelayan, tgl_booking, jam_booking,
                  status, tgl_input, total_bayar, metode_bayar, uang_bayar, kembalian
           FROM booking WHERE id_booking = ? LIMIT 1"#,
    )
    .bind(id_booking)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &SqlitePool, id_booking: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM booking WHERE id_booking = ?")
        .bind(id_booking)
        .execute(pool)
        .await?;
    Ok(())
}

const LIST_SELECT: &str = r#"
    SELECT b.id_booking, b.id_user, b.id_pelayan, b.tgl_booking, b.jam_booking,
           b.status, b.tgl_input, b.total_bayar, b.metode_bayar, b.uang_bayar, b.kembalian,
           p.nama_lengkap AS pelanggan, p.no_hp, l.nama_layanan, l.harga, pl.nama_pelayan
    FROM booking b
    JOIN profil_pelanggan p ON b.id_user = p.id_user
    JOIN layanan l ON b.id_layanan = l.id_layanan
    JOIN pelayan pl ON b.id_pelayan = pl.id_pelayan"#;

/// Every booking, newest input first.
pub async fn all(pool: &SqlitePool) -> Result<Vec<BookingListRow>, sqlx::Error> {
    sqlx::query_as::<_, BookingListRow>(&format!("{LIST_SELECT} ORDER BY b.tgl_input DESC"))
        .fetch_all(pool)
        .await
}

/// Active queue: status Menunggu or Diterima, newest input first.
pub async fn active(pool: &SqlitePool) -> Result<Vec<BookingListRow>, sqlx::Error> {
    sqlx::query_as::<_, BookingListRow>(&format!(
        "{LIST_SELECT} WHERE b.status IN (?, ?) ORDER BY b.tgl_input DESC"
    ))
    .bind(STATUS_MENUNGGU)
    .bind(STATUS_DITERIMA)
    .fetch_all(pool)
    .await
}

/// One staff member's active queue.
pub async fn active_by_pelayan(
    pool: &SqlitePool,
    id_pelayan: i64,
) -> Result<Vec<BookingListRow>, sqlx::Error> {
    sqlx::query_as::<_, BookingListRow>(&format!(
        "{LIST_SELECT} WHERE b.id_pelayan = ? AND b.status IN (?, ?) ORDER BY b.tgl_input DESC"
    ))
    .bind(id_pelayan)
    .bind(STATUS_MENUNGGU)
    .bind(STATUS_DITERIMA)
    .fetch_all(pool)
    .await
}

/// Combined history of completed and rejected bookings.
pub async fn history(pool: &SqlitePool) -> Result<Vec<BookingListRow>, sqlx::Error> {
    sqlx::query_as::<_, BookingListRow>(&format!(
        "{LIST_SELECT} WHERE b.status IN (?, ?) ORDER BY b.tgl_booking DESC, b.jam_booking DESC"
    ))
    .bind(STATUS_SELESAI)
    .bind(STATUS_DITOLAK)
    .fetch_all(pool)
    .await
}

pub async fn history_by_pelayan(
    pool: &SqlitePool,
    id_pelayan: i64,
) -> Result<Vec<BookingListRow>, sqlx::Error> {
    sqlx::query_as::<_, BookingListRow>(&format!(
        "{LIST_SELECT} WHERE b.id_pelayan = ? AND b.status IN (?, ?) ORDER BY b.tgl_booking DESC, b.jam_booking DESC"
    ))
    .bind(id_pelayan)
    .bind(STATUS_SELESAI)
    .bind(STATUS_DITOLAK)
    .fetch_all(pool)
    .await
}

/// Completed-bookings report rows, most recent service first.
pub async fn completed_report(pool: &SqlitePool) -> Result<Vec<BookingListRow>, sqlx::Error> {
    sqlx::query_as::<_, BookingListRow>(&format!(
        "{LIST_SELECT} WHERE b.status = ? ORDER BY b.tgl_booking DESC, b.jam_booking DESC"
    ))
    .bind(STATUS_SELESAI)
    .fetch_all(pool)
    .await
}

/// A customer's own bookings, newest input first.
pub async fn by_customer(
    pool: &SqlitePool,
    id_user: i64,
) -> Result<Vec<CustomerBookingRow>, sqlx::Error> {
    sqlx::query_as::<_, CustomerBookingRow>(
        r#"SELECT b.id_booking, b.tgl_booking, b.jam_booking, b.status, b.total_bayar,
                  b.metode_bayar, l.nama_layanan, l.kategori, l.harga,
                  pl.nama_pelayan, pl.spesialisasi, pl.foto_pelayan
           FROM booking b
           JOIN layanan l ON b.id_layanan = l.id_layanan
           JOIN pelayan pl ON b.id_pelayan = pl.id_pelayan
           WHERE b.id_user = ?
           ORDER BY b.tgl_input DESC"#,
    )
    .bind(id_user)
    .fetch_all(pool)
    .await
}

pub async fn admin_stats(pool: &SqlitePool) -> Result<AdminStats, sqlx::Error> {
    sqlx::query_as::<_, AdminStats>(
        r#"SELECT
               COALESCE((SELECT SUM(total_bayar) FROM booking WHERE status = 'Selesai'), 0) AS pendapatan,
               (SELECT COUNT(*) FROM profil_pelanggan) AS member,
               (SELECT COUNT(*) FROM booking WHERE status = 'Menunggu') AS pending"#,
    )
    .fetch_one(pool)
    .await
}

/// Bookings handled per staff member, for the dashboard bar chart.
pub async fn staff_performance(
    pool: &SqlitePool,
) -> Result<Vec<StaffPerformanceRow>, sqlx::Error> {
    sqlx::query_as::<_, StaffPerformanceRow>(
        r#"SELECT pl.nama_pelayan, COUNT(b.id_booking) AS total
           FROM pelayan pl
           LEFT JOIN booking b ON pl.id_pelayan = b.id_pelayan
           GROUP BY pl.id_pelayan"#,
    )
    .fetch_all(pool)
    .await
}

/// Booking counts per status, zero-filled so all four lifecycle values are
/// always present for the pie chart.
pub async fn status_breakdown(pool: &SqlitePool) -> Result<Vec<StatusCount>, sqlx::Error> {
    let counted = sqlx::query_as::<_, (String, i64)>(
        "SELECT status, COUNT(*) FROM booking GROUP BY status",
    )
    .fetch_all(pool)
    .await?;

    Ok(ALL_STATUSES
        .iter()
        .map(|status| StatusCount {
            status: status.to_string(),
            jumlah: counted
                .iter()
                .find(|(s, _)| s == status)
                .map(|(_, n)| *n)
                .unwrap_or(0),
        })
        .collect())
}

pub struct StaffDashboard {
    pub stats: StaffStats,
    pub trend: Vec<TrendPoint>,
    pub antrian: Vec<QueueRow>,
}

/// Everything the staff dashboard shows, keyed by the staff member's login.
pub async fn staff_dashboard(
    pool: &SqlitePool,
    id_user: i64,
) -> Result<StaffDashboard, sqlx::Error> {
    let stats = sqlx::query_as::<_, StaffStats>(
        r#"SELECT
               (SELECT COUNT(*) FROM booking b JOIN pelayan p ON b.id_pelayan = p.id_pelayan
                WHERE p.id_user = ?1 AND b.status = 'Menunggu') AS total_menunggu,
               (SELECT COUNT(*) FROM booking b JOIN pelayan p ON b.id_pelayan = p.id_pelayan
                WHERE p.id_user = ?1 AND b.status = 'Diterima') AS total_aktif,
               (SELECT COUNT(*) FROM booking b JOIN pelayan p ON b.id_pelayan = p.id_pelayan
                WHERE p.id_user = ?1 AND b.status = 'Selesai') AS total_selesai,
               (SELECT COUNT(*) FROM booking b JOIN pelayan p ON b.id_pelayan = p.id_pelayan
                WHERE p.id_user = ?1 AND b.status = 'Ditolak') AS total_ditolak,
               COALESCE((SELECT SUM(b.total_bayar) FROM booking b JOIN pelayan p ON b.id_pelayan = p.id_pelayan
                WHERE p.id_user = ?1 AND b.status = 'Selesai'), 0) AS total_pendapatan"#,
    )
    .bind(id_user)
    .fetch_one(pool)
    .await?;

    let trend = sqlx::query_as::<_, TrendPoint>(
        r#"SELECT b.tgl_booking AS label, COALESCE(SUM(b.total_bayar), 0) AS value
           FROM booking b JOIN pelayan p ON b.id_pelayan = p.id_pelayan
           WHERE p.id_user = ? AND b.status = 'Selesai'
           GROUP BY b.tgl_booking ORDER BY b.tgl_booking ASC LIMIT 7"#,
    )
    .bind(id_user)
    .fetch_all(pool)
    .await?;

    let antrian = sqlx::query_as::<_, QueueRow>(
        r#"SELECT b.tgl_booking, b.jam_booking, pr.nama_lengkap AS pelanggan,
                  pr.no_hp, l.nama_layanan, b.status
           FROM booking b
           JOIN pelayan p ON b.id_pelayan = p.id_pelayan
           JOIN profil_pelanggan pr ON b.id_user = pr.id_user
           JOIN layanan l ON b.id_layanan = l.id_layanan
           WHERE p.id_user = ? AND b.status IN ('Menunggu', 'Diterima')
           ORDER BY b.tgl_booking ASC, b.jam_booking ASC LIMIT 5"#,
    )
    .bind(id_user)
    .fetch_all(pool)
    .await?;

    Ok(StaffDashboard {
        stats,
        trend,
        antrian,
    })
}

/// Revenue report per staff member, best earner first.
pub async fn revenue_per_staff(
    pool: &SqlitePool,
) -> Result<Vec<RevenuePerStaffRow>, sqlx::Error> {
    sqlx::query_as::<_, RevenuePerStaffRow>(
        r#"SELECT p.nama_pelayan, p.spesialisasi, p.foto_pelayan,
                  COUNT(b.id_booking) AS jumlah_layanan,
                  COALESCE(SUM(b.total_bayar), 0) AS omzet_dihasilkan
           FROM pelayan p
           LEFT JOIN booking b ON p.id_pelayan = b.id_pelayan AND b.status = 'Selesai'
           GROUP BY p.id_pelayan
           ORDER BY omzet_dihasilkan DESC"#,
    )
    .fetch_all(pool)
    .await
}

/// A staff member's completed payments, keyed by their login.
pub async fn staff_earnings(
    pool: &SqlitePool,
    id_user: i64,
) -> Result<Vec<EarningRow>, sqlx::Error> {
    sqlx::query_as::<_, EarningRow>(
        r#"SELECT b.tgl_booking, b.jam_booking, pr.nama_lengkap AS pelanggan, l.nama_layanan,
                  b.total_bayar, b.metode_bayar, b.uang_bayar, b.kembalian
           FROM booking b
           JOIN pelayan p ON b.id_pelayan = p.id_pelayan
           JOIN profil_pelanggan pr ON b.id_user = pr.id_user
           JOIN layanan l ON b.id_layanan = l.id_layanan
           WHERE p.id_user = ? AND b.status = 'Selesai'
           ORDER BY b.tgl_booking DESC"#,
    )
    .bind(id_user)
    .fetch_all(pool)
    .await
}
