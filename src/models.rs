pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_STAFF: &str = "staff";
pub const ROLE_PELANGGAN: &str = "pelanggan";

pub const STATUS_MENUNGGU: &str = "Menunggu";
pub const STATUS_DITERIMA: &str = "Diterima";
pub const STATUS_SELESAI: &str = "Selesai";
pub const STATUS_DITOLAK: &str = "Ditolak";

pub const ALL_STATUSES: [&str; 4] = [
    STATUS_MENUNGGU,
    STATUS_DITERIMA,
    STATUS_SELESAI,
    STATUS_DITOLAK,
];

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id_user: i64,
    pub username: String,
    pub password_hash: String,
    pub role: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfilRow {
    pub id_user: i64,
    pub nama_lengkap: String,
    pub no_hp: String,
    pub alamat: String,
}

/// Customer listing joined with the account row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CustomerRow {
    pub id_user: i64,
    pub username: String,
    pub nama_lengkap: String,
    pub no_hp: String,
    pub alamat: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PelayanRow {
    pub id_pelayan: i64,
    pub id_user: Option<i64>,
    pub nama_pelayan: String,
    pub spesialisasi: String,
    pub status_aktif: String,
    pub foto_pelayan: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LayananRow {
    pub id_layanan: i64,
    pub nama_layanan: String,
    pub kategori: String,
    pub harga: i64,
    pub deskripsi: String,
    pub foto_katalog: Option<String>,
}

/// Plain booking columns, no joins. The payment fields carry real values only
/// when status is Selesai.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BookingRow {
    pub id_booking: i64,
    pub id_user: i64,
    pub id_layanan: i64,
    pub id_pelayan: i64,
    pub tgl_booking: String,
    pub jam_booking: String,
    pub status: String,
    pub tgl_input: String,
    pub total_bayar: i64,
    pub metode_bayar: Option<String>,
    pub uang_bayar: i64,
    pub kembalian: i64,
}

/// Booking joined with customer, service, and staff display fields, used by
/// the admin and staff queue/report screens.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BookingListRow {
    pub id_booking: i64,
    pub id_user: i64,
    pub id_pelayan: i64,
    pub tgl_booking: String,
    pub jam_booking: String,
    pub status: String,
    pub tgl_input: String,
    pub total_bayar: i64,
    pub metode_bayar: Option<String>,
    pub uang_bayar: i64,
    pub kembalian: i64,
    pub pelanggan: String,
    pub no_hp: String,
    pub nama_layanan: String,
    pub harga: i64,
    pub nama_pelayan: String,
}

/// Customer-facing booking history joined with service and staff detail.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CustomerBookingRow {
    pub id_booking: i64,
    pub tgl_booking: String,
    pub jam_booking: String,
    pub status: String,
    pub total_bayar: i64,
    pub metode_bayar: Option<String>,
    pub nama_layanan: String,
    pub kategori: String,
    pub harga: i64,
    pub nama_pelayan: String,
    pub spesialisasi: String,
    pub foto_pelayan: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AdminStats {
    pub pendapatan: i64,
    pub member: i64,
    pub pending: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StaffPerformanceRow {
    pub nama_pelayan: String,
    pub total: i64,
}

#[derive(Debug, Clone)]
pub struct StatusCount {
    pub status: String,
    pub jumlah: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StaffStats {
    pub total_menunggu: i64,
    pub total_aktif: i64,
    pub total_selesai: i64,
    pub total_ditolak: i64,
    pub total_pendapatan: i64,
}

/// One point of the staff revenue trend: a booking date and the revenue
/// completed on it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TrendPoint {
    pub label: String,
    pub value: i64,
}

/// Upcoming queue entry on the staff dashboard.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct QueueRow {
    pub tgl_booking: String,
    pub jam_booking: String,
    pub pelanggan: String,
    pub no_hp: String,
    pub nama_layanan: String,
    pub status: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RevenuePerStaffRow {
    pub nama_pelayan: String,
    pub spesialisasi: String,
    pub foto_pelayan: Option<String>,
    pub jumlah_layanan: i64,
    pub omzet_dihasilkan: i64,
}

/// Completed payment line on the staff earnings screen.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EarningRow {
    pub tgl_booking: String,
    pub jam_booking: String,
    pub pelanggan: String,
    pub nama_layanan: String,
    pub total_bayar: i64,
    pub metode_bayar: Option<String>,
    pub uang_bayar: i64,
    pub kembalian: i64,
}
