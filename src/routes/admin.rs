use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use actix_session::Session;
use actix_web::{web, HttpResponse, Result};
use askama::Template;
use chrono::Local;
use serde::Deserialize;

use crate::{
    auth::{self, redirect, require_role, take_flash, Flash},
    filters,
    models::{
        AdminStats, BookingListRow, CustomerRow, LayananRow, PelayanRow, StaffPerformanceRow,
        StatusCount, ROLE_ADMIN, STATUS_DITERIMA, STATUS_MENUNGGU,
    },
    repo::{bookings, customers, services, staff_members, users},
    state::AppState,
    templates::render,
    uploads,
};

#[derive(Clone, Debug)]
struct BookingView {
    id_booking: i64,
    tgl_booking: String,
    jam_booking: String,
    status: String,
    pelanggan: String,
    no_hp: String,
    nama_layanan: String,
    harga: i64,
    nama_pelayan: String,
    total_bayar: i64,
    metode_bayar: String,
    uang_bayar: i64,
    kembalian: i64,
}

#[derive(Clone, Debug)]
struct ServiceView {
    id_layanan: i64,
    nama_layanan: String,
    kategori: String,
    harga: i64,
    deskripsi: String,
    foto: String,
    has_foto: bool,
}

#[derive(Clone, Debug)]
struct StaffView {
    id_pelayan: i64,
    nama_pelayan: String,
    spesialisasi: String,
    status_aktif: String,
    aktif: bool,
    foto: String,
    has_foto: bool,
}

#[derive(Template)]
#[template(path = "admin_dashboard.html")]
struct AdminDashboardTemplate {
    flash: Option<Flash>,
    admin_name: String,
    stats: AdminStats,
    batang: Vec<StaffPerformanceRow>,
    pie: Vec<StatusCount>,
    aktivitas: Vec<BookingView>,
}

#[derive(Template)]
#[template(path = "admin_pelanggan.html")]
struct AdminPelangganTemplate {
    flash: Option<Flash>,
    pelanggan: Vec<CustomerRow>,
}

#[derive(Template)]
#[template(path = "admin_layanan.html")]
struct AdminLayananTemplate {
    flash: Option<Flash>,
    layanan: Vec<ServiceView>,
}

#[derive(Template)]
#[template(path = "admin_pelayan.html")]
struct AdminPelayanTemplate {
    flash: Option<Flash>,
    pelayan: Vec<StaffView>,
}

#[derive(Template)]
#[template(path = "admin_booking.html")]
struct AdminBookingTemplate {
    flash: Option<Flash>,
    bookings: Vec<BookingView>,
    layanan: Vec<ServiceView>,
    pelayan: Vec<StaffView>,
    daftar_pelanggan: Vec<CustomerRow>,
}

#[derive(Template)]
#[template(path = "admin_laporan.html")]
struct AdminLaporanTemplate {
    laporan: Vec<BookingView>,
    total_omzet: i64,
    current_date: String,
}

#[derive(Template)]
#[template(path = "admin_laporan_staff.html")]
struct AdminLaporanStaffTemplate {
    laporan: Vec<StaffRevenueView>,
}

#[derive(Clone, Debug)]
struct StaffRevenueView {
    nama_pelayan: String,
    spesialisasi: String,
    foto: String,
    has_foto: bool,
    jumlah_layanan: i64,
    omzet_dihasilkan: i64,
}

#[derive(Template)]
#[template(path = "admin_riwayat.html")]
struct AdminRiwayatTemplate {
    flash: Option<Flash>,
    riwayat: Vec<BookingView>,
}

#[derive(Deserialize)]
struct PelangganUpdateForm {
    id_user: i64,
    nama: String,
    hp: String,
    alamat: String,
}

#[derive(MultipartForm)]
struct LayananAddForm {
    nama: Text<String>,
    kategori: Text<String>,
    harga: Text<i64>,
    deskripsi: Text<String>,
    foto: Option<TempFile>,
}

#[derive(MultipartForm)]
struct LayananUpdateForm {
    id_layanan: Text<i64>,
    nama: Text<String>,
    kategori: Text<String>,
    harga: Text<i64>,
    deskripsi: Text<String>,
    foto: Option<TempFile>,
}

#[derive(MultipartForm)]
struct PelayanAddForm {
    nama: Text<String>,
    spesialisasi: Text<String>,
    status: Text<String>,
    foto: Option<TempFile>,
}

#[derive(MultipartForm)]
struct PelayanUpdateForm {
    id_pelayan: Text<i64>,
    nama: Text<String>,
    spesialisasi: Text<String>,
    foto: Option<TempFile>,
}

#[derive(Deserialize)]
struct PelayanStatusForm {
    status_aktif: String,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .service(web::resource("").route(web::get().to(index)))
            .service(web::resource("/dashboard").route(web::get().to(dashboard)))
            .service(web::resource("/pelanggan").route(web::get().to(list_pelanggan)))
            .service(web::resource("/pelanggan/update").route(web::post().to(update_pelanggan)))
            .service(
                web::resource("/pelanggan/delete/{id_user}").route(web::get().to(delete_pelanggan)),
            )
            .service(web::resource("/layanan").route(web::get().to(list_layanan)))
            .service(web::resource("/layanan/add").route(web::post().to(add_layanan)))
            .service(web::resource("/layanan/update").route(web::post().to(update_layanan)))
            .service(
                web::resource("/layanan/delete/{id_layanan}").route(web::get().to(delete_layanan)),
            )
            .service(web::resource("/pelayan").route(web::get().to(list_pelayan)))
            .service(web::resource("/pelayan/add").route(web::post().to(add_pelayan)))
            .service(web::resource("/pelayan/update").route(web::post().to(update_pelayan)))
            .service(
                web::resource("/pelayan/update_status/{id_pelayan}")
                    .route(web::post().to(update_pelayan_status)),
            )
            .service(
                web::resource("/pelayan/delete/{id_pelayan}").route(web::get().to(delete_pelayan)),
            )
            .service(web::resource("/booking").route(web::get().to(booking_screen)))
            .service(
                web::resource("/booking/delete/{id_booking}").route(web::get().to(delete_booking)),
            )
            .service(web::resource("/laporan").route(web::get().to(laporan)))
            .service(web::resource("/laporan_staff").route(web::get().to(laporan_staff)))
            .service(web::resource("/riwayat").route(web::get().to(riwayat))),
    );
}

async fn index() -> HttpResponse {
    redirect("/admin/dashboard")
}

async fn dashboard(state: web::Data<AppState>, session: Session) -> Result<HttpResponse> {
    let user = match require_role(&session, ROLE_ADMIN) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let stats = bookings::admin_stats(&state.db).await.unwrap_or(AdminStats {
        pendapatan: 0,
        member: 0,
        pending: 0,
    });
    let batang = bookings::staff_performance(&state.db).await.unwrap_or_default();
    let pie = bookings::status_breakdown(&state.db).await.unwrap_or_default();

    // Most recent entries of the active queue, same source as the booking
    // screen.
    let all = bookings::all(&state.db).await.unwrap_or_default();
    let aktivitas = all
        .into_iter()
        .filter(|b| b.status == STATUS_MENUNGGU || b.status == STATUS_DITERIMA)
        .take(5)
        .map(to_view)
        .collect();

    Ok(render(AdminDashboardTemplate {
        flash: take_flash(&session),
        admin_name: user.username,
        stats,
        batang,
        pie,
        aktivitas,
    }))
}

async fn list_pelanggan(state: web::Data<AppState>, session: Session) -> Result<HttpResponse> {
    if let Err(resp) = require_role(&session, ROLE_ADMIN) {
        return Ok(resp);
    }
    let pelanggan = customers::list(&state.db).await.unwrap_or_default();
    Ok(render(AdminPelangganTemplate {
        flash: take_flash(&session),
        pelanggan,
    }))
}

async fn update_pelanggan(
    state: web::Data<AppState>,
    session: Session,
    form: web::Form<PelangganUpdateForm>,
) -> Result<HttpResponse> {
    if let Err(resp) = require_role(&session, ROLE_ADMIN) {
        return Ok(resp);
    }
    let form = form.into_inner();
    let result =
        customers::update_profile(&state.db, form.id_user, &form.nama, &form.hp, &form.alamat)
            .await;
    match result {
        Ok(()) => auth::flash(&session, "success", "Data pelanggan berhasil diperbarui!"),
        Err(err) => {
            log::error!("Customer update failed: {err}");
            auth::flash(&session, "danger", "Gagal memperbarui data pelanggan.");
        }
    }
    Ok(redirect("/admin/pelanggan"))
}

async fn delete_pelanggan(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    if let Err(resp) = require_role(&session, ROLE_ADMIN) {
        return Ok(resp);
    }
    match users::delete_customer(&state.db, path.into_inner()).await {
        Ok(()) => auth::flash(&session, "info", "Member pelanggan telah dihapus."),
        Err(err) => {
            log::error!("Customer delete failed: {err}");
            auth::flash(&session, "danger", "Gagal menghapus member pelanggan.");
        }
    }
    Ok(redirect("/admin/pelanggan"))
}

async fn list_layanan(state: web::Data<AppState>, session: Session) -> Result<HttpResponse> {
    if let Err(resp) = require_role(&session, ROLE_ADMIN) {
        return Ok(resp);
    }
    let layanan = services::list(&state.db).await.unwrap_or_default();
    Ok(render(AdminLayananTemplate {
        flash: take_flash(&session),
        layanan: layanan.into_iter().map(to_service_view).collect(),
    }))
}

async fn add_layanan(
    state: web::Data<AppState>,
    session: Session,
    form: MultipartForm<LayananAddForm>,
) -> Result<HttpResponse> {
    if let Err(resp) = require_role(&session, ROLE_ADMIN) {
        return Ok(resp);
    }
    let form = form.into_inner();
    let foto = form
        .foto
        .as_ref()
        .and_then(|file| uploads::save_image(file, "srv", &state.uploads_dir));

    let result = services::insert(
        &state.db,
        form.nama.trim(),
        form.kategori.trim(),
        *form.harga,
        &form.deskripsi,
        foto.as_deref(),
    )
    .await;

    match result {
        Ok(_) => auth::flash(&session, "success", "Layanan baru berhasil ditambahkan!"),
        Err(err) => {
            log::error!("Service insert failed: {err}");
            auth::flash(&session, "danger", "Gagal menambahkan layanan.");
        }
    }
    Ok(redirect("/admin/layanan"))
}

async fn update_layanan(
    state: web::Data<AppState>,
    session: Session,
    form: MultipartForm<LayananUpdateForm>,
) -> Result<HttpResponse> {
    if let Err(resp) = require_role(&session, ROLE_ADMIN) {
        return Ok(resp);
    }
    let form = form.into_inner();
    let foto = form
        .foto
        .as_ref()
        .and_then(|file| uploads::save_image(file, "srv_upd", &state.uploads_dir));

    let result = services::update(
        &state.db,
        *form.id_layanan,
        form.nama.trim(),
        form.kategori.trim(),
        *form.harga,
        &form.deskripsi,
        foto.as_deref(),
    )
    .await;

    match result {
        Ok(()) => auth::flash(&session, "success", "Menu layanan berhasil diperbarui!"),
        Err(err) => {
            log::error!("Service update failed: {err}");
            auth::flash(&session, "danger", "Gagal memperbarui layanan.");
        }
    }
    Ok(redirect("/admin/layanan"))
}

async fn delete_layanan(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    if let Err(resp) = require_role(&session, ROLE_ADMIN) {
        return Ok(resp);
    }
    match services::delete(&state.db, path.into_inner()).await {
        Ok(()) => auth::flash(&session, "info", "Layanan telah dihapus dari katalog."),
        Err(err) => {
            log::error!("Service delete failed: {err}");
            auth::flash(&session, "danger", "Gagal menghapus layanan.");
        }
    }
    Ok(redirect("/admin/layanan"))
}

async fn list_pelayan(state: web::Data<AppState>, session: Session) -> Result<HttpResponse> {
    if let Err(resp) = require_role(&session, ROLE_ADMIN) {
        return Ok(resp);
    }
    let pelayan = staff_members::list(&state.db).await.unwrap_or_default();
    Ok(render(AdminPelayanTemplate {
        flash: take_flash(&session),
        pelayan: pelayan.into_iter().map(to_staff_view).collect(),
    }))
}

async fn add_pelayan(
    state: web::Data<AppState>,
    session: Session,
    form: MultipartForm<PelayanAddForm>,
) -> Result<HttpResponse> {
    if let Err(resp) = require_role(&session, ROLE_ADMIN) {
        return Ok(resp);
    }
    let form = form.into_inner();
    let foto = form
        .foto
        .as_ref()
        .and_then(|file| uploads::save_image(file, "stf", &state.uploads_dir));

    let result = staff_members::insert(
        &state.db,
        None,
        form.nama.trim(),
        form.spesialisasi.trim(),
        form.status.trim(),
        foto.as_deref(),
    )
    .await;

    match result {
        Ok(_) => auth::flash(&session, "success", "Staf baru berhasil didaftarkan!"),
        Err(err) => {
            log::error!("Staff insert failed: {err}");
            auth::flash(&session, "danger", "Gagal mendaftarkan staf.");
        }
    }
    Ok(redirect("/admin/pelayan"))
}

async fn update_pelayan(
    state: web::Data<AppState>,
    session: Session,
    form: MultipartForm<PelayanUpdateForm>,
) -> Result<HttpResponse> {
    if let Err(resp) = require_role(&session, ROLE_ADMIN) {
        return Ok(resp);
    }
    let form = form.into_inner();
    let foto = form
        .foto
        .as_ref()
        .and_then(|file| uploads::save_image(file, "stf_upd", &state.uploads_dir));

    let result = staff_members::update(
        &state.db,
        *form.id_pelayan,
        form.nama.trim(),
        form.spesialisasi.trim(),
        foto.as_deref(),
    )
    .await;

    match result {
        Ok(()) => auth::flash(&session, "success", "Data staf berhasil diperbarui!"),
        Err(err) => {
            log::error!("Staff update failed: {err}");
            auth::flash(&session, "danger", "Gagal memperbarui data staf.");
        }
    }
    Ok(redirect("/admin/pelayan"))
}

async fn update_pelayan_status(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<PelayanStatusForm>,
) -> Result<HttpResponse> {
    if let Err(resp) = require_role(&session, ROLE_ADMIN) {
        return Ok(resp);
    }
    match staff_members::set_status(&state.db, path.into_inner(), form.status_aktif.trim()).await {
        Ok(()) => auth::flash(&session, "success", "Status staf diperbarui!"),
        Err(err) => {
            log::error!("Staff status update failed: {err}");
            auth::flash(&session, "danger", "Gagal memperbarui status staf.");
        }
    }
    Ok(redirect("/admin/pelayan"))
}

async fn delete_pelayan(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    if let Err(resp) = require_role(&session, ROLE_ADMIN) {
        return Ok(resp);
    }
    match staff_members::delete(&state.db, path.into_inner()).await {
        Ok(()) => auth::flash(&session, "info", "Data staf telah dihapus."),
        Err(err) => {
            log::error!("Staff delete failed: {err}");
            auth::flash(&session, "danger", "Gagal menghapus data staf.");
        }
    }
    Ok(redirect("/admin/pelayan"))
}

/// Booking and cashier screen: the active queue plus everything the booking
/// form needs.
async fn booking_screen(state: web::Data<AppState>, session: Session) -> Result<HttpResponse> {
    if let Err(resp) = require_role(&session, ROLE_ADMIN) {
        return Ok(resp);
    }
    let bookings = bookings::active(&state.db).await.unwrap_or_default();
    let layanan = services::list(&state.db).await.unwrap_or_default();
    let pelayan = staff_members::list(&state.db).await.unwrap_or_default();
    let daftar_pelanggan = customers::list(&state.db).await.unwrap_or_default();

    Ok(render(AdminBookingTemplate {
        flash: take_flash(&session),
        bookings: bookings.into_iter().map(to_view).collect(),
        layanan: layanan.into_iter().map(to_service_view).collect(),
        pelayan: pelayan.into_iter().map(to_staff_view).collect(),
        daftar_pelanggan,
    }))
}

async fn delete_booking(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    if let Err(resp) = require_role(&session, ROLE_ADMIN) {
        return Ok(resp);
    }
    match bookings::delete(&state.db, path.into_inner()).await {
        Ok(()) => auth::flash(&session, "info", "Data transaksi berhasil dihapus!"),
        Err(err) => {
            log::error!("Booking delete failed: {err}");
            auth::flash(&session, "danger", "Gagal menghapus data transaksi.");
        }
    }
    Ok(redirect("/admin/booking"))
}

/// Completed-bookings report with the total revenue.
async fn laporan(state: web::Data<AppState>, session: Session) -> Result<HttpResponse> {
    if let Err(resp) = require_role(&session, ROLE_ADMIN) {
        return Ok(resp);
    }
    let rows = bookings::completed_report(&state.db).await.unwrap_or_default();
    let total_omzet = rows.iter().map(|row| row.total_bayar).sum();

    Ok(render(AdminLaporanTemplate {
        laporan: rows.into_iter().map(to_view).collect(),
        total_omzet,
        current_date: Local::now().format("%d %B %Y").to_string(),
    }))
}

async fn laporan_staff(state: web::Data<AppState>, session: Session) -> Result<HttpResponse> {
    if let Err(resp) = require_role(&session, ROLE_ADMIN) {
        return Ok(resp);
    }
    let rows = bookings::revenue_per_staff(&state.db).await.unwrap_or_default();
    let laporan = rows
        .into_iter()
        .map(|row| {
            let foto = row.foto_pelayan.unwrap_or_default();
            StaffRevenueView {
                nama_pelayan: row.nama_pelayan,
                spesialisasi: row.spesialisasi,
                has_foto: !foto.is_empty(),
                foto,
                jumlah_layanan: row.jumlah_layanan,
                omzet_dihasilkan: row.omzet_dihasilkan,
            }
        })
        .collect();

    Ok(render(AdminLaporanStaffTemplate { laporan }))
}

/// Combined history of completed and rejected bookings.
async fn riwayat(state: web::Data<AppState>, session: Session) -> Result<HttpResponse> {
    if let Err(resp) = require_role(&session, ROLE_ADMIN) {
        return Ok(resp);
    }
    let rows = bookings::history(&state.db).await.unwrap_or_default();
    Ok(render(AdminRiwayatTemplate {
        flash: take_flash(&session),
        riwayat: rows.into_iter().map(to_view).collect(),
    }))
}

fn to_view(row: BookingListRow) -> BookingView {
    BookingView {
        id_booking: row.id_booking,
        tgl_booking: row.tgl_booking,
        jam_booking: row.jam_booking,
        status: row.status,
        pelanggan: row.pelanggan,
        no_hp: row.no_hp,
        nama_layanan: row.nama_layanan,
        harga: row.harga,
        nama_pelayan: row.nama_pelayan,
        total_bayar: row.total_bayar,
        metode_bayar: row.metode_bayar.unwrap_or_else(|| "-".to_string()),
        uang_bayar: row.uang_bayar,
        kembalian: row.kembalian,
    }
}

fn to_service_view(row: LayananRow) -> ServiceView {
    let foto = row.foto_katalog.unwrap_or_default();
    ServiceView {
        id_layanan: row.id_layanan,
        nama_layanan: row.nama_layanan,
        kategori: row.kategori,
        harga: row.harga,
        deskripsi: row.deskripsi,
        has_foto: !foto.is_empty(),
        foto,
    }
}

fn to_staff_view(row: PelayanRow) -> StaffView {
    let foto = row.foto_pelayan.unwrap_or_default();
    StaffView {
        id_pelayan: row.id_pelayan,
        nama_pelayan: row.nama_pelayan,
        spesialisasi: row.spesialisasi,
        aktif: row.status_aktif == "Aktif",
        status_aktif: row.status_aktif,
        has_foto: !foto.is_empty(),
        foto,
    }
}
