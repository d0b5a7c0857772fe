use actix_session::Session;
use actix_web::{web, HttpResponse, Result};
use askama::Template;
use chrono::Local;

use crate::{
    auth::{redirect, require_role, take_flash, Flash},
    filters,
    models::{
        CustomerBookingRow, LayananRow, PelayanRow, ROLE_PELANGGAN, STATUS_DITERIMA,
        STATUS_DITOLAK, STATUS_MENUNGGU, STATUS_SELESAI,
    },
    repo::{bookings, services, staff_members},
    state::AppState,
    templates::render,
};

#[derive(Template)]
#[template(path = "user_dashboard.html")]
struct UserDashboardTemplate {
    flash: Option<Flash>,
    username: String,
    menunggu: usize,
    diterima: usize,
    selesai: usize,
    ditolak: usize,
}

#[derive(Template)]
#[template(path = "user_katalog.html")]
struct UserKatalogTemplate {
    flash: Option<Flash>,
    layanan: Vec<LayananRow>,
    pelayan: Vec<PelayanRow>,
    current_date: String,
}

#[derive(Template)]
#[template(path = "user_riwayat.html")]
struct UserRiwayatTemplate {
    flash: Option<Flash>,
    riwayat: Vec<RiwayatView>,
}

#[derive(Clone, Debug)]
struct RiwayatView {
    tgl_booking: String,
    jam_booking: String,
    status: String,
    nama_layanan: String,
    kategori: String,
    harga: i64,
    nama_pelayan: String,
    spesialisasi: String,
    total_bayar: i64,
    metode_bayar: String,
    is_selesai: bool,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/user")
            .service(web::resource("").route(web::get().to(index)))
            .service(web::resource("/dashboard").route(web::get().to(dashboard)))
            .service(web::resource("/katalog").route(web::get().to(katalog)))
            .service(web::resource("/riwayat").route(web::get().to(riwayat))),
    );
}

async fn index() -> HttpResponse {
    redirect("/user/dashboard")
}

async fn dashboard(state: web::Data<AppState>, session: Session) -> Result<HttpResponse> {
    let user = match require_role(&session, ROLE_PELANGGAN) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let riwayat = bookings::by_customer(&state.db, user.id_user)
        .await
        .unwrap_or_default();
    let count = |status: &str| riwayat.iter().filter(|r| r.status == status).count();

    Ok(render(UserDashboardTemplate {
        flash: take_flash(&session),
        username: user.username,
        menunggu: count(STATUS_MENUNGGU),
        diterima: count(STATUS_DITERIMA),
        selesai: count(STATUS_SELESAI),
        ditolak: count(STATUS_DITOLAK),
    }))
}

/// Service catalog with the booking form.
async fn katalog(state: web::Data<AppState>, session: Session) -> Result<HttpResponse> {
    if let Err(resp) = require_role(&session, ROLE_PELANGGAN) {
        return Ok(resp);
    }

    let layanan = services::list(&state.db).await.unwrap_or_default();
    let pelayan = staff_members::list(&state.db).await.unwrap_or_default();

    Ok(render(UserKatalogTemplate {
        flash: take_flash(&session),
        layanan,
        pelayan,
        current_date: Local::now().format("%Y-%m-%d").to_string(),
    }))
}

async fn riwayat(state: web::Data<AppState>, session: Session) -> Result<HttpResponse> {
    let user = match require_role(&session, ROLE_PELANGGAN) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let rows = bookings::by_customer(&state.db, user.id_user)
        .await
        .unwrap_or_default();

    Ok(render(UserRiwayatTemplate {
        flash: take_flash(&session),
        riwayat: rows.into_iter().map(to_view).collect(),
    }))
}

fn to_view(row: CustomerBookingRow) -> RiwayatView {
    RiwayatView {
        tgl_booking: row.tgl_booking,
        jam_booking: row.jam_booking,
        is_selesai: row.status == STATUS_SELESAI,
        status: row.status,
        nama_layanan: row.nama_layanan,
        kategori: row.kategori,
        harga: row.harga,
        nama_pelayan: row.nama_pelayan,
        spesialisasi: row.spesialisasi,
        total_bayar: row.total_bayar,
        metode_bayar: row.metode_bayar.unwrap_or_else(|| "-".to_string()),
    }
}
