use actix_session::Session;
use actix_web::{web, HttpResponse, Result};
use askama::Template;
use chrono::NaiveDate;

use crate::{
    auth::{redirect, require_role, take_flash, Flash},
    filters,
    models::{BookingListRow, QueueRow, StaffStats, TrendPoint, ROLE_STAFF},
    repo::{bookings, staff_members},
    state::AppState,
    templates::render,
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
    total_bayar: i64,
    metode_bayar: String,
    is_menunggu: bool,
}

#[derive(Template)]
#[template(path = "staff_dashboard.html")]
struct StaffDashboardTemplate {
    flash: Option<Flash>,
    staff_name: String,
    stats: StaffStats,
    trend: Vec<TrendPoint>,
    antrian: Vec<QueueRow>,
}

#[derive(Template)]
#[template(path = "staff_antrian.html")]
struct StaffAntrianTemplate {
    flash: Option<Flash>,
    bookings: Vec<BookingView>,
}

#[derive(Template)]
#[template(path = "staff_riwayat.html")]
struct StaffRiwayatTemplate {
    riwayat: Vec<BookingView>,
}

#[derive(Template)]
#[template(path = "staff_pendapatan.html")]
struct StaffPendapatanTemplate {
    riwayat: Vec<EarningView>,
    total: i64,
}

#[derive(Clone, Debug)]
struct EarningView {
    tgl_booking: String,
    jam_booking: String,
    pelanggan: String,
    nama_layanan: String,
    total_bayar: i64,
    metode_bayar: String,
    uang_bayar: i64,
    kembalian: i64,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/staff")
            .service(web::resource("").route(web::get().to(index)))
            .service(web::resource("/dashboard").route(web::get().to(dashboard)))
            .service(web::resource("/antrian").route(web::get().to(antrian)))
            .service(web::resource("/riwayat").route(web::get().to(riwayat)))
            .service(web::resource("/pendapatan").route(web::get().to(pendapatan))),
    );
}

async fn index() -> HttpResponse {
    redirect("/staff/dashboard")
}

async fn dashboard(state: web::Data<AppState>, session: Session) -> Result<HttpResponse> {
    let user = match require_role(&session, ROLE_STAFF) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let data = bookings::staff_dashboard(&state.db, user.id_user)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    let trend = data
        .trend
        .into_iter()
        .map(|point| TrendPoint {
            label: match NaiveDate::parse_from_str(&point.label, "%Y-%m-%d") {
                Ok(date) => date.format("%d %b").to_string(),
                Err(_) => "-".to_string(),
            },
            value: point.value,
        })
        .collect();

    Ok(render(StaffDashboardTemplate {
        flash: take_flash(&session),
        staff_name: user.username,
        stats: data.stats,
        trend,
        antrian: data.antrian,
    }))
}

/// The staff member's own active queue, with cashier actions per row.
async fn antrian(state: web::Data<AppState>, session: Session) -> Result<HttpResponse> {
    let user = match require_role(&session, ROLE_STAFF) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let rows = match staff_members::find_by_user(&state.db, user.id_user).await {
        Ok(Some(staff)) => bookings::active_by_pelayan(&state.db, staff.id_pelayan)
            .await
            .unwrap_or_default(),
        _ => Vec::new(),
    };

    Ok(render(StaffAntrianTemplate {
        flash: take_flash(&session),
        bookings: rows.into_iter().map(to_view).collect(),
    }))
}

async fn riwayat(state: web::Data<AppState>, session: Session) -> Result<HttpResponse> {
    let user = match require_role(&session, ROLE_STAFF) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let rows = match staff_members::find_by_user(&state.db, user.id_user).await {
        Ok(Some(staff)) => bookings::history_by_pelayan(&state.db, staff.id_pelayan)
            .await
            .unwrap_or_default(),
        _ => Vec::new(),
    };

    Ok(render(StaffRiwayatTemplate {
        riwayat: rows.into_iter().map(to_view).collect(),
    }))
}

async fn pendapatan(state: web::Data<AppState>, session: Session) -> Result<HttpResponse> {
    let user = match require_role(&session, ROLE_STAFF) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let rows = bookings::staff_earnings(&state.db, user.id_user)
        .await
        .unwrap_or_default();
    let total = rows.iter().map(|row| row.total_bayar).sum();
    let riwayat = rows
        .into_iter()
        .map(|row| EarningView {
            tgl_booking: row.tgl_booking,
            jam_booking: row.jam_booking,
            pelanggan: row.pelanggan,
            nama_layanan: row.nama_layanan,
            total_bayar: row.total_bayar,
            metode_bayar: row.metode_bayar.unwrap_or_else(|| "-".to_string()),
            uang_bayar: row.uang_bayar,
            kembalian: row.kembalian,
        })
        .collect();

    Ok(render(StaffPendapatanTemplate { riwayat, total }))
}

fn to_view(row: BookingListRow) -> BookingView {
    BookingView {
        id_booking: row.id_booking,
        tgl_booking: row.tgl_booking,
        jam_booking: row.jam_booking,
        is_menunggu: row.status == crate::models::STATUS_MENUNGGU,
        status: row.status,
        pelanggan: row.pelanggan,
        no_hp: row.no_hp,
        nama_layanan: row.nama_layanan,
        harga: row.harga,
        total_bayar: row.total_bayar,
        metode_bayar: row.metode_bayar.unwrap_or_else(|| "-".to_string()),
    }
}
