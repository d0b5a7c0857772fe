//! Cashier operations shared by the admin panel and the staff queue:
//! booking creation and status transitions with payment settlement.

use actix_session::Session;
use actix_web::{web, HttpResponse, Result};
use serde::Deserialize;

use crate::{
    auth::{self, redirect, require_login},
    models::{ALL_STATUSES, ROLE_ADMIN, ROLE_STAFF, STATUS_SELESAI},
    repo::bookings::{self, Payment},
    state::AppState,
};

#[derive(Deserialize)]
struct CashierQuery {
    metode: Option<String>,
    bayar: Option<i64>,
    kembali: Option<i64>,
    /// Optimistic precondition: only apply while the booking still carries
    /// this status.
    expected: Option<String>,
}

#[derive(Deserialize)]
struct BookingForm {
    /// Admin may book on a customer's behalf; everyone else books for
    /// themselves.
    id_user_manual: Option<String>,
    id_layanan: i64,
    id_pelayan: i64,
    tgl: String,
    jam: String,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/update_status/{id_booking}/{status}").route(web::get().to(update_status)),
    )
    .service(web::resource("/process_booking").route(web::post().to(process_booking)));
}

async fn update_status(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<(i64, String)>,
    query: web::Query<CashierQuery>,
) -> Result<HttpResponse> {
    let user = match require_login(&session) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let (id_booking, status) = path.into_inner();
    let query = query.into_inner();

    if !ALL_STATUSES.contains(&status.as_str()) {
        return Ok(HttpResponse::BadRequest().body("Invalid status"));
    }

    let metode = query.metode.unwrap_or_else(|| "Tunai".to_string());
    let payment = if status == STATUS_SELESAI {
        Some(Payment {
            metode: metode.clone(),
            uang_bayar: query.bayar.unwrap_or(0),
            kembalian: query.kembali.unwrap_or(0),
        })
    } else {
        None
    };

    let result = bookings::transition_status(
        &state.db,
        id_booking,
        &status,
        query.expected.as_deref(),
        payment,
    )
    .await;

    match result {
        Ok(true) => {
            if status == STATUS_SELESAI {
                auth::flash(
                    &session,
                    "success",
                    format!("Pembayaran {metode} Berhasil! Transaksi telah diarsipkan."),
                );
            } else {
                auth::flash(
                    &session,
                    "success",
                    format!("Status diperbarui menjadi {status}!"),
                );
            }
        }
        Ok(false) => {
            auth::flash(
                &session,
                "danger",
                "Booking tidak ditemukan atau sudah berubah status.",
            );
        }
        Err(err) => {
            log::error!("Status transition failed for booking {id_booking}: {err}");
            auth::flash(&session, "danger", "Gagal memperbarui status transaksi.");
        }
    }

    Ok(match user.role.as_str() {
        ROLE_ADMIN => redirect("/admin/booking"),
        ROLE_STAFF => redirect("/staff/antrian"),
        _ => redirect("/dashboard"),
    })
}

async fn process_booking(
    state: web::Data<AppState>,
    session: Session,
    form: web::Form<BookingForm>,
) -> Result<HttpResponse> {
    let user = match require_login(&session) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let form = form.into_inner();

    let id_user = if user.role == ROLE_ADMIN {
        form.id_user_manual
            .as_deref()
            .and_then(|value| value.trim().parse::<i64>().ok())
            .unwrap_or(user.id_user)
    } else {
        user.id_user
    };

    let created = bookings::create(
        &state.db,
        id_user,
        form.id_layanan,
        form.id_pelayan,
        form.tgl.trim(),
        form.jam.trim(),
    )
    .await;

    match created {
        Ok(_) => auth::flash(&session, "success", "Booking berhasil ditambahkan!"),
        Err(err) => {
            log::error!("Booking creation failed: {err}");
            auth::flash(&session, "danger", "Booking gagal dibuat. Coba lagi.");
        }
    }

    if user.role == ROLE_ADMIN {
        Ok(redirect("/admin/booking"))
    } else {
        Ok(redirect("/user/riwayat"))
    }
}
