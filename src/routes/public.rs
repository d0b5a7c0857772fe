use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use actix_session::Session;
use actix_web::{web, HttpResponse, Result};
use askama::Template;
use serde::Deserialize;

use crate::{
    auth::{
        self, current_user, hash_password, redirect, require_login, take_flash, verify_password,
        Flash, SessionUser, ADMIN_SECRET_CODE,
    },
    filters,
    models::{LayananRow, ROLE_ADMIN, ROLE_PELANGGAN, ROLE_STAFF},
    repo::{customers, staff_members, users},
    state::AppState,
    templates::render,
    uploads,
};

#[derive(Template)]
#[template(path = "landing.html")]
struct LandingTemplate {
    layanan: Vec<LayananRow>,
}

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate {
    flash: Option<Flash>,
}

#[derive(Template)]
#[template(path = "register.html")]
struct RegisterTemplate {
    flash: Option<Flash>,
}

#[derive(Template)]
#[template(path = "profile.html")]
struct ProfileTemplate {
    flash: Option<Flash>,
    username: String,
    role: String,
    nama: String,
    no_hp: String,
    alamat: String,
    is_staff: bool,
    is_pelanggan: bool,
    spesialisasi: String,
    status_aktif: String,
    foto: String,
    has_foto: bool,
}

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

#[derive(Deserialize)]
struct RegisterForm {
    username: String,
    password: String,
    role: String,
    secret_code: Option<String>,
    nama: Option<String>,
    hp: Option<String>,
    alamat: Option<String>,
}

#[derive(Deserialize)]
struct ResetPasswordForm {
    username: String,
    new_password: String,
}

#[derive(MultipartForm)]
struct ProfileForm {
    username: Text<String>,
    password: Option<Text<String>>,
    nama: Text<String>,
    hp: Option<Text<String>>,
    alamat: Option<Text<String>>,
    foto: Option<TempFile>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(landing)))
        .service(
            web::resource("/login")
                .route(web::get().to(login_page))
                .route(web::post().to(login)),
        )
        .service(
            web::resource("/register")
                .route(web::get().to(register_page))
                .route(web::post().to(register)),
        )
        .service(web::resource("/reset_password").route(web::post().to(reset_password)))
        .service(web::resource("/logout").route(web::get().to(logout)))
        .service(web::resource("/dashboard").route(web::get().to(dashboard)))
        .service(web::resource("/profile").route(web::get().to(profile)))
        .service(web::resource("/update_profile").route(web::post().to(update_profile)))
        .service(web::resource("/health").route(web::get().to(health)));
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().body("ok")
}

/// Public landing page: the top of the service catalog as the shop window.
async fn landing(state: web::Data<AppState>) -> Result<HttpResponse> {
    let mut layanan = crate::repo::services::list(&state.db).await.unwrap_or_default();
    layanan.truncate(3);
    Ok(render(LandingTemplate { layanan }))
}

async fn login_page(session: Session) -> Result<HttpResponse> {
    if current_user(&session).is_some() {
        return Ok(redirect("/dashboard"));
    }
    Ok(render(LoginTemplate {
        flash: take_flash(&session),
    }))
}

async fn login(
    state: web::Data<AppState>,
    session: Session,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse> {
    let form = form.into_inner();
    let user = users::find_by_username(&state.db, form.username.trim())
        .await
        .unwrap_or(None);

    match user {
        Some(user) if verify_password(&form.password, &user.password_hash) => {
            auth::sign_in(
                &session,
                &SessionUser {
                    id_user: user.id_user,
                    username: user.username.clone(),
                    role: user.role,
                },
            );
            auth::flash(
                &session,
                "success",
                format!("Selamat datang, {}!", user.username),
            );
            Ok(redirect("/dashboard"))
        }
        _ => {
            auth::flash(&session, "danger", "Username atau Password salah!");
            Ok(redirect("/login"))
        }
    }
}

async fn register_page(session: Session) -> Result<HttpResponse> {
    Ok(render(RegisterTemplate {
        flash: take_flash(&session),
    }))
}

async fn register(
    state: web::Data<AppState>,
    session: Session,
    form: web::Form<RegisterForm>,
) -> Result<HttpResponse> {
    let form = form.into_inner();

    if ![ROLE_ADMIN, ROLE_STAFF, ROLE_PELANGGAN].contains(&form.role.as_str()) {
        return Ok(HttpResponse::BadRequest().body("Invalid role"));
    }

    // Registering an admin account needs the internal verification code.
    if form.role == ROLE_ADMIN && form.secret_code.as_deref() != Some(ADMIN_SECRET_CODE) {
        auth::flash(&session, "danger", "Kode Rahasia Admin Salah!");
        return Ok(redirect("/register"));
    }

    let password_hash = hash_password(&form.password)
        .map_err(|_| actix_web::error::ErrorInternalServerError("hash failure"))?;

    let created = users::register(
        &state.db,
        form.username.trim(),
        &password_hash,
        &form.role,
        form.nama.as_deref().unwrap_or_default(),
        form.hp.as_deref().unwrap_or_default(),
        form.alamat.as_deref().unwrap_or_default(),
    )
    .await;

    match created {
        Ok(true) => {
            auth::flash(&session, "success", "Registrasi Berhasil!");
            if current_user(&session).map(|u| u.role) == Some(ROLE_ADMIN.to_string()) {
                Ok(redirect("/admin/pelanggan"))
            } else {
                Ok(redirect("/login"))
            }
        }
        Ok(false) => {
            auth::flash(&session, "danger", "Registrasi Gagal! Username sudah ada.");
            Ok(redirect("/register"))
        }
        Err(err) => {
            log::error!("Registration failed: {err}");
            auth::flash(&session, "danger", "Registrasi Gagal! Coba lagi.");
            Ok(redirect("/register"))
        }
    }
}

async fn reset_password(
    state: web::Data<AppState>,
    session: Session,
    form: web::Form<ResetPasswordForm>,
) -> Result<HttpResponse> {
    let form = form.into_inner();
    let password_hash = hash_password(&form.new_password)
        .map_err(|_| actix_web::error::ErrorInternalServerError("hash failure"))?;

    match users::reset_password(&state.db, form.username.trim(), &password_hash).await {
        Ok(true) => auth::flash(
            &session,
            "success",
            "Password berhasil diperbarui! Silakan masuk dengan password baru.",
        ),
        Ok(false) => auth::flash(
            &session,
            "danger",
            "Gagal Reset! Username tidak ditemukan dalam sistem.",
        ),
        Err(err) => {
            log::error!("Password reset failed: {err}");
            auth::flash(&session, "danger", "Gagal Reset! Coba lagi.");
        }
    }
    Ok(redirect("/login"))
}

async fn logout(session: Session) -> HttpResponse {
    auth::sign_out(&session);
    redirect("/login")
}

/// One shared entry point after login; each role has its own dashboard.
async fn dashboard(session: Session) -> HttpResponse {
    let user = match require_login(&session) {
        Ok(user) => user,
        Err(resp) => return resp,
    };
    match user.role.as_str() {
        ROLE_ADMIN => redirect("/admin/dashboard"),
        ROLE_STAFF => redirect("/staff/dashboard"),
        _ => redirect("/user/dashboard"),
    }
}

async fn profile(state: web::Data<AppState>, session: Session) -> Result<HttpResponse> {
    let user = match require_login(&session) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let bio = customers::find_profile(&state.db, user.id_user)
        .await
        .unwrap_or(None);

    let mut template = ProfileTemplate {
        flash: take_flash(&session),
        username: user.username.clone(),
        role: user.role.clone(),
        nama: bio.as_ref().map(|b| b.nama_lengkap.clone()).unwrap_or_default(),
        no_hp: bio.as_ref().map(|b| b.no_hp.clone()).unwrap_or_default(),
        alamat: bio.as_ref().map(|b| b.alamat.clone()).unwrap_or_default(),
        is_staff: user.role == ROLE_STAFF,
        is_pelanggan: user.role == ROLE_PELANGGAN,
        spesialisasi: String::new(),
        status_aktif: String::new(),
        foto: String::new(),
        has_foto: false,
    };

    // Staff accounts carry extra detail from their pelayan record.
    if user.role == ROLE_STAFF {
        if let Ok(Some(staff)) = staff_members::find_by_user(&state.db, user.id_user).await {
            template.nama = staff.nama_pelayan;
            template.spesialisasi = staff.spesialisasi;
            template.status_aktif = staff.status_aktif;
            let foto = staff.foto_pelayan.unwrap_or_default();
            template.has_foto = !foto.is_empty();
            template.foto = foto;
        }
    }

    Ok(render(template))
}

async fn update_profile(
    state: web::Data<AppState>,
    session: Session,
    form: MultipartForm<ProfileForm>,
) -> Result<HttpResponse> {
    let user = match require_login(&session) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let form = form.into_inner();

    let new_username = form.username.into_inner();
    let new_password = form
        .password
        .map(|p| p.into_inner())
        .filter(|p| !p.is_empty());
    let password_hash = match new_password {
        Some(password) => Some(
            hash_password(&password)
                .map_err(|_| actix_web::error::ErrorInternalServerError("hash failure"))?,
        ),
        None => None,
    };

    let account_updated = users::update_account(
        &state.db,
        user.id_user,
        new_username.trim(),
        password_hash.as_deref(),
    )
    .await;

    match account_updated {
        Ok(true) => {
            auth::sign_in(
                &session,
                &SessionUser {
                    id_user: user.id_user,
                    username: new_username.trim().to_string(),
                    role: user.role.clone(),
                },
            );

            let nama = form.nama.into_inner();
            if user.role == ROLE_PELANGGAN {
                let result = customers::update_profile(
                    &state.db,
                    user.id_user,
                    &nama,
                    form.hp.as_deref().map(String::as_str).unwrap_or(""),
                    form.alamat.as_deref().map(String::as_str).unwrap_or(""),
                )
                .await;
                if let Err(err) = result {
                    log::error!("Customer profile update failed: {err}");
                }
            } else if user.role == ROLE_STAFF {
                let foto = form
                    .foto
                    .as_ref()
                    .and_then(|file| uploads::save_image(file, "profile_stf", &state.uploads_dir));
                let result =
                    staff_members::update_profile(&state.db, user.id_user, &nama, foto.as_deref())
                        .await;
                if let Err(err) = result {
                    log::error!("Staff profile update failed: {err}");
                }
            }

            auth::flash(&session, "success", "Data profil dan akun berhasil diperbarui!");
        }
        Ok(false) => {
            auth::flash(
                &session,
                "danger",
                "Gagal memperbarui akun. Username mungkin sudah digunakan.",
            );
        }
        Err(err) => {
            log::error!("Account update failed: {err}");
            auth::flash(&session, "danger", "Gagal memperbarui akun. Coba lagi.");
        }
    }

    Ok(redirect("/profile"))
}
