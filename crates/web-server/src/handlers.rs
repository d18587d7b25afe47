use crate::error::AppError;
use crate::guard::CurrentUser;
use crate::schemas::{
    looks_like_email, GroupedDataRequest, GroupedDataRow, LoginRequest, MessageResponse,
    NewCrimeRequest, PermissionsResponse, PlacesResponse, PredictRequest, RegisterRequest,
    SecurePlacesQuery, StatusResponse, TokenResponse,
};
use crate::session::SESSION_COOKIE;
use crate::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use chrono::Utc;
use core_types::dates::check_record_date;
use core_types::{ForecastRow, NewCrimeRecord, NewUser, Permission, SeriesKind, TimeWindow};
use database::{CrimeFilter, SecureData};
use forecaster::apply_ponderation;
use std::sync::Arc;
use uuid::Uuid;

/// # GET /
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Crime Data API is running".to_string(),
    })
}

/// # POST /login
/// Verifies the credentials, issues a session token and sets it as a cookie.
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<(CookieJar, Json<TokenResponse>), AppError> {
    if !looks_like_email(&request.email) {
        return Err(AppError::BadRequest("Email inválido".to_string()));
    }

    if !state.data.verify_login(&request.email, &request.password).await? {
        tracing::warn!(email = %request.email, "Rejected login.");
        return Err(AppError::Unauthenticated("Credenciales inválidas".to_string()));
    }

    let token = Uuid::new_v4().to_string();
    state.sessions.put(token.clone(), request.email.clone()).await?;
    tracing::info!(email = %request.email, "User logged in.");

    let cookie = Cookie::build((SESSION_COOKIE, format!("Bearer {token}")))
        .http_only(true)
        .path("/");
    Ok((jar.add(cookie), Json(TokenResponse { token })))
}

/// # GET /permissions
pub async fn permissions(
    State(state): State<Arc<AppState>>,
    caller: CurrentUser,
) -> Result<Json<PermissionsResponse>, AppError> {
    let permissions = caller.capabilities(&state).await?;
    Ok(Json(PermissionsResponse { permissions }))
}

/// # POST /logout
/// Drops the token from the session store and clears the cookie.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    caller: CurrentUser,
) -> Result<(CookieJar, Json<MessageResponse>), AppError> {
    state.sessions.delete(&caller.token).await?;
    tracing::info!(email = %caller.user.email, "User logged out.");

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    Ok((
        jar,
        Json(MessageResponse {
            message: "Sesión cerrada exitosamente".to_string(),
        }),
    ))
}

/// # GET /secure-places?see=SEE_LOCAL|SEE_ALL
pub async fn secure_places(
    State(state): State<Arc<AppState>>,
    caller: CurrentUser,
    Query(query): Query<SecurePlacesQuery>,
) -> Result<Json<PlacesResponse>, AppError> {
    let caps = caller.capabilities(&state).await?;
    let places = SecureData::new(state.data.as_ref())
        .get_secure_unique_places(&caller.user, &caps, query.see)
        .await?;
    Ok(Json(PlacesResponse { places }))
}

/// # POST /grouped-data
/// Aggregated counts per bucket, restricted to the caller's places and
/// optionally to a date window.
pub async fn grouped_data(
    State(state): State<Arc<AppState>>,
    caller: CurrentUser,
    Json(request): Json<GroupedDataRequest>,
) -> Result<Json<Vec<GroupedDataRow>>, AppError> {
    let window = TimeWindow::new(request.init_time, request.end_time)?;
    let caps = caller.capabilities(&state).await?;

    let filter = CrimeFilter::new(request.chosen_crime, request.chosen_place);
    let rows = SecureData::new(state.data.as_ref())
        .secure_fetch_grouped_data(&caller.user, &caps, filter, request.frequency)
        .await?;

    let rows = window.retain(rows).into_iter().map(GroupedDataRow::from).collect();
    Ok(Json(rows))
}

/// # POST /predict
/// Requires "PREDICT SI". Returns only the projected periods.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    caller: CurrentUser,
    Json(request): Json<PredictRequest>,
) -> Result<Json<Vec<ForecastRow>>, AppError> {
    let caps = caller
        .require(&state, Permission::Predict, "No autorizado para predecir datos")
        .await?;

    if request.n_steps == 0 || request.n_steps > state.max_steps {
        return Err(AppError::BadRequest(format!(
            "n_steps debe estar entre 1 y {}",
            state.max_steps
        )));
    }

    let filter = CrimeFilter::new(request.chosen_crime, request.chosen_place);
    let rows = SecureData::new(state.data.as_ref())
        .secure_fetch_grouped_data(&caller.user, &caps, filter, request.frequency)
        .await?;

    let series = apply_ponderation(&rows, request.ponder);
    let forecast = state
        .forecaster
        .forecast(&series, request.frequency, request.n_steps)?;

    let rows = forecast
        .iter()
        .filter(|p| p.kind == SeriesKind::Forecast)
        .map(ForecastRow::from)
        .collect();
    Ok(Json(rows))
}

/// # POST /new-data
/// Requires "Nuevos datos SI". Appends one weighted crime record.
pub async fn new_data(
    State(state): State<Arc<AppState>>,
    caller: CurrentUser,
    Json(request): Json<NewCrimeRequest>,
) -> Result<Json<StatusResponse>, AppError> {
    caller
        .require(&state, Permission::NewData, "No autorizado para ingresar datos")
        .await?;

    let category = state.categories.resolve(&request.crimecodedesc).ok_or_else(|| {
        AppError::BadRequest(format!(
            "Categoría de delito desconocida: {}",
            request.crimecodedesc
        ))
    })?;

    let date = check_record_date(request.date, Utc::now().naive_utc())?;
    let record = NewCrimeRecord {
        date,
        crimecodedesc: category.code.clone(),
        areaname: request.areaname,
        pond: category.weight,
    };
    state.data.insert_crime(&record).await?;
    tracing::info!(
        email = %caller.user.email,
        category = %record.crimecodedesc,
        area = %record.areaname,
        "Crime record added."
    );

    Ok(Json(StatusResponse {
        status: "success".to_string(),
    }))
}

/// # POST /register
/// Requires "Nuevos usuarios SI". Creates a user, rejecting taken emails.
pub async fn register(
    State(state): State<Arc<AppState>>,
    caller: CurrentUser,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<StatusResponse>, AppError> {
    caller
        .require(&state, Permission::NewUsers, "No autorizado para crear usuarios")
        .await?;

    if !looks_like_email(&request.email) {
        return Err(AppError::BadRequest("Email inválido".to_string()));
    }
    if request.password.is_empty() {
        return Err(AppError::BadRequest("La contraseña no puede estar vacía".to_string()));
    }
    if request.full_name.trim().is_empty() || request.area.trim().is_empty() {
        return Err(AppError::BadRequest("Nombre y área son obligatorios".to_string()));
    }
    if !state.data.role_exists(&request.role).await? {
        return Err(AppError::BadRequest(format!("Rol desconocido: {}", request.role)));
    }
    if state.data.get_user(&request.email).await?.is_some() {
        return Err(AppError::Conflict("El usuario ya existe".to_string()));
    }

    let new_user = NewUser {
        email: request.email,
        full_name: request.full_name,
        area: request.area,
        password: request.password,
        role: request.role,
    };
    let created = state.data.create_user(&new_user).await?;
    tracing::info!(
        by = %caller.user.email,
        email = %created.email,
        role = %created.role,
        "User registered."
    );

    Ok(Json(StatusResponse {
        status: "Usuario creado".to_string(),
    }))
}
