use super::{
    extract::AuthenticatedUser,
    types::{
        ApiError, AppointmentResponse, ChatRequest, LoginRequest, MessageResponse, SignupRequest,
        error_response, non_empty,
    },
};
use crate::{
    Error,
    auth::{NewUser, SESSION_COOKIE, SessionStore, UserProfile, UserStore},
    chat::{ChatReply, ChatSession},
    classifier::{Analysis, SkinAnalyzer},
    history::{AnalysisRecord, Appointment, HistoryStorage, NewAppointment},
};
use axum::{
    extract::{
        FromRef, Multipart, State,
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
    },
    http::StatusCode,
    response::Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;
use tracing::{error, info, warn};

const GENERIC_ERROR: &str = "An error occurred while processing your request";

#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ChatSession>,
    pub analyzer: Arc<SkinAnalyzer>,
    pub history: Arc<HistoryStorage>,
    pub users: Arc<UserStore>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    /// Fresh, empty account and session maps.
    pub fn new(chat: ChatSession, analyzer: SkinAnalyzer, history: HistoryStorage) -> Self {
        Self {
            chat: Arc::new(chat),
            analyzer: Arc::new(analyzer),
            history: Arc::new(history),
            users: Arc::new(UserStore::new()),
            sessions: Arc::new(SessionStore::new()),
        }
    }
}

impl FromRef<AppState> for Arc<SessionStore> {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        warn!("Rejected request body: {}", rejection.body_text());
        error_response(StatusCode::BAD_REQUEST, rejection.body_text())
    })
}

fn internal_error(context: &str, e: Error) -> ApiError {
    error!("{}: {}", context, e);
    error_response(StatusCode::INTERNAL_SERVER_ERROR, GENERIC_ERROR)
}

fn session_cookie(session_id: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session_id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<MessageResponse>), ApiError> {
    let request = json_body(payload)?;

    let (Some(email), Some(password)) = (non_empty(request.email), non_empty(request.password))
    else {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "Email and password are required",
        ));
    };

    let user = state
        .users
        .authenticate(&email, &password)
        .map_err(|e| internal_error("Login failed", e))?
        .ok_or_else(|| {
            error_response(StatusCode::UNAUTHORIZED, "Invalid email or password")
        })?;

    let session_id = state
        .sessions
        .create(&user.email)
        .map_err(|e| internal_error("Failed to create session", e))?;

    info!("User logged in: {}", user.email);
    Ok((
        jar.add(session_cookie(session_id)),
        Json(MessageResponse::new("Login successful")),
    ))
}

pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let request = json_body(payload)?;

    let (Some(email), Some(password), Some(first_name), Some(last_name)) = (
        non_empty(request.email),
        non_empty(request.password),
        non_empty(request.first_name),
        non_empty(request.last_name),
    ) else {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "All fields are required",
        ));
    };

    match state.users.register(NewUser {
        email,
        password,
        first_name,
        last_name,
    }) {
        Ok(_) => Ok(Json(MessageResponse::new("Signup successful"))),
        Err(Error::EmailTaken { .. }) => Err(error_response(
            StatusCode::BAD_REQUEST,
            "Email already registered",
        )),
        Err(e) => Err(internal_error("Signup failed", e)),
    }
}

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if let Err(e) = state.sessions.revoke(cookie.value()) {
            warn!("Failed to revoke session on logout: {}", e);
        }
    }

    (
        jar.remove(Cookie::build(SESSION_COOKIE).path("/")),
        Json(MessageResponse::new("Logout successful")),
    )
}

pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, ApiError> {
    let request = json_body(payload)?;

    let Some(message) = non_empty(request.message) else {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "No message provided",
        ));
    };

    let text = state
        .chat
        .send_message(&message)
        .await
        .map_err(|e| internal_error("Chat request failed", e))?;

    Ok(Json(ChatReply::from_text(&text)))
}

fn upload_error(e: MultipartError) -> ApiError {
    let status = e.status();
    warn!("Failed to read upload: {}", e.body_text());
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        error_response(status, "Uploaded file is too large")
    } else {
        error_response(status, e.body_text())
    }
}

/// Pulls the bytes of the `file` part. Parts without a filename are not
/// uploads and are skipped.
async fn read_upload(multipart: &mut Multipart) -> Result<Vec<u8>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(upload_error)?
    {
        if field.name() != Some("file") {
            continue;
        }
        match field.file_name().map(str::is_empty) {
            None => continue,
            Some(true) => {
                return Err(error_response(StatusCode::BAD_REQUEST, "No file selected"));
            }
            Some(false) => {}
        }

        let bytes = field
            .bytes()
            .await
            .map_err(upload_error)?;
        return Ok(bytes.to_vec());
    }

    Err(error_response(StatusCode::BAD_REQUEST, "No file uploaded"))
}

pub async fn analyze(
    State(state): State<AppState>,
    user: Option<AuthenticatedUser>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Analysis>, ApiError> {
    let mut multipart = multipart.map_err(|rejection| {
        warn!("Rejected upload: {}", rejection.body_text());
        error_response(StatusCode::BAD_REQUEST, "No file uploaded")
    })?;
    let upload = read_upload(&mut multipart).await?;

    let analysis = state
        .analyzer
        .clone()
        .analyze_blocking(upload)
        .await
        .map_err(|e| {
            error!("Analysis failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    info!(
        "Analysis result: {} ({:.3})",
        analysis.prediction, analysis.confidence
    );

    if let Some(user) = user {
        let record = AnalysisRecord::new(
            user.email,
            analysis.prediction.clone(),
            f64::from(analysis.confidence),
        );
        if let Err(e) = state.history.save_analysis(record).await {
            warn!("Failed to record analysis: {}", e);
        }
    }

    Ok(Json(analysis))
}

pub async fn profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<UserProfile>, ApiError> {
    match state.users.get(&user.email) {
        Ok(Some(record)) => Ok(Json(UserProfile::from(&record))),
        Ok(None) => Err(error_response(
            StatusCode::UNAUTHORIZED,
            "Authentication required",
        )),
        Err(e) => Err(internal_error("Failed to load profile", e)),
    }
}

pub async fn analyses(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<AnalysisRecord>>, ApiError> {
    state
        .history
        .list_analyses(&user.email)
        .await
        .map(Json)
        .map_err(|e| internal_error("Failed to list analyses", e))
}

/// Bookings made with the logged-in user's email address.
pub async fn appointments(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<Appointment>>, ApiError> {
    let appointments = state
        .history
        .list_appointments()
        .await
        .map_err(|e| internal_error("Failed to list appointments", e))?;

    Ok(Json(
        appointments
            .into_iter()
            .filter(|a| a.email == user.email)
            .collect(),
    ))
}

pub async fn book_appointment(
    State(state): State<AppState>,
    payload: Result<Json<NewAppointment>, JsonRejection>,
) -> Result<Json<AppointmentResponse>, ApiError> {
    let request = json_body(payload)?;

    if !request.is_complete() {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "Full name, email, preferred date and preferred time are required",
        ));
    }

    let appointment = request.into_appointment();
    let id = appointment.id.clone();
    info!(
        "Appointment request {} for {} on {} {}",
        id, appointment.email, appointment.preferred_date, appointment.preferred_time
    );

    state
        .history
        .save_appointment(appointment)
        .await
        .map_err(|e| internal_error("Failed to save appointment", e))?;

    Ok(Json(AppointmentResponse {
        message: "Appointment request received".to_string(),
        id,
    }))
}
