// src/web/auth_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::user::LoginForm,
    services::{auth_service, user_service},
    state::AppState,
    templates::LoginPage,
};
use askama::Template;
use axum::{
    extract::{Form, State},
    response::{Html, IntoResponse, Redirect},
};
use tower_sessions::Session;

// GET /login
pub async fn show_login_form(session: Session) -> impl IntoResponse {
    // Se já existe um 'user_id' na sessão, vai direto para o painel
    if session.get::<String>("user_id").await.ok().flatten().is_some() {
        tracing::debug!("GET /login: utilizador já logado, redirecionando para /painel");
        return Redirect::to("/painel").into_response();
    }

    let template = LoginPage { error: None };
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Falha ao renderizar template de login: {}", e);
            (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                "Erro ao carregar a página.",
            )
                .into_response()
        }
    }
}

// Renderiza a página de login com uma mensagem de erro
fn login_com_erro(mensagem: &str) -> AppResult<axum::response::Response> {
    let template = LoginPage { error: Some(mensagem.to_string()) };
    match template.render() {
        Ok(html) => Ok(Html(html).into_response()),
        Err(e) => {
            tracing::error!("Falha ao renderizar template de login com erro: {}", e);
            Err(AppError::InternalServerError)
        }
    }
}

// POST /login
pub async fn handle_login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> AppResult<impl IntoResponse> {
    tracing::info!("Tentativa de login para: {}", form.email);

    // 1. Busca o utilizador pelo email
    let user = match user_service::find_user_by_email(&state.db_pool, &form.email).await? {
        Some(u) => u,
        None => {
            tracing::warn!("Utilizador não encontrado: {}", form.email);
            // Mensagem genérica para não revelar se o email existe
            return login_com_erro("Email ou senha inválidos.");
        }
    };

    // 2. Contas inativas não entram
    if user.status == "inactive" {
        tracing::warn!("Login recusado para conta inativa: {}", form.email);
        return login_com_erro("A sua conta está inativa. Contacte um administrador.");
    }

    // 3. Verifica a senha
    match auth_service::verify_password(&form.password, &user.password_hash).await {
        Ok(true) => {
            // 4. Autentica a sessão
            session.cycle_id().await // Gera novo ID de sessão (segurança)
                .map_err(|e| AppError::SessionError(format!("Falha ao rodar ID: {}", e)))?;
            session.insert("user_id", &user.id).await
                .map_err(|e| AppError::SessionError(format!("Falha ao inserir na sessão: {}", e)))?;

            tracing::info!("✅ Login bem-sucedido para: {}", user.email);
            Ok(Redirect::to("/painel").into_response())
        }
        Ok(false) => {
            tracing::warn!("Senha incorreta para: {}", form.email);
            login_com_erro("Email ou senha inválidos.")
        }
        Err(e) => {
            tracing::error!("Erro ao verificar senha para {}: {:?}", form.email, e);
            Err(e)
        }
    }
}

// GET /logout
pub async fn handle_logout(session: Session) -> AppResult<Redirect> {
    let user_id: Option<String> = session.get("user_id").await.ok().flatten();

    session.delete().await
        .map_err(|e| AppError::SessionError(format!("Falha ao apagar sessão: {}", e)))?;

    if let Some(id) = user_id {
        tracing::info!("🚪 Utilizador '{}' desligado.", id);
    } else {
        tracing::info!("🚪 Sessão anónima desligada.");
    }

    Ok(Redirect::to("/login"))
}
