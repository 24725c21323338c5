// src/web/admin_handlers.rs
use crate::{
    error::{AppError, AppResult},
    services::{mentoria_service, user_service},
    state::AppState,
    templates::{AdminEditUserPage, AdminUsersPage, UserAdminRow},
};
use askama::Template;
use axum::{
    extract::{Form, Path, Query, State},
    response::{Html, IntoResponse, Redirect},
};
use serde::Deserialize;

// --- Structs para os formulários ---
#[derive(Deserialize, Debug)]
pub struct CreateUserForm {
    name: String,
    email: String,
    password: String,
    role: String,
    status: String,
    #[serde(default)]
    skills: String,
}

#[derive(Deserialize, Debug)]
pub struct EditUserForm {
    name: String,
    role: String,
    status: String,
    #[serde(default)]
    skills: String,
}

#[derive(Deserialize, Debug)]
pub struct ChangePasswordForm {
    id: String,
    new_password: String,
}

#[derive(Deserialize, Debug)]
pub struct DeleteUserForm {
    id: String,
}

// Feedback via query string (padrão Post/Redirect/Get)
#[derive(Deserialize, Debug)]
pub struct FeedbackParams {
    pub success: Option<String>,
    pub error: Option<String>,
}

// --- Handlers ---

/// Handler para GET /admin/users - Mostra a página de gestão
pub async fn show_admin_users_page(
    State(state): State<AppState>,
    Query(params): Query<FeedbackParams>,
) -> AppResult<impl IntoResponse> {
    tracing::debug!("GET /admin/users: carregando página de gestão...");

    // 1. Busca todos os utilizadores
    let users = match user_service::find_all_users(&state.db_pool).await {
        Ok(u) => u,
        Err(e) => {
            tracing::error!("Erro ao buscar todos os utilizadores: {:?}", e);
            let template = AdminUsersPage {
                users: vec![],
                success_message: None,
                error_message: Some("Falha ao carregar lista de utilizadores.".to_string()),
            };
            return match template.render() {
                Ok(html) => Ok(Html(html).into_response()),
                Err(render_e) => {
                    tracing::error!("Falha ao renderizar AdminUsersPage: {}", render_e);
                    Err(AppError::InternalServerError)
                }
            };
        }
    };

    // 2. Carrega os índices de mentoria para anotar cada linha
    //    (mentor de cada estudante, nº de estudantes de cada mentor)
    let index = match mentoria_service::load_index(&state.db_pool).await {
        Ok(i) => i,
        Err(e) => {
            tracing::warn!("Erro ao carregar índice de mentoria: {}. Mostrando sem ele.", e);
            Default::default()
        }
    };

    let rows = users
        .into_iter()
        .map(|user| {
            let mentor_nome = if user.role == "student" {
                index.mentor_name_for_student(&user.id).map(|n| n.to_string())
            } else {
                None
            };
            let num_estudantes = if user.role == "mentor" {
                index.student_count_for_mentor(&user.id)
            } else {
                0
            };
            UserAdminRow {
                id: user.id,
                name: user.name,
                email: user.email,
                role: user.role,
                status: user.status,
                mentor_nome,
                num_estudantes,
            }
        })
        .collect();

    let template = AdminUsersPage {
        users: rows,
        success_message: params.success,
        error_message: params.error,
    };

    match template.render() {
        Ok(html) => Ok(Html(html).into_response()),
        Err(e) => {
            tracing::error!("Falha ao renderizar template AdminUsersPage: {}", e);
            Err(AppError::InternalServerError)
        }
    }
}

/// Handler para POST /admin/users/create - Cria um novo utilizador
pub async fn handle_create_user(
    State(state): State<AppState>,
    Form(form): Form<CreateUserForm>,
) -> AppResult<Redirect> {
    tracing::info!("POST /admin/users/create: tentando criar user {}", form.email);

    // Validações básicas antes de qualquer escrita
    if form.name.trim().is_empty()
        || !user_service::email_parece_valido(&form.email)
        || form.password.len() < 8
        || !user_service::DEFINED_ROLES.contains(&form.role.as_str())
        || !user_service::DEFINED_STATUSES.contains(&form.status.as_str())
    {
        tracing::warn!("Criação falhou: dados inválidos no formulário.");
        let error_msg =
            urlencoding::encode("Dados inválidos. Verifique todos os campos (senha mín. 8 caracteres).");
        let redirect_url = format!("/admin/users?error={}", error_msg);
        // Retorna Ok(Redirect) mesmo em caso de erro de validação (padrão PRG)
        return Ok(Redirect::to(&redirect_url));
    }

    match user_service::create_user(
        &state.db_pool,
        &form.name,
        &form.email,
        &form.password,
        &form.role,
        &form.status,
        &form.skills,
    )
    .await
    {
        Ok(_) => {
            tracing::info!("Utilizador {} criado com sucesso.", form.email);
            let success_msg =
                urlencoding::encode(&format!("Utilizador '{}' criado com sucesso.", form.email))
                    .to_string();
            let redirect_url = format!("/admin/users?success={}", success_msg);
            Ok(Redirect::to(&redirect_url))
        }
        Err(e) => {
            tracing::error!("Erro ao criar utilizador {}: {:?}", form.email, e);
            let error_detail = match e {
                AppError::EmailJaExiste => "Já existe um utilizador com este email.".to_string(),
                _ => "Ocorreu um erro na base de dados.".to_string(),
            };
            let error_msg = urlencoding::encode(&error_detail);
            let redirect_url = format!("/admin/users?error={}", error_msg);
            Ok(Redirect::to(&redirect_url))
        }
    }
}

/// Handler para POST /admin/users/change_password
pub async fn handle_change_password(
    State(state): State<AppState>,
    Form(form): Form<ChangePasswordForm>,
) -> AppResult<Redirect> {
    tracing::info!("POST /admin/users/change_password: alterando senha para {}", form.id);

    if form.id.trim().is_empty() || form.new_password.len() < 8 {
        tracing::warn!("Alteração de senha falhou: dados inválidos.");
        let error_msg = urlencoding::encode("ID ou nova senha inválidos (mín. 8 caracteres).");
        let redirect_url = format!("/admin/users?error={}", error_msg);
        return Ok(Redirect::to(&redirect_url));
    }

    match user_service::update_user_password(&state.db_pool, &form.id, &form.new_password).await {
        Ok(_) => {
            let success_msg = urlencoding::encode("Senha alterada com sucesso.").to_string();
            let redirect_url = format!("/admin/users?success={}", success_msg);
            Ok(Redirect::to(&redirect_url))
        }
        Err(e) => {
            tracing::error!("Erro ao alterar senha para {}: {:?}", form.id, e);
            let error_detail = match e {
                AppError::NotFound => "Utilizador não encontrado.".to_string(),
                _ => "Ocorreu um erro na base de dados.".to_string(),
            };
            let error_msg = urlencoding::encode(&error_detail);
            let redirect_url = format!("/admin/users?error={}", error_msg);
            Ok(Redirect::to(&redirect_url))
        }
    }
}

/// Handler para GET /admin/users/edit/{id} - Mostra o formulário de edição
pub async fn show_edit_user_form(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    tracing::debug!("GET /admin/users/edit/{}: mostrando formulário", user_id);

    let user = match user_service::find_user_by_id(&state.db_pool, &user_id).await {
        Ok(Some(u)) => Some(u),
        Ok(None) => {
            tracing::warn!("Tentativa de editar utilizador inexistente: {}", user_id);
            None
        }
        Err(e) => {
            tracing::error!("Erro ao buscar user {} para edição: {:?}", user_id, e);
            None
        }
    };

    let error_message = if user.is_none() {
        Some(format!("Utilizador '{}' não encontrado.", user_id))
    } else {
        None
    };

    let template = AdminEditUserPage {
        user,
        all_roles: user_service::DEFINED_ROLES,
        all_statuses: user_service::DEFINED_STATUSES,
        error_message,
    };

    match template.render() {
        Ok(html) => Ok(Html(html).into_response()),
        Err(e) => {
            tracing::error!("Falha ao renderizar AdminEditUserPage para {}: {}", user_id, e);
            Err(AppError::InternalServerError)
        }
    }
}

/// Handler para POST /admin/users/edit/{id} - Processa a edição
pub async fn handle_edit_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Form(form): Form<EditUserForm>,
) -> AppResult<Redirect> {
    tracing::info!("POST /admin/users/edit/{}: processando edição...", user_id);

    if form.name.trim().is_empty()
        || !user_service::DEFINED_ROLES.contains(&form.role.as_str())
        || !user_service::DEFINED_STATUSES.contains(&form.status.as_str())
    {
        tracing::warn!("Edição falhou para {}: dados inválidos no formulário.", user_id);
        let error_msg = urlencoding::encode("Dados inválidos. Verifique todos os campos.");
        let redirect_url = format!("/admin/users/edit/{}?error={}", user_id, error_msg);
        return Ok(Redirect::to(&redirect_url));
    }

    match user_service::update_user(
        &state.db_pool,
        &user_id,
        &form.name,
        &form.role,
        &form.status,
        &form.skills,
    )
    .await
    {
        Ok(_) => {
            tracing::info!("✅ Dados atualizados com sucesso para user {}", user_id);
            let success_msg =
                urlencoding::encode(&format!("Dados do utilizador '{}' atualizados.", form.name))
                    .to_string();
            let redirect_url = format!("/admin/users?success={}", success_msg);
            Ok(Redirect::to(&redirect_url))
        }
        Err(e) => {
            tracing::error!("Erro ao atualizar dados do user {}: {:?}", user_id, e);
            let error_detail = match e {
                AppError::NotFound => "Utilizador não encontrado.".to_string(),
                _ => "Erro ao atualizar dados na base de dados.".to_string(),
            };
            let error_msg = urlencoding::encode(&error_detail);
            let redirect_url = format!("/admin/users/edit/{}?error={}", user_id, error_msg);
            Ok(Redirect::to(&redirect_url))
        }
    }
}

/// Handler para POST /admin/users/delete - Apaga um utilizador
/// (as atribuições e pedidos associados caem em cascata na DB)
pub async fn handle_delete_user(
    State(state): State<AppState>,
    Form(form): Form<DeleteUserForm>,
) -> AppResult<Redirect> {
    tracing::info!("POST /admin/users/delete: apagando user {}", form.id);

    match user_service::delete_user(&state.db_pool, &form.id).await {
        Ok(_) => {
            let success_msg = urlencoding::encode("Utilizador apagado.").to_string();
            let redirect_url = format!("/admin/users?success={}", success_msg);
            Ok(Redirect::to(&redirect_url))
        }
        Err(e) => {
            tracing::error!("Erro ao apagar user {}: {:?}", form.id, e);
            let error_detail = match e {
                AppError::NotFound => "Utilizador não encontrado.".to_string(),
                _ => "Erro ao apagar na base de dados.".to_string(),
            };
            let error_msg = urlencoding::encode(&error_detail);
            let redirect_url = format!("/admin/users?error={}", error_msg);
            Ok(Redirect::to(&redirect_url))
        }
    }
}
