// src/web/routes.rs
use crate::{
    state::AppState,
    web::{
        admin_handlers, auth_handlers, mensagem_handlers, mentoria_handlers, mw_admin, mw_auth,
        perfil_handlers, user_handlers, vaga_handlers, verificacao_handlers,
    },
};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};

pub fn create_router(app_state: AppState) -> Router {
    // --- Rotas Públicas ---
    let public_routes = Router::new()
        .route("/login", get(auth_handlers::show_login_form).post(auth_handlers::handle_login))
        .route("/logout", get(auth_handlers::handle_logout))
        .route("/", get(|| async { axum::response::Redirect::permanent("/login") }));

    // --- Rotas de Admin (páginas HTML) ---
    // Exigem login E papel admin
    let admin_routes = Router::new()
        .route("/users", get(admin_handlers::show_admin_users_page))
        .route("/users/create", post(admin_handlers::handle_create_user))
        .route("/users/change_password", post(admin_handlers::handle_change_password))
        .route("/users/delete", post(admin_handlers::handle_delete_user))
        .route(
            "/users/edit/{id}",
            get(admin_handlers::show_edit_user_form).post(admin_handlers::handle_edit_user),
        )
        .route("/verificacoes", get(verificacao_handlers::show_admin_verificacoes_page))
        .route("/verificacoes/{id}/aprovar", post(verificacao_handlers::handle_aprovar))
        .route("/verificacoes/{id}/rejeitar", post(verificacao_handlers::handle_rejeitar))
        .route("/mentoria", get(mentoria_handlers::show_admin_mentoria_page))
        .route("/mentoria/atribuir", post(mentoria_handlers::handle_atribuir))
        .route("/mentoria/remover", post(mentoria_handlers::handle_remover))
        // Aplica APENAS mw_admin aqui (mw_auth será aplicado no router pai)
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            mw_admin::require_admin,
        ));

    // --- API JSON de mentoria (consumida pelos painéis de admin) ---
    // DELETE identifica o estudante pela query string
    let api_admin_routes = Router::new()
        .route(
            "/mentorship",
            get(mentoria_handlers::api_list_assignments)
                .post(mentoria_handlers::api_assign)
                .delete(mentoria_handlers::api_unassign),
        )
        .route("/mentorship/students/{mentor_id}", get(mentoria_handlers::api_students_for_mentor))
        .route("/mentorship/mentor/{student_id}", get(mentoria_handlers::api_mentor_for_student))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            mw_admin::require_admin,
        ));

    // --- Rotas Autenticadas (combinando tudo) ---
    // Exigem *pelo menos* login
    let authenticated_routes = Router::new()
        .route("/painel", get(user_handlers::painel_handler))
        .route("/perfil", get(perfil_handlers::show_perfil_page))
        .route("/perfil/skills", post(perfil_handlers::handle_atualizar_skills))
        .route("/perfil/atividades", post(perfil_handlers::handle_adicionar_atividade))
        .route("/perfil/qualificacoes", post(perfil_handlers::handle_adicionar_qualificacao))
        .route("/perfil/verificacao", post(perfil_handlers::handle_submeter_verificacao))
        .route("/perfil/cv", get(perfil_handlers::show_cv_page))
        .route("/mensagens", get(mensagem_handlers::show_mensagens_page))
        .route("/mensagens/enviar", post(mensagem_handlers::handle_enviar))
        .route("/mensagens/{id}/lida", post(mensagem_handlers::handle_marcar_lida))
        .route("/vagas", get(vaga_handlers::show_vagas_page))
        .route("/vagas/{id}/candidatar", post(vaga_handlers::handle_candidatar))
        .route("/vagas/{id}/guardar", post(vaga_handlers::handle_guardar))
        .route("/vagas/{id}/esquecer", post(vaga_handlers::handle_esquecer))
        // Aninha as áreas de administração
        .nest("/admin", admin_routes)
        .nest("/api/admin", api_admin_routes)
        // Aplica o middleware geral require_auth a TODAS as rotas
        // definidas ACIMA neste router (incluindo as aninhadas)
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            mw_auth::require_auth,
        ));

    // --- Router Final ---
    Router::new()
        .merge(public_routes)
        .merge(authenticated_routes)
        .with_state(app_state)
}
