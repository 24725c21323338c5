// src/services/user_service.rs
use crate::{
    error::{AppError, AppResult},
    models::user::User,
    services::vaga_service,
};
use sqlx::SqlitePool;
use uuid::Uuid;

pub const DEFINED_ROLES: &[&str] = &["admin", "mentor", "student"];
pub const DEFINED_STATUSES: &[&str] = &["active", "pending", "inactive"];

const USER_COLUMNS: &str =
    "id, name, email, password_hash, role, status, skills, created_at, updated_at";

/// Validação mínima de email. Não tenta cobrir o RFC inteiro, apenas
/// bloquear entradas obviamente malformadas antes de qualquer escrita.
pub fn email_parece_valido(email: &str) -> bool {
    match email.trim().split_once('@') {
        Some((local, dominio)) => {
            !local.is_empty()
                && dominio.contains('.')
                && !dominio.starts_with('.')
                && !dominio.ends_with('.')
        }
        None => false,
    }
}

/// Busca um utilizador na base de dados pelo seu ID.
pub async fn find_user_by_id(db_pool: &SqlitePool, user_id: &str) -> AppResult<Option<User>> {
    let query = format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS);
    let user = sqlx::query_as::<_, User>(&query)
        .bind(user_id)
        .fetch_optional(db_pool)
        .await?;
    Ok(user)
}

/// Busca um utilizador pelo email (a coluna é COLLATE NOCASE).
pub async fn find_user_by_email(db_pool: &SqlitePool, email: &str) -> AppResult<Option<User>> {
    let query = format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS);
    let user = sqlx::query_as::<_, User>(&query)
        .bind(email.trim())
        .fetch_optional(db_pool)
        .await?;
    Ok(user)
}

/// Busca todos os utilizadores, ordenados por nome.
pub async fn find_all_users(db_pool: &SqlitePool) -> AppResult<Vec<User>> {
    tracing::debug!("Buscando todos os utilizadores...");
    let query = format!("SELECT {} FROM users ORDER BY name ASC", USER_COLUMNS);
    let users = sqlx::query_as::<_, User>(&query).fetch_all(db_pool).await?;
    tracing::debug!("Encontrados {} utilizadores.", users.len());
    Ok(users)
}

/// Busca os utilizadores com um papel específico (ex: só os mentores).
pub async fn find_users_by_role(db_pool: &SqlitePool, role: &str) -> AppResult<Vec<User>> {
    let query = format!(
        "SELECT {} FROM users WHERE role = ? ORDER BY name ASC",
        USER_COLUMNS
    );
    let users = sqlx::query_as::<_, User>(&query)
        .bind(role)
        .fetch_all(db_pool)
        .await?;
    Ok(users)
}

/// Cria um utilizador novo e devolve o ID gerado.
pub async fn create_user(
    db_pool: &SqlitePool,
    name: &str,
    email: &str,
    raw_password: &str,
    role: &str,
    status: &str,
    skills: &str,
) -> AppResult<String> {
    tracing::info!("Tentando criar utilizador: {}", email);

    if !DEFINED_ROLES.contains(&role) || !DEFINED_STATUSES.contains(&status) {
        tracing::warn!("Papel ou estado inválido ao criar user: {} / {}", role, status);
        return Err(AppError::InternalServerError);
    }

    // 1. Gera o hash da senha
    let password_hash = crate::services::auth_service::hash_password(raw_password).await?;

    // 2. Normaliza as skills para o formato canónico ("a,b,c")
    let skills = vaga_service::parse_skills(skills).join(",");

    let id = Uuid::new_v4().to_string();
    let insert_result = sqlx::query(
        r#"
        INSERT INTO users (id, name, email, password_hash, role, status, skills)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(name.trim())
    .bind(email.trim())
    .bind(&password_hash)
    .bind(role)
    .bind(status)
    .bind(&skills)
    .execute(db_pool)
    .await;

    // Verifica erro de constraint (email duplicado)
    if let Err(sqlx::Error::Database(db_err)) = &insert_result {
        // Códigos comuns do SQLite para violação de UNIQUE
        if db_err.code().map_or(false, |c| c == "19" || c == "2067" || c == "1555") {
            tracing::warn!("Falha ao criar user: email '{}' já existe.", email);
            return Err(AppError::EmailJaExiste);
        }
    }
    insert_result?;

    tracing::info!("✅ Utilizador '{}' criado com sucesso.", email);
    Ok(id)
}

/// Atualiza os dados básicos de um utilizador (o trigger trata do updated_at).
pub async fn update_user(
    db_pool: &SqlitePool,
    user_id: &str,
    name: &str,
    role: &str,
    status: &str,
    skills: &str,
) -> AppResult<()> {
    tracing::info!("Atualizando dados para user: {}", user_id);

    if !DEFINED_ROLES.contains(&role) || !DEFINED_STATUSES.contains(&status) {
        return Err(AppError::InternalServerError);
    }

    let skills = vaga_service::parse_skills(skills).join(",");
    let rows_affected = sqlx::query(
        r#"
        UPDATE users SET name = ?, role = ?, status = ?, skills = ?
        WHERE id = ?
        "#,
    )
    .bind(name.trim())
    .bind(role)
    .bind(status)
    .bind(&skills)
    .bind(user_id)
    .execute(db_pool)
    .await?
    .rows_affected();

    if rows_affected == 0 {
        tracing::warn!("Falha ao atualizar dados: utilizador '{}' não encontrado.", user_id);
        Err(AppError::NotFound)
    } else {
        tracing::info!("✅ Dados atualizados com sucesso para user: {}", user_id);
        Ok(())
    }
}

/// Altera a senha de um utilizador.
pub async fn update_user_password(
    db_pool: &SqlitePool,
    user_id: &str,
    new_raw_password: &str,
) -> AppResult<()> {
    tracing::info!("Tentando alterar senha para user: {}", user_id);
    let new_password_hash =
        crate::services::auth_service::hash_password(new_raw_password).await?;

    let rows_affected = sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
        .bind(&new_password_hash)
        .bind(user_id)
        .execute(db_pool)
        .await?
        .rows_affected();

    if rows_affected == 0 {
        tracing::warn!("Falha ao alterar senha: utilizador '{}' não encontrado.", user_id);
        Err(AppError::NotFound)
    } else {
        tracing::info!("✅ Senha alterada com sucesso para user: {}", user_id);
        Ok(())
    }
}

/// Atualiza apenas as skills do próprio utilizador (página de perfil).
pub async fn update_own_skills(db_pool: &SqlitePool, user_id: &str, skills: &str) -> AppResult<()> {
    let skills = vaga_service::parse_skills(skills).join(",");
    let rows_affected = sqlx::query("UPDATE users SET skills = ? WHERE id = ?")
        .bind(&skills)
        .bind(user_id)
        .execute(db_pool)
        .await?
        .rows_affected();

    if rows_affected == 0 {
        Err(AppError::NotFound)
    } else {
        Ok(())
    }
}

/// Apaga um utilizador. As atribuições de mentoria, pedidos de verificação,
/// mensagens e candidaturas caem em cascata (FKs com ON DELETE CASCADE).
pub async fn delete_user(db_pool: &SqlitePool, user_id: &str) -> AppResult<()> {
    tracing::info!("Apagando utilizador: {}", user_id);
    let rows_affected = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user_id)
        .execute(db_pool)
        .await?
        .rows_affected();

    if rows_affected == 0 {
        Err(AppError::NotFound)
    } else {
        tracing::info!("✅ Utilizador '{}' apagado.", user_id);
        Ok(())
    }
}

/// Bootstrap da conta de administrador: se não existir nenhum admin,
/// cria um a partir de ADMIN_EMAIL / ADMIN_PASSWORD.
pub async fn ensure_admin_user(db_pool: &SqlitePool) -> AppResult<()> {
    let admins: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'admin'")
        .fetch_one(db_pool)
        .await?;
    if admins > 0 {
        return Ok(());
    }

    let email =
        std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@mentoria.local".to_string());
    let password = match std::env::var("ADMIN_PASSWORD") {
        Ok(p) if !p.trim().is_empty() => p,
        _ => {
            tracing::warn!(
                "⚠️ Não existe nenhum admin e ADMIN_PASSWORD não está definida. \
                 Defina-a e reinicie para criar a conta de administrador."
            );
            return Ok(());
        }
    };

    let id = create_user(db_pool, "Administrador", &email, &password, "admin", "active", "").await?;
    tracing::info!("✅ Conta de administrador '{}' criada (id {}).", email, id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::apoio_teste::{criar_user, pool_teste};

    #[test]
    fn valida_emails_obvios() {
        assert!(email_parece_valido("rui@example.com"));
        assert!(email_parece_valido("  rui@example.com  "));
        assert!(!email_parece_valido("rui"));
        assert!(!email_parece_valido("@example.com"));
        assert!(!email_parece_valido("rui@semdominio"));
        assert!(!email_parece_valido("rui@dominio."));
    }

    #[tokio::test]
    async fn cria_e_encontra_por_email_sem_distinguir_maiusculas() {
        let pool = pool_teste().await;
        let id = create_user(&pool, "Rui Costa", "rui@example.com", "senha1234", "student", "active", "python, ensino")
            .await
            .unwrap();

        let user = find_user_by_email(&pool, "RUI@EXAMPLE.COM").await.unwrap().unwrap();
        assert_eq!(user.id, id);
        // skills normalizadas para o formato canónico
        assert_eq!(user.skills, "python,ensino");
    }

    #[tokio::test]
    async fn email_duplicado_devolve_erro_proprio() {
        let pool = pool_teste().await;
        create_user(&pool, "A", "dup@example.com", "senha1234", "student", "active", "")
            .await
            .unwrap();
        let err = create_user(&pool, "B", "dup@example.com", "senha1234", "mentor", "active", "")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::EmailJaExiste));
    }

    #[tokio::test]
    async fn apagar_user_faz_cascata_na_atribuicao() {
        let pool = pool_teste().await;
        let mentor = criar_user(&pool, "Mentora Ana", "ana@example.com", "mentor").await;
        let estudante = criar_user(&pool, "Rui", "rui@example.com", "student").await;
        sqlx::query("INSERT INTO mentor_student (mentor_id, student_id) VALUES (?, ?)")
            .bind(&mentor)
            .bind(&estudante)
            .execute(&pool)
            .await
            .unwrap();

        delete_user(&pool, &estudante).await.unwrap();

        let restantes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM mentor_student")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(restantes, 0);
    }

    #[tokio::test]
    async fn apagar_user_inexistente_devolve_not_found() {
        let pool = pool_teste().await;
        let err = delete_user(&pool, "nao-existe").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }
}
