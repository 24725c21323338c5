// src/services/perfil_service.rs
use crate::{
    error::AppResult,
    models::perfil::{Atividade, Qualificacao},
};
use sqlx::SqlitePool;
use uuid::Uuid;

pub async fn listar_atividades(pool: &SqlitePool, student_id: &str) -> AppResult<Vec<Atividade>> {
    let atividades = sqlx::query_as::<_, Atividade>(
        "SELECT id, student_id, title, description, activity_date \
         FROM student_activities WHERE student_id = ? \
         ORDER BY activity_date DESC, rowid DESC",
    )
    .bind(student_id)
    .fetch_all(pool)
    .await?;
    Ok(atividades)
}

pub async fn adicionar_atividade(
    pool: &SqlitePool,
    student_id: &str,
    title: &str,
    description: Option<&str>,
    activity_date: Option<&str>,
) -> Result<String, String> {
    let title = title.trim();
    if title.is_empty() {
        return Err("A atividade precisa de um título.".into());
    }

    let id = Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO student_activities (id, student_id, title, description, activity_date) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(student_id)
    .bind(title)
    .bind(description.map(|d| d.trim()).filter(|d| !d.is_empty()))
    .bind(activity_date.map(|d| d.trim()).filter(|d| !d.is_empty()))
    .execute(pool)
    .await
    .map_err(|e| e.to_string())?;

    Ok("Atividade adicionada ao perfil.".into())
}

pub async fn listar_qualificacoes(
    pool: &SqlitePool,
    student_id: &str,
) -> AppResult<Vec<Qualificacao>> {
    let qualificacoes = sqlx::query_as::<_, Qualificacao>(
        "SELECT id, student_id, title, institution, year \
         FROM qualifications WHERE student_id = ? \
         ORDER BY year DESC, rowid DESC",
    )
    .bind(student_id)
    .fetch_all(pool)
    .await?;
    Ok(qualificacoes)
}

pub async fn adicionar_qualificacao(
    pool: &SqlitePool,
    student_id: &str,
    title: &str,
    institution: Option<&str>,
    year: Option<i64>,
) -> Result<String, String> {
    let title = title.trim();
    if title.is_empty() {
        return Err("A qualificação precisa de um título.".into());
    }

    let id = Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO qualifications (id, student_id, title, institution, year) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(student_id)
    .bind(title)
    .bind(institution.map(|i| i.trim()).filter(|i| !i.is_empty()))
    .bind(year)
    .execute(pool)
    .await
    .map_err(|e| e.to_string())?;

    Ok("Qualificação adicionada ao perfil.".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::apoio_teste::{criar_user, pool_teste};

    #[tokio::test]
    async fn adiciona_e_lista_atividades_e_qualificacoes() {
        let pool = pool_teste().await;
        let rui = criar_user(&pool, "Rui", "rui@example.com", "student").await;

        adicionar_atividade(&pool, &rui, "Voluntariado na biblioteca", Some("Apoio ao estudo"), Some("2025-03-10"))
            .await
            .unwrap();
        adicionar_qualificacao(&pool, &rui, "12º ano", Some("Escola Secundária Central"), Some(2024))
            .await
            .unwrap();

        let atividades = listar_atividades(&pool, &rui).await.unwrap();
        assert_eq!(atividades.len(), 1);
        assert_eq!(atividades[0].title, "Voluntariado na biblioteca");

        let qualificacoes = listar_qualificacoes(&pool, &rui).await.unwrap();
        assert_eq!(qualificacoes.len(), 1);
        assert_eq!(qualificacoes[0].year, Some(2024));
    }

    #[tokio::test]
    async fn titulo_vazio_e_recusado() {
        let pool = pool_teste().await;
        let rui = criar_user(&pool, "Rui", "rui@example.com", "student").await;
        assert!(adicionar_atividade(&pool, &rui, "  ", None, None).await.is_err());
        assert!(adicionar_qualificacao(&pool, &rui, "", None, None).await.is_err());
    }
}
