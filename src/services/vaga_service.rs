// src/services/vaga_service.rs
use crate::{
    error::{AppError, AppResult},
    models::vaga::{VagaComScore, VagaRow},
    services::user_service,
};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Divide uma lista "a, b, c" no formato canónico: termos aparados,
/// vazios descartados.
pub fn parse_skills(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Pontuação de compatibilidade entre as skills de um utilizador e as de
/// uma vaga, de 0 a 100. Serve apenas para ordenar e exibir, nunca para
/// decidir elegibilidade.
///
/// Uma skill da vaga conta como coberta se contiver (ou estiver contida
/// em) alguma skill do utilizador, ignorando maiúsculas. Score =
/// round(cobertas / total_da_vaga * 100). Lista vazia de qualquer lado
/// dá 0, nunca erro.
pub fn calcular_compatibilidade(user_skills: &[String], vaga_skills: &[String]) -> i64 {
    if user_skills.is_empty() || vaga_skills.is_empty() {
        return 0;
    }

    let user_lower: Vec<String> = user_skills.iter().map(|s| s.to_lowercase()).collect();
    let cobertas = vaga_skills
        .iter()
        .filter(|vs| {
            let vs = vs.to_lowercase();
            user_lower.iter().any(|us| us.contains(&vs) || vs.contains(us))
        })
        .count();

    ((cobertas as f64 / vaga_skills.len() as f64) * 100.0).round() as i64
}

/// Lista as vagas com a pontuação calculada para este utilizador,
/// ordenadas da mais compatível para a menos.
pub async fn listar_vagas_para_user(
    pool: &SqlitePool,
    user_id: &str,
) -> AppResult<Vec<VagaComScore>> {
    let user = user_service::find_user_by_id(pool, user_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let user_skills = parse_skills(&user.skills);

    let rows = sqlx::query_as::<_, VagaRow>(
        r#"
        SELECT jp.id, jp.title, jp.description, jp.skills, jp.posted_at,
               c.name AS company_name,
               EXISTS(SELECT 1 FROM applications a WHERE a.job_id = jp.id AND a.user_id = ?)
                   AS ja_candidatado,
               EXISTS(SELECT 1 FROM saved_jobs s WHERE s.job_id = jp.id AND s.user_id = ?)
                   AS guardada
        FROM job_posts jp
        JOIN companies c ON jp.company_id = c.id
        ORDER BY jp.posted_at DESC
        "#,
    )
    .bind(user_id)
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let mut vagas: Vec<VagaComScore> = rows
        .into_iter()
        .map(|row| {
            let skills = parse_skills(&row.skills);
            let score = calcular_compatibilidade(&user_skills, &skills);
            VagaComScore {
                id: row.id,
                title: row.title,
                company_name: row.company_name,
                description: row.description,
                skills,
                posted_at: row.posted_at,
                score,
                ja_candidatado: row.ja_candidatado,
                guardada: row.guardada,
            }
        })
        .collect();

    // Mais compatíveis primeiro; empates resolvidos pela mais recente
    vagas.sort_by(|a, b| b.score.cmp(&a.score).then(b.posted_at.cmp(&a.posted_at)));
    Ok(vagas)
}

/// Regista uma candidatura. Repetir a candidatura não duplica nada.
pub async fn candidatar(pool: &SqlitePool, user_id: &str, vaga_id: &str) -> Result<String, String> {
    let vaga = sqlx::query_as::<_, (String,)>("SELECT title FROM job_posts WHERE id = ?")
        .bind(vaga_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| e.to_string())?;
    let (titulo,) = match vaga {
        Some(v) => v,
        None => return Err("Vaga não encontrada.".into()),
    };

    let id = Uuid::new_v4().to_string();
    let res = sqlx::query(
        "INSERT OR IGNORE INTO applications (id, job_id, user_id) VALUES (?, ?, ?)",
    )
    .bind(&id)
    .bind(vaga_id)
    .bind(user_id)
    .execute(pool)
    .await
    .map_err(|e| e.to_string())?;

    if res.rows_affected() == 0 {
        return Ok("Já se tinha candidatado a esta vaga.".into());
    }
    tracing::info!("Candidatura de {} à vaga '{}'.", user_id, titulo);
    Ok(format!("Candidatura registada para '{}'.", titulo))
}

/// Guarda uma vaga na lista pessoal do utilizador.
pub async fn guardar_vaga(pool: &SqlitePool, user_id: &str, vaga_id: &str) -> Result<String, String> {
    let existe: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM job_posts WHERE id = ?)")
        .bind(vaga_id)
        .fetch_one(pool)
        .await
        .map_err(|e| e.to_string())?;
    if !existe {
        return Err("Vaga não encontrada.".into());
    }

    sqlx::query("INSERT OR IGNORE INTO saved_jobs (user_id, job_id) VALUES (?, ?)")
        .bind(user_id)
        .bind(vaga_id)
        .execute(pool)
        .await
        .map_err(|e| e.to_string())?;
    Ok("Vaga guardada.".into())
}

/// Remove uma vaga da lista pessoal.
pub async fn esquecer_vaga(pool: &SqlitePool, user_id: &str, vaga_id: &str) -> Result<String, String> {
    let res = sqlx::query("DELETE FROM saved_jobs WHERE user_id = ? AND job_id = ?")
        .bind(user_id)
        .bind(vaga_id)
        .execute(pool)
        .await
        .map_err(|e| e.to_string())?;

    if res.rows_affected() == 0 {
        return Err("Esta vaga não estava guardada.".into());
    }
    Ok("Vaga removida da sua lista.".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::apoio_teste::{criar_user, pool_teste};

    fn skills(lista: &[&str]) -> Vec<String> {
        lista.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_skills_normaliza_a_lista() {
        assert_eq!(parse_skills(" python , ensino ,,vídeo "), skills(&["python", "ensino", "vídeo"]));
        assert_eq!(parse_skills(""), Vec::<String>::new());
        assert_eq!(parse_skills(" , , "), Vec::<String>::new());
    }

    #[test]
    fn listas_vazias_pontuam_zero() {
        assert_eq!(calcular_compatibilidade(&skills(&["ensino"]), &[]), 0);
        assert_eq!(calcular_compatibilidade(&[], &skills(&["ensino"])), 0);
        assert_eq!(calcular_compatibilidade(&[], &[]), 0);
    }

    #[test]
    fn cobertura_total_pontua_cem() {
        let user = skills(&["Ensino", "MATEMÁTICA"]);
        let vaga = skills(&["matemática", "ensino"]);
        assert_eq!(calcular_compatibilidade(&user, &vaga), 100);
    }

    #[test]
    fn substring_conta_nos_dois_sentidos() {
        // "ensino" do utilizador cobre "ensino secundário" da vaga e vice-versa
        let user = skills(&["ensino"]);
        let vaga = skills(&["ensino secundário"]);
        assert_eq!(calcular_compatibilidade(&user, &vaga), 100);

        let user = skills(&["design gráfico"]);
        let vaga = skills(&["design"]);
        assert_eq!(calcular_compatibilidade(&user, &vaga), 100);
    }

    #[test]
    fn cobertura_parcial_arredonda() {
        let user = skills(&["python"]);
        let vaga = skills(&["python", "sql", "docker"]);
        // 1/3 -> 33
        assert_eq!(calcular_compatibilidade(&user, &vaga), 33);

        let vaga = skills(&["python", "sql"]);
        assert_eq!(calcular_compatibilidade(&user, &vaga), 50);
    }

    #[tokio::test]
    async fn listagem_ordena_por_compatibilidade() {
        let pool = pool_teste().await;
        let rui = criar_user(&pool, "Rui", "rui@example.com", "student").await;
        sqlx::query("UPDATE users SET skills = 'matemática,ensino' WHERE id = ?")
            .bind(&rui)
            .execute(&pool)
            .await
            .unwrap();

        let vagas = listar_vagas_para_user(&pool, &rui).await.unwrap();
        assert!(!vagas.is_empty());
        // Ordem não crescente de score
        for par in vagas.windows(2) {
            assert!(par[0].score >= par[1].score);
        }
        // A vaga de explicador (matemática,ensino,comunicação) deve vir primeiro: 2/3 -> 67
        assert_eq!(vagas[0].title, "Explicador de Matemática (part-time)");
        assert_eq!(vagas[0].score, 67);
    }

    #[tokio::test]
    async fn candidatura_repetida_nao_duplica() {
        let pool = pool_teste().await;
        let rui = criar_user(&pool, "Rui", "rui@example.com", "student").await;
        let vaga = "0b100000-0000-4000-8000-000000000001"; // seed

        candidatar(&pool, &rui, vaga).await.unwrap();
        let msg = candidatar(&pool, &rui, vaga).await.unwrap();
        assert!(msg.contains("Já se tinha candidatado"));

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM applications")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn guardar_e_esquecer_vaga() {
        let pool = pool_teste().await;
        let rui = criar_user(&pool, "Rui", "rui@example.com", "student").await;
        let vaga = "0b100000-0000-4000-8000-000000000002"; // seed

        guardar_vaga(&pool, &rui, vaga).await.unwrap();
        esquecer_vaga(&pool, &rui, vaga).await.unwrap();
        // Já não está guardada
        assert!(esquecer_vaga(&pool, &rui, vaga).await.is_err());
    }
}
