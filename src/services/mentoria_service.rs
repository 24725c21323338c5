// src/services/mentoria_service.rs
use crate::models::mentoria::{AssignmentRow, MentoriaIndex};
use sqlx::SqlitePool;

const ASSIGNMENT_SELECT: &str = r#"
    SELECT ms.mentor_id, um.name AS mentor_name,
           ms.student_id, ue.name AS student_name,
           ms.assigned_date, ms.notes
    FROM mentor_student ms
    JOIN users um ON ms.mentor_id = um.id
    JOIN users ue ON ms.student_id = ue.id
"#;

/// Carrega todas as atribuições mentor<->estudante, com nomes resolvidos.
pub async fn load_all_assignments(pool: &SqlitePool) -> Result<Vec<AssignmentRow>, String> {
    let query = format!("{} ORDER BY um.name ASC, ue.name ASC", ASSIGNMENT_SELECT);
    sqlx::query_as::<_, AssignmentRow>(&query)
        .fetch_all(pool)
        .await
        .map_err(|e| e.to_string())
}

/// Reconstrói os índices derivados a partir da lista completa.
/// É assim que as páginas respondem "quem mentora quem" e "quantos
/// estudantes tem o mentor X" sem voltar à base de dados por linha.
pub async fn load_index(pool: &SqlitePool) -> Result<MentoriaIndex, String> {
    let rows = load_all_assignments(pool).await?;
    Ok(MentoriaIndex::from_rows(&rows))
}

/// Atribui um estudante a um mentor.
///
/// Tudo acontece numa única transação: valida os papéis, remove o vínculo
/// anterior do estudante (se existir) e insere o novo. Não há estado
/// intermédio observável "sem mentor" durante uma reatribuição, e o
/// UNIQUE(student_id) da tabela garante no máximo um mentor por estudante
/// mesmo com dois admins a trabalhar ao mesmo tempo.
pub async fn assign_student_to_mentor(
    pool: &SqlitePool,
    mentor_id: &str,
    student_id: &str,
    notes: Option<&str>,
) -> Result<String, String> {
    let mut tx = pool.begin().await.map_err(|e| e.to_string())?;

    // 1. Validar que o mentor existe e tem o papel certo
    let mentor = sqlx::query_as::<_, (String, String)>("SELECT name, role FROM users WHERE id = ?")
        .bind(mentor_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| e.to_string())?;
    let (mentor_name, mentor_role) = match mentor {
        Some(m) => m,
        None => return Err("Mentor não encontrado.".into()),
    };
    if mentor_role != "mentor" {
        return Err(format!("'{}' não tem o papel de mentor.", mentor_name));
    }

    // 2. Validar o estudante
    let estudante = sqlx::query_as::<_, (String, String)>("SELECT name, role FROM users WHERE id = ?")
        .bind(student_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| e.to_string())?;
    let (student_name, student_role) = match estudante {
        Some(e) => e,
        None => return Err("Estudante não encontrado.".into()),
    };
    if student_role != "student" {
        return Err(format!("'{}' não tem o papel de estudante.", student_name));
    }

    // 3. Remover o vínculo anterior e inserir o novo (reatribuição atómica)
    sqlx::query("DELETE FROM mentor_student WHERE student_id = ?")
        .bind(student_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| e.to_string())?;

    sqlx::query("INSERT INTO mentor_student (mentor_id, student_id, notes) VALUES (?, ?, ?)")
        .bind(mentor_id)
        .bind(student_id)
        .bind(notes)
        .execute(&mut *tx)
        .await
        .map_err(|e| e.to_string())?;

    tx.commit().await.map_err(|e| e.to_string())?;

    tracing::info!("✅ Estudante '{}' atribuído ao mentor '{}'.", student_name, mentor_name);
    Ok(format!("Estudante '{}' atribuído ao mentor '{}'.", student_name, mentor_name))
}

/// Remove a atribuição de um estudante (qualquer que seja o mentor).
/// Chamar duas vezes seguidas não corrompe nada: a segunda chamada apenas
/// devolve erro por não haver nada para remover.
pub async fn unassign_student(pool: &SqlitePool, student_id: &str) -> Result<String, String> {
    let res = sqlx::query("DELETE FROM mentor_student WHERE student_id = ?")
        .bind(student_id)
        .execute(pool)
        .await
        .map_err(|e| e.to_string())?;

    if res.rows_affected() == 0 {
        return Err("Este estudante não tem mentor atribuído.".into());
    }
    tracing::info!("Atribuição removida para o estudante {}.", student_id);
    Ok("Atribuição removida.".into())
}

/// Lista os estudantes de um mentor específico.
pub async fn students_for_mentor(
    pool: &SqlitePool,
    mentor_id: &str,
) -> Result<Vec<AssignmentRow>, String> {
    let query = format!("{} WHERE ms.mentor_id = ? ORDER BY ue.name ASC", ASSIGNMENT_SELECT);
    sqlx::query_as::<_, AssignmentRow>(&query)
        .bind(mentor_id)
        .fetch_all(pool)
        .await
        .map_err(|e| e.to_string())
}

/// O mentor de um estudante, se existir.
pub async fn mentor_for_student(
    pool: &SqlitePool,
    student_id: &str,
) -> Result<Option<AssignmentRow>, String> {
    let query = format!("{} WHERE ms.student_id = ?", ASSIGNMENT_SELECT);
    sqlx::query_as::<_, AssignmentRow>(&query)
        .bind(student_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::apoio_teste::{criar_user, pool_teste};

    #[tokio::test]
    async fn atribuir_atualiza_ambos_os_indices() {
        let pool = pool_teste().await;
        let mentora = criar_user(&pool, "Mentora Ana", "ana@example.com", "mentor").await;
        let rui = criar_user(&pool, "Rui", "rui@example.com", "student").await;

        assign_student_to_mentor(&pool, &mentora, &rui, Some("primeiro semestre"))
            .await
            .unwrap();

        let index = load_index(&pool).await.unwrap();
        assert_eq!(index.mentor_name_for_student(&rui), Some("Mentora Ana"));
        assert_eq!(index.student_count_for_mentor(&mentora), 1);
    }

    #[tokio::test]
    async fn reatribuir_move_a_contagem_entre_mentores() {
        let pool = pool_teste().await;
        let m1 = criar_user(&pool, "Mentora Ana", "ana@example.com", "mentor").await;
        let m2 = criar_user(&pool, "Mentor Bruno", "bruno@example.com", "mentor").await;
        let rui = criar_user(&pool, "Rui", "rui@example.com", "student").await;

        assign_student_to_mentor(&pool, &m1, &rui, None).await.unwrap();
        assign_student_to_mentor(&pool, &m2, &rui, None).await.unwrap();

        let index = load_index(&pool).await.unwrap();
        assert_eq!(index.mentor_name_for_student(&rui), Some("Mentor Bruno"));
        assert_eq!(index.student_count_for_mentor(&m1), 0);
        assert_eq!(index.student_count_for_mentor(&m2), 1);

        // Na base de dados só existe uma linha para este estudante
        let linhas: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM mentor_student WHERE student_id = ?")
            .bind(&rui)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(linhas, 1);
    }

    #[tokio::test]
    async fn remover_deixa_o_estudante_sem_mentor() {
        let pool = pool_teste().await;
        let mentora = criar_user(&pool, "Mentora Ana", "ana@example.com", "mentor").await;
        let rui = criar_user(&pool, "Rui", "rui@example.com", "student").await;

        assign_student_to_mentor(&pool, &mentora, &rui, None).await.unwrap();
        unassign_student(&pool, &rui).await.unwrap();

        let index = load_index(&pool).await.unwrap();
        assert_eq!(index.mentor_name_for_student(&rui), None);
        assert_eq!(index.student_count_for_mentor(&mentora), 0);
    }

    #[tokio::test]
    async fn remover_duas_vezes_nao_corrompe_o_indice() {
        let pool = pool_teste().await;
        let mentora = criar_user(&pool, "Mentora Ana", "ana@example.com", "mentor").await;
        let rui = criar_user(&pool, "Rui", "rui@example.com", "student").await;

        assign_student_to_mentor(&pool, &mentora, &rui, None).await.unwrap();
        assert!(unassign_student(&pool, &rui).await.is_ok());
        // A segunda remoção falha, mas sem efeitos colaterais
        assert!(unassign_student(&pool, &rui).await.is_err());

        let index = load_index(&pool).await.unwrap();
        assert_eq!(index.student_count_for_mentor(&mentora), 0);
    }

    #[tokio::test]
    async fn nao_atribui_a_quem_nao_e_mentor() {
        let pool = pool_teste().await;
        let falso = criar_user(&pool, "Carla", "carla@example.com", "student").await;
        let rui = criar_user(&pool, "Rui", "rui@example.com", "student").await;

        let err = assign_student_to_mentor(&pool, &falso, &rui, None).await.unwrap_err();
        assert!(err.contains("não tem o papel de mentor"));
    }

    #[tokio::test]
    async fn consulta_por_mentor_e_por_estudante() {
        let pool = pool_teste().await;
        let mentora = criar_user(&pool, "Mentora Ana", "ana@example.com", "mentor").await;
        let rui = criar_user(&pool, "Rui", "rui@example.com", "student").await;
        let ines = criar_user(&pool, "Inês", "ines@example.com", "student").await;

        assign_student_to_mentor(&pool, &mentora, &rui, None).await.unwrap();
        assign_student_to_mentor(&pool, &mentora, &ines, None).await.unwrap();

        let do_mentor = students_for_mentor(&pool, &mentora).await.unwrap();
        assert_eq!(do_mentor.len(), 2);

        let do_estudante = mentor_for_student(&pool, &rui).await.unwrap().unwrap();
        assert_eq!(do_estudante.mentor_name, "Mentora Ana");

        assert!(mentor_for_student(&pool, "sem-mentor").await.unwrap().is_none());
    }
}
