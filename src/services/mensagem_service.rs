// src/services/mensagem_service.rs
use crate::{error::AppResult, models::mensagem::MensagemRecebida};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Envia uma mensagem para o utilizador com o email indicado.
/// Entrega simples via caixa de entrada: nada de tempo real.
pub async fn enviar_mensagem(
    pool: &SqlitePool,
    sender_id: &str,
    para_email: &str,
    subject: Option<&str>,
    body: &str,
) -> Result<String, String> {
    let body = body.trim();
    if body.is_empty() {
        return Err("A mensagem não pode estar vazia.".into());
    }

    let destinatario = sqlx::query_as::<_, (String, String)>(
        "SELECT id, name FROM users WHERE email = ?",
    )
    .bind(para_email.trim())
    .fetch_optional(pool)
    .await
    .map_err(|e| e.to_string())?;

    let (recipient_id, recipient_name) = match destinatario {
        Some(d) => d,
        None => return Err("Não existe nenhum utilizador com esse email.".into()),
    };

    let id = Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO messages (id, sender_id, recipient_id, subject, body) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(sender_id)
    .bind(&recipient_id)
    .bind(subject.map(|s| s.trim()).filter(|s| !s.is_empty()))
    .bind(body)
    .execute(pool)
    .await
    .map_err(|e| e.to_string())?;

    tracing::info!("✉️ Mensagem {} enviada para {}.", id, recipient_id);
    Ok(format!("Mensagem enviada para {}.", recipient_name))
}

/// Caixa de entrada do utilizador, mais recentes primeiro.
pub async fn listar_recebidas(
    pool: &SqlitePool,
    user_id: &str,
) -> AppResult<Vec<MensagemRecebida>> {
    let mensagens = sqlx::query_as::<_, MensagemRecebida>(
        r#"
        SELECT m.id, m.sender_id, u.name AS sender_name, m.subject, m.body,
               m.is_read, m.sent_at
        FROM messages m
        JOIN users u ON m.sender_id = u.id
        WHERE m.recipient_id = ?
        ORDER BY m.sent_at DESC, m.rowid DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(mensagens)
}

/// Marca uma mensagem como lida. Só o destinatário pode.
pub async fn marcar_lida(
    pool: &SqlitePool,
    user_id: &str,
    mensagem_id: &str,
) -> Result<String, String> {
    let res = sqlx::query("UPDATE messages SET is_read = 1 WHERE id = ? AND recipient_id = ?")
        .bind(mensagem_id)
        .bind(user_id)
        .execute(pool)
        .await
        .map_err(|e| e.to_string())?;

    if res.rows_affected() == 0 {
        return Err("Mensagem não encontrada.".into());
    }
    Ok("Mensagem marcada como lida.".into())
}

/// Número de mensagens por ler (badge do painel).
pub async fn contar_nao_lidas(pool: &SqlitePool, user_id: &str) -> AppResult<i64> {
    let total = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM messages WHERE recipient_id = ? AND is_read = 0",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::apoio_teste::{criar_user, pool_teste};

    #[tokio::test]
    async fn envia_e_aparece_na_caixa_de_entrada() {
        let pool = pool_teste().await;
        let ana = criar_user(&pool, "Mentora Ana", "ana@example.com", "mentor").await;
        let rui = criar_user(&pool, "Rui", "rui@example.com", "student").await;

        enviar_mensagem(&pool, &ana, "rui@example.com", Some("Sessão de quinta"), "Podemos passar para as 17h?")
            .await
            .unwrap();

        let inbox = listar_recebidas(&pool, &rui).await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].sender_name, "Mentora Ana");
        assert_eq!(inbox[0].subject.as_deref(), Some("Sessão de quinta"));
        assert!(!inbox[0].is_read);
        assert_eq!(contar_nao_lidas(&pool, &rui).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn destinatario_desconhecido_da_erro() {
        let pool = pool_teste().await;
        let ana = criar_user(&pool, "Mentora Ana", "ana@example.com", "mentor").await;
        let err = enviar_mensagem(&pool, &ana, "fantasma@example.com", None, "olá")
            .await
            .unwrap_err();
        assert!(err.contains("Não existe nenhum utilizador"));
    }

    #[tokio::test]
    async fn so_o_destinatario_marca_como_lida() {
        let pool = pool_teste().await;
        let ana = criar_user(&pool, "Mentora Ana", "ana@example.com", "mentor").await;
        let rui = criar_user(&pool, "Rui", "rui@example.com", "student").await;
        enviar_mensagem(&pool, &ana, "rui@example.com", None, "olá").await.unwrap();
        let id = listar_recebidas(&pool, &rui).await.unwrap()[0].id.clone();

        // O remetente não consegue marcar a mensagem do destinatário
        assert!(marcar_lida(&pool, &ana, &id).await.is_err());

        marcar_lida(&pool, &rui, &id).await.unwrap();
        assert_eq!(contar_nao_lidas(&pool, &rui).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn mensagem_vazia_e_recusada() {
        let pool = pool_teste().await;
        let ana = criar_user(&pool, "Mentora Ana", "ana@example.com", "mentor").await;
        criar_user(&pool, "Rui", "rui@example.com", "student").await;
        assert!(enviar_mensagem(&pool, &ana, "rui@example.com", None, "   ").await.is_err());
    }
}
