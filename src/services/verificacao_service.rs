// src/services/verificacao_service.rs
use crate::{
    error::AppResult,
    models::verificacao::{EstadoVerificacao, PedidoVerificacao},
};
use sqlx::SqlitePool;
use uuid::Uuid;

const PEDIDO_COLUMNS: &str = "id, student_id, student_email, document_ref, status, \
                              rejection_reason, submitted_at, resolved_at";

/// Submete um pedido de verificação de perfil.
///
/// Este é o único caminho de escrita para criar pedidos. É idempotente:
/// se já existir um pedido pendente para o email, não cria um segundo.
/// Depois de uma rejeição, uma nova submissão cria um pedido novo; o
/// pedido rejeitado fica no histórico, sem ligação ao novo.
pub async fn submeter_pedido(
    pool: &SqlitePool,
    student_id: &str,
    student_email: &str,
    document_ref: &str,
) -> Result<String, String> {
    let document_ref = document_ref.trim();
    if document_ref.is_empty() {
        return Err("Indique o documento que comprova o seu perfil.".into());
    }

    let pendente = sqlx::query_as::<_, (String,)>(
        "SELECT id FROM approvals WHERE student_email = ? COLLATE NOCASE AND status = 'pending' LIMIT 1",
    )
    .bind(student_email)
    .fetch_optional(pool)
    .await
    .map_err(|e| e.to_string())?;

    if pendente.is_some() {
        tracing::debug!("Pedido pendente já existe para {}, nada a fazer.", student_email);
        return Ok("Já existe um pedido de verificação pendente para o seu perfil.".into());
    }

    let id = Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO approvals (id, student_id, student_email, document_ref) VALUES (?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(student_id)
    .bind(student_email)
    .bind(document_ref)
    .execute(pool)
    .await
    .map_err(|e| e.to_string())?;

    tracing::info!("📄 Pedido de verificação {} criado para {}.", id, student_email);
    Ok("Pedido de verificação submetido. Aguarde a revisão de um administrador.".into())
}

/// Aprova um pedido pendente. Uma única escrita guarda o resultado; o
/// estado visível do estudante é derivado deste registo, por isso não há
/// sucesso parcial possível.
pub async fn aprovar_pedido(pool: &SqlitePool, pedido_id: &str) -> Result<String, String> {
    let res = sqlx::query(
        "UPDATE approvals SET status = 'approved', resolved_at = datetime('now') \
         WHERE id = ? AND status = 'pending'",
    )
    .bind(pedido_id)
    .execute(pool)
    .await
    .map_err(|e| e.to_string())?;

    if res.rows_affected() == 0 {
        return Err("Pedido não encontrado ou já resolvido.".into());
    }
    tracing::info!("✅ Pedido {} aprovado.", pedido_id);
    Ok("Pedido aprovado. O perfil passa a constar como verificado.".into())
}

/// Rejeita um pedido pendente. O motivo é obrigatório e fica guardado no
/// próprio pedido, junto com a data de resolução.
pub async fn rejeitar_pedido(
    pool: &SqlitePool,
    pedido_id: &str,
    motivo: &str,
) -> Result<String, String> {
    let motivo = motivo.trim();
    if motivo.is_empty() {
        return Err("É obrigatório indicar o motivo da rejeição.".into());
    }

    let res = sqlx::query(
        "UPDATE approvals SET status = 'rejected', rejection_reason = ?, resolved_at = datetime('now') \
         WHERE id = ? AND status = 'pending'",
    )
    .bind(motivo)
    .bind(pedido_id)
    .execute(pool)
    .await
    .map_err(|e| e.to_string())?;

    if res.rows_affected() == 0 {
        return Err("Pedido não encontrado ou já resolvido.".into());
    }
    tracing::info!("Pedido {} rejeitado: {}", pedido_id, motivo);
    Ok("Pedido rejeitado.".into())
}

/// O estado de verificação efetivo de um perfil: deriva do pedido mais
/// recente. É esta a API de leitura que todas as páginas usam.
pub async fn estado_para_email(pool: &SqlitePool, email: &str) -> AppResult<EstadoVerificacao> {
    let ultimo = sqlx::query_as::<_, (String,)>(
        "SELECT status FROM approvals WHERE student_email = ? COLLATE NOCASE \
         ORDER BY submitted_at DESC, rowid DESC LIMIT 1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(match ultimo {
        None => EstadoVerificacao::NaoVerificado,
        Some((status,)) => EstadoVerificacao::from_request_status(&status),
    })
}

/// Fila de revisão do admin: pedidos pendentes, mais antigos primeiro.
pub async fn listar_pendentes(pool: &SqlitePool) -> AppResult<Vec<PedidoVerificacao>> {
    let query = format!(
        "SELECT {} FROM approvals WHERE status = 'pending' ORDER BY submitted_at ASC, rowid ASC",
        PEDIDO_COLUMNS
    );
    let pedidos = sqlx::query_as::<_, PedidoVerificacao>(&query)
        .fetch_all(pool)
        .await?;
    Ok(pedidos)
}

/// Histórico completo de pedidos de um email (pode mostrar uma rejeição
/// antiga seguida de um pedido pendente novo, sem ligação entre eles).
pub async fn historico_para_email(
    pool: &SqlitePool,
    email: &str,
) -> AppResult<Vec<PedidoVerificacao>> {
    let query = format!(
        "SELECT {} FROM approvals WHERE student_email = ? COLLATE NOCASE \
         ORDER BY submitted_at DESC, rowid DESC",
        PEDIDO_COLUMNS
    );
    let pedidos = sqlx::query_as::<_, PedidoVerificacao>(&query)
        .bind(email)
        .fetch_all(pool)
        .await?;
    Ok(pedidos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::apoio_teste::{criar_user, pool_teste};

    async fn pedido_pendente_id(pool: &SqlitePool, email: &str) -> String {
        sqlx::query_as::<_, (String,)>(
            "SELECT id FROM approvals WHERE student_email = ? AND status = 'pending'",
        )
        .bind(email)
        .fetch_one(pool)
        .await
        .unwrap()
        .0
    }

    #[tokio::test]
    async fn submeter_duas_vezes_cria_um_unico_pedido() {
        let pool = pool_teste().await;
        let rui = criar_user(&pool, "Rui", "rui@example.com", "student").await;

        submeter_pedido(&pool, &rui, "rui@example.com", "cartao-estudante.pdf").await.unwrap();
        submeter_pedido(&pool, &rui, "rui@example.com", "cartao-estudante.pdf").await.unwrap();

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM approvals")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(
            estado_para_email(&pool, "rui@example.com").await.unwrap(),
            EstadoVerificacao::Pendente
        );
    }

    #[tokio::test]
    async fn aprovar_torna_o_estado_verificado() {
        let pool = pool_teste().await;
        let rui = criar_user(&pool, "Rui", "rui@example.com", "student").await;
        submeter_pedido(&pool, &rui, "rui@example.com", "doc.pdf").await.unwrap();
        let pedido = pedido_pendente_id(&pool, "rui@example.com").await;

        aprovar_pedido(&pool, &pedido).await.unwrap();

        assert_eq!(
            estado_para_email(&pool, "rui@example.com").await.unwrap(),
            EstadoVerificacao::Verificado
        );
        let status: String = sqlx::query_scalar("SELECT status FROM approvals WHERE id = ?")
            .bind(&pedido)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(status, "approved");

        // Aprovar de novo falha: já não está pendente
        assert!(aprovar_pedido(&pool, &pedido).await.is_err());
    }

    #[tokio::test]
    async fn rejeitar_exige_motivo_e_guarda_o_texto() {
        let pool = pool_teste().await;
        let rui = criar_user(&pool, "Rui", "rui@example.com", "student").await;
        submeter_pedido(&pool, &rui, "rui@example.com", "doc.pdf").await.unwrap();
        let pedido = pedido_pendente_id(&pool, "rui@example.com").await;

        // Sem motivo não há rejeição
        assert!(rejeitar_pedido(&pool, &pedido, "   ").await.is_err());

        rejeitar_pedido(&pool, &pedido, "Documentos expirados.").await.unwrap();

        let guardado: Option<String> =
            sqlx::query_scalar("SELECT rejection_reason FROM approvals WHERE id = ?")
                .bind(&pedido)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(guardado.as_deref(), Some("Documentos expirados."));
        assert_eq!(
            estado_para_email(&pool, "rui@example.com").await.unwrap(),
            EstadoVerificacao::Rejeitado
        );
    }

    #[tokio::test]
    async fn resubmeter_depois_de_rejeicao_cria_pedido_novo_e_mantem_o_antigo() {
        let pool = pool_teste().await;
        let rui = criar_user(&pool, "Rui", "rui@example.com", "student").await;
        submeter_pedido(&pool, &rui, "rui@example.com", "doc-v1.pdf").await.unwrap();
        let primeiro = pedido_pendente_id(&pool, "rui@example.com").await;
        rejeitar_pedido(&pool, &primeiro, "Ilegível.").await.unwrap();

        submeter_pedido(&pool, &rui, "rui@example.com", "doc-v2.pdf").await.unwrap();

        let historico = historico_para_email(&pool, "rui@example.com").await.unwrap();
        assert_eq!(historico.len(), 2);
        // O mais recente é o pendente; o rejeitado continua no histórico
        assert_eq!(historico[0].status, "pending");
        assert_eq!(historico[1].status, "rejected");
        assert_eq!(
            estado_para_email(&pool, "rui@example.com").await.unwrap(),
            EstadoVerificacao::Pendente
        );
    }

    #[tokio::test]
    async fn sem_pedidos_o_estado_e_nao_verificado() {
        let pool = pool_teste().await;
        assert_eq!(
            estado_para_email(&pool, "ninguem@example.com").await.unwrap(),
            EstadoVerificacao::NaoVerificado
        );
    }
}
