// src/services/apoio_teste.rs
// Utilitários partilhados pelos testes dos serviços.
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Pool SQLite em memória com o esquema migrado.
/// max_connections(1) porque cada conexão :memory: teria a sua própria DB.
pub async fn pool_teste() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("criar pool em memória");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrar esquema");
    pool
}

/// Insere um utilizador diretamente, sem passar pelo bcrypt (que tornaria
/// cada teste visivelmente mais lento).
pub async fn criar_user(pool: &SqlitePool, name: &str, email: &str, role: &str) -> String {
    let id = Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO users (id, name, email, password_hash, role, status) \
         VALUES (?, ?, ?, 'hash-de-teste', ?, 'active')",
    )
    .bind(&id)
    .bind(name)
    .bind(email)
    .bind(role)
    .execute(pool)
    .await
    .expect("inserir utilizador de teste");
    id
}
