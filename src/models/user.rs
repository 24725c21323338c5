// src/models/user.rs
use serde::Deserialize;
use sqlx::FromRow;

// Representa um utilizador lido da tabela 'users'
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,   // "admin" | "mentor" | "student"
    pub status: String, // "active" | "pending" | "inactive"
    pub skills: String, // lista separada por vírgulas (ex: "ensino,python")
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

// Struct para dados do formulário de login
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}
