// src/services/mod.rs
pub mod auth_service;
pub mod mensagem_service;
pub mod mentoria_service;
pub mod perfil_service;
pub mod user_service;
pub mod vaga_service;
pub mod verificacao_service;

#[cfg(test)]
pub mod apoio_teste;
