// src/templates.rs
use askama::Template;
use crate::models::{
    evento::Evento,
    mensagem::MensagemRecebida,
    mentoria::AssignmentRow,
    perfil::{Atividade, Qualificacao},
    user::User,
    vaga::VagaComScore,
    verificacao::PedidoVerificacao,
};

// Struct para o template `login.html` (ficheiro externo em templates/)
#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    // Campo opcional para passar uma mensagem de erro para o template
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "painel.html")]
pub struct PainelPage {
    pub user_name: String,
    pub role: String,
    pub is_admin: bool,
    pub estado_verificacao: String,
    pub nao_lidas: i64,
    pub eventos: Vec<Evento>,
}

#[derive(Template)]
#[template(path = "perfil.html")]
pub struct PerfilPage {
    pub user_name: String,
    pub email: String,
    pub role: String,
    pub skills: Vec<String>,
    pub estado: String,
    // Um estudante só pode submeter se não houver pedido pendente nem
    // perfil já verificado
    pub pode_submeter: bool,
    pub historico: Vec<PedidoVerificacao>,
    pub atividades: Vec<Atividade>,
    pub qualificacoes: Vec<Qualificacao>,
    pub mentor_nome: Option<String>,
    pub success_message: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Template)]
#[template(path = "cv.html")]
pub struct CvPage {
    pub user_name: String,
    pub email: String,
    pub verificado: bool,
    pub skills: Vec<String>,
    pub qualificacoes: Vec<Qualificacao>,
    pub atividades: Vec<Atividade>,
    pub mentor_nome: Option<String>,
    pub gerado_em: String,
}

#[derive(Template)]
#[template(path = "mensagens.html")]
pub struct MensagensPage {
    pub mensagens: Vec<MensagemRecebida>,
    pub success_message: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Template)]
#[template(path = "vagas.html")]
pub struct VagasPage {
    pub vagas: Vec<VagaComScore>,
    pub success_message: Option<String>,
    pub error_message: Option<String>,
}

// Linha da tabela de /admin/users: o utilizador mais a informação de
// mentoria derivada dos índices (mentor do estudante / nº de estudantes
// do mentor)
#[derive(Clone, Debug)]
pub struct UserAdminRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub status: String,
    pub mentor_nome: Option<String>,
    pub num_estudantes: usize,
}

#[derive(Template)]
#[template(path = "admin_users.html")]
pub struct AdminUsersPage {
    pub users: Vec<UserAdminRow>,
    pub success_message: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Template)]
#[template(path = "admin_edit_user.html")]
pub struct AdminEditUserPage {
    pub user: Option<User>,
    pub all_roles: &'static [&'static str],
    pub all_statuses: &'static [&'static str],
    pub error_message: Option<String>,
}

impl AdminEditUserPage {
    /// O papel/estado selecionado no formulário
    pub fn tem_role(&self, role: &str) -> bool {
        self.user.as_ref().map_or(false, |u| u.role == role)
    }

    pub fn tem_status(&self, status: &str) -> bool {
        self.user.as_ref().map_or(false, |u| u.status == status)
    }
}

#[derive(Template)]
#[template(path = "admin_verificacoes.html")]
pub struct AdminVerificacoesPage {
    pub pedidos: Vec<PedidoVerificacao>,
    pub success_message: Option<String>,
    pub error_message: Option<String>,
}

// Carga de cada mentor na página de mentoria (nome + nº de estudantes)
#[derive(Clone, Debug)]
pub struct MentorCarga {
    pub id: String,
    pub name: String,
    pub num_estudantes: usize,
}

#[derive(Template)]
#[template(path = "admin_mentoria.html")]
pub struct AdminMentoriaPage {
    pub atribuicoes: Vec<AssignmentRow>,
    pub mentores: Vec<MentorCarga>,
    pub estudantes: Vec<User>,
    pub success_message: Option<String>,
    pub error_message: Option<String>,
}
