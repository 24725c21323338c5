// src/models/mentoria.rs
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;

/// Uma linha da tabela `mentor_student` já com os nomes resolvidos
/// (JOIN com `users` duas vezes). É a forma que tanto as páginas de
/// administração como a API JSON consomem.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssignmentRow {
    pub mentor_id: String,
    pub mentor_name: String,
    pub student_id: String,
    pub student_name: String,
    pub assigned_date: String,
    pub notes: Option<String>,
}

/// Referência leve a um mentor, guardada no índice invertido.
#[derive(Debug, Clone, Serialize)]
pub struct MentorRef {
    pub id: String,
    pub name: String,
}

/// Índices derivados da lista completa de atribuições.
///
/// `mentor_to_students` responde "quantos estudantes tem o mentor X";
/// `student_to_mentor` responde "quem é o mentor do estudante Y".
/// A tabela tem UNIQUE(student_id), por isso o índice invertido é
/// single-valued por construção.
#[derive(Debug, Default)]
pub struct MentoriaIndex {
    mentor_to_students: HashMap<String, Vec<String>>,
    student_to_mentor: HashMap<String, MentorRef>,
}

impl MentoriaIndex {
    pub fn from_rows(rows: &[AssignmentRow]) -> Self {
        let mut index = MentoriaIndex::default();
        for row in rows {
            index
                .mentor_to_students
                .entry(row.mentor_id.clone())
                .or_default()
                .push(row.student_id.clone());
            index.student_to_mentor.insert(
                row.student_id.clone(),
                MentorRef {
                    id: row.mentor_id.clone(),
                    name: row.mentor_name.clone(),
                },
            );
        }
        index
    }

    /// Quantos estudantes estão atribuídos a este mentor (0 se nenhum).
    pub fn student_count_for_mentor(&self, mentor_id: &str) -> usize {
        self.mentor_to_students
            .get(mentor_id)
            .map(|s| s.len())
            .unwrap_or(0)
    }

    pub fn mentor_for_student(&self, student_id: &str) -> Option<&MentorRef> {
        self.student_to_mentor.get(student_id)
    }

    /// Nome do mentor do estudante, ou None se não tiver mentor.
    pub fn mentor_name_for_student(&self, student_id: &str) -> Option<&str> {
        self.student_to_mentor
            .get(student_id)
            .map(|m| m.name.as_str())
    }
}

/// Corpo do POST /api/admin/mentorship
#[derive(Debug, Deserialize)]
pub struct AssignPayload {
    pub mentor_id: String,
    pub student_id: String,
    pub notes: Option<String>,
}

/// Query string do DELETE /api/admin/mentorship
/// O campo `reason` é aceite mas não é persistido em lado nenhum.
#[derive(Debug, Deserialize)]
pub struct UnassignParams {
    pub student_id: String,
    #[allow(dead_code)]
    pub reason: Option<String>,
}

/// Formulário da página /admin/mentoria
#[derive(Debug, Deserialize)]
pub struct AtribuirForm {
    pub mentor_id: String,
    pub student_id: String,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(mentor: &str, student: &str) -> AssignmentRow {
        AssignmentRow {
            mentor_id: format!("m-{}", mentor),
            mentor_name: mentor.to_string(),
            student_id: format!("e-{}", student),
            student_name: student.to_string(),
            assigned_date: "2025-06-01 10:00:00".to_string(),
            notes: None,
        }
    }

    #[test]
    fn indice_vazio_responde_zero_e_none() {
        let index = MentoriaIndex::from_rows(&[]);
        assert_eq!(index.student_count_for_mentor("m-ana"), 0);
        assert!(index.mentor_for_student("e-rui").is_none());
        assert!(index.mentor_name_for_student("e-rui").is_none());
    }

    #[test]
    fn indice_conta_estudantes_por_mentor() {
        let rows = vec![row("ana", "rui"), row("ana", "ines"), row("bruno", "carla")];
        let index = MentoriaIndex::from_rows(&rows);
        assert_eq!(index.student_count_for_mentor("m-ana"), 2);
        assert_eq!(index.student_count_for_mentor("m-bruno"), 1);
        assert_eq!(index.student_count_for_mentor("m-ninguem"), 0);
    }

    #[test]
    fn indice_invertido_resolve_nome_do_mentor() {
        let rows = vec![row("ana", "rui"), row("bruno", "carla")];
        let index = MentoriaIndex::from_rows(&rows);
        assert_eq!(index.mentor_name_for_student("e-rui"), Some("ana"));
        assert_eq!(index.mentor_for_student("e-carla").unwrap().id, "m-bruno");
    }
}
