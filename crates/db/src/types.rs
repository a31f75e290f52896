use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    TS,
    EnumString,
    Display,
    Default,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GlobalRole {
    #[sea_orm(string_value = "manager")]
    Manager,
    #[sea_orm(string_value = "executor")]
    Executor,
    #[default]
    #[sea_orm(string_value = "viewer")]
    Viewer,
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    TS,
    EnumString,
    Display,
    Default,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MemberRole {
    #[sea_orm(string_value = "manager")]
    Manager,
    #[sea_orm(string_value = "executor")]
    Executor,
    #[default]
    #[sea_orm(string_value = "viewer")]
    Viewer,
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    TS,
    EnumString,
    Display,
    Default,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    #[sea_orm(string_value = "backlog")]
    Backlog,
    #[sea_orm(string_value = "pendente")]
    Pendente,
    #[sea_orm(string_value = "em_execucao")]
    EmExecucao,
    #[sea_orm(string_value = "em_validacao")]
    EmValidacao,
    #[sea_orm(string_value = "concluida")]
    Concluida,
    #[sea_orm(string_value = "bloqueada")]
    Bloqueada,
    #[sea_orm(string_value = "cancelada")]
    Cancelada,
}

impl TaskStatus {
    /// Display label as shown to users and recorded in audit entries.
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Backlog => "Backlog",
            TaskStatus::Pendente => "Pendente",
            TaskStatus::EmExecucao => "Em Execução",
            TaskStatus::EmValidacao => "Em Validação",
            TaskStatus::Concluida => "Concluída",
            TaskStatus::Bloqueada => "Bloqueada",
            TaskStatus::Cancelada => "Cancelada",
        }
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    TS,
    EnumString,
    Display,
    Default,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TaskPriority {
    #[sea_orm(string_value = "baixa")]
    Baixa,
    #[default]
    #[sea_orm(string_value = "media")]
    Media,
    #[sea_orm(string_value = "alta")]
    Alta,
}

impl TaskPriority {
    pub fn label(&self) -> &'static str {
        match self {
            TaskPriority::Baixa => "Baixa",
            TaskPriority::Media => "Média",
            TaskPriority::Alta => "Alta",
        }
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    TS,
    EnumString,
    Display,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TimeEntrySource {
    #[sea_orm(string_value = "timer")]
    Timer,
    #[sea_orm(string_value = "manual")]
    Manual,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn roles_parse_from_lowercase() {
        assert_eq!(GlobalRole::from_str("manager").unwrap(), GlobalRole::Manager);
        assert_eq!(MemberRole::from_str("viewer").unwrap(), MemberRole::Viewer);
        assert!(GlobalRole::from_str("admin").is_err());
    }

    #[test]
    fn unset_global_role_defaults_to_viewer() {
        assert_eq!(GlobalRole::default(), GlobalRole::Viewer);
    }

    #[test]
    fn status_labels_match_product_vocabulary() {
        assert_eq!(TaskStatus::EmExecucao.label(), "Em Execução");
        assert_eq!(TaskStatus::Concluida.label(), "Concluída");
        assert_eq!(TaskStatus::default(), TaskStatus::Backlog);
    }
}
