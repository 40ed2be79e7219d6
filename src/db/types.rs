use serde::{Deserialize, Serialize};
use sqlx::Type;

/// How a module participates in delivery. ROUTING modules are always taken;
/// ADAPTIVE modules come in mutually-exclusive difficulty variants of which a
/// student sits exactly one; PLAIN modules are independent and always counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "moduletype", rename_all = "lowercase")]
pub(crate) enum ModuleType {
    Routing,
    Adaptive,
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "moduledifficulty", rename_all = "lowercase")]
pub(crate) enum ModuleDifficulty {
    Easy,
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "questiontype", rename_all = "snake_case")]
pub(crate) enum QuestionType {
    MultipleChoice,
    ShortAnswer,
    Essay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "assignmentstatus", rename_all = "snake_case")]
pub(crate) enum AssignmentStatus {
    NotStarted,
    InProgress,
    Completed,
}
