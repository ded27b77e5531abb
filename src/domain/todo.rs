use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub body: String,
    #[serde(default)]
    pub is_completed: bool,
}

/// Payload of `POST /todo`. `isCompleted` is accepted as any JSON value and
/// coerced with [`truthy`].
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodo {
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_completed: Value,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateTodo {
    #[serde(default)]
    pub body: Option<String>,
}

/// Field changes applied by `update_one`. Only the body is mutable.
#[derive(Debug, Clone, Default)]
pub struct TodoChanges {
    pub body: Option<String>,
}

impl TodoChanges {
    pub fn apply(&self, todo: &mut Todo) {
        if let Some(body) = &self.body {
            todo.body = body.clone();
        }
    }
}

/// Equality filter over todo documents. Unset fields match anything.
#[derive(Debug, Clone, Default)]
pub struct TodoFilter {
    pub id: Option<String>,
    pub user_id: Option<String>,
    pub is_completed: Option<bool>,
}

impl TodoFilter {
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn owned_by(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Self::default()
        }
    }

    pub fn and_owner(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn completed(mut self) -> Self {
        self.is_completed = Some(true);
        self
    }

    pub fn matches(&self, todo: &Todo) -> bool {
        self.id.as_deref().is_none_or(|id| todo.id == id)
            && self
                .user_id
                .as_deref()
                .is_none_or(|user_id| todo.user_id == user_id)
            && self
                .is_completed
                .is_none_or(|done| todo.is_completed == done)
    }
}

/// Loose truthiness used for the completion flag on create: absent, `null`,
/// `false`, `0` and `""` are false, every other value is true.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
