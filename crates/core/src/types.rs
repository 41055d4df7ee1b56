use serde::{Deserialize, Serialize};

/// All database primary keys are PostgreSQL `BIGINT GENERATED ... AS IDENTITY`.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Body of the `POST .../ids` lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdsRequest {
    #[serde(default)]
    pub ids: Vec<DbId>,
}
