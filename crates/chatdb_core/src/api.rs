use serde_json::{json, Value};

/// Database a lookup runs against. The server defaults to MySQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DbType {
    #[default]
    MySql,
    MongoDb,
}

impl DbType {
    pub fn as_str(self) -> &'static str {
        match self {
            DbType::MySql => "mysql",
            DbType::MongoDb => "mongodb",
        }
    }

    /// Case-insensitive, like the server's own check.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "mysql" => Some(DbType::MySql),
            "mongodb" => Some(DbType::MongoDb),
            _ => None,
        }
    }
}

/// A JSON request to one of the server's `/api/<route>` endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    /// Ask the chat bot; the answer lands in the chat log.
    Chat { message: String },
    /// List the tables or collections of a database.
    Explore { db_type: DbType },
    /// Translate a natural-language question into SQL.
    NlToSql { query: String },
    ExecuteQuery { query: String, db_type: DbType },
}

impl ApiCall {
    pub fn route(&self) -> &'static str {
        match self {
            ApiCall::Chat { .. } => "chat",
            ApiCall::Explore { .. } => "explore",
            ApiCall::NlToSql { .. } => "nl_to_sql",
            ApiCall::ExecuteQuery { .. } => "execute_query",
        }
    }

    pub fn body(&self) -> Value {
        match self {
            ApiCall::Chat { message } => json!({ "message": message }),
            ApiCall::Explore { db_type } => json!({ "db_type": db_type.as_str() }),
            ApiCall::NlToSql { query } => json!({ "query": query }),
            ApiCall::ExecuteQuery { query, db_type } => {
                json!({ "query": query, "db_type": db_type.as_str() })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_type_parsing_ignores_case() {
        assert_eq!(DbType::parse("MySQL"), Some(DbType::MySql));
        assert_eq!(DbType::parse(" mongodb "), Some(DbType::MongoDb));
        assert_eq!(DbType::parse("postgres"), None);
    }

    #[test]
    fn execute_body_carries_query_and_database() {
        let call = ApiCall::ExecuteQuery {
            query: "SELECT * FROM airtravel".to_string(),
            db_type: DbType::MongoDb,
        };
        assert_eq!(call.route(), "execute_query");
        assert_eq!(
            call.body(),
            json!({"query": "SELECT * FROM airtravel", "db_type": "mongodb"})
        );
    }
}
