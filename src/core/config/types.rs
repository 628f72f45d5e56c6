use thiserror::Error;

#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub(super) server: ServerSettings,
    pub(super) runtime: RuntimeSettings,
    pub(super) api: ApiSettings,
    pub(super) security: SecuritySettings,
    pub(super) cors: CorsSettings,
    pub(super) database: DatabaseSettings,
    pub(super) exam: ExamSettings,
    pub(super) admin: AdminSettings,
    pub(super) telemetry: TelemetrySettings,
}

#[derive(Debug, Clone)]
pub(crate) struct ServerSettings {
    pub(super) host: String,
    pub(super) port: u16,
}

#[derive(Debug, Clone)]
pub(crate) struct ApiSettings {
    pub(crate) project_name: String,
    pub(crate) version: String,
    pub(crate) api_v1_str: String,
}

#[derive(Debug, Clone)]
pub(crate) struct SecuritySettings {
    pub(crate) secret_key: String,
    pub(crate) secret_key_generated: bool,
    pub(crate) access_token_expire_minutes: u64,
    pub(crate) algorithm: String,
}

#[derive(Debug, Clone)]
pub(crate) struct CorsSettings {
    pub(crate) origins: Vec<String>,
}

/// Where the pool connects: a full `DATABASE_URL` wins over the `POSTGRES_*` parts.
#[derive(Debug, Clone)]
pub(crate) enum DatabaseSource {
    Url(String),
    Parts { server: String, port: u16, user: String, password: String, db: String },
}

#[derive(Debug, Clone)]
pub(crate) struct DatabaseSettings {
    pub(crate) source: DatabaseSource,
    pub(crate) max_connections: u32,
}

/// Attempt lifecycle policy.
#[derive(Debug, Clone)]
pub(crate) struct ExamSettings {
    /// When false, starting an exam that already has a submitted attempt
    /// sends the student to that attempt's result instead of a new attempt.
    pub(crate) allow_reattempt: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct AdminSettings {
    pub(crate) first_superuser_username: String,
    pub(crate) first_superuser_password: String,
}

#[derive(Debug, Clone)]
pub(crate) struct TelemetrySettings {
    pub(crate) log_level: String,
    pub(crate) json: bool,
    pub(crate) prometheus_enabled: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct RuntimeSettings {
    pub(crate) environment: Environment,
    pub(crate) strict_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Environment {
    Development,
    Production,
    Staging,
    Test,
}

impl Environment {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Staging => "staging",
            Self::Test => "test",
        }
    }

    pub(super) fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("invalid server host: {0}")]
    InvalidHost(String),
    #[error("invalid server port: {0}")]
    InvalidPort(String),
    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
    #[error("invalid cors origins: {0}")]
    InvalidCors(String),
    #[error("missing required secret for {0}")]
    MissingSecret(&'static str),
}

impl DatabaseSettings {
    pub(crate) fn database_url(&self) -> String {
        match &self.source {
            DatabaseSource::Url(url) => url.clone(),
            DatabaseSource::Parts { server, port, user, password, db } => {
                format!("postgresql://{user}:{password}@{server}:{port}/{db}")
            }
        }
    }

    /// An explicit URL is trusted to carry its own credentials.
    pub(super) fn has_credentials(&self) -> bool {
        match &self.source {
            DatabaseSource::Url(_) => true,
            DatabaseSource::Parts { password, .. } => !password.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(password: &str) -> DatabaseSettings {
        DatabaseSettings {
            source: DatabaseSource::Parts {
                server: "db".to_string(),
                port: 5433,
                user: "schoolhub".to_string(),
                password: password.to_string(),
                db: "schoolhub".to_string(),
            },
            max_connections: 5,
        }
    }

    #[test]
    fn builds_url_from_parts() {
        assert_eq!(parts("pw").database_url(), "postgresql://schoolhub:pw@db:5433/schoolhub");
        assert!(parts("pw").has_credentials());
        assert!(!parts("").has_credentials());
    }

    #[test]
    fn explicit_url_is_used_verbatim() {
        let settings = DatabaseSettings {
            source: DatabaseSource::Url("postgresql://u@h/d".to_string()),
            max_connections: 1,
        };
        assert_eq!(settings.database_url(), "postgresql://u@h/d");
        assert!(settings.has_credentials());
    }
}
