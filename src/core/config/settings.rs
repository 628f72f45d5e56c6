use super::parsing::{
    env_flag, env_number, env_optional, env_or_default, parse_cors_origins, parse_environment,
    parse_host, parse_port,
};
use super::secret::load_or_create_secret_key;
use super::types::{
    AdminSettings, ApiSettings, ConfigError, CorsSettings, DatabaseSettings, DatabaseSource,
    ExamSettings, RuntimeSettings, SecuritySettings, ServerSettings, Settings, TelemetrySettings,
};

impl Settings {
    pub(crate) fn load() -> Result<Self, ConfigError> {
        let server = ServerSettings {
            host: parse_host(env_or_default("SCHOOLHUB_HOST", "0.0.0.0"))?,
            port: parse_port(env_or_default("SCHOOLHUB_PORT", "8000"))?,
        };

        let environment = parse_environment(
            env_optional("SCHOOLHUB_ENV").or_else(|| env_optional("ENVIRONMENT")),
        );
        let strict_config =
            env_flag("SCHOOLHUB_STRICT_CONFIG", false)? || environment.is_production();

        let api = ApiSettings {
            project_name: env_or_default("PROJECT_NAME", "SchoolHub API"),
            version: env_or_default("VERSION", env!("CARGO_PKG_VERSION")),
            api_v1_str: env_or_default("API_V1_STR", "/api/v1"),
        };

        let (secret_key, secret_key_generated) = match env_optional("SECRET_KEY") {
            Some(value) => (value, false),
            None => (load_or_create_secret_key(), true),
        };
        let security = SecuritySettings {
            secret_key,
            secret_key_generated,
            access_token_expire_minutes: env_number("ACCESS_TOKEN_EXPIRE_MINUTES", 10_080)?,
            algorithm: env_or_default("ALGORITHM", "HS256"),
        };

        let source = match env_optional("DATABASE_URL") {
            Some(url) => DatabaseSource::Url(url),
            None => DatabaseSource::Parts {
                server: env_or_default("POSTGRES_SERVER", "localhost"),
                port: env_number("POSTGRES_PORT", 5432)?,
                user: env_or_default("POSTGRES_USER", "schoolhub"),
                password: env_or_default("POSTGRES_PASSWORD", ""),
                db: env_or_default("POSTGRES_DB", "schoolhub"),
            },
        };
        let database =
            DatabaseSettings { source, max_connections: env_number("DB_MAX_CONNECTIONS", 20)? };

        let settings = Self {
            server,
            runtime: RuntimeSettings { environment, strict_config },
            api,
            security,
            cors: CorsSettings {
                origins: parse_cors_origins(env_optional("BACKEND_CORS_ORIGINS"))?,
            },
            database,
            exam: ExamSettings { allow_reattempt: env_flag("EXAM_ALLOW_REATTEMPT", false)? },
            admin: AdminSettings {
                first_superuser_username: env_or_default("FIRST_SUPERUSER_USERNAME", "admin"),
                first_superuser_password: env_or_default("FIRST_SUPERUSER_PASSWORD", ""),
            },
            telemetry: TelemetrySettings {
                log_level: env_or_default("SCHOOLHUB_LOG_LEVEL", "info"),
                json: env_flag("SCHOOLHUB_LOG_JSON", false)?,
                prometheus_enabled: env_flag("PROMETHEUS_ENABLED", false)?,
            },
        };

        settings.validate()?;
        Ok(settings)
    }

    pub(crate) fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub(crate) fn server_host(&self) -> &str {
        &self.server.host
    }

    pub(crate) fn server_port(&self) -> u16 {
        self.server.port
    }

    pub(crate) fn api(&self) -> &ApiSettings {
        &self.api
    }

    pub(crate) fn security(&self) -> &SecuritySettings {
        &self.security
    }

    pub(crate) fn cors(&self) -> &CorsSettings {
        &self.cors
    }

    pub(crate) fn database(&self) -> &DatabaseSettings {
        &self.database
    }

    pub(crate) fn exam(&self) -> &ExamSettings {
        &self.exam
    }

    pub(crate) fn admin(&self) -> &AdminSettings {
        &self.admin
    }

    pub(crate) fn telemetry(&self) -> &TelemetrySettings {
        &self.telemetry
    }

    pub(crate) fn runtime(&self) -> &RuntimeSettings {
        &self.runtime
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.api.api_v1_str.starts_with('/') {
            return Err(ConfigError::InvalidValue {
                field: "API_V1_STR",
                value: self.api.api_v1_str.clone(),
            });
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                field: "DB_MAX_CONNECTIONS",
                value: "0".to_string(),
            });
        }

        if !(self.runtime.strict_config || self.runtime.environment.is_production()) {
            return Ok(());
        }

        if !self.database.has_credentials() {
            return Err(ConfigError::MissingSecret("POSTGRES_PASSWORD"));
        }
        if self.security.secret_key_generated {
            return Err(ConfigError::MissingSecret("SECRET_KEY"));
        }

        Ok(())
    }
}
