use uuid::Uuid;

use crate::core::security;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::UserRole;
use crate::repositories;

/// Creates the configured administrator, or repairs its password, role and active flag.
pub(crate) async fn ensure_superuser(state: &AppState) -> anyhow::Result<()> {
    let admin = state.settings().admin();
    if admin.first_superuser_password.is_empty() {
        tracing::warn!("FIRST_SUPERUSER_PASSWORD not configured; skipping superuser creation");
        return Ok(());
    }

    let username = &admin.first_superuser_username;
    let now = primitive_now_utc();

    if let Some(user) = repositories::users::find_by_username(state.db(), username).await? {
        let verified =
            security::verify_password(&admin.first_superuser_password, &user.hashed_password)
                .unwrap_or(false);

        let hashed_password = if verified {
            None
        } else {
            Some(security::hash_password(&admin.first_superuser_password)?)
        };
        let role = (user.role != UserRole::Admin).then_some(UserRole::Admin);
        let is_active = (!user.is_active).then_some(true);

        if hashed_password.is_none() && role.is_none() && is_active.is_none() {
            tracing::info!("Default superuser already up to date");
            return Ok(());
        }

        repositories::users::update(
            state.db(),
            &user.id,
            repositories::users::UpdateUser {
                full_name: None,
                role,
                is_active,
                hashed_password,
                updated_at: now,
            },
        )
        .await?;

        tracing::info!(username = %username, "Updated default superuser");
        return Ok(());
    }

    let id = Uuid::new_v4().to_string();
    repositories::users::create(
        state.db(),
        repositories::users::CreateUser {
            id: &id,
            username,
            hashed_password: security::hash_password(&admin.first_superuser_password)?,
            full_name: "Administrator",
            role: UserRole::Admin,
            is_active: true,
            created_at: now,
            updated_at: now,
        },
    )
    .await?;

    tracing::info!(username = %username, "Created default superuser");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::ensure_superuser;
    use crate::core::config::Settings;
    use crate::core::security;
    use crate::core::state::AppState;
    use crate::db::types::UserRole;
    use crate::repositories;
    use crate::test_support;

    #[tokio::test]
    async fn creates_then_promotes_configured_admin() {
        let ctx = test_support::setup_test_context().await;

        // Without a password nothing is created.
        ensure_superuser(&ctx.state).await.expect("bootstrap");
        let missing = repositories::users::find_by_username(ctx.state.db(), "admin")
            .await
            .expect("lookup");
        assert!(missing.is_none());

        test_support::insert_student(ctx.state.db(), "admin").await;
        std::env::set_var("FIRST_SUPERUSER_PASSWORD", "bootstrap-pass");
        let settings = Settings::load().expect("settings");
        std::env::remove_var("FIRST_SUPERUSER_PASSWORD");
        let state = AppState::new(settings, ctx.state.db().clone());

        ensure_superuser(&state).await.expect("bootstrap");
        let admin = repositories::users::find_by_username(state.db(), "admin")
            .await
            .expect("lookup")
            .expect("admin");
        assert_eq!(admin.role, UserRole::Admin);
        assert!(security::verify_password("bootstrap-pass", &admin.hashed_password).expect("verify"));
    }
}
