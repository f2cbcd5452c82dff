use crate::core::security;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::RoleName;
use crate::repositories;

/// Makes sure the configured superuser exists, is an active admin, and can
/// log in with FIRST_SUPERUSER_PASSWORD. Skipped when no password is set.
pub(crate) async fn ensure_superuser(state: &AppState) -> anyhow::Result<()> {
    let admin = state.settings().admin();
    if admin.first_superuser_password.is_empty() {
        tracing::warn!("FIRST_SUPERUSER_PASSWORD not configured; skipping superuser creation");
        return Ok(());
    }

    let email = &admin.first_superuser_email;

    let admin_role = repositories::roles::find_by_name(state.db(), RoleName::Admin)
        .await?
        .ok_or_else(|| anyhow::anyhow!("admin role missing; are migrations applied?"))?;

    let now = primitive_now_utc();

    if let Some(user) = repositories::users::find_by_email(state.db(), email).await? {
        let password_ok =
            security::verify_password(&admin.first_superuser_password, &user.password_hash)
                .unwrap_or(false);

        if password_ok && user.is_admin() && user.is_active {
            tracing::info!("Default superuser already up to date");
            return Ok(());
        }

        let password_hash = if password_ok {
            user.password_hash.clone()
        } else {
            security::hash_password(&admin.first_superuser_password)?
        };

        sqlx::query(
            "UPDATE users
             SET password_hash = $1, role_id = $2, is_active = TRUE, updated_at = $3
             WHERE id = $4",
        )
        .bind(password_hash)
        .bind(admin_role.id)
        .bind(now)
        .bind(user.id)
        .execute(state.db())
        .await?;

        tracing::info!(email = %email, "Updated default superuser");
        return Ok(());
    }

    let password_hash = security::hash_password(&admin.first_superuser_password)?;

    repositories::users::create(
        state.db(),
        repositories::users::CreateUser {
            email,
            password_hash,
            first_name: "Super",
            last_name: "Admin",
            phone: None,
            document_type: None,
            document_number: None,
            birth_date: None,
            institution: None,
            grade: None,
            role_id: admin_role.id,
            created_at: now,
        },
    )
    .await?;

    tracing::info!(email = %email, "Created default superuser");
    Ok(())
}
