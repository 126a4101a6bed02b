//! Admin command - back-office user management.

use crate::cli::args::{AdminAction, AdminArgs};
use crate::config::{is_valid_role, Config, VALID_ROLES};
use crate::domain::UserRole;
use crate::errors::{AppError, AppResult};

use super::connect_services;

/// Execute the admin command
pub async fn execute(args: AdminArgs, config: Config) -> AppResult<()> {
    let services = connect_services(&config).await?;

    match args.action {
        AdminAction::Create {
            username,
            password,
            role,
        } => {
            if !is_valid_role(&role) {
                return Err(AppError::validation(format!(
                    "Unknown role '{}', expected one of: {}",
                    role,
                    VALID_ROLES.join(", ")
                )));
            }
            let user = services
                .auth
                .create_user(&username, &password, UserRole::from(role.as_str()))
                .await?;
            tracing::info!(user_id = user.id, username = %user.username, "User created");
            println!("Created {} '{}'", user.role.as_str(), user.username);
        }
        AdminAction::Password { username, password } => {
            services.auth.change_password(&username, &password).await?;
            tracing::info!(username = %username, "Password changed");
            println!("Password updated for '{}'", username);
        }
    }

    Ok(())
}
