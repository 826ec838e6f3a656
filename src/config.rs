//! Portal configuration
//!
//! Built once at startup (CLI flags or environment, after `.env` is loaded)
//! and passed explicitly to every collaborator that needs it.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;

use crate::error::{PortalError, PortalResult};

/// Lifetime of a login session
pub const SESSION_TTL: Duration = Duration::from_secs(90 * 60);

/// Timeout applied to every remote call
pub const REMOTE_TIMEOUT: Duration = Duration::from_secs(30);

/// Credentials for the OAuth2 client-credentials grant
#[derive(Clone, Debug, Args)]
pub struct GraphCredentials {
    /// Azure AD tenant id
    #[arg(long, env = "TENANT_ID", hide_env_values = true)]
    pub tenant_id: String,

    /// Application (client) id
    #[arg(long, env = "CLIENT_ID", hide_env_values = true)]
    pub client_id: String,

    /// Application client secret
    #[arg(long, env = "CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: String,
}

/// Where equipment folders live in the remote drive
#[derive(Clone, Debug, Args)]
pub struct DriveSettings {
    /// User principal whose drive holds the equipment folders
    #[arg(long, env = "ONEDRIVE_USER")]
    pub drive_user: String,

    /// Drive path under which client folders are found
    #[arg(long, env = "ONEDRIVE_FOLDER_PATH")]
    pub folder_root: String,
}

/// The fixed login gate
#[derive(Clone, Debug, Args)]
pub struct LoginSettings {
    #[arg(long, env = "LOGIN_USERNAME", hide_env_values = true)]
    pub login_username: String,

    #[arg(long, env = "LOGIN_PASSWORD", hide_env_values = true)]
    pub login_password: String,
}

/// Full server configuration
#[derive(Clone, Debug, Args)]
pub struct PortalConfig {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "PORTAL_HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "3000", env = "PORT")]
    pub port: u16,

    #[command(flatten)]
    pub credentials: GraphCredentials,

    #[command(flatten)]
    pub drive: DriveSettings,

    #[command(flatten)]
    pub login: LoginSettings,

    /// Directory served under /public (also holds login.html)
    #[arg(long, default_value = "public", env = "PUBLIC_DIR")]
    pub public_dir: PathBuf,

    /// Directory holding index.html
    #[arg(long, default_value = "views", env = "VIEWS_DIR")]
    pub views_dir: PathBuf,
}

impl PortalConfig {
    /// Reject blank values that clap accepts as present.
    pub fn validate(&self) -> PortalResult<()> {
        let required = [
            ("TENANT_ID", &self.credentials.tenant_id),
            ("CLIENT_ID", &self.credentials.client_id),
            ("CLIENT_SECRET", &self.credentials.client_secret),
            ("ONEDRIVE_USER", &self.drive.drive_user),
            ("ONEDRIVE_FOLDER_PATH", &self.drive.folder_root),
            ("LOGIN_USERNAME", &self.login.login_username),
            ("LOGIN_PASSWORD", &self.login.login_password),
        ];

        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(PortalError::Config(format!("{} must not be empty", name)));
            }
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
