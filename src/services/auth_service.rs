use crate::config::app_config::AdminCredentials;
use crate::domain::user::{AuthProvider, SessionUser};
use crate::services::error_handling::CatalogError;
use tracing::warn;

/// Resolves identities for the profile store. No real identity provider is
/// contacted; the third-party providers hand back a fixed demo user.
#[derive(Debug, Clone)]
pub struct AuthService {
    admin: AdminCredentials,
}

impl AuthService {
    pub fn new(admin: AdminCredentials) -> Self {
        Self { admin }
    }

    pub fn authenticate_admin(
        &self,
        id: &str,
        password: &str,
    ) -> Result<SessionUser, CatalogError> {
        if id == self.admin.id && password == self.admin.password {
            Ok(SessionUser::new(id, AuthProvider::Admin))
        } else {
            warn!(id = %id, "Rejected administrator login");
            Err(CatalogError::InvalidCredentials)
        }
    }

    pub fn provider_login(&self, provider: AuthProvider) -> Result<SessionUser, CatalogError> {
        match provider {
            AuthProvider::Google => Ok(SessionUser::new("GoogleUser", provider)),
            AuthProvider::Kakao => Ok(SessionUser::new("KakaoUser", provider)),
            AuthProvider::Admin => Err(CatalogError::Validation {
                field: "provider".to_string(),
                reason: "administrators must sign in with credentials".to_string(),
            }),
        }
    }
}
