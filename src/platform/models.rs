use base64::Engine;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which second factor the account signs in with.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthType {
    EmailAuth,
    SmsAuth,
    WebauthnAuth,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email_address: String,
    pub mobile_number: Option<String>,
    pub platform_admin: bool,
    pub auth_type: AuthType,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl Service {
    /// Service-level feature switches, e.g. `international_sms`.
    #[must_use]
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateType {
    Sms,
    Email,
    Letter,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Template {
    pub id: Uuid,
    pub name: String,
    pub template_type: TemplateType,
    pub body: String,
}

/// A registered security key as held by the platform API.
///
/// `credential_data` is an opaque base64 blob produced by the ceremony
/// engine; the front-end only shuttles it between the engine and the API.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WebAuthnCredential {
    pub id: Uuid,
    pub name: String,
    pub credential_data: String,
}

impl WebAuthnCredential {
    /// Decode the transport form back into the engine's serialized bytes.
    ///
    /// # Errors
    /// Returns an error when the blob is not valid base64.
    pub fn decoded_data(&self) -> Result<Vec<u8>, base64::DecodeError> {
        base64::engine::general_purpose::STANDARD.decode(&self.credential_data)
    }
}

/// A credential that passed registration verification, ready to persist.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewCredential {
    pub name: String,
    pub credential_data: String,
}

impl NewCredential {
    #[must_use]
    pub fn from_engine_data(name: &str, data: &[u8]) -> Self {
        Self {
            name: name.to_string(),
            credential_data: base64::engine::general_purpose::STANDARD.encode(data),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Invite {
    pub id: Uuid,
    pub email_address: String,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result};

    #[test]
    fn user_round_trips_with_snake_case_auth_type() -> Result<()> {
        let user = User {
            id: Uuid::new_v4(),
            name: "Test User".to_string(),
            email_address: "test@user.example.gov.uk".to_string(),
            mobile_number: Some("07700900762".to_string()),
            platform_admin: false,
            auth_type: AuthType::WebauthnAuth,
        };
        let value = serde_json::to_value(&user)?;
        let auth_type = value
            .get("auth_type")
            .and_then(serde_json::Value::as_str)
            .context("missing auth_type")?;
        assert_eq!(auth_type, "webauthn_auth");
        let decoded: User = serde_json::from_value(value)?;
        assert_eq!(decoded.auth_type, AuthType::WebauthnAuth);
        Ok(())
    }

    #[test]
    fn service_permission_lookup() {
        let service = Service {
            id: Uuid::new_v4(),
            name: "Test Service".to_string(),
            permissions: vec!["sms".to_string(), "international_sms".to_string()],
        };
        assert!(service.has_permission("international_sms"));
        assert!(!service.has_permission("letters"));
    }

    #[test]
    fn credential_data_round_trips_through_base64() -> Result<()> {
        let new_credential = NewCredential::from_engine_data("Work key", b"engine-bytes");
        let stored = WebAuthnCredential {
            id: Uuid::new_v4(),
            name: new_credential.name.clone(),
            credential_data: new_credential.credential_data.clone(),
        };
        assert_eq!(stored.decoded_data()?, b"engine-bytes");
        Ok(())
    }

    #[test]
    fn template_type_uses_snake_case() -> Result<()> {
        let value = serde_json::to_value(TemplateType::Sms)?;
        assert_eq!(value, serde_json::json!("sms"));
        Ok(())
    }
}
