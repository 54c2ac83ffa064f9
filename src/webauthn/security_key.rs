//! Production ceremony engine over `webauthn-rs` security key flows.
//!
//! Uses `SecurityKey` types to support hardware tokens as a second factor
//! rather than a primary password replacement. Engine state and stored
//! credentials are serialized as JSON values so the session and the
//! platform API can treat them as opaque blobs.

use anyhow::Result;
use serde_json::{Value, json};
use url::Url;
use webauthn_rs::prelude::*;
use webauthn_rs::{Webauthn, WebauthnBuilder};

use super::ceremony::{
    AuthenticatedKey, CeremonyEngine, CeremonyError, CeremonyUser, RegisteredKey,
};

/// Browser-facing ceremony deadline.
const CEREMONY_TIMEOUT_MS: u32 = 30_000;

pub struct SecurityKeyEngine {
    webauthn: Webauthn,
    timeout_ms: u32,
}

impl SecurityKeyEngine {
    /// # Errors
    /// Returns an error if the relying party origin is not a valid URL or
    /// the `WebAuthn` builder rejects the identity.
    pub fn new(rp_id: &str, rp_origin: &str, rp_name: &str) -> Result<Self> {
        let origin = Url::parse(rp_origin)?;
        let webauthn = WebauthnBuilder::new(rp_id, &origin)?
            .rp_name(rp_name)
            .build()?;
        Ok(Self {
            webauthn,
            timeout_ms: CEREMONY_TIMEOUT_MS,
        })
    }

    /// Credentials that fail to parse are skipped rather than blocking the
    /// whole ceremony.
    fn parse_keys(credentials: &[Vec<u8>]) -> Vec<SecurityKey> {
        credentials
            .iter()
            .filter_map(|data| serde_json::from_slice(data).ok())
            .collect()
    }

    /// Platform policy for security keys: directly attested, quick, held
    /// on a roaming authenticator, and never prompting for a PIN on a
    /// second factor.
    fn apply_registration_policy(&self, options: &mut Value) {
        let Some(public_key) = options.get_mut("publicKey").and_then(Value::as_object_mut)
        else {
            return;
        };
        public_key.insert("timeout".to_string(), json!(self.timeout_ms));
        public_key.insert("attestation".to_string(), json!("direct"));
        let selection = public_key
            .entry("authenticatorSelection")
            .or_insert_with(|| json!({}));
        if let Some(selection) = selection.as_object_mut() {
            selection.insert("authenticatorAttachment".to_string(), json!("cross-platform"));
            selection.insert("userVerification".to_string(), json!("discouraged"));
        }
    }

    fn apply_authentication_policy(&self, options: &mut Value) {
        if let Some(public_key) = options.get_mut("publicKey").and_then(Value::as_object_mut) {
            public_key.insert("timeout".to_string(), json!(self.timeout_ms));
        }
    }
}

impl CeremonyEngine for SecurityKeyEngine {
    fn build_registration_options(
        &self,
        user: &CeremonyUser,
        existing: &[Vec<u8>],
    ) -> Result<(Value, Value), CeremonyError> {
        let exclude: Vec<CredentialID> = Self::parse_keys(existing)
            .iter()
            .map(|key| key.cred_id().clone())
            .collect();

        let (challenge, state) = self
            .webauthn
            .start_securitykey_registration(
                user.id,
                &user.name,
                &user.name,
                Some(exclude),
                None, // Attestation CA list
                Some(AuthenticatorAttachment::CrossPlatform),
            )
            .map_err(|err| CeremonyError::Verification(err.to_string()))?;

        let mut options = serde_json::to_value(&challenge)
            .map_err(|err| CeremonyError::State(err.to_string()))?;
        self.apply_registration_policy(&mut options);

        let state =
            serde_json::to_value(&state).map_err(|err| CeremonyError::State(err.to_string()))?;
        Ok((options, state))
    }

    fn verify_registration(
        &self,
        state: &Value,
        response: &Value,
    ) -> Result<RegisteredKey, CeremonyError> {
        let state: SecurityKeyRegistration = serde_json::from_value(state.clone())
            .map_err(|err| CeremonyError::State(err.to_string()))?;
        let response: RegisterPublicKeyCredential = serde_json::from_value(response.clone())
            .map_err(|err| CeremonyError::Payload(err.to_string()))?;

        let key = self
            .webauthn
            .finish_securitykey_registration(&response, &state)
            .map_err(|err| CeremonyError::Verification(err.to_string()))?;

        let credential_data =
            serde_json::to_vec(&key).map_err(|err| CeremonyError::State(err.to_string()))?;
        Ok(RegisteredKey {
            credential_id: key.cred_id().as_slice().to_vec(),
            credential_data,
        })
    }

    fn build_authentication_options(
        &self,
        credentials: &[Vec<u8>],
    ) -> Result<(Value, Value), CeremonyError> {
        let keys = Self::parse_keys(credentials);
        if keys.is_empty() {
            return Err(CeremonyError::UnknownCredential);
        }

        let (challenge, state) = self
            .webauthn
            .start_securitykey_authentication(&keys)
            .map_err(|err| CeremonyError::Verification(err.to_string()))?;

        let mut options = serde_json::to_value(&challenge)
            .map_err(|err| CeremonyError::State(err.to_string()))?;
        self.apply_authentication_policy(&mut options);

        let state =
            serde_json::to_value(&state).map_err(|err| CeremonyError::State(err.to_string()))?;
        Ok((options, state))
    }

    fn verify_authentication(
        &self,
        state: &Value,
        credentials: &[Vec<u8>],
        response: &Value,
    ) -> Result<AuthenticatedKey, CeremonyError> {
        let state: SecurityKeyAuthentication = serde_json::from_value(state.clone())
            .map_err(|err| CeremonyError::State(err.to_string()))?;
        let response: PublicKeyCredential = serde_json::from_value(response.clone())
            .map_err(|err| CeremonyError::Payload(err.to_string()))?;

        let known = Self::parse_keys(credentials);
        if !known
            .iter()
            .any(|key| key.cred_id().as_slice() == response.raw_id.as_slice())
        {
            return Err(CeremonyError::UnknownCredential);
        }

        let result = self
            .webauthn
            .finish_securitykey_authentication(&response, &state)
            .map_err(|err| CeremonyError::Verification(err.to_string()))?;

        Ok(AuthenticatedKey {
            credential_id: result.cred_id().as_slice().to_vec(),
            counter: result.counter(),
        })
    }
}
