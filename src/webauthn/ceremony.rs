use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

/// Identity material embedded in registration options.
#[derive(Clone, Debug)]
pub struct CeremonyUser {
    pub id: Uuid,
    pub name: String,
}

/// A credential that passed registration verification.
#[derive(Clone, Debug)]
pub struct RegisteredKey {
    pub credential_id: Vec<u8>,
    /// Serialized credential, opaque to everything but the engine.
    pub credential_data: Vec<u8>,
}

/// Outcome of a successful authentication assertion.
#[derive(Clone, Debug)]
pub struct AuthenticatedKey {
    pub credential_id: Vec<u8>,
    pub counter: u32,
}

#[derive(Debug, Error)]
pub enum CeremonyError {
    /// The asserted credential is not among the user's registered keys.
    #[error("security key is not registered to this account")]
    UnknownCredential,
    /// Signature, challenge or attestation checks failed.
    #[error("{0}")]
    Verification(String),
    /// The browser payload could not be understood.
    #[error("invalid ceremony payload: {0}")]
    Payload(String),
    /// Stored ceremony state did not round-trip.
    #[error("ceremony state is unusable: {0}")]
    State(String),
}

/// Challenge building and response verification for both ceremonies.
///
/// Options and state are self-describing values: options go to the
/// browser (CBOR-encoded by the transport layer), state goes into the
/// session and comes back for the matching `verify_*` call. `existing`
/// and `credentials` are the user's registered credentials in the
/// engine's own serialized form.
pub trait CeremonyEngine: Send + Sync {
    /// Build registration options and the server-side state to verify the
    /// browser's response against.
    ///
    /// # Errors
    /// Returns an error when challenge generation fails.
    fn build_registration_options(
        &self,
        user: &CeremonyUser,
        existing: &[Vec<u8>],
    ) -> Result<(Value, Value), CeremonyError>;

    /// Verify a registration response against stored ceremony state.
    ///
    /// # Errors
    /// Any decoding or attestation failure is a verification failure, not
    /// a server fault.
    fn verify_registration(
        &self,
        state: &Value,
        response: &Value,
    ) -> Result<RegisteredKey, CeremonyError>;

    /// Build authentication options listing the allowed credentials.
    ///
    /// # Errors
    /// Returns [`CeremonyError::UnknownCredential`] when the user has no
    /// usable keys.
    fn build_authentication_options(
        &self,
        credentials: &[Vec<u8>],
    ) -> Result<(Value, Value), CeremonyError>;

    /// Verify an assertion: the claimed credential must belong to the
    /// given set and match the stored challenge.
    ///
    /// # Errors
    /// Returns [`CeremonyError::UnknownCredential`] for keys outside the
    /// set, otherwise a verification failure.
    fn verify_authentication(
        &self,
        state: &Value,
        credentials: &[Vec<u8>],
        response: &Value,
    ) -> Result<AuthenticatedKey, CeremonyError>;
}
