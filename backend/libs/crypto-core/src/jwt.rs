/// JWT issuance and validation for the chat backend
///
/// Tokens are signed with RS256 only. Keys are parsed once at startup and kept
/// in process-wide `OnceCell` slots; the service calls `initialize_jwt_keys()`
/// before the HTTP server starts.
///
/// ```ignore
/// use crypto_core::jwt;
///
/// jwt::initialize_jwt_keys(&private_pem, &public_pem)?;
/// let token = jwt::generate_access_token(user_id, Some("@alice"))?;
/// let user_id = jwt::get_user_id_from_token(&token)?;
/// ```
use anyhow::{anyhow, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation,
};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Constants
// ============================================================================

const ACCESS_TOKEN_EXPIRY_HOURS: i64 = 24;

const JWT_ALGORITHM: Algorithm = Algorithm::RS256;

pub const TOKEN_TYPE_ACCESS: &str = "access";

// ============================================================================
// Data Structures
// ============================================================================

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID as UUID string)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    pub token_type: String,
    /// '@'-prefixed handle, when the user has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
}

/// Login response body
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

// ============================================================================
// Key Storage
// ============================================================================

static JWT_ENCODING_KEY: OnceCell<EncodingKey> = OnceCell::new();
static JWT_DECODING_KEY: OnceCell<DecodingKey> = OnceCell::new();

// ============================================================================
// Initialization
// ============================================================================

/// Initialize JWT keys from PEM-formatted strings
///
/// Can only be called once per process; subsequent calls return an error.
pub fn initialize_jwt_keys(private_key_pem: &str, public_key_pem: &str) -> Result<()> {
    let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
        .map_err(|e| anyhow!("Failed to parse RSA private key: {e}"))?;

    let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
        .map_err(|e| anyhow!("Failed to parse RSA public key: {e}"))?;

    JWT_ENCODING_KEY
        .set(encoding_key)
        .map_err(|_| anyhow!("JWT encoding key already initialized"))?;

    JWT_DECODING_KEY
        .set(decoding_key)
        .map_err(|_| anyhow!("JWT decoding key already initialized"))?;

    Ok(())
}

fn get_encoding_key() -> Result<&'static EncodingKey> {
    JWT_ENCODING_KEY.get().ok_or_else(|| {
        anyhow!("JWT keys not initialized. Call initialize_jwt_keys() during startup.")
    })
}

fn get_decoding_key() -> Result<&'static DecodingKey> {
    JWT_DECODING_KEY.get().ok_or_else(|| {
        anyhow!("JWT keys not initialized. Call initialize_jwt_keys() during startup.")
    })
}

// ============================================================================
// Token Generation
// ============================================================================

/// Generate a new access token for `user_id`
pub fn generate_access_token(user_id: Uuid, handle: Option<&str>) -> Result<String> {
    let now = Utc::now();
    let expiry = now + Duration::hours(ACCESS_TOKEN_EXPIRY_HOURS);

    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: expiry.timestamp(),
        token_type: TOKEN_TYPE_ACCESS.to_string(),
        handle: handle.map(str::to_string),
    };

    let encoding_key = get_encoding_key()?;
    encode(&Header::new(JWT_ALGORITHM), &claims, encoding_key)
        .map_err(|e| anyhow!("Failed to generate access token: {e}"))
}

/// Generate an access token wrapped in the login response body
pub fn generate_token_response(user_id: Uuid, handle: Option<&str>) -> Result<TokenResponse> {
    Ok(TokenResponse {
        access_token: generate_access_token(user_id, handle)?,
        token_type: "Bearer".to_string(),
        expires_in: ACCESS_TOKEN_EXPIRY_HOURS * 3600,
    })
}

// ============================================================================
// Token Validation
// ============================================================================

/// Validate and decode a JWT token (without the "Bearer " prefix)
///
/// Verifies the RS256 signature and expiry. There is no fallback to other
/// algorithms.
pub fn validate_token(token: &str) -> Result<TokenData<Claims>> {
    let decoding_key = get_decoding_key()?;

    let mut validation = Validation::new(JWT_ALGORITHM);
    validation.validate_exp = true;

    decode::<Claims>(token, decoding_key, &validation)
        .map_err(|e| anyhow!("Token validation failed: {e}"))
}

/// Validate a token and extract the user id, rejecting non-access tokens
pub fn get_user_id_from_token(token: &str) -> Result<Uuid> {
    let token_data = validate_token(token)?;
    if token_data.claims.token_type != TOKEN_TYPE_ACCESS {
        return Err(anyhow!(
            "Unexpected token type: {}",
            token_data.claims.token_type
        ));
    }
    Uuid::parse_str(&token_data.claims.sub)
        .map_err(|e| anyhow!("Invalid user ID format in token: {e}"))
}

// ============================================================================
// Tests
// ============================================================================
