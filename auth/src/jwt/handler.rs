use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::JwtError;

/// Token codec for issuing and verifying access tokens.
///
/// Signs with HS256 and verifies against that algorithm only; a token whose
/// header names any other algorithm fails signature validation. Expiry is
/// checked with zero leeway and `exp` is mandatory.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl JwtHandler {
    /// Create a new token codec from the server signing secret.
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    /// Sign claims into a compact token string.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Verify and decode a token.
    ///
    /// Checks run in order: signature integrity, expiry, presence of the
    /// subject claims. The first failing check wins.
    ///
    /// # Errors
    /// * `InvalidSignature` - Signature does not match or names the wrong algorithm
    /// * `Expired` - `exp` is not in the future
    /// * `Malformed` - The token string does not parse as a JWT
    /// * `MissingClaim` - `exp`, `sub`, or `id` is absent
    pub fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => JwtError::Expired,
                    ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                    ErrorKind::MissingRequiredClaim(claim) => {
                        JwtError::MissingClaim(claim.clone())
                    }
                    _ => JwtError::Malformed(e.to_string()),
                }
            })?;

        let claims = token_data.claims;
        if claims.sub.is_none() {
            return Err(JwtError::MissingClaim("sub".to_string()));
        }
        if claims.id.is_none() {
            return Err(JwtError::MissingClaim("id".to_string()));
        }

        Ok(claims)
    }

    /// Decode a token without verifying it.
    ///
    /// # Security Warning
    /// This does NOT validate the signature or expiry. Use it to inspect
    /// claims for debugging or logging, never for authorization decisions.
    ///
    /// # Errors
    /// * `Malformed` - The token string does not parse as a JWT
    pub fn decode_unverified(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        validation.insecure_disable_signature_validation();
        validation.required_spec_claims.clear();
        validation.validate_exp = false;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| JwtError::Malformed(e.to_string()))
    }
}
