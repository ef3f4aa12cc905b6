//! Configuration for the credential gateway

/// Input limits applied at signup
#[derive(Debug, Clone)]
pub struct CredentialGatewayConfig {
    /// Longest accepted display name, in characters, after trimming
    pub max_name_length: usize,
    /// Longest accepted email address, in characters
    pub max_email_length: usize,
    /// Shortest accepted password, in characters
    pub min_password_length: usize,
    /// Longest accepted password, in bytes; bounds hashing cost per request
    pub max_password_length: usize,
}

impl Default for CredentialGatewayConfig {
    fn default() -> Self {
        Self {
            max_name_length: 64,
            max_email_length: 254,
            min_password_length: 1,
            max_password_length: 1024,
        }
    }
}
