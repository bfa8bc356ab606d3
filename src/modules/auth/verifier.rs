use std::env;

/// Credential check behind the admin gate. The production implementation
/// compares against a fixed credential pair from the environment; tests
/// substitute their own.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;
}

#[derive(Clone, Debug)]
pub struct EnvCredentials {
    username: String,
    password: String,
}

impl EnvCredentials {
    pub fn from_env() -> Self {
        Self {
            username: env::var("ADMIN_USER").unwrap_or_else(|_| "admin".to_string()),
            password: env::var("ADMIN_PASS").unwrap_or_else(|_| "admin".to_string()),
        }
    }

    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }
}

impl CredentialVerifier for EnvCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        username == self.username && password == self.password
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_exact_credentials_only() {
        let creds = EnvCredentials::new("registrar", "s3cret");
        assert!(creds.verify("registrar", "s3cret"));
        assert!(!creds.verify("registrar", "wrong"));
        assert!(!creds.verify("other", "s3cret"));
    }
}
