use crate::model::Mode;

/// Decides whether a mutation request may proceed.
#[derive(Debug, Clone)]
pub struct Gate {
    secret: Option<String>,
    mode: Mode,
}

impl Gate {
    pub fn new(secret: Option<String>, mode: Mode) -> Self {
        // Empty means unset.
        let secret = secret.filter(|s| !s.is_empty());
        Self { secret, mode }
    }

    pub fn has_secret(&self) -> bool {
        self.secret.is_some()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Webhooks must present the configured shared secret. Without one configured, all are refused.
    pub fn authorize_webhook(&self, provided: &str) -> bool {
        match &self.secret {
            Some(secret) => constant_time_eq(secret.as_bytes(), provided.as_bytes()),
            None => false,
        }
    }

    /// Users may only set lights in public mode.
    pub fn authorize_user(&self) -> bool {
        self.mode == Mode::Public
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
