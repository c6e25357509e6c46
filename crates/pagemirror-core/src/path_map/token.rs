//! Token generators for fallback asset names.

/// Source of unique-ish tokens used to name assets whose URL path is empty.
pub trait TokenSource: Send {
    fn next_token(&mut self) -> String;
}

/// Random 8-hex-digit tokens from a v4 UUID.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomTokens;

impl TokenSource for RandomTokens {
    fn next_token(&mut self) -> String {
        let id = uuid::Uuid::new_v4().simple().to_string();
        id[..8].to_string()
    }
}

/// Deterministic `prefix0`, `prefix1`, ... tokens.
#[derive(Debug, Clone)]
pub struct SequentialTokens {
    prefix: String,
    next: u64,
}

impl SequentialTokens {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
        }
    }
}

impl TokenSource for SequentialTokens {
    fn next_token(&mut self) -> String {
        let token = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        token
    }
}
