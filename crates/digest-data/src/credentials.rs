//! API key rotation.

use digest_core::error::DataError;
use parking_lot::Mutex;

/// Round-robin pool of provider API keys.
///
/// The current key stays in use until the provider rate-limits it; then
/// [`CredentialPool::advance_from`] moves past it, wrapping around.
#[derive(Debug)]
pub struct CredentialPool {
    keys: Vec<String>,
    index: Mutex<usize>,
}

impl CredentialPool {
    /// Create a pool. Blank keys are dropped; an empty result is an error.
    pub fn new<I, S>(keys: I) -> Result<Self, DataError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: Vec<String> = keys
            .into_iter()
            .map(|k| k.into().trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();

        if keys.is_empty() {
            return Err(DataError::Credentials("no API keys configured".into()));
        }

        Ok(Self {
            keys,
            index: Mutex::new(0),
        })
    }

    /// Key to use for the next request.
    pub fn current(&self) -> String {
        let index = *self.index.lock();
        self.keys[index].clone()
    }

    /// Rotate to the next key and return it.
    pub fn advance(&self) -> String {
        let mut index = self.index.lock();
        self.step(&mut index)
    }

    /// Move past `exhausted` if it is still the current key.
    ///
    /// Concurrent requests that hit the limit on the same key rotate once;
    /// later callers get the key the first one moved to.
    pub fn advance_from(&self, exhausted: &str) -> String {
        let mut index = self.index.lock();
        if self.keys[*index] == exhausted {
            return self.step(&mut index);
        }
        self.keys[*index].clone()
    }

    fn step(&self, index: &mut usize) -> String {
        *index = (*index + 1) % self.keys.len();
        self.keys[*index].clone()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Mask a key for logs, keeping the last four characters.
pub fn mask_key(key: &str) -> String {
    let visible: String = key
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("***{}", visible)
}
