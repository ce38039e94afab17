use crate::domain::model::{ShortCode, MAX_CODE_LEN, MIN_CODE_LEN};
use crate::error::RegistryError;
use rand::Rng;

/// No `0`, `O`, `1`, `I` or `L`: they get misread on printed cards.
pub const DEFAULT_ALPHABET: &str = "23456789ABCDEFGHJKMNPQRSTUVWXYZ";
pub const DEFAULT_PREFIX: &str = "VS";

const AMBIGUOUS: &[u8] = b"0O1IL";

/// How fresh short codes are minted.
///
/// Codes start at `length` characters (prefix included). After
/// `attempts_per_length` collisions at one length the next length is tried,
/// up to `max_length`.
#[derive(Clone, Debug)]
pub struct CodePolicy {
    pub prefix: String,
    pub alphabet: String,
    pub length: usize,
    pub max_length: usize,
    pub attempts_per_length: usize,
}

impl Default for CodePolicy {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            alphabet: DEFAULT_ALPHABET.to_string(),
            length: MIN_CODE_LEN,
            max_length: MAX_CODE_LEN,
            attempts_per_length: 32,
        }
    }
}

impl CodePolicy {
    pub fn validate(&self) -> Result<(), RegistryError> {
        let invalid = |msg: String| Err(RegistryError::InvalidPolicy(msg));
        if self.length < MIN_CODE_LEN || self.max_length > MAX_CODE_LEN {
            return invalid(format!(
                "code lengths must stay within {}..={}",
                MIN_CODE_LEN, MAX_CODE_LEN
            ));
        }
        if self.length > self.max_length {
            return invalid("length exceeds max_length".to_string());
        }
        if self.prefix.len() >= self.length {
            return invalid("prefix leaves no room for random characters".to_string());
        }
        if self.alphabet.is_empty() {
            return invalid("alphabet is empty".to_string());
        }
        if self.attempts_per_length == 0 {
            return invalid("attempts_per_length must be positive".to_string());
        }
        let chars = self.prefix.bytes().chain(self.alphabet.bytes());
        for b in chars {
            if !(b.is_ascii_uppercase() || b.is_ascii_digit()) {
                return invalid(format!("`{}` is not an uppercase alphanumeric", b as char));
            }
        }
        if let Some(b) = self.alphabet.bytes().find(|b| AMBIGUOUS.contains(b)) {
            return invalid(format!("alphabet contains ambiguous glyph `{}`", b as char));
        }
        Ok(())
    }

    /// Lengths tried in order.
    pub fn lengths(&self) -> std::ops::RangeInclusive<usize> {
        self.length..=self.max_length
    }

    /// Draws a random candidate of `length` characters.
    pub fn mint(&self, length: usize) -> ShortCode {
        let alphabet = self.alphabet.as_bytes();
        let mut rng = rand::thread_rng();
        let mut code = String::with_capacity(length);
        code.push_str(&self.prefix);
        while code.len() < length {
            code.push(alphabet[rng.gen_range(0..alphabet.len())] as char);
        }
        ShortCode::from_minted(code)
    }
}
