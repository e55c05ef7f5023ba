//! Placeholder registry that hides text from later rendering passes.
//!
//! A literal is swapped for a random alphanumeric token. No pass rewrites
//! alphanumerics, so the token travels through the pipeline untouched and is
//! swapped back at the end of the conversion. A registry belongs to exactly one
//! conversion.

use std::collections::HashMap;

use rand::Rng;

/// Length of every token minted by [`Protector`].
pub const TOKEN_LEN: usize = 20;

const TOKEN_ALPHABET: &[u8] = b"0123456789qwertyuiopasdfghjklzxcvbnmQWERTYUIOPASDFGHJKLZXCVBNM";

#[derive(Debug)]
struct Entry {
    token: String,
    literal: String,
}

/// Bidirectional literal/token map scoped to one conversion.
#[derive(Debug, Default)]
pub struct Protector {
    entries: Vec<Entry>,
    by_literal: HashMap<String, usize>,
    by_token: HashMap<String, usize>,
}

impl Protector {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Return the token standing in for `literal`, minting one on first use.
    ///
    /// # Examples
    ///
    /// ```
    /// use mdpost::protect::Protector;
    ///
    /// let mut p = Protector::new();
    /// let t = p.encode("*");
    /// assert_eq!(p.encode("*"), t);
    /// assert_eq!(p.decode(&t), Some("*"));
    /// ```
    pub fn encode(&mut self, literal: &str) -> String {
        if let Some(&idx) = self.by_literal.get(literal) {
            return self.entries[idx].token.clone();
        }
        let token = self.mint();
        let idx = self.entries.len();
        self.by_literal.insert(literal.to_owned(), idx);
        self.by_token.insert(token.clone(), idx);
        self.entries.push(Entry {
            token: token.clone(),
            literal: literal.to_owned(),
        });
        token
    }

    /// Look up the literal behind `token`.
    #[must_use]
    pub fn decode(&self, token: &str) -> Option<&str> {
        self.by_token
            .get(token)
            .map(|&idx| self.entries[idx].literal.as_str())
    }

    /// Every token minted so far, oldest first.
    pub fn tokens(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.entries.iter().map(|e| e.token.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize { self.entries.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Replace every outstanding token in `text` with its literal.
    ///
    /// Tokens are visited newest first. A literal can only embed tokens that
    /// were minted before it, so expanding it first exposes those inner tokens
    /// to the iterations that follow and nothing is left half restored.
    #[must_use]
    pub fn restore(&self, text: &str) -> String {
        let mut out = text.to_owned();
        for token in self.tokens().rev() {
            if let Some(literal) = self.decode(token).filter(|_| out.contains(token)) {
                out = out.replace(token, literal);
            }
        }
        out
    }

    fn mint(&self) -> String {
        let mut rng = rand::rng();
        loop {
            let token: String = (0..TOKEN_LEN)
                .map(|_| char::from(TOKEN_ALPHABET[rng.random_range(0..TOKEN_ALPHABET.len())]))
                .collect();
            if !self.by_token.contains_key(&token) {
                return token;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_fixed_length_alphanumerics() {
        let mut p = Protector::new();
        let token = p.encode("<div>");
        assert_eq!(token.len(), TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn encode_is_stable_per_literal() {
        let mut p = Protector::new();
        let a = p.encode("_");
        let b = p.encode("*");
        assert_ne!(a, b);
        assert_eq!(p.encode("_"), a);
        assert_eq!(p.len(), 2);
    }

    #[test]
    fn decode_unknown_token_is_none() {
        let p = Protector::new();
        assert!(p.decode("abcdefghijklmnopqrst").is_none());
    }

    #[test]
    fn restore_expands_nested_literals() {
        let mut p = Protector::new();
        let star = p.encode("*");
        let block = p.encode(&format!("<pre>{star}</pre>"));
        let text = format!("a {block} b {star}");
        assert_eq!(p.restore(&text), "a <pre>*</pre> b *");
    }

    #[test]
    fn tokens_are_listed_oldest_first() {
        let mut p = Protector::new();
        let a = p.encode("a");
        let b = p.encode("b");
        assert_eq!(p.tokens().collect::<Vec<_>>(), vec![a.as_str(), b.as_str()]);
    }
}
