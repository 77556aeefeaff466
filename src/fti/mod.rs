//! fti — токенизация текста для полнотекстового индекса.
//!
//! Токен — максимальная последовательность буквенных/цифровых код-пойнтов;
//! каждый символ прогоняется через нормализатор регистра, слова из
//! стоп-списка отбрасываются. Итератор ленивый: вход разбирается по мере
//! запроса токенов.

use std::collections::HashSet;
use std::str::CharIndices;

/// Токен входного текста.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Байтовое смещение первого символа токена.
    pub offset: usize,
    /// Нормализованное слово.
    pub data: String,
}

/// Нормализатор по умолчанию: нижний регистр (первый код-пойнт маппинга).
pub fn lower(r: char) -> char {
    r.to_lowercase().next().unwrap_or(r)
}

/// Ленивый токенизатор текста.
pub struct Tokenizer<'a> {
    chars: CharIndices<'a>,
    cvt: fn(char) -> char,
    stopwords: HashSet<String>,
}

impl<'a> Tokenizer<'a> {
    /// Создать токенизатор входа input; cvt нормализует символы, stopwords
    /// (нормализуются тем же cvt) отбрасываются.
    pub fn new(input: &'a str, cvt: fn(char) -> char, stopwords: &[&str]) -> Self {
        let stopwords = stopwords
            .iter()
            .map(|w| w.chars().map(cvt).collect())
            .collect();
        Self {
            chars: input.char_indices(),
            cvt,
            stopwords,
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            // Пропустить разделители до начала токена.
            let (start, first) = loop {
                let (i, c) = self.chars.next()?;
                if c.is_alphanumeric() {
                    break (i, c);
                }
            };

            let mut word = String::new();
            word.push((self.cvt)(first));
            for (_, c) in self.chars.by_ref() {
                if !c.is_alphanumeric() {
                    break;
                }
                word.push((self.cvt)(c));
            }

            if !self.stopwords.contains(&word) {
                return Some(Token {
                    offset: start,
                    data: word,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizer_boundaries_and_offsets() {
        let tokens: Vec<Token> = Tokenizer::new("Hello, page42 world!", lower, &[]).collect();
        assert_eq!(
            tokens,
            vec![
                Token {
                    offset: 0,
                    data: "hello".into()
                },
                Token {
                    offset: 7,
                    data: "page42".into()
                },
                Token {
                    offset: 14,
                    data: "world".into()
                },
            ]
        );
    }

    #[test]
    fn tokenizer_stopwords_normalized() {
        let tokens: Vec<String> = Tokenizer::new("The cat and THE dog", lower, &["the", "AND"])
            .map(|t| t.data)
            .collect();
        assert_eq!(tokens, vec!["cat", "dog"]);
    }

    #[test]
    fn tokenizer_empty_and_separators_only() {
        assert_eq!(Tokenizer::new("", lower, &[]).count(), 0);
        assert_eq!(Tokenizer::new(" ,.;!?\n\t", lower, &[]).count(), 0);
    }

    #[test]
    fn tokenizer_unicode_words() {
        let tokens: Vec<Token> = Tokenizer::new("Привет, мир", lower, &[]).collect();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].data, "привет");
        assert_eq!(tokens[1].data, "мир");
        assert_eq!(tokens[1].offset, "Привет, ".len());
    }
}
