//! Lexer implementation

use super::token::*;
use crate::error::CompileError;
use std::iter::Peekable;
use std::str::CharIndices;

// ============================================================================
// LEXER IMPLEMENTATION
// ============================================================================

/// Lexer for the optgen language.
///
/// The lexer is an iterator: tokens are produced on demand and the sequence
/// always ends with exactly one `Eof` token. Malformed input becomes
/// `TokenKind::Error` tokens and scanning continues after them.
pub struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
    line: usize,
    column: usize,
    pos: usize,
    finished: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            line: 1,
            column: 1,
            pos: 0,
            finished: false,
        }
    }

    /// Tokenize the entire source into a vector of tokens.
    pub fn tokenize(&mut self) -> Vec<Token> {
        self.by_ref().collect()
    }

    /// Get the next token from the source.
    fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start_pos = self.pos;
        let start_line = self.line;
        let start_col = self.column;

        let kind = match self.peek_char() {
            None => TokenKind::Eof,
            Some(c) => match c {
                '{' => self.single(TokenKind::LBrace),
                '}' => self.single(TokenKind::RBrace),
                '(' => self.single(TokenKind::LParen),
                ')' => self.single(TokenKind::RParen),
                '[' => self.single(TokenKind::LBracket),
                ']' => self.single(TokenKind::RBracket),
                ':' => self.single(TokenKind::Colon),
                ',' => self.single(TokenKind::Comma),
                '$' => self.single(TokenKind::Dollar),
                '|' => self.single(TokenKind::Pipe),
                '&' => {
                    self.advance();
                    // `&&` is accepted as a spelling of `&`.
                    if self.peek_char() == Some('&') {
                        self.advance();
                    }
                    TokenKind::Ampersand
                }
                '^' => self.single(TokenKind::Caret),
                '*' => self.single(TokenKind::Asterisk),

                '=' => {
                    self.advance();
                    if self.peek_char() == Some('>') {
                        self.advance();
                        TokenKind::Arrow
                    } else {
                        TokenKind::Error(CompileError::UnrecognizedChar { ch: '=' })
                    }
                }

                '.' => {
                    self.advance();
                    if self.peek_char() == Some('.') && self.peek_next_char() == Some('.') {
                        self.advance();
                        self.advance();
                        TokenKind::Ellipses
                    } else {
                        TokenKind::Error(CompileError::UnrecognizedChar { ch: '.' })
                    }
                }

                '#' => self.scan_comment(),

                '"' => self.scan_string(),

                c if c.is_ascii_digit() => self.scan_number(),

                c if c.is_ascii_alphabetic() || c == '_' => self.scan_identifier(),

                c => {
                    self.advance();
                    TokenKind::Error(CompileError::UnrecognizedChar { ch: c })
                }
            },
        };

        Token {
            kind,
            span: Span {
                start: start_pos,
                end: self.pos,
                line: start_line,
                column: start_col,
            },
        }
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    /// Scan an identifier.
    fn scan_identifier(&mut self) -> TokenKind {
        let start = self.pos;

        while let Some(c) = self.peek_char() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }

        TokenKind::Identifier(self.source[start..self.pos].to_string())
    }

    /// Scan a string literal with escape sequences. Strings may not span
    /// lines; the closing quote must appear before the end of the line.
    fn scan_string(&mut self) -> TokenKind {
        self.advance(); // consume opening quote
        let mut value = String::new();

        loop {
            match self.peek_char() {
                None | Some('\n') => return TokenKind::Error(CompileError::UnterminatedString),
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    match self.peek_char() {
                        Some('n') => {
                            self.advance();
                            value.push('\n');
                        }
                        Some('t') => {
                            self.advance();
                            value.push('\t');
                        }
                        Some('\\') => {
                            self.advance();
                            value.push('\\');
                        }
                        Some('"') => {
                            self.advance();
                            value.push('"');
                        }
                        _ => value.push('\\'),
                    }
                }
                Some(c) => {
                    self.advance();
                    value.push(c);
                }
            }
        }

        TokenKind::String(value)
    }

    /// Scan a decimal integer literal.
    fn scan_number(&mut self) -> TokenKind {
        let start = self.pos;

        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }

        let text = &self.source[start..self.pos];
        match text.parse::<i64>() {
            Ok(n) => TokenKind::Number(n),
            Err(_) => TokenKind::Error(CompileError::InvalidNumber {
                text: text.to_string(),
            }),
        }
    }

    /// Scan a `#` comment up to (not including) the end of the line.
    fn scan_comment(&mut self) -> TokenKind {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
        TokenKind::Comment(self.source[start..self.pos].trim_end().to_string())
    }

    /// Skip whitespace, tracking line starts.
    fn skip_whitespace(&mut self) {
        loop {
            match self.peek_char() {
                Some(' ') | Some('\t') | Some('\r') => {
                    self.advance();
                }
                Some('\n') => {
                    self.advance();
                    self.line += 1;
                    self.column = 1;
                }
                _ => break,
            }
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn peek_next_char(&self) -> Option<char> {
        let mut iter = self.source[self.pos..].chars();
        iter.next();
        iter.next()
    }

    fn advance(&mut self) -> Option<char> {
        if let Some((i, c)) = self.chars.next() {
            self.pos = i + c.len_utf8();
            self.column += 1;
            Some(c)
        } else {
            None
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            self.finished = true;
        }
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source).map(|t| t.kind).collect()
    }

    #[test]
    fn test_lexer_punctuation() {
        assert_eq!(
            kinds("{ } [ ] ( ) => : $ , | & ^ * ..."),
            vec![
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::LBracket,
                TokenKind::RBracket,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::Arrow,
                TokenKind::Colon,
                TokenKind::Dollar,
                TokenKind::Comma,
                TokenKind::Pipe,
                TokenKind::Ampersand,
                TokenKind::Caret,
                TokenKind::Asterisk,
                TokenKind::Ellipses,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lexer_identifiers_and_literals() {
        assert_eq!(
            kinds(r#"define Not_1 "a\"b" 42"#),
            vec![
                TokenKind::Identifier("define".to_string()),
                TokenKind::Identifier("Not_1".to_string()),
                TokenKind::String("a\"b".to_string()),
                TokenKind::Number(42),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lexer_positions() {
        let tokens = Lexer::new("define Lt {}\n  define").tokenize();
        assert_eq!((tokens[0].span.line, tokens[0].span.column), (1, 1));
        assert_eq!((tokens[1].span.line, tokens[1].span.column), (1, 8));
        assert_eq!((tokens[2].span.line, tokens[2].span.column), (1, 11));
        assert_eq!((tokens[4].span.line, tokens[4].span.column), (2, 3));
        assert_eq!(tokens[1].span.start, 7);
        assert_eq!(tokens[1].span.end, 9);
    }

    #[test]
    fn test_lexer_comments() {
        let tokens = Lexer::new("# leading comment\ndefine # trailing\n").tokenize();
        assert_eq!(
            tokens[0].kind,
            TokenKind::Comment("# leading comment".to_string())
        );
        assert_eq!(tokens[1].kind, TokenKind::Identifier("define".to_string()));
        assert_eq!(tokens[1].span.line, 2);
        assert_eq!(tokens[2].kind, TokenKind::Comment("# trailing".to_string()));
        assert_eq!(tokens[3].kind, TokenKind::Eof);
    }

    #[test]
    fn test_lexer_unterminated_string_continues() {
        let tokens = Lexer::new("\"abc\ndefine @").tokenize();
        assert_eq!(
            tokens[0].kind,
            TokenKind::Error(CompileError::UnterminatedString)
        );
        assert_eq!(tokens[1].kind, TokenKind::Identifier("define".to_string()));
        assert_eq!(
            tokens[2].kind,
            TokenKind::Error(CompileError::UnrecognizedChar { ch: '@' })
        );
        assert_eq!(tokens[3].kind, TokenKind::Eof);
    }

    #[test]
    fn test_lexer_unterminated_string_at_eof() {
        let tokens = Lexer::new("\"abc").tokenize();
        assert_eq!(tokens.len(), 2);
        assert_eq!(
            tokens[0].kind,
            TokenKind::Error(CompileError::UnterminatedString)
        );
    }

    #[test]
    fn test_lexer_lone_dot_and_equals() {
        assert_eq!(
            kinds(". = .."),
            vec![
                TokenKind::Error(CompileError::UnrecognizedChar { ch: '.' }),
                TokenKind::Error(CompileError::UnrecognizedChar { ch: '=' }),
                TokenKind::Error(CompileError::UnrecognizedChar { ch: '.' }),
                TokenKind::Error(CompileError::UnrecognizedChar { ch: '.' }),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lexer_double_ampersand() {
        let tokens = Lexer::new("& && &&&").tokenize();
        let kinds: Vec<TokenKind> = tokens.into_iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Ampersand,
                TokenKind::Ampersand,
                TokenKind::Ampersand,
                TokenKind::Ampersand,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lexer_number_overflow() {
        let tokens = Lexer::new("99999999999999999999").tokenize();
        assert!(matches!(
            tokens[0].kind,
            TokenKind::Error(CompileError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_lexer_iterator_stops_after_eof() {
        let mut lexer = Lexer::new("");
        assert_eq!(lexer.next().map(|t| t.kind), Some(TokenKind::Eof));
        assert_eq!(lexer.next(), None);
    }
}
