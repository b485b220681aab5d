//! Fuzz target for the optgen lexer.
//!
//! Run with: cargo +nightly fuzz run lexer_fuzz -- -max_total_time=60

#![no_main]

use libfuzzer_sys::fuzz_target;
use optgen_lang::{Lexer, TokenKind};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let tokens = Lexer::new(input).tokenize();

        // Exactly one Eof, and it comes last.
        let eofs = tokens.iter().filter(|t| t.kind == TokenKind::Eof).count();
        assert_eq!(eofs, 1, "token stream must contain exactly one Eof");
        assert!(matches!(tokens.last().map(|t| &t.kind), Some(TokenKind::Eof)));

        for token in &tokens {
            assert!(token.span.start <= token.span.end);
            assert!(token.span.end <= input.len());
            assert!(token.span.line >= 1);
            assert!(token.span.column >= 1);
        }
    }
});
