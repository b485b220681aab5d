//! Parser implementation

use super::ast::*;
use crate::error::CompileError;
use crate::lexer::*;

impl Parser {
    /// Parse one top-level statement.
    pub(crate) fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        if self.check(&TokenKind::LBracket) {
            let pos = self.here();
            self.advance();
            let names = match self.parse_name_list() {
                Ok(names) => names,
                Err(err) => {
                    // A broken tag list in front of a define loses that define.
                    if self.define_on_line(pos.line) {
                        self.in_define = true;
                    }
                    return Err(err);
                }
            };

            if self.check_keyword("define") {
                return Ok(Statement::Define(self.parse_define(names)?));
            }

            let mut names = names.into_iter();
            let name = match names.next() {
                Some(name) => name,
                None => return Err(self.error("rule name")),
            };
            return Ok(Statement::Rule(self.parse_rule(name, names.collect(), pos)?));
        }

        if self.check_keyword("define") {
            return Ok(Statement::Define(self.parse_define(Vec::new())?));
        }

        Err(self.error("define or rule statement"))
    }

    /// Parse `NAME ("," NAME)* "]"` after an opening bracket.
    fn parse_name_list(&mut self) -> Result<Vec<Name>, ParseError> {
        let mut names = vec![self.expect_name("name")?];
        while self.check(&TokenKind::Comma) {
            self.advance();
            names.push(self.expect_name("tag name")?);
        }
        self.expect(TokenKind::RBracket)?;
        Ok(names)
    }

    /// Parse a define statement starting at the `define` keyword.
    pub(crate) fn parse_define(&mut self, tags: Vec<Name>) -> Result<DefineStmt, ParseError> {
        let pos = self.here();
        self.in_define = true;
        self.advance();

        let name = self.expect_name("define name")?;
        self.expect(TokenKind::LBrace)?;

        let mut fields = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            if self.at_statement_start() {
                return Err(self.error("'}'"));
            }
            let field_pos = self.here();
            let field_name = self.expect_name("define field name")?;
            let typ = self.expect_name("define field type")?;
            fields.push(FieldStmt {
                name: field_name,
                typ,
                pos: field_pos,
            });
        }
        self.expect(TokenKind::RBrace)?;

        Ok(DefineStmt {
            tags,
            name,
            fields,
            pos,
        })
    }

    /// Parse the match and replace halves of a rule whose header has been
    /// consumed.
    pub(crate) fn parse_rule(
        &mut self,
        name: Name,
        tags: Vec<Name>,
        pos: SourcePos,
    ) -> Result<RuleStmt, ParseError> {
        let pattern = self.parse_match()?;
        self.expect(TokenKind::Arrow)?;
        let replace = self.parse_replace()?;

        Ok(RuleStmt {
            name,
            tags,
            pattern,
            replace,
            pos,
        })
    }

    // ========================================================================
    // Match patterns
    // ========================================================================

    /// Parse `"(" NAME ("|" NAME)* arg* ")"`.
    pub(crate) fn parse_match(&mut self) -> Result<Pattern, ParseError> {
        self.nested(Self::match_func)
    }

    fn match_func(&mut self) -> Result<Pattern, ParseError> {
        let pos = self.here();
        self.expect(TokenKind::LParen)?;

        let mut names = vec![self.expect_name("match name")?];
        while self.check(&TokenKind::Pipe) {
            self.advance();
            names.push(self.expect_name("match name")?);
        }

        let mut args = Vec::new();
        while !self.check(&TokenKind::RParen) && !self.is_at_end() {
            if self.at_statement_start() {
                return Err(self.error("')'"));
            }
            args.push(self.parse_arg()?);
        }
        self.expect(TokenKind::RParen)?;

        Ok(Pattern::Func { names, args, pos })
    }

    pub(crate) fn parse_arg(&mut self) -> Result<Pattern, ParseError> {
        self.parse_and()
    }

    pub(crate) fn parse_and(&mut self) -> Result<Pattern, ParseError> {
        let mut left = self.parse_unary()?;

        // Each `&` nests the chain so far one level deeper.
        let mut chain = 0;
        while self.check(&TokenKind::Ampersand) {
            chain += 1;
            if self.depth + chain > MAX_NESTING {
                return Err(self.nesting_error());
            }
            self.advance();
            let right = self.parse_unary()?;
            let pos = left.pos().clone();
            left = Pattern::And {
                left: Box::new(left),
                right: Box::new(right),
                pos,
            };
        }

        Ok(left)
    }

    pub(crate) fn parse_unary(&mut self) -> Result<Pattern, ParseError> {
        self.nested(Self::unary)
    }

    fn unary(&mut self) -> Result<Pattern, ParseError> {
        let pos = self.here();
        if self.at_statement_start() {
            return Err(self.error("match pattern"));
        }
        match &self.current().kind {
            TokenKind::Caret => {
                self.advance();
                let input = self.parse_unary()?;
                Ok(Pattern::Not {
                    input: Box::new(input),
                    pos,
                })
            }
            TokenKind::Dollar => {
                self.advance();
                let label = self.expect_name("label")?;
                if self.check(&TokenKind::Colon) {
                    self.advance();
                    let target = self.parse_unary()?;
                    Ok(Pattern::Bind {
                        label,
                        target: Box::new(target),
                        pos,
                    })
                } else {
                    Ok(Pattern::Ref { label, pos })
                }
            }
            TokenKind::Asterisk => {
                self.advance();
                Ok(Pattern::Any { pos })
            }
            TokenKind::String(s) => {
                let value = s.clone();
                self.advance();
                Ok(Pattern::String { value, pos })
            }
            TokenKind::Number(n) => {
                let value = *n;
                self.advance();
                Ok(Pattern::Number { value, pos })
            }
            TokenKind::LBracket => {
                self.advance();
                self.expect(TokenKind::Ellipses)?;
                let item = self.parse_arg()?;
                self.expect(TokenKind::Ellipses)?;
                self.expect(TokenKind::RBracket)?;
                Ok(Pattern::List {
                    item: Box::new(item),
                    pos,
                })
            }
            TokenKind::LParen => self.parse_match(),
            _ => Err(self.error("match pattern")),
        }
    }

    // ========================================================================
    // Replace expressions
    // ========================================================================

    pub(crate) fn parse_replace(&mut self) -> Result<Replace, ParseError> {
        self.nested(Self::replace)
    }

    fn replace(&mut self) -> Result<Replace, ParseError> {
        let pos = self.here();
        if self.at_statement_start() {
            return Err(self.error("replace expression"));
        }
        match &self.current().kind {
            TokenKind::LParen => {
                self.advance();
                let name = self.expect_name("construct name")?;
                let mut args = Vec::new();
                while !self.check(&TokenKind::RParen) && !self.is_at_end() {
                    if self.at_statement_start() {
                        return Err(self.error("')'"));
                    }
                    args.push(self.parse_replace()?);
                }
                self.expect(TokenKind::RParen)?;
                Ok(Replace::Construct { name, args, pos })
            }
            TokenKind::LBracket => {
                self.advance();
                let mut items = Vec::new();
                while !self.check(&TokenKind::RBracket) && !self.is_at_end() {
                    if self.at_statement_start() {
                        return Err(self.error("']'"));
                    }
                    items.push(self.parse_replace()?);
                }
                self.expect(TokenKind::RBracket)?;
                Ok(Replace::List { items, pos })
            }
            TokenKind::Dollar => {
                self.advance();
                let label = self.expect_name("label")?;
                Ok(Replace::Ref { label, pos })
            }
            TokenKind::String(s) => {
                let value = s.clone();
                self.advance();
                Ok(Replace::String { value, pos })
            }
            TokenKind::Number(n) => {
                let value = *n;
                self.advance();
                Ok(Replace::Number { value, pos })
            }
            _ => Err(self.error("replace expression")),
        }
    }

    // ========================================================================
    // Recovery
    // ========================================================================

    /// True when the current token can begin a statement: a `[` or `define`
    /// in the first column.
    pub(crate) fn at_statement_start(&self) -> bool {
        let token = self.current();
        token.span.column == 1
            && match &token.kind {
                TokenKind::LBracket => true,
                TokenKind::Identifier(s) => s == "define",
                _ => false,
            }
    }

    /// Skip to the next statement boundary after a failed statement that
    /// began at token index `start`. Lexical errors skipped along the way
    /// are still reported.
    pub(crate) fn synchronize(&mut self, start: usize) {
        if self.pos == start {
            self.advance();
        }
        while !self.is_at_end() && !self.at_statement_start() {
            if let TokenKind::Error(err) = &self.current().kind {
                let err = err.clone();
                let pos = self.here();
                self.diagnostics.error(pos, err);
            }
            self.advance();
        }
    }

    /// True when a `define` keyword appears later on `line`.
    pub(crate) fn define_on_line(&self, line: usize) -> bool {
        self.tokens[self.pos..]
            .iter()
            .take_while(|t| t.span.line == line && t.kind != TokenKind::Eof)
            .any(|t| matches!(&t.kind, TokenKind::Identifier(s) if s == "define"))
    }

    // ========================================================================
    // Helper methods
    // ========================================================================

    /// Run `parse` one nesting level deeper, failing past [`MAX_NESTING`].
    fn nested<T>(
        &mut self,
        parse: fn(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(self.nesting_error());
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn nesting_error(&self) -> ParseError {
        let token = self.current();
        ParseError {
            error: CompileError::NestingTooDeep { limit: MAX_NESTING },
            line: token.span.line,
            column: token.span.column,
        }
    }

    pub(crate) fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    pub(crate) fn advance(&mut self) {
        if !self.is_at_end() {
            self.pos += 1;
        }
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current().kind) == std::mem::discriminant(kind)
    }

    pub(crate) fn check_keyword(&self, keyword: &str) -> bool {
        matches!(&self.current().kind, TokenKind::Identifier(s) if s == keyword)
    }

    pub(crate) fn here(&self) -> SourcePos {
        self.current().span.at(&self.file)
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        if self.check(&kind) {
            self.advance();
            Ok(())
        } else {
            Err(self.error(&kind.to_string()))
        }
    }

    /// Expect an identifier, describing it as `what` on failure.
    pub(crate) fn expect_name(&mut self, what: &str) -> Result<Name, ParseError> {
        match &self.current().kind {
            TokenKind::Identifier(s) => {
                let name = Name::new(s.clone(), self.here());
                self.advance();
                Ok(name)
            }
            _ => Err(self.error(what)),
        }
    }

    /// Build an error at the current token. A lexical error token reports
    /// its own message instead of the expectation.
    pub(crate) fn error(&self, expected: &str) -> ParseError {
        let token = self.current();
        let error = match &token.kind {
            TokenKind::Error(err) => err.clone(),
            kind => CompileError::Expected {
                expected: expected.to_string(),
                found: kind.to_string(),
            },
        };
        ParseError {
            error,
            line: token.span.line,
            column: token.span.column,
        }
    }
}
