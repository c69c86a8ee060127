use std::fmt;

use crate::{
    CompileError, CompileOptions, CompileResult, ErrorKind, ErrorReporting, Punct,
    SourceLocation, Token, TokenKind, P,
};

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Number(i64),
    Add(P<ExprNode>, P<ExprNode>),
    Sub(P<ExprNode>, P<ExprNode>),
    Mul(P<ExprNode>, P<ExprNode>),
    Div(P<ExprNode>, P<ExprNode>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprNode {
    pub kind: ExprKind,
    height: usize,
}

impl ExprNode {
    pub fn new(kind: ExprKind) -> Self {
        let height = match &kind {
            ExprKind::Number(_) => 1,
            ExprKind::Add(lhs, rhs)
            | ExprKind::Sub(lhs, rhs)
            | ExprKind::Mul(lhs, rhs)
            | ExprKind::Div(lhs, rhs) => 1 + lhs.height.max(rhs.height),
        };
        Self { kind, height }
    }

    pub fn number(val: i64) -> Self {
        Self::new(ExprKind::Number(val))
    }

    /// Longest path from this node down to a literal, counting both ends.
    pub fn height(&self) -> usize {
        self.height
    }
}

/// Fully parenthesized infix, which parses back to the same tree.
impl fmt::Display for ExprNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Number(val) => write!(f, "{}", val),
            ExprKind::Add(lhs, rhs) => write!(f, "({} + {})", lhs, rhs),
            ExprKind::Sub(lhs, rhs) => write!(f, "({} - {})", lhs, rhs),
            ExprKind::Mul(lhs, rhs) => write!(f, "({} * {})", lhs, rhs),
            ExprKind::Div(lhs, rhs) => write!(f, "({} / {})", lhs, rhs),
        }
    }
}

pub struct Parser<'a> {
    pub source: &'a str,
    pub tokens: Vec<Token>,
    pub index: usize,
    pub depth: usize,
    pub max_depth: usize,
}

impl ErrorReporting for Parser<'_> {
    fn src(&self) -> &str {
        self.source
    }
}

pub fn parse(source: &str, tokens: Vec<Token>) -> CompileResult<ExprNode> {
    Parser::new(source, tokens).parse()
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, tokens: Vec<Token>) -> Self {
        Self::with_options(source, tokens, &CompileOptions::default())
    }

    pub fn with_options(source: &'a str, mut tokens: Vec<Token>, options: &CompileOptions) -> Self {
        if tokens.last().map(|tok| &tok.kind) != Some(&TokenKind::Eof) {
            tokens.push(Token {
                kind: TokenKind::Eof,
                loc: SourceLocation {
                    offset: source.len(),
                    line: source.lines().count().max(1),
                    column: source.lines().last().map_or(0, str::len) + 1,
                },
                length: 0,
            });
        }

        Self {
            source,
            tokens,
            index: 0,
            depth: 0,
            max_depth: options.max_depth,
        }
    }

    // parse = expr eof
    pub fn parse(&mut self) -> CompileResult<ExprNode> {
        let node = self.expr()?;
        self.ensure_done()?;
        Ok(node)
    }

    // expr = mul ("+" mul | "-" mul)*
    fn expr(&mut self) -> CompileResult<ExprNode> {
        let mut node = self.mul()?;

        loop {
            let loc = self.loc();
            if self.try_consume(Punct::Plus) {
                let rhs = self.mul()?;
                node = self.fold(ExprKind::Add(P::new(node), P::new(rhs)), loc)?;
            } else if self.try_consume(Punct::Minus) {
                let rhs = self.mul()?;
                node = self.fold(ExprKind::Sub(P::new(node), P::new(rhs)), loc)?;
            } else {
                return Ok(node);
            }
        }
    }

    // mul = primary ("*" primary | "/" primary)*
    fn mul(&mut self) -> CompileResult<ExprNode> {
        let mut node = self.primary()?;

        loop {
            let loc = self.loc();
            if self.try_consume(Punct::Star) {
                let rhs = self.primary()?;
                node = self.fold(ExprKind::Mul(P::new(node), P::new(rhs)), loc)?;
            } else if self.try_consume(Punct::Slash) {
                let rhs = self.primary()?;
                node = self.fold(ExprKind::Div(P::new(node), P::new(rhs)), loc)?;
            } else {
                return Ok(node);
            }
        }
    }

    // primary = "(" expr ")" | num
    fn primary(&mut self) -> CompileResult<ExprNode> {
        let loc = self.loc();
        if self.try_consume(Punct::LeftParen) {
            self.enter(loc)?;
            let node = self.expr()?;
            self.expect_consume(Punct::RightParen)?;
            self.depth -= 1;
            return Ok(node);
        }

        Ok(ExprNode::number(self.expect_number()?))
    }

    /// Advance past `punct` if it is the current token.
    pub fn try_consume(&mut self, punct: Punct) -> bool {
        if self.peek().kind == TokenKind::Punct(punct) {
            self.advance();
            return true;
        }
        false
    }

    pub fn expect_consume(&mut self, punct: Punct) -> CompileResult<()> {
        if !self.try_consume(punct) {
            return Err(self.error_tok(self.peek(), ErrorKind::Expected(punct)));
        }
        Ok(())
    }

    pub fn expect_number(&mut self) -> CompileResult<i64> {
        match self.peek().kind {
            TokenKind::Number(val) => {
                self.advance();
                Ok(val)
            }
            _ => Err(self.error_tok(self.peek(), ErrorKind::ExpectedNumber)),
        }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.index]
    }

    // Eof is never consumed, so the cursor cannot run off the end.
    fn advance(&mut self) {
        if self.index + 1 < self.tokens.len() {
            self.index += 1;
        }
    }

    fn ensure_done(&self) -> CompileResult<()> {
        match self.peek().kind {
            TokenKind::Eof => Ok(()),
            _ => Err(self.error_tok(self.peek(), ErrorKind::ExtraToken)),
        }
    }

    fn enter(&mut self, loc: SourceLocation) -> CompileResult<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(self.too_deep(loc));
        }
        Ok(())
    }

    fn fold(&self, kind: ExprKind, loc: SourceLocation) -> CompileResult<ExprNode> {
        let node = ExprNode::new(kind);
        if node.height > self.max_depth {
            return Err(self.too_deep(loc));
        }
        Ok(node)
    }

    fn too_deep(&self, loc: SourceLocation) -> CompileError {
        self.error_at(
            loc.offset,
            ErrorKind::NestingTooDeep {
                limit: self.max_depth,
            },
        )
    }

    fn loc(&self) -> SourceLocation {
        self.peek().loc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{tokenize, ErrorClass};

    fn parse_src(src: &str) -> CompileResult<ExprNode> {
        parse(src, tokenize(src).unwrap())
    }

    fn num(val: i64) -> P<ExprNode> {
        P::new(ExprNode::number(val))
    }

    fn node(kind: ExprKind) -> P<ExprNode> {
        P::new(ExprNode::new(kind))
    }

    #[test]
    fn single_number() {
        assert_eq!(parse_src("42").unwrap(), ExprNode::number(42));
    }

    #[test]
    fn mul_binds_tighter() {
        let expected = ExprNode::new(ExprKind::Add(
            num(1),
            node(ExprKind::Mul(num(2), num(3))),
        ));
        assert_eq!(parse_src("1+2*3").unwrap(), expected);
    }

    #[test]
    fn parens_group() {
        let expected = ExprNode::new(ExprKind::Mul(
            node(ExprKind::Add(num(1), num(2))),
            num(3),
        ));
        assert_eq!(parse_src("(1+2)*3").unwrap(), expected);
    }

    #[test]
    fn sub_folds_left() {
        let expected = ExprNode::new(ExprKind::Sub(
            node(ExprKind::Sub(num(8), num(3))),
            num(2),
        ));
        assert_eq!(parse_src("8-3-2").unwrap(), expected);
    }

    #[test]
    fn div_folds_left() {
        let tree = parse_src("100 / 10 / 5").unwrap();
        assert_eq!(tree.to_string(), "((100 / 10) / 5)");
        assert_eq!(tree.height(), 3);
    }

    #[test]
    fn printer_output() {
        let tree = parse_src(" 1 + 2 * (3 - 4) / 5 ").unwrap();
        assert_eq!(tree.to_string(), "(1 + ((2 * (3 - 4)) / 5))");
    }

    #[test]
    fn printed_form_reparses_to_same_tree() {
        for src in ["1", "1+2*3", "(1+2)*3", "8-3-2", "((7))/2-(4*(5+6))", "1*2*3+4/5-6"] {
            let tree = parse_src(src).unwrap();
            let printed = tree.to_string();
            assert_eq!(parse_src(&printed).unwrap(), tree, "{src} -> {printed}");
        }
    }

    #[test]
    fn missing_operand() {
        let err = parse_src("1+").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExpectedNumber);
        assert_eq!(err.class(), ErrorClass::Parse);
        assert_eq!(err.offset, 2);
        assert_eq!(err.to_string(), "1+\n  ^\nexpected number");
    }

    #[test]
    fn empty_input() {
        let err = parse_src("").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExpectedNumber);
        assert_eq!(err.offset, 0);
    }

    #[test]
    fn unary_minus_is_not_supported() {
        let err = parse_src("-1").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExpectedNumber);
        assert_eq!(err.offset, 0);
    }

    #[test]
    fn unclosed_paren() {
        let err = parse_src("(1+2").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Expected(Punct::RightParen));
        assert_eq!(err.offset, 4);
        assert_eq!(err.to_string(), "(1+2\n    ^\nexpected closing parenthesis");
    }

    #[test]
    fn empty_parens() {
        let err = parse_src("()").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExpectedNumber);
        assert_eq!(err.offset, 1);
    }

    #[test]
    fn trailing_tokens() {
        let err = parse_src("1 2").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExtraToken);
        assert_eq!(err.offset, 2);

        let err = parse_src("(1))").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExtraToken);
        assert_eq!(err.offset, 3);
    }

    #[test]
    fn try_consume_does_not_advance_on_mismatch() {
        let src = "+ 1";
        let mut parser = Parser::new(src, tokenize(src).unwrap());
        assert!(!parser.try_consume(Punct::Minus));
        assert_eq!(parser.index, 0);
        assert!(parser.try_consume(Punct::Plus));
        assert_eq!(parser.expect_number(), Ok(1));
        assert!(parser.expect_consume(Punct::Star).is_err());
    }

    #[test]
    fn missing_eof_is_supplied() {
        let mut tokens = tokenize("7*").unwrap();
        tokens.pop();
        let err = parse("7*", tokens).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExpectedNumber);
    }

    #[test]
    fn paren_depth_limit() {
        let src = "(((1)))";
        let options = CompileOptions { max_depth: 2 };
        let err = Parser::with_options(src, tokenize(src).unwrap(), &options)
            .parse()
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NestingTooDeep { limit: 2 });
        assert_eq!(err.class(), ErrorClass::NestingTooDeep);
        assert_eq!(err.offset, 2);
    }

    #[test]
    fn chain_height_limit() {
        let src = "1+1+1+1";
        let options = CompileOptions { max_depth: 3 };
        let err = Parser::with_options(src, tokenize(src).unwrap(), &options)
            .parse()
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NestingTooDeep { limit: 3 });
        assert_eq!(err.offset, 5);

        let ok = Parser::with_options("1+1+1", tokenize("1+1+1").unwrap(), &options).parse();
        assert_eq!(ok.unwrap().height(), 3);
    }
}
