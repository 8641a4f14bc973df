use log::trace;

use crate::lexer::{Token, TokenKind};

use super::{
    Array, ArrayAccess, ArrayAssign, Assignment, BinaryOp, BinaryVerb, Block, Boolean,
    CompareVerb, Comparison, ElifClause, For, FuncCall, FuncDef, If, LogicalOp, LogicalVerb,
    NotOp, Number, ParseError, ParseResult, Print, Return, Statement, StringOp, StringOpKind,
    Str, Variable, While,
};

/// Recursive-descent parser over the lexer's token stream, implementing the
/// grammar of spec.md §4.2. There is no error recovery: the first grammar
/// violation aborts parsing.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Consume the parser, producing the program's top-level statements or
    /// the first parse error encountered.
    pub fn parse(mut self) -> ParseResult<Vec<Statement>> {
        let mut statements = Vec::new();
        loop {
            self.skip_blank_lines();
            if self.check(TokenKind::Eof) {
                break;
            }
            statements.push(self.statement()?);
        }
        Ok(statements)
    }

    fn skip_blank_lines(&mut self) {
        while self.check(TokenKind::Newline) {
            self.advance();
        }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn line(&self) -> usize {
        self.peek().line
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParseError::new(
                format!("expected {what}, found {:?}", self.peek_kind()),
                self.line(),
            ))
        }
    }

    /// A simple statement's terminator: a `Newline`, or end-of-file if the
    /// source has no trailing newline on its last line.
    fn end_of_statement(&mut self) -> ParseResult<()> {
        if self.check(TokenKind::Newline) {
            self.advance();
            Ok(())
        } else if self.check(TokenKind::Eof) {
            Ok(())
        } else {
            Err(ParseError::new(
                format!("expected newline, found {:?}", self.peek_kind()),
                self.line(),
            ))
        }
    }

    /// A compound statement's header is always followed by a block, so the
    /// newline before it is mandatory.
    fn expect_newline(&mut self) -> ParseResult<()> {
        self.expect(TokenKind::Newline, "newline").map(|_| ())
    }

    /// `End` is optional sugar; `Dedent` alone already closed the block, and
    /// with no `End` there is no terminator token between the `Dedent` and
    /// whatever comes next (another statement's first token, or a further
    /// `Dedent`) — so only demand a terminator when `End` was actually
    /// consumed.
    fn consume_optional_end(&mut self) -> ParseResult<()> {
        if self.check(TokenKind::End) {
            self.advance();
            self.end_of_statement()
        } else {
            Ok(())
        }
    }

    fn statement(&mut self) -> ParseResult<Statement> {
        trace!("parsing statement starting at {:?}", self.peek_kind());
        match self.peek_kind() {
            TokenKind::Print => self.print_statement(),
            TokenKind::If => self.if_statement(),
            TokenKind::While => self.while_statement(),
            TokenKind::For => self.for_statement(),
            TokenKind::Func => self.func_def(),
            TokenKind::Return => self.return_statement(),
            TokenKind::Identifier => self.identifier_statement(),
            other => Err(ParseError::new(
                format!("unexpected token {other:?} at statement position"),
                self.line(),
            )),
        }
    }

    fn print_statement(&mut self) -> ParseResult<Statement> {
        let line = self.line();
        self.advance();
        let value = self.logical()?;
        self.end_of_statement()?;
        Ok(Statement::Print(Print::new(value, line)))
    }

    fn return_statement(&mut self) -> ParseResult<Statement> {
        let line = self.line();
        self.advance();
        let value = self.logical()?;
        self.end_of_statement()?;
        Ok(Statement::Return(Return::new(value, line)))
    }

    /// Disambiguates the three `IDENT`-led statement forms: assignment,
    /// array assignment, and a bare call. Builtin names are *not* rewritten
    /// to `StringOp` here — `Push`/`Pop` need the raw name at statement
    /// position so the interpreter can mutate the named array in place; see
    /// `loom::interpreter`.
    fn identifier_statement(&mut self) -> ParseResult<Statement> {
        let line = self.line();
        let name = self.advance().lexeme;
        match self.peek_kind() {
            TokenKind::Assign => {
                self.advance();
                let value = self.logical()?;
                self.end_of_statement()?;
                Ok(Statement::Assignment(Assignment::new(name, value, line)))
            }
            TokenKind::LBracket => {
                self.advance();
                let index = self.logical()?;
                self.expect(TokenKind::RBracket, "']'")?;
                self.expect(TokenKind::Assign, "'='")?;
                let value = self.logical()?;
                self.end_of_statement()?;
                Ok(Statement::ArrayAssign(ArrayAssign::new(
                    name, index, value, line,
                )))
            }
            TokenKind::LParen => {
                let args = self.call_args()?;
                self.end_of_statement()?;
                Ok(Statement::Call(FuncCall::new(name, args, line)))
            }
            other => Err(ParseError::new(
                format!("expected '=', '[' or '(' after identifier, found {other:?}"),
                line,
            )),
        }
    }

    fn if_statement(&mut self) -> ParseResult<Statement> {
        let line = self.line();
        self.advance();
        let condition = self.logical()?;
        self.expect_newline()?;
        let body = self.block()?;

        let mut elifs = Vec::new();
        while self.check(TokenKind::Elif) {
            self.advance();
            let condition = self.logical()?;
            self.expect_newline()?;
            let body = self.block()?;
            elifs.push(ElifClause { condition, body });
        }

        let else_body = if self.check(TokenKind::Else) {
            self.advance();
            self.expect_newline()?;
            Some(self.block()?)
        } else {
            None
        };

        self.consume_optional_end()?;
        Ok(Statement::If(If::new(
            condition, body, elifs, else_body, line,
        )))
    }

    fn while_statement(&mut self) -> ParseResult<Statement> {
        let line = self.line();
        self.advance();
        let condition = self.logical()?;
        self.expect_newline()?;
        let body = self.block()?;
        self.consume_optional_end()?;
        Ok(Statement::While(While::new(condition, body, line)))
    }

    fn for_statement(&mut self) -> ParseResult<Statement> {
        let line = self.line();
        self.advance();
        let var = self.expect(TokenKind::Identifier, "an identifier")?.lexeme;
        self.expect(TokenKind::Assign, "'='")?;
        let start = self.expression()?;
        self.expect(TokenKind::To, "'To'")?;
        let end = self.expression()?;
        self.expect_newline()?;
        let body = self.block()?;
        self.consume_optional_end()?;
        Ok(Statement::For(For::new(var, start, end, body, line)))
    }

    fn func_def(&mut self) -> ParseResult<Statement> {
        let line = self.line();
        self.advance();
        let name = self.expect(TokenKind::Identifier, "a function name")?.lexeme;
        self.expect(TokenKind::LParen, "'('")?;
        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            params.push(self.expect(TokenKind::Identifier, "a parameter name")?.lexeme);
            while self.check(TokenKind::Comma) {
                self.advance();
                params.push(self.expect(TokenKind::Identifier, "a parameter name")?.lexeme);
            }
        }
        self.expect(TokenKind::RParen, "')'")?;
        self.expect_newline()?;
        let body = self.block()?;
        self.consume_optional_end()?;
        Ok(Statement::FuncDef(FuncDef::new(name, params, body, line)))
    }

    /// A block requires a leading `Indent` and is closed by the matching
    /// `Dedent`; blank lines inside it are skipped rather than treated as
    /// empty statements.
    fn block(&mut self) -> ParseResult<Block> {
        let line = self.line();
        self.expect(TokenKind::Indent, "an indented block")?;
        let mut statements = Vec::new();
        loop {
            self.skip_blank_lines();
            if self.check(TokenKind::Dedent) {
                self.advance();
                break;
            }
            if self.check(TokenKind::Eof) {
                return Err(ParseError::new("unexpected end of file inside block", self.line()));
            }
            statements.push(self.statement()?);
        }
        if statements.is_empty() {
            return Err(ParseError::new("a block must contain at least one statement", line));
        }
        Ok(Block::new(statements))
    }

    fn call_args(&mut self) -> ParseResult<Vec<super::Expression>> {
        self.expect(TokenKind::LParen, "'('")?;
        let mut args = Vec::new();
        if !self.check(TokenKind::RParen) {
            args.push(self.logical()?);
            while self.check(TokenKind::Comma) {
                self.advance();
                args.push(self.logical()?);
            }
        }
        self.expect(TokenKind::RParen, "')'")?;
        Ok(args)
    }

    fn logical(&mut self) -> ParseResult<super::Expression> {
        let mut expr = self.comparison()?;
        loop {
            let verb = match self.peek_kind() {
                TokenKind::And => LogicalVerb::And,
                TokenKind::Or => LogicalVerb::Or,
                _ => break,
            };
            let line = self.line();
            self.advance();
            let rhs = self.comparison()?;
            expr = super::Expression::LogicalOp(LogicalOp::new(verb, expr, rhs, line));
        }
        Ok(expr)
    }

    /// Non-associative: at most one comparison operator is consumed.
    fn comparison(&mut self) -> ParseResult<super::Expression> {
        let lhs = self.expression()?;
        let verb = match self.peek_kind() {
            TokenKind::Equal => CompareVerb::Equal,
            TokenKind::NotEqual => CompareVerb::NotEqual,
            TokenKind::LessThan => CompareVerb::LessThan,
            TokenKind::GreaterThan => CompareVerb::GreaterThan,
            TokenKind::LessEqual => CompareVerb::LessEqual,
            TokenKind::GreaterEqual => CompareVerb::GreaterEqual,
            _ => return Ok(lhs),
        };
        let line = self.line();
        self.advance();
        let rhs = self.expression()?;
        Ok(super::Expression::Comparison(Comparison::new(verb, lhs, rhs, line)))
    }

    fn expression(&mut self) -> ParseResult<super::Expression> {
        let mut expr = self.term()?;
        loop {
            let verb = match self.peek_kind() {
                TokenKind::Plus => BinaryVerb::Add,
                TokenKind::Minus => BinaryVerb::Sub,
                _ => break,
            };
            let line = self.line();
            self.advance();
            let rhs = self.term()?;
            expr = super::Expression::BinaryOp(BinaryOp::new(verb, expr, rhs, line));
        }
        Ok(expr)
    }

    fn term(&mut self) -> ParseResult<super::Expression> {
        let mut expr = self.factor()?;
        loop {
            let verb = match self.peek_kind() {
                TokenKind::Multiply => BinaryVerb::Mul,
                TokenKind::Divide => BinaryVerb::Div,
                _ => break,
            };
            let line = self.line();
            self.advance();
            let rhs = self.factor()?;
            expr = super::Expression::BinaryOp(BinaryOp::new(verb, expr, rhs, line));
        }
        Ok(expr)
    }

    /// `Not` recurses back into `logical`, per the grammar's `factor :=
    /// ... | Not logical | ...` production — unlike the other operators,
    /// `Not` is not confined to binding only to a single primary.
    fn factor(&mut self) -> ParseResult<super::Expression> {
        let line = self.line();
        match self.peek_kind() {
            TokenKind::Number => {
                let token = self.advance();
                let value = token.lexeme.parse::<f64>().map_err(|_| {
                    ParseError::new(format!("invalid number literal '{}'", token.lexeme), line)
                })?;
                Ok(super::Expression::Number(Number::new(value, line)))
            }
            TokenKind::String => {
                let token = self.advance();
                Ok(super::Expression::Str(Str::new(token.lexeme, line)))
            }
            TokenKind::True => {
                self.advance();
                Ok(super::Expression::Boolean(Boolean::new(true, line)))
            }
            TokenKind::False => {
                self.advance();
                Ok(super::Expression::Boolean(Boolean::new(false, line)))
            }
            TokenKind::Not => {
                self.advance();
                let operand = self.logical()?;
                Ok(super::Expression::NotOp(NotOp::new(operand, line)))
            }
            TokenKind::Identifier => {
                let name = self.advance().lexeme;
                match self.peek_kind() {
                    TokenKind::LBracket => {
                        self.advance();
                        let index = self.logical()?;
                        self.expect(TokenKind::RBracket, "']'")?;
                        Ok(super::Expression::ArrayAccess(ArrayAccess::new(name, index, line)))
                    }
                    TokenKind::LParen => {
                        let args = self.call_args()?;
                        self.call_or_string_op(name, args, line)
                    }
                    _ => Ok(super::Expression::Variable(Variable::new(name, line))),
                }
            }
            TokenKind::LBracket => {
                self.advance();
                let mut elements = Vec::new();
                if !self.check(TokenKind::RBracket) {
                    elements.push(self.logical()?);
                    while self.check(TokenKind::Comma) {
                        self.advance();
                        elements.push(self.logical()?);
                    }
                }
                self.expect(TokenKind::RBracket, "']'")?;
                Ok(super::Expression::Array(Array::new(elements, line)))
            }
            other => Err(ParseError::new(format!("unexpected token {other:?} in expression"), line)),
        }
    }

    /// Lowers a call expression into a `StringOp` when its name matches the
    /// closed builtin vocabulary (§4.2's "builtin call rewriting"); any
    /// other name stays a plain `FuncCall`.
    fn call_or_string_op(
        &self,
        name: String,
        mut args: Vec<super::Expression>,
        line: usize,
    ) -> ParseResult<super::Expression> {
        match StringOpKind::from_name(&name) {
            Some(kind) => {
                if args.is_empty() {
                    return Err(ParseError::new(
                        format!("'{name}' requires at least one argument"),
                        line,
                    ));
                }
                let target = args.remove(0);
                Ok(super::Expression::StringOp(StringOp::new(kind, target, args, line)))
            }
            None => Ok(super::Expression::Call(FuncCall::new(name, args, line))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expression;
    use crate::lexer::Lexer;

    fn parse(source: &str) -> Vec<Statement> {
        let tokens = Lexer::new(source).lex().expect("lex failed");
        Parser::new(tokens).parse().expect("parse failed")
    }

    #[test]
    fn parses_assignment() {
        let statements = parse("x = 2\n");
        assert_eq!(statements.len(), 1);
        assert!(matches!(statements[0], Statement::Assignment(_)));
    }

    #[test]
    fn respects_arithmetic_precedence() {
        let statements = parse("Print 2 + 3 * 4\n");
        let Statement::Print(print) = &statements[0] else {
            panic!("expected Print");
        };
        let Expression::BinaryOp(outer) = print.value.as_ref() else {
            panic!("expected top-level BinaryOp");
        };
        assert_eq!(outer.verb, BinaryVerb::Add);
        assert!(matches!(outer.rhs.as_ref(), Expression::BinaryOp(inner) if inner.verb == BinaryVerb::Mul));
    }

    #[test]
    fn parses_if_elif_else() {
        let source = "If 1 < 2\n  Print 1\nElif 2 < 3\n  Print 2\nElse\n  Print 3\nEnd\n";
        let statements = parse(source);
        let Statement::If(if_stmt) = &statements[0] else {
            panic!("expected If");
        };
        assert_eq!(if_stmt.elifs.len(), 1);
        assert!(if_stmt.else_body.is_some());
    }

    #[test]
    fn parses_function_definition_and_call() {
        let source = "Func add(a, b)\n  Return a + b\nEnd\nPrint add(2, 40)\n";
        let statements = parse(source);
        assert!(matches!(statements[0], Statement::FuncDef(_)));
        let Statement::Print(print) = &statements[1] else {
            panic!("expected Print");
        };
        assert!(matches!(print.value.as_ref(), Expression::Call(_)));
    }

    #[test]
    fn parses_for_loop() {
        let statements = parse("For i = 1 To 3\n  Print i\nEnd\n");
        assert!(matches!(statements[0], Statement::For(_)));
    }

    #[test]
    fn rewrites_builtin_calls_to_string_op() {
        let statements = parse("Print Length(s)\n");
        let Statement::Print(print) = &statements[0] else {
            panic!("expected Print");
        };
        assert!(matches!(print.value.as_ref(), Expression::StringOp(op) if op.op == StringOpKind::Length));
    }

    #[test]
    fn push_as_statement_stays_a_plain_call() {
        let statements = parse("Push(a, 4)\n");
        let Statement::Call(call) = &statements[0] else {
            panic!("expected bare Call statement");
        };
        assert_eq!(call.name, "Push");
    }

    #[test]
    fn array_literal_and_assign() {
        let statements = parse("a = [1, 2, 3]\n");
        let Statement::Assignment(assign) = &statements[0] else {
            panic!("expected Assignment");
        };
        assert!(matches!(assign.value.as_ref(), Expression::Array(arr) if arr.elements.len() == 3));
    }

    #[test]
    fn array_indexing_and_assignment() {
        let statements = parse("a[0] = 5\n");
        assert!(matches!(statements[0], Statement::ArrayAssign(_)));
    }

    #[test]
    fn not_applies_to_a_full_logical_expression() {
        let statements = parse("Print Not 1 < 2\n");
        let Statement::Print(print) = &statements[0] else {
            panic!("expected Print");
        };
        assert!(matches!(print.value.as_ref(), Expression::NotOp(not_op) if matches!(not_op.operand.as_ref(), Expression::Comparison(_))));
    }

    #[test]
    fn missing_newline_after_print_is_a_parse_error() {
        let tokens = Lexer::new("Print 1 Print 2\n").lex().unwrap();
        assert!(Parser::new(tokens).parse().is_err());
    }

    #[test]
    fn empty_block_is_rejected() {
        // A dedent with no statements in between can't happen through the
        // lexer directly, but an `If` immediately followed by `End` with no
        // indented body should still fail to parse.
        let tokens = Lexer::new("If 1 < 2\nEnd\n").lex().unwrap();
        assert!(Parser::new(tokens).parse().is_err());
    }

    #[test]
    fn dedent_without_end_closes_a_while_loop() {
        let statements = parse("While n > 0\n  n = n - 1\nPrint n\n");
        assert_eq!(statements.len(), 2);
        assert!(matches!(statements[0], Statement::While(_)));
        assert!(matches!(statements[1], Statement::Print(_)));
    }

    #[test]
    fn dedent_without_end_closes_a_nested_compound() {
        let statements = parse(
            "If 1 < 2\n  While n > 0\n    n = n - 1\nPrint n\n",
        );
        assert_eq!(statements.len(), 2);
        assert!(matches!(statements[0], Statement::If(_)));
        assert!(matches!(statements[1], Statement::Print(_)));
    }
}
