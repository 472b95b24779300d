use gsm_core::ast::{self, AstError, Block, Condition, Declaration, Factor, ParseError, Parser, Stmt};
use gsm_core::lexer::Lexer;
use gsm_core::script::Script;

fn parse(src: &str) -> Result<ast::Ast, ParseError> {
    let script = Script::from_source("test.gsm", src);
    let lexer = Lexer::new(&script).expect("lex");
    Parser::new(lexer).parse()
}

fn printed(src: &str) -> String {
    parse(src).expect("parse").to_string()
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    assert_eq!(printed("x = 1 + 2 * 3;"), "x = 1 + (2 * 3);\n");
}

#[test]
fn same_level_operators_associate_left() {
    assert_eq!(printed("x = 10 - 3 - 2;"), "x = (10 - 3) - 2;\n");
    assert_eq!(printed("x = 2 ^ 3 ^ 2;"), "x = (2 ^ 3) ^ 2;\n");
    assert_eq!(printed("x = 8 / 4 % 3;"), "x = (8 / 4) % 3;\n");
}

#[test]
fn power_binds_tighter_than_multiplication() {
    assert_eq!(printed("x = 2 * y ^ 3;"), "x = 2 * (y ^ 3);\n");
}

#[test]
fn comparison_levels_nest_in_order() {
    assert_eq!(printed("x = a < b == c >= d;"), "x = (a < b) == (c >= d);\n");
    assert_eq!(printed("x = a > b >= c;"), "x = (a > b) >= c;\n");
}

#[test]
fn and_binds_tighter_than_or() {
    assert_eq!(printed("x = a or b and c;"), "x = a or (b and c);\n");
}

#[test]
fn parentheses_override_precedence() {
    assert_eq!(printed("x = (1 + 2) * 3;"), "x = (1 + 2) * 3;\n");
}

#[test]
fn compound_assignment_desugars_to_plain_store() {
    assert_eq!(printed("x += 2;"), "x = x + 2;\n");
    assert_eq!(printed("x *= 1 + 2;"), "x = x * (1 + 2);\n");
    assert_eq!(printed("x %= 4;"), "x = x % 4;\n");
}

#[test]
fn declaration_initializers_bind_to_trailing_names() {
    let ast = parse("int a, b, c = 5;").expect("parse");
    let Stmt::Declaration(decl) = &ast.statements()[0] else {
        panic!("expected a declaration, got {:?}", ast.statements()[0]);
    };
    assert_eq!(decl.names(), ["a", "b", "c"]);
    assert_eq!(decl.initializer_for(0), None);
    assert_eq!(decl.initializer_for(1), None);
    assert_eq!(decl.initializer_for(2), Some(decl.initializers()[0]));
}

#[test]
fn surplus_initializer_is_rejected() {
    let err = parse("int a, b = 1, 2, 3;").expect_err("must fail");
    assert_eq!(err.diagnostics.len(), 1);
    let first = err.first().expect("diagnostic");
    assert_eq!(first.token(), ",");
    assert!(first.note().unwrap_or_default().contains("more initializers than the 2"));
}

#[test]
fn first_error_stops_the_parse() {
    let err = parse("x = ; y = 2; z = ;").expect_err("must fail");
    assert_eq!(err.diagnostics.len(), 1);
    assert_eq!(err.diagnostics[0].token(), ";");
}

#[test]
fn stray_character_is_reported_by_text() {
    let err = parse("x = 3 $ 4;").expect_err("must fail");
    assert_eq!(err.diagnostics[0].token(), "$");
    assert!(err.to_string().starts_with("Unexpected: $"));
}

#[test]
fn unterminated_block_reports_end_of_input() {
    let err = parse("loop x: begin x = 1").expect_err("must fail");
    assert_eq!(err.diagnostics[0].token(), "<end of input>");
}

#[test]
fn declarations_are_not_allowed_inside_blocks() {
    let err = parse("loop x: begin int y; end").expect_err("must fail");
    assert_eq!(err.diagnostics[0].token(), "int");
}

#[test]
fn diagnostics_carry_source_positions() {
    let err = parse("int a;\na = ;").expect_err("must fail");
    let loc = err.diagnostics[0].to_string();
    assert!(loc.ends_with("(at test.gsm:2:5)"), "got {}", loc);
}

#[test]
fn condition_collects_guards_and_else_body() {
    let ast = parse(
        "if a > b: begin x = 1 end elif c: begin x = 2 end else: begin x = 3 y = 4 end",
    )
    .expect("parse");
    let Stmt::Condition(cond) = &ast.statements()[0] else {
        panic!("expected a condition");
    };
    assert_eq!(cond.guards().len(), 2);
    assert_eq!(cond.bodies().len(), 3);
    assert_eq!(cond.else_body().map(|b| b.assignments().len()), Some(2));
}

#[test]
fn empty_source_is_an_empty_program() {
    let ast = parse("   \n").expect("parse");
    assert!(ast.statements().is_empty());
}

#[test]
fn printed_program_reparses_to_the_same_text() {
    let src = "int i, n = 10;\nloop i < n: begin i = i + 1 end\nif i == n: begin n = 0 end else: begin n = 1 end\n";
    let once = printed(src);
    let twice = printed(&once);
    assert_eq!(once, twice);
}

#[test]
fn condition_rejects_mismatched_body_count() {
    let mut ast = ast::Ast::new();
    let guard = ast.factor(Factor::identifier("a"), None);
    let bodies = vec![Block::default(), Block::default(), Block::default()];
    let err = Condition::new(vec![guard], bodies, None).expect_err("must fail");
    assert_eq!(err, AstError::BodyCountMismatch { guards: 1, bodies: 3 });

    assert!(Condition::new(Vec::new(), Vec::new(), None).is_err());
}

#[test]
fn declaration_rejects_more_initializers_than_names() {
    let mut ast = ast::Ast::new();
    let one = ast.factor(Factor::number("1"), None);
    let two = ast.factor(Factor::number("2"), None);
    let err = Declaration::new(vec!["a".to_string()], vec![one, two], None).expect_err("must fail");
    assert_eq!(err, AstError::TooManyInitializers { names: 1, initializers: 2 });
}

#[test]
fn assignment_target_must_be_identifier() {
    let mut ast = ast::Ast::new();
    let value = ast.factor(Factor::number("1"), None);
    let err = ast::Assignment::new(Factor::number("3"), value, None).expect_err("must fail");
    assert!(matches!(err, AstError::NonIdentifierTarget { .. }));
}

#[test]
fn parser_accepts_any_token_source() {
    use gsm_core::lexer::{Token, TokenKind};

    let tokens = vec![
        Token::new(TokenKind::KwInt, "int", None),
        Token::new(TokenKind::Ident, "x", None),
        Token::new(TokenKind::Semicolon, ";", None),
        Token::new(TokenKind::Ident, "x", None),
        Token::new(TokenKind::MinusEqual, "-=", None),
        Token::new(TokenKind::Number, "4", None),
        Token::new(TokenKind::Semicolon, ";", None),
    ];
    let ast = Parser::new(Lexer::from_tokens(tokens)).parse().expect("parse");
    assert_eq!(ast.to_string(), "int x;\nx = x - 4;\n");
}

#[test]
fn error_flag_and_diagnostics_survive_a_failed_parse() {
    let script = Script::from_source("flag.gsm", "int x; x = ;");
    let mut parser = Parser::new(Lexer::new(&script).expect("lex"));
    assert!(!parser.has_error());
    assert!(parser.parse().is_err());
    assert!(parser.has_error());
    assert_eq!(parser.diagnostics().len(), 1);
    assert_eq!(parser.diagnostics()[0].token(), ";");

    let mut clean = Parser::new(Lexer::new(&Script::from_source("ok.gsm", "int x;")).expect("lex"));
    assert!(clean.parse().is_ok());
    assert!(!clean.has_error());
    assert!(clean.diagnostics().is_empty());
}

#[test]
fn binary_nodes_own_their_operands_exclusively() {
    let mut tree = ast::Ast::new();
    let one = tree.factor(Factor::number("1"), None);
    let two = tree.factor(Factor::number("2"), None);

    assert_eq!(
        tree.binary(ast::BinaryOperator::Add, one, one, None),
        Err(AstError::SharedExpression { index: one.index() })
    );

    let sum = tree.binary(ast::BinaryOperator::Add, one, two, None).expect("fresh operands");
    let three = tree.factor(Factor::number("3"), None);
    assert_eq!(
        tree.binary(ast::BinaryOperator::Mul, two, three, None),
        Err(AstError::SharedExpression { index: two.index() })
    );
    assert!(tree.binary(ast::BinaryOperator::Mul, sum, three, None).is_ok());
}
