use super::error::SyntaxError;
use super::tokenizer::TokenType as TT;
use super::{parse, tokenize_string, ArithOp, BinaryExpr, Expression, Operand, Statement, VarType};

fn parse_string(input: &str) -> (Vec<Statement>, Vec<SyntaxError>) {
    let (tokens, lexical_errors) = tokenize_string(input);
    assert!(
        lexical_errors.is_empty(),
        "unexpected lexical errors in {input:?}: {lexical_errors:?}"
    );
    parse(&tokens)
}

fn kinds(input: &str) -> Vec<(TT, String)> {
    let (tokens, _) = tokenize_string(input);
    tokens.into_iter().map(|t| (t.typ, t.lexeme)).collect()
}

fn parse_tree_matches(input: &str, tree_repr: &str) {
    let (tree, errors) = parse_string(input);
    assert!(errors.is_empty(), "\nFailed to parse \"{input}\": {errors:?}\n");
    let result_repr = format!("{tree:?}");
    assert!(
        result_repr.contains(tree_repr),
        "\nFailed to parse \"{}\":\nexpected \"{}\" somewhere in \"{}\"\n",
        input,
        tree_repr,
        result_repr
    )
}

fn assert_raises_error(input: &str, msg: &str) {
    let (_, errors) = parse_string(input);
    assert!(!errors.is_empty(), "expected a syntax error in {input:?}");
    assert_eq!(msg, errors[0].message.as_str());
}

#[test]
fn test_whitespace_and_comments_produce_nothing() {
    for input in ["", "   \n\t  ", "$ just a comment", "  $ one\n\n$ two\n   "] {
        let (tokens, errors) = tokenize_string(input);
        assert!(tokens.is_empty(), "{input:?} produced {tokens:?}");
        assert!(errors.is_empty());
    }
}

#[test]
fn test_declaration_tokens() {
    assert_eq!(
        kinds("ent x es 10."),
        vec![
            (TT::KEYWORD, "ent".to_string()),
            (TT::NAME, "x".to_string()),
            (TT::ASSIGN, "es".to_string()),
            (TT::INTEGER, "10".to_string()),
            (TT::DOT, ".".to_string()),
        ]
    );
}

#[test]
fn test_es_inside_identifiers() {
    assert_eq!(kinds("xes10"), vec![(TT::NAME, "xes10".to_string())]);
    assert_eq!(kinds("presente"), vec![(TT::NAME, "presente".to_string())]);
    assert_eq!(kinds("es_valido"), vec![(TT::NAME, "es_valido".to_string())]);
    assert_eq!(kinds("_es"), vec![(TT::NAME, "_es".to_string())]);
    assert_eq!(kinds("es10"), vec![(TT::NAME, "es10".to_string())]);
    // After a digit, `es` cannot start a word, so it reads as a name.
    assert_eq!(
        kinds("x es 1es 2"),
        vec![
            (TT::NAME, "x".to_string()),
            (TT::ASSIGN, "es".to_string()),
            (TT::INTEGER, "1".to_string()),
            (TT::NAME, "es".to_string()),
            (TT::INTEGER, "2".to_string()),
        ]
    );
    assert_eq!(
        kinds("x es.es"),
        vec![
            (TT::NAME, "x".to_string()),
            (TT::ASSIGN, "es".to_string()),
            (TT::DOT, ".".to_string()),
            (TT::ASSIGN, "es".to_string()),
        ]
    );
    assert_eq!(
        kinds("x igual z"),
        vec![
            (TT::NAME, "x".to_string()),
            (TT::ASSIGN, "igual".to_string()),
            (TT::NAME, "z".to_string()),
        ]
    );
}

#[test]
fn test_keyword_priority() {
    assert_eq!(kinds("suma")[0].0, TT::PLUS);
    assert_eq!(kinds("resta")[0].0, TT::MINUS);
    assert_eq!(kinds("multi")[0].0, TT::STAR);
    assert_eq!(kinds("division")[0].0, TT::SLASH);
    assert_eq!(kinds("retorna")[0].0, TT::RETURN);
    assert_eq!(kinds("SiNo")[0], (TT::KEYWORD, "SiNo".to_string()));
    assert_eq!(kinds("MayIg")[0], (TT::COMPARE, "MayIg".to_string()));
    assert_eq!(kinds("y o"), vec![(TT::LOGIC, "y".to_string()), (TT::LOGIC, "o".to_string())]);
    // Keywords only match as whole words.
    assert_eq!(kinds("sumar"), vec![(TT::NAME, "sumar".to_string())]);
    assert_eq!(kinds("entero"), vec![(TT::NAME, "entero".to_string())]);
    assert_eq!(
        kinds("10suma"),
        vec![(TT::INTEGER, "10".to_string()), (TT::NAME, "suma".to_string())]
    );
}

#[test]
fn test_number_literals() {
    assert_eq!(kinds("12.5"), vec![(TT::DECIMAL, "12.5".to_string())]);
    assert_eq!(kinds("-3"), vec![(TT::INTEGER, "-3".to_string())]);
    assert_eq!(kinds("-0.25"), vec![(TT::DECIMAL, "-0.25".to_string())]);
    assert_eq!(
        kinds("7."),
        vec![(TT::INTEGER, "7".to_string()), (TT::DOT, ".".to_string())]
    );
    assert_eq!(
        kinds(".5"),
        vec![(TT::DOT, ".".to_string()), (TT::INTEGER, "5".to_string())]
    );
}

#[test]
fn test_punctuation() {
    let found: Vec<TT> = kinds("( ) { } .").into_iter().map(|(t, _)| t).collect();
    assert_eq!(found, vec![TT::LPAR, TT::RPAR, TT::LBRACE, TT::RBRACE, TT::DOT]);
}

#[test]
fn test_line_numbers() {
    let (tokens, _) = tokenize_string("ent x.\n$ comment\n\nx es 2.");
    let lines: Vec<usize> = tokens.iter().map(|t| t.line).collect();
    assert_eq!(lines, vec![1, 1, 1, 4, 4, 4, 4]);
}

#[test]
fn test_lexical_errors_are_collected() {
    let (tokens, errors) = tokenize_string("ent x es 5. @#!\nent y es ~ 3.");
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].line, 1);
    assert_eq!(errors[0].text, "@#!");
    assert_eq!(errors[1].line, 2);
    assert_eq!(errors[1].text, "~");
    assert_eq!(
        errors[0].to_string(),
        "Lexical error at line 1: unknown symbol '@#!'"
    );
    // Scanning continues past the bad spans.
    assert_eq!(tokens.len(), 10);
}

#[test]
fn test_unknown_span_stops_at_next_pattern() {
    let (tokens, errors) = tokenize_string("é suma");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].text, "é");
    assert_eq!(tokens[0].typ, TT::PLUS);

    // Right after a word character a keyword is no longer a whole word.
    let (tokens, errors) = tokenize_string("ésuma");
    assert_eq!(errors[0].text, "é");
    assert_eq!(tokens[0].typ, TT::NAME);
}

#[test]
fn test_declarations() {
    parse_tree_matches("ent x.", "Declare(Integer, \"x\", None)");
    parse_tree_matches("dec y es 2.5.", "Declare(Decimal, \"y\", Some(Operand(Decimal(2.5))))");
    parse_tree_matches("txt t es x.", "Declare(Text, \"t\", Some(Operand(Identifier(\"x\"))))");
    parse_tree_matches("vf b.", "Declare(Boolean, \"b\", None)");

    let (tree, errors) = parse_string("ent x es suma 2 3.");
    assert!(errors.is_empty());
    assert_eq!(
        tree,
        vec![Statement::Declare(
            VarType::Integer,
            "x".to_string(),
            Some(Expression::Binary(BinaryExpr {
                op: ArithOp::Add,
                left: Operand::Integer(2),
                right: Operand::Integer(3),
            }))
        )]
    );
}

#[test]
fn test_assignments() {
    parse_tree_matches("x es 4.", "Assign(\"x\", Operand(Integer(4)))");
    parse_tree_matches("x igual resta z 1.", "op: Sub");
    parse_tree_matches("x es multi w z.", "op: Mul");
    parse_tree_matches("x es division 7 0.", "op: Div");
}

#[test]
fn test_return_statement() {
    parse_tree_matches("retorna x.", "Return(Identifier(\"x\"))");
    parse_tree_matches("retorna 1.5.", "Return(Decimal(1.5))");
}

#[test]
fn test_conditionals() {
    parse_tree_matches(
        "Si x MayK 5 Realiza { retorna x. }.",
        "If(Comparison { left: Identifier(\"x\"), op: Greater, right: Integer(5) }, [Return(Identifier(\"x\"))], None)",
    );
    parse_tree_matches(
        "Si x DifA 0 Realiza { x es 1. } SiNo { x es 2. }.",
        "Some([Assign(\"x\", Operand(Integer(2)))])",
    );
    parse_tree_matches("Si 1 MenIg 2 Realiza { }.", "If(");
    parse_tree_matches(
        "Si a MayIg b Realiza { Si a MenK 3 Realiza { retorna a. }. }.",
        "[If(Comparison { left: Identifier(\"a\"), op: Less",
    );
}

#[test]
fn test_loops() {
    parse_tree_matches("Mientras i MenK 10 Realiza { i es suma i 1. }.", "While(");
    parse_tree_matches("Para i MenK 10 Realiza { retorna i. }.", "While(");
}

#[test]
fn test_missing_terminator() {
    let (_, errors) = parse_string("ent x es 10");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, 1);
    assert_eq!(errors[0].message, "missing statement terminator");

    let (_, errors) = parse_string("ent x.\n\nent y es 3 ent z.");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, 3);
    assert_eq!(errors[0].token, "ent");
    assert_eq!(
        errors[0].to_string(),
        "Syntax error at line 3: missing statement terminator. Problem token: 'ent'"
    );
}

#[test]
fn test_error_messages() {
    assert_raises_error("ent 5.", "malformed declaration");
    assert_raises_error("ent x es suma 1.", "malformed arithmetic expression");
    assert_raises_error("x es resta.", "malformed arithmetic expression");
    assert_raises_error("x es.", "malformed assignment");
    assert_raises_error("retorna suma.", "invalid expression in 'retorna'");
    assert_raises_error("Si x MayK Realiza { }.", "malformed conditional");
    assert_raises_error("Mientras x y 3 Realiza { }.", "malformed loop");
    assert_raises_error("Realiza.", "unknown or incomplete statement");
    assert_raises_error("}", "unexpected closing brace");
    assert_raises_error("ent x es 99999999999999999999.", "malformed declaration");
}

#[test]
fn test_problem_token_is_the_offending_one() {
    let (_, errors) = parse_string("ent x es suma 1 MayK.");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].token, "MayK");
}

#[test]
fn test_one_error_per_malformed_statement() {
    let (tree, errors) = parse_string("ent 1 2 3. x es 5. retorna . ent y.");
    assert_eq!(errors.len(), 2);
    assert_eq!(tree.len(), 2);
    assert!(matches!(tree[0], Statement::Assign(..)));
    assert!(matches!(tree[1], Statement::Declare(VarType::Integer, _, None)));
}

#[test]
fn test_recovery_inside_blocks() {
    let (tree, errors) = parse_string("Si x MayK 1 Realiza { ent . retorna x. }. ent z.");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "malformed declaration");
    assert_eq!(tree.len(), 2);
    match &tree[0] {
        Statement::If(_, then_block, None) => assert_eq!(then_block.len(), 1),
        other => panic!("unexpected statement {other:?}"),
    }

    // Recovery stops at the closing brace so the block still ends.
    let (tree, errors) = parse_string("Mientras 1 MenK 2 Realiza { x es }.");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].token, "}");
    assert!(matches!(tree.as_slice(), [Statement::While(_, body)] if body.is_empty()));
}

#[test]
fn test_unterminated_block() {
    let (_, errors) = parse_string("Si x MayK 1 Realiza { retorna x.");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "malformed conditional");
    assert_eq!(errors[0].token, "");
    assert_eq!(errors[0].line, 1);
}

#[test]
fn test_logic_operators_are_not_grammar() {
    let (tree, errors) = parse_string("Si x MayK 1 y x MenK 5 Realiza { }.");
    assert!(tree.is_empty());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].token, "y");
}

#[test]
fn test_malformed_header_skips_its_block() {
    let (tree, errors) = parse_string("Si x MayK Realiza { ent y. }. ent z.");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "malformed conditional");
    assert_eq!(errors[0].token, "Realiza");
    assert!(matches!(tree.as_slice(), [Statement::Declare(VarType::Integer, z, None)] if z == "z"));

    let (tree, errors) = parse_string("Mientras i MenK Realiza { i es 1. retorna i. }.
retorna 2.");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "malformed loop");
    assert_eq!(errors[0].token, "Realiza");
    assert_eq!(tree, vec![Statement::Return(Operand::Integer(2))]);

    // Nested blocks are skipped as a whole, and recovery inside a block
    // still leaves the enclosing statement intact.
    let (tree, errors) = parse_string(
        "Mientras 1 MenK 2 Realiza { Si a DifA Realiza { Si b MayK 1 Realiza { retorna b. }. } SiNo { }. retorna 1. }.",
    );
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "malformed conditional");
    match tree.as_slice() {
        [Statement::While(_, body)] => {
            assert_eq!(body, &vec![Statement::Return(Operand::Integer(1))])
        }
        other => panic!("unexpected tree {other:?}"),
    }
}
