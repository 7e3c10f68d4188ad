//! Evaluate a few representative `#if` expressions end to end.

use cpp_cexpr::prelude::*;

fn eval_tokens(tokens: Vec<Token>, macros: &MacroTable) -> (EvalOutcome, Option<String>) {
    let assertions = AssertionTable::new();
    let config = EvalConfig::new();
    let mut sink = TracingSink;
    let mut source = VecTokenSource::new(tokens);
    cpp_cexpr::evaluate(&mut source, macros, &assertions, &config, &mut sink)
}

fn main() {
    tracing_subscriber_init();

    let mut macros = MacroTable::new();
    macros.define_object("FEATURE_X", false);

    let arithmetic = eval_tokens(
        vec![
            Token::with_text(OpKind::Number, "2"),
            Token::punct(OpKind::Add),
            Token::with_text(OpKind::Number, "2"),
            Token::punct(OpKind::Eq),
            Token::with_text(OpKind::Number, "4"),
        ],
        &macros,
    );
    println!("2 + 2 == 4  -> {:?}", arithmetic.0);

    let guard = eval_tokens(
        vec![
            Token::punct(OpKind::LNot),
            Token::punct(OpKind::Defined),
            Token::with_text(OpKind::Name, "HEADER_H"),
        ],
        &macros,
    );
    println!(
        "!defined(HEADER_H) -> {:?}, controlling macro: {:?}",
        guard.0, guard.1
    );

    let division = eval_tokens(
        vec![
            Token::with_text(OpKind::Number, "1"),
            Token::punct(OpKind::Div),
            Token::with_text(OpKind::Number, "0"),
        ],
        &macros,
    );
    println!("1 / 0 -> {:?}", division.0);

    let feature_gate = eval_tokens(
        vec![
            Token::punct(OpKind::Defined),
            Token::with_text(OpKind::Name, "FEATURE_X"),
            Token::punct(OpKind::LAnd),
            Token::with_text(OpKind::Number, "1"),
        ],
        &macros,
    );
    println!("defined(FEATURE_X) && 1 -> {:?}", feature_gate.0);
}

fn tracing_subscriber_init() {
    let _ = tracing::subscriber::set_global_default(tracing_subscriber::FmtSubscriber::default());
}
