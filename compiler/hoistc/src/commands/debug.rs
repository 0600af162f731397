//! Debug commands: `lex` and `parse` for inspecting the front end.

use hoist_ir::{format_number, ExprArena, Stmt, StmtKind, StringInterner, TokenKind};

use super::read_file;

/// Lex a file and display the token stream.
pub fn lex_file(path: &str) {
    let content = read_file(path);
    let interner = StringInterner::new();
    let output = hoist_lexer::lex(&content, &interner);

    println!("Tokens for '{}' ({} tokens):", path, output.tokens.len());
    for token in output.tokens.iter() {
        let newline = if token.has_newline_before() { " (after newline)" } else { "" };
        println!(
            "  {:<10} {}{newline}",
            token.span.to_string(),
            describe_token(token.kind, &interner)
        );
    }

    if output.has_errors() {
        println!();
        println!("Errors:");
        for error in &output.errors {
            println!("  {}: {}", error.span, error);
        }
    }
}

fn describe_token(kind: TokenKind, interner: &StringInterner) -> String {
    match kind {
        TokenKind::Ident(name) => format!("identifier `{}`", interner.lookup(name)),
        TokenKind::Str(text) => format!("string {:?}", interner.lookup(text)),
        TokenKind::Template(body) => format!("template `{}`", interner.lookup(body)),
        TokenKind::Number(_) => format!(
            "number {}",
            kind.as_number().map_or_else(String::new, format_number)
        ),
        other => other.display_name().to_string(),
    }
}

/// Parse a file and display a summary of its top-level statements.
pub fn parse_file(path: &str) {
    let content = read_file(path);
    let interner = StringInterner::new();
    let output = hoist_parse::parse_source(&content, &interner);
    let arena = &output.module.arena;

    println!("Parse result for '{path}':");
    println!("  Statements: {}", arena.stmt_count());
    println!("  Expressions: {}", arena.expr_count());
    println!("  Functions: {}", arena.function_count());
    println!("  Errors: {}", output.errors.len());

    let body = arena.stmt_list(output.module.body);
    if !body.is_empty() {
        println!();
        println!("Top level:");
        for &id in body {
            let stmt = arena.stmt(id);
            println!("  {:<10} {}", stmt.span.to_string(), describe_stmt(stmt, arena, &interner));
        }
    }

    if output.has_errors() {
        println!();
        println!("Errors:");
        for error in &output.errors {
            println!("  {}: [{}] {}", error.span, error.code, error.message);
        }
    }
}

fn describe_stmt(stmt: &Stmt, arena: &ExprArena, interner: &StringInterner) -> String {
    match &stmt.kind {
        StmtKind::Declaration { kind, declarators } => {
            let names: Vec<&str> = arena
                .declarators(*declarators)
                .iter()
                .map(|d| interner.lookup(d.name))
                .collect();
            format!("{} {}", kind.keyword(), names.join(", "))
        }
        StmtKind::Function(id) => {
            let def = arena.function(*id);
            let params: Vec<&str> = def.params.iter().map(|p| interner.lookup(*p)).collect();
            let name = def.name.map_or("(anonymous)", |n| interner.lookup(n));
            format!("function {name}({})", params.join(", "))
        }
        StmtKind::Expr(_) => "expression".to_string(),
        StmtKind::Block(stmts) => format!("block ({} statements)", stmts.len()),
        StmtKind::If { alternate, .. } => {
            let label = if alternate.is_some() { "if/else" } else { "if" };
            label.to_string()
        }
        StmtKind::For { .. } => "for".to_string(),
        StmtKind::ForOf { .. } => "for-of".to_string(),
        StmtKind::While { .. } => "while".to_string(),
        StmtKind::Return(_) => "return".to_string(),
        StmtKind::Break => "break".to_string(),
        StmtKind::Continue => "continue".to_string(),
        StmtKind::Empty => "empty".to_string(),
    }
}
