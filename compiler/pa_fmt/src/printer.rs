//! AST to text.
//!
//! The printer never consults spans: output is a function of tree shape
//! only, so a printed statement re-parses to a tree of the same shape.
//! Parentheses are inserted from operator precedence alone.

use pa_ir::ops::prec;
use pa_ir::{
    format_number, BinaryOp, Expr, ExprKind, ForInit, Function, FunctionBody, ImportDecl,
    ImportSpecifier, Literal, LogicalOp, Param, Program, Property, Stmt, StmtKind, UnaryOp,
    UpdateOp, VarDecl,
};
use pa_stack::ensure_sufficient_stack;

use crate::emitter::Emitter;
use crate::quote::quote_string;

/// Where nested statement lists go.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Layout {
    /// One statement per line, blocks indented.
    Block,
    /// Everything on one line: `{ a; b; }`.
    Inline,
}

pub struct Printer<E: Emitter> {
    out: E,
    layout: Layout,
    level: usize,
}

impl<E: Emitter> Printer<E> {
    pub fn new(out: E, layout: Layout) -> Self {
        Printer {
            out,
            layout,
            level: 0,
        }
    }

    pub fn into_inner(self) -> E {
        self.out
    }

    pub fn program(&mut self, program: &Program) {
        for (i, stmt) in program.body.iter().enumerate() {
            match self.layout {
                Layout::Block => {
                    self.stmt(stmt);
                    self.out.emit_newline();
                }
                Layout::Inline => {
                    if i > 0 {
                        self.out.emit_space();
                    }
                    self.stmt(stmt);
                }
            }
        }
    }

    pub fn stmt(&mut self, stmt: &Stmt) {
        ensure_sufficient_stack(|| self.stmt_inner(stmt));
    }

    fn stmt_inner(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Import(decl) => self.import(decl),
            StmtKind::Export(inner) => {
                self.out.emit("export ");
                self.stmt(inner);
            }
            StmtKind::Var(decl) => {
                self.var_decl(decl);
                self.out.emit(";");
            }
            StmtKind::Function(func) => self.function(func),
            StmtKind::Return(value) => {
                self.out.emit("return");
                if let Some(value) = value {
                    self.out.emit_space();
                    self.expr(value);
                }
                self.out.emit(";");
            }
            StmtKind::If {
                test,
                consequent,
                alternate,
            } => {
                self.out.emit("if (");
                self.expr(test);
                self.out.emit(") ");
                self.stmt(consequent);
                if let Some(alternate) = alternate {
                    let after_block = matches!(consequent.kind, StmtKind::Block(_));
                    if after_block || self.layout == Layout::Inline {
                        self.out.emit(" else ");
                    } else {
                        self.out.emit_newline();
                        self.out.emit_indent(self.level);
                        self.out.emit("else ");
                    }
                    self.stmt(alternate);
                }
            }
            StmtKind::Block(body) => self.block(body),
            StmtKind::While { test, body } => {
                self.out.emit("while (");
                self.expr(test);
                self.out.emit(") ");
                self.stmt(body);
            }
            StmtKind::For {
                init,
                test,
                update,
                body,
            } => {
                self.out.emit("for (");
                match init {
                    Some(ForInit::Var(decl)) => self.var_decl(decl),
                    Some(ForInit::Expr(expr)) => self.expr(expr),
                    None => {}
                }
                self.out.emit(";");
                if let Some(test) = test {
                    self.out.emit_space();
                    self.expr(test);
                }
                self.out.emit(";");
                if let Some(update) = update {
                    self.out.emit_space();
                    self.expr(update);
                }
                self.out.emit(") ");
                self.stmt(body);
            }
            StmtKind::ForOf {
                kind,
                name,
                iterable,
                body,
            } => {
                self.out.emit("for (");
                self.out.emit(kind.as_str());
                self.out.emit_space();
                self.out.emit(name);
                self.out.emit(" of ");
                self.expr_prec(iterable, prec::ASSIGN);
                self.out.emit(") ");
                self.stmt(body);
            }
            StmtKind::Break => self.out.emit("break;"),
            StmtKind::Continue => self.out.emit("continue;"),
            StmtKind::Throw(value) => {
                self.out.emit("throw ");
                self.expr(value);
                self.out.emit(";");
            }
            StmtKind::Try {
                block,
                handler,
                finalizer,
            } => {
                self.out.emit("try ");
                self.block(block);
                if let Some(handler) = handler {
                    self.out.emit(" catch ");
                    if let Some(param) = &handler.param {
                        self.out.emit("(");
                        self.out.emit(param);
                        self.out.emit(") ");
                    }
                    self.block(&handler.body);
                }
                if let Some(finalizer) = finalizer {
                    self.out.emit(" finally ");
                    self.block(finalizer);
                }
            }
            StmtKind::Expr(expr) => {
                if starts_with_brace(expr) {
                    self.out.emit("(");
                    self.expr(expr);
                    self.out.emit(")");
                } else {
                    self.expr(expr);
                }
                self.out.emit(";");
            }
            StmtKind::Empty => self.out.emit(";"),
        }
    }

    fn block(&mut self, body: &[Stmt]) {
        if body.is_empty() {
            self.out.emit("{}");
            return;
        }
        match self.layout {
            Layout::Block => {
                self.out.emit("{");
                self.out.emit_newline();
                self.level += 1;
                for stmt in body {
                    self.out.emit_indent(self.level);
                    self.stmt(stmt);
                    self.out.emit_newline();
                }
                self.level -= 1;
                self.out.emit_indent(self.level);
                self.out.emit("}");
            }
            Layout::Inline => {
                self.out.emit("{");
                for stmt in body {
                    self.out.emit_space();
                    self.stmt(stmt);
                }
                self.out.emit(" }");
            }
        }
    }

    fn import(&mut self, decl: &ImportDecl) {
        self.out.emit("import ");
        let mut named = Vec::new();
        let mut wrote_clause = false;
        for spec in &decl.specifiers {
            match spec {
                ImportSpecifier::Default(local) | ImportSpecifier::Namespace(local) => {
                    if wrote_clause {
                        self.out.emit(", ");
                    }
                    if matches!(spec, ImportSpecifier::Namespace(_)) {
                        self.out.emit("* as ");
                    }
                    self.out.emit(local);
                    wrote_clause = true;
                }
                ImportSpecifier::Named { imported, local } => named.push((imported, local)),
            }
        }
        if !named.is_empty() {
            if wrote_clause {
                self.out.emit(", ");
            }
            self.out.emit("{ ");
            for (i, (imported, local)) in named.into_iter().enumerate() {
                if i > 0 {
                    self.out.emit(", ");
                }
                self.out.emit(imported);
                if imported != local {
                    self.out.emit(" as ");
                    self.out.emit(local);
                }
            }
            self.out.emit(" }");
            wrote_clause = true;
        }
        if wrote_clause {
            self.out.emit(" from ");
        }
        self.out.emit(&quote_string(&decl.source));
        self.out.emit(";");
    }

    fn var_decl(&mut self, decl: &VarDecl) {
        self.out.emit(decl.kind.as_str());
        self.out.emit_space();
        for (i, declarator) in decl.declarations.iter().enumerate() {
            if i > 0 {
                self.out.emit(", ");
            }
            self.out.emit(&declarator.name);
            if let Some(init) = &declarator.init {
                self.out.emit(" = ");
                self.expr_prec(init, prec::ASSIGN);
            }
        }
    }

    fn function(&mut self, func: &Function) {
        if func.is_async {
            self.out.emit("async ");
        }
        if func.is_arrow {
            self.params(&func.params);
            self.out.emit(" => ");
            match &func.body {
                FunctionBody::Block(body) => self.block(body),
                FunctionBody::Expr(body) if starts_with_brace(body) => {
                    self.out.emit("(");
                    self.expr(body);
                    self.out.emit(")");
                }
                FunctionBody::Expr(body) => self.expr_prec(body, prec::ASSIGN),
            }
            return;
        }
        self.out.emit("function");
        if func.is_generator {
            self.out.emit("*");
        }
        self.out.emit_space();
        if let Some(name) = &func.name {
            self.out.emit(name);
        }
        self.params(&func.params);
        self.out.emit_space();
        self.function_body(&func.body);
    }

    fn function_body(&mut self, body: &FunctionBody) {
        match body {
            FunctionBody::Block(body) => self.block(body),
            FunctionBody::Expr(expr) => self.block(&[Stmt::new(
                StmtKind::Return(Some((**expr).clone())),
                expr.span,
            )]),
        }
    }

    fn params(&mut self, params: &[Param]) {
        self.out.emit("(");
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.out.emit(", ");
            }
            if param.rest {
                self.out.emit("...");
            }
            self.out.emit(&param.name);
        }
        self.out.emit(")");
    }

    /// Print at the loosest precedence; no enclosing parentheses.
    pub fn expr(&mut self, expr: &Expr) {
        self.expr_prec(expr, prec::SEQUENCE);
    }

    /// Print `expr` where an operand of at least `min` binding strength is
    /// expected, parenthesizing it otherwise.
    fn expr_prec(&mut self, expr: &Expr, min: u8) {
        ensure_sufficient_stack(|| {
            if expr.precedence() < min {
                self.out.emit("(");
                self.expr_inner(expr);
                self.out.emit(")");
            } else {
                self.expr_inner(expr);
            }
        });
    }

    fn expr_inner(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Literal(lit) => self.literal(lit),
            ExprKind::Ident(name) => self.out.emit(name),
            ExprKind::Array(elements) => {
                self.out.emit("[");
                self.list(elements);
                self.out.emit("]");
            }
            ExprKind::Object(props) => self.object(props),
            ExprKind::Function(func) => self.function(func),
            ExprKind::Call { callee, arguments } => {
                self.expr_prec(callee, prec::CALL);
                self.out.emit("(");
                self.list(arguments);
                self.out.emit(")");
            }
            ExprKind::New { callee, arguments } => {
                self.out.emit("new ");
                if matches!(callee.kind, ExprKind::Call { .. }) {
                    self.out.emit("(");
                    self.expr(callee);
                    self.out.emit(")");
                } else {
                    self.expr_prec(callee, prec::CALL);
                }
                self.out.emit("(");
                self.list(arguments);
                self.out.emit(")");
            }
            ExprKind::Member {
                object,
                property,
                computed,
            } => {
                if matches!(object.kind, ExprKind::Literal(Literal::Number(_))) {
                    self.out.emit("(");
                    self.expr(object);
                    self.out.emit(")");
                } else {
                    self.expr_prec(object, prec::CALL);
                }
                if *computed {
                    self.out.emit("[");
                    self.expr(property);
                    self.out.emit("]");
                } else {
                    self.out.emit(".");
                    self.expr_inner(property);
                }
            }
            ExprKind::Unary { op, argument } => {
                self.out.emit(op.as_symbol());
                if op.is_keyword() || needs_sign_gap(*op, argument) {
                    self.out.emit_space();
                }
                self.expr_prec(argument, prec::UNARY);
            }
            ExprKind::Update {
                op,
                prefix,
                argument,
            } => {
                if *prefix {
                    self.out.emit(op.as_symbol());
                    self.expr_prec(argument, prec::UNARY);
                } else {
                    self.expr_prec(argument, prec::CALL);
                    self.out.emit(op.as_symbol());
                }
            }
            ExprKind::Binary { op, left, right } => {
                let level = op.precedence();
                let (left_min, right_min) = if *op == BinaryOp::Exp {
                    // `-x ** 2` is not an expression; the base must be an update or tighter.
                    (prec::UPDATE, level)
                } else if op.is_right_associative() {
                    (level + 1, level)
                } else {
                    (level, level + 1)
                };
                self.infix(left, op.as_symbol(), right, left_min, right_min);
            }
            ExprKind::Logical { op, left, right } => {
                let level = op.precedence();
                let min = |child: &Expr, default: u8| {
                    if mixes_coalesce(*op, child) {
                        prec::PRIMARY
                    } else {
                        default
                    }
                };
                self.infix(left, op.as_symbol(), right, min(left, level), min(right, level + 1));
            }
            ExprKind::Assign { op, left, right } => {
                self.infix(left, op.as_symbol(), right, prec::CALL, prec::ASSIGN);
            }
            ExprKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.expr_prec(test, prec::OR);
                self.out.emit(" ? ");
                self.expr_prec(consequent, prec::ASSIGN);
                self.out.emit(" : ");
                self.expr_prec(alternate, prec::ASSIGN);
            }
            ExprKind::Sequence(items) => self.list(items),
            ExprKind::Await(argument) => {
                self.out.emit("await ");
                self.expr_prec(argument, prec::UNARY);
            }
            ExprKind::Yield { argument, delegate } => {
                self.out.emit(if *delegate { "yield*" } else { "yield" });
                if let Some(argument) = argument {
                    self.out.emit_space();
                    self.expr_prec(argument, prec::ASSIGN);
                }
            }
            ExprKind::Spread(argument) => {
                self.out.emit("...");
                self.expr_prec(argument, prec::ASSIGN);
            }
            ExprKind::Import(source) => {
                self.out.emit("import(");
                self.expr_prec(source, prec::ASSIGN);
                self.out.emit(")");
            }
        }
    }

    fn infix(&mut self, left: &Expr, symbol: &str, right: &Expr, left_min: u8, right_min: u8) {
        self.expr_prec(left, left_min);
        self.out.emit_space();
        self.out.emit(symbol);
        self.out.emit_space();
        self.expr_prec(right, right_min);
    }

    /// Comma-separated expressions, each at assignment precedence.
    fn list(&mut self, items: &[Expr]) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.out.emit(", ");
            }
            self.expr_prec(item, prec::ASSIGN);
        }
    }

    fn object(&mut self, props: &[Property]) {
        if props.is_empty() {
            self.out.emit("{}");
            return;
        }
        self.out.emit("{ ");
        for (i, prop) in props.iter().enumerate() {
            if i > 0 {
                self.out.emit(", ");
            }
            self.property(prop);
        }
        self.out.emit(" }");
    }

    fn property(&mut self, prop: &Property) {
        if prop.method {
            if let ExprKind::Function(func) = &prop.value.kind {
                if func.is_async {
                    self.out.emit("async ");
                }
                if func.is_generator {
                    self.out.emit("*");
                }
                self.property_key(prop);
                self.params(&func.params);
                self.out.emit_space();
                self.function_body(&func.body);
                return;
            }
        }
        let is_shorthand = prop.shorthand
            && !prop.computed
            && matches!(
                (&prop.key.kind, &prop.value.kind),
                (ExprKind::Ident(key), ExprKind::Ident(value)) if key == value
            );
        self.property_key(prop);
        if !is_shorthand {
            self.out.emit(": ");
            self.expr_prec(&prop.value, prec::ASSIGN);
        }
    }

    fn property_key(&mut self, prop: &Property) {
        if prop.computed {
            self.out.emit("[");
            self.expr_prec(&prop.key, prec::ASSIGN);
            self.out.emit("]");
        } else {
            self.expr_inner(&prop.key);
        }
    }

    fn literal(&mut self, lit: &Literal) {
        match lit {
            Literal::Number(n) => self.out.emit(&format_number(*n)),
            Literal::Str(s) => self.out.emit(&quote_string(s)),
            Literal::Bool(true) => self.out.emit("true"),
            Literal::Bool(false) => self.out.emit("false"),
            Literal::Null => self.out.emit("null"),
            Literal::RegExp { pattern, flags } => {
                self.out.emit("/");
                self.out.emit(pattern);
                self.out.emit("/");
                self.out.emit(flags);
            }
        }
    }
}

/// `??` beside `||` or `&&` needs parentheses on whichever side is the other family.
fn mixes_coalesce(parent: LogicalOp, child: &Expr) -> bool {
    match &child.kind {
        ExprKind::Logical { op, .. } => {
            (*op == LogicalOp::Nullish) != (parent == LogicalOp::Nullish)
        }
        _ => false,
    }
}

/// `- -x` and `+ +x` must not fuse into `--x` / `++x`.
fn needs_sign_gap(op: UnaryOp, argument: &Expr) -> bool {
    match (&argument.kind, op) {
        (ExprKind::Unary { op: inner, .. }, UnaryOp::Neg | UnaryOp::Plus) => *inner == op,
        (
            ExprKind::Update {
                op: UpdateOp::Decrement,
                prefix: true,
                ..
            },
            UnaryOp::Neg,
        )
        | (
            ExprKind::Update {
                op: UpdateOp::Increment,
                prefix: true,
                ..
            },
            UnaryOp::Plus,
        ) => true,
        _ => false,
    }
}

/// Whether the printed form of `expr` would begin with `{` or `function`,
/// which a statement or arrow body would read as a block or declaration.
fn starts_with_brace(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Object(_) => true,
        ExprKind::Function(func) => !func.is_arrow,
        ExprKind::Call { callee: left, .. }
        | ExprKind::Member { object: left, .. }
        | ExprKind::Binary { left, .. }
        | ExprKind::Logical { left, .. }
        | ExprKind::Assign { left, .. }
        | ExprKind::Conditional { test: left, .. }
        | ExprKind::Update {
            prefix: false,
            argument: left,
            ..
        } => starts_with_brace(left),
        ExprKind::Sequence(items) => items.first().is_some_and(starts_with_brace),
        _ => false,
    }
}
