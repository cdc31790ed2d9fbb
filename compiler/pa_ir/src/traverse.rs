//! Tree traversal.
//!
//! Two walkers live here:
//!
//! - [`walk_paths`]: pre-order walk over one expression tree that yields each
//!   node with its structural path. Its child order and child keys are the
//!   schema that instrumentation paths are written against.
//! - [`VisitorMut`]: a mutable visitor over statements and expressions with
//!   `walk_*` defaults, used by rewrite passes that must reach every function
//!   body in a file.

use pa_stack::ensure_sufficient_stack;

use crate::ast::{
    Expr, ExprKind, ForInit, Function, FunctionBody, Program, Stmt, StmtKind, VarDecl,
};
use crate::path::{keys, PathSegment, StructuralPath};

/// Call `f` with each direct child of `expr` and the path suffix reaching it,
/// in source order. Function bodies are not entered.
pub fn for_each_child<'a>(expr: &'a Expr, mut f: impl FnMut(&[PathSegment], &'a Expr)) {
    use PathSegment::{Index, Key};

    match &expr.kind {
        ExprKind::Call { callee, arguments } | ExprKind::New { callee, arguments } => {
            f(&[Key(keys::CALLEE)], callee);
            for (i, arg) in arguments.iter().enumerate() {
                f(&[Key(keys::ARGUMENTS), Index(i)], arg);
            }
        }
        ExprKind::Member {
            object, property, ..
        } => {
            f(&[Key(keys::OBJECT)], object);
            f(&[Key(keys::PROPERTY)], property);
        }
        ExprKind::Array(elements) => {
            for (i, element) in elements.iter().enumerate() {
                f(&[Key(keys::ELEMENTS), Index(i)], element);
            }
        }
        ExprKind::Object(properties) => {
            for (i, prop) in properties.iter().enumerate() {
                f(&[Key(keys::PROPERTIES), Index(i), Key(keys::KEY)], &prop.key);
                f(&[Key(keys::PROPERTIES), Index(i), Key(keys::VALUE)], &prop.value);
            }
        }
        ExprKind::Unary { argument, .. }
        | ExprKind::Update { argument, .. }
        | ExprKind::Await(argument)
        | ExprKind::Spread(argument) => f(&[Key(keys::ARGUMENT)], argument),
        ExprKind::Yield {
            argument: Some(argument),
            ..
        } => f(&[Key(keys::ARGUMENT)], argument),
        ExprKind::Binary { left, right, .. }
        | ExprKind::Logical { left, right, .. }
        | ExprKind::Assign { left, right, .. } => {
            f(&[Key(keys::LEFT)], left);
            f(&[Key(keys::RIGHT)], right);
        }
        ExprKind::Conditional {
            test,
            consequent,
            alternate,
        } => {
            f(&[Key(keys::TEST)], test);
            f(&[Key(keys::CONSEQUENT)], consequent);
            f(&[Key(keys::ALTERNATE)], alternate);
        }
        ExprKind::Sequence(expressions) => {
            for (i, e) in expressions.iter().enumerate() {
                f(&[Key(keys::EXPRESSIONS), Index(i)], e);
            }
        }
        ExprKind::Import(source) => f(&[Key(keys::SOURCE)], source),
        ExprKind::Literal(_)
        | ExprKind::Ident(_)
        | ExprKind::Function(_)
        | ExprKind::Yield { argument: None, .. } => {}
    }
}

/// Pre-order walk yielding every node below and including `expr`, each with
/// its structural path. `path` is the path of `expr` itself.
pub fn walk_paths<'a>(
    expr: &'a Expr,
    path: &StructuralPath,
    visit: &mut dyn FnMut(&StructuralPath, &'a Expr),
) {
    ensure_sufficient_stack(|| {
        visit(path, expr);
        for_each_child(expr, |suffix, child| {
            walk_paths(child, &path.join(suffix), visit);
        });
    });
}

/// Mutable visitor over a whole program.
///
/// Override `visit_*` to act on specific nodes, calling the matching
/// `walk_*` function to continue into children.
pub trait VisitorMut {
    fn visit_stmt(&mut self, stmt: &mut Stmt) {
        walk_stmt_mut(self, stmt);
    }

    fn visit_expr(&mut self, expr: &mut Expr) {
        walk_expr_mut(self, expr);
    }

    fn visit_function(&mut self, func: &mut Function) {
        walk_function_mut(self, func);
    }
}

pub fn walk_program_mut<V: VisitorMut + ?Sized>(visitor: &mut V, program: &mut Program) {
    for stmt in &mut program.body {
        visitor.visit_stmt(stmt);
    }
}

fn walk_var_decl_mut<V: VisitorMut + ?Sized>(visitor: &mut V, decl: &mut VarDecl) {
    for declarator in &mut decl.declarations {
        if let Some(init) = &mut declarator.init {
            visitor.visit_expr(init);
        }
    }
}

pub fn walk_stmt_mut<V: VisitorMut + ?Sized>(visitor: &mut V, stmt: &mut Stmt) {
    ensure_sufficient_stack(|| match &mut stmt.kind {
        StmtKind::Import(_) | StmtKind::Break | StmtKind::Continue | StmtKind::Empty => {}
        StmtKind::Export(inner) => visitor.visit_stmt(inner),
        StmtKind::Var(decl) => walk_var_decl_mut(visitor, decl),
        StmtKind::Function(func) => visitor.visit_function(std::rc::Rc::make_mut(func)),
        StmtKind::Return(value) => {
            if let Some(value) = value {
                visitor.visit_expr(value);
            }
        }
        StmtKind::If {
            test,
            consequent,
            alternate,
        } => {
            visitor.visit_expr(test);
            visitor.visit_stmt(consequent);
            if let Some(alternate) = alternate {
                visitor.visit_stmt(alternate);
            }
        }
        StmtKind::Block(body) => {
            for s in body {
                visitor.visit_stmt(s);
            }
        }
        StmtKind::While { test, body } => {
            visitor.visit_expr(test);
            visitor.visit_stmt(body);
        }
        StmtKind::For {
            init,
            test,
            update,
            body,
        } => {
            match init {
                Some(ForInit::Var(decl)) => walk_var_decl_mut(visitor, decl),
                Some(ForInit::Expr(e)) => visitor.visit_expr(e),
                None => {}
            }
            if let Some(test) = test {
                visitor.visit_expr(test);
            }
            if let Some(update) = update {
                visitor.visit_expr(update);
            }
            visitor.visit_stmt(body);
        }
        StmtKind::ForOf { iterable, body, .. } => {
            visitor.visit_expr(iterable);
            visitor.visit_stmt(body);
        }
        StmtKind::Throw(e) | StmtKind::Expr(e) => visitor.visit_expr(e),
        StmtKind::Try {
            block,
            handler,
            finalizer,
        } => {
            for s in block {
                visitor.visit_stmt(s);
            }
            if let Some(handler) = handler {
                for s in &mut handler.body {
                    visitor.visit_stmt(s);
                }
            }
            if let Some(finalizer) = finalizer {
                for s in finalizer {
                    visitor.visit_stmt(s);
                }
            }
        }
    });
}

pub fn walk_expr_mut<V: VisitorMut + ?Sized>(visitor: &mut V, expr: &mut Expr) {
    ensure_sufficient_stack(|| match &mut expr.kind {
        ExprKind::Literal(_) | ExprKind::Ident(_) | ExprKind::Yield { argument: None, .. } => {}
        ExprKind::Function(func) => visitor.visit_function(std::rc::Rc::make_mut(func)),
        ExprKind::Call { callee, arguments } | ExprKind::New { callee, arguments } => {
            visitor.visit_expr(callee);
            for arg in arguments {
                visitor.visit_expr(arg);
            }
        }
        ExprKind::Member {
            object, property, ..
        } => {
            visitor.visit_expr(object);
            visitor.visit_expr(property);
        }
        ExprKind::Array(items) | ExprKind::Sequence(items) => {
            for item in items {
                visitor.visit_expr(item);
            }
        }
        ExprKind::Object(properties) => {
            for prop in properties {
                visitor.visit_expr(&mut prop.key);
                visitor.visit_expr(&mut prop.value);
            }
        }
        ExprKind::Unary { argument, .. }
        | ExprKind::Update { argument, .. }
        | ExprKind::Await(argument)
        | ExprKind::Spread(argument)
        | ExprKind::Import(argument)
        | ExprKind::Yield {
            argument: Some(argument),
            ..
        } => visitor.visit_expr(argument),
        ExprKind::Binary { left, right, .. }
        | ExprKind::Logical { left, right, .. }
        | ExprKind::Assign { left, right, .. } => {
            visitor.visit_expr(left);
            visitor.visit_expr(right);
        }
        ExprKind::Conditional {
            test,
            consequent,
            alternate,
        } => {
            visitor.visit_expr(test);
            visitor.visit_expr(consequent);
            visitor.visit_expr(alternate);
        }
    });
}

pub fn walk_function_mut<V: VisitorMut + ?Sized>(visitor: &mut V, func: &mut Function) {
    match &mut func.body {
        FunctionBody::Block(body) => {
            for stmt in body {
                visitor.visit_stmt(stmt);
            }
        }
        FunctionBody::Expr(body) => visitor.visit_expr(body),
    }
}
