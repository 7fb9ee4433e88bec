//! Typed AST wrappers over CST nodes.
//!
//! Each struct wraps a `SyntaxNode` and provides typed accessors.
//! Cast is infallible for correct `SyntaxKind` - validation happens elsewhere.

use super::cst::{SyntaxKind, SyntaxNode, SyntaxToken};

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl $name {
            pub fn cast(node: SyntaxNode) -> Option<Self> {
                (node.kind() == SyntaxKind::$kind).then(|| Self(node))
            }

            pub fn as_cst(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

ast_node!(Root, Root);
ast_node!(Subject, Subject);
ast_node!(FirstClause, FirstClause);
ast_node!(Predicate, Predicate);
ast_node!(Condition, Condition);
ast_node!(AndExpr, AndExpr);
ast_node!(OrExpr, OrExpr);
ast_node!(Updates, Updates);
ast_node!(Assignment, Assignment);
ast_node!(OrderBy, OrderBy);
ast_node!(SortTerm, SortTerm);

fn token(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|it| it.into_token())
        .find(|t| t.kind() == kind)
}

/// Predicate expression: a single condition or a binary junction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Condition(Condition),
    And(AndExpr),
    Or(OrExpr),
}

impl Expr {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::Condition => Condition::cast(node).map(Expr::Condition),
            SyntaxKind::AndExpr => AndExpr::cast(node).map(Expr::And),
            SyntaxKind::OrExpr => OrExpr::cast(node).map(Expr::Or),
            _ => None,
        }
    }

    pub fn as_cst(&self) -> &SyntaxNode {
        match self {
            Expr::Condition(n) => n.as_cst(),
            Expr::And(n) => n.as_cst(),
            Expr::Or(n) => n.as_cst(),
        }
    }

    /// Conditions in source order.
    pub fn conditions(&self) -> Vec<Condition> {
        let mut out = Vec::new();
        self.collect_conditions(&mut out);
        out
    }

    fn collect_conditions(&self, out: &mut Vec<Condition>) {
        match self {
            Expr::Condition(c) => out.push(c.clone()),
            Expr::And(_) | Expr::Or(_) => {
                for child in self.as_cst().children().filter_map(Expr::cast) {
                    child.collect_conditions(out);
                }
            }
        }
    }
}

impl Root {
    pub fn subject(&self) -> Option<Subject> {
        self.0.children().find_map(Subject::cast)
    }

    pub fn by(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::KwBy)
    }

    pub fn predicate(&self) -> Option<Predicate> {
        self.0.children().find_map(Predicate::cast)
    }

    pub fn updates(&self) -> Option<Updates> {
        self.0.children().find_map(Updates::cast)
    }

    pub fn order_by(&self) -> Option<OrderBy> {
        self.0.children().find_map(OrderBy::cast)
    }
}

impl Subject {
    pub fn prefix(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::Prefix)
    }

    pub fn first(&self) -> Option<FirstClause> {
        self.0.children().find_map(FirstClause::cast)
    }
}

impl FirstClause {
    pub fn keyword(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::KwFirst)
    }

    /// The digit run after `First`, if written.
    pub fn count(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::Number)
    }
}

impl Predicate {
    pub fn expr(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

macro_rules! junction {
    ($name:ident) => {
        impl $name {
            pub fn lhs(&self) -> Option<Expr> {
                self.0.children().find_map(Expr::cast)
            }

            pub fn rhs(&self) -> Option<Expr> {
                self.0.children().filter_map(Expr::cast).nth(1)
            }

            pub fn keyword(&self) -> Option<SyntaxToken> {
                self.0
                    .children_with_tokens()
                    .filter_map(|it| it.into_token())
                    .find(|t| matches!(t.kind(), SyntaxKind::KwAnd | SyntaxKind::KwOr))
            }
        }
    };
}

junction!(AndExpr);
junction!(OrExpr);

impl Condition {
    pub fn attribute(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::Attribute)
    }

    pub fn not_token(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::KwNot)
    }

    /// Explicit operator spelling; `None` means implicit equality.
    pub fn operator(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::Operator)
    }
}

impl Updates {
    pub fn assignments(&self) -> impl Iterator<Item = Assignment> + '_ {
        self.0.children().filter_map(Assignment::cast)
    }
}

impl Assignment {
    pub fn op(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::Assign)
    }

    pub fn attribute(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::Attribute)
    }
}

impl OrderBy {
    pub fn terms(&self) -> impl Iterator<Item = SortTerm> + '_ {
        self.0.children().filter_map(SortTerm::cast)
    }
}

impl SortTerm {
    pub fn attribute(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::Attribute)
    }

    /// `Asc` or `Desc` token, if written.
    pub fn direction(&self) -> Option<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| matches!(t.kind(), SyntaxKind::KwAsc | SyntaxKind::KwDesc))
    }
}
