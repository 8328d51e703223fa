// AST (Abstract Syntax Tree) definitions for the minic front end

use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Binary operators, grouped by precedence tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Multiplicative
    Mul,
    Div,
    // Additive
    Add,
    Sub,
    // Comparison
    Lt,
    Gt,
    // Equality
    Eq,
    Ne,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// AST nodes representing statements and expressions.
///
/// Every node owns its children outright. Statement lists of a `Program` or a
/// `Block` are kept in source order; no other node kind has siblings.
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    // Containers
    Program {
        statements: Vec<AstNode>,
        location: SourceLocation,
    },
    Block {
        statements: Vec<AstNode>,
        location: SourceLocation,
    },

    // Statements
    VarDecl {
        name: String,
        location: SourceLocation,
    },
    ArrayDecl {
        name: String,
        size: Box<AstNode>,
        location: SourceLocation,
    },
    Assign {
        target: Box<AstNode>,
        value: Box<AstNode>,
        location: SourceLocation,
    },
    If {
        condition: Box<AstNode>,
        body: Box<AstNode>,
        location: SourceLocation,
    },
    While {
        condition: Box<AstNode>,
        body: Box<AstNode>,
        location: SourceLocation,
    },
    RepeatUntil {
        body: Box<AstNode>,
        condition: Box<AstNode>,
        location: SourceLocation,
    },
    Print {
        expr: Box<AstNode>,
        location: SourceLocation,
    },

    // Expressions
    BinaryOp {
        op: BinOp,
        left: Box<AstNode>,
        right: Box<AstNode>,
        location: SourceLocation,
    },
    Factorial {
        operand: Box<AstNode>,
        location: SourceLocation,
    },
    Number(i64, SourceLocation),
    Identifier(String, SourceLocation),
    ArrayAccess {
        name: String,
        index: Box<AstNode>,
        location: SourceLocation,
    },
}

impl AstNode {
    /// Get the source location of this node
    pub fn location(&self) -> &SourceLocation {
        match self {
            AstNode::Program { location, .. } => location,
            AstNode::Block { location, .. } => location,
            AstNode::VarDecl { location, .. } => location,
            AstNode::ArrayDecl { location, .. } => location,
            AstNode::Assign { location, .. } => location,
            AstNode::If { location, .. } => location,
            AstNode::While { location, .. } => location,
            AstNode::RepeatUntil { location, .. } => location,
            AstNode::Print { location, .. } => location,
            AstNode::BinaryOp { location, .. } => location,
            AstNode::Factorial { location, .. } => location,
            AstNode::Number(_, loc) => loc,
            AstNode::Identifier(_, loc) => loc,
            AstNode::ArrayAccess { location, .. } => location,
        }
    }

    /// Short name of the node kind, used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            AstNode::Program { .. } => "program",
            AstNode::Block { .. } => "block",
            AstNode::VarDecl { .. } => "variable declaration",
            AstNode::ArrayDecl { .. } => "array declaration",
            AstNode::Assign { .. } => "assignment",
            AstNode::If { .. } => "if statement",
            AstNode::While { .. } => "while statement",
            AstNode::RepeatUntil { .. } => "repeat-until statement",
            AstNode::Print { .. } => "print statement",
            AstNode::BinaryOp { .. } => "binary operation",
            AstNode::Factorial { .. } => "factorial",
            AstNode::Number(..) => "number",
            AstNode::Identifier(..) => "identifier",
            AstNode::ArrayAccess { .. } => "array access",
        }
    }

    /// Top-level or block statements, if this node is a container
    pub fn statements(&self) -> Option<&[AstNode]> {
        match self {
            AstNode::Program { statements, .. } | AstNode::Block { statements, .. } => {
                Some(statements)
            }
            _ => None,
        }
    }

    /// Flatten the tree into `(depth, label)` rows, parents before children.
    pub fn tree_lines(&self) -> Vec<(usize, String)> {
        let mut lines = Vec::new();
        self.collect_tree_lines(0, &mut lines);
        lines
    }

    fn collect_tree_lines(&self, depth: usize, out: &mut Vec<(usize, String)>) {
        let label = match self {
            AstNode::Program { .. } => "Program".to_string(),
            AstNode::Block { .. } => "Block".to_string(),
            AstNode::VarDecl { name, .. } => format!("VarDecl: {}", name),
            AstNode::ArrayDecl { name, .. } => format!("ArrayDecl: {}", name),
            AstNode::Assign { .. } => "Assign".to_string(),
            AstNode::If { .. } => "If".to_string(),
            AstNode::While { .. } => "While".to_string(),
            AstNode::RepeatUntil { .. } => "Repeat".to_string(),
            AstNode::Print { .. } => "Print".to_string(),
            AstNode::BinaryOp { op, .. } => format!("BinaryOp: {}", op),
            AstNode::Factorial { .. } => "Factorial".to_string(),
            AstNode::Number(n, _) => format!("Number: {}", n),
            AstNode::Identifier(name, _) => format!("Identifier: {}", name),
            AstNode::ArrayAccess { name, .. } => format!("ArrayAccess: {}", name),
        };
        out.push((depth, label));

        match self {
            AstNode::Program { statements, .. } | AstNode::Block { statements, .. } => {
                for stmt in statements {
                    stmt.collect_tree_lines(depth + 1, out);
                }
            }
            AstNode::ArrayDecl { size, .. } => size.collect_tree_lines(depth + 1, out),
            AstNode::Assign { target, value, .. } => {
                target.collect_tree_lines(depth + 1, out);
                value.collect_tree_lines(depth + 1, out);
            }
            AstNode::If {
                condition, body, ..
            }
            | AstNode::While {
                condition, body, ..
            } => {
                condition.collect_tree_lines(depth + 1, out);
                body.collect_tree_lines(depth + 1, out);
            }
            AstNode::RepeatUntil {
                body, condition, ..
            } => {
                body.collect_tree_lines(depth + 1, out);
                condition.collect_tree_lines(depth + 1, out);
            }
            AstNode::Print { expr, .. } => expr.collect_tree_lines(depth + 1, out),
            AstNode::BinaryOp { left, right, .. } => {
                left.collect_tree_lines(depth + 1, out);
                right.collect_tree_lines(depth + 1, out);
            }
            AstNode::Factorial { operand, .. } => operand.collect_tree_lines(depth + 1, out),
            AstNode::ArrayAccess { index, .. } => index.collect_tree_lines(depth + 1, out),
            AstNode::VarDecl { .. } | AstNode::Number(..) | AstNode::Identifier(..) => {}
        }
    }
}

/// Indented tree rendering, two spaces per level
impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (depth, label) in self.tree_lines() {
            writeln!(f, "{:indent$}{}", "", label, indent = depth * 2)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> SourceLocation {
        SourceLocation::new(1, 1)
    }

    #[test]
    fn test_tree_lines_order() {
        let program = AstNode::Program {
            statements: vec![
                AstNode::VarDecl {
                    name: "x".to_string(),
                    location: loc(),
                },
                AstNode::Print {
                    expr: Box::new(AstNode::BinaryOp {
                        op: BinOp::Add,
                        left: Box::new(AstNode::Identifier("x".to_string(), loc())),
                        right: Box::new(AstNode::Number(1, loc())),
                        location: loc(),
                    }),
                    location: loc(),
                },
            ],
            location: loc(),
        };

        let lines = program.tree_lines();
        assert_eq!(
            lines,
            vec![
                (0, "Program".to_string()),
                (1, "VarDecl: x".to_string()),
                (1, "Print".to_string()),
                (2, "BinaryOp: +".to_string()),
                (3, "Identifier: x".to_string()),
                (3, "Number: 1".to_string()),
            ]
        );
    }

    #[test]
    fn test_display_indents() {
        let block = AstNode::Block {
            statements: vec![AstNode::VarDecl {
                name: "y".to_string(),
                location: loc(),
            }],
            location: loc(),
        };
        assert_eq!(block.to_string(), "Block\n  VarDecl: y\n");
    }
}
