use super::statement::Statement;
use std::fmt::Display;

/// Root of the syntax tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn iter(&self) -> std::slice::Iter<'_, Statement> {
        self.statements.iter()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn get_statement(&self, index: usize) -> Option<&Statement> {
        self.statements.get(index)
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Statement;
    type IntoIter = std::slice::Iter<'a, Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Statements are written back to back. An expression statement is closed
/// with `;` when another kind of statement follows it, otherwise its last token
/// would run into the next keyword or name.
impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut statements = self.statements.iter().peekable();
        while let Some(stmt) = statements.next() {
            write!(f, "{stmt}")?;
            let needs_separator = matches!(stmt, Statement::Expression(_))
                && statements
                    .peek()
                    .is_some_and(|next| !matches!(next, Statement::Expression(_)));
            if needs_separator {
                write!(f, ";")?;
            }
        }
        Ok(())
    }
}
