pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors that can occur while constructing or loading an instance.
///
/// Note that a domain wipeout during search is *not* an error: it is the
/// expected signal that a branch is infeasible, and is reported through
/// [`Outcome::Wipeout`](crate::solver::consistency::Outcome) instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("variable {var} is out of range for an instance with {count} variables")]
    VariableOutOfRange { var: usize, count: usize },

    #[error("variable {var} has an empty initial domain ({lower}..={upper})")]
    EmptyInitialDomain { var: usize, lower: i64, upper: i64 },

    #[error("constraint relates variable {var} to itself")]
    SelfReferentialConstraint { var: usize },

    #[error("more than one constraint between variables {first} and {second}")]
    DuplicateConstraint { first: usize, second: usize },

    #[error("malformed .csp document at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
