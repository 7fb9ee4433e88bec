use rowan::TextRange;

/// Diagnostic kinds ordered by priority (highest priority first).
///
/// When two diagnostics start at the same position, the higher-priority one
/// suppresses the lower-priority one.
///
/// Priority rationale:
/// - A name that cannot be tokenized makes every later stage meaningless
/// - Missing pieces are root causes the user should fix first
/// - Parameter binding assumes a well-formed name
/// - Plan validation assumes a fully bound plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // Lexing
    UnknownFragment,
    AmbiguousToken,

    // User omitted something required
    MissingPrefix,
    MissingBy,
    ExpectedCondition,
    ExpectedAttribute,
    ExpectedSortAttribute,
    ExpectedAssignment,

    // User wrote something that doesn't belong
    MisplacedFirst,
    MisplacedNumber,
    DoubleNegation,
    AssignmentWithoutUpdate,
    UnexpectedToken,

    // Parameter binding
    MissingOperand,
    DirectiveAsOperand,
    ExtraParameter,
    MissingEntityParameter,

    // Plan validation
    IncompatibleReturn,
    ArityMismatch,
    UnknownAttribute,
    DuplicateSortAttribute,
    InvalidFirstCount,
    ConflictingLimit,
    DuplicateDirective,
    DirectiveNotAllowed,
    OperatorNotApplicable,
    OperandKindMismatch,
    OperandCategoryMismatch,
    MissingIdAttribute,
    MixedJunctions,
}

impl DiagnosticKind {
    /// Default severity for this kind. Can be overridden by policy.
    pub fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Whether this kind suppresses `other` when both start at the same position.
    ///
    /// Uses enum discriminant ordering: lower position = higher priority.
    pub fn suppresses(&self, other: &DiagnosticKind) -> bool {
        self < other
    }

    /// Produced by the keyword lexer.
    pub fn is_lexical(&self) -> bool {
        matches!(self, Self::UnknownFragment | Self::AmbiguousToken)
    }

    /// Default hint for this kind, automatically included in diagnostics.
    pub fn default_hint(&self) -> Option<&'static str> {
        match self {
            Self::MissingBy => Some("conditions start after `By`, e.g. `findByName`"),
            Self::ExpectedSortAttribute => Some("e.g. `OrderByLastNameAsc`"),
            Self::AmbiguousToken => Some("rename the attribute or the method to remove the overlap"),
            Self::MixedJunctions => {
                Some("`And` and `Or` associate left to right without precedence")
            }
            _ => None,
        }
    }

    /// Base message for this diagnostic kind, used when no custom message is provided.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::UnknownFragment => "unrecognized fragment",
            Self::AmbiguousToken => "ambiguous token",

            Self::MissingPrefix => "method name must start with a query prefix",
            Self::MissingBy => "expected `By` before conditions",
            Self::ExpectedCondition => "expected a condition",
            Self::ExpectedAttribute => "expected an attribute",
            Self::ExpectedSortAttribute => "expected an attribute after `OrderBy`",
            Self::ExpectedAssignment => "expected `Set` or `Add` clauses",

            Self::MisplacedFirst => "`First` is only allowed on `find` methods",
            Self::MisplacedNumber => "a number must follow `First`",
            Self::DoubleNegation => "condition is negated twice",
            Self::AssignmentWithoutUpdate => "assignments are only allowed on `update` methods",
            Self::UnexpectedToken => "unexpected token",

            Self::MissingOperand => "not enough parameters for condition",
            Self::DirectiveAsOperand => "directive parameter cannot be a condition operand",
            Self::ExtraParameter => "parameter is not bound to anything",
            Self::MissingEntityParameter => "`save` takes exactly one entity parameter",

            Self::IncompatibleReturn => "return type does not fit the method prefix",
            Self::ArityMismatch => "operand count does not match operator arity",
            Self::UnknownAttribute => "unknown attribute",
            Self::DuplicateSortAttribute => "attribute is sorted more than once",
            Self::InvalidFirstCount => "`First` needs a positive count",
            Self::ConflictingLimit => "conflicting result limits",
            Self::DuplicateDirective => "directive parameter given more than once",
            Self::DirectiveNotAllowed => "directive is only allowed on `find` methods",
            Self::OperatorNotApplicable => "operator does not apply to attribute type",
            Self::OperandKindMismatch => "parameter shape does not fit the operator",
            Self::OperandCategoryMismatch => "parameter type does not match attribute type",
            Self::MissingIdAttribute => "map results need an id attribute",
            Self::MixedJunctions => "condition mixes `And` and `Or`",
        }
    }

    /// Template for custom messages. Contains `{}` placeholder for caller-provided detail.
    pub fn custom_message(&self) -> String {
        match self {
            Self::UnknownFragment => "`{}` is neither a keyword nor a known attribute".to_string(),
            Self::UnknownAttribute => "`{}` is not an attribute of this entity".to_string(),
            Self::DuplicateSortAttribute => "`{}` is sorted more than once".to_string(),
            Self::DoubleNegation => "`Not` followed by already negated `{}`".to_string(),
            Self::MissingPrefix | Self::IncompatibleReturn | Self::ConflictingLimit => {
                format!("{}; {{}}", self.fallback_message())
            }
            // Standard pattern: fallback + context
            _ => format!("{}: {{}}", self.fallback_message()),
        }
    }

    /// Render the final message.
    ///
    /// - `None` → returns `fallback_message()`
    /// - `Some(detail)` → returns `custom_message()` with `{}` replaced by detail
    pub fn message(&self, msg: Option<&str>) -> String {
        match msg {
            None => self.fallback_message().to_string(),
            Some(detail) => self.custom_message().replace("{}", detail),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub(crate) range: TextRange,
    pub(crate) message: String,
}

impl RelatedInfo {
    pub fn new(range: TextRange, message: impl Into<String>) -> Self {
        Self {
            range,
            message: message.into(),
        }
    }
}

/// One diagnostic, anchored to a byte range of the method name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub(crate) kind: DiagnosticKind,
    pub(crate) severity: Severity,
    /// The range shown to the user (underlined in output).
    pub(crate) range: TextRange,
    pub(crate) message: String,
    pub(crate) related: Vec<RelatedInfo>,
    pub(crate) hints: Vec<String>,
}

impl DiagnosticMessage {
    pub(crate) fn new(kind: DiagnosticKind, range: TextRange, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            range,
            message: message.into(),
            related: Vec::new(),
            hints: kind.default_hint().map(String::from).into_iter().collect(),
        }
    }

    pub(crate) fn with_default_message(kind: DiagnosticKind, range: TextRange) -> Self {
        Self::new(kind, range, kind.fallback_message())
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    pub(crate) fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub(crate) fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl std::fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}..{}: {}",
            self.severity,
            u32::from(self.range.start()),
            u32::from(self.range.end()),
            self.message
        )?;
        for related in &self.related {
            write!(
                f,
                " (related: {} at {}..{})",
                related.message,
                u32::from(related.range.start()),
                u32::from(related.range.end())
            )?;
        }
        for hint in &self.hints {
            write!(f, " (hint: {})", hint)?;
        }
        Ok(())
    }
}
