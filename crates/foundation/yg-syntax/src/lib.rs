//! Statement trees
//!
//! A schema source unit is a tree of statements. Every statement is a keyword,
//! an optional argument, an ordered list of substatements, and the position of
//! its keyword. Trees are produced by the parser and never mutated afterwards;
//! the semantic passes only read them.

use serde::{Deserialize, Serialize};
use std::fmt;
use yg_span::Position;

/// A positioned keyword/argument node with ordered children
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    /// Statement keyword, possibly prefixed for extension statements
    pub keyword: String,
    /// Argument text after string concatenation and unquoting
    pub argument: Option<String>,
    /// Position of the keyword
    pub position: Position,
    /// Substatements in document order
    pub children: Vec<Statement>,
}

impl Statement {
    /// Create a leaf statement with no substatements
    pub fn new(keyword: impl Into<String>, argument: Option<String>, position: Position) -> Self {
        Self {
            keyword: keyword.into(),
            argument,
            position,
            children: Vec::new(),
        }
    }

    /// Attach substatements
    #[must_use]
    pub fn with_children(mut self, children: Vec<Self>) -> Self {
        self.children = children;
        self
    }

    /// The argument, or the empty string when absent
    pub fn arg(&self) -> &str {
        self.argument.as_deref().unwrap_or_default()
    }

    /// Typed view of the keyword
    pub fn kind(&self) -> Keyword {
        Keyword::from_keyword(&self.keyword)
    }

    /// First substatement with the given keyword
    pub fn child(&self, keyword: Keyword) -> Option<&Self> {
        self.children.iter().find(|child| child.kind() == keyword)
    }

    /// Argument of the first substatement with the given keyword
    pub fn child_arg(&self, keyword: Keyword) -> Option<&str> {
        self.child(keyword).map(Self::arg)
    }

    /// All substatements with the given keyword, in document order
    pub fn children_of(&self, keyword: Keyword) -> impl Iterator<Item = &Self> {
        self.children
            .iter()
            .filter(move |child| child.kind() == keyword)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.argument {
            Some(argument) => write!(formatter, "{} {argument}", self.keyword),
            None => write!(formatter, "{}", self.keyword),
        }
    }
}

/// Keywords the semantic passes give meaning to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    /// `module`
    Module,
    /// `submodule`
    Submodule,
    /// `namespace`
    Namespace,
    /// `prefix`
    Prefix,
    /// `import`
    Import,
    /// `include`
    Include,
    /// `belongs-to`
    BelongsTo,
    /// `container`
    Container,
    /// `list`
    List,
    /// `leaf`
    Leaf,
    /// `leaf-list`
    LeafList,
    /// `choice`
    Choice,
    /// `case`
    Case,
    /// `grouping`
    Grouping,
    /// `uses`
    Uses,
    /// `augment`
    Augment,
    /// `typedef`
    Typedef,
    /// `type`
    Type,
    /// `config`
    Config,
    /// `key`
    Key,
    /// `description`
    Description,
    /// `range`
    Range,
    /// `length`
    Length,
    /// `pattern`
    Pattern,
    /// Anything else, including extension statements
    Other,
}

impl Keyword {
    /// Classify a raw keyword
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "module" => Self::Module,
            "submodule" => Self::Submodule,
            "namespace" => Self::Namespace,
            "prefix" => Self::Prefix,
            "import" => Self::Import,
            "include" => Self::Include,
            "belongs-to" => Self::BelongsTo,
            "container" => Self::Container,
            "list" => Self::List,
            "leaf" => Self::Leaf,
            "leaf-list" => Self::LeafList,
            "choice" => Self::Choice,
            "case" => Self::Case,
            "grouping" => Self::Grouping,
            "uses" => Self::Uses,
            "augment" => Self::Augment,
            "typedef" => Self::Typedef,
            "type" => Self::Type,
            "config" => Self::Config,
            "key" => Self::Key,
            "description" => Self::Description,
            "range" => Self::Range,
            "length" => Self::Length,
            "pattern" => Self::Pattern,
            _ => Self::Other,
        }
    }

    /// Whether statements with this keyword become entries in a parent's directory
    pub fn is_data_definition(self) -> bool {
        matches!(
            self,
            Self::Container | Self::List | Self::Leaf | Self::LeafList | Self::Choice | Self::Case
        )
    }

    /// Whether this keyword is a type restriction carried alongside a `type`
    pub fn is_restriction(self) -> bool {
        matches!(self, Self::Range | Self::Length | Self::Pattern)
    }
}
