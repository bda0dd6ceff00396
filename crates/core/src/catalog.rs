//! Token catalog: the immutable registry of pill specifications.
//!
//! The catalog is constructed once at startup and shared by reference.
//! Both the expectation resolver (UI affordances) and the code generator
//! (labels, categories) read from it; nothing mutates it at runtime.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed classification of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Keyword,
    Function,
    Operator,
    Condition,
    Variable,
    ListValue,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Keyword => "keyword",
            Category::Function => "function",
            Category::Operator => "operator",
            Category::Condition => "condition",
            Category::Variable => "variable",
            Category::ListValue => "list_value",
        };
        write!(f, "{}", name)
    }
}

/// A catalog entry: one pill specification.
///
/// `expects` lists the argument categories this token requires when used
/// in call position, in order. It is empty for non-callable tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSpec {
    /// Unique symbolic identifier, e.g. `"filter"`, `"num-1"`.
    pub id: String,
    /// Literal text emitted into generated source, e.g. `"filter"`, `"1"`.
    pub label: String,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expects: Vec<Category>,
    /// True if this token closes off its local expectation context.
    #[serde(default)]
    pub is_terminal: bool,
}

impl TokenSpec {
    fn new(id: &str, label: &str, category: Category) -> Self {
        TokenSpec {
            id: id.to_string(),
            label: label.to_string(),
            category,
            expects: Vec::new(),
            is_terminal: false,
        }
    }

    fn expecting(mut self, expects: &[Category]) -> Self {
        self.expects = expects.to_vec();
        self
    }

    fn terminal(mut self) -> Self {
        self.is_terminal = true;
        self
    }
}

/// Error raised when a catalog cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Two entries share the same `id`.
    DuplicateId(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::DuplicateId(id) => write!(f, "duplicate token id '{}'", id),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Immutable token registry with id and label lookup.
#[derive(Debug, Clone)]
pub struct Catalog {
    specs: Vec<TokenSpec>,
    by_id: HashMap<String, usize>,
    by_label: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from entries, rejecting duplicate ids.
    ///
    /// When two entries share a label, lookup by label resolves to the
    /// first one (labels are unique in the standard catalog).
    pub fn new(specs: Vec<TokenSpec>) -> Result<Self, CatalogError> {
        let mut by_id = HashMap::new();
        let mut by_label = HashMap::new();
        for (i, spec) in specs.iter().enumerate() {
            if by_id.insert(spec.id.clone(), i).is_some() {
                return Err(CatalogError::DuplicateId(spec.id.clone()));
            }
            by_label.entry(spec.label.clone()).or_insert(i);
        }
        Ok(Catalog {
            specs,
            by_id,
            by_label,
        })
    }

    /// The standard pill set.
    pub fn standard() -> Self {
        use Category::*;
        let specs = vec![
            // Keywords
            TokenSpec::new("define", "define", Keyword).expecting(&[Variable, ListValue]),
            TokenSpec::new("list", "list", Keyword).expecting(&[ListValue, ListValue, ListValue]),
            TokenSpec::new("display", "display", Keyword).expecting(&[ListValue]),
            // Functions
            TokenSpec::new("cons", "cons", Function).expecting(&[ListValue, Variable]),
            TokenSpec::new("first", "first", Function).expecting(&[Variable]),
            TokenSpec::new("rest", "rest", Function).expecting(&[Variable]),
            TokenSpec::new("filter", "filter", Function).expecting(&[Condition, Variable]),
            TokenSpec::new("map", "map", Function).expecting(&[Function, Variable]),
            TokenSpec::new("foldr", "foldr", Function).expecting(&[Function, ListValue, Variable]),
            // Conditions
            TokenSpec::new("empty?", "empty?", Condition).expecting(&[Variable]),
            TokenSpec::new("even?", "even?", Condition).expecting(&[ListValue]),
            TokenSpec::new("odd?", "odd?", Condition).expecting(&[ListValue]),
            // Operators
            TokenSpec::new("+", "+", Operator).expecting(&[ListValue, ListValue]),
            TokenSpec::new("-", "-", Operator).expecting(&[ListValue, ListValue]),
            TokenSpec::new("=", "=", Operator).expecting(&[ListValue, ListValue]),
            // Variables
            TokenSpec::new("item", "item", Variable).terminal(),
            TokenSpec::new("x", "x", Variable).terminal(),
            // List values
            TokenSpec::new("num-0", "0", ListValue).terminal(),
            TokenSpec::new("num-1", "1", ListValue).terminal(),
            TokenSpec::new("str-hello", "\"hello\"", ListValue).terminal(),
            TokenSpec::new("num-generic", "1 2 3", ListValue).terminal(),
            TokenSpec::new("num-long-sequence", "1 2 3 4 5 6 7 8 9", ListValue).terminal(),
        ];
        Catalog::new(specs).expect("standard catalog has unique ids")
    }

    /// Look up an entry by its id.
    pub fn get(&self, id: &str) -> Option<&TokenSpec> {
        self.by_id.get(id).map(|&i| &self.specs[i])
    }

    /// Look up an entry by its emitted label.
    pub fn by_label(&self, label: &str) -> Option<&TokenSpec> {
        self.by_label.get(label).map(|&i| &self.specs[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &TokenSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
