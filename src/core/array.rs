//! # Array Grammar
//!
//! Parameter values may carry multi-dimensional arrays written as plain text,
//! for example `[1,2][3,4]`, `{{a, "b,c"}, {d, e}}` or simply `1 2 3`. This
//! module tokenizes such text, checks its dimensional consistency and turns it
//! into a flat item sequence plus a dimension vector. It also performs the
//! reverse operation, rendering a flat sequence back into bracket notation.
//!
//! Dimensions follow column-major order: `dims[0]` is the innermost, fastest
//! varying dimension, so `[[1,2,3],[4,5,6]]` has `dims == [3, 2]`.

use crate::constants::MAX_DIMS;
use crate::core::value::integral;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::{borrow::Cow, fmt};
use thiserror::Error;

lazy_static! {
    // A file name followed by a slice range, e.g. `image(1:100,20:40)`.
    static ref SLICE_RE: Regex =
        Regex::new(r"^\w[\w.~/-]*\(\d+:\d+").expect("slice pattern is a valid regex");
}

/// Represents the grammar errors that can occur while reading array text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArrayError {
    /// The text nests deeper than `MAX_DIMS` levels.
    #[error("maximum dimensions ({max}) exceeded in array '{text}'")]
    MaxDimsExceeded {
        /// The maximum number of dimensions allowed.
        max: usize,
        /// The offending text.
        text: String,
    },
    /// Two groups at the same nesting level hold a different number of elements.
    #[error("inconsistent element count at same level in array '{text}'")]
    InconsistentCount {
        /// The offending text.
        text: String,
    },
    /// Opening and closing brackets do not pair up.
    #[error("unbalanced brackets in array '{text}'")]
    Unbalanced {
        /// The offending text.
        text: String,
    },
    /// Something follows the bracket that closes the whole array.
    #[error("unexpected text after the closing bracket in array '{text}'")]
    TrailingText {
        /// The offending text.
        text: String,
    },
    /// A group holds no elements at all.
    #[error("empty group in array '{text}'")]
    EmptyGroup {
        /// The offending text.
        text: String,
    },
    /// A typed array was built with dimensions that cannot hold its data.
    #[error("array shape {dims:?} cannot hold {len} elements")]
    Shape {
        /// The requested dimensions.
        dims: Vec<usize>,
        /// The number of elements supplied.
        len: usize,
    },
}

// --- TOKENIZER ---

/// A single lexical unit of array text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `[` or `{`.
    Open,
    /// `]` or `}`.
    Close,
    /// `,`.
    Comma,
    /// Any element text, with surrounding quotes already removed.
    Item(String),
}

fn is_delimiter(c: char) -> bool {
    matches!(c, '[' | ']' | '{' | '}' | ',') || c.is_whitespace()
}

struct Scanner<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn rest(&self) -> &'a str {
        self.text.get(self.pos..).unwrap_or_default()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn slice_from(&self, start: usize) -> String {
        self.text.get(start..self.pos).unwrap_or_default().to_string()
    }

    /// Reads a quoted literal. An unterminated quote runs to the end of input.
    fn quoted(&mut self, quote: char) -> String {
        self.bump();
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == quote {
                break;
            }
            self.bump();
        }
        let literal = self.slice_from(start);
        self.bump();
        literal
    }

    fn word(&mut self) -> String {
        let start = self.pos;
        if let Some(m) = SLICE_RE.find(self.rest()) {
            self.pos += m.end();
            while let Some(c) = self.bump() {
                if c == ')' {
                    break;
                }
            }
        } else {
            while let Some(c) = self.peek() {
                if is_delimiter(c) {
                    break;
                }
                self.bump();
            }
        }
        self.slice_from(start)
    }
}

/// Splits array text into tokens.
///
/// Whitespace only separates tokens. Quoted literals keep delimiters as plain
/// characters, and a `name(1:10,...)` slice stays one token up to its `)`.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut scanner = Scanner { text, pos: 0 };
    let mut tokens = Vec::new();

    while let Some(c) = scanner.peek() {
        match c {
            '[' | '{' => {
                scanner.bump();
                tokens.push(Token::Open);
            }
            ']' | '}' => {
                scanner.bump();
                tokens.push(Token::Close);
            }
            ',' => {
                scanner.bump();
                tokens.push(Token::Comma);
            }
            c if c.is_whitespace() => {
                scanner.bump();
            }
            '"' | '\'' => tokens.push(Token::Item(scanner.quoted(c))),
            _ => tokens.push(Token::Item(scanner.word())),
        }
    }
    tokens
}

fn top_level_elements(tokens: &[Token]) -> usize {
    let mut depth = 0usize;
    let mut count = 0usize;
    for token in tokens {
        match token {
            Token::Open => {
                if depth == 0 {
                    count += 1;
                }
                depth += 1;
            }
            Token::Close => depth = depth.saturating_sub(1),
            Token::Item(_) => {
                if depth == 0 {
                    count += 1;
                }
            }
            Token::Comma => {}
        }
    }
    count
}

/// Tells if `text` holds several top-level elements that are not enclosed in
/// a single bracket pair, e.g. `1 2 3` or `[1,2][3,4]`.
pub fn is_open_array(text: &str) -> bool {
    top_level_elements(&tokenize(text)) > 1
}

/// Tells if `text` is written in bracket notation.
pub fn is_array(text: &str) -> bool {
    matches!(tokenize(text).first(), Some(Token::Open))
}

/// Encloses an open array in `[ ]`; any other text is returned unchanged.
pub fn wrap_open_array(text: &str) -> Cow<'_, str> {
    if is_open_array(text) {
        Cow::Owned(format!("[{}]", text))
    } else {
        Cow::Borrowed(text)
    }
}

// --- STRUCTURAL PARSER ---

/// The untyped result of parsing array text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedArray {
    /// Element texts in storage order.
    pub items: Vec<String>,
    /// Dimension sizes, innermost first.
    pub dims: Vec<usize>,
}

/// Parses array text into its items and dimensions.
///
/// Open arrays and bare scalars are wrapped in `[ ]` first, so `1 2 3`,
/// `[1,2,3]` and `{1 2 3}` all give `dims == [3]`.
pub fn parse_array(text: &str) -> Result<ParsedArray, ArrayError> {
    let mut tokens = tokenize(text);
    if top_level_elements(&tokens) > 1 || !matches!(tokens.first(), Some(Token::Open)) {
        tokens.insert(0, Token::Open);
        tokens.push(Token::Close);
    }
    parse_structure(&tokens, text)
}

fn parse_structure(tokens: &[Token], text: &str) -> Result<ParsedArray, ArrayError> {
    let unbalanced = || ArrayError::Unbalanced {
        text: text.to_string(),
    };
    let inconsistent = || ArrayError::InconsistentCount {
        text: text.to_string(),
    };

    // Element counters for the levels currently open, outermost first.
    let mut counts: Vec<usize> = Vec::with_capacity(MAX_DIMS);
    // Size of each level, fixed by the first group closed at that level.
    let mut recorded: [Option<usize>; MAX_DIMS] = [None; MAX_DIMS];
    let mut ndims = 0usize;
    let mut items = Vec::new();
    let mut closed = false;
    // Nesting level of the first item; every item must sit at this level.
    let mut item_level: Option<usize> = None;

    for token in tokens {
        if closed {
            return Err(ArrayError::TrailingText {
                text: text.to_string(),
            });
        }
        match token {
            Token::Open => {
                if counts.len() >= MAX_DIMS {
                    return Err(ArrayError::MaxDimsExceeded {
                        max: MAX_DIMS,
                        text: text.to_string(),
                    });
                }
                if item_level.is_some_and(|level| counts.len() >= level) {
                    return Err(inconsistent());
                }
                counts.push(0);
                ndims = ndims.max(counts.len());
            }
            Token::Close => {
                let count = counts.pop().ok_or_else(unbalanced)?;
                if count == 0 {
                    return Err(ArrayError::EmptyGroup {
                        text: text.to_string(),
                    });
                }
                let slot = recorded.get_mut(counts.len()).ok_or_else(unbalanced)?;
                match *slot {
                    None => *slot = Some(count),
                    Some(size) if size != count => return Err(inconsistent()),
                    Some(_) => {}
                }
                match counts.last_mut() {
                    Some(parent) => *parent += 1,
                    None => closed = true,
                }
            }
            Token::Comma => {}
            Token::Item(item) => {
                let level = counts.len();
                if *item_level.get_or_insert(level) != level {
                    return Err(inconsistent());
                }
                let count = counts.last_mut().ok_or_else(unbalanced)?;
                *count += 1;
                items.push(item.clone());
            }
        }
    }

    if !closed {
        return Err(unbalanced());
    }

    let dims = (0..ndims)
        .map(|i| recorded.get(ndims - i - 1).copied().flatten())
        .collect::<Option<Vec<usize>>>()
        .ok_or_else(unbalanced)?;

    // Guards shapes the level checks cannot see, e.g. a deeper group
    // closed before any item was read.
    if dims.iter().product::<usize>() != items.len() {
        return Err(inconsistent());
    }

    log::trace!("Parsed array '{}' with dims {:?}", text, dims);
    Ok(ParsedArray { items, dims })
}

// --- SERIALIZER ---

/// Quotes `item` when it would not read back as one literal token.
pub fn quote_item(item: &str) -> Cow<'_, str> {
    let needs_quotes =
        item.is_empty() || item.chars().any(|c| is_delimiter(c) || c == '"' || c == '\'');
    if !needs_quotes {
        return Cow::Borrowed(item);
    }
    let quote = if item.contains('"') { '\'' } else { '"' };
    Cow::Owned(format!("{quote}{item}{quote}"))
}

/// Renders a flat item sequence in bracket notation. `dims` is innermost first.
///
/// Groups are separated by bracket runs only, so items `1 2 3 4` with
/// `dims == [2, 2]` become `[[1,2][3,4]]`.
pub fn serialize<S: AsRef<str>>(items: &[S], dims: &[usize]) -> String {
    let ndims = dims.len().max(1);

    // Cumulative sizes of the inner dimensions; the outermost never closes early.
    let mut products = Vec::with_capacity(ndims);
    let mut running = 1usize;
    for size in dims.iter().take(ndims - 1) {
        running = running.saturating_mul(*size);
        products.push(running);
    }

    let mut out = "[".repeat(ndims);
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            let depth = products
                .iter()
                .filter(|product| **product > 0 && index % **product == 0)
                .count();
            if depth == 0 {
                out.push(',');
            } else {
                out.push_str(&"]".repeat(depth));
                out.push_str(&"[".repeat(depth));
            }
        }
        out.push_str(&quote_item(item.as_ref()));
    }
    out.push_str(&"]".repeat(ndims));
    out
}

// --- TYPED ARRAYS ---

/// The element type of an [`ArrayValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// 64-bit floating point.
    Double,
    /// 32-bit integer.
    Int,
    /// 32-bit floating point.
    Float,
    /// Boolean.
    Bool,
    /// Text.
    String,
}

impl ElementType {
    /// The lowercase name of the element type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Double => "double",
            ElementType::Int => "int",
            ElementType::Float => "float",
            ElementType::Bool => "bool",
            ElementType::String => "string",
        }
    }
}

/// Flat storage for an array, one variant per element type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ArrayData {
    /// Double elements.
    Double(Vec<f64>),
    /// Int elements.
    Int(Vec<i32>),
    /// Float elements.
    Float(Vec<f32>),
    /// Boolean elements.
    Bool(Vec<bool>),
    /// String elements.
    Str(Vec<String>),
}

impl ArrayData {
    /// The number of elements.
    pub fn len(&self) -> usize {
        match self {
            ArrayData::Double(v) => v.len(),
            ArrayData::Int(v) => v.len(),
            ArrayData::Float(v) => v.len(),
            ArrayData::Bool(v) => v.len(),
            ArrayData::Str(v) => v.len(),
        }
    }

    /// Tells if there are no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The element type of this storage.
    pub fn element_type(&self) -> ElementType {
        match self {
            ArrayData::Double(_) => ElementType::Double,
            ArrayData::Int(_) => ElementType::Int,
            ArrayData::Float(_) => ElementType::Float,
            ArrayData::Bool(_) => ElementType::Bool,
            ArrayData::Str(_) => ElementType::String,
        }
    }

    /// Renders every element as text, in storage order.
    pub fn texts(&self) -> Vec<String> {
        match self {
            ArrayData::Double(v) => v.iter().map(f64::to_string).collect(),
            ArrayData::Int(v) => v.iter().map(i32::to_string).collect(),
            ArrayData::Float(v) => v.iter().map(f32::to_string).collect(),
            ArrayData::Bool(v) => v
                .iter()
                .map(|b| if *b { "TRUE" } else { "FALSE" }.to_string())
                .collect(),
            ArrayData::Str(v) => v.clone(),
        }
    }
}

/// A typed, immutable multi-dimensional array value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayValue {
    dims: Vec<usize>,
    data: ArrayData,
}

impl ArrayValue {
    /// Builds an array, checking that `dims` (innermost first) can hold `data`.
    pub fn new(data: ArrayData, dims: Vec<usize>) -> Result<Self, ArrayError> {
        let valid = !dims.is_empty()
            && dims.len() <= MAX_DIMS
            && dims.iter().all(|d| *d > 0)
            && dims.iter().product::<usize>() == data.len();
        if !valid {
            return Err(ArrayError::Shape {
                dims,
                len: data.len(),
            });
        }
        Ok(Self { dims, data })
    }

    /// Builds a one-dimensional array holding all of `data`.
    pub fn vector(data: ArrayData) -> Result<Self, ArrayError> {
        let len = data.len();
        Self::new(data, vec![len])
    }

    /// Dimension sizes, innermost first.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Number of dimensions.
    pub fn ndims(&self) -> usize {
        self.dims.len()
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false for a constructed array; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The flat element storage.
    pub fn data(&self) -> &ArrayData {
        &self.data
    }

    /// The element type.
    pub fn element_type(&self) -> ElementType {
        self.data.element_type()
    }

    /// The elements as doubles, if the array is numeric.
    pub fn to_f64_vec(&self) -> Option<Vec<f64>> {
        match &self.data {
            ArrayData::Double(v) => Some(v.clone()),
            ArrayData::Int(v) => Some(v.iter().map(|x| f64::from(*x)).collect()),
            ArrayData::Float(v) => Some(v.iter().map(|x| f64::from(*x)).collect()),
            ArrayData::Bool(_) | ArrayData::Str(_) => None,
        }
    }

    /// The elements as integers, if the array is numeric and every element is integral.
    pub fn to_i64_vec(&self) -> Option<Vec<i64>> {
        match &self.data {
            ArrayData::Int(v) => Some(v.iter().map(|x| i64::from(*x)).collect()),
            _ => self
                .to_f64_vec()?
                .into_iter()
                .map(integral)
                .collect::<Option<Vec<i64>>>(),
        }
    }

    /// Renders the array in bracket notation.
    pub fn to_text(&self) -> String {
        serialize(&self.data.texts(), &self.dims)
    }
}

impl fmt::Display for ArrayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

// MARK: --- UNIT TESTS ---

#[cfg(test)]
mod tests {
    use super::*;

    fn items(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    // --- Tokenizer Tests ---

    #[test]
    fn test_quoted_token_keeps_delimiters() {
        let tokens = tokenize(r#""a,b" c"#);
        assert_eq!(
            tokens,
            vec![Token::Item("a,b".to_string()), Token::Item("c".to_string())]
        );
    }

    #[test]
    fn test_single_quotes_and_unterminated_quote() {
        let tokens = tokenize("'x y' \"open, still");
        assert_eq!(
            tokens,
            vec![
                Token::Item("x y".to_string()),
                Token::Item("open, still".to_string())
            ]
        );
    }

    #[test]
    fn test_slice_token_is_not_split() {
        let tokens = tokenize("[image(1:10,5:20), other]");
        assert_eq!(
            tokens,
            vec![
                Token::Open,
                Token::Item("image(1:10,5:20)".to_string()),
                Token::Comma,
                Token::Item("other".to_string()),
                Token::Close,
            ]
        );
    }

    #[test]
    fn test_whitespace_is_insignificant() {
        assert_eq!(tokenize(" [ 1 ,2 ] "), tokenize("[1,2]"));
    }

    // --- Open Array Detection ---

    #[test]
    fn test_open_array_detection() {
        assert!(is_open_array("1 2 3"));
        assert!(is_open_array("[1,2][3,4]"));
        assert!(!is_open_array("[1,2,3]"));
        assert!(!is_open_array("{1 2 3}"));
        assert!(!is_open_array("scalar"));
        assert!(!is_open_array(r#""a b c""#));
    }

    #[test]
    fn test_wrap_open_array() {
        assert_eq!(wrap_open_array("1 2 3"), "[1 2 3]");
        assert_eq!(wrap_open_array("[1,2,3]"), "[1,2,3]");
    }

    // --- Structural Parser Tests ---

    #[test]
    fn test_open_and_closed_forms_agree() {
        let open = parse_array("1 2 3").unwrap();
        let closed = parse_array("[1,2,3]").unwrap();
        assert_eq!(open, closed);
        assert_eq!(closed.dims, vec![3]);
    }

    #[test]
    fn test_parse_two_by_two() {
        let parsed = parse_array("[1,2][3,4]").unwrap();
        assert_eq!(parsed.dims, vec![2, 2]);
        assert_eq!(parsed.items, items(&["1", "2", "3", "4"]));
    }

    #[test]
    fn test_dims_are_innermost_first() {
        let parsed = parse_array("[[1,2,3],[4,5,6]]").unwrap();
        assert_eq!(parsed.dims, vec![3, 2]);
    }

    #[test]
    fn test_braces_behave_like_brackets() {
        let parsed = parse_array("{{a, b}, {c, d}}").unwrap();
        assert_eq!(parsed.dims, vec![2, 2]);
        assert_eq!(parsed.items, items(&["a", "b", "c", "d"]));
    }

    #[test]
    fn test_inconsistent_count_is_rejected() {
        let err = parse_array("[[1,2],[3]]").unwrap_err();
        assert!(matches!(err, ArrayError::InconsistentCount { .. }));
        assert!(err.to_string().contains("inconsistent element count"));
    }

    #[test]
    fn test_mixed_depth_is_rejected() {
        for text in ["[[1,2],3]", "[[1],2]", "[1,[2]]", "[[[1]],[2]]"] {
            let err = parse_array(text).unwrap_err();
            assert!(
                matches!(err, ArrayError::InconsistentCount { .. }),
                "{} gave {:?}",
                text,
                err
            );
        }
    }

    #[test]
    fn test_seven_levels_allowed_eight_rejected() {
        let seven = format!("{}1{}", "[".repeat(7), "]".repeat(7));
        assert_eq!(parse_array(&seven).unwrap().dims, vec![1; 7]);

        let eight = format!("{}1{}", "[".repeat(8), "]".repeat(8));
        let err = parse_array(&eight).unwrap_err();
        assert!(matches!(err, ArrayError::MaxDimsExceeded { max: 7, .. }));
        assert!(err.to_string().contains("maximum dimensions"));
    }

    #[test]
    fn test_unbalanced_and_trailing() {
        assert!(matches!(
            parse_array("[1,2").unwrap_err(),
            ArrayError::Unbalanced { .. }
        ));
        assert!(matches!(
            parse_array("[1]]").unwrap_err(),
            ArrayError::Unbalanced { .. }
        ));
        assert!(matches!(
            parse_array("[1],").unwrap_err(),
            ArrayError::TrailingText { .. }
        ));
        assert!(matches!(
            parse_array("[]").unwrap_err(),
            ArrayError::EmptyGroup { .. }
        ));
    }

    // --- Serializer Tests ---

    #[test]
    fn test_serialize_two_by_two() {
        let text = serialize(&items(&["1", "2", "3", "4"]), &[2, 2]);
        assert_eq!(text, "[[1,2][3,4]]");
        let parsed = parse_array(&text).unwrap();
        assert_eq!(parsed.dims, vec![2, 2]);
        assert_eq!(parsed.items, items(&["1", "2", "3", "4"]));
    }

    #[test]
    fn test_serialize_inverts_parse_for_three_dimensions() {
        let source = "[[[1,2],[3,4],[5,6]],[[7,8],[9,10],[11,12]]]";
        let parsed = parse_array(source).unwrap();
        assert_eq!(parsed.dims, vec![2, 3, 2]);

        let text = serialize(&parsed.items, &parsed.dims);
        assert_eq!(text, "[[[1,2][3,4][5,6]][[7,8][9,10][11,12]]]");
        assert_eq!(parse_array(&text).unwrap(), parsed);
    }

    #[test]
    fn test_serialize_quotes_items_with_delimiters() {
        let text = serialize(&items(&["a,b", "c", "", "it's"]), &[4]);
        assert_eq!(text, r#"["a,b",c,"","it's"]"#);
        let parsed = parse_array(&text).unwrap();
        assert_eq!(parsed.items, items(&["a,b", "c", "", "it's"]));
    }

    // --- Typed Array Tests ---

    #[test]
    fn test_array_value_shape_is_checked() {
        let err = ArrayValue::new(ArrayData::Int(vec![1, 2, 3]), vec![2, 2]).unwrap_err();
        assert!(matches!(err, ArrayError::Shape { len: 3, .. }));
        assert!(ArrayValue::new(ArrayData::Int(vec![1, 2, 3, 4]), vec![2, 2]).is_ok());
        assert!(ArrayValue::vector(ArrayData::Bool(vec![])).is_err());
    }

    #[test]
    fn test_array_value_conversions() {
        let array = ArrayValue::vector(ArrayData::Float(vec![1.0, 2.0])).unwrap();
        assert_eq!(array.to_f64_vec(), Some(vec![1.0, 2.0]));
        assert_eq!(array.to_i64_vec(), Some(vec![1, 2]));

        let fractional = ArrayValue::vector(ArrayData::Double(vec![1.5])).unwrap();
        assert_eq!(fractional.to_i64_vec(), None);

        let flags = ArrayValue::new(ArrayData::Bool(vec![true, false]), vec![2]).unwrap();
        assert_eq!(flags.to_text(), "[TRUE,FALSE]");
        assert_eq!(flags.to_f64_vec(), None);
    }
}
