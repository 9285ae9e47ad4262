// src/constants.rs

/// The delimiter escaped by default: the backtick of a template literal.
pub const DEFAULT_DELIMITER: char = '`';

/// The character inserted in front of unescaped delimiters.
pub const DEFAULT_ESCAPE_CHAR: char = '\\';

/// The structural character expected after the closing delimiter when the
/// quoted block is the last entry of its enclosing object.
pub const DEFAULT_CLOSE_CHAR: char = '}';
