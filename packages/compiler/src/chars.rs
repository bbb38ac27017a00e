//! Character Constants
//!
//! Characters the expression splitters key on.

pub const EOF: char = '\0';
pub const SPACE: char = ' ';

// Quotes
pub const DQ: char = '"';
pub const SQ: char = '\'';
pub const BT: char = '`';

// Operators and punctuation
pub const PLUS: char = '+';
pub const MINUS: char = '-';
pub const PERIOD: char = '.';
pub const SLASH: char = '/';
pub const BACKSLASH: char = '\\';
pub const UNDERSCORE: char = '_';
pub const DOLLAR: char = '$';
pub const PIPE: char = '|';

// Brackets
pub const LPAREN: char = '(';
pub const RPAREN: char = ')';
pub const LBRACKET: char = '[';
pub const RBRACKET: char = ']';
pub const LBRACE: char = '{';
pub const RBRACE: char = '}';
