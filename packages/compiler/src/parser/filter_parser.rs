//! Filter Expressions
//!
//! `a | f(x) | g` is rewritten to `_f("g")(_f("f")(a,x))`. A `|` only separates filters
//! when it is a single bar outside of strings, template literals, regex literals and
//! brackets.

use crate::chars;

/// Characters after which a `/` is a division rather than the start of a regex literal
fn is_valid_division_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            chars::UNDERSCORE
                | chars::RPAREN
                | chars::PERIOD
                | chars::PLUS
                | chars::MINUS
                | chars::DOLLAR
                | chars::RBRACKET
        )
}

#[derive(Default)]
struct ScanState {
    in_single: bool,
    in_double: bool,
    in_template_string: bool,
    in_regex: bool,
    curly: i32,
    square: i32,
    paren: i32,
}

impl ScanState {
    fn at_top_level(&self) -> bool {
        self.curly == 0 && self.square == 0 && self.paren == 0
    }
}

pub fn parse_filters(exp: &str) -> String {
    let indexed: Vec<(usize, char)> = exp.char_indices().collect();
    let mut state = ScanState::default();
    let mut expression: Option<String> = None;
    let mut filters: Vec<String> = Vec::new();
    let mut last_filter_index = 0;
    let mut prev = chars::EOF;

    for (n, &(i, c)) in indexed.iter().enumerate() {
        let escaped = prev == chars::BACKSLASH;
        prev = c;

        if state.in_single {
            if c == chars::SQ && !escaped {
                state.in_single = false;
            }
        } else if state.in_double {
            if c == chars::DQ && !escaped {
                state.in_double = false;
            }
        } else if state.in_template_string {
            if c == chars::BT && !escaped {
                state.in_template_string = false;
            }
        } else if state.in_regex {
            if c == chars::SLASH && !escaped {
                state.in_regex = false;
            }
        } else if c == chars::PIPE
            && indexed.get(n + 1).map(|&(_, next)| next) != Some(chars::PIPE)
            && (n == 0 || indexed[n - 1].1 != chars::PIPE)
            && state.at_top_level()
        {
            match expression {
                None => {
                    // first filter, end of expression
                    expression = Some(exp[..i].trim().to_string());
                }
                Some(_) => filters.push(exp[last_filter_index..i].trim().to_string()),
            }
            last_filter_index = i + 1;
        } else {
            match c {
                chars::DQ => state.in_double = true,
                chars::SQ => state.in_single = true,
                chars::BT => state.in_template_string = true,
                chars::LPAREN => state.paren += 1,
                chars::RPAREN => state.paren -= 1,
                chars::LBRACKET => state.square += 1,
                chars::RBRACKET => state.square -= 1,
                chars::LBRACE => state.curly += 1,
                chars::RBRACE => state.curly -= 1,
                _ => {}
            }
            if c == chars::SLASH {
                // find first non-whitespace prev char
                let before = indexed[..n].iter().rev().find(|&&(_, p)| p != chars::SPACE);
                if !before.map_or(false, |&(_, p)| is_valid_division_char(p)) {
                    state.in_regex = true;
                }
            }
        }
    }

    let mut expression = match expression {
        None => exp.trim().to_string(),
        Some(expression) => {
            if last_filter_index != 0 {
                filters.push(exp[last_filter_index..].trim().to_string());
            }
            expression
        }
    };

    for filter in &filters {
        expression = wrap_filter(&expression, filter);
    }
    expression
}

fn wrap_filter(exp: &str, filter: &str) -> String {
    match filter.find('(') {
        None => format!("_f(\"{}\")({})", filter, exp),
        Some(i) => {
            let name = &filter[..i];
            let args = &filter[i + 1..];
            if args == ")" {
                format!("_f(\"{}\")({}{}", name, exp, args)
            } else {
                format!("_f(\"{}\")({},{}", name, exp, args)
            }
        }
    }
}
