//! Markup tokenizer using logos
//!
//! Splits untrusted markup into start tags, end tags and text. Comments and
//! declarations are skipped. Raw-text element bodies (`<script>`, ...) are
//! not handled here: the tree builder consumes them with [`raw_text_end`].

use logos::{Lexer, Logos};

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// A parsed start tag
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    /// Lowercased tag name
    pub name: String,
    /// Lowercased attribute names with decoded values, first occurrence wins
    pub attributes: Vec<(String, String)>,
    pub self_closing: bool,
}

#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token {
    // Quoted attribute values may contain '>'
    #[regex(r#"<[a-zA-Z][^\s/>]*([^>"']|"[^"]*"|'[^']*')*>"#, start_tag)]
    StartTag(Tag),

    #[regex(r"</[a-zA-Z][^>]*>", end_tag)]
    EndTag(String),

    #[token("<!--", skip_comment)]
    Comment,

    // <!DOCTYPE ...>, <![CDATA[ ...]> and <?...> are dropped
    #[regex(r"<![a-zA-Z\[][^>]*>", logos::skip)]
    #[regex(r"<\?[^>]*>", logos::skip)]
    Declaration,

    #[regex(r"[^<]+", |lex| lex.slice().to_string())]
    Text(String),

    // A '<' that does not start a tag is literal text
    #[token("<")]
    Lt,
}

fn start_tag(lex: &mut Lexer<Token>) -> Tag {
    let slice = lex.slice();
    parse_start_tag(&slice[1..slice.len() - 1])
}

fn end_tag(lex: &mut Lexer<Token>) -> String {
    let slice = lex.slice();
    tag_name(&slice[2..slice.len() - 1]).0
}

fn skip_comment(lex: &mut Lexer<Token>) -> logos::Skip {
    let rest = lex.remainder();
    let end = rest.find("-->").map(|i| i + 3).unwrap_or(rest.len());
    lex.bump(end);
    logos::Skip
}

/// Split a tag body into its lowercased name and the remainder
fn tag_name(body: &str) -> (String, &str) {
    let end = body
        .find(|c: char| c.is_ascii_whitespace() || c == '/' || c == '>')
        .unwrap_or(body.len());
    (body[..end].to_ascii_lowercase(), &body[end..])
}

/// Parse the text between `<` and `>` of a start tag
fn parse_start_tag(body: &str) -> Tag {
    let (name, mut rest) = tag_name(body);
    let self_closing = rest.trim_end().ends_with('/');
    let mut attributes: Vec<(String, String)> = Vec::new();

    loop {
        rest = rest.trim_start_matches(|c: char| c.is_ascii_whitespace() || c == '/');
        if rest.is_empty() {
            break;
        }

        let name_end = rest
            .char_indices()
            .skip(1)
            .find(|(_, c)| c.is_ascii_whitespace() || *c == '=' || *c == '/')
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let attr_name = rest[..name_end].to_ascii_lowercase();
        rest = rest[name_end..].trim_start_matches(|c: char| c.is_ascii_whitespace());

        let mut value = String::new();
        if let Some(after_eq) = rest.strip_prefix('=') {
            let after_eq = after_eq.trim_start_matches(|c: char| c.is_ascii_whitespace());
            let (raw, remaining) = match after_eq.chars().next() {
                Some(quote @ ('"' | '\'')) => {
                    let inner = &after_eq[1..];
                    match inner.find(quote) {
                        Some(close) => (&inner[..close], &inner[close + 1..]),
                        None => (inner, ""),
                    }
                }
                _ => {
                    let end = after_eq
                        .find(|c: char| c.is_ascii_whitespace())
                        .unwrap_or(after_eq.len());
                    (&after_eq[..end], &after_eq[end..])
                }
            };
            value = super::entities::decode(raw).into_owned();
            rest = remaining;
        }

        if !attributes.iter().any(|(n, _)| *n == attr_name) {
            attributes.push((attr_name, value));
        }
    }

    Tag {
        name,
        attributes,
        self_closing,
    }
}

/// Locate the end of a raw-text element body in `rest` (the input after its
/// start tag).
///
/// Returns `(content_len, consumed)`: the body is `rest[..content_len]` and
/// `consumed` bytes, including the end tag, should be skipped. A missing end
/// tag consumes the rest of the input.
pub fn raw_text_end(rest: &str, tag: &str) -> (usize, usize) {
    let lower = rest.to_ascii_lowercase();
    let needle = format!("</{}", tag);
    let mut from = 0;
    while let Some(found) = lower[from..].find(&needle) {
        let start = from + found;
        let after = start + needle.len();
        match lower.as_bytes().get(after) {
            None => return (start, rest.len()),
            Some(b) if b.is_ascii_whitespace() || *b == b'/' || *b == b'>' => {
                let close = lower[after..]
                    .find('>')
                    .map(|i| after + i + 1)
                    .unwrap_or(rest.len());
                return (start, close);
            }
            Some(_) => from = after,
        }
    }
    (rest.len(), rest.len())
}

/// Lex input string into tokens with spans.
///
/// Bytes the lexer cannot classify are returned as text.
pub fn lex(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    Token::lexer(input).spanned().map(|(tok, span)| match tok {
        Ok(t) => (t, span),
        Err(()) => (Token::Text(input[span.clone()].to_string()), span),
    })
}
