//! The lexer turns a string of Tart source code into tokens: brackets,
//! strings (bare or quoted), and end-of-file. The parser pulls tokens
//! from a `Lexer` one at a time.

use std::iter::Peekable;
use std::str::Chars;

use crate::error::{Error, ErrorKind, Location, Result};

/// Lex a whole source string into a list of tokens ending with EOF.
pub fn lex(src: &str, at: Location) -> Result<Vec<Token>> {
    let mut lexer = Lexer::new(src, at);
    let mut tokens = Vec::new();
    loop {
        let tok = lexer.next_token()?;
        let done = tok.is_eof();
        tokens.push(tok);
        if done {
            return Ok(tokens);
        }
    }
}

pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    at: Location,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str, at: Location) -> Self {
        Lexer {
            chars: src.chars().peekable(),
            at,
        }
    }

    /// Produce the next token, skipping whitespace and `#` comments.
    /// Once the input is exhausted this keeps returning EOF tokens.
    pub fn next_token(&mut self) -> Result<Token> {
        loop {
            let Some(first) = self.peek() else {
                return Ok(Token::new(TokenKind::Eof, self.at.clone()));
            };

            match first {
                ch if ch.is_whitespace() => {
                    self.bump_while(char::is_whitespace);
                }
                '#' => {
                    self.bump_while(|ch| ch != '\n');
                    self.bump(); // Eat the '\n' that stopped the loop.
                }
                '[' => return Ok(Token::new(TokenKind::LBracket, self.bump())),
                ']' => return Ok(Token::new(TokenKind::RBracket, self.bump())),
                '"' => return self.quoted(),
                _ => return Ok(self.bare()),
            }
        }
    }

    /// A double-quoted string with the `\\`, `\t`, `\n` escape set.
    /// Raw newlines are forbidden inside the quotes.
    fn quoted(&mut self) -> Result<Token> {
        let fix = self.bump(); // Eat the opening '"'.
        let mut literal = String::from('"');
        let mut value = String::new();

        loop {
            match self.peek() {
                None => return Err(Error::new(ErrorKind::UnterminatedString).at(fix)),
                Some('\n') => return Err(Error::new(ErrorKind::NewlineInString).at(fix)),
                Some('"') => {
                    self.bump();
                    literal.push('"');
                    return Ok(Token::new(TokenKind::Str { value, literal }, fix));
                }
                Some('\\') => {
                    self.bump();
                    literal.push('\\');
                    let Some(escape) = self.peek() else {
                        return Err(Error::new(ErrorKind::UnterminatedString).at(fix));
                    };
                    self.bump();
                    literal.push(escape);
                    value.push(match escape {
                        '\\' => '\\',
                        't' => '\t',
                        'n' => '\n',
                        other => {
                            return Err(Error::new(ErrorKind::InvalidEscape(other)).at(fix));
                        }
                    });
                }
                Some(ch) => {
                    self.bump();
                    literal.push(ch);
                    value.push(ch);
                }
            }
        }
    }

    /// A maximal run of characters that are not whitespace, brackets,
    /// or a quote.
    fn bare(&mut self) -> Token {
        let fix = self.at.clone();
        let word = self.bump_while(|ch| !ch.is_whitespace() && !matches!(ch, '[' | ']' | '"'));
        Token::new(
            TokenKind::Str {
                value: word.clone(),
                literal: word,
            },
            fix,
        )
    }

    fn bump(&mut self) -> Location {
        let fix = self.at.clone();
        if let Some(ch) = self.chars.next() {
            if ch == '\n' {
                self.at.line += 1;
            }
        }
        fix
    }

    fn bump_while<F>(&mut self, f: F) -> String
    where
        F: Fn(char) -> bool,
    {
        let mut buf = String::new();
        while let Some(ch) = self.peek() {
            if f(ch) {
                buf.push(ch);
                self.bump();
            } else {
                break;
            }
        }
        buf
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub location: Location,
}

impl Token {
    fn new(kind: TokenKind, location: Location) -> Self {
        Token { kind, location }
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    LBracket,
    RBracket,
    /// A string token. `value` is the decoded content; `literal` is the
    /// raw lexeme (quotes included) for diagnostics.
    Str {
        value: String,
        literal: String,
    },
    Eof,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(line: u32) -> Location {
        let mut location = Location::new("test.tart");
        location.line = line;
        location
    }

    fn bare(word: &str, line: u32) -> Token {
        Token::new(
            TokenKind::Str {
                value: word.to_owned(),
                literal: word.to_owned(),
            },
            at(line),
        )
    }

    #[test]
    fn example_works() {
        assert_eq!(
            lex("[print hello, world]\n[get file]", at(1)).unwrap(),
            vec![
                Token::new(TokenKind::LBracket, at(1)),
                bare("print", 1),
                bare("hello,", 1),
                bare("world", 1),
                Token::new(TokenKind::RBracket, at(1)),
                Token::new(TokenKind::LBracket, at(2)),
                bare("get", 2),
                bare("file", 2),
                Token::new(TokenKind::RBracket, at(2)),
                Token::new(TokenKind::Eof, at(2)),
            ],
        );
    }

    #[test]
    fn eating_whitespace_counts_lines() {
        assert_eq!(
            lex("   \t \n \n\t", at(1)).unwrap(),
            vec![Token::new(TokenKind::Eof, at(3))],
        );

        assert_eq!(
            lex(" [ \n ]\t", at(1)).unwrap(),
            vec![
                Token::new(TokenKind::LBracket, at(1)),
                Token::new(TokenKind::RBracket, at(2)),
                Token::new(TokenKind::Eof, at(2)),
            ],
        );
    }

    #[test]
    fn eating_comments_works() {
        assert_eq!(
            lex("# one\n## two\nword # trailing", at(1)).unwrap(),
            vec![bare("word", 3), Token::new(TokenKind::Eof, at(3))],
        );
    }

    #[test]
    fn hash_inside_a_bare_word_is_not_a_comment() {
        assert_eq!(
            lex("a#b", at(1)).unwrap(),
            vec![bare("a#b", 1), Token::new(TokenKind::Eof, at(1))],
        );
    }

    #[test]
    fn bare_words_stop_at_brackets_and_quotes() {
        assert_eq!(
            lex("ab[cd]e\"f\"", at(1)).unwrap(),
            vec![
                bare("ab", 1),
                Token::new(TokenKind::LBracket, at(1)),
                bare("cd", 1),
                Token::new(TokenKind::RBracket, at(1)),
                bare("e", 1),
                Token::new(
                    TokenKind::Str {
                        value: "f".to_owned(),
                        literal: "\"f\"".to_owned(),
                    },
                    at(1),
                ),
                Token::new(TokenKind::Eof, at(1)),
            ],
        );
    }

    #[test]
    fn quoted_strings_decode_escapes_and_keep_the_lexeme() {
        assert_eq!(
            lex(r#""a b\tc\nd\\e""#, at(1)).unwrap(),
            vec![
                Token::new(
                    TokenKind::Str {
                        value: "a b\tc\nd\\e".to_owned(),
                        literal: r#""a b\tc\nd\\e""#.to_owned(),
                    },
                    at(1),
                ),
                Token::new(TokenKind::Eof, at(1)),
            ],
        );
    }

    #[test]
    fn quoted_strings_may_hold_brackets_and_hashes() {
        assert_eq!(
            lex("\"[not a call] # not a comment\"", at(1)).unwrap(),
            vec![
                Token::new(
                    TokenKind::Str {
                        value: "[not a call] # not a comment".to_owned(),
                        literal: "\"[not a call] # not a comment\"".to_owned(),
                    },
                    at(1),
                ),
                Token::new(TokenKind::Eof, at(1)),
            ],
        );
    }

    #[test]
    fn reject_unterminated_strings() {
        assert_eq!(
            lex("\"no end", at(1)).unwrap_err(),
            Error::new(ErrorKind::UnterminatedString).at(at(1)),
        );

        // EOF directly after the backslash.
        assert_eq!(
            lex("\"oops\\", at(1)).unwrap_err(),
            Error::new(ErrorKind::UnterminatedString).at(at(1)),
        );
    }

    #[test]
    fn reject_newline_in_string() {
        assert_eq!(
            lex("word \"a\nb\"", at(1)).unwrap_err(),
            Error::new(ErrorKind::NewlineInString).at(at(1)),
        );
    }

    #[test]
    fn reject_invalid_escapes() {
        assert_eq!(
            lex(r#""bad \q escape""#, at(1)).unwrap_err(),
            Error::new(ErrorKind::InvalidEscape('q')).at(at(1)),
        );
    }
}
