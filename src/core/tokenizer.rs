//! XML Tokenizer - State machine for XML token extraction
//!
//! Pull-parser style tokenizer over UTF-8 text:
//! - Element start/end/empty tags
//! - Text content (raw, entity decoding happens in the reader)
//! - CDATA sections
//! - Comments
//! - Processing instructions and the XML declaration
//! - DOCTYPE, with its internal subset captured for entity declarations
//!
//! All delimiters are ASCII, so every slice handed out lies on a char boundary.

use super::scanner::{is_whitespace, Scanner};
use crate::error::ParseError;

/// Current parsing state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    /// Before the first token
    Init,
    /// Between markup constructs
    InsideText,
    /// Inside a markup construct (<...>)
    InsideMarkup,
    /// End of input reached
    Done,
}

/// Type of XML token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// <element ...>
    StartTag,
    /// </element>
    EndTag,
    /// <element .../>
    EmptyTag,
    Text,
    /// <![CDATA[...]]>
    CData,
    /// <!--...-->
    Comment,
    /// <?target ...?>
    ProcessingInstruction,
    /// <?xml ...?>
    XmlDeclaration,
    /// <!DOCTYPE ...>
    DocType,
    Eof,
}

/// A token with its raw span in the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Raw span in input (start, end)
    pub span: (usize, usize),
    /// Tag name, PI target, or DOCTYPE root name
    pub name: Option<&'a str>,
    /// Text/CDATA/comment/PI body, tag attribute text, or DOCTYPE internal subset
    pub content: Option<&'a str>,
    /// Byte offset of `content` in the input
    pub content_offset: usize,
}

impl<'a> Token<'a> {
    fn new(kind: TokenKind, span: (usize, usize)) -> Self {
        Token {
            kind,
            span,
            name: None,
            content: None,
            content_offset: span.0,
        }
    }

    fn with_name(mut self, name: &'a str) -> Self {
        self.name = Some(name);
        self
    }

    fn with_content(mut self, content: &'a str, offset: usize) -> Self {
        self.content = Some(content);
        self.content_offset = offset;
        self
    }
}

/// XML tokenizer implementing a pull-parser pattern
pub struct Tokenizer<'a> {
    text: &'a str,
    scanner: Scanner<'a>,
    state: ParseState,
}

impl<'a> Tokenizer<'a> {
    pub fn new(text: &'a str) -> Self {
        Tokenizer {
            text,
            scanner: Scanner::new(text.as_bytes()),
            state: ParseState::Init,
        }
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    pub fn position(&self) -> usize {
        self.scanner.position()
    }

    fn error(&self, message: impl Into<String>, position: usize) -> ParseError {
        ParseError::at(message, self.scanner.input(), position)
    }

    #[inline]
    fn str_slice(&self, start: usize, end: usize) -> &'a str {
        &self.text[start..end]
    }

    /// Get the next token; `Eof` once the input is exhausted
    pub fn next_token(&mut self) -> Result<Token<'a>, ParseError> {
        if self.state == ParseState::Init {
            self.scanner.skip_whitespace();
            self.state = ParseState::InsideText;
        }

        if self.scanner.is_eof() {
            self.state = ParseState::Done;
            let end = self.scanner.position();
            return Ok(Token::new(TokenKind::Eof, (end, end)));
        }

        match self.scanner.peek() {
            Some(b'<') => self.parse_markup(),
            _ => self.parse_text(),
        }
    }

    /// Parse markup starting with '<'
    fn parse_markup(&mut self) -> Result<Token<'a>, ParseError> {
        let start = self.scanner.position();
        self.scanner.advance(1);
        self.state = ParseState::InsideMarkup;

        let token = match self.scanner.peek() {
            Some(b'/') => self.parse_end_tag(start),
            Some(b'!') => self.parse_bang_markup(start),
            Some(b'?') => self.parse_pi(start),
            Some(_) => self.parse_start_tag(start),
            None => Err(self.error("Unexpected end of input after '<'", start)),
        }?;

        self.state = ParseState::InsideText;
        Ok(token)
    }

    /// Parse a start tag or empty element tag
    fn parse_start_tag(&mut self, start: usize) -> Result<Token<'a>, ParseError> {
        let name_start = self.scanner.position();
        if self.scanner.read_name().is_none() {
            return Err(self.error("Invalid element name", name_start));
        }
        let name_end = self.scanner.position();

        let end = self
            .scanner
            .find_tag_end_quoted()
            .ok_or_else(|| self.error("Unterminated start tag", start))?;

        let is_empty = end > name_end && self.scanner.slice(end - 1, end) == b"/";
        let attrs_end = if is_empty { end - 1 } else { end };

        self.scanner.set_position(end + 1);

        let kind = if is_empty { TokenKind::EmptyTag } else { TokenKind::StartTag };
        Ok(Token::new(kind, (start, end + 1))
            .with_name(self.str_slice(name_start, name_end))
            .with_content(self.str_slice(name_end, attrs_end), name_end))
    }

    /// Parse an end tag
    fn parse_end_tag(&mut self, start: usize) -> Result<Token<'a>, ParseError> {
        self.scanner.advance(1); // Skip '/'

        let name_start = self.scanner.position();
        if self.scanner.read_name().is_none() {
            return Err(self.error("Invalid element name in end tag", name_start));
        }
        let name_end = self.scanner.position();

        // Only whitespace may follow the name
        self.scanner.skip_whitespace();
        match self.scanner.peek() {
            Some(b'>') => {}
            Some(_) => {
                return Err(self.error("End tag cannot have attributes or other content", self.scanner.position()))
            }
            None => return Err(self.error("Unterminated end tag", start)),
        }
        self.scanner.advance(1);

        Ok(Token::new(TokenKind::EndTag, (start, self.scanner.position()))
            .with_name(self.str_slice(name_start, name_end)))
    }

    /// Parse markup starting with '!' (comment, CDATA, DOCTYPE)
    fn parse_bang_markup(&mut self, start: usize) -> Result<Token<'a>, ParseError> {
        self.scanner.advance(1); // Skip '!'

        if self.scanner.starts_with(b"--") {
            self.parse_delimited(start, 2, b"-->", TokenKind::Comment, "Unterminated comment")
        } else if self.scanner.starts_with(b"[CDATA[") {
            self.parse_delimited(start, 7, b"]]>", TokenKind::CData, "Unterminated CDATA section")
        } else if self.scanner.starts_with(b"DOCTYPE") {
            self.parse_doctype(start)
        } else {
            Err(self.error("Invalid declaration - expected comment, CDATA, or DOCTYPE", start))
        }
    }

    /// Comment and CDATA bodies: skip the opener, run to the terminator
    fn parse_delimited(
        &mut self,
        start: usize,
        opener_len: usize,
        terminator: &[u8],
        kind: TokenKind,
        unterminated: &str,
    ) -> Result<Token<'a>, ParseError> {
        self.scanner.advance(opener_len);
        let content_start = self.scanner.position();

        let pos = self
            .scanner
            .find(terminator)
            .ok_or_else(|| self.error(unterminated, start))?;

        self.scanner.set_position(pos + terminator.len());
        Ok(Token::new(kind, (start, self.scanner.position()))
            .with_content(self.str_slice(content_start, pos), content_start))
    }

    /// Parse a DOCTYPE declaration
    ///
    /// `<!DOCTYPE name SYSTEM "uri" [internal subset]>`. The external subset
    /// is never loaded; the internal subset is returned as content.
    fn parse_doctype(&mut self, start: usize) -> Result<Token<'a>, ParseError> {
        self.scanner.advance(7); // Skip "DOCTYPE"

        if !matches!(self.scanner.peek(), Some(b) if is_whitespace(b)) {
            return Err(self.error("Whitespace required after DOCTYPE", self.scanner.position()));
        }
        self.scanner.skip_whitespace();

        let name_start = self.scanner.position();
        if self.scanner.read_name().is_none() {
            return Err(self.error("DOCTYPE declaration requires a name", name_start));
        }
        let name = self.str_slice(name_start, self.scanner.position());

        let bytes = self.scanner.input();
        let mut pos = self.scanner.position();
        let mut quote: Option<u8> = None;
        let mut subset: Option<(usize, usize)> = None;
        let mut subset_start: Option<usize> = None;

        while pos < bytes.len() {
            let b = bytes[pos];
            match (quote, subset_start, b) {
                (Some(q), _, _) if q == b => quote = None,
                (Some(_), _, _) => {}
                (None, Some(_), b'<') if bytes[pos..].starts_with(b"<!--") => {
                    pos = memchr::memmem::find(&bytes[pos + 4..], b"-->")
                        .map(|i| pos + 4 + i + 2)
                        .ok_or_else(|| self.error("Unterminated comment in DOCTYPE", pos))?;
                }
                (None, _, b'"' | b'\'') => quote = Some(b),
                (None, None, b'[') if subset.is_none() => subset_start = Some(pos + 1),
                (None, Some(s), b']') => {
                    subset = Some((s, pos));
                    subset_start = None;
                }
                (None, None, b'>') => {
                    self.scanner.set_position(pos + 1);
                    let mut token = Token::new(TokenKind::DocType, (start, pos + 1)).with_name(name);
                    if let Some((s, e)) = subset {
                        token = token.with_content(self.str_slice(s, e), s);
                    }
                    return Ok(token);
                }
                _ => {}
            }
            pos += 1;
        }

        Err(self.error("Unterminated DOCTYPE declaration", start))
    }

    /// Parse a processing instruction <?...?>
    fn parse_pi(&mut self, start: usize) -> Result<Token<'a>, ParseError> {
        self.scanner.advance(1); // Skip '?'

        let name_start = self.scanner.position();
        if self.scanner.read_name().is_none() {
            return Err(self.error("Invalid processing instruction target", name_start));
        }
        let name = self.str_slice(name_start, self.scanner.position());

        let content_start = self.scanner.position();
        let end = self
            .scanner
            .find(b"?>")
            .ok_or_else(|| self.error("Unterminated processing instruction", start))?;
        self.scanner.set_position(end + 2);

        let kind = if name == "xml" {
            TokenKind::XmlDeclaration
        } else if name.eq_ignore_ascii_case("xml") {
            return Err(self.error("Processing instruction target 'xml' is reserved", name_start));
        } else {
            TokenKind::ProcessingInstruction
        };

        Ok(Token::new(kind, (start, end + 2))
            .with_name(name)
            .with_content(self.str_slice(content_start, end), content_start))
    }

    /// Parse text content up to the next '<'
    fn parse_text(&mut self) -> Result<Token<'a>, ParseError> {
        let start = self.scanner.position();
        let end = self
            .scanner
            .find_tag_start()
            .unwrap_or(self.scanner.input().len());

        let content = self.str_slice(start, end);
        if let Some(i) = memchr::memmem::find(content.as_bytes(), b"]]>") {
            return Err(self.error("']]>' not allowed in text content", start + i));
        }

        self.scanner.set_position(end);
        Ok(Token::new(TokenKind::Text, (start, end)).with_content(content, start))
    }
}

/// Iterator adapter: yields tokens until Eof or the first error
impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Token<'a>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state == ParseState::Done {
            return None;
        }
        match self.next_token() {
            Ok(token) if token.kind == TokenKind::Eof => None,
            Ok(token) => Some(Ok(token)),
            Err(e) => {
                self.state = ParseState::Done;
                Some(Err(e))
            }
        }
    }
}
