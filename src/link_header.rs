//! RFC 5988 `Link` header parsing.
//!
//! A header value is a comma-separated list of `<target>; param=value`
//! entries. Parameter values may be tokens or quoted strings, and quoted
//! strings may themselves contain `,` and `;`, so the value is scanned rather
//! than split. Entries that do not start with a `<target>` are skipped.

/// One parsed `Link` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEntry {
    /// Target URI, exactly as written between `<` and `>`
    pub target: String,
    /// Parameters in order of appearance; names are lowercased
    pub params: Vec<(String, String)>,
}

impl LinkEntry {
    /// Create an entry with a single `rel` parameter.
    pub fn new(target: impl Into<String>, rel: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            params: vec![("rel".to_string(), rel.into())],
        }
    }

    /// Value of the first parameter named `name` (case-insensitive).
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The `rel` parameter, if present.
    #[must_use]
    pub fn rel(&self) -> Option<&str> {
        self.param("rel")
    }

    /// True if the relation list contains `token` (case-insensitive).
    ///
    /// `rel` may hold several space-separated relation types.
    #[must_use]
    pub fn rel_is(&self, token: &str) -> bool {
        self.rel()
            .map(|rel| {
                rel.split_ascii_whitespace()
                    .any(|r| r.eq_ignore_ascii_case(token))
            })
            .unwrap_or(false)
    }
}

/// Parse one `Link` header value (or several values joined with `,`).
#[must_use]
pub fn parse(value: &str) -> Vec<LinkEntry> {
    let mut cursor = Cursor::new(value);
    let mut entries = Vec::new();

    loop {
        cursor.skip_while(|c| c.is_whitespace() || c == ',');
        match cursor.peek() {
            None => break,
            Some('<') => {
                cursor.bump();
                let Some(target) = cursor.take_until('>') else {
                    break;
                };
                let params = parse_params(&mut cursor);
                entries.push(LinkEntry { target, params });
            }
            Some(_) => cursor.skip_entry(),
        }
    }

    entries
}

/// Parse every `Link` header line of a request and return the entries in
/// order.
pub fn parse_all<'a, I>(values: I) -> Vec<LinkEntry>
where
    I: IntoIterator<Item = &'a str>,
{
    values.into_iter().flat_map(parse).collect()
}

fn parse_params(cursor: &mut Cursor<'_>) -> Vec<(String, String)> {
    let mut params = Vec::new();
    loop {
        cursor.skip_while(char::is_whitespace);
        match cursor.peek() {
            Some(';') => {
                cursor.bump();
            }
            Some(',') | None => return params,
            Some(_) => {
                // junk after the target; drop the rest of this entry
                cursor.skip_entry();
                return params;
            }
        }

        cursor.skip_while(char::is_whitespace);
        let name = cursor.take_while(|c| !matches!(c, '=' | ';' | ',') && !c.is_whitespace());
        cursor.skip_while(char::is_whitespace);

        let value = if cursor.peek() == Some('=') {
            cursor.bump();
            cursor.skip_while(char::is_whitespace);
            if cursor.peek() == Some('"') {
                cursor.bump();
                cursor.take_quoted()
            } else {
                cursor.take_while(|c| !matches!(c, ';' | ',') && !c.is_whitespace())
            }
        } else {
            String::new()
        };

        if !name.is_empty() {
            params.push((name.to_ascii_lowercase(), value));
        }
    }
}

struct Cursor<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn bump(&mut self) -> Option<char> {
        self.chars.next()
    }

    fn skip_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            out.push(c);
            self.bump();
        }
        out
    }

    /// Consume up to and including `end`; `None` if `end` never appears.
    fn take_until(&mut self, end: char) -> Option<String> {
        let mut out = String::new();
        while let Some(c) = self.bump() {
            if c == end {
                return Some(out);
            }
            out.push(c);
        }
        None
    }

    /// Consume a quoted string body after the opening quote, honoring `\`
    /// escapes. An unterminated string runs to the end of input.
    fn take_quoted(&mut self) -> String {
        let mut out = String::new();
        while let Some(c) = self.bump() {
            match c {
                '"' => break,
                '\\' => {
                    if let Some(escaped) = self.bump() {
                        out.push(escaped);
                    }
                }
                other => out.push(other),
            }
        }
        out
    }

    /// Skip to the next top-level `,`, stepping over quoted strings.
    fn skip_entry(&mut self) {
        while let Some(c) = self.peek() {
            match c {
                ',' => return,
                '"' => {
                    self.bump();
                    self.take_quoted();
                }
                _ => {
                    self.bump();
                }
            }
        }
    }
}
