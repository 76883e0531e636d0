//! Parser for `go.mod` and `go.work` files.
//!
//! Only what dependency resolution needs is kept: the module path, its
//! requirements and a workspace's `use` directories. Every other directive is
//! validated for shape and then skipped.

use std::path::Path;

use crate::error::{BuoyError, Result};

const GOMOD_VERBS: &[&str] = &[
    "module", "go", "toolchain", "godebug", "require", "exclude", "replace", "retract", "tool",
    "ignore",
];
const GOWORK_VERBS: &[&str] = &["go", "toolchain", "godebug", "use", "replace"];

/// One `require` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Require {
    pub path: String,
    pub version: String,
    pub indirect: bool,
}

/// A parsed `go.mod`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoMod {
    pub module: String,
    pub requires: Vec<Require>,
}

/// A parsed `go.work`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoWork {
    /// Directories named by `use`, relative to the `go.work` file
    pub uses: Vec<String>,
}

#[derive(Debug)]
struct Directive {
    line: usize,
    verb: String,
    args: Vec<String>,
    comment: String,
}

impl GoMod {
    /// Strict parse: unknown directives and malformed entries are errors.
    pub fn parse(file: &str, data: &str) -> Result<Self> {
        Self::parse_with(file, data, true)
    }

    /// Lax parse: unknown directives are ignored, only `module` is required.
    pub fn parse_lax(file: &str, data: &str) -> Result<Self> {
        Self::parse_with(file, data, false)
    }

    /// Read and strictly parse the file at `path`.
    pub fn read(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(|e| {
            BuoyError::manifest(format!("cannot read '{}': {}", path.display(), e))
        })?;
        Self::parse(&path.display().to_string(), &data)
    }

    fn parse_with(file: &str, data: &str, strict: bool) -> Result<Self> {
        let mut gomod = GoMod::default();
        let mut module_seen = false;

        for d in directives(file, data)? {
            let err = |msg: String| BuoyError::manifest(format!("{}:{}: {}", file, d.line, msg));
            match d.verb.as_str() {
                "module" => {
                    if module_seen {
                        return Err(err("repeated module statement".to_string()));
                    }
                    match d.args.as_slice() {
                        [path] => gomod.module = path.clone(),
                        _ => return Err(err("usage: module module/path".to_string())),
                    }
                    module_seen = true;
                }
                "require" => match d.args.as_slice() {
                    [path, version] if version.starts_with('v') => gomod.requires.push(Require {
                        path: path.clone(),
                        version: version.clone(),
                        indirect: d.comment.split_whitespace().any(|w| w == "indirect"),
                    }),
                    _ if strict => {
                        return Err(err(format!(
                            "usage: require module/path v1.2.3, got '{}'",
                            d.args.join(" ")
                        )))
                    }
                    _ => {}
                },
                verb if strict && !GOMOD_VERBS.contains(&verb) => {
                    return Err(err(format!("unknown directive: {}", verb)));
                }
                _ => {}
            }
        }

        if !module_seen {
            return Err(BuoyError::manifest(format!(
                "{}: no module statement",
                file
            )));
        }
        Ok(gomod)
    }
}

impl GoWork {
    pub fn parse(file: &str, data: &str) -> Result<Self> {
        let mut work = GoWork::default();
        for d in directives(file, data)? {
            let err = |msg: String| BuoyError::manifest(format!("{}:{}: {}", file, d.line, msg));
            match d.verb.as_str() {
                "use" => match d.args.as_slice() {
                    [dir] => work.uses.push(dir.clone()),
                    _ => return Err(err("usage: use local/dir".to_string())),
                },
                verb if !GOWORK_VERBS.contains(&verb) => {
                    return Err(err(format!("unknown directive: {}", verb)));
                }
                _ => {}
            }
        }
        Ok(work)
    }
}

/// Flatten the file into one directive per entry, expanding `verb ( ... )`
/// blocks so every entry inside carries the block's verb.
fn directives(file: &str, data: &str) -> Result<Vec<Directive>> {
    let mut out = Vec::new();
    let mut block: Option<(String, usize)> = None;

    for (idx, raw) in data.lines().enumerate() {
        let line = idx + 1;
        let (code, comment) = split_comment(raw);
        let tokens = tokenize(code)
            .map_err(|msg| BuoyError::manifest(format!("{}:{}: {}", file, line, msg)))?;
        if tokens.is_empty() {
            continue;
        }

        if let Some((verb, _)) = &block {
            if tokens.len() == 1 && tokens[0] == ")" {
                block = None;
                continue;
            }
            out.push(Directive {
                line,
                verb: verb.clone(),
                args: tokens,
                comment: comment.to_string(),
            });
            continue;
        }

        let verb = tokens[0].clone();
        let args = &tokens[1..];
        if args.len() == 1 && args[0] == "(" {
            block = Some((verb, line));
            continue;
        }
        // `require ()` is an empty block
        if args.len() == 2 && args[0] == "(" && args[1] == ")" {
            continue;
        }
        if tokens[0] == ")" || tokens[0] == "(" {
            return Err(BuoyError::manifest(format!(
                "{}:{}: unexpected '{}'",
                file, line, tokens[0]
            )));
        }
        out.push(Directive {
            line,
            verb,
            args: args.to_vec(),
            comment: comment.to_string(),
        });
    }

    if let Some((verb, line)) = block {
        return Err(BuoyError::manifest(format!(
            "{}:{}: unterminated {} block",
            file, line, verb
        )));
    }
    Ok(out)
}

fn split_comment(line: &str) -> (&str, &str) {
    let mut quote: Option<char> = None;
    let mut prev = '\0';
    for (i, c) in line.char_indices() {
        match quote {
            Some(q) if c == q && (q == '`' || prev != '\\') => quote = None,
            Some(_) => {}
            None if c == '"' || c == '`' => quote = Some(c),
            None if c == '/' && prev == '/' => return (&line[..i - 1], &line[i + 1..]),
            None => {}
        }
        prev = c;
    }
    (line, "")
}

fn tokenize(code: &str) -> std::result::Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut chars = code.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c == '"' || c == '`' {
            chars.next();
            let mut token = String::new();
            let mut closed = false;
            while let Some(n) = chars.next() {
                if n == c {
                    closed = true;
                    break;
                }
                if n == '\\' && c == '"' {
                    if let Some(escaped) = chars.next() {
                        token.push(escaped);
                    }
                    continue;
                }
                token.push(n);
            }
            if !closed {
                return Err("unterminated quoted string".to_string());
            }
            tokens.push(token);
        } else if c == '(' || c == ')' {
            chars.next();
            tokens.push(c.to_string());
        } else {
            let mut token = String::new();
            while let Some(&n) = chars.peek() {
                if n.is_whitespace() || n == '(' || n == ')' || n == '"' || n == '`' {
                    break;
                }
                token.push(n);
                chars.next();
            }
            tokens.push(token);
        }
    }
    Ok(tokens)
}
