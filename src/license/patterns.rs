use std::ops::Range;

use anyhow::{Context, Result};
use regex::Regex;

use crate::config::PatternConfig;

const MIT_BODY: &str = r"(?s)Permission\s+is\s+hereby\s+granted,\s+free\s+of\s+charge.*?OTHER\s+DEALINGS\s+IN\s+THE\s+SOFTWARE\.";

const X11_TAIL: &str = r"(?s)^\s*Except\s+as\s+contained\s+in\s+this\s+notice.*?written\s+authorization[^.]*\.";

/// Built-in signatures as `(display name, SPDX id, pattern, tail)`, tried in
/// this order.
///
/// Names may repeat: every variant is tried and all of them report the same
/// display name. Put a longer variant before the shorter one it contains.
const BUILTIN: &[(&str, &str, &str, Option<&str>)] = &[
    (
        "Apache License 2.0",
        "Apache-2.0",
        r"(?s)(?:Licensed\s+under\s+the\s+)?Apache\s+License,?\s+Version\s+2\.0.*?limitations\s+under\s+the\s+License\.",
        None,
    ),
    ("MIT License", "X11", MIT_BODY, Some(X11_TAIL)),
    ("MIT License", "MIT", MIT_BODY, None),
    (
        "BSD License",
        "BSD-3-Clause",
        r"(?s)Redistribution\s+and\s+use\s+in\s+source\s+and\s+binary\s+forms.*?POSSIBILITY\s+OF\s+SUCH\s+DAMAGE\.",
        None,
    ),
    (
        "ISC License",
        "ISC",
        r"(?s)Permission\s+to\s+use,\s+copy,\s+modify,\s+and(?:/or)?\s+distribute\s+this\s+software.*?PERFORMANCE\s+OF\s+THIS\s+SOFTWARE\.",
        None,
    ),
    (
        "Mozilla Public License 2.0",
        "MPL-2.0",
        r"(?s)Mozilla\s+Public\s+License,?\s+Version\s+2\.0.*?Exhibit\s+B\s+-.*?Mozilla\s+Public\s+License,\s+v\.\s+2\.0\.",
        None,
    ),
    (
        "Eclipse Public License 1.0",
        "EPL-1.0",
        r"(?s)Eclipse\s+Public\s+License\s+-\s+v\s+1\.0.*?resulting\s+litigation\.",
        None,
    ),
    (
        "GNU Lesser General Public License 2.1",
        "LGPL-2.1",
        r"(?s)GNU\s+LESSER\s+GENERAL\s+PUBLIC\s+LICENSE\s+Version\s+2\.1.*?END\s+OF\s+TERMS\s+AND\s+CONDITIONS",
        None,
    ),
];

/// One named license signature.
///
/// With a `tail`, only a body match immediately followed by the tail counts,
/// and the span covers both. Candidate bodies are tried left to right, so the
/// match never runs across another body's closing phrase.
#[derive(Debug, Clone)]
pub struct Signature {
    pub name: String,
    pub spdx_id: Option<String>,
    pub regex: Regex,
    pub tail: Option<Regex>,
}

impl Signature {
    /// Byte range of the first match in `text`.
    pub fn find(&self, text: &str) -> Option<Range<usize>> {
        let Some(tail) = &self.tail else {
            return self.regex.find(text).map(|m| m.range());
        };
        self.regex.find_iter(text).find_map(|body| {
            tail.find(&text[body.end()..])
                .map(|t| body.start()..body.end() + t.end())
        })
    }
}

/// Ordered signature list. Not a map: duplicate names are kept.
#[derive(Debug, Clone, Default)]
pub struct SignatureSet {
    signatures: Vec<Signature>,
}

impl SignatureSet {
    /// The built-in signatures followed by any configured extras.
    pub fn new(extra: &[PatternConfig]) -> Result<Self> {
        let mut set = SignatureSet::default();
        for &(name, spdx, pattern, tail) in BUILTIN {
            set.push(name, Some(spdx), pattern)?;
            if let Some(tail) = tail {
                set.set_tail(tail)?;
            }
        }
        for p in extra {
            set.push(&p.name, None, &p.regex)
                .with_context(|| format!("invalid pattern for \"{}\"", p.name))?;
        }
        Ok(set)
    }

    pub fn push(&mut self, name: &str, spdx_id: Option<&str>, pattern: &str) -> Result<()> {
        self.signatures.push(Signature {
            name: name.to_string(),
            spdx_id: spdx_id.map(str::to_string),
            regex: Regex::new(pattern)?,
            tail: None,
        });
        Ok(())
    }

    /// Require `pattern` right after matches of the last pushed signature.
    fn set_tail(&mut self, pattern: &str) -> Result<()> {
        let tail = Regex::new(pattern)?;
        if let Some(last) = self.signatures.last_mut() {
            last.tail = Some(tail);
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Signature> {
        self.signatures.iter()
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}
