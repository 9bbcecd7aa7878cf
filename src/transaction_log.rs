use anyhow::{Result, bail};

/// A well-formed record carries at least `SEQ TYPE from CALLER to CALLEE`;
/// trailing fields (context, node, handle, size) carry no meaning here.
const MIN_LOG_FIELDS: usize = 6;

/// One record of the binder transaction log, borrowed from its line.
#[derive(Debug, PartialEq, Eq)]
pub struct Transaction<'a> {
    pub call_type: &'a str,
    /// Raw `pid[:tid]` token of the calling side.
    pub caller: &'a str,
    /// Raw `pid[:tid]` token of the receiving side.
    pub callee: &'a str,
}

impl<'a> Transaction<'a> {
    /// Parse one non-blank log line.
    ///
    /// The layout is positional: field index 1 is the call type, index 3
    /// the caller token, index 5 the callee token. A shorter line yields a
    /// recoverable error so the caller can skip the record.
    pub fn parse(line: &'a str) -> Result<Self> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < MIN_LOG_FIELDS {
            bail!(
                "expected at least {MIN_LOG_FIELDS} fields, got {}",
                fields.len()
            );
        }

        Ok(Self {
            call_type: fields[1],
            caller: fields[3],
            callee: fields[5],
        })
    }

    /// Pid part of the caller token (everything before the first `:`).
    pub fn caller_pid(&self) -> &'a str {
        pid_part(self.caller)
    }

    /// Pid part of the callee token.
    pub fn callee_pid(&self) -> &'a str {
        pid_part(self.callee)
    }
}

/// `"123:4"` resolves with key `"123"`; a token without a thread part is
/// already the key.
fn pid_part(token: &str) -> &str {
    token.split_once(':').map_or(token, |(pid, _)| pid)
}
