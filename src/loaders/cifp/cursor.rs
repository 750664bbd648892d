use std::io::{BufRead, Lines};

use crate::error::CifpResult;

/// A numbered source line. Line numbers start at 1.
pub type NumberedLine = (usize, String);

/// Line source with one line of lookahead. Header and blank lines never
/// surface.
pub struct RecordCursor<R: BufRead> {
    lines: Lines<R>,
    line_number: usize,
    peeked: Option<NumberedLine>,
}

impl<R: BufRead> RecordCursor<R> {
    pub fn new(source: R) -> Self {
        Self {
            lines: source.lines(),
            line_number: 0,
            peeked: None,
        }
    }

    fn fill(&mut self) -> CifpResult<()> {
        while self.peeked.is_none() {
            let Some(line) = self.lines.next() else {
                return Ok(());
            };
            self.line_number += 1;

            let line = line?;
            let line = line.trim_end_matches(['\r', '\n']);
            if line.trim().is_empty() || line.starts_with("HDR") {
                continue;
            }
            self.peeked = Some((self.line_number, line.to_owned()));
        }
        Ok(())
    }

    pub fn peek(&mut self) -> CifpResult<Option<&NumberedLine>> {
        self.fill()?;
        Ok(self.peeked.as_ref())
    }

    pub fn next_line(&mut self) -> CifpResult<Option<NumberedLine>> {
        self.fill()?;
        Ok(self.peeked.take())
    }

    /// Consumes the next line only if `predicate` accepts it.
    pub fn next_if(&mut self, predicate: impl FnOnce(&str) -> bool) -> CifpResult<Option<NumberedLine>> {
        let accepted = match self.peek()? {
            Some((_, line)) => predicate(line),
            None => false,
        };
        if accepted {
            self.next_line()
        } else {
            Ok(None)
        }
    }

    /// Consumes lines after `first` while `key` gives the same value. Lines
    /// without a key end the group.
    pub fn take_group<K: PartialEq>(
        &mut self,
        first: NumberedLine,
        key: impl Fn(&str) -> Option<K>,
    ) -> CifpResult<Vec<NumberedLine>> {
        let group_key = key(&first.1);
        let mut group = vec![first];
        if group_key.is_none() {
            return Ok(group);
        }

        while let Some(line) = self.next_if(|line| key(line) == group_key)? {
            group.push(line);
        }
        Ok(group)
    }
}
