use std::io::BufRead;

use tracing::{debug, warn};

use crate::{
    config::LoaderConfig,
    error::{CifpResult, Error},
    package::Cifp,
};

use super::{
    airspace::AirspaceSegment,
    cursor::{NumberedLine, RecordCursor},
    enroute::AirwayFixLine,
    field::RecordLine,
    parse_record,
    partial::PartialCifp,
    procedure::ProcedureLine,
};

/// Which lines a record is read together with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordShape {
    Single,
    Airspace { restrictive: bool },
    Airway,
    Procedure,
}

impl RecordShape {
    fn of(line: &RecordLine) -> Self {
        match (line.char_at(4), line.char_at(5)) {
            ('A' | 'U', 'C') => Self::Airspace { restrictive: false },
            ('A' | 'U', 'R') => Self::Airspace { restrictive: true },
            ('E', 'R') => Self::Airway,
            ('P' | 'H', _) if matches!(line.char_at(12), 'D' | 'E' | 'F') => Self::Procedure,
            _ => Self::Single,
        }
    }
}

fn airspace_key(line: &str) -> Option<(String, String, char)> {
    let line = RecordLine::new(line).ok()?;
    matches!(RecordShape::of(&line), RecordShape::Airspace { .. }).then(|| AirspaceSegment::group_key(&line))
}

fn procedure_key(line: &str) -> Option<(char, String, char, String)> {
    let line = RecordLine::new(line).ok()?;
    (RecordShape::of(&line) == RecordShape::Procedure).then(|| ProcedureLine::group_key(&line))
}

fn airway_key(line: &str) -> Option<(String, Option<u16>)> {
    let line = RecordLine::new(line).ok()?;
    (RecordShape::of(&line) == RecordShape::Airway).then(|| AirwayFixLine::group_key(&line))
}

pub struct CifpReader<R: BufRead> {
    cursor: RecordCursor<R>,
    partial_cifp: PartialCifp,
    include_restrictive_airspace: bool,
    errors: Vec<(usize, String, Error)>,
}

impl<R: BufRead> CifpReader<R> {
    pub fn new(source: R) -> Self {
        Self::with_config(source, &LoaderConfig::default())
    }

    pub fn with_config(source: R, config: &LoaderConfig) -> Self {
        Self {
            cursor: RecordCursor::new(source),
            partial_cifp: PartialCifp::new(config.magnetic_variation_radii.clone()),
            include_restrictive_airspace: config.include_restrictive_airspace,
            errors: vec![],
        }
    }

    /// Reads every record, then cross-references fixes, airways, airspace and
    /// procedures. Records that fail to parse are kept in
    /// [`Cifp::non_critical_errors`]; only read failures abort.
    pub fn try_read(mut self) -> CifpResult<Cifp> {
        while let Some((line_number, line)) = self.cursor.next_line()? {
            let shape = match RecordLine::new(&line).map(|record| RecordShape::of(&record)) {
                Ok(shape) => shape,
                Err(e) => {
                    self.errors.push((line_number, line, e));
                    continue;
                }
            };

            match shape {
                RecordShape::Single => match parse_record(&line) {
                    Ok(Some(record)) => self.partial_cifp.add_record(record),
                    Ok(None) => {}
                    Err(e) => self.errors.push((line_number, line, e)),
                },
                RecordShape::Airspace { restrictive } => {
                    let group = self.cursor.take_group((line_number, line), airspace_key)?;
                    if restrictive && !self.include_restrictive_airspace {
                        debug!(line_number, "Skipping restrictive airspace");
                        continue;
                    }
                    self.read_group(group, |line| line.get(9..19).unwrap_or_default().trim().to_owned());
                }
                RecordShape::Airway => {
                    let group = self.take_airway((line_number, line))?;
                    self.read_group(group, |line| line.get(13..18).unwrap_or_default().trim().to_owned());
                }
                RecordShape::Procedure => {
                    let group = self.cursor.take_group((line_number, line), procedure_key)?;
                    self.read_group(group, |line| {
                        format!(
                            "{} {}",
                            line.get(6..10).unwrap_or_default().trim(),
                            line.get(13..19).unwrap_or_default().trim()
                        )
                    });
                }
            }
        }

        self.partial_cifp.errors = self.errors;
        let cifp: Cifp = self.partial_cifp.try_into()?;
        Ok(cifp)
    }

    /// An airway runs while the identifier matches and sequence numbers keep
    /// increasing; a reset starts the next airway of the same name.
    fn take_airway(&mut self, first: NumberedLine) -> CifpResult<Vec<NumberedLine>> {
        let Some((airway, Some(mut sequence))) = airway_key(&first.1) else {
            return Ok(vec![first]);
        };

        let mut group = vec![first];
        while let Some(line) = self.cursor.next_if(|line| match airway_key(line) {
            Some((next, Some(next_sequence))) => next == airway && next_sequence > sequence,
            _ => false,
        })? {
            if let Some((_, Some(next_sequence))) = airway_key(&line.1) {
                sequence = next_sequence;
            }
            group.push(line);
        }
        Ok(group)
    }

    /// Parses every line of a group. A single bad line drops the whole group.
    fn read_group(&mut self, group: Vec<NumberedLine>, key: impl Fn(&str) -> String) {
        let Some((first_line, first)) = group.first() else {
            return;
        };
        let first_line = *first_line;
        let key = key(first);

        let mut records = Vec::with_capacity(group.len());
        for (line_number, line) in group {
            match parse_record(&line) {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(e) => {
                    warn!(line_number, key = key.as_str(), error = %e, "Dropping record group");
                    self.errors.push((line_number, line, e));
                    return;
                }
            }
        }
        self.partial_cifp.add_group(first_line, key, records);
    }
}
